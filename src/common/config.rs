use crate::common::error::{EnvError, Result};
use crate::common::types::Profile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::{Host, Url};

pub const DEV_API_SERVER_URL: &str = "http://localhost:5000";
pub const DEV_AUTH0_URL: &str = "saleh-csft.us";
pub const DEV_AUTH0_AUDIENCE: &str = "shop";
pub const DEV_AUTH0_CLIENT_ID: &str = "PyY6oivW8HMxnQq5NrjF478eU9nZJ0A0";
pub const DEV_AUTH0_CALLBACK_URL: &str = "http://localhost:8100";

/// Build-time variables carrying the production record.
pub const PROD_API_SERVER_URL: &str = "SHOP_PROD_API_SERVER_URL";
pub const PROD_AUTH0_URL: &str = "SHOP_PROD_AUTH0_URL";
pub const PROD_AUTH0_AUDIENCE: &str = "SHOP_PROD_AUTH0_AUDIENCE";
pub const PROD_AUTH0_CLIENT_ID: &str = "SHOP_PROD_AUTH0_CLIENT_ID";
pub const PROD_AUTH0_CALLBACK_URL: &str = "SHOP_PROD_AUTH0_CALLBACK_URL";

const AUTH0_DOMAIN_SUFFIX: &str = ".auth0.com";

/// Environment-specific values handed to the client application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Environment {
    pub production: bool,
    /// Base URL of the backend API server
    pub api_server_url: String,
    pub auth0: Auth0Config,
}

/// Identity provider settings for the client application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Auth0Config {
    /// Tenant domain prefix, e.g. `my-tenant.us`
    pub url: String,
    /// API identifier tokens are scoped to
    pub audience: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
    /// Where the identity provider redirects after login
    #[serde(rename = "callbackURL")]
    pub callback_url: String,
}

impl Auth0Config {
    /// Full tenant domain, e.g. `my-tenant.us.auth0.com`
    pub fn tenant_domain(&self) -> String {
        if self.url.ends_with(AUTH0_DOMAIN_SUFFIX) {
            self.url.clone()
        } else {
            format!("{}{}", self.url, AUTH0_DOMAIN_SUFFIX)
        }
    }

    /// Token issuer as it appears in the `iss` claim
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.tenant_domain())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Json,
}

impl FileFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(FileFormat::Toml),
            Some("json") => Ok(FileFormat::Json),
            _ => Err(EnvError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

impl Environment {
    /// The compiled-in development record
    pub fn development() -> Self {
        Environment {
            production: false,
            api_server_url: DEV_API_SERVER_URL.to_string(),
            auth0: Auth0Config {
                url: DEV_AUTH0_URL.to_string(),
                audience: DEV_AUTH0_AUDIENCE.to_string(),
                client_id: DEV_AUTH0_CLIENT_ID.to_string(),
                callback_url: DEV_AUTH0_CALLBACK_URL.to_string(),
            },
        }
    }

    /// The compiled-in record for a profile.
    ///
    /// Production values only exist if they were supplied when the crate was
    /// built; a missing one is reported rather than filled from development.
    pub fn builtin(profile: Profile) -> Result<Self> {
        match profile {
            Profile::Development => Ok(Self::development()),
            Profile::Production => Self::production_from(|key| {
                build_time_value(key).map(str::to_string)
            }),
        }
    }

    fn production_from<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str, field: &'static str| -> Result<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(EnvError::MissingField(field))
        };

        Ok(Environment {
            production: true,
            api_server_url: value(PROD_API_SERVER_URL, "apiServerUrl")?,
            auth0: Auth0Config {
                url: value(PROD_AUTH0_URL, "auth0.url")?,
                audience: value(PROD_AUTH0_AUDIENCE, "auth0.audience")?,
                client_id: value(PROD_AUTH0_CLIENT_ID, "auth0.clientId")?,
                callback_url: value(PROD_AUTH0_CALLBACK_URL, "auth0.callbackURL")?,
            },
        })
    }

    /// Empty skeleton for scaffolding a new environment file
    pub fn template(profile: Profile) -> Self {
        Environment {
            production: profile.is_production(),
            api_server_url: String::new(),
            auth0: Auth0Config {
                url: String::new(),
                audience: String::new(),
                client_id: String::new(),
                callback_url: String::new(),
            },
        }
    }

    /// Load a whole record from a `.toml` or `.json` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;
        let content = fs::read_to_string(path)?;

        let env = match format {
            FileFormat::Toml => Self::from_toml_str(&content)?,
            FileFormat::Json => Self::from_json_str(&content)?,
        };

        tracing::debug!(path = %path.display(), profile = %env.profile(), "Loaded environment file");
        Ok(env)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Save the record, format chosen by file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match FileFormat::from_path(path)? {
            FileFormat::Toml => self.to_toml_string()?,
            FileFormat::Json => self.to_json_string()?,
        };

        fs::write(path, content)?;
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the record is usable: every value present and well formed.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in self.fields() {
            if value.trim().is_empty() {
                return Err(EnvError::MissingField(field));
            }
        }

        check_http_url("apiServerUrl", &self.api_server_url)?;
        check_http_url("auth0.callbackURL", &self.auth0.callback_url)?;
        check_domain(&self.auth0.url)?;

        if self.production {
            for (field, value) in [
                ("apiServerUrl", &self.api_server_url),
                ("auth0.callbackURL", &self.auth0.callback_url),
            ] {
                if !value.starts_with("https://") {
                    tracing::warn!(field, value = %value, "Production environment uses a non-HTTPS URL");
                }
            }
        }

        Ok(())
    }

    fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("apiServerUrl", self.api_server_url.as_str()),
            ("auth0.url", self.auth0.url.as_str()),
            ("auth0.audience", self.auth0.audience.as_str()),
            ("auth0.clientId", self.auth0.client_id.as_str()),
            ("auth0.callbackURL", self.auth0.callback_url.as_str()),
        ]
    }

    pub fn profile(&self) -> Profile {
        Profile::from(self.production)
    }

    /// Fail if this record belongs to another profile
    pub fn ensure_profile(&self, expected: Profile) -> Result<()> {
        let found = self.profile();
        if found != expected {
            return Err(EnvError::ProfileMismatch { expected, found });
        }
        Ok(())
    }

    /// Base URL for API requests, exactly as configured
    pub fn api_base(&self) -> &str {
        &self.api_server_url
    }

    /// Join a request path onto the API base.
    ///
    /// The base is never rewritten; an empty path yields the base itself.
    pub fn api_url(&self, path: &str) -> String {
        let base = self.api_base();
        if path.is_empty() {
            return base.to_string();
        }

        let path = path.trim_start_matches('/');
        if base.ends_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

fn build_time_value(key: &str) -> Option<&'static str> {
    match key {
        PROD_API_SERVER_URL => option_env!("SHOP_PROD_API_SERVER_URL"),
        PROD_AUTH0_URL => option_env!("SHOP_PROD_AUTH0_URL"),
        PROD_AUTH0_AUDIENCE => option_env!("SHOP_PROD_AUTH0_AUDIENCE"),
        PROD_AUTH0_CLIENT_ID => option_env!("SHOP_PROD_AUTH0_CLIENT_ID"),
        PROD_AUTH0_CALLBACK_URL => option_env!("SHOP_PROD_AUTH0_CALLBACK_URL"),
        _ => None,
    }
}

fn check_http_url(field: &'static str, value: &str) -> Result<()> {
    let invalid = || EnvError::InvalidUrl {
        field,
        value: value.to_string(),
    };

    let url = Url::parse(value).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    if !url.host_str().is_some_and(|host| !host.is_empty()) {
        return Err(invalid());
    }

    // The parser skips extra slashes, so `http:///drinks` gets host `drinks`
    let authority = value
        .split_once("://")
        .map(|(_, rest)| rest.split(['/', '?', '#']).next().unwrap_or(""))
        .unwrap_or("");
    if authority.is_empty() || authority.starts_with([':', '@']) {
        return Err(invalid());
    }

    Ok(())
}

fn check_domain(value: &str) -> Result<()> {
    let invalid = || EnvError::InvalidDomain(value.to_string());

    if value.starts_with('.') || value.ends_with('.') {
        return Err(invalid());
    }

    match Host::parse(value) {
        Ok(Host::Domain(_)) => Ok(()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn prod_vars() -> HashMap<&'static str, String> {
        HashMap::from([
            (PROD_API_SERVER_URL, "https://api.shop.example".to_string()),
            (PROD_AUTH0_URL, "shop-prod.eu".to_string()),
            (PROD_AUTH0_AUDIENCE, "shop-api".to_string()),
            (PROD_AUTH0_CLIENT_ID, "prodClientId0123".to_string()),
            (PROD_AUTH0_CALLBACK_URL, "https://shop.example".to_string()),
        ])
    }

    #[test]
    fn test_development_values() {
        let env = Environment::development();
        assert!(!env.production);
        assert_eq!(env.api_server_url, "http://localhost:5000");
        assert_eq!(env.auth0.url, "saleh-csft.us");
        assert_eq!(env.auth0.audience, "shop");
        assert_eq!(env.auth0.client_id, "PyY6oivW8HMxnQq5NrjF478eU9nZJ0A0");
        assert_eq!(env.auth0.callback_url, "http://localhost:8100");
        env.validate().unwrap();
    }

    #[test]
    fn test_api_base_is_unmodified() {
        let env = Environment::development();
        assert_eq!(env.api_base(), "http://localhost:5000");
        assert_eq!(env.api_url(""), "http://localhost:5000");
    }

    #[test]
    fn test_api_url_single_slash() {
        let mut env = Environment::development();
        assert_eq!(env.api_url("/drinks"), "http://localhost:5000/drinks");
        assert_eq!(env.api_url("drinks-detail"), "http://localhost:5000/drinks-detail");

        env.api_server_url = "http://localhost:5000/".to_string();
        assert_eq!(env.api_url("/drinks"), "http://localhost:5000/drinks");
        assert_eq!(env.api_base(), "http://localhost:5000/");
    }

    #[test]
    fn test_tenant_domain_and_issuer() {
        let env = Environment::development();
        assert_eq!(env.auth0.tenant_domain(), "saleh-csft.us.auth0.com");
        assert_eq!(env.auth0.issuer(), "https://saleh-csft.us.auth0.com/");

        let mut auth0 = env.auth0.clone();
        auth0.url = "tenant.auth0.com".to_string();
        assert_eq!(auth0.tenant_domain(), "tenant.auth0.com");
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let mut env = Environment::development();
        env.auth0.client_id = "   ".to_string();
        assert!(matches!(
            env.validate(),
            Err(EnvError::MissingField("auth0.clientId"))
        ));

        let template = Environment::template(Profile::Production);
        assert!(matches!(
            template.validate(),
            Err(EnvError::MissingField("apiServerUrl"))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut env = Environment::development();
        env.api_server_url = "localhost:5000".to_string();
        assert!(matches!(
            env.validate(),
            Err(EnvError::InvalidUrl { field: "apiServerUrl", .. })
        ));

        let mut env = Environment::development();
        env.auth0.callback_url = "http://".to_string();
        assert!(matches!(
            env.validate(),
            Err(EnvError::InvalidUrl { field: "auth0.callbackURL", .. })
        ));

        for hostless in [
            "http:///drinks",
            "https://?x",
            "http://#frag",
            "http://:5000",
            "ftp://localhost:5000",
        ] {
            let mut env = Environment::development();
            env.api_server_url = hostless.to_string();
            assert!(
                matches!(env.validate(), Err(EnvError::InvalidUrl { field: "apiServerUrl", .. })),
                "{} should be rejected",
                hostless
            );
        }
    }

    #[test]
    fn test_validate_accepts_hosts_with_ports_and_paths() {
        let mut env = Environment::development();
        for good in [
            "http://127.0.0.1:5000",
            "https://api.shop.example/v1/",
            "http://[::1]:5000",
        ] {
            env.api_server_url = good.to_string();
            env.validate().unwrap();
        }
    }

    #[test]
    fn test_validate_rejects_bad_domain() {
        let mut env = Environment::development();
        env.auth0.url = "https://saleh-csft.us".to_string();
        assert!(matches!(env.validate(), Err(EnvError::InvalidDomain(_))));

        for bad in ["tenant:443", "tenant?x", "tenant/x", "tenant#x", ".tenant.us", "10.0.0.1", "ten ant"] {
            env.auth0.url = bad.to_string();
            assert!(
                matches!(env.validate(), Err(EnvError::InvalidDomain(_))),
                "{} should be rejected",
                bad
            );
        }

        env.auth0.url = "tenant.auth0.com".to_string();
        env.validate().unwrap();
    }

    #[test]
    fn test_production_allows_plain_http_with_warning() {
        let mut env = Environment::development();
        env.production = true;
        env.validate().unwrap();
        assert_eq!(env.profile(), Profile::Production);
    }

    #[test]
    fn test_production_from_complete_vars() {
        let vars = prod_vars();
        let env = Environment::production_from(|k| vars.get(k).cloned()).unwrap();
        assert!(env.production);
        assert_eq!(env.profile(), Profile::Production);
        assert_eq!(env.api_base(), "https://api.shop.example");
        env.validate().unwrap();
        assert_ne!(env, Environment::development());
    }

    #[test]
    fn test_production_never_borrows_development_values() {
        let mut vars = prod_vars();
        vars.remove(PROD_AUTH0_CLIENT_ID);
        let err = Environment::production_from(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, EnvError::MissingField("auth0.clientId")));

        let mut vars = prod_vars();
        vars.insert(PROD_API_SERVER_URL, " ".to_string());
        let err = Environment::production_from(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, EnvError::MissingField("apiServerUrl")));
    }

    #[test]
    fn test_ensure_profile() {
        let env = Environment::development();
        env.ensure_profile(Profile::Development).unwrap();
        let err = env.ensure_profile(Profile::Production).unwrap_err();
        assert!(matches!(
            err,
            EnvError::ProfileMismatch {
                expected: Profile::Production,
                found: Profile::Development
            }
        ));
    }

    #[test]
    fn test_json_uses_camel_case_key_names() {
        let json = Environment::development().to_json_string().unwrap();
        assert!(json.contains("\"apiServerUrl\""));
        assert!(json.contains("\"clientId\""));
        assert!(json.contains("\"callbackURL\""));

        let parsed = Environment::from_json_str(&json).unwrap();
        assert_eq!(parsed, Environment::development());
    }

    #[test]
    fn test_missing_and_unknown_keys_rejected() {
        let missing = r#"
            production = false
            apiServerUrl = "http://localhost:5000"

            [auth0]
            url = "saleh-csft.us"
            audience = "shop"
            clientId = "abc"
        "#;
        assert!(matches!(
            Environment::from_toml_str(missing),
            Err(EnvError::TomlParse(_))
        ));

        let unknown = r#"{"production":false,"apiServerUrl":"http://x","extra":1,
            "auth0":{"url":"a.us","audience":"b","clientId":"c","callbackURL":"http://d"}}"#;
        assert!(matches!(
            Environment::from_json_str(unknown),
            Err(EnvError::Json(_))
        ));
    }

    #[test]
    fn test_save_and_load_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("environment.development.toml");

        let env = Environment::development();
        env.save(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("[auth0]"));
        assert_eq!(Environment::load(&path).unwrap(), env);
    }

    #[test]
    fn test_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("environment.yaml");
        assert!(matches!(
            Environment::development().save(&path),
            Err(EnvError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            Environment::load(&path),
            Err(EnvError::UnsupportedFormat(_))
        ));
    }
}
