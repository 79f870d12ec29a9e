use crate::common::{Environment, Profile, Result};
use std::path::{Path, PathBuf};

/// Overrides the compiled profile, e.g. `SHOP_ENV_PROFILE=production`
pub const PROFILE_VAR: &str = "SHOP_ENV_PROFILE";
/// Points at one environment file to use wholesale
pub const FILE_VAR: &str = "SHOP_ENV_FILE";

const EXTENSIONS: [&str; 2] = ["toml", "json"];

/// Where an environment record came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Builtin(Profile),
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::File(path) => write!(f, "file {}", path.display()),
            Source::Builtin(profile) => write!(f, "built-in {} profile", profile),
        }
    }
}

/// Picks exactly one source for a profile.
///
/// Order: explicit file, then `environment.<profile>.{toml,json}` in each
/// search dir, then the compiled-in record. Sources are never merged.
#[derive(Debug, Clone)]
pub struct Resolver {
    profile: Profile,
    file: Option<PathBuf>,
    search_dirs: Vec<PathBuf>,
}

impl Resolver {
    pub fn new(profile: Profile) -> Self {
        Resolver {
            profile,
            file: None,
            search_dirs: Vec::new(),
        }
    }

    /// Resolver configured from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup_with_profile(lookup, None)
    }

    /// Like `from_lookup`; a given profile wins and `SHOP_ENV_PROFILE` is not read
    pub fn from_lookup_with_profile<F>(lookup: F, profile: Option<Profile>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = match profile {
            Some(profile) => profile,
            None => match lookup(PROFILE_VAR).filter(|v| !v.trim().is_empty()) {
                Some(value) => value.parse()?,
                None => Profile::compiled(),
            },
        };

        let mut resolver = Resolver::new(profile);
        if let Some(file) = lookup(FILE_VAR).filter(|v| !v.trim().is_empty()) {
            resolver = resolver.with_file(file);
        }

        for dir in default_search_dirs() {
            resolver = resolver.with_search_dir(dir);
        }

        Ok(resolver)
    }

    pub fn with_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn with_search_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.search_dirs.push(dir.into());
        self
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Files probed when no explicit file is set, in order
    pub fn candidates(&self) -> Vec<PathBuf> {
        self.search_dirs
            .iter()
            .flat_map(|dir| {
                EXTENSIONS
                    .iter()
                    .map(move |ext| dir.join(file_name(self.profile, ext)))
            })
            .collect()
    }

    /// Choose the source without loading it
    pub fn source(&self) -> Source {
        if let Some(file) = &self.file {
            return Source::File(file.clone());
        }

        self.candidates()
            .into_iter()
            .find(|path| path.is_file())
            .map(Source::File)
            .unwrap_or(Source::Builtin(self.profile))
    }

    /// Load, validate and profile-check the chosen record
    pub fn resolve(&self) -> Result<Environment> {
        self.resolve_with_source().map(|(_, env)| env)
    }

    /// Like `resolve`, also reporting which source was loaded
    pub fn resolve_with_source(&self) -> Result<(Source, Environment)> {
        let source = self.source();
        tracing::debug!(profile = %self.profile, source = %source, "Resolving environment");

        let env = match &source {
            Source::File(path) => Environment::load(path)?,
            Source::Builtin(profile) => Environment::builtin(*profile)?,
        };

        env.ensure_profile(self.profile)?;
        env.validate()?;
        Ok((source, env))
    }
}

/// `environment.<profile>.<ext>`
pub fn file_name(profile: Profile, ext: &str) -> String {
    format!("environment.{}.{}", profile, ext)
}

fn default_search_dirs() -> Vec<PathBuf> {
    let mut search_dirs = vec![Path::new(".").to_path_buf()];
    if let Some(config_dir) = dirs::config_dir() {
        search_dirs.push(config_dir.join("shop-env"));
    }
    search_dirs
}
