use crate::cli::args::OutputFormat;
use crate::common::{Environment, Profile};
use crate::resolver::{self, Resolver, Source};
use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};

pub struct CommandExecutor {
    resolver: Resolver,
}

impl CommandExecutor {
    pub fn new(resolver: Resolver) -> Self {
        CommandExecutor { resolver }
    }

    fn resolve(&self) -> Result<(Source, Environment)> {
        self.resolver.resolve_with_source().with_context(|| {
            format!(
                "Failed to resolve {} environment from {}",
                self.resolver.profile(),
                self.resolver.source()
            )
        })
    }

    pub fn show(&self, format: OutputFormat) -> Result<()> {
        let (source, env) = self.resolve()?;

        match format {
            OutputFormat::Toml => print!("{}", env.to_toml_string()?),
            OutputFormat::Json => println!("{}", env.to_json_string()?),
            OutputFormat::Text => {
                println!("{}", format!("🌍 {} environment", env.profile()).bold());
                println!("   Source:        {}", source);
                println!("   API server:    {}", env.api_base().bright_cyan());
                println!("   Auth0 tenant:  {}", env.auth0.tenant_domain().bright_cyan());
                println!("   Issuer:        {}", env.auth0.issuer());
                println!("   Audience:      {}", env.auth0.audience.bright_yellow());
                println!("   Client ID:     {}", env.auth0.client_id);
                println!("   Callback URL:  {}", env.auth0.callback_url);
            }
        }

        Ok(())
    }

    pub fn check(&self) -> Result<()> {
        let (source, env) = self.resolve()?;

        println!("{} {} environment is valid", "✓".green(), env.profile());
        println!("   Source: {}", source);

        Ok(())
    }
}

/// Default file for `init`: `environment.<profile>.toml`
pub fn default_output_path(profile: Profile) -> PathBuf {
    PathBuf::from(resolver::file_name(profile, "toml"))
}

pub fn init(profile: Profile, output: Option<PathBuf>, force: bool) -> Result<()> {
    let path = output.unwrap_or_else(|| default_output_path(profile));
    write_template(profile, &path, force)?;

    println!("{}", "✅ Environment file created".green());
    println!("   Profile: {}", profile.to_string().bright_yellow());
    println!("   Path:    {}", path.display());
    println!("   Fill in every value, then run `shop-env check --file {}`", path.display());

    Ok(())
}

fn write_template(profile: Profile, path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    Environment::template(profile)
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::debug!(path = %path.display(), profile = %profile, "Wrote environment template");
    Ok(())
}
