//! Process-wide environment, set once and read-only afterwards.

use crate::common::{EnvError, Environment, Result};
use crate::resolver::Resolver;
use once_cell::sync::OnceCell;

static ENVIRONMENT: OnceCell<Environment> = OnceCell::new();

/// Validate and install the process environment.
///
/// Fails with `AlreadyInitialized` if one is installed already.
pub fn install(env: Environment) -> Result<&'static Environment> {
    env.validate()?;

    let profile = env.profile();
    ENVIRONMENT
        .set(env)
        .map_err(|_| EnvError::AlreadyInitialized)?;

    tracing::info!(profile = %profile, "Environment installed");
    ENVIRONMENT.get().ok_or(EnvError::AlreadyInitialized)
}

pub fn get() -> Option<&'static Environment> {
    ENVIRONMENT.get()
}

/// Installed environment, resolving it from process variables on first use
pub fn get_or_resolve() -> Result<&'static Environment> {
    if let Some(env) = get() {
        return Ok(env);
    }
    get_or_resolve_with(&Resolver::from_env()?)
}

/// Installed environment, or the one `resolver` picks if none is installed yet
pub fn get_or_resolve_with(resolver: &Resolver) -> Result<&'static Environment> {
    ENVIRONMENT.get_or_try_init(|| {
        let (source, env) = resolver.resolve_with_source()?;
        tracing::info!(profile = %env.profile(), source = %source, "Environment resolved");
        Ok(env)
    })
}
