pub mod config;
pub mod types;
pub mod error;

pub use config::{Auth0Config, Environment};
pub use error::{EnvError, Result};
pub use types::Profile;
