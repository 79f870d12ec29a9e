// Library exports for the shop-env binary and client applications

pub mod cli;
pub mod common;
pub mod global;
pub mod resolver;

pub use common::{Auth0Config, EnvError, Environment, Profile};
pub use resolver::Resolver;
