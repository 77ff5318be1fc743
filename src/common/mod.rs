pub mod config;
pub mod env;
pub mod issue;
pub mod note;
pub mod project;
pub mod user;

pub use config::Config;
pub use env::{EnvProvider, SystemEnvProvider};
pub use issue::*;
pub use note::*;
pub use project::ProjectPath;
pub use user::*;

#[cfg(test)]
pub use env::MockEnvProvider;
