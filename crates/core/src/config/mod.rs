//! Configuration loading and schema definitions
//!
//! ADK reads an optional TOML file from the project root; every field has a
//! default so a project without one behaves like the built-in settings.

mod loader;
mod schema;

pub use loader::{CONFIG_CANDIDATES, Config};
pub use schema::*;
