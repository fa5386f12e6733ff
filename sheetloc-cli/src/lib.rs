//! CLI library for testing purposes

pub mod config;
pub mod path_glob;
pub mod preview;
pub mod project;
pub mod sync;
pub mod validation;

pub use config::{Config, ConfigOverrides};
pub use project::{Project, Unit};
