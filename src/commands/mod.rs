//! CLI command implementations.
//!
//! Each submodule owns one subcommand: option validation, configuration
//! assembly, and execution. The core pipeline never reads flags; these
//! handlers translate CLI input into a `MigrationConfig` value object.

pub mod init;
pub mod migrate;

pub use init::init_config;
pub use migrate::{handle_migrate, MigrateOptions};
