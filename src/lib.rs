// Export modules for library usage
pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod diff;
pub mod io;
pub mod orchestrator;
pub mod testgen;
pub mod transform;

// Re-export commonly used types
pub use crate::core::{
    AppliedRewrite, AssertionKind, ComponentDescriptor, Conflict, ConflictKind, Dialect,
    EffectConstruct, EffectTrigger, EventLevel, ExitStatus, ExportKind, MigrationEvent,
    MigrationPlan, MigrationReport, PropHint, PropSpec, ReportSummary, TestAssertion, TestSpec,
};

pub use crate::core::errors::{AnalysisError, MigrateError, TransformError};

pub use crate::config::{DefaultPropStyle, ImportPrefixRule, MigrationConfig, NamingConfig};

pub use crate::analyzers::{analyze, SourceTree};

pub use crate::diff::{compare, DiffSummary};

pub use crate::io::output::{create_writer, OutputFormat, ReportWriter};

pub use crate::orchestrator::{run, run_with_cancel, CancelToken};

pub use crate::testgen::{scaffold, TestEmitter, TestingLibraryEmitter};

pub use crate::transform::{transform, NameRegistry, SourceEdit, TransformOutcome};
