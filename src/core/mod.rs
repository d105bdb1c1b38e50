pub mod errors;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Source dialect of a component file, keyed by extension.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Dialect {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
}

impl Dialect {
    pub fn from_extension(ext: &str) -> Option<Dialect> {
        match ext {
            "js" | "mjs" | "cjs" => Some(Dialect::JavaScript),
            "jsx" => Some(Dialect::Jsx),
            "ts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Dialect::JavaScript => "js",
            Dialect::Jsx => "jsx",
            Dialect::TypeScript => "ts",
            Dialect::Tsx => "tsx",
        }
    }
}

/// Heuristic classification of a prop, derived once during analysis.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PropHint {
    /// Invocation handler (`onClick`, `onSubmit`, ...)
    Handler,
    /// Boolean gating a conditional empty render
    VisibilityGate,
    Text,
    Number,
    Bool,
    Unknown,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropSpec {
    pub name: String,
    pub has_default: bool,
    /// Default initializer captured verbatim from source, never evaluated.
    pub default_expr: Option<String>,
    pub required: bool,
    pub hint: PropHint,
}

impl PropSpec {
    pub fn required(name: impl Into<String>, hint: PropHint) -> Self {
        Self {
            name: name.into(),
            has_default: false,
            default_expr: None,
            required: true,
            hint,
        }
    }

    pub fn defaulted(
        name: impl Into<String>,
        default_expr: impl Into<String>,
        hint: PropHint,
    ) -> Self {
        Self {
            name: name.into(),
            has_default: true,
            default_expr: Some(default_expr.into()),
            required: false,
            hint,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EffectTrigger {
    Mount,
    Update,
    Unmount,
}

impl std::fmt::Display for EffectTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EffectTrigger::Mount => "mount",
            EffectTrigger::Update => "update",
            EffectTrigger::Unmount => "unmount",
        };
        write!(f, "{s}")
    }
}

/// A declared lifecycle side effect with its dependency identifiers.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EffectConstruct {
    pub trigger: EffectTrigger,
    pub dependencies: Vec<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExportKind {
    Default,
    Named,
}

/// Extracted, immutable behavioral summary of one component.
///
/// Created once per file by the analyzer; every later stage (transform
/// planning, test synthesis, reporting) reads it without mutation. Child
/// components are identifier references only — resolution goes through an
/// external registry, so descriptors never embed each other.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComponentDescriptor {
    pub name: String,
    pub source_path: PathBuf,
    /// Props in source declaration order. Order is semantically significant
    /// for generated tests and is never reordered.
    pub props_schema: Vec<PropSpec>,
    /// Prop names observed but not statically declarable (rest patterns,
    /// member access on an opaque props parameter).
    pub unknown_props: BTreeSet<String>,
    pub effect_constructs: Vec<EffectConstruct>,
    /// Stylesheet import specifiers, source order.
    pub style_refs: Vec<String>,
    /// Imported identifiers used as markup constructors.
    pub child_refs: BTreeSet<String>,
    /// Textual targets of writes escaping the component scope.
    pub cross_cutting_effects: BTreeSet<String>,
    pub export_kind: ExportKind,
    /// Boolean prop gating whether the component renders anything.
    pub visibility_prop: Option<String>,
}

impl ComponentDescriptor {
    pub fn required_props(&self) -> impl Iterator<Item = &PropSpec> {
        self.props_schema.iter().filter(|p| !p.has_default)
    }

    pub fn defaulted_props(&self) -> impl Iterator<Item = &PropSpec> {
        self.props_schema.iter().filter(|p| p.has_default)
    }

    pub fn handler_props(&self) -> impl Iterator<Item = &PropSpec> {
        self.props_schema
            .iter()
            .filter(|p| p.hint == PropHint::Handler)
    }

    pub fn prop(&self, name: &str) -> Option<&PropSpec> {
        self.props_schema.iter().find(|p| p.name == name)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConflictKind {
    Identifier,
    TargetPath,
}

/// An unresolved collision discovered during planning.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub value: String,
    /// Source file that claimed the identifier or path first.
    pub first_claimed_by: PathBuf,
}

/// One applied import-specifier substitution.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppliedRewrite {
    pub from: String,
    pub to: String,
}

/// Per-file transform directive derived from a descriptor and the target
/// naming configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MigrationPlan {
    pub descriptor: ComponentDescriptor,
    pub target_path: PathBuf,
    /// Identifier renames, injective within one batch run.
    pub rename_map: BTreeMap<String, String>,
    pub import_rewrites: Vec<AppliedRewrite>,
    pub conflicts: Vec<Conflict>,
}

impl MigrationPlan {
    pub fn target_name(&self) -> &str {
        self.rename_map
            .get(&self.descriptor.name)
            .map(String::as_str)
            .unwrap_or(&self.descriptor.name)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssertionKind {
    /// Renders without error given only required props, in schema order.
    RendersCleanly { props: Vec<(String, String)> },
    /// Prop omitted; rendered output reflects the default expression.
    DefaultApplied { prop: String, expected: String },
    /// Simulate the triggering event once; handler invoked exactly once.
    HandlerInvoked { prop: String, event: String },
    RendersWhenTrue { prop: String },
    RendersNothingWhenFalse { prop: String },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestAssertion {
    pub name: String,
    pub kind: AssertionKind,
}

/// Ordered assertion sequence derived solely from a descriptor.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestSpec {
    pub component: String,
    /// Whether the component leaves its module as the default export.
    pub default_export: bool,
    pub assertions: Vec<TestAssertion>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventLevel {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for EventLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventLevel::Info => "INFO",
            EventLevel::Warning => "WARN",
            EventLevel::Error => "ERROR",
        };
        write!(f, "{s}")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MigrationEvent {
    pub level: EventLevel,
    pub file: PathBuf,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

impl MigrationEvent {
    pub fn info(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            level: EventLevel::Info,
            file: file.into(),
            message: message.into(),
            component: None,
        }
    }

    pub fn warning(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            level: EventLevel::Warning,
            file: file.into(),
            message: message.into(),
            component: None,
        }
    }

    pub fn error(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            level: EventLevel::Error,
            file: file.into(),
            message: message.into(),
            component: None,
        }
    }

    pub fn with_component(mut self, name: impl Into<String>) -> Self {
        self.component = Some(name.into());
        self
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportSummary {
    pub migrated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Append-only event log for one batch run.
///
/// Events are merged per file in stable input order; once appended they are
/// never mutated or removed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MigrationReport {
    pub timestamp: DateTime<Utc>,
    pub events: Vec<MigrationEvent>,
    pub summary: ReportSummary,
}

impl MigrationReport {
    pub fn new() -> Self {
        Self {
            timestamp: Utc::now(),
            events: Vec::new(),
            summary: ReportSummary::default(),
        }
    }

    pub fn append(&mut self, event: MigrationEvent) {
        self.events.push(event);
    }

    pub fn append_all(&mut self, events: Vec<MigrationEvent>) {
        self.events.extend(events);
    }

    pub fn record_migrated(&mut self) {
        self.summary.migrated += 1;
    }

    pub fn record_skipped(&mut self) {
        self.summary.skipped += 1;
    }

    pub fn record_failed(&mut self) {
        self.summary.failed += 1;
    }

    pub fn errors(&self) -> impl Iterator<Item = &MigrationEvent> {
        self.events.iter().filter(|e| e.level == EventLevel::Error)
    }

    pub fn exit_status(&self) -> ExitStatus {
        ExitStatus::from_summary(&self.summary)
    }
}

impl Default for MigrationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Final batch outcome, computed from the summary counters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    PartialSuccess,
    HardFailure,
}

impl ExitStatus {
    pub fn from_summary(summary: &ReportSummary) -> Self {
        match (summary.migrated, summary.failed) {
            (0, _) => ExitStatus::HardFailure,
            (_, 0) => ExitStatus::Success,
            _ => ExitStatus::PartialSuccess,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::PartialSuccess => 2,
            ExitStatus::HardFailure => 3,
        }
    }
}
