use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// How prop defaults are encoded in the target project.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultPropStyle {
    /// Initializers stay in the destructuring pattern.
    #[default]
    ExplicitDefault,
    /// Initializers move to a `Component.defaultProps = {...}` object.
    AssignedDefaultsObject,
}

/// One ordered import-specifier substitution rule. Longest matching prefix
/// wins when several rules apply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportPrefixRule {
    pub prefix: String,
    pub replacement: String,
}

/// Target-project naming and path conventions, externally supplied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamingConfig {
    /// Ordered prefix substitutions applied to relative import specifiers.
    #[serde(default)]
    pub import_prefix_map: Vec<ImportPrefixRule>,

    /// Attribute name the target project's tests select elements by.
    #[serde(default = "default_test_attribute")]
    pub test_attribute_convention: String,

    #[serde(default)]
    pub default_prop_style: DefaultPropStyle,

    /// Naming marker for the migration namespace:
    /// `components_migrated_from_<tag>`.
    #[serde(default = "default_provenance_tag")]
    pub provenance_tag: String,

    /// Explicit component renames, applied before collision checking.
    #[serde(default)]
    pub rename_overrides: BTreeMap<String, String>,

    /// Explicit target paths keyed by source-relative path. An override
    /// exempts the path from the batch uniqueness check.
    #[serde(default)]
    pub target_path_overrides: BTreeMap<PathBuf, PathBuf>,

    /// Treat unmatched relative imports as errors instead of warnings.
    #[serde(default)]
    pub strict_imports: bool,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            import_prefix_map: Vec::new(),
            test_attribute_convention: default_test_attribute(),
            default_prop_style: DefaultPropStyle::default(),
            provenance_tag: default_provenance_tag(),
            rename_overrides: BTreeMap::new(),
            target_path_overrides: BTreeMap::new(),
            strict_imports: false,
        }
    }
}

fn default_test_attribute() -> String {
    "data-testid".to_string()
}

fn default_provenance_tag() -> String {
    "legacy".to_string()
}

impl NamingConfig {
    // Pure function: a tag must survive embedding in a directory name
    fn validate_tag(tag: &str) -> std::result::Result<(), String> {
        if tag.is_empty() {
            return Err("provenance_tag must not be empty".to_string());
        }
        if tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            Ok(())
        } else {
            Err(format!("provenance_tag '{tag}' contains path-hostile characters"))
        }
    }

    // Pure function: rename overrides must stay injective
    fn validate_renames(renames: &BTreeMap<String, String>) -> std::result::Result<(), String> {
        let mut seen = std::collections::BTreeSet::new();
        for target in renames.values() {
            if !seen.insert(target) {
                return Err(format!("rename_overrides map two components to '{target}'"));
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        Self::validate_tag(&self.provenance_tag)?;
        Self::validate_renames(&self.rename_overrides)?;
        if self.test_attribute_convention.is_empty() {
            return Err("test_attribute_convention must not be empty".to_string());
        }
        Ok(())
    }

    pub fn namespace_dir(&self) -> String {
        format!("components_migrated_from_{}", self.provenance_tag)
    }
}

/// Resolved configuration for one batch run, consumed by the orchestrator as
/// a value object. CLI handling assembles it; the core never reads flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MigrationConfig {
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,

    #[serde(default = "default_generate_tests")]
    pub generate_tests: bool,

    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub naming: NamingConfig,
}

fn default_generate_tests() -> bool {
    true
}

impl MigrationConfig {
    pub fn new(source_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
            generate_tests: default_generate_tests(),
            dry_run: false,
            naming: NamingConfig::default(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: MigrationConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .naming
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
        Ok(config)
    }
}
