pub mod defaults;
pub mod edits;
pub mod imports;
pub mod registry;

pub use edits::{apply_edits, SourceEdit};
pub use registry::NameRegistry;

use crate::analyzers::component::{self, node_text};
use crate::analyzers::imports::trim_quotes;
use crate::analyzers::SourceTree;
use crate::config::MigrationConfig;
use crate::core::errors::TransformError;
use crate::core::{AppliedRewrite, ComponentDescriptor, MigrationPlan};
use anyhow::Result;
use imports::RewriteOutcome;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tree_sitter::Node;

/// Attribute names recognized as test-targeting hooks in source projects.
const KNOWN_TEST_ATTRIBUTES: &[&str] = &["data-testid", "data-test", "data-cy", "data-qa"];

/// Everything the transformer produced for one file: the plan, the rewritten
/// text, non-fatal warnings, and the per-file failure if one occurred. On
/// failure the plan is still the best-effort partial plan for the report.
#[derive(Clone, Debug)]
pub struct TransformOutcome {
    pub plan: MigrationPlan,
    pub output: String,
    pub warnings: Vec<String>,
    pub failure: Option<TransformError>,
}

/// Rewrite a component to the target conventions.
///
/// Behavior-preserving by construction: only import specifiers, the
/// component identifier, the default-prop encoding, and the test-targeting
/// attribute are touched, all through span edits. Collisions are recorded on
/// the plan and surfaced as a failure, never silently resolved.
pub fn transform(
    tree: &SourceTree,
    descriptor: &ComponentDescriptor,
    relative: &Path,
    config: &MigrationConfig,
    registry: &mut NameRegistry,
) -> Result<TransformOutcome> {
    let shape = component::find_component(tree.tree.root_node(), &tree.source, &tree.path)
        .map_err(|e| anyhow::anyhow!("descriptor out of sync with tree: {e}"))?;
    let naming = &config.naming;

    let target_name = naming
        .rename_overrides
        .get(&descriptor.name)
        .cloned()
        .unwrap_or_else(|| descriptor.name.clone());

    let overridden = naming.target_path_overrides.contains_key(relative);
    let target_path = target_path_for(relative, &target_name, descriptor, config);

    let mut plan = MigrationPlan {
        descriptor: descriptor.clone(),
        target_path: target_path.clone(),
        rename_map: BTreeMap::new(),
        import_rewrites: Vec::new(),
        conflicts: Vec::new(),
    };
    plan.rename_map
        .insert(descriptor.name.clone(), target_name.clone());

    let mut failure = None;
    if let Err(conflict) = registry.claim_ident(&target_name, &tree.path) {
        failure = Some(TransformError::NamingCollision {
            path: tree.path.clone(),
            value: conflict.value.clone(),
            first_claimed_by: conflict.first_claimed_by.clone(),
        });
        plan.conflicts.push(conflict);
    }
    if let Err(conflict) = registry.claim_path(&target_path, &tree.path, overridden) {
        failure.get_or_insert(TransformError::NamingCollision {
            path: tree.path.clone(),
            value: conflict.value.clone(),
            first_claimed_by: conflict.first_claimed_by.clone(),
        });
        plan.conflicts.push(conflict);
    }

    let mut edits = Vec::new();
    let mut warnings = Vec::new();

    rewrite_imports(
        tree,
        config,
        &mut plan,
        &mut edits,
        &mut warnings,
        &mut failure,
    );

    if target_name != descriptor.name {
        rename_identifier_edits(
            tree.tree.root_node(),
            &tree.source,
            &descriptor.name,
            &target_name,
            &mut edits,
        );
    }

    // References to renamed sibling components follow the same overrides so
    // the batch stays consistent.
    for child in &descriptor.child_refs {
        if child == &descriptor.name {
            continue;
        }
        if let Some(new_name) = naming.rename_overrides.get(child) {
            if new_name != child {
                plan.rename_map.insert(child.clone(), new_name.clone());
                rename_identifier_edits(
                    tree.tree.root_node(),
                    &tree.source,
                    child,
                    new_name,
                    &mut edits,
                );
            }
        }
    }

    let (default_edits, default_warnings) = defaults::normalize_defaults(
        &shape,
        &tree.source,
        &target_name,
        naming.default_prop_style,
    );
    edits.extend(default_edits);
    warnings.extend(default_warnings);

    rewrite_test_attributes(
        tree.tree.root_node(),
        &tree.source,
        &naming.test_attribute_convention,
        &mut edits,
    );

    let output = apply_edits(&tree.source, &edits)?;

    Ok(TransformOutcome {
        plan,
        output,
        warnings,
        failure,
    })
}

/// Where the migrated file lands: under the provenance namespace in the
/// target tree, keeping the source-relative layout, unless explicitly
/// overridden.
fn target_path_for(
    relative: &Path,
    target_name: &str,
    descriptor: &ComponentDescriptor,
    config: &MigrationConfig,
) -> PathBuf {
    if let Some(override_path) = config.naming.target_path_overrides.get(relative) {
        return if override_path.is_absolute() {
            override_path.clone()
        } else {
            config.target_dir.join(override_path)
        };
    }

    let extension = relative
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("jsx");
    let file_name = if target_name == descriptor.name {
        relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{target_name}.{extension}"))
    } else {
        format!("{target_name}.{extension}")
    };

    let mut path = config
        .target_dir
        .join("src")
        .join(config.naming.namespace_dir());
    if let Some(parent) = relative.parent() {
        if !parent.as_os_str().is_empty() {
            path = path.join(parent);
        }
    }
    path.join(file_name)
}

/// Generated test specs land in the sibling `__tests__` directory of the
/// migration namespace.
pub fn test_path_for(plan: &MigrationPlan, config: &MigrationConfig) -> PathBuf {
    let extension = plan
        .target_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("jsx");
    config
        .target_dir
        .join("src")
        .join(config.naming.namespace_dir())
        .join("__tests__")
        .join(format!("{}.test.{extension}", plan.target_name()))
}

fn rewrite_imports(
    tree: &SourceTree,
    config: &MigrationConfig,
    plan: &mut MigrationPlan,
    edits: &mut Vec<SourceEdit>,
    warnings: &mut Vec<String>,
    failure: &mut Option<TransformError>,
) {
    let root = tree.tree.root_node();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() != "import_statement" {
            continue;
        }
        let Some(source_node) = child.child_by_field_name("source") else {
            continue;
        };
        let raw = node_text(source_node, &tree.source);
        let specifier = trim_quotes(raw);
        match imports::rewrite_specifier(specifier, &config.naming.import_prefix_map) {
            RewriteOutcome::Rewritten(replacement) => {
                // splice inside the quotes
                let range = source_node.byte_range();
                edits.push(SourceEdit::replace(
                    range.start + 1..range.end - 1,
                    replacement.clone(),
                ));
                plan.import_rewrites.push(AppliedRewrite {
                    from: specifier.to_string(),
                    to: replacement,
                });
            }
            RewriteOutcome::Unmatched => {
                warnings.push(format!(
                    "relative import '{specifier}' matched no rewrite rule; left unchanged"
                ));
                if config.naming.strict_imports {
                    failure.get_or_insert(TransformError::UnresolvedImport {
                        path: tree.path.clone(),
                        specifier: specifier.to_string(),
                    });
                }
            }
            RewriteOutcome::NotRelative => {}
        }
    }
}

fn rename_identifier_edits(
    node: Node<'_>,
    source: &str,
    from: &str,
    to: &str,
    edits: &mut Vec<SourceEdit>,
) {
    match node.kind() {
        "identifier" | "jsx_identifier" | "shorthand_property_identifier" => {
            if node_text(node, source) == from {
                edits.push(SourceEdit::replace(node.byte_range(), to.to_string()));
            }
        }
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        rename_identifier_edits(child, source, from, to, edits);
    }
}

/// Rename any recognized test-targeting attribute to the configured
/// convention. Absence of such attributes is not an error.
fn rewrite_test_attributes(
    node: Node<'_>,
    source: &str,
    convention: &str,
    edits: &mut Vec<SourceEdit>,
) {
    if node.kind() == "jsx_attribute" {
        if let Some(name) = node.named_child(0) {
            let attr = node_text(name, source);
            if KNOWN_TEST_ATTRIBUTES.contains(&attr) && attr != convention {
                edits.push(SourceEdit::replace(name.byte_range(), convention.to_string()));
            }
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        rewrite_test_attributes(child, source, convention, edits);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DefaultPropStyle, ImportPrefixRule};
    use crate::core::Dialect;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn setup(source: &str) -> (SourceTree, ComponentDescriptor) {
        let tree = SourceTree::parse(
            source,
            PathBuf::from("old/src/components/Widget.jsx"),
            Dialect::Jsx,
        )
        .unwrap();
        let descriptor = crate::analyzers::analyze(&tree).unwrap();
        (tree, descriptor)
    }

    fn base_config() -> MigrationConfig {
        let mut config = MigrationConfig::new("old/src/components", "new");
        config.naming.provenance_tag = "b".to_string();
        config
    }

    #[test]
    fn imports_rewritten_longest_prefix_first() {
        let (tree, descriptor) = setup(indoc! {r#"
            import { fmt } from '../shared/fmt';
            import '../shared/styles/base.css';
            import React from 'react';
            export default function Widget({ label }) {
                return <div>{fmt(label)}</div>;
            }
        "#});
        let mut config = base_config();
        config.naming.import_prefix_map = vec![
            ImportPrefixRule {
                prefix: "../shared/styles/".to_string(),
                replacement: "@app/styles/".to_string(),
            },
            ImportPrefixRule {
                prefix: "../shared/".to_string(),
                replacement: "@app/shared/".to_string(),
            },
        ];
        let mut registry = NameRegistry::new();
        let outcome = transform(
            &tree,
            &descriptor,
            Path::new("Widget.jsx"),
            &config,
            &mut registry,
        )
        .unwrap();

        assert!(outcome.failure.is_none());
        assert!(outcome.output.contains("from '@app/shared/fmt'"));
        assert!(outcome.output.contains("import '@app/styles/base.css'"));
        assert!(outcome.output.contains("from 'react'"));
        assert_eq!(outcome.plan.import_rewrites.len(), 2);
    }

    #[test]
    fn unmatched_relative_import_is_warning_by_default() {
        let (tree, descriptor) = setup(indoc! {r#"
            import { helper } from '../util/helper';
            export default function Widget({ label }) {
                return <p>{helper(label)}</p>;
            }
        "#});
        let config = base_config();
        let mut registry = NameRegistry::new();
        let outcome = transform(
            &tree,
            &descriptor,
            Path::new("Widget.jsx"),
            &config,
            &mut registry,
        )
        .unwrap();
        assert!(outcome.failure.is_none());
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.output.contains("'../util/helper'"));
    }

    #[test]
    fn strict_imports_escalate_to_failure() {
        let (tree, descriptor) = setup(indoc! {r#"
            import { helper } from '../util/helper';
            export default function Widget({ label }) {
                return <p>{helper(label)}</p>;
            }
        "#});
        let mut config = base_config();
        config.naming.strict_imports = true;
        let mut registry = NameRegistry::new();
        let outcome = transform(
            &tree,
            &descriptor,
            Path::new("Widget.jsx"),
            &config,
            &mut registry,
        )
        .unwrap();
        match outcome.failure {
            Some(TransformError::UnresolvedImport { specifier, .. }) => {
                assert_eq!(specifier, "../util/helper");
            }
            other => panic!("expected UnresolvedImport, got {other:?}"),
        }
    }

    #[test]
    fn rename_override_touches_declaration_and_markup() {
        let (tree, descriptor) = setup(indoc! {r#"
            function Widget({ label }) {
                return <Widget.Frame>{label}</Widget.Frame>;
            }
            Widget.Frame = ({ children }) => <div>{children}</div>;
            export default Widget;
        "#});
        let mut config = base_config();
        config
            .naming
            .rename_overrides
            .insert("Widget".to_string(), "LegacyWidget".to_string());
        let mut registry = NameRegistry::new();
        let outcome = transform(
            &tree,
            &descriptor,
            Path::new("Widget.jsx"),
            &config,
            &mut registry,
        )
        .unwrap();

        assert!(outcome.output.contains("function LegacyWidget({ label })"));
        assert!(outcome.output.contains("export default LegacyWidget;"));
        assert!(!outcome.output.contains("function Widget"));
        assert_eq!(
            outcome.plan.target_path,
            PathBuf::from("new/src/components_migrated_from_b/LegacyWidget.jsx")
        );
    }

    #[test]
    fn child_references_follow_rename_overrides() {
        let (tree, descriptor) = setup(indoc! {r#"
            import { Icon } from './Icon';
            export default function Widget({ label }) {
                return <div><Icon name={label} /></div>;
            }
        "#});
        let mut config = base_config();
        config
            .naming
            .rename_overrides
            .insert("Icon".to_string(), "LegacyIcon".to_string());
        let mut registry = NameRegistry::new();
        let outcome = transform(
            &tree,
            &descriptor,
            Path::new("Widget.jsx"),
            &config,
            &mut registry,
        )
        .unwrap();
        assert!(outcome.output.contains("<LegacyIcon name={label} />"));
        assert!(outcome.output.contains("import { LegacyIcon } from './Icon';"));
        assert_eq!(
            outcome.plan.rename_map.get("Icon").map(String::as_str),
            Some("LegacyIcon")
        );
    }

    #[test]
    fn naming_collision_is_recorded_not_silently_resolved() {
        let (tree_a, descriptor_a) = setup(indoc! {r#"
            export default function Widget({ a }) { return <i>{a}</i>; }
        "#});
        let source_b = indoc! {r#"
            export default function Widget({ b }) { return <b>{b}</b>; }
        "#};
        let tree_b = SourceTree::parse(
            source_b,
            PathBuf::from("old/src/components/other/Widget.jsx"),
            Dialect::Jsx,
        )
        .unwrap();
        let descriptor_b = crate::analyzers::analyze(&tree_b).unwrap();

        let config = base_config();
        let mut registry = NameRegistry::new();
        let first = transform(
            &tree_a,
            &descriptor_a,
            Path::new("Widget.jsx"),
            &config,
            &mut registry,
        )
        .unwrap();
        assert!(first.failure.is_none());

        let second = transform(
            &tree_b,
            &descriptor_b,
            Path::new("other/Widget.jsx"),
            &config,
            &mut registry,
        )
        .unwrap();
        match &second.failure {
            Some(TransformError::NamingCollision { value, .. }) => {
                assert_eq!(value, "Widget");
            }
            other => panic!("expected NamingCollision, got {other:?}"),
        }
        assert!(!second.plan.conflicts.is_empty());
    }

    #[test]
    fn test_attribute_rewritten_to_convention() {
        let (tree, descriptor) = setup(indoc! {r#"
            export default function Widget({ label }) {
                return <div data-testid="widget-root">{label}</div>;
            }
        "#});
        let mut config = base_config();
        config.naming.test_attribute_convention = "data-qa".to_string();
        let mut registry = NameRegistry::new();
        let outcome = transform(
            &tree,
            &descriptor,
            Path::new("Widget.jsx"),
            &config,
            &mut registry,
        )
        .unwrap();
        assert!(outcome.output.contains("data-qa=\"widget-root\""));
        assert!(!outcome.output.contains("data-testid"));
    }

    #[test]
    fn defaults_object_style_applies_during_transform() {
        let (tree, descriptor) = setup(indoc! {r#"
            export default function Widget({ tone = "info" }) {
                return <em>{tone}</em>;
            }
        "#});
        let mut config = base_config();
        config.naming.default_prop_style = DefaultPropStyle::AssignedDefaultsObject;
        let mut registry = NameRegistry::new();
        let outcome = transform(
            &tree,
            &descriptor,
            Path::new("Widget.jsx"),
            &config,
            &mut registry,
        )
        .unwrap();
        assert!(outcome.output.contains("Widget.defaultProps = {"));
        assert!(outcome.output.contains("  tone: \"info\","));
    }
}
