use crate::core::MigrationPlan;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

static IMPORT_SPECIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*import\b[^;]*?['"]([^'"]+)['"]"#).expect("valid import regex")
});

/// Structural summary of what writing the generated output would change at
/// the target path. Never an error source: content differences are the
/// point of a dry run.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffSummary {
    pub new_file: bool,
    pub added_imports: Vec<String>,
    pub removed_imports: Vec<String>,
    pub renamed_identifiers: Vec<(String, String)>,
    pub line_delta: i64,
}

/// Compare generated output against the existing target content, if any.
pub fn compare(generated: &str, existing: Option<&str>, plan: &MigrationPlan) -> DiffSummary {
    let renamed_identifiers: Vec<(String, String)> = plan
        .rename_map
        .iter()
        .filter(|(from, to)| from != to)
        .map(|(from, to)| (from.clone(), to.clone()))
        .collect();

    let Some(existing) = existing else {
        return DiffSummary {
            new_file: true,
            added_imports: scan_imports(generated),
            removed_imports: Vec::new(),
            renamed_identifiers,
            line_delta: generated.lines().count() as i64,
        };
    };

    let generated_imports = scan_imports(generated);
    let existing_imports = scan_imports(existing);

    let added_imports = generated_imports
        .iter()
        .filter(|i| !existing_imports.contains(i))
        .cloned()
        .collect();
    let removed_imports = existing_imports
        .iter()
        .filter(|i| !generated_imports.contains(i))
        .cloned()
        .collect();

    DiffSummary {
        new_file: false,
        added_imports,
        removed_imports,
        renamed_identifiers,
        line_delta: generated.lines().count() as i64 - existing.lines().count() as i64,
    }
}

fn scan_imports(source: &str) -> Vec<String> {
    IMPORT_SPECIFIER
        .captures_iter(source)
        .map(|c| c[1].to_string())
        .collect()
}

impl DiffSummary {
    /// One-line rendering for the migration event stream.
    pub fn describe(&self) -> String {
        if self.new_file {
            return format!(
                "new file ({} lines, {} imports)",
                self.line_delta,
                self.added_imports.len()
            );
        }
        let mut out = String::new();
        let _ = write!(
            out,
            "+{} / -{} imports, {:+} lines",
            self.added_imports.len(),
            self.removed_imports.len(),
            self.line_delta
        );
        if !self.renamed_identifiers.is_empty() {
            let renames: Vec<String> = self
                .renamed_identifiers
                .iter()
                .map(|(from, to)| format!("{from} -> {to}"))
                .collect();
            let _ = write!(out, ", renamed {}", renames.join(", "));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ComponentDescriptor, ExportKind};
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::collections::{BTreeMap, BTreeSet};
    use std::path::PathBuf;

    fn plan_with_rename(from: &str, to: &str) -> MigrationPlan {
        let descriptor = ComponentDescriptor {
            name: from.to_string(),
            source_path: PathBuf::from("x.jsx"),
            props_schema: vec![],
            unknown_props: BTreeSet::new(),
            effect_constructs: vec![],
            style_refs: vec![],
            child_refs: BTreeSet::new(),
            cross_cutting_effects: BTreeSet::new(),
            export_kind: ExportKind::Default,
            visibility_prop: None,
        };
        let mut rename_map = BTreeMap::new();
        rename_map.insert(from.to_string(), to.to_string());
        MigrationPlan {
            descriptor,
            target_path: PathBuf::from("out/x.jsx"),
            rename_map,
            import_rewrites: vec![],
            conflicts: vec![],
        }
    }

    #[test]
    fn missing_target_marks_whole_file_new() {
        let generated = indoc! {r#"
            import React from 'react';
            import './x.css';
            export default function X() { return <i />; }
        "#};
        let summary = compare(generated, None, &plan_with_rename("X", "X"));
        assert!(summary.new_file);
        assert_eq!(summary.added_imports, vec!["react", "./x.css"]);
        assert_eq!(summary.line_delta, 3);
    }

    #[test]
    fn import_sets_are_compared_structurally() {
        let generated = "import a from '@app/a';\nimport b from '@app/b';\nlet x = 1;\n";
        let existing = "import a from '@app/a';\nimport c from '@app/c';\nlet x = 1;\nlet y = 2;\n";
        let summary = compare(generated, Some(existing), &plan_with_rename("X", "X"));
        assert_eq!(summary.added_imports, vec!["@app/b"]);
        assert_eq!(summary.removed_imports, vec!["@app/c"]);
        assert_eq!(summary.line_delta, -1);
        assert!(summary.renamed_identifiers.is_empty());
    }

    #[test]
    fn describe_mentions_renames() {
        let summary = compare("x", Some("x"), &plan_with_rename("Old", "New"));
        assert!(summary.describe().contains("Old -> New"));
    }

    #[test]
    fn identical_inputs_give_empty_delta() {
        let text = "import a from 'a';\nexport default a;\n";
        let summary = compare(text, Some(text), &plan_with_rename("X", "X"));
        assert_eq!(summary, DiffSummary::default());
    }
}
