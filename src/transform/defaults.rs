use super::edits::SourceEdit;
use crate::analyzers::component::{node_text, ComponentShape};
use crate::config::DefaultPropStyle;
use tree_sitter::Node;

/// Normalize the default-prop encoding to the target style without touching
/// the default expressions themselves.
///
/// `ExplicitDefault` keeps initializers where the analyzer found them (in
/// the destructuring pattern), so it produces no edits. The assigned-object
/// style strips pattern initializers and appends a `defaultProps` object
/// keyed by the public prop names.
pub fn normalize_defaults(
    shape: &ComponentShape<'_>,
    source: &str,
    target_name: &str,
    style: DefaultPropStyle,
) -> (Vec<SourceEdit>, Vec<String>) {
    if style == DefaultPropStyle::ExplicitDefault {
        return (Vec::new(), Vec::new());
    }
    if shape.props_param.kind() != "object_pattern" {
        return (Vec::new(), Vec::new());
    }

    let mut entries: Vec<(String, String)> = Vec::new();
    let mut edits = Vec::new();

    let param = shape.props_param;
    let mut cursor = param.walk();
    for member in param.named_children(&mut cursor) {
        match member.kind() {
            "object_assignment_pattern" => {
                if let Some((edit, entry)) = strip_assignment(member, source) {
                    edits.push(edit);
                    entries.push(entry);
                }
            }
            "pair_pattern" => {
                if let Some((edit, entry)) = strip_renamed_assignment(member, source) {
                    edits.push(edit);
                    entries.push(entry);
                }
            }
            _ => {}
        }
    }

    if entries.is_empty() {
        return (Vec::new(), Vec::new());
    }

    if source.contains(&format!("{}.defaultProps", shape.name)) {
        return (
            Vec::new(),
            vec![format!(
                "{} already assigns defaultProps; leaving default encoding unchanged",
                shape.name
            )],
        );
    }

    let mut object = String::new();
    for (key, expr) in &entries {
        object.push_str(&format!("  {key}: {expr},\n"));
    }
    edits.push(SourceEdit::insert(
        source.len(),
        format!("\n{target_name}.defaultProps = {{\n{object}}};\n"),
    ));

    (edits, Vec::new())
}

/// `size = "medium"` -> `size`, yielding the entry `size: "medium"`.
fn strip_assignment(member: Node<'_>, source: &str) -> Option<(SourceEdit, (String, String))> {
    let left = member.child_by_field_name("left")?;
    let right = member.child_by_field_name("right")?;
    let name = node_text(left, source).to_string();
    let expr = node_text(right, source).to_string();
    let edit = SourceEdit::replace(member.byte_range(), name.clone());
    Some((edit, (name, expr)))
}

/// `visible: isVisible = true` -> `visible: isVisible`, keyed by the public
/// name `visible`.
fn strip_renamed_assignment(
    member: Node<'_>,
    source: &str,
) -> Option<(SourceEdit, (String, String))> {
    let key = member.child_by_field_name("key")?;
    let value = member.child_by_field_name("value")?;
    if value.kind() != "assignment_pattern" {
        return None;
    }
    let alias = value.child_by_field_name("left")?;
    let right = value.child_by_field_name("right")?;
    let public = node_text(key, source).to_string();
    let expr = node_text(right, source).to_string();
    let replacement = format!("{public}: {}", node_text(alias, source));
    let edit = SourceEdit::replace(member.byte_range(), replacement);
    Some((edit, (public, expr)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::{component, SourceTree};
    use crate::core::Dialect;
    use crate::transform::edits::apply_edits;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn rewrite(source: &str, style: DefaultPropStyle) -> String {
        let tree = SourceTree::parse(source, PathBuf::from("t.jsx"), Dialect::Jsx).unwrap();
        let shape =
            component::find_component(tree.tree.root_node(), &tree.source, &tree.path).unwrap();
        let (edits, _) = normalize_defaults(&shape, &tree.source, &shape.name.clone(), style);
        apply_edits(&tree.source, &edits).unwrap()
    }

    #[test]
    fn explicit_style_is_identity() {
        let source = indoc! {r#"
            export default function Chip({ tone = "neutral" }) {
                return <span>{tone}</span>;
            }
        "#};
        assert_eq!(rewrite(source, DefaultPropStyle::ExplicitDefault), source);
    }

    #[test]
    fn assigned_object_style_moves_initializers() {
        let source = indoc! {r#"
            export default function Chip({ label, tone = "neutral", count = 0 }) {
                return <span data-count={count}>{label}</span>;
            }
        "#};
        let output = rewrite(source, DefaultPropStyle::AssignedDefaultsObject);
        assert!(output.contains("({ label, tone, count })"));
        assert!(output.contains("Chip.defaultProps = {"));
        assert!(output.contains("  tone: \"neutral\","));
        assert!(output.contains("  count: 0,"));
        assert!(!output.contains("tone = \"neutral\""));
    }

    #[test]
    fn component_without_defaults_is_untouched() {
        let source = indoc! {r#"
            export default function Tag({ label }) {
                return <b>{label}</b>;
            }
        "#};
        assert_eq!(
            rewrite(source, DefaultPropStyle::AssignedDefaultsObject),
            source
        );
    }
}
