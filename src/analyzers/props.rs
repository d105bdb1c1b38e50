use super::component::{node_text, ComponentShape};
use crate::core::{PropHint, PropSpec};
use std::collections::BTreeSet;
use tree_sitter::Node;

const BOOLISH_NAMES: &[&str] = &[
    "visible", "show", "open", "hidden", "disabled", "checked", "active", "loading", "expanded",
    "selected", "inline", "fullWidth",
];

const TEXTISH_NAMES: &[&str] = &[
    "label",
    "title",
    "text",
    "children",
    "name",
    "placeholder",
    "description",
    "variant",
    "size",
    "className",
    "id",
];

const NUMBERISH_NAMES: &[&str] = &[
    "count", "index", "max", "min", "step", "width", "height", "depth", "level", "rows", "cols",
];

/// Extract the prop schema from the component's first parameter, in
/// declaration order, plus the catch-all set of prop names that could not be
/// statically enumerated.
pub fn extract_props(shape: &ComponentShape<'_>, source: &str) -> (Vec<PropSpec>, BTreeSet<String>) {
    let mut schema = Vec::new();
    let mut unknown = BTreeSet::new();
    let param = shape.props_param;

    match param.kind() {
        "object_pattern" => {
            let mut cursor = param.walk();
            for member in param.named_children(&mut cursor) {
                match member.kind() {
                    "shorthand_property_identifier_pattern" => {
                        let name = node_text(member, source);
                        schema.push(PropSpec::required(name, infer_hint(name, None)));
                    }
                    "object_assignment_pattern" => {
                        if let Some(spec) = defaulted_member(member, source) {
                            schema.push(spec);
                        }
                    }
                    "pair_pattern" => {
                        if let Some(spec) = renamed_member(member, source) {
                            schema.push(spec);
                        }
                    }
                    "rest_pattern" => {
                        // Dynamic shape: track member accesses on the rest
                        // binding as best-effort unknown prop names.
                        if let Some(rest_name) = member.named_child(0) {
                            let rest = node_text(rest_name, source);
                            collect_member_accesses(shape.body, source, rest, &mut unknown);
                        }
                    }
                    _ => {}
                }
            }
        }
        // Opaque `props` parameter: enumerate observed member accesses only.
        "identifier" => {
            let props_name = node_text(param, source);
            collect_member_accesses(shape.body, source, props_name, &mut unknown);
        }
        _ => {}
    }

    (schema, unknown)
}

/// `{ size = "medium" }` — default captured verbatim, never evaluated.
fn defaulted_member(member: Node<'_>, source: &str) -> Option<PropSpec> {
    let left = member.child_by_field_name("left")?;
    let right = member.child_by_field_name("right")?;
    let name = node_text(left, source);
    let default_expr = node_text(right, source);
    Some(PropSpec::defaulted(
        name,
        default_expr,
        infer_hint(name, Some(default_expr)),
    ))
}

/// `{ visible: isVisible }` or `{ visible: isVisible = true }` — the schema
/// records the public prop name (the key), not the local alias.
fn renamed_member(member: Node<'_>, source: &str) -> Option<PropSpec> {
    let key = member.child_by_field_name("key")?;
    let value = member.child_by_field_name("value")?;
    let name = node_text(key, source);
    match value.kind() {
        "assignment_pattern" => {
            let right = value.child_by_field_name("right")?;
            let default_expr = node_text(right, source);
            Some(PropSpec::defaulted(
                name,
                default_expr,
                infer_hint(name, Some(default_expr)),
            ))
        }
        _ => Some(PropSpec::required(name, infer_hint(name, None))),
    }
}

fn collect_member_accesses(
    node: Node<'_>,
    source: &str,
    object_name: &str,
    out: &mut BTreeSet<String>,
) {
    if node.kind() == "member_expression" {
        if let (Some(object), Some(property)) = (
            node.child_by_field_name("object"),
            node.child_by_field_name("property"),
        ) {
            if object.kind() == "identifier" && node_text(object, source) == object_name {
                out.insert(node_text(property, source).to_string());
            }
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_member_accesses(child, source, object_name, out);
    }
}

pub fn infer_hint(name: &str, default_expr: Option<&str>) -> PropHint {
    if is_handler_name(name) {
        return PropHint::Handler;
    }
    if let Some(expr) = default_expr {
        if let Some(hint) = classify_literal(expr) {
            return hint;
        }
    }
    if BOOLISH_NAMES.contains(&name) || has_bool_prefix(name) {
        return PropHint::Bool;
    }
    if TEXTISH_NAMES.contains(&name) {
        return PropHint::Text;
    }
    if NUMBERISH_NAMES.contains(&name) {
        return PropHint::Number;
    }
    PropHint::Unknown
}

/// `isVisible`, `hasIcon`, `canEdit`, `shouldWrap` — camelCase boolean prefix.
fn has_bool_prefix(name: &str) -> bool {
    ["is", "has", "can", "should"].iter().any(|prefix| {
        name.strip_prefix(prefix)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_uppercase())
    })
}

fn classify_literal(expr: &str) -> Option<PropHint> {
    if expr == "true" || expr == "false" {
        return Some(PropHint::Bool);
    }
    if expr.starts_with('"') || expr.starts_with('\'') || expr.starts_with('`') {
        return Some(PropHint::Text);
    }
    if expr.parse::<f64>().is_ok() {
        return Some(PropHint::Number);
    }
    None
}

/// `onClick`, `onValueChange`, ... — `on` followed by an uppercase letter.
pub fn is_handler_name(name: &str) -> bool {
    name.len() > 2
        && name.starts_with("on")
        && name.chars().nth(2).is_some_and(|c| c.is_ascii_uppercase())
}

/// Detect a boolean prop that gates whether the component renders anything:
/// `if (!p) return null`, `return p ? <x/> : null`, or `return p && <x/>`.
/// Marks the matched prop's hint and returns its name.
pub fn detect_visibility_prop(
    shape: &ComponentShape<'_>,
    source: &str,
    schema: &mut [PropSpec],
) -> Option<String> {
    let mut candidates = Vec::new();
    collect_gating_identifiers(shape.body, source, &mut candidates);
    for candidate in candidates {
        if let Some(spec) = schema.iter_mut().find(|p| p.name == candidate) {
            if matches!(spec.hint, PropHint::Bool | PropHint::Unknown) {
                spec.hint = PropHint::VisibilityGate;
                return Some(candidate);
            }
        }
    }
    None
}

fn collect_gating_identifiers(node: Node<'_>, source: &str, out: &mut Vec<String>) {
    match node.kind() {
        // if (!p) return null;
        "if_statement" => {
            if let (Some(condition), Some(consequence)) = (
                node.child_by_field_name("condition"),
                node.child_by_field_name("consequence"),
            ) {
                let inner = unwrap_parens(condition);
                if inner.kind() == "unary_expression" && node_text(inner, source).starts_with('!') {
                    if let Some(argument) = inner.child_by_field_name("argument") {
                        if argument.kind() == "identifier" && contains_null_return(consequence) {
                            out.push(node_text(argument, source).to_string());
                        }
                    }
                }
            }
        }
        // p ? <x/> : null
        "ternary_expression" => {
            if let (Some(condition), Some(alternative)) = (
                node.child_by_field_name("condition"),
                node.child_by_field_name("alternative"),
            ) {
                if condition.kind() == "identifier" && alternative.kind() == "null" {
                    out.push(node_text(condition, source).to_string());
                }
            }
        }
        // p && <x/>
        "binary_expression" => {
            if let (Some(left), Some(right)) = (
                node.child_by_field_name("left"),
                node.child_by_field_name("right"),
            ) {
                if left.kind() == "identifier"
                    && node_text(node, source).contains("&&")
                    && super::component::contains_markup(right)
                {
                    out.push(node_text(left, source).to_string());
                }
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_gating_identifiers(child, source, out);
    }
}

fn unwrap_parens(node: Node<'_>) -> Node<'_> {
    if node.kind() == "parenthesized_expression" {
        if let Some(inner) = node.named_child(0) {
            return unwrap_parens(inner);
        }
    }
    node
}

fn contains_null_return(node: Node<'_>) -> bool {
    if node.kind() == "return_statement" {
        return node.named_child(0).is_some_and(|n| n.kind() == "null");
    }
    let mut cursor = node.walk();
    let result = node.children(&mut cursor).any(contains_null_return);
    result
}
