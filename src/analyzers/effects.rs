use super::component::{node_text, ComponentShape};
use crate::core::{EffectConstruct, EffectTrigger, PropSpec};
use std::collections::BTreeSet;
use tree_sitter::Node;

const EFFECT_CALLEES: &[&str] = &[
    "useEffect",
    "useLayoutEffect",
    "React.useEffect",
    "React.useLayoutEffect",
];

/// Extract lifecycle-equivalent side-effect declarations in source order.
///
/// An empty dependency array maps to `Mount`; a populated one to `Update`
/// with the listed identifiers; a missing array to `Update` with no declared
/// dependencies. A cleanup closure returned from the effect body adds an
/// `Unmount` construct with the same dependencies.
pub fn extract_effects(body: Node<'_>, source: &str) -> Vec<EffectConstruct> {
    let mut effects = Vec::new();
    visit_node_for_effects(body, source, &mut effects);
    effects
}

fn visit_node_for_effects(node: Node<'_>, source: &str, effects: &mut Vec<EffectConstruct>) {
    if node.kind() == "call_expression" {
        if let Some(function) = node.child_by_field_name("function") {
            if EFFECT_CALLEES.contains(&node_text(function, source)) {
                if let Some(args) = node.child_by_field_name("arguments") {
                    record_effect(args, source, effects);
                }
            }
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit_node_for_effects(child, source, effects);
    }
}

fn record_effect(args: Node<'_>, source: &str, effects: &mut Vec<EffectConstruct>) {
    let mut cursor = args.walk();
    let named: Vec<Node<'_>> = args.named_children(&mut cursor).collect();

    let Some(callback) = named.first().copied().filter(is_callable) else {
        return;
    };

    let deps_array = named.get(1).filter(|n| n.kind() == "array");
    let dependencies = deps_array
        .map(|array| {
            let mut dep_cursor = array.walk();
            array
                .named_children(&mut dep_cursor)
                .map(|dep| node_text(dep, source).to_string())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let trigger = match deps_array {
        Some(_) if dependencies.is_empty() => EffectTrigger::Mount,
        _ => EffectTrigger::Update,
    };

    effects.push(EffectConstruct {
        trigger,
        dependencies: dependencies.clone(),
    });

    if has_cleanup_return(callback) {
        effects.push(EffectConstruct {
            trigger: EffectTrigger::Unmount,
            dependencies,
        });
    }
}

fn is_callable(node: &Node<'_>) -> bool {
    matches!(
        node.kind(),
        "arrow_function" | "function_expression" | "function"
    )
}

/// True when the effect callback returns a closure (cleanup) from its own
/// body, not from a nested function.
fn has_cleanup_return(callback: Node<'_>) -> bool {
    let Some(body) = callback.child_by_field_name("body") else {
        return false;
    };
    // expression-body arrow returning a closure directly
    if is_callable(&body) {
        return true;
    }
    returns_closure(body)
}

fn returns_closure(node: Node<'_>) -> bool {
    match node.kind() {
        "return_statement" => {
            return node.named_child(0).is_some_and(|n| is_callable(&n));
        }
        "arrow_function" | "function_expression" | "function" => return false,
        _ => {}
    }
    let mut cursor = node.walk();
    let result = node.children(&mut cursor).any(returns_closure);
    result
}

/// Flag writes escaping the component's own scope: assignments or updates
/// whose base identifier is neither a parameter, a prop binding, nor a local
/// declaration. Never dropped silently; the orchestrator surfaces each one.
pub fn detect_cross_cutting(
    shape: &ComponentShape<'_>,
    source: &str,
    schema: &[PropSpec],
) -> BTreeSet<String> {
    let mut declared = BTreeSet::new();
    declared.insert(shape.name.clone());
    for prop in schema {
        declared.insert(prop.name.clone());
    }
    collect_parameter_bindings(shape.callable, source, &mut declared);
    collect_local_declarations(shape.body, source, &mut declared);

    let mut flagged = BTreeSet::new();
    visit_node_for_writes(shape.body, source, &declared, &mut flagged);
    flagged
}

fn collect_parameter_bindings(callable: Node<'_>, source: &str, out: &mut BTreeSet<String>) {
    let params = callable
        .child_by_field_name("parameters")
        .or_else(|| callable.child_by_field_name("parameter"));
    if let Some(params) = params {
        collect_pattern_identifiers(params, source, out);
    }
}

fn collect_local_declarations(node: Node<'_>, source: &str, out: &mut BTreeSet<String>) {
    match node.kind() {
        "variable_declarator" => {
            if let Some(name) = node.child_by_field_name("name") {
                collect_pattern_identifiers(name, source, out);
            }
        }
        "function_declaration" => {
            if let Some(name) = node.child_by_field_name("name") {
                out.insert(node_text(name, source).to_string());
            }
        }
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_local_declarations(child, source, out);
    }
}

fn collect_pattern_identifiers(node: Node<'_>, source: &str, out: &mut BTreeSet<String>) {
    match node.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            out.insert(node_text(node, source).to_string());
        }
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_pattern_identifiers(child, source, out);
    }
}

fn visit_node_for_writes(
    node: Node<'_>,
    source: &str,
    declared: &BTreeSet<String>,
    flagged: &mut BTreeSet<String>,
) {
    let target = match node.kind() {
        "assignment_expression" | "augmented_assignment_expression" => {
            node.child_by_field_name("left")
        }
        "update_expression" => node.child_by_field_name("argument"),
        _ => None,
    };

    if let Some(target) = target {
        if let Some(base) = base_identifier(target) {
            let base_name = node_text(base, source);
            if !declared.contains(base_name) {
                flagged.insert(node_text(target, source).to_string());
            }
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit_node_for_writes(child, source, declared, flagged);
    }
}

/// Leftmost identifier of an assignment target: `a.b.c` -> `a`,
/// `cache[key].hits` -> `cache`.
fn base_identifier(node: Node<'_>) -> Option<Node<'_>> {
    match node.kind() {
        "identifier" => Some(node),
        "member_expression" | "subscript_expression" => {
            base_identifier(node.child_by_field_name("object")?)
        }
        "parenthesized_expression" => base_identifier(node.named_child(0)?),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::{component, SourceTree};
    use crate::core::Dialect;
    use indoc::indoc;
    use std::path::PathBuf;

    fn parse(source: &str) -> SourceTree {
        SourceTree::parse(source, PathBuf::from("test.jsx"), Dialect::Jsx).unwrap()
    }

    fn analyze_effects(source: &str) -> Vec<EffectConstruct> {
        let tree = parse(source);
        let shape =
            component::find_component(tree.tree.root_node(), &tree.source, &tree.path).unwrap();
        extract_effects(shape.body, &tree.source)
    }

    #[test]
    fn empty_deps_is_mount() {
        let effects = analyze_effects(indoc! {r#"
            import { useEffect } from 'react';
            export default function Ticker({ label }) {
                useEffect(() => {
                    console.log(label);
                }, []);
                return <span>{label}</span>;
            }
        "#});
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].trigger, EffectTrigger::Mount);
        assert!(effects[0].dependencies.is_empty());
    }

    #[test]
    fn populated_deps_is_update_with_ordered_names() {
        let effects = analyze_effects(indoc! {r#"
            import { useEffect } from 'react';
            export default function Sync({ value, mode }) {
                useEffect(() => {
                    sync(value, mode);
                }, [value, mode]);
                return <i>{value}</i>;
            }
        "#});
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].trigger, EffectTrigger::Update);
        assert_eq!(effects[0].dependencies, vec!["value", "mode"]);
    }

    #[test]
    fn cleanup_closure_adds_unmount() {
        let effects = analyze_effects(indoc! {r#"
            import { useEffect } from 'react';
            export default function Timer({ interval = 1000 }) {
                useEffect(() => {
                    const id = setInterval(tick, interval);
                    return () => clearInterval(id);
                }, [interval]);
                return <time />;
            }
        "#});
        let triggers: Vec<_> = effects.iter().map(|e| e.trigger).collect();
        assert_eq!(triggers, vec![EffectTrigger::Update, EffectTrigger::Unmount]);
        assert_eq!(effects[1].dependencies, vec!["interval"]);
    }

    #[test]
    fn module_level_write_is_flagged() {
        let tree = parse(indoc! {r#"
            let renderCount = 0;
            export default function Counter({ value }) {
                renderCount += 1;
                window.lastValue = value;
                const local = value * 2;
                return <b>{local}</b>;
            }
        "#});
        let shape =
            component::find_component(tree.tree.root_node(), &tree.source, &tree.path).unwrap();
        let flagged = detect_cross_cutting(&shape, &tree.source, &[]);
        assert!(flagged.contains("renderCount"));
        assert!(flagged.contains("window.lastValue"));
        assert_eq!(flagged.len(), 2);
    }

    #[test]
    fn local_mutation_is_not_flagged() {
        let tree = parse(indoc! {r#"
            export default function List({ items }) {
                let total = 0;
                total += items.length;
                return <ul data-total={total} />;
            }
        "#});
        let shape =
            component::find_component(tree.tree.root_node(), &tree.source, &tree.path).unwrap();
        let flagged = detect_cross_cutting(&shape, &tree.source, &[]);
        assert!(flagged.is_empty());
    }
}
