pub mod emitter;

pub use emitter::{TestEmitter, TestingLibraryEmitter};

use crate::core::{AssertionKind, ComponentDescriptor, PropHint, TestAssertion, TestSpec};

/// Synthesize the test specification for one component.
///
/// Input is the descriptor alone — test semantics depend on behavior, not on
/// where the migration plan relocates the file. Generation order is fixed so
/// repeated runs produce identical specs:
///
/// 1. one smoke assertion with required props populated,
/// 2. one assertion per defaulted prop,
/// 3. one assertion per invocation-handler prop,
/// 4. a true/false pair when a visibility-gate prop exists.
pub fn scaffold(descriptor: &ComponentDescriptor) -> TestSpec {
    let mut assertions = Vec::new();

    assertions.push(TestAssertion {
        name: "renders with required props".to_string(),
        kind: AssertionKind::RendersCleanly {
            props: required_placeholders(descriptor),
        },
    });

    for prop in descriptor.defaulted_props() {
        let expected = prop.default_expr.clone().unwrap_or_default();
        assertions.push(TestAssertion {
            name: format!("applies default {} when omitted", prop.name),
            kind: AssertionKind::DefaultApplied {
                prop: prop.name.clone(),
                expected,
            },
        });
    }

    for prop in descriptor.handler_props() {
        assertions.push(TestAssertion {
            name: format!("invokes {} exactly once", prop.name),
            kind: AssertionKind::HandlerInvoked {
                prop: prop.name.clone(),
                event: event_for_handler(&prop.name),
            },
        });
    }

    if let Some(gate) = &descriptor.visibility_prop {
        assertions.push(TestAssertion {
            name: format!("renders content when {gate} is true"),
            kind: AssertionKind::RendersWhenTrue { prop: gate.clone() },
        });
        assertions.push(TestAssertion {
            name: format!("renders nothing when {gate} is false"),
            kind: AssertionKind::RendersNothingWhenFalse { prop: gate.clone() },
        });
    }

    TestSpec {
        component: descriptor.name.clone(),
        default_export: descriptor.export_kind == crate::core::ExportKind::Default,
        assertions,
    }
}

/// Type-appropriate placeholder expressions for the required props, in
/// schema order.
fn required_placeholders(descriptor: &ComponentDescriptor) -> Vec<(String, String)> {
    descriptor
        .required_props()
        .map(|prop| (prop.name.clone(), placeholder_for(prop.hint, &prop.name)))
        .collect()
}

fn placeholder_for(hint: PropHint, name: &str) -> String {
    match hint {
        PropHint::Handler => "() => {}".to_string(),
        PropHint::Bool | PropHint::VisibilityGate => "true".to_string(),
        PropHint::Number => "1".to_string(),
        PropHint::Text | PropHint::Unknown => format!("\"{name} value\""),
    }
}

/// `onClick` -> `click`, `onMouseEnter` -> `mouseEnter`.
fn event_for_handler(prop: &str) -> String {
    let rest = prop.strip_prefix("on").unwrap_or(prop);
    let mut chars = rest.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_lowercase(), chars.as_str()),
        None => "click".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExportKind, PropSpec};
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn descriptor(props: Vec<PropSpec>, visibility: Option<&str>) -> ComponentDescriptor {
        ComponentDescriptor {
            name: "Sample".to_string(),
            source_path: PathBuf::from("Sample.jsx"),
            props_schema: props,
            unknown_props: BTreeSet::new(),
            effect_constructs: vec![],
            style_refs: vec![],
            child_refs: BTreeSet::new(),
            cross_cutting_effects: BTreeSet::new(),
            export_kind: ExportKind::Default,
            visibility_prop: visibility.map(String::from),
        }
    }

    #[test]
    fn assertion_count_is_one_plus_defaults_plus_handlers() {
        // 3 defaulted props + 1 handler: 1 smoke + 3 + 1 = 5
        let spec = scaffold(&descriptor(
            vec![
                PropSpec::defaulted("variant", "\"primary\"", PropHint::Text),
                PropSpec::defaulted("size", "\"medium\"", PropHint::Text),
                PropSpec::defaulted("disabled", "false", PropHint::Bool),
                PropSpec::required("onClick", PropHint::Handler),
            ],
            None,
        ));
        assert_eq!(spec.assertions.len(), 5);
    }

    #[test]
    fn visibility_gate_adds_exactly_two_assertions() {
        let with_gate = scaffold(&descriptor(
            vec![PropSpec::required("open", PropHint::VisibilityGate)],
            Some("open"),
        ));
        let without_gate = scaffold(&descriptor(
            vec![PropSpec::required("open", PropHint::Bool)],
            None,
        ));
        assert_eq!(with_gate.assertions.len(), without_gate.assertions.len() + 2);
    }

    #[test]
    fn generation_order_is_fixed() {
        let spec = scaffold(&descriptor(
            vec![
                PropSpec::required("label", PropHint::Text),
                PropSpec::defaulted("tone", "\"info\"", PropHint::Text),
                PropSpec::required("onDismiss", PropHint::Handler),
                PropSpec::required("visible", PropHint::VisibilityGate),
            ],
            Some("visible"),
        ));
        let kinds: Vec<&str> = spec
            .assertions
            .iter()
            .map(|a| match &a.kind {
                AssertionKind::RendersCleanly { .. } => "smoke",
                AssertionKind::DefaultApplied { .. } => "default",
                AssertionKind::HandlerInvoked { .. } => "handler",
                AssertionKind::RendersWhenTrue { .. } => "true",
                AssertionKind::RendersNothingWhenFalse { .. } => "false",
            })
            .collect();
        assert_eq!(kinds, vec!["smoke", "default", "handler", "true", "false"]);
    }

    #[test]
    fn smoke_placeholders_follow_schema_order_and_hints() {
        let spec = scaffold(&descriptor(
            vec![
                PropSpec::required("onSave", PropHint::Handler),
                PropSpec::required("count", PropHint::Number),
                PropSpec::required("label", PropHint::Text),
            ],
            None,
        ));
        match &spec.assertions[0].kind {
            AssertionKind::RendersCleanly { props } => {
                assert_eq!(
                    props,
                    &vec![
                        ("onSave".to_string(), "() => {}".to_string()),
                        ("count".to_string(), "1".to_string()),
                        ("label".to_string(), "\"label value\"".to_string()),
                    ]
                );
            }
            other => panic!("expected smoke assertion, got {other:?}"),
        }
    }

    #[test]
    fn handler_event_names_are_camel_cased() {
        assert_eq!(event_for_handler("onClick"), "click");
        assert_eq!(event_for_handler("onMouseEnter"), "mouseEnter");
        assert_eq!(event_for_handler("onValueChange"), "valueChange");
    }
}
