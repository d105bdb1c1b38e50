use crate::core::{AssertionKind, TestSpec};
use std::fmt::Write;

/// Code-emission seam for the target project's test dialect.
///
/// The scaffolder hands an ordered `TestSpec` to an emitter; the emitter
/// owns every line of dialect text. Additional target dialects plug in as
/// new implementations, not core changes.
pub trait TestEmitter {
    fn emit_render_call(&self, component: &str, props: &[(String, String)]) -> String;
    fn emit_assertion_equal(&self, actual: &str, expected: &str) -> String;
    fn emit_event_simulation(&self, event: &str, target: &str) -> String;

    /// Render the whole spec into one test file, importing the component
    /// from `import_specifier`.
    fn emit_spec(&self, spec: &TestSpec, import_specifier: &str) -> String;
}

/// `@testing-library/react` + jest emitter, the dialect the migration
/// namespace's `__tests__/` directory is built for.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestingLibraryEmitter;

impl TestingLibraryEmitter {
    pub fn new() -> Self {
        Self
    }

    fn base_props(spec: &TestSpec) -> Vec<(String, String)> {
        spec.assertions
            .iter()
            .find_map(|a| match &a.kind {
                AssertionKind::RendersCleanly { props } => Some(props.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Base props with one binding replaced (or appended).
    fn with_override(
        base: &[(String, String)],
        name: &str,
        value: &str,
    ) -> Vec<(String, String)> {
        let mut props: Vec<(String, String)> = base
            .iter()
            .filter(|(n, _)| n != name)
            .cloned()
            .collect();
        props.push((name.to_string(), value.to_string()));
        props
    }

    fn without(base: &[(String, String)], name: &str) -> Vec<(String, String)> {
        base.iter().filter(|(n, _)| n != name).cloned().collect()
    }
}

impl TestEmitter for TestingLibraryEmitter {
    fn emit_render_call(&self, component: &str, props: &[(String, String)]) -> String {
        let attrs: String = props
            .iter()
            .map(|(name, value)| format!(" {name}={{{value}}}"))
            .collect();
        format!("const {{ container }} = render(<{component}{attrs} />);")
    }

    fn emit_assertion_equal(&self, actual: &str, expected: &str) -> String {
        format!("expect({actual}).toEqual({expected});")
    }

    fn emit_event_simulation(&self, event: &str, target: &str) -> String {
        format!("fireEvent.{event}({target});")
    }

    fn emit_spec(&self, spec: &TestSpec, import_specifier: &str) -> String {
        let component = &spec.component;
        let base = Self::base_props(spec);

        let mut out = String::new();
        out.push_str("import React from 'react';\n");
        out.push_str("import { render, fireEvent } from '@testing-library/react';\n");
        if spec.default_export {
            let _ = writeln!(out, "import {component} from '{import_specifier}';");
        } else {
            let _ = writeln!(out, "import {{ {component} }} from '{import_specifier}';");
        }
        out.push('\n');
        let _ = writeln!(out, "describe('{component}', () => {{");

        for (index, assertion) in spec.assertions.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "  it('{}', () => {{", assertion.name);
            match &assertion.kind {
                AssertionKind::RendersCleanly { props } => {
                    let _ = writeln!(out, "    {}", self.emit_render_call(component, props));
                    let _ = writeln!(out, "    expect(container.firstChild).not.toBeNull();");
                }
                AssertionKind::DefaultApplied { prop, expected } => {
                    let props = Self::without(&base, prop);
                    let _ = writeln!(out, "    {}", self.emit_render_call(component, &props));
                    if expected.starts_with('"') || expected.starts_with('\'') {
                        let _ = writeln!(
                            out,
                            "    expect(container.innerHTML).toContain({expected});"
                        );
                    } else {
                        let _ = writeln!(
                            out,
                            "    // default {prop} = {expected} is applied when omitted"
                        );
                        let _ = writeln!(out, "    expect(container.firstChild).not.toBeNull();");
                    }
                }
                AssertionKind::HandlerInvoked { prop, event } => {
                    let _ = writeln!(out, "    const {prop} = jest.fn();");
                    let props = Self::with_override(&base, prop, prop);
                    let _ = writeln!(out, "    {}", self.emit_render_call(component, &props));
                    let _ = writeln!(
                        out,
                        "    {}",
                        self.emit_event_simulation(event, "container.firstChild")
                    );
                    let _ = writeln!(
                        out,
                        "    {}",
                        self.emit_assertion_equal(&format!("{prop}.mock.calls.length"), "1")
                    );
                }
                AssertionKind::RendersWhenTrue { prop } => {
                    let props = Self::with_override(&base, prop, "true");
                    let _ = writeln!(out, "    {}", self.emit_render_call(component, &props));
                    let _ = writeln!(out, "    expect(container.firstChild).not.toBeNull();");
                }
                AssertionKind::RendersNothingWhenFalse { prop } => {
                    let props = Self::with_override(&base, prop, "false");
                    let _ = writeln!(out, "    {}", self.emit_render_call(component, &props));
                    let _ = writeln!(
                        out,
                        "    {}",
                        self.emit_assertion_equal("container.firstChild", "null")
                    );
                }
            }
            out.push_str("  });\n");
        }

        out.push_str("});\n");
        out
    }
}
