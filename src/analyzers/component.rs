use crate::core::errors::AnalysisError;
use crate::core::ExportKind;
use std::collections::HashMap;
use std::path::Path;
use tree_sitter::Node;

/// A candidate definition found under an export.
#[derive(Clone, Copy, Debug)]
struct Candidate<'t> {
    name_node: Node<'t>,
    callable: Node<'t>,
    props_param: Node<'t>,
    body: Node<'t>,
    export_kind: ExportKind,
}

/// The located component definition: the callable, its props parameter, and
/// how it leaves the module.
#[derive(Clone, Debug)]
pub struct ComponentShape<'t> {
    pub name: String,
    pub name_node: Node<'t>,
    pub callable: Node<'t>,
    /// The props pattern: an `object_pattern` or a bare identifier.
    pub props_param: Node<'t>,
    pub body: Node<'t>,
    pub export_kind: ExportKind,
}

/// Locate the single exported "callable over a flat attribute structure
/// returning a markup tree" definition.
pub fn find_component<'t>(
    root: Node<'t>,
    source: &str,
    path: &Path,
) -> Result<ComponentShape<'t>, AnalysisError> {
    let declarations = top_level_declarations(root, source);
    let mut candidates: Vec<Candidate<'t>> = Vec::new();

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() != "export_statement" {
            continue;
        }
        let export_kind = if has_default_keyword(child) {
            ExportKind::Default
        } else {
            ExportKind::Named
        };
        collect_exported_candidates(child, source, &declarations, export_kind, &mut candidates);
    }

    // A component both declared via `export function` and re-exported by name
    // would appear twice; dedupe on the callable's position.
    candidates.sort_by_key(|c| c.callable.start_byte());
    candidates.dedup_by_key(|c| c.callable.start_byte());

    match candidates.len() {
        0 => Err(AnalysisError::unrecognized(
            path,
            "no exported component definition",
        )),
        1 => {
            let c = candidates[0];
            Ok(ComponentShape {
                name: node_text(c.name_node, source).to_string(),
                name_node: c.name_node,
                callable: c.callable,
                props_param: c.props_param,
                body: c.body,
                export_kind: c.export_kind,
            })
        }
        n => Err(AnalysisError::unrecognized(
            path,
            format!("{n} exported component definitions, expected exactly one"),
        )),
    }
}

fn collect_exported_candidates<'t>(
    export: Node<'t>,
    source: &str,
    declarations: &HashMap<String, Node<'t>>,
    export_kind: ExportKind,
    candidates: &mut Vec<Candidate<'t>>,
) {
    if let Some(decl) = export.child_by_field_name("declaration") {
        match decl.kind() {
            "function_declaration" | "generator_function_declaration" => {
                if let Some(shape) = shape_from_function(decl, export_kind, source) {
                    candidates.push(shape);
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                let mut cursor = decl.walk();
                for declarator in decl.named_children(&mut cursor) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    if let Some(shape) = shape_from_declarator(declarator, export_kind, source) {
                        candidates.push(shape);
                    }
                }
            }
            _ => {}
        }
        return;
    }

    // `export default <expr>;`
    if let Some(value) = export.child_by_field_name("value") {
        if value.kind() == "identifier" {
            let name = node_text(value, source);
            if let Some(decl) = declarations.get(name) {
                match decl.kind() {
                    "function_declaration" => {
                        if let Some(mut shape) = shape_from_function(*decl, export_kind, source) {
                            shape.export_kind = export_kind;
                            candidates.push(shape);
                        }
                    }
                    "variable_declarator" => {
                        if let Some(mut shape) = shape_from_declarator(*decl, export_kind, source) {
                            shape.export_kind = export_kind;
                            candidates.push(shape);
                        }
                    }
                    _ => {}
                }
            }
        }
        return;
    }

    // `export { Foo, Bar };`
    let mut cursor = export.walk();
    for child in export.named_children(&mut cursor) {
        if child.kind() != "export_clause" {
            continue;
        }
        let mut spec_cursor = child.walk();
        for spec in child.named_children(&mut spec_cursor) {
            if spec.kind() != "export_specifier" {
                continue;
            }
            let Some(name_node) = spec.child_by_field_name("name") else {
                continue;
            };
            let name = node_text(name_node, source);
            if let Some(decl) = declarations.get(name) {
                let shape = match decl.kind() {
                    "function_declaration" => shape_from_function(*decl, export_kind, source),
                    "variable_declarator" => shape_from_declarator(*decl, export_kind, source),
                    _ => None,
                };
                if let Some(shape) = shape {
                    candidates.push(shape);
                }
            }
        }
    }
}

fn has_default_keyword(export: Node<'_>) -> bool {
    let mut cursor = export.walk();
    let result = export.children(&mut cursor).any(|c| c.kind() == "default");
    result
}

/// Map top-level names to their declaration sites so `export default Foo;`
/// and `export { Foo };` can be resolved.
fn top_level_declarations<'t>(root: Node<'t>, source: &str) -> HashMap<String, Node<'t>> {
    let mut declarations = HashMap::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        register_declaration(child, source, &mut declarations);
        if child.kind() == "export_statement" {
            if let Some(decl) = child.child_by_field_name("declaration") {
                register_declaration(decl, source, &mut declarations);
            }
        }
    }
    declarations
}

fn register_declaration<'t>(
    node: Node<'t>,
    source: &str,
    declarations: &mut HashMap<String, Node<'t>>,
) {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            if let Some(name) = node.child_by_field_name("name") {
                declarations.insert(node_text(name, source).to_string(), node);
            }
        }
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = node.walk();
            for declarator in node.named_children(&mut cursor) {
                if declarator.kind() == "variable_declarator" {
                    if let Some(name) = declarator.child_by_field_name("name") {
                        if name.kind() == "identifier" {
                            declarations.insert(node_text(name, source).to_string(), declarator);
                        }
                    }
                }
            }
        }
        _ => {}
    }
}

fn shape_from_function<'t>(
    func: Node<'t>,
    export_kind: ExportKind,
    _source: &str,
) -> Option<Candidate<'t>> {
    let name_node = func.child_by_field_name("name")?;
    let props_param = props_parameter(func)?;
    let body = func.child_by_field_name("body")?;
    if !contains_markup(body) {
        return None;
    }
    Some(Candidate {
        name_node,
        callable: func,
        props_param,
        body,
        export_kind,
    })
}

fn shape_from_declarator<'t>(
    declarator: Node<'t>,
    export_kind: ExportKind,
    source: &str,
) -> Option<Candidate<'t>> {
    let name_node = declarator.child_by_field_name("name")?;
    if name_node.kind() != "identifier" {
        return None;
    }
    let value = declarator.child_by_field_name("value")?;
    let callable = unwrap_component_wrapper(value, source)?;
    let props_param = props_parameter(callable)?;
    let body = callable.child_by_field_name("body")?;
    if !contains_markup(body) {
        return None;
    }
    Some(Candidate {
        name_node,
        callable,
        props_param,
        body,
        export_kind,
    })
}

/// Look through `React.forwardRef(...)` / `React.memo(...)` wrappers to the
/// underlying callable.
fn unwrap_component_wrapper<'t>(value: Node<'t>, source: &str) -> Option<Node<'t>> {
    match value.kind() {
        "arrow_function" | "function_expression" | "function" => Some(value),
        "call_expression" => {
            let callee = value.child_by_field_name("function")?;
            let callee_text = node_text(callee, source);
            if !matches!(
                callee_text,
                "React.forwardRef" | "forwardRef" | "React.memo" | "memo"
            ) {
                return None;
            }
            let args = value.child_by_field_name("arguments")?;
            let mut cursor = args.walk();
            let result = args
                .named_children(&mut cursor)
                .find_map(|arg| unwrap_component_wrapper(arg, source));
            result
        }
        "parenthesized_expression" => {
            let mut cursor = value.walk();
            let result = value
                .named_children(&mut cursor)
                .find_map(|inner| unwrap_component_wrapper(inner, source));
            result
        }
        _ => None,
    }
}

/// First parameter of the callable, unwrapped to its pattern. Accepts a
/// destructured object or a bare identifier; a trailing `ref` parameter
/// (forwardRef plumbing) is ignored.
fn props_parameter<'t>(callable: Node<'t>) -> Option<Node<'t>> {
    if let Some(single) = callable.child_by_field_name("parameter") {
        return unwrap_parameter(single);
    }
    let params = callable.child_by_field_name("parameters")?;
    let mut cursor = params.walk();
    let result = params
        .named_children(&mut cursor)
        .next()
        .and_then(unwrap_parameter);
    result
}

fn unwrap_parameter(param: Node<'_>) -> Option<Node<'_>> {
    match param.kind() {
        "object_pattern" | "identifier" => Some(param),
        // TS grammars wrap patterns in (required|optional)_parameter
        "required_parameter" | "optional_parameter" => {
            let pattern = param.child_by_field_name("pattern")?;
            unwrap_parameter(pattern)
        }
        _ => None,
    }
}

/// True when the subtree contains a markup-tree construction.
pub fn contains_markup(node: Node<'_>) -> bool {
    match node.kind() {
        "jsx_element" | "jsx_self_closing_element" | "jsx_fragment" => return true,
        _ => {}
    }
    let mut cursor = node.walk();
    let result = node.children(&mut cursor).any(contains_markup);
    result
}

pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}
