use super::component::node_text;
use std::collections::BTreeSet;
use tree_sitter::Node;

const STYLE_EXTENSIONS: &[&str] = &[".css", ".scss", ".sass", ".less"];

/// What the file pulls in: bound identifiers plus stylesheet references in
/// source order.
#[derive(Clone, Debug, Default)]
pub struct ImportInventory {
    pub imported_idents: BTreeSet<String>,
    pub style_refs: Vec<String>,
}

pub fn collect_imports(root: Node<'_>, source: &str) -> ImportInventory {
    let mut inventory = ImportInventory::default();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() != "import_statement" {
            continue;
        }
        if let Some(source_node) = child.child_by_field_name("source") {
            let specifier = trim_quotes(node_text(source_node, source));
            if STYLE_EXTENSIONS.iter().any(|ext| specifier.ends_with(ext)) {
                inventory.style_refs.push(specifier.to_string());
            }
        }
        collect_bound_identifiers(child, source, &mut inventory.imported_idents);
    }
    inventory
}

fn collect_bound_identifiers(import: Node<'_>, source: &str, out: &mut BTreeSet<String>) {
    let mut cursor = import.walk();
    for child in import.named_children(&mut cursor) {
        if child.kind() != "import_clause" {
            continue;
        }
        let mut clause_cursor = child.walk();
        for clause_child in child.named_children(&mut clause_cursor) {
            match clause_child.kind() {
                // default import
                "identifier" => {
                    out.insert(node_text(clause_child, source).to_string());
                }
                "namespace_import" => {
                    if let Some(ident) = last_identifier(clause_child) {
                        out.insert(node_text(ident, source).to_string());
                    }
                }
                "named_imports" => {
                    let mut spec_cursor = clause_child.walk();
                    for spec in clause_child.named_children(&mut spec_cursor) {
                        if spec.kind() != "import_specifier" {
                            continue;
                        }
                        // `import { A as B }` binds B locally
                        let bound = spec
                            .child_by_field_name("alias")
                            .or_else(|| spec.child_by_field_name("name"));
                        if let Some(bound) = bound {
                            out.insert(node_text(bound, source).to_string());
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

fn last_identifier(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|n| n.kind() == "identifier")
        .last()
}

/// Imported identifiers used as nested markup constructors. Primitive
/// elements (lowercase tags) never qualify.
pub fn child_refs(body: Node<'_>, source: &str, imported: &BTreeSet<String>) -> BTreeSet<String> {
    let mut refs = BTreeSet::new();
    visit_node_for_child_refs(body, source, imported, &mut refs);
    refs
}

fn visit_node_for_child_refs(
    node: Node<'_>,
    source: &str,
    imported: &BTreeSet<String>,
    refs: &mut BTreeSet<String>,
) {
    match node.kind() {
        "jsx_opening_element" | "jsx_self_closing_element" => {
            if let Some(name) = node.child_by_field_name("name") {
                let full = node_text(name, source);
                // `Menu.Item` resolves through the imported `Menu` binding
                let base = full.split('.').next().unwrap_or(full);
                if base.chars().next().is_some_and(|c| c.is_ascii_uppercase())
                    && imported.contains(base)
                {
                    refs.insert(base.to_string());
                }
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit_node_for_child_refs(child, source, imported, refs);
    }
}

pub fn trim_quotes(specifier: &str) -> &str {
    specifier.trim_matches(|c| c == '"' || c == '\'' || c == '`')
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

    #[test]
    fn collects_style_refs_in_order() {
        let tree = parse(indoc! {r#"
            import './base.css';
            import styles from './Card.module.scss';
            import { Icon } from '../icons/Icon';
            export default function Card({ title }) {
                return <div><Icon name={title} /></div>;
            }
        "#});
        let inventory = collect_imports(tree.tree.root_node(), &tree.source);
        assert_eq!(inventory.style_refs, vec!["./base.css", "./Card.module.scss"]);
        assert!(inventory.imported_idents.contains("Icon"));
        assert!(inventory.imported_idents.contains("styles"));
    }

    #[test]
    fn child_refs_exclude_primitives_and_locals() {
        let tree = parse(indoc! {r#"
            import { Avatar } from './Avatar';
            import Badge from './Badge';
            export default function UserRow({ user }) {
                const Local = () => <i />;
                return (
                    <div>
                        <Avatar src={user.avatar} />
                        <Badge label={user.role} />
                        <Local />
                        <span>{user.name}</span>
                    </div>
                );
            }
        "#});
        let shape =
            component::find_component(tree.tree.root_node(), &tree.source, &tree.path).unwrap();
        let inventory = collect_imports(tree.tree.root_node(), &tree.source);
        let refs = child_refs(shape.body, &tree.source, &inventory.imported_idents);
        let refs: Vec<_> = refs.into_iter().collect();
        assert_eq!(refs, vec!["Avatar", "Badge"]);
    }

    #[test]
    fn aliased_named_import_binds_alias() {
        let tree = parse("import { Button as BaseButton } from './Button';\n");
        let inventory = collect_imports(tree.tree.root_node(), &tree.source);
        assert!(inventory.imported_idents.contains("BaseButton"));
        assert!(!inventory.imported_idents.contains("Button"));
    }
}
