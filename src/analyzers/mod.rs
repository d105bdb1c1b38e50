pub mod component;
pub mod effects;
pub mod imports;
pub mod props;
pub mod source_tree;

pub use component::ComponentShape;
pub use imports::ImportInventory;
pub use source_tree::SourceTree;

use crate::core::errors::AnalysisError;
use crate::core::ComponentDescriptor;

/// Extract the behavioral descriptor for the single exported component in a
/// parsed file.
///
/// Pure extraction: no I/O, and the tree is never mutated. The contract is
/// one exported function-like definition taking a flat attribute structure
/// and returning a markup tree; anything else is an `UnrecognizedShape`.
pub fn analyze(tree: &SourceTree) -> Result<ComponentDescriptor, AnalysisError> {
    let root = tree.tree.root_node();
    if root.has_error() {
        return Err(AnalysisError::unparseable(
            &tree.path,
            "syntax errors in source",
        ));
    }

    let inventory = imports::collect_imports(root, &tree.source);
    let shape = component::find_component(root, &tree.source, &tree.path)?;

    let (mut props_schema, unknown_props) = props::extract_props(&shape, &tree.source);
    let visibility_prop = props::detect_visibility_prop(&shape, &tree.source, &mut props_schema);

    let effect_constructs = effects::extract_effects(shape.body, &tree.source);
    let cross_cutting_effects = effects::detect_cross_cutting(&shape, &tree.source, &props_schema);
    let child_refs = imports::child_refs(shape.body, &tree.source, &inventory.imported_idents);

    Ok(ComponentDescriptor {
        name: shape.name.clone(),
        source_path: tree.path.clone(),
        props_schema,
        unknown_props,
        effect_constructs,
        style_refs: inventory.style_refs,
        child_refs,
        cross_cutting_effects,
        export_kind: shape.export_kind,
        visibility_prop,
    })
}
