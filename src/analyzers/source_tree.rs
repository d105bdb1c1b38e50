use crate::core::errors::AnalysisError;
use crate::core::Dialect;
use std::path::{Path, PathBuf};
use tree_sitter::Parser;

/// A parsed component file: the tree-sitter tree plus the source text it
/// spans. Parsing itself is a consumed capability; nothing downstream
/// re-tokenizes the source.
#[derive(Clone)]
pub struct SourceTree {
    pub tree: tree_sitter::Tree,
    pub source: String,
    pub path: PathBuf,
    pub dialect: Dialect,
}

impl SourceTree {
    pub fn parse(
        content: &str,
        path: PathBuf,
        dialect: Dialect,
    ) -> Result<SourceTree, AnalysisError> {
        let mut parser = Parser::new();
        let language = match dialect {
            Dialect::JavaScript | Dialect::Jsx => tree_sitter_javascript::LANGUAGE.into(),
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        };
        parser
            .set_language(&language)
            .map_err(|e| AnalysisError::unparseable(&path, format!("grammar load failed: {e}")))?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| AnalysisError::unparseable(&path, "parser produced no tree"))?;

        Ok(SourceTree {
            tree,
            source: content.to_string(),
            path,
            dialect,
        })
    }

    pub fn parse_file_content(content: &str, path: &Path) -> Result<SourceTree, AnalysisError> {
        let dialect = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Dialect::from_extension)
            .ok_or_else(|| AnalysisError::unparseable(path, "unsupported file extension"))?;
        Self::parse(content, path.to_path_buf(), dialect)
    }
}

impl std::fmt::Debug for SourceTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceTree")
            .field("path", &self.path)
            .field("dialect", &self.dialect)
            .field("bytes", &self.source.len())
            .finish()
    }
}
