use crate::core::{Conflict, ConflictKind};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Batch-scoped claims on target identifiers and target paths.
///
/// Keeps `rename_map` injective across one run and target paths unique
/// unless explicitly overridden. Used only during the sequential planning
/// phase, so claim order — and therefore collision attribution — is the
/// stable input order.
#[derive(Debug, Default)]
pub struct NameRegistry {
    idents: BTreeMap<String, PathBuf>,
    paths: BTreeMap<PathBuf, PathBuf>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a target identifier for a source file. Reclaiming by the same
    /// file is idempotent; a second file claiming it is a conflict.
    pub fn claim_ident(&mut self, ident: &str, source: &Path) -> Result<(), Conflict> {
        match self.idents.get(ident) {
            Some(owner) if owner == source => Ok(()),
            Some(owner) => Err(Conflict {
                kind: ConflictKind::Identifier,
                value: ident.to_string(),
                first_claimed_by: owner.clone(),
            }),
            None => {
                self.idents.insert(ident.to_string(), source.to_path_buf());
                Ok(())
            }
        }
    }

    /// Claim a target path. `overridden` paths skip the uniqueness check per
    /// the explicit-override escape hatch.
    pub fn claim_path(
        &mut self,
        path: &Path,
        source: &Path,
        overridden: bool,
    ) -> Result<(), Conflict> {
        if overridden {
            self.paths.insert(path.to_path_buf(), source.to_path_buf());
            return Ok(());
        }
        match self.paths.get(path) {
            Some(owner) if owner == source => Ok(()),
            Some(owner) => Err(Conflict {
                kind: ConflictKind::TargetPath,
                value: path.display().to_string(),
                first_claimed_by: owner.clone(),
            }),
            None => {
                self.paths.insert(path.to_path_buf(), source.to_path_buf());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_reports_first_owner() {
        let mut registry = NameRegistry::new();
        registry
            .claim_ident("Button", Path::new("a/Button.jsx"))
            .unwrap();
        let conflict = registry
            .claim_ident("Button", Path::new("b/Button.jsx"))
            .unwrap_err();
        assert_eq!(conflict.kind, ConflictKind::Identifier);
        assert_eq!(conflict.first_claimed_by, PathBuf::from("a/Button.jsx"));
    }

    #[test]
    fn reclaim_by_same_source_is_idempotent() {
        let mut registry = NameRegistry::new();
        let src = Path::new("a/Button.jsx");
        registry.claim_ident("Button", src).unwrap();
        assert!(registry.claim_ident("Button", src).is_ok());
    }

    #[test]
    fn override_skips_path_uniqueness() {
        let mut registry = NameRegistry::new();
        let out = Path::new("out/Button.jsx");
        registry.claim_path(out, Path::new("a.jsx"), false).unwrap();
        assert!(registry.claim_path(out, Path::new("b.jsx"), true).is_ok());
        assert!(registry.claim_path(out, Path::new("c.jsx"), false).is_err());
    }
}
