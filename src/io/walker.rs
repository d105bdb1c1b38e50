use crate::core::Dialect;
use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Candidate component files plus the source test files set aside before
/// analysis.
#[derive(Debug, Default)]
pub struct DiscoveredFiles {
    pub components: Vec<PathBuf>,
    pub source_tests: Vec<PathBuf>,
}

pub struct ComponentWalker {
    root: PathBuf,
    ignore_patterns: Vec<String>,
}

impl ComponentWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ignore_patterns: vec![],
        }
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn walk(&self) -> Result<DiscoveredFiles> {
        let mut discovered = DiscoveredFiles::default();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || !self.should_process(path) {
                continue;
            }
            if is_source_test_file(path) {
                discovered.source_tests.push(path.to_path_buf());
            } else {
                discovered.components.push(path.to_path_buf());
            }
        }

        Ok(discovered)
    }

    fn should_process(&self, path: &Path) -> bool {
        let Some(ext) = path.extension() else {
            return false;
        };
        if Dialect::from_extension(&ext.to_string_lossy()).is_none() {
            return false;
        }

        let path_str = path.to_string_lossy();
        for pattern in &self.ignore_patterns {
            if glob::Pattern::new(pattern)
                .map(|p| p.matches(&path_str))
                .unwrap_or(false)
            {
                return false;
            }
        }
        true
    }
}

/// Test files in the source project are not migration candidates; the
/// scaffolder regenerates tests in the target convention instead.
pub fn is_source_test_file(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if name.contains(".test.") || name.contains(".spec.") {
        return true;
    }
    path.components()
        .any(|c| c.as_os_str() == "__tests__" || c.as_os_str() == "__mocks__")
}
