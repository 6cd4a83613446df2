//! Filesystem source implementation.
//!
//! Provides [`FsSource`] for reading generator output from a local directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::source::{Source, SourceError, validate_name};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem source rooted at a generator output directory.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
/// use navtree_source::{FsSource, Source};
///
/// let source = FsSource::new(PathBuf::from("html"));
/// assert!(source.exists("navtreedata.js"));
/// ```
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Create a new filesystem source.
    ///
    /// # Arguments
    ///
    /// * `root` - Directory containing the generated scripts
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Root directory of this source.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, SourceError> {
        validate_name(name).map_err(|e| e.with_backend(BACKEND))?;
        Ok(self.root.join(name))
    }
}

impl Source for FsSource {
    fn read(&self, name: &str) -> Result<String, SourceError> {
        let path = self.resolve(name)?;
        let content = fs::read_to_string(&path)
            .map_err(|e| SourceError::io(e, Some(path.clone())).with_backend(BACKEND))?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "Read generated script");
        Ok(content)
    }

    fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_ok_and(|path| path.is_file())
    }
}
