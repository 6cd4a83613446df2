//! Mock source implementation for testing.
//!
//! Provides [`MockSource`] for unit testing without filesystem access.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::source::{ErrorStatus, Source, SourceError, SourceErrorKind, validate_name};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock source for testing.
///
/// Stores file contents in memory. Use the builder methods to configure the
/// mock with test data.
///
/// # Example
///
/// ```ignore
/// use navtree_source::{MockSource, Source};
///
/// let source = MockSource::new()
///     .with_file("navtreedata.js", "var NAVTREE = [];")
///     .with_failure("broken.js", SourceErrorKind::Unavailable);
///
/// let content = source.read("navtreedata.js").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockSource {
    files: RwLock<HashMap<String, String>>,
    failures: RwLock<HashMap<String, SourceErrorKind>>,
    reads: AtomicUsize,
}

impl MockSource {
    /// Create a new empty mock source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given name and content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(name.into(), content.into());
        self
    }

    /// Make reads of `name` fail with the given error kind.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, name: impl Into<String>, kind: SourceErrorKind) -> Self {
        self.failures.write().unwrap().insert(name.into(), kind);
        self
    }

    /// Number of `read` calls made so far, successful or not.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

impl Source for MockSource {
    fn read(&self, name: &str) -> Result<String, SourceError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        validate_name(name).map_err(|e| e.with_backend(BACKEND))?;

        if let Some(kind) = self.failures.read().unwrap().get(name) {
            let status = match kind {
                SourceErrorKind::Unavailable => ErrorStatus::Persistent,
                SourceErrorKind::Timeout => ErrorStatus::Temporary,
                _ => ErrorStatus::Permanent,
            };
            return Err(SourceError::new(*kind)
                .with_status(status)
                .with_backend(BACKEND)
                .with_path(name));
        }

        self.files
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::not_found(name).with_backend(BACKEND))
    }

    fn exists(&self, name: &str) -> bool {
        self.files.read().unwrap().contains_key(name)
    }
}
