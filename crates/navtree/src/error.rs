//! Navigation index error types.

use navtree_source::SourceError;

/// Error returned by navigation loading and lookups.
///
/// Every variant is recoverable at the call site: a failed lookup or fetch
/// never invalidates an already-loaded [`NavigationIndex`](crate::NavigationIndex).
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// Generated tree data violates the node invariants.
    #[error("Malformed navigation tree at {path}: {reason}")]
    MalformedTree {
        /// Location in the generated data (e.g., `NAVTREE[0][2][1]`).
        path: String,
        /// What was wrong with it.
        reason: String,
    },
    /// The same url appears twice in the flat index.
    #[error("Duplicate navigation index entry {url:?} at positions {first} and {second}")]
    DuplicateEntry {
        /// The repeated url.
        url: String,
        /// Position of the first occurrence.
        first: usize,
        /// Position of the repeated occurrence.
        second: usize,
    },
    /// Lookup of a url that is not in the flat index.
    #[error("URL not in navigation index: {0}")]
    UnknownUrl(String),
    /// Fetching deferred data (lazy children or an index page) failed.
    #[error("Failed to load {fragment}: {source}")]
    LazyLoadFailure {
        /// Fragment identifier or index page name.
        fragment: String,
        /// Underlying failure.
        #[source]
        source: Box<NavError>,
    },
    /// A required `var NAME = ...;` statement is absent from a script.
    #[error("Script variable not found: {0}")]
    MissingVariable(String),
    /// A script variable's literal could not be decoded.
    #[error("Invalid literal for script variable {name}: {source}")]
    Json {
        /// Variable name.
        name: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// Reading generated data failed.
    #[error("Failed to read navigation data: {0}")]
    Source(#[from] SourceError),
}

impl NavError {
    /// Shorthand for [`NavError::MalformedTree`].
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTree {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Wrap this error as a failed deferred load of `fragment`.
    pub(crate) fn into_lazy_failure(self, fragment: impl Into<String>) -> Self {
        Self::LazyLoadFailure {
            fragment: fragment.into(),
            source: Box::new(self),
        }
    }
}
