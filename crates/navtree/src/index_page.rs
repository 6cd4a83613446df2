//! Url-to-tree-path index pages.
//!
//! Each `navtreeindex<N>` script holds one object mapping urls to the child
//! positions leading to them from the root:
//!
//! ```text
//! var NAVTREEINDEX0 =
//! {
//! "annotated.html":[0,1,0],
//! "index.html#intro":[0,0,0]
//! };
//! ```

use std::collections::HashMap;

use serde_json::Value;

use crate::error::NavError;
use crate::node::ValidationMode;

/// Script variable name of index page `number` for a file prefix.
///
/// The generator upper-cases the file prefix: `navtreeindex` page 3 is
/// stored as `var NAVTREEINDEX3` in `navtreeindex3.js`.
#[must_use]
pub fn index_page_variable(prefix: &str, number: usize) -> String {
    format!("{}{number}", prefix.to_uppercase())
}

/// One decoded index page.
#[derive(Debug, Default)]
pub struct IndexPage {
    number: usize,
    paths: HashMap<String, Vec<usize>>,
}

impl IndexPage {
    /// Decode an index page object.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::MalformedTree`] if `value` is not an object, or in
    /// strict mode if a path is not an array of non-negative integers. In
    /// lenient mode such entries are logged and skipped.
    pub fn from_value(number: usize, value: &Value, mode: ValidationMode) -> Result<Self, NavError> {
        let location = format!("index page {number}");
        let Value::Object(map) = value else {
            return Err(NavError::malformed(location, "expected an object of url paths"));
        };

        let mut paths = HashMap::with_capacity(map.len());
        for (url, raw) in map {
            match decode_path(raw) {
                Some(path) => {
                    paths.insert(url.clone(), path);
                }
                None => {
                    let err = NavError::malformed(
                        format!("{location}[{url:?}]"),
                        "tree path must be an array of child positions",
                    );
                    if mode.is_strict() {
                        return Err(err);
                    }
                    tracing::warn!(error = %err, "Skipping malformed index page entry");
                }
            }
        }

        Ok(Self { number, paths })
    }

    /// Page number.
    #[must_use]
    pub fn number(&self) -> usize {
        self.number
    }

    /// Child positions from the root to `url`, if this page stores it.
    #[must_use]
    pub fn tree_path(&self, url: &str) -> Option<&[usize]> {
        self.paths.get(url).map(Vec::as_slice)
    }

    /// Number of urls on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the page stores no urls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn decode_path(value: &Value) -> Option<Vec<usize>> {
    value
        .as_array()?
        .iter()
        .map(|step| step.as_u64().and_then(|n| usize::try_from(n).ok()))
        .collect()
}
