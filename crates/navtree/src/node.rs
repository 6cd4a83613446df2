//! Navigation tree nodes.
//!
//! The generator encodes each node as a `[label, url, children]` tuple where
//! `children` is a nested array, `null` for a leaf, or a string naming a
//! fragment script that holds the children. [`parse_nodes`] turns that
//! encoding into [`NavNode`] values with an explicit [`Children`] variant.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::NavError;

/// Label of the synthetic root node.
pub const ROOT_LABEL: &str = "root";

/// Url of the synthetic root node (the root document).
pub const ROOT_URL: &str = ".html";

/// How to treat generator output that violates the data invariants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Log the defect and leave out the offending subtree or link.
    #[default]
    Lenient,
    /// Fail on the first defect.
    Strict,
}

impl ValidationMode {
    /// Pick the mode matching a `strict` flag.
    #[must_use]
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Lenient }
    }

    /// Whether defects are fatal.
    #[must_use]
    pub fn is_strict(self) -> bool {
        self == Self::Strict
    }
}

/// Identifier of a lazily loaded children fragment.
///
/// The generator uses the same string as the fragment's file stem and as
/// the variable name inside it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FragmentId(String);

impl FragmentId {
    /// Wrap a fragment identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the fragment script (e.g., `annotated_dup.js`).
    #[must_use]
    pub fn script_name(&self, extension: &str) -> String {
        format!("{}.{extension}", self.0)
    }
}

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Children of a [`NavNode`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Children {
    /// Children embedded in the tree (empty for a leaf).
    Eager(Vec<NavNode>),
    /// Children stored in a separate fragment, fetched on demand.
    Lazy(FragmentId),
}

/// Outcome of asking a node for its children.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Children are available, in generator order.
    Ready(&'a [NavNode]),
    /// Children must be fetched from this fragment before display.
    Deferred(&'a FragmentId),
}

/// One entry in the navigation tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavNode {
    /// Display text.
    pub label: String,
    /// Relative document path, optionally with a `#fragment` anchor.
    pub url: String,
    /// Embedded or deferred children.
    pub children: Children,
}

impl NavNode {
    /// Create a node.
    #[must_use]
    pub fn new(label: impl Into<String>, url: impl Into<String>, children: Children) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            children,
        }
    }

    /// Create a node without children.
    #[must_use]
    pub fn leaf(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(label, url, Children::Eager(Vec::new()))
    }

    /// Create the synthetic root above the given top-level nodes.
    #[must_use]
    pub fn root(children: Vec<NavNode>) -> Self {
        Self::new(ROOT_LABEL, ROOT_URL, Children::Eager(children))
    }

    /// Whether children live in a separate fragment.
    #[must_use]
    pub fn has_lazy_children(&self) -> bool {
        matches!(self.children, Children::Lazy(_))
    }

    /// Embedded children, or the fragment that must be fetched first.
    #[must_use]
    pub fn resolve_children(&self) -> Resolution<'_> {
        match &self.children {
            Children::Eager(children) => Resolution::Ready(children),
            Children::Lazy(id) => Resolution::Deferred(id),
        }
    }

    /// Embedded children; empty for lazy nodes.
    #[must_use]
    pub fn eager_children(&self) -> &[NavNode] {
        match &self.children {
            Children::Eager(children) => children,
            Children::Lazy(_) => &[],
        }
    }

    /// Document part of the url (before `#`).
    #[must_use]
    pub fn page(&self) -> &str {
        self.url
            .split_once('#')
            .map_or(self.url.as_str(), |(page, _)| page)
    }

    /// In-page anchor (after `#`), if any.
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        self.url.split_once('#').map(|(_, anchor)| anchor)
    }
}

/// Check the url invariant: `.html`-suffixed, or exactly one `#`.
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    url.ends_with(".html") || url.matches('#').count() == 1
}

/// Decode an array of generator tuples into nodes.
///
/// `path` names the array's location for error messages (e.g., `NAVTREE`).
/// In lenient mode malformed tuples are logged and dropped together with
/// their subtree.
///
/// # Errors
///
/// Returns [`NavError::MalformedTree`] if `value` is not an array, or in
/// strict mode for the first malformed tuple.
pub fn parse_nodes(
    value: &Value,
    path: &str,
    mode: ValidationMode,
) -> Result<Vec<NavNode>, NavError> {
    let Value::Array(items) = value else {
        return Err(NavError::malformed(path, "expected an array of nodes"));
    };

    let mut nodes = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{path}[{i}]");
        match parse_node(item, &item_path, mode) {
            Ok(node) => nodes.push(node),
            Err(e) if mode.is_strict() => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed navigation node");
            }
        }
    }
    Ok(nodes)
}

fn parse_node(value: &Value, path: &str, mode: ValidationMode) -> Result<NavNode, NavError> {
    let Value::Array(tuple) = value else {
        return Err(NavError::malformed(path, "node must be a [label, url, children] tuple"));
    };
    let (Some(label), Some(url), Some(children)) = (tuple.first(), tuple.get(1), tuple.get(2))
    else {
        return Err(NavError::malformed(
            path,
            format!("node tuple has {} elements, expected 3", tuple.len()),
        ));
    };

    let Value::String(label) = label else {
        return Err(NavError::malformed(path, "label must be a string"));
    };
    let Value::String(url) = url else {
        return Err(NavError::malformed(path, "url must be a string"));
    };
    if !is_valid_url(url) {
        return Err(NavError::malformed(
            path,
            format!("url {url:?} is neither .html-suffixed nor page#anchor"),
        ));
    }

    let children = match children {
        Value::Null => Children::Eager(Vec::new()),
        Value::Array(_) => Children::Eager(parse_nodes(children, &format!("{path}[2]"), mode)?),
        Value::String(id) if !id.is_empty() => Children::Lazy(FragmentId::new(id.as_str())),
        _ => {
            return Err(NavError::malformed(
                path,
                "children must be an array, null, or a fragment name",
            ));
        }
    };

    Ok(NavNode {
        label: label.clone(),
        url: url.clone(),
        children,
    })
}
