//! Loaded navigation data and its queries.
//!
//! [`NavigationIndex`] owns the navigation tree (below a synthetic root) and
//! the flat index. It is built once and never mutated; share it behind an
//! `Arc` if several consumers need it.
//!
//! # Example
//!
//! ```
//! use navtree::{Direction, NavigationIndex, Resolution, ValidationMode};
//!
//! let script = r#"
//! var NAVTREE = [ [ "Project", "index.html", [
//!   [ "Intro", "index.html#intro", null ],
//!   [ "Classes", "annotated.html", "annotated_dup" ]
//! ] ] ];
//! var NAVTREEINDEX = [ ".html", "a.html", "b.html" ];
//! "#;
//!
//! let index = NavigationIndex::from_script(script, ValidationMode::Lenient)?;
//!
//! assert_eq!(index.neighbor("a.html", Direction::Next), Some("b.html"));
//! let project = &index.root().eager_children()[0];
//! assert!(matches!(index.resolve_children(project), Resolution::Ready(c) if c.len() == 2));
//! # Ok::<(), navtree::NavError>(())
//! ```

use serde_json::Value;

use crate::error::NavError;
use crate::flat_index::{Direction, NavIndex};
use crate::node::{Children, NavNode, Resolution, ValidationMode, parse_nodes};
use crate::script::ScriptValues;

/// Script variable holding the navigation tree.
pub const TREE_VARIABLE: &str = "NAVTREE";

/// Script variable holding the flat index.
pub const INDEX_VARIABLE: &str = "NAVTREEINDEX";

/// Navigation tree plus flat index.
#[derive(Debug)]
pub struct NavigationIndex {
    root: NavNode,
    flat: NavIndex,
}

impl NavigationIndex {
    /// Create an index from top-level nodes and a flat index.
    #[must_use]
    pub fn new(top_level: Vec<NavNode>, flat: NavIndex) -> Self {
        Self {
            root: NavNode::root(top_level),
            flat,
        }
    }

    /// Parse the main navigation script.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::MissingVariable`] or [`NavError::Json`] if either
    /// data variable is absent or undecodable, and [`NavError::MalformedTree`]
    /// or [`NavError::DuplicateEntry`] as described on [`from_values`](Self::from_values).
    pub fn from_script(text: &str, mode: ValidationMode) -> Result<Self, NavError> {
        let mut script = ScriptValues::parse(text);
        let tree = script.take(TREE_VARIABLE)?;
        let index = script.take(INDEX_VARIABLE)?;
        Self::from_values(&tree, &index, mode)
    }

    /// Build an index from decoded `NAVTREE` and `NAVTREEINDEX` values.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::MalformedTree`] if either value has the wrong
    /// top-level shape. In strict mode, also returns the first node or entry
    /// defect; in lenient mode those are logged and skipped.
    pub fn from_values(tree: &Value, index: &Value, mode: ValidationMode) -> Result<Self, NavError> {
        let top_level = parse_nodes(tree, TREE_VARIABLE, mode)?;
        let flat = NavIndex::from_value(index, INDEX_VARIABLE, mode)?;

        let index = Self::new(top_level, flat);
        tracing::debug!(
            nodes = index.nodes().count(),
            entries = index.flat.len(),
            "Navigation index built"
        );
        Ok(index)
    }

    /// Synthetic root node; its children are the top-level entries.
    #[must_use]
    pub fn root(&self) -> &NavNode {
        &self.root
    }

    /// Flat index.
    #[must_use]
    pub fn flat_index(&self) -> &NavIndex {
        &self.flat
    }

    /// Children of `node`, or the fragment to fetch for them.
    #[must_use]
    pub fn resolve_children<'a>(&self, node: &'a NavNode) -> Resolution<'a> {
        node.resolve_children()
    }

    /// Adjacent url in the flat index; `None` at a boundary or if unknown.
    #[must_use]
    pub fn neighbor(&self, current_url: &str, direction: Direction) -> Option<&str> {
        self.flat.neighbor(current_url, direction)
    }

    /// Like [`neighbor`](Self::neighbor), but reports an unindexed url.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::UnknownUrl`] if `current_url` is not in the index.
    pub fn try_neighbor(
        &self,
        current_url: &str,
        direction: Direction,
    ) -> Result<Option<&str>, NavError> {
        self.flat.try_neighbor(current_url, direction)
    }

    /// Index page holding the tree path of `url`.
    #[must_use]
    pub fn index_page_for(&self, url: &str) -> Option<usize> {
        self.flat.page_for(url)
    }

    /// All eagerly loaded nodes below the root, depth-first in display order.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes {
            stack: self.root.eager_children().iter().rev().collect(),
        }
    }

    /// First eagerly loaded node with exactly this url.
    #[must_use]
    pub fn find_by_url(&self, url: &str) -> Option<&NavNode> {
        self.nodes().find(|node| node.url == url)
    }

    /// Node reached by following child positions from the root.
    ///
    /// Returns `None` if a position is out of range or the path crosses a
    /// node whose children are not loaded.
    #[must_use]
    pub fn node_at(&self, path: &[usize]) -> Option<&NavNode> {
        let mut node = &self.root;
        for &position in path {
            let Children::Eager(children) = &node.children else {
                return None;
            };
            node = children.get(position)?;
        }
        Some(node)
    }
}

/// Depth-first iterator over eagerly loaded nodes.
///
/// Created by [`NavigationIndex::nodes`]. Lazy children are not visited.
pub struct Nodes<'a> {
    stack: Vec<&'a NavNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a NavNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.eager_children().iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::FragmentId;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const SCRIPT: &str = r#"/*
@licstart  The following is the entire license notice for the
JavaScript code in this file.
@licend
*/
var NAVTREE =
[
  [ "JSBSim Flight Dynamics Model", "index.html", [
    [ "JSBSim", "index.html", [
      [ "Introduction", "index.html#intro", null ],
      [ "Supported Platforms", "index.html#platforms", null ]
    ] ],
    [ "Classes", "annotated.html", [
      [ "Class List", "annotated.html", "annotated_dup" ],
      [ "Class Index", "classes.html", null ]
    ] ],
    [ "Files", "files.html", [
      [ "File List", "files.html", "files_dup" ]
    ] ]
  ] ]
];

var NAVTREEINDEX =
[
".html",
"classJSBSim_1_1FGAccelerations.html#af352c22ddb64d4acb0a488dee82b2cc9",
"structJSBSim_1_1FGEngine_1_1Inputs.html#a4e4cad057ed92fbe3365a8567c319100"
];

var SYNCONMSG = 'click to disable panel synchronisation';
var SYNCOFFMSG = 'click to enable panel synchronisation';
"#;

    fn load() -> NavigationIndex {
        NavigationIndex::from_script(SCRIPT, ValidationMode::Strict).unwrap()
    }

    #[test]
    fn test_from_script_builds_tree_below_root() {
        let index = load();

        let root = index.root();
        assert_eq!(root.label, "root");
        let Resolution::Ready(top) = index.resolve_children(root) else {
            panic!("root children must be eager");
        };
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].label, "JSBSim Flight Dynamics Model");

        let labels: Vec<_> = top[0].eager_children().iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["JSBSim", "Classes", "Files"]);
    }

    #[test]
    fn test_from_script_flat_index() {
        let index = load();

        assert_eq!(index.flat_index().len(), 3);
        assert_eq!(
            index.neighbor(".html", Direction::Next),
            Some("classJSBSim_1_1FGAccelerations.html#af352c22ddb64d4acb0a488dee82b2cc9")
        );
        assert_eq!(index.neighbor(".html", Direction::Previous), None);
        assert!(matches!(
            index.try_neighbor("missing.html", Direction::Next),
            Err(NavError::UnknownUrl(_))
        ));
    }

    #[test]
    fn test_resolve_children_lazy_node_is_deferred() {
        let index = load();

        let class_list = index.node_at(&[0, 1, 0]).unwrap();

        assert_eq!(class_list.label, "Class List");
        assert_eq!(
            index.resolve_children(class_list),
            Resolution::Deferred(&FragmentId::new("annotated_dup"))
        );
    }

    #[test]
    fn test_resolve_children_eager_round_trip() {
        let index = load();

        for node in index.nodes() {
            if let Children::Eager(embedded) = &node.children {
                assert_eq!(
                    index.resolve_children(node),
                    Resolution::Ready(embedded.as_slice())
                );
            }
        }
    }

    #[test]
    fn test_empty_tree() {
        let index = NavigationIndex::from_values(&json!([]), &json!([".html"]), ValidationMode::Strict)
            .unwrap();

        assert_eq!(index.resolve_children(index.root()), Resolution::Ready(&[]));
        assert_eq!(index.nodes().count(), 0);
    }

    #[test]
    fn test_new_with_empty_parts() {
        let index = NavigationIndex::new(Vec::new(), NavIndex::default());

        assert_eq!(index.resolve_children(index.root()), Resolution::Ready(&[]));
        assert!(index.flat_index().is_empty());
    }

    #[test]
    fn test_nodes_depth_first_order() {
        let index = load();

        let urls: Vec<_> = index.nodes().map(|n| n.url.as_str()).collect();

        assert_eq!(
            urls,
            vec![
                "index.html",
                "index.html",
                "index.html#intro",
                "index.html#platforms",
                "annotated.html",
                "annotated.html",
                "classes.html",
                "files.html",
                "files.html",
            ]
        );
    }

    #[test]
    fn test_find_by_url() {
        let index = load();

        assert_eq!(
            index.find_by_url("index.html#platforms").map(|n| n.label.as_str()),
            Some("Supported Platforms")
        );
        assert_eq!(
            index.find_by_url("annotated.html").map(|n| n.label.as_str()),
            Some("Classes")
        );
        assert!(index.find_by_url("nope.html").is_none());
    }

    #[test]
    fn test_node_at() {
        let index = load();

        assert_eq!(index.node_at(&[]).map(|n| n.label.as_str()), Some("root"));
        assert_eq!(
            index.node_at(&[0, 0, 1]).map(|n| n.label.as_str()),
            Some("Supported Platforms")
        );
        assert!(index.node_at(&[0, 9]).is_none());
        assert!(index.node_at(&[0, 1, 0, 0]).is_none());
    }

    #[test]
    fn test_index_page_for() {
        let index = load();

        assert_eq!(index.index_page_for("annotated.html"), Some(0));
        assert_eq!(index.index_page_for("classJSBSim_1_1FGTank.html"), Some(1));
        assert_eq!(
            index.index_page_for(
                "structJSBSim_1_1FGEngine_1_1Inputs.html#a4e4cad057ed92fbe3365a8567c319100"
            ),
            Some(2)
        );
    }

    #[test]
    fn test_from_script_missing_index() {
        let err = NavigationIndex::from_script("var NAVTREE = [];", ValidationMode::Lenient)
            .unwrap_err();

        assert!(matches!(err, NavError::MissingVariable(ref name) if name == "NAVTREEINDEX"));
    }

    #[test]
    fn test_lenient_degrades_on_malformed_data() {
        let tree = json!([
            ["Top", "index.html", [
                ["No children marker", "a.html"],
                ["Kept", "b.html", null]
            ]]
        ]);
        let flat = json!([".html", "b.html", "b.html", "c.html"]);

        let index = NavigationIndex::from_values(&tree, &flat, ValidationMode::Lenient).unwrap();

        assert_eq!(index.nodes().count(), 2);
        assert_eq!(index.neighbor("b.html", Direction::Next), None);
        assert_eq!(index.neighbor("c.html", Direction::Previous), Some("b.html"));
    }

    #[test]
    fn test_strict_rejects_malformed_data() {
        let tree = json!([["Top", "index.html", 7]]);
        let err = NavigationIndex::from_values(&tree, &json!([".html"]), ValidationMode::Strict)
            .unwrap_err();
        assert!(matches!(err, NavError::MalformedTree { .. }));

        let flat = json!([".html", "a.html", "a.html"]);
        let err = NavigationIndex::from_values(&json!([]), &flat, ValidationMode::Strict)
            .unwrap_err();
        assert!(matches!(err, NavError::DuplicateEntry { .. }));
    }

    static_assertions::assert_impl_all!(super::NavigationIndex: Send, Sync);
}
