//! Navigation index for generated API documentation sites.
//!
//! This crate provides:
//! - [`NavigationIndex`]: navigation tree and flat index parsed from the
//!   generator's `navtreedata.js` script
//! - [`Loader`]: reads that script, lazily referenced children fragments, and
//!   url-to-tree-path index pages through a [`navtree_source::Source`]
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use navtree::{Direction, Loader, Resolution};
//! use navtree_config::Config;
//!
//! let config = Config::load(None, None)?;
//! let loader = Loader::from_config(&config);
//! let index = loader.load_index()?;
//!
//! // Sequential navigation
//! let next = index.neighbor("annotated.html", Direction::Next);
//!
//! // Expand a node whose children live in a fragment
//! for node in index.root().eager_children() {
//!     if let Resolution::Deferred(id) = index.resolve_children(node) {
//!         let children = loader.fetch_children(id)?;
//!         println!("{}: {} children", node.label, children.len());
//!     }
//! }
//!
//! // Ancestor chain of a page
//! let crumbs = loader.breadcrumbs(&index, "classJSBSim_1_1FGWinds.html")?;
//! # let _ = (next, crumbs);
//! # Ok(())
//! # }
//! ```

mod error;
mod flat_index;
mod index_page;
mod loader;
mod navigation_index;
mod node;
mod script;

pub use error::NavError;
pub use flat_index::{Direction, NavIndex};
pub use index_page::{IndexPage, index_page_variable};
pub use loader::{BreadcrumbItem, Loader, LoaderConfig};
pub use navigation_index::{INDEX_VARIABLE, NavigationIndex, Nodes, TREE_VARIABLE};
pub use node::{
    Children, FragmentId, NavNode, ROOT_LABEL, ROOT_URL, Resolution, ValidationMode, is_valid_url,
    parse_nodes,
};
pub use script::ScriptValues;
