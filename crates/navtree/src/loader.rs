//! Loading navigation data from a [`Source`].
//!
//! [`Loader`] reads the main navigation script into a [`NavigationIndex`]
//! and fetches the data the generator defers: lazy children fragments and
//! url-to-tree-path index pages. Deferred fetches never touch an index that
//! is already loaded; a failed fetch is returned as
//! [`NavError::LazyLoadFailure`] and the caller keeps rendering without it.

use std::borrow::Cow;
use std::sync::Arc;

use navtree_config::Config;
use navtree_source::{FsSource, Source};
use serde::Serialize;

use crate::error::NavError;
use crate::index_page::{IndexPage, index_page_variable};
use crate::navigation_index::NavigationIndex;
use crate::node::{Children, FragmentId, NavNode, ValidationMode, parse_nodes};
use crate::script::ScriptValues;

/// Configuration for [`Loader`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoaderConfig {
    /// File name of the main navigation script.
    pub tree_script: String,
    /// File name prefix of index pages.
    pub index_page_prefix: String,
    /// Extension of fragment and index page scripts, without the dot.
    pub fragment_extension: String,
    /// How to treat malformed generator output.
    pub mode: ValidationMode,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            tree_script: "navtreedata.js".to_owned(),
            index_page_prefix: "navtreeindex".to_owned(),
            fragment_extension: "js".to_owned(),
            mode: ValidationMode::Lenient,
        }
    }
}

impl LoaderConfig {
    /// Take loader settings from application configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let data = &config.data_resolved;
        Self {
            tree_script: data.tree_script.clone(),
            index_page_prefix: data.index_page_prefix.clone(),
            fragment_extension: data.fragment_extension.clone(),
            mode: ValidationMode::from_strict(config.validation.strict),
        }
    }

    /// File name of index page `number`.
    #[must_use]
    pub fn index_page_name(&self, number: usize) -> String {
        format!(
            "{}{number}.{}",
            self.index_page_prefix, self.fragment_extension
        )
    }
}

/// Ancestor chain entry for a located url.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BreadcrumbItem {
    /// Display text.
    pub label: String,
    /// Link target.
    pub url: String,
}

/// Reads generated navigation data through a [`Source`].
pub struct Loader {
    source: Arc<dyn Source>,
    config: LoaderConfig,
}

impl Loader {
    /// Create a loader.
    ///
    /// # Arguments
    ///
    /// * `source` - Where the generated scripts are read from
    /// * `config` - Script names and validation mode
    #[must_use]
    pub fn new(source: Arc<dyn Source>, config: LoaderConfig) -> Self {
        Self { source, config }
    }

    /// Create a loader reading from the configured data directory.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let source = Arc::new(FsSource::new(config.data_resolved.dir.clone()));
        Self::new(source, LoaderConfig::from_config(config))
    }

    /// Loader configuration.
    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Read and parse the main navigation script.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Source`] if the script can't be read, otherwise
    /// as [`NavigationIndex::from_script`].
    pub fn load_index(&self) -> Result<NavigationIndex, NavError> {
        let text = self.source.read(&self.config.tree_script)?;
        let index = NavigationIndex::from_script(&text, self.config.mode)?;
        tracing::info!(
            script = %self.config.tree_script,
            top_level = index.root().eager_children().len(),
            entries = index.flat_index().len(),
            "Loaded navigation index"
        );
        Ok(index)
    }

    /// Fetch the children a lazy node defers to `id`.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::LazyLoadFailure`] if the fragment can't be read
    /// or decoded.
    pub fn fetch_children(&self, id: &FragmentId) -> Result<Vec<NavNode>, NavError> {
        self.read_fragment(id).map_err(|e| {
            tracing::warn!(fragment = %id, error = %e, "Failed to load lazy children");
            e.into_lazy_failure(id.as_str())
        })
    }

    fn read_fragment(&self, id: &FragmentId) -> Result<Vec<NavNode>, NavError> {
        let name = id.script_name(&self.config.fragment_extension);
        let text = self.source.read(&name)?;
        let value = ScriptValues::parse(&text).take(id.as_str())?;
        let children = parse_nodes(&value, id.as_str(), self.config.mode)?;
        tracing::debug!(fragment = %id, children = children.len(), "Fetched lazy children");
        Ok(children)
    }

    /// Fetch and decode index page `number`.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::LazyLoadFailure`] if the page can't be read or
    /// decoded.
    pub fn load_index_page(&self, number: usize) -> Result<IndexPage, NavError> {
        let name = self.config.index_page_name(number);
        self.read_index_page(&name, number).map_err(|e| {
            tracing::warn!(page = %name, error = %e, "Failed to load index page");
            e.into_lazy_failure(name.clone())
        })
    }

    fn read_index_page(&self, name: &str, number: usize) -> Result<IndexPage, NavError> {
        let text = self.source.read(name)?;
        let variable = index_page_variable(&self.config.index_page_prefix, number);
        let value = ScriptValues::parse(&text).take(&variable)?;
        IndexPage::from_value(number, &value, self.config.mode)
    }

    /// Child positions from the root to `url`.
    ///
    /// Returns `Ok(None)` if the flat index is empty or the responsible
    /// index page doesn't list `url`.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::LazyLoadFailure`] if the index page can't be loaded.
    pub fn locate(
        &self,
        index: &NavigationIndex,
        url: &str,
    ) -> Result<Option<Vec<usize>>, NavError> {
        let Some(number) = index.index_page_for(url) else {
            return Ok(None);
        };
        let page = self.load_index_page(number)?;
        Ok(page.tree_path(url).map(<[usize]>::to_vec))
    }

    /// Ancestor chain of `url`, from the top-level entry down to the node
    /// itself, fetching lazy children along the way.
    ///
    /// Returns `Ok(None)` if `url` can't be located. A tree path that
    /// doesn't fit the tree is a generator defect: logged and `Ok(None)` in
    /// lenient mode.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::LazyLoadFailure`] if an index page or fragment
    /// can't be loaded, and [`NavError::MalformedTree`] in strict mode for a
    /// tree path that doesn't fit the tree.
    pub fn breadcrumbs(
        &self,
        index: &NavigationIndex,
        url: &str,
    ) -> Result<Option<Vec<BreadcrumbItem>>, NavError> {
        let Some(path) = self.locate(index, url)? else {
            return Ok(None);
        };

        let mut crumbs = Vec::with_capacity(path.len());
        let mut level: Cow<'_, [NavNode]> = Cow::Borrowed(index.root().eager_children());

        for (depth, &position) in path.iter().enumerate() {
            let node = match level {
                Cow::Borrowed(nodes) => nodes.get(position).map(Cow::Borrowed),
                Cow::Owned(nodes) => nodes.into_iter().nth(position).map(Cow::Owned),
            };
            let Some(node) = node else {
                let err = NavError::malformed(
                    format!("tree path {path:?} of {url:?}"),
                    format!("no child at position {position} on level {depth}"),
                );
                if self.config.mode.is_strict() {
                    return Err(err);
                }
                tracing::warn!(error = %err, "Index page points outside the tree");
                return Ok(None);
            };

            crumbs.push(BreadcrumbItem {
                label: node.label.clone(),
                url: node.url.clone(),
            });
            if depth + 1 == path.len() {
                break;
            }

            level = match node {
                Cow::Borrowed(node) => match &node.children {
                    Children::Eager(children) => Cow::Borrowed(children.as_slice()),
                    Children::Lazy(id) => Cow::Owned(self.fetch_children(id)?),
                },
                Cow::Owned(node) => match node.children {
                    Children::Eager(children) => Cow::Owned(children),
                    Children::Lazy(id) => Cow::Owned(self.fetch_children(&id)?),
                },
            };
        }

        Ok(Some(crumbs))
    }
}
