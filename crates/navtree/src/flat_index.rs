//! Flat navigation index.
//!
//! The generator writes every anchor reachable from the tree into one
//! ordered list. Its order drives sequential "previous/next" controls, and
//! because the list is sorted it also pages the url-to-tree-path tables:
//! entry `i` is the first url stored on index page `i`.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::error::NavError;
use crate::node::{ROOT_URL, ValidationMode};

/// Direction of sequential navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards position 0.
    Previous,
    /// Away from position 0.
    Next,
}

/// Ordered, immutable list of urls with O(1) position lookup.
///
/// Every slot of the generator's array keeps its position, including slots
/// that held malformed data in lenient mode. Those are empty: they have no
/// url and no neighbor links, and positions after them still match the
/// generator's index page numbering.
#[derive(Debug, Default)]
pub struct NavIndex {
    entries: Vec<Option<String>>,
    positions: HashMap<String, usize>,
    duplicates: HashSet<String>,
}

impl NavIndex {
    /// Build the index from entries in generator order.
    ///
    /// A repeated url is a generator defect. In lenient mode it is logged
    /// and the url gets no neighbor links; all other entries keep theirs.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`NavError::DuplicateEntry`] for a repeated
    /// url and [`NavError::MalformedTree`] when position 0 is not the root
    /// document.
    pub fn new(entries: Vec<String>, mode: ValidationMode) -> Result<Self, NavError> {
        Self::from_slots(entries.into_iter().map(Some).collect(), mode)
    }

    fn from_slots(entries: Vec<Option<String>>, mode: ValidationMode) -> Result<Self, NavError> {
        if let Some(first) = entries.first()
            && first.as_deref() != Some(ROOT_URL)
        {
            let err = NavError::malformed(
                "NAVTREEINDEX[0]",
                format!("expected root document {ROOT_URL:?}, found {first:?}"),
            );
            if mode.is_strict() {
                return Err(err);
            }
            tracing::warn!(error = %err, "Navigation index does not start at the root document");
        }

        let mut positions = HashMap::with_capacity(entries.len());
        let mut duplicates = HashSet::new();
        for (i, url) in entries.iter().enumerate() {
            let Some(url) = url else { continue };
            if let Some(&first) = positions.get(url) {
                if mode.is_strict() {
                    return Err(NavError::DuplicateEntry {
                        url: url.clone(),
                        first,
                        second: i,
                    });
                }
                tracing::warn!(url = %url, first, second = i, "Duplicate navigation index entry");
                duplicates.insert(url.clone());
            } else {
                positions.insert(url.clone(), i);
            }
        }

        Ok(Self {
            entries,
            positions,
            duplicates,
        })
    }

    /// Build the index from a decoded `NAVTREEINDEX` array.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::MalformedTree`] if `value` is not an array, or in
    /// strict mode if an entry is not a string. In lenient mode such an
    /// entry leaves an empty slot. Otherwise as [`NavIndex::new`].
    pub fn from_value(value: &Value, path: &str, mode: ValidationMode) -> Result<Self, NavError> {
        let Value::Array(items) = value else {
            return Err(NavError::malformed(path, "expected an array of urls"));
        };

        let mut entries = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item {
                Value::String(url) => entries.push(Some(url.clone())),
                _ => {
                    let err = NavError::malformed(format!("{path}[{i}]"), "entry must be a string");
                    if mode.is_strict() {
                        return Err(err);
                    }
                    tracing::warn!(error = %err, "Leaving malformed navigation index slot empty");
                    entries.push(None);
                }
            }
        }

        Self::from_slots(entries, mode)
    }

    /// Number of slots, empty ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All slots in order; `None` marks a malformed entry.
    #[must_use]
    pub fn entries(&self) -> &[Option<String>] {
        &self.entries
    }

    /// Entry at `position`; `None` past the end or for an empty slot.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&str> {
        self.entries.get(position).and_then(Option::as_deref)
    }

    /// Position of `url` (its first occurrence).
    #[must_use]
    pub fn position(&self, url: &str) -> Option<usize> {
        self.positions.get(url).copied()
    }

    /// Whether `url` occurs more than once.
    #[must_use]
    pub fn is_duplicate(&self, url: &str) -> bool {
        self.duplicates.contains(url)
    }

    /// Url adjacent to `url` in the given direction.
    ///
    /// Returns `None` at either end, next to an empty slot, for a url that
    /// isn't indexed, and for a duplicated url (its order is ambiguous).
    #[must_use]
    pub fn neighbor(&self, url: &str, direction: Direction) -> Option<&str> {
        self.try_neighbor(url, direction).ok().flatten()
    }

    /// Like [`neighbor`](Self::neighbor), but reports an unindexed url.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::UnknownUrl`] if `url` is not in the index.
    pub fn try_neighbor(&self, url: &str, direction: Direction) -> Result<Option<&str>, NavError> {
        let position = self
            .position(url)
            .ok_or_else(|| NavError::UnknownUrl(url.to_owned()))?;
        if self.is_duplicate(url) {
            return Ok(None);
        }

        let adjacent = match direction {
            Direction::Previous => position.checked_sub(1),
            Direction::Next => position.checked_add(1),
        };
        Ok(adjacent.and_then(|p| self.get(p)))
    }

    /// Index page that stores `url`'s tree path.
    ///
    /// This is the last entry that sorts at or before `url`, scanning from
    /// the start the way the generated pages expect; urls sorting before
    /// every entry fall back to page 0. Empty slots don't stop the scan.
    /// Returns `None` for an empty index.
    #[must_use]
    pub fn page_for(&self, url: &str) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        let covering = self
            .entries
            .iter()
            .take_while(|entry| entry.as_deref().is_none_or(|entry| entry <= url))
            .count();
        Some(covering.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn index(entries: &[&str]) -> NavIndex {
        NavIndex::new(
            entries.iter().map(|&e| e.to_owned()).collect(),
            ValidationMode::Strict,
        )
        .unwrap()
    }

    #[test]
    fn test_neighbor_example() {
        let index = index(&[".html", "a.html", "b.html"]);

        assert_eq!(index.neighbor("a.html", Direction::Next), Some("b.html"));
        assert_eq!(index.neighbor("a.html", Direction::Previous), Some(".html"));
    }

    #[test]
    fn test_neighbor_consecutive_pairs() {
        let entries = [
            ".html",
            "classA.html#a1",
            "classB.html#b2",
            "classC.html#c3",
            "structD.html#d4",
        ];
        let index = index(&entries);

        for pair in entries.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_eq!(index.neighbor(b, Direction::Previous), Some(a));
            assert_eq!(index.neighbor(a, Direction::Next), Some(b));
        }
    }

    #[test]
    fn test_neighbor_at_boundaries() {
        let index = index(&[".html", "a.html", "b.html"]);

        assert_eq!(index.neighbor(".html", Direction::Previous), None);
        assert_eq!(index.neighbor("b.html", Direction::Next), None);
    }

    #[test]
    fn test_neighbor_single_entry() {
        let index = index(&[".html"]);

        assert_eq!(index.neighbor(".html", Direction::Previous), None);
        assert_eq!(index.neighbor(".html", Direction::Next), None);
    }

    #[test]
    fn test_neighbor_unknown_url() {
        let index = index(&[".html", "a.html"]);

        assert_eq!(index.neighbor("not-in-index", Direction::Next), None);
        assert!(matches!(
            index.try_neighbor("not-in-index", Direction::Next),
            Err(NavError::UnknownUrl(ref url)) if url == "not-in-index"
        ));
    }

    #[test]
    fn test_neighbor_requires_exact_match() {
        let index = index(&[".html", "a.html#x"]);

        assert_eq!(index.neighbor("a.html", Direction::Previous), None);
        assert_eq!(index.neighbor("a.html#x", Direction::Previous), Some(".html"));
    }

    #[test]
    fn test_empty_index() {
        let index = index(&[]);

        assert!(index.is_empty());
        assert_eq!(index.neighbor(".html", Direction::Next), None);
        assert_eq!(index.page_for("a.html"), None);
    }

    #[test]
    fn test_duplicate_strict_is_error() {
        let result = NavIndex::new(
            vec![".html".to_owned(), "a.html".to_owned(), "a.html".to_owned()],
            ValidationMode::Strict,
        );

        assert!(matches!(
            result,
            Err(NavError::DuplicateEntry { ref url, first: 1, second: 2 }) if url == "a.html"
        ));
    }

    #[test]
    fn test_duplicate_lenient_drops_neighbor_links_for_that_url() {
        let index = NavIndex::new(
            vec![
                ".html".to_owned(),
                "a.html".to_owned(),
                "b.html".to_owned(),
                "a.html".to_owned(),
                "c.html".to_owned(),
            ],
            ValidationMode::Lenient,
        )
        .unwrap();

        assert!(index.is_duplicate("a.html"));
        assert_eq!(index.neighbor("a.html", Direction::Next), None);
        assert_eq!(index.neighbor("a.html", Direction::Previous), None);
        assert_eq!(index.try_neighbor("a.html", Direction::Next).unwrap(), None);
        assert_eq!(index.neighbor("b.html", Direction::Next), Some("a.html"));
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn test_first_entry_must_be_root_in_strict_mode() {
        let result = NavIndex::new(vec!["a.html".to_owned()], ValidationMode::Strict);
        assert!(matches!(result, Err(NavError::MalformedTree { .. })));

        let index = NavIndex::new(vec!["a.html".to_owned()], ValidationMode::Lenient).unwrap();
        assert_eq!(index.get(0), Some("a.html"));
    }

    #[test]
    fn test_from_value() {
        let value = json!([".html", "a.html", 3, "b.html"]);

        let index = NavIndex::from_value(&value, "NAVTREEINDEX", ValidationMode::Lenient).unwrap();
        assert_eq!(
            index.entries(),
            &[
                Some(".html".to_owned()),
                Some("a.html".to_owned()),
                None,
                Some("b.html".to_owned()),
            ]
        );

        let err =
            NavIndex::from_value(&value, "NAVTREEINDEX", ValidationMode::Strict).unwrap_err();
        assert!(matches!(err, NavError::MalformedTree { ref path, .. } if path == "NAVTREEINDEX[2]"));

        let err = NavIndex::from_value(&json!({}), "NAVTREEINDEX", ValidationMode::Lenient)
            .unwrap_err();
        assert!(matches!(err, NavError::MalformedTree { .. }));
    }

    #[test]
    fn test_page_for() {
        let index = index(&[
            ".html",
            "classJSBSim_1_1FGAccelerations.html#af352c22ddb64d4acb0a488dee82b2cc9",
            "classJSBSim_1_1FGColumnVector3.html#a2839681c6ce8b52c7dfbb6991c71e1b8",
            "structJSBSim_1_1FGEngine_1_1Inputs.html#a4e4cad057ed92fbe3365a8567c319100",
        ]);

        assert_eq!(index.page_for(".html"), Some(0));
        assert_eq!(index.page_for("annotated.html"), Some(0));
        assert_eq!(
            index.page_for("classJSBSim_1_1FGAccelerations.html#af352c22ddb64d4acb0a488dee82b2cc9"),
            Some(1)
        );
        assert_eq!(index.page_for("classJSBSim_1_1FGAtmosphere.html"), Some(1));
        assert_eq!(index.page_for("classJSBSim_1_1FGWinds.html"), Some(2));
        assert_eq!(index.page_for("structJSBSim_1_1FGEngine_1_1Inputs.html"), Some(2));
        assert_eq!(index.page_for("zzz.html"), Some(3));
    }

    #[test]
    fn test_malformed_entry_keeps_later_positions() {
        let value = json!([".html", 3, "b.html", "c.html"]);

        let index = NavIndex::from_value(&value, "NAVTREEINDEX", ValidationMode::Lenient).unwrap();

        assert_eq!(index.len(), 4);
        assert_eq!(index.get(1), None);
        assert_eq!(index.position("c.html"), Some(3));
        assert_eq!(index.page_for("c.html"), Some(3));
        assert_eq!(index.page_for("bz.html"), Some(2));
        assert_eq!(index.neighbor("c.html", Direction::Previous), Some("b.html"));
        assert_eq!(index.neighbor("b.html", Direction::Previous), None);
        assert_eq!(index.neighbor(".html", Direction::Next), None);
    }

    #[test]
    fn test_page_for_url_before_first_entry_falls_back_to_zero() {
        let index = NavIndex::new(vec!["m.html".to_owned()], ValidationMode::Lenient).unwrap();

        assert_eq!(index.page_for("a.html"), Some(0));
    }
}
