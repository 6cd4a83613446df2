//! Generated data script parsing.
//!
//! Documentation generators ship navigation data as small scripts made of
//! top-level assignments:
//!
//! ```text
//! /* license banner */
//! var NAVTREE =
//! [
//!   [ "Project", "index.html", [ ... ] ]
//! ];
//! var NAVTREEINDEX = [ ".html", "a.html" ];
//! var SYNCONMSG = 'click to disable panel synchronisation';
//! ```
//!
//! [`ScriptValues::parse`] scans for `var NAME = <literal>;` statements and
//! decodes each literal as JSON, which is what the generator emits for data.
//! Literals that are not JSON (single-quoted UI strings) are kept as decode
//! failures and only surface if someone asks for that variable.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::NavError;

/// Decoded `var` assignments of one generated script.
#[derive(Debug, Default)]
pub struct ScriptValues {
    values: HashMap<String, Value>,
    failures: HashMap<String, serde_json::Error>,
}

impl ScriptValues {
    /// Parse all top-level `var` assignments in `text`.
    ///
    /// Never fails: statements that can't be decoded are recorded and
    /// reported by [`take`](Self::take) for that name.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut script = Self::default();
        let mut pos = 0;

        while pos < text.len() {
            let rest = &text[pos..];

            if rest.starts_with("/*") {
                pos += rest.find("*/").map_or(rest.len(), |i| i + 2);
                continue;
            }
            if rest.starts_with("//") {
                pos += rest.find('\n').map_or(rest.len(), |i| i + 1);
                continue;
            }
            if is_var_keyword(text, pos) {
                pos = script.parse_statement(text, pos + 3);
                continue;
            }

            pos += rest.chars().next().map_or(1, char::len_utf8);
        }

        script
    }

    /// Parse one statement whose `var` keyword ends at `pos`.
    ///
    /// Returns the position to resume scanning from.
    fn parse_statement(&mut self, text: &str, pos: usize) -> usize {
        let name_start = skip_whitespace(text, pos);
        let name_end = text[name_start..]
            .find(|c: char| !is_ident_char(c))
            .map_or(text.len(), |i| name_start + i);
        if name_end == name_start {
            return name_start;
        }
        let name = &text[name_start..name_end];

        let eq = skip_whitespace(text, name_end);
        if !text[eq..].starts_with('=') {
            return eq;
        }
        let literal_start = skip_whitespace(text, eq + 1);

        let mut stream =
            serde_json::Deserializer::from_str(&text[literal_start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => {
                self.failures.remove(name);
                self.values.insert(name.to_owned(), value);
                literal_start + stream.byte_offset()
            }
            Some(Err(e)) => {
                tracing::debug!(name, error = %e, "Skipping non-JSON script assignment");
                self.values.remove(name);
                self.failures.insert(name.to_owned(), e);
                text[literal_start..]
                    .find([';', '\n'])
                    .map_or(text.len(), |i| literal_start + i + 1)
            }
            None => text.len(),
        }
    }

    /// Get a decoded variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Remove and return a decoded variable.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Json`] if the statement exists but its literal
    /// couldn't be decoded, [`NavError::MissingVariable`] if it doesn't exist.
    pub fn take(&mut self, name: &str) -> Result<Value, NavError> {
        if let Some(value) = self.values.remove(name) {
            return Ok(value);
        }
        match self.failures.remove(name) {
            Some(source) => Err(NavError::Json {
                name: name.to_owned(),
                source,
            }),
            None => Err(NavError::MissingVariable(name.to_owned())),
        }
    }

    /// Names of all successfully decoded variables, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Whether a standalone `var` keyword followed by whitespace starts at `pos`.
fn is_var_keyword(text: &str, pos: usize) -> bool {
    let rest = &text[pos..];
    if !rest.starts_with("var") {
        return false;
    }
    let preceded_ok = text[..pos].chars().next_back().is_none_or(|c| !is_ident_char(c));
    let followed_ok = rest[3..].chars().next().is_some_and(char::is_whitespace);
    preceded_ok && followed_ok
}

fn skip_whitespace(text: &str, pos: usize) -> usize {
    text[pos..]
        .find(|c: char| !c.is_whitespace())
        .map_or(text.len(), |i| pos + i)
}
