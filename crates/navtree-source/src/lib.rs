//! Source abstraction for generated navigation data.
//!
//! This crate provides a [`Source`] trait for reading the scripts a
//! documentation generator emits (the navigation tree script, lazy children
//! fragments and index pages) independently of where they live. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Backend flexibility** (local output directory, embedded bundle)
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Source`] trait with `read()` and `exists()` methods
//! - [`FsSource`] implementation rooted at a generator output directory
//! - [`MockSource`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use navtree_source::{FsSource, Source};
//!
//! let source = FsSource::new(PathBuf::from("html"));
//! let script = source.read("navtreedata.js")?;
//! # Ok::<(), navtree_source::SourceError>(())
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod source;

pub use fs::FsSource;
#[cfg(feature = "mock")]
pub use mock::MockSource;
pub use source::{ErrorStatus, Source, SourceError, SourceErrorKind, validate_name};
