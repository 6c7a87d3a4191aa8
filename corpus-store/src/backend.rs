//! The nearest-neighbour store seam.

use std::{future::Future, pin::Pin};

use crate::errors::IndexError;
use crate::record::{ScoredWindow, TextWindow};

/// Boxed future returned by [`IndexBackend`] methods.
pub type IndexFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, IndexError>> + Send + 'a>>;

/// Nearest-neighbour index over [`TextWindow`]s.
///
/// Backends own embedding: callers hand over text, never vectors.
pub trait IndexBackend: Send + Sync {
    /// Replaces the whole index with `windows`; returns the number stored.
    fn index<'a>(&'a self, windows: &'a [TextWindow]) -> IndexFuture<'a, usize>;

    /// Up to `k` windows, most similar to `query` first.
    ///
    /// Fails with [`IndexError::Unavailable`] when there is no usable index.
    fn search<'a>(&'a self, query: &'a str, k: usize) -> IndexFuture<'a, Vec<ScoredWindow>>;

    /// Short label for logs.
    fn describe(&self) -> String;
}
