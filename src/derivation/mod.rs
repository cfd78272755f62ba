//! Stores derived from other stores.
//!
//! A derivation keeps a [`Snapshot`] of its input values, runs a combine
//! function over it whenever one input changes, and republishes the result
//! through a [`DerivedStore`] with the same read shape as any other store.

mod derived;
mod engine;
mod options;
mod snapshot;

pub use derived::{derive, derive_with, DerivedStore};
pub use options::DeriveOptions;
pub use snapshot::Snapshot;
