//! # Tincan Derive
//!
//! Derived stores for Rust: observable state computed from other observable
//! stores.
//!
//! ## Stores
//!
//! - [`Observable`] - the read contract of a store: `get_state` plus a
//!   `(new, prev)` change feed
//! - [`Store<T>`] - thread-safe writable state container
//! - [`Subscription`] - RAII handle that unsubscribes on drop
//!
//! ## Derivations
//!
//! - [`derive`] - build a [`DerivedStore`] from a list of input stores and a
//!   combine function
//! - [`Snapshot`] - the ordered input values handed to the combine function
//!
//! A derived store recomputes synchronously on every input change, in the
//! call that changed the input, and notifies its listeners each time. Its
//! `set_state` always fails; [`DerivedStore::destroy`] detaches it from its
//! inputs.
//!
//! ```
//! use tincan_derive::{derive, Store};
//!
//! let price = Store::new(4);
//! let quantity = Store::new(3);
//! let total = derive(&[&price, &quantity], |v, _, _| v[0] * v[1]);
//!
//! quantity.set_state(5);
//! assert_eq!(total.get_state(), 20);
//! ```

pub mod derivation;
pub mod error;
pub mod store;

// Re-export main types for convenience
pub use derivation::{derive, derive_with, DeriveOptions, DerivedStore, Snapshot};
pub use error::{Result, StoreError};
pub use store::{Listener, Observable, Store, Subscription, Writable};
