//! Observable stores.
//!
//! An observable store holds a value, hands out its current state, and
//! notifies listeners with `(new, prev)` whenever that state changes.
//! [`Observable`] is the read side every derivation input must provide;
//! [`Store`] is the plain writable container.

mod observable;
mod registry;
mod store;
mod subscription;

pub use observable::{Listener, Observable, Writable};
pub use registry::{ListenerId, ListenerRegistry};
pub use store::Store;
pub use subscription::Subscription;
