//! # Tessera Core
//!
//! The primitives every UI object in tessera is built on:
//! - [`Handle`]: shared ownership with broadcast disposal. Every handle on a
//!   cell observes the disposal before the object is dropped.
//! - [`Observer`]: a non-subscribing view of the same cell.
//! - [`DeferredQueue`]: one-shot calls applied at a safe point of the frame,
//!   never in the middle of a traversal.
//! - [`StringId`] / [`PanelId`]: element names and arena slots.
//!
//! ## Architecture Rules
//!
//! 1. **Single thread** - cells are `Rc`, not `Arc`; nothing here locks
//! 2. **Nothing dangles** - a disposed cell reads as empty through every handle
//! 3. **No mutation mid-iteration** - reactive mutations go through the queue
//!
//! ## Example
//!
//! ```rust
//! use tessera_core::Handle;
//!
//! let owner = Handle::new(String::from("panel"));
//! let mut alias = owner.clone();
//!
//! alias.dispose();
//! assert!(owner.get().is_none());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod deferred;
pub mod id;
pub mod ownership;

pub use deferred::{DeferredCall, DeferredQueue, DrainPass};
pub use id::{PanelId, StringId};
pub use ownership::{Handle, Observer};
