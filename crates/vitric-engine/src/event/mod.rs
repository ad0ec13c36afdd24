//! Typed window/input events.
//!
//! Window-system callbacks are translated 1:1 into [`Event`] values which move
//! through the runtime's FIFO queue by value and are dropped once dispatch for
//! the frame completes. Routing is driven by [`EventCategory`] bitmasks, the
//! actual match by exact [`EventKind`] equality.

mod keys;
mod types;

pub use keys::{Key, MouseButton};
pub use types::{Event, EventCategory, EventData, EventKind};
