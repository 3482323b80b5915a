//! View coordination for the node board: pointer drags, the creation form,
//! the sidebar hierarchy, connection windows and the favorites panel. Each
//! reads `nb-core` state and mutates it only through `Board` methods.

pub mod connections;
pub mod drag;
pub mod favorites;
pub mod form;
pub mod input;
pub mod sidebar;

pub use drag::{DragController, DragState, DragTarget};
pub use form::NodeForm;
pub use input::{InputEvent, PointerButton};
