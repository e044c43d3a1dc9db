//! pb-editor: pointer-gesture interaction for the block canvas.
//!
//! The [`InteractionController`] owns only transient UI state (selection,
//! drags, the pending connection, queued notices). The graph itself is
//! borrowed per call, so the controller never holds a stale copy.

pub mod controller;
pub mod error;
pub mod notice;

pub use controller::{BLOCK_DROP_ANCHOR, BlockDrag, InteractionController, PendingConnection};
pub use error::{EditorError, EditorResult};
pub use notice::{Notice, NoticeLevel};
