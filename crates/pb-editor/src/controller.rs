//! Gesture state machine for the block canvas.
//!
//! Each handler mirrors one pointer event. Handlers that mutate the graph
//! return the outcome and also queue a [`Notice`] for the user. Graph errors
//! are queued as error notices as well; a failed handler leaves the graph
//! untouched.

use pb_core::{BlockId, ConnectionId, Point};
use pb_graph::{Connection, GraphError, GraphStore, Params, PortSide, Segment, port_anchor};
use tracing::debug;

use crate::error::{EditorError, EditorResult};
use crate::notice::Notice;

/// Where a dropped block's origin lands relative to the cursor.
pub const BLOCK_DROP_ANCHOR: Point = Point::new(70.0, 30.0);

/// A block being dragged: the cursor keeps its grab offset from the block origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockDrag {
    pub block: BlockId,
    pub grab_offset: Point,
}

/// A wire being drawn from an output port.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConnection {
    pub from_block: BlockId,
    pub from_port: String,
    pub anchor: Point,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    selection: Option<BlockId>,
    palette_drag: Option<String>,
    block_drag: Option<BlockDrag>,
    pending: Option<PendingConnection>,
    pointer: Point,
    notices: Vec<Notice>,
}

fn missing_block(block: BlockId) -> GraphError {
    GraphError::NotFound {
        what: "Block",
        id: block.to_string(),
    }
}

fn connect_failure_message(err: &GraphError) -> String {
    match err {
        GraphError::PortOccupied { .. } => "Port already connected".to_string(),
        other => other.to_string(),
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<BlockId> {
        self.selection
    }

    pub fn select(&mut self, block: Option<BlockId>) {
        self.selection = block;
    }

    pub fn palette_drag(&self) -> Option<&str> {
        self.palette_drag.as_deref()
    }

    pub fn block_drag(&self) -> Option<BlockDrag> {
        self.block_drag
    }

    pub fn pending_connection(&self) -> Option<&PendingConnection> {
        self.pending.as_ref()
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Queue a notice on behalf of a caller sharing this controller's queue.
    pub fn notify(&mut self, notice: Notice) {
        debug!(%notice, "notice");
        self.notices.push(notice);
    }

    /// Take every queued notice, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Queue an error notice for a failed graph operation and pass the error on.
    fn reported<T>(&mut self, result: Result<T, GraphError>) -> EditorResult<T> {
        result.map_err(|err| {
            self.notify(Notice::error(err.to_string()));
            err.into()
        })
    }

    // ---- palette ----

    pub fn begin_palette_drag(&mut self, block_type: impl Into<String>) {
        let block_type = block_type.into();
        debug!(%block_type, "palette drag started");
        self.palette_drag = Some(block_type);
    }

    pub fn cancel_palette_drag(&mut self) {
        self.palette_drag = None;
    }

    /// Finish a palette drag by placing the block under the cursor.
    ///
    /// Returns `Ok(None)` when no palette drag was active.
    pub fn drop_on_canvas(
        &mut self,
        graph: &mut GraphStore,
        cursor: Point,
    ) -> EditorResult<Option<BlockId>> {
        let Some(block_type) = self.palette_drag.take() else {
            return Ok(None);
        };

        match graph.place_block(&block_type, cursor - BLOCK_DROP_ANCHOR) {
            Ok(block) => {
                let (id, name) = (block.id, block.name.clone());
                self.selection = Some(id);
                self.notify(Notice::success(format!("Added {name} block")));
                Ok(Some(id))
            }
            Err(err) => {
                self.notify(Notice::error(err.to_string()));
                Err(err.into())
            }
        }
    }

    // ---- block drag ----

    /// Select a block and start dragging it.
    pub fn pointer_down_on_block(
        &mut self,
        graph: &GraphStore,
        block: BlockId,
        cursor: Point,
    ) -> EditorResult<()> {
        let position = self
            .reported(graph.block(block).ok_or_else(|| missing_block(block)))?
            .position;
        self.selection = Some(block);
        self.block_drag = Some(BlockDrag {
            block,
            grab_offset: cursor - position,
        });
        self.pointer = cursor;
        Ok(())
    }

    /// Track the pointer and move the dragged block, if any.
    pub fn pointer_move(&mut self, graph: &mut GraphStore, cursor: Point) -> EditorResult<()> {
        self.pointer = cursor;
        let Some(drag) = self.block_drag else {
            return Ok(());
        };
        let moved = graph.move_block(drag.block, cursor - drag.grab_offset);
        if moved.is_err() {
            self.block_drag = None;
        }
        self.reported(moved)
    }

    /// End any block drag and abandon an unfinished wire.
    pub fn pointer_up(&mut self) {
        self.block_drag = None;
        if self.pending.take().is_some() {
            debug!("pending connection abandoned");
        }
    }

    /// Clicking empty canvas clears the selection.
    pub fn click_canvas(&mut self) {
        self.selection = None;
    }

    // ---- connections ----

    /// Start a wire from an output port.
    ///
    /// Pressing on an input port is ignored and returns `Ok(false)`.
    pub fn pointer_down_on_port(
        &mut self,
        graph: &GraphStore,
        block: BlockId,
        port: &str,
        side: PortSide,
    ) -> EditorResult<bool> {
        if side == PortSide::Input {
            return Ok(false);
        }

        let placed = self.reported(graph.block(block).ok_or_else(|| missing_block(block)))?;
        let anchor = self.reported(port_anchor(placed, PortSide::Output, port).ok_or_else(|| {
            GraphError::InvalidPort {
                block,
                port: port.to_string(),
                side: PortSide::Output,
            }
        }))?;

        debug!(%block, port, "pending connection started");
        self.pending = Some(PendingConnection {
            from_block: block,
            from_port: port.to_string(),
            anchor,
        });
        self.pointer = anchor;
        Ok(true)
    }

    /// Release over a port: complete the pending wire.
    ///
    /// The pending connection is consumed whatever the outcome.
    pub fn pointer_up_on_port(
        &mut self,
        graph: &mut GraphStore,
        block: BlockId,
        port: &str,
        side: PortSide,
    ) -> EditorResult<ConnectionId> {
        let pending = self.pending.take().ok_or(EditorError::NoPendingConnection)?;
        if side == PortSide::Output {
            return Err(EditorError::NotAnInput);
        }

        match graph.connect(pending.from_block, &pending.from_port, block, port) {
            Ok(conn) => {
                let id = conn.id;
                self.notify(Notice::success("Connection created"));
                Ok(id)
            }
            Err(err) => {
                self.notify(Notice::error(connect_failure_message(&err)));
                Err(err.into())
            }
        }
    }

    /// The wire being drawn: from its anchor to the current pointer.
    pub fn pending_wire(&self) -> Option<Segment> {
        self.pending.as_ref().map(|p| Segment {
            from: p.anchor,
            to: self.pointer,
        })
    }

    pub fn disconnect(
        &mut self,
        graph: &mut GraphStore,
        id: ConnectionId,
    ) -> EditorResult<Connection> {
        let removed = self.reported(graph.disconnect(id))?;
        self.notify(Notice::success("Connection removed"));
        Ok(removed)
    }

    // ---- block commands ----

    /// Delete a block (and its connections), dropping any UI state that refers to it.
    pub fn delete_block(
        &mut self,
        graph: &mut GraphStore,
        block: BlockId,
    ) -> EditorResult<Vec<Connection>> {
        let removed = self.reported(graph.delete_block(block))?;

        if self.selection == Some(block) {
            self.selection = None;
        }
        if self.block_drag.is_some_and(|d| d.block == block) {
            self.block_drag = None;
        }
        if self.pending.as_ref().is_some_and(|p| p.from_block == block) {
            self.pending = None;
        }

        self.notify(Notice::success("Block deleted"));
        Ok(removed)
    }

    /// Duplicate a block and select the copy.
    pub fn duplicate_block(&mut self, graph: &mut GraphStore, block: BlockId) -> EditorResult<BlockId> {
        let copy = self.reported(graph.duplicate_block(block).map(|b| b.id))?;
        self.selection = Some(copy);
        self.notify(Notice::success("Block duplicated"));
        Ok(copy)
    }

    pub fn update_params(
        &mut self,
        graph: &mut GraphStore,
        block: BlockId,
        params: Params,
    ) -> EditorResult<()> {
        self.reported(graph.update_params(block, params))?;
        self.notify(Notice::success("Parameters updated"));
        Ok(())
    }
}
