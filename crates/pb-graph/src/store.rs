//! The live graph: placed blocks and the connections between their ports.

use pb_core::{BlockId, ConnectionId, IdAllocator, Point};
use tracing::debug;

use crate::catalog;
use crate::error::{GraphError, GraphResult};
use crate::model::{Connection, PlacedBlock, PortSide};
use crate::params::{Params, coerce_all};

/// Offset applied to a duplicated block, on both axes.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Owns every placed block and connection of one editor session.
///
/// All mutations validate first and only then touch the store, so a failed
/// call never leaves partial changes behind. Blocks and connections keep
/// insertion order (the presentation layer draws them in that order).
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    blocks: Vec<PlacedBlock>,
    connections: Vec<Connection>,
    block_ids: IdAllocator<BlockId>,
    connection_ids: IdAllocator<ConnectionId>,
}

impl GraphStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All placed blocks, in placement order.
    pub fn blocks(&self) -> &[PlacedBlock] {
        &self.blocks
    }

    /// All connections, in creation order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn block(&self, id: BlockId) -> Option<&PlacedBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// Connections with `block` as either endpoint.
    pub fn connections_of(&self, block: BlockId) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| c.touches(block))
    }

    /// The connection feeding an input port, if any.
    pub fn incoming(&self, to_block: BlockId, to_port: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.targets(to_block, to_port))
    }

    /// Number of placed blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn block_mut(&mut self, id: BlockId) -> GraphResult<&mut PlacedBlock> {
        self.blocks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| GraphError::block_not_found(id))
    }

    fn require_block(&self, id: BlockId) -> GraphResult<&PlacedBlock> {
        self.block(id).ok_or_else(|| GraphError::block_not_found(id))
    }

    fn push_block(&mut self, block: PlacedBlock) -> &PlacedBlock {
        let idx = self.blocks.len();
        self.blocks.push(block);
        &self.blocks[idx]
    }

    /// Instantiate a catalog definition at `position` (floored at the origin).
    pub fn place_block(&mut self, block_type: &str, position: Point) -> GraphResult<&PlacedBlock> {
        let def = catalog::lookup(block_type)?;
        let id = self.block_ids.allocate();
        let position = position.clamp_non_negative();
        debug!(%id, %block_type, x = position.x, y = position.y, "place block");
        Ok(self.push_block(PlacedBlock::from_definition(id, def, position)))
    }

    /// Copy a block (params included) to a new id, offset down and right.
    ///
    /// Connections of the source block are not copied.
    pub fn duplicate_block(&mut self, id: BlockId) -> GraphResult<&PlacedBlock> {
        let mut copy = self.require_block(id)?.clone();
        copy.id = self.block_ids.allocate();
        copy.position = copy
            .position
            .offset(DUPLICATE_OFFSET, DUPLICATE_OFFSET)
            .clamp_non_negative();
        debug!(source = %id, copy = %copy.id, "duplicate block");
        Ok(self.push_block(copy))
    }

    /// Move a block. Coordinates are floored at zero; no other clamping.
    pub fn move_block(&mut self, id: BlockId, position: Point) -> GraphResult<()> {
        let block = self.block_mut(id)?;
        block.position = position.clamp_non_negative();
        Ok(())
    }

    /// Replace a block's whole parameter map.
    ///
    /// Text values that parse as numbers are stored as numbers.
    pub fn update_params(&mut self, id: BlockId, params: Params) -> GraphResult<()> {
        let block = self.block_mut(id)?;
        block.params = coerce_all(params);
        debug!(%id, count = block.params.len(), "update params");
        Ok(())
    }

    /// Remove a block and every connection touching it.
    ///
    /// Returns the connections removed by the cascade.
    pub fn delete_block(&mut self, id: BlockId) -> GraphResult<Vec<Connection>> {
        let idx = self
            .blocks
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| GraphError::block_not_found(id))?;
        self.blocks.remove(idx);

        let (removed, kept): (Vec<Connection>, Vec<Connection>) = self
            .connections
            .drain(..)
            .partition(|c| c.touches(id));
        self.connections = kept;

        debug!(%id, cascaded = removed.len(), "delete block");
        Ok(removed)
    }

    /// Connect `from_block.from_port` (an output) to `to_block.to_port` (an input).
    ///
    /// Checks, in order: self-loop, both blocks exist, port sides, and that the
    /// target input is free.
    pub fn connect(
        &mut self,
        from_block: BlockId,
        from_port: &str,
        to_block: BlockId,
        to_port: &str,
    ) -> GraphResult<&Connection> {
        if from_block == to_block {
            return Err(GraphError::SelfLoop { block: from_block });
        }

        let source = self.require_block(from_block)?;
        let target = self.require_block(to_block)?;

        if !source.has_port(PortSide::Output, from_port) {
            return Err(GraphError::InvalidPort {
                block: from_block,
                port: from_port.to_string(),
                side: PortSide::Output,
            });
        }
        if !target.has_port(PortSide::Input, to_port) {
            return Err(GraphError::InvalidPort {
                block: to_block,
                port: to_port.to_string(),
                side: PortSide::Input,
            });
        }
        if self.incoming(to_block, to_port).is_some() {
            return Err(GraphError::PortOccupied {
                block: to_block,
                port: to_port.to_string(),
            });
        }

        let id = self.connection_ids.allocate();
        debug!(%id, %from_block, from_port, %to_block, to_port, "connect");
        let idx = self.connections.len();
        self.connections.push(Connection {
            id,
            from_block,
            from_port: from_port.to_string(),
            to_block,
            to_port: to_port.to_string(),
        });
        Ok(&self.connections[idx])
    }

    /// Remove one connection.
    pub fn disconnect(&mut self, id: ConnectionId) -> GraphResult<Connection> {
        let idx = self
            .connections
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| GraphError::NotFound {
                what: "Connection",
                id: id.to_string(),
            })?;
        debug!(%id, "disconnect");
        Ok(self.connections.remove(idx))
    }
}
