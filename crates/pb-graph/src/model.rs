//! Placed blocks, ports and connections.

use std::fmt;

use pb_core::{BlockId, ConnectionId, Point};
use serde::{Deserialize, Serialize};

use crate::catalog::{BlockDefinition, BlockType};
use crate::params::Params;

/// Which side of a block a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortSide {
    /// Left edge, accepts at most one incoming connection.
    Input,
    /// Right edge, may fan out.
    Output,
}

impl fmt::Display for PortSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSide::Input => f.write_str("input"),
            PortSide::Output => f.write_str("output"),
        }
    }
}

/// A block instance on the canvas.
///
/// Definition fields are copied when the block is placed; `params` is owned
/// by this instance and edited independently of every other block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedBlock {
    pub id: BlockId,
    pub block_type: BlockType,
    pub name: String,
    pub icon_ref: String,
    pub color: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub params: Params,
    pub position: Point,
}

impl PlacedBlock {
    /// Instantiate a definition at a position.
    pub fn from_definition(id: BlockId, def: &BlockDefinition, position: Point) -> Self {
        Self {
            id,
            block_type: def.block_type,
            name: def.name.clone(),
            icon_ref: def.icon_ref.clone(),
            color: def.color.clone(),
            inputs: def.inputs.clone(),
            outputs: def.outputs.clone(),
            params: def.default_params.clone(),
            position,
        }
    }

    /// Ordered port names on one side.
    pub fn ports(&self, side: PortSide) -> &[String] {
        match side {
            PortSide::Input => &self.inputs,
            PortSide::Output => &self.outputs,
        }
    }

    /// Position of a port within its side's ordered list.
    pub fn port_index(&self, side: PortSide, port: &str) -> Option<usize> {
        self.ports(side).iter().position(|p| p == port)
    }

    pub fn has_port(&self, side: PortSide, port: &str) -> bool {
        self.port_index(side, port).is_some()
    }
}

/// A directed edge from one block's output port to another block's input port.
///
/// Ports are bound by name so the edge stays meaningful if a renderer reorders anchors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub from_block: BlockId,
    pub from_port: String,
    pub to_block: BlockId,
    pub to_port: String,
}

impl Connection {
    /// True if either endpoint is `block`.
    pub fn touches(&self, block: BlockId) -> bool {
        self.from_block == block || self.to_block == block
    }

    /// True if this edge lands on the given input port.
    pub fn targets(&self, block: BlockId, port: &str) -> bool {
        self.to_block == block && self.to_port == port
    }
}
