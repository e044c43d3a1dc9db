//! Whole-store invariant checks.
//!
//! The store enforces these rules on every mutation; this pass re-verifies them
//! from scratch and is used by tests and by session health checks.

use std::collections::HashSet;

use pb_core::{BlockId, ConnectionId};

use crate::error::{GraphError, GraphResult};
use crate::model::PortSide;
use crate::store::GraphStore;

fn invariant(what: String) -> GraphError {
    GraphError::Invariant { what }
}

/// Verify ids are unique and every connection is well formed.
pub fn check_invariants(store: &GraphStore) -> GraphResult<()> {
    let mut block_ids: HashSet<BlockId> = HashSet::new();
    for block in store.blocks() {
        if !block_ids.insert(block.id) {
            return Err(invariant(format!("duplicate block id {}", block.id)));
        }
    }

    let mut conn_ids: HashSet<ConnectionId> = HashSet::new();
    let mut occupied: HashSet<(BlockId, &str)> = HashSet::new();
    for conn in store.connections() {
        if !conn_ids.insert(conn.id) {
            return Err(invariant(format!("duplicate connection id {}", conn.id)));
        }
        if conn.from_block == conn.to_block {
            return Err(invariant(format!("{} is a self-loop", conn.id)));
        }

        let from = store
            .block(conn.from_block)
            .ok_or_else(|| invariant(format!("{} has dangling source", conn.id)))?;
        let to = store
            .block(conn.to_block)
            .ok_or_else(|| invariant(format!("{} has dangling target", conn.id)))?;

        if !from.has_port(PortSide::Output, &conn.from_port) {
            return Err(invariant(format!(
                "{} starts at unknown output {}",
                conn.id, conn.from_port
            )));
        }
        if !to.has_port(PortSide::Input, &conn.to_port) {
            return Err(invariant(format!(
                "{} ends at unknown input {}",
                conn.id, conn.to_port
            )));
        }
        if !occupied.insert((conn.to_block, conn.to_port.as_str())) {
            return Err(invariant(format!(
                "input {}.{} has more than one incoming connection",
                conn.to_block, conn.to_port
            )));
        }
    }

    Ok(())
}
