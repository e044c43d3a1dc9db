//! Port-anchor geometry.
//!
//! Anchors are where wires attach. Inputs sit on the left edge of a block and
//! outputs on the right edge; the Nth port of a side sits a fixed spacing
//! below the previous one.

use pb_core::Point;

use crate::model::{Connection, PlacedBlock, PortSide};
use crate::store::GraphStore;

/// Block width in canvas pixels (output anchors sit on the right edge).
pub const BLOCK_WIDTH: f64 = 140.0;

/// Vertical offset of the first port below the block's top edge.
pub const FIRST_PORT_OFFSET: f64 = 40.0;

/// Vertical distance between consecutive ports on one side.
pub const PORT_SPACING: f64 = 18.0;

/// A straight wire between two anchors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// Anchor of the port at `index` on one side of a block positioned at `origin`.
pub fn anchor_at(origin: Point, side: PortSide, index: usize) -> Point {
    let x = match side {
        PortSide::Input => origin.x,
        PortSide::Output => origin.x + BLOCK_WIDTH,
    };
    Point::new(x, origin.y + FIRST_PORT_OFFSET + PORT_SPACING * index as f64)
}

/// Anchor of a named port, or `None` if the block has no such port on that side.
pub fn port_anchor(block: &PlacedBlock, side: PortSide, port: &str) -> Option<Point> {
    block
        .port_index(side, port)
        .map(|index| anchor_at(block.position, side, index))
}

/// Wire endpoints for a connection, resolved from the current block positions.
pub fn connection_segment(store: &GraphStore, conn: &Connection) -> Option<Segment> {
    let from = store.block(conn.from_block)?;
    let to = store.block(conn.to_block)?;
    Some(Segment {
        from: port_anchor(from, PortSide::Output, &conn.from_port)?,
        to: port_anchor(to, PortSide::Input, &conn.to_port)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_follow_port_order() {
        let origin = Point::new(100.0, 200.0);
        assert_eq!(anchor_at(origin, PortSide::Input, 0), Point::new(100.0, 240.0));
        assert_eq!(anchor_at(origin, PortSide::Output, 2), Point::new(240.0, 276.0));
    }

    #[test]
    fn segment_tracks_block_moves() {
        let mut store = GraphStore::new();
        let motor = store.place_block("motor", Point::new(0.0, 0.0)).unwrap().id;
        let logger = store.place_block("logger", Point::new(300.0, 0.0)).unwrap().id;
        let conn = store.connect(motor, "Temp", logger, "Data2").unwrap().clone();

        let seg = connection_segment(&store, &conn).unwrap();
        assert_eq!(seg.from, Point::new(140.0, 76.0));
        assert_eq!(seg.to, Point::new(300.0, 58.0));

        store.move_block(logger, Point::new(400.0, 100.0)).unwrap();
        let seg = connection_segment(&store, &conn).unwrap();
        assert_eq!(seg.to, Point::new(400.0, 158.0));
    }
}
