//! pb-graph: block-diagram model for propbench.
//!
//! Provides:
//! - The static block catalog (8 test-rig block types)
//! - Placed blocks, connections and their parameters
//! - The graph store that enforces connection rules on every mutation
//! - Port-anchor geometry for rendering layers
//!
//! # Example
//!
//! ```
//! use pb_core::Point;
//! use pb_graph::GraphStore;
//!
//! let mut store = GraphStore::new();
//! let battery = store.place_block("battery", Point::new(0.0, 0.0)).unwrap().id;
//! let esc = store.place_block("esc", Point::new(200.0, 0.0)).unwrap().id;
//! store.connect(battery, "V+", esc, "Battery+").unwrap();
//!
//! assert_eq!(store.blocks().len(), 2);
//! assert_eq!(store.connections().len(), 1);
//! ```

pub mod catalog;
pub mod error;
pub mod geometry;
pub mod model;
pub mod params;
pub mod store;
pub mod validate;

// Re-exports for ergonomics
pub use catalog::{BlockDefinition, BlockType, definition, definitions, lookup};
pub use error::{CatalogError, GraphError, GraphResult};
pub use geometry::{Segment, connection_segment, port_anchor};
pub use model::{Connection, PlacedBlock, PortSide};
pub use params::{ParamValue, Params};
pub use store::GraphStore;
pub use validate::check_invariants;
