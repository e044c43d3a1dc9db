//! Integration tests for pb-graph.

use pb_core::{BlockId, Point};
use pb_graph::{GraphError, GraphStore, PortSide, check_invariants, lookup};
use proptest::prelude::*;

#[test]
fn build_propulsion_chain() {
    // battery -> esc -> motor -> logger
    let mut store = GraphStore::new();
    let battery = store.place_block("battery", Point::new(20.0, 20.0)).unwrap().id;
    let esc = store.place_block("esc", Point::new(220.0, 20.0)).unwrap().id;
    let motor = store.place_block("motor", Point::new(420.0, 20.0)).unwrap().id;
    let logger = store.place_block("logger", Point::new(620.0, 20.0)).unwrap().id;

    store.connect(battery, "V+", esc, "Battery+").unwrap();
    store.connect(battery, "V-", esc, "Battery-").unwrap();
    store.connect(esc, "PWM", motor, "PWM").unwrap();
    store.connect(motor, "RPM", logger, "Data1").unwrap();
    store.connect(motor, "Torque", logger, "Data2").unwrap();
    store.connect(motor, "Temp", logger, "Data3").unwrap();

    assert_eq!(store.blocks().len(), 4);
    assert_eq!(store.connections().len(), 6);
    assert_eq!(store.connections_of(motor).count(), 4);
    assert_eq!(
        store.incoming(esc, "Battery+").map(|c| c.from_block),
        Some(battery)
    );
    check_invariants(&store).unwrap();
}

#[test]
fn connect_then_reconnect_same_input_is_occupied() {
    let mut store = GraphStore::new();
    let imu = store.place_block("imu", Point::ORIGIN).unwrap().id;
    let filter = store.place_block("filter", Point::ORIGIN).unwrap().id;

    store.connect(imu, "AccelX", filter, "In").unwrap();
    let err = store.connect(imu, "AccelY", filter, "In").unwrap_err();
    assert!(matches!(err, GraphError::PortOccupied { .. }));
}

#[test]
fn motor_to_missing_port_on_second_motor_is_invalid() {
    let motor_def = lookup("motor").unwrap();
    assert_eq!(motor_def.outputs, ["RPM", "Torque", "Temp"]);

    let mut store = GraphStore::new();
    let a = store.place_block("motor", Point::ORIGIN).unwrap().id;
    let b = store.place_block("motor", Point::new(200.0, 0.0)).unwrap().id;

    let err = store
        .connect(a, "RPM", b, "motorB_nonexistent_port")
        .unwrap_err();
    assert_eq!(
        err,
        GraphError::InvalidPort {
            block: b,
            port: "motorB_nonexistent_port".into(),
            side: PortSide::Input,
        }
    );
    assert!(store.connections().is_empty());
}

#[test]
fn connect_to_deleted_block_is_not_found() {
    let mut store = GraphStore::new();
    let ctrl = store.place_block("controller", Point::ORIGIN).unwrap().id;
    let act = store.place_block("actuator", Point::ORIGIN).unwrap().id;
    store.delete_block(act).unwrap();

    let err = store.connect(ctrl, "Control", act, "Command").unwrap_err();
    assert!(matches!(err, GraphError::NotFound { what: "Block", .. }));
}

#[test]
fn placed_block_serializes_with_lowercase_type() {
    let mut store = GraphStore::new();
    let block = store.place_block("esc", Point::new(5.0, 6.0)).unwrap();
    let json = serde_json::to_value(block).unwrap();
    assert_eq!(json["block_type"], "esc");
    assert_eq!(json["position"]["x"], 5.0);
    assert_eq!(json["params"]["protocol"], "DShot600");
}

const TYPES: [&str; 8] = [
    "motor",
    "esc",
    "battery",
    "imu",
    "controller",
    "actuator",
    "filter",
    "logger",
];

/// Build a graph from arbitrary placement and wiring choices.
fn random_graph(kinds: &[usize], wiring: &[(usize, usize, usize, usize)]) -> GraphStore {
    let mut store = GraphStore::new();
    let ids: Vec<BlockId> = kinds
        .iter()
        .map(|k| store.place_block(TYPES[*k], Point::ORIGIN).unwrap().id)
        .collect();
    for &(f, fp, t, tp) in wiring {
        let from = ids[f % ids.len()];
        let to = ids[t % ids.len()];
        let (from_port, to_port) = {
            let fb = store.block(from).unwrap();
            let tb = store.block(to).unwrap();
            if fb.outputs.is_empty() || tb.inputs.is_empty() {
                continue;
            }
            (
                fb.outputs[fp % fb.outputs.len()].clone(),
                tb.inputs[tp % tb.inputs.len()].clone(),
            )
        };
        // Rule violations are expected here; the store must reject them cleanly.
        let _ = store.connect(from, &from_port, to, &to_port);
    }
    store
}

proptest! {
    #[test]
    fn delete_removes_exactly_touching_connections(
        kinds in prop::collection::vec(0usize..8, 2..8),
        wiring in prop::collection::vec((0usize..16, 0usize..8, 0usize..16, 0usize..8), 0..30),
        victim in 0usize..16,
    ) {
        let mut store = random_graph(&kinds, &wiring);
        prop_assert!(check_invariants(&store).is_ok());

        let victim = store.blocks()[victim % store.blocks().len()].id;
        let before = store.connections().len();
        let touching = store.connections_of(victim).count();

        let removed = store.delete_block(victim).unwrap();
        prop_assert_eq!(removed.len(), touching);
        prop_assert_eq!(store.connections().len(), before - touching);
        prop_assert!(store.connections().iter().all(|c| !c.touches(victim)));
        prop_assert!(check_invariants(&store).is_ok());
    }

    #[test]
    fn self_loop_always_rejected(kind in 0usize..8, p in "[A-Za-z+-]{1,8}", q in "[A-Za-z+-]{1,8}") {
        let mut store = GraphStore::new();
        let id = store.place_block(TYPES[kind], Point::ORIGIN).unwrap().id;
        let err = store.connect(id, &p, id, &q).unwrap_err();
        prop_assert_eq!(err, GraphError::SelfLoop { block: id });
    }
}
