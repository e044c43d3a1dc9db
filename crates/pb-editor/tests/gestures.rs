use pb_core::{BlockId, Point};
use pb_editor::{EditorError, InteractionController, Notice, NoticeLevel};
use pb_graph::{GraphError, GraphStore, ParamValue, Params, PortSide, check_invariants};
use proptest::prelude::*;

fn drop_block(
    ctl: &mut InteractionController,
    graph: &mut GraphStore,
    block_type: &str,
    at: Point,
) -> BlockId {
    ctl.begin_palette_drag(block_type);
    ctl.drop_on_canvas(graph, at).unwrap().unwrap()
}

fn wire(
    ctl: &mut InteractionController,
    graph: &mut GraphStore,
    from: (BlockId, &str),
    to: (BlockId, &str),
) -> Result<pb_core::ConnectionId, EditorError> {
    ctl.pointer_down_on_port(graph, from.0, from.1, PortSide::Output)?;
    ctl.pointer_up_on_port(graph, to.0, to.1, PortSide::Input)
}

#[test]
fn wire_battery_to_esc_by_gestures() {
    let mut graph = GraphStore::new();
    let mut ctl = InteractionController::new();

    let battery = drop_block(&mut ctl, &mut graph, "battery", Point::new(100.0, 100.0));
    let esc = drop_block(&mut ctl, &mut graph, "esc", Point::new(400.0, 100.0));
    assert_eq!(ctl.selection(), Some(esc));

    wire(&mut ctl, &mut graph, (battery, "V+"), (esc, "Battery+")).unwrap();
    let err = wire(&mut ctl, &mut graph, (battery, "V-"), (esc, "Battery+")).unwrap_err();
    assert!(matches!(
        err,
        EditorError::Graph(GraphError::PortOccupied { .. })
    ));

    let notices = ctl.drain_notices();
    let messages: Vec<&str> = notices.iter().map(|n| n.message.as_str()).collect();
    assert_eq!(
        messages,
        [
            "Added Battery block",
            "Added ESC block",
            "Connection created",
            "Port already connected",
        ]
    );
    assert_eq!(notices[3].level, NoticeLevel::Error);
    assert_eq!(graph.connections().len(), 1);
    assert!(ctl.pending_connection().is_none());
}

#[test]
fn self_connection_is_refused_with_notice() {
    let mut graph = GraphStore::new();
    let mut ctl = InteractionController::new();
    let filter = drop_block(&mut ctl, &mut graph, "filter", Point::new(200.0, 200.0));
    ctl.drain_notices();

    let err = wire(&mut ctl, &mut graph, (filter, "Out"), (filter, "In")).unwrap_err();
    assert_eq!(err, EditorError::Graph(GraphError::SelfLoop { block: filter }));
    assert!(ctl.drain_notices()[0].is_error());
}

#[test]
fn duplicate_selects_copy_with_own_params() {
    let mut graph = GraphStore::new();
    let mut ctl = InteractionController::new();
    let motor = drop_block(&mut ctl, &mut graph, "motor", Point::new(100.0, 100.0));

    let copy = ctl.duplicate_block(&mut graph, motor).unwrap();
    assert_eq!(ctl.selection(), Some(copy));
    assert_eq!(
        graph.block(copy).unwrap().position,
        graph.block(motor).unwrap().position.offset(20.0, 20.0)
    );

    let mut params: Params = graph.block(copy).unwrap().params.clone();
    params.insert("kv".into(), ParamValue::Text("1200".into()));
    ctl.update_params(&mut graph, copy, params).unwrap();

    assert_eq!(
        graph.block(copy).unwrap().params["kv"],
        ParamValue::Number(1200.0)
    );
    assert_ne!(
        graph.block(motor).unwrap().params["kv"],
        ParamValue::Number(1200.0)
    );
    assert!(ctl.drain_notices().contains(&Notice::success("Block duplicated")));
}

#[test]
fn delete_cascades_and_disconnect_reports() {
    let mut graph = GraphStore::new();
    let mut ctl = InteractionController::new();
    let imu = drop_block(&mut ctl, &mut graph, "imu", Point::new(100.0, 100.0));
    let filter = drop_block(&mut ctl, &mut graph, "filter", Point::new(300.0, 100.0));
    let logger = drop_block(&mut ctl, &mut graph, "logger", Point::new(500.0, 100.0));

    let first = wire(&mut ctl, &mut graph, (imu, "AccelZ"), (filter, "In")).unwrap();
    wire(&mut ctl, &mut graph, (filter, "Out"), (logger, "Data1")).unwrap();
    wire(&mut ctl, &mut graph, (imu, "GyroX"), (logger, "Data2")).unwrap();

    let removed = ctl.disconnect(&mut graph, first).unwrap();
    assert_eq!(removed.to_block, filter);

    let cascaded = ctl.delete_block(&mut graph, logger).unwrap();
    assert_eq!(cascaded.len(), 2);
    assert!(graph.connections().is_empty());
    check_invariants(&graph).unwrap();
}

#[test]
fn stale_ids_are_reported_as_error_notices() {
    let mut graph = GraphStore::new();
    let mut ctl = InteractionController::new();
    let imu = drop_block(&mut ctl, &mut graph, "imu", Point::new(100.0, 100.0));
    let filter = drop_block(&mut ctl, &mut graph, "filter", Point::new(300.0, 100.0));
    let conn = wire(&mut ctl, &mut graph, (imu, "AccelX"), (filter, "In")).unwrap();
    ctl.disconnect(&mut graph, conn).unwrap();
    ctl.delete_block(&mut graph, filter).unwrap();
    ctl.drain_notices();

    assert!(matches!(
        ctl.disconnect(&mut graph, conn),
        Err(EditorError::Graph(GraphError::NotFound { .. }))
    ));
    assert!(ctl.delete_block(&mut graph, filter).is_err());
    assert!(ctl.duplicate_block(&mut graph, filter).is_err());
    assert!(ctl.pointer_down_on_block(&graph, filter, Point::ORIGIN).is_err());

    let notices = ctl.drain_notices();
    assert_eq!(notices.len(), 4);
    for notice in &notices {
        assert_eq!(notice.level, NoticeLevel::Error);
    }
    assert_eq!(graph.blocks().len(), 1);
    check_invariants(&graph).unwrap();
}

#[derive(Debug, Clone)]
enum Gesture {
    Drop(usize, f64, f64),
    Grab(usize, f64, f64),
    Move(f64, f64),
    Release,
    StartWire(usize, usize),
    EndWire(usize, usize),
    Delete(usize),
    Duplicate(usize),
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

fn gesture() -> impl Strategy<Value = Gesture> {
    let coord = -50.0f64..800.0;
    prop_oneof![
        (0usize..8, coord.clone(), coord.clone()).prop_map(|(k, x, y)| Gesture::Drop(k, x, y)),
        (0usize..16, coord.clone(), coord.clone()).prop_map(|(b, x, y)| Gesture::Grab(b, x, y)),
        (coord.clone(), coord).prop_map(|(x, y)| Gesture::Move(x, y)),
        Just(Gesture::Release),
        (0usize..16, 0usize..8).prop_map(|(b, p)| Gesture::StartWire(b, p)),
        (0usize..16, 0usize..8).prop_map(|(b, p)| Gesture::EndWire(b, p)),
        (0usize..16).prop_map(Gesture::Delete),
        (0usize..16).prop_map(Gesture::Duplicate),
    ]
}

fn nth_block(graph: &GraphStore, n: usize) -> Option<BlockId> {
    let blocks = graph.blocks();
    (!blocks.is_empty()).then(|| blocks[n % blocks.len()].id)
}

fn nth_port(graph: &GraphStore, block: BlockId, side: PortSide, n: usize) -> Option<String> {
    let ports = graph.block(block)?.ports(side);
    (!ports.is_empty()).then(|| ports[n % ports.len()].clone())
}

proptest! {
    #[test]
    fn gestures_never_break_graph_invariants(gestures in prop::collection::vec(gesture(), 1..60)) {
        let mut graph = GraphStore::new();
        let mut ctl = InteractionController::new();

        for g in gestures {
            // Individual gestures may be rejected; the graph must stay valid.
            match g {
                Gesture::Drop(k, x, y) => {
                    ctl.begin_palette_drag(TYPES[k]);
                    let _ = ctl.drop_on_canvas(&mut graph, Point::new(x, y));
                }
                Gesture::Grab(b, x, y) => {
                    if let Some(id) = nth_block(&graph, b) {
                        let _ = ctl.pointer_down_on_block(&graph, id, Point::new(x, y));
                    }
                }
                Gesture::Move(x, y) => {
                    let _ = ctl.pointer_move(&mut graph, Point::new(x, y));
                }
                Gesture::Release => ctl.pointer_up(),
                Gesture::StartWire(b, p) => {
                    if let Some(id) = nth_block(&graph, b) {
                        if let Some(port) = nth_port(&graph, id, PortSide::Output, p) {
                            let _ = ctl.pointer_down_on_port(&graph, id, &port, PortSide::Output);
                        }
                    }
                }
                Gesture::EndWire(b, p) => {
                    if let Some(id) = nth_block(&graph, b) {
                        if let Some(port) = nth_port(&graph, id, PortSide::Input, p) {
                            let _ = ctl.pointer_up_on_port(&mut graph, id, &port, PortSide::Input);
                        }
                    }
                }
                Gesture::Delete(b) => {
                    if let Some(id) = nth_block(&graph, b) {
                        let _ = ctl.delete_block(&mut graph, id);
                    }
                }
                Gesture::Duplicate(b) => {
                    if let Some(id) = nth_block(&graph, b) {
                        let _ = ctl.duplicate_block(&mut graph, id);
                    }
                }
            }

            prop_assert!(check_invariants(&graph).is_ok());
            for block in graph.blocks() {
                prop_assert!(block.position.x >= 0.0 && block.position.y >= 0.0);
            }
            if let Some(selected) = ctl.selection() {
                prop_assert!(graph.block(selected).is_some());
            }
        }
    }
}
