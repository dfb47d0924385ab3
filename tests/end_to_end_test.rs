use routingcubes_lib::algorithms::bellman_ford::{BellmanFordData, BellmanFordRobot, BellmanFordRouting};
use routingcubes_lib::algorithms::template::{TemplateRobotAlgorithm, TemplateRoutingAlgorithm};
use routingcubes_lib::direction::Direction;
use routingcubes_lib::error::Error;
use routingcubes_lib::grid::NetworkGrid;
use routingcubes_lib::id::Id;
use routingcubes_lib::presenter::Presenter;
use routingcubes_lib::recipe::{Command, Recipe};

fn template_grid() -> NetworkGrid {
	NetworkGrid::new(Box::new(TemplateRoutingAlgorithm), Box::new(TemplateRobotAlgorithm))
}

fn bmf_grid() -> NetworkGrid {
	NetworkGrid::new(Box::new(BellmanFordRouting), Box::new(BellmanFordRobot::new()))
}

/// Scenario 1: echo on the template algorithm. A packet injected outbound
/// WEST at the far end of a 3-node chain bounces off the dead end at
/// (0,0,0) and comes straight back.
#[test]
fn template_chain_bounces_a_packet_off_the_dead_end() {
	let mut g = template_grid();
	g.add_node(0, 0, 0, Some(Id::Int(0))).unwrap();
	g.add_node(1, 0, 0, Some(Id::Int(1))).unwrap();
	g.add_node(2, 0, 0, Some(Id::Int(2))).unwrap();

	g.get_node_mut(2, 0, 0).unwrap().send_packet(Direction::West, Box::new("Hello".to_string()));

	g.step();
	assert_eq!(g.get_node(1, 0, 0).unwrap().queue_len(), 1);

	g.step();
	assert_eq!(g.get_node(0, 0, 0).unwrap().queue_len(), 1);

	g.step();
	let (pkt, from) = g.get_node_mut(1, 0, 0).unwrap().get_packet().unwrap();
	assert_eq!(from, Direction::West);
	assert_eq!(*pkt.downcast_ref::<String>().unwrap(), "Hello");
}

/// Scenario 2: BMF converges on a 2-node line and each side's table routes
/// to the other at cost 1, after which no further distance vectors need
/// to be exchanged (the cube's data carries no further-update marker other
/// than its stable `received`/`pkts_*` counters, which stay flat).
#[test]
fn bmf_converges_on_a_two_node_line() {
	let mut g = bmf_grid();
	g.add_node(0, 0, 0, Some(Id::Int(0))).unwrap();
	g.add_node(1, 0, 0, Some(Id::Int(1))).unwrap();

	// `route` dequeues at most one packet per cycle, so the neighbor
	// handshake and its distance-vector exchange can take a few more
	// cycles to fully drain than a full-queue-drain would need.
	for _ in 0..16 {
		g.step();
	}

	g.send_packet(Box::new(7i32), &Id::Int(0), Id::Int(1)).unwrap();
	g.step();
	g.step();

	let data = g
		.get_node(1, 0, 0)
		.unwrap()
		.data
		.as_ref()
		.and_then(|d| d.downcast_ref::<BellmanFordData>())
		.unwrap();
	assert_eq!(data.pkts_received, 1);
	assert_eq!(data.pkts_dropped, 0);
}

/// Scenario 3: BMF routes across an L-shaped 3-node path, via the corner
/// node, with exactly one correctly-routed delivery and no drops.
#[test]
fn bmf_routes_across_an_l_shaped_path() {
	let mut g = bmf_grid();
	g.add_node(0, 0, 0, Some(Id::Int(0))).unwrap();
	g.add_node(1, 0, 0, Some(Id::Int(1))).unwrap();
	g.add_node(1, 1, 0, Some(Id::Int(2))).unwrap();

	// The corner node has two neighbors, so under one-packet-per-cycle
	// routing its handshake/distance-vector backlog takes longer to drain
	// than a full-queue-drain settle would.
	for _ in 0..40 {
		g.step();
	}

	g.send_packet(Box::new(()), &Id::Int(0), Id::Int(2)).unwrap();
	for _ in 0..3 {
		g.step();
	}

	assert_eq!(g.get_node(1, 1, 0).unwrap().stats.num_pkts_dropped, 0);
	let data = g
		.get_node(1, 1, 0)
		.unwrap()
		.data
		.as_ref()
		.and_then(|d| d.downcast_ref::<BellmanFordData>())
		.unwrap();
	assert_eq!(data.pkts_received, 1);
}

/// Scenario 4: a passive cube that never dequeues drops whatever exceeds
/// its queue capacity. The exact MAX_Q_LEN = 4 / 10-sends variant from the
/// spec's literal scenario is exercised as a unit test in `cube.rs`, where
/// the capacity override is available; here the grid-level equivalent
/// checks the same law at the crate's default capacity.
#[test]
fn queue_overflow_drops_what_it_cannot_hold() {
	let mut g = template_grid();
	g.add_node(0, 0, 0, Some(Id::Int(0))).unwrap();
	g.add_node(1, 0, 0, Some(Id::Int(1))).unwrap();

	let capacity = routingcubes_lib::cube::MAX_Q_LEN;
	for _ in 0..(capacity + 6) {
		g.get_node_mut(0, 0, 0).unwrap().send_packet(Direction::East, Box::new(()));
		g.get_node_mut(1, 0, 0).unwrap().flush();
	}

	let receiver = g.get_node(1, 0, 0).unwrap();
	assert_eq!(receiver.stats.num_pkts_received, (capacity + 6) as u64);
	assert_eq!(receiver.stats.current_q_len, capacity as u64);
	assert_eq!(receiver.stats.num_pkts_dropped, 6);
}

/// Scenario 5: `LOOP 2` around an add/remove pair runs the body `2 + 1 = 3`
/// times in total, leaving only the node added before the loop.
#[test]
fn recipe_loop_runs_n_plus_one_times() {
	let mut recipe = Recipe::new(vec![
		Command::AddNode { x: 0, y: 0, z: 0, id: None },
		Command::Loop(2),
		Command::AddNode { x: 1, y: 0, z: 0, id: None },
		Command::RemoveNodeAt { x: 1, y: 0, z: 0 },
		Command::EndLoop,
	]);
	let mut g = template_grid();
	let mut iterations = 0;
	while recipe.is_running() {
		let before = g.num_nodes();
		recipe.execute_next(&mut g).unwrap();
		if g.num_nodes() > before {
			iterations += 1;
		}
	}
	assert_eq!(iterations, 3);
	assert_eq!(g.num_nodes(), 1);
	assert!(g.get_node(0, 0, 0).is_some());
	assert!(g.get_node(1, 0, 0).is_none());
}

/// Scenario 6: `PAUSE` gates `Presenter::run` until `resume()` is called.
#[test]
fn pause_gates_presenter_run_until_resumed() {
	let mut presenter = Presenter::new(Box::new(TemplateRoutingAlgorithm), Box::new(TemplateRobotAlgorithm));
	presenter.set_recipe(Recipe::new(vec![
		Command::AddNode { x: 0, y: 0, z: 0, id: None },
		Command::Pause,
		Command::AddNode { x: 1, y: 0, z: 0, id: None },
	]));

	presenter.run(100, false).unwrap();
	assert_eq!(presenter.grid().num_nodes(), 1);
	assert!(presenter.recipe().is_paused());

	presenter.resume();
	presenter.run(100, false).unwrap();
	assert_eq!(presenter.grid().num_nodes(), 2);
}

/// Recipe tokens that don't resolve to a live node surface as structural
/// errors rather than panicking.
#[test]
fn send_by_position_from_an_absent_node_is_a_structural_error() {
	let mut recipe = Recipe::new(vec![Command::SendByPosition {
		data: Id::Int(1),
		src: (0, 0, 0),
		dest: (1, 0, 0),
	}]);
	let mut g = template_grid();
	let err = recipe.execute_next(&mut g).unwrap_err();
	assert!(matches!(err, Error::NodeNotFound((0, 0, 0))));
}
