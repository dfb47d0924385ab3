/*!

A random-walk routing algorithm: no table, no convergence. Every
cycle, a cube holding a packet not addressed to itself forwards it out
one uniformly-random *connected* face, until it happens to land on its
destination or exhausts its hop budget.

*/

use log::warn;
use rand::seq::SliceRandom;

use crate::algorithm::{RobotAlgorithm, RoutingAlgorithm};
use crate::cube::RoutingCube;
use crate::direction::Direction;
use crate::face::Packet;
use crate::id::Id;
use crate::robot::Robot;

/// Upper bound on how many hops a packet may take before it is dropped
/// as unreachable. Without a bound an unlucky walk on a sparse lattice
/// could wander indefinitely.
const DEFAULT_HOP_BUDGET: u32 = 64;

struct Data {
	dest: Id,
	payload: Packet,
	hops_remaining: u32,
}

fn connected_directions(cube: &RoutingCube) -> Vec<Direction> {
	Direction::ALL
		.into_iter()
		.filter(|&d| cube.connected_in_direction(d))
		.collect()
}

pub struct RandomWalkRouting;

impl RoutingAlgorithm for RandomWalkRouting {
	fn power_on(&self, _cube: &mut RoutingCube) {}

	fn route(&self, cube: &mut RoutingCube) {
		let Some((pkt, _from)) = cube.get_packet() else {
			return;
		};
		let Ok(mut data) = pkt.downcast::<Data>() else {
			warn!("{:?}: unrecognized random-walk packet type", cube.id());
			return;
		};
		if data.dest == *cube.id() {
			cube.stats.correctly_routed_pkts_this_cycle += 1;
			return;
		}
		if data.hops_remaining == 0 {
			cube.stats.record_dropped();
			return;
		}
		data.hops_remaining -= 1;
		let choices = connected_directions(cube);
		match choices.choose(&mut rand::thread_rng()) {
			Some(&d) => {
				cube.send_packet(d, data);
			}
			None => cube.stats.record_dropped(),
		}
	}

	fn send_packet(&self, cube: &mut RoutingCube, dest_id: Id, data: Packet) {
		let pkt = Data {
			dest: dest_id,
			payload: data,
			hops_remaining: DEFAULT_HOP_BUDGET,
		};
		if pkt.dest == *cube.id() {
			cube.stats.correctly_routed_pkts_this_cycle += 1;
			return;
		}
		let choices = connected_directions(cube);
		match choices.choose(&mut rand::thread_rng()) {
			Some(&d) => cube.send_packet(d, Box::new(pkt)),
			None => cube.stats.record_dropped(),
		};
	}
}

struct RobotState {
	step: u64,
}

pub struct RandomWalkRobot;

impl RobotAlgorithm for RandomWalkRobot {
	fn power_on(&self, robot: &mut Robot) {
		robot.cube.data = Some(Box::new(RobotState { step: 0 }));
	}

	fn step(&self, robot: &mut Robot) {
		let should_send = {
			let state = robot
				.cube
				.data
				.get_or_insert_with(|| Box::new(RobotState { step: 0 }))
				.downcast_mut::<RobotState>()
				.expect("robot.cube.data holds a foreign type");
			let should_send = state.step % 2 == 0;
			state.step += 1;
			should_send
		};

		if should_send {
			let dest = Id::Int(rand::random::<u8>() as i64);
			RandomWalkRouting.send_packet(&mut robot.cube, dest, Box::new(()));
		}
	}

	fn send_packet(&self, robot: &mut Robot, dest_id: Id, data: Packet) {
		RandomWalkRouting.send_packet(&mut robot.cube, dest_id, data);
	}
}
