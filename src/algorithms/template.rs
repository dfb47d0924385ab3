/*!

The reference pass-through algorithm: whatever arrives on one face is
retransmitted out the opposite face, same as light through a pane of
glass — and reflected back the way it came when the straight-through
face has no neighbor wired, same as light off a mirrored dead end. No
addressing, no convergence — useful as a smoke test and as a worked
example of the two traits.

*/

use std::any::Any;

use log::trace;
use rand::Rng;

use crate::algorithm::{RobotAlgorithm, RoutingAlgorithm};
use crate::cube::RoutingCube;
use crate::direction::Direction;
use crate::face::Packet;
use crate::id::Id;
use crate::robot::Robot;

pub struct TemplateRoutingAlgorithm;

impl RoutingAlgorithm for TemplateRoutingAlgorithm {
	fn power_on(&self, _cube: &mut RoutingCube) {}

	fn route(&self, cube: &mut RoutingCube) {
		if let Some((pkt, from)) = cube.get_packet() {
			let straight = from.opposite();
			if cube.connected_in_direction(straight) {
				trace!("{:?} passing a packet from {:?} straight through", cube.id(), from);
				cube.send_packet(straight, pkt);
			} else {
				trace!("{:?} reflecting a packet from {:?} off a dead end", cube.id(), from);
				cube.send_packet(from, pkt);
			}
		}
	}

	fn send_packet(&self, cube: &mut RoutingCube, _dest_id: Id, data: Packet) {
		broadcast_or_send_one(cube, data);
	}
}

/// Originating a packet has no arrival face to take the opposite of, so
/// the template broadcasts it out every connected face instead. Packet
/// payloads are opaque `Box<dyn Any>` and cannot in general be cloned to
/// fan out identical copies; recipe-originated payloads are always an
/// `Id` (see `crate::recipe`), which is `Clone`, so that case is
/// broadcast properly. Any other payload type falls back to a single
/// send on the first connected face.
fn broadcast_or_send_one(cube: &mut RoutingCube, data: Packet) {
	match data.downcast::<Id>() {
		Ok(id) => {
			for d in Direction::ALL {
				if cube.connected_in_direction(d) {
					cube.send_packet(d, Box::new((*id).clone()));
				}
			}
		}
		Err(data) => {
			for d in Direction::ALL {
				if cube.connected_in_direction(d) {
					cube.send_packet(d, data);
					return;
				}
			}
		}
	}
}

/// Per-robot counter, installed by `power_on`.
struct RobotState {
	step: u64,
}

/// Every ten steps, originates a packet carrying a random `i32` out of
/// a random connected face.
pub struct TemplateRobotAlgorithm;

impl RobotAlgorithm for TemplateRobotAlgorithm {
	fn power_on(&self, robot: &mut Robot) {
		robot.cube.data = Some(Box::new(RobotState { step: 0 }));
	}

	fn step(&self, robot: &mut Robot) {
		let connected: Vec<Direction> = Direction::ALL
			.into_iter()
			.filter(|&d| robot.cube.connected_in_direction(d))
			.collect();

		let should_send = {
			let state = robot
				.cube
				.data
				.get_or_insert_with(|| Box::new(RobotState { step: 0 }))
				.downcast_mut::<RobotState>()
				.expect("robot.cube.data holds a foreign type");
			let should_send = state.step % 10 == 0;
			state.step += 1;
			should_send
		};

		if should_send && !connected.is_empty() {
			let d = connected[rand::thread_rng().gen_range(0..connected.len())];
			let payload: i32 = rand::thread_rng().gen_range(0..=100);
			robot.cube.send_packet(d, Box::new(payload) as Box<dyn Any>);
		}
	}

	fn send_packet(&self, robot: &mut Robot, _dest_id: Id, data: Packet) {
		broadcast_or_send_one(&mut robot.cube, data);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn wire(a: &mut RoutingCube, d: Direction, b: &mut RoutingCube) {
		let a_face = a.inbound_handle(d);
		let b_face = b.inbound_handle(d.opposite());
		a.connect(d, &b_face);
		b.connect(d.opposite(), &a_face);
	}

	#[test]
	fn passes_through_to_the_far_side_of_a_chain() {
		let algo = TemplateRoutingAlgorithm;
		let mut a = RoutingCube::new((0, 0, 0), Id::Int(0));
		let mut b = RoutingCube::new((1, 0, 0), Id::Int(1));
		let mut c = RoutingCube::new((2, 0, 0), Id::Int(2));
		wire(&mut a, Direction::East, &mut b);
		wire(&mut b, Direction::East, &mut c);

		a.send_packet(Direction::East, Box::new(7i32));
		b.flush();
		algo.route(&mut b);
		b.flush();
		c.flush();

		let (pkt, from) = c.get_packet().unwrap();
		assert_eq!(from, Direction::West);
		assert_eq!(*pkt.downcast_ref::<i32>().unwrap(), 7);
	}

	#[test]
	fn reflects_off_a_dead_end() {
		let algo = TemplateRoutingAlgorithm;
		let mut a = RoutingCube::new((0, 0, 0), Id::Int(0));
		let mut b = RoutingCube::new((1, 0, 0), Id::Int(1));
		wire(&mut a, Direction::East, &mut b);

		// b sends west into a; a has no west neighbor, so it must bounce
		// the packet back east instead of dropping it.
		b.send_packet(Direction::West, Box::new("hello".to_string()));
		a.flush();
		algo.route(&mut a);
		assert_eq!(a.stats.num_pkts_dropped_this_cycle, 0);

		b.flush();
		let (pkt, from) = b.get_packet().unwrap();
		assert_eq!(from, Direction::West);
		assert_eq!(*pkt.downcast_ref::<String>().unwrap(), "hello");
	}

	#[test]
	fn send_packet_broadcasts_id_payloads_to_every_connected_face() {
		let algo = TemplateRoutingAlgorithm;
		let mut centre = RoutingCube::new((0, 0, 0), Id::Int(0));
		let mut east = RoutingCube::new((1, 0, 0), Id::Int(1));
		let mut west = RoutingCube::new((-1, 0, 0), Id::Int(2));
		wire(&mut centre, Direction::East, &mut east);
		wire(&mut centre, Direction::West, &mut west);

		algo.send_packet(&mut centre, Id::Int(99), Box::new(Id::Int(42)));
		east.flush();
		west.flush();
		assert!(east.has_packet());
		assert!(west.has_packet());
	}
}
