/*!

A distance-vector routing algorithm (Bellman-Ford), the one non-toy
reference implementation. Neighbors announce themselves on power-on;
distance vectors propagate hop-by-hop until every cube's table
converges, after which `route` only forwards data packets and stays
silent.

Addresses are `Id`s, as everywhere else in the crate; "via" is a
`Direction` rather than a neighbor address, since a cube only ever
needs to know *which of its own faces* to transmit a packet out of —
unlike the lattice-coordinate arithmetic this is adapted from, a cube
never needs to resolve a neighbor's address to reach it, only the
locally wired direction is needed to forward.

*/

use std::collections::HashMap;

use log::{trace, warn};

use crate::algorithm::{RobotAlgorithm, RoutingAlgorithm};
use crate::cube::RoutingCube;
use crate::direction::Direction;
use crate::face::Packet;
use crate::id::Id;
use crate::robot::Robot;

const DEFAULT_LINK_COST: u32 = 1;

struct NewNeighbor {
	from_id: Id,
	link_cost: u32,
	ack: bool,
}

struct DistanceVector {
	from_id: Id,
	vector: HashMap<Id, u32>,
}

struct Data {
	dest: Id,
	payload: Packet,
}

/// `distances[dest][via] = cost`, so `next_hop` is a plain min-scan and
/// `get_distance_vector` is a plain min-fold per destination.
#[derive(Default)]
struct DistanceTable {
	distances: HashMap<Id, HashMap<Direction, u32>>,
}

impl DistanceTable {
	fn new_neighbor(&mut self, via: Direction, neighbor_id: Id, link_cost: u32) {
		self.distances.entry(neighbor_id).or_default().insert(via, link_cost);
	}

	fn update(&mut self, vector: &HashMap<Id, u32>, via: Direction, via_id: &Id, my_id: &Id) {
		let link_cost_to_via = self
			.distances
			.get(via_id)
			.and_then(|row| row.get(&via))
			.copied()
			.unwrap_or(DEFAULT_LINK_COST);

		for (dest, distance) in vector {
			if dest == my_id {
				continue;
			}
			self.distances
				.entry(dest.clone())
				.or_default()
				.insert(via, distance + link_cost_to_via);
		}
	}

	fn next_hop(&self, dest: &Id) -> Option<Direction> {
		self.distances.get(dest).and_then(|row| {
			row.iter().min_by_key(|&(_, &cost)| cost).map(|(&via, _)| via)
		})
	}

	fn get_distance_vector(&self) -> HashMap<Id, u32> {
		self.distances
			.iter()
			.filter_map(|(dest, row)| row.values().min().map(|&cost| (dest.clone(), cost)))
			.collect()
	}
}

pub struct BellmanFordData {
	table: DistanceTable,
	last_dv: Option<HashMap<Id, u32>>,
	pub pkts_received: u64,
	pub pkts_dropped: u64,
	pub received: Vec<Packet>,
}

impl BellmanFordData {
	fn new() -> BellmanFordData {
		BellmanFordData {
			table: DistanceTable::default(),
			last_dv: None,
			pkts_received: 0,
			pkts_dropped: 0,
			received: Vec::new(),
		}
	}
}

pub struct BellmanFordRouting;

impl BellmanFordRouting {
	fn announce(&self, cube: &mut RoutingCube) {
		for d in Direction::ALL {
			if cube.connected_in_direction(d) {
				let pkt = NewNeighbor {
					from_id: cube.id().clone(),
					link_cost: DEFAULT_LINK_COST,
					ack: false,
				};
				cube.send_packet(d, Box::new(pkt));
			}
		}
	}

	fn update_neighbors(&self, cube: &mut RoutingCube) {
		let dv = cube
			.data
			.as_ref()
			.and_then(|d| d.downcast_ref::<BellmanFordData>())
			.expect("cube.data holds BellmanFordData")
			.table
			.get_distance_vector();

		let changed = cube
			.data
			.as_ref()
			.and_then(|d| d.downcast_ref::<BellmanFordData>())
			.map_or(true, |data| data.last_dv.as_ref() != Some(&dv));
		if !changed {
			return;
		}

		for d in Direction::ALL {
			if cube.connected_in_direction(d) {
				let pkt = DistanceVector {
					from_id: cube.id().clone(),
					vector: dv.clone(),
				};
				cube.send_packet(d, Box::new(pkt));
			}
		}
		cube.data
			.as_mut()
			.and_then(|d| d.downcast_mut::<BellmanFordData>())
			.unwrap()
			.last_dv = Some(dv);
	}

	fn try_forward_or_receive(&self, cube: &mut RoutingCube, dest: Id, payload: Packet) {
		let my_id = cube.id().clone();
		if dest == my_id {
			let data = cube
				.data
				.as_mut()
				.and_then(|d| d.downcast_mut::<BellmanFordData>())
				.expect("cube.data holds BellmanFordData");
			data.pkts_received += 1;
			data.received.push(payload);
			cube.stats.correctly_routed_pkts_this_cycle += 1;
			return;
		}

		let next_hop = cube
			.data
			.as_ref()
			.and_then(|d| d.downcast_ref::<BellmanFordData>())
			.expect("cube.data holds BellmanFordData")
			.table
			.next_hop(&dest);

		match next_hop {
			Some(d) => {
				cube.send_packet(d, Box::new(Data { dest, payload }));
			}
			None => {
				cube.data
					.as_mut()
					.and_then(|d| d.downcast_mut::<BellmanFordData>())
					.unwrap()
					.pkts_dropped += 1;
			}
		}
	}
}

impl RoutingAlgorithm for BellmanFordRouting {
	fn power_on(&self, cube: &mut RoutingCube) {
		cube.data = Some(Box::new(BellmanFordData::new()));
		self.announce(cube);
	}

	fn route(&self, cube: &mut RoutingCube) {
		// Pops and dispatches at most one packet per call, per the crate's
		// one-packet-per-cycle convention; a cube with more than one packet
		// queued simply carries the rest over to its next `route` call.
		let (pkt, from) = match cube.get_packet() {
			Some(pair) => pair,
			None => return,
		};

		let pkt = match pkt.downcast::<NewNeighbor>() {
			Ok(nn) => {
				let data = cube
					.data
					.as_mut()
					.and_then(|d| d.downcast_mut::<BellmanFordData>())
					.expect("cube.data holds BellmanFordData");
				data.table.new_neighbor(from, nn.from_id.clone(), nn.link_cost);
				if !nn.ack {
					let reply = NewNeighbor {
						from_id: cube.id().clone(),
						link_cost: nn.link_cost,
						ack: true,
					};
					cube.send_packet(from, Box::new(reply));
				}
				self.update_neighbors(cube);
				return;
			}
			Err(pkt) => pkt,
		};

		let pkt = match pkt.downcast::<DistanceVector>() {
			Ok(dv) => {
				let my_id = cube.id().clone();
				cube.data
					.as_mut()
					.and_then(|d| d.downcast_mut::<BellmanFordData>())
					.expect("cube.data holds BellmanFordData")
					.table
					.update(&dv.vector, from, &dv.from_id, &my_id);
				self.update_neighbors(cube);
				return;
			}
			Err(pkt) => pkt,
		};

		match pkt.downcast::<Data>() {
			Ok(data_pkt) => {
				self.try_forward_or_receive(cube, data_pkt.dest.clone(), data_pkt.payload);
			}
			Err(_) => warn!("{:?}: unrecognized bellman-ford packet type", cube.id()),
		}
	}

	fn send_packet(&self, cube: &mut RoutingCube, dest_id: Id, data: Packet) {
		trace!("{:?} originating a packet toward {:?}", cube.id(), dest_id);
		self.try_forward_or_receive(cube, dest_id, data);
	}
}

pub struct BellmanFordRobot {
	inner: BellmanFordRouting,
}

impl BellmanFordRobot {
	pub fn new() -> BellmanFordRobot {
		BellmanFordRobot { inner: BellmanFordRouting }
	}
}

impl Default for BellmanFordRobot {
	fn default() -> Self {
		BellmanFordRobot::new()
	}
}

impl RobotAlgorithm for BellmanFordRobot {
	fn power_on(&self, robot: &mut Robot) {
		self.inner.power_on(&mut robot.cube);
	}

	fn step(&self, robot: &mut Robot) {
		self.inner.route(&mut robot.cube);
	}

	fn send_packet(&self, robot: &mut Robot, dest_id: Id, data: Packet) {
		self.inner.send_packet(&mut robot.cube, dest_id, data);
	}
}
