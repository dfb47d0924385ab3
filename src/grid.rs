/*!

`NetworkGrid`, the top-level container: a `slab`-backed arena of cubes
(and robots) indexed both by position and by id, plus the two
algorithm trait objects shared across every node in the grid.

One `NetworkGrid` drives the whole simulation: `step` runs a full
cycle (route phase, flush phase, robot phase, diagnostics rollup);
`add_node`/`add_robot`/`remove_node` mutate the lattice and keep every
cube's wiring consistent with its six neighbors.

*/

use std::collections::{BTreeMap, HashSet, VecDeque};

use log::debug;
use slab::Slab;

use crate::algorithm::{RobotAlgorithm, RoutingAlgorithm};
use crate::cube::RoutingCube;
use crate::diagnostics::NetworkDiagnostics;
use crate::direction::{Direction, Position};
use crate::error::Error;
use crate::face::Packet;
use crate::id::Id;
use crate::matrix::Matrix;
use crate::robot::Robot;

/// One arena slot: either a plain cube or a cube wrapped in a `Robot`.
/// Both variants participate identically in the route/flush phases;
/// only the `Robot` variant additionally receives a `robot_algorithm`
/// tick.
enum Slot {
	Cube(RoutingCube),
	Robot(Robot),
}

impl Slot {
	fn cube(&self) -> &RoutingCube {
		match self {
			Slot::Cube(c) => c,
			Slot::Robot(r) => &r.cube,
		}
	}

	fn cube_mut(&mut self) -> &mut RoutingCube {
		match self {
			Slot::Cube(c) => c,
			Slot::Robot(r) => &mut r.cube,
		}
	}
}

#[derive(Clone, Copy, Debug)]
struct LayerBounds {
	min_x: i32,
	max_x: i32,
	min_y: i32,
	max_y: i32,
}

impl LayerBounds {
	fn singleton(x: i32, y: i32) -> LayerBounds {
		LayerBounds {
			min_x: x,
			max_x: x,
			min_y: y,
			max_y: y,
		}
	}

	fn absorb(&mut self, x: i32, y: i32) {
		self.min_x = self.min_x.min(x);
		self.max_x = self.max_x.max(x);
		self.min_y = self.min_y.min(y);
		self.max_y = self.max_y.max(y);
	}
}

pub struct NetworkGrid {
	arena: Slab<Slot>,
	nodes: BTreeMap<Position, usize>,
	by_id: BTreeMap<Id, usize>,
	robots: Vec<usize>,
	layer_entry_points: BTreeMap<i32, Position>,
	layer_bounds: BTreeMap<i32, LayerBounds>,
	next_auto_id: i64,
	routing_algorithm: Box<dyn RoutingAlgorithm>,
	robot_algorithm: Box<dyn RobotAlgorithm>,
	pub stats: NetworkDiagnostics,
}

impl NetworkGrid {
	pub fn new(
		routing_algorithm: Box<dyn RoutingAlgorithm>,
		robot_algorithm: Box<dyn RobotAlgorithm>,
	) -> NetworkGrid {
		NetworkGrid {
			arena: Slab::new(),
			nodes: BTreeMap::new(),
			by_id: BTreeMap::new(),
			robots: Vec::new(),
			layer_entry_points: BTreeMap::new(),
			layer_bounds: BTreeMap::new(),
			next_auto_id: 0,
			routing_algorithm,
			robot_algorithm,
			stats: NetworkDiagnostics::new(),
		}
	}

	pub fn num_nodes(&self) -> usize {
		self.nodes.len()
	}

	fn fresh_id(&mut self, requested: Option<Id>) -> Result<Id, Error> {
		match requested {
			Some(id) => {
				if self.by_id.contains_key(&id) {
					Err(Error::DuplicateId(id))
				} else {
					Ok(id)
				}
			}
			None => {
				let mut id = Id::Int(self.next_auto_id);
				while self.by_id.contains_key(&id) {
					self.next_auto_id += 1;
					id = Id::Int(self.next_auto_id);
				}
				self.next_auto_id += 1;
				Ok(id)
			}
		}
	}

	fn note_layer_membership(&mut self, position: Position) {
		let (x, y, z) = position;
		self.layer_bounds
			.entry(z)
			.and_modify(|b| b.absorb(x, y))
			.or_insert_with(|| LayerBounds::singleton(x, y));

		let replace = match self.layer_entry_points.get(&z) {
			None => true,
			Some(&(ex, ey, _)) => x < ex || (x == ex && y > ey),
		};
		if replace {
			self.layer_entry_points.insert(z, position);
		}
	}

	/// Called after a node at `position` has left `self.nodes`. If it was
	/// the z-plane's entry point, the entry point (and, should the plane
	/// now be empty, the whole layer-bounds entry) is recomputed from the
	/// cubes that actually remain, so `get_layer` never starts its walk
	/// from a removed position. `layer_bounds` itself is left as-is
	/// otherwise — an oversized bounding box is harmless, a dangling
	/// entry point is not.
	fn forget_layer_membership(&mut self, position: Position) {
		let (_, _, z) = position;
		if self.layer_entry_points.get(&z) != Some(&position) {
			return;
		}
		let mut survivors = self.nodes.keys().filter(|p| p.2 == z);
		match survivors.next() {
			None => {
				self.layer_entry_points.remove(&z);
				self.layer_bounds.remove(&z);
			}
			Some(&first) => {
				let mut entry = first;
				for &p in survivors {
					if p.0 < entry.0 || (p.0 == entry.0 && p.1 > entry.1) {
						entry = p;
					}
				}
				self.layer_entry_points.insert(z, entry);
			}
		}
	}

	/// Wires the just-inserted slot at `idx`/`position` to every
	/// already-present axis neighbor, symmetrically.
	fn wire(&mut self, idx: usize, position: Position) {
		for d in Direction::ALL {
			let npos = d.neighbor_of(position);
			if let Some(&nidx) = self.nodes.get(&npos) {
				let my_face = self.arena[idx].cube().inbound_handle(d);
				let neighbor_face = self.arena[nidx].cube().inbound_handle(d.opposite());
				self.arena[idx].cube_mut().connect(d, &neighbor_face);
				self.arena[nidx].cube_mut().connect(d.opposite(), &my_face);
			}
		}
	}

	/// Unwires every neighbor of `position` on the corresponding side.
	/// The cube at `idx` itself is not touched; it is about to be
	/// removed from the arena.
	fn unwire(&mut self, position: Position) {
		for d in Direction::ALL {
			let npos = d.neighbor_of(position);
			if let Some(&nidx) = self.nodes.get(&npos) {
				self.arena[nidx].cube_mut().disconnect(d.opposite());
			}
		}
	}

	fn insert_cube(&mut self, position: Position, id: Option<Id>) -> Result<(usize, Id), Error> {
		if self.nodes.contains_key(&position) {
			return Err(Error::PositionOccupied(position));
		}
		let id = self.fresh_id(id)?;
		let cube = RoutingCube::new(position, id.clone());
		let idx = self.arena.insert(Slot::Cube(cube));
		self.nodes.insert(position, idx);
		self.by_id.insert(id.clone(), idx);
		self.wire(idx, position);
		self.note_layer_membership(position);
		Ok((idx, id))
	}

	/// Inserts a plain routing cube at `(x, y, z)`, wires it to any
	/// already-present neighbors, and invokes `routing_algorithm.power_on`.
	pub fn add_node(&mut self, x: i32, y: i32, z: i32, id: Option<Id>) -> Result<Id, Error> {
		let (idx, id) = self.insert_cube((x, y, z), id)?;
		self.routing_algorithm
			.power_on(self.arena[idx].cube_mut());
		debug!("added node {:?} at ({}, {}, {})", id, x, y, z);
		Ok(id)
	}

	/// Same as `add_node`, but the cube is additionally wrapped in a
	/// `Robot` and given a `robot_algorithm.power_on` tick.
	pub fn add_robot(&mut self, x: i32, y: i32, z: i32, id: Option<Id>) -> Result<Id, Error> {
		let (idx, id) = self.insert_cube((x, y, z), id)?;
		self.routing_algorithm
			.power_on(self.arena[idx].cube_mut());

		let slot = self.arena.remove(idx);
		let cube = match slot {
			Slot::Cube(c) => c,
			Slot::Robot(r) => r.cube,
		};
		let robot_idx = self.arena.insert(Slot::Robot(Robot::new(cube)));
		self.nodes.insert((x, y, z), robot_idx);
		self.by_id.insert(id.clone(), robot_idx);
		self.robots.push(robot_idx);

		if let Slot::Robot(robot) = &mut self.arena[robot_idx] {
			self.robot_algorithm.power_on(robot);
		}
		debug!("added robot {:?} at ({}, {}, {})", id, x, y, z);
		Ok(id)
	}

	fn remove_at(&mut self, position: Position) -> Result<(), Error> {
		let idx = *self
			.nodes
			.get(&position)
			.ok_or(Error::NodeNotFound(position))?;
		self.unwire(position);
		let id = self.arena[idx].cube().id().clone();
		self.nodes.remove(&position);
		self.forget_layer_membership(position);
		self.by_id.remove(&id);
		self.robots.retain(|&r| r != idx);
		self.arena.remove(idx);
		debug!("removed node {:?} at {:?}", id, position);
		Ok(())
	}

	pub fn remove_node(&mut self, x: i32, y: i32, z: i32) -> Result<(), Error> {
		self.remove_at((x, y, z))
	}

	pub fn remove_node_by_id(&mut self, id: &Id) -> Result<(), Error> {
		let position = *self
			.nodes
			.iter()
			.find(|(_, &idx)| self.arena[idx].cube().id() == id)
			.map(|(pos, _)| pos)
			.ok_or_else(|| Error::NodeIdNotFound(id.clone()))?;
		self.remove_at(position)
	}

	pub fn get_node(&self, x: i32, y: i32, z: i32) -> Option<&RoutingCube> {
		self.nodes.get(&(x, y, z)).map(|&idx| self.arena[idx].cube())
	}

	pub fn get_node_mut(&mut self, x: i32, y: i32, z: i32) -> Option<&mut RoutingCube> {
		let idx = *self.nodes.get(&(x, y, z))?;
		Some(self.arena[idx].cube_mut())
	}

	pub fn get_node_by_id(&self, id: &Id) -> Option<&RoutingCube> {
		let idx = *self.by_id.get(id)?;
		Some(self.arena[idx].cube())
	}

	/// A bounded 2-D projection of the z-plane at height `z`, reached by
	/// a breadth-first walk over wired North/South/East/West neighbors
	/// starting from the layer's entry point (its lowest-x, then
	/// highest-y, member). `None` if the plane is empty.
	pub fn get_layer(&self, z: i32) -> Option<Matrix<Option<Position>>> {
		let bounds = self.layer_bounds.get(&z)?;
		let entry = *self.layer_entry_points.get(&z)?;

		let rows = (bounds.max_y - bounds.min_y + 1) as usize;
		let cols = (bounds.max_x - bounds.min_x + 1) as usize;
		let mut matrix = Matrix::constant(None, rows, cols);

		let mut visited = HashSet::new();
		let mut queue = VecDeque::new();
		queue.push_back(entry);
		visited.insert(entry);

		while let Some(pos) = queue.pop_front() {
			let row = (pos.1 - bounds.min_y) as usize;
			let col = (pos.0 - bounds.min_x) as usize;
			*matrix.get_mut(row, col) = Some(pos);

			if let Some(&idx) = self.nodes.get(&pos) {
				let cube = self.arena[idx].cube();
				for d in [Direction::North, Direction::South, Direction::East, Direction::West] {
					if cube.connected_in_direction(d) {
						let npos = d.neighbor_of(pos);
						if npos.2 == z && visited.insert(npos) {
							queue.push_back(npos);
						}
					}
				}
			}
		}
		Some(matrix)
	}

	/// Hands `data` to the node identified by `src_id`, asking its
	/// algorithm to originate a packet toward `dest_id`.
	pub fn send_packet(&mut self, data: Packet, src_id: &Id, dest_id: Id) -> Result<(), Error> {
		let idx = *self
			.by_id
			.get(src_id)
			.ok_or_else(|| Error::UnknownSource(src_id.clone()))?;
		match &mut self.arena[idx] {
			Slot::Robot(robot) => self.robot_algorithm.send_packet(robot, dest_id, data),
			Slot::Cube(cube) => self.routing_algorithm.send_packet(cube, dest_id, data),
		}
		Ok(())
	}

	/// Runs one full cycle: route phase, flush phase, robot phase,
	/// diagnostics rollup.
	pub fn step(&mut self) {
		let indices: Vec<usize> = self.nodes.values().copied().collect();

		let routing_algorithm = self.routing_algorithm.as_ref();
		for &idx in &indices {
			self.arena[idx].cube_mut().step(routing_algorithm);
		}
		for &idx in &indices {
			self.arena[idx].cube_mut().flush();
		}
		for &idx in &self.robots.clone() {
			if let Slot::Robot(robot) = &mut self.arena[idx] {
				self.robot_algorithm.step(robot);
			}
		}
		self.update_net_stats();
	}

	/// All occupied lattice positions, in no particular order. Used by
	/// the presenter to compute displayed dimensions.
	pub fn positions(&self) -> Vec<Position> {
		self.nodes.keys().copied().collect()
	}

	/// A snapshot of every cube's diagnostics, paired with its position.
	/// Used by the presenter's `voxel_snapshot`.
	pub fn diagnostics_snapshot(&self) -> Vec<(Position, crate::diagnostics::NodeDiagnostics)> {
		self.nodes
			.iter()
			.map(|(&pos, &idx)| (pos, self.arena[idx].cube().stats.clone()))
			.collect()
	}

	fn update_net_stats(&mut self) {
		let snapshots: Vec<&crate::diagnostics::NodeDiagnostics> = self
			.nodes
			.values()
			.map(|&idx| &self.arena[idx].cube().stats)
			.collect();
		self.stats.rebuild(snapshots);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::algorithms::template::{TemplateRobotAlgorithm, TemplateRoutingAlgorithm};

	fn grid() -> NetworkGrid {
		NetworkGrid::new(
			Box::new(TemplateRoutingAlgorithm),
			Box::new(TemplateRobotAlgorithm),
		)
	}

	#[test]
	fn add_node_auto_assigns_distinct_ids() {
		let mut g = grid();
		let a = g.add_node(0, 0, 0, None).unwrap();
		let b = g.add_node(1, 0, 0, None).unwrap();
		assert_ne!(a, b);
		assert_eq!(g.num_nodes(), 2);
	}

	#[test]
	fn add_node_rejects_duplicate_id_and_position() {
		let mut g = grid();
		g.add_node(0, 0, 0, Some(Id::Int(5))).unwrap();
		assert!(matches!(
			g.add_node(1, 1, 1, Some(Id::Int(5))),
			Err(Error::DuplicateId(_))
		));
		assert!(matches!(
			g.add_node(0, 0, 0, None),
			Err(Error::PositionOccupied(_))
		));
	}

	#[test]
	fn adjacent_nodes_wire_symmetrically() {
		let mut g = grid();
		g.add_node(0, 0, 0, Some(Id::Int(0))).unwrap();
		g.add_node(1, 0, 0, Some(Id::Int(1))).unwrap();
		assert!(g.get_node(0, 0, 0).unwrap().connected_in_direction(Direction::East));
		assert!(g.get_node(1, 0, 0).unwrap().connected_in_direction(Direction::West));
	}

	#[test]
	fn remove_node_unwires_its_neighbors() {
		let mut g = grid();
		g.add_node(0, 0, 0, Some(Id::Int(0))).unwrap();
		g.add_node(1, 0, 0, Some(Id::Int(1))).unwrap();
		g.remove_node(0, 0, 0).unwrap();
		assert!(!g.get_node(1, 0, 0).unwrap().connected_in_direction(Direction::West));
		assert!(g.get_node(0, 0, 0).is_none());
	}

	#[test]
	fn get_layer_reaches_every_wired_cube_in_the_plane() {
		let mut g = grid();
		g.add_node(0, 0, 0, Some(Id::Int(0))).unwrap();
		g.add_node(1, 0, 0, Some(Id::Int(1))).unwrap();
		g.add_node(1, 1, 0, Some(Id::Int(2))).unwrap();
		g.add_node(0, 0, 1, Some(Id::Int(3))).unwrap();

		let layer = g.get_layer(0).unwrap();
		let mut found = 0;
		for r in 0..layer.rows() {
			for c in 0..layer.columns() {
				if layer.get(r, c).is_some() {
					found += 1;
				}
			}
		}
		assert_eq!(found, 3);
		assert!(g.get_layer(5).is_none());
	}

	#[test]
	fn get_layer_recovers_when_the_entry_point_is_removed() {
		let mut g = grid();
		g.add_node(0, 0, 0, Some(Id::Int(0))).unwrap();
		g.add_node(1, 0, 0, Some(Id::Int(1))).unwrap();
		// (0,0,0) is the lowest-x entry point for z=0.
		g.remove_node(0, 0, 0).unwrap();

		let layer = g.get_layer(0).unwrap();
		let mut found = 0;
		for r in 0..layer.rows() {
			for c in 0..layer.columns() {
				if layer.get(r, c) == &Some((1, 0, 0)) {
					found += 1;
				}
			}
		}
		assert_eq!(found, 1, "the surviving cube must still be reachable");
	}

	#[test]
	fn get_layer_returns_none_once_a_plane_is_fully_vacated() {
		let mut g = grid();
		g.add_node(0, 0, 0, Some(Id::Int(0))).unwrap();
		g.remove_node(0, 0, 0).unwrap();
		assert!(g.get_layer(0).is_none());
	}

	#[test]
	fn send_packet_fails_for_unknown_source() {
		let mut g = grid();
		g.add_node(0, 0, 0, Some(Id::Int(0))).unwrap();
		let result = g.send_packet(Box::new(()), &Id::Int(99), Id::Int(0));
		assert!(matches!(result, Err(Error::UnknownSource(_))));
	}
}
