/*!

The boundary the crate presents to a UI collaborator: a read-only
projection of the grid plus the handful of mutations a viewer needs
(add/remove a node, drive cycles, persist a layout), with observer
notification after every `run`. Contains no rendering or input-handling
logic of its own.

*/

use std::path::Path;

use crate::algorithm::{RobotAlgorithm, RoutingAlgorithm};
use crate::direction::Position;
use crate::diagnostics::NodeDiagnostics;
use crate::error::Error;
use crate::grid::NetworkGrid;
use crate::loader;
use crate::recipe::Recipe;

/// One cube's position paired with its diagnostics, as returned by
/// `Presenter::voxel_snapshot`.
#[derive(Clone, Debug)]
pub struct VoxelSnapshot {
	pub position: Position,
	pub diagnostics: NodeDiagnostics,
}

/// A callback invoked once per `run`, after the loop completes. Held as
/// a trait object so a viewer can register a closure without the
/// presenter needing to know its concrete type.
pub trait Observer {
	fn notify(&mut self, presenter: &Presenter);
}

pub struct Presenter {
	grid: NetworkGrid,
	recipe: Recipe,
	min_side: u32,
	observers: Vec<Box<dyn Observer>>,
}

impl Presenter {
	pub fn new(routing_algorithm: Box<dyn RoutingAlgorithm>, robot_algorithm: Box<dyn RobotAlgorithm>) -> Presenter {
		Presenter {
			grid: NetworkGrid::new(routing_algorithm, robot_algorithm),
			recipe: Recipe::empty(),
			min_side: 0,
			observers: Vec::new(),
		}
	}

	pub fn grid(&self) -> &NetworkGrid {
		&self.grid
	}

	pub fn recipe(&self) -> &Recipe {
		&self.recipe
	}

	pub fn set_recipe(&mut self, recipe: Recipe) {
		self.recipe = recipe;
	}

	/// Clears the recipe's `paused` flag, releasing exactly one `PAUSE`.
	pub fn resume(&mut self) {
		self.recipe.resume();
	}

	pub fn set_min_side(&mut self, min_side: u32) {
		self.min_side = min_side;
	}

	pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
		self.observers.push(observer);
	}

	fn notify_observers(&mut self) {
		let mut observers = std::mem::take(&mut self.observers);
		for observer in observers.iter_mut() {
			observer.notify(self);
		}
		self.observers = observers;
	}

	/// The displayed cube side: the tightest axis-aligned bounding cube
	/// around every occupied position, clamped upward to `min_side`.
	pub fn dimensions(&self) -> u32 {
		let positions = self.grid.positions();
		if positions.is_empty() {
			return self.min_side;
		}
		let mut min = (i32::MAX, i32::MAX, i32::MAX);
		let mut max = (i32::MIN, i32::MIN, i32::MIN);
		for (x, y, z) in positions {
			min.0 = min.0.min(x);
			min.1 = min.1.min(y);
			min.2 = min.2.min(z);
			max.0 = max.0.max(x);
			max.1 = max.1.max(y);
			max.2 = max.2.max(z);
		}
		let side = (max.0 - min.0 + 1).max(max.1 - min.1 + 1).max(max.2 - min.2 + 1);
		(side as u32).max(self.min_side)
	}

	/// Every occupied position paired with that cube's diagnostics.
	pub fn voxel_snapshot(&self) -> Vec<VoxelSnapshot> {
		self.grid
			.diagnostics_snapshot()
			.into_iter()
			.map(|(position, diagnostics)| VoxelSnapshot { position, diagnostics })
			.collect()
	}

	/// Loads a network file and inserts every listed position as a plain
	/// (non-robot) node.
	pub fn populate_network<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
		for (x, y, z) in loader::load_network_file(path)? {
			self.grid.add_node(x, y, z, None)?;
		}
		Ok(())
	}

	pub fn add_node(&mut self, x: i32, y: i32, z: i32, is_robot: bool) -> Result<(), Error> {
		if is_robot {
			self.grid.add_robot(x, y, z, None)?;
		} else {
			self.grid.add_node(x, y, z, None)?;
		}
		Ok(())
	}

	pub fn remove_node(&mut self, x: i32, y: i32, z: i32) -> Result<(), Error> {
		self.grid.remove_node(x, y, z)
	}

	pub fn save_network<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
		loader::save_routingcubes_to_file(path, &self.grid.positions())
	}

	/// Advances one cycle: `recipe.execute_next`, then `grid.step()`.
	pub fn step(&mut self) -> Result<(), Error> {
		self.recipe.execute_next(&mut self.grid)?;
		self.grid.step();
		Ok(())
	}

	/// Drives `num_cycles` cycles (an unbounded run if negative, with a
	/// `PAUSE` or the recipe running out as the exit conditions),
	/// notifying observers exactly once after the loop ends. With
	/// `ignore_pauses`, every `PAUSE` hit during the run is immediately
	/// cleared so the loop keeps going.
	pub fn run(&mut self, mut num_cycles: i64, ignore_pauses: bool) -> Result<(), Error> {
		while self.recipe.is_running() && num_cycles != 0 {
			self.recipe.execute_next(&mut self.grid)?;
			self.grid.step();
			if ignore_pauses {
				self.recipe.resume();
			}
			if num_cycles > 0 {
				num_cycles -= 1;
			}
		}
		self.notify_observers();
		Ok(())
	}
}
