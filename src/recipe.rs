/*!

The recipe interpreter: a small, cycle-driven script language that
drives a `NetworkGrid` deterministically (add/remove nodes, inject
packets, wait, loop, pause). See the recipe grammar parsed by
[`crate::loader::load_recipe_file`].

*/

use crate::error::Error;
use crate::grid::NetworkGrid;
use crate::id::Id;

/// One parsed recipe instruction. Built by [`crate::loader`], executed
/// one at a time by [`Recipe::execute_next`].
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
	AddNode { x: i32, y: i32, z: i32, id: Option<Id> },
	AddRobot { x: i32, y: i32, z: i32, id: Option<Id> },
	RemoveNodeAt { x: i32, y: i32, z: i32 },
	RemoveNodeById { id: Id },
	/// `SEND data sx sy sz dx dy dz`: `data` and both endpoints identified
	/// by position. `data` is whatever the recipe token parsed to (see
	/// `Id::parse`), boxed as the packet payload.
	SendByPosition {
		data: Id,
		src: (i32, i32, i32),
		dest: (i32, i32, i32),
	},
	/// `SEND data src_id dest_id`: both endpoints identified by id.
	SendById { data: Id, src: Id, dest: Id },
	Wait(i64),
	Loop(i64),
	EndLoop,
	Pause,
}

/// A loaded recipe plus its interpreter state: instruction pointer,
/// wait/loop bookkeeping, and whether it is currently paused.
#[derive(Debug)]
pub struct Recipe {
	commands: Vec<Command>,
	idx: usize,
	wait_cycles_remaining: u64,
	loop_iters_remaining: i64,
	loop_idx: usize,
	in_loop: bool,
	paused: bool,
}

impl Recipe {
	pub fn new(commands: Vec<Command>) -> Recipe {
		Recipe {
			commands,
			idx: 0,
			wait_cycles_remaining: 0,
			loop_iters_remaining: 0,
			loop_idx: 0,
			in_loop: false,
			paused: false,
		}
	}

	/// A recipe with no commands; a grid driven by it never mutates on
	/// its own.
	pub fn empty() -> Recipe {
		Recipe::new(Vec::new())
	}

	/// `idx < length ∧ ¬paused`: whether a further `execute_next` call
	/// could still do something.
	pub fn is_running(&self) -> bool {
		self.idx < self.commands.len() && !self.paused
	}

	pub fn is_paused(&self) -> bool {
		self.paused
	}

	/// Clears `paused` only; one `resume()` releases exactly one
	/// `PAUSE`.
	pub fn resume(&mut self) {
		self.paused = false;
	}

	/// Executes at most one recipe instruction against `grid`.
	///
	/// A no-op if paused or exhausted. A `WAIT` in progress just
	/// decrements its remaining-cycles counter. Configuration/structural
	/// errors (unknown source, nested loop, dangling `ENDL`) propagate;
	/// the instruction pointer still advances past the offending
	/// instruction so a caller that logs the error and keeps stepping
	/// does not get stuck retrying it forever.
	pub fn execute_next(&mut self, grid: &mut NetworkGrid) -> Result<(), Error> {
		if self.paused || self.idx >= self.commands.len() {
			return Ok(());
		}
		if self.wait_cycles_remaining > 0 {
			self.wait_cycles_remaining -= 1;
			return Ok(());
		}

		let command = self.commands[self.idx].clone();
		let result = self.dispatch(grid, command);
		Ok(result?)
	}

	fn dispatch(&mut self, grid: &mut NetworkGrid, command: Command) -> Result<(), Error> {
		match command {
			Command::AddNode { x, y, z, id } => {
				self.idx += 1;
				grid.add_node(x, y, z, id).map(|_| ())
			}
			Command::AddRobot { x, y, z, id } => {
				self.idx += 1;
				grid.add_robot(x, y, z, id).map(|_| ())
			}
			Command::RemoveNodeAt { x, y, z } => {
				self.idx += 1;
				grid.remove_node(x, y, z)
			}
			Command::RemoveNodeById { id } => {
				self.idx += 1;
				grid.remove_node_by_id(&id)
			}
			Command::SendByPosition { data, src, dest } => {
				self.idx += 1;
				let src_id = grid
					.get_node(src.0, src.1, src.2)
					.ok_or(Error::NodeNotFound(src))?
					.id()
					.clone();
				let dest_id = grid
					.get_node(dest.0, dest.1, dest.2)
					.ok_or(Error::NodeNotFound(dest))?
					.id()
					.clone();
				grid.send_packet(Box::new(data), &src_id, dest_id)
			}
			Command::SendById { data, src, dest } => {
				self.idx += 1;
				grid.send_packet(Box::new(data), &src, dest)
			}
			Command::Wait(n) => {
				self.wait_cycles_remaining = n.max(0) as u64;
				self.idx += 1;
				Ok(())
			}
			Command::Loop(n) => {
				let loop_idx = self.idx;
				self.idx += 1;
				if self.in_loop {
					return Err(Error::NestedLoop);
				}
				self.in_loop = true;
				self.loop_idx = loop_idx;
				self.loop_iters_remaining = n;
				Ok(())
			}
			Command::EndLoop => {
				if !self.in_loop {
					self.idx += 1;
					return Err(Error::LoopNotOpen);
				}
				if self.loop_iters_remaining < 0 {
					// LOOP n with negative n: infinite, always jump back.
					self.idx = self.loop_idx + 1;
				} else if self.loop_iters_remaining > 0 {
					self.loop_iters_remaining -= 1;
					self.idx = self.loop_idx + 1;
				} else {
					self.in_loop = false;
					self.idx += 1;
				}
				Ok(())
			}
			Command::Pause => {
				self.paused = true;
				self.idx += 1;
				Ok(())
			}
		}
	}
}
