/*!

A `Face` is the inbound buffer on one side of a cube. A `Faces` bundles
the six owned inbound faces of a cube together with weak references to
the neighbors' opposite faces, the transmit side used by `send_packet`.

See design note "Cyclic neighbor references" in `DESIGN.md`: faces are
reference-counted rather than reached through raw pointers, so that
`NetworkGrid::remove_node` can simply drop a cube's arena entry and let
every neighbor's `Weak` handle start failing to upgrade.

*/

use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::direction::Direction;

/// A packet payload, opaque to the core. Produced and consumed only by
/// routing algorithms, which downcast it to their own packet type.
pub type Packet = Box<dyn Any>;

/// The inbound buffer for one direction of one cube.
#[derive(Default)]
pub struct Face {
	queue: VecDeque<Packet>,
}

impl Face {
	pub fn new() -> Face {
		Face { queue: VecDeque::new() }
	}

	/// Appends a packet to the tail of the buffer.
	pub fn enqueue(&mut self, pkt: Packet) {
		self.queue.push_back(pkt);
	}

	/// Atomically empties the buffer, returning its contents in FIFO order.
	pub fn drain(&mut self) -> Vec<Packet> {
		self.queue.drain(..).collect()
	}

	/// A peek at whether the buffer holds anything, without consuming it.
	pub fn has_packet(&self) -> bool {
		!self.queue.is_empty()
	}
}

/// The six inbound faces a cube owns, plus the six (possibly absent) weak
/// references to its neighbors' opposite inbound faces used to transmit.
pub struct Faces {
	inbound: [Rc<RefCell<Face>>; 6],
	neighbor: [Option<Weak<RefCell<Face>>>; 6],
}

impl Faces {
	pub fn new() -> Faces {
		Faces {
			inbound: std::array::from_fn(|_| Rc::new(RefCell::new(Face::new()))),
			neighbor: Default::default(),
		}
	}

	/// A cloneable handle to the owned inbound face in direction `d`, given
	/// out to a neighbor being wired to this cube.
	pub fn inbound_handle(&self, d: Direction) -> Rc<RefCell<Face>> {
		Rc::clone(&self.inbound[d.index()])
	}

	/// Wires the neighbor's inbound face (received from the neighbor via
	/// `inbound_handle(d.opposite())`) as this cube's transmit target in
	/// direction `d`.
	pub fn connect(&mut self, d: Direction, neighbor_face: &Rc<RefCell<Face>>) {
		self.neighbor[d.index()] = Some(Rc::downgrade(neighbor_face));
	}

	/// Removes the transmit wiring in direction `d`, e.g. because the
	/// neighbor there was removed from the grid.
	pub fn disconnect(&mut self, d: Direction) {
		self.neighbor[d.index()] = None;
	}

	/// Whether a neighbor is currently wired in direction `d`.
	pub fn connected(&self, d: Direction) -> bool {
		self.neighbor[d.index()]
			.as_ref()
			.map_or(false, |w| w.upgrade().is_some())
	}

	/// Enqueues `pkt` into the neighbor's inbound face in direction `d`.
	/// Returns `false` (without consuming `pkt`'s destination beyond the
	/// call itself) when no neighbor is wired there.
	pub fn add_packet(&self, d: Direction, pkt: Packet) -> bool {
		match self.neighbor[d.index()].as_ref().and_then(Weak::upgrade) {
			Some(face) => {
				face.borrow_mut().enqueue(pkt);
				true
			}
			None => false,
		}
	}

	/// Drains every owned inbound face, returning `(direction, packets)`
	/// pairs for directions that had anything buffered.
	pub fn drain_inbound(&self) -> Vec<(Direction, Vec<Packet>)> {
		Direction::ALL
			.iter()
			.copied()
			.filter_map(|d| {
				let drained = self.inbound[d.index()].borrow_mut().drain();
				if drained.is_empty() {
					None
				} else {
					Some((d, drained))
				}
			})
			.collect()
	}
}
