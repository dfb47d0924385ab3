/*!

`RoutingCube`, the single lattice node: wiring, queue, and the two halves
of a cycle it participates in (`step` during the route phase, `flush`
during the flush phase).

*/

use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::diagnostics::NodeDiagnostics;
use crate::direction::{Direction, Position};
use crate::face::{Face, Faces, Packet};
use crate::id::Id;

/// Capacity of a cube's packet queue. Beyond this, incoming packets are
/// dropped and accounted in `NodeDiagnostics::num_pkts_dropped`.
pub const MAX_Q_LEN: usize = 64;

/// One lattice node.
pub struct RoutingCube {
	position: Position,
	id: Id,
	faces: Faces,
	queue: VecDeque<(Packet, Direction)>,
	max_q_len: usize,
	/// Opaque per-node state owned by the routing algorithm. `None` until
	/// the algorithm's `power_on` hook installs it.
	pub data: Option<Box<dyn Any>>,
	pub stats: NodeDiagnostics,
}

impl RoutingCube {
	pub fn new(position: Position, id: Id) -> RoutingCube {
		RoutingCube::with_queue_capacity(position, id, MAX_Q_LEN)
	}

	/// Same as `new`, but with a queue capacity other than `MAX_Q_LEN`.
	/// Mainly useful for deterministically exercising overflow behavior
	/// in tests without sending `MAX_Q_LEN` packets first.
	pub fn with_queue_capacity(position: Position, id: Id, max_q_len: usize) -> RoutingCube {
		RoutingCube {
			position,
			id,
			faces: Faces::new(),
			queue: VecDeque::new(),
			max_q_len,
			data: None,
			stats: NodeDiagnostics::new(),
		}
	}

	pub fn position(&self) -> Position {
		self.position
	}

	pub fn id(&self) -> &Id {
		&self.id
	}

	/// A cloneable handle to this cube's owned inbound face in direction
	/// `d`, given to a neighbor being wired against this cube. Used only
	/// by `NetworkGrid` when wiring/unwiring cubes.
	pub(crate) fn inbound_handle(&self, d: Direction) -> Rc<RefCell<Face>> {
		self.faces.inbound_handle(d)
	}

	pub(crate) fn connect(&mut self, d: Direction, neighbor_face: &Rc<RefCell<Face>>) {
		self.faces.connect(d, neighbor_face);
	}

	pub(crate) fn disconnect(&mut self, d: Direction) {
		self.faces.disconnect(d);
	}

	/// Whether a neighbor is currently wired in direction `d`.
	pub fn connected_in_direction(&self, d: Direction) -> bool {
		self.faces.connected(d)
	}

	/// Enqueues `pkt` into the neighbor's inbound face in direction `d`.
	/// On success, accounts a sent packet; on a missing neighbor, accounts
	/// a dropped packet and returns `false`.
	pub fn send_packet(&mut self, d: Direction, pkt: Packet) -> bool {
		if self.faces.add_packet(d, pkt) {
			self.stats.record_sent();
			true
		} else {
			self.stats.record_dropped();
			false
		}
	}

	/// Removes and returns at most one packet from the head of the queue,
	/// tagged with the direction it arrived from. The contract permits
	/// calling this more than once per cycle; only one packet is ever
	/// returned per call.
	pub fn get_packet(&mut self) -> Option<(Packet, Direction)> {
		let next = self.queue.pop_front();
		self.stats.current_q_len = self.queue.len() as u64;
		self.stats.has_packet = !self.queue.is_empty();
		next
	}

	pub fn has_packet(&self) -> bool {
		!self.queue.is_empty()
	}

	pub fn queue_len(&self) -> usize {
		self.queue.len()
	}

	/// The route phase half of a cycle: zero the per-cycle diagnostic
	/// fields, then hand this cube to the routing algorithm.
	pub fn step(&mut self, algorithm: &dyn crate::algorithm::RoutingAlgorithm) {
		self.stats.reset_cycle();
		algorithm.route(self);
	}

	/// The flush phase half of a cycle: drain every inbound face into the
	/// queue, preserving per-face FIFO order; drop (and account) on
	/// overflow; update queue-length diagnostics.
	pub fn flush(&mut self) {
		for (from, packets) in self.faces.drain_inbound() {
			for pkt in packets {
				self.stats.record_received();
				if self.queue.len() < self.max_q_len {
					self.queue.push_back((pkt, from));
				} else {
					self.stats.record_dropped();
				}
			}
		}
		self.stats.current_q_len = self.queue.len() as u64;
		self.stats.highest_q_len = self.stats.highest_q_len.max(self.stats.current_q_len);
		self.stats.has_packet = !self.queue.is_empty();
	}
}
