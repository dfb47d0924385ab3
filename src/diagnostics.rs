/*!

Per-node and network-wide diagnostic counters.

Per Open Question (c), every counter is 64-bit: a long-running simulation
should not silently wrap.

*/

/// Diagnostics tracked on a single `RoutingCube`.
///
/// The `_this_cycle` fields are zeroed at the start of every `route` call
/// (see `RoutingCube::step`); the plain counters accumulate over the
/// cube's whole lifetime.
#[derive(Clone, Debug, Default)]
pub struct NodeDiagnostics {
	pub num_pkts_sent: u64,
	pub num_pkts_sent_this_cycle: u64,
	pub num_pkts_received: u64,
	pub num_pkts_received_this_cycle: u64,
	pub num_pkts_dropped: u64,
	pub num_pkts_dropped_this_cycle: u64,
	pub current_q_len: u64,
	pub highest_q_len: u64,
	pub is_robot: bool,
	pub has_packet: bool,
	pub correctly_routed_pkts_this_cycle: u64,
}

impl NodeDiagnostics {
	pub fn new() -> NodeDiagnostics {
		NodeDiagnostics::default()
	}

	/// Zeroes every `_this_cycle` field. Called once per cube at the start
	/// of the route phase.
	pub fn reset_cycle(&mut self) {
		self.num_pkts_sent_this_cycle = 0;
		self.num_pkts_received_this_cycle = 0;
		self.num_pkts_dropped_this_cycle = 0;
		self.correctly_routed_pkts_this_cycle = 0;
	}

	pub fn record_sent(&mut self) {
		self.num_pkts_sent += 1;
		self.num_pkts_sent_this_cycle += 1;
	}

	pub fn record_dropped(&mut self) {
		self.num_pkts_dropped += 1;
		self.num_pkts_dropped_this_cycle += 1;
	}

	pub fn record_received(&mut self) {
		self.num_pkts_received += 1;
		self.num_pkts_received_this_cycle += 1;
	}
}

/// Aggregated diagnostics across an entire `NetworkGrid`.
///
/// The per-cycle totals and maxima are recomputed from scratch by
/// `NetworkGrid::update_net_stats` on every `step`; `max_highest_q_len` is
/// the exception, a running historical maximum that is never reset.
#[derive(Clone, Debug, Default)]
pub struct NetworkDiagnostics {
	pub total_pkts_sent_this_cycle: u64,
	pub total_pkts_received_this_cycle: u64,
	pub total_pkts_dropped_this_cycle: u64,
	pub total_pkts_sent: u64,
	pub total_pkts_received: u64,
	pub total_pkts_dropped: u64,
	pub max_current_q_len: u64,
	pub max_highest_q_len: u64,
	pub num_nodes: u64,
	pub num_robots: u64,
}

impl NetworkDiagnostics {
	pub fn new() -> NetworkDiagnostics {
		NetworkDiagnostics::default()
	}

	/// Recomputes every field (other than `max_highest_q_len`, which only
	/// ever grows) from the given per-node snapshots.
	pub fn rebuild<'a, I: IntoIterator<Item = &'a NodeDiagnostics>>(&mut self, nodes: I) {
		self.total_pkts_sent_this_cycle = 0;
		self.total_pkts_received_this_cycle = 0;
		self.total_pkts_dropped_this_cycle = 0;
		self.total_pkts_sent = 0;
		self.total_pkts_received = 0;
		self.total_pkts_dropped = 0;
		self.max_current_q_len = 0;
		self.num_nodes = 0;
		self.num_robots = 0;

		for stats in nodes {
			self.total_pkts_sent_this_cycle += stats.num_pkts_sent_this_cycle;
			self.total_pkts_received_this_cycle += stats.num_pkts_received_this_cycle;
			self.total_pkts_dropped_this_cycle += stats.num_pkts_dropped_this_cycle;
			self.total_pkts_sent += stats.num_pkts_sent;
			self.total_pkts_received += stats.num_pkts_received;
			self.total_pkts_dropped += stats.num_pkts_dropped;
			self.max_current_q_len = self.max_current_q_len.max(stats.current_q_len);
			self.max_highest_q_len = self.max_highest_q_len.max(stats.highest_q_len);
			self.num_nodes += 1;
			if stats.is_robot {
				self.num_robots += 1;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reset_cycle_only_clears_per_cycle_fields() {
		let mut stats = NodeDiagnostics::new();
		stats.record_sent();
		stats.record_dropped();
		stats.current_q_len = 3;
		stats.highest_q_len = 3;
		stats.reset_cycle();
		assert_eq!(stats.num_pkts_sent_this_cycle, 0);
		assert_eq!(stats.num_pkts_dropped_this_cycle, 0);
		assert_eq!(stats.num_pkts_sent, 1);
		assert_eq!(stats.current_q_len, 3);
	}

	#[test]
	fn max_highest_q_len_never_shrinks() {
		let mut net = NetworkDiagnostics::new();
		let mut a = NodeDiagnostics::new();
		a.highest_q_len = 5;
		net.rebuild([&a]);
		assert_eq!(net.max_highest_q_len, 5);
		a.highest_q_len = 1;
		net.rebuild([&a]);
		assert_eq!(net.max_highest_q_len, 5);
	}

	#[test]
	fn rebuild_sums_across_nodes() {
		let mut net = NetworkDiagnostics::new();
		let mut a = NodeDiagnostics::new();
		a.record_sent();
		let mut b = NodeDiagnostics::new();
		b.record_sent();
		b.record_sent();
		net.rebuild([&a, &b]);
		assert_eq!(net.total_pkts_sent, 3);
		assert_eq!(net.num_nodes, 2);
	}
}
