/*!

The single variation point of the simulator: what a routing algorithm
(or robot algorithm) sees on each tick.

Modeled as a trait with three methods and instantiated once per grid
behind a trait object, so the CLI can select an implementation by name
at start-up (see `crate::algorithms::by_name`). Packet payloads and
`cube.data` are both `Box<dyn Any>`; the core never inspects them, only
the algorithm that produced them downcasts.

*/

use crate::cube::RoutingCube;
use crate::face::Packet;
use crate::id::Id;
use crate::robot::Robot;

/// The contract a distributed routing algorithm implements against a
/// `RoutingCube`. One instance is shared (immutably) across every cube
/// in a grid; all mutable state lives in `cube.data`.
pub trait RoutingAlgorithm {
	/// Called once when a cube is inserted into the grid. May install
	/// `cube.data` and synchronously call `cube.send_packet` to announce
	/// presence to neighbors.
	fn power_on(&self, cube: &mut RoutingCube);

	/// Called once per cycle per cube, during the route phase. May call
	/// `cube.get_packet` (at most one packet is ever returned per call)
	/// and `cube.send_packet` any number of times.
	fn route(&self, cube: &mut RoutingCube);

	/// Called when an external driver (a recipe's `SEND`, or the
	/// presenter) wants this cube to originate a packet toward `dest_id`.
	/// Typically stages the packet in `cube.data` to be transmitted on
	/// the next `route`.
	fn send_packet(&self, cube: &mut RoutingCube, dest_id: Id, data: Packet);
}

/// The contract a robot's independent second algorithm implements
/// against a `Robot`. Mirrors `RoutingAlgorithm` exactly, but a robot's
/// hooks run strictly after the route/flush phases of the cycle (see
/// `NetworkGrid::step`), so they can react to what the cube received
/// this cycle.
pub trait RobotAlgorithm {
	fn power_on(&self, robot: &mut Robot);
	fn step(&self, robot: &mut Robot);
	fn send_packet(&self, robot: &mut Robot, dest_id: Id, data: Packet);
}
