/*!

A `Robot` decorates a `RoutingCube` with a second, independent per-cycle
algorithm hook. It appears in the grid's cube index exactly like an
ordinary cube (same wiring, same queue, same `RoutingAlgorithm` drives
its route phase); the grid additionally keeps a back-reference to it so
`robot_algorithm.step` can be invoked after the flush phase.

*/

use crate::cube::RoutingCube;

/// A cube additionally bound to a `RobotAlgorithm`. `Robot` owns the
/// cube; the grid's `nodes` index owns the `Robot` (see
/// `NetworkGrid::add_robot`), and the grid's `robots` list only
/// back-references it by slot.
pub struct Robot {
	pub cube: RoutingCube,
}

impl Robot {
	pub fn new(cube: RoutingCube) -> Robot {
		let mut cube = cube;
		cube.stats.is_robot = true;
		Robot { cube }
	}
}

impl std::ops::Deref for Robot {
	type Target = RoutingCube;
	fn deref(&self) -> &RoutingCube {
		&self.cube
	}
}

impl std::ops::DerefMut for Robot {
	fn deref_mut(&mut self) -> &mut RoutingCube {
		&mut self.cube
	}
}
