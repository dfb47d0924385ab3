/*!

The six axis-aligned directions a routing cube may be wired in, and the
arithmetic relating them to lattice coordinates.

*/

/// A lattice position. Not a newtype over `(i32,i32,i32)` so it composes
/// directly with tuple destructuring throughout the crate.
pub type Position = (i32, i32, i32);

/// One of the six axis-aligned directions a cube can be wired to a neighbor in.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Direction {
	Up,
	Down,
	North,
	South,
	East,
	West,
}

impl Direction {
	/// All six directions, in the fixed iteration order used throughout the
	/// crate (route phase, flush phase, broadcast helpers).
	pub const ALL: [Direction; 6] = [
		Direction::Up,
		Direction::Down,
		Direction::North,
		Direction::South,
		Direction::East,
		Direction::West,
	];

	/// A dense index in `0..6`, used to index fixed-size per-direction arrays.
	pub fn index(self) -> usize {
		match self {
			Direction::Up => 0,
			Direction::Down => 1,
			Direction::North => 2,
			Direction::South => 3,
			Direction::East => 4,
			Direction::West => 5,
		}
	}

	/// The direction a packet arrives from if it was sent in `self`.
	pub fn opposite(self) -> Direction {
		match self {
			Direction::Up => Direction::Down,
			Direction::Down => Direction::Up,
			Direction::North => Direction::South,
			Direction::South => Direction::North,
			Direction::East => Direction::West,
			Direction::West => Direction::East,
		}
	}

	/// The `(dx,dy,dz)` offset of the neighbor in this direction.
	pub fn delta(self) -> (i32, i32, i32) {
		match self {
			Direction::Up => (0, 0, 1),
			Direction::Down => (0, 0, -1),
			Direction::North => (0, 1, 0),
			Direction::South => (0, -1, 0),
			Direction::East => (1, 0, 0),
			Direction::West => (-1, 0, 0),
		}
	}

	/// The position of the neighbor in this direction from `origin`.
	pub fn neighbor_of(self, origin: Position) -> Position {
		let (dx, dy, dz) = self.delta();
		(origin.0 + dx, origin.1 + dy, origin.2 + dz)
	}

	/// The direction from `origin` to `target`, if `target` is exactly one
	/// hop away along a single axis. Returns `None` for any other relative
	/// position (including `origin == target`).
	pub fn towards(origin: Position, target: Position) -> Option<Direction> {
		Direction::ALL
			.iter()
			.copied()
			.find(|d| d.neighbor_of(origin) == target)
	}
}
