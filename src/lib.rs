/*!

routingcubes
============

A discrete-event simulator for a 3-D lattice of routing cubes that
forward packets according to a pluggable routing algorithm, driven
cycle by cycle by a small recipe script.

A [`NetworkGrid`] owns the lattice: it wires adjacent [`RoutingCube`]s
together as they're added, dispatches each cycle's route/flush/robot
phases, and rolls per-cube diagnostics up into a network-wide summary.
Routing behavior lives behind the [`RoutingAlgorithm`]/[`RobotAlgorithm`]
trait pair; `algorithms::by_name` resolves one of the crate's three
built-in implementations (template pass-through, Bellman-Ford
distance-vector, bounded random walk) by name. [`Recipe`] interprets a
tiny script language (add/remove nodes, send packets, wait, loop,
pause) against a grid one instruction per call, and [`Presenter`] is the
read-mostly facade a front-end drives instead of touching the grid
directly.

# Usage

This crate is `routingcubes-lib`. To use it add it to your project's
`Cargo.toml`.

```toml
[dependencies]
routingcubes-lib = "0.1"
```

Alternatively, consider whether the binary crate `routingcubes` fits
your intended use — it wires a network file and a recipe file to a
`Presenter` from the command line.

*/

pub mod algorithm;
pub mod algorithms;
pub mod cube;
pub mod diagnostics;
pub mod direction;
pub mod error;
pub mod face;
pub mod grid;
pub mod id;
pub mod loader;
pub mod matrix;
pub mod presenter;
pub mod recipe;
pub mod robot;

pub use algorithm::{RobotAlgorithm, RoutingAlgorithm};
pub use cube::RoutingCube;
pub use direction::{Direction, Position};
pub use error::Error;
pub use grid::NetworkGrid;
pub use id::Id;
pub use presenter::Presenter;
pub use recipe::Recipe;
pub use robot::Robot;
