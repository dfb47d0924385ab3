/*!

The crate's unified error type. Every fallible public operation — file
loading, recipe execution, grid mutation — returns `Result<_, Error>`.

*/

use crate::id::Id;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
	#[error("i/o error: {0}")]
	Io(#[from] std::io::Error),

	#[error("{path}:{line}: {message}")]
	Parse {
		path: String,
		line: usize,
		message: String,
	},

	#[error("{path}:{line}: unknown command `{command}`")]
	UnknownCommand {
		path: String,
		line: usize,
		command: String,
	},

	#[error("{path}:{line}: `{command}` expects {expected} argument(s), got {got}")]
	WrongArgCount {
		path: String,
		line: usize,
		command: String,
		expected: String,
		got: usize,
	},

	#[error("LOOP cannot be nested inside another open LOOP")]
	NestedLoop,

	#[error("ENDL with no matching open LOOP")]
	LoopNotOpen,

	#[error("unknown routing algorithm `{0}`")]
	UnknownAlgorithm(String),

	#[error("{0}")]
	Cli(String),

	#[error("no node with id {0} exists in the grid")]
	UnknownSource(Id),

	#[error("no node at position {0:?}")]
	NodeNotFound(crate::direction::Position),

	#[error("no node with id {0} exists in the grid")]
	NodeIdNotFound(Id),

	#[error("id {0} is already in use")]
	DuplicateId(Id),

	#[error("a node already occupies position {0:?}")]
	PositionOccupied(crate::direction::Position),
}
