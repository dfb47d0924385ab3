/*!

Parsers for the two boundary text formats: the network-topology file
(one `x y z` per line) and the recipe file (one command per line). Both
are purely syntactic — the parsed values flow straight into
`NetworkGrid`/`Recipe` through the interfaces the rest of the crate
defines.

*/

use std::fs;
use std::path::Path;

use crate::direction::Position;
use crate::error::Error;
use crate::id::Id;
use crate::recipe::{Command, Recipe};

fn parse_error(path: &str, line: usize, message: impl Into<String>) -> Error {
	Error::Parse {
		path: path.to_string(),
		line,
		message: message.into(),
	}
}

fn parse_i32(path: &str, line: usize, token: &str) -> Result<i32, Error> {
	token
		.parse::<i32>()
		.map_err(|_| parse_error(path, line, format!("`{}` is not an integer", token)))
}

/// Loads a network-topology file: one node position per non-blank,
/// non-`#`-commented line, as three space-separated nonnegative
/// integers. Errors (with the offending line number) if any other line
/// does not parse to exactly three integers.
pub fn load_network_file<P: AsRef<Path>>(path: P) -> Result<Vec<Position>, Error> {
	let path_ref = path.as_ref();
	let path_str = path_ref.display().to_string();
	let text = fs::read_to_string(path_ref)?;

	let mut positions = Vec::new();
	for (offset, raw_line) in text.lines().enumerate() {
		let line_no = offset + 1;
		let line = raw_line.trim();
		if line.is_empty() || line.starts_with('#') {
			continue;
		}
		let tokens: Vec<&str> = line.split_whitespace().collect();
		if tokens.len() != 3 {
			return Err(parse_error(
				&path_str,
				line_no,
				format!("expected 3 integers, got {} token(s)", tokens.len()),
			));
		}
		let x = parse_i32(&path_str, line_no, tokens[0])?;
		let y = parse_i32(&path_str, line_no, tokens[1])?;
		let z = parse_i32(&path_str, line_no, tokens[2])?;
		positions.push((x, y, z));
	}
	Ok(positions)
}

/// The inverse of `load_network_file`: writes one `x y z` line per
/// position, in the same format the loader accepts.
pub fn save_routingcubes_to_file<P: AsRef<Path>>(path: P, positions: &[Position]) -> Result<(), Error> {
	let mut text = String::new();
	for &(x, y, z) in positions {
		text.push_str(&format!("{} {} {}\n", x, y, z));
	}
	fs::write(path, text)?;
	Ok(())
}

/// Loads a recipe file: one command per non-blank, non-`#`-commented
/// line, first token the (uppercase) command name, the rest its
/// arguments. Tokens that parse as an integer become `Id::Int`,
/// otherwise `Id::Str` — see `Id::parse`.
pub fn load_recipe_file<P: AsRef<Path>>(path: P) -> Result<Recipe, Error> {
	let path_ref = path.as_ref();
	let path_str = path_ref.display().to_string();
	let text = fs::read_to_string(path_ref)?;

	let mut commands = Vec::new();
	for (offset, raw_line) in text.lines().enumerate() {
		let line_no = offset + 1;
		let line = raw_line.trim();
		if line.is_empty() || line.starts_with('#') {
			continue;
		}
		let mut tokens = line.split_whitespace();
		let name = tokens.next().expect("non-blank line has at least one token");
		let args: Vec<&str> = tokens.collect();
		commands.push(parse_command(&path_str, line_no, name, &args)?);
	}
	Ok(Recipe::new(commands))
}

fn wrong_arg_count(path: &str, line: usize, command: &str, expected: &str, got: usize) -> Error {
	Error::WrongArgCount {
		path: path.to_string(),
		line,
		command: command.to_string(),
		expected: expected.to_string(),
		got,
	}
}

fn parse_command(path: &str, line: usize, name: &str, args: &[&str]) -> Result<Command, Error> {
	match name {
		"ADDN" | "ADDR" => {
			if args.len() != 3 && args.len() != 4 {
				return Err(wrong_arg_count(path, line, name, "3 or 4", args.len()));
			}
			let x = parse_i32(path, line, args[0])?;
			let y = parse_i32(path, line, args[1])?;
			let z = parse_i32(path, line, args[2])?;
			let id = if args.len() == 4 { Some(Id::parse(args[3])) } else { None };
			if name == "ADDN" {
				Ok(Command::AddNode { x, y, z, id })
			} else {
				Ok(Command::AddRobot { x, y, z, id })
			}
		}
		"RMVN" => match args.len() {
			3 => {
				let x = parse_i32(path, line, args[0])?;
				let y = parse_i32(path, line, args[1])?;
				let z = parse_i32(path, line, args[2])?;
				Ok(Command::RemoveNodeAt { x, y, z })
			}
			1 => Ok(Command::RemoveNodeById { id: Id::parse(args[0]) }),
			got => Err(wrong_arg_count(path, line, name, "3 or 1", got)),
		},
		"SEND" => match args.len() {
			7 => {
				let data = Id::parse(args[0]);
				let sx = parse_i32(path, line, args[1])?;
				let sy = parse_i32(path, line, args[2])?;
				let sz = parse_i32(path, line, args[3])?;
				let dx = parse_i32(path, line, args[4])?;
				let dy = parse_i32(path, line, args[5])?;
				let dz = parse_i32(path, line, args[6])?;
				Ok(Command::SendByPosition {
					data,
					src: (sx, sy, sz),
					dest: (dx, dy, dz),
				})
			}
			3 => {
				let data = Id::parse(args[0]);
				let src = Id::parse(args[1]);
				let dest = Id::parse(args[2]);
				Ok(Command::SendById { data, src, dest })
			}
			got => Err(wrong_arg_count(path, line, name, "7 or 3", got)),
		},
		"WAIT" => {
			if args.len() != 1 {
				return Err(wrong_arg_count(path, line, name, "1", args.len()));
			}
			let n = args[0]
				.parse::<i64>()
				.map_err(|_| parse_error(path, line, format!("`{}` is not an integer", args[0])))?;
			Ok(Command::Wait(n))
		}
		"LOOP" => {
			if args.len() != 1 {
				return Err(wrong_arg_count(path, line, name, "1", args.len()));
			}
			let n = args[0]
				.parse::<i64>()
				.map_err(|_| parse_error(path, line, format!("`{}` is not an integer", args[0])))?;
			Ok(Command::Loop(n))
		}
		"ENDL" => {
			if !args.is_empty() {
				return Err(wrong_arg_count(path, line, name, "0", args.len()));
			}
			Ok(Command::EndLoop)
		}
		"PAUSE" => {
			if !args.is_empty() {
				return Err(wrong_arg_count(path, line, name, "0", args.len()));
			}
			Ok(Command::Pause)
		}
		other => Err(Error::UnknownCommand {
			path: path.to_string(),
			line,
			command: other.to_string(),
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn write_temp(contents: &str) -> tempfile_like::TempPath {
		tempfile_like::TempPath::new(contents)
	}

	/// A minimal scratch-file helper so these tests don't need an extra
	/// dev-dependency: writes to a process-unique path under `std::env::temp_dir()`
	/// and removes it on drop.
	mod tempfile_like {
		use std::fs;
		use std::path::{Path, PathBuf};
		use std::sync::atomic::{AtomicU64, Ordering};

		static COUNTER: AtomicU64 = AtomicU64::new(0);

		pub struct TempPath(PathBuf);

		impl TempPath {
			pub fn new(contents: &str) -> TempPath {
				let n = COUNTER.fetch_add(1, Ordering::Relaxed);
				let path = std::env::temp_dir().join(format!("routingcubes-test-{}-{}", std::process::id(), n));
				fs::write(&path, contents).expect("write temp fixture");
				TempPath(path)
			}
		}

		impl AsRef<Path> for TempPath {
			fn as_ref(&self) -> &Path {
				&self.0
			}
		}

		impl Drop for TempPath {
			fn drop(&mut self) {
				let _ = fs::remove_file(&self.0);
			}
		}
	}

	#[test]
	fn network_file_parses_positions_and_skips_comments() {
		let path = write_temp("# a comment\n0 0 0\n\n1 0 0\n");
		let positions = load_network_file(&path).unwrap();
		assert_eq!(positions, vec![(0, 0, 0), (1, 0, 0)]);
	}

	#[test]
	fn network_file_rejects_malformed_lines() {
		let path = write_temp("0 0\n");
		let err = load_network_file(&path).unwrap_err();
		assert!(matches!(err, Error::Parse { line: 1, .. }));
	}

	#[test]
	fn recipe_file_parses_every_command_shape() {
		let path = write_temp(
			"ADDN 0 0 0\nADDR 1 0 0 bob\nRMVN 1 0 0\nSEND hi 0 0 0 1 0 0\nWAIT 3\nLOOP 2\nENDL\nPAUSE\n",
		);
		let recipe = load_recipe_file(&path).unwrap();
		assert!(recipe.is_running());
	}

	#[test]
	fn recipe_file_rejects_unknown_command() {
		let path = write_temp("FROB 1 2 3\n");
		let err = load_recipe_file(&path).unwrap_err();
		assert!(matches!(err, Error::UnknownCommand { .. }));
	}

	#[test]
	fn recipe_file_rejects_wrong_arg_count() {
		let path = write_temp("WAIT\n");
		let err = load_recipe_file(&path).unwrap_err();
		assert!(matches!(err, Error::WrongArgCount { .. }));
	}

	#[test]
	fn recipe_tokens_parse_ints_and_strings_per_id_rules() {
		let cmd = parse_command("recipe", 1, "RMVN", &["bob"]).unwrap();
		assert!(matches!(cmd, Command::RemoveNodeById { id } if id == Id::Str("bob".to_string())));
		let cmd = parse_command("recipe", 1, "RMVN", &["42"]).unwrap();
		assert!(matches!(cmd, Command::RemoveNodeById { id } if id == Id::Int(42)));
	}

	#[test]
	fn save_then_load_round_trips_positions() {
		let path = std::env::temp_dir().join(format!("routingcubes-roundtrip-{}", std::process::id()));
		let positions = vec![(0, 0, 0), (2, 1, 0)];
		save_routingcubes_to_file(&path, &positions).unwrap();
		let loaded = load_network_file(&path).unwrap();
		let _ = std::fs::remove_file(&path);
		assert_eq!(loaded, positions);
	}
}
