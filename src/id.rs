/*!

Identifiers for routing cubes.

Recipe files let an author name a cube either with an integer or with a
plain string (see the recipe grammar in [`crate::loader`]). Both forms
must key the same `by_id` index, so an `Id` is a small sum type rather
than a bare integer.

*/

use std::fmt;

/// A cube identifier: either an author-chosen (or grid-assigned) integer,
/// or an author-chosen string. Equality, ordering and hashing are by
/// variant and then by value.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Id {
	Int(i64),
	Str(String),
}

impl Id {
	/// Parses a recipe token into an `Id`: tokens that parse as an integer
	/// become `Id::Int`, anything else becomes `Id::Str`.
	pub fn parse(token: &str) -> Id {
		match token.parse::<i64>() {
			Ok(n) => Id::Int(n),
			Err(_) => Id::Str(token.to_string()),
		}
	}
}

impl fmt::Display for Id {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Id::Int(n) => write!(f, "{}", n),
			Id::Str(s) => write!(f, "{}", s),
		}
	}
}

impl From<i64> for Id {
	fn from(n: i64) -> Id {
		Id::Int(n)
	}
}

impl From<String> for Id {
	fn from(s: String) -> Id {
		Id::Str(s)
	}
}

impl From<&str> for Id {
	fn from(s: &str) -> Id {
		Id::Str(s.to_string())
	}
}
