// Copyright 2025 The Limit Engine Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;

/// Which side of the book an order rests on.
///
/// Encoded on the wire as a boolean: `false` = bid, `true` = ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
	Bid,
	Ask,
}

impl Side {
	/// The side an incoming order of this side matches against.
	pub fn opposite(self) -> Side {
		match self {
			Side::Bid => Side::Ask,
			Side::Ask => Side::Bid,
		}
	}

	/// The wire encoding used on `Added` events: `false` for bid, `true` for ask.
	pub fn is_ask(self) -> bool {
		matches!(self, Side::Ask)
	}
}

impl fmt::Display for Side {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Side::Bid => write!(f, "bid"),
			Side::Ask => write!(f, "ask"),
		}
	}
}
