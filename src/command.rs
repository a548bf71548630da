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

//! The command stream: how client connections tell the engine what to do.
//!
//! The core engine never parses bytes itself; it only ever sees a
//! [`Command`]. This module owns the one concrete framing in use, a
//! simple whitespace-separated line protocol, so the engine is runnable
//! end to end. Swapping it for a binary or protobuf framing would not
//! touch [`crate::engine::Engine`] or [`crate::book::Book`] at all.

use std::io::BufRead;

use crate::error::CommandParseError;

/// One parsed line of the command stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	Buy {
		order_id: u32,
		price: u32,
		count: u32,
		instrument: String,
	},
	Sell {
		order_id: u32,
		price: u32,
		count: u32,
		instrument: String,
	},
	Cancel {
		order_id: u32,
	},
}

/// Parses one line of the form:
///
/// ```text
/// BUY <order_id> <price> <count> <instrument>
/// SELL <order_id> <price> <count> <instrument>
/// CANCEL <order_id>
/// ```
pub fn parse_line(line: &str) -> Result<Command, CommandParseError> {
	let mut fields = line.split_whitespace();
	let verb = fields.next().ok_or(CommandParseError::Empty)?;

	match verb.to_ascii_uppercase().as_str() {
		"CANCEL" => {
			let rest: Vec<&str> = fields.collect();
			if rest.len() != 1 {
				return Err(CommandParseError::WrongFieldCount {
					verb: "CANCEL",
					expected: 1,
					actual: rest.len(),
				});
			}
			let order_id = parse_order_id(rest[0])?;
			Ok(Command::Cancel { order_id })
		}
		verb @ ("BUY" | "SELL") => {
			let rest: Vec<&str> = fields.collect();
			if rest.len() != 4 {
				return Err(CommandParseError::WrongFieldCount {
					verb: "BUY/SELL",
					expected: 4,
					actual: rest.len(),
				});
			}
			let order_id = parse_order_id(rest[0])?;
			let price = parse_price(rest[1])?;
			let count = parse_count(rest[2])?;
			let instrument = rest[3].to_string();

			if verb == "BUY" {
				Ok(Command::Buy {
					order_id,
					price,
					count,
					instrument,
				})
			} else {
				Ok(Command::Sell {
					order_id,
					price,
					count,
					instrument,
				})
			}
		}
		other => Err(CommandParseError::UnknownVerb(other.to_string())),
	}
}

fn parse_order_id(field: &str) -> Result<u32, CommandParseError> {
	field
		.parse()
		.map_err(|_| CommandParseError::InvalidOrderId(field.to_string()))
}

fn parse_price(field: &str) -> Result<u32, CommandParseError> {
	let price: u32 = field
		.parse()
		.map_err(|_| CommandParseError::InvalidPrice(field.to_string()))?;
	if price == 0 {
		return Err(CommandParseError::NonPositivePrice);
	}
	Ok(price)
}

fn parse_count(field: &str) -> Result<u32, CommandParseError> {
	let count: u32 = field
		.parse()
		.map_err(|_| CommandParseError::InvalidCount(field.to_string()))?;
	if count == 0 {
		return Err(CommandParseError::NonPositiveCount);
	}
	Ok(count)
}

/// Result of reading one command off a connection.
pub enum ReadOutcome {
	Command(Command),
	EndOfStream,
	Malformed(CommandParseError),
	Io(std::io::Error),
}

/// The connection-framing collaborator: reads one [`Command`] at a time.
///
/// Implementors only need to know how to produce lines; [`parse_line`]
/// handles the grammar. Blank lines are skipped rather than treated as
/// malformed, matching the forgiving line-reader convention common to
/// this kind of text protocol.
pub trait CommandSource {
	fn read_command(&mut self) -> ReadOutcome;
}

/// A [`CommandSource`] backed by any buffered reader, one command per line.
pub struct LineCommandSource<R> {
	reader: R,
	line: String,
}

impl<R: BufRead> LineCommandSource<R> {
	pub fn new(reader: R) -> Self {
		Self {
			reader,
			line: String::new(),
		}
	}
}

impl<R: BufRead> CommandSource for LineCommandSource<R> {
	fn read_command(&mut self) -> ReadOutcome {
		loop {
			self.line.clear();
			match self.reader.read_line(&mut self.line) {
				Ok(0) => return ReadOutcome::EndOfStream,
				Ok(_) => {
					let trimmed = self.line.trim();
					if trimmed.is_empty() {
						continue;
					}
					return match parse_line(trimmed) {
						Ok(cmd) => ReadOutcome::Command(cmd),
						Err(e) => ReadOutcome::Malformed(e),
					};
				}
				Err(e) => return ReadOutcome::Io(e),
			}
		}
	}
}
