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

//! The output sink: where matched and resting orders get reported.
//!
//! [`OutputSink`] is the boundary the matching core emits through. Every
//! method is a single atomic record: callers never see partial or
//! interleaved output, even when many worker threads emit concurrently.
//! [`LineSink`] is the production implementation (one line per event on a
//! shared writer); [`RecordingSink`] is the in-memory stand-in used by
//! tests that need to assert on the exact sequence of emitted events.

use std::io::Write;
use std::sync::Mutex;

use crate::types::Side;

/// One output record, carried as an owned value so scenario and property
/// tests can assert on these directly rather than re-parsing rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
	Added {
		order_id: u32,
		instrument: String,
		price: u32,
		count: u32,
		ask: bool,
		timestamp: u64,
	},
	Executed {
		resting_id: u32,
		aggressor_id: u32,
		execution_count: u32,
		price: u32,
		count: u32,
		timestamp: u64,
	},
	Deleted {
		order_id: u32,
		accepted: bool,
		timestamp: u64,
	},
}

/// Three idempotent, atomic emit operations — the only way the core
/// reports what happened.
pub trait OutputSink: Send + Sync {
	fn added(&self, order_id: u32, instrument: &str, price: u32, count: u32, side: Side, timestamp: u64);
	fn executed(
		&self,
		resting_id: u32,
		aggressor_id: u32,
		execution_count: u32,
		price: u32,
		count: u32,
		timestamp: u64,
	);
	fn deleted(&self, order_id: u32, accepted: bool, timestamp: u64);
}

/// Renders one line per event to a shared writer.
///
/// All three emit methods funnel through the same [`Mutex`], so a line
/// from one worker thread can never interleave with a line from another.
pub struct LineSink<W> {
	writer: Mutex<W>,
}

impl<W: Write> LineSink<W> {
	pub fn new(writer: W) -> Self {
		Self {
			writer: Mutex::new(writer),
		}
	}
}

impl<W: Write + Send> OutputSink for LineSink<W> {
	fn added(&self, order_id: u32, instrument: &str, price: u32, count: u32, side: Side, timestamp: u64) {
		let mut w = self.writer.lock().unwrap();
		let _ = writeln!(
			w,
			"Added {order_id} {instrument} {price} {count} {} {timestamp}",
			side.is_ask()
		);
	}

	fn executed(
		&self,
		resting_id: u32,
		aggressor_id: u32,
		execution_count: u32,
		price: u32,
		count: u32,
		timestamp: u64,
	) {
		let mut w = self.writer.lock().unwrap();
		let _ = writeln!(
			w,
			"Executed {resting_id} {aggressor_id} {execution_count} {price} {count} {timestamp}"
		);
	}

	fn deleted(&self, order_id: u32, accepted: bool, timestamp: u64) {
		let mut w = self.writer.lock().unwrap();
		let _ = writeln!(w, "Deleted {order_id} {accepted} {timestamp}");
	}
}

/// In-memory sink for tests: records every event in emission order.
#[derive(Default)]
pub struct RecordingSink {
	events: Mutex<Vec<Event>>,
}

impl RecordingSink {
	pub fn new() -> Self {
		Self::default()
	}

	/// Snapshot of everything emitted so far, in emission order.
	pub fn events(&self) -> Vec<Event> {
		self.events.lock().unwrap().clone()
	}
}

impl OutputSink for RecordingSink {
	fn added(&self, order_id: u32, instrument: &str, price: u32, count: u32, side: Side, timestamp: u64) {
		self.events.lock().unwrap().push(Event::Added {
			order_id,
			instrument: instrument.to_string(),
			price,
			count,
			ask: side.is_ask(),
			timestamp,
		});
	}

	fn executed(
		&self,
		resting_id: u32,
		aggressor_id: u32,
		execution_count: u32,
		price: u32,
		count: u32,
		timestamp: u64,
	) {
		self.events.lock().unwrap().push(Event::Executed {
			resting_id,
			aggressor_id,
			execution_count,
			price,
			count,
			timestamp,
		});
	}

	fn deleted(&self, order_id: u32, accepted: bool, timestamp: u64) {
		self.events.lock().unwrap().push(Event::Deleted {
			order_id,
			accepted,
			timestamp,
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn line_sink_renders_expected_tokens() {
		let buf: Vec<u8> = Vec::new();
		let sink = LineSink::new(buf);
		sink.added(10, "GOOG", 100, 5, Side::Bid, 1);
		sink.executed(10, 11, 1, 100, 3, 2);
		sink.deleted(10, true, 3);

		let contents = {
			let w = sink.writer.lock().unwrap();
			String::from_utf8(w.clone()).unwrap()
		};
		let lines: Vec<&str> = contents.lines().collect();
		assert_eq!(lines[0], "Added 10 GOOG 100 5 false 1");
		assert_eq!(lines[1], "Executed 10 11 1 100 3 2");
		assert_eq!(lines[2], "Deleted 10 true 3");
	}

	#[test]
	fn recording_sink_preserves_emission_order() {
		let sink = RecordingSink::new();
		sink.added(1, "X", 10, 5, Side::Ask, 1);
		sink.deleted(1, false, 2);
		assert_eq!(
			sink.events(),
			vec![
				Event::Added {
					order_id: 1,
					instrument: "X".to_string(),
					price: 10,
					count: 5,
					ask: true,
					timestamp: 1,
				},
				Event::Deleted {
					order_id: 1,
					accepted: false,
					timestamp: 2,
				},
			]
		);
	}
}
