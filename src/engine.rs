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

//! The engine: the single explicitly-owned value holding all shared
//! state. One `Arc<Engine>` is shared by every worker thread; its
//! interior locking (the instrument directory, the order directory, and
//! each Book's own mutex) is the entire means by which concurrent access
//! is made safe.

use std::sync::Arc;

use tracing::debug;

use crate::command::Command;
use crate::directory::{InstrumentDirectory, OrderDirectory};
use crate::event::OutputSink;
use crate::timestamp::TimestampService;
use crate::types::Side;

pub struct Engine {
	instruments: InstrumentDirectory,
	orders: OrderDirectory,
	clock: TimestampService,
	sink: Arc<dyn OutputSink>,
}

impl Engine {
	pub fn new(sink: Arc<dyn OutputSink>) -> Self {
		Self {
			instruments: InstrumentDirectory::new(),
			orders: OrderDirectory::new(),
			clock: TimestampService::new(),
			sink,
		}
	}

	/// Dispatches one already-parsed [`Command`]. This is the entire
	/// surface the worker loop needs.
	pub fn apply(&self, command: Command) {
		match command {
			Command::Buy {
				order_id,
				price,
				count,
				instrument,
			} => self.submit(Side::Bid, order_id, price, count, &instrument),
			Command::Sell {
				order_id,
				price,
				count,
				instrument,
			} => self.submit(Side::Ask, order_id, price, count, &instrument),
			Command::Cancel { order_id } => self.cancel(order_id),
		}
	}

	/// Add-bid / add-ask. Resolves or creates the target Book, then hands
	/// off to the Book's own lock; the instrument directory's lock is
	/// released the instant the `Arc<Book>` clone is returned, well
	/// before the Book's mutex is taken, so unrelated instruments never
	/// wait on each other.
	pub fn submit(&self, side: Side, order_id: u32, price: u32, count: u32, instrument: &str) {
		let book = self.instruments.get_or_create(instrument);
		book.submit(side, order_id, price, count, &self.orders, &self.clock, &*self.sink);
	}

	/// Cancellation. The order-directory lookup is a standalone
	/// acquisition of its lock — no Book lock held — and its guard is
	/// dropped before any Book's lock is ever requested.
	pub fn cancel(&self, order_id: u32) {
		let location = match self.orders.lookup(order_id) {
			Some(loc) => loc,
			None => {
				let ts = self.clock.next();
				debug!(order_id, accepted = false, "cancel: unknown order");
				self.sink.deleted(order_id, false, ts);
				return;
			}
		};

		let (instrument, side) = location;
		// The order directory only ever names instruments whose Book
		// already exists (a Book is created before any order can rest
		// in it), so this is resolved without risking another insert.
		let book = self
			.instruments
			.get(&instrument)
			.expect("order directory referenced a nonexistent book");

		book.cancel(order_id, side, &self.orders, &self.clock, &*self.sink);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::event::{Event, RecordingSink};

	fn engine_with_recorder() -> (Engine, Arc<RecordingSink>) {
		let sink = Arc::new(RecordingSink::new());
		(Engine::new(sink.clone()), sink)
	}

	#[test]
	fn cancel_then_rematch_is_rejected() {
		let (engine, sink) = engine_with_recorder();
		engine.apply(Command::Buy {
			order_id: 60,
			price: 100,
			count: 1,
			instrument: "Z".to_string(),
		});
		engine.apply(Command::Sell {
			order_id: 61,
			price: 100,
			count: 1,
			instrument: "Z".to_string(),
		});
		engine.apply(Command::Cancel { order_id: 60 });

		let events = sink.events();
		assert!(matches!(events[0], Event::Added { order_id: 60, .. }));
		assert!(matches!(
			events[1],
			Event::Executed {
				resting_id: 60,
				aggressor_id: 61,
				execution_count: 1,
				..
			}
		));
		assert!(matches!(
			events[2],
			Event::Deleted {
				order_id: 60,
				accepted: false,
				..
			}
		));
	}

	#[test]
	fn cancel_accepted_scenario() {
		let (engine, sink) = engine_with_recorder();
		engine.apply(Command::Buy {
			order_id: 50,
			price: 100,
			count: 1,
			instrument: "Y".to_string(),
		});
		engine.apply(Command::Cancel { order_id: 50 });

		let events = sink.events();
		assert!(matches!(events[0], Event::Added { order_id: 50, .. }));
		assert!(matches!(
			events[1],
			Event::Deleted {
				order_id: 50,
				accepted: true,
				..
			}
		));
	}

	#[test]
	fn distinct_instruments_are_independent() {
		let (engine, sink) = engine_with_recorder();
		engine.apply(Command::Buy {
			order_id: 1,
			price: 10,
			count: 1,
			instrument: "A".to_string(),
		});
		engine.apply(Command::Sell {
			order_id: 2,
			price: 20,
			count: 1,
			instrument: "B".to_string(),
		});

		let events = sink.events();
		assert_eq!(events.len(), 2);
		assert!(matches!(events[0], Event::Added { order_id: 1, .. }));
		assert!(matches!(events[1], Event::Added { order_id: 2, .. }));
	}

	#[test]
	fn timestamps_are_strictly_increasing_across_instruments() {
		let (engine, sink) = engine_with_recorder();
		engine.apply(Command::Buy {
			order_id: 1,
			price: 10,
			count: 1,
			instrument: "A".to_string(),
		});
		engine.apply(Command::Buy {
			order_id: 2,
			price: 10,
			count: 1,
			instrument: "B".to_string(),
		});
		engine.apply(Command::Buy {
			order_id: 3,
			price: 10,
			count: 1,
			instrument: "A".to_string(),
		});

		fn ts(e: &Event) -> u64 {
			match e {
				Event::Added { timestamp, .. } => *timestamp,
				Event::Executed { timestamp, .. } => *timestamp,
				Event::Deleted { timestamp, .. } => *timestamp,
			}
		}

		let events = sink.events();
		let timestamps: Vec<u64> = events.iter().map(ts).collect();
		let mut sorted = timestamps.clone();
		sorted.sort_unstable();
		assert_eq!(timestamps, sorted);
		assert_eq!(timestamps.iter().collect::<std::collections::HashSet<_>>().len(), 3);
	}
}
