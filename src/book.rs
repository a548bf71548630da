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

//! The per-instrument order book: the core of the engine.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::directory::OrderDirectory;
use crate::event::OutputSink;
use crate::timestamp::TimestampService;
use crate::types::Side;

/// A resting order, as it sits inside a [`Book`]'s heap.
///
/// `price`, `arrival_seq`, and `side` are the ordering keys and are never
/// mutated once the order is constructed. `remaining_count` and
/// `execution_count` mutate while the order rests, via the classical
/// pop-modify-push idiom: neither participates in [`Ord`], so mutating
/// them between a pop and the matching push never violates the heap's
/// invariant.
#[derive(Debug, Clone)]
pub struct RestingOrder {
	pub order_id: u32,
	pub price: u32,
	pub remaining_count: u32,
	pub arrival_seq: u64,
	pub side: Side,
	pub execution_count: u32,
	pub instrument: Arc<str>,
}

impl PartialEq for RestingOrder {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for RestingOrder {}

impl PartialOrd for RestingOrder {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for RestingOrder {
	/// Price-time priority. Bids: higher price, then earlier arrival,
	/// sort greatest-first so [`BinaryHeap::peek`] is always best-of-book.
	/// Asks: lower price, then earlier arrival, same greatest-first
	/// convention achieved by reversing the price comparison.
	///
	/// Both heaps in a [`Book`] only ever hold orders of one `side`, so
	/// comparing two orders is only ever done within a single side.
	fn cmp(&self, other: &Self) -> Ordering {
		let price_order = match self.side {
			Side::Bid => self.price.cmp(&other.price),
			Side::Ask => other.price.cmp(&self.price),
		};
		price_order.then_with(|| other.arrival_seq.cmp(&self.arrival_seq))
	}
}

struct BookState {
	bids: BinaryHeap<RestingOrder>,
	asks: BinaryHeap<RestingOrder>,
}

impl BookState {
	fn new() -> Self {
		Self {
			bids: BinaryHeap::new(),
			asks: BinaryHeap::new(),
		}
	}

	fn side_mut(&mut self, side: Side) -> &mut BinaryHeap<RestingOrder> {
		match side {
			Side::Bid => &mut self.bids,
			Side::Ask => &mut self.asks,
		}
	}
}

/// One instrument's order book: a pair of priority queues behind a single
/// mutex. Every public method here acquires that mutex exactly once for
/// the whole operation: a command touches at most one Book, and never
/// while holding another Book's lock.
pub struct Book {
	instrument: Arc<str>,
	state: Mutex<BookState>,
}

impl Book {
	pub fn new(instrument: Arc<str>) -> Self {
		Self {
			instrument,
			state: Mutex::new(BookState::new()),
		}
	}

	pub fn instrument(&self) -> &Arc<str> {
		&self.instrument
	}

	/// Add-bid / add-ask: match against the opposite side, then rest any
	/// remainder. `side` is the side of the *incoming* order.
	pub fn submit(
		&self,
		side: Side,
		order_id: u32,
		price: u32,
		mut count: u32,
		orders: &OrderDirectory,
		clock: &TimestampService,
		sink: &dyn OutputSink,
	) {
		let mut state = self.state.lock().unwrap();

		while count > 0 {
			let crosses = match state.side_mut(side.opposite()).peek() {
				Some(top) => match side {
					Side::Bid => top.price <= price,
					Side::Ask => top.price >= price,
				},
				None => false,
			};
			if !crosses {
				break;
			}

			let mut resting = state.side_mut(side.opposite()).pop().unwrap();
			let fill = count.min(resting.remaining_count);
			count -= fill;
			resting.remaining_count -= fill;
			resting.execution_count += 1;

			let ts = clock.next();
			sink.executed(
				resting.order_id,
				order_id,
				resting.execution_count,
				resting.price,
				fill,
				ts,
			);
			debug!(
				resting_id = resting.order_id,
				aggressor_id = order_id,
				execution_count = resting.execution_count,
				price = resting.price,
				fill,
				"executed"
			);

			if resting.remaining_count > 0 {
				state.side_mut(side.opposite()).push(resting);
			} else {
				orders.remove(resting.order_id);
			}
		}

		if count > 0 {
			let ts = clock.next();
			sink.added(order_id, &self.instrument, price, count, side, ts);
			debug!(order_id, instrument = %self.instrument, price, count, %side, "added");

			let resting = RestingOrder {
				order_id,
				price,
				remaining_count: count,
				arrival_seq: ts,
				side,
				execution_count: 0,
				instrument: self.instrument.clone(),
			};
			state.side_mut(side).push(resting);
			orders.insert(order_id, self.instrument.clone(), side);
		}
	}

	/// Cancellation: the caller has already resolved `side` from the order
	/// directory and released its lock before taking this Book's lock.
	///
	/// Implemented as drain-and-rebuild: the simplest approach that
	/// preserves the pop-modify-push idiom used by [`Book::submit`] and
	/// keeps [`RestingOrder`] free of bookkeeping fields that would only
	/// exist to support O(log n) removal.
	pub fn cancel(
		&self,
		order_id: u32,
		side: Side,
		orders: &OrderDirectory,
		clock: &TimestampService,
		sink: &dyn OutputSink,
	) {
		let mut state = self.state.lock().unwrap();
		let heap = state.side_mut(side);

		let mut found = false;
		let mut kept = BinaryHeap::with_capacity(heap.len());
		for order in heap.drain() {
			if order.order_id == order_id {
				found = true;
			} else {
				kept.push(order);
			}
		}
		*heap = kept;

		if found {
			orders.remove(order_id);
		}

		let ts = clock.next();
		sink.deleted(order_id, found, ts);
		debug!(order_id, accepted = found, "deleted");
	}

	/// Best bid and ask prices, for invariant checks in tests. Never
	/// crossed at rest: `best_bid < best_ask` whenever both sides are
	/// non-empty.
	#[cfg(test)]
	pub fn best_prices(&self) -> (Option<u32>, Option<u32>) {
		let state = self.state.lock().unwrap();
		(
			state.bids.peek().map(|o| o.price),
			state.asks.peek().map(|o| o.price),
		)
	}

	#[cfg(test)]
	pub fn resting_count(&self, side: Side) -> usize {
		let mut state = self.state.lock().unwrap();
		state.side_mut(side).len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::event::RecordingSink;

	fn harness() -> (Book, OrderDirectory, TimestampService, RecordingSink) {
		(
			Book::new(Arc::from("GOOG")),
			OrderDirectory::new(),
			TimestampService::new(),
			RecordingSink::new(),
		)
	}

	#[test]
	fn rest_then_match_partial_fill() {
		let (book, orders, clock, sink) = harness();
		book.submit(Side::Bid, 10, 100, 5, &orders, &clock, &sink);
		book.submit(Side::Ask, 11, 100, 3, &orders, &clock, &sink);

		let events = sink.events();
		assert_eq!(events.len(), 2);
		let (best_bid, best_ask) = book.best_prices();
		assert_eq!(best_bid, Some(100));
		assert_eq!(best_ask, None);
		assert_eq!(book.resting_count(Side::Bid), 1);
		assert!(orders.lookup(10).is_some());
		assert!(orders.lookup(11).is_none());
	}

	#[test]
	fn price_improvement_uses_resting_price() {
		let (book, orders, clock, sink) = harness();
		book.submit(Side::Ask, 20, 90, 4, &orders, &clock, &sink);
		book.submit(Side::Bid, 21, 100, 4, &orders, &clock, &sink);

		let events = sink.events();
		match &events[1] {
			crate::event::Event::Executed { price, count, .. } => {
				assert_eq!(*price, 90);
				assert_eq!(*count, 4);
			}
			other => panic!("expected Executed, got {other:?}"),
		}
	}

	#[test]
	fn execution_count_increments_per_fill() {
		let (book, orders, clock, sink) = harness();
		book.submit(Side::Bid, 1, 100, 10, &orders, &clock, &sink);
		book.submit(Side::Ask, 2, 100, 2, &orders, &clock, &sink);
		book.submit(Side::Ask, 3, 100, 3, &orders, &clock, &sink);

		let executed: Vec<u32> = sink
			.events()
			.into_iter()
			.filter_map(|e| match e {
				crate::event::Event::Executed {
					execution_count, ..
				} => Some(execution_count),
				_ => None,
			})
			.collect();
		assert_eq!(executed, vec![1, 2]);
	}

	#[test]
	fn book_never_crosses_at_rest() {
		let (book, orders, clock, sink) = harness();
		book.submit(Side::Bid, 1, 99, 5, &orders, &clock, &sink);
		book.submit(Side::Ask, 2, 101, 5, &orders, &clock, &sink);
		let (bid, ask) = book.best_prices();
		assert!(bid < ask);
	}

	#[test]
	fn cancel_accepted_for_live_order() {
		let (book, orders, clock, sink) = harness();
		book.submit(Side::Bid, 50, 100, 1, &orders, &clock, &sink);
		book.cancel(50, Side::Bid, &orders, &clock, &sink);

		match sink.events().last().unwrap() {
			crate::event::Event::Deleted { accepted, .. } => assert!(*accepted),
			other => panic!("expected Deleted, got {other:?}"),
		}
		assert!(orders.lookup(50).is_none());
		assert_eq!(book.resting_count(Side::Bid), 0);
	}

	#[test]
	fn cancel_rejected_for_unknown_order() {
		let (book, orders, clock, sink) = harness();
		book.cancel(999, Side::Bid, &orders, &clock, &sink);
		match sink.events().last().unwrap() {
			crate::event::Event::Deleted { accepted, .. } => assert!(!*accepted),
			other => panic!("expected Deleted, got {other:?}"),
		}
	}

	#[test]
	fn multi_level_sweep_preserves_price_time_priority() {
		let (book, orders, clock, sink) = harness();
		book.submit(Side::Ask, 40, 10, 1, &orders, &clock, &sink);
		book.submit(Side::Ask, 41, 10, 1, &orders, &clock, &sink);
		book.submit(Side::Ask, 42, 11, 1, &orders, &clock, &sink);
		book.submit(Side::Bid, 43, 11, 3, &orders, &clock, &sink);

		let resting_ids: Vec<u32> = sink
			.events()
			.into_iter()
			.filter_map(|e| match e {
				crate::event::Event::Executed { resting_id, .. } => Some(resting_id),
				_ => None,
			})
			.collect();
		assert_eq!(resting_ids, vec![40, 41, 42]);
	}
}
