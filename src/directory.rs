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

//! The instrument directory (instrument name -> Book) and order directory
//! (order id -> instrument/side), the two maps that let any worker thread
//! resolve a command to the right book or the right resting order.
//!
//! Both are backed by [`dashmap::DashMap`], a sharded concurrent hash map:
//! each shard carries its own internal lock, so a lookup on one key never
//! blocks a concurrent lookup on a key in a different shard. That gives us
//! many concurrent readers and rare exclusive writers for instrument lookup,
//! and fully serialized access per order id, without hand-rolling a
//! reader-writer lock: every access is a single guard acquisition that is
//! dropped before the caller moves on to acquire any other lock.

use std::sync::Arc;

use dashmap::DashMap;

use crate::book::Book;
use crate::types::Side;

/// `instrument_name -> Book`. Entries are created once, on first
/// reference, and never removed for the lifetime of the process. Because
/// the map's values are `Arc<Book>`, a `Book`'s address is stable even
/// though the map itself may rehash/resize as instruments are added.
#[derive(Default)]
pub struct InstrumentDirectory {
	books: DashMap<Arc<str>, Arc<Book>>,
}

impl InstrumentDirectory {
	pub fn new() -> Self {
		Self::default()
	}

	/// Resolves `name` to its `Book`, creating one on first reference.
	/// Once created, every caller observes the same `Book` identity.
	pub fn get_or_create(&self, name: &str) -> Arc<Book> {
		if let Some(book) = self.books.get(name) {
			return book.clone();
		}

		// Someone may have raced us between the read above and here;
		// `DashMap::entry` resolves that race atomically and is the
		// only point at which we take an exclusive (per-shard) lock.
		let instrument: Arc<str> = Arc::from(name);
		self.books
			.entry(instrument.clone())
			.or_insert_with(|| Arc::new(Book::new(instrument)))
			.clone()
	}

	/// Looks up an already-created `Book` without creating one. Used by
	/// cancellation, which only ever reaches an instrument that the order
	/// directory has already proven exists.
	pub fn get(&self, name: &str) -> Option<Arc<Book>> {
		self.books.get(name).map(|b| b.clone())
	}

	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.books.len()
	}
}

/// `order_id -> (instrument_name, side)`. An entry exists if and only if
/// the corresponding order is currently resting in some Book.
#[derive(Default)]
pub struct OrderDirectory {
	locations: DashMap<u32, (Arc<str>, Side)>,
}

impl OrderDirectory {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&self, order_id: u32, instrument: Arc<str>, side: Side) {
		self.locations.insert(order_id, (instrument, side));
	}

	pub fn remove(&self, order_id: u32) {
		self.locations.remove(&order_id);
	}

	pub fn lookup(&self, order_id: u32) -> Option<(Arc<str>, Side)> {
		self.locations.get(&order_id).map(|e| e.clone())
	}

	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.locations.len()
	}
}
