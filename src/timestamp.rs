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

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide monotonic logical clock.
///
/// Every call to [`TimestampService::next`] returns a value strictly greater
/// than any value previously returned, across every thread. This value
/// doubles as both the event timestamp on emitted output records and the
/// `arrival_seq` used for time-priority tie-breaking inside a [`Book`].
///
/// Deliberately not wall-clock time: tests depend on a pure logical
/// ordering, and the matching core never needs to know what time it is,
/// only what order things happened in.
///
/// [`Book`]: crate::book::Book
#[derive(Debug, Default)]
pub struct TimestampService {
	counter: AtomicU64,
}

impl TimestampService {
	pub fn new() -> Self {
		Self {
			counter: AtomicU64::new(0),
		}
	}

	/// Returns the next timestamp in the global total order.
	pub fn next(&self) -> u64 {
		self.counter.fetch_add(1, Ordering::SeqCst) + 1
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;
	use std::thread;

	#[test]
	fn strictly_increasing_single_threaded() {
		let clock = TimestampService::new();
		let a = clock.next();
		let b = clock.next();
		let c = clock.next();
		assert!(a < b);
		assert!(b < c);
	}

	#[test]
	fn unique_under_contention() {
		let clock = Arc::new(TimestampService::new());
		let mut handles = Vec::new();
		for _ in 0..8 {
			let clock = clock.clone();
			handles.push(thread::spawn(move || {
				(0..500).map(|_| clock.next()).collect::<Vec<_>>()
			}));
		}

		let mut all: Vec<u64> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
		let total = all.len();
		all.sort_unstable();
		all.dedup();
		assert_eq!(all.len(), total, "every issued timestamp must be unique");
	}
}
