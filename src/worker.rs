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

//! The per-connection worker loop: one OS thread per connection, reading
//! commands until end of stream, a malformed command, or an I/O error.
//! There is no pool and no async runtime — the thread *is* the unit of
//! concurrency, and every command it reads translates 1:1 into a call on
//! the shared [`Engine`].

use std::sync::Arc;

use tracing::{info, warn};

use crate::command::{CommandSource, ReadOutcome};
use crate::engine::Engine;

/// Drives one connection's command stream against `engine` until the
/// stream ends or a command cannot be honored, then returns. Callers are
/// expected to run this on its own thread.
pub fn run<S: CommandSource>(connection_id: u64, mut source: S, engine: Arc<Engine>) {
	loop {
		match source.read_command() {
			ReadOutcome::Command(command) => {
				engine.apply(command);
			}
			ReadOutcome::EndOfStream => {
				info!(connection_id, "connection closed");
				return;
			}
			ReadOutcome::Malformed(err) => {
				warn!(connection_id, error = %err, "malformed command, closing connection");
				return;
			}
			ReadOutcome::Io(err) => {
				warn!(connection_id, error = %err, "i/o error, closing connection");
				return;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::event::{Event, RecordingSink};
	use crate::command::LineCommandSource;

	#[test]
	fn processes_every_well_formed_command_then_stops_at_eof() {
		let data = b"BUY 1 100 5 GOOG\nSELL 2 100 5 GOOG\n";
		let source = LineCommandSource::new(&data[..]);
		let sink = Arc::new(RecordingSink::new());
		let engine = Arc::new(Engine::new(sink.clone()));

		run(1, source, engine);

		let events = sink.events();
		assert!(matches!(events[0], Event::Added { order_id: 1, .. }));
		assert!(matches!(
			events[1],
			Event::Executed {
				resting_id: 1,
				aggressor_id: 2,
				..
			}
		));
	}

	#[test]
	fn stops_on_first_malformed_command() {
		let data = b"BUY 1 100 5 GOOG\nBOGUS\nBUY 2 100 5 GOOG\n";
		let source = LineCommandSource::new(&data[..]);
		let sink = Arc::new(RecordingSink::new());
		let engine = Arc::new(Engine::new(sink.clone()));

		run(1, source, engine);

		assert_eq!(sink.events().len(), 1);
	}
}
