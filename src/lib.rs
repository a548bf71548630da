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

//! Limit Engine
//!
//! A concurrent, multi-instrument continuous limit order book. Each
//! instrument's book is matched under price-time priority behind its own
//! mutex; one OS thread per client connection drives commands into a
//! shared [`Engine`] handle, with no async runtime and no matching thread
//! of its own.
//!
//! Architecture:
//! - Thread-per-connection concurrency, no shared matching thread
//! - Per-instrument `Mutex`-protected books, sharded concurrent directories
//! - Strict lock order (instrument directory -> book -> order directory)
//!   to keep distinct instruments matching in parallel
//! - Monotonic logical timestamps for both event ordering and time priority

pub mod book;
pub mod command;
pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod event;
pub mod server;
pub mod timestamp;
pub mod types;
pub mod worker;

pub use book::{Book, RestingOrder};
pub use command::{Command, CommandSource, LineCommandSource};
pub use config::ServerConfig;
pub use directory::{InstrumentDirectory, OrderDirectory};
pub use engine::Engine;
pub use error::CommandParseError;
pub use event::{Event, LineSink, OutputSink, RecordingSink};
pub use timestamp::TimestampService;
pub use types::Side;
