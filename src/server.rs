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

//! The TCP accept loop: one detached `std::thread` per accepted
//! connection, running the worker loop against a shared [`Engine`]. A
//! `ctrlc` handler stops the accept loop in response to SIGINT/SIGTERM so
//! the process exits cleanly instead of being killed mid-accept.

use std::io::BufReader;
use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info};

use crate::command::LineCommandSource;
use crate::config::ServerConfig;
use crate::engine::Engine;
use crate::event::LineSink;
use crate::worker;

/// Runs the accept loop until a shutdown signal arrives. Blocks the
/// calling thread for the lifetime of the server.
pub fn run(config: ServerConfig) -> anyhow::Result<()> {
	let listener = TcpListener::bind(config.bind_addr)
		.with_context(|| format!("failed to bind {}", config.bind_addr))?;
	// Accept must be interruptible by the shutdown flag below, so it
	// cannot be left blocking indefinitely.
	listener
		.set_nonblocking(true)
		.context("failed to set listener non-blocking")?;

	let sink = Arc::new(LineSink::new(std::io::stdout()));
	let engine = Arc::new(Engine::new(sink));

	let shutdown = Arc::new(AtomicBool::new(false));
	let shutdown_handler = shutdown.clone();
	ctrlc::set_handler(move || {
		info!("shutdown signal received");
		shutdown_handler.store(true, Ordering::SeqCst);
	})
	.context("failed to install signal handler")?;

	info!(addr = %config.bind_addr, "limit engine listening");

	let next_connection_id = AtomicU64::new(0);
	let mut handles = Vec::new();

	while !shutdown.load(Ordering::SeqCst) {
		match listener.accept() {
			Ok((stream, peer)) => {
				let connection_id = next_connection_id.fetch_add(1, Ordering::SeqCst);
				info!(connection_id, %peer, "connection accepted");
				let engine = engine.clone();
				let handle = thread::spawn(move || {
					let source = LineCommandSource::new(BufReader::new(stream));
					worker::run(connection_id, source, engine);
				});
				handles.push(handle);
			}
			Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
				thread::sleep(Duration::from_millis(50));
			}
			Err(e) => {
				error!(error = %e, "accept failed");
			}
		}
	}

	info!("shutting down, waiting for in-flight connections to close");
	for handle in handles {
		let _ = handle.join();
	}

	Ok(())
}
