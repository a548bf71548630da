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

//! Limit engine server entry point.

use limit_engine::ServerConfig;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
	let config = ServerConfig::from_env().unwrap_or_else(|_| ServerConfig::default());

	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	limit_engine::server::run(config)
}
