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

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Engine server configuration. Mirrors the `config`-crate layering
/// convention: optional file first, then environment variables prefixed
/// `LIMIT_ENGINE_`, which always win.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
	/// TCP bind address workers accept connections on.
	pub bind_addr: SocketAddr,
	/// `tracing_subscriber::EnvFilter` directive string.
	pub log_filter: String,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			bind_addr: "0.0.0.0:7878".parse().unwrap(),
			log_filter: "info".to_string(),
		}
	}
}

impl ServerConfig {
	/// Loads configuration from `LIMIT_ENGINE_*` environment variables,
	/// falling back to [`ServerConfig::default`] for anything unset.
	pub fn from_env() -> Result<Self, config::ConfigError> {
		let defaults = Self::default();
		let cfg = config::Config::builder()
			.set_default("bind_addr", defaults.bind_addr.to_string())?
			.set_default("log_filter", defaults.log_filter)?
			.add_source(config::Environment::with_prefix("LIMIT_ENGINE"))
			.build()?;

		cfg.try_deserialize()
	}

	/// Loads configuration from a file (TOML/YAML/JSON, by extension),
	/// with environment variables still taking precedence over it.
	pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
		let defaults = Self::default();
		let cfg = config::Config::builder()
			.set_default("bind_addr", defaults.bind_addr.to_string())?
			.set_default("log_filter", defaults.log_filter)?
			.add_source(config::File::with_name(path))
			.add_source(config::Environment::with_prefix("LIMIT_ENGINE"))
			.build()?;

		cfg.try_deserialize()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_binds_to_7878() {
		let cfg = ServerConfig::default();
		assert_eq!(cfg.bind_addr.port(), 7878);
		assert_eq!(cfg.log_filter, "info");
	}

	#[test]
	fn from_env_falls_back_to_defaults_when_unset() {
		let cfg = ServerConfig::from_env().expect("defaults alone must deserialize");
		assert_eq!(cfg.bind_addr, ServerConfig::default().bind_addr);
	}
}
