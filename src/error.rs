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

use thiserror::Error;

/// A command line that failed to parse under the wire grammar.
///
/// Any occurrence of this error terminates the worker that produced it;
/// it is never recovered or retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
	#[error("empty command line")]
	Empty,
	#[error("unknown command {0:?}")]
	UnknownVerb(String),
	#[error("{verb} requires {expected} fields, got {actual}")]
	WrongFieldCount {
		verb: &'static str,
		expected: usize,
		actual: usize,
	},
	#[error("invalid order_id {0:?}")]
	InvalidOrderId(String),
	#[error("invalid price {0:?}")]
	InvalidPrice(String),
	#[error("invalid count {0:?}")]
	InvalidCount(String),
	#[error("price must be positive on buy/sell")]
	NonPositivePrice,
	#[error("count must be positive on buy/sell")]
	NonPositiveCount,
}
