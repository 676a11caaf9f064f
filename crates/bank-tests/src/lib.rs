// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Bank Service Integration Tests
//!
//! Shared fixtures and an HTTP harness for the integration suites.
//!
//! - `integration_auth`: codec and gate properties
//! - `integration_http`: router-level status codes, error bodies and the
//!   user account flow
//!
//! ```bash
//! cargo test -p bank-tests
//! cargo test -p bank-tests --test integration_http
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::init_test_logging;
}
