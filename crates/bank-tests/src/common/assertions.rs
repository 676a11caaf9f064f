// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Checks for the `{success, data}` and `{success, error, timestamp}` envelopes.

use axum::http::StatusCode;
use bank_api::{AuthError, TokenError};
use serde_json::Value;

use super::harness::TestResponse;

/// Assertion extensions for [`TestResponse`].
pub trait ResponseAssertions {
    /// Assert a success envelope with the given status and return `data`.
    fn assert_success(&self, status: StatusCode) -> &Value;

    /// Assert an error envelope with the given status whose message contains
    /// `fragment`.
    fn assert_error(&self, status: StatusCode, fragment: &str);
}

impl ResponseAssertions for TestResponse {
    fn assert_success(&self, status: StatusCode) -> &Value {
        assert_eq!(
            self.status, status,
            "Expected {}, got {} with body {}",
            status, self.status, self.body
        );
        assert_eq!(self.body["success"], true, "Body: {}", self.body);
        &self.body["data"]
    }

    fn assert_error(&self, status: StatusCode, fragment: &str) {
        assert_eq!(
            self.status, status,
            "Expected {}, got {} with body {}",
            status, self.status, self.body
        );
        assert_eq!(self.body["success"], false, "Body: {}", self.body);

        let message = self.body["error"]
            .as_str()
            .unwrap_or_else(|| panic!("Missing error message in {}", self.body));
        assert!(
            message.contains(fragment),
            "Expected error containing {:?}, got {:?}",
            fragment,
            message
        );

        let timestamp = self.body["timestamp"]
            .as_str()
            .unwrap_or_else(|| panic!("Missing timestamp in {}", self.body));
        assert!(
            chrono::DateTime::parse_from_rfc3339(timestamp).is_ok(),
            "Timestamp {:?} is not RFC 3339",
            timestamp
        );
    }
}

/// Assert that a gate error is an authentication failure of the given kind.
pub fn assert_token_error(result: Result<impl std::fmt::Debug, AuthError>, kind: &str) {
    match result {
        Err(AuthError::AuthenticationFailed(e)) => assert_eq!(
            e.kind(),
            kind,
            "Expected {} but verification failed with {:?}",
            kind,
            e
        ),
        other => panic!("Expected AuthenticationFailed({}), got {:?}", kind, other),
    }
}

/// Assert that a codec result failed with the given kind.
pub fn assert_verify_error(result: Result<impl std::fmt::Debug, TokenError>, kind: &str) {
    match result {
        Err(e) => assert_eq!(e.kind(), kind, "Expected {} but got {:?}", kind, e),
        Ok(v) => panic!("Expected {} but verification succeeded with {:?}", kind, v),
    }
}
