//! Shared constants for end-to-end tests.

/// Regular test user handle
pub const TEST_USER: &str = "alice";

/// Regular test user password
pub const TEST_PASS: &str = "P@ss1234";

/// Second test user handle, for ownership and subscription scenarios
pub const OTHER_USER: &str = "bob";

/// Second test user password
pub const OTHER_PASS: &str = "hunter2hunter2";

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
