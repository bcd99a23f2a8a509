//! Limits applied by the router's middleware stack.

use std::time::Duration;

/// Per-request timeout applied to all routes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;
