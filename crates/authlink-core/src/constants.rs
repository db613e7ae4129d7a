//! Core constants for the peripheral service client.
//!
//! These values define the default transport configuration and the
//! validation bounds applied by the domain newtypes in [`crate::types`].

/// Default peripheral service endpoint.
///
/// This is the address the terminal service listens on in a standard
/// deployment. Callers can point the client elsewhere through the client
/// configuration; this value is only a fallback.
///
/// # Examples
///
/// ```
/// use authlink_core::constants::DEFAULT_ENDPOINT;
///
/// assert!(DEFAULT_ENDPOINT.starts_with("ws://"));
/// ```
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8080";

/// Delay between a connection loss and the next reconnect attempt, in
/// milliseconds.
///
/// The reconnect loop uses a fixed interval. There is no backoff and no
/// retry cap; the client keeps attempting for the process lifetime.
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 1000;

/// Minimum account id length in characters.
pub const MIN_ACCOUNT_ID_LENGTH: usize = 1;

/// Maximum account id length in characters.
pub const MAX_ACCOUNT_ID_LENGTH: usize = 64;
