//! Connection manager for the authentication peripheral service.
//!
//! This crate maintains one persistent WebSocket connection to the
//! peripheral service (card/barcode reader, access-token issuance, device
//! reboot), serializes outbound commands, parses inbound events and fans
//! them out to registered observers. Lost connections are re-established
//! automatically after a fixed delay, for as long as the client lives.
//!
//! # Architecture
//!
//! ```text
//! TerminalClient ──commands──► writer slot ───┐
//!      │                                      ▼
//!      │ add/remove handlers          WebSocket connection
//!      ▼                                      │
//! HandlerRegistry ◄──events── connection task ┘
//!      │
//!      └─► observer callbacks (registration order)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use authlink_client::{ClientConfig, ClientEvent, TerminalClient};
//!
//! # async fn example() {
//! let client = TerminalClient::connect(ClientConfig::default());
//!
//! client.add_event_handler(|event: &ClientEvent| {
//!     println!("peripheral: {event:?}");
//! });
//!
//! client.request_account_access_token().await;
//! # }
//! ```

mod client;
mod connection;
mod handlers;

pub use client::{ClientConfig, TerminalClient};
pub use connection::ConnectionState;
pub use handlers::{ClientEvent, EventHandler, HandlerId};
