//! Message types and JSON wire codec for the peripheral service protocol.
//!
//! Every message on the wire, in both directions, is a JSON object with
//! exactly two top-level fields:
//!
//! ```text
//! { "type": <discriminant>, "payload": { ...variant-specific fields... } }
//! ```
//!
//! Commands flow from the client to the peripheral service, events flow
//! back. Both directions are closed sum types, so adding a variant forces a
//! compile-time update at every match site.

pub mod codec;
pub mod command;
pub mod event;

pub use codec::{decode_command, decode_event, encode_command, encode_event};
pub use command::TerminalCommand;
pub use event::TerminalEvent;
