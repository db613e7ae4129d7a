//! JSON encode/decode boundary between message types and text frames.
//!
//! The client encodes commands and decodes events. The opposite pair exists
//! for the peer side of the wire; the integration test harness uses it to
//! stand in for the peripheral service.

use authlink_core::{Error, Result};

use crate::command::TerminalCommand;
use crate::event::TerminalEvent;

/// Encode an outbound command as a JSON text frame.
///
/// # Errors
/// Returns `Error::MessageEncoding` if serialization fails.
pub fn encode_command(command: &TerminalCommand) -> Result<String> {
    serde_json::to_string(command).map_err(|e| Error::MessageEncoding(e.to_string()))
}

/// Decode an inbound text frame as an event.
///
/// # Errors
/// Returns `Error::MalformedMessage` if the text is not valid JSON or does
/// not match any known event discriminant/payload shape.
pub fn decode_event(text: &str) -> Result<TerminalEvent> {
    serde_json::from_str(text).map_err(|e| Error::MalformedMessage(e.to_string()))
}

/// Encode an event as a JSON text frame (peer side).
///
/// # Errors
/// Returns `Error::MessageEncoding` if serialization fails.
pub fn encode_event(event: &TerminalEvent) -> Result<String> {
    serde_json::to_string(event).map_err(|e| Error::MessageEncoding(e.to_string()))
}

/// Decode a text frame as a command (peer side).
///
/// # Errors
/// Returns `Error::MalformedMessage` if the text does not match any known
/// command discriminant/payload shape.
pub fn decode_command(text: &str) -> Result<TerminalCommand> {
    serde_json::from_str(text).map_err(|e| Error::MalformedMessage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use authlink_core::AccountId;

    #[test]
    fn test_command_round_trip() {
        let command = TerminalCommand::RegisterNfcCard {
            account_id: AccountId::new("acct-123").unwrap(),
        };

        let text = encode_command(&command).unwrap();
        let decoded = decode_command(&text).unwrap();

        assert_eq!(command, decoded);
    }

    #[test]
    fn test_decode_event_rejects_invalid_json() {
        let result = decode_event("not json at all");
        assert!(matches!(result, Err(Error::MalformedMessage(_))));
    }

    #[test]
    fn test_decode_event_rejects_unknown_discriminant() {
        let result = decode_event(r#"{ "type": "SelfDestruct", "payload": {} }"#);
        assert!(matches!(result, Err(Error::MalformedMessage(_))));
    }

    #[test]
    fn test_decode_event_rejects_wrong_payload_shape() {
        // FoundUnknownBarcode requires a `code` field
        let result = decode_event(r#"{ "type": "FoundUnknownBarcode", "payload": {} }"#);
        assert!(matches!(result, Err(Error::MalformedMessage(_))));
    }
}
