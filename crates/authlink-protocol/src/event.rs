use authlink_core::AccessToken;
use serde::{Deserialize, Serialize};

/// Event observed by the peripheral service and pushed to the client.
///
/// Exactly one discriminant is active per message; the payload shape is
/// fully determined by the discriminant. Payload fields are carried
/// verbatim, no normalization happens at this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum TerminalEvent {
    /// A barcode was scanned that the service could not resolve.
    FoundUnknownBarcode { code: String },

    /// An NFC card was presented that is not registered to any account.
    FoundUnknownNfcCard { id: String, name: String },

    /// A scanned barcode resolved to a product.
    FoundProductId { product_id: String },

    /// The service issued an access token for an authenticated account.
    FoundAccountAccessToken { access_token: AccessToken },

    /// The NFC card was taken off the reader.
    NfcCardRemoved {},
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_barcode_parse() {
        let text = r#"{ "type": "FoundUnknownBarcode", "payload": { "code": "4006381333931" } }"#;
        let event: TerminalEvent = serde_json::from_str(text).unwrap();

        assert_eq!(
            event,
            TerminalEvent::FoundUnknownBarcode {
                code: "4006381333931".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_nfc_card_parse() {
        let text = r#"{
            "type": "FoundUnknownNfcCard",
            "payload": { "id": "04:a2:55:1b", "name": "Generic NFC tag" }
        }"#;
        let event: TerminalEvent = serde_json::from_str(text).unwrap();

        assert_eq!(
            event,
            TerminalEvent::FoundUnknownNfcCard {
                id: "04:a2:55:1b".to_string(),
                name: "Generic NFC tag".to_string(),
            }
        );
    }

    #[test]
    fn test_product_id_parse() {
        let text = r#"{ "type": "FoundProductId", "payload": { "product_id": "club-mate" } }"#;
        let event: TerminalEvent = serde_json::from_str(text).unwrap();

        assert_eq!(
            event,
            TerminalEvent::FoundProductId {
                product_id: "club-mate".to_string(),
            }
        );
    }

    #[test]
    fn test_access_token_parse() {
        let text =
            r#"{ "type": "FoundAccountAccessToken", "payload": { "access_token": "tok-9f2c" } }"#;
        let event: TerminalEvent = serde_json::from_str(text).unwrap();

        assert_eq!(
            event,
            TerminalEvent::FoundAccountAccessToken {
                access_token: AccessToken::new("tok-9f2c").unwrap(),
            }
        );
    }

    #[test]
    fn test_card_removed_parse() {
        let text = r#"{ "type": "NfcCardRemoved", "payload": {} }"#;
        let event: TerminalEvent = serde_json::from_str(text).unwrap();

        assert_eq!(event, TerminalEvent::NfcCardRemoved {});
    }

    #[test]
    fn test_card_removed_wire_shape() {
        let value = serde_json::to_value(TerminalEvent::NfcCardRemoved {}).unwrap();
        assert_eq!(value, json!({ "type": "NfcCardRemoved", "payload": {} }));
    }
}
