use authlink_core::AccountId;
use serde::{Deserialize, Serialize};

/// Command sent from the client to the peripheral service.
///
/// Variants with no data are empty struct variants rather than unit
/// variants: the wire format requires the `payload` field to be present as
/// `{}` even when a command carries nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum TerminalCommand {
    /// Ask the service to issue an access token for the account currently
    /// authenticated at the terminal.
    RequestAccountAccessToken {},

    /// Ask the peripheral device to reboot.
    RequestReboot {},

    /// Bind the NFC card currently on the reader to the given account.
    RegisterNfcCard { account_id: AccountId },
}
