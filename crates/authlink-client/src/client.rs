//! Client handle for the authentication peripheral service.

use std::sync::Arc;
use std::time::Duration;

use futures_util::SinkExt;
use tokio::sync::{Mutex, watch};
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use authlink_core::{AccountId, constants};
use authlink_protocol::{TerminalCommand, codec};

use crate::connection::{CommandSink, ConnectionState, ConnectionTask};
use crate::handlers::{ClientEvent, EventHandler, HandlerId, HandlerRegistry};

/// Configuration for the terminal client.
///
/// # Example
///
/// ```
/// use authlink_client::ClientConfig;
/// use std::time::Duration;
/// use url::Url;
///
/// let config = ClientConfig {
///     endpoint: Url::parse("ws://192.168.0.20:8080").unwrap(),
///     reconnect_delay: Duration::from_millis(1000),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket endpoint of the peripheral service.
    pub endpoint: Url,

    /// Fixed delay between a connection loss and the next attempt.
    /// No backoff is applied and there is no attempt limit.
    pub reconnect_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(constants::DEFAULT_ENDPOINT).unwrap(),
            reconnect_delay: Duration::from_millis(constants::DEFAULT_RECONNECT_DELAY_MS),
        }
    }
}

/// Client for the authentication peripheral service.
///
/// Owns one persistent WebSocket connection, run by a background task
/// spawned at construction. Inbound events are dispatched synchronously to
/// every registered handler in registration order; outbound commands are
/// fire-and-forget.
///
/// # Connection lifecycle
///
/// The connection is established asynchronously right after
/// [`connect`](Self::connect) returns. On any loss the task waits the
/// configured delay and reconnects, indefinitely. Commands issued while
/// disconnected are dropped, not queued. [`shutdown`](Self::shutdown) stops
/// the task; without it the connection lives as long as the process.
///
/// # Example
///
/// ```no_run
/// use authlink_client::{ClientConfig, ClientEvent, TerminalClient};
/// use authlink_core::AccountId;
///
/// # async fn example() -> authlink_core::Result<()> {
/// let client = TerminalClient::connect(ClientConfig::default());
///
/// let id = client.add_event_handler(|event: &ClientEvent| {
///     println!("peripheral: {event:?}");
/// });
///
/// client.register_nfc_card(AccountId::new("acct-123")?).await;
///
/// client.remove_event_handler(id);
/// client.shutdown();
/// # Ok(())
/// # }
/// ```
pub struct TerminalClient {
    handlers: Arc<HandlerRegistry>,
    writer: Arc<Mutex<Option<CommandSink>>>,
    state_rx: watch::Receiver<ConnectionState>,
    cancel: CancellationToken,
}

impl TerminalClient {
    /// Create the client and start connecting.
    ///
    /// Returns immediately; the first connection attempt happens on the
    /// spawned background task. Must be called from within a tokio
    /// runtime.
    #[must_use]
    pub fn connect(config: ClientConfig) -> Self {
        debug!(endpoint = %config.endpoint, "Creating terminal client");

        let handlers = Arc::new(HandlerRegistry::new());
        let writer: Arc<Mutex<Option<CommandSink>>> = Arc::new(Mutex::new(None));
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let cancel = CancellationToken::new();

        let task = ConnectionTask {
            endpoint: config.endpoint,
            reconnect_delay: config.reconnect_delay,
            handlers: Arc::clone(&handlers),
            writer: Arc::clone(&writer),
            state_tx,
            cancel: cancel.clone(),
        };
        tokio::spawn(task.run());

        Self {
            handlers,
            writer,
            state_rx,
            cancel,
        }
    }

    /// Register an event handler. Handlers are invoked in registration
    /// order, once per event.
    pub fn add_event_handler<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&ClientEvent) + Send + Sync + 'static,
    {
        self.handlers.add(Arc::new(handler) as EventHandler)
    }

    /// Remove a previously registered handler. No-op if it was already
    /// removed.
    pub fn remove_event_handler(&self, id: HandlerId) {
        self.handlers.remove(id);
    }

    /// Ask the service to issue an access token for the account currently
    /// authenticated at the terminal. The token arrives later as a
    /// [`TerminalEvent::FoundAccountAccessToken`] event.
    ///
    /// [`TerminalEvent::FoundAccountAccessToken`]: authlink_protocol::TerminalEvent::FoundAccountAccessToken
    pub async fn request_account_access_token(&self) {
        self.send(TerminalCommand::RequestAccountAccessToken {}).await;
    }

    /// Ask the peripheral device to reboot.
    pub async fn request_reboot(&self) {
        self.send(TerminalCommand::RequestReboot {}).await;
    }

    /// Bind the NFC card currently on the reader to the given account.
    pub async fn register_nfc_card(&self, account_id: AccountId) {
        self.send(TerminalCommand::RegisterNfcCard { account_id }).await;
    }

    /// Check whether a live connection exists right now.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        *self.state_rx.borrow() == ConnectionState::Connected
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Subscribe to connection state changes.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Stop the background connection task. The current connection (if
    /// any) is dropped and no reconnect is attempted. Idempotent.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Serialize and send one command.
    ///
    /// Commands are fire-and-forget: while disconnected (or if the send
    /// fails mid-flight) the command is dropped with a warning and no
    /// error reaches the caller. The connection task notices a broken
    /// stream on its read side and handles the reconnect.
    async fn send(&self, command: TerminalCommand) {
        let frame = match codec::encode_command(&command) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "Failed to encode command");
                return;
            }
        };

        let mut writer = self.writer.lock().await;
        let Some(sink) = writer.as_mut() else {
            warn!(command = ?command, "Not connected, dropping command");
            return;
        };

        match sink.send(tungstenite::Message::text(frame)).await {
            Ok(()) => debug!(command = ?command, "Command sent"),
            Err(e) => warn!(error = %e, "Failed to send command, dropping"),
        }
    }
}

impl Drop for TerminalClient {
    fn drop(&mut self) {
        if !self.cancel.is_cancelled() {
            debug!("TerminalClient dropped without shutdown - connection task keeps running");
        }
    }
}
