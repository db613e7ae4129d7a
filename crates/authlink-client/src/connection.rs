//! Background connection task: connect, read, dispatch, reconnect.
//!
//! The task owns the socket. One pass of [`ConnectionTask::run`] is:
//! connect, publish the write half, read frames until the stream drops,
//! withdraw the write half, wait the fixed reconnect delay, start over.
//! The loop never gives up on its own; only cancellation ends it.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream::SplitSink;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, watch};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};
use url::Url;

use authlink_core::{Error, Result};
use authlink_protocol::codec;

use crate::handlers::{ClientEvent, HandlerRegistry};

/// Connection state of the client.
///
/// The effective lifecycle is `CONNECTING -> CONNECTED/DISCONNECTED`;
/// an in-flight attempt reads as `Disconnected` until it succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// A live connection to the peripheral service exists.
    Connected,

    /// No connection; a reconnect attempt is pending or in flight.
    #[default]
    Disconnected,
}

/// Write half of the WebSocket, published while connected.
pub(crate) type CommandSink =
    SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, tungstenite::Message>;

pub(crate) struct ConnectionTask {
    pub(crate) endpoint: Url,
    pub(crate) reconnect_delay: Duration,
    pub(crate) handlers: Arc<HandlerRegistry>,
    pub(crate) writer: Arc<Mutex<Option<CommandSink>>>,
    pub(crate) state_tx: watch::Sender<ConnectionState>,
    pub(crate) cancel: CancellationToken,
}

impl ConnectionTask {
    /// Supervised connection loop. Runs until cancelled.
    pub(crate) async fn run(self) {
        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                result = self.connect_and_read() => {
                    match result {
                        Ok(()) => info!("Connection closed by peer, reconnecting"),
                        Err(e) => warn!(error = %e, "Connection lost"),
                    }
                }
            }

            self.mark_disconnected().await;

            debug!(
                delay_ms = self.reconnect_delay.as_millis() as u64,
                "Waiting before reconnect"
            );

            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                () = tokio::time::sleep(self.reconnect_delay) => {}
            }
        }

        self.mark_disconnected().await;
        debug!("Connection task exiting");
    }

    /// Establish one connection and read frames until it drops.
    async fn connect_and_read(&self) -> Result<()> {
        info!(endpoint = %self.endpoint, "Connecting to peripheral service");

        let (stream, _response) = connect_async(self.endpoint.as_str())
            .await
            .map_err(|e| Error::ConnectionFailed(e.to_string()))?;

        info!("Connected");

        let (write, mut read) = stream.split();
        *self.writer.lock().await = Some(write);
        self.state_tx.send_replace(ConnectionState::Connected);
        self.handlers.dispatch(&ClientEvent::Connected);

        while let Some(frame) = read.next().await {
            match frame {
                Ok(tungstenite::Message::Text(text)) => self.handle_frame(text.as_str()),
                Ok(tungstenite::Message::Ping(_)) => {
                    // tungstenite queues the pong reply itself
                    trace!("Ping received");
                }
                Ok(tungstenite::Message::Close(close_frame)) => {
                    if let Some(ref frame) = close_frame {
                        info!(code = %frame.code, reason = %frame.reason, "Close frame received");
                    } else {
                        info!("Close frame received");
                    }
                    return Ok(());
                }
                // Binary, Pong, raw frames: the peripheral service never
                // sends these over this protocol
                Ok(_) => {}
                Err(e) => return Err(Error::ConnectionFailed(e.to_string())),
            }
        }

        info!("Stream ended");
        Ok(())
    }

    /// Parse one text frame and fan it out to the observers.
    fn handle_frame(&self, text: &str) {
        match codec::decode_event(text) {
            Ok(event) => {
                debug!(event = ?event, "Event received");
                self.handlers.dispatch(&ClientEvent::Terminal(event));
            }
            Err(e) => {
                warn!(error = %e, "Dropping malformed message");
                self.handlers.dispatch(&ClientEvent::MalformedMessage {
                    error: e.to_string(),
                });
            }
        }
    }

    /// Withdraw the write half and notify observers once per transition.
    async fn mark_disconnected(&self) {
        self.writer.lock().await.take();
        let previous = self.state_tx.send_replace(ConnectionState::Disconnected);
        if previous == ConnectionState::Connected {
            self.handlers.dispatch(&ClientEvent::Disconnected);
        }
    }
}
