//! Authlink CLI - Entry Point
//!
//! Small operational tool for exercising a peripheral service endpoint:
//! follow the event stream or fire individual commands.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use authlink_client::{ClientConfig, ClientEvent, ConnectionState, TerminalClient};
use authlink_core::{AccountId, VERSION, constants};
use authlink_protocol::TerminalEvent;

/// Authlink - client for the authentication peripheral service
#[derive(Parser)]
#[command(name = "authlink")]
#[command(version = VERSION)]
#[command(about = "Talk to an authentication peripheral service (card/barcode terminal)")]
struct Cli {
    /// WebSocket endpoint of the peripheral service
    #[arg(long, default_value = constants::DEFAULT_ENDPOINT)]
    endpoint: Url,

    /// Delay between reconnect attempts, in milliseconds
    #[arg(long, default_value_t = constants::DEFAULT_RECONNECT_DELAY_MS)]
    reconnect_delay_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow the event stream and print every event
    Listen,
    /// Request an access token for the account authenticated at the terminal
    RequestToken,
    /// Reboot the peripheral device
    Reboot,
    /// Register the NFC card currently on the reader to an account
    RegisterCard {
        /// Account to bind the card to
        account_id: AccountId,
    },
}

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REPLY_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    info!(version = VERSION, endpoint = %cli.endpoint, "Starting authlink");

    let client = TerminalClient::connect(ClientConfig {
        endpoint: cli.endpoint,
        reconnect_delay: Duration::from_millis(cli.reconnect_delay_ms),
    });

    let result = match cli.command {
        Commands::Listen => listen(&client).await,
        Commands::RequestToken => request_token(&client).await,
        Commands::Reboot => reboot(&client).await,
        Commands::RegisterCard { account_id } => register_card(&client, account_id).await,
    };

    client.shutdown();
    result
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn wait_connected(client: &TerminalClient) -> Result<()> {
    let mut state = client.subscribe_state();
    tokio::time::timeout(
        CONNECT_TIMEOUT,
        state.wait_for(|s| *s == ConnectionState::Connected),
    )
    .await
    .context("timed out waiting for the peripheral service connection")?
    .context("connection task stopped")?;
    Ok(())
}

async fn listen(client: &TerminalClient) -> Result<()> {
    client.add_event_handler(|event| match event {
        ClientEvent::Terminal(terminal_event) => println!("{terminal_event:?}"),
        ClientEvent::MalformedMessage { error } => eprintln!("malformed message: {error}"),
        ClientEvent::Connected => info!("Connected"),
        ClientEvent::Disconnected => info!("Disconnected, retrying"),
    });

    info!("Listening for events, press Ctrl-C to stop");
    signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;
    info!("Shutting down");
    Ok(())
}

async fn request_token(client: &TerminalClient) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    client.add_event_handler(move |event| {
        if let ClientEvent::Terminal(TerminalEvent::FoundAccountAccessToken { access_token }) =
            event
        {
            let _ = tx.send(access_token.clone());
        }
    });

    wait_connected(client).await?;
    client.request_account_access_token().await;

    let Ok(Some(token)) = tokio::time::timeout(REPLY_TIMEOUT, rx.recv()).await else {
        bail!("no access token arrived within {REPLY_TIMEOUT:?}");
    };

    println!("{}", token.as_str());
    Ok(())
}

async fn reboot(client: &TerminalClient) -> Result<()> {
    wait_connected(client).await?;
    client.request_reboot().await;
    info!("Reboot requested");
    Ok(())
}

async fn register_card(client: &TerminalClient, account_id: AccountId) -> Result<()> {
    wait_connected(client).await?;
    info!(account_id = %account_id, "Registering card");
    client.register_nfc_card(account_id).await;
    Ok(())
}
