//! TCP accept loop.

use log::{info, warn};
use std::io;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::game::Dealer;
use crate::server::connection::Connection;
use crate::server::state::AppState;

/// Accept connections on `listener` forever, one `Connection` actor each.
///
/// A failed accept is logged and the loop carries on.
pub async fn serve(listener: TcpListener, state: AppState) -> io::Result<()> {
    info!("[Listener] Accepting connections on {}", listener.local_addr()?);
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                if let Err(err) = stream.set_nodelay(true) {
                    warn!("[Listener] Could not set TCP_NODELAY for {}: {}", peer, err);
                }
                Connection::start(stream, peer, state.matchmaking_addr.clone());
            }
            Err(err) => warn!("[Listener] Accept failed: {}", err),
        }
    }
}

/// Bind to the configured address and serve with shuffled decks.
pub async fn run(config: ServerConfig) -> io::Result<()> {
    let listener = TcpListener::bind(config.bind).await?;
    let state = AppState::start(&config, Dealer::Shuffled);
    serve(listener, state).await
}
