//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header::ORIGIN},
    response::IntoResponse,
};
use futures_util::stream::StreamExt;

use crate::{
    infrastructure::connection::{PeerClose, WebSocketSink},
    ui::state::AppState,
    usecase::Session,
};

use super::message_router::{ReadLoopEnd, read_loop};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    let origin = headers.get(ORIGIN).and_then(|value| value.to_str().ok());
    if !state.origin_policy.permits(origin) {
        tracing::warn!("Rejecting WebSocket upgrade from origin {:?}", origin);
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state)))
}

/// Session lifecycle for one upgraded socket: register (with history
/// replay), run the read loop, deregister.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();
    let peer_close = PeerClose::default();
    let sink = WebSocketSink::new(sender, peer_close.clone());

    let session = match Session::open(state.registry.clone(), Box::new(sink)).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("Could not register connection: {}", e);
            return;
        }
    };
    tracing::info!("Client '{}' connected", session.id());

    let end = read_loop(session.id(), receiver, session.registry(), &peer_close).await;
    match &end {
        ReadLoopEnd::PeerClosed(_) | ReadLoopEnd::StreamEnded => {
            tracing::info!("Client '{}' disconnected", session.id());
        }
        ReadLoopEnd::Transport(e) => {
            tracing::info!("Client '{}' connection lost: {}", session.id(), e);
        }
        ReadLoopEnd::Malformed(e) => {
            tracing::warn!("Client '{}' sent a malformed message: {}", session.id(), e);
        }
        ReadLoopEnd::RegistryClosed => {
            tracing::debug!("Registry closed while serving '{}'", session.id());
        }
    }

    session.close().await;
}
