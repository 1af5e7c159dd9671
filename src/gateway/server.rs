//! WebSocket broadcast gateway.
//!
//! Accepts observer connections, replays the current snapshot and activity
//! backlog, relays observer commands into the engine, and fans every
//! engine event out to all connected sessions. Command failures go back to
//! the offending session only.

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};
use tracing::{debug, info, warn};

use crate::domain::stakes::{CREATION_STAKE, ENTRY_FEE};
use crate::engine::Engine;
use crate::error::{Error, Result};

use super::messages::{ClientCommand, ServerEvent};
use super::session::Session;

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;

/// Accept observer connections until shutdown.
pub async fn run(
    engine: Arc<Engine>,
    listener: TcpListener,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    loop {
        tokio::select! {
            result = shutdown.changed() => {
                if result.is_err() || *shutdown.borrow() {
                    info!("Gateway shutting down");
                    return Ok(());
                }
            }
            accepted = listener.accept() => {
                let (stream, addr) = accepted?;
                let engine = Arc::clone(&engine);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(engine, stream, addr).await {
                        debug!(%addr, error = %e, "Session ended with error");
                    }
                });
            }
        }
    }
}

async fn handle_connection(
    engine: Arc<Engine>,
    stream: TcpStream,
    addr: SocketAddr,
) -> Result<()> {
    let ws = accept_async(stream).await?;
    let (mut sink, mut inbound) = ws.split();
    let mut events = engine.subscribe();
    info!(%addr, "Observer connected");

    // Connect-time replay: full snapshot, then the activity backlog in
    // chronological order.
    let (arenas, backlog) = engine.connect_state();
    send(&mut sink, &ServerEvent::StateUpdate { arenas }).await?;
    for entry in backlog.into_iter().rev() {
        send(&mut sink, &ServerEvent::ActivityUpdate { entry }).await?;
    }

    let mut session = Session::new();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    if let ServerEvent::Settlement { arena_id, payouts } = &event {
                        match session.observe_settlement(arena_id, payouts) {
                            Some(credited) => {
                                if !credited.is_zero() {
                                    debug!(%addr, %credited, "Session credited from settlement");
                                }
                            }
                            // Already replayed during a lag resync.
                            None => continue,
                        }
                    }
                    send(&mut sink, &event).await?;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(%addr, skipped, "Observer lagged; replaying missed settlements");
                    for event in resync_events(&engine, &mut session) {
                        send(&mut sink, &event).await?;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            message = inbound.next() => match message {
                None => break,
                Some(Err(e)) => return Err(e.into()),
                Some(Ok(Message::Text(text))) => {
                    if let Err(e) = relay_command(&engine, &mut session, &text) {
                        debug!(%addr, error = %e, "Command rejected");
                        send(&mut sink, &ServerEvent::CommandFailed {
                            reason: e.to_string(),
                        })
                        .await?;
                    }
                }
                Some(Ok(Message::Ping(payload))) => {
                    sink.send(Message::Pong(payload)).await?;
                }
                Some(Ok(Message::Close(_))) => break,
                Some(Ok(_)) => {}
            },
        }
    }

    info!(%addr, "Observer disconnected");
    Ok(())
}

/// Parse and apply one observer command. The session's advisory balance is
/// checked before the relay and debited only after the engine accepts.
fn relay_command(engine: &Engine, session: &mut Session, text: &str) -> Result<()> {
    let command: ClientCommand = serde_json::from_str(text)?;
    let now = Utc::now();

    match command {
        ClientCommand::Join { identity } => {
            session.join(identity.clone());
            engine.join(&identity, now);
        }
        ClientCommand::CreateArena {
            identity,
            statement,
        } => {
            session.ensure_funds(CREATION_STAKE)?;
            engine.create_arena(identity, statement, now);
            session.debit(CREATION_STAKE);
        }
        ClientCommand::SubmitEntry {
            arena_id,
            identity,
            content,
        } => {
            session.ensure_funds(ENTRY_FEE)?;
            engine.submit_entry(&arena_id, identity, content, now)?;
            session.debit(ENTRY_FEE);
        }
        ClientCommand::AddBacking {
            arena_id,
            entry_id,
            identity,
            amount,
        } => {
            session.ensure_funds(amount)?;
            engine.add_backing(&arena_id, &entry_id, &identity, amount, now)?;
            session.debit(amount);
        }
    }
    Ok(())
}

/// Catch a lagged session up: replay every settlement it has not yet
/// observed (crediting its balance along the way), then a fresh snapshot.
/// Settlements the session already saw live are skipped, so payouts are
/// never delivered or credited twice.
fn resync_events(engine: &Engine, session: &mut Session) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    for resolution in engine.settlements() {
        if session
            .observe_settlement(resolution.arena_id(), resolution.payouts())
            .is_some()
        {
            events.push(ServerEvent::Settlement {
                arena_id: resolution.arena_id().clone(),
                payouts: resolution.payouts().to_vec(),
            });
        }
    }
    let (arenas, _) = engine.connect_state();
    events.push(ServerEvent::StateUpdate { arenas });
    events
}

async fn send(sink: &mut WsSink, event: &ServerEvent) -> Result<()> {
    let json = serde_json::to_string(event)?;
    sink.send(Message::Text(json)).await.map_err(Error::from)
}
