//! WebSocket upgrade + session loop. Each connection owns one assessment session;
//! every client message is reduced into it and the resulting snapshot is sent back.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::flow::{reduce, Effect, SessionEvent, SessionState};
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "healthyguide_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "healthyguide_backend", "WebSocket connected");
  let mut session = SessionState::default();

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let incoming = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(m) => m,
          Err(e) => {
            let reply = ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) };
            if send(&mut socket, &reply).await.is_err() { break; }
            continue;
          }
        };
        debug!(target: "healthyguide_backend", "WS received: {:?}", &incoming);

        let (next, replies, effect) = apply(&session, incoming, &state).await;
        session = next;
        // Replies go out first so the client shows the loading state before the model call.
        if send_all(&mut socket, &replies).await.is_err() { break; }

        if let Some(effect) = effect {
          let (next, reply) = run_effect(&session, effect, &state).await;
          session = next;
          if send(&mut socket, &reply).await.is_err() { break; }
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "healthyguide_backend", "WebSocket disconnected");
}

/// Reduce one client message into the session. Returns the next session, the
/// replies to send in order, and an effect still to be run.
pub(crate) async fn apply(
  session: &SessionState,
  msg: ClientWsMessage,
  state: &AppState,
) -> (SessionState, Vec<ServerWsMessage>, Option<Effect>) {
  let event = match msg {
    ClientWsMessage::Ping => return (session.clone(), vec![ServerWsMessage::Pong], None),
    ClientWsMessage::GetState => {
      return (session.clone(), vec![ServerWsMessage::Session { session: session.snapshot() }], None);
    }
    ClientWsMessage::Navigate { view } => SessionEvent::Navigate(view),
    ClientWsMessage::StartAssessment | ClientWsMessage::Retake => {
      SessionEvent::StartAssessment { questions: state.questions().await }
    }
    ClientWsMessage::Answer { value } => SessionEvent::Answer(value),
    ClientWsMessage::Back => SessionEvent::Back,
    ClientWsMessage::Cancel => SessionEvent::Cancel,
  };

  match reduce(session, event) {
    Ok(t) => {
      let reply = ServerWsMessage::Session { session: t.state.snapshot() };
      (t.state, vec![reply], t.effect)
    }
    Err(e) => (session.clone(), vec![ServerWsMessage::Error { message: e.to_string() }], None),
  }
}

/// Run an effect emitted by `apply` and fold its outcome back into the session.
pub(crate) async fn run_effect(session: &SessionState, effect: Effect, state: &AppState) -> (SessionState, ServerWsMessage) {
  let next = match effect {
    Effect::GenerateReport { questions, answers } => {
      let report = state.reports.generate(&questions, &answers).await;
      match reduce(session, SessionEvent::ReportReady(report)) {
        Ok(t) => t.state,
        Err(e) => {
          error!(target: "report", error = %e, "Could not apply report to session");
          session.clone()
        }
      }
    }
  };
  let reply = ServerWsMessage::Session { session: next.snapshot() };
  (next, reply)
}

async fn send_all(socket: &mut WebSocket, msgs: &[ServerWsMessage]) -> Result<(), axum::Error> {
  for msg in msgs {
    send(socket, msg).await?;
  }
  Ok(())
}

async fn send(socket: &mut WebSocket, msg: &ServerWsMessage) -> Result<(), axum::Error> {
  let out = serde_json::to_string(msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  });
  socket.send(Message::Text(out)).await.map_err(|e| {
    error!(target: "healthyguide_backend", error = %e, "WS send error");
    e
  })
}
