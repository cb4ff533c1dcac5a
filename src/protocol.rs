//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Answer, AssessmentResult, Question, UserResponse, View};
use crate::flow::SessionSnapshot;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Navigate { view: View },
    StartAssessment,
    Retake,
    Answer { value: Answer },
    Back,
    Cancel,
    GetState,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Session { session: SessionSnapshot },
    Error { message: String },
}

//
// HTTP request/response DTOs
//

/// Questions are optional; the live catalog is used when absent.
#[derive(Debug, Deserialize)]
pub struct ReportIn {
    #[serde(default)]
    pub questions: Option<Vec<Question>>,
    #[serde(default)]
    pub answers: Vec<UserResponse>,
}

pub type ReportOut = AssessmentResult;

#[derive(Debug, Deserialize)]
pub struct QuestionTextIn {
    pub text: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
