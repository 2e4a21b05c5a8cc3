//! Backend commands queued from UI to backend worker.

use shared::domain::{Citation, RequestId};

#[derive(Debug)]
pub enum BackendCommand {
    AnswerQuery {
        request_id: RequestId,
        query: String,
    },
    OpenCitation(Citation),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::AnswerQuery { .. } => "answer_query",
            BackendCommand::OpenCitation(_) => "open_citation",
        }
    }
}
