//! Owner of the query text and the request state machine.
//!
//! `Idle -> Loading -> {Succeeded | Failed} -> Loading -> ...`, with every
//! accepted submission tagged by a fresh [`RequestId`] so that a late
//! resolution for an older request can never overwrite a newer one.

use std::time::Duration;

use shared::{
    domain::{clamp_query, Answer, Citation, RequestId},
    error::RetrievalError,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    citation::{open_citation, LinkOpener},
    provider::{answer_with_timeout, AnswerProvider},
};

pub const EXAMPLE_QUERY: &str = "In a motor accident claim where the deceased was self-employed and aged 54–55 years at the time of death, is the claimant entitled to an addition towards future prospects in computing compensation under Section 166 of the Motor Vehicles Act, 1988? If so, how much?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    /// `stale` is the answer that was on screen when the request was issued;
    /// it stays visible until the request settles.
    Loading {
        request_id: RequestId,
        stale: Option<Answer>,
    },
    Succeeded(Answer),
    Failed(RetrievalError),
}

/// A query frozen at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub request_id: RequestId,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitBlocked {
    #[error("query is empty")]
    EmptyQuery,
    #[error("a request is already in flight")]
    AlreadyLoading,
}

#[derive(Debug)]
pub struct QueryController {
    query: String,
    state: RequestState,
    last_issued: RequestId,
}

impl Default for QueryController {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryController {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            state: RequestState::Idle,
            last_issued: RequestId(0),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replaces the query text. Allowed in every state, including `Loading`.
    pub fn set_query(&mut self, text: &str) {
        let clamped = clamp_query(text);
        if clamped.len() != text.len() {
            debug!(
                dropped_bytes = text.len() - clamped.len(),
                "query truncated to length limit"
            );
        }
        self.query.clear();
        self.query.push_str(clamped);
    }

    pub fn fill_example_query(&mut self) {
        self.set_query(EXAMPLE_QUERY);
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Loading { .. })
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        match self.state {
            RequestState::Loading { request_id, .. } => Some(request_id),
            _ => None,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.check_submit().is_ok()
    }

    /// The answer to show: the settled one, or the stale one while loading.
    pub fn displayed_answer(&self) -> Option<&Answer> {
        match &self.state {
            RequestState::Succeeded(answer) => Some(answer),
            RequestState::Loading { stale, .. } => stale.as_ref(),
            RequestState::Idle | RequestState::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&RetrievalError> {
        match &self.state {
            RequestState::Failed(err) => Some(err),
            _ => None,
        }
    }

    fn check_submit(&self) -> Result<(), SubmitBlocked> {
        if self.is_loading() {
            return Err(SubmitBlocked::AlreadyLoading);
        }
        if self.query.trim().is_empty() {
            return Err(SubmitBlocked::EmptyQuery);
        }
        Ok(())
    }

    /// Enters `Loading` and returns the frozen request payload.
    ///
    /// A blocked submission leaves the controller untouched.
    pub fn submit(&mut self) -> Result<PendingRequest, SubmitBlocked> {
        self.check_submit()?;

        let request_id = self.last_issued.next();
        self.last_issued = request_id;

        let stale = match std::mem::replace(&mut self.state, RequestState::Idle) {
            RequestState::Succeeded(answer) => Some(answer),
            RequestState::Idle | RequestState::Failed(_) | RequestState::Loading { .. } => None,
        };
        self.state = RequestState::Loading { request_id, stale };

        let query = self.query.trim().to_string();
        info!(request = %request_id, query_chars = query.chars().count(), "query submitted");
        Ok(PendingRequest { request_id, query })
    }

    /// Returns `false` when the resolution is stale and was discarded.
    pub fn resolve(&mut self, request_id: RequestId, answer: Answer) -> bool {
        if !self.accepts(request_id) {
            return false;
        }
        debug!(
            request = %request_id,
            citations = answer.citations.len(),
            "answer received"
        );
        self.state = RequestState::Succeeded(answer);
        true
    }

    /// Returns `false` when the rejection is stale and was discarded.
    pub fn reject(&mut self, request_id: RequestId, error: RetrievalError) -> bool {
        if !self.accepts(request_id) {
            return false;
        }
        warn!(request = %request_id, %error, "answer request failed");
        self.state = RequestState::Failed(error);
        true
    }

    pub fn complete(&mut self, request_id: RequestId, result: Result<Answer, RetrievalError>) -> bool {
        match result {
            Ok(answer) => self.resolve(request_id, answer),
            Err(err) => self.reject(request_id, err),
        }
    }

    fn accepts(&self, request_id: RequestId) -> bool {
        match self.in_flight() {
            Some(current) if current == request_id => true,
            current => {
                debug!(
                    request = %request_id,
                    in_flight = ?current,
                    "discarding stale request resolution"
                );
                false
            }
        }
    }

    /// Submits and drives the provider to completion on the caller's task.
    pub async fn submit_query<P>(
        &mut self,
        provider: &P,
        timeout: Duration,
    ) -> Result<&RequestState, SubmitBlocked>
    where
        P: AnswerProvider + ?Sized,
    {
        let pending = self.submit()?;
        let result = answer_with_timeout(provider, &pending.query, timeout).await;
        self.complete(pending.request_id, result);
        Ok(&self.state)
    }

    pub fn open_citation(&self, citation: &Citation, opener: &dyn LinkOpener) {
        open_citation(citation, opener);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
