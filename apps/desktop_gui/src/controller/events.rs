//! Backend-to-UI events and error modeling for the desktop GUI controller.

use shared::{
    domain::{Answer, RequestId},
    error::RetrievalError,
};

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    AnswerSettled {
        request_id: RequestId,
        result: Result<Answer, RetrievalError>,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    /// The tokio runtime could not be built.
    Runtime,
    /// A worker task panicked or was cancelled.
    Task,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    OpenCitation,
}

/// Backend-level failures that are not tied to an answer request.
///
/// Answer failures travel as `RetrievalError` inside
/// [`UiEvent::AnswerSettled`] instead.
#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn runtime_startup(err: impl std::fmt::Display) -> Self {
        Self {
            category: UiErrorCategory::Runtime,
            context: UiErrorContext::BackendStartup,
            message: format!("backend worker startup failure: failed to build runtime: {err}"),
        }
    }

    pub fn citation_task(err: impl std::fmt::Display) -> Self {
        Self {
            category: UiErrorCategory::Task,
            context: UiErrorContext::OpenCitation,
            message: format!("citation opener task failed: {err}"),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Runtime => "Runtime",
        UiErrorCategory::Task => "Task failure",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_build_failure_is_a_startup_error() {
        let err = UiError::runtime_startup("out of threads");
        assert_eq!(err.context(), UiErrorContext::BackendStartup);
        assert_eq!(err.category(), UiErrorCategory::Runtime);
        assert_eq!(err_label(err.category()), "Runtime");
        assert_eq!(
            err.message(),
            "backend worker startup failure: failed to build runtime: out of threads"
        );
    }

    #[test]
    fn opener_task_failure_is_a_citation_error() {
        let err = UiError::citation_task("task 12 panicked");
        assert_eq!(err.context(), UiErrorContext::OpenCitation);
        assert_eq!(err.category(), UiErrorCategory::Task);
        assert_eq!(err.message(), "citation opener task failed: task 12 panicked");
    }
}
