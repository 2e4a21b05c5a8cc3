//! Applies backend events to UI-thread state.

use client_core::QueryController;

use crate::controller::events::{err_label, UiError, UiEvent};

#[derive(Debug, Default)]
pub struct ShellStatus {
    pub line: String,
    pub banner: Option<UiError>,
}

pub fn apply_ui_event(controller: &mut QueryController, status: &mut ShellStatus, event: UiEvent) {
    match event {
        UiEvent::Info(message) => {
            status.line = message;
        }
        UiEvent::AnswerSettled { request_id, result } => {
            let succeeded = result.is_ok();
            if controller.complete(request_id, result) {
                status.line = if succeeded {
                    "Answer ready".to_string()
                } else {
                    "Answer request failed".to_string()
                };
            }
        }
        UiEvent::Error(err) => {
            tracing::warn!(
                category = err_label(err.category()),
                context = ?err.context(),
                "{}",
                err.message()
            );
            status.line = err.message().to_string();
            status.banner = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::events::UiErrorContext;
    use client_core::{canned_answer, RequestState};
    use shared::error::RetrievalError;
    use std::time::Duration;

    #[test]
    fn settled_answer_reaches_controller() {
        let mut controller = QueryController::new();
        let mut status = ShellStatus::default();
        controller.set_query("What is X?");
        let pending = controller.submit().expect("submit");

        apply_ui_event(
            &mut controller,
            &mut status,
            UiEvent::AnswerSettled {
                request_id: pending.request_id,
                result: Ok(canned_answer()),
            },
        );

        assert_eq!(controller.state(), &RequestState::Succeeded(canned_answer()));
        assert_eq!(status.line, "Answer ready");
    }

    #[test]
    fn late_answer_for_old_request_is_ignored() {
        let mut controller = QueryController::new();
        let mut status = ShellStatus::default();
        controller.set_query("What is X?");
        let first = controller.submit().expect("submit");
        apply_ui_event(
            &mut controller,
            &mut status,
            UiEvent::AnswerSettled {
                request_id: first.request_id,
                result: Err(RetrievalError::Timeout(Duration::from_secs(30))),
            },
        );
        let second = controller.submit().expect("resubmit");
        status.line = "Analyzing...".to_string();

        apply_ui_event(
            &mut controller,
            &mut status,
            UiEvent::AnswerSettled {
                request_id: first.request_id,
                result: Ok(canned_answer()),
            },
        );

        assert_eq!(controller.in_flight(), Some(second.request_id));
        assert_eq!(status.line, "Analyzing...");
    }

    #[test]
    fn backend_errors_raise_banner() {
        let mut controller = QueryController::new();
        let mut status = ShellStatus::default();

        apply_ui_event(
            &mut controller,
            &mut status,
            UiEvent::Error(UiError::runtime_startup("out of threads")),
        );

        let banner = status.banner.as_ref().expect("banner raised");
        assert_eq!(banner.context(), UiErrorContext::BackendStartup);
        assert!(status.line.contains("startup failure"));
        assert_eq!(controller.state(), &RequestState::Idle);
    }
}
