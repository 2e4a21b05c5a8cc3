//! Pure projection of controller state for rendering.

use shared::domain::{Answer, MAX_QUERY_CHARS};

use crate::controller::QueryController;

pub const SUBMIT_LABEL: &str = "Get Legal Answer";
pub const SUBMIT_LABEL_LOADING: &str = "Analyzing...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryView<'a> {
    pub query: &'a str,
    pub char_count_label: String,
    pub input_enabled: bool,
    pub example_enabled: bool,
    pub submit_enabled: bool,
    pub loading: bool,
    pub submit_label: &'static str,
    pub answer: Option<&'a Answer>,
    pub error: Option<String>,
}

impl<'a> QueryView<'a> {
    pub fn project(controller: &'a QueryController) -> Self {
        let loading = controller.is_loading();
        Self {
            query: controller.query(),
            char_count_label: format!(
                "{}/{MAX_QUERY_CHARS} characters",
                controller.query().chars().count()
            ),
            input_enabled: true,
            example_enabled: !loading,
            submit_enabled: controller.can_submit(),
            loading,
            submit_label: if loading {
                SUBMIT_LABEL_LOADING
            } else {
                SUBMIT_LABEL
            },
            answer: controller.displayed_answer(),
            error: controller.error().map(|err| err.user_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::canned_answer;
    use shared::error::RetrievalError;

    #[test]
    fn idle_view_disables_submit_for_blank_query() {
        let mut controller = QueryController::new();
        controller.set_query("  \n ");
        let view = QueryView::project(&controller);
        assert!(!view.submit_enabled);
        assert!(view.example_enabled);
        assert_eq!(view.char_count_label, "4/1000 characters");
        assert_eq!(view.submit_label, SUBMIT_LABEL);
        assert!(view.answer.is_none());
        assert!(view.error.is_none());
    }

    #[test]
    fn loading_view_keeps_input_but_blocks_actions() {
        let mut controller = QueryController::new();
        controller.set_query("What is X?");
        controller.submit().expect("submit");
        let view = QueryView::project(&controller);
        assert!(view.loading);
        assert!(view.input_enabled);
        assert!(!view.example_enabled);
        assert!(!view.submit_enabled);
        assert_eq!(view.submit_label, SUBMIT_LABEL_LOADING);
    }

    #[test]
    fn settled_views_show_answer_or_error() {
        let mut controller = QueryController::new();
        controller.set_query("What is X?");
        let pending = controller.submit().expect("submit");
        controller.resolve(pending.request_id, canned_answer());
        assert_eq!(
            QueryView::project(&controller).answer,
            Some(&canned_answer())
        );

        let pending = controller.submit().expect("resubmit");
        controller.reject(
            pending.request_id,
            RetrievalError::Transport("connection refused".to_string()),
        );
        let view = QueryView::project(&controller);
        assert!(view.answer.is_none());
        assert!(view.error.is_some_and(|msg| msg.contains("Could not reach")));
    }
}
