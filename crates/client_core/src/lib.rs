//! Query lifecycle core for the Lexi legal assistant: the request state machine,
//! the answer-provider seam, citation opening and the render projection.

pub mod citation;
pub mod config;
pub mod controller;
pub mod provider;
pub mod view;

pub use citation::{open_citation, LinkOpener, RecordingLinkOpener, SystemLinkOpener};
pub use config::{load_settings, Settings, SettingsOverrides};
pub use controller::{PendingRequest, QueryController, RequestState, SubmitBlocked, EXAMPLE_QUERY};
pub use provider::{
    answer_with_timeout, build_provider, canned_answer, AnswerProvider, CannedAnswerProvider,
    HttpAnswerProvider,
};
pub use view::QueryView;
