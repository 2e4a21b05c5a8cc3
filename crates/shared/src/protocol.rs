//! JSON wire format spoken with an HTTP answer backend.

use serde::{Deserialize, Serialize};

use crate::{domain::Answer, error::ApiError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerQueryRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerQueryResponse {
    Answer(Answer),
    Error(ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn paragraph_is_optional_on_the_wire() {
        let raw = r#"{
            "answer": "Yes.",
            "citations": [
                {"text": "quoted", "source": "doc.pdf", "link": "https://example.test/doc.pdf"}
            ]
        }"#;
        let parsed: AnswerQueryResponse = serde_json::from_str(raw).expect("parse");
        let AnswerQueryResponse::Answer(answer) = parsed else {
            panic!("expected answer variant");
        };
        assert_eq!(answer.citations.len(), 1);
        assert_eq!(answer.citations[0].paragraph, None);
    }

    #[test]
    fn error_body_decodes_to_error_variant() {
        let raw = r#"{"code": "rate_limited", "message": "slow down"}"#;
        let parsed: AnswerQueryResponse = serde_json::from_str(raw).expect("parse");
        match parsed {
            AnswerQueryResponse::Error(err) => {
                assert_eq!(err.code, ErrorCode::RateLimited);
                assert_eq!(err.message, "slow down");
            }
            AnswerQueryResponse::Answer(_) => panic!("expected error variant"),
        }
    }
}
