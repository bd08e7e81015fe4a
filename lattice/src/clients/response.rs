//! Turning model output into typed values

use serde::de::DeserializeOwned;
use tracing::debug;

use super::ContractError;
use crate::llm::CompletionResponse;

/// Strip a surrounding Markdown code fence, if the model added one
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (```json) up to the first newline
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse the response text as JSON of type `T`
pub(crate) fn parse_json<T: DeserializeOwned>(response: CompletionResponse) -> Result<T, ContractError> {
    let stop_reason = response.stop_reason.clone();
    let text = response
        .content
        .as_deref()
        .map(strip_code_fence)
        .filter(|t| !t.is_empty())
        .ok_or(ContractError::EmptyResponse(stop_reason))?;
    debug!(len = text.len(), "parse_json: parsing response");
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::StopReason;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n[1,2]\n```\n"), "[1,2]");
    }

    #[test]
    fn test_parse_json_ok() {
        let v: Vec<u8> = parse_json(CompletionResponse::text("```json\n[1, 2, 3]\n```")).unwrap();
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_json_empty_content() {
        let resp = CompletionResponse {
            content: None,
            stop_reason: StopReason::Safety,
            usage: Default::default(),
        };
        let err = parse_json::<serde_json::Value>(resp).unwrap_err();
        assert!(matches!(err, ContractError::EmptyResponse(StopReason::Safety)));

        let err = parse_json::<serde_json::Value>(CompletionResponse::text("   ")).unwrap_err();
        assert!(matches!(err, ContractError::EmptyResponse(_)));
    }

    #[test]
    fn test_parse_json_malformed() {
        let err = parse_json::<serde_json::Value>(CompletionResponse::text("Sure! Here it is:")).unwrap_err();
        assert!(matches!(err, ContractError::Json(_)));
    }
}
