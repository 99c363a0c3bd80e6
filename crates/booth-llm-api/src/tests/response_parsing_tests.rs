#[cfg(test)]
mod response_parsing_tests {
    use crate::client::responses::{error_message, extract_output_text};
    use crate::error::{ServiceError, ServiceErrorKind};
    use serde_json::json;

    #[test]
    fn test_extract_aggregated_output_text() {
        let body = json!({ "id": "resp_1", "output_text": "4" });
        assert_eq!(extract_output_text(&body), Some("4".to_string()));
    }

    #[test]
    fn test_extract_joins_message_parts() {
        let body = json!({
            "output": [
                { "type": "mcp_list_tools", "server_label": "handbook", "tools": [] },
                {
                    "type": "message",
                    "role": "assistant",
                    "content": [
                        { "type": "output_text", "text": "Hello, " },
                        { "type": "output_text", "text": "world" }
                    ]
                }
            ]
        });
        assert_eq!(extract_output_text(&body), Some("Hello, world".to_string()));
    }

    #[test]
    fn test_extract_ignores_non_text_parts() {
        let body = json!({
            "output": [{
                "type": "message",
                "content": [{ "type": "refusal", "refusal": "no" }]
            }]
        });
        assert_eq!(extract_output_text(&body), None);
    }

    #[test]
    fn test_extract_missing_output() {
        assert_eq!(extract_output_text(&json!({ "id": "resp_1" })), None);
    }

    #[test]
    fn test_error_message_from_error_object() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(error_message(body), "Incorrect API key provided");
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(error_message("  upstream timeout \n"), "upstream timeout");
    }

    #[test]
    fn test_service_error_display() {
        let err = ServiceError::status(429, "Rate limit reached");
        assert_eq!(err.to_string(), "service error (HTTP 429): Rate limit reached");
        assert_eq!(err.kind, ServiceErrorKind::Status(429));
        assert!(!err.is_transport());
        assert!(ServiceError::transport("connection refused").is_transport());
    }
}
