//! Helpers for unpacking API Gateway proxy events.

use serde_json::Value;

pub const MISSING_BODY_MESSAGE: &str = "Request body is required";

/// Extracts the JSON request payload from a proxy event.
///
/// Events without a `body` key are treated as direct invocations whose
/// payload is the event itself.
pub fn request_payload(event: Value) -> Result<Value, String> {
    let Some(object) = event.as_object() else {
        return Err("Request payload must be a JSON object".to_string());
    };

    let Some(body) = object.get("body") else {
        return Ok(event);
    };

    match body {
        Value::Null => Err(MISSING_BODY_MESSAGE.to_string()),
        Value::String(text) if text.trim().is_empty() => Err(MISSING_BODY_MESSAGE.to_string()),
        Value::Object(_) => Ok(body.clone()),
        Value::String(text) => {
            serde_json::from_str(text).map_err(|error| format!("Malformed JSON body: {error}"))
        }
        _ => Err("Request body must be a JSON object".to_string()),
    }
}

/// Returns `pathParameters.{name}` exactly as sent, or `None` when blank.
pub fn path_parameter(event: &Value, name: &str) -> Option<String> {
    event
        .get("pathParameters")
        .and_then(|parameters| parameters.get(name))
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_string_body() {
        let payload = request_payload(json!({"body": "{\"websiteId\":\"site1\"}"}))
            .expect("body should parse");
        assert_eq!(payload, json!({"websiteId": "site1"}));
    }

    #[test]
    fn accepts_direct_invocation_payload() {
        let event = json!({"websiteId": "site1", "urls": []});
        assert_eq!(request_payload(event.clone()).expect("payload"), event);
    }

    #[test]
    fn rejects_null_body() {
        let error = request_payload(json!({"body": null})).expect_err("null body");
        assert_eq!(error, MISSING_BODY_MESSAGE);
    }

    #[test]
    fn rejects_malformed_json_body() {
        let error = request_payload(json!({"body": "{not json"})).expect_err("bad json");
        assert!(error.starts_with("Malformed JSON body"));
    }

    #[test]
    fn reads_path_parameter() {
        let event = json!({"pathParameters": {"jobId": "job-1"}});
        assert_eq!(path_parameter(&event, "jobId").as_deref(), Some("job-1"));
        assert_eq!(path_parameter(&json!({"pathParameters": null}), "jobId"), None);
        assert_eq!(
            path_parameter(&json!({"pathParameters": {"jobId": ""}}), "jobId"),
            None
        );
    }

    #[test]
    fn path_parameter_is_not_trimmed() {
        let event = json!({"pathParameters": {"jobId": " job-1 "}});
        assert_eq!(path_parameter(&event, "jobId").as_deref(), Some(" job-1 "));
    }
}
