use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// API Gateway proxy integration response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

impl ApiGatewayResponse {
    /// Parses the JSON body back into a value.
    pub fn json_body(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

pub fn success_response(status_code: u16, payload: &impl Serialize) -> ApiGatewayResponse {
    match serde_json::to_string(payload) {
        Ok(body) => raw_response(status_code, body),
        Err(error) => internal_error_response(&format!("failed to serialize response: {error}")),
    }
}

pub fn bad_request_response(message: &str) -> ApiGatewayResponse {
    error_response(400, json!({ "error": message }))
}

pub fn invalid_urls_response(message: &str, invalid_urls: &[String]) -> ApiGatewayResponse {
    error_response(
        400,
        json!({
            "error": message,
            "invalidUrls": invalid_urls,
        }),
    )
}

pub fn not_found_response(message: &str) -> ApiGatewayResponse {
    error_response(404, json!({ "error": message }))
}

pub fn internal_error_response(message: &str) -> ApiGatewayResponse {
    error_response(
        500,
        json!({
            "error": INTERNAL_ERROR_MESSAGE,
            "message": message,
        }),
    )
}

fn error_response(status_code: u16, payload: Value) -> ApiGatewayResponse {
    raw_response(status_code, payload.to_string())
}

fn raw_response(status_code: u16, body: String) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": "application/json"}),
        body,
    }
}
