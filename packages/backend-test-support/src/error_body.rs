//! Assertions for the error contract: status 400, a three-field JSON body,
//! and an `x-trace-id` header.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Mirror of the backend's error body
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorBodyLike {
    pub error_code: i32,
    pub error_code_text: String,
    pub error_text: String,
}

/// Assert `resp` is an error with the given code and return the parsed body.
///
/// When the response also carries `x-request-id` (the app is wrapped in the
/// request tracer) the two ids must agree.
pub async fn assert_error_body<B>(
    resp: ServiceResponse<B>,
    expected_code: i32,
    expected_code_text: &str,
) -> ErrorBodyLike
where
    B: MessageBody,
{
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "errors are always 400");

    let headers = resp.headers().clone();
    let trace_id = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8")
        .to_string();
    if let Some(request_id) = headers.get("x-request-id") {
        assert_eq!(
            request_id.to_str().expect("x-request-id should be valid UTF-8"),
            trace_id,
            "x-trace-id should match x-request-id"
        );
    }

    let body = actix_web::test::read_body(resp).await;
    let parsed: ErrorBodyLike =
        serde_json::from_slice(&body).expect("error body should match the error contract");

    assert_eq!(parsed.error_code, expected_code, "body: {parsed:?}");
    assert_eq!(parsed.error_code_text, expected_code_text, "body: {parsed:?}");
    parsed
}
