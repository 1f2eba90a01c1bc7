// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;
use serde_json::Value;

/// `{error, info?, context?{params, ...}}` — the server's 4xx error body.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerErrorEnvelope {
    pub error: String,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub context: Option<ErrorContext>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ErrorContext {
    #[serde(default)]
    pub params: Option<String>,
    #[serde(flatten)]
    pub extra: std::collections::HashMap<String, Value>,
}

/// The transport's three failure families: a structured client error (any
/// 4xx with a decodable envelope), an opaque server error (5xx, or a 4xx
/// whose body does not parse as [`ServerErrorEnvelope`]), and an execution
/// failure (the request never completed: DNS, TLS, timeout, ...).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request rejected: {code}")]
    Client {
        code: String,
        context: Option<ErrorContext>,
    },
    #[error("server error: status={status} body={body}")]
    Server { status: u16, body: String },
    #[error(transparent)]
    Execution(#[from] reqwest::Error),
}

impl TransportError {
    /// The server error code, if this is a structured client error -
    /// components match on this to drive their error-taxonomy mapping.
    pub fn code(&self) -> Option<&str> {
        match self {
            TransportError::Client { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            TransportError::Client { context, .. } => context.as_ref(),
            _ => None,
        }
    }
}

pub(crate) async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|error| format!("<unreadable body: {error}>"));

    if status.is_client_error() {
        if let Ok(envelope) = serde_json::from_str::<ServerErrorEnvelope>(&body) {
            return Err(TransportError::Client {
                code: envelope.error,
                context: envelope.context,
            });
        }
    }

    Err(TransportError::Server {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use crate::ApiClient;

    #[derive(Serialize)]
    struct Ping;

    #[derive(serde::Deserialize)]
    struct Pong {
        ok: bool,
    }

    #[tokio::test]
    async fn client_error_with_envelope_decodes_code_and_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "INVALID_REQUEST_PARAMETERS",
                "context": {"params": "id"},
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let error = client
            .post_json::<Ping, Pong>("/ping", &Ping)
            .await
            .unwrap_err();

        assert_eq!(error.code(), Some("INVALID_REQUEST_PARAMETERS"));
        assert_eq!(error.context().unwrap().params.as_deref(), Some("id"));
    }

    #[tokio::test]
    async fn server_error_without_envelope_is_opaque() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let error = client
            .post_json::<Ping, Pong>("/ping", &Ping)
            .await
            .unwrap_err();

        assert!(error.code().is_none());
        match error {
            crate::TransportError::Server { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected Server, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn success_decodes_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let response: Pong = client.post_json("/ping", &Ping).await.unwrap();
        assert!(response.ok);
    }
}
