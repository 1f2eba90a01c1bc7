// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! API client for the MIRACL Trust platform.
//!
//! `ApiClient` is a thin wrapper around a `reqwest::Client`: it exposes one
//! method per endpoint listed in the specification's external-interfaces
//! table, all bodies are JSON, and every failure is re-tagged into
//! [`TransportError`] before it reaches a caller.

mod error;
pub mod auth;
pub mod registration;
pub mod session;
pub mod verification;

pub use error::{ErrorContext, ServerErrorEnvelope, TransportError};

use reqwest::{Client, ClientBuilder, Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};

/// Wraps a `reqwest::Client` bound to a single platform URL, per the
/// resolved open question in the specification: one base URL, not the
/// per-project `.app`/`.io` host-rewriting variant.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    platform_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiClientInitError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
}

impl ApiClient {
    pub fn new(platform_url: impl Into<String>) -> Result<Self, ApiClientInitError> {
        let client = ClientBuilder::new()
            .user_agent(concat!("mpin-apiclient/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            platform_url: platform_url.into(),
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.platform_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// POST to a path relative to the configured platform URL.
    pub(crate) async fn post_json<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp, TransportError> {
        let url = self.build_url(path);
        let response = self.request(Method::POST, url).json(body).send().await?;
        error::handle_response(response).await
    }

    /// GET an endpoint returned verbatim by the server (may be absolute or
    /// relative to the platform URL).
    pub(crate) async fn get_json<Resp: DeserializeOwned>(
        &self,
        url_or_path: &str,
    ) -> Result<Resp, TransportError> {
        let url = self.resolve(url_or_path);
        let response = self.request(Method::GET, url).send().await?;
        error::handle_response(response).await
    }

    pub(crate) async fn put_json<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp, TransportError> {
        let url = self.build_url(path);
        let response = self.request(Method::PUT, url).json(body).send().await?;
        error::handle_response(response).await
    }

    pub(crate) async fn delete_json<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp, TransportError> {
        let url = self.build_url(path);
        let response = self
            .request(Method::DELETE, url)
            .json(body)
            .send()
            .await?;
        error::handle_response(response).await
    }

    fn resolve(&self, url_or_path: &str) -> String {
        if url_or_path.starts_with("http://") || url_or_path.starts_with("https://") {
            url_or_path.to_string()
        } else {
            self.build_url(url_or_path)
        }
    }
}
