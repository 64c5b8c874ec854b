use std::sync::atomic::{AtomicUsize, Ordering};

use log::{info, warn};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};

/// A unique identifier for a particular request, for correlating the
/// outgoing and incoming log lines. Wraps around if you somehow exceed a
/// usize.
fn next_request_id() -> usize {
    static REQUEST_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);
    REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Error body shape the server uses for every failure.
#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

/// Shared HTTP plumbing for the typed API clients: one connection pool,
/// one cookie store (so session credentials ride along automatically), and
/// uniform logging plus error-body extraction.
pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    pub fn new(api_base: &str) -> Result<Self> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.endpoint(path))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.endpoint(path))
    }

    pub(crate) fn put(&self, path: &str) -> RequestBuilder {
        self.http.put(self.endpoint(path))
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        self.http.delete(self.endpoint(path))
    }

    /// Send the request and decode a JSON body on success.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    /// Send the request and discard any response body.
    pub(crate) async fn send_unit(&self, request: RequestBuilder) -> Result<()> {
        self.send(request).await.map(drop)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = request.build()?;
        let id = next_request_id();
        info!("->req{id} {} {}", request.method(), request.url());

        let response = self.http.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            info!("<-rsp{id} {status}");
            Ok(response)
        } else {
            warn!("<-rsp{id} {status}");
            // Pull the `{message}` body out if the server sent one.
            let message = response
                .json::<ApiMessage>()
                .await
                .ok()
                .map(|body| body.message);
            Err(Error::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}
