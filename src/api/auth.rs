use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::client::ApiClient;
use crate::error::Result;
use crate::model::session::{Credentials, Session};

/// The session/identity provider. Authentication itself lives on the
/// server behind a session cookie; the console asks who it is, logs in and
/// out, and otherwise stays read-only.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Ask the server who the current cookie belongs to.
    async fn check(&self) -> Result<Session>;

    async fn login(&self, credentials: &Credentials) -> Result<Session>;

    async fn register(&self, credentials: &Credentials) -> Result<()>;

    async fn logout(&self) -> Result<()>;
}

/// `SessionProvider` over the JSON API.
pub struct HttpSessionProvider {
    client: Arc<ApiClient>,
}

impl HttpSessionProvider {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    async fn check(&self) -> Result<Session> {
        self.client.send_json(self.client.get("auth/check")).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let request = self.client.post("auth/login").json(credentials);
        self.client.send_json(request).await
    }

    async fn register(&self, credentials: &Credentials) -> Result<()> {
        let request = self.client.post("auth/register").json(credentials);
        self.client.send_unit(request).await
    }

    async fn logout(&self) -> Result<()> {
        let request = self.client.post("auth/logout").json(&json!({}));
        self.client.send_unit(request).await
    }
}
