use std::sync::Arc;

use async_trait::async_trait;

use crate::client::ApiClient;
use crate::error::Result;
use crate::model::query::{RosterQuery, VoterPage};
use crate::model::voter::{Voter, VoterDraft, VoterId};

/// The remote voter registry. Searching, sorting and pagination are
/// entirely server-delegated: the client never filters or orders records
/// locally.
#[async_trait]
pub trait VoterRegistry: Send + Sync {
    /// Fetch one page of records for the given query.
    async fn list(&self, query: &RosterQuery) -> Result<VoterPage>;

    /// Create a voter (admin). Duplicate serial numbers are the server's
    /// call to reject.
    async fn create(&self, draft: &VoterDraft) -> Result<Voter>;

    /// Replace a voter's fields (admin). Callers reload the list on
    /// success rather than patching local state, so server-computed fields
    /// can never drift.
    async fn update(&self, id: &VoterId, draft: &VoterDraft) -> Result<Voter>;

    /// Delete a voter (admin). Callers are responsible for the
    /// confirmation step before this is ever issued.
    async fn remove(&self, id: &VoterId) -> Result<()>;
}

/// `VoterRegistry` over the JSON API.
pub struct HttpVoterRegistry {
    client: Arc<ApiClient>,
}

impl HttpVoterRegistry {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VoterRegistry for HttpVoterRegistry {
    async fn list(&self, query: &RosterQuery) -> Result<VoterPage> {
        let request = self.client.get("voters").query(&query.params());
        self.client.send_json(request).await
    }

    async fn create(&self, draft: &VoterDraft) -> Result<Voter> {
        let request = self.client.post("voters").json(draft);
        self.client.send_json(request).await
    }

    async fn update(&self, id: &VoterId, draft: &VoterDraft) -> Result<Voter> {
        let request = self.client.put(&format!("voters/{id}")).json(draft);
        self.client.send_json(request).await
    }

    async fn remove(&self, id: &VoterId) -> Result<()> {
        let request = self.client.delete(&format!("voters/{id}"));
        self.client.send_unit(request).await
    }
}
