use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::client::ApiClient;
use crate::error::Result;
use crate::model::todo::{TodoEntry, TodoId};
use crate::model::voter::VoterId;

/// The remote store behind the current user's follow-up list. Entries are
/// addressed by entry id, not voter id; there is no delete-by-voter
/// endpoint.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// The caller's full list, each entry embedding its voter.
    async fn list_mine(&self) -> Result<Vec<TodoEntry>>;

    /// Add a voter to the caller's list and return the new entry.
    async fn add(&self, voter_id: &VoterId) -> Result<TodoEntry>;

    /// Set the has-voted flag. Round-trips even for a no-op value; the
    /// server stays authoritative.
    async fn set_voted(&self, entry_id: &TodoId, has_voted: bool) -> Result<()>;

    /// Delete an entry by its own id.
    async fn remove_entry(&self, entry_id: &TodoId) -> Result<()>;
}

/// `TodoStore` over the JSON API.
pub struct HttpTodoStore {
    client: Arc<ApiClient>,
}

impl HttpTodoStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TodoStore for HttpTodoStore {
    async fn list_mine(&self) -> Result<Vec<TodoEntry>> {
        self.client.send_json(self.client.get("todos")).await
    }

    async fn add(&self, voter_id: &VoterId) -> Result<TodoEntry> {
        let request = self
            .client
            .post("todos")
            .json(&json!({ "voterId": voter_id }));
        self.client.send_json(request).await
    }

    async fn set_voted(&self, entry_id: &TodoId, has_voted: bool) -> Result<()> {
        let request = self
            .client
            .put(&format!("todos/{entry_id}"))
            .json(&json!({ "hasVoted": has_voted }));
        self.client.send_unit(request).await
    }

    async fn remove_entry(&self, entry_id: &TodoId) -> Result<()> {
        let request = self.client.delete(&format!("todos/{entry_id}"));
        self.client.send_unit(request).await
    }
}
