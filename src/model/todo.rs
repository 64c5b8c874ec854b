use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::model::voter::Voter;

/// Opaque identifier of one todo entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TodoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One entry on the current user's follow-up list. The server embeds the
/// full voter record under `voterId`. Exactly one entry exists per
/// (user, voter) pair; membership is a set relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoEntry {
    #[serde(rename = "_id")]
    pub id: TodoId,
    #[serde(rename = "voterId")]
    pub voter: Voter,
    pub has_voted: bool,
}
