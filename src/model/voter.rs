use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Opaque identifier the server assigns to a voter record. Serialises to a
/// plain string rather than a nested struct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(String);

impl VoterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VoterId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VoterId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A single record from the voter registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voter {
    #[serde(rename = "_id")]
    pub id: VoterId,
    pub serial_no: u32,
    pub name: String,
    pub guardian_name: String,
    pub house_no: String,
    pub house_name: String,
    pub gender_age: String,
    pub id_card_no: String,
}

impl Voter {
    /// A draft copy of the mutable fields, for row editing.
    pub fn draft(&self) -> VoterDraft {
        VoterDraft {
            serial_no: self.serial_no,
            name: self.name.clone(),
            guardian_name: self.guardian_name.clone(),
            house_no: self.house_no.clone(),
            house_name: self.house_name.clone(),
            gender_age: self.gender_age.clone(),
            id_card_no: self.id_card_no.clone(),
        }
    }
}

/// The mutable fields of a voter; the body of both create and update
/// requests. All persistence-side validation lives on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterDraft {
    pub serial_no: u32,
    pub name: String,
    pub guardian_name: String,
    pub house_no: String,
    pub house_name: String,
    pub gender_age: String,
    pub id_card_no: String,
}
