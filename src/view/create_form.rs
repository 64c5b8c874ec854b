use std::sync::Arc;

use crate::api::voters::VoterRegistry;
use crate::error::{Error, Result};
use crate::model::voter::VoterDraft;

/// The add-voter form on the admin screen. Fields are kept as raw text
/// until submission, exactly as typed; `serial_no` is only parsed when the
/// form is submitted.
pub struct CreateForm {
    registry: Arc<dyn VoterRegistry>,
    pub serial_no: String,
    pub name: String,
    pub guardian_name: String,
    pub house_no: String,
    pub house_name: String,
    pub gender_age: String,
    pub id_card_no: String,
    busy: bool,
    error: Option<String>,
    created: bool,
}

impl CreateForm {
    pub fn new(registry: Arc<dyn VoterRegistry>) -> Self {
        Self {
            registry,
            serial_no: String::new(),
            name: String::new(),
            guardian_name: String::new(),
            house_no: String::new(),
            house_name: String::new(),
            gender_age: String::new(),
            id_card_no: String::new(),
            busy: false,
            error: None,
            created: false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// The inline form error, if the last submission failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True once after a successful submission; the roster uses this to
    /// reload. Reading it clears it.
    pub fn take_created(&mut self) -> bool {
        std::mem::take(&mut self.created)
    }

    /// Local checks plus serial-number parsing; everything else is the
    /// server's call.
    fn validate(&self) -> Result<VoterDraft> {
        let fields = [
            (&self.serial_no, "Serial number is required"),
            (&self.name, "Name is required"),
            (&self.guardian_name, "Guardian name is required"),
            (&self.house_no, "House number is required"),
            (&self.house_name, "House name is required"),
            (&self.gender_age, "Gender/Age is required"),
            (&self.id_card_no, "ID card number is required"),
        ];
        for (value, problem) in fields {
            if value.trim().is_empty() {
                return Err(Error::Validation(problem.to_string()));
            }
        }
        let serial_no = self
            .serial_no
            .trim()
            .parse::<u32>()
            .map_err(|_| Error::Validation("Serial number must be a number".to_string()))?;

        Ok(VoterDraft {
            serial_no,
            name: self.name.trim().to_string(),
            guardian_name: self.guardian_name.trim().to_string(),
            house_no: self.house_no.trim().to_string(),
            house_name: self.house_name.trim().to_string(),
            gender_age: self.gender_age.trim().to_string(),
            id_card_no: self.id_card_no.trim().to_string(),
        })
    }

    /// Submit the form. Success clears every field so the next record can
    /// be typed straight in; failure leaves the input untouched for
    /// correction.
    pub async fn submit(&mut self) -> bool {
        if self.busy {
            return false;
        }
        let draft = match self.validate() {
            Ok(draft) => draft,
            Err(err) => {
                self.error = Some(err.to_string());
                return false;
            }
        };
        self.busy = true;
        self.error = None;
        let outcome = self.registry.create(&draft).await;
        self.busy = false;

        match outcome {
            Ok(_) => {
                self.clear_fields();
                self.created = true;
                true
            }
            Err(err) => {
                self.error = Some(err.display_message("Failed to add voter"));
                false
            }
        }
    }

    fn clear_fields(&mut self) {
        self.serial_no.clear();
        self.name.clear();
        self.guardian_name.clear();
        self.house_no.clear();
        self.house_name.clear();
        self.gender_age.clear();
        self.id_card_no.clear();
    }
}
