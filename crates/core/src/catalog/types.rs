//! Spot record and the request types the catalog accepts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A tourist attraction stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spot {
    /// Storage-assigned identifier, never reused.
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Price / admission information.
    pub ticket: String,
    /// How to get there.
    pub transport: String,
    /// Number of times visitors recommended this spot.
    pub recommend_count: i64,
    /// Image URL or path, possibly empty.
    pub image_url: String,
}

/// The editable text fields of a spot, as submitted by a form.
///
/// Missing fields deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotFields {
    pub name: String,
    pub description: String,
    pub ticket: String,
    pub transport: String,
    #[serde(rename = "imageurl")]
    pub image_url: String,
}

impl SpotFields {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_ticket(mut self, ticket: impl Into<String>) -> Self {
        self.ticket = ticket.into();
        self
    }

    pub fn with_transport(mut self, transport: impl Into<String>) -> Self {
        self.transport = transport.into();
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }
}

/// Partial update of a spot.
///
/// `None` leaves the stored value untouched; `Some` replaces it, so
/// `Some(String::new())` clears a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpotPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub ticket: Option<String>,
    pub transport: Option<String>,
    pub image_url: Option<String>,
}

impl SpotPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_ticket(mut self, ticket: impl Into<String>) -> Self {
        self.ticket = Some(ticket.into());
        self
    }

    pub fn with_transport(mut self, transport: impl Into<String>) -> Self {
        self.transport = Some(transport.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

/// Form-style edit: an empty field means "not provided".
impl From<SpotFields> for SpotPatch {
    fn from(fields: SpotFields) -> Self {
        fn present(value: String) -> Option<String> {
            (!value.is_empty()).then_some(value)
        }

        Self {
            name: present(fields.name),
            description: present(fields.description),
            ticket: present(fields.ticket),
            transport: present(fields.transport),
            image_url: present(fields.image_url),
        }
    }
}

/// Result of a best-effort write against a single id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The record existed and was changed.
    Applied,
    /// No record with that id; nothing changed.
    Missing,
}

impl WriteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteOutcome::Applied => "applied",
            WriteOutcome::Missing => "missing",
        }
    }
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum SpotError {
    #[error("Spot not found: {0}")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for SpotError {
    fn from(e: rusqlite::Error) -> Self {
        SpotError::Storage(e.to_string())
    }
}
