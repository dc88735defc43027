//! Conversation types: turns, attachments and user input

use super::agent::AgentId;
use crate::{HearthError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text stored for a user turn that carried only an image
pub const IMAGE_ONLY_TEXT: &str = "Image uploaded for analysis";

/// MIME type assumed when an upload does not declare one
pub const DEFAULT_IMAGE_MEDIA_TYPE: &str = "image/jpeg";

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person using the assistant
    User,
    /// One of the agents
    Agent,
}

impl Role {
    /// Lower-case label used when rendering history into prompts
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Agent => "agent",
        }
    }
}

/// An image attached to a message, held as base64
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttachment {
    /// Declared MIME type (e.g. `image/png`)
    pub media_type: String,
    /// Base64 payload without any data-URL prefix
    pub data: String,
}

impl ImageAttachment {
    /// Build an attachment from a base64 payload, validating the encoding
    pub fn new(media_type: impl Into<String>, data: impl Into<String>) -> Result<Self> {
        let media_type = media_type.into();
        let data = data.into();
        if data.is_empty() {
            return Err(HearthError::validation("image payload is empty"));
        }
        BASE64
            .decode(data.as_bytes())
            .map_err(|e| HearthError::validation(format!("image is not valid base64: {}", e)))?;
        let media_type = if media_type.trim().is_empty() {
            DEFAULT_IMAGE_MEDIA_TYPE.to_string()
        } else {
            media_type
        };
        Ok(Self { media_type, data })
    }

    /// Parse a browser data URL (`data:image/png;base64,...`).
    ///
    /// A bare base64 string is accepted and assumed to be JPEG.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let url = url.trim();
        let Some(rest) = url.strip_prefix("data:") else {
            return Self::new(DEFAULT_IMAGE_MEDIA_TYPE, url);
        };
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| HearthError::validation("data URL has no payload"))?;
        let mut params = header.split(';');
        let media_type = params.next().unwrap_or_default();
        if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
            return Err(HearthError::validation("data URL is not base64 encoded"));
        }
        if !media_type.is_empty() && !media_type.starts_with("image/") {
            return Err(HearthError::validation(format!(
                "unsupported attachment type: {}",
                media_type
            )));
        }
        Self::new(media_type, payload)
    }

    /// Render back into a data URL for display
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    /// Unique identifier
    pub id: Uuid,
    /// Who produced the turn
    pub role: Role,
    /// Message text
    pub text: String,
    /// Attached image, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageAttachment>,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// Agent that produced the turn (agent turns only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<AgentId>,
    /// Routing confidence, 0-95 (agent turns only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Turn {
    /// Create a user turn
    pub fn user(text: impl Into<String>, image: Option<ImageAttachment>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            text: text.into(),
            image,
            timestamp: Utc::now(),
            agent_id: None,
            confidence: None,
        }
    }

    /// Create an agent turn
    pub fn agent(agent: AgentId, text: impl Into<String>, confidence: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Agent,
            text: text.into(),
            image: None,
            timestamp: Utc::now(),
            agent_id: Some(agent),
            confidence: Some(confidence),
        }
    }
}

/// A submission from the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInput {
    /// Typed text (may be blank when an image is attached)
    pub text: String,
    /// Selected image
    pub image: Option<ImageAttachment>,
}

impl UserInput {
    /// Text-only input
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }

    /// Input with an image attached
    pub fn with_image(text: impl Into<String>, image: ImageAttachment) -> Self {
        Self {
            text: text.into(),
            image: Some(image),
        }
    }

    /// No text and no image: submitting this is a no-op
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.image.is_none()
    }

    /// Text stored on the user turn
    pub fn display_text(&self) -> &str {
        if self.text.trim().is_empty() {
            IMAGE_ONLY_TEXT
        } else {
            &self.text
        }
    }
}
