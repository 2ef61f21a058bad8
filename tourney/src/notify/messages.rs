//! Outbound message shapes.

use crate::tournament::PhotoId;
use serde::{Deserialize, Serialize};

/// A tappable choice carrying an opaque callback payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub payload: String,
}

impl Button {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

/// A message to one user: text, optionally with an image and choices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outbound {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<PhotoId>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub buttons: Vec<Button>,
}

impl Outbound {
    /// Plain text message
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            photo: None,
            buttons: Vec::new(),
        }
    }

    /// Attach an image; the text becomes its caption
    pub fn with_photo(mut self, photo: impl Into<PhotoId>) -> Self {
        self.photo = Some(photo.into());
        self
    }

    /// Attach an image if one is present
    pub fn with_optional_photo(mut self, photo: Option<PhotoId>) -> Self {
        self.photo = photo;
        self
    }

    /// Attach button choices
    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }

    /// Callback payloads of the attached buttons
    pub fn payloads(&self) -> impl Iterator<Item = &str> {
        self.buttons.iter().map(|b| b.payload.as_str())
    }
}
