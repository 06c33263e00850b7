//! One-shot flash messages stored in the session.
//!
//! A handler pushes a message before redirecting; the next rendered page
//! takes (and thereby clears) every pending message.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

const FLASH_KEY: &str = "flash";

/// Severity of a flash message, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Warning,
    Error,
}

impl FlashLevel {
    /// CSS class for the message box.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "flash flash-success",
            Self::Warning => "flash flash-warning",
            Self::Error => "flash flash-error",
        }
    }
}

/// A message shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    /// Queue a message for the next page.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn push(
        session: &Session,
        level: FlashLevel,
        message: impl Into<String>,
    ) -> Result<(), tower_sessions::session::Error> {
        let mut pending: Vec<Self> = session.get(FLASH_KEY).await?.unwrap_or_default();
        pending.push(Self {
            level,
            message: message.into(),
        });
        session.insert(FLASH_KEY, pending).await
    }

    /// Shorthand for a success message.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn success(
        session: &Session,
        message: impl Into<String>,
    ) -> Result<(), tower_sessions::session::Error> {
        Self::push(session, FlashLevel::Success, message).await
    }

    /// Remove and return every pending message, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn take_all(session: &Session) -> Result<Vec<Self>, tower_sessions::session::Error> {
        Ok(session
            .remove::<Vec<Self>>(FLASH_KEY)
            .await?
            .unwrap_or_default())
    }
}
