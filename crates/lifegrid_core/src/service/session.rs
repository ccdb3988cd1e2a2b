//! Session identity and persistence status.
//!
//! Authentication itself is handled by an external provider; core only needs
//! to know whether a user id is available to route persistence.

use std::fmt::{Display, Formatter};

/// Current session as seen by core services.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// No signed-in user; state lives in local blobs.
    #[default]
    Anonymous,
    /// Signed-in user; profile and notes live in per-user rows.
    Authenticated { user_id: String },
}

impl Session {
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self::Authenticated {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { user_id } => Some(user_id.as_str()),
        }
    }

    /// Log-safe session mode label.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Anonymous => "local",
            Self::Authenticated { .. } => "remote",
        }
    }
}

/// Persistence status surfaced to the UI as a small indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreStatus {
    #[default]
    Idle,
    Loaded,
    Saved,
    ErrorLoading,
    ErrorSaving,
}

impl StoreStatus {
    pub fn is_error(self) -> bool {
        matches!(self, Self::ErrorLoading | Self::ErrorSaving)
    }

    /// Log-safe snake_case label.
    pub fn code(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loaded => "loaded",
            Self::Saved => "saved",
            Self::ErrorLoading => "error_loading",
            Self::ErrorSaving => "error_saving",
        }
    }
}

impl Display for StoreStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Idle => "",
            Self::Loaded => "Loaded",
            Self::Saved => "Saved",
            Self::ErrorLoading => "Error loading",
            Self::ErrorSaving => "Error saving",
        };
        f.write_str(label)
    }
}
