//! String identifiers.
//!
//! Profile and session ids come from outside this crate (profile library
//! keys, session handles), so they are opaque strings rather than UUIDs.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }

            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProfileId);
define_id!(SessionId);

impl ProfileId {
    /// Id of the blended profile for a session. Depends on the session only,
    /// so re-resolving the same session always yields the same id.
    pub fn composite_for(session_id: &SessionId) -> Self {
        Self(format!("composite_{}", session_id))
    }

    /// Id of the minimal profile used for custom (base-less) sessions.
    pub fn custom_for(session_id: &SessionId) -> Self {
        Self(format!("custom_{}", session_id))
    }

    /// Id of the profile returned when none of a session's bases resolve.
    pub fn fallback_for(session_id: &SessionId) -> Self {
        Self(format!("fallback_{}", session_id))
    }
}
