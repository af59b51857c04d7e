// crates/cmdgate-core/src/core/identifiers.rs
// ============================================================================
// Module: cmdgate Identifiers
// Description: Platform snowflakes and command/parameter names.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Platform entities (users, roles, guilds, channels, attachments) are keyed by
//! 64-bit snowflakes. Commands and parameters are keyed by names. Name syntax is
//! validated by the descriptor builder rather than by these wrappers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Snowflake Identifiers
// ============================================================================

/// Declares a copyable snowflake identifier newtype.
macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates an identifier from its raw snowflake value.
            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw snowflake value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self::new(value)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                value.parse::<u64>().map(Self)
            }
        }
    };
}

snowflake_id! {
    /// User identifier (also used for bot users).
    UserId
}

snowflake_id! {
    /// Role identifier. The guild's "everyone" role shares the guild's id.
    RoleId
}

snowflake_id! {
    /// Guild identifier.
    GuildId
}

snowflake_id! {
    /// Channel identifier.
    ChannelId
}

snowflake_id! {
    /// Attachment identifier.
    AttachmentId
}

// ============================================================================
// SECTION: Name Identifiers
// ============================================================================

/// Command name as registered with the platform.
///
/// # Invariants
/// - Opaque UTF-8 string; syntax is validated at registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandName(String);

impl CommandName {
    /// Creates a new command name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for CommandName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CommandName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Parameter (option) name within a command.
///
/// # Invariants
/// - Opaque UTF-8 string; syntax is validated at registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterName(String);

impl ParameterName {
    /// Creates a new parameter name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ParameterName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ParameterName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
