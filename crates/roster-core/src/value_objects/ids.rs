//! Platform identifiers
//!
//! The chat platform hands out snowflake ids, but nothing here does arithmetic
//! on them. They are kept as opaque strings exactly as the platform sends
//! them, which also keeps them safe for JavaScript consumers of the JSON views.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw platform id
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identity (user) id on the chat platform
    MemberId
);

string_id!(
    /// Role id on the chat platform
    RoleId
);

string_id!(
    /// Channel or category id on the chat platform
    ChannelId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_conversions() {
        let id = MemberId::new("123456789012345678");
        assert_eq!(id.to_string(), "123456789012345678");
        assert_eq!(id.as_str(), "123456789012345678");

        let raw: String = id.clone().into();
        assert_eq!(MemberId::from(raw), id);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = RoleId::new("42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");

        let back: RoleId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_ordering_is_lexical() {
        let mut ids = vec![RoleId::new("b"), RoleId::new("a")];
        ids.sort();
        assert_eq!(ids, vec![RoleId::new("a"), RoleId::new("b")]);
    }
}
