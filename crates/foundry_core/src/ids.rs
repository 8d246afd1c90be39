//! String identifiers for catalog entries and unit instances.
//!
//! Each identifier is a distinct newtype so a move id can never be passed
//! where a unit id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of a move in the catalog (e.g. `strike`).
    MoveId
);

string_id!(
    /// Identifier of a unit template in the catalog (e.g. `mech-5`).
    TemplateId
);

string_id!(
    /// Identifier of the blueprint that crafts a template (e.g. `bp-mech-5`).
    BlueprintId
);

string_id!(
    /// Identifier of one owned or battling unit instance.
    UnitId
);

string_id!(
    /// Identifier of a guild (tribe).
    GuildId
);

string_id!(
    /// Identifier of a player.
    PlayerId
);
