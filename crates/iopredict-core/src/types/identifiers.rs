//! 64-bit identifier newtypes.
//!
//! A `CallStackId` cannot be accidentally used where a `ContextHash` is expected,
//! even though both are opaque `u64` digests.

use std::fmt;

use serde::{Deserialize, Serialize};

/// OS file handle (file descriptor) as seen by the interception layer.
pub type Handle = i32;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// The zero value, used as the "unknown" sentinel.
            pub const UNSET: Self = Self(0);

            /// Create a new ID from a raw digest.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the raw digest.
            pub const fn get(self) -> u64 {
                self.0
            }

            /// True for the zero sentinel.
            pub const fn is_unset(self) -> bool {
                self.0 == 0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Stable identifier of a call site, produced by a [`crate::CallStackSource`].
    CallStackId
);

define_id!(
    /// Digest of a context window read oldest-to-newest.
    ContextHash
);
