//! Typed identifiers
//!
//! Every entity gets its own UUID newtype so an `AccountId` can never be
//! passed where a `CreditCardId` is expected. `Display` shows a short tag
//! such as `acc-1a2b3c4d`; `full()` gives the form that parses back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident => $tag:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub const TAG: &'static str = $tag;

            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn full(&self) -> String {
                self.0.hyphenated().to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let simple = self.0.simple().to_string();
                write!(f, "{}{}", Self::TAG, &simple[..8])
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            /// Accepts the bare UUID or the UUID behind the type's tag
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s.trim();
                let raw = raw.strip_prefix(Self::TAG).unwrap_or(raw);
                Uuid::parse_str(raw).map(Self)
            }
        }
    };
}

entity_id!(
    /// The person whose data a record belongs to
    OwnerId => "own-"
);
entity_id!(AccountId => "acc-");
entity_id!(CreditCardId => "card-");
entity_id!(CategoryId => "cat-");
entity_id!(
    /// A stored transaction row; installment children get their own
    TransactionId => "txn-"
);
