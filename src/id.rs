//! Namespaced identifiers for concepts, fields and entries.
//! Ids look like "concept:01hx3k...", but the store treats them as opaque
//! strings: uniqueness is only checked within one namespace.

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

const CHARS: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

macro_rules! namespaced_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// Wrap an existing id verbatim
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            fn from_token(token: &str) -> Self {
                Self(format!("{}:{}", Self::PREFIX, token))
            }

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
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

namespaced_id!(
    /// Identifies a concept (record type)
    ConceptId,
    "concept"
);
namespaced_id!(
    /// Identifies a field (column)
    FieldId,
    "field"
);
namespaced_id!(
    /// Identifies an entry (row)
    EntryId,
    "entry"
);

/// Produces the random part of new ids.
///
/// `Random` uses ULIDs and is what the CLI uses. `Sequential` yields short
/// base-36 counters ("00", "01", ...) so tests and demos get stable ids.
#[derive(Debug, Clone)]
pub enum IdGenerator {
    Random,
    Sequential { length: usize, counter: u64 },
}

impl IdGenerator {
    pub fn random() -> Self {
        IdGenerator::Random
    }

    pub fn sequential() -> Self {
        IdGenerator::Sequential {
            length: 2,
            counter: 0,
        }
    }

    pub fn concept_id(&mut self) -> ConceptId {
        ConceptId::from_token(&self.next_token())
    }

    pub fn field_id(&mut self) -> FieldId {
        FieldId::from_token(&self.next_token())
    }

    pub fn entry_id(&mut self) -> EntryId {
        EntryId::from_token(&self.next_token())
    }

    fn next_token(&mut self) -> String {
        match self {
            IdGenerator::Random => Ulid::new().to_string().to_ascii_lowercase(),
            IdGenerator::Sequential { length, counter } => {
                let base = CHARS.len() as u64;
                // Grow by one digit once the namespace is exhausted
                if *counter >= base.pow(*length as u32) {
                    *length += 1;
                    *counter = 0;
                }
                let token = encode(*counter, *length);
                *counter += 1;
                token
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::random()
    }
}

/// Encode a number as a fixed-width base-36 string
fn encode(mut num: u64, length: usize) -> String {
    let base = CHARS.len() as u64;
    let mut result = Vec::with_capacity(length);
    for _ in 0..length {
        result.push(CHARS[(num % base) as usize]);
        num /= base;
    }
    result.reverse();
    result.into_iter().collect()
}

pub fn new_concept_id() -> ConceptId {
    IdGenerator::random().concept_id()
}

pub fn new_field_id() -> FieldId {
    IdGenerator::random().field_id()
}

pub fn new_entry_id() -> EntryId {
    IdGenerator::random().entry_id()
}
