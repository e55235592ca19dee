//! Open node and edge type vocabularies
//!
//! Types are free text in storage: extraction may emit kinds nobody has seen
//! before and the store accepts them. Values are normalized and validated once,
//! when they are constructed from outside input, and a registry of recognized
//! domain values lets readers branch on the well-known ones.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Maximum length of a type name
pub const MAX_TYPE_LEN: usize = 64;

fn normalize(kind: &str, raw: &str) -> Result<String, String> {
    let value = raw.trim().to_lowercase().replace([' ', '-'], "_");
    if value.is_empty() {
        return Err(format!("{} cannot be empty", kind));
    }
    if value.len() > MAX_TYPE_LEN {
        return Err(format!("{} '{}' exceeds {} characters", kind, value, MAX_TYPE_LEN));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(format!(
            "{} '{}' may only contain letters, digits and underscores",
            kind, value
        ));
    }
    Ok(value)
}

macro_rules! open_type {
    (
        $(#[$meta:meta])* $name:ident, $kind:literal,
        { $( $(#[$cmeta:meta])* $konst:ident => $text:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Cow<'static, str>);

        impl $name {
            $(
                $(#[$cmeta])*
                pub const $konst: $name = $name(Cow::Borrowed($text));
            )+

            /// Every value the domain recognizes
            pub const KNOWN: &'static [&'static str] = &[$($text),+];

            /// Validate and normalize a type name from outside input
            ///
            /// Unknown values are accepted as long as they are well formed.
            pub fn new(raw: &str) -> Result<Self, String> {
                normalize($kind, raw).map(|v| Self(Cow::Owned(v)))
            }

            /// Get the type name
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether this value is in the recognized registry
            pub fn is_known(&self) -> bool {
                Self::KNOWN.contains(&self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0.into_owned()
            }
        }
    };
}

open_type!(
    /// Kind of a node (open vocabulary)
    NodeType, "node type",
    {
        /// A source document; provenance points back at these
        DOCUMENT => "document",
        /// Something that happened
        EVENT => "event",
        /// A property claimed about an entity
        ATTRIBUTE => "attribute",
        /// A relation reified as a node
        RELATION => "relation",
        /// A person
        PERSON => "person",
        /// A place
        PLACE => "place",
        /// An organization
        ORGANIZATION => "organization",
        /// A physical or abstract object
        OBJECT => "object",
        /// A chunk of a source document
        CHUNK => "chunk",
        /// A literal value
        VALUE => "value",
        /// A detected inconsistency between claims
        INCONSISTENCY => "inconsistency",
        /// A recorded human review action
        REVIEW_ACTION => "review_action",
    }
);

open_type!(
    /// Kind of an edge (open vocabulary)
    EdgeType, "edge type",
    {
        /// Entity participates in a claim
        INVOLVED_IN => "involved_in",
        /// Two entity nodes denote the same referent
        SAME_AS => "same_as",
        /// Generic relation between entities
        RELATED_TO => "related_to",
        /// Something happened or exists at a place
        LOCATED_AT => "located_at",
        /// Causal link between events
        CAUSES => "causes",
        /// A source asserts a claim
        ASSERTS => "asserts",
        /// Two claims contradict each other
        CONTRADICTS => "contradicts",
        /// An action was performed by an actor
        PERFORMED_BY => "performed_by",
        /// A review action approves a claim
        APPROVES => "approves",
        /// A review action rejects a claim
        REJECTS => "rejects",
        /// An attribute has a value
        HAS_VALUE => "has_value",
    }
);

impl NodeType {
    /// Entity kinds shown in the relationship graph
    pub fn is_entity(&self) -> bool {
        matches!(self.as_str(), "person" | "place" | "organization" | "object")
    }

    /// Claim kinds shown on the timeline
    pub fn is_claim(&self) -> bool {
        matches!(self.as_str(), "event" | "attribute" | "relation")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_constants() {
        assert_eq!(NodeType::PERSON.as_str(), "person");
        assert!(NodeType::PERSON.is_known());
        assert!(NodeType::PERSON.is_entity());
        assert!(NodeType::EVENT.is_claim());
        assert!(EdgeType::SAME_AS.is_known());
    }

    #[test]
    fn test_unknown_values_are_accepted() {
        let ty = NodeType::new("Starship Class").unwrap();
        assert_eq!(ty.as_str(), "starship_class");
        assert!(!ty.is_known());
    }

    #[test]
    fn test_parsed_value_equals_constant() {
        assert_eq!(NodeType::new(" Person ").unwrap(), NodeType::PERSON);
        assert_eq!("same-as".parse::<EdgeType>().unwrap(), EdgeType::SAME_AS);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(NodeType::new("").is_err());
        assert!(NodeType::new("   ").is_err());
        assert!(EdgeType::new("drop;table").is_err());
        assert!(EdgeType::new(&"x".repeat(MAX_TYPE_LEN + 1)).is_err());
    }

    #[test]
    fn test_serde_validates() {
        let ty: NodeType = serde_json::from_str("\"Organization\"").unwrap();
        assert_eq!(ty, NodeType::ORGANIZATION);
        assert!(serde_json::from_str::<NodeType>("\"\"").is_err());
        assert_eq!(serde_json::to_string(&EdgeType::CAUSES).unwrap(), "\"causes\"");
    }
}
