//! Positional citations into a source document

use serde::{Deserialize, Serialize};

/// Which ordering a positional claim refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionKind {
    /// Order in which the source tells the story
    Narrative,
    /// Order in which things actually happened
    Chronological,
}

/// Where in a source something was found
///
/// Every field is optional. Used for human-facing citation only, never for
/// identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Page number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Section heading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    /// Chapter title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,

    /// Paragraph number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<u32>,

    /// Start character offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_start: Option<u32>,

    /// End character offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_end: Option<u32>,

    /// Ordering this location expresses, for ordering claims
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_type: Option<PositionKind>,

    /// Position within that ordering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

impl Location {
    /// A location pointing at a page
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Default::default()
        }
    }

    /// A positional location within an ordering
    pub fn ordering(kind: PositionKind, position: i64) -> Self {
        Self {
            position_type: Some(kind),
            position: Some(position),
            ..Default::default()
        }
    }

    /// Set the chapter
    pub fn with_chapter(mut self, chapter: impl Into<String>) -> Self {
        self.chapter = Some(chapter.into());
        self
    }

    /// Set the character span
    pub fn with_span(mut self, start: u32, end: u32) -> Self {
        self.char_start = Some(start);
        self.char_end = Some(end);
        self
    }

    /// Whether no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Encode to stored JSON text
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Strictly decode stored JSON text; empty input is an empty location
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text)
    }

    /// Decode stored JSON text, degrading to an empty location on failure
    pub fn decode_lenient(text: &str) -> Self {
        Self::decode(text).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "undecodable location payload, treating as empty");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_location_encodes_to_empty_object() {
        assert_eq!(Location::default().encode().unwrap(), "{}");
        assert!(Location::decode("{}").unwrap().is_empty());
        assert!(Location::decode("").unwrap().is_empty());
    }

    #[test]
    fn test_partial_location() {
        let loc = Location::page(12).with_chapter("Chapter 3");
        let text = loc.encode().unwrap();
        assert!(text.contains("\"page\":12"));
        assert!(!text.contains("section"));
        assert_eq!(Location::decode(&text).unwrap(), loc);
    }

    #[test]
    fn test_ordering_location() {
        let loc = Location::ordering(PositionKind::Chronological, 4);
        let text = loc.encode().unwrap();
        assert!(text.contains("\"position_type\":\"chronological\""));
        assert_eq!(Location::decode(&text).unwrap().position, Some(4));
    }

    #[test]
    fn test_corrupt_payload() {
        assert!(Location::decode("{\"page\": \"twelve\"}").is_err());
        assert!(Location::decode_lenient("{\"page\": \"twelve\"}").is_empty());
    }
}
