//! Entity span and link record value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel link value for entities that could not be resolved.
pub const NOT_FOUND_LINK: &str = "NOT FOUND";

/// A single recognized mention of text with a category label and source offsets.
///
/// Immutable once produced. The offsets are hints pointing back into the source
/// text; matching during evaluation is done on the text content, not on the
/// offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Mention text exactly as it appeared in the source.
    pub text: String,

    /// Category label, e.g. `LOC` or `PER`.
    #[serde(rename = "type")]
    pub entity_type: String,

    /// Character offset of the first character of the mention.
    pub start_char: usize,

    /// Character offset one past the last character of the mention.
    pub end_char: usize,
}

impl Entity {
    /// Create a new entity span.
    pub fn new(
        text: impl Into<String>,
        entity_type: impl Into<String>,
        start_char: usize,
        end_char: usize,
    ) -> Self {
        Self {
            text: text.into(),
            entity_type: entity_type.into(),
            start_char,
            end_char,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.text, self.entity_type)
    }
}

/// An entity span together with its resolved knowledge-base identifier.
///
/// `link` holds either a resolved identifier (typically a resource URI) or the
/// [`NOT_FOUND_LINK`] sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedEntity {
    /// The span that was looked up.
    pub entity: Entity,

    /// Resolved identifier, or [`NOT_FOUND_LINK`].
    pub link: String,
}

impl LinkedEntity {
    /// Create a link record for a resolved entity.
    pub fn new(entity: Entity, link: impl Into<String>) -> Self {
        Self {
            entity,
            link: link.into(),
        }
    }

    /// Create a link record carrying the not-found sentinel.
    pub fn not_found(entity: Entity) -> Self {
        Self {
            entity,
            link: NOT_FOUND_LINK.to_string(),
        }
    }

    /// Whether the lookup produced a real identifier.
    pub fn is_resolved(&self) -> bool {
        self.link != NOT_FOUND_LINK
    }
}
