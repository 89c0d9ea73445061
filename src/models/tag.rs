use serde::{Deserialize, Serialize};

use crate::constants::{MAX_NAME_LENGTH, MAX_TAG_COLOR_LENGTH};

/// Tag record stored in redb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRecord {
    pub name: String,
    /// Hex color in "#RRGGBB" format
    pub color: Option<String>,
    /// Unique URL-safe identifier used for recipe filtering
    pub slug: String,
}

impl TagRecord {
    /// Validate a tag name: non-empty, within length limits
    pub fn validate_name(name: &str) -> bool {
        !name.trim().is_empty() && name.len() <= MAX_NAME_LENGTH
    }

    /// Validate a slug: non-empty, lowercase alphanumeric plus '-' and '_'
    pub fn validate_slug(slug: &str) -> bool {
        !slug.is_empty()
            && slug.len() <= MAX_NAME_LENGTH
            && slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    }

    /// Validate a color: "#" followed by six hex digits
    pub fn validate_color(color: &str) -> bool {
        color.len() == MAX_TAG_COLOR_LENGTH
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit())
    }
}
