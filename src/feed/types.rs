//! Post wire types
//!
//! Field names on the wire follow the locations API; client-only flags are
//! never read from it.

use serde::{Deserialize, Serialize};

/// One point of interest shown in the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, rename = "content")]
    pub description: String,
    #[serde(default, rename = "content_shorter_version")]
    pub short_description: String,
    #[serde(default, rename = "location_area")]
    pub area: String,
    #[serde(default)]
    pub category_type: String,
    #[serde(default, rename = "theme_highlights")]
    pub themes: Vec<String>,
    #[serde(default)]
    pub price_range: String,
    #[serde(default, rename = "audience_suitability")]
    pub audience: Vec<String>,
    #[serde(default)]
    pub operating_hours: String,
    #[serde(default, rename = "additional_attributes")]
    pub attributes: Vec<String>,

    #[serde(default, skip_deserializing, skip_serializing_if = "is_false")]
    pub liked: bool,
    #[serde(default, skip_deserializing, skip_serializing_if = "is_false")]
    pub saved: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl Post {
    /// Create a post with only identity and classification fields set
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            link: String::new(),
            address: String::new(),
            images: Vec::new(),
            description: String::new(),
            short_description: String::new(),
            area: String::new(),
            category_type: category_type.into(),
            themes: Vec::new(),
            price_range: String::new(),
            audience: Vec::new(),
            operating_hours: String::new(),
            attributes: Vec::new(),
            liked: false,
            saved: false,
        }
    }

    pub fn with_themes<I, S>(mut self, themes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.themes = themes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = area.into();
        self
    }

    pub fn with_short_description(mut self, text: impl Into<String>) -> Self {
        self.short_description = text.into();
        self
    }
}

/// Response body of `GET /api/locations`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationsResponse {
    pub locations: Vec<Post>,
}
