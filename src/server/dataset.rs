//! Location dataset
//!
//! Loads flat location records from a CSV export and formats them into
//! feed posts once, at startup. List-valued columns are stored as
//! comma-joined strings; each location's images live in a directory named
//! after its zero-padded index. Missing columns default to empty and extra
//! columns are ignored.

use crate::error::{Error, Result};
use crate::feed::Post;
use serde::Deserialize;
use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Record index as written by spreadsheet exports: numeric or text
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RecordIndex {
    Number(u64),
    Text(String),
}

impl RecordIndex {
    fn into_string(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

/// One raw dataset row
#[derive(Debug, Clone, Deserialize)]
struct LocationRecord {
    index: RecordIndex,
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    content_shorter_version: String,
    #[serde(default)]
    location_area: String,
    #[serde(default)]
    category_type: String,
    #[serde(default)]
    theme_highlights: String,
    #[serde(default)]
    price_range: String,
    #[serde(default)]
    audience_suitability: String,
    #[serde(default)]
    additional_attributes: String,
    #[serde(default)]
    operating_hours: String,
}

/// Immutable, pre-formatted posts served by the location server
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    posts: Vec<Post>,
}

impl Dataset {
    /// Read and format the dataset. Missing or malformed files are errors.
    pub fn load(path: impl AsRef<Path>, images_dir: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let images_dir = images_dir.as_ref();

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_path(path)
            .map_err(|e| Error::Dataset(format!("Failed to read {}: {}", path.display(), e)))?;
        let records: Vec<LocationRecord> = reader
            .deserialize()
            .collect::<std::result::Result<_, csv::Error>>()
            .map_err(|e| Error::Dataset(format!("Failed to parse {}: {}", path.display(), e)))?;

        let posts: Vec<Post> = records
            .into_iter()
            .map(|record| format_record(record, images_dir))
            .collect();

        tracing::info!(
            count = posts.len(),
            path = %path.display(),
            "Loaded location dataset"
        );
        Ok(Self { posts })
    }

    pub fn from_posts(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

fn format_record(record: LocationRecord, images_dir: &Path) -> Post {
    let id = record.index.into_string();
    let images = discover_images(images_dir, &id);

    Post {
        images,
        link: record.link,
        address: record.address,
        description: record.content,
        short_description: record.content_shorter_version,
        area: record.location_area,
        themes: split_list(&record.theme_highlights),
        price_range: record.price_range,
        audience: split_list(&record.audience_suitability),
        operating_hours: record.operating_hours,
        attributes: split_list(&record.additional_attributes),
        ..Post::new(id, record.title, record.category_type)
    }
}

/// Split a comma-joined column into trimmed, non-empty tokens
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Public image paths for a location, sorted by file name
fn discover_images(images_dir: &Path, id: &str) -> Vec<String> {
    let folder = format!("{:0>6}", id);
    let entries = match std::fs::read_dir(images_dir.join(&folder)) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut files: Vec<String> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            let ext = Path::new(&name).extension()?.to_str()?.to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(name)
        })
        .collect();
    files.sort();

    files
        .into_iter()
        .map(|name| format!("/images/{}/{}", folder, name))
        .collect()
}
