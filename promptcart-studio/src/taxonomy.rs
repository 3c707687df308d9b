//! Tag taxonomy
//!
//! A static, read-only `Category -> Subcategory -> Tag` hierarchy loaded once
//! at startup. Tags are shared as `Arc<Tag>` so the selection references them
//! without copying.

use promptcart_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Taxonomy bundled with the binary, used when no path is configured
const SAMPLE_TAXONOMY: &str = include_str!("../data/taxonomy.sample.json");

/// Atomic taxonomy entry with two localized labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Stable identifier, unique across the whole taxonomy
    pub id: String,
    pub zh: String,
    pub en: String,
}

/// Localized display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedName {
    pub zh: String,
    pub en: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: String,
    pub name: LocalizedName,
    pub tags: Vec<Arc<Tag>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: LocalizedName,
    pub subcategories: Vec<Subcategory>,
}

/// Ordered tag taxonomy with id lookup
#[derive(Debug, Clone)]
pub struct Taxonomy {
    categories: Vec<Category>,
    index: HashMap<String, Arc<Tag>>,
}

impl Taxonomy {
    /// Build a taxonomy, validating tag id uniqueness and structure
    pub fn new(categories: Vec<Category>) -> Result<Self> {
        let mut index = HashMap::new();

        for category in &categories {
            if category.subcategories.is_empty() {
                return Err(Error::Config(format!(
                    "Category '{}' has no subcategories",
                    category.id
                )));
            }
            for tag in category.subcategories.iter().flat_map(|s| s.tags.iter()) {
                if index.insert(tag.id.clone(), Arc::clone(tag)).is_some() {
                    return Err(Error::Config(format!("Duplicate tag id '{}'", tag.id)));
                }
            }
        }

        Ok(Self { categories, index })
    }

    /// Parse a taxonomy JSON document (an array of categories)
    pub fn from_json_str(json: &str) -> Result<Self> {
        let categories: Vec<Category> = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Parse taxonomy failed: {}", e)))?;
        Self::new(categories)
    }

    /// Load a taxonomy from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let taxonomy = Self::from_json_str(&content)?;
        tracing::info!(
            path = %path.display(),
            categories = taxonomy.categories.len(),
            tags = taxonomy.tag_count(),
            "Taxonomy loaded"
        );
        Ok(taxonomy)
    }

    /// The taxonomy bundled with the binary
    pub fn sample() -> Result<Self> {
        Self::from_json_str(SAMPLE_TAXONOMY)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn find_tag(&self, id: &str) -> Option<Arc<Tag>> {
        self.index.get(id).cloned()
    }

    pub fn tag_count(&self) -> usize {
        self.index.len()
    }
}

#[cfg(test)]
pub(crate) fn tag(id: &str, zh: &str, en: &str) -> Arc<Tag> {
    Arc::new(Tag {
        id: id.to_string(),
        zh: zh.to_string(),
        en: en.to_string(),
    })
}
