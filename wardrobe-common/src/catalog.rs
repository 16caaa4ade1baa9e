//! Closet item catalog and tag vocabulary
//!
//! A [`Catalog`] is an immutable snapshot of one user's confirmed items.
//! Handlers load it once per request and pass it by reference into the
//! styling rules, so generation never touches shared state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Minimum confirmed items before a capsule can be generated
pub const MIN_CAPSULE_ITEMS: usize = 8;

/// Minimum confirmed items before outfits can be generated
pub const MIN_OUTFIT_ITEMS: usize = 3;

/// Upper bound on items (confirmed plus awaiting tags) per closet
pub const MAX_CLOSET_ITEMS: usize = 15;

/// Season assigned when the tagging form leaves it untouched
pub const DEFAULT_SEASON: &str = "all-season";

/// Colors offered by the tagging form
pub const COLORS: &[&str] = &[
    "black",
    "white",
    "cream",
    "camel",
    "navy",
    "grey",
    "blue",
    "denim-dark",
    "denim-light",
    "olive",
    "blush",
    "brown",
    "red",
    "green",
];

/// Silhouettes offered by the tagging form
pub const SILHOUETTES: &[&str] = &[
    "fitted",
    "straight",
    "relaxed",
    "oversized",
    "wide-leg",
    "tapered",
    "A-line",
];

/// Garment category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Top,
    Bottom,
    Dress,
    Outerwear,
    Shoes,
    Bag,
    Accessory,
}

impl Category {
    /// Order in which the capsule generator inspects categories
    pub const PRIORITY: [Category; 7] = [
        Category::Top,
        Category::Bottom,
        Category::Dress,
        Category::Outerwear,
        Category::Shoes,
        Category::Bag,
        Category::Accessory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Top => "top",
            Category::Bottom => "bottom",
            Category::Dress => "dress",
            Category::Outerwear => "outerwear",
            Category::Shoes => "shoes",
            Category::Bag => "bag",
            Category::Accessory => "accessory",
        }
    }

    /// Subcategories the tagging form offers for this category
    pub fn subcategories(&self) -> &'static [&'static str] {
        match self {
            Category::Top => &["tee", "blouse", "sweater", "tank", "polo"],
            Category::Bottom => &["jeans", "trousers", "shorts", "skirt"],
            Category::Dress => &["midi", "mini", "maxi", "shirt-dress"],
            Category::Outerwear => &["blazer", "jacket", "coat", "vest"],
            Category::Shoes => &["sneakers", "loafers", "boots", "heels", "flats"],
            Category::Bag => &["tote", "crossbody", "clutch", "backpack"],
            Category::Accessory => &["belt", "scarf", "hat", "jewelry"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::PRIORITY
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown category: {}", s)))
    }
}

/// A confirmed wardrobe item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosetItem {
    pub id: String,
    pub image_url: String,
    pub category: Category,
    #[serde(default)]
    pub subcategory: String,
    pub color: String,
    pub silhouette: String,
    #[serde(default = "default_season")]
    pub season: String,
}

fn default_season() -> String {
    DEFAULT_SEASON.to_string()
}

impl ClosetItem {
    /// Build an item from validated tags
    pub fn from_tags(id: impl Into<String>, image_url: impl Into<String>, tags: Tags) -> Self {
        Self {
            id: id.into(),
            image_url: image_url.into(),
            category: tags.category,
            subcategory: tags.subcategory,
            color: tags.color,
            silhouette: tags.silhouette,
            season: tags.season,
        }
    }
}

/// Snapshot of a user's confirmed items, in catalog (insertion) order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<ClosetItem>,
}

impl Catalog {
    pub fn new(items: Vec<ClosetItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ClosetItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<ClosetItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items of one category, catalog order preserved
    pub fn of(&self, category: Category) -> Vec<&ClosetItem> {
        self.items.iter().filter(|i| i.category == category).collect()
    }

    /// Item count per category; categories with no items are absent
    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for item in &self.items {
            *counts.entry(item.category).or_insert(0) += 1;
        }
        counts
    }

    pub fn can_generate_capsule(&self) -> bool {
        self.len() >= MIN_CAPSULE_ITEMS
    }

    pub fn can_generate_outfits(&self) -> bool {
        self.len() >= MIN_OUTFIT_ITEMS
    }
}

/// Tag form contents as submitted; every field may still be blank
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagDraft {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub silhouette: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
}

/// Tags that passed validation and can become a [`ClosetItem`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tags {
    pub category: Category,
    pub subcategory: String,
    pub color: String,
    pub silhouette: String,
    pub season: String,
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::InvalidInput(format!("{} is required", field))),
    }
}

impl TagDraft {
    /// Category, color and silhouette are required before confirmation
    pub fn validate(&self) -> Result<Tags> {
        let category: Category = required(&self.category, "category")?.parse()?;
        let color = required(&self.color, "color")?;
        let silhouette = required(&self.silhouette, "silhouette")?;

        let subcategory = self
            .subcategory
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if !subcategory.is_empty() && !category.subcategories().contains(&subcategory) {
            return Err(Error::InvalidInput(format!(
                "Subcategory '{}' does not belong to {}",
                subcategory, category
            )));
        }
        if !COLORS.contains(&color) {
            return Err(Error::InvalidInput(format!("Unknown color: {}", color)));
        }
        if !SILHOUETTES.contains(&silhouette) {
            return Err(Error::InvalidInput(format!("Unknown silhouette: {}", silhouette)));
        }

        let season = match self.season.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => DEFAULT_SEASON.to_string(),
        };

        Ok(Tags {
            category,
            subcategory: subcategory.to_string(),
            color: color.to_string(),
            silhouette: silhouette.to_string(),
            season,
        })
    }
}
