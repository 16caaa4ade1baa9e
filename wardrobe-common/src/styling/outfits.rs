//! Outfit generation, scoring and occasion tagging
//!
//! Candidates are enumerated in catalog order: dress-based looks first,
//! then every color-compatible (top, bottom) pair. Enumeration stops at
//! [`MAX_OUTFITS`] candidates, which are then ranked by score with a
//! stable sort so ties keep generation order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::color::compatible;
use crate::catalog::{Catalog, Category, ClosetItem};
use crate::{Error, Result};

/// Maximum outfits returned per generation
pub const MAX_OUTFITS: usize = 10;

/// Coarse occasion label attached to an outfit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occasion {
    Evening,
    Work,
    Casual,
}

impl Occasion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Occasion::Evening => "evening",
            Occasion::Work => "work",
            Occasion::Casual => "casual",
        }
    }
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Occasion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "evening" => Ok(Occasion::Evening),
            "work" => Ok(Occasion::Work),
            "casual" => Ok(Occasion::Casual),
            other => Err(Error::InvalidInput(format!("Unknown occasion: {}", other))),
        }
    }
}

/// How the outfit was assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutfitKind {
    Dress,
    Separates,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitMetadata {
    #[serde(rename = "type")]
    pub kind: OutfitKind,
    /// Item colors in item order (repeats kept)
    pub colors: Vec<String>,
}

/// A generated look
///
/// `saved` and `worn` are the only fields that change after generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outfit {
    pub id: String,
    pub items: Vec<ClosetItem>,
    pub occasion: Occasion,
    pub score: u32,
    pub saved: bool,
    pub worn: bool,
    pub metadata: OutfitMetadata,
}

impl Outfit {
    fn assemble(id: String, items: Vec<ClosetItem>, occasion: Occasion, kind: OutfitKind) -> Self {
        let score = score_outfit(&items);
        let colors = items.iter().map(|i| i.color.clone()).collect();
        Self {
            id,
            items,
            occasion,
            score,
            saved: false,
            worn: false,
            metadata: OutfitMetadata { kind, colors },
        }
    }

    pub fn item_ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.id.clone()).collect()
    }

    /// One-line caption shown under the look
    pub fn description(&self) -> String {
        match self.metadata.kind {
            OutfitKind::Dress => format!(
                "Perfect {} look with your {} dress",
                self.occasion,
                self.items.first().map(|i| i.color.as_str()).unwrap_or_default()
            ),
            OutfitKind::Separates => format!(
                "Stylish {} combination with {} colors",
                self.occasion,
                self.metadata.colors.join(" and ")
            ),
        }
    }

    /// Flip the saved flag, returning the new value
    pub fn toggle_saved(&mut self) -> bool {
        self.saved = !self.saved;
        self.saved
    }

    /// Mark the outfit worn; returns false when it already was
    pub fn mark_worn(&mut self) -> bool {
        if self.worn {
            return false;
        }
        self.worn = true;
        true
    }
}

/// Additive score from category presence and color count
///
/// The terms sum to at most 10 (2+2+1+1+1 for categories, 3 for two or
/// fewer distinct colors).
pub fn score_outfit(items: &[ClosetItem]) -> u32 {
    let has = |category: Category| items.iter().any(|i| i.category == category);

    let mut score = 0;
    if has(Category::Top) {
        score += 2;
    }
    if has(Category::Bottom) {
        score += 2;
    }
    if has(Category::Shoes) {
        score += 1;
    }
    if has(Category::Bag) {
        score += 1;
    }
    if has(Category::Outerwear) {
        score += 1;
    }

    let distinct: BTreeSet<&str> = items.iter().map(|i| i.color.as_str()).collect();
    if distinct.len() <= 3 {
        score += 2;
    }
    if distinct.len() <= 2 {
        score += 1;
    }
    score
}

/// Occasion for a separates look; dress looks are always evening
pub fn determine_occasion(items: &[ClosetItem]) -> Occasion {
    let has_sub = |sub: &str| items.iter().any(|i| i.subcategory == sub);

    if has_sub("blazer") || has_sub("heels") {
        Occasion::Work
    } else {
        Occasion::Casual
    }
}

/// First candidate whose color passes `exact`, else `loose`, else the first
fn pick<'a>(
    candidates: &[&'a ClosetItem],
    exact: impl Fn(&str) -> bool,
    loose: impl Fn(&str) -> bool,
) -> Option<&'a ClosetItem> {
    candidates
        .iter()
        .find(|i| exact(&i.color))
        .or_else(|| candidates.iter().find(|i| loose(&i.color)))
        .or_else(|| candidates.first())
        .copied()
}

/// Generate up to [`MAX_OUTFITS`] looks, highest score first
pub fn generate_outfits(catalog: &Catalog) -> Vec<Outfit> {
    let tops = catalog.of(Category::Top);
    let bottoms = catalog.of(Category::Bottom);
    let dresses = catalog.of(Category::Dress);
    let outerwear = catalog.of(Category::Outerwear);
    let shoes = catalog.of(Category::Shoes);
    let bags = catalog.of(Category::Bag);

    let mut outfits: Vec<Outfit> = Vec::new();

    for dress in &dresses {
        if outfits.len() >= MAX_OUTFITS {
            break;
        }
        let color = dress.color.as_str();
        let shoe = pick(&shoes, |c| c == color, |c| compatible(c, color));
        let bag = pick(&bags, |c| c == color, |c| compatible(c, color));
        let jacket = outerwear.iter().find(|o| compatible(&o.color, color));

        let mut items = vec![(*dress).clone()];
        items.extend(shoe.cloned());
        items.extend(bag.cloned());
        items.extend(jacket.map(|j| (*j).clone()));

        if items.len() >= 2 {
            let id = format!("outfit-{}", outfits.len());
            outfits.push(Outfit::assemble(id, items, Occasion::Evening, OutfitKind::Dress));
        }
    }

    'pairs: for top in &tops {
        for bottom in &bottoms {
            if outfits.len() >= MAX_OUTFITS {
                break 'pairs;
            }
            let (tc, bc) = (top.color.as_str(), bottom.color.as_str());
            if !compatible(tc, bc) {
                continue;
            }

            let matches = |c: &str| c == tc || c == bc;
            let Some(shoe) = pick(&shoes, matches, |c| compatible(c, tc)) else {
                continue;
            };
            let bag = pick(&bags, matches, |c| compatible(c, tc));
            let jacket = outerwear
                .iter()
                .find(|o| compatible(&o.color, tc) && compatible(&o.color, bc));

            let mut items = vec![(*top).clone(), (*bottom).clone(), shoe.clone()];
            items.extend(bag.cloned());
            items.extend(jacket.map(|j| (*j).clone()));

            let occasion = determine_occasion(&items);
            let id = format!("outfit-{}", outfits.len());
            outfits.push(Outfit::assemble(id, items, occasion, OutfitKind::Separates));
        }
    }

    // Vec::sort_by is stable: equal scores keep generation order
    outfits.sort_by(|a, b| b.score.cmp(&a.score));
    outfits.truncate(MAX_OUTFITS);
    outfits
}
