//! Capsule generation: owned items plus recommended gaps

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{Catalog, Category, ClosetItem};

/// Maximum number of gap recommendations per capsule
pub const MAX_GAPS: usize = 6;

/// A recommended item the user does not own yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapSpec {
    pub category: Category,
    pub color: String,
    pub silhouette: String,
    pub reason: String,
}

impl GapSpec {
    fn new(category: Category, color: &str, silhouette: &str, reason: String) -> Self {
        Self {
            category,
            color: color.to_string(),
            silhouette: silhouette.to_string(),
            reason,
        }
    }

    /// No items of this category at all
    fn missing(category: Category) -> Self {
        if category == Category::Bottom {
            Self::new(
                category,
                "black",
                "straight",
                "A black trouser would unlock 5+ outfit combinations".to_string(),
            )
        } else {
            Self::new(
                category,
                "neutral",
                "straight",
                format!("A {} would unlock 5+ outfit combinations", category),
            )
        }
    }

    /// Exactly one item of this category
    fn second(category: Category) -> Self {
        let (color, silhouette) = if category == Category::Bottom {
            ("blue", "straight")
        } else {
            ("neutral", "fitted")
        };
        Self::new(
            category,
            color,
            silhouette,
            format!("An additional {} would create more outfit variety", category),
        )
    }
}

/// Generated capsule: the whole catalog plus up to [`MAX_GAPS`] gaps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capsule {
    pub selected: Vec<ClosetItem>,
    pub gaps: Vec<GapSpec>,
}

impl Capsule {
    pub fn owned_item_ids(&self) -> Vec<String> {
        self.selected.iter().map(|i| i.id.clone()).collect()
    }

    /// Gap reasons keyed `gap_0`, `gap_1`, ... in gap order
    pub fn reasons(&self) -> BTreeMap<String, String> {
        self.gaps
            .iter()
            .enumerate()
            .map(|(i, gap)| (format!("gap_{}", i), gap.reason.clone()))
            .collect()
    }
}

/// Build a capsule from a catalog snapshot
///
/// Every item is selected. Gaps come from one pass over
/// [`Category::PRIORITY`], followed by unconditional outerwear and bag
/// checks. Those trailing checks repeat a category the pass already
/// reported as missing; the repeat is kept as-is and only the first
/// [`MAX_GAPS`] entries survive.
pub fn generate_capsule(catalog: &Catalog) -> Capsule {
    let counts = catalog.category_counts();
    let count = |c: Category| counts.get(&c).copied().unwrap_or(0);

    let mut gaps = Vec::new();
    for category in Category::PRIORITY {
        match count(category) {
            0 => gaps.push(GapSpec::missing(category)),
            1 if category != Category::Accessory => gaps.push(GapSpec::second(category)),
            _ => {}
        }
    }

    if count(Category::Outerwear) == 0 {
        gaps.push(GapSpec::new(
            Category::Outerwear,
            "neutral",
            "fitted",
            "A neutral blazer would create 8+ professional looks".to_string(),
        ));
    }
    if count(Category::Bag) == 0 {
        gaps.push(GapSpec::new(
            Category::Bag,
            "black",
            "medium",
            "A versatile bag would complete your daily looks".to_string(),
        ));
    }

    gaps.truncate(MAX_GAPS);

    Capsule {
        selected: catalog.items().to_vec(),
        gaps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DEFAULT_SEASON;

    fn item(id: usize, category: Category) -> ClosetItem {
        ClosetItem {
            id: format!("item-{}", id),
            image_url: format!("https://cdn.test/{}.jpg", id),
            category,
            subcategory: String::new(),
            color: "black".to_string(),
            silhouette: "fitted".to_string(),
            season: DEFAULT_SEASON.to_string(),
        }
    }

    fn catalog(categories: &[Category]) -> Catalog {
        Catalog::new(
            categories
                .iter()
                .enumerate()
                .map(|(i, c)| item(i, *c))
                .collect(),
        )
    }

    fn gap_categories(capsule: &Capsule) -> Vec<Category> {
        capsule.gaps.iter().map(|g| g.category).collect()
    }

    #[test]
    fn test_empty_catalog_yields_zero_count_gaps() {
        let capsule = generate_capsule(&Catalog::default());

        assert!(capsule.selected.is_empty());
        assert_eq!(
            gap_categories(&capsule),
            vec![
                Category::Top,
                Category::Bottom,
                Category::Dress,
                Category::Outerwear,
                Category::Shoes,
                Category::Bag,
            ]
        );
        assert_eq!(capsule.gaps[1].color, "black");
        assert_eq!(capsule.gaps[1].silhouette, "straight");
        assert_eq!(
            capsule.gaps[1].reason,
            "A black trouser would unlock 5+ outfit combinations"
        );
        assert_eq!(capsule.gaps[0].color, "neutral");
        assert_eq!(capsule.gaps[0].reason, "A top would unlock 5+ outfit combinations");
    }

    #[test]
    fn test_selected_is_whole_catalog_in_order() {
        let c = catalog(&[
            Category::Shoes,
            Category::Top,
            Category::Top,
            Category::Bottom,
            Category::Bottom,
            Category::Dress,
            Category::Outerwear,
            Category::Bag,
        ]);
        let capsule = generate_capsule(&c);
        assert_eq!(capsule.selected, c.items());
    }

    #[test]
    fn test_single_items_request_a_second() {
        let c = catalog(&[
            Category::Top,
            Category::Bottom,
            Category::Dress,
            Category::Outerwear,
            Category::Shoes,
            Category::Bag,
            Category::Accessory,
        ]);
        let capsule = generate_capsule(&c);

        // Accessory is never asked for twice
        assert_eq!(
            gap_categories(&capsule),
            vec![
                Category::Top,
                Category::Bottom,
                Category::Dress,
                Category::Outerwear,
                Category::Shoes,
                Category::Bag,
            ]
        );
        let bottom = &capsule.gaps[1];
        assert_eq!((bottom.color.as_str(), bottom.silhouette.as_str()), ("blue", "straight"));
        let top = &capsule.gaps[0];
        assert_eq!((top.color.as_str(), top.silhouette.as_str()), ("neutral", "fitted"));
        assert_eq!(top.reason, "An additional top would create more outfit variety");
    }

    #[test]
    fn test_missing_dress_and_bag_duplicates_bag_gap() {
        let c = catalog(&[
            Category::Top,
            Category::Top,
            Category::Top,
            Category::Bottom,
            Category::Bottom,
            Category::Outerwear,
            Category::Shoes,
            Category::Shoes,
        ]);
        let capsule = generate_capsule(&c);

        assert_eq!(
            gap_categories(&capsule),
            vec![
                Category::Dress,
                Category::Outerwear,
                Category::Bag,
                Category::Accessory,
                Category::Bag,
            ]
        );
        let dress = &capsule.gaps[0];
        assert_eq!((dress.color.as_str(), dress.silhouette.as_str()), ("neutral", "straight"));

        // Exactly two bag entries: the zero-count gap and the trailing check
        let bags: Vec<&GapSpec> = capsule
            .gaps
            .iter()
            .filter(|g| g.category == Category::Bag)
            .collect();
        assert_eq!(bags.len(), 2);
        assert_eq!(bags[0].silhouette, "straight");
        assert_eq!(bags[1].silhouette, "medium");
        assert_eq!(bags[1].reason, "A versatile bag would complete your daily looks");
    }

    #[test]
    fn test_trailing_outerwear_gap_when_missing() {
        let c = catalog(&[
            Category::Top,
            Category::Top,
            Category::Bottom,
            Category::Bottom,
            Category::Dress,
            Category::Dress,
            Category::Shoes,
            Category::Shoes,
            Category::Bag,
            Category::Bag,
            Category::Accessory,
        ]);
        let capsule = generate_capsule(&c);

        assert_eq!(gap_categories(&capsule), vec![Category::Outerwear, Category::Outerwear]);
        assert_eq!(
            capsule.gaps[1].reason,
            "A neutral blazer would create 8+ professional looks"
        );
    }

    #[test]
    fn test_well_stocked_catalog_has_no_gaps() {
        let mut categories = Vec::new();
        for c in Category::PRIORITY {
            categories.push(c);
            categories.push(c);
        }
        let capsule = generate_capsule(&catalog(&categories));
        assert!(capsule.gaps.is_empty());
        assert!(capsule.reasons().is_empty());
    }

    #[test]
    fn test_gap_count_never_exceeds_limit() {
        for n in 0..Category::PRIORITY.len() {
            let c = catalog(&Category::PRIORITY[..n]);
            let capsule = generate_capsule(&c);
            assert!(capsule.gaps.len() <= MAX_GAPS);
            assert_eq!(capsule.selected.len(), n);
        }
    }

    #[test]
    fn test_reasons_keyed_by_position() {
        let capsule = generate_capsule(&Catalog::default());
        let reasons = capsule.reasons();
        assert_eq!(reasons.len(), capsule.gaps.len());
        assert_eq!(reasons["gap_0"], capsule.gaps[0].reason);
        assert_eq!(reasons["gap_5"], capsule.gaps[5].reason);
    }
}
