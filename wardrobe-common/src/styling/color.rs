//! Static color compatibility rule

/// Neutrals pair with anything
pub const NEUTRAL_COLORS: &[&str] = &["black", "white", "cream", "camel", "navy", "grey"];

pub const WARM_COLORS: &[&str] = &["brown", "red", "yellow", "orange"];

pub const COOL_COLORS: &[&str] = &["blue", "denim-dark", "denim-light", "green"];

/// Hand-picked pairs, matched in either order
pub const GOOD_COMBINATIONS: &[(&str, &str)] = &[
    ("black", "white"),
    ("black", "red"),
    ("black", "blue"),
    ("white", "navy"),
    ("cream", "brown"),
    ("navy", "white"),
];

/// Whether two item colors can be worn together
///
/// # Examples
///
/// ```
/// use wardrobe_common::styling::compatible;
///
/// assert!(compatible("black", "olive"));   // neutral present
/// assert!(compatible("red", "orange"));    // both warm
/// assert!(!compatible("red", "green"));
/// ```
pub fn compatible(c1: &str, c2: &str) -> bool {
    if NEUTRAL_COLORS.contains(&c1) || NEUTRAL_COLORS.contains(&c2) {
        return true;
    }
    if c1 == c2 {
        return true;
    }
    if WARM_COLORS.contains(&c1) && WARM_COLORS.contains(&c2) {
        return true;
    }
    if COOL_COLORS.contains(&c1) && COOL_COLORS.contains(&c2) {
        return true;
    }
    GOOD_COMBINATIONS
        .iter()
        .any(|&(a, b)| (a == c1 && b == c2) || (a == c2 && b == c1))
}
