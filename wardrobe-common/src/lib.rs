//! # Wardrobe Common Library
//!
//! Shared code for the wardrobe service including:
//! - Closet item catalog and tag vocabulary
//! - Styling rules (color compatibility, capsule and outfit generation)
//! - Analytics event types
//! - Style profile (onboarding) validation
//! - Configuration loading and root folder resolution
//! - Database schema initialization

pub mod catalog;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod events;
pub mod profile;
pub mod styling;

pub use catalog::{Catalog, Category, ClosetItem};
pub use error::{Error, Result};
pub use events::AnalyticsEvent;
pub use styling::{generate_capsule, generate_outfits, Capsule, GapSpec, Occasion, Outfit};
