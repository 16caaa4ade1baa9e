//! Styling rules
//!
//! Pure, deterministic functions over a [`Catalog`](crate::Catalog) snapshot.
//! No I/O happens here; persistence and analytics are the caller's job.

pub mod capsule;
pub mod color;
pub mod outfits;

pub use capsule::{generate_capsule, Capsule, GapSpec, MAX_GAPS};
pub use color::compatible;
pub use outfits::{
    determine_occasion, generate_outfits, score_outfit, Occasion, Outfit, OutfitKind,
    OutfitMetadata, MAX_OUTFITS,
};
