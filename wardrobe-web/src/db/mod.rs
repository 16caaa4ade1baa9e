//! Per-user persistence over the shared SQLite schema

pub mod capsules;
pub mod closet_items;
pub mod events;
pub mod outfits;
pub mod uploads;
pub mod users;
