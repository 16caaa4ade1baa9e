//! Analytics event types
//!
//! Every user-visible action appends one row to the `events` table. The
//! row stores the event type string, an optional entity id and the
//! variant's fields as JSON metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::Category;
use crate::styling::Occasion;

/// Analytics event recorded for a user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    /// Style profile submitted from onboarding
    CompleteOnboarding {
        budget_band: String,
        vibes: Vec<String>,
        climate: String,
    },

    /// An uploaded photo was tagged and became a closet item
    ConfirmTag {
        category: Category,
        color: String,
        silhouette: String,
    },

    GenerateCapsule {
        total_items: usize,
        selected_items: usize,
        gaps_count: usize,
    },

    GenerateOutfits {
        total_outfits: usize,
        total_items: usize,
    },

    /// Save toggled on a look
    SaveLook { outfit_id: String, action: String },

    Wear { outfit_id: String, occasion: Occasion },

    /// Swap requested; recorded even though swapping is unavailable
    Swap { outfit_id: String },
}

impl AnalyticsEvent {
    pub fn save_look(outfit_id: impl Into<String>) -> Self {
        AnalyticsEvent::SaveLook {
            outfit_id: outfit_id.into(),
            action: "toggle_save".to_string(),
        }
    }

    /// Value of the `type` column
    pub fn event_type(&self) -> &'static str {
        match self {
            AnalyticsEvent::CompleteOnboarding { .. } => "complete_onboarding",
            AnalyticsEvent::ConfirmTag { .. } => "confirm_tag",
            AnalyticsEvent::GenerateCapsule { .. } => "generate_capsule",
            AnalyticsEvent::GenerateOutfits { .. } => "generate_outfits",
            AnalyticsEvent::SaveLook { .. } => "save_look",
            AnalyticsEvent::Wear { .. } => "wear",
            AnalyticsEvent::Swap { .. } => "swap",
        }
    }

    /// Outfit the event refers to, if any
    pub fn entity_id(&self) -> Option<&str> {
        match self {
            AnalyticsEvent::SaveLook { outfit_id, .. }
            | AnalyticsEvent::Wear { outfit_id, .. }
            | AnalyticsEvent::Swap { outfit_id } => Some(outfit_id.as_str()),
            _ => None,
        }
    }

    /// Variant fields without the `type` tag
    pub fn metadata(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            map.remove("type");
        }
        value
    }
}
