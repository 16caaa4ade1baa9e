//! Style profile collected during onboarding

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Style vibes offered by the onboarding form
pub const VIBE_OPTIONS: &[&str] = &[
    "minimal",
    "tailored",
    "street-lite",
    "romantic",
    "edgy",
    "classic",
    "bohemian",
    "preppy",
];

pub const DEFAULT_CLIMATE: &str = "temperate";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sizes {
    #[serde(default)]
    pub top: String,
    #[serde(default)]
    pub bottom: String,
    #[serde(default)]
    pub shoe: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleProfile {
    #[serde(default)]
    pub sizes: Sizes,
    #[serde(default)]
    pub budget_band: String,
    #[serde(default)]
    pub vibes: Vec<String>,
    #[serde(default = "default_climate")]
    pub climate: String,
    #[serde(default)]
    pub brands: Vec<String>,
}

fn default_climate() -> String {
    DEFAULT_CLIMATE.to_string()
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self {
            sizes: Sizes::default(),
            budget_band: String::new(),
            vibes: Vec::new(),
            climate: default_climate(),
            brands: Vec::new(),
        }
    }
}

/// Where an authenticated user should land
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NextStep {
    Onboarding,
    Closet,
}

impl NextStep {
    pub fn path(&self) -> &'static str {
        match self {
            NextStep::Onboarding => "/onboarding",
            NextStep::Closet => "/closet",
        }
    }
}

impl StyleProfile {
    /// A profile needs a budget band and at least one vibe
    pub fn is_complete(&self) -> bool {
        !self.budget_band.trim().is_empty() && !self.vibes.is_empty()
    }

    pub fn next_step(&self) -> NextStep {
        if self.is_complete() {
            NextStep::Closet
        } else {
            NextStep::Onboarding
        }
    }

    /// Check a submitted onboarding form
    pub fn validate(&self) -> Result<()> {
        if self.budget_band.trim().is_empty() {
            return Err(Error::InvalidInput("budget_band is required".to_string()));
        }
        if self.vibes.is_empty() {
            return Err(Error::InvalidInput("Select at least one vibe".to_string()));
        }
        if let Some(unknown) = self.vibes.iter().find(|v| !VIBE_OPTIONS.contains(&v.as_str())) {
            return Err(Error::InvalidInput(format!("Unknown vibe: {}", unknown)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(budget: &str, vibes: &[&str]) -> StyleProfile {
        StyleProfile {
            budget_band: budget.to_string(),
            vibes: vibes.iter().map(|v| v.to_string()).collect(),
            ..StyleProfile::default()
        }
    }

    #[test]
    fn test_default_profile_routes_to_onboarding() {
        let p = StyleProfile::default();
        assert!(!p.is_complete());
        assert_eq!(p.next_step(), NextStep::Onboarding);
        assert_eq!(p.climate, DEFAULT_CLIMATE);
    }

    #[test]
    fn test_complete_profile_routes_to_closet() {
        let p = profile("$$", &["minimal", "classic"]);
        assert!(p.validate().is_ok());
        assert_eq!(p.next_step().path(), "/closet");
    }

    #[test]
    fn test_validate_requires_budget_and_vibe() {
        assert!(profile("", &["edgy"]).validate().is_err());
        assert!(profile("$", &[]).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_vibe() {
        let err = profile("$", &["grunge"]).validate().unwrap_err();
        assert!(err.to_string().contains("grunge"));
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let p: StyleProfile = serde_json::from_str(r#"{"budget_band": "$$"}"#).unwrap();
        assert_eq!(p.climate, "temperate");
        assert!(p.brands.is_empty());
        assert_eq!(p.sizes, Sizes::default());
    }
}
