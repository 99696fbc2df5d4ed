//! User profile data model collected by the onboarding wizard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::DietaryRestriction;
use crate::error::ValidationError;

/// Inclusive timeframe bounds, in weeks.
pub const TIMEFRAME_MIN: u32 = 1;
pub const TIMEFRAME_MAX: u32 = 12;

/// Inclusive weekly budget bounds and slider step.
pub const BUDGET_MIN: u32 = 50;
pub const BUDGET_MAX: u32 = 250;
pub const BUDGET_STEP: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightGoal {
    LoseFat,
    GainMuscle,
    #[default]
    Maintain,
}

/// Weekly activity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exercise {
    None,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
}

/// User profile built by the onboarding wizard and read by the recipe,
/// meal plan and grocery pages.
///
/// Stored in the `settings` table as JSON under key `"user_profile"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Generated once when the wizard starts.
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Kilograms.
    pub weight: u32,
    /// Centimetres.
    pub height: u32,
    /// Tags may coexist freely, including `none` alongside others.
    pub dietary_restrictions: Vec<DietaryRestriction>,
    /// Free text, compared exactly (case and whitespace sensitive).
    pub allergens: Vec<String>,
    pub weight_goal: WeightGoal,
    pub exercise: Exercise,
    /// Weeks, within `[TIMEFRAME_MIN, TIMEFRAME_MAX]`.
    pub timeframe: u32,
    /// Weekly budget, within `[BUDGET_MIN, BUDGET_MAX]` in steps of `BUDGET_STEP`.
    pub budget: u32,
    #[serde(default)]
    pub onboarding_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboarding_completed_at: Option<DateTime<Utc>>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            age: 30,
            gender: None,
            weight: 70,
            height: 170,
            dietary_restrictions: Vec::new(),
            allergens: Vec::new(),
            weight_goal: WeightGoal::default(),
            exercise: Exercise::default(),
            timeframe: 8,
            budget: 100,
            onboarding_completed: false,
            onboarding_completed_at: None,
        }
    }
}

impl UserProfile {
    /// Add the tag if absent, remove it if present.
    ///
    /// Returns whether the tag is present afterwards.
    pub fn toggle_dietary_restriction(&mut self, tag: DietaryRestriction) -> bool {
        if let Some(pos) = self.dietary_restrictions.iter().position(|r| *r == tag) {
            self.dietary_restrictions.remove(pos);
            false
        } else {
            self.dietary_restrictions.push(tag);
            true
        }
    }

    /// Append an allergen unless it is already listed. Returns whether it was added.
    pub fn add_allergen(&mut self, allergen: &str) -> Result<bool, ValidationError> {
        if allergen.is_empty() {
            return Err(ValidationError::EmptyAllergen);
        }
        if self.allergens.iter().any(|a| a == allergen) {
            return Ok(false);
        }
        self.allergens.push(allergen.to_string());
        Ok(true)
    }

    /// Remove every exact match. Returns whether anything was removed.
    pub fn remove_allergen(&mut self, allergen: &str) -> bool {
        let before = self.allergens.len();
        self.allergens.retain(|a| a != allergen);
        self.allergens.len() != before
    }

    /// Length of the meal plan calendar in days.
    pub fn plan_length(&self) -> u32 {
        self.timeframe * 7
    }
}
