//! Typed profile update commands.
//!
//! Each command belongs to exactly one wizard step. Numeric text input is
//! parsed and range-checked here, so nothing malformed reaches the profile.

use serde::{Deserialize, Serialize};

use super::model::{
    BUDGET_MAX, BUDGET_MIN, BUDGET_STEP, Exercise, Gender, TIMEFRAME_MAX, TIMEFRAME_MIN,
    UserProfile, WeightGoal,
};
use super::state::OnboardingStep;
use crate::error::ValidationError;

/// A single-field profile change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ProfileUpdate {
    Name(String),
    Age(u32),
    Gender(Gender),
    Weight(u32),
    Height(u32),
    WeightGoal(WeightGoal),
    Exercise(Exercise),
    Timeframe(u32),
    Budget(u32),
}

impl ProfileUpdate {
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Age(_) => "age",
            Self::Gender(_) => "gender",
            Self::Weight(_) => "weight",
            Self::Height(_) => "height",
            Self::WeightGoal(_) => "weight_goal",
            Self::Exercise(_) => "exercise",
            Self::Timeframe(_) => "timeframe",
            Self::Budget(_) => "budget",
        }
    }

    /// The wizard step that owns this field.
    pub fn step(&self) -> OnboardingStep {
        match self {
            Self::Name(_) | Self::Age(_) | Self::Gender(_) | Self::Weight(_) | Self::Height(_) => {
                OnboardingStep::Personal
            }
            Self::WeightGoal(_) | Self::Exercise(_) => OnboardingStep::Goals,
            Self::Timeframe(_) => OnboardingStep::Timeframe,
            Self::Budget(_) => OnboardingStep::Budget,
        }
    }

    /// Check slider bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match *self {
            Self::Timeframe(weeks) => check_range("timeframe", weeks, TIMEFRAME_MIN, TIMEFRAME_MAX),
            Self::Budget(budget) => {
                check_range("budget", budget, BUDGET_MIN, BUDGET_MAX)?;
                if (budget - BUDGET_MIN) % BUDGET_STEP != 0 {
                    return Err(ValidationError::OffStep {
                        field: "budget".to_string(),
                        value: i64::from(budget),
                        step: i64::from(BUDGET_STEP),
                    });
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Write the value into `profile`. Call `validate` first.
    pub(crate) fn apply_to(self, profile: &mut UserProfile) {
        match self {
            Self::Name(name) => profile.name = name,
            Self::Age(age) => profile.age = age,
            Self::Gender(gender) => profile.gender = Some(gender),
            Self::Weight(weight) => profile.weight = weight,
            Self::Height(height) => profile.height = height,
            Self::WeightGoal(goal) => profile.weight_goal = goal,
            Self::Exercise(exercise) => profile.exercise = exercise,
            Self::Timeframe(weeks) => profile.timeframe = weeks,
            Self::Budget(budget) => profile.budget = budget,
        }
    }
}

fn check_range(field: &str, value: u32, min: u32, max: u32) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: i64::from(value),
            min: i64::from(min),
            max: i64::from(max),
        })
    }
}

/// Numeric profile fields entered as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    Age,
    Weight,
    Height,
    Timeframe,
    Budget,
}

impl NumericField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Weight => "weight",
            Self::Height => "height",
            Self::Timeframe => "timeframe",
            Self::Budget => "budget",
        }
    }

    /// Parse raw text into a validated update.
    ///
    /// Only non-negative whole numbers are accepted; surrounding whitespace
    /// is ignored.
    pub fn parse(self, raw: &str) -> Result<ProfileUpdate, ValidationError> {
        let value: u32 = raw.trim().parse().map_err(|_| ValidationError::NotANumber {
            field: self.as_str().to_string(),
            raw: raw.to_string(),
        })?;
        let update = match self {
            Self::Age => ProfileUpdate::Age(value),
            Self::Weight => ProfileUpdate::Weight(value),
            Self::Height => ProfileUpdate::Height(value),
            Self::Timeframe => ProfileUpdate::Timeframe(value),
            Self::Budget => ProfileUpdate::Budget(value),
        };
        update.validate()?;
        Ok(update)
    }
}
