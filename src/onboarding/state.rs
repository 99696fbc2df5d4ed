//! Onboarding state machine: tracks which step the user is on.

use serde::{Deserialize, Serialize};

use super::model::UserProfile;
use super::update::ProfileUpdate;
use crate::catalog::DietaryRestriction;
use crate::error::ValidationError;

/// The steps of the onboarding wizard.
///
/// Progresses linearly: Welcome → Personal → Dietary → Goals → Timeframe →
/// Budget → Complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    #[default]
    Welcome,
    Personal,
    Dietary,
    Goals,
    Timeframe,
    Budget,
    Complete,
}

impl OnboardingStep {
    pub const ALL: [OnboardingStep; 7] = [
        Self::Welcome,
        Self::Personal,
        Self::Dietary,
        Self::Goals,
        Self::Timeframe,
        Self::Budget,
        Self::Complete,
    ];

    /// Whether this step is terminal (the summary).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Get the next step in the linear progression, if any.
    pub fn next(&self) -> Option<OnboardingStep> {
        use OnboardingStep::*;
        match self {
            Welcome => Some(Personal),
            Personal => Some(Dietary),
            Dietary => Some(Goals),
            Goals => Some(Timeframe),
            Timeframe => Some(Budget),
            Budget => Some(Complete),
            Complete => None,
        }
    }

    /// Get the previous step, if any.
    pub fn previous(&self) -> Option<OnboardingStep> {
        use OnboardingStep::*;
        match self {
            Welcome => None,
            Personal => Some(Welcome),
            Dietary => Some(Personal),
            Goals => Some(Dietary),
            Timeframe => Some(Goals),
            Budget => Some(Timeframe),
            Complete => Some(Budget),
        }
    }

    /// Zero-based position in the progression.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn total() -> usize {
        Self::ALL.len()
    }

    /// Progress bar fill, 0 at `Welcome` and 100 at `Complete`.
    pub fn progress_percent(&self) -> u8 {
        (self.index() * 100 / (Self::total() - 1)) as u8
    }

    /// Heading shown above the step.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::Personal => "Personal Information",
            Self::Dietary => "Dietary Preferences",
            Self::Goals => "Your Goals",
            Self::Timeframe => "Timeframe",
            Self::Budget => "Weekly Budget",
            Self::Complete => "All Set",
        }
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Welcome => "welcome",
            Self::Personal => "personal",
            Self::Dietary => "dietary",
            Self::Goals => "goals",
            Self::Timeframe => "timeframe",
            Self::Budget => "budget",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

/// Outcome of a forward transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the given step.
    Moved(OnboardingStep),
    /// `next` was invoked on the terminal step; the profile is ready to be
    /// finalized. The step does not change.
    Finish,
}

/// In-progress wizard: current step plus the profile being edited.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnboardingState {
    pub step: OnboardingStep,
    pub profile: UserProfile,
}

impl OnboardingState {
    /// Start at `Welcome` editing an existing profile.
    pub fn editing(profile: UserProfile) -> Self {
        Self {
            step: OnboardingStep::Welcome,
            profile,
        }
    }

    /// Advance one step, or signal that the terminal step was confirmed.
    pub fn advance(&mut self) -> Advance {
        match self.step.next() {
            Some(next) => {
                self.step = next;
                Advance::Moved(next)
            }
            None => Advance::Finish,
        }
    }

    /// Go back one step. No-op at `Welcome`.
    pub fn back(&mut self) -> OnboardingStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Apply a typed field update owned by the current step.
    pub fn apply(&mut self, update: ProfileUpdate) -> Result<(), ValidationError> {
        self.require_step(update.step(), update.field_name())?;
        update.validate()?;
        update.apply_to(&mut self.profile);
        Ok(())
    }

    /// Toggle a dietary restriction. Only valid on the dietary step.
    pub fn toggle_dietary_restriction(
        &mut self,
        tag: DietaryRestriction,
    ) -> Result<bool, ValidationError> {
        self.require_step(OnboardingStep::Dietary, "dietary_restrictions")?;
        Ok(self.profile.toggle_dietary_restriction(tag))
    }

    pub fn add_allergen(&mut self, allergen: &str) -> Result<bool, ValidationError> {
        self.require_step(OnboardingStep::Dietary, "allergens")?;
        self.profile.add_allergen(allergen)
    }

    pub fn remove_allergen(&mut self, allergen: &str) -> Result<bool, ValidationError> {
        self.require_step(OnboardingStep::Dietary, "allergens")?;
        Ok(self.profile.remove_allergen(allergen))
    }

    fn require_step(&self, owner: OnboardingStep, field: &str) -> Result<(), ValidationError> {
        if self.step == owner {
            Ok(())
        } else {
            Err(ValidationError::WrongStep {
                update: field.to_string(),
                step: self.step.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::model::{Gender, WeightGoal};

    fn state_at(step: OnboardingStep) -> OnboardingState {
        OnboardingState {
            step,
            ..Default::default()
        }
    }

    #[test]
    fn next_walks_all_steps() {
        use OnboardingStep::*;
        let expected = [Personal, Dietary, Goals, Timeframe, Budget, Complete];
        let mut current = Welcome;
        for expected_next in expected {
            let next = current.next().unwrap();
            assert_eq!(next, expected_next);
            current = next;
        }
        assert!(current.next().is_none());
    }

    #[test]
    fn previous_is_inverse_of_next() {
        for step in OnboardingStep::ALL {
            if let Some(next) = step.next() {
                assert_eq!(next.previous(), Some(step), "{next} should go back to {step}");
            }
        }
        assert!(OnboardingStep::Welcome.previous().is_none());
    }

    #[test]
    fn is_terminal() {
        assert!(OnboardingStep::Complete.is_terminal());
        assert!(!OnboardingStep::Welcome.is_terminal());
        assert!(!OnboardingStep::Budget.is_terminal());
    }

    #[test]
    fn progress_indicator() {
        assert_eq!(OnboardingStep::total(), 7);
        assert_eq!(OnboardingStep::Welcome.index(), 0);
        assert_eq!(OnboardingStep::Complete.index(), 6);
        assert_eq!(OnboardingStep::Welcome.progress_percent(), 0);
        assert_eq!(OnboardingStep::Goals.progress_percent(), 50);
        assert_eq!(OnboardingStep::Complete.progress_percent(), 100);
    }

    #[test]
    fn display_matches_serde() {
        for step in OnboardingStep::ALL {
            let display = format!("{step}");
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(format!("\"{display}\""), json, "Display and serde should match for {step:?}");
        }
    }

    #[test]
    fn six_advances_reach_complete() {
        let mut state = OnboardingState::default();
        for _ in 0..6 {
            assert!(matches!(state.advance(), Advance::Moved(_)));
        }
        assert_eq!(state.step, OnboardingStep::Complete);
        assert_eq!(state.advance(), Advance::Finish);
        assert_eq!(state.step, OnboardingStep::Complete);
    }

    #[test]
    fn advance_never_skips() {
        for step in OnboardingStep::ALL {
            let mut state = state_at(step);
            match state.advance() {
                Advance::Moved(next) => assert_eq!(next.index(), step.index() + 1),
                Advance::Finish => assert!(step.is_terminal()),
            }
        }
    }

    #[test]
    fn back_at_welcome_is_noop() {
        let mut state = OnboardingState::default();
        assert_eq!(state.back(), OnboardingStep::Welcome);

        let mut state = state_at(OnboardingStep::Complete);
        assert_eq!(state.back(), OnboardingStep::Budget);
    }

    #[test]
    fn apply_on_owning_step() {
        let mut state = state_at(OnboardingStep::Personal);
        state.apply(ProfileUpdate::Name("Dana".into())).unwrap();
        state.apply(ProfileUpdate::Gender(Gender::Other)).unwrap();
        assert_eq!(state.profile.name, "Dana");
        assert_eq!(state.profile.gender, Some(Gender::Other));
    }

    #[test]
    fn apply_on_wrong_step_is_rejected() {
        let mut state = state_at(OnboardingStep::Dietary);
        let err = state
            .apply(ProfileUpdate::WeightGoal(WeightGoal::LoseFat))
            .unwrap_err();
        assert!(matches!(err, ValidationError::WrongStep { .. }));
        assert_eq!(state.profile.weight_goal, WeightGoal::Maintain);
    }

    #[test]
    fn invalid_budget_leaves_profile_untouched() {
        let mut state = state_at(OnboardingStep::Budget);
        assert!(state.apply(ProfileUpdate::Budget(255)).is_err());
        assert_eq!(state.profile.budget, 100);
        state.apply(ProfileUpdate::Budget(180)).unwrap();
        assert_eq!(state.profile.budget, 180);
    }

    #[test]
    fn dietary_edits_require_dietary_step() {
        let mut state = state_at(OnboardingStep::Goals);
        assert!(state.toggle_dietary_restriction(DietaryRestriction::Kosher).is_err());
        assert!(state.add_allergen("soy").is_err());

        let mut state = state_at(OnboardingStep::Dietary);
        assert!(state.toggle_dietary_restriction(DietaryRestriction::Kosher).unwrap());
        assert!(state.add_allergen("soy").unwrap());
        assert!(state.remove_allergen("soy").unwrap());
    }
}
