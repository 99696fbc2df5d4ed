//! OnboardingManager: coordinates wizard state, field edits and the final
//! profile hand-off to storage.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::catalog::DietaryRestriction;
use crate::error::{Result, ValidationError};
use crate::store::{Database, load_json, save_json, settings_keys};

use super::model::UserProfile;
use super::state::{Advance, OnboardingState, OnboardingStep};
use super::update::ProfileUpdate;

/// Result of a forward transition.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardTransition {
    /// Moved to a new step.
    Moved(OnboardingStep),
    /// The summary was confirmed and the profile has been persisted.
    Finished(UserProfile),
}

/// Drives the onboarding wizard for the single local user.
///
/// Mid-wizard edits live only in memory. Nothing is written until the
/// summary step is confirmed, and the in-memory profile is only marked
/// finished once that write succeeds.
pub struct OnboardingManager {
    db: Arc<dyn Database>,
    state: RwLock<OnboardingState>,
}

impl OnboardingManager {
    /// Start a fresh wizard with a default profile.
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self {
            db,
            state: RwLock::new(OnboardingState::default()),
        }
    }

    /// Start the wizard over a previously saved profile, if there is one.
    pub async fn resume(db: Arc<dyn Database>) -> Result<Self> {
        let saved: Option<UserProfile> = load_json(
            db.as_ref(),
            settings_keys::DEFAULT_USER,
            settings_keys::USER_PROFILE,
        )
        .await?;

        let state = match saved {
            Some(profile) => {
                info!(profile_id = %profile.id, "Resuming onboarding with saved profile");
                OnboardingState::editing(profile)
            }
            None => OnboardingState::default(),
        };

        Ok(Self {
            db,
            state: RwLock::new(state),
        })
    }

    pub async fn current_step(&self) -> OnboardingStep {
        self.state.read().await.step
    }

    /// Snapshot of the profile being edited.
    pub async fn profile(&self) -> UserProfile {
        self.state.read().await.profile.clone()
    }

    /// Advance the wizard. On the summary step this finalizes and persists
    /// the profile, then leaves the wizard: the step resets to `Welcome`
    /// over the saved profile.
    pub async fn next(&self) -> Result<WizardTransition> {
        let mut state = self.state.write().await;
        let mut draft = state.clone();

        match draft.advance() {
            Advance::Moved(step) => {
                *state = draft;
                debug!(%step, "Onboarding advanced");
                Ok(WizardTransition::Moved(step))
            }
            Advance::Finish => {
                draft.profile.onboarding_completed = true;
                draft.profile.onboarding_completed_at = Some(chrono::Utc::now());

                save_json(
                    self.db.as_ref(),
                    settings_keys::DEFAULT_USER,
                    settings_keys::USER_PROFILE,
                    &draft.profile,
                )
                .await?;

                info!(profile_id = %draft.profile.id, "Onboarding complete, profile saved");
                let profile = draft.profile.clone();
                // Leave the wizard; re-entering starts from Welcome, as on resume.
                *state = OnboardingState::editing(draft.profile);
                Ok(WizardTransition::Finished(profile))
            }
        }
    }

    /// Step back. No-op on the first step.
    pub async fn back(&self) -> OnboardingStep {
        let step = self.state.write().await.back();
        debug!(%step, "Onboarding went back");
        step
    }

    pub async fn apply(&self, update: ProfileUpdate) -> std::result::Result<(), ValidationError> {
        let field = update.field_name();
        self.state.write().await.apply(update)?;
        debug!(field, "Profile field updated");
        Ok(())
    }

    pub async fn toggle_dietary_restriction(
        &self,
        tag: DietaryRestriction,
    ) -> std::result::Result<bool, ValidationError> {
        self.state.write().await.toggle_dietary_restriction(tag)
    }

    pub async fn add_allergen(&self, allergen: &str) -> std::result::Result<bool, ValidationError> {
        self.state.write().await.add_allergen(allergen)
    }

    pub async fn remove_allergen(
        &self,
        allergen: &str,
    ) -> std::result::Result<bool, ValidationError> {
        self.state.write().await.remove_allergen(allergen)
    }

    /// The profile as last saved, if onboarding was ever finished.
    pub async fn finalized_profile(&self) -> Result<Option<UserProfile>> {
        let saved: Option<UserProfile> = load_json(
            self.db.as_ref(),
            settings_keys::DEFAULT_USER,
            settings_keys::USER_PROFILE,
        )
        .await?;
        Ok(saved.filter(|p| p.onboarding_completed))
    }

    /// Get the current onboarding status (for REST endpoint).
    pub async fn status(&self) -> OnboardingStatus {
        let state = self.state.read().await;
        OnboardingStatus {
            step: state.step,
            label: state.step.label(),
            step_index: state.step.index(),
            total_steps: OnboardingStep::total(),
            progress_percent: state.step.progress_percent(),
            onboarding_completed: state.profile.onboarding_completed,
            plan_days: state.profile.plan_length(),
            profile: state.profile.clone(),
        }
    }
}

/// Onboarding status returned by the REST endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingStatus {
    pub step: OnboardingStep,
    pub label: &'static str,
    pub step_index: usize,
    pub total_steps: usize,
    pub progress_percent: u8,
    pub onboarding_completed: bool,
    /// Length of the meal plan calendar in days.
    pub plan_days: u32,
    pub profile: UserProfile,
}
