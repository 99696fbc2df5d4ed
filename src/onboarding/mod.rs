//! Onboarding wizard: first-launch profile collection.
//!
//! A fixed sequence of steps gathers personal data, dietary preferences,
//! goals, plan length and budget into a `UserProfile`. Confirming the
//! summary step persists the profile for the recipe, meal plan and grocery
//! pages.

pub mod manager;
pub mod model;
pub mod routes;
pub mod state;
pub mod update;

pub use manager::{OnboardingManager, OnboardingStatus, WizardTransition};
pub use model::{Exercise, Gender, UserProfile, WeightGoal};
pub use routes::{OnboardingRouteState, onboarding_routes};
pub use state::{Advance, OnboardingState, OnboardingStep};
pub use update::{NumericField, ProfileUpdate};
