pub mod bank_link;
pub mod onboarding;
pub mod scopes;

pub use crate::domain::model::{OnboardingOutcome, Operator, Step, StepFailure};
pub use crate::utils::error::Result;
