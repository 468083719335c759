//! # Tutor
//!
//! On-demand explanations for a question's correct answer, sourced from an
//! LLM. The rest of the app only sees [`TutorGateway::explain`], which always
//! returns displayable text.

pub mod gateway;
pub mod provider;
pub mod providers;

pub use gateway::{
    EMPTY_EXPLANATION_MESSAGE, ExplainRequest, MISSING_CREDENTIAL_MESSAGE, SERVICE_ERROR_MESSAGE,
    TutorGateway,
};
pub use provider::{CompletionRequest, TutorError, TutorProvider};
pub use providers::{LmStudioProvider, OpenRouterProvider};
