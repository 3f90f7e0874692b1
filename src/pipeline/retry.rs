//! Retry orchestration for quote generation.
//!
//! Every attempt resends the identical directive pair with no delay in
//! between; a non-zero temperature is what makes the next completion differ.
//! Provider failures, undecodable text, schema violations and quality gate
//! rejections all count toward the same attempt bound.

use crate::client::GenerationClient;
use crate::error::GenerationError;
use crate::prompt::DirectivePair;
use crate::quality::QualityGate;
use crate::structured::{decode, QuoteSchema};
use crate::types::QuoteItem;
use crate::{Error, Result};
use std::sync::Arc;

/// Default attempt bound.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Decides whether a failed attempt is followed by another one.
pub trait RetryStrategy: Send + Sync {
    /// Upper bound on attempts, the first one included.
    fn max_attempts(&self) -> u32;

    /// Called after attempt number `attempt` (1-based) failed with `failure`.
    fn should_retry(&self, attempt: u32, failure: &GenerationError) -> bool;
}

/// Fixed-bound retry policy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// When false, a failed provider call ends the run instead of being
    /// retried. Bad output is always retried.
    pub retry_provider_errors: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_provider_errors: true,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    pub fn with_retry_provider_errors(mut self, enabled: bool) -> Self {
        self.retry_provider_errors = enabled;
        self
    }
}

impl RetryStrategy for RetryPolicy {
    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn should_retry(&self, attempt: u32, failure: &GenerationError) -> bool {
        if attempt >= self.max_attempts {
            return false;
        }
        match failure {
            GenerationError::Provider(_)
            | GenerationError::Upstream { .. }
            | GenerationError::Unauthorized { .. } => {
                self.retry_provider_errors
            }
            _ => true,
        }
    }
}

/// State of one orchestrated run.
#[derive(Debug, Clone)]
pub enum AttemptState {
    /// `attempt` attempts have failed so far.
    Attempting { attempt: u32 },
    Succeeded(Vec<QuoteItem>),
    Exhausted {
        attempts: u32,
        last_error: Option<GenerationError>,
    },
}

impl AttemptState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AttemptState::Attempting { .. })
    }

    /// Convert a terminal state into the items or the terminal error.
    pub fn into_result(self) -> Result<Vec<QuoteItem>> {
        match self {
            AttemptState::Succeeded(items) => Ok(items),
            AttemptState::Exhausted {
                attempts,
                last_error,
            } => Err(Error::ExhaustedRetries {
                attempts,
                last: last_error,
            }),
            AttemptState::Attempting { attempt } => Err(Error::runtime_with_context(
                "generation run ended before reaching a terminal state",
                crate::ErrorContext::new()
                    .with_details(format!("attempt {}", attempt))
                    .with_source("retry_orchestrator"),
            )),
        }
    }
}

/// Runs generation attempts until one passes decode, schema and quality gate.
pub struct RetryOrchestrator {
    client: Arc<dyn GenerationClient>,
    strategy: Arc<dyn RetryStrategy>,
    schema: QuoteSchema,
    gate: QualityGate,
    model: String,
    temperature: f32,
}

impl RetryOrchestrator {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        strategy: Arc<dyn RetryStrategy>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            client,
            strategy,
            schema: QuoteSchema::new(),
            gate: QualityGate::new(),
            model: model.into(),
            temperature,
        }
    }

    /// Drive the state machine to a terminal state.
    pub async fn run(
        &self,
        credential: &str,
        directives: &DirectivePair,
        requested: usize,
    ) -> AttemptState {
        if self.strategy.max_attempts() == 0 {
            return AttemptState::Exhausted {
                attempts: 0,
                last_error: None,
            };
        }

        let mut state = AttemptState::Attempting { attempt: 0 };
        while let AttemptState::Attempting { attempt: failed } = state {
            let attempt = failed + 1;
            state = match self.attempt(credential, directives, requested).await {
                Ok(items) => {
                    tracing::debug!(attempt, count = items.len(), "generation attempt accepted");
                    AttemptState::Succeeded(items)
                }
                Err(failure) => {
                    tracing::warn!(
                        attempt,
                        kind = failure.kind(),
                        error = %failure,
                        "generation attempt rejected"
                    );
                    if self.strategy.should_retry(attempt, &failure) {
                        AttemptState::Attempting { attempt }
                    } else {
                        AttemptState::Exhausted {
                            attempts: attempt,
                            last_error: Some(failure),
                        }
                    }
                }
            };
        }

        if let AttemptState::Exhausted { attempts, .. } = &state {
            tracing::error!(attempts, "generation exhausted its attempts");
        }
        state
    }

    async fn attempt(
        &self,
        credential: &str,
        directives: &DirectivePair,
        requested: usize,
    ) -> std::result::Result<Vec<QuoteItem>, GenerationError> {
        let raw = self
            .client
            .generate(credential, &self.model, directives, self.temperature)
            .await
            .map_err(Error::into_generation_error)?;

        if raw.trim().is_empty() {
            return Err(GenerationError::EmptyContent);
        }

        let value = decode(&raw)?;
        let items = self.schema.validate(&value)?;

        let issues = self.gate.inspect(&items, requested);
        if !issues.is_empty() {
            return Err(GenerationError::QualityGate(issues));
        }
        Ok(items)
    }
}
