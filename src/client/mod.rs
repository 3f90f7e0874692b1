//! Generation client: a single call to the upstream text-generation provider.
//!
//! [`GenerationClient`] is the seam between the retry loop and the network.
//! Implementations make exactly one outbound call per `generate` and never
//! retry internally; the retry loop decides what a failure means.

mod error_classification;
pub mod openai;
pub mod types;

pub use error_classification::classify_status;
pub use openai::OpenAiClient;

use crate::prompt::DirectivePair;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Request one completion and return its raw text.
    ///
    /// An empty completion is an error
    /// ([`GenerationError::EmptyContent`](crate::error::GenerationError::EmptyContent)),
    /// never `Ok("")`.
    async fn generate(
        &self,
        credential: &str,
        model: &str,
        directives: &DirectivePair,
        temperature: f32,
    ) -> Result<String>;

    fn name(&self) -> &'static str;
}
