//! # Generation Pipeline
//!
//! Turns a directive pair into a validated quote list:
//!
//! ```text
//! DirectivePair → GenerationClient → decode → QuoteSchema → QualityGate
//!                       ↑                                        │
//!                       └──────── RetryStrategy (no delay) ──────┘
//! ```
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`RetryOrchestrator`] | Drives attempts until success or exhaustion |
//! | [`RetryStrategy`] | Decides whether a failed attempt is retried |
//! | [`RetryPolicy`] | Default strategy: fixed attempt bound |
//! | [`AttemptState`] | `Attempting` / `Succeeded` / `Exhausted` |

pub mod retry;

pub use retry::{
    AttemptState, RetryOrchestrator, RetryPolicy, RetryStrategy, DEFAULT_MAX_ATTEMPTS,
};
