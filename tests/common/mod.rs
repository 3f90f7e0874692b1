//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use quotegen::client::GenerationClient;
use quotegen::prompt::DirectivePair;
use quotegen::{Error, Result, ServiceConfig};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

const AUTHORS: [&str; 10] = [
    "Ada Lovelace",
    "Grace Hopper",
    "Alan Kay",
    "Margaret Hamilton",
    "Linus Torvalds",
    "Barbara Liskov",
    "Donald Knuth",
    "Radia Perlman",
    "Ken Thompson",
    "Frances Allen",
];

/// Provider answer with `n` distinct, schema-valid quotes.
pub fn quotes_json(n: usize) -> String {
    let quotes: Vec<_> = AUTHORS
        .iter()
        .cycle()
        .take(n)
        .enumerate()
        .map(|(i, author)| {
            json!({
                "author": author,
                "quote": format!("Keep building things that matter, lesson number {}.", i + 1),
            })
        })
        .collect();
    json!({ "quotes": quotes }).to_string()
}

/// Generation client that replays a script and counts calls.
///
/// Once the script runs out the last entry is repeated.
pub struct StubClient {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    last: Mutex<Option<std::result::Result<String, String>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    directives: Mutex<Vec<String>>,
}

impl StubClient {
    pub fn new(script: Vec<std::result::Result<String, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            delay: None,
            calls: AtomicUsize::new(0),
            directives: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with `n` valid quotes.
    pub fn valid(n: usize) -> Self {
        Self::new(vec![Ok(quotes_json(n))])
    }

    /// Always answers with text that is not JSON.
    pub fn garbage() -> Self {
        Self::new(vec![Ok("Here are your quotes!".to_string())])
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// User directives seen so far, in call order.
    pub fn user_directives(&self) -> Vec<String> {
        self.directives.lock().unwrap().clone()
    }

    fn next(&self) -> std::result::Result<String, String> {
        let mut script = self.script.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        match script.pop_front() {
            Some(outcome) => {
                *last = Some(outcome.clone());
                outcome
            }
            None => last.clone().unwrap_or_else(|| Err("empty script".to_string())),
        }
    }
}

#[async_trait]
impl GenerationClient for StubClient {
    async fn generate(
        &self,
        credential: &str,
        _model: &str,
        directives: &DirectivePair,
        _temperature: f32,
    ) -> Result<String> {
        assert!(!credential.is_empty());
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.directives.lock().unwrap().push(directives.user.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.next().map_err(|message| Error::Remote {
            status: 500,
            class: "server_error".to_string(),
            message,
            retryable: true,
        })
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Client whose every call panics.
pub struct PanickingClient;

#[async_trait]
impl GenerationClient for PanickingClient {
    async fn generate(&self, _: &str, _: &str, _: &DirectivePair, _: f32) -> Result<String> {
        panic!("provider client exploded")
    }

    fn name(&self) -> &'static str {
        "panicking"
    }
}

pub fn config() -> ServiceConfig {
    ServiceConfig::default()
}
