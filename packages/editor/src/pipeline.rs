//! # Validation Pipeline
//!
//! Debounces validation of the document text.
//!
//! The scheduler manages:
//! - One pending timer; each `schedule` call replaces it
//! - Validation runs on the blocking pool, detached from the timer
//! - Delivery of results over a channel, newest last
//!
//! A run that has started is never cancelled by a later `schedule`; its
//! result still arrives and the session keeps whichever result it applies
//! last. Without a Tokio runtime, `schedule` validates on the spot.

use apistudio_linter::{validate_with, RuleRegistry, ValidationResult};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default quiet window before a validation run
pub const DEFAULT_VALIDATION_DELAY: Duration = Duration::from_millis(300);

/// Function that validates document text
pub type Validator = Arc<dyn Fn(&str) -> ValidationResult + Send + Sync>;

/// Validator running the built-in rules minus the named ones
pub fn rule_validator(disabled_rules: Vec<String>) -> Validator {
    Arc::new(move |text: &str| {
        let mut registry = RuleRegistry::new();
        registry.disable(disabled_rules.as_slice());
        validate_with(text, &registry)
    })
}

/// Debounced validation runner
pub struct ValidationScheduler {
    delay: Duration,
    validator: Validator,
    pending: Option<JoinHandle<()>>,
    results_tx: UnboundedSender<ValidationResult>,
    results_rx: UnboundedReceiver<ValidationResult>,
}

impl ValidationScheduler {
    /// Scheduler running every built-in rule
    pub fn new(delay: Duration) -> Self {
        Self::with_validator(delay, rule_validator(Vec::new()))
    }

    pub fn with_validator(delay: Duration, validator: Validator) -> Self {
        let (results_tx, results_rx) = unbounded_channel();
        Self {
            delay,
            validator,
            pending: None,
            results_tx,
            results_rx,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Validate `text` once the quiet window elapses, replacing any pending run
    pub fn schedule(&mut self, text: String) {
        self.cancel();

        let Ok(runtime) = Handle::try_current() else {
            debug!("no runtime, validating synchronously");
            let result = catch_unwind(AssertUnwindSafe(|| (self.validator)(&text)))
                .unwrap_or_else(|panic| validator_failed(panic_message(&*panic)));
            let _ = self.results_tx.send(result);
            return;
        };

        let delay = self.delay;
        let validator = Arc::clone(&self.validator);
        let results_tx = self.results_tx.clone();
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached: aborting the timer from here on leaves the run alone
            tokio::spawn(run(validator, text, results_tx));
        }));
    }

    /// Drop the pending timer, if any
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    /// Whether a timer is still waiting to fire
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.is_finished())
    }

    /// Drain delivered results, keeping the newest
    pub fn try_latest(&mut self) -> Option<ValidationResult> {
        let mut latest = None;
        while let Ok(result) = self.results_rx.try_recv() {
            latest = Some(result);
        }
        latest
    }

    /// Wait for the next delivered result.
    ///
    /// Never resolves if nothing has been scheduled.
    pub async fn next(&mut self) -> Option<ValidationResult> {
        self.results_rx.recv().await
    }
}

impl Drop for ValidationScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for ValidationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationScheduler")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

async fn run(validator: Validator, text: String, results_tx: UnboundedSender<ValidationResult>) {
    let result = match tokio::task::spawn_blocking(move || validator(&text)).await {
        Ok(result) => result,
        Err(err) if err.is_panic() => validator_failed(panic_message(&*err.into_panic())),
        Err(err) => validator_failed(err.to_string()),
    };
    debug!(diagnostics = result.errors.len(), "validation finished");
    // The session may be gone
    let _ = results_tx.send(result);
}

fn validator_failed(reason: String) -> ValidationResult {
    warn!(%reason, "validator failed");
    ValidationResult::failure(format!("Validation failed: {reason}"))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "validator panicked".to_string()
    }
}
