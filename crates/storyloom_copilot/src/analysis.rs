//! Debounced narrative analysis.
//!
//! [`AnalysisScheduler`] re-runs analysis only after the script has been
//! quiet for a while: each [`schedule`](AnalysisScheduler::schedule) call
//! aborts the previous pending task and starts a fresh timer. Results are
//! published on a `watch` channel so any number of views can follow the
//! latest report.

use crate::extraction::parse_reply_json;
use crate::prompts;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storyloom_core::{GenerateRequest, NarrativeAnalysis};
use storyloom_error::{AgentProtocolError, AgentProtocolErrorKind, StoryloomResult};
use storyloom_interface::{NarrativeAnalyzer, TextDriver};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

/// [`NarrativeAnalyzer`] that asks a model for a structured report.
#[derive(Debug, Clone)]
pub struct ModelAnalyzer<D: TextDriver> {
    driver: D,
    model: Option<String>,
}

impl<D: TextDriver> ModelAnalyzer<D> {
    /// Analyzer using the driver's default model.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            model: None,
        }
    }

    /// Request a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

#[async_trait]
impl<D: TextDriver> NarrativeAnalyzer for ModelAnalyzer<D> {
    #[instrument(
        name = "narrative_analyze",
        skip_all,
        fields(provider = self.driver.provider_name(), script_len = script.len())
    )]
    async fn analyze(&self, script: &str) -> StoryloomResult<NarrativeAnalysis> {
        if script.trim().is_empty() {
            debug!("Blank script; skipping model call");
            return Ok(NarrativeAnalysis::default());
        }

        let mut builder = GenerateRequest::builder();
        builder
            .system_instruction(prompts::ANALYSIS_INSTRUCTION)
            .message(prompts::analysis_message(script))
            .response_schema(prompts::analysis_schema());
        if let Some(model) = &self.model {
            builder.model(model.clone());
        }
        let request = builder.build()?;

        let response = self.driver.generate(&request).await?;
        let value = parse_reply_json(&response.text)?;
        let analysis = serde_json::from_value(value).map_err(|e| {
            AgentProtocolError::new(AgentProtocolErrorKind::SchemaMismatch(e.to_string()))
        })?;
        Ok(analysis)
    }
}

/// Latest state of the debounced analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnalysisStatus {
    /// Nothing scheduled yet
    #[default]
    Idle,
    /// Waiting out the quiet period or running
    Pending,
    /// Most recent report
    Ready(NarrativeAnalysis),
    /// Most recent run failed; the message is for display
    Failed(String),
}

/// Cancellable, debounced analysis task.
///
/// Must be used from within a tokio runtime. Dropping the scheduler aborts
/// any pending run.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use storyloom_copilot::{AnalysisScheduler, AnalysisStatus, ModelAnalyzer};
/// use storyloom_models::GeminiClient;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let scheduler = AnalysisScheduler::new(
///     ModelAnalyzer::new(GeminiClient::new()?),
///     Duration::from_secs(2),
/// );
/// let mut status = scheduler.subscribe();
///
/// scheduler.schedule("INT. LIGHTHOUSE - NIGHT\nThe lamp fails.");
/// status.changed().await?;
/// # Ok(())
/// # }
/// ```
pub struct AnalysisScheduler {
    analyzer: Arc<dyn NarrativeAnalyzer>,
    quiet_period: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
    generation: Arc<AtomicU64>,
    status: Arc<watch::Sender<AnalysisStatus>>,
}

impl std::fmt::Debug for AnalysisScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisScheduler")
            .field("quiet_period", &self.quiet_period)
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl AnalysisScheduler {
    /// Scheduler running `analyzer` after `quiet_period` of inactivity.
    pub fn new(analyzer: impl NarrativeAnalyzer + 'static, quiet_period: Duration) -> Self {
        let (status, _) = watch::channel(AnalysisStatus::Idle);
        Self {
            analyzer: Arc::new(analyzer),
            quiet_period,
            pending: Mutex::new(None),
            generation: Arc::new(AtomicU64::new(0)),
            status: Arc::new(status),
        }
    }

    /// Quiet period.
    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Follow status changes.
    pub fn subscribe(&self) -> watch::Receiver<AnalysisStatus> {
        self.status.subscribe()
    }

    /// Current status.
    pub fn status(&self) -> AnalysisStatus {
        self.status.borrow().clone()
    }

    /// Restart the quiet-period timer for `script`.
    ///
    /// The previously scheduled run is aborted. If it already reached the
    /// analyzer, its result is dropped unpublished.
    pub fn schedule(&self, script: impl Into<String>) {
        let script = script.into();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let analyzer = Arc::clone(&self.analyzer);
        let status = Arc::clone(&self.status);
        let current = Arc::clone(&self.generation);
        let quiet_period = self.quiet_period;

        let mut pending = self.lock_pending();
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        status.send_replace(AnalysisStatus::Pending);
        debug!(generation, quiet_ms = quiet_period.as_millis() as u64, "Analysis scheduled");

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            let outcome = analyzer.analyze(&script).await;

            if current.load(Ordering::SeqCst) != generation {
                debug!(generation, "Stale analysis dropped");
                return;
            }

            match outcome {
                Ok(analysis) => {
                    status.send_replace(AnalysisStatus::Ready(analysis));
                }
                Err(err) => {
                    warn!(error = %err, "Narrative analysis failed");
                    status.send_replace(AnalysisStatus::Failed(err.to_string()));
                }
            }
        }));
    }

    /// Abort the pending run, if any. A `Pending` status falls back to `Idle`;
    /// a published report or failure is left in place.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(previous) = self.lock_pending().take() {
            previous.abort();
            debug!("Pending analysis cancelled");
        }
        self.status.send_if_modified(|status| {
            if *status == AnalysisStatus::Pending {
                *status = AnalysisStatus::Idle;
                true
            } else {
                false
            }
        });
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for AnalysisScheduler {
    fn drop(&mut self) {
        if let Some(pending) = self.lock_pending().take() {
            pending.abort();
        }
    }
}
