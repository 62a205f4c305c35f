//! Submit → prompt → generation → outcome.
//!
//! Every submit bumps a request generation counter. Only the result tagged
//! with the latest generation may change the outcome, so a newer submit
//! always supersedes one still in flight.

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::api::TextGenerator;
use crate::error::GenerationError;
use crate::events::AppEvent;
use crate::models::{FormInput, GenerationOutcome, GenerationRequest, TemplateOption};
use crate::prompt::build_request;
use crate::templates::TEMPLATE_OPTIONS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingGeneration {
    pub id: u64,
    pub request: GenerationRequest,
}

#[derive(Debug)]
pub struct Orchestrator {
    outcome: GenerationOutcome,
    latest: u64,
    catalog: &'static [TemplateOption],
}

impl Orchestrator {
    pub const fn new() -> Self {
        Self::with_catalog(TEMPLATE_OPTIONS)
    }

    pub const fn with_catalog(catalog: &'static [TemplateOption]) -> Self {
        Self {
            outcome: GenerationOutcome::Idle,
            latest: 0,
            catalog,
        }
    }

    pub const fn outcome(&self) -> &GenerationOutcome {
        &self.outcome
    }

    /// Enter Loading and build the request.
    ///
    /// Returns `None` when the prompt can't be built; the outcome is then
    /// already a failure.
    pub fn begin(&mut self, input: &FormInput) -> Option<PendingGeneration> {
        self.latest += 1;
        self.outcome = GenerationOutcome::Loading;

        tracing::info!(
            id = self.latest,
            template = %input.selected_template,
            "starting generation"
        );

        match build_request(input, self.catalog) {
            Ok(request) => Some(PendingGeneration {
                id: self.latest,
                request,
            }),
            Err(err) => {
                self.resolve(self.latest, Err(err));
                None
            }
        }
    }

    /// Apply a result. Stale generations are dropped; returns whether it applied.
    pub fn resolve(&mut self, id: u64, result: Result<String, GenerationError>) -> bool {
        if id != self.latest {
            tracing::warn!(id, latest = self.latest, "discarding superseded generation result");
            return false;
        }

        self.outcome = match result {
            Ok(text) => {
                tracing::info!(id, chars = text.len(), "generation succeeded");
                GenerationOutcome::Success(text)
            }
            Err(err) => {
                tracing::warn!(id, error = %err, "generation failed");
                GenerationOutcome::Failure(err.user_message())
            }
        };
        true
    }

    /// Run the whole round trip inline
    #[allow(dead_code)]
    pub async fn generate(
        &mut self,
        input: &FormInput,
        client: &dyn TextGenerator,
    ) -> &GenerationOutcome {
        if let Some(pending) = self.begin(input) {
            let result = client.generate(&pending.request).await;
            self.resolve(pending.id, result);
        }
        &self.outcome
    }

    /// Start a generation on a background task; the result comes back as
    /// `AppEvent::GenerationFinished`.
    pub fn spawn(
        &mut self,
        input: &FormInput,
        client: Arc<dyn TextGenerator>,
        event_tx: &UnboundedSender<AppEvent>,
    ) -> Option<JoinHandle<()>> {
        let PendingGeneration { id, request } = self.begin(input)?;
        let tx = event_tx.clone();

        Some(tokio::spawn(async move {
            let result = client.generate(&request).await;
            let _ = tx.send(AppEvent::GenerationFinished { id, result });
        }))
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}
