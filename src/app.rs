use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::api::TextGenerator;
use crate::events::AppEvent;
use crate::form::FormState;
use crate::models::GenerationOutcome;
use crate::orchestrator::Orchestrator;
use crate::presenter::{self, ClipboardSink, CopyFeedback};

#[derive(Debug)]
pub struct App {
    pub should_quit: bool,
    pub show_help: bool,
    pub exit_pending: bool,
    pub current_model: String,
    pub form: FormState,
    pub orchestrator: Orchestrator,
    pub copy_feedback: CopyFeedback,
    /// One-line notice for the bottom bar, e.g. a clipboard failure
    pub notice: Option<String>,
    /// Advances once per event loop iteration; drives the spinner
    pub tick: usize,
    /// First visible line of the output panel. Clamped while rendering.
    pub output_scroll: usize,
    generation_task: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(current_model: String) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            exit_pending: false,
            current_model,
            form: FormState::new(),
            orchestrator: Orchestrator::new(),
            copy_feedback: CopyFeedback::new(),
            notice: None,
            tick: 0,
            output_scroll: 0,
            generation_task: None,
        }
    }

    pub const fn quit(&mut self) {
        self.should_quit = true;
    }

    pub const fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub const fn scroll_up(&mut self, amount: usize) {
        self.output_scroll = self.output_scroll.saturating_sub(amount);
    }

    pub const fn scroll_down(&mut self, amount: usize) {
        self.output_scroll = self.output_scroll.saturating_add(amount);
    }

    pub const fn scroll_to_top(&mut self) {
        self.output_scroll = 0;
    }

    /// The output panel clamps this to the last page
    pub const fn scroll_to_bottom(&mut self) {
        self.output_scroll = usize::MAX;
    }

    pub const fn outcome(&self) -> &GenerationOutcome {
        self.orchestrator.outcome()
    }

    pub const fn is_loading(&self) -> bool {
        self.outcome().is_loading()
    }

    /// Submit the form. A generation still in flight is aborted and its
    /// result, should it arrive anyway, is discarded by the orchestrator.
    pub fn submit(
        &mut self,
        client: Arc<dyn TextGenerator>,
        event_tx: &UnboundedSender<AppEvent>,
    ) -> bool {
        let Some(input) = self.form.submit() else {
            return false;
        };

        if let Some(task) = self.generation_task.take() {
            tracing::info!("superseding in-flight generation");
            task.abort();
        }

        self.notice = None;
        self.scroll_to_top();
        self.generation_task = self.orchestrator.spawn(&input, client, event_tx);
        true
    }

    pub fn copy_output(
        &mut self,
        clipboard: &mut dyn ClipboardSink,
        event_tx: &UnboundedSender<AppEvent>,
    ) {
        match presenter::copy_output(
            self.orchestrator.outcome(),
            clipboard,
            &mut self.copy_feedback,
            event_tx,
        ) {
            Ok(_) => self.notice = None,
            Err(err) => {
                tracing::error!(error = ?err, "failed to copy to clipboard");
                self.notice = Some(format!("Copy failed: {err}"));
            }
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::GenerationFinished { id, result } => {
                if self.orchestrator.resolve(id, result) {
                    self.generation_task = None;
                }
            }
            AppEvent::CopyFeedbackExpired(seq) => {
                self.copy_feedback.expire(seq);
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new("gemini-2.5-flash".to_string())
    }
}
