//! Turns a generation outcome into something the output panel can draw,
//! and handles copying the raw text with a short-lived "copied" flag.

use anyhow::Result;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::events::AppEvent;
use crate::models::GenerationOutcome;

pub const COPIED_FLAG_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub emphasized: bool,
}

impl Segment {
    fn plain(text: String) -> Self {
        Self {
            text,
            emphasized: false,
        }
    }

    fn emphasized(text: String) -> Self {
        Self {
            text,
            emphasized: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub segments: Vec<Segment>,
}

impl StyledLine {
    /// Line text with styling dropped
    #[allow(dead_code)]
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayModel {
    Placeholder,
    Spinner,
    Error(String),
    Content(Vec<StyledLine>),
}

pub fn render(outcome: &GenerationOutcome) -> DisplayModel {
    match outcome {
        GenerationOutcome::Loading => DisplayModel::Spinner,
        GenerationOutcome::Failure(message) => DisplayModel::Error(message.clone()),
        GenerationOutcome::Success(text) if !text.is_empty() => {
            DisplayModel::Content(text.split('\n').map(render_line).collect())
        }
        GenerationOutcome::Success(_) | GenerationOutcome::Idle => DisplayModel::Placeholder,
    }
}

/// Split one line into plain and emphasized runs.
///
/// A run between two single asterisks is emphasized with the asterisks
/// removed. An empty run (`**`) renders as nothing, so `**x**` shows `x`
/// plain. An opening asterisk with no close is kept literally.
fn render_line(line: &str) -> StyledLine {
    let mut segments = Vec::new();
    let mut current_text = String::new();
    let mut rest = line;

    while let Some(open) = rest.find('*') {
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('*') else {
            break;
        };

        current_text.push_str(&rest[..open]);
        let emphasized_text = &after_open[..close];
        if !emphasized_text.is_empty() {
            if !current_text.is_empty() {
                segments.push(Segment::plain(std::mem::take(&mut current_text)));
            }
            segments.push(Segment::emphasized(emphasized_text.to_string()));
        }
        rest = &after_open[close + 1..];
    }
    current_text.push_str(rest);

    if !current_text.is_empty() {
        segments.push(Segment::plain(current_text));
    }

    StyledLine { segments }
}

/// Write-only clipboard
#[cfg_attr(test, mockall::automock)]
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard, opened on first use and kept alive so the contents
/// survive on platforms where the owner must stay around.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()?,
        };
        self.inner.insert(clipboard).set_text(text)?;
        Ok(())
    }
}

/// "Copied" indicator that switches itself off after a delay.
///
/// Each copy cancels the pending reset task and schedules a new one. The
/// sequence number makes an expiry from a superseded task a no-op.
#[derive(Debug)]
pub struct CopyFeedback {
    copied: bool,
    seq: u64,
    duration: Duration,
    timer: Option<JoinHandle<()>>,
}

impl CopyFeedback {
    pub const fn new() -> Self {
        Self::with_duration(COPIED_FLAG_DURATION)
    }

    pub const fn with_duration(duration: Duration) -> Self {
        Self {
            copied: false,
            seq: 0,
            duration,
            timer: None,
        }
    }

    pub const fn is_copied(&self) -> bool {
        self.copied
    }

    pub fn mark_copied(&mut self, event_tx: &UnboundedSender<AppEvent>) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        self.seq += 1;
        self.copied = true;

        let seq = self.seq;
        let duration = self.duration;
        let tx = event_tx.clone();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = tx.send(AppEvent::CopyFeedbackExpired(seq));
        }));
    }

    /// Returns whether the flag was cleared
    pub fn expire(&mut self, seq: u64) -> bool {
        if seq != self.seq || !self.copied {
            return false;
        }
        self.copied = false;
        self.timer = None;
        true
    }
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CopyFeedback {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

/// Copy the raw success text. Returns `Ok(false)` when there is nothing to copy.
pub fn copy_output(
    outcome: &GenerationOutcome,
    clipboard: &mut dyn ClipboardSink,
    feedback: &mut CopyFeedback,
    event_tx: &UnboundedSender<AppEvent>,
) -> Result<bool> {
    let Some(text) = outcome.success_text().filter(|text| !text.is_empty()) else {
        return Ok(false);
    };

    clipboard.set_text(text)?;
    feedback.mark_copied(event_tx);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    fn content(text: &str) -> Vec<StyledLine> {
        match render(&GenerationOutcome::Success(text.to_string())) {
            DisplayModel::Content(lines) => lines,
            other => panic!("expected content, got {other:?}"),
        }
    }

    #[test]
    fn test_loading_is_spinner() {
        assert_eq!(render(&GenerationOutcome::Loading), DisplayModel::Spinner);
    }

    #[test]
    fn test_failure_shows_message() {
        let outcome = GenerationOutcome::Failure("API_KEY environment variable not set.".into());
        assert_eq!(
            render(&outcome),
            DisplayModel::Error("API_KEY environment variable not set.".to_string())
        );
    }

    #[test]
    fn test_idle_and_empty_are_placeholder() {
        assert_eq!(render(&GenerationOutcome::Idle), DisplayModel::Placeholder);
        assert_eq!(
            render(&GenerationOutcome::Success(String::new())),
            DisplayModel::Placeholder
        );
    }

    #[test]
    fn test_single_asterisk_emphasis() {
        let lines = content("This is *bold* text");
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0].segments,
            vec![
                Segment::plain("This is ".to_string()),
                Segment::emphasized("bold".to_string()),
                Segment::plain(" text".to_string()),
            ]
        );
        assert!(!lines[0].plain_text().contains('*'));
    }

    #[test]
    fn test_double_asterisks_are_empty_runs() {
        let lines = content("**Acme x wild** launched");
        assert_eq!(
            lines[0].segments,
            vec![Segment::plain("Acme x wild launched".to_string())]
        );
    }

    #[test]
    fn test_emphasis_is_lazy() {
        let lines = content("*a*b*c*");
        assert_eq!(
            lines[0].segments,
            vec![
                Segment::emphasized("a".to_string()),
                Segment::plain("b".to_string()),
                Segment::emphasized("c".to_string()),
            ]
        );
    }

    #[test]
    fn test_splits_on_newlines() {
        let lines = content("*Title*\n\nBody line");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].segments.is_empty());
        assert_eq!(lines[2].plain_text(), "Body line");
    }

    #[test]
    fn test_unclosed_asterisk_is_literal() {
        let lines = content("5 * 3 equals fifteen");
        assert_eq!(lines[0].segments, vec![Segment::plain("5 * 3 equals fifteen".to_string())]);
    }

    #[test]
    fn test_multiple_spans_per_line() {
        let lines = content("*a* and *b*");
        let emphasized: Vec<&str> = lines[0]
            .segments
            .iter()
            .filter(|s| s.emphasized)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(emphasized, vec!["a", "b"]);
        assert_eq!(lines[0].plain_text(), "a and b");
    }

    #[test]
    fn test_plain_text_untouched() {
        let lines = content("  launched in 2023, with [Client Name]  ");
        assert_eq!(lines[0].plain_text(), "  launched in 2023, with [Client Name]  ");
    }

    #[tokio::test]
    async fn test_copy_writes_raw_text() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut clipboard = MockClipboardSink::new();
        clipboard
            .expect_set_text()
            .with(eq("*Acme* launch"))
            .times(1)
            .returning(|_| Ok(()));
        let mut feedback = CopyFeedback::new();

        let outcome = GenerationOutcome::Success("*Acme* launch".to_string());
        assert!(copy_output(&outcome, &mut clipboard, &mut feedback, &tx).unwrap());
        assert!(feedback.is_copied());
    }

    #[tokio::test]
    async fn test_copy_without_output_is_noop() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut clipboard = MockClipboardSink::new();
        clipboard.expect_set_text().times(0);
        let mut feedback = CopyFeedback::new();

        for outcome in [
            GenerationOutcome::Idle,
            GenerationOutcome::Loading,
            GenerationOutcome::Failure("nope".to_string()),
        ] {
            assert!(!copy_output(&outcome, &mut clipboard, &mut feedback, &tx).unwrap());
        }
        assert!(!feedback.is_copied());
    }

    #[tokio::test]
    async fn test_clipboard_error_leaves_flag_down() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut clipboard = MockClipboardSink::new();
        clipboard
            .expect_set_text()
            .returning(|_| Err(anyhow::anyhow!("no display")));
        let mut feedback = CopyFeedback::new();

        let outcome = GenerationOutcome::Success("text".to_string());
        assert!(copy_output(&outcome, &mut clipboard, &mut feedback, &tx).is_err());
        assert!(!feedback.is_copied());
    }

    #[tokio::test(start_paused = true)]
    async fn test_copied_flag_reverts_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut feedback = CopyFeedback::new();
        let start = Instant::now();

        feedback.mark_copied(&tx);
        assert!(feedback.is_copied());

        let Some(AppEvent::CopyFeedbackExpired(seq)) = rx.recv().await else {
            panic!("expected expiry event");
        };
        assert!(start.elapsed() >= COPIED_FLAG_DURATION);
        assert!(feedback.expire(seq));
        assert!(!feedback.is_copied());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recopy_restarts_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut feedback = CopyFeedback::new();
        let start = Instant::now();

        feedback.mark_copied(&tx);
        tokio::time::sleep(Duration::from_secs(1)).await;
        feedback.mark_copied(&tx);

        let Some(AppEvent::CopyFeedbackExpired(seq)) = rx.recv().await else {
            panic!("expected expiry event");
        };
        assert!(start.elapsed() >= Duration::from_secs(3));
        assert_eq!(seq, 2);
        assert!(feedback.expire(seq));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_stale_expiry_ignored() {
        let mut feedback = CopyFeedback::new();
        feedback.copied = true;
        feedback.seq = 3;
        assert!(!feedback.expire(2));
        assert!(feedback.is_copied());
        assert!(feedback.expire(3));
    }
}
