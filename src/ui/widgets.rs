use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::form::{Focus, TagList, TextField};
use crate::presenter::{self, DisplayModel, StyledLine};
use crate::templates::TEMPLATE_OPTIONS;

const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let header = Line::from(vec![
        Span::styled(
            "wild",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(".", Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
        Span::styled(" Brand Content Generator", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  ({})", app.current_model),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(header), area);
}

fn label_line(label: &str, focused: bool) -> Line<'static> {
    let (marker, style) = if focused {
        ("▸ ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    } else {
        ("  ", Style::default().add_modifier(Modifier::BOLD))
    };
    Line::from(Span::styled(format!("{marker}{label}"), style))
}

fn placeholder_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("    {text}"),
        Style::default().fg(Color::DarkGray),
    ))
}

fn push_text_field(lines: &mut Vec<Line<'static>>, app: &App, field: TextField) {
    let focused = app.form.focus() == Focus::Text(field);
    lines.push(label_line(field.label(), focused));

    let value = app.form.field(field);
    if value.is_empty() {
        lines.push(placeholder_line(field.placeholder()));
    } else {
        let style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        for line in value.split('\n') {
            lines.push(Line::from(Span::styled(format!("    {line}"), style)));
        }
    }
    lines.push(Line::from(""));
}

fn push_tag_field(
    lines: &mut Vec<Line<'static>>,
    label: &str,
    draft_placeholder: &str,
    tags: &TagList,
    focused: bool,
) {
    lines.push(label_line(label, focused));

    let mut spans = vec![Span::raw("    ")];
    if tags.is_empty() {
        spans.push(Span::styled("(none)", Style::default().fg(Color::DarkGray)));
    }
    for (index, tag) in tags.tags().iter().enumerate() {
        let style = if focused && tags.cursor() == Some(index) {
            Style::default().fg(Color::Black).bg(Color::Magenta)
        } else {
            Style::default().fg(Color::Magenta)
        };
        spans.push(Span::styled(format!("[{tag}]"), style));
        spans.push(Span::raw(" "));
    }
    lines.push(Line::from(spans));

    if tags.draft.is_empty() {
        lines.push(placeholder_line(draft_placeholder));
    } else {
        lines.push(Line::from(Span::styled(
            format!("    + {}", tags.draft),
            Style::default().fg(Color::Cyan),
        )));
    }
    lines.push(Line::from(""));
}

fn push_template_field(lines: &mut Vec<Line<'static>>, app: &App) {
    let focused = app.form.focus() == Focus::Template;
    lines.push(label_line("Select Template", focused));

    for option in TEMPLATE_OPTIONS {
        let selected = option.id == app.form.selected_template();
        let (marker, style) = if selected {
            ("(•)", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        } else {
            ("( )", Style::default())
        };
        lines.push(Line::from(vec![
            Span::styled(format!("    {marker} {:<22}", option.label), style),
            Span::styled(
                format!("{} words", option.word_count),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }
    lines.push(Line::from(""));
}

/// Rows taken by `lines` once wrapped to `width` columns
fn visual_height(lines: &[Line], width: usize) -> usize {
    let width = width.max(1);
    lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum()
}

fn scroll_offset(offset: usize) -> (u16, u16) {
    (u16::try_from(offset).unwrap_or(u16::MAX), 0)
}

pub fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    // End of the focused field; the view scrolls just far enough to show it
    let mut focus_end = 0;

    for field in app.form.visible_fields() {
        match field {
            Focus::Text(text_field) => push_text_field(&mut lines, app, text_field),
            Focus::Tones => push_tag_field(
                &mut lines,
                "Brand Tone Tags",
                "Add a custom tone...",
                &app.form.tones,
                app.form.focus() == Focus::Tones,
            ),
            Focus::Voices => push_tag_field(
                &mut lines,
                "Brand Voice Tags",
                "Add a voice characteristic...",
                &app.form.voices,
                app.form.focus() == Focus::Voices,
            ),
            Focus::Template => push_template_field(&mut lines, app),
        }
        if field == app.form.focus() {
            focus_end = lines.len();
        }
    }

    let button = if app.is_loading() {
        Span::styled(
            "  Generating... (Ctrl+G to start over)",
            Style::default().fg(Color::Yellow),
        )
    } else if app.form.can_submit() {
        Span::styled(
            "  Ctrl+G: Generate Content",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            "  Ctrl+G: Generate Content (add project details first)",
            Style::default().fg(Color::DarkGray),
        )
    };
    lines.push(Line::from(button));
    if app.form.focus() == Focus::Template {
        focus_end = lines.len();
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let scroll = visual_height(&lines[..focus_end], inner_width).saturating_sub(inner_height);

    let form = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Project ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false })
        .scroll(scroll_offset(scroll));

    frame.render_widget(form, area);
}

fn styled_line(line: &StyledLine) -> Line<'static> {
    let spans: Vec<Span<'static>> = line
        .segments
        .iter()
        .map(|segment| {
            if segment.emphasized {
                Span::styled(
                    segment.text.clone(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw(segment.text.clone())
            }
        })
        .collect();
    Line::from(spans)
}

pub fn render_output(frame: &mut Frame, app: &mut App, area: Rect) {
    let model = presenter::render(app.outcome());

    let title = match (&model, app.copy_feedback.is_copied()) {
        (DisplayModel::Content(_), true) => " Generated Content [Copied!] ",
        (DisplayModel::Content(_), false) => " Generated Content [Ctrl+Y: Copy] ",
        _ => " Generated Content ",
    };

    let (lines, alignment) = match model {
        DisplayModel::Spinner => {
            let frame_symbol = SPINNER_FRAMES[(app.tick / 6) % SPINNER_FRAMES.len()];
            (
                vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("{frame_symbol} Generating on-brand content..."),
                        Style::default().fg(Color::Magenta),
                    )),
                ],
                Alignment::Center,
            )
        }
        DisplayModel::Error(message) => (
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Error",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(message, Style::default().fg(Color::Gray))),
            ],
            Alignment::Center,
        ),
        DisplayModel::Content(styled) => (styled.iter().map(styled_line).collect(), Alignment::Left),
        DisplayModel::Placeholder => (
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Your generated content will appear here.",
                    Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Fill in the form and press Ctrl+G.",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
            Alignment::Center,
        ),
    };

    // Clamp to the last page and keep the clamped value so scrolling back
    // up responds immediately
    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let max_scroll = visual_height(&lines, inner_width).saturating_sub(inner_height);
    app.output_scroll = app.output_scroll.min(max_scroll);

    let output = Paragraph::new(lines)
        .alignment(alignment)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Magenta)),
        )
        .wrap(Wrap { trim: false })
        .scroll(scroll_offset(app.output_scroll));

    frame.render_widget(output, area);
}

pub fn render_help_window(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            "wildcopy - Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("General:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  Ctrl+H        - Show/hide this help"),
        Line::from("  Ctrl+Q        - Quit application"),
        Line::from("  Ctrl+C        - Quit application (press twice)"),
        Line::from(""),
        Line::from(Span::styled("Form:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  Tab/Shift+Tab - Next/previous field"),
        Line::from("  Enter         - New line, or add the typed tag"),
        Line::from("  Left/Right    - Pick a tag or template"),
        Line::from("  Delete        - Remove the highlighted tag"),
        Line::from(""),
        Line::from(Span::styled("Output:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  Ctrl+G        - Generate content"),
        Line::from("  Ctrl+Y        - Copy generated content"),
        Line::from("  PgUp/PgDn     - Scroll generated content"),
        Line::from("  Ctrl+Up/Down  - Scroll one line"),
        Line::from("  Ctrl+Home/End - Jump to top/bottom"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Ctrl+H or Esc to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    // Center popup
    let popup_width = 56;
    let popup_height = 25;
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: popup_width.min(area.width),
        height: popup_height.min(area.height),
    };

    frame.render_widget(Clear, popup_area);
    frame.render_widget(help_paragraph, popup_area);
}

pub fn render_bottom_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if app.exit_pending {
        (
            "Press Ctrl+C again to exit, Esc to cancel".to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else if let Some(notice) = &app.notice {
        (notice.clone(), Style::default().fg(Color::Yellow))
    } else {
        (
            "Ctrl+G: Generate | Ctrl+Y: Copy | PgUp/PgDn: Scroll | Tab: Next Field | Ctrl+H: Help | Ctrl+C: Quit"
                .to_string(),
            Style::default().fg(Color::DarkGray),
        )
    };

    let bar = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(style);

    frame.render_widget(bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::Segment;

    #[test]
    fn test_styled_line_emphasis_is_bold() {
        let line = StyledLine {
            segments: vec![
                Segment {
                    text: "Meet ".to_string(),
                    emphasized: false,
                },
                Segment {
                    text: "Acme".to_string(),
                    emphasized: true,
                },
            ],
        };

        let rendered = styled_line(&line);
        assert_eq!(rendered.spans.len(), 2);
        assert_eq!(rendered.spans[1].content, "Acme");
        assert!(rendered.spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert!(!rendered.spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_visual_height_counts_wrapped_rows() {
        let lines = vec![Line::from("abcdefghij"), Line::from(""), Line::from("abc")];
        assert_eq!(visual_height(&lines, 4), 3 + 1 + 1);
        assert_eq!(visual_height(&lines, 10), 3);
    }

    #[test]
    fn test_tag_field_highlights_cursor() {
        let tags = TagList::with_tags(&["Bold", "Calm"]);
        let mut lines = Vec::new();
        push_tag_field(&mut lines, "Tones", "Add...", &tags, true);
        // label, chips, draft placeholder, spacer
        assert_eq!(lines.len(), 4);
        let highlighted: Vec<_> = lines[1]
            .spans
            .iter()
            .filter(|span| span.style.bg == Some(Color::Magenta))
            .map(|span| span.content.to_string())
            .collect();
        assert_eq!(highlighted, vec!["[Bold]".to_string()]);
    }
}
