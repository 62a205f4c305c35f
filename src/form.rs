//! Form state for the project details panel
//!
//! Owns everything the user edits. Nothing here validates beyond the tag
//! lists; `submit` hands out a snapshot and leaves the form untouched.

use crate::models::{FormInput, TemplateType};
use crate::templates::INITIAL_BRAND_TONES;

/// Free-text fields addressable by `set_field`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    UserInput,
    ClientName,
    ProjectUrl,
    CaseStudyExample,
}

impl TextField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::UserInput => "Project Details",
            Self::ClientName => "Client Name",
            Self::ProjectUrl => "Project URL",
            Self::CaseStudyExample => "Previous Case Study (Optional)",
        }
    }

    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::UserInput => {
                "Enter key points about the project, client quotes, challenges, and solutions..."
            }
            Self::ClientName => "e.g., Nike",
            Self::ProjectUrl => "https://example.com/project",
            Self::CaseStudyExample => "Paste content here to guide the writing style...",
        }
    }

    pub const fn is_multiline(self) -> bool {
        matches!(self, Self::UserInput | Self::CaseStudyExample)
    }
}

/// Which part of the form receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Text(TextField),
    Tones,
    Voices,
    Template,
}

/// Ordered, duplicate-free list of tags plus the draft being typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagList {
    tags: Vec<String>,
    pub draft: String,
    cursor: usize,
}

impl TagList {
    pub fn with_tags(tags: &[&str]) -> Self {
        let mut list = Self::default();
        for tag in tags {
            list.add(tag);
        }
        list
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Index of the highlighted tag, if any
    pub fn cursor(&self) -> Option<usize> {
        (!self.tags.is_empty()).then(|| self.cursor.min(self.tags.len() - 1))
    }

    /// Trimmed, case-sensitive dedup. Returns whether the tag was added.
    pub fn add(&mut self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || self.tags.iter().any(|tag| tag == value) {
            return false;
        }
        self.tags.push(value.to_string());
        true
    }

    /// Out-of-range indexes are ignored
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index >= self.tags.len() {
            return None;
        }
        let removed = self.tags.remove(index);
        if self.cursor > 0 && self.cursor >= self.tags.len() {
            self.cursor = self.tags.len().saturating_sub(1);
        }
        Some(removed)
    }

    pub fn select_next(&mut self) {
        if !self.tags.is_empty() {
            self.cursor = (self.cursor + 1).min(self.tags.len() - 1);
        }
    }

    pub const fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    user_input: String,
    client_name: String,
    project_url: String,
    case_study_example: String,
    selected_template: TemplateType,
    pub tones: TagList,
    pub voices: TagList,
    focus: Focus,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            user_input: String::new(),
            client_name: String::new(),
            project_url: String::new(),
            case_study_example: String::new(),
            selected_template: TemplateType::CaseStudy,
            tones: TagList::with_tags(INITIAL_BRAND_TONES),
            voices: TagList::default(),
            focus: Focus::Text(TextField::UserInput),
        }
    }

    pub fn field(&self, field: TextField) -> &str {
        match field {
            TextField::UserInput => &self.user_input,
            TextField::ClientName => &self.client_name,
            TextField::ProjectUrl => &self.project_url,
            TextField::CaseStudyExample => &self.case_study_example,
        }
    }

    fn field_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::UserInput => &mut self.user_input,
            TextField::ClientName => &mut self.client_name,
            TextField::ProjectUrl => &mut self.project_url,
            TextField::CaseStudyExample => &mut self.case_study_example,
        }
    }

    pub fn set_field(&mut self, field: TextField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    pub fn add_tone(&mut self, value: &str) -> bool {
        self.tones.add(value)
    }

    pub fn remove_tone(&mut self, index: usize) -> Option<String> {
        self.tones.remove(index)
    }

    pub fn add_voice(&mut self, value: &str) -> bool {
        self.voices.add(value)
    }

    pub fn remove_voice(&mut self, index: usize) -> Option<String> {
        self.voices.remove(index)
    }

    pub const fn selected_template(&self) -> TemplateType {
        self.selected_template
    }

    /// Switching away from LinkedIn drops the project URL so it can't leak
    /// into a template that never shows it.
    pub fn select_template(&mut self, id: TemplateType) {
        self.selected_template = id;
        if id != TemplateType::LinkedInPost {
            self.project_url.clear();
            if self.focus == Focus::Text(TextField::ProjectUrl) {
                self.focus = Focus::Template;
            }
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.user_input.trim().is_empty()
    }

    /// Snapshot for the orchestrator, or `None` while project details are blank
    pub fn submit(&self) -> Option<FormInput> {
        if !self.can_submit() {
            return None;
        }
        Some(FormInput {
            user_input: self.user_input.clone(),
            client_name: self.client_name.clone(),
            project_url: self.project_url.clone(),
            selected_template: self.selected_template,
            brand_tones: self.tones.tags().to_vec(),
            brand_voices: self.voices.tags().to_vec(),
            case_study_example: self.case_study_example.clone(),
        })
    }

    pub const fn focus(&self) -> Focus {
        self.focus
    }

    /// Fields in display order; the URL only shows up for LinkedIn
    pub fn visible_fields(&self) -> Vec<Focus> {
        let mut fields = vec![
            Focus::Text(TextField::UserInput),
            Focus::Text(TextField::ClientName),
        ];
        if self.selected_template == TemplateType::LinkedInPost {
            fields.push(Focus::Text(TextField::ProjectUrl));
        }
        fields.extend([
            Focus::Tones,
            Focus::Voices,
            Focus::Text(TextField::CaseStudyExample),
            Focus::Template,
        ]);
        fields
    }

    pub fn focus_next(&mut self) {
        let fields = self.visible_fields();
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(current + 1) % fields.len()];
    }

    pub fn focus_prev(&mut self) {
        let fields = self.visible_fields();
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(current + fields.len() - 1) % fields.len()];
    }

    pub fn push_char(&mut self, c: char) {
        match self.focus {
            Focus::Text(field) => self.field_mut(field).push(c),
            Focus::Tones => self.tones.draft.push(c),
            Focus::Voices => self.voices.draft.push(c),
            Focus::Template => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus {
            Focus::Text(field) => {
                self.field_mut(field).pop();
            }
            Focus::Tones => {
                self.tones.draft.pop();
            }
            Focus::Voices => {
                self.voices.draft.pop();
            }
            Focus::Template => {}
        }
    }

    /// Insert a bracketed paste as one edit. Single-line fields and tag
    /// drafts keep only the first line.
    pub fn paste(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let first_line = text.lines().next().unwrap_or_default();
        match self.focus {
            Focus::Text(field) if field.is_multiline() => self.field_mut(field).push_str(&text),
            Focus::Text(field) => self.field_mut(field).push_str(first_line),
            Focus::Tones => self.tones.draft.push_str(first_line),
            Focus::Voices => self.voices.draft.push_str(first_line),
            Focus::Template => {}
        }
    }

    /// Enter: newline in multiline fields, commit in tag fields
    pub fn enter(&mut self) {
        match self.focus {
            Focus::Text(field) if field.is_multiline() => self.field_mut(field).push('\n'),
            // The draft is only cleared when the tag was accepted
            Focus::Tones => {
                let draft = std::mem::take(&mut self.tones.draft);
                if !self.add_tone(&draft) {
                    self.tones.draft = draft;
                }
            }
            Focus::Voices => {
                let draft = std::mem::take(&mut self.voices.draft);
                if !self.add_voice(&draft) {
                    self.voices.draft = draft;
                }
            }
            Focus::Text(_) | Focus::Template => {}
        }
    }

    /// Left/Right: move the tag highlight or cycle templates
    pub fn shift(&mut self, forward: bool) {
        match (self.focus, forward) {
            (Focus::Tones, true) => self.tones.select_next(),
            (Focus::Tones, false) => self.tones.select_prev(),
            (Focus::Voices, true) => self.voices.select_next(),
            (Focus::Voices, false) => self.voices.select_prev(),
            (Focus::Template, true) => self.select_template(self.selected_template.next()),
            (Focus::Template, false) => self.select_template(self.selected_template.prev()),
            (Focus::Text(_), _) => {}
        }
    }

    /// Delete: drop the highlighted tag
    pub fn delete_selected(&mut self) -> Option<String> {
        match self.focus {
            Focus::Tones => self.tones.cursor().and_then(|index| self.remove_tone(index)),
            Focus::Voices => self.voices.cursor().and_then(|index| self.remove_voice(index)),
            Focus::Text(_) | Focus::Template => None,
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
