use serde::{Deserialize, Serialize};
use std::fmt;

/// Output formats the generator knows how to write.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TemplateType {
    #[default]
    CaseStudy,
    InstagramPost,
    InstagramStory,
    LinkedInPost,
    GoogleSlides,
}

impl TemplateType {
    pub const ALL: [Self; 5] = [
        Self::CaseStudy,
        Self::InstagramPost,
        Self::InstagramStory,
        Self::LinkedInPost,
        Self::GoogleSlides,
    ];

    /// Next template in catalog order, wrapping around
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Previous template in catalog order, wrapping around
    pub fn prev(self) -> Self {
        let index = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CaseStudy => "CaseStudy",
            Self::InstagramPost => "InstagramPost",
            Self::InstagramStory => "InstagramStory",
            Self::LinkedInPost => "LinkedInPost",
            Self::GoogleSlides => "GoogleSlides",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOption {
    pub id: TemplateType,
    pub label: &'static str,
    pub word_count: &'static str,
    pub description: &'static str,
}

/// Snapshot of the form taken at submit time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub user_input: String,
    pub client_name: String,
    pub project_url: String,
    pub selected_template: TemplateType,
    pub brand_tones: Vec<String>,
    pub brand_voices: Vec<String>,
    pub case_study_example: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt_text: String,
    pub system_instruction: &'static str,
}

/// What the output panel currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenerationOutcome {
    #[default]
    Idle,
    Loading,
    Success(String),
    Failure(String),
}

impl GenerationOutcome {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Raw generated text, if the last generation succeeded
    pub fn success_text(&self) -> Option<&str> {
        match self {
            Self::Success(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub model: String,
    pub temperature: f64,
    /// Environment variable holding the API key, read on every request
    pub api_key_env: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.7,
            api_key_env: "API_KEY".to_string(),
        }
    }
}
