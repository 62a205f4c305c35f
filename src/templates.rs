// Template catalog and brand defaults

use crate::models::{TemplateOption, TemplateType};

pub const TEMPLATE_OPTIONS: &[TemplateOption] = &[
    TemplateOption {
        id: TemplateType::CaseStudy,
        label: "Case Study",
        word_count: "75-200",
        description: "A detailed project showcase.",
    },
    TemplateOption {
        id: TemplateType::InstagramPost,
        label: "Instagram Post",
        word_count: "75-200",
        description: "A catchy post for IG feed.",
    },
    TemplateOption {
        id: TemplateType::InstagramStory,
        label: "Instagram Story",
        word_count: "20-30",
        description: "Short and sweet for IG stories.",
    },
    TemplateOption {
        id: TemplateType::LinkedInPost,
        label: "LinkedIn Post",
        word_count: "75-200",
        description: "Professional post for LinkedIn.",
    },
    TemplateOption {
        id: TemplateType::GoogleSlides,
        label: "Google Slides Snippet",
        word_count: "30-50",
        description: "A punchy blurb for presentations.",
    },
];

/// Tone tags a fresh form starts with
pub const INITIAL_BRAND_TONES: &[&str] = &[
    "Upbeat and energetic",
    "Warm and human",
    "Confident but not boastful",
    "Curious and forward-thinking",
];

pub fn find_template(catalog: &[TemplateOption], id: TemplateType) -> Option<&TemplateOption> {
    catalog.iter().find(|option| option.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_template_has_exactly_one_entry() {
        for id in TemplateType::ALL {
            let count = TEMPLATE_OPTIONS.iter().filter(|o| o.id == id).count();
            assert_eq!(count, 1, "{id} should appear once");
        }
    }

    #[test]
    fn test_find_template() {
        let option = find_template(TEMPLATE_OPTIONS, TemplateType::InstagramStory).unwrap();
        assert_eq!(option.label, "Instagram Story");
        assert_eq!(option.word_count, "20-30");
    }

    #[test]
    fn test_find_template_missing() {
        let catalog = &TEMPLATE_OPTIONS[..1];
        assert!(find_template(catalog, TemplateType::GoogleSlides).is_none());
    }

    #[test]
    fn test_initial_tones_are_unique() {
        let mut tones = INITIAL_BRAND_TONES.to_vec();
        tones.sort_unstable();
        tones.dedup();
        assert_eq!(tones.len(), INITIAL_BRAND_TONES.len());
    }
}
