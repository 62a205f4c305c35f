// Prompt assembly for the generation request

use std::fmt::Write as _;

use crate::error::GenerationError;
use crate::models::{FormInput, GenerationRequest, TemplateOption, TemplateType};
use crate::templates::find_template;

pub const NOT_PROVIDED: &str = "Not provided";

/// Brand guidelines sent with every request
pub const SYSTEM_INSTRUCTION: &str = r#"You are an expert copywriter for a creative brand named "wild". Your task is to generate marketing copy that strictly adheres to the brand's voice, tone, and specific guidelines.

### Brand Voice:
- **Straightforward and clear:** Avoid jargon. Speak in plain language.
- **Playful but professional:** Use natural language with an emotional touch.
- **Collaborative and inclusive:** Emphasize partnership, shared goals, and open dialogue.

### Brand Tone:
- **Upbeat and energetic:** Convey excitement, momentum, and a sense of possibility.
- **Warm and human:** Feel approachable and friendly, not overly corporate or stiff.
- **Confident but not boastful:** Show expertise and creative strength while keeping things collaborative.
- **Curious and forward-thinking:** Lean into innovation and problem-solving with optimism.

### Specific Considerations:
- For older projects, state they were "launched in 2023" or "launched a year ago".
- Do not use hashtags unless specifically asked for.
- The brand name is always lowercase: "wild".
- Tag clients when their name is provided. Use the format "[Client Name]" as a placeholder if a handle isn't available.
- Team members are not tagged on public platforms.

### AI Mannerisms to AVOID (CRITICAL RULES):
- **NEVER use em dashes (—).** Use other punctuation instead.
- **NEVER use repetitive sentence structures.**
- **NEVER use lists of three with periods (e.g., "Simple. Fast. Effective.").**
- **NEVER start sentences with "Imagine a world where...".**
- **NEVER start sentences with "Whether you..." or "No matter what...".**
- **AVOID buzzwords:** Do not use "cutting-edge," "game-changing," "revolutionary," or "unlock your potential."
- **AVOID over-explaining:** Keep social copy short, sharp, and skimmable."#;

/// Build the prompt for a form snapshot.
///
/// Pure: no I/O. The only failure is a template missing from `catalog`.
pub fn build_request(
    input: &FormInput,
    catalog: &[TemplateOption],
) -> Result<GenerationRequest, GenerationError> {
    let template = find_template(catalog, input.selected_template)
        .ok_or(GenerationError::InvalidTemplate(input.selected_template))?;

    let mut prompt = String::new();
    let _ = write!(
        prompt,
        "Generate a \"{}\" based on the following project details:\n---\n{}\n---\n\n",
        template.label, input.user_input
    );
    let _ = writeln!(prompt, "Client Name: {}", or_not_provided(&input.client_name));

    if !input.brand_voices.is_empty() {
        prompt.push_str(
            "\nIn addition to the core brand voice, please emphasize these specific voice characteristics:\n",
        );
        push_bullets(&mut prompt, &input.brand_voices);
    }

    if !input.brand_tones.is_empty() {
        prompt.push_str(
            "\nIn addition to the core brand tones, please emphasize these specific tones:\n",
        );
        push_bullets(&mut prompt, &input.brand_tones);
    }

    if !input.case_study_example.trim().is_empty() {
        let _ = write!(
            prompt,
            "\nFor style guidance, refer to this example of a previous case study. \
             Emulate its style, tone, and structure while adhering to all other brand guidelines provided. \
             This is a style guide, not content to be rewritten.\n---\n{}\n---\n",
            input.case_study_example
        );
    }

    append_template_instructions(&mut prompt, template, input);

    Ok(GenerationRequest {
        prompt_text: prompt,
        system_instruction: SYSTEM_INSTRUCTION,
    })
}

fn or_not_provided(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_PROVIDED
    } else {
        value
    }
}

fn push_bullets(prompt: &mut String, items: &[String]) {
    for item in items {
        let _ = writeln!(prompt, "- {item}");
    }
}

fn append_template_instructions(prompt: &mut String, template: &TemplateOption, input: &FormInput) {
    let _ = write!(
        prompt,
        "\nFollow these specific instructions for the {}:\n- Word count: Approximately {} words.\n",
        template.label, template.word_count
    );

    let client = &input.client_name;
    match template.id {
        TemplateType::CaseStudy => {
            prompt.push_str(
                "- Structure: Choose ONE of the following structures that best fits the project details.\n\
                 \x20 - Structure A: 1. It started with, 2. Before, 3. Challenge, 4. Solution, 5. Result\n\
                 \x20 - Structure B: 1. Clear and concise introduction, 2. Context and goals, 3. What we did / how we did, 4. Impact\n\
                 - Entry Point: Start the case study with a compelling entry point. Consider one of these styles: \
                 Tiny moment, Tension first, Mid-action, Client quote/insight, or an Unexpected analogy.\n\
                 - Style: The writing style can be Punchy, a Reflection, Technical, or Personal & Authentic. Choose what fits best.\n\
                 - Credits: Include a section for \"Credits and contributors\" at the end, mentioning roles like \
                 Project Management, Design, and Development, and crediting partners. List names directly without brackets \
                 (e.g., \"Project Management: John Smith\" not \"Project Management: [Name]\").",
            );
        }
        TemplateType::InstagramPost => {
            let _ = write!(
                prompt,
                "- Structure: Create a bolded [title] and tag the client, followed by 2-3 short sentences.\n\
                 - Client Tag: Make sure to tag the client: \"{client}\"."
            );
        }
        TemplateType::InstagramStory => {
            let _ = write!(
                prompt,
                "- Structure: Create a bolded [title] and tag the client.\n\
                 - Client Tag: Make sure to tag the client: \"{client}\"."
            );
        }
        TemplateType::LinkedInPost => {
            let _ = write!(
                prompt,
                "- Structure: Create a bolded [title] and tag the client, followed by 2-3 short sentences, and then the web URL.\n\
                 - Client Tag: Make sure to tag the client: \"{client}\".\n\
                 - Web URL: {}",
                or_not_provided(&input.project_url)
            );
        }
        TemplateType::GoogleSlides => {
            prompt.push_str(
                "- Goal: Create a short, punchy description for a presentation slide about this project.",
            );
        }
    }
}
