//! Prompts for pain-point extraction.

use std::fmt::Write;

use crate::types::pain_point::Category;
use crate::types::thread::ExtractionInput;

/// System prompt for extraction. The model must answer with a JSON object.
pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"You analyze social-media threads and identify the problems people describe.

For each distinct pain point, return:
- title: a short statement of the problem, in the poster's words where possible
- summary: one sentence
- description: a few sentences of context
- category: one of {categories}
- subCategory: free text, optional
- intensity: Low, Medium, or High (how much it hurts)
- urgency: Low, Medium, or High (how soon they need a fix)
- marketSize: Low, Medium, or High (how many people likely share it)
- quotes: supporting quotes as {"text", "author"} objects, copied verbatim
- keywords: 3-8 lowercase search terms
- tags: short labels
- confidence: 0.0 to 1.0, how sure you are this is a real pain point

Only report problems that are actually stated. Do not invent quotes.

Respond with a JSON object: {"pain_points": [...]}. Use an empty array when
there are none."#;

/// The system prompt with the category list filled in.
pub fn system_prompt() -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    EXTRACTION_SYSTEM_PROMPT.replace("{categories}", &categories)
}

/// Render a thread as the user message.
pub fn user_prompt(input: &ExtractionInput) -> String {
    let mut prompt = format!("## Post: {}\n\n{}\n", input.title, input.content);

    if !input.comments.is_empty() {
        prompt.push_str("\n## Comments\n");
        for comment in &input.comments {
            // Writing to a String cannot fail
            let _ = writeln!(prompt, "- {}: {}", comment.author, comment.text);
        }
    }

    prompt
}
