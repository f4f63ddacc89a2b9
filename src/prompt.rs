//! Natural-language prompts sent to the providers.

/// Image-generation APIs reject prompts past this many characters.
pub const MAX_PROMPT_CHARS: usize = 1000;

/// Text-only prompt for an image model that never sees the selfie.
///
/// `appearance` is an optional description of the user's photo, produced by a
/// vision model, woven in before truncation.
pub fn image_prompt(title: &str, character: Option<&str>, appearance: Option<&str>) -> String {
    let mut prompt = format!(
        "Create a portrait of an original character in the exact visual style of the anime '{title}'."
    );
    if let Some(character) = character {
        prompt.push_str(&format!(
            " The character should resemble '{character}' from '{title}', but as a unique anime avatar."
        ));
    }
    if let Some(appearance) = appearance {
        prompt.push_str(&format!(
            " Base the character's look on this person: {}.",
            appearance.trim().trim_end_matches('.')
        ));
    }
    prompt.push_str(&format!(
        " Use the same color palette, line art, shading, and composition typical for '{title}'."
    ));
    prompt.push_str(&format!(
        " The result must be indistinguishable from official '{title}' artwork. No text, no watermark, no signature. Only the character, upper body, clean background."
    ));
    prompt.push_str(" High resolution, masterpiece, trending on pixiv, professional digital art.");

    truncate_chars(&prompt, MAX_PROMPT_CHARS)
}

/// Instruction for a multimodal model that receives the selfie alongside.
pub fn selfie_instruction(title: &str, character: Option<&str>) -> String {
    let mut text = String::from(
        "Analyze the provided selfie and extract the person's key facial features, hair color/length/shape, \
         eye shape/color, skin tone, face structure, and expression. Infer the person's gender from the selfie \
         and keep it the same in the result. ",
    );
    text.push_str(&format!(
        "Then generate a new portrait as an original character strictly in the visual style of the anime '{title}'. "
    ));
    if let Some(character) = character {
        text.push_str(&format!(
            "The character should subtly resemble '{character}' while staying unique. "
        ));
    }
    text.push_str(
        "Match the canonical color palette, linework, shading, composition, and rendering typical for the specified anime. \
         No text, no watermark, no signature. Upper body portrait on a clean simple background. \
         High resolution, professional digital art, masterpiece quality.",
    );
    text
}

pub fn describe_instruction() -> &'static str {
    "Describe the person in this photo for an illustrator in one short paragraph: \
     hair color, length and style; eye shape and color; skin tone; face shape; expression; apparent gender. \
     Do not mention the background or clothing brands."
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// First `max` characters followed by an ellipsis, for log lines.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", truncate_chars(text, max))
    } else {
        text.to_string()
    }
}
