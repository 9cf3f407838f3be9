//! Prompt templates for each stage of the studio.
//!
//! Placeholders use `{name}` and are filled with [`render`]. Templates are
//! plain constants so they can be inspected in tests and logs.

use regex::{Captures, Regex};
use std::sync::LazyLock;

pub const PROMPT_ENHANCER: &str = r#"You are the creative director of a motion graphics studio that builds Manim animations.
A client has handed you a short idea. Expand it into a detailed storyboard, scene by scene.
Describe the objects on screen, how they transform, how the camera moves and how the story flows.
Answer with one rich, descriptive paragraph that a designer and a programmer can both work from.
Client idea: "{prompt}""#;

pub const DESIGNER: &str = r#"You are a senior visual designer with a strong sense of colour theory.
Create a cohesive visual theme for a Manim animation based on the storyboard below.
Answer with a JSON object containing exactly these keys:
- "palette": a list of 5 to 7 complementary hex colour codes
- "background_color": one hex colour code for the scene background
- "font": a common font family such as "Inter", "Lato" or "Roboto"
- "animation_style": a short description of how the motion should feel

Storyboard: "{description}""#;

pub const MANIM_CODER: &str = r#"You are a lead Manim developer who writes clean and correct animation code.
Write a complete, runnable Python script for a Manim animation from the storyboard and design brief below.
Rules:
1. Produce a single complete Python file.
2. Import everything you need from `manim`.
3. The animation class must inherit from `Scene`.
4. All animation logic lives in the `construct` method.
5. Follow the design brief: use its `palette`, `background_color` and `font`, and set the background with `config.background_color`.
6. Lay the animation out for a '{aspect_ratio}' aspect ratio.
7. Output only raw Python code, without markdown fences.
Storyboard: {description}
Design brief (JSON): {theme}"#;

pub const PROMPT_SUGGESTER: &str = r#"Brainstorm 3 varied, visually interesting ideas for a short Manim animation.
Cover a range from mathematical concepts to abstract data visualisation.
Answer with a JSON array of strings only, for example: ["idea 1", "idea 2", "idea 3"]."#;

pub const CODE_EXPLAINER: &str = r#"You are a friendly Manim teaching assistant.
Explain the following Manim code clearly and concisely for a beginner.
Split the explanation into sections with markdown headings (for example ### Setup, ### Animation Sequence).
Cover what the code does and why. Answer in clean markdown.
Code:
```python
{code}
```"#;

pub const TITLE_GENERATOR: &str = r#"You are a copywriter who writes catchy titles for video content.
From the storyboard below, write a title and a short, engaging description of one or two sentences.
The tone should suit platforms such as YouTube or Twitter.
Answer with a single JSON object with the keys "title" and "description".
Storyboard: {description}"#;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern"));

/// Substitutes each `{key}` in `template` with its value in one pass.
/// Inserted values are never rescanned, and unknown names stay as written.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            vars.iter()
                .find(|(key, _)| *key == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

pub fn enhance(prompt: &str) -> String {
    render(PROMPT_ENHANCER, &[("prompt", prompt)])
}

pub fn design(description: &str) -> String {
    render(DESIGNER, &[("description", description)])
}

pub fn title(description: &str) -> String {
    render(TITLE_GENERATOR, &[("description", description)])
}

pub fn manim_code(description: &str, theme: &str, aspect_ratio: &str) -> String {
    render(
        MANIM_CODER,
        &[
            ("aspect_ratio", aspect_ratio),
            ("theme", theme),
            ("description", description),
        ],
    )
}

pub fn explain(code: &str) -> String {
    render(CODE_EXPLAINER, &[("code", code)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enhance_inserts_prompt() {
        let text = enhance("a bouncing ball");
        assert!(text.contains("Client idea: \"a bouncing ball\""));
        assert!(!text.contains("{prompt}"));
    }

    #[test]
    fn test_manim_code_fills_every_placeholder() {
        let text = manim_code("storyboard text", r#"{"font":"Inter"}"#, "portrait");
        assert!(text.contains("'portrait' aspect ratio"));
        assert!(text.contains("Storyboard: storyboard text"));
        assert!(text.contains(r#"Design brief (JSON): {"font":"Inter"}"#));
        assert!(!text.contains("{aspect_ratio}"));
    }

    #[test]
    fn test_inserted_values_are_not_expanded_again() {
        let text = manim_code("STORYBOARD", r#"{"note":"{description}"}"#, "{description}");
        assert!(text.contains("'{description}' aspect ratio"));
        assert!(text.contains(r#"Design brief (JSON): {"note":"{description}"}"#));
        assert_eq!(text.matches("STORYBOARD").count(), 1);
    }

    #[test]
    fn test_unknown_placeholders_are_left_alone() {
        assert_eq!(render("{a} and {b}", &[("a", "x")]), "x and {b}");
        assert_eq!(render("{a}{a}", &[("a", "{a}")]), "{a}{a}");
    }

    #[test]
    fn test_explain_wraps_code_in_fence() {
        let text = explain("class A(Scene): pass");
        assert!(text.contains("```python\nclass A(Scene): pass\n```"));
    }

    #[test]
    fn test_suggester_has_no_placeholders() {
        assert!(!PROMPT_SUGGESTER.contains("{prompt}"));
        assert!(PROMPT_SUGGESTER.contains("JSON array"));
    }
}
