//! Prompt builders and model-output cleanup.

use crate::generation::validator::CodeIssue;

/// Client-side execution marker that must open every component.
pub const CLIENT_DIRECTIVE: &str = "\"use client\";";

/// Hook import line the component must carry right after the directive.
pub const HOOK_IMPORT: &str = "import { useState, useEffect, useMemo } from \"react\";";

/// Signature of the default-exported component.
pub const COMPONENT_SIGNATURE: &str = "export default function LessonComponent() {";

const CODE_FENCE: &str = "```";

pub fn title_prompt(outline: &str, max_chars: usize) -> String {
    format!(
        "Extract a short, clear title (max {max_chars} characters) from the lesson outline. \
         Return only the title, nothing else.\n\nLesson outline: {outline}"
    )
}

pub fn code_prompt(outline: &str, attempt: u32) -> String {
    let mut prompt = format!(
        "You write self-contained interactive lessons as a single React component in TSX.\n\
         \n\
         Lesson outline: {outline}\n\
         \n\
         Output rules:\n\
         - Output raw TSX source only. Never output backticks, code fences or markdown.\n\
         - The first three lines must be exactly:\n\
         {CLIENT_DIRECTIVE}\n\
         {HOOK_IMPORT}\n\
         {COMPONENT_SIGNATURE}\n\
         - Import nothing else. No other packages, no CSS files, no dynamic imports.\n\
         - Style with Tailwind utility classes or inline style objects only.\n\
         - Never call eval or the Function constructor.\n\
         - Avoid template literals; build strings with concatenation.\n\
         - The component must return its markup with `return (`.\n\
         - Keep every brace and parenthesis balanced.\n\
         \n\
         Lesson content:\n\
         - Explain the topic in short sections with concrete examples.\n\
         - Add at least one interactive element such as a quiz, stepper or toggle \
           driven by useState.\n\
         - Give feedback on learner answers and let them retry.\n"
    );

    if attempt > 1 {
        prompt.push_str(&format!(
            "\nThis is attempt {attempt}. Previous attempts failed validation. \
             Ensure strict TSX and no template literals.\n"
        ));
    }

    prompt
}

pub fn repair_prompt(code: &str, errors: &[CodeIssue]) -> String {
    let listed = errors
        .iter()
        .map(|issue| issue.message())
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "The following TypeScript React component has validation errors:\n\n\
         {listed}\n\n\
         Fix the code. Rules:\n\
         - Return pure TSX only\n\
         - No markdown, no backticks, no code fences\n\
         - Must compile\n\
         - Must remain a complete, self-contained component\n\
         - Must use Tailwind or inline styles only\n\n\
         ORIGINAL CODE:\n{code}"
    )
}

/// Drop markdown fence markers (and the language tag of an opening fence), then trim.
pub fn strip_code_fences(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(index) = rest.find(CODE_FENCE) {
        let before = &rest[..index];
        cleaned.push_str(before);
        let opens_line = before
            .rsplit('\n')
            .next()
            .map_or(true, |line| line.trim().is_empty());

        rest = &rest[index + CODE_FENCE.len()..];
        if opens_line {
            let tag_len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')))
                .unwrap_or(rest.len());
            rest = &rest[tag_len..];
        }
    }
    cleaned.push_str(rest);

    cleaned.trim().to_string()
}
