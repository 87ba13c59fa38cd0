//! Structural gate for generated component source.
//!
//! Cheap string heuristics, not a parser. Every check runs on every input so the
//! repair prompt can list all problems at once. Passing is necessary, not
//! sufficient: broken code can still slip through.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker of the component entry point the renderer looks for.
pub const DEFAULT_EXPORT_MARKER: &str = "export default function";

/// The only module the rendering runtime can resolve.
pub const BASE_UI_LIBRARY: &str = "react";

const RETURN_MARKERS: [&str; 2] = ["return (", "return("];
const DANGEROUS_MARKERS: [&str; 2] = ["eval(", "Function("];
const IMPORT_KEYWORD: &str = "import";

/// One structural problem. Variant order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeIssue {
    MissingDefaultExport,
    MissingRenderReturn,
    DangerousExecution,
    UnsupportedImport,
    UnbalancedBraces,
    UnbalancedParentheses,
}

impl CodeIssue {
    pub fn code(self) -> &'static str {
        match self {
            CodeIssue::MissingDefaultExport => "missing_default_export",
            CodeIssue::MissingRenderReturn => "missing_render_return",
            CodeIssue::DangerousExecution => "dangerous_execution",
            CodeIssue::UnsupportedImport => "unsupported_import",
            CodeIssue::UnbalancedBraces => "unbalanced_braces",
            CodeIssue::UnbalancedParentheses => "unbalanced_parentheses",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            CodeIssue::MissingDefaultExport => "Missing default export function",
            CodeIssue::MissingRenderReturn => "Missing return statement",
            CodeIssue::DangerousExecution => "Contains dangerous code execution patterns",
            CodeIssue::UnsupportedImport => "Contains unsupported import statements",
            CodeIssue::UnbalancedBraces => "Unbalanced braces",
            CodeIssue::UnbalancedParentheses => "Unbalanced parentheses",
        }
    }
}

impl fmt::Display for CodeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Verdict of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<CodeIssue>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<CodeIssue>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn messages(&self) -> Vec<&'static str> {
        self.errors.iter().map(|issue| issue.message()).collect()
    }

    /// Error messages joined for storage on a failed lesson.
    pub fn summary(&self) -> String {
        self.messages().join(", ")
    }
}

/// Inspect generated source for structural red flags. Total and deterministic.
pub fn validate(code: &str) -> ValidationResult {
    let mut errors = Vec::new();

    if !code.contains(DEFAULT_EXPORT_MARKER) {
        errors.push(CodeIssue::MissingDefaultExport);
    }

    if !RETURN_MARKERS.iter().any(|marker| code.contains(marker)) {
        errors.push(CodeIssue::MissingRenderReturn);
    }

    if DANGEROUS_MARKERS.iter().any(|marker| code.contains(marker)) {
        errors.push(CodeIssue::DangerousExecution);
    }

    if import_specifiers(code).any(|specifier| specifier != Some(BASE_UI_LIBRARY)) {
        errors.push(CodeIssue::UnsupportedImport);
    }

    if count_char(code, '{') != count_char(code, '}') {
        errors.push(CodeIssue::UnbalancedBraces);
    }

    if count_char(code, '(') != count_char(code, ')') {
        errors.push(CodeIssue::UnbalancedParentheses);
    }

    ValidationResult::from_errors(errors)
}

fn count_char(code: &str, needle: char) -> usize {
    code.chars().filter(|c| *c == needle).count()
}

/// Module specifier of every import in `code`; `None` when an import names no
/// quoted module. Covers statement imports at line start (multi-line forms
/// included) and dynamic `import(...)` calls anywhere.
fn import_specifiers(code: &str) -> impl Iterator<Item = Option<&str>> {
    let mut starts: Vec<usize> = Vec::new();

    let mut offset = 0usize;
    for line in code.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();
        if let Some(rest) = trimmed.strip_prefix(IMPORT_KEYWORD) {
            let opens_statement = rest
                .chars()
                .next()
                .map_or(false, |c| c.is_whitespace() || matches!(c, '{' | '*' | '"' | '\''));
            if opens_statement {
                starts.push(offset + indent + IMPORT_KEYWORD.len());
            }
        }
        offset += line.len();
    }

    for (index, _) in code.match_indices("import(") {
        let preceded_by_ident = code[..index]
            .chars()
            .next_back()
            .map_or(false, |c| c.is_alphanumeric() || c == '_' || c == '$' || c == '.');
        if !preceded_by_ident {
            starts.push(index + IMPORT_KEYWORD.len());
        }
    }

    starts.sort_unstable();
    starts.dedup();
    starts.into_iter().map(move |start| quoted_specifier(&code[start..]))
}

fn quoted_specifier(rest: &str) -> Option<&str> {
    let (open, quote) = rest.char_indices().find(|(_, c)| matches!(c, '"' | '\''))?;
    let body = &rest[open + 1..];
    let close = body.find(quote)?;
    Some(&body[..close])
}
