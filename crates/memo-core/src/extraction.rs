//! Separates the "⚠️ 未確認: ..." marker line from the generated memo.
//!
//! Parsing happens in two stages: [`find_marker`] locates the first marker
//! and captures its item list, then removal passes strip the marker and its
//! decoration from the body. Each pass is a pure function and never fails;
//! malformed decoration is cleaned best-effort. A removed span takes the
//! blank lines directly after it, so the rest of the memo keeps its layout.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Warning glyph (variation selector optional), optional bold markers,
/// 未確認, optional bold markers, an ASCII or full-width colon, then the
/// rest of the line, which must hold at least one non-space character.
const MARKER: &str = r"⚠\x{FE0F}?[^\S\r\n]*\*{0,2}未確認\*{0,2}[:：][^\S\r\n]*(\S[^\r\n]*)";

static MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(MARKER).expect("Failed to compile marker regex"));

/// Line break and blank lines that follow a removed span.
const TRAILING_BLANKS: &str = r"(?:[^\S\n]*\n)*";

static MARKER_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("{MARKER}{TRAILING_BLANKS}"))
        .expect("Failed to compile marker line regex")
});

static MARKER_BOX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"-{{4,}}[^\S\n]*\n\s*{MARKER}[^\S\n]*\n\s*-{{4,}}{TRAILING_BLANKS}"
    ))
    .expect("Failed to compile marker box regex")
});

static ORPHAN_SEPARATORS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-{4,}[^\S\n]*\n\s*-{4,}").expect("Failed to compile separator regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub clean_body: String,
    pub unconfirmed_items: Option<String>,
}

/// Stateless handle over [`extract`], for callers that prefer a value to
/// hold next to the other pipeline stages.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfirmedExtractor;

impl UnconfirmedExtractor {
    pub fn extract(&self, raw_output: &str) -> ExtractionResult {
        extract(raw_output)
    }
}

pub fn extract(raw_output: &str) -> ExtractionResult {
    let Some(items) = find_marker(raw_output) else {
        return ExtractionResult {
            clean_body: raw_output.trim().to_string(),
            unconfirmed_items: None,
        };
    };

    let mut body = remove_marker_box(raw_output).into_owned();
    // Dropping separators can join leftovers into a fresh marker line, so
    // repeat until none is left. Every round removes at least one marker.
    loop {
        body = remove_marker_lines(&body).into_owned();
        body = remove_orphan_separators(&body).into_owned();
        if find_marker(&body).is_none() {
            break;
        }
    }

    ExtractionResult {
        clean_body: body.trim().to_string(),
        unconfirmed_items: Some(items),
    }
}

/// Item list of the first marker line, trimmed.
pub fn find_marker(text: &str) -> Option<String> {
    MARKER_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|items| items.as_str().trim().to_string())
}

/// Remove a `----` / marker / `----` box in one piece.
pub fn remove_marker_box(text: &str) -> Cow<'_, str> {
    MARKER_BOX_RE.replace_all(text, "")
}

/// Remove marker lines that were not boxed.
pub fn remove_marker_lines(text: &str) -> Cow<'_, str> {
    MARKER_LINE_RE.replace_all(text, "")
}

/// Drop two separator lines left facing each other.
pub fn remove_orphan_separators(text: &str) -> Cow<'_, str> {
    ORPHAN_SEPARATORS_RE.replace_all(text, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEPARATOR: &str = "--------------------------------------------------";

    #[test]
    fn marker_alone_leaves_empty_body() {
        let result = extract("⚠️ 未確認: 決定事項, ToDo");
        assert_eq!(result.clean_body, "");
        assert_eq!(result.unconfirmed_items.as_deref(), Some("決定事項, ToDo"));
    }

    #[test]
    fn boxed_marker_between_paragraphs_is_removed() {
        let raw = "■面談概要\n保険の相談をした\n\n----\n⚠️ **未確認**: ToDo\n----\n\n■ToDo\nなし";
        let result = extract(raw);

        assert_eq!(result.unconfirmed_items.as_deref(), Some("ToDo"));
        assert_eq!(result.clean_body, "■面談概要\n保険の相談をした\n\n■ToDo\nなし");
        assert!(!result.clean_body.contains("----"));
    }

    #[test]
    fn full_template_output_keeps_leading_separator() {
        let raw = format!(
            "{SEPARATOR}\n■面談概要\n終身保険について説明した\n\n■ToDo\nなし\n\n{SEPARATOR}\n⚠️ **未確認**: 面談日時・形式, 決定事項・次回の予定\n{SEPARATOR}\n"
        );
        let result = extract(&raw);

        assert_eq!(
            result.unconfirmed_items.as_deref(),
            Some("面談日時・形式, 決定事項・次回の予定")
        );
        assert_eq!(
            result.clean_body,
            format!("{SEPARATOR}\n■面談概要\n終身保険について説明した\n\n■ToDo\nなし")
        );
    }

    #[test]
    fn no_marker_returns_trimmed_input() {
        let raw = "\n  ■面談概要\n相談した\n\n\n■ToDo\nなし  \n";
        let result = extract(raw);

        assert_eq!(result.unconfirmed_items, None);
        assert_eq!(result.clean_body, raw.trim());
    }

    #[test]
    fn unboxed_marker_line_is_removed() {
        let raw = "■面談概要\n相談した\n\n⚠️ 未確認: ToDo\n";
        let result = extract(raw);

        assert_eq!(result.unconfirmed_items.as_deref(), Some("ToDo"));
        assert_eq!(result.clean_body, "■面談概要\n相談した");
    }

    #[test]
    fn half_boxed_marker_leaves_no_marker() {
        let raw = "本文\n----\n⚠️ 未確認: ToDo";
        let result = extract(raw);

        assert_eq!(result.unconfirmed_items.as_deref(), Some("ToDo"));
        assert!(find_marker(&result.clean_body).is_none());
        assert_eq!(result.clean_body, "本文\n----");
    }

    #[test]
    fn first_marker_wins_and_all_are_removed() {
        let raw = "⚠️ 未確認: ToDo\n本文\n⚠️ 未確認: 面談日時";
        let result = extract(raw);

        assert_eq!(result.unconfirmed_items.as_deref(), Some("ToDo"));
        assert_eq!(result.clean_body, "本文");
    }

    #[test]
    fn marker_variants_are_recognised() {
        for (line, items) in [
            ("⚠️未確認:ToDo", "ToDo"),
            ("⚠ 未確認: ToDo", "ToDo"),
            ("⚠️ *未確認*: ToDo", "ToDo"),
            ("⚠️ **未確認**：決定事項 ", "決定事項"),
            ("⚠️ 未確認: ToDo\r", "ToDo"),
        ] {
            assert_eq!(find_marker(line).as_deref(), Some(items), "line {line:?}");
        }
    }

    #[test]
    fn marker_without_items_is_not_a_marker() {
        let raw = "⚠️ 未確認:\n次の行";
        assert_eq!(find_marker(raw), None);

        let result = extract(raw);
        assert_eq!(result.unconfirmed_items, None);
        assert_eq!(result.clean_body, raw);
    }

    #[test]
    fn marker_items_stop_at_line_break() {
        assert_eq!(
            find_marker("⚠️ 未確認: ToDo\n■面談概要").as_deref(),
            Some("ToDo")
        );
    }

    #[test]
    fn extraction_is_idempotent() {
        let inputs = [
            "⚠️ 未確認: 決定事項, ToDo".to_string(),
            "a\n----\n⚠️ **未確認**: ToDo\n----\nb".to_string(),
            "----\n----\n⚠️ 未確認: x\n⚠️ 未確認: y\n----".to_string(),
            format!("{SEPARATOR}\n本文\n{SEPARATOR}\n⚠️ **未確認**: ToDo\n{SEPARATOR}"),
            "普通の本文".to_string(),
            String::new(),
        ];

        for input in &inputs {
            let once = extract(input);
            let twice = extract(&once.clean_body);
            assert_eq!(twice.unconfirmed_items, None, "input {input:?}");
            assert_eq!(twice.clean_body, once.clean_body, "input {input:?}");
        }
    }

    #[test]
    fn removal_passes_are_independent() {
        assert_eq!(remove_marker_box("x\n----\n⚠️ 未確認: a\n----\ny"), "x\ny");
        assert_eq!(remove_marker_box("x\n----\n⚠️ 未確認: a\n----\n\n \ny"), "x\ny");
        assert_eq!(remove_marker_lines("x\n⚠️ 未確認: a\ny"), "x\ny");
        assert_eq!(remove_marker_lines("x\n⚠️ 未確認: a\r\n\ny"), "x\ny");
        assert_eq!(remove_orphan_separators("x\n----\n\n-----\ny"), "x\n\ny");
    }

    #[test]
    fn marker_formed_by_separator_removal_is_removed() {
        let raw = "⚠️ 未確認: a\n⚠️ 未確認----\n----: b";
        let result = extract(raw);

        assert_eq!(result.unconfirmed_items.as_deref(), Some("a"));
        assert!(find_marker(&result.clean_body).is_none());
        assert_eq!(result.clean_body, "");

        let twice = extract(&result.clean_body);
        assert_eq!(twice.unconfirmed_items, None);
        assert_eq!(twice.clean_body, result.clean_body);
    }

    #[test]
    fn blank_runs_away_from_the_marker_are_kept() {
        let raw = "■詳細内容\n- a\n\n\n\n- b\n\n⚠️ 未確認: ToDo";
        let result = extract(raw);

        assert_eq!(result.unconfirmed_items.as_deref(), Some("ToDo"));
        assert_eq!(result.clean_body, "■詳細内容\n- a\n\n\n\n- b");
    }

    #[test]
    fn extractor_handle_delegates() {
        let result = UnconfirmedExtractor.extract("本文\n⚠️ 未確認: ToDo");
        assert_eq!(result.clean_body, "本文");
        assert_eq!(result.unconfirmed_items.as_deref(), Some("ToDo"));
    }
}
