//! Terminal rendering of results, failures and history.

use colored::Colorize;

use memo_core::classifier::{EMPTY_INPUT_WARNING, GENERAL_HINT};
use memo_core::{ExtractionResult, HistoryEntry, HistoryLog, NormalizeError};

pub fn unconfirmed_line(items: &str) -> String {
    format!("⚠️ 未確認: {}", items)
}

pub fn print_result(result: &ExtractionResult) {
    if let Some(items) = &result.unconfirmed_items {
        println!("{}", unconfirmed_line(items).yellow().bold());
        println!();
    }
    println!("{}", result.clean_body);
}

pub fn print_error(err: &NormalizeError) {
    match err {
        NormalizeError::EmptyInput => {
            eprintln!("{}", EMPTY_INPUT_WARNING.yellow());
        }
        NormalizeError::Generation { category, message } => {
            eprintln!("{}", category.headline().red().bold());
            eprintln!("{}", category.guidance(message).yellow());
            eprintln!("{}", GENERAL_HINT.dimmed());
        }
    }
}

/// First non-empty line, cut to `max_chars`.
pub fn preview(text: &str, max_chars: usize) -> String {
    let line = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");
    if line.chars().count() > max_chars {
        let cut: String = line.chars().take(max_chars).collect();
        format!("{}…", cut)
    } else {
        line.to_string()
    }
}

pub fn history_row(index: usize, entry: &HistoryEntry) -> String {
    let flag = if entry.unconfirmed().is_some() { "⚠️" } else { "  " };
    format!(
        "{:>2}. 📄 {} {} {}",
        index + 1,
        entry.timestamp(),
        flag,
        preview(entry.output(), 40)
    )
}

pub fn print_history(history: &HistoryLog) {
    if history.is_empty() {
        println!(
            "{}",
            "📝 履歴はまだありません。メモを整理すると、ここに履歴が表示されます。".dimmed()
        );
        return;
    }

    println!("{}", format!("📚 生成履歴 ({}件)", history.len()).cyan().bold());
    for (index, entry) in history.entries().enumerate() {
        println!("{}", history_row(index, entry));
    }
}

pub fn print_entry(entry: &HistoryEntry) {
    println!("{}", format!("📄 {}", entry.timestamp()).cyan().bold());
    println!("{}", "📝 入力".bold());
    println!("{}", entry.input());
    println!();
    println!("{}", "📄 生成結果".bold());
    if let Some(items) = entry.unconfirmed() {
        println!("{}", unconfirmed_line(items).yellow().bold());
    }
    println!("{}", entry.output());
}
