//! Interactive session: collect notes, normalize them, keep history.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use colored::Colorize;

use memo_core::{HistoryLog, NotePipeline};

use crate::render;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    History,
    Show(usize),
    Export(PathBuf),
    Clear,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    Command(SessionCommand),
    /// A line holding only "." ends the current note.
    Submit,
    Line(String),
    Invalid(String),
}

pub fn parse_line(line: &str) -> SessionInput {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    if trimmed.trim() == "." {
        return SessionInput::Submit;
    }

    // Only "/" directly followed by a known name is a command; anything
    // else starting with "/" is note text.
    let Some(command) = trimmed.trim().strip_prefix('/') else {
        return SessionInput::Line(trimmed.to_string());
    };

    let mut parts = command.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or("");
    let arg = parts.next().map(str::trim).unwrap_or("");

    match name {
        "history" => SessionInput::Command(SessionCommand::History),
        "clear" => SessionInput::Command(SessionCommand::Clear),
        "help" => SessionInput::Command(SessionCommand::Help),
        "quit" | "exit" => SessionInput::Command(SessionCommand::Quit),
        "show" => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => SessionInput::Command(SessionCommand::Show(n)),
            _ => SessionInput::Invalid("usage: /show N (1 = newest)".to_string()),
        },
        "export" if !arg.is_empty() => {
            SessionInput::Command(SessionCommand::Export(PathBuf::from(arg)))
        }
        "export" => SessionInput::Invalid("usage: /export PATH".to_string()),
        _ => SessionInput::Line(trimmed.to_string()),
    }
}

const HELP: &str = "メモを入力し、'.' だけの行で送信します。\n\
/history  履歴を一覧表示\n\
/show N   N番目の履歴を表示 (1 = 最新)\n\
/export P 履歴をJSONで保存\n\
/clear    履歴をクリア\n\
/quit     終了";

pub struct Session {
    pipeline: NotePipeline,
    history: HistoryLog,
    buffer: Vec<String>,
}

impl Session {
    pub fn new(pipeline: NotePipeline, history: HistoryLog) -> Self {
        Self {
            pipeline,
            history,
            buffer: Vec::new(),
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        println!("{}", "📋 面談メモ整理ツール".cyan().bold());
        println!("{}", format!("Model: {}", self.pipeline.model()).dimmed());
        println!("{}", HELP.dimmed());
        println!();

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            if self.buffer.is_empty() {
                print!("{} ", "📝".cyan());
                io::stdout().flush()?;
            }

            let Some(line) = lines.next() else {
                // EOF submits whatever is pending.
                if !self.buffer.is_empty() {
                    self.submit().await;
                }
                break;
            };
            let line = line?;

            match parse_line(&line) {
                SessionInput::Line(text) => self.buffer.push(text),
                SessionInput::Submit => self.submit().await,
                SessionInput::Invalid(message) => println!("{}", message.red()),
                SessionInput::Command(SessionCommand::Quit) => break,
                SessionInput::Command(command) => self.handle(command)?,
            }
        }

        println!("{}", "👋 Goodbye!".cyan());
        Ok(())
    }

    async fn submit(&mut self) {
        let note = self.buffer.join("\n");
        self.buffer.clear();

        println!("{}", "AIがメモを整理中...".dimmed());
        match self.pipeline.normalize_into(&note, &mut self.history).await {
            Ok(result) => {
                println!();
                render::print_result(&result);
            }
            Err(err) => render::print_error(&err),
        }
        println!();
    }

    fn handle(&mut self, command: SessionCommand) -> anyhow::Result<()> {
        match command {
            SessionCommand::History => render::print_history(&self.history),
            SessionCommand::Show(n) => match self.history.get(n - 1) {
                Some(entry) => render::print_entry(entry),
                None => println!("{}", format!("履歴 {} はありません", n).red()),
            },
            SessionCommand::Export(path) => {
                std::fs::write(&path, self.history.to_json()?)?;
                println!(
                    "{}",
                    format!("{}件の履歴を {} に保存しました", self.history.len(), path.display())
                        .green()
                );
            }
            SessionCommand::Clear => {
                self.history.clear();
                println!("{}", "🗑️ 履歴をクリアしました".green());
            }
            SessionCommand::Help => println!("{}", HELP),
            SessionCommand::Quit => {}
        }
        Ok(())
    }
}
