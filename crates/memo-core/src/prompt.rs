//! Prompt construction for the interview-memo template.

/// Placed between the instruction template and the user's note.
pub const NOTE_SEPARATOR: &str = "\n\n以下のメモを整理して整形してください：\n\n";

/// How the model should treat sections it has no information for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownFieldPolicy {
    /// Leave the section and its header out entirely.
    Omit,
    /// Keep the section and write "不明".
    Placeholder,
}

impl UnknownFieldPolicy {
    pub fn from_omit_flag(omit_unknown_fields: bool) -> Self {
        if omit_unknown_fields {
            Self::Omit
        } else {
            Self::Placeholder
        }
    }

    fn rules(self) -> &'static str {
        match self {
            Self::Omit => {
                "【重要：不明な情報の扱い】\n\
                 - 情報が不明な場合は、その項目を完全に省略してください。「不明」「不明の教室」「不明な場合」などの記述は一切不要です。\n\
                 - 推測できない情報は書かないでください。空欄にするか、その項目自体を省略してください。\n"
            }
            Self::Placeholder => {
                "【重要：不明な情報の扱い】\n\
                 - 情報が不明な場合は、項目を省略せず「不明」と記述してください。\n\
                 - 推測できない情報は書かないでください。\n"
            }
        }
    }

    fn section_note(self) -> &'static str {
        match self {
            Self::Omit => "※情報が不明な場合はこの項目を省略してください",
            Self::Placeholder => "※情報が不明な場合は「不明」と記述してください",
        }
    }
}

const ROLE: &str = "あなたはファイナンシャルプランナー（FP）の面談メモを整理・編集する専門家です。\n";

const CONVERSION_RULES: &str = "【変換ルール】\n\
- 保険業界用語の補正を行ってください（例：iOSM→あいおい生命、20日7日→27日など）。\n\
- 文体は「だ・である」調で統一してください。\n\
- 誤変換や文脈の乱れを自然に補正してください。\n\
- 人名は漢字変換せず、カタカナで表記してください（例：たかしさん→タカシさん）。\n\
- 敬称は「様」ではなく「さん」を使用してください。\n";

const MISSING_CHECK: &str = "【不足情報のチェック】\n\
以下の要素が入力内容に含まれているか確認してください：\n\
1. 面談日時・形式\n\
2. 決定事項・次回の予定\n\
3. ToDo\n\
\n\
これらが明確に含まれていない場合、出力の一番下に「⚠️ 未確認: （不足項目をカンマ区切りで列挙）」とだけ短く追記してください。\n\
全て揃っている場合は、この警告行は表示しないでください。\n";

const SEPARATOR_LINE: &str = "--------------------------------------------------";

/// Builds the full instruction template and joins it with a note.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system_prompt: String,
}

impl PromptBuilder {
    pub fn new(policy: UnknownFieldPolicy) -> Self {
        Self {
            system_prompt: system_prompt(policy),
        }
    }

    /// Use a caller-supplied template verbatim.
    pub fn with_system_prompt(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn build_for(&self, user_note: &str) -> String {
        build(&self.system_prompt, user_note)
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(UnknownFieldPolicy::Omit)
    }
}

/// Concatenate the template, the fixed separator phrase and the note.
pub fn build(system_prompt: &str, user_note: &str) -> String {
    let mut prompt =
        String::with_capacity(system_prompt.len() + NOTE_SEPARATOR.len() + user_note.len());
    prompt.push_str(system_prompt);
    prompt.push_str(NOTE_SEPARATOR);
    prompt.push_str(user_note);
    prompt
}

/// Render the interview-memo template for the given unknown-field policy.
pub fn system_prompt(policy: UnknownFieldPolicy) -> String {
    let note = policy.section_note();
    let todo_note = match policy {
        UnknownFieldPolicy::Omit => {
            "※なしの場合は「なし」と記述、情報が不明な場合はこの項目を省略してください"
        }
        UnknownFieldPolicy::Placeholder => {
            "※なしの場合は「なし」と記述、情報が不明な場合は「不明」と記述してください"
        }
    };

    format!(
        "{ROLE}\n{CONVERSION_RULES}\n{rules}\n{MISSING_CHECK}\n\
【出力フォーマット】\n\
以下の構成を厳守してください。\n\
\n\
{SEPARATOR_LINE}\n\
■面談日時・形式\n\
YYYY年MM月DD日 HH:MM〜（形式）\n\
{note}\n\
\n\
■面談概要\n\
（要約）\n\
\n\
■詳細内容\n\
（箇条書きで、何について話したかを記載）\n\
例：「終身保険と定期保険の違いについて説明した」「保険金額の試算について話し合った」\n\
※「検討した」ではなく「話した」「説明した」「話し合った」などの表現を使用\n\
\n\
■決定事項・今後の予定\n\
（内容）\n\
{note}\n\
\n\
■ToDo\n\
（内容）\n\
{todo_note}\n\
\n\
（不足がある場合のみ以下を表示）\n\
{SEPARATOR_LINE}\n\
⚠️ **未確認**: （不足項目名）, （不足項目名）\n\
{SEPARATOR_LINE}\n",
        rules = policy.rules(),
    )
}
