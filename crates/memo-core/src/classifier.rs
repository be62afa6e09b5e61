//! Maps generation failure messages to user-facing categories.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Connection,
    Authentication,
    RateLimit,
    Timeout,
    Unknown,
}

impl ErrorCategory {
    pub fn headline(self) -> &'static str {
        match self {
            Self::Connection => "❌ 接続エラーが発生しました",
            Self::Authentication => "❌ APIキーエラーが発生しました",
            Self::RateLimit => "❌ リクエスト制限に達しました",
            Self::Timeout => "❌ タイムアウトエラーが発生しました",
            Self::Unknown => "❌ エラーが発生しました",
        }
    }

    /// Guidance shown under the headline. Only `Unknown` repeats the raw
    /// message, the other categories speak for themselves.
    pub fn guidance(self, message: &str) -> String {
        match self {
            Self::Connection => "インターネット接続を確認してください。VPNを使用している場合は、VPNの接続状態を確認してください。".to_string(),
            Self::Authentication => "APIキーが正しく設定されているか確認してください。GEMINI_API_KEY または設定ファイルを確認してください。".to_string(),
            Self::RateLimit => "Gemini APIの無料枠には1分あたりのリクエスト数に制限があります。しばらく待ってから再試行してください。".to_string(),
            Self::Timeout => "リクエストがタイムアウトしました。インターネット接続を確認して、もう一度お試しください。".to_string(),
            Self::Unknown => format!("エラー内容: {}", message),
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connection => "connection",
            Self::Authentication => "authentication",
            Self::RateLimit => "rate_limit",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Shown after every failure, whatever the category.
pub const GENERAL_HINT: &str =
    "💡 問題が解決しない場合は、APIキーが正しく設定されているか、インターネット接続を確認してください。";

/// Shown when the note is empty; never reaches the generator.
pub const EMPTY_INPUT_WARNING: &str = "⚠️ 入力テキストが空です。メモを入力してください。";

/// Case-insensitive "any token is a substring" predicate.
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    category: ErrorCategory,
    tokens: Vec<String>,
}

impl ClassificationRule {
    pub fn new<I, S>(category: ErrorCategory, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            category,
            tokens: tokens
                .into_iter()
                .map(|token| token.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    /// `lowered` must already be lowercase.
    fn matches(&self, lowered: &str) -> bool {
        self.tokens.iter().any(|token| lowered.contains(token.as_str()))
    }
}

/// Ordered rule list; the first matching rule decides the category.
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    rules: Vec<ClassificationRule>,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::with_rules(default_rules())
    }
}

/// Order matters: "failed" sends a message to Connection even when it also
/// mentions a timeout.
pub fn default_rules() -> Vec<ClassificationRule> {
    vec![
        ClassificationRule::new(ErrorCategory::Connection, ["connection", "failed"]),
        ClassificationRule::new(
            ErrorCategory::Authentication,
            ["api key", "api_key", "authentication"],
        ),
        ClassificationRule::new(ErrorCategory::RateLimit, ["quota", "rate limit", "limit"]),
        ClassificationRule::new(ErrorCategory::Timeout, ["timeout", "timed out"]),
    ]
}

impl ErrorClassifier {
    pub fn with_rules(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    pub fn classify(&self, message: &str) -> ErrorCategory {
        let lowered = message.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map_or(ErrorCategory::Unknown, ClassificationRule::category)
    }
}

/// Classify with the default rule order.
pub fn classify(message: &str) -> ErrorCategory {
    ErrorClassifier::default().classify(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_token_messages() {
        assert_eq!(classify("connection reset"), ErrorCategory::Connection);
        assert_eq!(classify("Connection refused"), ErrorCategory::Connection);
        assert_eq!(classify("invalid api_key provided"), ErrorCategory::Authentication);
        assert_eq!(classify("API key not valid"), ErrorCategory::Authentication);
        assert_eq!(classify("Authentication error: HTTP 403"), ErrorCategory::Authentication);
        assert_eq!(classify("Quota exceeded for metric"), ErrorCategory::RateLimit);
        assert_eq!(classify("Rate limit exceeded: HTTP 429"), ErrorCategory::RateLimit);
        assert_eq!(classify("Request timed out"), ErrorCategory::Timeout);
        assert_eq!(classify("Request timeout: deadline"), ErrorCategory::Timeout);
        assert_eq!(classify("something odd"), ErrorCategory::Unknown);
        assert_eq!(classify(""), ErrorCategory::Unknown);
    }

    #[test]
    fn connection_outranks_timeout() {
        assert_eq!(classify("timeout: request failed"), ErrorCategory::Connection);
    }

    #[test]
    fn authentication_outranks_rate_limit() {
        assert_eq!(
            classify("API key exceeded its daily limit"),
            ErrorCategory::Authentication
        );
    }

    #[test]
    fn rate_limit_outranks_timeout() {
        assert_eq!(classify("limit reached after timeout"), ErrorCategory::RateLimit);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("CONNECTION LOST"), ErrorCategory::Connection);
        assert_eq!(classify("QUOTA"), ErrorCategory::RateLimit);
        assert_eq!(classify("TimeOut"), ErrorCategory::Timeout);
    }

    #[test]
    fn default_rule_order_is_fixed() {
        let order: Vec<ErrorCategory> = ErrorClassifier::default()
            .rules()
            .iter()
            .map(ClassificationRule::category)
            .collect();
        assert_eq!(
            order,
            vec![
                ErrorCategory::Connection,
                ErrorCategory::Authentication,
                ErrorCategory::RateLimit,
                ErrorCategory::Timeout,
            ]
        );
    }

    #[test]
    fn custom_rules_extend_classification() {
        let mut rules = vec![ClassificationRule::new(ErrorCategory::RateLimit, ["RESOURCE_EXHAUSTED"])];
        rules.extend(default_rules());
        let classifier = ErrorClassifier::with_rules(rules);

        assert_eq!(classifier.classify("status RESOURCE_EXHAUSTED"), ErrorCategory::RateLimit);
        assert_eq!(classifier.classify("connection reset"), ErrorCategory::Connection);
    }

    #[test]
    fn every_category_has_distinct_guidance() {
        let categories = [
            ErrorCategory::Connection,
            ErrorCategory::Authentication,
            ErrorCategory::RateLimit,
            ErrorCategory::Timeout,
            ErrorCategory::Unknown,
        ];
        let texts: std::collections::HashSet<String> =
            categories.iter().map(|c| c.guidance("boom")).collect();
        assert_eq!(texts.len(), categories.len());
        assert!(ErrorCategory::Unknown.guidance("boom").contains("boom"));
        assert!(!ErrorCategory::Timeout.guidance("boom").contains("boom"));
    }
}
