use std::fmt::Display;

use crate::CharRange;

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum Error {
    #[error("Invalid grammar part at position {index}: {reason}.")]
    InvalidGrammarPart { index: usize, reason: String },
    #[error("Invariant violated: {0}.")]
    InvariantViolation(InvariantViolation),
    #[error("Number of chars in ranges must be an even number, got {0}.")]
    OddRangeBounds(usize),
    #[error("Cannot redefine the action of an already defined terminal: {0}.")]
    TerminalRedefined(String),
}

/// 调用方破坏了前置条件, 不应该被恢复, 只用于尽早暴露构造顺序上的错误.
#[derive(thiserror::Error, Debug, Eq, PartialEq, Clone)]
pub enum InvariantViolation {
    #[error("range {incoming} shares a boundary with existing range {existing}")]
    SharedBoundary {
        existing: CharRange,
        incoming: CharRange,
    },
}

impl Error {
    pub(crate) fn invalid_grammar_part(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidGrammarPart {
            index,
            reason: reason.into(),
        }
    }
}

impl From<InvariantViolation> for Error {
    fn from(value: InvariantViolation) -> Self {
        Self::InvariantViolation(value)
    }
}

/// 语法分析时的错误上下文, 作为错误恢复归约 ([`crate::Production::set_error_function`]) 的参数.
#[derive(thiserror::Error, Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseError {
    message: String,
    /// 实际遇到的 token 文本, 在输入结束时为 [`None`].
    found: Option<String>,
    /// 当前状态下期望的 token 名称.
    expected: Vec<String>,
    line: usize,
    column: usize,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.message, self.line, self.column)?;
        match &self.found {
            Some(found) => write!(f, ", found {found:?}")?,
            None => write!(f, ", found end of input")?,
        }
        if !self.expected.is_empty() {
            write!(f, ", expected one of: {}", self.expected.join(", "))?;
        }
        Ok(())
    }
}

impl ParseError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_found(mut self, found: impl Into<String>) -> Self {
        self.found = Some(found.into());
        self
    }

    #[must_use]
    pub fn with_expected<S: Into<String>>(mut self, expected: impl IntoIterator<Item = S>) -> Self {
        self.expected = expected.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn found(&self) -> Option<&str> {
        self.found.as_deref()
    }

    #[must_use]
    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }
}
