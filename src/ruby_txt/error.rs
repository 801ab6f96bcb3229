use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("{0}")]
    Format(String),

    #[error("Not found block start tag for {0}")]
    NoBlockStart(&'static str),

    #[error("Not found block end tag for {0}")]
    NoBlockEnd(String),

    #[error("Unmatched block tag: left is {left}, but right is {right}")]
    UnmatchedBlock { left: String, right: &'static str },

    #[error("Cannot split block element by forward ref: {node} / {text:?}")]
    SplitAcrossForwardRef { node: String, text: String },

    #[error("Unexpected word{}", .0.as_ref().map(|w| format!(": {}", w)).unwrap_or_default())]
    UnexpectedWord(Option<String>),

    // 入力ではなく呼び出し側の不整合
    #[error("Implementation error: {0}")]
    Implementation(String),
}

/// An [`ErrorKind`] located at the source line being processed when it was
/// raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}{}", .line.map(|l| format!(" at L{}", l)).unwrap_or_default())]
pub struct ParseError {
    pub line: Option<usize>,
    pub kind: ErrorKind,
}

impl ParseError {
    pub fn new(line: Option<usize>, kind: ErrorKind) -> Self {
        Self { line, kind }
    }
}
