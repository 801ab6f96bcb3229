use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::{
    ruby_txt::error::{ErrorKind, ParseError},
    utility::str::CharType,
};

#[derive(Debug, Clone, Serialize)]
pub struct Token {
    // 1-based
    pub line: usize,
    #[serde(flatten)]
    pub kind: TokenKind,
}

// 位置は比較しない
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Token {
    pub fn new(line: usize, kind: TokenKind) -> Self {
        Self { line, kind }
    }

    /// Text carried by text-class tokens, or `"※"` for a rice mark.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Kanji(text)
            | TokenKind::Hiragana(text)
            | TokenKind::Katakana(text)
            | TokenKind::OtherText(text) => Some(text),
            TokenKind::RiceMark => Some("※"),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Kanji(_)
                | TokenKind::Hiragana(_)
                | TokenKind::Katakana(_)
                | TokenKind::OtherText(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "type", content = "content")]
pub enum TokenKind {
    Kanji(String),
    Hiragana(String),
    Katakana(String),
    OtherText(String),

    RubyReading(String), // 《...》
    RubyBar,             // ｜
    RiceMark,            // ※

    Annotation(Annotation), // ［＃...］

    Image(String), // <img src="...">

    LineBreak,
}

/// Body of a `［＃...］` directive. `target` and `spec` are set only when the
/// body starts with `「target」は spec` or `「target」に spec`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub whole: String,
    pub target: Option<String>,
    pub spec: Option<String>,
}

impl Annotation {
    pub fn new(whole: &str) -> Self {
        static REGEX_TARGETED: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^「(?P<target>[^」]+)」[はに](?P<spec>.+)").unwrap());

        let (target, spec) = match REGEX_TARGETED.captures(whole) {
            Some(caps) => (
                Some(caps["target"].to_owned()),
                Some(caps["spec"].to_owned()),
            ),
            None => (None, None),
        };

        Self {
            whole: whole.to_owned(),
            target,
            spec,
        }
    }
}

// "底本：" 以降は奥付なので読まない
static REGEX_FOOTER_CHECKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^底本[：:]").unwrap());

// "【テキスト中に現れる記号について】" を囲む区切り
static REGEX_NOTE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-{20,}$").unwrap());

static REGEX_IMAGE_TAG_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^\s*<img\s+src=("[^"]*"|'[^']*'|[^\s"'>]+?)\s*/?>\s*$"#).unwrap()
});

const NOTES_HEADER: &str = "テキスト中に現れる記号について";

// 字句解析
pub fn tokenize_ruby_txt(txt: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();

    let mut prev_line: Option<&str> = None;
    let mut prev_line_start = 0;
    let mut in_notes = false;

    // 改行は公式に CR+LF とされているが完全には統一されていない
    for (index, raw_line) in txt.split_inclusive('\n').enumerate() {
        let line_number = index + 1;
        let (line, terminated) = match raw_line.strip_suffix('\n') {
            Some(line) => (line.strip_suffix('\r').unwrap_or(line), true),
            None => (raw_line, false),
        };

        if REGEX_FOOTER_CHECKER.is_match(line) {
            trace!("L{}: footer starts, stop tokenizing", line_number);
            break;
        }

        if !in_notes
            && prev_line.is_some_and(|l| REGEX_NOTE_LINE.is_match(l))
            && line.contains(NOTES_HEADER)
        {
            trace!("L{}: skip notes on symbols", line_number);
            in_notes = true;
            tokens.truncate(prev_line_start);
        }

        let line_start = tokens.len();

        if in_notes {
            if REGEX_NOTE_LINE.is_match(line) {
                in_notes = false;
            }
        } else {
            let is_image = tokenize_line(line, line_number, &mut tokens)?;
            if terminated && !is_image {
                tokens.push(Token::new(line_number, TokenKind::LineBreak));
            }
            trace!("L{}: {} tokens", line_number, tokens.len() - line_start);
        }

        prev_line = Some(line);
        prev_line_start = line_start;
    }

    Ok(tokens)
}

// 画像タグだけの行なら true
fn tokenize_line(
    line: &str,
    line_number: usize,
    tokens: &mut Vec<Token>,
) -> Result<bool, ParseError> {
    if let Some(caps) = REGEX_IMAGE_TAG_LINE.captures(line) {
        let source = &caps[1];
        let is_quote = |c: char| c == '"' || c == '\'';
        let source = source.strip_prefix(is_quote).unwrap_or(source);
        let source = source.strip_suffix(is_quote).unwrap_or(source);
        tokens.push(Token::new(
            line_number,
            TokenKind::Image(source.trim().to_owned()),
        ));
        return Ok(true);
    }

    let mut chars: &[char] = &line.chars().collect::<Vec<_>>();

    let mut string_buffer = String::new();

    while !chars.is_empty() {
        let special_token = match CharType::from(chars[0]) {
            char_type @ (CharType::Hiragana | CharType::Katakana | CharType::Kanji) => {
                let len = chars
                    .iter()
                    .take_while(|&&c| CharType::from(c) == char_type)
                    .count();
                let text: String = chars[..len].iter().collect();
                let kind = match char_type {
                    CharType::Hiragana => TokenKind::Hiragana(text),
                    CharType::Katakana => TokenKind::Katakana(text),
                    _ => TokenKind::Kanji(text),
                };
                Some((len, kind))
            }

            CharType::Other => match chars[0] {
                '｜' => Some((1, TokenKind::RubyBar)),
                '※' => Some((1, TokenKind::RiceMark)),

                // 空の "《》" はルビにしない
                '《' => chars
                    .iter()
                    .position(|&c| c == '》')
                    .filter(|&end| 1 < end)
                    .map(|end| {
                        let reading: String = chars[1..end].iter().collect();
                        (end + 1, TokenKind::RubyReading(reading))
                    }),

                '［' if chars.get(1) == Some(&'＃') => {
                    let end = find_bracket_end(chars, 2, '］', '「', '」', '［').ok_or_else(|| {
                        ParseError::new(
                            Some(line_number),
                            ErrorKind::Format(format!("A line ends without '］': {}", line)),
                        )
                    })?;
                    let whole: String = chars[2..(end - 1)].iter().collect();
                    Some((end, TokenKind::Annotation(Annotation::new(&whole))))
                }

                _ => None,
            },
        };

        match special_token {
            Some((len, kind)) => {
                if !string_buffer.is_empty() {
                    tokens.push(Token::new(
                        line_number,
                        TokenKind::OtherText(std::mem::take(&mut string_buffer)),
                    ));
                }

                tokens.push(Token::new(line_number, kind));
                chars = &chars[len..];
            }

            None => {
                string_buffer.push(chars[0]);
                chars = &chars[1..];
            }
        }
    }

    if !string_buffer.is_empty() {
        tokens.push(Token::new(line_number, TokenKind::OtherText(string_buffer)));
    }

    Ok(false)
}

// `close` の直後の位置を返す
// "「...」" の中の "［...］"、その中の "「...」" と入れ子を読み飛ばす
fn find_bracket_end(
    chars: &[char],
    start: usize,
    close: char,
    open: char,
    inner_close: char,
    inner_open: char,
) -> Option<usize> {
    let mut i = start;
    while i < chars.len() {
        let c = chars[i];
        i += 1;

        if c == close {
            return Some(i);
        }

        if c == open {
            i = find_bracket_end(chars, i, inner_close, inner_open, close, open)?;
        }
    }
    None
}
