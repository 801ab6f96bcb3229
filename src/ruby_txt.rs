// 青空文庫 注記一覧 https://www.aozora.gr.jp/annotation/ に従った注記付きテキストの解析
//
// フォーマットから外れたものは基本的にエラーとするが，一部フールプルーフする：
// - 改行は公式に CR+LF とされているが完全には統一されていない
// - "底本：" は "底本:" でもよい
// - 解釈できない注記はエラーにせず Unknown として残す

pub mod annotation_parser;
pub mod error;
pub mod gaiji;
pub mod parser;
pub mod tokenizer;
pub mod tree;
pub mod utility;
pub mod walker;

use crate::ruby_txt::{
    error::ParseError,
    parser::{Parser, ParserOption},
    tokenizer::{tokenize_ruby_txt, Token},
    tree::Node,
};

/// Splits `text` into line-numbered tokens.
pub fn lex(text: &str) -> Result<Vec<Token>, ParseError> {
    tokenize_ruby_txt(text)
}

/// Parses `text` into a `Document` node.
pub fn parse(text: &str, option: ParserOption) -> Result<Node, ParseError> {
    let tokens = tokenize_ruby_txt(text)?;
    Parser::new(tokens, option).parse()
}
