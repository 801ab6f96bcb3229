#![allow(dead_code)]

use aozora_tree::ruby_txt::{
    self,
    error::ParseError,
    parser::ParserOption,
    tree::{Block, BlockKind, Node, NodeKind},
};

pub fn text(value: &str) -> Node {
    Node::new_text(value)
}

pub fn line_break() -> Node {
    Node::new(NodeKind::LineBreak)
}

pub fn node(kind: BlockKind, children: Vec<Node>) -> Node {
    Node::new_block(kind, children)
}

pub fn block(children: Vec<Node>) -> Block {
    Block::new(BlockKind::Block, children)
}

pub fn document(children: Vec<Node>) -> Node {
    node(BlockKind::Document, children)
}

pub fn ruby(reading: Option<&str>, children: Vec<Node>) -> Node {
    node(
        BlockKind::Ruby {
            reading: reading.map(str::to_owned),
        },
        children,
    )
}

pub fn top(level: usize, children: Vec<Node>) -> Node {
    node(
        BlockKind::Top {
            level: Some(level),
            fill: None,
        },
        children,
    )
}

pub fn bottom(offset: Option<usize>, children: Vec<Node>) -> Node {
    node(BlockKind::Bottom { offset }, children)
}

pub fn parse(text: &str) -> Node {
    ruby_txt::parse(text, ParserOption::default()).unwrap()
}

pub fn parse_strict(text: &str) -> Result<Node, ParseError> {
    ruby_txt::parse(text, ParserOption::strict())
}

pub fn parse_err(text: &str) -> ParseError {
    ruby_txt::parse(text, ParserOption::default()).unwrap_err()
}
