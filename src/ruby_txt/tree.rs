use std::ops::Range;

use serde::Serialize;

use crate::ruby_txt::{
    error::ErrorKind,
    gaiji::{JisChar, UnicodeChar},
    tokenizer::Token,
    utility::MidashiLevel,
};

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    // 1-based
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

// 位置は比較しない
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum NodeKind {
    Text { value: String },
    Block(Block),

    LineBreak,
    PageBreak,      // ［＃改ページ］
    SheetBreak,     // ［＃改丁］
    ParagraphBreak, // ［＃改段］

    Image { source: String },

    // 解釈できなかった注記など
    Unknown { token: Token },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub kind: BlockKind,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "name")]
pub enum BlockKind {
    // 分割や置き換えの途中で使う入れ物
    Block,
    Document,

    Ruby {
        reading: Option<String>,
    },

    Bold,             // ［＃「○○」は太字］
    Dots,             // ［＃「○○」に傍点］
    Line,             // ［＃「○○」に傍線］
    Yoko,             // ［＃「○○」は縦中横］
    HorizontalCenter, // ［＃ページの左右中央］

    // ［＃地付き］ => { offset: None }, ［＃地から○字上げ］ => { offset: ○ }
    Bottom {
        offset: Option<usize>,
    },
    // ［＃ここから○字下げ、●字詰め］ => { level: ○, fill: ● }
    Top {
        level: Option<usize>,
        fill: Option<usize>,
    },
    // ［＃ここから○字下げ、折り返して●字下げ］ => { level: ○, turned_level: ● }
    // 改行天付きなら level は None
    TopWithTurn {
        level: Option<usize>,
        turned_level: usize,
        fill: Option<usize>,
    },

    Heading {
        level: MidashiLevel,
    },
    WindowHeading {
        level: MidashiLevel,
    },

    // ※［＃...］
    Note {
        spec: String,
    },
    Jis {
        spec: String,
        char: JisChar,
    },
    Unicode {
        spec: String,
        char: UnicodeChar,
    },
}

/// Kind of a block without its attributes, as named by closing directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockClass {
    Block,
    Document,
    Ruby,
    Bold,
    Dots,
    Line,
    Yoko,
    HorizontalCenter,
    Bottom,
    Top,
    TopWithTurn,
    Heading,
    WindowHeading,
    Note,
    Jis,
    Unicode,
}

impl BlockClass {
    pub fn name(self) -> &'static str {
        match self {
            Self::Block => "Block",
            Self::Document => "Document",
            Self::Ruby => "Ruby",
            Self::Bold => "Bold",
            Self::Dots => "Dots",
            Self::Line => "Line",
            Self::Yoko => "Yoko",
            Self::HorizontalCenter => "HorizontalCenter",
            Self::Bottom => "Bottom",
            Self::Top => "Top",
            Self::TopWithTurn => "TopWithTurn",
            Self::Heading => "Heading",
            Self::WindowHeading => "WindowHeading",
            Self::Note => "Note",
            Self::Jis => "JIS",
            Self::Unicode => "Unicode",
        }
    }
}

impl BlockKind {
    pub fn class(&self) -> BlockClass {
        match self {
            Self::Block => BlockClass::Block,
            Self::Document => BlockClass::Document,
            Self::Ruby { .. } => BlockClass::Ruby,
            Self::Bold => BlockClass::Bold,
            Self::Dots => BlockClass::Dots,
            Self::Line => BlockClass::Line,
            Self::Yoko => BlockClass::Yoko,
            Self::HorizontalCenter => BlockClass::HorizontalCenter,
            Self::Bottom { .. } => BlockClass::Bottom,
            Self::Top { .. } => BlockClass::Top,
            Self::TopWithTurn { .. } => BlockClass::TopWithTurn,
            Self::Heading { .. } => BlockClass::Heading,
            Self::WindowHeading { .. } => BlockClass::WindowHeading,
            Self::Note { .. } => BlockClass::Note,
            Self::Jis { .. } => BlockClass::Jis,
            Self::Unicode { .. } => BlockClass::Unicode,
        }
    }

    pub fn name(&self) -> &'static str {
        self.class().name()
    }

    /// Ruby and page-centered blocks must never be partially covered by a
    /// split range.
    pub fn splittable(&self) -> bool {
        !matches!(self, Self::Ruby { .. } | Self::HorizontalCenter)
    }

    /// Whether a closing directive for `class` ends this block.
    /// "ここで字下げ終わり" also ends an indent with turn.
    pub fn closes_with(&self, class: BlockClass) -> bool {
        self.class() == class || (self.class() == BlockClass::TopWithTurn && class == BlockClass::Top)
    }
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self { line: None, kind }
    }

    pub fn new_text(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Text {
            value: value.into(),
        })
    }

    pub fn new_block(kind: BlockKind, children: Vec<Node>) -> Self {
        Self::new(NodeKind::Block(Block::new(kind, children)))
    }

    pub fn with_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }

    pub fn name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Text { .. } => "Text",
            NodeKind::Block(block) => block.kind.name(),
            NodeKind::LineBreak => "LineBreak",
            NodeKind::PageBreak => "PageBreak",
            NodeKind::SheetBreak => "SheetBreak",
            NodeKind::ParagraphBreak => "ParagraphBreak",
            NodeKind::Image { .. } => "Image",
            NodeKind::Unknown { .. } => "Unknown",
        }
    }

    pub fn text(&self) -> String {
        match &self.kind {
            NodeKind::Text { value } => value.clone(),
            NodeKind::Block(block) => block.text(),
            _ => String::new(),
        }
    }

    // 文字数
    pub fn text_len(&self) -> usize {
        match &self.kind {
            NodeKind::Text { value } => value.chars().count(),
            NodeKind::Block(block) => block.text_len(),
            _ => 0,
        }
    }

    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Block(block) => &block.children,
            _ => &[],
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match &self.kind {
            NodeKind::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::LineBreak
                | NodeKind::PageBreak
                | NodeKind::SheetBreak
                | NodeKind::ParagraphBreak
        )
    }

    // 末尾が改行類か（ブロックなら中の末尾を見る）
    pub fn ends_with_break(&self) -> bool {
        match &self.kind {
            NodeKind::Block(block) => block.children.last().is_some_and(Node::ends_with_break),
            _ => self.is_break(),
        }
    }

    /// Splits at the character position `pos`. Empty sides are `None`.
    pub fn split(self, pos: usize) -> Result<(Option<Node>, Option<Node>), ErrorKind> {
        self.split_inner(pos, None)
    }

    fn split_inner(
        self,
        pos: usize,
        target: Option<&str>,
    ) -> Result<(Option<Node>, Option<Node>), ErrorKind> {
        let line = self.line;
        match self.kind {
            NodeKind::Text { value } => {
                let (l, r) = value.split_at(byte_offset(&value, pos));
                Ok((text_node(l, line), text_node(r, line)))
            }

            NodeKind::Block(block) => {
                let (l, r) = block.split_inner(pos, target)?;
                Ok((l.map(|b| b.into_node(line)), r.map(|b| b.into_node(line))))
            }

            kind => Ok((Some(Node { line, kind }), None)),
        }
    }

    /// Splits around the last occurrence of `target` into
    /// (before, target, after).
    pub fn split_by_text(
        self,
        target: &str,
    ) -> Result<(Option<Node>, Node, Option<Node>), ErrorKind> {
        let line = self.line;
        match self.kind {
            NodeKind::Text { value } => {
                let start = find_last(&value, target)?;
                let end = start + target.len();
                Ok((
                    text_node(&value[..start], line),
                    Node::new_text(&value[start..end]).with_line(line),
                    text_node(&value[end..], line),
                ))
            }

            NodeKind::Block(block) => {
                let (l, c, r) = block.split_by_text(target)?;
                Ok((
                    l.map(|b| b.into_node(line)),
                    c.into_node(line),
                    r.map(|b| b.into_node(line)),
                ))
            }

            _ => Err(not_found(target)),
        }
    }
}

impl Block {
    pub fn new(kind: BlockKind, children: Vec<Node>) -> Self {
        Self { kind, children }
    }

    pub fn into_node(self, line: Option<usize>) -> Node {
        Node {
            line,
            kind: NodeKind::Block(self),
        }
    }

    pub fn text(&self) -> String {
        self.children.iter().map(Node::text).collect()
    }

    pub fn text_len(&self) -> usize {
        self.children.iter().map(Node::text_len).sum()
    }

    pub fn last(&self) -> Option<&Node> {
        self.children.last()
    }

    pub fn pop(&mut self) -> Option<Node> {
        self.children.pop()
    }

    /// Appends `node`, joining it to a preceding text node.
    pub fn push(&mut self, node: Node) {
        if let NodeKind::Text { value } = &node.kind {
            if let Some(Node {
                kind: NodeKind::Text { value: last },
                ..
            }) = self.children.last_mut()
            {
                last.push_str(value);
                return;
            }
        }
        self.children.push(node);
    }

    /// Children after the last line break child, or all of them.
    pub fn last_line_range(&self) -> Range<usize> {
        let start = self
            .children
            .iter()
            .rposition(|node| matches!(node.kind, NodeKind::LineBreak))
            .map_or(0, |i| i + 1);
        start..self.children.len()
    }

    /// Takes the children in [`Block::last_line_range`] out as a plain block,
    /// and puts what `transform` returns back in their place.
    pub fn replace_last_line<F, R>(&mut self, transform: F) -> Result<(), ErrorKind>
    where
        F: FnOnce(Block) -> Result<R, ErrorKind>,
        R: Into<Vec<Node>>,
    {
        let range = self.last_line_range();
        let last_line = Block::new(BlockKind::Block, self.children.drain(range).collect());
        let replacement = transform(last_line)?.into();
        self.children.extend(replacement);
        Ok(())
    }

    /// Splits at the character position `pos`. Both sides keep this block's
    /// kind, and empty sides are `None`.
    pub fn split(self, pos: usize) -> Result<(Option<Block>, Option<Block>), ErrorKind> {
        self.split_inner(pos, None)
    }

    fn split_inner(
        self,
        pos: usize,
        target: Option<&str>,
    ) -> Result<(Option<Block>, Option<Block>), ErrorKind> {
        if !self.kind.splittable() && 0 < pos && pos < self.text_len() {
            return Err(ErrorKind::SplitAcrossForwardRef {
                node: self.kind.name().to_owned(),
                text: target.map_or_else(|| self.text(), str::to_owned),
            });
        }

        let Block { kind, children } = self;

        let mut left = Vec::new();
        let mut right = Vec::new();
        let mut consumed = 0;
        let mut passed = false;

        for child in children {
            if passed {
                right.push(child);
                continue;
            }

            let len = child.text_len();
            if consumed + len <= pos {
                consumed += len;
                left.push(child);
                continue;
            }

            passed = true;
            let local = pos - consumed;
            if local == 0 {
                right.push(child);
            } else {
                let (l, r) = child.split_inner(local, target)?;
                left.extend(l);
                right.extend(r);
            }
        }

        Ok((compact(&kind, left), compact(&kind, right)))
    }

    /// Splits around the last occurrence of `target` into
    /// (before, target, after), each keeping this block's kind.
    pub fn split_by_text(
        self,
        target: &str,
    ) -> Result<(Option<Block>, Block, Option<Block>), ErrorKind> {
        let text = self.text();
        let found = find_last(&text, target)?;
        let start = text[..found].chars().count();
        let end = start + target.chars().count();

        if !self.kind.splittable() {
            if start == 0 && end == text.chars().count() {
                return Ok((None, self, None));
            }
            return Err(ErrorKind::SplitAcrossForwardRef {
                node: self.kind.name().to_owned(),
                text: target.to_owned(),
            });
        }

        let Block { kind, children } = self;

        let mut before = Vec::new();
        let mut overlapped = Vec::new();
        let mut after = Vec::new();

        let mut consumed = 0;
        for child in children {
            let child_start = consumed;
            consumed += child.text_len();

            if consumed <= start {
                before.push(child);
            } else if end <= child_start {
                after.push(child);
            } else {
                overlapped.push((child, child_start, consumed));
            }
        }

        let mut heads = Vec::new();
        let mut center = Vec::new();
        let mut tails = Vec::new();

        let last_index = overlapped.len().saturating_sub(1);
        for (i, (child, child_start, child_end)) in overlapped.into_iter().enumerate() {
            let local_start = start.saturating_sub(child_start);
            let local_end = end.min(child_end) - child_start;
            let covered = local_start == 0 && local_end == child_end - child_start;

            if covered {
                center.push(child);
            } else if i == 0 && i == last_index {
                let (l, c, r) = child.split_by_text(target)?;
                heads.extend(l);
                center.push(c);
                tails.extend(r);
            } else if i == 0 {
                let (l, r) = child.split_inner(local_start, Some(target))?;
                heads.extend(l);
                center.extend(r);
            } else if i == last_index {
                let (l, r) = child.split_inner(local_end, Some(target))?;
                center.extend(l);
                tails.extend(r);
            } else {
                center.push(child);
            }
        }

        before.extend(heads);
        tails.extend(after);

        let center = compact(&kind, center).ok_or_else(|| not_found(target))?;
        Ok((compact(&kind, before), center, compact(&kind, tails)))
    }
}

impl From<Block> for Vec<Node> {
    fn from(block: Block) -> Self {
        block.children
    }
}

// 連続する Text を纏めて `kind` の入れ物に入れ直す
fn compact(kind: &BlockKind, nodes: Vec<Node>) -> Option<Block> {
    if nodes.is_empty() {
        return None;
    }

    let mut block = Block::new(kind.clone(), Vec::with_capacity(nodes.len()));
    for node in nodes {
        block.push(node);
    }
    Some(block)
}

fn text_node(value: &str, line: Option<usize>) -> Option<Node> {
    if value.is_empty() {
        None
    } else {
        Some(Node::new_text(value).with_line(line))
    }
}

fn byte_offset(s: &str, pos: usize) -> usize {
    s.char_indices().nth(pos).map_or(s.len(), |(i, _)| i)
}

fn find_last(text: &str, target: &str) -> Result<usize, ErrorKind> {
    if target.is_empty() {
        return Err(ErrorKind::Implementation("Empty target".to_owned()));
    }
    text.rfind(target).ok_or_else(|| not_found(target))
}

fn not_found(target: &str) -> ErrorKind {
    ErrorKind::Implementation(format!("Not found the target: {}", target))
}
