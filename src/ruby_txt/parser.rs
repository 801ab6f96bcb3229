use std::{iter::Peekable, mem, vec};

use log::debug;

use crate::ruby_txt::{
    annotation_parser::{parse_directive, parse_note, parse_targeted, Directive},
    error::{ErrorKind, ParseError},
    tokenizer::{Annotation, Token, TokenKind},
    tree::{Block, BlockClass, BlockKind, Node, NodeKind},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserOption {
    // 最後にブロックが閉じられているか確認する
    pub check_unclosed_blocks: bool,
    // 左右中央の次の改ページを確認する（未使用）
    pub check_page_break_for_horizontal_center: bool,
}

impl ParserOption {
    pub fn strict() -> Self {
        Self {
            check_unclosed_blocks: true,
            check_page_break_for_horizontal_center: true,
        }
    }
}

// 開いているブロックの外側
struct Frame {
    saved: Block,
    saved_line: Option<usize>,
    // ［＃ここから○字下げ、ページの左右中央に］ のように複数まとめて開いたもの
    exit_from: Option<BlockClass>,
    count: usize,
}

/// Builds a document tree out of a token sequence.
pub struct Parser {
    option: ParserOption,
    tokens: Peekable<vec::IntoIter<Token>>,

    // 処理中のトークンの行
    line: Option<usize>,

    current: Block,
    current_line: Option<usize>,
    stack: Vec<Frame>,

    text_buffer: Vec<Token>,
    ignore_linebreak: bool,
    one_line: Option<BlockClass>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, option: ParserOption) -> Self {
        Self {
            option,
            tokens: tokens.into_iter().peekable(),
            line: None,
            current: Block::new(BlockKind::Document, Vec::new()),
            current_line: None,
            stack: Vec::new(),
            text_buffer: Vec::new(),
            ignore_linebreak: false,
            one_line: None,
        }
    }

    pub fn parse(mut self) -> Result<Node, ParseError> {
        while let Some(token) = self.tokens.next() {
            self.line = Some(token.line);
            self.on_token(token)
                .map_err(|kind| ParseError::new(self.line, kind))?;
        }

        self.flush_text();
        self.on_end()
    }

    fn on_token(&mut self, token: Token) -> Result<(), ErrorKind> {
        if token.is_text() {
            self.ignore_linebreak = false;
            self.text_buffer.push(token);
            return Ok(());
        }

        let line = token.line;
        match token.kind {
            TokenKind::RubyReading(reading) => self.on_ruby_reading(reading, line),

            TokenKind::LineBreak => {
                self.flush_text();
                self.on_line_break(line)
            }

            kind => {
                self.flush_text();
                self.ignore_linebreak = false;

                match kind {
                    TokenKind::Image(source) => {
                        self.put(Node::new(NodeKind::Image { source }).with_line(Some(line)));
                        Ok(())
                    }
                    TokenKind::Annotation(annotation) => self.on_annotation(annotation, line),
                    TokenKind::RubyBar => self.on_ruby_bar(line),
                    TokenKind::RiceMark => self.on_rice_mark(line),
                    kind => {
                        self.put_unknown(Token::new(line, kind));
                        Ok(())
                    }
                }
            }
        }
    }

    fn on_end(mut self) -> Result<Node, ParseError> {
        if !self.stack.is_empty() {
            if self.option.check_unclosed_blocks {
                return Err(ParseError::new(
                    self.current_line,
                    ErrorKind::NoBlockEnd(self.current.kind.name().to_owned()),
                ));
            }

            debug!(
                "{} blocks are left open, innermost is {}",
                self.stack.len(),
                self.current.kind.name()
            );
            while let Some(frame) = self.stack.pop() {
                self.close_frame(frame);
            }
        }

        Ok(self.current.into_node(self.current_line))
    }

    fn put(&mut self, node: Node) {
        self.current.push(node);
    }

    fn put_unknown(&mut self, token: Token) {
        debug!("L{}: unknown token: {:?}", token.line, token.kind);
        let line = Some(token.line);
        self.put(Node::new(NodeKind::Unknown { token }).with_line(line));
    }

    fn flush_text(&mut self) {
        if self.text_buffer.is_empty() {
            return;
        }

        let line = self.text_buffer.first().map(|token| token.line);
        let value: String = self.text_buffer.iter().filter_map(Token::text).collect();
        self.text_buffer.clear();

        self.put(Node::new_text(value).with_line(line));
    }

    fn enter_block(&mut self, kind: BlockKind, line: usize) -> Result<(), ErrorKind> {
        // 同じ種類のブロックが続く場合は一度閉じる
        if self.current.kind.closes_with(kind.class()) {
            self.exit_block(kind.class())?;
        }

        debug!("L{}: open {}", line, kind.name());

        let saved = mem::replace(&mut self.current, Block::new(kind, Vec::new()));
        let saved_line = mem::replace(&mut self.current_line, Some(line));
        self.stack.push(Frame {
            saved,
            saved_line,
            exit_from: None,
            count: 1,
        });

        Ok(())
    }

    fn enter_multi_block(
        &mut self,
        exit_from: BlockClass,
        kinds: Vec<BlockKind>,
        line: usize,
    ) -> Result<(), ErrorKind> {
        let count = kinds.len();
        for kind in kinds {
            self.enter_block(kind, line)?;
        }

        let frame = self
            .stack
            .last_mut()
            .ok_or_else(|| ErrorKind::Implementation("No block is opened".to_owned()))?;
        frame.exit_from = Some(exit_from);
        frame.count = count;

        Ok(())
    }

    fn exit_block(&mut self, class: BlockClass) -> Result<(), ErrorKind> {
        let frame = self
            .stack
            .pop()
            .ok_or(ErrorKind::NoBlockStart(class.name()))?;

        let matched = match frame.exit_from {
            Some(exit_from) => exit_from == class,
            None => self.current.kind.closes_with(class),
        };
        if !matched {
            return Err(ErrorKind::UnmatchedBlock {
                left: self.current.kind.name().to_owned(),
                right: class.name(),
            });
        }

        debug!(
            "L{}: close {}",
            self.line.unwrap_or_default(),
            self.current.kind.name()
        );

        let count = frame.count;
        self.close_frame(frame);
        for _ in 1..count {
            let frame = self.stack.pop().ok_or_else(|| {
                ErrorKind::Implementation(format!("Block stack is shorter than {}", count))
            })?;
            self.close_frame(frame);
        }

        Ok(())
    }

    // 開いているブロックを外側に付ける
    fn close_frame(&mut self, frame: Frame) {
        let block = mem::replace(&mut self.current, frame.saved);
        let line = mem::replace(&mut self.current_line, frame.saved_line);
        self.current.push(block.into_node(line));
    }

    fn on_line_break(&mut self, line: usize) -> Result<(), ErrorKind> {
        if self.ignore_linebreak {
            self.ignore_linebreak = false;
        } else {
            self.put(Node::new(NodeKind::LineBreak).with_line(Some(line)));
        }

        if let Some(class) = self.one_line.take() {
            self.exit_block(class)?;
        }

        Ok(())
    }

    // 《...》
    fn on_ruby_reading(&mut self, reading: String, line: usize) -> Result<(), ErrorKind> {
        // ｜...《...》
        if self.current.kind.class() == BlockClass::Ruby {
            self.flush_text();
            if let BlockKind::Ruby { reading: r } = &mut self.current.kind {
                *r = Some(reading);
            }
            return self.exit_block(BlockClass::Ruby);
        }

        // 直前の文字種のかたまり、なければ直前のノード
        let base = match self.text_buffer.pop() {
            Some(token) => {
                self.flush_text();
                let base_line = Some(token.line);
                Node::new_text(token.text().unwrap_or_default()).with_line(base_line)
            }
            None => self
                .current
                .pop()
                .ok_or_else(|| ErrorKind::UnexpectedWord(Some(format!("《{}》", reading))))?,
        };

        self.put(Node::new_block(
            BlockKind::Ruby {
                reading: Some(reading),
            },
            vec![base],
        )
        .with_line(Some(line)));

        Ok(())
    }

    // ｜
    fn on_ruby_bar(&mut self, line: usize) -> Result<(), ErrorKind> {
        // "｜※" は "※" の前置き
        if self
            .tokens
            .peek()
            .is_some_and(|token| matches!(token.kind, TokenKind::RiceMark))
        {
            return Ok(());
        }

        self.enter_block(BlockKind::Ruby { reading: None }, line)
    }

    // ※ または ※［＃...］
    fn on_rice_mark(&mut self, line: usize) -> Result<(), ErrorKind> {
        let mut marks = String::from("※");
        while self
            .tokens
            .next_if(|token| matches!(token.kind, TokenKind::RiceMark))
            .is_some()
        {
            marks.push('※');
        }
        let marks = Node::new_text(marks).with_line(Some(line));

        match self
            .tokens
            .next_if(|token| matches!(token.kind, TokenKind::Annotation(_)))
        {
            Some(Token {
                line: note_line,
                kind: TokenKind::Annotation(annotation),
            }) => {
                self.line = Some(note_line);
                let kind = parse_note(&annotation.whole)?;
                self.put(Node::new_block(kind, vec![marks]).with_line(Some(line)));
            }
            _ => self.put(marks),
        }

        Ok(())
    }

    // ［＃...］
    fn on_annotation(&mut self, annotation: Annotation, line: usize) -> Result<(), ErrorKind> {
        let targeted = match (&annotation.target, &annotation.spec) {
            (Some(target), Some(spec)) => Some((target.clone(), parse_targeted(spec))),
            _ => None,
        };

        match targeted {
            Some((target, Some(kind))) => self.on_targeted(&target, kind, line),
            Some((_, None)) => {
                self.put_unknown(Token::new(line, TokenKind::Annotation(annotation)));
                Ok(())
            }
            None => self.on_directive(annotation, line),
        }
    }

    // ［＃「○○」に傍点］ など
    // 今の行の中から最後の "○○" を探して囲み直す
    fn on_targeted(&mut self, target: &str, kind: BlockKind, line: usize) -> Result<(), ErrorKind> {
        debug!("L{}: {} for {:?}", line, kind.name(), target);

        self.current.replace_last_line(|last_line| {
            let (left, center, right) = last_line.split_by_text(target)?;

            let mut nodes: Vec<Node> = left.map(Vec::from).unwrap_or_default();
            nodes.push(Node::new_block(kind, center.children).with_line(Some(line)));
            nodes.extend(right.map(Vec::from).unwrap_or_default());
            Ok(nodes)
        })
    }

    fn on_directive(&mut self, annotation: Annotation, line: usize) -> Result<(), ErrorKind> {
        // 注記だけの行の改行は無視する
        self.ignore_linebreak = true;

        let directive = match parse_directive(&annotation.whole)? {
            Some(directive) => directive,
            None => {
                self.ignore_linebreak = false;
                self.put_unknown(Token::new(line, TokenKind::Annotation(annotation)));
                return Ok(());
            }
        };

        match directive {
            Directive::HorizontalCenter => self.enter_block(BlockKind::HorizontalCenter, line),

            Directive::CenteredTop { level, fill } => self.enter_multi_block(
                BlockClass::Top,
                vec![
                    BlockKind::HorizontalCenter,
                    BlockKind::Top {
                        level: Some(level),
                        fill,
                    },
                ],
                line,
            ),

            Directive::Top { level, fill } => self.enter_block(
                BlockKind::Top {
                    level: Some(level),
                    fill,
                },
                line,
            ),

            Directive::TopWithTurn {
                level,
                turned_level,
                fill,
            } => self.enter_block(
                BlockKind::TopWithTurn {
                    level,
                    turned_level,
                    fill,
                },
                line,
            ),

            Directive::TopEnd => self.exit_block(BlockClass::Top),

            Directive::Bottom { offset } => self.enter_block(BlockKind::Bottom { offset }, line),

            Directive::BottomEnd => self.exit_block(BlockClass::Bottom),

            Directive::PageBreak => {
                self.close_horizontal_center()?;
                self.put(Node::new(NodeKind::PageBreak).with_line(Some(line)));
                Ok(())
            }

            Directive::SheetBreak => {
                self.close_horizontal_center()?;
                self.put(Node::new(NodeKind::SheetBreak).with_line(Some(line)));
                Ok(())
            }

            Directive::ParagraphBreak => {
                self.put(Node::new(NodeKind::ParagraphBreak).with_line(Some(line)));
                Ok(())
            }

            Directive::OneLineTop { level } => {
                // 行頭でなければならない
                if !self.current.last().map_or(true, Node::ends_with_break) {
                    return Err(ErrorKind::UnexpectedWord(Some(annotation.whole)));
                }
                self.on_one_line(
                    BlockKind::Top {
                        level: Some(level),
                        fill: None,
                    },
                    line,
                )
            }

            Directive::OneLineBottom { offset } => {
                self.on_one_line(BlockKind::Bottom { offset }, line)
            }
        }
    }

    fn close_horizontal_center(&mut self) -> Result<(), ErrorKind> {
        if self.current.kind.class() == BlockClass::HorizontalCenter {
            self.exit_block(BlockClass::HorizontalCenter)?;
        }
        Ok(())
    }

    // 次の改行で閉じるブロック
    fn on_one_line(&mut self, kind: BlockKind, line: usize) -> Result<(), ErrorKind> {
        self.ignore_linebreak = false;
        let class = kind.class();
        self.enter_block(kind, line)?;
        self.one_line = Some(class);
        Ok(())
    }
}
