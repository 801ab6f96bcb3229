use std::{fmt::Debug, io::Write};

use anyhow::Result;

use crate::{
    jis_x_0213::JisLookup,
    ruby_txt::tree::{BlockKind, Node, NodeKind},
};

/// Visitor over a document tree.
///
/// [`TreeWalker::start`] calls [`TreeWalker::on_node`] for the root and then
/// [`TreeWalker::on_end`] once. For block nodes `on_node` gets a [`Descend`];
/// children are visited only when the walker calls [`Descend::walk`].
pub trait TreeWalker {
    fn on_node(&mut self, node: &Node, depth: usize, descend: Option<Descend<'_>>) -> Result<()>;

    fn on_end(&mut self) -> Result<()> {
        Ok(())
    }

    fn start(&mut self, tree: &Node) -> Result<()>
    where
        Self: Sized,
    {
        walk(self, tree, 0)?;
        self.on_end()
    }
}

/// Children of the block node being visited.
pub struct Descend<'a> {
    children: &'a [Node],
    depth: usize,
}

impl Descend<'_> {
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn walk(self, walker: &mut dyn TreeWalker) -> Result<()> {
        for child in self.children {
            walk(walker, child, self.depth)?;
        }
        Ok(())
    }
}

fn walk(walker: &mut dyn TreeWalker, node: &Node, depth: usize) -> Result<()> {
    let descend = node.as_block().map(|block| Descend {
        children: &block.children,
        depth: depth + 1,
    });
    walker.on_node(node, depth, descend)
}

/// Writes the tree as indented `<Name ...>` lines.
pub struct TreeDumper<'a, W> {
    out: W,
    jis_table: Option<&'a dyn JisLookup>,
}

impl<'a, W: Write> TreeDumper<'a, W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            jis_table: None,
        }
    }

    /// Also prints the characters JIS external character notes stand for.
    pub fn with_jis_table(mut self, jis_table: &'a dyn JisLookup) -> Self {
        self.jis_table = Some(jis_table);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TreeWalker for TreeDumper<'_, W> {
    fn on_node(&mut self, node: &Node, depth: usize, descend: Option<Descend<'_>>) -> Result<()> {
        let indent = "  ".repeat(depth);
        let label = label(node, self.jis_table);

        match descend {
            Some(descend) if !descend.is_empty() => {
                writeln!(self.out, "{}<{}>", indent, label)?;
                descend.walk(self)?;
                writeln!(self.out, "{}</{}>", indent, node.name())?;
            }
            _ => writeln!(self.out, "{}<{} />", indent, label)?,
        }

        Ok(())
    }

    fn on_end(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

fn label(node: &Node, jis_table: Option<&dyn JisLookup>) -> String {
    let mut attrs = vec![node.name().to_owned()];

    match &node.kind {
        NodeKind::Text { value } => push_attr(&mut attrs, "value", value),
        NodeKind::Image { source } => push_attr(&mut attrs, "source", source),
        NodeKind::Unknown { token } => push_attr(&mut attrs, "token", &token.kind),
        NodeKind::Block(block) => match &block.kind {
            BlockKind::Ruby { reading } => push_optional_attr(&mut attrs, "reading", reading),
            BlockKind::Bottom { offset } => push_optional_attr(&mut attrs, "offset", offset),
            BlockKind::Top { level, fill } => {
                push_optional_attr(&mut attrs, "level", level);
                push_optional_attr(&mut attrs, "fill", fill);
            }
            BlockKind::TopWithTurn {
                level,
                turned_level,
                fill,
            } => {
                push_optional_attr(&mut attrs, "level", level);
                push_attr(&mut attrs, "turned_level", turned_level);
                push_optional_attr(&mut attrs, "fill", fill);
            }
            BlockKind::Heading { level } | BlockKind::WindowHeading { level } => {
                push_attr(&mut attrs, "level", level)
            }
            BlockKind::Note { spec } => push_attr(&mut attrs, "spec", spec),
            BlockKind::Jis { spec, char } => {
                push_attr(&mut attrs, "spec", spec);
                let resolved = jis_table.and_then(|table| char.to_char(table));
                push_optional_attr(&mut attrs, "char", &resolved);
            }
            BlockKind::Unicode { spec, char } => {
                push_attr(&mut attrs, "spec", spec);
                push_optional_attr(&mut attrs, "char", &char.to_char());
            }
            _ => {}
        },
        _ => {}
    }

    attrs.join(" ")
}

fn push_attr<T: Debug + ?Sized>(attrs: &mut Vec<String>, key: &str, value: &T) {
    attrs.push(format!("{}={:?}", key, value));
}

fn push_optional_attr<T: Debug>(attrs: &mut Vec<String>, key: &str, value: &Option<T>) {
    if let Some(value) = value {
        push_attr(attrs, key, value);
    }
}
