//! Indented, column-aligned text blocks.
//!
//! A [`Line`] is a list of parts. Within a [`Block`] every part but the last
//! is padded to the widest part in its column, so declarations and port maps
//! line up. A [`MultiBlock`] is a sequence of blocks, each with its own
//! indentation level.

use std::fmt;

const INDENT: &str = "  ";

/// One line of output, split into alignable parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    parts: Vec<String>,
}

impl Line {
    /// A line with the given parts.
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    /// Appends a part.
    pub fn push(&mut self, part: impl Into<String>) -> &mut Self {
        self.parts.push(part.into());
        self
    }

    /// Appends text to the last part.
    pub fn append(&mut self, text: &str) {
        match self.parts.last_mut() {
            Some(last) => last.push_str(text),
            None => self.parts.push(text.to_string()),
        }
    }

    /// The parts joined without padding.
    pub fn text(&self) -> String {
        self.parts.concat()
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Line::new([text])
    }
}

impl From<String> for Line {
    fn from(text: String) -> Self {
        Line::new([text])
    }
}

/// Lines sharing one indentation level and column alignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    /// Indentation level.
    pub indent: usize,
    lines: Vec<Line>,
}

impl Block {
    /// An empty block at `indent`.
    pub fn new(indent: usize) -> Self {
        Self {
            indent,
            lines: Vec::new(),
        }
    }

    /// Appends a line.
    pub fn push(&mut self, line: impl Into<Line>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    /// Appends every line of `other`.
    pub fn extend(&mut self, other: Block) -> &mut Self {
        self.lines.extend(other.lines);
        self
    }

    /// Appends `sep` to every line but the last.
    pub fn separate(&mut self, sep: &str) -> &mut Self {
        let n = self.lines.len();
        for line in self.lines.iter_mut().take(n.saturating_sub(1)) {
            line.append(sep);
        }
        self
    }

    /// Appends `text` to the last line.
    pub fn close(&mut self, text: &str) -> &mut Self {
        if let Some(last) = self.lines.last_mut() {
            last.append(text);
        }
        self
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the block has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The lines of the block.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = self.lines.iter().map(|l| l.parts.len()).max().unwrap_or(0);
        let mut widths = vec![0; columns];
        for line in &self.lines {
            // the last part of a line is never padded
            for (i, part) in line.parts.iter().enumerate().take(line.parts.len().saturating_sub(1)) {
                widths[i] = widths[i].max(part.chars().count());
            }
        }
        let prefix = INDENT.repeat(self.indent);
        for line in &self.lines {
            let mut text = prefix.clone();
            let last = line.parts.len().saturating_sub(1);
            for (i, part) in line.parts.iter().enumerate() {
                if i < last {
                    text.push_str(&format!("{part:<width$}", width = widths[i]));
                } else {
                    text.push_str(part);
                }
            }
            writeln!(f, "{}", text.trim_end())?;
        }
        Ok(())
    }
}

/// A sequence of blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiBlock {
    /// Base indentation level.
    pub indent: usize,
    blocks: Vec<Block>,
}

impl MultiBlock {
    /// An empty multi-block at `indent`.
    pub fn new(indent: usize) -> Self {
        Self {
            indent,
            blocks: Vec::new(),
        }
    }

    /// Appends a block.
    pub fn push(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    /// Appends a single line at `indent`.
    pub fn line(&mut self, indent: usize, line: impl Into<Line>) -> &mut Self {
        let mut block = Block::new(indent);
        block.push(line);
        self.push(block)
    }

    /// Appends every block of `other`.
    pub fn extend(&mut self, other: MultiBlock) -> &mut Self {
        self.blocks.extend(other.blocks);
        self
    }

    /// Appends an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.line(0, "")
    }

    /// Appends `text` to the last line of the last non-empty block.
    pub fn close(&mut self, text: &str) -> &mut Self {
        if let Some(block) = self.blocks.iter_mut().rev().find(|b| !b.is_empty()) {
            block.close(text);
        }
        self
    }

    /// The blocks.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Whether there is nothing to print.
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(Block::is_empty)
    }
}

impl fmt::Display for MultiBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            write!(f, "{block}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligns_columns() {
        let mut b = Block::new(1);
        b.push(Line::new(["clk", " : ", "in  ", "std_logic"]));
        b.push(Line::new(["data_out", " : ", "out ", "std_logic_vector(8-1 downto 0)"]));
        b.separate(";");
        assert_eq!(
            b.to_string(),
            "  clk      : in  std_logic;\n  data_out : out std_logic_vector(8-1 downto 0)\n"
        );
    }

    #[test]
    fn separate_skips_last() {
        let mut b = Block::new(0);
        b.push("a").push("b").push("c");
        b.separate(",");
        assert_eq!(b.to_string(), "a,\nb,\nc\n");
    }

    #[test]
    fn close_appends_to_last_line() {
        let mut m = MultiBlock::new(0);
        m.line(0, "port map (");
        m.push(Block::new(2));
        m.close(");");
        assert_eq!(m.to_string(), "port map ();\n");
    }

    #[test]
    fn multiblock_indents_each_block() {
        let mut m = MultiBlock::new(0);
        m.line(0, "entity x is");
        m.line(1, "port (");
        m.line(0, "end entity;");
        assert_eq!(m.to_string(), "entity x is\n  port (\nend entity;\n");
        assert!(!m.is_empty());
        assert!(MultiBlock::default().is_empty());
    }

    #[test]
    fn empty_line_has_no_trailing_space() {
        let mut m = MultiBlock::new(0);
        m.blank();
        m.line(3, "");
        assert_eq!(m.to_string(), "\n\n");
    }
}
