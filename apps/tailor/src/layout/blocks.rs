//! Block tokenizer for the Markdown subset the renderer understands.
//!
//! Each non-blank line becomes exactly one block. Prefixes are checked in order
//! `# `, `## `, `### `, `- `; anything else is a paragraph. Blank lines produce nothing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    Heading { level: u8, text: String },
    Bullet { text: String },
    Paragraph { text: String },
}

/// Block discriminant carried by positioned blocks after layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Heading(u8),
    Bullet,
    Paragraph,
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Heading { level, .. } => BlockKind::Heading(*level),
            Block::Bullet { .. } => BlockKind::Bullet,
            Block::Paragraph { .. } => BlockKind::Paragraph,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Block::Heading { text, .. } | Block::Bullet { text } | Block::Paragraph { text } => {
                text
            }
        }
    }
}

pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    markdown
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(classify_line)
        .collect()
}

fn classify_line(line: &str) -> Block {
    if let Some(text) = line.strip_prefix("# ") {
        Block::Heading {
            level: 1,
            text: text.trim().to_string(),
        }
    } else if let Some(text) = line.strip_prefix("## ") {
        Block::Heading {
            level: 2,
            text: text.trim().to_string(),
        }
    } else if let Some(text) = line.strip_prefix("### ") {
        Block::Heading {
            level: 3,
            text: text.trim().to_string(),
        }
    } else if let Some(text) = line.strip_prefix("- ") {
        Block::Bullet {
            text: text.trim().to_string(),
        }
    } else {
        Block::Paragraph {
            text: line.to_string(),
        }
    }
}
