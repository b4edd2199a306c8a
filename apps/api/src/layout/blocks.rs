//! Content blocks: the atomic units of pagination.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::TextStyle;

/// A named content stream of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnId {
    /// The main (or only) column.
    Main,
    /// The narrow side column of two-column templates.
    Sidebar,
}

/// Logical CV section a block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionTag {
    Header,
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Header,
    /// Section title. Never left alone at the bottom of a page.
    SectionHeading,
    Entry,
    Paragraph,
    SkillGroup,
}

/// One renderable piece of a block, stacked vertically in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    /// Wrapped text. `indent_px` narrows the wrap width (bullet highlights).
    Text {
        text: String,
        style: TextStyle,
        #[serde(default)]
        indent_px: f32,
    },
    /// Inline tags that flow into rows.
    Chips {
        items: Vec<String>,
        style: TextStyle,
        padding_x: f32,
        chip_height: f32,
        gap: f32,
    },
    Image { url: String, height: f32 },
    Spacer { height: f32 },
}

/// A block as produced by a template, before measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Stable across passes for the same CV content.
    pub key: String,
    pub section: SectionTag,
    pub kind: BlockKind,
    pub elements: Vec<Element>,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl ContentBlock {
    pub fn new(key: impl Into<String>, section: SectionTag, kind: BlockKind) -> Self {
        Self {
            key: key.into(),
            section,
            kind,
            elements: Vec::new(),
            margin_top: 0.0,
            margin_bottom: 0.0,
        }
    }

    pub fn with_margins(mut self, top: f32, bottom: f32) -> Self {
        self.margin_top = top;
        self.margin_bottom = bottom;
        self
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }
}

/// A block with its measured vertical extent (margins included).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasuredBlock {
    #[serde(flatten)]
    pub block: ContentBlock,
    pub height: f32,
}

impl MeasuredBlock {
    pub fn is_heading(&self) -> bool {
        self.block.kind == BlockKind::SectionHeading
    }

    pub fn section(&self) -> SectionTag {
        self.block.section
    }

    pub fn key(&self) -> &str {
        &self.block.key
    }
}

/// Builds a measured block directly. Test fixture for the pure layout stages.
#[cfg(test)]
pub(crate) fn measured(key: &str, section: SectionTag, kind: BlockKind, height: f32) -> MeasuredBlock {
    MeasuredBlock {
        block: ContentBlock::new(key, section, kind),
        height,
    }
}
