//! Intermediate representation consumed by the writer
//!
//! Report builders emit an ordered sequence of [`ContentBlock`]s; the writer
//! preserves that order exactly in the produced document.

use crate::ImageFormat;

/// A styled span of text inside a paragraph or heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italics: bool,
    /// RRGGBB hex without a leading `#`.
    pub color: Option<String>,
    /// Half-points; `None` inherits the document default.
    pub size: Option<u32>,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italics: false,
            color: None,
            size: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italics(mut self) -> Self {
        self.italics = true;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }
}

/// Structural heading depth, mapped to the corresponding Word style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    Title,
    Heading1,
    Heading2,
    Heading3,
}

impl HeadingLevel {
    pub(crate) fn style_id(&self) -> &'static str {
        match self {
            HeadingLevel::Title => "Title",
            HeadingLevel::Heading1 => "Heading1",
            HeadingLevel::Heading2 => "Heading2",
            HeadingLevel::Heading3 => "Heading3",
        }
    }
}

/// One block of document content, rendered in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Heading {
        level: HeadingLevel,
        runs: Vec<TextRun>,
    },
    Paragraph {
        runs: Vec<TextRun>,
    },
    /// Embedded at the given dimensions as-is; no aspect correction.
    Image {
        data: Vec<u8>,
        format: ImageFormat,
        width_px: u32,
        height_px: u32,
    },
    /// Horizontal rule between report sections.
    Separator,
    PageBreak,
}

impl ContentBlock {
    pub fn heading(level: HeadingLevel, run: TextRun) -> Self {
        ContentBlock::Heading {
            level,
            runs: vec![run],
        }
    }

    pub fn paragraph(runs: Vec<TextRun>) -> Self {
        ContentBlock::Paragraph { runs }
    }

    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Paragraph {
            runs: vec![TextRun::new(text)],
        }
    }
}
