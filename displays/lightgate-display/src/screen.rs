//! Screen buffer types
//!
//! A screen is a top-to-bottom stack of text lines. Each line picks one of
//! two fonts and may carry a rule underneath it.

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use heapless::{String, Vec};

use crate::ssd1306::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Maximum lines on one screen
pub const MAX_LINES: usize = 8;

/// Maximum characters per line (128 px / 6 px small glyphs)
pub const LINE_LEN: usize = 21;

/// Vertical space taken by a rule under a line
const RULE_SPACING: u32 = 4;

/// Font size of a screen line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextSize {
    /// 6x10, left aligned
    Small,
    /// 10x20, centered
    Large,
}

impl TextSize {
    fn font(&self) -> &'static MonoFont<'static> {
        match self {
            TextSize::Small => &FONT_6X10,
            TextSize::Large => &FONT_10X20,
        }
    }

    /// Line height in pixels
    pub fn height(&self) -> u32 {
        self.font().character_size.height
    }

    /// Characters that fit across the panel
    pub fn columns(&self) -> usize {
        (DISPLAY_WIDTH / self.font().character_size.width) as usize
    }
}

/// One line of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    text: String<LINE_LEN>,
    size: TextSize,
    rule: bool,
}

impl TextLine {
    /// Build a line, truncating text that does not fit the font
    pub fn new(text: &str, size: TextSize) -> Self {
        let mut line = String::new();
        for ch in text.chars().take(size.columns()) {
            if line.push(ch).is_err() {
                break;
            }
        }
        Self {
            text: line,
            size,
            rule: false,
        }
    }

    pub fn small(text: &str) -> Self {
        Self::new(text, TextSize::Small)
    }

    pub fn large(text: &str) -> Self {
        Self::new(text, TextSize::Large)
    }

    /// Draw a horizontal rule under this line
    pub fn with_rule(mut self) -> Self {
        self.rule = true;
        self
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn size(&self) -> TextSize {
        self.size
    }

    pub fn has_rule(&self) -> bool {
        self.rule
    }

    /// Pixels this line occupies, rule included
    pub fn height(&self) -> u32 {
        self.size.height() + if self.rule { RULE_SPACING } else { 0 }
    }
}

/// Screen buffer
///
/// Lines that would not fit the panel height are refused.
#[derive(Debug, Clone)]
pub struct Screen {
    lines: Vec<TextLine, MAX_LINES>,
    /// Whether the screen needs to be redrawn
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

// Content equality; the dirty flag is bookkeeping
impl PartialEq for Screen {
    fn eq(&self, other: &Self) -> bool {
        self.lines == other.lines
    }
}

impl Eq for Screen {}

impl Screen {
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            dirty: true,
        }
    }

    /// Remove all lines
    pub fn clear(&mut self) {
        self.lines.clear();
        self.dirty = true;
    }

    /// Append a line below the existing ones
    ///
    /// Returns `false` (and leaves the screen untouched) when the line
    /// does not fit.
    pub fn push(&mut self, line: TextLine) -> bool {
        if self.used_height() + line.height() > DISPLAY_HEIGHT {
            return false;
        }
        if self.lines.push(line).is_err() {
            return false;
        }
        self.dirty = true;
        true
    }

    /// Pixels used by the current lines
    pub fn used_height(&self) -> u32 {
        self.lines.iter().map(TextLine::height).sum()
    }

    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Check if screen needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark screen as clean (after rendering)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Mark screen as dirty (needs redraw)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Render onto a display target, replacing its contents
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        target.clear(BinaryColor::Off)?;

        let width = target.bounding_box().size.width as i32;
        let rule_style = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
        let mut y = 0i32;

        for line in &self.lines {
            let char_style = MonoTextStyle::new(line.size.font(), BinaryColor::On);
            let (x, alignment) = match line.size {
                TextSize::Small => (0, Alignment::Left),
                TextSize::Large => (width / 2, Alignment::Center),
            };
            let text_style = TextStyleBuilder::new()
                .alignment(alignment)
                .baseline(Baseline::Top)
                .build();

            Text::with_text_style(line.text(), Point::new(x, y), char_style, text_style)
                .draw(target)?;
            y += line.size.height() as i32;

            if line.rule {
                let rule_y = y + (RULE_SPACING as i32 / 2) - 1;
                Line::new(Point::new(0, rule_y), Point::new(width - 1, rule_y))
                    .into_styled(rule_style)
                    .draw(target)?;
                y += RULE_SPACING as i32;
            }
        }

        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", line.text());
        }
        defmt::write!(f, "]");
    }
}
