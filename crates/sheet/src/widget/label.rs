use std::marker::PhantomData;

use crossterm::style::Color;

use crate::canvas::{Spacing, TextAttributes};
use crate::grapheme::{display_width, truncate_to_width};
use crate::{Canvas, Region, Size, Widget};

/// A single line of text with optional padding and colours.
///
/// The label's height is one row plus its vertical padding; a background, if
/// set, fills the whole padded box across the width it is given.
#[derive(Debug, Clone)]
pub struct Label<M> {
    text: String,
    padding: Spacing,
    fg: Option<Color>,
    bg: Option<Color>,
    attrs: TextAttributes,
    _phantom: PhantomData<M>,
}

impl<M> Label<M> {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            padding: Spacing::default(),
            fg: None,
            bg: None,
            attrs: TextAttributes::default(),
            _phantom: PhantomData,
        }
    }

    pub fn with_padding(mut self, padding: Spacing) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_foreground(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.attrs.bold = bold;
        self
    }

    /// Replace the text.
    pub fn update(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl<M> Widget<M> for Label<M> {
    fn desired_size(&self) -> Size {
        let text_width = display_width(&self.text).min(u16::MAX as usize) as u16;
        Size {
            width: text_width.saturating_add(self.padding.horizontal()),
            height: 1u16.saturating_add(self.padding.vertical()),
        }
    }

    fn render(&self, canvas: &mut Canvas, region: Region) {
        let height = (self.desired_size().height as i32).min(region.height);
        let frame = Region::new(region.x, region.y, region.width, height);
        if let Some(bg) = self.bg {
            canvas.fill(frame, bg);
        }

        let inner = self.padding.inset(frame);
        if inner.is_empty() {
            return;
        }
        let visible = truncate_to_width(&self.text, inner.width as usize);
        canvas.put_str(inner.x, inner.y, visible, self.fg, self.bg, self.attrs);
    }
}
