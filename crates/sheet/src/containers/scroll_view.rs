//! ScrollView - a single-child container that scrolls vertically.
//!
//! The viewport is whatever region the view is laid out in. The child is laid
//! out at its natural height, so content taller than the viewport is clipped
//! and can be scrolled with the keyboard or the mouse wheel.

use crossterm::style::Color;

use crate::canvas::TextAttributes;
use crate::scroll::ScrollState;
use crate::{Canvas, KeyCode, MouseEvent, MouseEventKind, Region, Size, Widget};

/// Lines per mouse wheel notch.
const WHEEL_AMOUNT: i32 = 3;

pub struct ScrollView<M> {
    child: Box<dyn Widget<M>>,
    scroll: ScrollState,
    scrollbar: bool,
}

impl<M> ScrollView<M> {
    pub fn new(child: Box<dyn Widget<M>>) -> Self {
        Self {
            child,
            scroll: ScrollState::default(),
            scrollbar: true,
        }
    }

    /// Show a one-column scrollbar when content overflows (default on).
    pub fn with_scrollbar(mut self, scrollbar: bool) -> Self {
        self.scrollbar = scrollbar;
        self
    }

    pub fn set_scrollbar(&mut self, scrollbar: bool) {
        self.scrollbar = scrollbar;
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll
    }

    fn shows_scrollbar(&self) -> bool {
        self.scrollbar && self.scroll.can_scroll()
    }

    /// Region the child occupies, shifted by the scroll offset.
    fn child_region(&self, viewport: Region) -> Region {
        let gutter = if self.shows_scrollbar() { 1 } else { 0 };
        Region::new(
            viewport.x,
            viewport.y - self.scroll.offset,
            viewport.width - gutter,
            self.scroll.virtual_height,
        )
    }

    fn scroll_by_key(&mut self, key: KeyCode) -> bool {
        if !self.scroll.can_scroll() {
            return false;
        }
        match key {
            KeyCode::Up => self.scroll.scroll_up(1),
            KeyCode::Down => self.scroll.scroll_down(1),
            KeyCode::PageUp => self.scroll.scroll_up(self.scroll.page()),
            KeyCode::PageDown => self.scroll.scroll_down(self.scroll.page()),
            KeyCode::Home => self.scroll.scroll_home(),
            KeyCode::End => self.scroll.scroll_end(),
            _ => return false,
        }
        true
    }

    fn render_scrollbar(&self, canvas: &mut Canvas, viewport: Region) {
        let Some((start, length)) = self.scroll.thumb(viewport.height) else {
            return;
        };
        let x = viewport.x + viewport.width - 1;
        for row in 0..viewport.height {
            let on_thumb = row >= start && row < start + length;
            let (glyph, fg) = if on_thumb {
                ('┃', Color::White)
            } else {
                ('│', Color::DarkGrey)
            };
            canvas.put_char(
                x,
                viewport.y + row,
                glyph,
                Some(fg),
                None,
                TextAttributes::default(),
            );
        }
    }
}

impl<M> Widget<M> for ScrollView<M> {
    fn desired_size(&self) -> Size {
        self.child.desired_size()
    }

    fn layout(&mut self, region: Region) {
        let natural = self.child.desired_size().height as i32;
        self.scroll.resize(natural, region.height);
        self.child.layout(self.child_region(region));

        // The child may have grown during its own layout, which can also
        // toggle the scrollbar gutter.
        let settled = self.child.desired_size().height as i32;
        if settled != natural {
            self.scroll.resize(settled, region.height);
            self.child.layout(self.child_region(region));
        }
    }

    fn needs_layout(&self) -> bool {
        self.child.needs_layout()
    }

    fn render(&self, canvas: &mut Canvas, region: Region) {
        canvas.push_clip(region);
        self.child.render(canvas, self.child_region(region));
        if self.shows_scrollbar() {
            self.render_scrollbar(canvas, region);
        }
        canvas.pop_clip();
    }

    fn on_event(&mut self, key: KeyCode) -> Option<M> {
        if self.scroll_by_key(key) {
            return None;
        }
        self.child.on_event(key)
    }

    fn on_mouse(&mut self, event: MouseEvent, region: Region) -> Option<M> {
        if !region.contains_point(event.column as i32, event.row as i32) {
            return None;
        }
        match event.kind {
            MouseEventKind::ScrollUp => {
                self.scroll.scroll_up(WHEEL_AMOUNT);
                None
            }
            MouseEventKind::ScrollDown => {
                self.scroll.scroll_down(WHEEL_AMOUNT);
                None
            }
            _ => {
                let child_region = self.child_region(region);
                self.child.on_mouse(event, child_region)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Label;
    use crate::Vertical;
    use crate::testing::TestCanvas;

    fn rows(n: usize) -> Box<dyn Widget<()>> {
        let children = (1..=n)
            .map(|i| Box::new(Label::new(format!("row {i}"))) as Box<dyn Widget<()>>)
            .collect();
        Box::new(Vertical::new(children))
    }

    #[test]
    fn fits_without_scrollbar() {
        let mut view = ScrollView::new(rows(2));
        view.layout(Region::new(0, 0, 10, 4));
        assert!(!view.scroll_state().can_scroll());

        let mut canvas = TestCanvas::new(10, 4);
        let snapshot = canvas.render_widget(&view);
        assert_eq!(snapshot.to_text_trimmed(), "row 1\nrow 2");
    }

    #[test]
    fn overflow_clips_and_scrolls() {
        let mut view = ScrollView::new(rows(6));
        let viewport = Region::new(0, 0, 10, 3);
        view.layout(viewport);
        assert_eq!(view.scroll_state().max_scroll(), 3);

        view.on_event(KeyCode::Down);
        view.on_event(KeyCode::Down);
        view.layout(viewport);

        let mut canvas = TestCanvas::new(10, 3);
        let snapshot = canvas.render_widget_at(&view, viewport);
        assert_eq!(snapshot.row_trimmed(0), Some("row 3    │".to_string()));
        assert_eq!(snapshot.row_trimmed(1), Some("row 4    ┃".to_string()));
        assert_eq!(snapshot.row_trimmed(2), Some("row 5    │".to_string()));
    }

    #[test]
    fn end_key_reaches_the_bottom() {
        let mut view = ScrollView::new(rows(10));
        let viewport = Region::new(0, 0, 8, 4);
        view.layout(viewport);
        view.on_event(KeyCode::End);
        assert_eq!(view.scroll_state().offset, 6);
    }

    #[test]
    fn keys_pass_through_when_nothing_to_scroll() {
        let mut view = ScrollView::new(rows(1));
        view.layout(Region::new(0, 0, 8, 4));
        view.on_event(KeyCode::Down);
        assert_eq!(view.scroll_state().offset, 0);
    }
}
