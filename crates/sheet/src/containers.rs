pub mod scroll_view;
pub mod vertical;

use crate::canvas::{Canvas, Region, Size};
use crate::widget::Widget;
use crate::{KeyCode, MouseEvent};

/// Centered horizontally
pub struct Center<M> {
    child: Box<dyn Widget<M>>,
}

impl<M> Center<M> {
    pub fn new(child: Box<dyn Widget<M>>) -> Self {
        Self { child }
    }

    fn child_region(&self, region: Region) -> Region {
        let child_width = (self.child.desired_size().width as i32).min(region.width);
        let x_offset = (region.width - child_width) / 2;
        Region::new(region.x + x_offset, region.y, child_width, region.height)
    }
}

impl<M> Widget<M> for Center<M> {
    fn desired_size(&self) -> Size {
        self.child.desired_size()
    }

    fn layout(&mut self, region: Region) {
        let child_region = self.child_region(region);
        self.child.layout(child_region);
    }

    fn needs_layout(&self) -> bool {
        self.child.needs_layout()
    }

    fn render(&self, canvas: &mut Canvas, region: Region) {
        self.child.render(canvas, self.child_region(region));
    }

    fn on_event(&mut self, key: KeyCode) -> Option<M> {
        self.child.on_event(key)
    }

    fn on_mouse(&mut self, event: MouseEvent, region: Region) -> Option<M> {
        let child_region = self.child_region(region);
        self.child.on_mouse(event, child_region)
    }

    fn count_focusable(&self) -> usize {
        self.child.count_focusable()
    }

    fn clear_focus(&mut self) {
        self.child.clear_focus();
    }

    fn focus_nth(&mut self, n: usize) -> bool {
        self.child.focus_nth(n)
    }
}

/// Centered vertically
pub struct Middle<M> {
    child: Box<dyn Widget<M>>,
}

impl<M> Middle<M> {
    pub fn new(child: Box<dyn Widget<M>>) -> Self {
        Self { child }
    }

    fn child_region(&self, region: Region) -> Region {
        let child_height = (self.child.desired_size().height as i32).min(region.height);
        let y_offset = (region.height - child_height) / 2;
        Region::new(region.x, region.y + y_offset, region.width, child_height)
    }
}

impl<M> Widget<M> for Middle<M> {
    fn desired_size(&self) -> Size {
        self.child.desired_size()
    }

    fn layout(&mut self, region: Region) {
        let child_region = self.child_region(region);
        self.child.layout(child_region);
    }

    fn needs_layout(&self) -> bool {
        self.child.needs_layout()
    }

    fn render(&self, canvas: &mut Canvas, region: Region) {
        self.child.render(canvas, self.child_region(region));
    }

    fn on_event(&mut self, key: KeyCode) -> Option<M> {
        self.child.on_event(key)
    }

    fn on_mouse(&mut self, event: MouseEvent, region: Region) -> Option<M> {
        let child_region = self.child_region(region);
        self.child.on_mouse(event, child_region)
    }

    fn count_focusable(&self) -> usize {
        self.child.count_focusable()
    }

    fn clear_focus(&mut self) {
        self.child.clear_focus();
    }

    fn focus_nth(&mut self, n: usize) -> bool {
        self.child.focus_nth(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Label;
    use crate::testing::TestCanvas;

    #[test]
    fn center_places_child_in_the_middle_column() {
        let widget: Center<()> = Center::new(Box::new(Label::new("ab")));
        let mut canvas = TestCanvas::new(6, 1);
        let snapshot = canvas.render_widget(&widget);
        assert_eq!(snapshot.row(0), Some("  ab  ".to_string()));
    }

    #[test]
    fn middle_places_child_in_the_middle_row() {
        let widget: Middle<()> = Middle::new(Box::new(Label::new("x")));
        let mut canvas = TestCanvas::new(1, 3);
        let snapshot = canvas.render_widget(&widget);
        assert_eq!(snapshot.to_text(), " \nx\n ");
    }
}
