use crate::canvas::Spacing;
use crate::{Canvas, KeyCode, MouseEvent, Region, Size, Widget};

/// Stacks children top to bottom, each at its desired height and the full
/// inner width.
pub struct Vertical<M> {
    pub children: Vec<Box<dyn Widget<M>>>,
    padding: Spacing,
    gap: u16,
}

impl<M> Vertical<M> {
    pub fn new(children: Vec<Box<dyn Widget<M>>>) -> Self {
        Self {
            children,
            padding: Spacing::default(),
            gap: 0,
        }
    }

    pub fn with_padding(mut self, padding: Spacing) -> Self {
        self.padding = padding;
        self
    }

    /// Blank rows between consecutive children.
    pub fn with_gap(mut self, gap: u16) -> Self {
        self.gap = gap;
        self
    }

    fn child_regions(&self, region: Region) -> Vec<Region> {
        let inner = self.padding.inset(region);
        let mut current_y = inner.y;
        self.children
            .iter()
            .map(|child| {
                let height = child.desired_size().height as i32;
                let child_region = Region::new(inner.x, current_y, inner.width, height);
                current_y += height + self.gap as i32;
                child_region
            })
            .collect()
    }
}

impl<M> Widget<M> for Vertical<M> {
    fn desired_size(&self) -> Size {
        let mut width: u16 = 0;
        let mut height: u16 = 0;
        for child in &self.children {
            let size = child.desired_size();
            width = width.max(size.width);
            height = height.saturating_add(size.height);
        }
        let gaps = self.gap.saturating_mul(self.children.len().saturating_sub(1) as u16);
        Size {
            width: width.saturating_add(self.padding.horizontal()),
            height: height
                .saturating_add(gaps)
                .saturating_add(self.padding.vertical()),
        }
    }

    fn layout(&mut self, region: Region) {
        let regions = self.child_regions(region);
        for (child, child_region) in self.children.iter_mut().zip(regions) {
            child.layout(child_region);
        }
    }

    fn needs_layout(&self) -> bool {
        self.children.iter().any(|child| child.needs_layout())
    }

    fn render(&self, canvas: &mut Canvas, region: Region) {
        canvas.push_clip(region);
        for (child, child_region) in self.children.iter().zip(self.child_regions(region)) {
            child.render(canvas, child_region);
        }
        canvas.pop_clip();
    }

    fn on_event(&mut self, key: KeyCode) -> Option<M> {
        // Pass event to children until one handles it
        for child in &mut self.children {
            if let Some(msg) = child.on_event(key) {
                return Some(msg);
            }
        }
        None
    }

    fn on_mouse(&mut self, event: MouseEvent, region: Region) -> Option<M> {
        // Every child sees the event, even on a miss, so press state can reset.
        let regions = self.child_regions(region);
        let mut result = None;
        for (child, child_region) in self.children.iter_mut().zip(regions) {
            if let Some(msg) = child.on_mouse(event, child_region) {
                result = Some(msg);
            }
        }
        result
    }

    fn count_focusable(&self) -> usize {
        self.children.iter().map(|c| c.count_focusable()).sum()
    }

    fn clear_focus(&mut self) {
        for child in &mut self.children {
            child.clear_focus();
        }
    }

    fn focus_nth(&mut self, mut n: usize) -> bool {
        for child in &mut self.children {
            let count = child.count_focusable();
            if n < count {
                return child.focus_nth(n);
            }
            n -= count;
        }
        false
    }
}
