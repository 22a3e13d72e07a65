//! A list of "Item: n" rows whose length comes from a shared binding.

use crossterm::style::Color;

use crate::binding::Binding;
use crate::canvas::Spacing;
use crate::widget::label::Label;
use crate::{Canvas, Region, Size, Widget};

/// Rows of padded labels, one per item.
///
/// The row count is read from a [`Binding`] on every layout pass, so the host
/// can grow or shrink the list while it is on screen.
pub struct ItemList<M> {
    count: Binding<usize>,
    rows: Vec<Label<M>>,
    row_padding: Spacing,
    padding: Spacing,
    gap: u16,
    background: Option<Color>,
}

impl<M> ItemList<M> {
    pub fn new(count: Binding<usize>) -> Self {
        let mut list = Self {
            count,
            rows: Vec::new(),
            row_padding: Spacing::symmetric(1, 2),
            padding: Spacing::symmetric(1, 2),
            gap: 1,
            background: Some(Color::AnsiValue(238)),
        };
        list.sync_rows();
        list
    }

    /// Padding inside each row (default one row, two columns).
    pub fn with_row_padding(mut self, padding: Spacing) -> Self {
        self.row_padding = padding;
        self.rebuild_rows();
        self
    }

    /// Padding around the whole list (default one row, two columns).
    pub fn with_padding(mut self, padding: Spacing) -> Self {
        self.padding = padding;
        self
    }

    /// Blank rows between items (default one).
    pub fn with_gap(mut self, gap: u16) -> Self {
        self.gap = gap;
        self
    }

    /// Row background, `None` for transparent rows.
    pub fn with_row_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self.rebuild_rows();
        self
    }

    /// Number of rows currently built.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn row_height(&self) -> u16 {
        1u16.saturating_add(self.row_padding.vertical())
    }

    fn make_row(&self, index: usize) -> Label<M> {
        let label = Label::new(format!("Item: {}", index + 1)).with_padding(self.row_padding);
        match self.background {
            Some(bg) => label.with_background(bg),
            None => label,
        }
    }

    fn rebuild_rows(&mut self) {
        self.rows.clear();
        self.sync_rows();
    }

    /// Add or drop rows to match the bound count.
    fn sync_rows(&mut self) {
        let count = self.count.get();
        if self.rows.len() > count {
            self.rows.truncate(count);
        }
        while self.rows.len() < count {
            let row = self.make_row(self.rows.len());
            self.rows.push(row);
        }
    }

    fn row_regions(&self, region: Region) -> impl Iterator<Item = Region> + '_ {
        let inner = self.padding.inset(region);
        let step = self.row_height() as i32 + self.gap as i32;
        (0..self.rows.len()).map(move |i| {
            Region::new(
                inner.x,
                inner.y + i as i32 * step,
                inner.width,
                self.row_height() as i32,
            )
        })
    }
}

impl<M> Widget<M> for ItemList<M> {
    fn desired_size(&self) -> Size {
        // Computed from the binding rather than the built rows, so a count
        // change is visible to measurement before the next layout.
        let count = self.count.get().min(u16::MAX as usize) as u16;
        let rows = self.row_height().saturating_mul(count);
        let gaps = self.gap.saturating_mul(count.saturating_sub(1));
        let widest = (0..self.count.get())
            .last()
            .map(|last| self.make_row(last).desired_size().width)
            .unwrap_or(0);
        Size {
            width: widest.saturating_add(self.padding.horizontal()),
            height: rows
                .saturating_add(gaps)
                .saturating_add(self.padding.vertical()),
        }
    }

    fn layout(&mut self, _region: Region) {
        self.sync_rows();
    }

    fn render(&self, canvas: &mut Canvas, region: Region) {
        canvas.push_clip(region);
        for (row, row_region) in self.rows.iter().zip(self.row_regions(region)) {
            row.render(canvas, row_region);
        }
        canvas.pop_clip();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestCanvas;

    #[test]
    fn height_follows_the_binding() {
        let count = Binding::new(2);
        let list: ItemList<()> = ItemList::new(count.clone());
        // 2 rows of 3, one gap, padding 1 top and bottom
        assert_eq!(list.desired_size().height, 9);

        count.set(5);
        assert_eq!(list.desired_size().height, 3 * 5 + 4 + 2);
    }

    #[test]
    fn empty_list_is_only_padding() {
        let list: ItemList<()> = ItemList::new(Binding::new(0));
        assert_eq!(list.desired_size(), Size::new(4, 2));
        assert!(list.is_empty());
    }

    #[test]
    fn layout_rebuilds_rows() {
        let count = Binding::new(1);
        let mut list: ItemList<()> = ItemList::new(count.clone());
        count.set(4);
        assert_eq!(list.len(), 1);
        list.layout(Region::new(0, 0, 20, 20));
        assert_eq!(list.len(), 4);

        count.set(2);
        list.layout(Region::new(0, 0, 20, 20));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn renders_compact_rows() {
        let list: ItemList<()> = ItemList::new(Binding::new(2))
            .with_row_padding(Spacing::default())
            .with_padding(Spacing::default())
            .with_gap(0)
            .with_row_background(None);
        let mut canvas = TestCanvas::new(10, 2);
        let snapshot = canvas.render_widget(&list);
        insta::assert_snapshot!(snapshot.to_text_trimmed(), @r"
        Item: 1
        Item: 2
        ");
    }
}
