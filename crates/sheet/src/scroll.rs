//! Vertical scroll state for the sheet's scroll view.

/// Scroll position of a viewport over taller content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    /// Current scroll offset (cells from top)
    pub offset: i32,
    /// Natural height of the content
    pub virtual_height: i32,
    /// Visible height
    pub viewport_height: i32,
}

impl ScrollState {
    pub fn new(virtual_height: i32, viewport_height: i32) -> Self {
        Self {
            offset: 0,
            virtual_height,
            viewport_height,
        }
    }

    /// Maximum vertical scroll offset.
    pub fn max_scroll(&self) -> i32 {
        (self.virtual_height - self.viewport_height).max(0)
    }

    /// Whether the content overflows the viewport.
    pub fn can_scroll(&self) -> bool {
        self.viewport_height > 0 && self.virtual_height > self.viewport_height
    }

    /// Scroll up by given amount (clamped to bounds).
    pub fn scroll_up(&mut self, amount: i32) {
        self.offset = (self.offset - amount).max(0);
    }

    /// Scroll down by given amount (clamped to bounds).
    pub fn scroll_down(&mut self, amount: i32) {
        self.offset = (self.offset + amount).min(self.max_scroll());
    }

    pub fn scroll_home(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_end(&mut self) {
        self.offset = self.max_scroll();
    }

    /// One page is most of the viewport, keeping a line of context.
    pub fn page(&self) -> i32 {
        (self.viewport_height - 1).max(1)
    }

    /// Update both dimensions, clamping the offset to the new bounds.
    pub fn resize(&mut self, virtual_height: i32, viewport_height: i32) {
        self.virtual_height = virtual_height.max(0);
        self.viewport_height = viewport_height.max(0);
        self.offset = self.offset.min(self.max_scroll()).max(0);
    }

    /// Scrollbar thumb as `(start, length)` within a track of `track` cells.
    ///
    /// Returns `None` when there is nothing to scroll.
    pub fn thumb(&self, track: i32) -> Option<(i32, i32)> {
        if !self.can_scroll() || track <= 0 {
            return None;
        }
        let length = ((track as i64 * self.viewport_height as i64) / self.virtual_height as i64)
            .clamp(1, track as i64) as i32;
        let free = track - length;
        let start = if self.max_scroll() == 0 {
            0
        } else {
            ((free as i64 * self.offset as i64) / self.max_scroll() as i64) as i32
        };
        Some((start, length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_scroll() {
        let state = ScrollState::new(300, 150);
        assert_eq!(state.max_scroll(), 150);
        assert!(state.can_scroll());
    }

    #[test]
    fn test_max_scroll_no_overflow() {
        let state = ScrollState::new(50, 100);
        assert_eq!(state.max_scroll(), 0);
        assert!(!state.can_scroll());
    }

    #[test]
    fn test_zero_viewport_cannot_scroll() {
        let state = ScrollState::new(10, 0);
        assert!(!state.can_scroll());
    }

    #[test]
    fn test_scroll_down_clamps() {
        let mut state = ScrollState::new(200, 100);
        state.scroll_down(25);
        assert_eq!(state.offset, 25);
        state.scroll_down(100);
        assert_eq!(state.offset, 100); // Clamped to max
    }

    #[test]
    fn test_scroll_up_clamps() {
        let mut state = ScrollState::new(200, 100);
        state.offset = 50;
        state.scroll_up(25);
        assert_eq!(state.offset, 25);
        state.scroll_up(100);
        assert_eq!(state.offset, 0);
    }

    #[test]
    fn test_home_end() {
        let mut state = ScrollState::new(40, 10);
        state.scroll_end();
        assert_eq!(state.offset, 30);
        state.scroll_home();
        assert_eq!(state.offset, 0);
    }

    #[test]
    fn test_resize_clamps_offset() {
        let mut state = ScrollState::new(200, 100);
        state.offset = 100;
        state.resize(120, 100);
        assert_eq!(state.offset, 20);
        state.resize(50, 100);
        assert_eq!(state.offset, 0);
    }

    #[test]
    fn test_thumb_none_without_overflow() {
        let state = ScrollState::new(10, 10);
        assert_eq!(state.thumb(10), None);
    }

    #[test]
    fn test_thumb_tracks_offset() {
        let mut state = ScrollState::new(40, 10);
        assert_eq!(state.thumb(10), Some((0, 2)));
        state.scroll_end();
        assert_eq!(state.thumb(10), Some((8, 2)));
    }
}
