use crossterm::event::MouseButton;
use crossterm::style::Color;

use crate::canvas::TextAttributes;
use crate::grapheme::{display_width, truncate_to_width};
use crate::widget::WidgetStates;
use crate::{Canvas, KeyCode, MouseEvent, MouseEventKind, Region, Size, Widget};

const MIN_WIDTH: u16 = 16;
const HEIGHT: u16 = 3;

/// A clickable button widget.
///
/// Pressed with Enter or Space while focused, or with a left click released
/// over the button.
pub struct Button<M> {
    label: String,
    focused: bool,
    hovered: bool,
    active: bool,
    disabled: bool,
    on_press: Option<Box<dyn Fn() -> M>>,
}

impl<M: 'static> Button<M> {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            focused: false,
            hovered: false,
            active: false,
            disabled: false,
            on_press: None,
        }
    }

    /// Set a press handler that produces a message.
    pub fn with_on_press<F>(mut self, on_press: F) -> Self
    where
        F: Fn() -> M + 'static,
    {
        self.on_press = Some(Box::new(on_press));
        self
    }

    /// Set a message to emit when pressed (cloned for each press).
    pub fn with_message(mut self, message: M) -> Self
    where
        M: Clone,
    {
        self.on_press = Some(Box::new(move || message.clone()));
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    fn press(&mut self) -> Option<M> {
        if self.disabled {
            return None;
        }
        self.on_press.as_ref().map(|f| f())
    }

    fn colors(&self) -> (Color, Color) {
        let states = self.get_state();
        if states.contains(WidgetStates::DISABLED) {
            (Color::DarkGrey, Color::Black)
        } else if states.contains(WidgetStates::ACTIVE) {
            (Color::Black, Color::White)
        } else if states.intersects(WidgetStates::FOCUS | WidgetStates::HOVER) {
            (Color::White, Color::DarkBlue)
        } else {
            (Color::White, Color::DarkGrey)
        }
    }
}

impl<M: 'static> Widget<M> for Button<M> {
    fn desired_size(&self) -> Size {
        let label_width = display_width(&self.label).min(u16::MAX as usize) as u16;
        Size {
            width: label_width.saturating_add(4).max(MIN_WIDTH),
            height: HEIGHT,
        }
    }

    fn render(&self, canvas: &mut Canvas, region: Region) {
        let height = (HEIGHT as i32).min(region.height);
        let frame = Region::new(region.x, region.y, region.width, height);
        let (fg, bg) = self.colors();
        canvas.fill(frame, bg);

        if frame.height < 2 || frame.width <= 0 {
            return;
        }
        let label = truncate_to_width(&self.label, frame.width.saturating_sub(2) as usize);
        let x_offset = (frame.width - display_width(label) as i32) / 2;
        let attrs = if self.focused {
            TextAttributes::BOLD
        } else {
            TextAttributes::default()
        };
        canvas.put_str(frame.x + x_offset, frame.y + 1, label, Some(fg), Some(bg), attrs);
    }

    fn get_state(&self) -> WidgetStates {
        let mut states = WidgetStates::empty();
        states.set(WidgetStates::FOCUS, self.focused);
        states.set(WidgetStates::HOVER, self.hovered);
        states.set(WidgetStates::ACTIVE, self.active);
        states.set(WidgetStates::DISABLED, self.disabled);
        states
    }

    fn set_focus(&mut self, is_focused: bool) {
        self.focused = is_focused;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn is_focusable(&self) -> bool {
        !self.disabled
    }

    fn on_event(&mut self, key: KeyCode) -> Option<M> {
        if !self.focused {
            return None;
        }
        match key {
            KeyCode::Enter | KeyCode::Char(' ') => self.press(),
            _ => None,
        }
    }

    fn on_mouse(&mut self, event: MouseEvent, region: Region) -> Option<M> {
        let frame = Region::new(region.x, region.y, region.width, HEIGHT as i32);
        let inside = frame.contains_point(event.column as i32, event.row as i32);
        match event.kind {
            MouseEventKind::Moved => {
                self.hovered = inside;
                None
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.active = inside && !self.disabled;
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let was_active = std::mem::take(&mut self.active);
                if was_active && inside {
                    self.press()
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}
