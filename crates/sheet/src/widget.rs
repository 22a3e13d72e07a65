pub mod button;
pub mod item_list;
pub mod label;

use bitflags::bitflags;

use crate::{
    KeyCode, MouseEvent, Size,
    canvas::{Canvas, Region},
};

bitflags! {
    /// Interactive pseudo-states a widget can be in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WidgetStates: u8 {
        const FOCUS = 1 << 0;
        const HOVER = 1 << 1;
        const ACTIVE = 1 << 2;
        const DISABLED = 1 << 3;
    }
}

/// A widget that can lay itself out, render itself and handle events.
/// Generic over `M`, the message type that events produce.
///
/// Every frame runs two explicit phases over the tree:
/// 1. `layout()` with `&mut self`, where widgets may read shared state,
///    rebuild children and record measurements;
/// 2. `render()` with `&self`, which only draws.
pub trait Widget<M> {
    /// Draw the widget onto the provided canvas within the specified region.
    fn render(&self, canvas: &mut Canvas, region: Region);

    /// Tell the parent container how much space this widget needs.
    fn desired_size(&self) -> Size;

    /// Lay out this widget (and its children) for the given region.
    ///
    /// Containers must forward this to their children with the same child
    /// regions they will use in `render()`.
    fn layout(&mut self, _region: Region) {}

    /// Returns true when the last layout pass produced state that needs
    /// another layout pass before the frame is settled.
    fn needs_layout(&self) -> bool {
        false
    }

    /// Returns the widget's current pseudo-class states.
    fn get_state(&self) -> WidgetStates {
        let mut states = WidgetStates::empty();
        if self.is_focused() {
            states |= WidgetStates::FOCUS;
        }
        states
    }

    // Focus management
    fn set_focus(&mut self, _is_focused: bool) {}

    fn is_focused(&self) -> bool {
        false
    }

    /// Returns true if this widget can receive focus.
    fn is_focusable(&self) -> bool {
        false
    }

    /// Counts the total number of focusable widgets in this subtree.
    fn count_focusable(&self) -> usize {
        // Containers override this to sum their children's counts
        if self.is_focusable() { 1 } else { 0 }
    }

    /// Clears focus from this widget and all children.
    fn clear_focus(&mut self) {
        self.set_focus(false);
    }

    /// Sets focus on the nth focusable widget (0-indexed).
    /// Returns true if focus was set, false if index was out of range.
    fn focus_nth(&mut self, n: usize) -> bool {
        if self.is_focusable() && n == 0 {
            self.set_focus(true);
            return true;
        }
        false
    }

    /// Handle a key event and optionally return a message.
    fn on_event(&mut self, _key: KeyCode) -> Option<M> {
        None
    }

    /// Handle a mouse event within the widget's region.
    ///
    /// The `region` parameter describes where this widget was rendered,
    /// allowing hit-testing without storing bounds on the widget.
    fn on_mouse(&mut self, _event: MouseEvent, _region: Region) -> Option<M> {
        None
    }

    /// Returns true while this widget captures all input (an open modal).
    ///
    /// While it is true the event loop holds back focus changes from
    /// `App::focus_index`. Keys still reach `App::on_key`.
    fn is_modal(&self) -> bool {
        false
    }

    /// Returns the widget's type name (e.g., "Button", "DynamicHeightSheet").
    ///
    /// Used for `MessageEnvelope.sender_type` and log lines.
    fn type_name(&self) -> &'static str {
        // Strip paths and generics: "sheet::widget::button::Button<M>" -> "Button"
        let full = std::any::type_name::<Self>();
        full.split('<')
            .next()
            .unwrap_or(full)
            .split("::")
            .last()
            .unwrap_or(full)
    }
}

/// Allow boxed widgets to be used as widgets.
impl<M> Widget<M> for Box<dyn Widget<M>> {
    fn render(&self, canvas: &mut Canvas, region: Region) {
        self.as_ref().render(canvas, region);
    }

    fn desired_size(&self) -> Size {
        self.as_ref().desired_size()
    }

    fn layout(&mut self, region: Region) {
        self.as_mut().layout(region);
    }

    fn needs_layout(&self) -> bool {
        self.as_ref().needs_layout()
    }

    fn get_state(&self) -> WidgetStates {
        self.as_ref().get_state()
    }

    fn set_focus(&mut self, is_focused: bool) {
        self.as_mut().set_focus(is_focused);
    }

    fn is_focused(&self) -> bool {
        self.as_ref().is_focused()
    }

    fn is_focusable(&self) -> bool {
        self.as_ref().is_focusable()
    }

    fn count_focusable(&self) -> usize {
        self.as_ref().count_focusable()
    }

    fn clear_focus(&mut self) {
        self.as_mut().clear_focus();
    }

    fn focus_nth(&mut self, n: usize) -> bool {
        self.as_mut().focus_nth(n)
    }

    fn on_event(&mut self, key: KeyCode) -> Option<M> {
        self.as_mut().on_event(key)
    }

    fn on_mouse(&mut self, event: MouseEvent, region: Region) -> Option<M> {
        self.as_mut().on_mouse(event, region)
    }

    fn is_modal(&self) -> bool {
        self.as_ref().is_modal()
    }

    fn type_name(&self) -> &'static str {
        self.as_ref().type_name()
    }
}

/// Trait for types that can compose a widget tree.
/// The associated `Message` type defines what events the UI can produce.
pub trait Compose {
    type Message;

    /// Builds the root widget. Called once when the app starts; the tree is
    /// persistent after that.
    fn compose(&self) -> Box<dyn Widget<Self::Message>>;
}
