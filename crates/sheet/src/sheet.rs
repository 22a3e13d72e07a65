//! DynamicHeightSheet - a bottom sheet whose height follows its content.
//!
//! The sheet decorates a host widget. While its [`PresentationBinding`] is
//! set it builds the caller's content and shows it in a modal surface docked
//! to the bottom of the host region. The node chain is explicit:
//!
//! ```text
//! DynamicHeightSheet ─> ScrollView ─> MeasureProbe ─> content
//! ```
//!
//! Each layout pass the probe measures the content's natural height and
//! reports it to the sheet's [`MeasuredHeight`]. A changed height becomes the
//! sheet's single detent and requests one more layout pass, so the frame after
//! a content change is drawn at the new height. Reports equal to the stored
//! height change nothing.

use std::cell::Cell;
use std::rc::Rc;

use crossterm::event::MouseButton;
use crossterm::style::Color;

use crate::binding::{Binding, PresentationBinding};
use crate::border::SheetEdge;
use crate::canvas::TextAttributes;
use crate::containers::scroll_view::ScrollView;
use crate::measure::{HeightChange, MeasureProbe, MeasuredHeight};
use crate::{Canvas, KeyCode, MouseEvent, MouseEventKind, Region, Size, Widget};

/// Builds the sheet content. Called once per presentation.
pub type ContentBuilder<M> = Box<dyn Fn() -> Box<dyn Widget<M>>>;

/// What to do with content taller than the host surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeightPolicy {
    /// The detent is the full natural height, even past the surface. The top
    /// of the sheet is then clipped by the terminal.
    #[default]
    Natural,
    /// Cap the displayed height at the surface (minus the sheet's top edge)
    /// and scroll the remainder.
    ClampToSurface,
}

/// The height constraint applied to the sheet.
///
/// A sheet has exactly one detent: its content's measured height. There are
/// no fractional or medium/large stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detent {
    Height(u16),
}

impl Detent {
    pub fn height(self) -> u16 {
        match self {
            Detent::Height(height) => height,
        }
    }
}

/// Why the sheet closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    /// The host called `request_dismiss()` or `toggle()`.
    Requested,
    /// Escape was pressed.
    Escape,
    /// The scrim outside the sheet was clicked.
    OutsideClick,
}

/// Appearance and interaction options for a sheet.
#[derive(Debug, Clone)]
pub struct SheetConfig {
    pub height_policy: HeightPolicy,
    /// Draw a grabber in the sheet's top edge.
    pub drag_indicator: bool,
    /// Name of the top edge glyph set ("round", "square", "heavy", "double",
    /// "ascii", "none").
    pub border: &'static str,
    pub dismiss_on_escape: bool,
    pub dismiss_on_outside_click: bool,
    /// Dim the host while the sheet is open.
    pub scrim: bool,
    pub background: Color,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            height_policy: HeightPolicy::Natural,
            drag_indicator: true,
            border: "round",
            dismiss_on_escape: true,
            dismiss_on_outside_click: true,
            scrim: true,
            background: Color::AnsiValue(236),
        }
    }
}

/// Presents caller-built content in a bottom sheet sized to that content.
pub struct DynamicHeightSheet<M> {
    host: Box<dyn Widget<M>>,
    is_presented: PresentationBinding,
    builder: ContentBuilder<M>,
    /// Present only while the sheet is shown.
    content: Option<ScrollView<M>>,
    measured: MeasuredHeight,
    relayout: Rc<Cell<bool>>,
    config: SheetConfig,
    /// Host-owned policy, read at the start of every layout pass.
    policy: Option<Binding<HeightPolicy>>,
    edge: SheetEdge,
    /// Frame applied by the last layout pass. Rendering and hit-testing use
    /// it, so a height measured during a pass shows up on the next one.
    frame: Region,
    on_dismiss: Option<Box<dyn Fn(DismissReason) -> M>>,
}

impl<M: 'static> DynamicHeightSheet<M> {
    pub fn new<F>(host: Box<dyn Widget<M>>, is_presented: PresentationBinding, builder: F) -> Self
    where
        F: Fn() -> Box<dyn Widget<M>> + 'static,
    {
        let measured = MeasuredHeight::new();
        let relayout = Rc::new(Cell::new(false));
        let request = Rc::clone(&relayout);
        measured.subscribe(move |change| {
            log::debug!(
                "sheet detent {:?} -> {} (generation {})",
                change.from,
                change.to,
                change.generation
            );
            request.set(true);
        });

        let config = SheetConfig::default();
        let edge = SheetEdge::named(config.border);
        Self {
            host,
            is_presented,
            builder: Box::new(builder),
            content: None,
            measured,
            relayout,
            config,
            policy: None,
            edge,
            frame: Region::default(),
            on_dismiss: None,
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: SheetConfig) -> Self {
        self.edge = SheetEdge::named(config.border);
        self.config = config;
        self
    }

    pub fn with_height_policy(mut self, policy: HeightPolicy) -> Self {
        self.config.height_policy = policy;
        self
    }

    /// Follow a policy the host can change while the sheet is open.
    pub fn with_height_policy_binding(mut self, policy: Binding<HeightPolicy>) -> Self {
        self.config.height_policy = policy.get();
        self.policy = Some(policy);
        self
    }

    pub fn with_drag_indicator(mut self, visible: bool) -> Self {
        self.config.drag_indicator = visible;
        self
    }

    pub fn with_border(mut self, name: &'static str) -> Self {
        self.config.border = name;
        self.edge = SheetEdge::named(name);
        self
    }

    pub fn with_scrim(mut self, scrim: bool) -> Self {
        self.config.scrim = scrim;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.config.background = color;
        self
    }

    pub fn with_dismiss_on_escape(mut self, enabled: bool) -> Self {
        self.config.dismiss_on_escape = enabled;
        self
    }

    pub fn with_dismiss_on_outside_click(mut self, enabled: bool) -> Self {
        self.config.dismiss_on_outside_click = enabled;
        self
    }

    /// Produce a message when the user dismisses the sheet (Escape or a scrim
    /// click). Host-requested dismissals produce no message.
    pub fn with_on_dismiss<F>(mut self, on_dismiss: F) -> Self
    where
        F: Fn(DismissReason) -> M + 'static,
    {
        self.on_dismiss = Some(Box::new(on_dismiss));
        self
    }

    /// Observe detent changes.
    pub fn on_height_change(self, observer: impl Fn(HeightChange) + 'static) -> Self {
        self.measured.subscribe(observer);
        self
    }

    /// Change the tall-content policy at runtime.
    pub fn set_height_policy(&mut self, policy: HeightPolicy) {
        if self.config.height_policy == policy {
            return;
        }
        log::debug!("sheet height policy {:?} -> {policy:?}", self.config.height_policy);
        self.config.height_policy = policy;
        if let Some(content) = &mut self.content {
            content.set_scrollbar(policy == HeightPolicy::ClampToSurface);
        }
        self.relayout.set(true);
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn is_presented(&self) -> bool {
        self.content.is_some()
    }

    /// Last measured natural height of the content, if any.
    pub fn measured_height(&self) -> Option<u16> {
        self.measured.current()
    }

    /// The detent in effect while the sheet is shown.
    pub fn detent(&self) -> Option<Detent> {
        self.content
            .as_ref()
            .map(|_| Detent::Height(self.measured.height()))
    }

    /// Height of the content area as laid out in the last pass.
    pub fn displayed_height(&self) -> u16 {
        if self.content.is_none() {
            return 0;
        }
        self.content_region().height.clamp(0, u16::MAX as i32) as u16
    }

    /// Sheet frame (top edge plus content area) from the last layout pass.
    pub fn frame(&self) -> Option<Region> {
        self.content.as_ref().map(|_| self.frame)
    }

    /// Scroll position of the content, while shown.
    pub fn scroll_offset(&self) -> Option<i32> {
        self.content.as_ref().map(|view| view.scroll_state().offset)
    }

    fn chrome_height(&self) -> u16 {
        if self.config.drag_indicator || self.edge.is_visible() {
            1
        } else {
            0
        }
    }

    fn display_height_in(&self, surface: Region) -> u16 {
        let natural = self.measured.height();
        match self.config.height_policy {
            HeightPolicy::Natural => natural,
            HeightPolicy::ClampToSurface => {
                let room = (surface.height - self.chrome_height() as i32).max(0);
                natural.min(room.min(u16::MAX as i32) as u16)
            }
        }
    }

    fn frame_in(&self, surface: Region) -> Region {
        let height = self.display_height_in(surface) as i32 + self.chrome_height() as i32;
        Region::new(surface.x, surface.bottom() - height, surface.width, height)
    }

    fn content_region(&self) -> Region {
        let chrome = self.chrome_height() as i32;
        Region::new(
            self.frame.x,
            self.frame.y + chrome,
            self.frame.width,
            self.frame.height - chrome,
        )
    }

    /// Build content for a new presentation.
    fn open(&mut self) {
        let generation = self.measured.begin_generation();
        let measured = self.measured.clone();
        let probe = MeasureProbe::new((self.builder)())
            .with_generation(generation)
            .with_observer(move |report| {
                measured.report(report);
            });
        let scrollable = self.config.height_policy == HeightPolicy::ClampToSurface;
        self.content = Some(ScrollView::new(Box::new(probe)).with_scrollbar(scrollable));
        log::info!("sheet opened (generation {generation})");
    }

    fn close(&mut self, reason: DismissReason) {
        self.is_presented.dismiss();
        if self.content.take().is_some() {
            log::info!("sheet dismissed: {reason:?}");
        }
    }

    fn user_dismiss(&mut self, reason: DismissReason) -> Option<M> {
        self.close(reason);
        self.on_dismiss.as_ref().map(|f| f(reason))
    }

    /// Reconcile built content with the shared flag.
    fn sync_presentation(&mut self) {
        if self.is_presented.take_dismiss_request() {
            self.close(DismissReason::Requested);
        }
        match (self.is_presented.is_presented(), self.content.is_some()) {
            (true, false) => self.open(),
            (false, true) => {
                // Another sheet sharing the binding closed it.
                self.content = None;
            }
            _ => {}
        }
    }

    fn render_edge(&self, canvas: &mut Canvas, frame: Region) {
        let bg = Some(self.config.background);
        let fg = Some(Color::Grey);
        let width = frame.width;
        if width <= 0 {
            return;
        }
        let attrs = TextAttributes::default();

        if self.edge.is_visible() {
            canvas.put_char(frame.x, frame.y, self.edge.left, fg, bg, attrs);
            for x in 1..width - 1 {
                canvas.put_char(frame.x + x, frame.y, self.edge.fill, fg, bg, attrs);
            }
            if width > 1 {
                canvas.put_char(frame.x + width - 1, frame.y, self.edge.right, fg, bg, attrs);
            }
        }

        if self.config.drag_indicator {
            let grabber = self.edge.grabber;
            let grabber_width = grabber.chars().count() as i32;
            let x = frame.x + (width - grabber_width).max(0) / 2;
            canvas.put_str(x, frame.y, grabber, Some(Color::White), bg, attrs);
        }
    }
}

impl<M: 'static> Widget<M> for DynamicHeightSheet<M> {
    fn desired_size(&self) -> Size {
        self.host.desired_size()
    }

    fn layout(&mut self, region: Region) {
        if let Some(policy) = self.policy.as_ref().map(Binding::get) {
            self.set_height_policy(policy);
        }
        self.relayout.set(false);
        self.host.layout(region);
        self.sync_presentation();

        // Content is laid out inside the frame sized by the current detent.
        // The probe then reports the natural height, which may move the
        // detent and request another pass.
        self.frame = self.frame_in(region);
        let content_region = self.content_region();
        if let Some(content) = &mut self.content {
            content.layout(content_region);
        }
    }

    fn needs_layout(&self) -> bool {
        self.relayout.get()
            || self.host.needs_layout()
            || self.content.as_ref().is_some_and(|c| c.needs_layout())
    }

    fn render(&self, canvas: &mut Canvas, region: Region) {
        self.host.render(canvas, region);

        let Some(content) = &self.content else {
            return;
        };

        canvas.push_clip(region);
        if self.config.scrim {
            canvas.dim_region(region);
        }
        canvas.fill(self.frame, self.config.background);
        self.render_edge(canvas, self.frame);
        content.render(canvas, self.content_region());
        canvas.pop_clip();
    }

    fn on_event(&mut self, key: KeyCode) -> Option<M> {
        let Some(content) = &mut self.content else {
            return self.host.on_event(key);
        };
        if key == KeyCode::Esc && self.config.dismiss_on_escape {
            return self.user_dismiss(DismissReason::Escape);
        }
        // Modal: the host does not see keys while the sheet is open.
        content.on_event(key)
    }

    fn on_mouse(&mut self, event: MouseEvent, region: Region) -> Option<M> {
        if self.content.is_none() {
            return self.host.on_mouse(event, region);
        }

        let inside = self
            .frame
            .contains_point(event.column as i32, event.row as i32);
        if !inside {
            let is_click = matches!(event.kind, MouseEventKind::Down(MouseButton::Left));
            if is_click && self.config.dismiss_on_outside_click {
                return self.user_dismiss(DismissReason::OutsideClick);
            }
            return None;
        }

        let content_region = self.content_region();
        self.content
            .as_mut()
            .and_then(|content| content.on_mouse(event, content_region))
    }

    fn is_modal(&self) -> bool {
        self.content.is_some()
    }

    // Focus belongs to the host; sheet content is not focus-navigable.
    fn count_focusable(&self) -> usize {
        self.host.count_focusable()
    }

    fn clear_focus(&mut self) {
        self.host.clear_focus();
    }

    fn focus_nth(&mut self, n: usize) -> bool {
        self.host.focus_nth(n)
    }
}

/// Attach a dynamic-height sheet to any widget.
///
/// # Example
///
/// ```
/// use sheet::{Binding, ItemList, Label, PresentationBinding, SheetExt, Widget};
///
/// let shown = PresentationBinding::default();
/// let items = Binding::new(2usize);
/// let sheet = Label::<()>::new("host").dynamic_height_sheet(shown.clone(), move || {
///     Box::new(ItemList::new(items.clone())) as Box<dyn Widget<()>>
/// });
/// assert!(!sheet.is_presented());
/// ```
pub trait SheetExt<M: 'static>: Widget<M> + Sized + 'static {
    fn dynamic_height_sheet<F>(
        self,
        is_presented: PresentationBinding,
        content: F,
    ) -> DynamicHeightSheet<M>
    where
        F: Fn() -> Box<dyn Widget<M>> + 'static,
    {
        DynamicHeightSheet::new(Box::new(self), is_presented, content)
    }
}

impl<M: 'static, W: Widget<M> + 'static> SheetExt<M> for W {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Label;
    use crate::binding::Binding;
    use crate::widget::item_list::ItemList;

    fn list_sheet(
        count: &Binding<usize>,
        shown: &PresentationBinding,
    ) -> DynamicHeightSheet<()> {
        let items = count.clone();
        Label::new("host").dynamic_height_sheet(shown.clone(), move || {
            Box::new(ItemList::new(items.clone())) as Box<dyn Widget<()>>
        })
    }

    #[test]
    fn hidden_sheet_has_no_detent() {
        let sheet = list_sheet(&Binding::new(2), &PresentationBinding::default());
        assert_eq!(sheet.detent(), None);
        assert_eq!(sheet.displayed_height(), 0);
        assert!(!sheet.is_modal());
    }

    #[test]
    fn first_pass_measures_and_requests_relayout() {
        let shown = PresentationBinding::default();
        let mut sheet = list_sheet(&Binding::new(2), &shown);
        shown.present();

        let surface = Region::new(0, 0, 40, 30);
        sheet.layout(surface);
        assert_eq!(sheet.measured_height(), Some(9));
        assert!(sheet.needs_layout());

        sheet.layout(surface);
        assert!(!sheet.needs_layout());
        assert_eq!(sheet.detent(), Some(Detent::Height(9)));
        assert_eq!(sheet.displayed_height(), 9);
    }

    #[test]
    fn frame_is_docked_to_the_bottom() {
        let shown = PresentationBinding::new(true);
        let mut sheet = list_sheet(&Binding::new(2), &shown);
        let surface = Region::new(0, 0, 40, 30);
        sheet.layout(surface);
        sheet.layout(surface);
        // 9 rows of content plus the top edge
        assert_eq!(sheet.frame(), Some(Region::new(0, 20, 40, 10)));
    }

    #[test]
    fn without_chrome_frame_equals_content() {
        let shown = PresentationBinding::new(true);
        let mut sheet = list_sheet(&Binding::new(1), &shown)
            .with_drag_indicator(false)
            .with_border("none");
        let surface = Region::new(0, 0, 20, 20);
        sheet.layout(surface);
        sheet.layout(surface);
        assert_eq!(sheet.frame(), Some(Region::new(0, 15, 20, 5)));
    }

    #[test]
    fn clamp_policy_caps_displayed_height_only() {
        let shown = PresentationBinding::new(true);
        let mut sheet = list_sheet(&Binding::new(20), &shown)
            .with_height_policy(HeightPolicy::ClampToSurface);
        let surface = Region::new(0, 0, 40, 24);
        sheet.layout(surface);
        sheet.layout(surface);
        assert_eq!(sheet.measured_height(), Some(3 * 20 + 19 + 2));
        assert_eq!(sheet.displayed_height(), 23);
        assert_eq!(sheet.frame(), Some(Region::new(0, 0, 40, 24)));
    }

    #[test]
    fn natural_policy_lets_sheet_exceed_surface() {
        let shown = PresentationBinding::new(true);
        let mut sheet = list_sheet(&Binding::new(20), &shown);
        let surface = Region::new(0, 0, 40, 24);
        sheet.layout(surface);
        sheet.layout(surface);
        assert_eq!(sheet.displayed_height(), 81);
        let frame = sheet.frame().unwrap();
        assert_eq!(frame.y, 24 - 82);
    }

    #[test]
    fn policy_binding_applies_while_open() {
        let shown = PresentationBinding::new(true);
        let policy = Binding::new(HeightPolicy::Natural);
        let mut sheet =
            list_sheet(&Binding::new(20), &shown).with_height_policy_binding(policy.clone());
        let surface = Region::new(0, 0, 40, 24);
        sheet.layout(surface);
        sheet.layout(surface);
        assert_eq!(sheet.displayed_height(), 81);

        policy.set(HeightPolicy::ClampToSurface);
        sheet.layout(surface);
        assert_eq!(sheet.config().height_policy, HeightPolicy::ClampToSurface);
        assert_eq!(sheet.displayed_height(), 23);
    }

    #[test]
    fn escape_dismisses_and_reports() {
        let shown = PresentationBinding::new(true);
        let mut sheet = list_sheet(&Binding::new(2), &shown);
        sheet.layout(Region::new(0, 0, 40, 30));

        assert_eq!(sheet.on_event(KeyCode::Esc), None);
        assert!(!shown.is_presented());
        assert!(!sheet.is_presented());
    }

    #[test]
    fn escape_can_be_disabled() {
        let shown = PresentationBinding::new(true);
        let mut sheet = list_sheet(&Binding::new(2), &shown).with_dismiss_on_escape(false);
        sheet.layout(Region::new(0, 0, 40, 30));
        sheet.on_event(KeyCode::Esc);
        assert!(shown.is_presented());
    }

    #[test]
    fn builder_runs_once_per_presentation() {
        let builds = Rc::new(Cell::new(0));
        let counter = Rc::clone(&builds);
        let shown = PresentationBinding::default();
        let mut sheet = Label::<()>::new("host").dynamic_height_sheet(shown.clone(), move || {
            counter.set(counter.get() + 1);
            Box::new(Label::new("content")) as Box<dyn Widget<()>>
        });
        let surface = Region::new(0, 0, 20, 10);

        sheet.layout(surface);
        assert_eq!(builds.get(), 0);

        shown.present();
        sheet.layout(surface);
        sheet.layout(surface);
        sheet.layout(surface);
        assert_eq!(builds.get(), 1);

        shown.request_dismiss();
        sheet.layout(surface);
        shown.present();
        sheet.layout(surface);
        assert_eq!(builds.get(), 2);
    }
}
