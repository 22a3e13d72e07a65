//! A retained-mode terminal toolkit built around a bottom sheet whose height
//! follows its content.
//!
//! Attach a [`DynamicHeightSheet`] to any widget with
//! [`SheetExt::dynamic_height_sheet`]. The sheet measures its content after
//! each layout pass and resizes itself to fit on the next one.

pub mod binding;
pub mod border;
pub mod canvas;
pub mod containers;
pub mod context;
pub mod error;
mod grapheme;
mod log_init;
pub mod measure;
pub mod message;
pub mod scroll;
pub mod sheet;
pub mod testing;
pub mod widget;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, EventStream, KeyEventKind};
pub use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::{cursor, execute, terminal};
use futures::StreamExt;
use tokio::sync::mpsc;

pub use binding::{Binding, PresentationBinding};
pub use canvas::{Canvas, Region, Size, Spacing};
pub use containers::{Center, Middle, scroll_view::ScrollView, vertical::Vertical};
pub use context::{AppContext, IntervalHandle};
pub use error::{Result, SheetError};
pub use log_init::init_logger;
pub use measure::{GeometryReport, HeightChange, MeasureProbe, MeasuredHeight};
pub use message::MessageEnvelope;
pub use scroll::ScrollState;
pub use sheet::{
    Detent, DismissReason, DynamicHeightSheet, HeightPolicy, SheetConfig, SheetExt,
};
pub use widget::{
    Compose, Widget, WidgetStates, button::Button, item_list::ItemList, label::Label,
};

// Re-export the log crate so apps can use sheet::log::info!, etc.
pub use log;

/// Upper bound on layout passes per frame.
///
/// A settled tree needs one pass, a content height change needs two. The cap
/// only matters for content whose height never stops changing.
pub const MAX_LAYOUT_PASSES: usize = 8;

/// Run layout passes over `root` until it stops requesting layout.
///
/// Returns the number of passes run, at most [`MAX_LAYOUT_PASSES`].
pub fn layout_until_settled<M, W>(root: &mut W, region: Region) -> usize
where
    W: Widget<M> + ?Sized,
{
    let mut passes = 0;
    loop {
        root.layout(region);
        passes += 1;
        if !root.needs_layout() {
            return passes;
        }
        if passes >= MAX_LAYOUT_PASSES {
            log::warn!("layout did not settle after {passes} passes");
            return passes;
        }
    }
}

/// Settle the layout of `root`, then draw and flush it once.
fn draw_frame<M>(root: &mut dyn Widget<M>, canvas: &mut Canvas) -> Result<usize> {
    let region = canvas.region();
    let passes = layout_until_settled::<M, _>(&mut *root, region);
    canvas.clear();
    root.render(canvas, region);
    canvas.flush()?;
    Ok(passes)
}

/// Give a key to the widget tree, then to the app.
///
/// The app sees every key, also while a modal is open, so app-wide
/// shortcuts keep working over a sheet.
fn route_key<A>(app: &mut A, root: &mut dyn Widget<A::Message>, key: KeyCode)
where
    A: App + ?Sized,
    A::Message: Send + 'static,
{
    if let Some(msg) = root.on_event(key) {
        let envelope = MessageEnvelope::new(msg, root.type_name());
        app.handle_message(envelope);
    }
    app.on_key(key);
}

/// Move tree focus to the app's focus index.
///
/// Nothing moves while a modal holds input; the change stays pending until
/// the modal closes. Returns true when focus was moved.
fn sync_focus<M>(root: &mut dyn Widget<M>, wanted: usize, applied: &mut usize) -> bool {
    if wanted == *applied || root.is_modal() {
        return false;
    }
    root.clear_focus();
    root.focus_nth(wanted);
    *applied = wanted;
    true
}

/// The main application trait.
///
/// The widget tree from `compose()` is built once and kept. Apps share
/// state with it through [`Binding`]s and [`PresentationBinding`]s created
/// before composing, and change that state from `handle_message` and
/// `on_key`. The next frame picks the changes up during layout.
pub trait App: Compose
where
    Self::Message: Send + 'static,
{
    /// Handle a message produced by a widget, a timer or a posted message.
    fn handle_message(&mut self, _envelope: MessageEnvelope<Self::Message>) {}

    /// Handle key events. Called after the widget tree saw the key, including
    /// while a modal sheet is open.
    fn on_key(&mut self, key: KeyCode);

    /// Return true when the application should exit.
    fn should_quit(&self) -> bool;

    /// Index of the focusable widget that should hold focus.
    fn focus_index(&self) -> usize {
        0
    }

    /// Called once after the widget tree is built, inside the runtime.
    ///
    /// # Example
    /// ```ignore
    /// fn on_mount(&mut self, ctx: &AppContext<Self::Message>) {
    ///     self.ticker = Some(ctx.set_interval(Duration::from_secs(1), || Message::Tick));
    /// }
    /// ```
    fn on_mount(&mut self, _ctx: &AppContext<Self::Message>) {}

    /// Run the application event loop.
    ///
    /// Runtime handling:
    /// - No runtime: creates a new multi-threaded runtime
    /// - Multi-thread runtime: reuses it via `block_in_place`
    /// - Current-thread runtime: returns an error (use `run_async` instead)
    fn run(&mut self) -> Result<()> {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                use tokio::runtime::RuntimeFlavor;
                match handle.runtime_flavor() {
                    RuntimeFlavor::MultiThread => {
                        tokio::task::block_in_place(|| handle.block_on(self.run_inner()))
                    }
                    _ => Err(SheetError::RuntimeInit(
                        "Cannot call run() from a current-thread Tokio runtime. \
                         Use run_async().await instead."
                            .to_string(),
                    )),
                }
            }
            Err(_) => {
                let rt = tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .build()
                    .map_err(|e| SheetError::RuntimeInit(e.to_string()))?;
                rt.block_on(self.run_inner())
            }
        }
    }

    /// Run the application event loop from an async context.
    fn run_async(&mut self) -> impl std::future::Future<Output = Result<()>> + '_ {
        self.run_inner()
    }

    /// Terminal setup and teardown around the event loop.
    fn run_inner(&mut self) -> impl std::future::Future<Output = Result<()>> + '_ {
        async move {
            let mut stdout = std::io::stdout();
            terminal::enable_raw_mode()?;
            execute!(
                stdout,
                terminal::EnterAlternateScreen,
                cursor::Hide,
                EnableMouseCapture
            )?;

            let result = self.event_loop_async().await;

            // Restore the terminal even if the loop failed.
            execute!(
                stdout,
                DisableMouseCapture,
                cursor::Show,
                terminal::LeaveAlternateScreen
            )?;
            terminal::disable_raw_mode()?;
            result
        }
    }

    /// The main async event loop.
    fn event_loop_async(&mut self) -> impl std::future::Future<Output = Result<()>> + '_ {
        async move {
            let (cols, rows) = terminal::size()?;
            let mut canvas = Canvas::new(cols, rows);

            let mut root = self.compose();
            root.clear_focus();
            root.focus_nth(self.focus_index());

            let (tx, mut rx) = mpsc::unbounded_channel::<MessageEnvelope<Self::Message>>();
            self.on_mount(&AppContext::new(tx.clone()));

            let mut event_stream = EventStream::new();
            let mut applied_focus = self.focus_index();
            let mut needs_render = true;

            while !self.should_quit() {
                if sync_focus(root.as_mut(), self.focus_index(), &mut applied_focus) {
                    needs_render = true;
                }

                if needs_render {
                    let passes = draw_frame(root.as_mut(), &mut canvas)?;
                    if passes > 1 {
                        log::debug!("frame settled after {passes} layout passes");
                    }
                    needs_render = false;
                }

                // Not `biased`: a busy event stream must not starve timers.
                tokio::select! {
                    maybe_event = event_stream.next() => {
                        match maybe_event {
                            Some(Ok(Event::Key(key_event))) if key_event.kind != KeyEventKind::Release => {
                                route_key(self, root.as_mut(), key_event.code);
                                needs_render = true;
                            }
                            Some(Ok(Event::Mouse(mouse_event))) => {
                                let region = canvas.region();
                                if let Some(msg) = root.on_mouse(mouse_event, region) {
                                    self.handle_message(MessageEnvelope::new(msg, "Mouse"));
                                }
                                needs_render = true;
                            }
                            Some(Ok(Event::Resize(width, height))) => {
                                log::debug!("terminal resized to {width}x{height}");
                                canvas = Canvas::new(width, height);
                                needs_render = true;
                            }
                            Some(Ok(_)) => {}
                            Some(Err(e)) => return Err(SheetError::Io(e)),
                            None => break,
                        }
                    }
                    Some(envelope) = rx.recv() => {
                        log::debug!("message from {}", envelope.sender_type);
                        self.handle_message(envelope);
                        needs_render = true;
                    }
                }
            }

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Msg {
        Pick(usize),
        Dismissed(DismissReason),
    }

    #[derive(Default)]
    struct Recorder {
        keys: Vec<KeyCode>,
        messages: Vec<Msg>,
    }

    impl Compose for Recorder {
        type Message = Msg;

        fn compose(&self) -> Box<dyn Widget<Msg>> {
            Box::new(Label::new("recorder"))
        }
    }

    impl App for Recorder {
        fn handle_message(&mut self, envelope: MessageEnvelope<Msg>) {
            self.messages.push(envelope.message);
        }

        fn on_key(&mut self, key: KeyCode) {
            self.keys.push(key);
        }

        fn should_quit(&self) -> bool {
            false
        }
    }

    fn region() -> Region {
        Region::from_u16(0, 0, 20, 12)
    }

    /// Two buttons under a sheet holding one label.
    fn menu(shown: &PresentationBinding) -> Box<dyn Widget<Msg>> {
        let buttons = vec![
            Box::new(Button::new("one").with_message(Msg::Pick(1))) as Box<dyn Widget<Msg>>,
            Box::new(Button::new("two").with_message(Msg::Pick(2))),
        ];
        let sheet = Vertical::new(buttons)
            .dynamic_height_sheet(shown.clone(), || {
                Box::new(Label::new("sheet")) as Box<dyn Widget<Msg>>
            })
            .with_on_dismiss(Msg::Dismissed);
        Box::new(sheet)
    }

    #[test]
    fn opening_a_sheet_settles_in_two_passes() {
        let shown = PresentationBinding::new(true);
        let mut root = menu(&shown);
        assert_eq!(layout_until_settled::<Msg, _>(root.as_mut(), region()), 2);
        assert_eq!(layout_until_settled::<Msg, _>(root.as_mut(), region()), 1);
    }

    #[test]
    fn focus_changes_wait_for_the_sheet_to_close() {
        let shown = PresentationBinding::default();
        let mut root = menu(&shown);
        let mut applied = 0;
        root.focus_nth(0);

        assert!(sync_focus(root.as_mut(), 1, &mut applied));
        assert_eq!(root.on_event(KeyCode::Enter), Some(Msg::Pick(2)));

        shown.present();
        layout_until_settled::<Msg, _>(root.as_mut(), region());
        assert!(root.is_modal());
        assert!(!sync_focus(root.as_mut(), 0, &mut applied));
        assert_eq!(applied, 1);

        assert_eq!(
            root.on_event(KeyCode::Esc),
            Some(Msg::Dismissed(DismissReason::Escape))
        );
        assert!(!root.is_modal());
        assert_eq!(root.on_event(KeyCode::Enter), Some(Msg::Pick(2)));

        assert!(sync_focus(root.as_mut(), 0, &mut applied));
        assert_eq!(root.on_event(KeyCode::Enter), Some(Msg::Pick(1)));
    }

    #[test]
    fn app_keys_arrive_while_the_sheet_is_open() {
        let shown = PresentationBinding::new(true);
        let mut root = menu(&shown);
        root.focus_nth(0);
        layout_until_settled::<Msg, _>(root.as_mut(), region());
        let mut app = Recorder::default();

        route_key(&mut app, root.as_mut(), KeyCode::Enter);
        route_key(&mut app, root.as_mut(), KeyCode::Esc);

        assert_eq!(app.keys, vec![KeyCode::Enter, KeyCode::Esc]);
        assert_eq!(app.messages, vec![Msg::Dismissed(DismissReason::Escape)]);
        assert!(!shown.is_presented());

        route_key(&mut app, root.as_mut(), KeyCode::Enter);
        assert_eq!(app.messages.last(), Some(&Msg::Pick(1)));
    }
}
