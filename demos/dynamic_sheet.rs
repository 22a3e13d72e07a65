//! Dynamic Height Sheet Example
//!
//! A bottom sheet that sizes itself to a list of items:
//! - Enter/Space on a button opens the sheet with 2, 5 or 20 items
//! - `+` / `-` change the item count while the sheet is open
//! - `g` starts or stops growing the list on a timer
//! - `c` switches between natural height and clamping to the screen
//! - Escape or a click above the sheet dismisses it, `q` quits
//!
//! Set `SHEET_LOG` to choose the log file (default `dynamic_sheet.log`).

use std::time::Duration;

use sheet::{
    App, AppContext, Binding, Button, Center, Compose, DismissReason, HeightPolicy,
    IntervalHandle, ItemList, KeyCode, Label, MessageEnvelope, Middle, PresentationBinding,
    Result, SheetExt, Spacing, Vertical, Widget, log,
};

/// The grow timer wraps back to one item after this many.
const GROW_LIMIT: usize = 30;

/// Item counts offered by the menu buttons.
const SHOW_COUNTS: [usize; 3] = [2, 5, 20];

#[derive(Debug, Clone)]
enum Message {
    Show(usize),
    Dismissed(DismissReason),
    Grow,
}

struct SheetApp {
    running: bool,
    focus: usize,
    focusable: usize,
    shown: PresentationBinding,
    items: Binding<usize>,
    policy: Binding<HeightPolicy>,
    ctx: Option<AppContext<Message>>,
    grower: Option<IntervalHandle>,
}

impl SheetApp {
    fn new() -> Self {
        Self {
            running: true,
            focus: 0,
            focusable: menu().count_focusable(),
            shown: PresentationBinding::default(),
            items: Binding::new(2),
            policy: Binding::new(HeightPolicy::Natural),
            ctx: None,
            grower: None,
        }
    }

    fn toggle_growth(&mut self) {
        if self.grower.take().is_some() {
            log::info!("stopped growing");
            return;
        }
        if let Some(ctx) = &self.ctx {
            log::info!("growing the list every 500ms");
            self.grower = Some(ctx.set_interval(Duration::from_millis(500), || Message::Grow));
        }
    }
}

/// Title, one button per entry in `SHOW_COUNTS`, and a help line.
fn menu() -> Vertical<Message> {
    let title: Label<Message> = Label::new("Dynamic height sheet").with_bold(true);
    let help: Label<Message> = Label::new("+/- items  g grow  c clamp  q quit");
    let mut rows = vec![Box::new(title) as Box<dyn Widget<Message>>];
    for count in SHOW_COUNTS {
        let button = Button::new(format!("Show {count} items")).with_message(Message::Show(count));
        rows.push(Box::new(button));
    }
    rows.push(Box::new(help));
    Vertical::new(rows).with_gap(1)
}

impl Compose for SheetApp {
    type Message = Message;

    fn compose(&self) -> Box<dyn Widget<Message>> {
        let host = Middle::new(Box::new(Center::new(Box::new(menu()))));

        let items = self.items.clone();
        let sheet = host
            .dynamic_height_sheet(self.shown.clone(), move || {
                let header: Label<Message> = Label::new("Items").with_bold(true);
                let list: ItemList<Message> = ItemList::new(items.clone());
                let children = vec![
                    Box::new(header) as Box<dyn Widget<Message>>,
                    Box::new(list),
                ];
                Box::new(
                    Vertical::new(children)
                        .with_padding(Spacing::symmetric(0, 2)),
                ) as Box<dyn Widget<Message>>
            })
            .with_height_policy_binding(self.policy.clone())
            .with_on_dismiss(Message::Dismissed)
            .on_height_change(|change| {
                log::info!("sheet height {:?} -> {}", change.from, change.to);
            });
        Box::new(sheet)
    }
}

impl App for SheetApp {
    fn on_mount(&mut self, ctx: &AppContext<Message>) {
        self.ctx = Some(ctx.clone());
    }

    fn handle_message(&mut self, envelope: MessageEnvelope<Message>) {
        match envelope.message {
            Message::Show(count) => {
                self.items.set(count);
                self.shown.present();
            }
            Message::Dismissed(reason) => {
                log::info!("dismissed by {reason:?}");
                self.grower = None;
            }
            Message::Grow => {
                self.items.update(|n| if *n >= GROW_LIMIT { 1 } else { n + 1 });
            }
        }
    }

    fn on_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('c') => {
                self.policy.update(|policy| match policy {
                    HeightPolicy::Natural => HeightPolicy::ClampToSurface,
                    HeightPolicy::ClampToSurface => HeightPolicy::Natural,
                });
            }
            // The open sheet takes focus keys; menu focus waits until it closes.
            _ if !self.shown.is_presented() => match key {
                KeyCode::Tab | KeyCode::Down => {
                    self.focus = (self.focus + 1) % self.focusable;
                }
                KeyCode::BackTab | KeyCode::Up => {
                    self.focus = (self.focus + self.focusable - 1) % self.focusable;
                }
                _ => {}
            },
            KeyCode::Char('+') => {
                self.items.update(|n| n + 1);
            }
            KeyCode::Char('-') => {
                self.items.update(|n| n.saturating_sub(1));
            }
            KeyCode::Char('g') => self.toggle_growth(),
            _ => {}
        }
    }

    fn should_quit(&self) -> bool {
        !self.running
    }

    fn focus_index(&self) -> usize {
        self.focus
    }
}

fn main() -> Result<()> {
    let log_path =
        std::env::var("SHEET_LOG").unwrap_or_else(|_| "dynamic_sheet.log".to_string());
    sheet::init_logger(log_path)?;

    let mut app = SheetApp::new();
    app.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_has_one_button_per_item_count() {
        assert_eq!(menu().count_focusable(), SHOW_COUNTS.len());
    }

    #[test]
    fn focus_wraps_in_both_directions() {
        let mut app = SheetApp::new();
        app.on_key(KeyCode::Up);
        assert_eq!(app.focus_index(), 2);
        app.on_key(KeyCode::Tab);
        assert_eq!(app.focus_index(), 0);
        app.on_key(KeyCode::Down);
        assert_eq!(app.focus_index(), 1);
        app.on_key(KeyCode::BackTab);
        assert_eq!(app.focus_index(), 0);
    }

    #[test]
    fn open_sheet_keeps_menu_focus_and_takes_item_keys() {
        let mut app = SheetApp::new();
        app.handle_message(MessageEnvelope::new(Message::Show(5), "Button"));
        assert!(app.shown.is_presented());
        assert_eq!(app.items.get(), 5);

        app.on_key(KeyCode::Tab);
        assert_eq!(app.focus_index(), 0);
        app.on_key(KeyCode::Char('+'));
        assert_eq!(app.items.get(), 6);
    }
}
