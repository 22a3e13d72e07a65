//! Frame-by-frame behaviour of the dynamic-height sheet.

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::style::Color;
use sheet::testing::{FrameDriver, mouse};
use sheet::{
    Binding, Button, DismissReason, DynamicHeightSheet, HeightPolicy, ItemList, KeyCode, Label,
    PresentationBinding, SheetExt, Vertical, Widget,
};

#[derive(Debug, Clone, PartialEq)]
enum Msg {
    Dismissed(DismissReason),
    Pressed,
}

const EDGE: &str = "╭───────━━━━───────╮";

fn item_sheet(count: &Binding<usize>, shown: &PresentationBinding) -> DynamicHeightSheet<Msg> {
    let items = count.clone();
    Label::new("host")
        .dynamic_height_sheet(shown.clone(), move || {
            Box::new(ItemList::new(items.clone())) as Box<dyn Widget<Msg>>
        })
        .with_on_dismiss(Msg::Dismissed)
}

fn driver(
    count: &Binding<usize>,
    shown: &PresentationBinding,
    width: u16,
    height: u16,
) -> FrameDriver<Msg, DynamicHeightSheet<Msg>> {
    FrameDriver::new(item_sheet(count, shown), width, height)
}

#[test]
fn first_frame_shows_chrome_then_content_height() {
    let count = Binding::new(2);
    let shown = PresentationBinding::default();
    let mut driver = driver(&count, &shown, 20, 12);

    let hidden = driver.frame();
    assert_eq!(hidden.to_text_trimmed(), "host");

    shown.present();
    let first = driver.frame();
    assert_eq!(driver.root().displayed_height(), 0);
    assert_eq!(first.row_trimmed(11), Some(EDGE.to_string()));
    assert!(driver.root().needs_layout());

    let second = driver.frame();
    assert_eq!(driver.root().displayed_height(), 9);
    assert!(!driver.root().needs_layout());
    assert_eq!(second.row_trimmed(2), Some(EDGE.to_string()));
    assert_eq!(second.row_trimmed(5), Some("    Item: 1".to_string()));
    assert_eq!(second.row_trimmed(9), Some("    Item: 2".to_string()));
    assert_eq!(second.row_trimmed(11), Some(String::new()));
}

#[test]
fn sheet_paints_scrim_surface_and_rows() {
    let count = Binding::new(2);
    let shown = PresentationBinding::new(true);
    let mut driver = driver(&count, &shown, 20, 12);
    driver.settle();
    let frame = driver.snapshot();

    // host behind the scrim
    assert!(frame.is_dim_at(0, 0));
    assert!(!frame.is_dim_at(0, 3));
    // sheet surface and item row backgrounds
    assert_eq!(frame.bg_at(0, 3), Some(Color::AnsiValue(236)));
    assert_eq!(frame.bg_at(2, 4), Some(Color::AnsiValue(238)));
    assert_eq!(frame.first_row_with_bg(0, Color::AnsiValue(236)), Some(2));
}

#[test]
fn settling_takes_two_passes_then_one() {
    let count = Binding::new(2);
    let shown = PresentationBinding::new(true);
    let mut driver = driver(&count, &shown, 20, 30);

    assert_eq!(driver.settle(), 2);
    assert_eq!(driver.settle(), 1);
    assert_eq!(driver.frames(), 3);
}

#[test]
fn equal_reports_publish_nothing() {
    let count = Binding::new(3);
    let shown = PresentationBinding::new(true);
    let changes = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&changes);
    let sheet = item_sheet(&count, &shown).on_height_change(move |change| {
        seen.borrow_mut().push(change.to);
    });
    let mut driver = FrameDriver::new(sheet, 20, 30);

    driver.settle();
    for _ in 0..3 {
        driver.frame();
        assert!(!driver.root().needs_layout());
    }
    assert_eq!(*changes.borrow(), vec![13]);
}

#[test]
fn re_presenting_shows_the_new_content_height() {
    let count = Binding::new(2);
    let shown = PresentationBinding::new(true);
    let mut driver = driver(&count, &shown, 30, 100);
    driver.settle();
    assert_eq!(driver.root().displayed_height(), 9);

    driver.press(KeyCode::Esc);
    driver.frame();
    count.set(20);
    shown.present();

    // The previous height is kept until the new content reports.
    driver.frame();
    assert_eq!(driver.root().displayed_height(), 9);
    driver.frame();
    assert_eq!(driver.root().displayed_height(), 81);
    assert!(!driver.root().needs_layout());
}

#[test]
fn escape_turns_the_shared_flag_off() {
    let count = Binding::new(2);
    let shown = PresentationBinding::default();
    let events = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&events);
    shown.subscribe(move |presented| log.borrow_mut().push(presented));

    let mut driver = driver(&count, &shown, 20, 20);
    shown.present();
    driver.settle();

    assert_eq!(
        driver.press(KeyCode::Esc),
        Some(Msg::Dismissed(DismissReason::Escape))
    );
    assert!(!shown.is_presented());
    assert_eq!(*events.borrow(), vec![true, false]);

    let after = driver.frame();
    assert_eq!(after.to_text_trimmed(), "host");
    assert!(!after.is_dim_at(0, 0));
}

#[test]
fn scrim_click_dismisses_and_sheet_click_does_not() {
    let count = Binding::new(2);
    let shown = PresentationBinding::new(true);
    let mut driver = driver(&count, &shown, 20, 20);
    driver.settle();
    let frame = driver.root().frame().unwrap();
    assert_eq!(frame.y, 10);

    assert_eq!(driver.click(3, 12), None);
    assert!(shown.is_presented());

    assert_eq!(
        driver.click(3, 2),
        Some(Msg::Dismissed(DismissReason::OutsideClick))
    );
    assert!(!shown.is_presented());
}

#[test]
fn host_dismissal_request_applies_on_next_layout() {
    let count = Binding::new(2);
    let shown = PresentationBinding::new(true);
    let mut driver = driver(&count, &shown, 20, 20);
    driver.settle();

    shown.request_dismiss();
    assert!(shown.is_presented());
    assert!(driver.root().is_presented());

    driver.frame();
    assert!(!shown.is_presented());
    assert!(!driver.root().is_presented());
    assert!(!shown.is_dismiss_pending());
}

#[test]
fn content_change_while_open_resizes_without_dismissal() {
    let count = Binding::new(2);
    let shown = PresentationBinding::new(true);
    let mut driver = driver(&count, &shown, 20, 40);
    driver.settle();
    assert_eq!(driver.root().displayed_height(), 9);

    count.set(5);
    assert_eq!(driver.settle(), 2);
    assert_eq!(driver.root().displayed_height(), 21);
    assert!(shown.is_presented());
    assert_eq!(driver.snapshot().row_trimmed(37), Some("    Item: 5".to_string()));

    count.set(1);
    driver.settle();
    assert_eq!(driver.root().displayed_height(), 5);
}

#[test]
fn height_tracks_item_count_without_snapping() {
    let count = Binding::new(1);
    let shown = PresentationBinding::new(true);
    let mut driver = driver(&count, &shown, 20, 200);

    for n in 1..=20 {
        count.set(n);
        driver.settle();
        assert_eq!(driver.root().displayed_height() as usize, 4 * n + 1);
        assert_eq!(
            driver.root().detent().map(|d| d.height() as usize),
            Some(4 * n + 1)
        );
    }
}

#[test]
fn clamped_sheet_scrolls_its_content() {
    let count = Binding::new(20);
    let shown = PresentationBinding::new(true);
    let sheet = item_sheet(&count, &shown).with_height_policy(HeightPolicy::ClampToSurface);
    let mut driver = FrameDriver::new(sheet, 40, 24);
    driver.settle();

    assert_eq!(driver.root().measured_height(), Some(81));
    assert_eq!(driver.root().displayed_height(), 23);

    driver.press(KeyCode::Down);
    assert_eq!(driver.root().scroll_offset(), Some(1));
    driver.press(KeyCode::End);
    assert_eq!(driver.root().scroll_offset(), Some(58));

    let frame = driver.frame();
    assert_eq!(frame.cell(39, 23).map(|c| c.symbol), Some('┃'));
    assert_eq!(frame.cell(39, 1).map(|c| c.symbol), Some('│'));
    assert!(frame.row(21).unwrap().starts_with("    Item: 20 "));

    driver.mouse(mouse::scroll_up(5, 10));
    assert_eq!(driver.root().scroll_offset(), Some(55));
}

#[test]
fn empty_content_shows_only_the_edge() {
    let shown = PresentationBinding::new(true);
    let sheet: DynamicHeightSheet<Msg> = Label::new("host")
        .dynamic_height_sheet(shown.clone(), || {
            Box::new(Vertical::new(Vec::new())) as Box<dyn Widget<Msg>>
        });
    let mut driver = FrameDriver::new(sheet, 20, 6);

    assert_eq!(driver.settle(), 2);
    assert_eq!(driver.root().measured_height(), Some(0));
    assert_eq!(driver.root().displayed_height(), 0);
    assert_eq!(driver.snapshot().row_trimmed(5), Some(EDGE.to_string()));
}

#[test]
fn open_sheet_captures_keys_from_the_host() {
    let shown = PresentationBinding::default();
    let count = Binding::new(2);
    let items = count.clone();
    let host: Button<Msg> = Button::new("Open").with_message(Msg::Pressed);
    let mut driver = FrameDriver::new(
        host.dynamic_height_sheet(shown.clone(), move || {
            Box::new(ItemList::new(items.clone())) as Box<dyn Widget<Msg>>
        }),
        20,
        20,
    );
    driver.root_mut().focus_nth(0);
    driver.settle();

    assert_eq!(driver.press(KeyCode::Enter), Some(Msg::Pressed));
    assert!(!driver.root().is_modal());

    shown.present();
    driver.settle();
    assert!(driver.root().is_modal());
    assert_eq!(driver.press(KeyCode::Enter), None);
}

#[test]
fn square_edge_with_grabber() {
    let shown = PresentationBinding::new(true);
    let sheet: DynamicHeightSheet<Msg> = Label::new("host")
        .dynamic_height_sheet(shown.clone(), || {
            Box::new(Label::new("hello")) as Box<dyn Widget<Msg>>
        })
        .with_border("square")
        .with_scrim(false);
    let mut driver = FrameDriver::new(sheet, 20, 4);
    driver.settle();

    let frame = driver.snapshot();
    insta::assert_snapshot!(frame.to_text_trimmed(), @r"
    host

    ┌───────━━━━───────┐
    hello
    ");
    assert!(!frame.is_dim_at(0, 0));
}
