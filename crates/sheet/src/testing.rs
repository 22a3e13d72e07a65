//! Test utilities for rendering widgets without a terminal.
//!
//! Two levels are provided:
//!
//! 1. **Widget-level** via [`TestCanvas`]: render one widget into an
//!    off-screen canvas and inspect the [`RenderSnapshot`].
//! 2. **Frame-level** via [`FrameDriver`]: run layout and render passes the
//!    way the event loop does, one frame at a time, and feed key and mouse
//!    input. This is what sheet height convergence is tested with.
//!
//! # Example
//!
//! ```
//! use sheet::testing::TestCanvas;
//! use sheet::Label;
//!
//! let label: Label<()> = Label::new("Hello, World!");
//! let mut canvas = TestCanvas::new(20, 1);
//! let snapshot = canvas.render_widget(&label);
//! assert_eq!(snapshot.to_text_trimmed(), "Hello, World!");
//! ```

use std::marker::PhantomData;

use crossterm::style::Color;

use crate::canvas::{Canvas, Cell, Region, TextAttributes};
use crate::widget::Widget;
use crate::{KeyCode, MouseEvent};

/// A test-focused canvas wrapper that provides snapshot-friendly output.
pub struct TestCanvas {
    canvas: Canvas,
    width: u16,
    height: u16,
}

/// Captured rendering output.
#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    cells: Vec<Vec<CellSnapshot>>,
    width: usize,
    height: usize,
}

/// A single cell's captured state.
#[derive(Clone, Debug, PartialEq)]
pub struct CellSnapshot {
    pub symbol: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub attrs: TextAttributes,
}

impl From<&Cell> for CellSnapshot {
    fn from(cell: &Cell) -> Self {
        Self {
            symbol: cell.symbol,
            fg: cell.fg,
            bg: cell.bg,
            attrs: cell.attrs,
        }
    }
}

impl TestCanvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            canvas: Canvas::new(width, height),
            width,
            height,
        }
    }

    /// Render a widget at (0, 0) filling the whole canvas.
    pub fn render_widget<M>(&mut self, widget: &dyn Widget<M>) -> RenderSnapshot {
        self.render_widget_at(widget, Region::from_u16(0, 0, self.width, self.height))
    }

    /// Render a widget into a specific region.
    pub fn render_widget_at<M>(&mut self, widget: &dyn Widget<M>, region: Region) -> RenderSnapshot {
        self.canvas.clear();
        widget.render(&mut self.canvas, region);
        RenderSnapshot::capture(&self.canvas)
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}

impl RenderSnapshot {
    fn capture(canvas: &Canvas) -> Self {
        let size = canvas.size();
        let cells = (0..size.height as i32)
            .map(|y| {
                (0..size.width as i32)
                    .map(|x| {
                        canvas
                            .get_cell_at(x, y)
                            .map(CellSnapshot::from)
                            .unwrap_or_else(|| CellSnapshot::from(&Cell::BLANK))
                    })
                    .collect()
            })
            .collect();
        Self {
            cells,
            width: size.width as usize,
            height: size.height as usize,
        }
    }

    /// Characters only, one line per row.
    pub fn to_text(&self) -> String {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.symbol).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Like [`to_text`](Self::to_text) with trailing spaces and trailing
    /// blank rows removed.
    pub fn to_text_trimmed(&self) -> String {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| c.symbol)
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
            .trim_end()
            .to_string()
    }

    pub fn row(&self, y: usize) -> Option<String> {
        self.cells.get(y).map(|row| row.iter().map(|c| c.symbol).collect())
    }

    pub fn row_trimmed(&self, y: usize) -> Option<String> {
        self.row(y).map(|s| s.trim_end().to_string())
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&CellSnapshot> {
        self.cells.get(y).and_then(|row| row.get(x))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn has_bg_at(&self, x: usize, y: usize) -> bool {
        self.cell(x, y).is_some_and(|c| c.bg.is_some())
    }

    pub fn bg_at(&self, x: usize, y: usize) -> Option<Color> {
        self.cell(x, y).and_then(|c| c.bg)
    }

    pub fn is_dim_at(&self, x: usize, y: usize) -> bool {
        self.cell(x, y).is_some_and(|c| c.attrs.dim)
    }

    /// Number of rows from the top to the first row whose background is
    /// `color`, or `None` if no row has it in column `x`.
    pub fn first_row_with_bg(&self, x: usize, color: Color) -> Option<usize> {
        (0..self.height).find(|&y| self.bg_at(x, y) == Some(color))
    }
}

/// Drives a widget tree frame by frame, like the event loop does.
///
/// Each [`frame`](Self::frame) is one layout pass followed by a render, so
/// a frame drawn before the tree settled can be inspected.
/// [`settle`](Self::settle) draws a frame the way the event loop does.
pub struct FrameDriver<M, W: Widget<M>> {
    root: W,
    canvas: Canvas,
    frames: usize,
    _message: PhantomData<M>,
}

impl<M, W: Widget<M>> FrameDriver<M, W> {
    pub fn new(root: W, width: u16, height: u16) -> Self {
        Self {
            root,
            canvas: Canvas::new(width, height),
            frames: 0,
            _message: PhantomData,
        }
    }

    pub fn region(&self) -> Region {
        self.canvas.region()
    }

    /// Run one layout pass and render it.
    pub fn frame(&mut self) -> RenderSnapshot {
        let region = self.region();
        self.root.layout(region);
        self.canvas.clear();
        self.root.render(&mut self.canvas, region);
        self.frames += 1;
        self.snapshot()
    }

    /// Run layout passes until the tree stops requesting layout, then render
    /// once, the way the event loop draws a frame.
    ///
    /// Returns how many passes were run. Each pass counts as a frame.
    pub fn settle(&mut self) -> usize {
        let region = self.region();
        let passes = crate::layout_until_settled::<M, W>(&mut self.root, region);
        self.canvas.clear();
        self.root.render(&mut self.canvas, region);
        self.frames += passes;
        passes
    }

    /// The most recently rendered frame.
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.canvas)
    }

    /// Total layout passes run so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn press(&mut self, key: KeyCode) -> Option<M> {
        self.root.on_event(key)
    }

    pub fn mouse(&mut self, event: MouseEvent) -> Option<M> {
        let region = self.region();
        self.root.on_mouse(event, region)
    }

    /// Left button down and up at the same cell.
    pub fn click(&mut self, x: u16, y: u16) -> Option<M> {
        let down = self.mouse(mouse::down(x, y));
        let up = self.mouse(mouse::up(x, y));
        down.or(up)
    }

    pub fn root(&self) -> &W {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut W {
        &mut self.root
    }
}

/// Mouse event constructors.
pub mod mouse {
    use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

    fn event(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn down(column: u16, row: u16) -> MouseEvent {
        event(MouseEventKind::Down(MouseButton::Left), column, row)
    }

    pub fn up(column: u16, row: u16) -> MouseEvent {
        event(MouseEventKind::Up(MouseButton::Left), column, row)
    }

    pub fn moved(column: u16, row: u16) -> MouseEvent {
        event(MouseEventKind::Moved, column, row)
    }

    pub fn scroll_down(column: u16, row: u16) -> MouseEvent {
        event(MouseEventKind::ScrollDown, column, row)
    }

    pub fn scroll_up(column: u16, row: u16) -> MouseEvent {
        event(MouseEventKind::ScrollUp, column, row)
    }
}
