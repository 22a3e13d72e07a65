use crossterm::{
    cursor, queue,
    style::{Attribute, Color, SetAttribute, SetBackgroundColor, SetForegroundColor},
};
use std::io::{BufWriter, Write};

/// Text styling attributes (bold, italic, etc.)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextAttributes {
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub reverse: bool,
}

impl TextAttributes {
    pub const BOLD: Self = Self {
        bold: true,
        dim: false,
        italic: false,
        underline: false,
        reverse: false,
    };
}

/// The physical dimensions of a widget or terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    /// Create a new Size with the given dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Space around a widget's content, in cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Spacing {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Spacing {
    /// Same spacing on every side.
    pub fn all(value: u16) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Vertical then horizontal spacing, like CSS `padding: 1 2`.
    pub fn symmetric(vertical: u16, horizontal: u16) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn horizontal(&self) -> u16 {
        self.left.saturating_add(self.right)
    }

    pub fn vertical(&self) -> u16 {
        self.top.saturating_add(self.bottom)
    }

    /// Shrink a region by this spacing.
    pub fn inset(&self, region: Region) -> Region {
        Region::new(
            region.x + self.left as i32,
            region.y + self.top as i32,
            region.width - self.horizontal() as i32,
            region.height - self.vertical() as i32,
        )
    }
}

/// A signed rectangular region for layout and clipping.
///
/// Coordinates are signed (i32) to allow off-screen positioning (e.g. scrolling,
/// or a sheet taller than the terminal).
/// Width and height are signed but invariant-checked to be non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    /// Create a new region, clamping width and height to be non-negative.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: width.max(0),
            height: height.max(0),
        }
    }

    /// Helper for converting from terminal (u16) coordinates.
    pub fn from_u16(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self::new(x as i32, y as i32, width as i32, height as i32)
    }

    /// Returns the intersection of this region with another.
    /// If there is no overlap, returns an empty region.
    pub fn intersection(&self, other: &Region) -> Region {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self
            .x
            .saturating_add(self.width)
            .min(other.x.saturating_add(other.width));
        let y2 = self
            .y
            .saturating_add(self.height)
            .min(other.y.saturating_add(other.height));

        if x2 > x1 && y2 > y1 {
            Region {
                x: x1,
                y: y1,
                width: x2 - x1,
                height: y2 - y1,
            }
        } else {
            Region::default()
        }
    }

    /// Checks if a point is contained within the region.
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && x < self.x.saturating_add(self.width)
            && y >= self.y
            && y < self.y.saturating_add(self.height)
    }

    /// Returns true if the region has no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Y coordinate one past the last row.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub symbol: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub attrs: TextAttributes,
}

impl Cell {
    pub(crate) const BLANK: Cell = Cell {
        symbol: ' ',
        fg: None,
        bg: None,
        attrs: TextAttributes {
            bold: false,
            dim: false,
            italic: false,
            underline: false,
            reverse: false,
        },
    };
}

pub struct Canvas {
    size: Size,
    cells: Vec<Cell>,
    /// Previous frame's cells for differential rendering.
    /// Only cells that differ from prev_cells are written to the terminal.
    prev_cells: Vec<Cell>,
    /// Whether the next flush must redraw everything.
    first_flush: bool,
    /// Stack of clipping regions. The active clip is the intersection of all.
    clip_stack: Vec<Region>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        let cell_count = width as usize * height as usize;
        Self {
            size: Size { width, height },
            cells: vec![Cell::BLANK; cell_count],
            prev_cells: vec![Cell::BLANK; cell_count],
            first_flush: true,
            clip_stack: Vec::new(),
        }
    }

    /// Returns the canvas dimensions.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The full canvas as a region.
    pub fn region(&self) -> Region {
        Region::from_u16(0, 0, self.size.width, self.size.height)
    }

    // === Clipping ===

    /// Pushes a new clipping region onto the stack.
    /// The effective clip becomes the intersection of current clip and new region.
    pub fn push_clip(&mut self, region: Region) {
        let current = self.current_clip();
        let intersection = region.intersection(&current);
        self.clip_stack.push(intersection);
    }

    /// Removes the most recent clipping region.
    pub fn pop_clip(&mut self) {
        self.clip_stack.pop();
    }

    /// Returns the current effective clipping region.
    /// If stack is empty, returns the full screen.
    fn current_clip(&self) -> Region {
        self.clip_stack.last().copied().unwrap_or_else(|| self.region())
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let clip = self.current_clip();
        if !clip.contains_point(x, y) {
            return None;
        }
        if x < 0 || x >= self.size.width as i32 || y < 0 || y >= self.size.height as i32 {
            return None;
        }
        Some((y as usize) * (self.size.width as usize) + (x as usize))
    }

    // === Drawing ===

    /// Writes a character to the canvas at (x, y).
    /// Coordinates are i32 and will be clipped if off-screen or outside clip region.
    pub fn put_char(
        &mut self,
        x: i32,
        y: i32,
        c: char,
        fg: Option<Color>,
        bg: Option<Color>,
        attrs: TextAttributes,
    ) {
        if let Some(index) = self.index_of(x, y) {
            // Preserve existing background if new bg is None
            let bg = bg.or(self.cells[index].bg);
            self.cells[index] = Cell {
                symbol: c,
                fg,
                bg,
                attrs,
            };
        }
    }

    /// Writes a string to the canvas at (x, y), one cell per char.
    pub fn put_str(
        &mut self,
        x: i32,
        y: i32,
        s: &str,
        fg: Option<Color>,
        bg: Option<Color>,
        attrs: TextAttributes,
    ) {
        let clip = self.current_clip();
        if y < clip.y || y >= clip.bottom() {
            return;
        }

        let mut current_x = x;
        for c in s.chars() {
            if current_x >= clip.x + clip.width {
                break;
            }
            self.put_char(current_x, y, c, fg, bg, attrs);
            current_x += 1;
        }
    }

    /// Paints the background of every cell in `region`, blanking the symbols.
    pub fn fill(&mut self, region: Region, bg: Color) {
        let visible = region.intersection(&self.current_clip());
        for y in visible.y..visible.bottom() {
            for x in visible.x..visible.x + visible.width {
                self.put_char(x, y, ' ', None, Some(bg), TextAttributes::default());
            }
        }
    }

    /// Dims everything already drawn inside `region` (used for the sheet scrim).
    pub fn dim_region(&mut self, region: Region) {
        let visible = region.intersection(&self.current_clip());
        for y in visible.y..visible.bottom() {
            for x in visible.x..visible.x + visible.width {
                if let Some(index) = self.index_of(x, y) {
                    self.cells[index].attrs.dim = true;
                }
            }
        }
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        // Batch every escape sequence into one write to the locked stdout.
        let stdout = std::io::stdout();
        let mut out = BufWriter::with_capacity(8192, stdout.lock());

        if self.first_flush {
            self.flush_full(&mut out)?;
            self.first_flush = false;
        } else {
            self.flush_diff(&mut out)?;
        }

        // Current becomes previous for the next frame's diff.
        self.prev_cells.copy_from_slice(&self.cells);

        out.flush()?;
        Ok(())
    }

    /// Full flush - redraws entire screen (used on first render).
    fn flush_full<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        queue!(
            out,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Reset),
            SetBackgroundColor(Color::Reset),
            SetAttribute(Attribute::Reset)
        )?;

        let mut last_fg = Some(Color::Reset);
        let mut last_bg = Some(Color::Reset);
        let mut last_attrs = TextAttributes::default();

        let width = (self.size.width as usize).max(1);
        let num_rows = self.cells.len() / width;
        for (row_idx, row) in self.cells.chunks(width).enumerate() {
            for cell in row {
                emit_cell(out, cell, &mut last_fg, &mut last_bg, &mut last_attrs)?;
            }
            if row_idx + 1 < num_rows {
                write!(out, "\r\n")?;
            }
        }
        Ok(())
    }

    /// Differential flush - only redraws changed cells.
    fn flush_diff<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        queue!(
            out,
            SetForegroundColor(Color::Reset),
            SetBackgroundColor(Color::Reset),
            SetAttribute(Attribute::Reset)
        )?;

        let mut last_fg: Option<Color> = None;
        let mut last_bg: Option<Color> = None;
        let mut last_attrs = TextAttributes::default();
        let mut cursor_at: Option<(usize, usize)> = None;

        let width = (self.size.width as usize).max(1);

        for (i, (cell, prev)) in self.cells.iter().zip(self.prev_cells.iter()).enumerate() {
            if cell == prev {
                continue;
            }

            let x = i % width;
            let y = i / width;

            if cursor_at != Some((x, y)) {
                queue!(
                    out,
                    cursor::MoveTo(x as u16, y as u16),
                    SetAttribute(Attribute::Reset)
                )?;
                last_fg = None;
                last_bg = None;
                last_attrs = TextAttributes::default();
            }

            emit_cell(out, cell, &mut last_fg, &mut last_bg, &mut last_attrs)?;

            cursor_at = if x + 1 >= width {
                Some((0, y + 1))
            } else {
                Some((x + 1, y))
            };
        }

        Ok(())
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
        self.clip_stack.clear();
    }

    // === Test helpers ===

    /// Get the cell at (x, y), ignoring the clip stack.
    pub fn get_cell_at(&self, x: i32, y: i32) -> Option<&Cell> {
        if x < 0 || x >= self.size.width as i32 || y < 0 || y >= self.size.height as i32 {
            return None;
        }
        self.cells
            .get((y as usize) * (self.size.width as usize) + (x as usize))
    }

    /// Get the character at (x, y) for testing.
    pub fn get_char(&self, x: i32, y: i32) -> char {
        self.get_cell_at(x, y).map(|c| c.symbol).unwrap_or('\0')
    }

    /// Get all characters in a row as a string for testing.
    pub fn row_str(&self, y: i32) -> String {
        if y < 0 || y >= self.size.height as i32 {
            return String::new();
        }
        let start = (y as usize) * (self.size.width as usize);
        let end = start + (self.size.width as usize);
        self.cells[start..end].iter().map(|c| c.symbol).collect()
    }

    /// Serialize canvas to plain text for snapshot testing.
    /// Each row becomes a line, trimmed of trailing whitespace.
    pub fn to_snapshot(&self) -> String {
        (0..self.size.height as i32)
            .map(|y| self.row_str(y).trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Emit a single cell, only sending escape codes for what changed.
fn emit_cell<W: Write>(
    out: &mut W,
    cell: &Cell,
    last_fg: &mut Option<Color>,
    last_bg: &mut Option<Color>,
    last_attrs: &mut TextAttributes,
) -> std::io::Result<()> {
    if cell.attrs != *last_attrs {
        queue!(out, SetAttribute(Attribute::Reset))?;
        if cell.attrs.bold {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        if cell.attrs.dim {
            queue!(out, SetAttribute(Attribute::Dim))?;
        }
        if cell.attrs.italic {
            queue!(out, SetAttribute(Attribute::Italic))?;
        }
        if cell.attrs.underline {
            queue!(out, SetAttribute(Attribute::Underlined))?;
        }
        if cell.attrs.reverse {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        *last_attrs = cell.attrs;
        // Attribute reset clears colors too
        *last_fg = None;
        *last_bg = None;
    }

    if cell.fg != *last_fg {
        queue!(out, SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
        *last_fg = cell.fg;
    }
    if cell.bg != *last_bg {
        queue!(out, SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
        *last_bg = cell.bg;
    }

    write!(out, "{}", cell.symbol)?;
    Ok(())
}
