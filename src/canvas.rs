//! The fixed pixel grid patterns are scanned from and rendered into.
//!
//! A [Canvas] is deliberately dumb: it stores black/white pixels for a
//! single, fixed canvas size and knows nothing about the barcode format.
//! Geometry (anchoring, measurement, the frame layout) lives in the
//! [codec](crate::Codec).
use core::fmt;

pub(crate) const BLACK: char = '*';
pub(crate) const WHITE: char = ' ';

/// Errors when building a [Canvas] from text rows.
#[derive(Debug, PartialEq, Eq)]
pub enum CanvasError {
    /// The row sequence was empty.
    Empty,
    /// More rows than the canvas is high, the offending count is attached.
    TooManyRows(usize),
    /// The row at the attached index is wider than the canvas.
    RowTooWide(usize),
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CanvasError::Empty => write!(f, "empty row sequence"),
            CanvasError::TooManyRows(n) => {
                write!(f, "{} rows exceed the canvas height of {}", n, Canvas::HEIGHT)
            }
            CanvasError::RowTooWide(i) => {
                write!(f, "row {} exceeds the canvas width of {}", i, Canvas::WIDTH)
            }
        }
    }
}

impl std::error::Error for CanvasError {}

/// A fixed-size two-dimensional grid of black/white pixels.
///
/// Rows and columns are zero-based, row 0 is the top row and column 0 the
/// leftmost one. The dimensions never change after construction; access
/// outside them is tolerated (see [get](Self::get) and [set](Self::set)).
/// Deep copies are made with [Clone].
#[derive(Clone, PartialEq, Eq)]
pub struct Canvas {
    bits: Vec<bool>,
}

impl Canvas {
    /// Number of pixel rows.
    pub const HEIGHT: usize = 30;
    /// Number of pixel columns.
    pub const WIDTH: usize = 65;

    /// Create an all-white canvas.
    pub fn new() -> Self {
        Self {
            bits: vec![false; Self::HEIGHT * Self::WIDTH],
        }
    }

    /// Build a canvas from a sequence of text rows.
    ///
    /// Any character other than a space marks a black pixel. Leading and
    /// trailing blank rows are dropped, the remaining block is aligned to
    /// the *bottom* of the canvas (last kept row becomes canvas row
    /// `HEIGHT - 1`), and each kept row is stripped of leading and trailing
    /// whitespace with its first remaining character landing in column 0.
    ///
    /// No lower-left anchoring beyond that happens here; a signal that sits
    /// above or right of the trimmed block's corner is relocated by
    /// [Codec::load_pattern](crate::Codec::load_pattern) instead.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use stackbar::Canvas;
    /// let canvas = Canvas::from_rows(&["  ** ", "  * *"]).unwrap();
    /// assert!(canvas.get(Canvas::HEIGHT - 1, 2));
    /// assert!(!canvas.get(Canvas::HEIGHT - 1, 1));
    /// ```
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, CanvasError> {
        if rows.is_empty() {
            return Err(CanvasError::Empty);
        }
        if rows.len() > Self::HEIGHT {
            return Err(CanvasError::TooManyRows(rows.len()));
        }
        if let Some(i) = rows
            .iter()
            .position(|r| r.as_ref().chars().count() > Self::WIDTH)
        {
            return Err(CanvasError::RowTooWide(i));
        }

        let blank = |s: &S| s.as_ref().trim().is_empty();
        let mut kept = rows;
        while let [first, rest @ ..] = kept {
            if !blank(first) {
                break;
            }
            kept = rest;
        }
        while let [rest @ .., last] = kept {
            if !blank(last) {
                break;
            }
            kept = rest;
        }

        let mut canvas = Self::new();
        let mut row = Self::HEIGHT - kept.len();
        for line in kept {
            for (col, ch) in line.as_ref().trim().chars().enumerate() {
                if ch != ' ' {
                    canvas.set(row, col, true);
                }
            }
            row += 1;
        }
        Ok(canvas)
    }

    /// Read a pixel. Out-of-range coordinates read as white.
    ///
    /// Never panics; the codec's geometry scans rely on reads past the
    /// edges coming back `false`.
    pub fn get(&self, row: usize, col: usize) -> bool {
        if row < Self::HEIGHT && col < Self::WIDTH {
            self.bits[row * Self::WIDTH + col]
        } else {
            false
        }
    }

    /// Write a pixel. Returns `false` and does nothing for out-of-range
    /// coordinates.
    pub fn set(&mut self, row: usize, col: usize, value: bool) -> bool {
        if row < Self::HEIGHT && col < Self::WIDTH {
            self.bits[row * Self::WIDTH + col] = value;
            true
        } else {
            false
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the raw grid, one text line per pixel row.
impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.bits.chunks(Self::WIDTH) {
            for &pixel in row {
                f.write_str(if pixel { "*" } else { " " })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // start on a fresh line so mismatching grids diff column-aligned
        f.write_str("Canvas:\n")?;
        fmt::Display::fmt(self, f)
    }
}
