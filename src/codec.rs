//! Translation between text and the stacked pixel pattern.
//!
//! The format is column-oriented: each character occupies one column of
//! eight vertically stacked bits inside a fixed frame. The frame doubles as
//! the measuring aid, the bottom row gives the signal width and the left
//! column the signal height, so a decoder needs no side channel besides the
//! pixels themselves.
use core::fmt;
use std::io;

use arrayvec::ArrayVec;

use crate::canvas::{BLACK, Canvas, WHITE};

/// Bits per character, one pixel each, stacked in a column.
const DATA_BITS: usize = 8;
/// Data band plus the bottom start row and the top clock row.
const ENCODED_HEIGHT: usize = DATA_BITS + 2;

/// Errors reported by [Codec] operations.
#[derive(Debug, PartialEq, Eq)]
pub enum CodecError {
    /// `load_text` was given an empty string.
    EmptyText,
    /// The text (length attached) does not fit the canvas with its frame.
    TextTooLong(usize),
    /// The attached character has a code point above 255 and cannot be
    /// stored in eight bits.
    UnencodableChar(char),
    /// `encode` was called without usable text.
    MissingText,
    /// `decode` was called before anything was loaded.
    MissingPattern,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CodecError::EmptyText => write!(f, "text is empty"),
            CodecError::TextTooLong(n) => write!(
                f,
                "text of {} characters plus its frame does not fit the canvas width of {}",
                n,
                Canvas::WIDTH
            ),
            CodecError::UnencodableChar(c) => {
                write!(f, "character {:?} exceeds the 8 bit code point range", c)
            }
            CodecError::MissingText => write!(f, "no text loaded to encode"),
            CodecError::MissingPattern => write!(f, "no pattern loaded to decode"),
        }
    }
}

impl std::error::Error for CodecError {}

/// Which load operation last established the codec's state.
///
/// The codec never synchronizes its two representations on its own. After
/// [load_pattern](Codec::load_pattern) the stored text is stale until
/// [decode](Codec::decode) runs, and after [load_text](Codec::load_text) the
/// canvas is blank until [encode](Codec::encode) runs. This flag lets a
/// caller detect such stale reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Nothing has been loaded yet.
    None,
    /// A pixel pattern was loaded last.
    Pattern,
    /// A text string was loaded last.
    Text,
}

/// Encoder/decoder owning one [Canvas] and one text string.
///
/// The two representations are loaded and computed independently; see
/// [Source] for the freshness rules.
///
/// # Example
///
/// ```rust
/// use stackbar::Codec;
///
/// let mut codec = Codec::new();
/// codec.load_text("Hi").unwrap();
/// codec.encode().unwrap();
/// print!("{}", codec.render_pattern());
///
/// codec.decode().unwrap();
/// assert_eq!(codec.render_text(), "Hi");
/// ```
pub struct Codec {
    canvas: Canvas,
    text: String,
    signal_width: usize,
    signal_height: usize,
    source: Source,
}

impl Codec {
    /// Create a codec with a blank canvas and empty text.
    pub fn new() -> Self {
        Self {
            canvas: Canvas::new(),
            text: String::new(),
            signal_width: 0,
            signal_height: 0,
            source: Source::None,
        }
    }

    /// The currently stored text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The currently stored canvas.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Give up the codec for its canvas.
    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    /// Give up the codec for its text.
    pub fn into_text(self) -> String {
        self.text
    }

    /// Logical width of the signal in pixels, frame included.
    pub fn signal_width(&self) -> usize {
        self.signal_width
    }

    /// Logical height of the signal in pixels, frame included.
    pub fn signal_height(&self) -> usize {
        self.signal_height
    }

    /// Which representation is authoritative, see [Source].
    pub fn source(&self) -> Source {
        self.source
    }

    /// Take a copy of `pattern`, anchor its signal to the lower-left corner
    /// of the canvas and measure the signal's width and height from the
    /// frame pixels.
    ///
    /// The stored text is left untouched and therefore stale until
    /// [decode](Self::decode) recomputes it.
    ///
    /// The pattern must contain exactly one contiguous signal blob; the
    /// result for canvases holding several disjoint blobs (noisy scans) is
    /// unspecified.
    pub fn load_pattern(&mut self, pattern: &Canvas) {
        let mut canvas = pattern.clone();
        normalize(&mut canvas);
        self.signal_width = measure_width(&canvas);
        self.signal_height = measure_height(&canvas);
        self.canvas = canvas;
        self.source = Source::Pattern;
    }

    /// Store `text` and prepare a blank canvas sized for it.
    ///
    /// The text must be non-empty, consist of 8 bit code points only and
    /// leave room for one frame column on each side, i.e. its character
    /// count must stay below [Canvas::WIDTH]` - 2`. On failure the codec is
    /// left exactly as it was. No pixels are rendered until
    /// [encode](Self::encode) runs.
    pub fn load_text(&mut self, text: &str) -> Result<(), CodecError> {
        if text.is_empty() {
            return Err(CodecError::EmptyText);
        }
        let mut len = 0;
        for ch in text.chars() {
            if ch as u32 > u8::MAX as u32 {
                return Err(CodecError::UnencodableChar(ch));
            }
            len += 1;
        }
        if len + 2 >= Canvas::WIDTH {
            return Err(CodecError::TextTooLong(len));
        }

        self.text.clear();
        self.text.push_str(text);
        self.canvas = Canvas::new();
        self.signal_width = len + 2;
        self.signal_height = ENCODED_HEIGHT;
        self.source = Source::Text;
        Ok(())
    }

    /// Render the stored text into the canvas.
    ///
    /// Layout, rows counted from the canvas bottom:
    /// - the bottom row is solid black across the signal width (start row,
    ///   also what [width measurement](Self::signal_width) runs along),
    /// - the top row alternates black/white starting black (clock row),
    /// - column 0 is black on every data row and the rightmost column on
    ///   every odd data row (left/right frame),
    /// - each character occupies the column after its predecessor, least
    ///   significant bit in the row just above the start row.
    ///
    /// Fails with [CodecError::MissingText] if the stored text is empty or
    /// all whitespace, e.g. right after [load_pattern](Self::load_pattern)
    /// on a fresh codec.
    pub fn encode(&mut self) -> Result<(), CodecError> {
        if self.text.trim().is_empty() {
            return Err(CodecError::MissingText);
        }
        let bottom = Canvas::HEIGHT - 1;
        let top = Canvas::HEIGHT - self.signal_height;

        for col in 0..self.signal_width {
            self.canvas.set(bottom, col, true);
            self.canvas.set(top, col, col % 2 == 0);
        }
        // frame columns span the whole data band, independent of which
        // character column is being written; a zero-width signal (stale text
        // over a blank pattern) collapses the right frame onto the left one
        let right = self.signal_width.saturating_sub(1);
        for bit in 0..DATA_BITS {
            let row = bottom - 1 - bit;
            self.canvas.set(row, 0, true);
            if row % 2 == 1 {
                self.canvas.set(row, right, true);
            }
        }
        for (index, ch) in self.text.chars().enumerate() {
            let value = ch as u8;
            for bit in 0..DATA_BITS {
                self.canvas
                    .set(bottom - 1 - bit, 1 + index, (value >> bit) & 1 == 1);
            }
        }
        Ok(())
    }

    /// Read the canvas back into text, overwriting the stored string.
    ///
    /// Every column between the two frame columns contributes one
    /// character, assembled least significant bit first from the row just
    /// above the start row upwards.
    ///
    /// Only a codec that never loaded anything refuses with
    /// [CodecError::MissingPattern]. Decoding a canvas that was prepared by
    /// [load_text](Self::load_text) but not yet encoded is *not* an error;
    /// it reads the blank pixels as NUL characters.
    pub fn decode(&mut self) -> Result<(), CodecError> {
        if self.source == Source::None {
            return Err(CodecError::MissingPattern);
        }
        let bottom = Canvas::HEIGHT - 1;
        let mut bytes = ArrayVec::<u8, { Canvas::WIDTH }>::new();
        for col in 1..self.signal_width.saturating_sub(1) {
            let mut value = 0u8;
            for bit in 0..DATA_BITS {
                if self.canvas.get(bottom - 1 - bit, col) {
                    value |= 1 << bit;
                }
            }
            bytes.push(value);
        }
        self.text = bytes.iter().copied().map(char::from).collect();
        Ok(())
    }

    /// The stored text, unchanged. Alias of [text](Self::text) kept for
    /// symmetry with [render_pattern](Self::render_pattern).
    pub fn render_text(&self) -> &str {
        &self.text
    }

    /// Render the measured signal rectangle as `*`/space rows, framed with
    /// `|` on the sides and a dash rule above and below.
    ///
    /// Only the rectangle `[HEIGHT - signal_height, HEIGHT)` by
    /// `[0, signal_width)` is printed, so the blank padding of the fixed
    /// canvas never shows up.
    pub fn render_pattern(&self) -> String {
        let mut out = String::with_capacity((self.signal_height + 2) * (self.signal_width + 3));
        let rule = "-".repeat(self.signal_width + 2);
        out.push_str(&rule);
        out.push('\n');
        for row in Canvas::HEIGHT - self.signal_height..Canvas::HEIGHT {
            out.push('|');
            for col in 0..self.signal_width {
                out.push(if self.canvas.get(row, col) { BLACK } else { WHITE });
            }
            out.push('|');
            out.push('\n');
        }
        out.push_str(&rule);
        out.push('\n');
        out
    }

    /// Write the stored text as one line to `out`.
    pub fn display_text<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.text)
    }

    /// Write the bordered pattern of [render_pattern](Self::render_pattern)
    /// to `out`.
    pub fn display_pattern<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.render_pattern().as_bytes())
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

/// Move the signal so its anchor sits on the lower-left canvas corner.
///
/// A canvas whose corner pixel is already black counts as anchored and is
/// left untouched, as is an all-white canvas. Pixels that would shift past
/// the left edge are dropped.
fn normalize(canvas: &mut Canvas) {
    if canvas.get(Canvas::HEIGHT - 1, 0) {
        return;
    }
    let Some((anchor_row, anchor_col)) = anchor(canvas) else {
        return;
    };
    let down = Canvas::HEIGHT - 1 - anchor_row;
    let mut moved = Canvas::new();
    for row in 0..=anchor_row {
        for col in 0..Canvas::WIDTH {
            if !canvas.get(row, col) {
                continue;
            }
            if let Some(shifted) = col.checked_sub(anchor_col) {
                moved.set(row + down, shifted, true);
            }
        }
    }
    *canvas = moved;
}

// First black pixel scanning rows bottom-up, columns left-to-right within a
// row, stopping at the first hit. The scan order is part of the format
// contract; with the bottom start row intact it finds the signal's
// lower-left corner.
fn anchor(canvas: &Canvas) -> Option<(usize, usize)> {
    for row in (0..Canvas::HEIGHT).rev() {
        for col in 0..Canvas::WIDTH {
            if canvas.get(row, col) {
                return Some((row, col));
            }
        }
    }
    None
}

// Length of the black run along the bottom row, starting at column 0. The
// encode layout guarantees the start row is solid; this is assumed, not
// reverified.
fn measure_width(canvas: &Canvas) -> usize {
    let bottom = Canvas::HEIGHT - 1;
    (0..Canvas::WIDTH)
        .take_while(|&col| canvas.get(bottom, col))
        .count()
}

// Consecutive black pixels in column 0, scanning up from the bottom row.
// Works because the encode layout keeps the left frame column solid.
fn measure_height(canvas: &Canvas) -> usize {
    (0..Canvas::HEIGHT)
        .take_while(|&n| canvas.get(Canvas::HEIGHT - 1 - n, 0))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // Hand-authored scan with arbitrary padding, as it would come off a
    // printed label.
    #[rustfmt::skip]
    const SAMPLE_SCAN: [&str; 16] = [
        "                                               ",
        "                                               ",
        "                                               ",
        "     * * * * * * * * * * * * * * * * * * * * * ",
        "     *                                       * ",
        "     ****** **** ****** ******* ** *** *****   ",
        "     *     *    ****************************** ",
        "     * **    * *        **  *    * * *   *     ",
        "     *   *    *  *****    *   * *   *  **  *** ",
        "     *  **     * *** **   **  *    **  ***  *  ",
        "     ***  * **   **  *   ****    *  *  ** * ** ",
        "     *****  ***  *  * *   ** ** **  *   * *    ",
        "     ***************************************** ",
        "                                               ",
        "                                               ",
        "                                               ",
    ];

    #[rustfmt::skip]
    const SAMPLE_SCAN_2: [&str; 16] = [
        "                                          ",
        "                                          ",
        "* * * * * * * * * * * * * * * * * * *     ",
        "*                                    *    ",
        "**** *** **   ***** ****   *********      ",
        "* ************ ************ **********    ",
        "** *      *    *  * * *         * *       ",
        "***   *  *           * **    *      **    ",
        "* ** * *  *   * * * **  *   ***   ***     ",
        "* *           **    *****  *   **   **    ",
        "****  *  * *  * **  ** *   ** *  * *      ",
        "**************************************    ",
        "                                          ",
        "                                          ",
        "                                          ",
        "                                          ",
    ];

    fn encoded(text: &str) -> Codec {
        let mut codec = Codec::new();
        codec.load_text(text).unwrap();
        codec.encode().unwrap();
        codec
    }

    #[test]
    fn round_trip_restores_the_text() {
        for text in ["Hi", "A", "What a great resume builder this is!"] {
            let mut codec = encoded(text);
            codec.decode().unwrap();
            assert_eq!(codec.text(), text);
        }
    }

    #[test]
    fn round_trip_covers_the_upper_code_point_half() {
        let mut codec = encoded("Gr\u{fc}\u{df} dich! \u{01}\u{7f}\u{ff}");
        codec.decode().unwrap();
        assert_eq!(codec.text(), "Gr\u{fc}\u{df} dich! \u{01}\u{7f}\u{ff}");
    }

    #[test]
    fn hi_layout_matches_the_format() {
        let codec = encoded("Hi");
        assert_eq!(codec.signal_width(), 4);
        assert_eq!(codec.signal_height(), 10);
        let bottom = Canvas::HEIGHT - 1;
        let top = Canvas::HEIGHT - 10;
        for col in 0..4 {
            assert!(codec.canvas().get(bottom, col), "start row, column {}", col);
            assert_eq!(
                codec.canvas().get(top, col),
                col % 2 == 0,
                "clock row, column {}",
                col
            );
        }
    }

    #[test]
    fn hi_renders_the_expected_rectangle() {
        let codec = encoded("Hi");
        let expected = "\
------
|* * |
|*  *|
|*** |
|* **|
|*   |
|****|
|*   |
|*  *|
|* * |
|****|
------
";
        assert_eq!(codec.render_pattern(), expected);
    }

    #[test]
    fn display_matches_render() {
        let codec = encoded("Hi");
        let mut sink = Vec::new();
        codec.display_pattern(&mut sink).unwrap();
        assert_eq!(sink, codec.render_pattern().as_bytes());
        sink.clear();
        codec.display_text(&mut sink).unwrap();
        assert_eq!(sink, b"Hi\n");
    }

    #[test]
    fn measurement_agrees_with_the_loaded_dimensions() {
        let codec = encoded("stacked bars");
        assert_eq!(measure_width(codec.canvas()), codec.signal_width());
        assert_eq!(measure_height(codec.canvas()), codec.signal_height());
    }

    #[test]
    fn anchored_patterns_pass_through_unchanged() {
        let pattern = encoded("Hi").into_canvas();
        let mut codec = Codec::new();
        codec.load_pattern(&pattern);
        assert_eq!(codec.canvas(), &pattern);
        assert_eq!(codec.signal_width(), 4);
        assert_eq!(codec.signal_height(), 10);
    }

    #[test]
    fn offset_patterns_are_anchored() {
        let pattern = encoded("Hi").into_canvas();
        // push the signal 2 rows up and 3 columns right
        let mut offset = Canvas::new();
        for row in 0..Canvas::HEIGHT {
            for col in 0..Canvas::WIDTH {
                if pattern.get(row, col) {
                    assert!(offset.set(row - 2, col + 3, true));
                }
            }
        }
        assert!(!offset.get(Canvas::HEIGHT - 1, 0));

        let mut codec = Codec::new();
        codec.load_pattern(&offset);
        assert!(codec.canvas().get(Canvas::HEIGHT - 1, 0));
        assert_eq!(codec.canvas(), &pattern);
        codec.decode().unwrap();
        assert_eq!(codec.text(), "Hi");
    }

    #[test]
    fn sample_scans_reveal_their_messages() {
        let mut codec = Codec::new();

        codec.load_pattern(&Canvas::from_rows(&SAMPLE_SCAN).unwrap());
        assert_eq!(codec.signal_width(), 41);
        assert_eq!(codec.signal_height(), 10);
        codec.decode().unwrap();
        assert_eq!(codec.text(), "CSUMB CSIT online program is top notch.");

        codec.load_pattern(&Canvas::from_rows(&SAMPLE_SCAN_2).unwrap());
        assert_eq!(codec.signal_width(), 38);
        codec.decode().unwrap();
        assert_eq!(codec.text(), "You did it!  Great work.  Celebrate.");
    }

    #[test]
    fn text_length_limits_are_exclusive() {
        let mut codec = Codec::new();
        assert_eq!(codec.load_text(""), Err(CodecError::EmptyText));
        let too_long = "x".repeat(Canvas::WIDTH - 2);
        assert_eq!(
            codec.load_text(&too_long),
            Err(CodecError::TextTooLong(Canvas::WIDTH - 2))
        );
        let just_fits = "x".repeat(Canvas::WIDTH - 3);
        assert_eq!(codec.load_text(&just_fits), Ok(()));
        assert_eq!(codec.signal_width(), Canvas::WIDTH - 1);
        assert_eq!(codec.signal_height(), 10);
    }

    #[test]
    fn wide_code_points_are_rejected() {
        let mut codec = Codec::new();
        assert_eq!(
            codec.load_text("price: 3\u{20ac}"),
            Err(CodecError::UnencodableChar('\u{20ac}'))
        );
    }

    #[test]
    fn failed_load_text_leaves_the_codec_untouched() {
        let mut codec = encoded("keep me");
        let before = codec.canvas().clone();
        assert!(codec.load_text("").is_err());
        assert!(codec.load_text("\u{20ac}").is_err());
        assert_eq!(codec.text(), "keep me");
        assert_eq!(codec.canvas(), &before);
        assert_eq!(codec.signal_width(), 9);
        assert_eq!(codec.source(), Source::Text);
    }

    #[test]
    fn preconditions_are_reported() {
        let mut codec = Codec::new();
        assert_eq!(codec.encode(), Err(CodecError::MissingText));
        assert_eq!(codec.decode(), Err(CodecError::MissingPattern));

        // text loaded but never encoded: decoding is legal and reads the
        // blank canvas as NULs
        codec.load_text("AB").unwrap();
        codec.decode().unwrap();
        assert_eq!(codec.text(), "\0\0");
    }

    #[test]
    fn source_tracks_the_last_load() {
        let mut codec = Codec::new();
        assert_eq!(codec.source(), Source::None);
        codec.load_text("Hi").unwrap();
        assert_eq!(codec.source(), Source::Text);
        codec.load_pattern(&Canvas::new());
        assert_eq!(codec.source(), Source::Pattern);
    }

    #[test]
    fn encode_over_a_blank_pattern_stays_in_bounds() {
        // a blank pattern measures 0x0 but leaves earlier text stale and
        // non-empty, so encode runs with a zero-width signal
        let mut codec = encoded("Hi");
        codec.load_pattern(&Canvas::new());
        assert_eq!(codec.signal_width(), 0);
        assert_eq!(codec.encode(), Ok(()));
        // no start row to draw, but the data band still lands in bounds
        assert!(!codec.canvas().get(Canvas::HEIGHT - 1, 0));
        assert!(codec.canvas().get(Canvas::HEIGHT - 2, 0));
    }

    #[test]
    fn blank_patterns_measure_zero() {
        let mut codec = Codec::new();
        codec.load_pattern(&Canvas::new());
        assert_eq!(codec.signal_width(), 0);
        assert_eq!(codec.signal_height(), 0);
        codec.decode().unwrap();
        assert_eq!(codec.text(), "");
    }
}
