//! Encoding and decoding of a stacked 8-bit linear barcode.
//!
//! The format is invented and self-referential: encoder and decoder agree
//! with each other and with nothing else. A pattern lives on a fixed
//! [30×65](Canvas) canvas and stores one character per column, eight bits
//! stacked vertically, inside a frame whose border pixels double as width
//! and height markers. Scanned patterns may sit anywhere on the canvas;
//! loading one anchors it to the lower-left corner before measuring.
//!
//! The [Codec] type exposes the full load/encode/decode/render surface; the
//! two functions below cover the common one-shot cases.
//!
//! # Example
//!
//! ```rust
//! let pattern = stackbar::encode("Hi").unwrap();
//! assert_eq!(stackbar::decode(&pattern).unwrap(), "Hi");
//! ```
mod canvas;
mod codec;

pub use canvas::{Canvas, CanvasError};
pub use codec::{Codec, CodecError, Source};

/// Encode `text` into an anchored pattern on a fresh canvas.
///
/// The text must be non-empty, shorter than [Canvas::WIDTH]` - 2`
/// characters and restricted to 8 bit code points.
pub fn encode(text: &str) -> Result<Canvas, CodecError> {
    let mut codec = Codec::new();
    codec.load_text(text)?;
    codec.encode()?;
    Ok(codec.into_canvas())
}

/// Decode the pattern stored in `canvas` back into text.
///
/// The canvas is copied and anchored first, so the signal may sit anywhere
/// on it.
pub fn decode(canvas: &Canvas) -> Result<String, CodecError> {
    let mut codec = Codec::new();
    codec.load_pattern(canvas);
    codec.decode()?;
    Ok(codec.into_text())
}
