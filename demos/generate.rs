use std::io;

use stackbar::Codec;

fn main() {
    let mut codec = Codec::new();
    codec.load_text("What a great resume builder this is!").unwrap();
    codec.encode().unwrap();

    let stdout = io::stdout();
    codec.display_pattern(&mut stdout.lock()).unwrap();
    codec.display_text(&mut stdout.lock()).unwrap();
}
