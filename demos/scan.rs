use stackbar::{Canvas, Codec};

// A scanned label, padded arbitrarily the way a real scan would be.
#[rustfmt::skip]
const SCAN: [&str; 16] = [
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

fn main() {
    let pattern = Canvas::from_rows(&SCAN).unwrap();

    let mut codec = Codec::new();
    codec.load_pattern(&pattern);
    codec.decode().unwrap();

    print!("{}", codec.render_pattern());
    println!("{}", codec.render_text());
}
