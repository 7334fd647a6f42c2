//! Renders the converted bytes as a C array initializer.

use std::fmt::Write as _;
use std::path::Path;

/// Declaration style of the emitted array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayStyle {
    /// `name[] = { ... };`
    #[default]
    Plain,
    /// `prog_uchar name[] PROGMEM = { ... };` for flash storage on AVR boards
    Progmem,
}

/// Base name of the input path without its extension.
pub fn array_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "samples".to_string())
}

pub fn format_array(name: &str, bytes: &[u8], style: ArrayStyle) -> String {
    // "255, " is the widest element
    let mut out = String::with_capacity(name.len() + 32 + bytes.len() * 5);
    match style {
        ArrayStyle::Plain => out.push_str(name),
        ArrayStyle::Progmem => {
            out.push_str("prog_uchar ");
            out.push_str(name);
        }
    }
    out.push_str("[]");
    if style == ArrayStyle::Progmem {
        out.push_str(" PROGMEM");
    }
    out.push_str(" = { ");

    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        // Writing into a String cannot fail
        let _ = write!(out, "{}", b);
    }

    if !bytes.is_empty() {
        out.push(' ');
    }
    out.push_str("};\n");
    out
}
