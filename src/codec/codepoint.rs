use regex::Regex;

use super::util;
use crate::error::Result;

/// Graphic categories: letters, marks, numbers, punctuation, symbols.
const GRAPHIC: &str = r"\A[\p{L}\p{M}\p{N}\p{P}\p{S}]\z";

const PRIVATE_USE_RANGES: &[(u32, u32)] = &[
    (0xE000, 0xF8FF),
    (0xF0000, 0xFFFFD),
    (0x100000, 0x10FFFD),
];

fn in_ranges(c: char, ranges: &[(u32, u32)]) -> bool {
    let cp = c as u32;
    ranges.iter().any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

fn is_private_use(c: char) -> bool {
    in_ranges(c, PRIVATE_USE_RANGES)
}

fn name_of(c: char) -> String {
    if c.is_control() {
        return "<control>".to_string();
    }
    if is_private_use(c) {
        return "<private use>".to_string();
    }
    match unicode_names2::name(c) {
        Some(name) => name.to_string(),
        None => "<unassigned>".to_string(),
    }
}

/// Space plus graphic characters; separators other than U+0020 are not.
fn is_printable(graphic: &Regex, c: char) -> bool {
    let mut buf = [0u8; 4];
    c == ' ' || graphic.is_match(c.encode_utf8(&mut buf))
}

fn describe(graphic: &Regex, c: char) -> String {
    let shown = if is_printable(graphic, c) {
        c
    } else {
        char::REPLACEMENT_CHARACTER
    };
    format!("U+{:04X}\t{}\t{}", c as u32, shown, name_of(c))
}

pub fn encode(input: &[u8]) -> Result<Vec<u8>> {
    let graphic = Regex::new(GRAPHIC)?;
    let lines: Vec<String> = util::chars_lossy(input)
        .into_iter()
        .map(|c| describe(&graphic, c))
        .collect();
    Ok(lines.join("\n").into_bytes())
}
