use encoding_rs::WINDOWS_1252;
use html_escape::NAMED_ENTITIES;

use crate::error::Result;

/// Named references still recognised without a trailing `;`, sorted.
const LEGACY_NAMES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY",
    "Ccedil", "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc",
    "Igrave", "Iuml", "LT", "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde",
    "Ouml", "QUOT", "REG", "THORN", "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute",
    "aacute", "acirc", "acute", "aelig", "agrave", "amp", "aring", "atilde", "auml",
    "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg", "divide", "eacute",
    "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt", "iacute",
    "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm",
    "oslash", "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg",
    "sect", "shy", "sup1", "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc",
    "ugrave", "uml", "uuml", "yacute", "yen", "yuml",
];

const LONGEST_LEGACY_NAME: usize = 6;

/// References that expand to two code points. `NAMED_ENTITIES` keeps only
/// the first of the pair for these.
const COMPOSED_ENTITIES: &[(&[u8], &str)] = &[
    (b"NotEqualTilde", "\u{2242}\u{0338}"),
    (b"NotGreaterFullEqual", "\u{2267}\u{0338}"),
    (b"NotGreaterGreater", "\u{226B}\u{0338}"),
    (b"NotGreaterSlantEqual", "\u{2A7E}\u{0338}"),
    (b"NotHumpDownHump", "\u{224E}\u{0338}"),
    (b"NotHumpEqual", "\u{224F}\u{0338}"),
    (b"NotLeftTriangleBar", "\u{29CF}\u{0338}"),
    (b"NotLessLess", "\u{226A}\u{0338}"),
    (b"NotLessSlantEqual", "\u{2A7D}\u{0338}"),
    (b"NotNestedGreaterGreater", "\u{2AA2}\u{0338}"),
    (b"NotNestedLessLess", "\u{2AA1}\u{0338}"),
    (b"NotPrecedesEqual", "\u{2AAF}\u{0338}"),
    (b"NotRightTriangleBar", "\u{29D0}\u{0338}"),
    (b"NotSquareSubset", "\u{228F}\u{0338}"),
    (b"NotSquareSuperset", "\u{2290}\u{0338}"),
    (b"NotSubset", "\u{2282}\u{20D2}"),
    (b"NotSucceedsEqual", "\u{2AB0}\u{0338}"),
    (b"NotSucceedsTilde", "\u{227F}\u{0338}"),
    (b"NotSuperset", "\u{2283}\u{20D2}"),
    (b"ThickSpace", "\u{205F}\u{200A}"),
    (b"acE", "\u{223E}\u{0333}"),
    (b"bne", "\u{003D}\u{20E5}"),
    (b"bnequiv", "\u{2261}\u{20E5}"),
    (b"caps", "\u{2229}\u{FE00}"),
    (b"cups", "\u{222A}\u{FE00}"),
    (b"fjlig", "\u{0066}\u{006A}"),
    (b"gesl", "\u{22DB}\u{FE00}"),
    (b"gvertneqq", "\u{2269}\u{FE00}"),
    (b"gvnE", "\u{2269}\u{FE00}"),
    (b"lates", "\u{2AAD}\u{FE00}"),
    (b"lesg", "\u{22DA}\u{FE00}"),
    (b"lvertneqq", "\u{2268}\u{FE00}"),
    (b"lvnE", "\u{2268}\u{FE00}"),
    (b"nGg", "\u{22D9}\u{0338}"),
    (b"nGt", "\u{226B}\u{20D2}"),
    (b"nGtv", "\u{226B}\u{0338}"),
    (b"nLl", "\u{22D8}\u{0338}"),
    (b"nLt", "\u{226A}\u{20D2}"),
    (b"nLtv", "\u{226A}\u{0338}"),
    (b"nang", "\u{2220}\u{20D2}"),
    (b"napE", "\u{2A70}\u{0338}"),
    (b"napid", "\u{224B}\u{0338}"),
    (b"nbump", "\u{224E}\u{0338}"),
    (b"nbumpe", "\u{224F}\u{0338}"),
    (b"ncongdot", "\u{2A6D}\u{0338}"),
    (b"nedot", "\u{2250}\u{0338}"),
    (b"nesim", "\u{2242}\u{0338}"),
    (b"ngE", "\u{2267}\u{0338}"),
    (b"ngeqq", "\u{2267}\u{0338}"),
    (b"ngeqslant", "\u{2A7E}\u{0338}"),
    (b"nges", "\u{2A7E}\u{0338}"),
    (b"nlE", "\u{2266}\u{0338}"),
    (b"nleqq", "\u{2266}\u{0338}"),
    (b"nleqslant", "\u{2A7D}\u{0338}"),
    (b"nles", "\u{2A7D}\u{0338}"),
    (b"notinE", "\u{22F9}\u{0338}"),
    (b"notindot", "\u{22F5}\u{0338}"),
    (b"nparsl", "\u{2AFD}\u{20E5}"),
    (b"npart", "\u{2202}\u{0338}"),
    (b"npre", "\u{2AAF}\u{0338}"),
    (b"npreceq", "\u{2AAF}\u{0338}"),
    (b"nrarrc", "\u{2933}\u{0338}"),
    (b"nrarrw", "\u{219D}\u{0338}"),
    (b"nsce", "\u{2AB0}\u{0338}"),
    (b"nsubE", "\u{2AC5}\u{0338}"),
    (b"nsubset", "\u{2282}\u{20D2}"),
    (b"nsubseteqq", "\u{2AC5}\u{0338}"),
    (b"nsucceq", "\u{2AB0}\u{0338}"),
    (b"nsupE", "\u{2AC6}\u{0338}"),
    (b"nsupset", "\u{2283}\u{20D2}"),
    (b"nsupseteqq", "\u{2AC6}\u{0338}"),
    (b"nvap", "\u{224D}\u{20D2}"),
    (b"nvge", "\u{2265}\u{20D2}"),
    (b"nvgt", "\u{003E}\u{20D2}"),
    (b"nvle", "\u{2264}\u{20D2}"),
    (b"nvlt", "\u{003C}\u{20D2}"),
    (b"nvltrie", "\u{22B4}\u{20D2}"),
    (b"nvrtrie", "\u{22B5}\u{20D2}"),
    (b"nvsim", "\u{223C}\u{20D2}"),
    (b"race", "\u{223D}\u{0331}"),
    (b"smtes", "\u{2AAC}\u{FE00}"),
    (b"sqcaps", "\u{2293}\u{FE00}"),
    (b"sqcups", "\u{2294}\u{FE00}"),
    (b"varsubsetneq", "\u{228A}\u{FE00}"),
    (b"varsubsetneqq", "\u{2ACB}\u{FE00}"),
    (b"varsupsetneq", "\u{228B}\u{FE00}"),
    (b"varsupsetneqq", "\u{2ACC}\u{FE00}"),
    (b"vnsub", "\u{2282}\u{20D2}"),
    (b"vnsup", "\u{2283}\u{20D2}"),
    (b"vsubnE", "\u{2ACB}\u{FE00}"),
    (b"vsubne", "\u{228A}\u{FE00}"),
    (b"vsupnE", "\u{2ACC}\u{FE00}"),
    (b"vsupne", "\u{228B}\u{FE00}"),
];

/// Escapes only the five characters with predefined entities.
pub fn encode(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    for &b in input {
        match b {
            b'&' => out.extend_from_slice(b"&amp;"),
            b'\'' => out.extend_from_slice(b"&#39;"),
            b'<' => out.extend_from_slice(b"&lt;"),
            b'>' => out.extend_from_slice(b"&gt;"),
            b'"' => out.extend_from_slice(b"&#34;"),
            _ => out.push(b),
        }
    }
    Ok(out)
}

fn full_entity(name: &[u8]) -> Option<&'static str> {
    if let Ok(idx) = COMPOSED_ENTITIES.binary_search_by(|(n, _)| n.cmp(&name)) {
        return Some(COMPOSED_ENTITIES[idx].1);
    }
    NAMED_ENTITIES
        .binary_search_by(|(n, _)| n.cmp(&name))
        .ok()
        .map(|idx| NAMED_ENTITIES[idx].1)
}

fn legacy_entity(name: &[u8]) -> Option<&'static str> {
    LEGACY_NAMES
        .binary_search_by(|n| n.as_bytes().cmp(name))
        .ok()
        .and_then(|_| full_entity(name))
}

/// `name` is everything after the `&`, including a `;` if one was consumed.
fn named_entity(name: &[u8]) -> Option<&'static str> {
    match name.strip_suffix(b";") {
        Some(base) => full_entity(base),
        None => legacy_entity(name),
    }
}

/// C1 code points are read as their windows-1252 characters; NUL,
/// surrogates and out-of-range values become U+FFFD.
fn numeric_char(value: u32) -> char {
    if (0x80..=0x9F).contains(&value) {
        let byte = [value as u8];
        let (decoded, _) = WINDOWS_1252.decode_without_bom_handling(&byte);
        return decoded.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
    }
    char::from_u32(value)
        .filter(|&c| c != '\0')
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

/// `s` starts with `&#`. The closing `;` is optional.
fn unescape_numeric(s: &[u8], out: &mut Vec<u8>) -> usize {
    if s.len() <= 3 {
        out.push(b'&');
        return 1;
    }
    let mut i = 2;
    let hex = matches!(s[i], b'x' | b'X');
    if hex {
        i += 1;
    }

    let mut value: u32 = 0;
    while i < s.len() {
        let c = s[i];
        i += 1;
        let digit = if hex {
            (c as char).to_digit(16)
        } else {
            (c as char).to_digit(10)
        };
        if let Some(d) = digit {
            let radix = if hex { 16 } else { 10 };
            value = value.saturating_mul(radix).saturating_add(d);
            continue;
        }
        if c != b';' {
            i -= 1;
        }
        break;
    }

    if i <= 3 {
        out.push(b'&');
        return 1;
    }
    push_char(out, numeric_char(value));
    i
}

/// Decodes the reference at the start of `s` (which begins with `&`) into
/// `out` and returns how many input bytes it used.
fn unescape_entity(s: &[u8], out: &mut Vec<u8>) -> usize {
    if s.len() <= 1 {
        out.push(b'&');
        return 1;
    }
    if s[1] == b'#' {
        return unescape_numeric(s, out);
    }

    let mut i = 1;
    while i < s.len() {
        let c = s[i];
        i += 1;
        if c.is_ascii_alphanumeric() {
            continue;
        }
        if c != b';' {
            i -= 1;
        }
        break;
    }

    let name = &s[1..i];
    if !name.is_empty() {
        if let Some(value) = named_entity(name) {
            out.extend_from_slice(value.as_bytes());
            return i;
        }
        // longest legacy name that prefixes the run, e.g. "&copy2024"
        let max_len = (name.len() - 1).min(LONGEST_LEGACY_NAME);
        for j in (2..=max_len).rev() {
            if let Some(value) = legacy_entity(&name[..j]) {
                out.extend_from_slice(value.as_bytes());
                return j + 1;
            }
        }
    }

    out.extend_from_slice(&s[..i]);
    i
}

/// Named and numeric references are resolved the way HTML5 parsers do;
/// anything that is not a reference passes through byte for byte.
pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] == b'&' {
            i += unescape_entity(&input[i..], &mut out);
        } else {
            out.push(input[i]);
            i += 1;
        }
    }
    Ok(out)
}
