use std::collections::HashMap;
use std::sync::OnceLock;

use super::{charset, ModeEntry, Transform};
use crate::error::{RingError, Result};
use crate::types::{Direction, ModeSummary};

macro_rules! register_modes {
    ($($name:literal => { decode: $dec:expr, encode: $enc:expr, about: $about:literal $(,)? }),* $(,)?) => {
        fn build_registry() -> Registry {
            let modes: Vec<ModeEntry> = vec![
                $(ModeEntry {
                    name: $name,
                    decoder: $dec,
                    encoder: $enc,
                    description: $about,
                }),*
            ];

            let mut name_map = HashMap::new();
            for (idx, mode) in modes.iter().enumerate() {
                debug_assert!(
                    mode.decoder.is_some() || mode.encoder.is_some(),
                    "mode '{}' registers no direction",
                    mode.name
                );
                if name_map.insert(mode.name, idx).is_some() {
                    panic!("Duplicate mode name '{}'", mode.name);
                }
            }

            Registry { modes, name_map }
        }

        // Public for testing - generates list of expected mode names
        pub fn expected_mode_names() -> Vec<&'static str> {
            vec![$($name,)*]
        }
    };
}

register_modes! {
    "base32" => {
        decode: Some(super::base32::decode_std),
        encode: Some(super::base32::encode_std),
        about: "RFC 4648 base32 with padding",
    },
    "base32-crockford" => {
        decode: Some(super::base32human::decode),
        encode: Some(super::base32human::encode),
        about: "Crockford base32, confusables and '-' tolerated on decode",
    },
    "base32-hex" => {
        decode: Some(super::base32::decode_hex),
        encode: Some(super::base32::encode_hex),
        about: "RFC 4648 base32 extended hex alphabet with padding",
    },
    "base64" => {
        decode: Some(super::base64::decode_std),
        encode: Some(super::base64::encode_std),
        about: "RFC 4648 base64 with padding",
    },
    "base64-url" => {
        decode: Some(super::base64::decode_url),
        encode: Some(super::base64::encode_url),
        about: "RFC 4648 URL-safe base64 with padding",
    },
    "codepoint" => {
        decode: None,
        encode: Some(super::codepoint::encode),
        about: "one line per code point with its Unicode name",
    },
    "go" => {
        decode: Some(super::goquote::decode),
        encode: Some(super::goquote::encode),
        about: "Go string literal quoting, ASCII only",
    },
    "hex" => {
        decode: Some(super::base16::decode),
        encode: Some(super::base16::encode),
        about: "lowercase hexadecimal",
    },
    "hex-extended" => {
        decode: None,
        encode: Some(super::base16::dump),
        about: "hex dump with offsets and an ASCII gutter",
    },
    "html" => {
        decode: Some(super::html::decode),
        encode: Some(super::html::encode),
        about: "HTML entity escaping",
    },
    "json" => {
        decode: Some(super::json::decode),
        encode: Some(super::json::encode),
        about: "JSON string literal",
    },
    "qp" => {
        decode: Some(super::quotedprintable::decode),
        encode: Some(super::quotedprintable::encode),
        about: "Quoted-Printable (RFC 2045)",
    },
    "rot13" => {
        decode: Some(super::rot::rot13),
        encode: Some(super::rot::rot13),
        about: "ROT13 letter substitution",
    },
    "url-path" => {
        decode: Some(super::urlencoding::decode_path),
        encode: Some(super::urlencoding::encode_path),
        about: "percent-encoding for a URL path segment",
    },
    "url-query" => {
        decode: Some(super::urlencoding::decode_query),
        encode: Some(super::urlencoding::encode_query),
        about: "percent-encoding for a URL query component",
    },
    "float32-hex" => {
        decode: Some(super::float_hex::decode_f32),
        encode: Some(super::float_hex::encode_f32),
        about: "IEEE-754 binary32 values as 8-digit hex words",
    },
    "float16-hex" => {
        decode: Some(super::float_hex::decode_f16),
        encode: Some(super::float_hex::encode_f16),
        about: "IEEE-754 binary16 values as 4-digit hex words",
    },
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub struct Registry {
    modes: Vec<ModeEntry>,
    name_map: HashMap<&'static str, usize>,
}

impl Registry {
    fn new() -> Self {
        build_registry()
    }

    pub fn global() -> &'static Registry {
        REGISTRY.get_or_init(Registry::new)
    }

    pub fn get(&self, name: &str) -> Option<&ModeEntry> {
        self.name_map.get(name).map(|&idx| &self.modes[idx])
    }

    /// Static lookup only. Names are case-sensitive.
    pub fn lookup(&self, name: &str, direction: Direction) -> Option<Transform> {
        let mode = self.get(name)?;
        let apply = match direction {
            Direction::Decode => mode.decoder,
            Direction::Encode => mode.encoder,
        }?;
        Some(Transform::Builtin {
            mode: mode.name,
            apply,
        })
    }

    /// Static lookup, then the charset labels, then an error naming why
    /// nothing matched.
    pub fn resolve(&self, name: &str, direction: Direction) -> Result<Transform> {
        if let Some(transform) = self.lookup(name, direction) {
            log::debug!("mode {} resolved to built-in {}r", name, direction);
            return Ok(transform);
        }

        if let Some(charset) = charset::Charset::for_label(name, direction) {
            log::debug!("mode {} resolved to charset {}", name, charset.name());
            return Ok(Transform::Charset(charset));
        }

        match self.get(name) {
            Some(mode) => Err(RingError::unsupported_direction(mode.name, direction)),
            None => Err(RingError::unknown_mode(name)),
        }
    }

    /// Known modes sorted by name.
    pub fn enumerate(&self) -> Vec<ModeSummary> {
        let mut summaries: Vec<ModeSummary> = self
            .modes
            .iter()
            .map(|m| ModeSummary {
                name: m.name,
                encode_only: m.encode_only(),
                description: m.description,
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(b.name));
        summaries
    }

    /// Comma-separated mode names for help text, encode-only ones marked `*`.
    pub fn mode_list(&self) -> String {
        self.enumerate()
            .iter()
            .map(|m| {
                if m.encode_only {
                    format!("{}*", m.name)
                } else {
                    m.name.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_all_modes() {
        let registry = Registry::global();
        for name in expected_mode_names() {
            assert!(registry.get(name).is_some(), "missing mode {}", name);
        }
        assert_eq!(registry.enumerate().len(), expected_mode_names().len());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = Registry::global();
        assert!(registry.lookup("hex", Direction::Encode).is_some());
        assert!(registry.lookup("HEX", Direction::Encode).is_none());
    }

    #[test]
    fn test_lookup_missing_direction() {
        let registry = Registry::global();
        assert!(registry.lookup("codepoint", Direction::Decode).is_none());
        assert!(registry.lookup("hex-extended", Direction::Decode).is_none());
        assert!(registry.lookup("codepoint", Direction::Encode).is_some());
    }

    #[test]
    fn test_resolve_unsupported_direction() {
        let registry = Registry::global();
        for name in ["codepoint", "hex-extended"] {
            match registry.resolve(name, Direction::Decode) {
                Err(RingError::UnsupportedDirection { name: n, direction }) => {
                    assert_eq!(n, name);
                    assert_eq!(direction, Direction::Decode);
                }
                other => panic!("expected UnsupportedDirection, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_resolve_unknown_mode() {
        let registry = Registry::global();
        assert!(matches!(
            registry.resolve("no-such-mode", Direction::Encode),
            Err(RingError::UnknownMode { .. })
        ));
    }

    #[test]
    fn test_resolve_falls_back_to_charset() {
        let registry = Registry::global();
        let transform = registry.resolve("latin1", Direction::Decode).unwrap();
        assert!(matches!(transform, Transform::Charset(_)));
        assert_eq!(transform.apply(b"caf\xe9").unwrap(), "café".as_bytes());
    }

    #[test]
    fn test_builtin_apply() {
        let registry = Registry::global();
        let transform = registry.resolve("hex", Direction::Encode).unwrap();
        assert_eq!(transform.name(), "hex");
        assert_eq!(transform.apply(b"AB").unwrap(), b"4142");
    }

    #[test]
    fn test_enumerate_sorted_and_marked() {
        let registry = Registry::global();
        let names: Vec<_> = registry.enumerate().iter().map(|m| m.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);

        let list = registry.mode_list();
        assert!(list.contains("codepoint*"));
        assert!(list.contains("hex-extended*"));
        assert!(list.contains("rot13, url-path"));
        assert!(!list.contains("hex*"));
    }
}
