mod base16;
mod base32;
mod base32human;
mod base64;
pub mod charset;
mod codepoint;
mod float_hex;
mod goquote;
mod html;
mod json;
mod quotedprintable;
pub mod registry;
mod rot;
mod urlencoding;
pub(crate) mod util;

pub use registry::Registry;

use crate::error::Result;
use charset::Charset;

/// Shape shared by every built-in transform: whole input in, whole output out.
pub type TransformFn = fn(&[u8]) -> Result<Vec<u8>>;

/// One registry row. At least one of `decoder`/`encoder` is present.
#[derive(Clone, Copy)]
pub struct ModeEntry {
    pub name: &'static str,
    pub decoder: Option<TransformFn>,
    pub encoder: Option<TransformFn>,
    pub description: &'static str,
}

impl ModeEntry {
    pub fn encode_only(&self) -> bool {
        self.decoder.is_none()
    }
}

/// A transform resolved for one direction, either built in or a charset.
#[derive(Clone, Copy)]
pub enum Transform {
    Builtin {
        mode: &'static str,
        apply: TransformFn,
    },
    Charset(Charset),
}

impl Transform {
    pub fn name(&self) -> &'static str {
        match self {
            Transform::Builtin { mode, .. } => mode,
            Transform::Charset(charset) => charset.name(),
        }
    }

    pub fn apply(&self, input: &[u8]) -> Result<Vec<u8>> {
        match self {
            Transform::Builtin { apply, .. } => apply(input),
            Transform::Charset(charset) => charset.apply(input),
        }
    }
}

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transform::Builtin { mode, .. } => f.debug_struct("Builtin").field("mode", mode).finish(),
            Transform::Charset(charset) => f.debug_tuple("Charset").field(charset).finish(),
        }
    }
}
