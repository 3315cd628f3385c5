//! Output projection: map finalized columns onto storage payloads, file-extension
//! hints, and `.key` decode sidecars for the file-writing boundary.

pub mod writer;

use crate::engine::{Collimation, ColumnBuffer};

pub use writer::{output_dir_for, write_artifacts};

/// Element type of a fixed-width binary payload, keyed to a short file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl ElementType {
    /// File-extension hint for this element type.
    pub fn extension(self) -> &'static str {
        match self {
            ElementType::I8 => ".i8",
            ElementType::U8 => ".u8",
            ElementType::I16 => ".i16",
            ElementType::U16 => ".u16",
            ElementType::I32 => ".i32",
            ElementType::U32 => ".u32",
            ElementType::F32 => ".f32",
            ElementType::F64 => ".f64",
        }
    }
}

/// Extension hint for unencoded Text columns.
pub const TEXT_EXTENSION: &str = ".json";
/// Extension hint for 8-bit dictionary code buffers.
pub const CODES8_EXTENSION: &str = ".s8";
/// Extension hint for 16-bit dictionary code buffers.
pub const CODES16_EXTENSION: &str = ".s16";
/// Extension of the decode-table sidecar written next to code buffers.
pub const KEY_EXTENSION: &str = ".key";

/// Payload of one projected column file.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactPayload {
    /// Native little-endian element array.
    Binary(Vec<u8>),
    /// JSON array text.
    Json(String),
}

/// Decode-table sidecar for a dictionary-encoded column.
#[derive(Debug, Clone, PartialEq)]
pub struct Sidecar {
    /// Sidecar file name (`<stem>.key`).
    pub file_name: String,
    /// Ordered JSON array: quoted strings for Text decoders, bare numbers
    /// otherwise, `null` for the null entry.
    pub json: String,
}

/// One column mapped to its on-disk representation.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnArtifact {
    /// Original column name.
    pub column: String,
    /// Output file name: sanitized column name plus extension hint.
    pub file_name: String,
    /// File payload.
    pub payload: ArtifactPayload,
    /// Decode table, present iff the column is dictionary-encoded.
    pub sidecar: Option<Sidecar>,
}

/// Project every finalized column onto its storage representation.
pub fn project(collimation: &Collimation) -> Vec<ColumnArtifact> {
    collimation
        .columns
        .iter()
        .map(|col| {
            let stem = sanitize(&col.profile.name);
            let (ext, payload) = match &col.buffer {
                ColumnBuffer::Int32(v) => (ElementType::I32.extension(), ArtifactPayload::Binary(le_bytes_i32(v))),
                ColumnBuffer::Float32(v) => (ElementType::F32.extension(), ArtifactPayload::Binary(le_bytes_f32(v))),
                ColumnBuffer::Codes8(v) => (CODES8_EXTENSION, ArtifactPayload::Binary(v.clone())),
                ColumnBuffer::Codes16(v) => (CODES16_EXTENSION, ArtifactPayload::Binary(le_bytes_u16(v))),
                ColumnBuffer::Text(v) => (
                    TEXT_EXTENSION,
                    ArtifactPayload::Json(serde_json::to_string(v).unwrap_or_else(|_| "[]".to_string())),
                ),
            };

            let sidecar = col.dictionary.as_ref().map(|dict| Sidecar {
                file_name: format!("{stem}{KEY_EXTENSION}"),
                json: serde_json::to_string(dict.decoder()).unwrap_or_else(|_| "[]".to_string()),
            });

            ColumnArtifact {
                column: col.profile.name.clone(),
                file_name: format!("{stem}{ext}"),
                payload,
                sidecar,
            }
        })
        .collect()
}

/// Sanitize a column name for file naming: lowercase; strip leading/trailing
/// non-word characters; `&`→`and`, `@`→`at`, `%`→`percent`, `-`→`_`; collapse any
/// remaining non-word run to a single `_`.
pub fn sanitize(name: &str) -> String {
    let lower = name.to_lowercase();
    let trimmed = lower.trim_matches(|c: char| !is_word(c));

    let mut replaced = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '&' => replaced.push_str("and"),
            '@' => replaced.push_str("at"),
            '%' => replaced.push_str("percent"),
            '-' => replaced.push('_'),
            c => replaced.push(c),
        }
    }

    let mut out = String::with_capacity(replaced.len());
    let mut in_run = false;
    for c in replaced.chars() {
        if is_word(c) {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn le_bytes_i32(values: &[i32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 4);
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

fn le_bytes_f32(values: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 4);
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

fn le_bytes_u16(values: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 2);
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}
