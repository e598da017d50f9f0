//! Minimal `Field`/`TupleDesc` value containers.
//!
//! spec.md section 1 names `Field`/`Tuple` as external collaborators, but
//! section 3 pins their exact shape and on-disk width, and the heap page
//! codec cannot exist without something to encode. This module supplies the
//! minimal concrete containers the core needs -- no expression evaluation,
//! no SQL-facing formatting -- grounded in the teacher's `field.rs`/`cell.rs`
//! (`Type::{INT, STRING}`, `FieldItem { field_type, field_name }`) widened to
//! the INT/STRING sum type spec.md section 3 calls for.

use crate::config::STRING_LEN;
use std::cmp::Ordering;
use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FieldType {
    Int,
    String,
}

impl FieldType {
    /// Canonical on-disk width in bytes (spec.md section 6).
    pub fn width(self) -> usize {
        match self {
            FieldType::Int => 4,
            FieldType::String => 4 + STRING_LEN,
        }
    }
}

/// A single typed value. `String` values longer than `STRING_LEN` bytes are
/// rejected at construction -- the page codec assumes a fixed width.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Int(i32),
    String(String),
}

impl Field {
    pub fn field_type(&self) -> FieldType {
        match self {
            Field::Int(_) => FieldType::Int,
            Field::String(_) => FieldType::String,
        }
    }

    /// Canonical fixed-width byte encoding (spec.md section 6): INT is a
    /// 4-byte big-endian two's-complement integer; STRING is a 4-byte
    /// big-endian length prefix followed by `STRING_LEN` zero-padded bytes
    /// of UTF-8 content.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Field::Int(v) => v.to_be_bytes().to_vec(),
            Field::String(s) => {
                let bytes = s.as_bytes();
                assert!(
                    bytes.len() <= STRING_LEN,
                    "string field exceeds {} bytes",
                    STRING_LEN
                );
                let mut buf = Vec::with_capacity(4 + STRING_LEN);
                buf.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
                buf.extend_from_slice(bytes);
                buf.resize(4 + STRING_LEN, 0);
                buf
            }
        }
    }

    pub fn decode(ty: FieldType, bytes: &[u8]) -> Field {
        match ty {
            FieldType::Int => {
                let mut arr = [0u8; 4];
                arr.copy_from_slice(&bytes[0..4]);
                Field::Int(i32::from_be_bytes(arr))
            }
            FieldType::String => {
                let mut len_bytes = [0u8; 4];
                len_bytes.copy_from_slice(&bytes[0..4]);
                let len = u32::from_be_bytes(len_bytes) as usize;
                let content = &bytes[4..4 + len];
                Field::String(String::from_utf8_lossy(content).into_owned())
            }
        }
    }

    /// Total, monotonic mapping from a string field to an integer key, used
    /// to route STRING predicates through `IntHistogram` (spec.md section 9,
    /// first Open Question). Defined here as the first 4 bytes of the UTF-8
    /// encoding, big-endian, zero-padded on the right for short strings --
    /// this preserves lexicographic order over the common prefix length.
    pub fn string_to_int_key(s: &str) -> i32 {
        let bytes = s.as_bytes();
        let mut arr = [0u8; 4];
        let n = bytes.len().min(4);
        arr[..n].copy_from_slice(&bytes[..n]);
        i32::from_be_bytes(arr)
    }
}

impl PartialOrd for Field {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Field::Int(a), Field::Int(b)) => a.partial_cmp(b),
            (Field::String(a), Field::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Field::Int(v) => write!(f, "{}", v),
            Field::String(s) => write!(f, "{}", s),
        }
    }
}

/// One named, typed column of a `TupleDesc`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FieldItem {
    pub field_type: FieldType,
    pub field_name: Option<String>,
}

/// Ordered column schema. Immutable once constructed (spec.md section 3):
/// there is no way to mutate an existing `TupleDesc` in place, only to
/// build a new one via `new`/`merge`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TupleDesc {
    fields: Vec<FieldItem>,
}

impl TupleDesc {
    pub fn new(fields: Vec<FieldItem>) -> TupleDesc {
        TupleDesc { fields }
    }

    pub fn simple_int(width: usize, name_prefix: &str) -> TupleDesc {
        let fields = (0..width)
            .map(|i| FieldItem {
                field_type: FieldType::Int,
                field_name: Some(format!("{}{}", name_prefix, i)),
            })
            .collect();
        TupleDesc { fields }
    }

    pub fn merge(a: TupleDesc, b: TupleDesc) -> TupleDesc {
        let mut fields = a.fields;
        fields.extend(b.fields);
        TupleDesc { fields }
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn field_type(&self, i: usize) -> FieldType {
        self.fields[i].field_type
    }

    pub fn field_name(&self, i: usize) -> Option<&str> {
        self.fields[i].field_name.as_deref()
    }

    /// Sum of the canonical on-disk widths of every field -- the
    /// `tupleBytes` quantity spec.md section 6 uses in the slot-count
    /// formula.
    pub fn width(&self) -> usize {
        self.fields.iter().map(|f| f.field_type.width()).sum()
    }

    pub fn fields(&self) -> &[FieldItem] {
        &self.fields
    }
}
