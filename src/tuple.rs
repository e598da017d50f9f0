//! `Tuple` -- an owned row of `Field`s tied to a `TupleDesc` (spec.md
//! section 3). Grounded in the teacher's `tuple::Tuple`/`row::Row`, merged
//! into one INT/STRING-capable type instead of the teacher's INT-only
//! `IntCell` vector.

use crate::field::{Field, TupleDesc};
use crate::page_id::RecordId;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct Tuple {
    desc: Arc<TupleDesc>,
    fields: Vec<Field>,
    record_id: Option<RecordId>,
}

impl Tuple {
    pub fn new(desc: Arc<TupleDesc>, fields: Vec<Field>) -> Tuple {
        assert_eq!(
            desc.num_fields(),
            fields.len(),
            "tuple arity does not match schema"
        );
        Tuple {
            desc,
            fields,
            record_id: None,
        }
    }

    pub fn desc(&self) -> &Arc<TupleDesc> {
        &self.desc
    }

    pub fn get_field(&self, i: usize) -> &Field {
        &self.fields[i]
    }

    pub fn set_field(&mut self, i: usize, field: Field) {
        self.fields[i] = field;
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn record_id(&self) -> Option<RecordId> {
        self.record_id
    }

    pub fn set_record_id(&mut self, rid: RecordId) {
        self.record_id = Some(rid);
    }

    /// Schema-compatible with `other_desc` if it has the same arity and
    /// field types in order -- matches the teacher's `TupleScheme::eq`.
    pub fn matches_schema(&self, other_desc: &TupleDesc) -> bool {
        self.desc.num_fields() == other_desc.num_fields()
            && (0..self.desc.num_fields())
                .all(|i| self.desc.field_type(i) == other_desc.field_type(i))
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.desc.width());
        for field in &self.fields {
            buf.extend_from_slice(&field.encode());
        }
        buf
    }

    pub fn decode(desc: Arc<TupleDesc>, bytes: &[u8]) -> Tuple {
        let mut fields = Vec::with_capacity(desc.num_fields());
        let mut start = 0;
        for i in 0..desc.num_fields() {
            let ty = desc.field_type(i);
            let width = ty.width();
            fields.push(Field::decode(ty, &bytes[start..start + width]));
            start += width;
        }
        Tuple {
            desc,
            fields,
            record_id: None,
        }
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rendered: Vec<String> = self.fields.iter().map(|c| c.to_string()).collect();
        write!(f, "({})", rendered.join(", "))
    }
}
