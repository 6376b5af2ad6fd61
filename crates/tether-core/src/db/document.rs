use crate::{types::DocId, value::Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// Document
///
/// Store-owned record: an opaque id plus an arbitrary field set.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Document {
    pub id: DocId,
    pub fields: BTreeMap<String, Value>,
}

impl Document {
    #[must_use]
    pub const fn new(id: DocId) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Whether the document carries `flag_field == true`.
    #[must_use]
    pub fn is_flagged(&self, flag_field: &str) -> bool {
        self.get(flag_field).and_then(Value::as_bool) == Some(true)
    }

    /// Apply a patch in op order.
    pub fn apply(&mut self, patch: &Patch) {
        for op in &patch.ops {
            match op {
                PatchOp::Set(field, value) => {
                    self.fields.insert(field.clone(), value.clone());
                }
                PatchOp::Unset(field) => {
                    self.fields.remove(field);
                }
            }
        }
    }
}

///
/// PatchOp
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PatchOp {
    Set(String, Value),
    Unset(String),
}

///
/// Patch
///
/// Ordered partial update. Fields not named are left untouched.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Patch {
    ops: Vec<PatchOp>,
}

impl Patch {
    #[must_use]
    pub const fn new() -> Self {
        Self { ops: Vec::new() }
    }

    #[must_use]
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.ops.push(PatchOp::Set(field.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn unset(mut self, field: &str) -> Self {
        self.ops.push(PatchOp::Unset(field.to_string()));
        self
    }

    #[must_use]
    pub fn ops(&self) -> &[PatchOp] {
        &self.ops
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
