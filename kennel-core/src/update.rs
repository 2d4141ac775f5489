//! Update descriptors applied by filter-plus-update operations.
//!
//! An [`Update`] is an ordered list of [`UpdateOp`]s, each targeting one top-level field:
//!
//! ```ignore
//! use kennel::update::Update;
//!
//! let rename = Update::new().set("dogName", "Milo").set("age", 7);
//! let birthday = Update::new().inc("age", 1);
//! let new_toy = Update::new().push("toys", "Rope Toy");
//! ```

use bson::{Bson, Document as BsonDocument};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// One change to a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOp {
    /// Replace the field's value.
    Set(String, Bson),
    /// Add a number to the field; a missing field starts at the amount.
    Inc(String, Bson),
    /// Append to an array field; a missing field becomes a one-element array.
    Push(String, Bson),
}

impl UpdateOp {
    fn field(&self) -> &str {
        match self {
            UpdateOp::Set(field, _) | UpdateOp::Inc(field, _) | UpdateOp::Push(field, _) => field,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    ops: Vec<UpdateOp>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.ops.push(UpdateOp::Set(field.into(), value.into()));
        self
    }

    pub fn inc(mut self, field: impl Into<String>, amount: impl Into<Bson>) -> Self {
        self.ops.push(UpdateOp::Inc(field.into(), amount.into()));
        self
    }

    pub fn push(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.ops.push(UpdateOp::Push(field.into(), value.into()));
        self
    }

    pub fn ops(&self) -> &[UpdateOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Applies every operation to `document` in order.
    ///
    /// Returns whether the document changed. On error the document may be partially
    /// modified; callers apply updates to a copy they are prepared to discard.
    pub fn apply(&self, document: &mut BsonDocument) -> DocumentStoreResult<bool> {
        let mut changed = false;

        for op in &self.ops {
            if op.field() == "_id" {
                return Err(DocumentStoreError::InvalidUpdate(
                    "the _id field is immutable".to_string(),
                ));
            }

            changed |= match op {
                UpdateOp::Set(field, value) => {
                    document.insert(field.clone(), value.clone()).as_ref() != Some(value)
                }
                UpdateOp::Inc(field, amount) => {
                    let (next, was_missing) = match document.get(field) {
                        Some(current) => (add_numbers(field, current, amount)?, false),
                        None => {
                            check_number(field, amount)?;
                            (amount.clone(), true)
                        }
                    };
                    document.insert(field.clone(), next);
                    was_missing || !is_zero(amount)
                }
                UpdateOp::Push(field, value) => {
                    match document.get_mut(field) {
                        Some(Bson::Array(items)) => items.push(value.clone()),
                        Some(other) => {
                            return Err(DocumentStoreError::InvalidUpdate(format!(
                                "cannot push to `{field}`: expected an array, found {:?}",
                                other.element_type()
                            )));
                        }
                        None => {
                            document.insert(field.clone(), Bson::Array(vec![value.clone()]));
                        }
                    }
                    true
                }
            };
        }

        Ok(changed)
    }
}

fn check_number(field: &str, value: &Bson) -> DocumentStoreResult<()> {
    match value {
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) => Ok(()),
        other => Err(DocumentStoreError::InvalidUpdate(format!(
            "cannot increment `{field}` by a non-numeric {:?}",
            other.element_type()
        ))),
    }
}

fn is_zero(value: &Bson) -> bool {
    match value {
        Bson::Int32(n) => *n == 0,
        Bson::Int64(n) => *n == 0,
        Bson::Double(n) => *n == 0.0,
        _ => false,
    }
}

fn add_numbers(field: &str, current: &Bson, amount: &Bson) -> DocumentStoreResult<Bson> {
    check_number(field, amount)?;

    let overflow = || DocumentStoreError::InvalidUpdate(format!("incrementing `{field}` overflows"));

    Ok(match (current, amount) {
        (Bson::Int32(a), Bson::Int32(b)) => match a.checked_add(*b) {
            Some(sum) => Bson::Int32(sum),
            None => Bson::Int64(i64::from(*a) + i64::from(*b)),
        },
        (Bson::Int32(a), Bson::Int64(b)) => Bson::Int64(i64::from(*a).checked_add(*b).ok_or_else(overflow)?),
        (Bson::Int64(a), Bson::Int32(b)) => Bson::Int64(a.checked_add(i64::from(*b)).ok_or_else(overflow)?),
        (Bson::Int64(a), Bson::Int64(b)) => Bson::Int64(a.checked_add(*b).ok_or_else(overflow)?),
        (Bson::Double(a), _) => Bson::Double(a + as_f64(amount)),
        (Bson::Int32(_) | Bson::Int64(_), Bson::Double(b)) => Bson::Double(as_f64(current) + b),
        (other, _) => {
            return Err(DocumentStoreError::InvalidUpdate(format!(
                "cannot increment `{field}`: expected a number, found {:?}",
                other.element_type()
            )));
        }
    })
}

fn as_f64(value: &Bson) -> f64 {
    match value {
        Bson::Int32(n) => f64::from(*n),
        Bson::Int64(n) => *n as f64,
        Bson::Double(n) => *n,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn set_replaces_and_reports_change() {
        let mut document = doc! { "dogName": "Koda", "age": 3 };

        let changed = Update::new()
            .set("dogName", "Milo")
            .set("age", 7)
            .apply(&mut document)
            .unwrap();

        assert!(changed);
        assert_eq!(document, doc! { "dogName": "Milo", "age": 7 });
    }

    #[test]
    fn setting_the_same_value_is_not_a_change() {
        let mut document = doc! { "dogName": "Koda" };

        assert!(!Update::new().set("dogName", "Koda").apply(&mut document).unwrap());
    }

    #[test]
    fn inc_adds_and_starts_missing_fields_at_the_amount() {
        let mut document = doc! { "age": 1.0 };
        Update::new().inc("age", 1).apply(&mut document).unwrap();
        assert_eq!(document.get("age"), Some(&Bson::Double(2.0)));

        let mut document = doc! { "dogName": "Mojo" };
        assert!(Update::new().inc("age", 1).apply(&mut document).unwrap());
        assert_eq!(document.get("age"), Some(&Bson::Int32(1)));
    }

    #[test]
    fn inc_promotes_on_i32_overflow() {
        let mut document = doc! { "count": i32::MAX };
        Update::new().inc("count", 1).apply(&mut document).unwrap();
        assert_eq!(document.get("count"), Some(&Bson::Int64(i64::from(i32::MAX) + 1)));
    }

    #[test]
    fn inc_by_zero_is_not_a_change() {
        let mut document = doc! { "age": 4 };
        assert!(!Update::new().inc("age", 0).apply(&mut document).unwrap());
    }

    #[test]
    fn inc_rejects_non_numbers() {
        let mut document = doc! { "dogName": "Koda" };
        assert!(matches!(
            Update::new().inc("dogName", 1).apply(&mut document),
            Err(DocumentStoreError::InvalidUpdate(_))
        ));
        assert!(matches!(
            Update::new().inc("age", "one").apply(&mut document),
            Err(DocumentStoreError::InvalidUpdate(_))
        ));
    }

    #[test]
    fn push_appends_or_creates_the_array() {
        let mut document = doc! { "toys": ["Ball"] };
        Update::new().push("toys", "Rope Toy").apply(&mut document).unwrap();
        assert_eq!(document, doc! { "toys": ["Ball", "Rope Toy"] });

        let mut document = doc! {};
        Update::new().push("toys", "Rope Toy").apply(&mut document).unwrap();
        assert_eq!(document, doc! { "toys": ["Rope Toy"] });
    }

    #[test]
    fn push_rejects_non_arrays() {
        let mut document = doc! { "toys": "Ball" };
        assert!(matches!(
            Update::new().push("toys", "Rope Toy").apply(&mut document),
            Err(DocumentStoreError::InvalidUpdate(_))
        ));
    }

    #[test]
    fn id_is_immutable() {
        let mut document = doc! { "_id": 1 };
        assert!(matches!(
            Update::new().set("_id", 2).apply(&mut document),
            Err(DocumentStoreError::InvalidUpdate(_))
        ));
    }
}
