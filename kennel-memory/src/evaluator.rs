//! Filter evaluation for in-memory documents.
//!
//! This module evaluates filter expressions directly against stored BSON documents,
//! following the same matching rules as the networked backends.

use std::{collections::HashMap, cmp::Ordering};
use bson::{Bson, datetime::DateTime, oid::ObjectId};

use kennel_core::{
    query::{QueryVisitor, Expr, FieldOp},
    error::{DocumentStoreError, DocumentStoreResult},
};


/// Type-erased, comparable representation of BSON values.
///
/// Numeric types are normalized to f64 so an `Int32` age compares equal to a
/// `Double` age. Values of different kinds never compare.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(f64),
    DateTime(DateTime),
    ObjectId(ObjectId),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(f64::from(*value)),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::ObjectId(value) => Comparable::ObjectId(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            _ => Comparable::Null,
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl<'a> Comparable<'a> {
    /// Equality with array fields matching on any element.
    fn matches(&self, target: &Comparable<'a>) -> bool {
        self == target
            || matches!(self, Comparable::Array(items) if items.iter().any(|item| item == target))
    }

    /// Ordering with array fields matching on any element.
    fn satisfies(&self, op: FieldOp, target: &Comparable<'a>) -> bool {
        if let Comparable::Array(items) = self {
            return items
                .iter()
                .any(|item| item.satisfies(op, target));
        }

        match self.partial_cmp(target) {
            Some(ordering) => match op {
                FieldOp::Gt => ordering == Ordering::Greater,
                FieldOp::Gte => ordering != Ordering::Less,
                FieldOp::Lt => ordering == Ordering::Less,
                FieldOp::Lte => ordering != Ordering::Greater,
                _ => false,
            },
            None => false,
        }
    }

    fn matches_any(&self, targets: &Comparable<'a>) -> bool {
        match targets {
            Comparable::Array(values) => values
                .iter()
                .any(|value| self.matches(value)),
            single => self.matches(single),
        }
    }
}


pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Bson,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Bson) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> DocumentStoreResult<bool> {
        self.visit_expr(expr)
    }

    pub fn filter_documents(
        documents: impl IntoIterator<Item = &'a Bson>,
        expr: &Expr,
    ) -> DocumentStoreResult<Vec<Bson>> {
        let mut matched = Vec::new();

        for document in documents {
            if DocumentEvaluator::new(document).evaluate(expr)? {
                matched.push(document.clone());
            }
        }

        Ok(matched)
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if self.visit_expr(expr)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        Ok(!self.visit_expr(expr)?)
    }

    fn visit_field(&mut self, field: &str, op: FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        let document = self.document
            .as_document()
            .ok_or_else(|| DocumentStoreError::InvalidDocument("expected a document".to_string()))?;

        let Some(stored) = document.get(field) else {
            return Ok(matches!(op, FieldOp::Ne | FieldOp::NoneOf));
        };

        let stored = Comparable::from(stored);
        let target = Comparable::from(value);

        Ok(match op {
            FieldOp::Eq => stored.matches(&target),
            FieldOp::Ne => !stored.matches(&target),
            FieldOp::Gt | FieldOp::Gte | FieldOp::Lt | FieldOp::Lte => stored.satisfies(op, &target),
            FieldOp::AnyOf => stored.matches_any(&target),
            FieldOp::NoneOf => !stored.matches_any(&target),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use kennel_core::query::Filter;

    fn eval(document: &Bson, expr: &Expr) -> bool {
        DocumentEvaluator::new(document).evaluate(expr).unwrap()
    }

    #[test]
    fn numbers_compare_across_types() {
        let document = Bson::Document(doc! { "age": 1.0 });

        assert!(eval(&document, &Filter::gt("age", 0)));
        assert!(eval(&document, &Filter::eq("age", 1)));
        assert!(!eval(&document, &Filter::lt("age", 1)));
    }

    #[test]
    fn zero_is_not_greater_than_zero() {
        let document = Bson::Document(doc! { "age": 0 });

        assert!(!eval(&document, &Filter::gt("age", 0)));
        assert!(eval(&document, &Filter::gte("age", 0)));
    }

    #[test]
    fn missing_fields_only_match_negations() {
        let document = Bson::Document(doc! { "dogName": "Koda" });

        assert!(!eval(&document, &Filter::gt("age", 0)));
        assert!(!eval(&document, &Filter::eq("age", 0)));
        assert!(eval(&document, &Filter::ne("age", 0)));
        assert!(eval(&document, &Filter::none_of("age", [1, 2])));
    }

    #[test]
    fn arrays_match_on_any_element() {
        let document = Bson::Document(doc! { "toys": ["Ball", "Rope Toy"] });

        assert!(eval(&document, &Filter::eq("toys", "Ball")));
        assert!(!eval(&document, &Filter::ne("toys", "Ball")));
        assert!(eval(&document, &Filter::any_of("toys", ["Bone", "Rope Toy"])));
    }

    #[test]
    fn mismatched_kinds_never_order() {
        let document = Bson::Document(doc! { "age": "three" });

        assert!(!eval(&document, &Filter::gt("age", 0)));
        assert!(!eval(&document, &Filter::lt("age", 0)));
    }

    #[test]
    fn logical_combinators() {
        let document = Bson::Document(doc! { "dogName": "Mojo", "age": 2 });

        assert!(eval(&document, &Filter::eq("dogName", "Mojo").and(Filter::gt("age", 1))));
        assert!(eval(&document, &Filter::eq("dogName", "Koda").or(Filter::gt("age", 1))));
        assert!(!eval(&document, &Filter::eq("dogName", "Mojo").not()));
    }
}
