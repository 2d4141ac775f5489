//! Translation of filter expressions into MongoDB query documents.

use bson::{Document, Bson, doc};

use kennel_core::{
    query::{QueryVisitor, Expr, FieldOp},
    error::DocumentStoreError,
};


/// Converts filter expressions into MongoDB's native query syntax.
///
/// MongoDB's own matching already agrees with the shared rules: `$ne` and `$nin`
/// match missing fields, and `$eq` on an array field matches any element.
pub(crate) struct MongoQueryTranslator;

impl MongoQueryTranslator {
    fn visit_all(&mut self, exprs: &[Expr]) -> Result<Vec<Document>, DocumentStoreError> {
        exprs
            .iter()
            .map(|expr| self.visit_expr(expr))
            .collect()
    }
}

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! { "$and": self.visit_all(exprs)? })
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! { "$or": self.visit_all(exprs)? })
    }

    // `$not` only applies to operator expressions, so whole-expression negation uses `$nor`.
    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        let negated = self.visit_expr(expr)?;

        Ok(doc! { "$nor": [negated] })
    }

    fn visit_field(&mut self, field: &str, op: FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        let values = || match value {
            Bson::Array(_) => value.clone(),
            single => Bson::Array(vec![single.clone()]),
        };

        Ok(doc! {
            field: match op {
                FieldOp::Eq => doc! { "$eq": value },
                FieldOp::Ne => doc! { "$ne": value },
                FieldOp::Gt => doc! { "$gt": value },
                FieldOp::Gte => doc! { "$gte": value },
                FieldOp::Lt => doc! { "$lt": value },
                FieldOp::Lte => doc! { "$lte": value },
                FieldOp::AnyOf => doc! { "$in": values() },
                FieldOp::NoneOf => doc! { "$nin": values() },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kennel_core::query::Filter;

    fn translate(expr: &Expr) -> Document {
        MongoQueryTranslator.visit_expr(expr).unwrap()
    }

    #[test]
    fn comparisons() {
        assert_eq!(translate(&Filter::gt("age", 0)), doc! { "age": { "$gt": 0 } });
        assert_eq!(translate(&Filter::ne("dogName", "Koda")), doc! { "dogName": { "$ne": "Koda" } });
    }

    #[test]
    fn set_membership() {
        assert_eq!(
            translate(&Filter::any_of("country", ["US", "FR"])),
            doc! { "country": { "$in": ["US", "FR"] } }
        );
        assert_eq!(
            translate(&Expr::field("age".to_string(), FieldOp::NoneOf, Bson::Int32(1))),
            doc! { "age": { "$nin": [1] } }
        );
    }

    #[test]
    fn logical_operators() {
        assert_eq!(
            translate(&Filter::eq("dogName", "Mojo").and(Filter::lt("age", 2))),
            doc! { "$and": [{ "dogName": { "$eq": "Mojo" } }, { "age": { "$lt": 2 } }] }
        );
        assert_eq!(
            translate(&Filter::eq("dogName", "Mojo").not()),
            doc! { "$nor": [{ "dogName": { "$eq": "Mojo" } }] }
        );
    }
}
