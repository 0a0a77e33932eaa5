use super::Translator;

use gqlcypher_core::{
    schema::{Field, FieldTy, Scalar},
    stmt::{Expr, ExprReduce, Value},
    Error, Result,
};

impl Translator<'_> {
    /// Binds an input value for `field` and returns the expression that
    /// yields it in the database's representation.
    ///
    /// Temporal values are passed as strings and converted with the kind's
    /// constructor function, points are passed as maps and converted with
    /// `point()`.
    pub(crate) fn field_value(&mut self, hint: &str, field: &Field, value: &Value) -> Result<Expr> {
        match &field.ty {
            FieldTy::Primitive(primitive) => {
                let value = coerce(&primitive.scalar, &field.name, value)?;
                Ok(self.param(hint, value))
            }
            FieldTy::Temporal(temporal) => {
                let function = temporal.kind.function();
                self.converted(hint, field, value, |param| Expr::func(function, [param]))
            }
            FieldTy::Point(_) => {
                self.converted(hint, field, value, |param| Expr::func("point", [param]))
            }
            _ => Err(Error::invalid_request(format!(
                "field `{}` does not accept input values",
                field.name
            ))),
        }
    }

    fn converted(
        &mut self,
        hint: &str,
        field: &Field,
        value: &Value,
        convert: impl Fn(Expr) -> Expr,
    ) -> Result<Expr> {
        let param = self.param(hint, value.clone());

        if !value.is_list() {
            return Ok(convert(param));
        }

        if !field.is_list() {
            return Err(Error::invalid_request(format!(
                "`{}` expects a single value, got a list",
                field.name
            )));
        }

        Ok(self.map_list(param, convert))
    }

    /// `reduce(acc = [], item IN list | acc + convert(item))`, mapping every
    /// item of a list.
    pub(crate) fn map_list(&mut self, list: Expr, convert: impl Fn(Expr) -> Expr) -> Expr {
        let accumulator = self.env.variable("acc");
        let item = self.env.variable("item");
        ExprReduce {
            init: Box::new(Expr::list([])),
            list: Box::new(list),
            expr: Box::new(Expr::add(&accumulator, convert(item.clone().into()))),
            accumulator,
            variable: item,
        }
        .into()
    }
}

/// Checks `value` against `scalar`, widening integers given for float
/// fields and parsing big integers passed as strings.
pub(crate) fn coerce(scalar: &Scalar, name: &str, value: &Value) -> Result<Value> {
    match (scalar, value) {
        (_, Value::Null) => Ok(Value::Null),
        (_, Value::List(items)) => items
            .iter()
            .map(|item| coerce(scalar, name, item))
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        (Scalar::Float, Value::Int(v)) => Ok(Value::Float(*v as f64)),
        (Scalar::ID, Value::Int(v)) => Ok(Value::String(v.to_string())),
        (Scalar::BigInt, Value::String(v)) => v.parse().map(Value::Int).map_err(|_| {
            Error::invalid_request(format!("`{name}` expects BigInt, got `{v}`"))
        }),
        (Scalar::Int | Scalar::BigInt, Value::Int(_))
        | (Scalar::Float, Value::Float(_))
        | (Scalar::Boolean, Value::Bool(_))
        | (Scalar::ID | Scalar::String | Scalar::Enum(_), Value::String(_)) => Ok(value.clone()),
        _ => Err(Error::invalid_request(format!(
            "`{name}` expects {}, got {}",
            scalar.name(),
            value.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_widen_for_float_fields() {
        assert_eq!(
            coerce(&Scalar::Float, "rating", &Value::Int(3)).unwrap(),
            Value::Float(3.0)
        );
        assert_eq!(
            coerce(&Scalar::Int, "likes", &Value::Int(3)).unwrap(),
            Value::Int(3)
        );
    }

    #[test]
    fn floats_are_rejected_for_int_fields() {
        let err = coerce(&Scalar::Int, "likes", &Value::Float(1.5)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid request: `likes` expects Int, got float"
        );
    }

    #[test]
    fn lists_are_coerced_item_by_item() {
        let value = Value::List(vec![Value::Int(1), Value::Float(2.5)]);
        assert_eq!(
            coerce(&Scalar::Float, "ratings", &value).unwrap(),
            Value::List(vec![Value::Float(1.0), Value::Float(2.5)])
        );
    }

    #[test]
    fn big_integers_parse_from_strings() {
        assert_eq!(
            coerce(&Scalar::BigInt, "views", &Value::from("9007199254740993")).unwrap(),
            Value::Int(9007199254740993)
        );
    }
}
