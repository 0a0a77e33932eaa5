mod aggregate;
mod connection;
mod operator;
mod relationship;

pub(crate) use operator::ScalarOp;
pub(crate) use relationship::RelQuantifier;

use super::{input, Subject, Translator};

use gqlcypher_core::{
    schema::{Entity, Field, FieldPoint, FieldTy},
    stmt::{Expr, Value, Variable},
    Error, Result,
};

impl<'a> Translator<'a> {
    /// Compiles a `where` map evaluated against `var` into a predicate.
    ///
    /// Entries are combined with AND. `None` means the filter places no
    /// restriction.
    pub(crate) fn filter(
        &mut self,
        var: &Variable,
        subject: Subject<'a>,
        filter: &Value,
    ) -> Result<Option<Expr>> {
        let map = input::expect_map("where", filter)?;

        let mut predicates = vec![];
        for (key, value) in map {
            predicates.push(self.filter_entry(var, subject, key, value)?);
        }

        Ok(Expr::and_all(predicates))
    }

    /// Compiles an optional `where` argument.
    pub(crate) fn filter_arg(
        &mut self,
        var: &Variable,
        subject: Subject<'a>,
        filter: Option<&Value>,
    ) -> Result<Option<Expr>> {
        match filter {
            Some(filter) => self.filter(var, subject, filter),
            None => Ok(None),
        }
    }

    fn filter_entry(
        &mut self,
        var: &Variable,
        subject: Subject<'a>,
        key: &str,
        value: &Value,
    ) -> Result<Option<Expr>> {
        match key {
            "AND" | "OR" => {
                let mut nested = vec![];
                for item in input::expect_list(key, value)? {
                    nested.push(self.filter(var, subject, item)?);
                }
                Ok(junction(key, nested))
            }
            "NOT" => Ok(self.filter(var, subject, value)?.map(Expr::not)),
            _ => self.field_filter(var, subject, key, value),
        }
    }

    fn field_filter(
        &mut self,
        var: &Variable,
        subject: Subject<'a>,
        key: &str,
        value: &Value,
    ) -> Result<Option<Expr>> {
        if let Some(field) = subject.find_field(key) {
            return if field.is_relationship() {
                self.relationship_filter(var, field, RelQuantifier::Plain, value)
            } else {
                self.scalar_filter(var, field, ScalarOp::Eq, key, value)
                    .map(Some)
            };
        }

        if let Some(name) = key.strip_suffix("Aggregate") {
            if let Some(field) = subject.find_field(name).filter(|f| f.is_relationship()) {
                return self.aggregate_filter(var, field, value);
            }
        }

        let (base, quantifier) = RelQuantifier::split(key);
        if let Some(name) = base.strip_suffix("Connection") {
            if let Some(field) = subject.find_field(name).filter(|f| f.is_relationship()) {
                return self.connection_filter(var, field, quantifier, value);
            }
        }
        if let Some(field) = subject.find_field(base).filter(|f| f.is_relationship()) {
            return self.relationship_filter(var, field, quantifier, value);
        }

        let (name, op) = ScalarOp::split(key);
        if let Some(entity) = subject.entity().filter(|e| e.is_global_id_key(name)) {
            return self.global_id_filter(var, entity, op, key, value).map(Some);
        }

        match subject.find_field(name) {
            Some(field) if !field.is_relationship() => {
                self.scalar_filter(var, field, op, key, value).map(Some)
            }
            _ => Err(Error::invalid_request(format!(
                "unknown filter `{key}` on `{}`",
                subject.name()
            ))),
        }
    }

    fn scalar_filter(
        &mut self,
        var: &Variable,
        field: &Field,
        op: ScalarOp,
        key: &str,
        value: &Value,
    ) -> Result<Expr> {
        if !field.filterable {
            return Err(Error::invalid_request(format!(
                "field `{}` cannot be filtered",
                field.name
            )));
        }

        let property = var.property(field.property_name());
        let hint = format!("{var}_{}", field.name);

        if value.is_null() {
            return match op {
                ScalarOp::Eq => Ok(Expr::is_null(property)),
                ScalarOp::Not => Ok(Expr::is_not_null(property)),
                _ => Err(Error::invalid_request(format!(
                    "`{key}` does not accept null"
                ))),
            };
        }

        op.check(field, key, value)?;
        if op == ScalarOp::Matches && !self.config.enable_regex {
            return Err(Error::invalid_request(format!(
                "`{key}` is not available: regular expression filters are disabled"
            )));
        }

        match &field.ty {
            FieldTy::Point(point) => self.point_filter(property, point, op, &hint, value),
            FieldTy::Temporal(_) | FieldTy::Primitive(_) if op.is_membership() => {
                if field.is_list() || !value.is_list() {
                    return Err(Error::invalid_request(format!(
                        "`{key}` expects a list of values"
                    )));
                }
                self.membership_filter(property, field, op, &hint, value)
            }
            FieldTy::Primitive(_) | FieldTy::Temporal(_) => {
                // Element operators compare a single item against a list field
                let rhs = if op.is_element() {
                    let element = element_field(field);
                    self.field_value(&hint, &element, value)?
                } else {
                    self.field_value(&hint, field, value)?
                };
                Ok(op.apply(property, rhs))
            }
            _ => Err(Error::invalid_request(format!(
                "computed field `{}` cannot be filtered",
                field.name
            ))),
        }
    }

    /// `_IN` and `_NOT_IN` over a single-valued field.
    fn membership_filter(
        &mut self,
        property: Expr,
        field: &Field,
        op: ScalarOp,
        hint: &str,
        value: &Value,
    ) -> Result<Expr> {
        let predicate = match &field.ty {
            FieldTy::Temporal(temporal) => {
                // any(item IN $p WHERE this.d = datetime(item))
                let param = self.param(hint, value.clone());
                let item = self.env.variable("item");
                let converted = Expr::func(temporal.kind.function(), [item.clone().into()]);
                Expr::any(&item, param, Expr::eq(property, converted))
            }
            _ => {
                let list_field = field.clone().list();
                let rhs = self.field_value(hint, &list_field, value)?;
                Expr::in_list(property, rhs)
            }
        };

        Ok(if op == ScalarOp::NotIn {
            Expr::not(predicate)
        } else {
            predicate
        })
    }

    /// Equality and distance filters over a point field.
    ///
    /// Distance filters take `{ point: {..}, distance: n }` and compare
    /// `point.distance(field, point($p.point))` against `$p.distance`.
    fn point_filter(
        &mut self,
        property: Expr,
        point: &FieldPoint,
        op: ScalarOp,
        hint: &str,
        value: &Value,
    ) -> Result<Expr> {
        if op.is_distance() {
            let map = input::expect_map(hint, value)?;
            if !map.contains_key("point") || !map.contains_key("distance") {
                return Err(Error::invalid_request(
                    "distance filters take a `point` and a `distance`",
                ));
            }

            let param = self.env.param(hint, value.clone());
            let distance = Expr::func(
                "point.distance",
                [property, Expr::func("point", [param.property("point")])],
            );
            let op = if op == ScalarOp::Distance { ScalarOp::Eq } else { op };
            return Ok(op.apply(distance, param.property("distance")));
        }

        let param = self.param(hint, value.clone());
        let rhs = if point.list && !op.is_element() {
            self.map_list(param, |item| Expr::func("point", [item]))
        } else {
            Expr::func("point", [param])
        };
        Ok(op.apply(property, rhs))
    }

    /// Filters on the opaque global id, decoded to the field it was built
    /// from.
    fn global_id_filter(
        &mut self,
        var: &Variable,
        entity: &Entity,
        op: ScalarOp,
        key: &str,
        value: &Value,
    ) -> Result<Expr> {
        match op {
            ScalarOp::Eq | ScalarOp::Not => {
                let (field, decoded) = decode_global_id(entity, key, value)?;
                self.scalar_filter(var, field, op, key, &decoded)
            }
            ScalarOp::In | ScalarOp::NotIn => {
                let mut field = None;
                let mut decoded = vec![];
                for id in input::expect_list(key, value)? {
                    let (f, value) = decode_global_id(entity, key, id)?;
                    field = Some(f);
                    decoded.push(value);
                }

                match field {
                    Some(field) => self.scalar_filter(var, field, op, key, &Value::List(decoded)),
                    // Matching against an empty id list
                    None => Ok(Expr::from(op == ScalarOp::NotIn)),
                }
            }
            _ => Err(Error::invalid_request(format!(
                "`{key}` is not supported on a global id"
            ))),
        }
    }
}

fn decode_global_id<'e>(entity: &'e Entity, key: &str, id: &Value) -> Result<(&'e Field, Value)> {
    entity.from_global_id(input::expect_str(key, id)?)
}

/// AND or OR over nested conditions. An unrestricted OR branch makes the
/// whole OR hold.
fn junction(key: &str, nested: Vec<Option<Expr>>) -> Option<Expr> {
    if key == "AND" {
        Expr::and_all(nested)
    } else if nested.iter().any(Option::is_none) {
        None
    } else {
        Expr::or_any(nested)
    }
}

/// The single-valued counterpart of a list field, used to bind the operand
/// of `_INCLUDES`.
fn element_field(field: &Field) -> Field {
    let mut element = field.clone();
    match &mut element.ty {
        FieldTy::Primitive(primitive) => primitive.list = false,
        FieldTy::Temporal(temporal) => temporal.list = false,
        FieldTy::Point(point) => point.list = false,
        _ => {}
    }
    element
}
