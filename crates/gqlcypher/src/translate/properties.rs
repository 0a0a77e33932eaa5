use super::{input, Subject, Translator};

use gqlcypher_core::{
    schema::{Field, FieldTy, Timestamp},
    stmt::{Expr, SetItem, Value, Variable},
    Error, Result,
};

use indexmap::IndexMap;

/// Property writes compiled from a create or update input.
#[derive(Debug, Default)]
pub(crate) struct Writes<'a> {
    pub(crate) set: Vec<SetItem>,

    /// Properties removed by an explicit `null`
    pub(crate) remove: Vec<Expr>,

    /// Stored fields present in the input, for field-level rules
    pub(crate) fields: Vec<&'a Field>,
}

/// Update-only suffixes of an input key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    Push,
    Pop,
    Increment,
    Decrement,
}

impl Modifier {
    fn split(key: &str) -> Option<(&str, Modifier)> {
        const SUFFIXES: &[(&str, Modifier)] = &[
            ("_PUSH", Modifier::Push),
            ("_POP", Modifier::Pop),
            ("_INCREMENT", Modifier::Increment),
            ("_DECREMENT", Modifier::Decrement),
        ];

        SUFFIXES.iter().find_map(|(suffix, modifier)| {
            key.strip_suffix(suffix)
                .filter(|name| !name.is_empty())
                .map(|name| (name, *modifier))
        })
    }
}

impl<'a> Translator<'a> {
    /// Compiles the stored-field entries of `input` into writes on `var`.
    /// Relationship entries are left to the caller.
    ///
    /// On create, omitted fields get their autogenerated value or default
    /// and every missing required field is an error. Timestamp fields are
    /// set to the current time on the operations they track.
    pub(crate) fn writes(
        &mut self,
        var: &Variable,
        subject: Subject<'a>,
        input: &IndexMap<String, Value>,
        on: Timestamp,
    ) -> Result<Writes<'a>> {
        self.writes_except(var, subject, input, on, &[])
    }

    /// Like [`Translator::writes`], treating the `preset` fields as already
    /// written.
    pub(crate) fn writes_except(
        &mut self,
        var: &Variable,
        subject: Subject<'a>,
        input: &IndexMap<String, Value>,
        on: Timestamp,
        preset: &[&str],
    ) -> Result<Writes<'a>> {
        let mut writes = Writes::default();

        for (key, value) in input {
            if let Some(field) = subject.find_field(key) {
                if field.is_relationship() {
                    continue;
                }
                self.write(var, subject, field, key, value, on, &mut writes)?;
                continue;
            }

            let modified = Modifier::split(key)
                .filter(|_| on == Timestamp::Update)
                .and_then(|(name, modifier)| Some((subject.find_field(name)?, modifier)));
            let Some((field, modifier)) = modified else {
                return Err(Error::invalid_request(format!(
                    "unknown input field `{key}` on `{}`",
                    subject.name()
                )));
            };

            self.check_settable(subject, field)?;
            let set = self.modify(var, field, key, modifier, value)?;
            writes.set.extend(set);
            writes.fields.push(field);
        }

        for field in subject.fields() {
            if input.contains_key(&field.name) || preset.contains(&field.name.as_str()) {
                continue;
            }
            let property = var.property(field.property_name());

            match &field.ty {
                FieldTy::Temporal(temporal) if temporal.sets_on(on) => {
                    writes
                        .set
                        .push(SetItem::new(property, Expr::func(temporal.kind.function(), [])));
                }
                FieldTy::Primitive(primitive) if on == Timestamp::Create => {
                    if primitive.autogenerate {
                        writes
                            .set
                            .push(SetItem::new(property, Expr::func("randomUUID", [])));
                    } else if let Some(default) = &primitive.default {
                        let value = self.param(&format!("{var}_{}", field.name), default.clone());
                        writes.set.push(SetItem::new(property, value));
                    } else if field.required {
                        return Err(missing(subject, field));
                    }
                }
                FieldTy::Temporal(temporal)
                    if on == Timestamp::Create && field.required && temporal.timestamps.is_empty() =>
                {
                    return Err(missing(subject, field));
                }
                FieldTy::Point(_) if on == Timestamp::Create && field.required => {
                    return Err(missing(subject, field));
                }
                _ => {}
            }
        }

        Ok(writes)
    }

    #[allow(clippy::too_many_arguments)]
    fn write(
        &mut self,
        var: &Variable,
        subject: Subject<'a>,
        field: &'a Field,
        key: &str,
        value: &Value,
        on: Timestamp,
        writes: &mut Writes<'a>,
    ) -> Result<()> {
        if !field.is_stored() {
            return Err(Error::invalid_request(format!(
                "`{key}` on `{}` cannot be written",
                subject.name()
            )));
        }
        self.check_settable(subject, field)?;
        writes.fields.push(field);

        let property = var.property(field.property_name());
        if value.is_null() {
            if field.required {
                return Err(Error::invalid_request(format!(
                    "`{key}` on `{}` cannot be null",
                    subject.name()
                )));
            }
            if on == Timestamp::Update {
                writes.remove.push(property);
            }
            return Ok(());
        }

        let value = self.field_value(&format!("{var}_{key}"), field, value)?;
        writes.set.push(SetItem::new(property, value));
        Ok(())
    }

    fn check_settable(&self, subject: Subject<'a>, field: &Field) -> Result<()> {
        if field.settable {
            return Ok(());
        }
        Err(Error::invalid_request(format!(
            "`{}` on `{}` cannot be set",
            field.name,
            subject.name()
        )))
    }

    /// `_PUSH`, `_POP`, `_INCREMENT` and `_DECREMENT`.
    fn modify(
        &mut self,
        var: &Variable,
        field: &Field,
        key: &str,
        modifier: Modifier,
        value: &Value,
    ) -> Result<Option<SetItem>> {
        let property = var.property(field.property_name());
        let hint = format!("{var}_{key}");

        let numeric = matches!(
            &field.ty,
            FieldTy::Primitive(primitive) if !primitive.list && primitive.scalar.is_numeric()
        );

        let updated = match modifier {
            Modifier::Push if field.is_list() => {
                let pushed = self.field_value(&hint, field, value)?;
                Expr::add(property.clone(), pushed)
            }
            Modifier::Pop if field.is_list() => match input::expect_int(key, value)? {
                0 => return Ok(None),
                n if n < 0 => {
                    return Err(Error::invalid_request(format!(
                        "`{key}` must not be negative"
                    )))
                }
                n => {
                    let end = self.param(&hint, -n);
                    Expr::slice(property.clone(), Some(Expr::from(0)), Some(end))
                }
            },
            Modifier::Increment | Modifier::Decrement if numeric => {
                let amount = self.field_value(&hint, field, value)?;
                match modifier {
                    Modifier::Increment => Expr::add(property.clone(), amount),
                    _ => Expr::sub(property.clone(), amount),
                }
            }
            _ => {
                return Err(Error::invalid_request(format!(
                    "`{key}` does not apply to `{}`",
                    field.name
                )))
            }
        };

        Ok(Some(SetItem::new(property, updated)))
    }
}

fn missing(subject: Subject<'_>, field: &Field) -> Error {
    Error::invalid_request(format!(
        "`{}` on `{}` is required",
        field.name,
        subject.name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_modifiers() {
        assert_eq!(Modifier::split("tags_PUSH"), Some(("tags", Modifier::Push)));
        assert_eq!(Modifier::split("views_INCREMENT"), Some(("views", Modifier::Increment)));
        assert_eq!(Modifier::split("_POP"), None);
        assert_eq!(Modifier::split("title"), None);
    }
}
