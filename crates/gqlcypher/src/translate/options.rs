use super::{input, Subject, Translator};
use crate::QueryLimit;

use gqlcypher_core::{
    stmt::{Expr, Orderable, SortDirection, Value, Variable},
    Error, Result,
};

/// Sorting and pagination of a list of nodes.
#[derive(Debug, Default)]
pub(crate) struct Options {
    /// Sort keys by field name, in priority order
    pub(crate) sort: Vec<(String, SortDirection)>,
    pub(crate) skip: Option<Expr>,
    pub(crate) limit: Option<Expr>,
}

impl Options {
    /// Names of the fields the projected map must carry for sorting.
    pub(crate) fn sort_keys(&self) -> Vec<String> {
        self.sort.iter().map(|(key, _)| key.clone()).collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.sort.is_empty() && self.skip.is_none() && self.limit.is_none()
    }

    /// Orders and paginates a clause whose rows hold the projected map as
    /// `alias`.
    pub(crate) fn apply(self, clause: &mut impl Orderable, alias: &Variable) {
        for (key, direction) in self.sort {
            clause.order_by(alias.property(key), direction);
        }
        if let Some(skip) = self.skip {
            clause.skip(skip);
        }
        if let Some(limit) = self.limit {
            clause.limit(limit);
        }
    }
}

impl<'a> Translator<'a> {
    /// Compiles an `options: { sort, limit, offset }` argument. `limit`
    /// applies configured defaults and caps to the requested limit.
    pub(crate) fn options(
        &mut self,
        var: &Variable,
        subject: Subject<'a>,
        value: Option<&Value>,
        limit: Option<QueryLimit>,
    ) -> Result<Options> {
        let mut options = Options::default();
        let map = value.map(|value| input::expect_map("options", value)).transpose()?;
        let arg = |name: &str| {
            map.and_then(|map| map.get(name))
                .filter(|value| !value.is_null())
        };

        if let Some(sort) = arg("sort") {
            for item in input::one_or_many(sort) {
                for (name, direction) in input::expect_map("sort", item)? {
                    options.sort.push(self.sort_key(subject, name, direction)?);
                }
            }
        }

        if let Some(offset) = arg("offset") {
            let offset = non_negative("offset", offset)?;
            options.skip = Some(self.param(&format!("{var}_offset"), offset));
        }

        let requested = arg("limit").map(|limit| non_negative("limit", limit)).transpose()?;
        let limit = match limit {
            Some(limit) => limit.apply(requested),
            None => requested,
        };
        if let Some(limit) = limit {
            options.limit = Some(self.param(&format!("{var}_limit"), limit));
        }

        Ok(options)
    }

    pub(crate) fn sort_key(
        &self,
        subject: Subject<'a>,
        name: &str,
        direction: &Value,
    ) -> Result<(String, SortDirection)> {
        if !subject.find_field(name).is_some_and(|field| field.is_sortable()) {
            return Err(Error::invalid_request(format!(
                "cannot sort `{}` by `{name}`",
                subject.name()
            )));
        }

        let direction = match input::expect_str(name, direction)? {
            "ASC" => SortDirection::Asc,
            "DESC" => SortDirection::Desc,
            other => {
                return Err(Error::invalid_request(format!(
                    "sort direction must be ASC or DESC, got `{other}`"
                )))
            }
        };

        Ok((name.to_string(), direction))
    }
}

fn non_negative(name: &str, value: &Value) -> Result<i64> {
    match input::expect_int(name, value)? {
        n if n < 0 => Err(Error::invalid_request(format!(
            "`{name}` must not be negative"
        ))),
        n => Ok(n),
    }
}
