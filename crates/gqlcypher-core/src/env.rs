use crate::stmt::{Param, Value, Variable};

use indexmap::IndexMap;
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

/// Allocates variable and parameter names for one compiled request.
///
/// Names are derived from a caller-supplied hint so the rendered statement
/// stays readable: the first allocation for `this_actors` is `this_actors`,
/// later ones are `this_actors0`, `this_actors1`, and so on. Variables and
/// parameters live in separate namespaces because parameters are always
/// rendered with a `$` prefix.
///
/// Parameter values are stored here rather than in the AST. Binding the
/// same hint to an equal value twice within one scope returns the existing
/// parameter instead of a new one.
#[derive(Debug, Default)]
pub struct Environment {
    variables: Names,
    params: Names,

    /// Bound parameter values, in allocation order
    values: IndexMap<Arc<str>, Value>,

    /// Parameters bound per (scope, hint), for reuse of equal values
    bound: HashMap<(usize, String), Vec<Param>>,

    /// Stack of active scope ids, innermost last
    scopes: Vec<usize>,
    next_scope: usize,
}

#[derive(Debug, Default)]
struct Names {
    allocated: HashSet<Arc<str>>,
    counters: HashMap<String, usize>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment::default()
    }

    /// Allocates a fresh variable.
    pub fn variable(&mut self, hint: &str) -> Variable {
        Variable::new(self.variables.allocate(hint))
    }

    /// Binds `value` to a parameter named after `hint`.
    pub fn param(&mut self, hint: &str, value: impl Into<Value>) -> Param {
        let value = value.into();
        let key = (self.current_scope(), sanitize(hint));

        if let Some(existing) = self.bound.get(&key).and_then(|params| {
            params
                .iter()
                .find(|param| self.values.get(param.name()) == Some(&value))
        }) {
            return existing.clone();
        }

        let name = self.params.allocate(&key.1);
        self.values.insert(name.clone(), value);

        let param = Param::new(name);
        self.bound.entry(key).or_default().push(param.clone());
        param
    }

    /// The value bound to `param`, if it was allocated by this environment.
    pub fn param_value(&self, param: &Param) -> Option<&Value> {
        self.values.get(param.name())
    }

    /// Every bound parameter, in allocation order.
    ///
    /// This includes parameters that were allocated but never placed in the
    /// final statement; the renderer only emits the referenced ones.
    pub fn params(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (&**k, v))
    }

    pub fn is_variable_allocated(&self, name: &str) -> bool {
        self.variables.allocated.contains(name)
    }

    /// Opens a parameter scope. Parameters bound inside a scope are never
    /// reused outside it.
    pub fn push_scope(&mut self) {
        self.next_scope += 1;
        self.scopes.push(self.next_scope);
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn current_scope(&self) -> usize {
        self.scopes.last().copied().unwrap_or(0)
    }
}

impl Names {
    fn allocate(&mut self, hint: &str) -> Arc<str> {
        let base = sanitize(hint);

        if !self.allocated.contains(base.as_str()) {
            let name: Arc<str> = base.into();
            self.allocated.insert(name.clone());
            return name;
        }

        let counter = self.counters.entry(base.clone()).or_insert(0);
        loop {
            let candidate = format!("{base}{counter}");
            *counter += 1;

            if !self.allocated.contains(candidate.as_str()) {
                let name: Arc<str> = candidate.into();
                self.allocated.insert(name.clone());
                return name;
            }
        }
    }
}

/// Maps a hint onto identifier characters so every allocated name renders
/// without escaping.
fn sanitize(hint: &str) -> String {
    let mut name: String = hint
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    match name.chars().next() {
        None => name.push_str("var"),
        Some(c) if c.is_ascii_digit() => name.insert(0, '_'),
        _ => {}
    }

    name
}
