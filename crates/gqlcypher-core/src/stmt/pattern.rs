use super::{Expr, Variable};

/// A path pattern: a start node followed by zero or more
/// relationship/node steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub start: NodePattern,
    pub steps: Vec<PatternStep>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternStep {
    pub relationship: RelationshipPattern,
    pub node: NodePattern,
}

/// `(variable:Label { key: expr })`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePattern {
    pub variable: Option<Variable>,
    pub labels: Vec<String>,
    pub properties: Vec<(String, Expr)>,
}

/// `-[variable:TYPE { key: expr }]->`
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipPattern {
    pub variable: Option<Variable>,
    pub rel_type: Option<String>,
    pub direction: Direction,
    pub properties: Vec<(String, Expr)>,
}

/// Arrow direction, read left to right.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    /// `-->`
    Outgoing,
    /// `<--`
    Incoming,
    /// `--`
    Undirected,
}

impl Pattern {
    pub fn node(start: NodePattern) -> Pattern {
        Pattern {
            start,
            steps: vec![],
        }
    }

    pub fn related(mut self, relationship: RelationshipPattern, node: NodePattern) -> Pattern {
        self.steps.push(PatternStep { relationship, node });
        self
    }

    /// Every variable the pattern binds, in text order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.start.variable.iter().chain(self.steps.iter().flat_map(|step| {
            step.relationship
                .variable
                .iter()
                .chain(step.node.variable.iter())
        }))
    }
}

impl NodePattern {
    pub fn new(variable: &Variable) -> NodePattern {
        NodePattern {
            variable: Some(variable.clone()),
            ..NodePattern::default()
        }
    }

    pub fn anonymous() -> NodePattern {
        NodePattern::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> NodePattern {
        self.labels.push(label.into());
        self
    }

    pub fn labels(mut self, labels: impl IntoIterator<Item = String>) -> NodePattern {
        self.labels.extend(labels);
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<Expr>) -> NodePattern {
        self.properties.push((key.into(), value.into()));
        self
    }
}

impl RelationshipPattern {
    pub fn new(direction: Direction) -> RelationshipPattern {
        RelationshipPattern {
            variable: None,
            rel_type: None,
            direction,
            properties: vec![],
        }
    }

    pub fn variable(mut self, variable: &Variable) -> RelationshipPattern {
        self.variable = Some(variable.clone());
        self
    }

    pub fn rel_type(mut self, rel_type: impl Into<String>) -> RelationshipPattern {
        self.rel_type = Some(rel_type.into());
        self
    }
}

impl From<NodePattern> for Pattern {
    fn from(value: NodePattern) -> Self {
        Pattern::node(value)
    }
}
