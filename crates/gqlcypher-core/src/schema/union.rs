/// A closed set of entity types.
#[derive(Debug, Clone)]
pub struct Union {
    pub name: String,

    /// Member entities, in declaration order
    pub members: Vec<String>,
}

impl Union {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Union
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Union {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}
