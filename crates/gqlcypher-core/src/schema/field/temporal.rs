#[derive(Debug, Clone, PartialEq)]
pub struct FieldTemporal {
    pub kind: TemporalKind,
    pub list: bool,

    /// Operations on which the field is set to the current time
    pub timestamps: Vec<Timestamp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalKind {
    DateTime,
    LocalDateTime,
    Date,
    Time,
    LocalTime,
    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Create,
    Update,
}

impl FieldTemporal {
    pub fn new(kind: TemporalKind) -> FieldTemporal {
        FieldTemporal {
            kind,
            list: false,
            timestamps: vec![],
        }
    }

    pub fn sets_on(&self, timestamp: Timestamp) -> bool {
        self.timestamps.contains(&timestamp)
    }
}

impl TemporalKind {
    /// The Cypher function that constructs a value of this kind.
    pub fn function(self) -> &'static str {
        match self {
            TemporalKind::DateTime => "datetime",
            TemporalKind::LocalDateTime => "localdatetime",
            TemporalKind::Date => "date",
            TemporalKind::Time => "time",
            TemporalKind::LocalTime => "localtime",
            TemporalKind::Duration => "duration",
        }
    }

    /// `Duration` has no total order and cannot be used with `MIN`/`MAX`.
    pub fn is_ordered(self) -> bool {
        !matches!(self, TemporalKind::Duration)
    }
}
