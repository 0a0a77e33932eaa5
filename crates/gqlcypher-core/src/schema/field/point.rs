#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPoint {
    /// Cartesian (`x`, `y`, `z`) rather than geographic coordinates
    pub cartesian: bool,
    pub list: bool,
}

impl FieldPoint {
    /// Sub-fields clients may select on a point value.
    pub fn components(&self) -> &'static [&'static str] {
        if self.cartesian {
            &["x", "y", "z", "crs", "srid"]
        } else {
            &["longitude", "latitude", "height", "crs", "srid"]
        }
    }
}
