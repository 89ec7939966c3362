//! Ordering types for OData queries.

use std::fmt;

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Ascending,
    /// Descending order (Z-A, 9-0).
    Descending,
}

impl Direction {
    /// Returns the `$orderby` keyword for this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        }
    }
}

/// Specifies the ordering of query results.
///
/// Keys are unique and keep the position of their first insertion; setting a
/// key again only changes its direction. A key without a direction is
/// rendered bare and left to the server's default ordering.
///
/// # Example
///
/// ```
/// use odata_lib::api::query::{Direction, Order};
///
/// let mut order = Order::desc("revenue").then_asc("name");
/// order.set("createdon", None);
/// assert_eq!(order.to_string(), "revenue desc,name asc,createdon");
///
/// order.set("revenue", Direction::Ascending);
/// assert_eq!(order.to_string(), "revenue asc,name asc,createdon");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Order {
    fields: Vec<(String, Option<Direction>)>,
}

impl Order {
    /// Creates an empty ordering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an ascending order on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new().then_asc(field)
    }

    /// Creates a descending order on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new().then_desc(field)
    }

    /// Adds a secondary ascending order on a field.
    pub fn then_asc(mut self, field: impl Into<String>) -> Self {
        self.set(field, Direction::Ascending);
        self
    }

    /// Adds a secondary descending order on a field.
    pub fn then_desc(mut self, field: impl Into<String>) -> Self {
        self.set(field, Direction::Descending);
        self
    }

    /// Adds `field`, or overwrites its direction if already present.
    pub fn set(&mut self, field: impl Into<String>, direction: impl Into<Option<Direction>>) {
        let field = field.into();
        let direction = direction.into();
        match self.fields.iter_mut().find(|(key, _)| *key == field) {
            Some(entry) => entry.1 = direction,
            None => self.fields.push((field, direction)),
        }
    }

    /// Returns the ordered fields with their directions.
    pub fn fields(&self) -> &[(String, Option<Direction>)] {
        &self.fields
    }

    /// Returns `true` if no field has been added.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Renders the `$orderby` value, e.g. `revenue desc,name asc`.
impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, direction)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(field)?;
            if let Some(direction) = direction {
                write!(f, " {}", direction.as_str())?;
            }
        }
        Ok(())
    }
}
