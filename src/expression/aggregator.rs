//! Shape adapters applied to the rows produced by a projection.

use super::types::ValueType;

/// Reshapes a raw row sequence into the declared target type
///
/// The `cast` flag marks element-type adaptation: the expected element type
/// differs from the projected one but the two are related by assignability,
/// so elements are cast one by one before materialization.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregator {
    /// Reduce the sequence to at most one element
    SingleOrDefault { element: ValueType },
    /// Wrap the sequence as a composable query
    AsQueryable { element: ValueType, cast: bool },
    /// Materialize to a one-dimensional array
    ToArray { element: ValueType, cast: bool },
    /// Materialize to a change-tracked entity set
    ToEntitySet { element: ValueType, cast: bool },
    /// Materialize to a list
    ToList { element: ValueType, cast: bool },
    /// Invoke the target's constructor taking the raw sequence
    Construct { target: ValueType },
}

impl Aggregator {
    /// Type the aggregator produces
    #[must_use]
    pub fn result_type(&self) -> ValueType {
        match self {
            Aggregator::SingleOrDefault { element } => element.clone(),
            Aggregator::AsQueryable { element, .. } => ValueType::queryable_of(element.clone()),
            Aggregator::ToArray { element, .. } => ValueType::array_of(element.clone()),
            Aggregator::ToEntitySet { element, .. } => ValueType::entity_set_of(element.clone()),
            Aggregator::ToList { element, .. } => ValueType::list_of(element.clone()),
            Aggregator::Construct { target } => target.clone(),
        }
    }

    /// Whether the projection yields a single value rather than a sequence
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        matches!(self, Aggregator::SingleOrDefault { .. })
    }
}
