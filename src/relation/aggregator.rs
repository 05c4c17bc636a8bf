//! Aggregator selection for navigation properties.

use crate::expression::{Aggregator, ValueType};

/// Aggregator reshaping `actual` rows into a value of type `expected`
///
/// `actual` is the projected row sequence. Checked in order:
///
/// 1. `expected` already accepts `actual`: no aggregator
/// 2. `expected` accepts one element: single-or-default
/// 3. queryable target: as-queryable
/// 4. one-dimensional array target: to-array
/// 5. entity-set target: to-entity-set
/// 6. target accepting a list of the row type: to-list
/// 7. container constructed from a sequence: construct
///
/// Anything else gets no aggregator.
#[must_use]
pub fn get_aggregator(expected: &ValueType, actual: &ValueType) -> Option<Aggregator> {
    if expected.is_assignable_from(actual) {
        return None;
    }
    let actual_element = actual.element_type()?;
    if expected.is_assignable_from(actual_element) {
        return Some(Aggregator::SingleOrDefault {
            element: actual_element.clone(),
        });
    }

    let expected_element = expected.element_type()?;
    let cast = expected_element != actual_element
        && (expected_element.is_assignable_from(actual_element)
            || actual_element.is_assignable_from(expected_element));
    let element = expected_element.clone();

    let aggregator = match expected {
        ValueType::Queryable(_) => Aggregator::AsQueryable { element, cast },
        ValueType::Array(_, 1) => Aggregator::ToArray { element, cast },
        ValueType::EntitySet(_) => Aggregator::ToEntitySet { element, cast },
        _ if expected.is_assignable_from(&ValueType::list_of(actual_element.clone())) => {
            Aggregator::ToList { element, cast }
        }
        ValueType::Custom {
            from_sequence: true,
            ..
        } => Aggregator::Construct {
            target: expected.clone(),
        },
        _ => return None,
    };
    Some(aggregator)
}
