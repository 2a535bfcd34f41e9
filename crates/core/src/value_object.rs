//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Forecasts, inventory readings and purchase orders are created once and
/// never mutated afterwards; a "change" is always a new value. Two values
/// with the same attributes are interchangeable.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
