//! Bindable property storage with a Set-Flag.

use super::Bindable;
use crate::coerce::FromValue;
use crate::error::{Result, RowBindError};
use crate::types::Value;

/// What the data source did for a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldState<T> {
    /// The source never supplied the field.
    NotRetrieved,
    /// The source supplied an explicit null.
    Null,
    /// The source supplied a value.
    Value(T),
}

impl<T> Default for FieldState<T> {
    fn default() -> Self {
        FieldState::NotRetrieved
    }
}

/// A bindable property: an optional value plus whether it was ever assigned.
///
/// Reading a field that was never assigned is an error, distinct from
/// reading an explicit null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field<T> {
    state: FieldState<T>,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field {
            state: FieldState::default(),
        }
    }
}

impl<T> Field<T> {
    /// Returns true once any value (including null) has been assigned.
    #[must_use]
    pub fn is_set(&self) -> bool {
        !matches!(self.state, FieldState::NotRetrieved)
    }

    /// Returns the raw state.
    #[must_use]
    pub fn state(&self) -> &FieldState<T> {
        &self.state
    }

    /// Reads the field.
    ///
    /// # Errors
    ///
    /// Returns [`RowBindError::ValueNotRetrieved`] if the field was never set.
    pub fn get(&self, type_name: &'static str, property: &'static str) -> Result<Option<&T>> {
        match &self.state {
            FieldState::NotRetrieved => Err(RowBindError::ValueNotRetrieved {
                type_name,
                property,
            }),
            FieldState::Null => Ok(None),
            FieldState::Value(v) => Ok(Some(v)),
        }
    }

    /// Reads the field as property `property` of target type `O`.
    ///
    /// Named accessors on the target type are the intended callers:
    ///
    /// ```ignore
    /// pub fn name(&self) -> Result<Option<&String>> {
    ///     self.name.read::<Self>("name")
    /// }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`RowBindError::ValueNotRetrieved`] if the field was never set.
    ///
    /// # Panics
    ///
    /// In debug builds, reading an unset field under a property name `O` does
    /// not declare panics, so a misspelled accessor fails in tests.
    pub fn read<O: Bindable>(&self, property: &'static str) -> Result<Option<&T>> {
        if !self.is_set() {
            debug_assert!(
                O::properties().iter().any(|p| p.name() == property),
                "{} declares no property '{property}'",
                O::TYPE_NAME
            );
        }
        self.get(O::TYPE_NAME, property)
    }

    /// Returns the value if one was supplied, treating unset like null.
    ///
    /// For emptiness checks; callers reading data use [`Field::get`].
    #[must_use]
    pub fn as_option(&self) -> Option<&T> {
        match &self.state {
            FieldState::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Assigns a value or null. Marks the field as set.
    pub fn set(&mut self, value: Option<T>) {
        self.state = match value {
            Some(v) => FieldState::Value(v),
            None => FieldState::Null,
        };
    }

    /// Assigns a value. Marks the field as set.
    pub fn set_value(&mut self, value: T) {
        self.state = FieldState::Value(value);
    }

    /// Takes the value out, leaving the field unset.
    pub fn take(&mut self) -> FieldState<T> {
        std::mem::take(&mut self.state)
    }
}

impl<T: FromValue> Field<T> {
    /// Assigns a coerced column value.
    ///
    /// # Errors
    ///
    /// Returns [`RowBindError::TypeError`] if the value does not fit `T`. The
    /// field is left unchanged in that case.
    pub fn assign(&mut self, value: Value) -> Result<()> {
        let native = if value.is_null() {
            None
        } else {
            Some(T::from_value(value)?)
        };
        self.set(native);
        Ok(())
    }
}
