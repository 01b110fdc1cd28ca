use thiserror::Error;

use crate::models::{FieldUpdate, FormState};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter your city/location.")]
    EmptyLocation,
}

impl FormState {
    /// Applies a single field edit. Enum fields arrive already restricted to
    /// their offered choices, so no validation happens here.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Occasion(v) => self.occasion = v,
            FieldUpdate::Location(v) => self.location = v,
            FieldUpdate::Weather(v) => self.weather = v,
            FieldUpdate::Gender(v) => self.gender = v,
        }
    }

    /// Restores the default tuple (Wedding, "", Hot, Female). Idempotent.
    pub fn reset(&mut self) {
        *self = FormState::default();
    }

    /// A submission needs a location; everything else always holds a valid
    /// choice. Whitespace-only input counts as empty.
    pub fn validate_for_submit(&self) -> Result<(), FormError> {
        if self.location.trim().is_empty() {
            return Err(FormError::EmptyLocation);
        }
        Ok(())
    }
}
