use thiserror::Error;

use crate::api::Transform;
use crate::matcher::OffsetValue;
use crate::model::{Action, Nargs, Value};

/// The failure to capture a single Cli token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidCapture {
    /// The token does not convert (via [`std::str::FromStr`]) into the expected type.
    #[error("cannot convert '{token}' to {type_name}.")]
    InvalidConversion {
        /// The offending token.
        token: String,
        /// The name of the expected type.
        type_name: &'static str,
    },
    /// The token was rejected by a custom [`Transform`].
    #[error("invalid value '{token}': {message}.")]
    InvalidValue {
        /// The offending token.
        token: String,
        /// The reason for the rejection.
        message: String,
    },
}

/// Folds the occurrences of one parameter into its result slot.
#[derive(Debug, Clone)]
pub(crate) struct Capture {
    nargs: Nargs,
    action: Action,
    transform: Transform,
}

impl Capture {
    pub(crate) fn new(nargs: Nargs, action: Action, transform: Transform) -> Self {
        Self {
            nargs,
            action,
            transform,
        }
    }

    /// Capture a single occurrence into the slot.
    /// Each token is transformed individually; the first failure is reported with its offset.
    pub(crate) fn capture(
        &self,
        slot: &mut Option<Value>,
        values: &[OffsetValue],
    ) -> Result<(), (usize, InvalidCapture)> {
        let mut converted = Vec::with_capacity(values.len());

        for (offset, token) in values {
            converted.push(
                self.transform
                    .apply(token)
                    .map_err(|error| (*offset, error))?,
            );
        }

        let occurrence = if !self.action.takes_values() {
            None
        } else if self.nargs.is_single() {
            converted.pop()
        } else {
            Some(Value::List(converted))
        };

        self.action.accumulate(slot, occurrence);
        Ok(())
    }
}
