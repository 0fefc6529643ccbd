use thiserror::Error;

use crate::matcher::api::*;

/// The tokens matched by a single occurrence of an argument/option.
#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) struct MatchTokens {
    pub name: String,
    pub values: Vec<OffsetValue>,
}

/// An occurrence closed with a value count outside of its bound.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum CountError {
    #[error("'{name}' received {provided} value(s), but needs at least {minimum}.")]
    Short {
        name: String,
        provided: usize,
        minimum: u8,
    },

    #[error("'{name}' received {provided} value(s), but takes at most {maximum}.")]
    Excess {
        name: String,
        provided: usize,
        maximum: u8,
    },
}

impl Bound {
    fn minimum(&self) -> u8 {
        match self {
            Bound::Range(minimum, _) | Bound::Lower(minimum) => *minimum,
        }
    }

    fn maximum(&self) -> Option<u8> {
        match self {
            Bound::Range(_, maximum) => Some(*maximum),
            Bound::Lower(_) => None,
        }
    }
}

/// Collects the values of the occurrence currently being matched.
#[derive(Debug)]
pub(crate) struct OccurrenceBuffer {
    name: String,
    bound: Bound,
    values: Vec<OffsetValue>,
}

impl OccurrenceBuffer {
    pub(crate) fn new(name: impl Into<String>, bound: Bound) -> Self {
        Self {
            name: name.into(),
            bound,
            values: Vec::default(),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn push(&mut self, offset: usize, value: String) {
        self.values.push((offset, value));
    }

    /// Whether the occurrence can take another value.
    pub(crate) fn is_open(&self) -> bool {
        self.bound
            .maximum()
            .map_or(true, |maximum| self.values.len() < maximum as usize)
    }

    pub(crate) fn close(self) -> Result<MatchTokens, CountError> {
        let provided = self.values.len();
        let minimum = self.bound.minimum();

        if provided < minimum as usize {
            return Err(CountError::Short {
                name: self.name,
                provided,
                minimum,
            });
        }

        if let Some(maximum) = self.bound.maximum() {
            if provided > maximum as usize {
                return Err(CountError::Excess {
                    name: self.name,
                    provided,
                    maximum,
                });
            }
        }

        Ok(MatchTokens {
            name: self.name,
            values: self.values,
        })
    }
}
