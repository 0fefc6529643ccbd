use std::rc::Rc;
use std::str::FromStr;

use crate::api::capture::InvalidCapture;
use crate::model::Value;

type Convert = dyn Fn(&str) -> Result<Value, InvalidCapture>;

/// Converts a single Cli token into a [`Value`].
///
/// A transform is applied to each token individually, before the token is accumulated by the parameter's [`Action`](crate::Action).
/// It is never applied to an assembled list.
///
/// ### Example
/// ```
/// # use argfold_builder as argfold;
/// use argfold::Transform;
///
/// let transform = Transform::parse::<u32>();
/// # let _ = transform;
/// let characters = Transform::characters();
/// # let _ = characters;
/// ```
#[derive(Clone)]
pub struct Transform {
    name: String,
    convert: Rc<Convert>,
}

impl Transform {
    /// Keep the token as-is, as [`Value::Text`].
    /// This is the default transform of every parameter.
    pub fn identity() -> Self {
        Self {
            name: "identity".to_string(),
            convert: Rc::new(|token: &str| Ok(Value::from(token))),
        }
    }

    /// Split the token into its characters, as a [`Value::List`] of single character [`Value::Text`].
    /// For example, `"ab"` becomes `["a", "b"]`.
    pub fn characters() -> Self {
        Self {
            name: "characters".to_string(),
            convert: Rc::new(|token: &str| {
                Ok(Value::List(token.chars().map(Value::from).collect()))
            }),
        }
    }

    /// Convert the token via [`std::str::FromStr`] for `T`.
    pub fn parse<T>() -> Self
    where
        T: FromStr + Into<Value> + 'static,
    {
        Self {
            name: std::any::type_name::<T>().to_string(),
            convert: Rc::new(|token: &str| {
                T::from_str(token)
                    .map(Into::into)
                    .map_err(|_| InvalidCapture::InvalidConversion {
                        token: token.to_string(),
                        type_name: std::any::type_name::<T>(),
                    })
            }),
        }
    }

    /// Convert the token with a custom function.
    /// An `Err(message)` rejects the token.
    ///
    /// ### Example
    /// ```
    /// # use argfold_builder as argfold;
    /// use argfold::{Transform, Value};
    ///
    /// let upper = Transform::new("upper", |token| {
    ///     if token.is_empty() {
    ///         Err("must not be empty".to_string())
    ///     } else {
    ///         Ok(Value::from(token.to_uppercase()))
    ///     }
    /// });
    /// # let _ = upper;
    /// ```
    pub fn new(
        name: impl Into<String>,
        convert: impl Fn(&str) -> Result<Value, String> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            convert: Rc::new(move |token: &str| {
                convert(token).map_err(|message| InvalidCapture::InvalidValue {
                    token: token.to_string(),
                    message,
                })
            }),
        }
    }

    pub(crate) fn apply(&self, token: &str) -> Result<Value, InvalidCapture> {
        (self.convert)(token)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::identity()
    }
}

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Transform[{}]", self.name)
    }
}
