use std::collections::BTreeMap;

/// The cardinality of inputs to match for an argument/option.
///
/// Inspired by argparse: <https://docs.python.org/3/library/argparse.html#nargs>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nargs {
    /// `N`: Precisely `N` values.
    Precisely(u8),
    /// `*`: May be any number of values, including `0`.
    Any,
    /// `+`: At least one value must be specified.
    AtLeastOne,
}

impl Nargs {
    /// Whether a single occurrence produces a single value (rather than a list of values).
    pub(crate) fn is_single(&self) -> bool {
        matches!(self, Nargs::Precisely(1))
    }
}

impl std::fmt::Display for Nargs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// How the occurrences of a parameter fold into its final value.
///
/// The accumulation starts from an absent value and is applied once per occurrence, in the order the occurrences appear on the Cli.
///
/// | Action        | Nargs          | `--x a --x b`   | `--x a b --x c`        |
/// |---------------|----------------|-----------------|------------------------|
/// | `Replace`     | 1 / `+`        | `"b"`           | `["c"]`                |
/// | `Append`      | 1 / `+`        | `["a", "b"]`    | `[["a", "b"], ["c"]]`  |
/// | `Extend`      | 1 / `+`        | `["a", "b"]`    | `["a", "b", "c"]`      |
/// | `Constant(v)` | 0              | `v`             | -                      |
/// | `Count`       | 0              | `2`             | -                      |
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Each occurrence replaces the previous value.
    Replace,
    /// Each occurrence's value is pushed as a single element onto a list.
    /// Multi-value occurrences therefore nest.
    Append,
    /// Each occurrence's value is flattened (one level) onto a list.
    Extend,
    /// Each occurrence stores the constant; for value-less options (switches).
    Constant(Value),
    /// Counts the occurrences; for value-less options (ex: `-vvv`).
    Count,
}

impl Action {
    /// Whether this action stores values taken from the Cli tokens.
    pub(crate) fn takes_values(&self) -> bool {
        match self {
            Action::Replace | Action::Append | Action::Extend => true,
            Action::Constant(_) | Action::Count => false,
        }
    }

    /// Fold a single occurrence into the slot.
    pub(crate) fn accumulate(&self, slot: &mut Option<Value>, occurrence: Option<Value>) {
        match self {
            Action::Replace => {
                if let Some(value) = occurrence {
                    slot.replace(value);
                }
            }
            Action::Append => {
                if let Some(value) = occurrence {
                    list_slot(slot).push(value);
                }
            }
            Action::Extend => {
                if let Some(value) = occurrence {
                    let items = list_slot(slot);
                    match value {
                        Value::List(values) => items.extend(values),
                        value => items.push(value),
                    }
                }
            }
            Action::Constant(constant) => {
                slot.replace(constant.clone());
            }
            Action::Count => {
                let count = match slot {
                    Some(Value::Integer(count)) => *count + 1,
                    _ => 1,
                };
                slot.replace(Value::Integer(count));
            }
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Replace => write!(f, "Replace"),
            Action::Append => write!(f, "Append"),
            Action::Extend => write!(f, "Extend"),
            Action::Constant(value) => write!(f, "Constant({value})"),
            Action::Count => write!(f, "Count"),
        }
    }
}

fn list_slot(slot: &mut Option<Value>) -> &mut Vec<Value> {
    // A non-list value (ex: from a prior Replace) is discarded.
    if !matches!(slot, Some(Value::List(_))) {
        slot.replace(Value::List(Vec::default()));
    }

    match slot {
        Some(Value::List(items)) => items,
        _ => unreachable!("internal error - slot must hold a list"),
    }
}

/// A parsed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A text value; the default for all Cli tokens.
    Text(String),
    /// An integer value.
    Integer(i64),
    /// A floating point value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A list of values (possibly nested).
    List(Vec<Value>),
}

impl Value {
    /// Get the text of a `Value::Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Get the integer of a `Value::Integer`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(integer) => Some(*integer),
            _ => None,
        }
    }

    /// Get the float of a `Value::Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(float) => Some(*float),
            _ => None,
        }
    }

    /// Get the boolean of a `Value::Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(boolean) => Some(*boolean),
            _ => None,
        }
    }

    /// Get the items of a `Value::List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(text) => write!(f, "{text}"),
            Value::Integer(integer) => write!(f, "{integer}"),
            Value::Float(float) => write!(f, "{float}"),
            Value::Bool(boolean) => write!(f, "{boolean}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

macro_rules! integer_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Integer(value.into())
                }
            }
        )*
    };
}

integer_value!(i8, i16, i32, i64, u8, u16, u32);

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

/// The values of a successful parse, keyed by parameter name.
///
/// Parameters which did not occur (and have no default) are absent.
/// For sub-command parsers, the selected sub-command is stored under the [`crate::Condition`] name, and the values of the sub-command sit alongside those of the root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseResult {
    values: BTreeMap<String, Value>,
    selector: Option<String>,
}

impl ParseResult {
    pub(crate) fn new(values: BTreeMap<String, Value>) -> Self {
        Self {
            values,
            selector: None,
        }
    }

    /// Record the sub-command `variant` under the condition `name`.
    pub(crate) fn select(&mut self, name: impl Into<String>, variant: impl Into<String>) {
        let variant = variant.into();
        self.values
            .insert(name.into(), Value::Text(variant.clone()));
        self.selector.replace(variant);
    }

    /// Merge the values of a sub-command parse, overriding any of the same name.
    pub(crate) fn merge(&mut self, other: ParseResult) {
        self.values.extend(other.values);
    }

    /// Get the value of the parameter `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether the parameter `name` has a value.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Get the value of the parameter `name`, when it is a `Value::Text`.
    ///
    /// ### Example
    /// ```
    /// # use argfold_builder as argfold;
    /// use argfold::{CommandLineParser, Parameter};
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::option("name", Some('n')))
    ///     .build();
    ///
    /// let result = parser.parse_tokens(&["-n", "abc"]).unwrap();
    /// assert_eq!(result.text("name"), Some("abc"));
    /// assert_eq!(result.text("other"), None);
    /// ```
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    /// Get the items of the parameter `name`, when it is a `Value::List`.
    pub fn list(&self, name: &str) -> Option<&[Value]> {
        self.get(name).and_then(Value::as_list)
    }

    /// The selected sub-command, if any.
    pub fn command(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    /// Iterate the parameter names and values, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// The number of parameters with a value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameter has a value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
