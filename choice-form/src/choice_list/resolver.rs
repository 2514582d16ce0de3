//! Strategies for deriving the value, label and sub-field name of a choice.
//!
//! Each strategy is picked once, when the field is configured, and applied
//! exactly once per choice when the [`ChoiceList`](super::ChoiceList) is
//! built.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use derive_more::Display;
use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::ChoiceError;
use crate::choice_list::ChoiceData;

/// A dot-separated path to a property of a choice, such as `id` or
/// `author.name`.
///
/// Numeric segments index into sequences (`tags.0`). The path is read from
/// the serialized form of the choice, so any [`Serialize`] type can be
/// accessed this way.
///
/// # Examples
///
/// ```
/// use choice_form::choice_list::PropertyPath;
///
/// let path = PropertyPath::from("author.name");
/// assert_eq!(path.as_str(), "author.name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct PropertyPath(String);

impl PropertyPath {
    /// Creates a new property path.
    ///
    /// The path is validated when it's first used to build a choice list.
    #[must_use]
    pub fn new<T: Into<String>>(path: T) -> Self {
        Self(path.into())
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn segments(&self) -> Result<Vec<&str>, ChoiceError> {
        let segments: Vec<&str> = self.0.split('.').collect();
        if segments.iter().any(|segment| segment.trim().is_empty()) {
            return Err(ChoiceError::InvalidPropertyPath(self.0.clone()));
        }
        Ok(segments)
    }

    /// Reads the property from a choice.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is invalid, if the choice can't be
    /// serialized, or if the property doesn't exist.
    pub fn read<T: Serialize>(&self, choice: &T) -> Result<Value, ChoiceError> {
        let segments = self.segments()?;
        let mut current = serde_json::to_value(choice)?;

        for segment in segments {
            current = match current {
                Value::Object(mut map) => map.remove(segment),
                Value::Array(mut items) => segment
                    .parse::<usize>()
                    .ok()
                    .filter(|index| *index < items.len())
                    .map(|index| items.swap_remove(index)),
                _ => None,
            }
            .ok_or_else(|| {
                ChoiceError::property_not_readable(
                    self.as_str(),
                    format!("no property `{segment}`"),
                )
            })?;
        }

        Ok(current)
    }

    fn read_value<T: Serialize>(&self, choice: &T) -> Result<String, ChoiceError> {
        match self.read(choice)? {
            Value::Null => Ok(String::new()),
            value => scalar_to_string(&value).ok_or_else(|| self.not_scalar()),
        }
    }

    fn read_label<T: Serialize>(&self, choice: &T) -> Result<Option<String>, ChoiceError> {
        match self.read(choice)? {
            Value::Null => Ok(None),
            value => scalar_to_string(&value)
                .map(Some)
                .ok_or_else(|| self.not_scalar()),
        }
    }

    fn not_scalar(&self) -> ChoiceError {
        ChoiceError::property_not_readable(self.as_str(), "the property is not a scalar")
    }
}

impl From<&str> for PropertyPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for PropertyPath {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

/// Casts a scalar JSON value to the string used on the wire.
///
/// Booleans cast to `"1"` and `"0"`, which is what checkboxes submit.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(string) => Some(string.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(true) => Some("1".to_owned()),
        Value::Bool(false) => Some("0".to_owned()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// What a label or name callback knows about the choice it is called for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceContext<'a> {
    /// The position of the choice in the flattened choice list.
    pub index: usize,
    /// The label the choice was declared with, if any.
    pub key: Option<&'a str>,
    /// The resolved value of the choice.
    pub value: &'a str,
}

type ValueFn<T> = dyn Fn(&T) -> String + Send + Sync;
type LabelFn<T> = dyn Fn(&T, &ChoiceContext<'_>) -> Option<String> + Send + Sync;
type NameFn<T> = dyn Fn(&T, &ChoiceContext<'_>) -> String + Send + Sync;

/// How the value of each choice is derived.
///
/// When no resolver is configured, each choice is cast to a string if all
/// choices are scalars with distinct string forms; otherwise the position of
/// the choice in the flattened list is used.
pub enum ChoiceValueResolver<T> {
    /// Read the value from a property of the choice.
    Property(PropertyPath),
    /// Compute the value with a callback.
    Callback(Arc<ValueFn<T>>),
    /// Use the position of the choice in the flattened list.
    Index,
}

impl<T> ChoiceValueResolver<T> {
    /// Creates a resolver that reads a property of the choice.
    ///
    /// # Examples
    ///
    /// ```
    /// use choice_form::choice_list::ChoiceValueResolver;
    ///
    /// let resolver = ChoiceValueResolver::<serde_json::Value>::property("id");
    /// ```
    #[must_use]
    pub fn property<P: Into<PropertyPath>>(path: P) -> Self {
        Self::Property(path.into())
    }

    /// Creates a resolver from a callback.
    ///
    /// # Examples
    ///
    /// ```
    /// use choice_form::choice_list::ChoiceValueResolver;
    ///
    /// let resolver = ChoiceValueResolver::callback(|choice: &u32| format!("id-{choice}"));
    /// ```
    #[must_use]
    pub fn callback<F>(callback: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(callback))
    }
}

impl<T> Clone for ChoiceValueResolver<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Property(path) => Self::Property(path.clone()),
            Self::Callback(callback) => Self::Callback(Arc::clone(callback)),
            Self::Index => Self::Index,
        }
    }
}

impl<T> Debug for ChoiceValueResolver<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Property(path) => f.debug_tuple("Property").field(path).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
            Self::Index => f.write_str("Index"),
        }
    }
}

/// How the label of each choice is derived.
///
/// When no resolver is configured, the label a choice was declared with is
/// used, falling back to its position in the flattened list.
pub enum ChoiceLabelResolver<T> {
    /// Read the label from a property of the choice. A `null` property
    /// suppresses the label.
    Property(PropertyPath),
    /// Compute the label with a callback. Returning `None` suppresses the
    /// label.
    Callback(Arc<LabelFn<T>>),
}

impl<T> ChoiceLabelResolver<T> {
    /// Creates a resolver that reads a property of the choice.
    #[must_use]
    pub fn property<P: Into<PropertyPath>>(path: P) -> Self {
        Self::Property(path.into())
    }

    /// Creates a resolver from a callback.
    ///
    /// # Examples
    ///
    /// ```
    /// use choice_form::choice_list::ChoiceLabelResolver;
    ///
    /// let resolver =
    ///     ChoiceLabelResolver::callback(|choice: &&str, _context| Some(choice.to_uppercase()));
    /// ```
    #[must_use]
    pub fn callback<F>(callback: F) -> Self
    where
        F: Fn(&T, &ChoiceContext<'_>) -> Option<String> + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(callback))
    }
}

impl<T> Clone for ChoiceLabelResolver<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Property(path) => Self::Property(path.clone()),
            Self::Callback(callback) => Self::Callback(Arc::clone(callback)),
        }
    }
}

impl<T> Debug for ChoiceLabelResolver<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Property(path) => f.debug_tuple("Property").field(path).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// How the sub-field name of each choice is derived when the field is
/// expanded.
///
/// Defaults to the position of the choice in the flattened list.
pub enum ChoiceNameResolver<T> {
    /// Read the name from a property of the choice.
    Property(PropertyPath),
    /// Compute the name with a callback.
    Callback(Arc<NameFn<T>>),
    /// Use the position of the choice in the flattened list.
    Index,
}

impl<T> ChoiceNameResolver<T> {
    /// Creates a resolver that reads a property of the choice.
    #[must_use]
    pub fn property<P: Into<PropertyPath>>(path: P) -> Self {
        Self::Property(path.into())
    }

    /// Creates a resolver from a callback.
    #[must_use]
    pub fn callback<F>(callback: F) -> Self
    where
        F: Fn(&T, &ChoiceContext<'_>) -> String + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(callback))
    }
}

impl<T> Clone for ChoiceNameResolver<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Property(path) => Self::Property(path.clone()),
            Self::Callback(callback) => Self::Callback(Arc::clone(callback)),
            Self::Index => Self::Index,
        }
    }
}

impl<T> Debug for ChoiceNameResolver<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Property(path) => f.debug_tuple("Property").field(path).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
            Self::Index => f.write_str("Index"),
        }
    }
}

/// The set of resolvers a choice list is built with.
pub struct ChoiceResolvers<T> {
    /// The value resolver, or `None` for the default.
    pub value: Option<ChoiceValueResolver<T>>,
    /// The label resolver, or `None` for the default.
    pub label: Option<ChoiceLabelResolver<T>>,
    /// The sub-field name resolver, or `None` for the default.
    pub name: Option<ChoiceNameResolver<T>>,
}

impl<T> Default for ChoiceResolvers<T> {
    fn default() -> Self {
        Self {
            value: None,
            label: None,
            name: None,
        }
    }
}

impl<T> Clone for ChoiceResolvers<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            label: self.label.clone(),
            name: self.name.clone(),
        }
    }
}

impl<T> Debug for ChoiceResolvers<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChoiceResolvers")
            .field("value", &self.value)
            .field("label", &self.label)
            .field("name", &self.name)
            .finish()
    }
}

impl<T: ChoiceData> ChoiceResolvers<T> {
    /// Computes the values of the given (flattened) choices.
    pub(crate) fn resolve_values(&self, choices: &[&T]) -> Result<Vec<String>, ChoiceError> {
        match &self.value {
            None => cast_or_index(choices),
            Some(ChoiceValueResolver::Index) => Ok(index_values(choices.len())),
            Some(ChoiceValueResolver::Property(path)) => choices
                .iter()
                .map(|choice| path.read_value(*choice))
                .collect(),
            Some(ChoiceValueResolver::Callback(callback)) => {
                Ok(choices.iter().map(|choice| callback(choice)).collect())
            }
        }
    }

    pub(crate) fn resolve_label(
        &self,
        choice: &T,
        context: &ChoiceContext<'_>,
    ) -> Result<Option<String>, ChoiceError> {
        match &self.label {
            None => Ok(Some(
                context
                    .key
                    .map_or_else(|| context.index.to_string(), str::to_owned),
            )),
            Some(ChoiceLabelResolver::Property(path)) => path.read_label(choice),
            Some(ChoiceLabelResolver::Callback(callback)) => Ok(callback(choice, context)),
        }
    }

    pub(crate) fn resolve_name(
        &self,
        choice: &T,
        context: &ChoiceContext<'_>,
    ) -> Result<String, ChoiceError> {
        match &self.name {
            None | Some(ChoiceNameResolver::Index) => Ok(context.index.to_string()),
            Some(ChoiceNameResolver::Property(path)) => path.read_value(choice),
            Some(ChoiceNameResolver::Callback(callback)) => Ok(callback(choice, context)),
        }
    }
}

fn index_values(len: usize) -> Vec<String> {
    (0..len).map(|index| index.to_string()).collect()
}

fn cast_or_index<T: Serialize>(choices: &[&T]) -> Result<Vec<String>, ChoiceError> {
    let mut seen = IndexSet::with_capacity(choices.len());

    for choice in choices {
        let cast = scalar_to_string(&serde_json::to_value(choice)?);
        match cast {
            Some(value) if !seen.contains(&value) => {
                seen.insert(value);
            }
            _ => {
                debug!(
                    choices = choices.len(),
                    "Choices cannot be cast to unique strings, using positional values"
                );
                return Ok(index_values(choices.len()));
            }
        }
    }

    Ok(seen.into_iter().collect())
}
