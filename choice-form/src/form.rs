//! The parts of a form binding that a choice field needs.
//!
//! A form field sits between three representations of the same data:
//!
//! * the **raw input** ([`RawInput`]) as it arrives from the transport,
//! * the **view data** ([`ViewData`]) that is rendered back to the user,
//! * the **model data** ([`FieldData`]) the application works with.
//!
//! Fields are configured with [`FormFieldOptions`] and rendered in the context
//! of a [`ParentView`].
//!
//! ```
//! use choice_form::form::{FormFieldOptions, ParentView, RawInput};
//!
//! let options = FormFieldOptions {
//!     required: false,
//!     ..FormFieldOptions::new("author")
//! };
//! assert_eq!(options.id, "author");
//!
//! let parent = ParentView::new("article");
//! assert_eq!(parent.child_name("author"), "article[author]");
//!
//! assert_eq!(RawInput::from("a"), RawInput::Text("a".to_owned()));
//! ```

/// Built-in form fields.
pub mod fields;

use std::borrow::Cow;

use thiserror::Error;

/// An error that can occur when validating a form field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormFieldValidationError {
    /// The submitted value is not one of the available choices.
    #[error("The selected choice is invalid.")]
    InvalidValue(String),
    /// A single value was submitted where a list was expected.
    #[error("Expected a list of values.")]
    ExpectedList,
    /// A list was submitted where a single value was expected.
    #[error("Expected a single value.")]
    ExpectedScalar,
    /// Custom error with given message.
    #[error("{0}")]
    Custom(Cow<'static, str>),
}

impl FormFieldValidationError {
    /// Creates a new `FormFieldValidationError` for an invalid value of a
    /// field.
    #[must_use]
    pub fn invalid_value<T: Into<String>>(value: T) -> Self {
        Self::InvalidValue(value.into())
    }

    /// Creates a new `FormFieldValidationError` from a `String`.
    #[must_use]
    pub const fn from_string(message: String) -> Self {
        Self::Custom(Cow::Owned(message))
    }

    /// Creates a new `FormFieldValidationError` from a static string.
    #[must_use]
    pub const fn from_static(message: &'static str) -> Self {
        Self::Custom(Cow::Borrowed(message))
    }
}

/// Generic options valid for all types of form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFieldOptions {
    /// The HTML ID of the form field.
    pub id: String,
    /// The name of the form field.
    pub name: String,
    /// Whether the field is required.
    pub required: bool,
    /// The translation domain of the field, inherited from the parent when
    /// `None`.
    pub translation_domain: Option<String>,
}

impl FormFieldOptions {
    /// Creates options for a required field whose ID is the same as its name.
    #[must_use]
    pub fn new<N: Into<String>>(name: N) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            required: true,
            translation_domain: None,
        }
    }
}

/// The context a field is rendered in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentView {
    /// The full name of the parent, e.g. `article` or `article[author]`.
    pub full_name: String,
    /// The translation domain of the parent.
    pub translation_domain: Option<String>,
}

impl ParentView {
    /// Creates a parent view without a translation domain.
    #[must_use]
    pub fn new<N: Into<String>>(full_name: N) -> Self {
        Self {
            full_name: full_name.into(),
            translation_domain: None,
        }
    }

    /// Sets the translation domain of the parent.
    #[must_use]
    pub fn with_translation_domain<D: Into<String>>(mut self, domain: D) -> Self {
        self.translation_domain = Some(domain.into());
        self
    }

    /// Returns the full name of a child with the given name.
    #[must_use]
    pub fn child_name(&self, name: &str) -> String {
        format!("{}[{name}]", self.full_name)
    }
}

/// The translation domain passed to the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TranslationDomain {
    /// Use the default translation domain.
    #[default]
    Default,
    /// Don't translate.
    Disabled,
    /// Use the given translation domain.
    Named(String),
}

/// Input submitted for a field, as it arrives from the transport.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RawInput {
    /// Nothing was submitted.
    #[default]
    Null,
    /// An explicit `false` was submitted.
    False,
    /// A single value.
    Text(String),
    /// A list of values.
    List(Vec<String>),
}

impl From<&str> for RawInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RawInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for RawInput {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for RawInput {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for RawInput {
    fn from(values: [&str; N]) -> Self {
        Self::List(values.into_iter().map(str::to_owned).collect())
    }
}

impl From<bool> for RawInput {
    fn from(value: bool) -> Self {
        if value {
            Self::Text("1".to_owned())
        } else {
            Self::False
        }
    }
}

impl<T: Into<RawInput>> From<Option<T>> for RawInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// The data of a field as presented to the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewData {
    /// No view data.
    #[default]
    Empty,
    /// A single value.
    Text(String),
    /// A list of values.
    List(Vec<String>),
}

impl ViewData {
    /// Returns the single value, if there is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Empty | Self::List(_) => None,
        }
    }

    /// Returns the list of values, if there is one.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(values) => Some(values),
            Self::Empty | Self::Text(_) => None,
        }
    }
}

/// The model data of a choice field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldData<T> {
    /// The data of a single-choice field.
    Single(T),
    /// The data of a multiple-choice field.
    Multiple(Vec<T>),
}

impl<T> FieldData<T> {
    /// Returns the selected choice of a single-choice field.
    #[must_use]
    pub fn as_single(&self) -> Option<&T> {
        match self {
            Self::Single(choice) => Some(choice),
            Self::Multiple(_) => None,
        }
    }

    /// Returns the selected choices of a multiple-choice field.
    #[must_use]
    pub fn as_multiple(&self) -> Option<&[T]> {
        match self {
            Self::Single(_) => None,
            Self::Multiple(choices) => Some(choices),
        }
    }

    /// Converts into the selected choice of a single-choice field.
    #[must_use]
    pub fn into_single(self) -> Option<T> {
        match self {
            Self::Single(choice) => Some(choice),
            Self::Multiple(_) => None,
        }
    }

    /// Converts into the selected choices of a multiple-choice field.
    #[must_use]
    pub fn into_multiple(self) -> Option<Vec<T>> {
        match self {
            Self::Single(_) => None,
            Self::Multiple(choices) => Some(choices),
        }
    }
}
