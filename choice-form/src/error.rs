use thiserror::Error;

const CHOICE_ERROR_PREFIX: &str = "Choice field error:";

/// An error that can occur while configuring a choice field or building its
/// choice list.
///
/// All of these are configuration errors: they are raised when the field is
/// constructed (or, for lazily loaded choices, when the choices are first
/// needed) and are not recoverable. Submitting a value that doesn't match any
/// choice is *not* an error; see
/// [`ChoiceField::is_synchronized`](crate::form::fields::ChoiceField::is_synchronized).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChoiceError {
    /// The choices (or the choice loader) have an unsupported shape.
    #[error("{CHOICE_ERROR_PREFIX} invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Two different choices resolved to the same value.
    #[error("{CHOICE_ERROR_PREFIX} the value `{0}` is used by more than one choice")]
    DuplicateValue(String),
    /// Two different choices resolved to the same sub-field name.
    #[error("{CHOICE_ERROR_PREFIX} the name `{0}` is used by more than one choice")]
    DuplicateName(String),
    /// A property path is syntactically invalid.
    #[error("{CHOICE_ERROR_PREFIX} invalid property path `{0}`")]
    InvalidPropertyPath(String),
    /// A property path couldn't be read from a choice.
    #[error("{CHOICE_ERROR_PREFIX} cannot read property `{path}`: {reason}")]
    PropertyNotReadable {
        /// The property path that was read.
        path: String,
        /// Why the property couldn't be read.
        reason: String,
    },
    /// The data set on a field is not one of its choices.
    #[error("{CHOICE_ERROR_PREFIX} the data `{0}` is not one of the available choices")]
    UnknownChoice(String),
    /// A choice loader failed to load the choices.
    #[error("{CHOICE_ERROR_PREFIX} choice loader failed: {0}")]
    Loader(Box<dyn std::error::Error + Send + Sync + 'static>),
    /// A choice couldn't be serialized for property access.
    #[error("{CHOICE_ERROR_PREFIX} could not serialize choice: {0}")]
    Serialization(#[from] serde_json::Error),
    /// A configuration file couldn't be parsed.
    #[error("{CHOICE_ERROR_PREFIX} could not parse configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl ChoiceError {
    /// Creates a new [`ChoiceError::InvalidConfiguration`] error.
    ///
    /// # Examples
    ///
    /// ```
    /// use choice_form::ChoiceError;
    ///
    /// let error = ChoiceError::invalid_configuration("expected a table or an array");
    /// assert!(error.to_string().contains("expected a table or an array"));
    /// ```
    #[must_use]
    pub fn invalid_configuration<T: Into<String>>(message: T) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Wraps an error returned by a [`ChoiceLoader`](crate::choice_list::ChoiceLoader).
    #[must_use]
    pub fn loader<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self::Loader(error.into())
    }

    pub(crate) fn property_not_readable<P: Into<String>, R: Into<String>>(
        path: P,
        reason: R,
    ) -> Self {
        Self::PropertyNotReadable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_configuration_display() {
        let error = ChoiceError::invalid_configuration("expected a table");

        assert_eq!(
            error.to_string(),
            "Choice field error: invalid configuration: expected a table"
        );
    }

    #[test]
    fn property_not_readable_display() {
        let error = ChoiceError::property_not_readable("author.id", "missing key `author`");

        assert_eq!(
            error.to_string(),
            "Choice field error: cannot read property `author.id`: missing key `author`"
        );
    }

    #[test]
    fn loader_error_keeps_source_message() {
        let error = ChoiceError::loader("connection refused");

        assert!(matches!(error, ChoiceError::Loader(_)));
        assert!(error.to_string().contains("connection refused"));
    }

    #[test]
    fn serialization_error_from() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = ChoiceError::from(json_error);

        assert!(matches!(error, ChoiceError::Serialization(_)));
    }
}
