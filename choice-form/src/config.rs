//! Declarative configuration for choice fields.
//!
//! A [`ChoiceFieldConfig`] describes a choice field whose choices are plain
//! data, typically read from a TOML file. The choices are kept as
//! [`serde_json::Value`]s, so property paths can be used to pick values and
//! labels out of structured choices.
//!
//! # Examples
//!
//! ```
//! use choice_form::config::ChoiceFieldConfig;
//!
//! let config = ChoiceFieldConfig::from_toml(
//!     r#"
//!     name = "author"
//!     required = false
//!     placeholder = "Choose an author"
//!
//!     [choices]
//!     Bernhard = "a"
//!     Fabien = "b"
//!     "#,
//! )?;
//!
//! let mut field = config.into_field()?;
//! field.submit("b")?;
//! assert!(field.is_synchronized());
//! # Ok::<(), choice_form::ChoiceError>(())
//! ```

use derive_builder::Builder;
use serde::Deserialize;
use serde_json::Value;

use crate::choice_list::{
    ChoiceLabelResolver, ChoiceNameResolver, ChoiceSource, ChoiceValueResolver, PreferredChoices,
};
use crate::form::FormFieldOptions;
use crate::form::fields::{ChoiceField, ChoiceFieldOptions, ChoiceTranslationDomain, Placeholder};

/// The configuration of a choice field.
///
/// This is all the configuration of a choice field that can be expressed in
/// a TOML configuration file.
#[derive(Debug, Clone, PartialEq, Builder, Deserialize)]
#[builder(build_fn(skip, error = std::convert::Infallible))]
#[serde(default)]
pub struct ChoiceFieldConfig {
    /// The name of the field.
    #[builder(setter(into))]
    pub name: String,
    /// The HTML ID of the field. Defaults to the name.
    #[builder(setter(into, strip_option))]
    pub id: Option<String>,
    /// Whether the field is required.
    ///
    /// Default: `true`
    pub required: bool,
    /// Whether more than one choice can be selected.
    pub multiple: bool,
    /// Whether the field has one sub-field per choice.
    pub expanded: bool,
    /// The placeholder: `false` or a string.
    #[builder(setter(into))]
    pub placeholder: Placeholder,
    /// The choices: a table mapping labels to choices (nested tables and
    /// arrays are groups) or an array of choices.
    pub choices: Value,
    /// The values of the choices shown first.
    pub preferred_choices: Vec<String>,
    /// A property path to read choice values from.
    #[builder(setter(into, strip_option))]
    pub choice_value: Option<String>,
    /// A property path to read choice labels from.
    #[builder(setter(into, strip_option))]
    pub choice_label: Option<String>,
    /// A property path to read sub-field names from.
    #[builder(setter(into, strip_option))]
    pub choice_name: Option<String>,
    /// The translation domain of the field.
    #[builder(setter(into, strip_option))]
    pub translation_domain: Option<String>,
    /// The translation domain for choice labels: a boolean or a string.
    #[builder(setter(into))]
    pub choice_translation_domain: ChoiceTranslationDomain,
}

impl ChoiceFieldConfig {
    /// Create a new [`ChoiceFieldConfigBuilder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use choice_form::config::ChoiceFieldConfig;
    ///
    /// let config = ChoiceFieldConfig::builder().name("author").multiple(true).build();
    /// assert!(config.required);
    /// ```
    #[must_use]
    pub fn builder() -> ChoiceFieldConfigBuilder {
        ChoiceFieldConfigBuilder::default()
    }

    /// Create a new [`ChoiceFieldConfig`] from a TOML string.
    ///
    /// # Errors
    ///
    /// This function will return an error if the TOML fails to parse as a
    /// [`ChoiceFieldConfig`].
    ///
    /// # Examples
    ///
    /// ```
    /// use choice_form::config::ChoiceFieldConfig;
    ///
    /// let config = ChoiceFieldConfig::from_toml(r#"
    ///     name = "tags"
    ///     multiple = true
    ///     choices = ["rust", "web"]
    /// "#)?;
    /// assert!(config.multiple);
    /// # Ok::<_, choice_form::ChoiceError>(())
    /// ```
    pub fn from_toml(toml_content: &str) -> crate::Result<ChoiceFieldConfig> {
        let config: ChoiceFieldConfig = toml::from_str(toml_content)?;
        Ok(config)
    }

    /// Creates the field described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the choices are neither a table nor an array, or if
    /// the choice list can't be built.
    pub fn into_field(self) -> crate::Result<ChoiceField<Value>> {
        let options = FormFieldOptions {
            id: self.id.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            required: self.required,
            translation_domain: self.translation_domain,
        };
        let preferred_choices = if self.preferred_choices.is_empty() {
            PreferredChoices::None
        } else {
            PreferredChoices::Values(self.preferred_choices)
        };
        let custom_options = ChoiceFieldOptions {
            source: ChoiceSource::from_json(self.choices)?,
            multiple: self.multiple,
            expanded: self.expanded,
            placeholder: self.placeholder,
            preferred_choices,
            choice_value: self.choice_value.map(ChoiceValueResolver::property),
            choice_label: self.choice_label.map(ChoiceLabelResolver::property),
            choice_name: self.choice_name.map(ChoiceNameResolver::property),
            choice_translation_domain: self.choice_translation_domain,
        };

        ChoiceField::new(options, custom_options)
    }
}

impl Default for ChoiceFieldConfig {
    fn default() -> Self {
        ChoiceFieldConfig::builder().build()
    }
}

impl ChoiceFieldConfigBuilder {
    /// Builds the choice field configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use choice_form::config::ChoiceFieldConfig;
    ///
    /// let config = ChoiceFieldConfig::builder().build();
    /// assert_eq!(config.choices, serde_json::json!([]));
    /// ```
    #[must_use]
    pub fn build(&self) -> ChoiceFieldConfig {
        ChoiceFieldConfig {
            name: self.name.clone().unwrap_or_default(),
            id: self.id.clone().flatten(),
            required: self.required.unwrap_or(true),
            multiple: self.multiple.unwrap_or(false),
            expanded: self.expanded.unwrap_or(false),
            placeholder: self.placeholder.clone().unwrap_or_default(),
            choices: self
                .choices
                .clone()
                .unwrap_or_else(|| Value::Array(Vec::new())),
            preferred_choices: self.preferred_choices.clone().unwrap_or_default(),
            choice_value: self.choice_value.clone().flatten(),
            choice_label: self.choice_label.clone().flatten(),
            choice_name: self.choice_name.clone().flatten(),
            translation_domain: self.translation_domain.clone().flatten(),
            choice_translation_domain: self
                .choice_translation_domain
                .clone()
                .unwrap_or_default(),
        }
    }
}
