//! The choice field.
//!
//! A [`ChoiceField`] lets the user pick one or more values out of a
//! [`ChoiceList`]. It can be rendered collapsed (a single `<select>`) or
//! expanded (one radio button or checkbox per choice).
//!
//! ```
//! use choice_form::choice_list::ChoiceSource;
//! use choice_form::form::fields::{ChoiceField, ChoiceFieldOptionsBuilder};
//! use choice_form::form::{FieldData, FormFieldOptions};
//!
//! let mut field = ChoiceField::new(
//!     FormFieldOptions::new("author"),
//!     ChoiceFieldOptionsBuilder::default()
//!         .source(ChoiceSource::labeled([("Bernhard", "a"), ("Fabien", "b")]))
//!         .build(),
//! )?;
//!
//! field.submit("b")?;
//!
//! assert!(field.is_synchronized());
//! assert_eq!(field.data(), Some(&FieldData::Single("b")));
//! # Ok::<(), choice_form::ChoiceError>(())
//! ```

mod expanded;
mod reconcile;

use derive_builder::Builder;
pub use expanded::{ChoiceInput, ChoiceInputKind, PLACEHOLDER_NAME};
use expanded::ExpansionBuilder;
use indexmap::IndexMap;
use reconcile::{Reconciliation, SubmissionReconciler};
pub use reconcile::SubmissionState;
use serde::Deserialize;
use serde::de::{self, Deserializer, Visitor};
use tracing::debug;

use crate::ChoiceError;
use crate::choice_list::{
    ChoiceData, ChoiceLabelResolver, ChoiceList, ChoiceListView, ChoiceNameResolver,
    ChoiceResolvers, ChoiceSource, ChoiceValueResolver, ChoiceView, ChoiceViewNode,
    LazyChoiceList, PreferredChoices, find_in, is_selected,
};
use crate::form::{
    FieldData, FormFieldOptions, FormFieldValidationError, ParentView, RawInput,
    TranslationDomain, ViewData,
};

/// The `placeholder` option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Placeholder {
    /// Not configured: fields that are not required get an empty placeholder.
    #[default]
    Auto,
    /// Explicitly unset: no placeholder.
    Unset,
    /// Explicitly disabled: no placeholder.
    Disabled,
    /// A placeholder with the given text.
    Text(String),
}

impl Placeholder {
    /// Resolves the placeholder for a field with the given settings.
    ///
    /// Multiple-choice fields never have a placeholder. An empty placeholder
    /// of an expanded field is displayed as `"None"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use choice_form::form::fields::Placeholder;
    ///
    /// assert_eq!(Placeholder::Auto.resolve(false, false, true), None);
    /// assert_eq!(Placeholder::Auto.resolve(false, false, false), Some(String::new()));
    /// assert_eq!(Placeholder::Auto.resolve(false, true, false), Some("None".to_owned()));
    /// assert_eq!(Placeholder::from("Choose").resolve(true, false, false), None);
    /// ```
    #[must_use]
    pub fn resolve(&self, multiple: bool, expanded: bool, required: bool) -> Option<String> {
        if multiple {
            return None;
        }

        let text = match self {
            Self::Unset | Self::Disabled => return None,
            Self::Auto if required => return None,
            Self::Auto => "",
            Self::Text(text) => text.as_str(),
        };

        if expanded && text.is_empty() {
            Some("None".to_owned())
        } else {
            Some(text.to_owned())
        }
    }
}

impl From<&str> for Placeholder {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Placeholder {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl<'de> Deserialize<'de> for Placeholder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PlaceholderVisitor;

        impl Visitor<'_> for PlaceholderVisitor {
            type Value = Placeholder;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("`false` or a string")
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<Placeholder, E> {
                if value {
                    Err(E::invalid_value(de::Unexpected::Bool(true), &self))
                } else {
                    Ok(Placeholder::Disabled)
                }
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Placeholder, E> {
                Ok(Placeholder::from(value))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Placeholder, E> {
                Ok(Placeholder::Unset)
            }

            fn visit_none<E: de::Error>(self) -> Result<Placeholder, E> {
                Ok(Placeholder::Unset)
            }
        }

        deserializer.deserialize_any(PlaceholderVisitor)
    }
}

/// The `choice_translation_domain` option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChoiceTranslationDomain {
    /// Use the translation domain of the field.
    #[default]
    Inherit,
    /// Don't translate choice labels.
    Disabled,
    /// Use the given translation domain.
    Domain(String),
}

impl From<&str> for ChoiceTranslationDomain {
    fn from(domain: &str) -> Self {
        Self::Domain(domain.to_owned())
    }
}

impl From<String> for ChoiceTranslationDomain {
    fn from(domain: String) -> Self {
        Self::Domain(domain)
    }
}

impl<'de> Deserialize<'de> for ChoiceTranslationDomain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DomainVisitor;

        impl Visitor<'_> for DomainVisitor {
            type Value = ChoiceTranslationDomain;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("a boolean or a string")
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<ChoiceTranslationDomain, E> {
                Ok(if value {
                    ChoiceTranslationDomain::Inherit
                } else {
                    ChoiceTranslationDomain::Disabled
                })
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<ChoiceTranslationDomain, E> {
                Ok(ChoiceTranslationDomain::from(value))
            }
        }

        deserializer.deserialize_any(DomainVisitor)
    }
}

/// Custom options for a [`ChoiceField`].
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(skip, error = std::convert::Infallible))]
pub struct ChoiceFieldOptions<T> {
    /// The choices of the field.
    #[builder(setter(into))]
    pub source: ChoiceSource<T>,
    /// Whether more than one choice can be selected.
    pub multiple: bool,
    /// Whether the field is rendered as one sub-field per choice.
    pub expanded: bool,
    /// The placeholder of a single-choice field.
    #[builder(setter(into))]
    pub placeholder: Placeholder,
    /// The choices shown first.
    pub preferred_choices: PreferredChoices<T>,
    /// How choice values are derived.
    #[builder(setter(strip_option))]
    pub choice_value: Option<ChoiceValueResolver<T>>,
    /// How choice labels are derived.
    #[builder(setter(strip_option))]
    pub choice_label: Option<ChoiceLabelResolver<T>>,
    /// How sub-field names are derived.
    #[builder(setter(strip_option))]
    pub choice_name: Option<ChoiceNameResolver<T>>,
    /// The translation domain for choice labels.
    #[builder(setter(into))]
    pub choice_translation_domain: ChoiceTranslationDomain,
}

impl<T: Clone> ChoiceFieldOptionsBuilder<T> {
    /// Builds the options, using defaults for everything that wasn't set.
    #[must_use]
    pub fn build(&self) -> ChoiceFieldOptions<T> {
        ChoiceFieldOptions {
            source: self.source.clone().unwrap_or_default(),
            multiple: self.multiple.unwrap_or(false),
            expanded: self.expanded.unwrap_or(false),
            placeholder: self.placeholder.clone().unwrap_or_default(),
            preferred_choices: self.preferred_choices.clone().unwrap_or_default(),
            choice_value: self.choice_value.clone().flatten(),
            choice_label: self.choice_label.clone().flatten(),
            choice_name: self.choice_name.clone().flatten(),
            choice_translation_domain: self
                .choice_translation_domain
                .clone()
                .unwrap_or_default(),
        }
    }
}

impl<T: Clone> ChoiceFieldOptions<T> {
    /// Create a new [`ChoiceFieldOptionsBuilder`].
    #[must_use]
    pub fn builder() -> ChoiceFieldOptionsBuilder<T> {
        ChoiceFieldOptionsBuilder::default()
    }
}

impl<T: Clone> Default for ChoiceFieldOptions<T> {
    fn default() -> Self {
        ChoiceFieldOptionsBuilder::default().build()
    }
}

/// A form field that selects one or more choices.
#[derive(Debug)]
pub struct ChoiceField<T> {
    options: FormFieldOptions,
    multiple: bool,
    expanded: bool,
    placeholder: Option<String>,
    preferred_choices: PreferredChoices<T>,
    choice_translation_domain: ChoiceTranslationDomain,
    choices: LazyChoiceList<T>,
    children: Vec<ChoiceInput>,
    state: SubmissionState,
    data: Option<FieldData<T>>,
    view_data: ViewData,
    synchronization_error: Option<FormFieldValidationError>,
    extra_data: IndexMap<String, String>,
}

impl<T: ChoiceData> ChoiceField<T> {
    /// Creates a new choice field.
    ///
    /// Choices given as entries are resolved right away. Choices provided by a
    /// loader are loaded when first needed, except for expanded fields, which
    /// need all choices to create their sub-fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the choice list can't be built.
    pub fn new(
        options: FormFieldOptions,
        custom_options: ChoiceFieldOptions<T>,
    ) -> Result<Self, ChoiceError> {
        let ChoiceFieldOptions {
            source,
            multiple,
            expanded,
            placeholder,
            preferred_choices,
            choice_value,
            choice_label,
            choice_name,
            choice_translation_domain,
        } = custom_options;

        let resolvers = ChoiceResolvers {
            value: choice_value,
            label: choice_label,
            name: choice_name,
        };
        let choices = LazyChoiceList::new(source, resolvers)?;
        let placeholder = placeholder.resolve(multiple, expanded, options.required);

        let children = if expanded {
            let list = choices.get()?;
            let placeholder_child = placeholder
                .as_deref()
                .filter(|_| !options.required && !list.has_empty_value());
            ExpansionBuilder {
                multiple,
                required: options.required,
                placeholder: placeholder_child,
            }
            .build(list)?
        } else {
            Vec::new()
        };

        debug!(
            name = %options.name,
            multiple,
            expanded,
            children = children.len(),
            "Choice field created"
        );

        let mut field = Self {
            options,
            multiple,
            expanded,
            placeholder,
            preferred_choices,
            choice_translation_domain,
            choices,
            children,
            state: SubmissionState::Unsubmitted,
            data: None,
            view_data: ViewData::Empty,
            synchronization_error: None,
            extra_data: IndexMap::new(),
        };
        field.view_data = field.empty_view_data();
        field.check_children(&[], true);

        Ok(field)
    }

    /// Sets the initial model data and returns the field.
    ///
    /// # Errors
    ///
    /// See [`set_data`](Self::set_data).
    pub fn with_data(mut self, data: FieldData<T>) -> Result<Self, ChoiceError> {
        self.set_data(Some(data))?;
        Ok(self)
    }

    /// Sets the initial model data.
    ///
    /// # Errors
    ///
    /// Returns [`ChoiceError::UnknownChoice`] if the data is not one of the
    /// choices, and [`ChoiceError::InvalidConfiguration`] if the cardinality
    /// of the data doesn't match the field.
    pub fn set_data(&mut self, data: Option<FieldData<T>>) -> Result<(), ChoiceError> {
        let view_data = match &data {
            None => self.empty_view_data(),
            Some(FieldData::Single(choice)) if !self.multiple => {
                let value = self
                    .choices
                    .values_for_choices(std::slice::from_ref(choice))?
                    .pop()
                    .ok_or_else(|| ChoiceError::UnknownChoice(format!("{choice:?}")))?;
                ViewData::Text(value)
            }
            Some(FieldData::Multiple(choices)) if self.multiple => {
                let values = self.choices.values_for_choices(choices)?;
                if values.len() != choices.len() {
                    return Err(ChoiceError::UnknownChoice(format!("{choices:?}")));
                }
                ViewData::List(values)
            }
            Some(FieldData::Single(_)) => {
                return Err(ChoiceError::invalid_configuration(
                    "a multiple-choice field expects a list of choices",
                ));
            }
            Some(FieldData::Multiple(_)) => {
                return Err(ChoiceError::invalid_configuration(
                    "a single-choice field expects a single choice",
                ));
            }
        };

        let selected = match &view_data {
            ViewData::Empty => Vec::new(),
            ViewData::Text(value) => vec![value.clone()],
            ViewData::List(values) => values.clone(),
        };
        self.check_children(&selected, data.is_none());
        self.data = data;
        self.view_data = view_data;

        Ok(())
    }

    /// Submits raw input to the field.
    ///
    /// Input that doesn't match the choices is not an error: the field is
    /// marked as not synchronized instead (see
    /// [`is_synchronized`](Self::is_synchronized)).
    ///
    /// # Errors
    ///
    /// Returns an error if the choices need to be loaded and loading fails.
    pub fn submit<R: Into<RawInput>>(&mut self, input: R) -> Result<(), ChoiceError> {
        let outcome =
            SubmissionReconciler::new(&self.choices, self.multiple, self.expanded)
                .reconcile(input.into())?;
        self.extra_data.clear();
        self.apply(outcome);

        Ok(())
    }

    /// Submits input to the sub-fields of an expanded field.
    ///
    /// `input` maps sub-field names to submitted values; a sub-field is
    /// checked if its name is present. The checked sub-fields are combined
    /// into a single submission for the field. Names that don't belong to any
    /// sub-field are kept as [extra data](Self::extra_data).
    ///
    /// # Errors
    ///
    /// Returns an error if the choices need to be loaded and loading fails.
    pub fn submit_children<I, K, V>(&mut self, input: I) -> Result<(), ChoiceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut submitted: IndexMap<String, String> = input
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();

        let mut values = Vec::new();
        for child in &self.children {
            if submitted.shift_remove(child.name()).is_some() && !child.is_placeholder() {
                values.push(child.value().to_owned());
            }
        }

        let raw = if self.multiple {
            RawInput::List(values)
        } else {
            values
                .into_iter()
                .next()
                .map_or(RawInput::Null, RawInput::Text)
        };
        self.submit(raw)?;

        if !submitted.is_empty() {
            debug!(
                name = %self.options.name,
                extra = submitted.len(),
                "Extra data submitted to a choice field"
            );
        }
        self.extra_data = submitted;

        Ok(())
    }

    fn apply(&mut self, outcome: Reconciliation<T>) {
        self.check_children(&outcome.selected, outcome.chose_nothing);
        self.state = if outcome.error.is_none() {
            SubmissionState::Synchronized
        } else {
            SubmissionState::NotSynchronized
        };
        debug!(name = %self.options.name, state = ?self.state, "Choice field submitted");

        self.data = outcome.data;
        self.view_data = outcome.view_data;
        self.synchronization_error = outcome.error;
    }

    fn check_children(&mut self, selected: &[String], chose_nothing: bool) {
        for child in &mut self.children {
            let checked = if child.is_placeholder() {
                chose_nothing
            } else {
                selected.iter().any(|value| value == child.value())
            };
            child.set_checked(checked);
        }
    }

    fn empty_view_data(&self) -> ViewData {
        if self.multiple {
            ViewData::List(Vec::new())
        } else if self.expanded {
            ViewData::Empty
        } else {
            ViewData::Text(String::new())
        }
    }

    /// Returns the choice list, loading it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the choices need to be loaded and loading fails.
    pub fn choice_list(&self) -> Result<&ChoiceList<T>, ChoiceError> {
        self.choices.get()
    }

    /// Creates the view of the field.
    ///
    /// # Errors
    ///
    /// Returns an error if the choices need to be loaded and loading fails.
    pub fn create_view(
        &self,
        parent: Option<&ParentView>,
    ) -> Result<ChoiceFieldView<'_, T>, ChoiceError> {
        let list = self.choices.get()?;
        let ChoiceListView {
            choices,
            preferred_choices,
        } = ChoiceListView::build(list, &self.preferred_choices);
        let placeholder_in_choices = list.has_empty_value();

        let mut full_name = parent.map_or_else(
            || self.options.name.clone(),
            |parent| parent.child_name(&self.options.name),
        );
        if self.multiple && !self.expanded {
            full_name.push_str("[]");
        }

        let translation_domain = self
            .options
            .translation_domain
            .clone()
            .or_else(|| parent.and_then(|parent| parent.translation_domain.clone()));
        let choice_translation_domain = match &self.choice_translation_domain {
            ChoiceTranslationDomain::Inherit => translation_domain
                .clone()
                .map_or(TranslationDomain::Default, TranslationDomain::Named),
            ChoiceTranslationDomain::Disabled => TranslationDomain::Disabled,
            ChoiceTranslationDomain::Domain(domain) => TranslationDomain::Named(domain.clone()),
        };

        Ok(ChoiceFieldView {
            id: self.options.id.clone(),
            name: self.options.name.clone(),
            full_name,
            choices,
            preferred_choices,
            placeholder: if placeholder_in_choices {
                None
            } else {
                self.placeholder.clone()
            },
            placeholder_in_choices,
            multiple: self.multiple,
            expanded: self.expanded,
            required: self.options.required,
            translation_domain,
            choice_translation_domain,
            value: self.view_data.clone(),
            is_selected,
            children: &self.children,
        })
    }
}

impl<T> ChoiceField<T> {
    /// Returns the options of the field.
    #[must_use]
    pub fn options(&self) -> &FormFieldOptions {
        &self.options
    }

    /// Whether more than one choice can be selected.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Whether the field has one sub-field per choice.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// The resolved placeholder, before checking it against the choices.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// The model data.
    #[must_use]
    pub fn data(&self) -> Option<&FieldData<T>> {
        self.data.as_ref()
    }

    /// The view data.
    #[must_use]
    pub fn view_data(&self) -> &ViewData {
        &self.view_data
    }

    /// The submission state.
    #[must_use]
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Whether input has been submitted.
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.state != SubmissionState::Unsubmitted
    }

    /// Whether the submitted input could be mapped to model data.
    ///
    /// A field that hasn't been submitted is synchronized.
    #[must_use]
    pub fn is_synchronized(&self) -> bool {
        self.state != SubmissionState::NotSynchronized
    }

    /// Why the submitted input couldn't be mapped to model data.
    #[must_use]
    pub fn synchronization_error(&self) -> Option<&FormFieldValidationError> {
        self.synchronization_error.as_ref()
    }

    /// Submitted sub-field names that don't belong to any sub-field.
    #[must_use]
    pub fn extra_data(&self) -> &IndexMap<String, String> {
        &self.extra_data
    }

    /// The sub-fields of an expanded field.
    #[must_use]
    pub fn children(&self) -> &[ChoiceInput] {
        &self.children
    }

    /// Returns the sub-field with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&ChoiceInput> {
        self.children.iter().find(|child| child.name() == name)
    }

    /// Whether a sub-field with the given name exists.
    #[must_use]
    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    /// The number of sub-fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the field has no sub-fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// The variables a [`ChoiceField`] passes to the view layer.
#[derive(Debug, Clone)]
pub struct ChoiceFieldView<'a, T> {
    /// The HTML ID of the field.
    pub id: String,
    /// The name of the field.
    pub name: String,
    /// The full name of the field, including its parents. Collapsed
    /// multiple-choice fields end with `[]`.
    pub full_name: String,
    /// The choices that are not preferred.
    pub choices: Vec<ChoiceViewNode<'a, T>>,
    /// The preferred choices.
    pub preferred_choices: Vec<ChoiceViewNode<'a, T>>,
    /// The placeholder, unless one of the choices has the empty value.
    pub placeholder: Option<String>,
    /// Whether one of the choices has the empty value.
    pub placeholder_in_choices: bool,
    /// Whether more than one choice can be selected.
    pub multiple: bool,
    /// Whether the field has one sub-field per choice.
    pub expanded: bool,
    /// Whether the field is required.
    pub required: bool,
    /// The translation domain of the field.
    pub translation_domain: Option<String>,
    /// The translation domain for choice labels.
    pub choice_translation_domain: TranslationDomain,
    /// The view data.
    pub value: ViewData,
    /// Checks if a choice value is selected in the view data.
    pub is_selected: fn(&str, &ViewData) -> bool,
    /// The sub-fields of an expanded field.
    pub children: &'a [ChoiceInput],
}

impl<'a, T> ChoiceFieldView<'a, T> {
    /// Returns the view of the choice at a flat index.
    #[must_use]
    pub fn choice(&self, index: usize) -> Option<&ChoiceView<'a, T>> {
        find_in(&self.preferred_choices, index).or_else(|| find_in(&self.choices, index))
    }

    /// Whether the choice with the given value is selected.
    #[must_use]
    pub fn is_choice_selected(&self, value: &str) -> bool {
        (self.is_selected)(value, &self.value)
    }
}
