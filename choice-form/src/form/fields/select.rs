pub use choice_form_macros::SelectChoice;

use crate::choice_list::{
    ChoiceContext, ChoiceData, ChoiceLabelResolver, ChoiceSource, ChoiceValueResolver,
};
use crate::form::fields::ChoiceFieldOptionsBuilder;

/// A type whose values can be offered as choices on their own.
///
/// This is typically implemented for enums using the
/// [`SelectChoice`](derive@SelectChoice) derive macro:
///
/// ```
/// use choice_form::form::fields::SelectChoice;
///
/// #[derive(SelectChoice, Debug, Clone, PartialEq, serde::Serialize)]
/// enum Status {
///     Draft,
///     #[select_choice(value = "live", label = "Published")]
///     Published,
/// }
///
/// assert_eq!(Status::default_choices(), vec![Status::Draft, Status::Published]);
/// assert_eq!(Status::Published.value(), "live");
/// assert_eq!(Status::Draft.label(), "Draft");
/// ```
pub trait SelectChoice {
    /// Returns the list of choices offered by default.
    ///
    /// The default implementation returns an empty vector.
    #[must_use]
    fn default_choices() -> Vec<Self>
    where
        Self: Sized,
    {
        vec![]
    }

    /// Returns the value transmitted for this choice.
    ///
    /// The value must be unique among all choices of the type.
    fn value(&self) -> String;

    /// Returns the human-readable label for this choice.
    fn label(&self) -> String;
}

impl<T: SelectChoice> ChoiceSource<T> {
    /// Creates a source from [`SelectChoice::default_choices`].
    #[must_use]
    pub fn select_choices() -> Self {
        Self::positional(T::default_choices())
    }
}

impl<T> ChoiceFieldOptionsBuilder<T>
where
    T: SelectChoice + ChoiceData + 'static,
{
    /// Uses the [`SelectChoice`] implementation of `T` for the choices,
    /// their values and their labels.
    ///
    /// # Examples
    ///
    /// ```
    /// use choice_form::form::FormFieldOptions;
    /// use choice_form::form::fields::{ChoiceField, ChoiceFieldOptionsBuilder, SelectChoice};
    ///
    /// #[derive(SelectChoice, Debug, Clone, PartialEq, serde::Serialize)]
    /// enum Size {
    ///     Small,
    ///     Large,
    /// }
    ///
    /// let field = ChoiceField::new(
    ///     FormFieldOptions::new("size"),
    ///     ChoiceFieldOptionsBuilder::<Size>::default().select_choice().build(),
    /// )?;
    ///
    /// assert_eq!(field.choice_list()?.choice_for_value("Large"), Some(&Size::Large));
    /// # Ok::<(), choice_form::ChoiceError>(())
    /// ```
    pub fn select_choice(&mut self) -> &mut Self {
        self.source(ChoiceSource::select_choices())
            .choice_value(ChoiceValueResolver::callback(|choice: &T| choice.value()))
            .choice_label(ChoiceLabelResolver::callback(
                |choice: &T, _context: &ChoiceContext<'_>| Some(choice.label()),
            ))
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;
    use crate::choice_list::{ChoiceList, ChoiceResolvers};
    use crate::form::FormFieldOptions;
    use crate::form::fields::ChoiceField;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    enum Priority {
        Low,
        High,
    }

    impl SelectChoice for Priority {
        fn default_choices() -> Vec<Self> {
            vec![Self::Low, Self::High]
        }

        fn value(&self) -> String {
            match self {
                Self::Low => "low".to_owned(),
                Self::High => "high".to_owned(),
            }
        }

        fn label(&self) -> String {
            match self {
                Self::Low => "Low priority".to_owned(),
                Self::High => "High priority".to_owned(),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Empty;

    impl SelectChoice for Empty {
        fn value(&self) -> String {
            String::new()
        }

        fn label(&self) -> String {
            String::new()
        }
    }

    #[test]
    fn default_choices_defaults_to_empty() {
        assert!(Empty::default_choices().is_empty());
    }

    #[test]
    fn select_choices_source() {
        let source = ChoiceSource::<Priority>::select_choices();
        let ChoiceSource::Entries(entries) = source else {
            panic!("expected entries");
        };

        let list = ChoiceList::build(entries, &ChoiceResolvers::default()).unwrap();
        assert_eq!(list.choice_for_value("High"), Some(&Priority::High));
    }

    #[test]
    fn select_choice_options() {
        let mut field = ChoiceField::new(
            FormFieldOptions::new("priority"),
            ChoiceFieldOptionsBuilder::<Priority>::default()
                .select_choice()
                .build(),
        )
        .unwrap();

        let list = field.choice_list().unwrap();
        assert_eq!(list.get(0).unwrap().value(), "low");
        assert_eq!(list.get(1).unwrap().label(), Some("High priority"));

        field.submit("high").unwrap();
        assert_eq!(
            field.data().and_then(|data| data.as_single()),
            Some(&Priority::High)
        );
    }
}
