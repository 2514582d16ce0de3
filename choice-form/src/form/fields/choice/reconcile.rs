use tracing::debug;

use crate::ChoiceError;
use crate::choice_list::{ChoiceData, LazyChoiceList};
use crate::form::{FieldData, FormFieldValidationError, RawInput, ViewData};

/// The submission state of a choice field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    /// Nothing has been submitted yet.
    #[default]
    Unsubmitted,
    /// The submitted input was mapped to model data.
    Synchronized,
    /// The submitted input couldn't be mapped to model data.
    NotSynchronized,
}

/// The outcome of reconciling a submission.
#[derive(Debug)]
pub(crate) struct Reconciliation<T> {
    pub(crate) data: Option<FieldData<T>>,
    pub(crate) view_data: ViewData,
    pub(crate) error: Option<FormFieldValidationError>,
    /// The values of the choices to check in an expanded field.
    pub(crate) selected: Vec<String>,
    /// Whether the user explicitly chose no choice at all.
    pub(crate) chose_nothing: bool,
}

impl<T> Reconciliation<T> {
    fn failed(view_data: ViewData, error: FormFieldValidationError) -> Self {
        Self {
            data: None,
            view_data,
            error: Some(error),
            selected: Vec::new(),
            chose_nothing: false,
        }
    }
}

/// Maps submitted input to model and view data.
#[derive(Debug)]
pub(crate) struct SubmissionReconciler<'a, T> {
    choices: &'a LazyChoiceList<T>,
    multiple: bool,
    expanded: bool,
}

impl<'a, T: ChoiceData> SubmissionReconciler<'a, T> {
    pub(crate) fn new(choices: &'a LazyChoiceList<T>, multiple: bool, expanded: bool) -> Self {
        Self {
            choices,
            multiple,
            expanded,
        }
    }

    pub(crate) fn reconcile(&self, raw: RawInput) -> Result<Reconciliation<T>, ChoiceError> {
        if self.multiple {
            self.reconcile_multiple(raw)
        } else {
            self.reconcile_single(raw)
        }
    }

    fn reconcile_single(&self, raw: RawInput) -> Result<Reconciliation<T>, ChoiceError> {
        let value = match raw {
            RawInput::Null | RawInput::False => String::new(),
            RawInput::Text(value) => value,
            RawInput::List(values) => {
                debug!(values = values.len(), "List submitted to a single-choice field");
                return Ok(Reconciliation::failed(
                    ViewData::List(values),
                    FormFieldValidationError::ExpectedScalar,
                ));
            }
        };

        let choice = self
            .choices
            .choices_for_values(std::slice::from_ref(&value))?
            .pop();
        match choice {
            // The choice with the empty value stays checked, but the field
            // itself reads as empty.
            Some(_) if value.is_empty() && self.expanded => Ok(Reconciliation {
                data: None,
                view_data: ViewData::Empty,
                error: None,
                selected: vec![value],
                chose_nothing: false,
            }),
            Some(choice) => Ok(Reconciliation {
                data: Some(FieldData::Single(choice)),
                view_data: ViewData::Text(value.clone()),
                error: None,
                selected: vec![value],
                chose_nothing: false,
            }),
            None if value.is_empty() => Ok(Reconciliation {
                data: None,
                view_data: if self.expanded {
                    ViewData::Empty
                } else {
                    ViewData::Text(value)
                },
                error: None,
                selected: Vec::new(),
                chose_nothing: true,
            }),
            None => {
                debug!(value = %value, "Submitted value doesn't match any choice");
                Ok(Reconciliation::failed(
                    ViewData::Text(value.clone()),
                    FormFieldValidationError::InvalidValue(value),
                ))
            }
        }
    }

    fn reconcile_multiple(&self, raw: RawInput) -> Result<Reconciliation<T>, ChoiceError> {
        let values = match raw {
            RawInput::Null | RawInput::False => Vec::new(),
            RawInput::List(values) => values,
            RawInput::Text(value) => {
                debug!(value = %value, "Single value submitted to a multiple-choice field");
                return Ok(Reconciliation::failed(
                    ViewData::Text(value),
                    FormFieldValidationError::ExpectedList,
                ));
            }
        };

        let choices = self.choices.choices_for_values(&values)?;
        if choices.len() != values.len() {
            debug!(
                submitted = values.len(),
                found = choices.len(),
                "Submitted values don't all match a choice"
            );
            let invalid = values.join(", ");
            return Ok(Reconciliation::failed(
                ViewData::List(values),
                FormFieldValidationError::InvalidValue(invalid),
            ));
        }

        Ok(Reconciliation {
            data: Some(FieldData::Multiple(choices)),
            view_data: ViewData::List(values.clone()),
            error: None,
            chose_nothing: values.is_empty(),
            selected: values,
        })
    }
}
