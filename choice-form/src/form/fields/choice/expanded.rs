use crate::ChoiceError;
use crate::choice_list::ChoiceList;

/// The name of the placeholder sub-field of an expanded choice field.
pub const PLACEHOLDER_NAME: &str = "placeholder";

/// The kind of input a [`ChoiceInput`] is rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceInputKind {
    /// A radio button; used by single-choice fields.
    Radio,
    /// A checkbox; used by multiple-choice fields.
    Checkbox,
}

/// A boolean sub-field of an expanded choice field.
///
/// Every choice of an expanded field gets one of these. A single-choice field
/// that is not required can also get one for its placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceInput {
    name: String,
    label: Option<String>,
    value: String,
    kind: ChoiceInputKind,
    required: bool,
    choice_index: Option<usize>,
    checked: bool,
}

impl ChoiceInput {
    /// The name of the sub-field.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The label of the sub-field.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The value submitted when the sub-field is checked.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether this is a radio button or a checkbox.
    #[must_use]
    pub fn kind(&self) -> ChoiceInputKind {
        self.kind
    }

    /// Whether the sub-field is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether this sub-field stands for the placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.choice_index.is_none()
    }

    /// The flat index of the choice this sub-field stands for.
    #[must_use]
    pub fn choice_index(&self) -> Option<usize> {
        self.choice_index
    }

    /// Whether the sub-field is checked.
    #[must_use]
    pub fn data(&self) -> bool {
        self.checked
    }

    /// The submitted value if the sub-field is checked.
    #[must_use]
    pub fn view_data(&self) -> Option<&str> {
        self.checked.then_some(self.value.as_str())
    }

    pub(crate) fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }
}

/// Creates the sub-fields of an expanded choice field.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ExpansionBuilder<'a> {
    pub(crate) multiple: bool,
    pub(crate) required: bool,
    /// The placeholder, if a placeholder sub-field should be added.
    pub(crate) placeholder: Option<&'a str>,
}

impl ExpansionBuilder<'_> {
    pub(crate) fn build<T>(&self, list: &ChoiceList<T>) -> Result<Vec<ChoiceInput>, ChoiceError> {
        let kind = if self.multiple {
            ChoiceInputKind::Checkbox
        } else {
            ChoiceInputKind::Radio
        };
        let required = !self.multiple && self.required;

        let mut children = Vec::with_capacity(list.len() + 1);
        if let Some(placeholder) = self.placeholder {
            if list
                .choices()
                .iter()
                .any(|choice| choice.name() == PLACEHOLDER_NAME)
            {
                return Err(ChoiceError::DuplicateName(PLACEHOLDER_NAME.to_owned()));
            }
            children.push(ChoiceInput {
                name: PLACEHOLDER_NAME.to_owned(),
                label: Some(placeholder.to_owned()),
                value: String::new(),
                kind,
                required,
                choice_index: None,
                checked: false,
            });
        }

        children.extend(
            list.choices()
                .iter()
                .enumerate()
                .map(|(index, choice)| ChoiceInput {
                    name: choice.name().to_owned(),
                    label: choice.label().map(str::to_owned),
                    value: choice.value().to_owned(),
                    kind,
                    required,
                    choice_index: Some(index),
                    checked: false,
                }),
        );

        Ok(children)
    }
}
