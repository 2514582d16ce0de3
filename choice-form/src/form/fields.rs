mod choice;
mod select;

pub use choice::{
    ChoiceField, ChoiceFieldOptions, ChoiceFieldOptionsBuilder, ChoiceFieldView, ChoiceInput,
    ChoiceInputKind, ChoiceTranslationDomain, PLACEHOLDER_NAME, Placeholder, SubmissionState,
};
pub use select::SelectChoice;
