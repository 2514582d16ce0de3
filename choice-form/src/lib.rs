//! Choice fields for form binding.
//!
//! `choice_form` implements the "choice" field of a form library: a field
//! whose value is picked out of a declarative set of candidates. It takes care
//! of:
//!
//! * mapping arbitrary choices (strings, numbers, structs, enums) to unique,
//!   transmission-safe string values and to labels,
//! * grouping choices and putting preferred choices first,
//! * placing a placeholder according to the field's settings,
//! * single and multiple selection, rendered collapsed or expanded into one
//!   radio button or checkbox per choice,
//! * reconciling submitted input with the choices and tracking whether the
//!   submission could be mapped back to model data.
//!
//! Rendering HTML and validation beyond "is this one of the choices" are out
//! of scope; [`ChoiceFieldView`](form::fields::ChoiceFieldView) exposes the
//! variables a template engine needs.
//!
//! # Examples
//!
//! ```
//! use choice_form::choice_list::{ChoiceEntry, ChoiceSource};
//! use choice_form::form::fields::{ChoiceField, ChoiceFieldOptions};
//! use choice_form::form::{FieldData, FormFieldOptions, ParentView};
//!
//! let mut field = ChoiceField::new(
//!     FormFieldOptions::new("authors"),
//!     ChoiceFieldOptions::builder()
//!         .source(ChoiceSource::entries([
//!             ChoiceEntry::group(
//!                 "Symfony",
//!                 [
//!                     ChoiceEntry::labeled("Bernhard", "a"),
//!                     ChoiceEntry::labeled("Fabien", "b"),
//!                 ],
//!             ),
//!             ChoiceEntry::labeled("Jon", "d"),
//!         ]))
//!         .multiple(true)
//!         .build(),
//! )?;
//!
//! field.submit(["a", "d"])?;
//! assert_eq!(field.data(), Some(&FieldData::Multiple(vec!["a", "d"])));
//!
//! let view = field.create_view(Some(&ParentView::new("article")))?;
//! assert_eq!(view.full_name, "article[authors][]");
//! assert!(view.is_choice_selected("d"));
//! # Ok::<(), choice_form::ChoiceError>(())
//! ```

#![warn(missing_docs, rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod choice_list;
pub mod config;
mod error;
pub mod form;

pub use error::ChoiceError;

/// A type alias for a result that can return a [`ChoiceError`].
pub type Result<T> = std::result::Result<T, ChoiceError>;
