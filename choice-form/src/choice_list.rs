//! Choice lists: the flattened, memoized set of choices a field selects from.
//!
//! A [`ChoiceList`] is built once per field from a [`ChoiceSource`]. Building
//! flattens any groups depth-first, resolves every choice's value, label and
//! sub-field name exactly once, and keeps the grouping structure around so
//! that views can be rendered with the same nesting as the configuration.
//!
//! # Examples
//!
//! ```
//! use choice_form::choice_list::{ChoiceEntry, ChoiceList, ChoiceResolvers};
//!
//! let list = ChoiceList::build(
//!     vec![
//!         ChoiceEntry::labeled("Symfony", "a"),
//!         ChoiceEntry::group(
//!             "Doctrine",
//!             [ChoiceEntry::labeled("ORM", "b"), ChoiceEntry::labeled("DBAL", "c")],
//!         ),
//!     ],
//!     &ChoiceResolvers::default(),
//! )?;
//!
//! assert_eq!(list.len(), 3);
//! assert_eq!(list.choice_for_value("c"), Some(&"c"));
//! assert_eq!(list.get(1).and_then(|choice| choice.label()), Some("ORM"));
//! # Ok::<(), choice_form::ChoiceError>(())
//! ```

mod loader;
mod resolver;
mod view;

use std::fmt::Debug;
use std::sync::Arc;

use derive_more::From;
use indexmap::{IndexMap, IndexSet};
pub(crate) use loader::LazyChoiceList;
pub use loader::{CallbackChoiceLoader, ChoiceLoader};
pub use resolver::{
    ChoiceContext, ChoiceLabelResolver, ChoiceNameResolver, ChoiceResolvers, ChoiceValueResolver,
    PropertyPath,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
pub(crate) use view::find_in;
pub use view::{
    ChoiceGroupView, ChoiceListView, ChoiceView, ChoiceViewNode, PreferredChoices, is_selected,
};

use crate::ChoiceError;

/// Data that can be offered as a choice.
///
/// This is implemented for every type that can be cloned, compared and
/// serialized. Serialization is what allows property paths and the default
/// value cast to look inside a choice.
pub trait ChoiceData: Clone + PartialEq + Debug + Serialize {}

impl<T: Clone + PartialEq + Debug + Serialize> ChoiceData for T {}

/// A single entry of a choice configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceEntry<T> {
    /// A choice, optionally labelled.
    ///
    /// An unlabelled choice gets its label from the label resolver, or the
    /// flat index if there is none.
    Choice {
        /// The label (the "key" of the choice in the configuration).
        label: Option<String>,
        /// The choice itself.
        data: T,
    },
    /// A named group of entries.
    Group {
        /// The group label.
        label: String,
        /// The entries in the group.
        entries: Vec<ChoiceEntry<T>>,
    },
}

impl<T> ChoiceEntry<T> {
    /// Creates a labelled choice.
    #[must_use]
    pub fn labeled<L: Into<String>>(label: L, data: T) -> Self {
        Self::Choice {
            label: Some(label.into()),
            data,
        }
    }

    /// Creates a choice without a label.
    #[must_use]
    pub fn choice(data: T) -> Self {
        Self::Choice { label: None, data }
    }

    /// Creates a group of entries.
    #[must_use]
    pub fn group<L, I>(label: L, entries: I) -> Self
    where
        L: Into<String>,
        I: IntoIterator<Item = ChoiceEntry<T>>,
    {
        Self::Group {
            label: label.into(),
            entries: entries.into_iter().collect(),
        }
    }
}

/// Where the choices of a field come from.
#[derive(From)]
pub enum ChoiceSource<T> {
    /// Choices given up front.
    Entries(Vec<ChoiceEntry<T>>),
    /// Choices that are loaded on demand.
    Loader(Arc<dyn ChoiceLoader<T>>),
}

impl<T> ChoiceSource<T> {
    /// Creates a source from labelled choices, keeping their order.
    ///
    /// # Examples
    ///
    /// ```
    /// use choice_form::choice_list::ChoiceSource;
    ///
    /// let source = ChoiceSource::labeled([("Bernhard", "a"), ("Fabien", "b")]);
    /// assert_eq!(source.entries_slice().map(<[_]>::len), Some(2));
    /// ```
    #[must_use]
    pub fn labeled<L, I>(choices: I) -> Self
    where
        L: Into<String>,
        I: IntoIterator<Item = (L, T)>,
    {
        Self::Entries(
            choices
                .into_iter()
                .map(|(label, data)| ChoiceEntry::labeled(label, data))
                .collect(),
        )
    }

    /// Creates a source from unlabelled choices, keeping their order.
    #[must_use]
    pub fn positional<I: IntoIterator<Item = T>>(choices: I) -> Self {
        Self::Entries(choices.into_iter().map(ChoiceEntry::choice).collect())
    }

    /// Creates a source from arbitrary entries.
    #[must_use]
    pub fn entries<I: IntoIterator<Item = ChoiceEntry<T>>>(entries: I) -> Self {
        Self::Entries(entries.into_iter().collect())
    }

    /// Creates a source backed by a [`ChoiceLoader`].
    #[must_use]
    pub fn loader<L: ChoiceLoader<T> + 'static>(loader: L) -> Self {
        Self::Loader(Arc::new(loader))
    }

    /// Returns the entries of this source, or `None` for a loader.
    #[must_use]
    pub fn entries_slice(&self) -> Option<&[ChoiceEntry<T>]> {
        match self {
            Self::Entries(entries) => Some(entries),
            Self::Loader(_) => None,
        }
    }
}

impl ChoiceSource<Value> {
    /// Creates a source from a JSON value.
    ///
    /// An object maps labels to choices; a nested object or array becomes a
    /// group. An array holds positional choices. Any other value is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ChoiceError::InvalidConfiguration`] if `value` is not an
    /// object or an array.
    ///
    /// # Examples
    ///
    /// ```
    /// use choice_form::choice_list::{ChoiceEntry, ChoiceSource};
    /// use serde_json::json;
    ///
    /// let source = ChoiceSource::from_json(json!({"Bernhard": "a", "Group": ["b"]}))?;
    /// assert_eq!(
    ///     source.entries_slice().map(<[_]>::to_vec),
    ///     Some(vec![
    ///         ChoiceEntry::labeled("Bernhard", json!("a")),
    ///         ChoiceEntry::group("Group", [ChoiceEntry::choice(json!("b"))]),
    ///     ])
    /// );
    /// # Ok::<(), choice_form::ChoiceError>(())
    /// ```
    pub fn from_json(value: Value) -> Result<Self, ChoiceError> {
        match value {
            Value::Object(_) | Value::Array(_) => Ok(Self::Entries(json_entries(value))),
            other => Err(ChoiceError::invalid_configuration(format!(
                "choices must be a table or an array, got `{other}`"
            ))),
        }
    }
}

fn json_entries(value: Value) -> Vec<ChoiceEntry<Value>> {
    match value {
        Value::Object(map) => map
            .into_iter()
            .map(|(label, value)| match value {
                Value::Object(_) | Value::Array(_) => {
                    ChoiceEntry::group(label, json_entries(value))
                }
                scalar => ChoiceEntry::labeled(label, scalar),
            })
            .collect(),
        Value::Array(items) => items.into_iter().map(ChoiceEntry::choice).collect(),
        scalar => vec![ChoiceEntry::choice(scalar)],
    }
}

impl<T> Default for ChoiceSource<T> {
    fn default() -> Self {
        Self::Entries(Vec::new())
    }
}

impl<T: Clone> Clone for ChoiceSource<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Entries(entries) => Self::Entries(entries.clone()),
            Self::Loader(loader) => Self::Loader(Arc::clone(loader)),
        }
    }
}

impl<T: Debug> Debug for ChoiceSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entries(entries) => f.debug_tuple("Entries").field(entries).finish(),
            Self::Loader(_) => f.write_str("Loader(..)"),
        }
    }
}

impl<T> FromIterator<ChoiceEntry<T>> for ChoiceSource<T> {
    fn from_iter<I: IntoIterator<Item = ChoiceEntry<T>>>(iter: I) -> Self {
        Self::entries(iter)
    }
}

/// The grouping structure of a [`ChoiceList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceNode {
    /// A choice, referenced by its flat index.
    Choice(usize),
    /// A group of nodes.
    Group {
        /// The group label.
        label: String,
        /// The nodes in the group.
        children: Vec<ChoiceNode>,
    },
}

/// A choice in a [`ChoiceList`], together with everything resolved for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedChoice<T> {
    data: T,
    key: Option<String>,
    value: String,
    label: Option<String>,
    name: String,
}

impl<T> ListedChoice<T> {
    /// The choice itself.
    #[must_use]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// The label the choice had in the configuration, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The resolved value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The resolved label. `None` means the label is suppressed.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The name of the sub-field for this choice in an expanded field.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An ordered, memoized list of choices.
///
/// Every choice has a unique value. Values, labels and names are resolved once
/// when the list is built.
#[derive(Debug, Clone)]
pub struct ChoiceList<T> {
    choices: Vec<ListedChoice<T>>,
    values: IndexMap<String, usize>,
    structure: Vec<ChoiceNode>,
}

impl<T: ChoiceData> ChoiceList<T> {
    /// Builds a choice list from entries.
    ///
    /// # Errors
    ///
    /// Returns an error if a resolver fails, if an explicit value resolver
    /// produces the same value for two choices
    /// ([`ChoiceError::DuplicateValue`]), or if two choices get the same name
    /// ([`ChoiceError::DuplicateName`]).
    pub fn build(
        entries: Vec<ChoiceEntry<T>>,
        resolvers: &ChoiceResolvers<T>,
    ) -> Result<Self, ChoiceError> {
        let mut flat = Vec::new();
        let structure = flatten(entries, &mut flat);

        let data: Vec<&T> = flat.iter().map(|(_, data)| data).collect();
        let values = resolvers.resolve_values(&data)?;

        let mut value_index = IndexMap::with_capacity(flat.len());
        let mut names = IndexSet::with_capacity(flat.len());
        let mut choices = Vec::with_capacity(flat.len());
        for (index, ((key, data), value)) in flat.into_iter().zip(values).enumerate() {
            if value_index.insert(value.clone(), index).is_some() {
                return Err(ChoiceError::DuplicateValue(value));
            }

            let context = ChoiceContext {
                index,
                key: key.as_deref(),
                value: &value,
            };
            let label = resolvers.resolve_label(&data, &context)?;
            let name = resolvers.resolve_name(&data, &context)?;
            if !names.insert(name.clone()) {
                return Err(ChoiceError::DuplicateName(name));
            }

            choices.push(ListedChoice {
                data,
                key,
                value,
                label,
                name,
            });
        }

        debug!(
            choices = choices.len(),
            groups = structure
                .iter()
                .filter(|node| matches!(node, ChoiceNode::Group { .. }))
                .count(),
            "Choice list built"
        );

        Ok(Self {
            choices,
            values: value_index,
            structure,
        })
    }
}

impl<T> ChoiceList<T> {
    /// Returns all choices in flat order.
    #[must_use]
    pub fn choices(&self) -> &[ListedChoice<T>] {
        &self.choices
    }

    /// Returns the number of choices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// Returns `true` if the list has no choices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Returns the choice at a flat index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ListedChoice<T>> {
        self.choices.get(index)
    }

    /// Returns the grouping structure of the list.
    #[must_use]
    pub fn structure(&self) -> &[ChoiceNode] {
        &self.structure
    }

    /// Returns all values in flat order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns the flat index of the choice with the given value.
    #[must_use]
    pub fn index_of_value(&self, value: &str) -> Option<usize> {
        self.values.get(value).copied()
    }

    /// Returns `true` if a choice has the given value.
    #[must_use]
    pub fn contains_value(&self, value: &str) -> bool {
        self.values.contains_key(value)
    }

    /// Returns `true` if a choice has the empty value `""`.
    #[must_use]
    pub fn has_empty_value(&self) -> bool {
        self.contains_value("")
    }

    /// Returns the choice with the given value.
    #[must_use]
    pub fn choice_for_value(&self, value: &str) -> Option<&T> {
        self.index_of_value(value)
            .map(|index| &self.choices[index].data)
    }

    /// Returns the choices for the given values, in the order of `values`.
    ///
    /// Returns `None` if any of the values doesn't belong to a choice.
    #[must_use]
    pub fn choices_for_values<S: AsRef<str>>(&self, values: &[S]) -> Option<Vec<&T>> {
        values
            .iter()
            .map(|value| self.choice_for_value(value.as_ref()))
            .collect()
    }
}

impl<T: PartialEq> ChoiceList<T> {
    /// Returns the value of the first choice equal to `choice`.
    #[must_use]
    pub fn value_for_choice(&self, choice: &T) -> Option<&str> {
        self.choices
            .iter()
            .find(|listed| listed.data == *choice)
            .map(|listed| listed.value.as_str())
    }

    /// Returns the values for the given choices, in the order of `choices`.
    ///
    /// Returns `None` if any of the choices is not in the list.
    #[must_use]
    pub fn values_for_choices(&self, choices: &[T]) -> Option<Vec<String>> {
        choices
            .iter()
            .map(|choice| self.value_for_choice(choice).map(str::to_owned))
            .collect()
    }
}

fn flatten<T>(entries: Vec<ChoiceEntry<T>>, flat: &mut Vec<(Option<String>, T)>) -> Vec<ChoiceNode> {
    entries
        .into_iter()
        .map(|entry| match entry {
            ChoiceEntry::Choice { label, data } => {
                flat.push((label, data));
                ChoiceNode::Choice(flat.len() - 1)
            }
            ChoiceEntry::Group { label, entries } => ChoiceNode::Group {
                label,
                children: flatten(entries, flat),
            },
        })
        .collect()
}
