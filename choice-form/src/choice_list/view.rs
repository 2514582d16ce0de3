use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::choice_list::{ChoiceList, ChoiceNode};
use crate::form::ViewData;

/// A single choice as presented to the view layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceView<'a, T> {
    /// The choice itself.
    pub data: &'a T,
    /// The value transmitted for this choice.
    pub value: String,
    /// The label to display. `None` means no label is displayed.
    pub label: Option<String>,
}

impl<'a, T> ChoiceView<'a, T> {
    /// Creates a labelled choice view.
    #[must_use]
    pub fn new<V: Into<String>, L: Into<String>>(data: &'a T, value: V, label: L) -> Self {
        Self {
            data,
            value: value.into(),
            label: Some(label.into()),
        }
    }

    /// Creates a choice view without a label.
    #[must_use]
    pub fn unlabeled<V: Into<String>>(data: &'a T, value: V) -> Self {
        Self {
            data,
            value: value.into(),
            label: None,
        }
    }
}

/// A group of choices as presented to the view layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceGroupView<'a, T> {
    /// The group label.
    pub label: String,
    /// The members of the group.
    pub choices: Vec<ChoiceViewNode<'a, T>>,
}

/// A node of a [`ChoiceListView`].
#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceViewNode<'a, T> {
    /// A choice along with its flat index in the choice list.
    Choice {
        /// The flat index of the choice.
        index: usize,
        /// The choice view.
        view: ChoiceView<'a, T>,
    },
    /// A group of choices.
    Group(ChoiceGroupView<'a, T>),
}

impl<'a, T> ChoiceViewNode<'a, T> {
    /// Creates a choice node.
    #[must_use]
    pub fn choice(index: usize, view: ChoiceView<'a, T>) -> Self {
        Self::Choice { index, view }
    }

    /// Creates a group node.
    #[must_use]
    pub fn group<L: Into<String>>(label: L, choices: Vec<ChoiceViewNode<'a, T>>) -> Self {
        Self::Group(ChoiceGroupView {
            label: label.into(),
            choices,
        })
    }

    /// Returns the choice view if this node is a choice.
    #[must_use]
    pub fn as_choice(&self) -> Option<&ChoiceView<'a, T>> {
        match self {
            Self::Choice { view, .. } => Some(view),
            Self::Group(_) => None,
        }
    }

    /// Returns the group view if this node is a group.
    #[must_use]
    pub fn as_group(&self) -> Option<&ChoiceGroupView<'a, T>> {
        match self {
            Self::Choice { .. } => None,
            Self::Group(group) => Some(group),
        }
    }

    fn find(&self, index: usize) -> Option<&ChoiceView<'a, T>> {
        match self {
            Self::Choice {
                index: node_index,
                view,
            } => (*node_index == index).then_some(view),
            Self::Group(group) => find_in(&group.choices, index),
        }
    }
}

/// Finds the view of the choice at a flat index among `nodes`.
pub(crate) fn find_in<'n, 'a, T>(
    nodes: &'n [ChoiceViewNode<'a, T>],
    index: usize,
) -> Option<&'n ChoiceView<'a, T>> {
    nodes.iter().find_map(|node| node.find(index))
}

type PreferredFn<T> = dyn Fn(&T, &str) -> bool + Send + Sync;

/// Which choices are shown first.
pub enum PreferredChoices<T> {
    /// No choice is preferred.
    None,
    /// The choices with these values are preferred.
    Values(Vec<String>),
    /// The choices for which the predicate returns `true` are preferred. The
    /// predicate receives the choice and its value.
    Predicate(Arc<PreferredFn<T>>),
}

impl<T> PreferredChoices<T> {
    /// Prefers the choices with the given values.
    ///
    /// # Examples
    ///
    /// ```
    /// use choice_form::choice_list::PreferredChoices;
    ///
    /// let preferred = PreferredChoices::<&str>::values(["b", "d"]);
    /// ```
    #[must_use]
    pub fn values<V, I>(values: I) -> Self
    where
        V: Into<String>,
        I: IntoIterator<Item = V>,
    {
        Self::Values(values.into_iter().map(Into::into).collect())
    }

    /// Prefers the choices accepted by a predicate.
    #[must_use]
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&T, &str) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    fn is_preferred(&self, choice: &T, value: &str) -> bool {
        match self {
            Self::None => false,
            Self::Values(values) => values.iter().any(|preferred| preferred == value),
            Self::Predicate(predicate) => predicate(choice, value),
        }
    }
}

impl<T> Default for PreferredChoices<T> {
    fn default() -> Self {
        Self::None
    }
}

impl<T> Clone for PreferredChoices<T> {
    fn clone(&self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Values(values) => Self::Values(values.clone()),
            Self::Predicate(predicate) => Self::Predicate(Arc::clone(predicate)),
        }
    }
}

impl<T> Debug for PreferredChoices<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Values(values) => f.debug_tuple("Values").field(values).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// The choices of a list, split into preferred and remaining choices.
///
/// Both partitions keep the order and the grouping of the list. A group only
/// shows up in a partition if at least one of its members is there.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceListView<'a, T> {
    /// The choices that are not preferred.
    pub choices: Vec<ChoiceViewNode<'a, T>>,
    /// The preferred choices.
    pub preferred_choices: Vec<ChoiceViewNode<'a, T>>,
}

impl<'a, T> ChoiceListView<'a, T> {
    /// Builds the view of a choice list.
    ///
    /// # Examples
    ///
    /// ```
    /// use choice_form::choice_list::{
    ///     ChoiceEntry, ChoiceList, ChoiceListView, ChoiceResolvers, ChoiceView, ChoiceViewNode,
    ///     PreferredChoices,
    /// };
    ///
    /// let list = ChoiceList::build(
    ///     vec![ChoiceEntry::labeled("A", "a"), ChoiceEntry::labeled("B", "b")],
    ///     &ChoiceResolvers::default(),
    /// )?;
    /// let view = ChoiceListView::build(&list, &PreferredChoices::values(["b"]));
    ///
    /// assert_eq!(
    ///     view.preferred_choices,
    ///     [ChoiceViewNode::choice(1, ChoiceView::new(&"b", "b", "B"))]
    /// );
    /// # Ok::<(), choice_form::ChoiceError>(())
    /// ```
    #[must_use]
    pub fn build(list: &'a ChoiceList<T>, preferred: &PreferredChoices<T>) -> Self {
        let mut view = Self {
            choices: Vec::new(),
            preferred_choices: Vec::new(),
        };
        partition(
            list,
            list.structure(),
            preferred,
            &mut view.preferred_choices,
            &mut view.choices,
        );
        view
    }

    /// Returns the view of the choice at a flat index, wherever it landed.
    #[must_use]
    pub fn choice(&self, index: usize) -> Option<&ChoiceView<'a, T>> {
        find_in(&self.preferred_choices, index).or_else(|| find_in(&self.choices, index))
    }
}

fn partition<'a, T>(
    list: &'a ChoiceList<T>,
    nodes: &[ChoiceNode],
    preferred: &PreferredChoices<T>,
    preferred_nodes: &mut Vec<ChoiceViewNode<'a, T>>,
    other_nodes: &mut Vec<ChoiceViewNode<'a, T>>,
) {
    for node in nodes {
        match node {
            ChoiceNode::Choice(index) => {
                let Some(choice) = list.get(*index) else {
                    continue;
                };
                let view = ChoiceView {
                    data: choice.data(),
                    value: choice.value().to_owned(),
                    label: choice.label().map(str::to_owned),
                };
                if preferred.is_preferred(choice.data(), choice.value()) {
                    preferred_nodes.push(ChoiceViewNode::choice(*index, view));
                } else {
                    other_nodes.push(ChoiceViewNode::choice(*index, view));
                }
            }
            ChoiceNode::Group { label, children } => {
                let mut preferred_group = Vec::new();
                let mut other_group = Vec::new();
                partition(
                    list,
                    children,
                    preferred,
                    &mut preferred_group,
                    &mut other_group,
                );
                if !preferred_group.is_empty() {
                    preferred_nodes.push(ChoiceViewNode::group(label.clone(), preferred_group));
                }
                if !other_group.is_empty() {
                    other_nodes.push(ChoiceViewNode::group(label.clone(), other_group));
                }
            }
        }
    }
}

/// Returns `true` if a choice value is selected in the given view data.
///
/// # Examples
///
/// ```
/// use choice_form::choice_list::is_selected;
/// use choice_form::form::ViewData;
///
/// assert!(is_selected("a", &ViewData::Text("a".to_owned())));
/// assert!(is_selected("b", &ViewData::List(vec!["a".to_owned(), "b".to_owned()])));
/// assert!(!is_selected("", &ViewData::Empty));
/// ```
#[must_use]
pub fn is_selected(choice_value: &str, current: &ViewData) -> bool {
    match current {
        ViewData::Empty => false,
        ViewData::Text(value) => value == choice_value,
        ViewData::List(values) => values.iter().any(|value| value == choice_value),
    }
}
