use std::cell::OnceCell;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::ChoiceError;
use crate::choice_list::{ChoiceData, ChoiceEntry, ChoiceList, ChoiceResolvers, ChoiceSource};

/// A deferred source of choices.
///
/// A loader is asked for the full list of choices at most once per field, when
/// it is first needed. A loader backed by a database can instead serve
/// collapsed submissions with a targeted query: it overrides
/// [`load_choices_for_values`](Self::load_choices_for_values) and
/// [`load_values_for_choices`](Self::load_values_for_choices) and returns
/// `true` from [`loads_by_value`](Self::loads_by_value). Targeted lookups are
/// not memoized.
///
/// Loaders must return the choices in a stable order.
pub trait ChoiceLoader<T>: Send + Sync {
    /// Loads all choices.
    ///
    /// # Errors
    ///
    /// Returns an error if the choices couldn't be loaded.
    fn load_choice_list(&self) -> Result<Vec<ChoiceEntry<T>>, ChoiceError>;

    /// Whether submissions should be served by the targeted lookups rather
    /// than by the full, memoized list.
    ///
    /// The default implementation returns `false`.
    fn loads_by_value(&self) -> bool {
        false
    }

    /// Loads the choices for the given values, in the order of `values`.
    ///
    /// Values that don't belong to any choice are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the choices couldn't be loaded.
    fn load_choices_for_values(
        &self,
        values: &[String],
        resolvers: &ChoiceResolvers<T>,
    ) -> Result<Vec<T>, ChoiceError>
    where
        T: ChoiceData,
    {
        let list = ChoiceList::build(self.load_choice_list()?, resolvers)?;
        Ok(values
            .iter()
            .filter_map(|value| list.choice_for_value(value).cloned())
            .collect())
    }

    /// Loads the values for the given choices, in the order of `choices`.
    ///
    /// Choices that are not in the list are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the choices couldn't be loaded.
    fn load_values_for_choices(
        &self,
        choices: &[T],
        resolvers: &ChoiceResolvers<T>,
    ) -> Result<Vec<String>, ChoiceError>
    where
        T: ChoiceData,
    {
        let list = ChoiceList::build(self.load_choice_list()?, resolvers)?;
        Ok(choices
            .iter()
            .filter_map(|choice| list.value_for_choice(choice).map(str::to_owned))
            .collect())
    }
}

/// A [`ChoiceLoader`] that calls a function to get the choices.
///
/// # Examples
///
/// ```
/// use choice_form::choice_list::{CallbackChoiceLoader, ChoiceEntry, ChoiceLoader};
///
/// let loader = CallbackChoiceLoader::new(|| {
///     vec![
///         ChoiceEntry::labeled("Bernhard", "a"),
///         ChoiceEntry::labeled("Fabien", "b"),
///     ]
/// });
///
/// assert_eq!(loader.load_choice_list()?.len(), 2);
/// # Ok::<(), choice_form::ChoiceError>(())
/// ```
#[derive(Clone, derive_more::Debug)]
pub struct CallbackChoiceLoader<F> {
    #[debug(skip)]
    callback: F,
}

impl<F> CallbackChoiceLoader<F> {
    /// Creates a new loader.
    #[must_use]
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<T, F> ChoiceLoader<T> for CallbackChoiceLoader<F>
where
    F: Fn() -> Vec<ChoiceEntry<T>> + Send + Sync,
{
    fn load_choice_list(&self) -> Result<Vec<ChoiceEntry<T>>, ChoiceError> {
        Ok((self.callback)())
    }
}

enum ListState<T> {
    Loaded,
    Deferred(Arc<dyn ChoiceLoader<T>>),
}

/// A choice list that is built at most once.
///
/// Entry sources are built eagerly so that configuration errors show up when
/// the field is created. Loader sources are built on first access.
pub(crate) struct LazyChoiceList<T> {
    state: ListState<T>,
    resolvers: ChoiceResolvers<T>,
    list: OnceCell<ChoiceList<T>>,
}

impl<T: ChoiceData> LazyChoiceList<T> {
    pub(crate) fn new(
        source: ChoiceSource<T>,
        resolvers: ChoiceResolvers<T>,
    ) -> Result<Self, ChoiceError> {
        let (state, list) = match source {
            ChoiceSource::Entries(entries) => (
                ListState::Loaded,
                OnceCell::from(ChoiceList::build(entries, &resolvers)?),
            ),
            ChoiceSource::Loader(loader) => (ListState::Deferred(loader), OnceCell::new()),
        };

        Ok(Self {
            state,
            resolvers,
            list,
        })
    }

    /// Returns the list, loading it if needed.
    pub(crate) fn get(&self) -> Result<&ChoiceList<T>, ChoiceError> {
        if let Some(list) = self.list.get() {
            return Ok(list);
        }

        let entries = match &self.state {
            ListState::Deferred(loader) => {
                trace!("Loading choice list");
                loader.load_choice_list()?
            }
            ListState::Loaded => Vec::new(),
        };
        let list = ChoiceList::build(entries, &self.resolvers)?;
        debug!(choices = list.len(), "Choice list loaded");

        Ok(self.list.get_or_init(|| list))
    }

    /// Returns the list if it has been built already.
    pub(crate) fn loaded(&self) -> Option<&ChoiceList<T>> {
        self.list.get()
    }

    /// Returns the choices for `values`, in order, skipping unknown values.
    pub(crate) fn choices_for_values(&self, values: &[String]) -> Result<Vec<T>, ChoiceError> {
        match (self.loaded(), &self.state) {
            (None, ListState::Deferred(loader)) if loader.loads_by_value() => {
                trace!(values = values.len(), "Loading choices for submitted values");
                loader.load_choices_for_values(values, &self.resolvers)
            }
            _ => {
                let list = self.get()?;
                Ok(values
                    .iter()
                    .filter_map(|value| list.choice_for_value(value).cloned())
                    .collect())
            }
        }
    }

    /// Returns the values for `choices`, in order, skipping unknown choices.
    pub(crate) fn values_for_choices(&self, choices: &[T]) -> Result<Vec<String>, ChoiceError> {
        match (self.loaded(), &self.state) {
            (None, ListState::Deferred(loader)) if loader.loads_by_value() => {
                trace!(choices = choices.len(), "Loading values for choices");
                loader.load_values_for_choices(choices, &self.resolvers)
            }
            _ => {
                let list = self.get()?;
                Ok(choices
                    .iter()
                    .filter_map(|choice| list.value_for_choice(choice).map(str::to_owned))
                    .collect())
            }
        }
    }
}

impl<T> Debug for LazyChoiceList<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyChoiceList")
            .field("resolvers", &self.resolvers)
            .field("list", &self.list)
            .finish_non_exhaustive()
    }
}
