use crate::models::audio_params::Parameter;

/// Ordered `(label, value)` table backing one selection list.
///
/// The position of an entry is the contract between the selection widget
/// and the platform value: it never changes for the lifetime of the table.
#[derive(Debug, Clone)]
pub struct ParameterTable<T: 'static> {
    entries: Vec<(&'static str, T)>,
    default_index: usize,
}

impl<T: Parameter> ParameterTable<T> {
    /// Table over every value of `T` in catalog order, defaulting to
    /// `default_value`.
    pub fn standard(default_value: T) -> Self {
        let entries: Vec<_> = T::ALL.iter().map(|v| (v.label(), *v)).collect();
        let default_index = entries
            .iter()
            .position(|(_, v)| *v == default_value)
            .unwrap_or(0);
        Self {
            entries,
            default_index,
        }
    }

    /// Value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds. Selection widgets are populated
    /// from this table, so an out-of-range index is a caller bug.
    pub fn value_at(&self, index: usize) -> T {
        match self.entries.get(index) {
            Some((_, value)) => *value,
            None => panic!(
                "selection index {} out of bounds for {} entries",
                index,
                self.entries.len()
            ),
        }
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.entries.get(index).map(|(_, v)| *v)
    }

    pub fn label_at(&self, index: usize) -> Option<&'static str> {
        self.entries.get(index).map(|(label, _)| *label)
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(label, _)| *label).collect()
    }

    /// Position of `value`, if present.
    pub fn index_of(&self, value: T) -> Option<usize> {
        self.entries.iter().position(|(_, v)| *v == value)
    }

    pub fn default_index(&self) -> usize {
        self.default_index
    }

    pub fn default_value(&self) -> T {
        self.entries[self.default_index].1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, T)> + '_ {
        self.entries.iter().copied()
    }
}
