use std::collections::BTreeMap;

use cadet_shared::Id;

/// Records of one entity type keyed by id, plus the counter for the next id.
///
/// Ids are handed out in increasing order and never reused, so iterating the
/// map visits records in insertion order.
#[derive(Debug, Clone)]
pub(crate) struct Table<T> {
    rows: BTreeMap<Id, T>,
    next_id: Id,
}

impl<T> Table<T> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Assign the next id, build the record with it and store it.
    pub fn insert_with(&mut self, build: impl FnOnce(Id) -> T) -> &T {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.entry(id).or_insert(build(id))
    }

    pub fn get(&self, id: Id) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.rows.contains_key(&id)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.rows.values_mut()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut table = Table::new();
        let a = *table.insert_with(|id| id * 10);
        let b = *table.insert_with(|id| id * 10);
        assert_eq!((a, b), (10, 20));
        assert_eq!(table.len(), 2);
        assert!(table.contains(2));
        assert!(!table.contains(3));
    }

    #[test]
    fn values_follow_insertion_order() {
        let mut table = Table::new();
        for name in ["c", "a", "b"] {
            table.insert_with(|_| name);
        }
        let order: Vec<_> = table.values().copied().collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }
}
