use crate::types::StepId;

/// Cyclic navigation order over step ids.
///
/// Each id appears at most once; insertion is the only place that is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    entries: Vec<StepId>,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a route from an ordered list, dropping repeated ids
    pub fn from_ids(ids: impl IntoIterator<Item = StepId>) -> Self {
        let mut route = Self::new();
        for id in ids {
            route.add(id, None);
        }
        route
    }

    /// Insert after `after` when it is in the route, else append.
    /// Returns false if `id` was already present.
    pub fn add(&mut self, id: StepId, after: Option<StepId>) -> bool {
        if self.contains(id) {
            return false;
        }
        match after.and_then(|anchor| self.position(anchor)) {
            Some(index) => self.entries.insert(index + 1, id),
            None => self.entries.push(id),
        }
        true
    }

    /// Returns false if `id` was absent
    pub fn remove(&mut self, id: StepId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: StepId) -> bool {
        self.entries.contains(&id)
    }

    pub fn position(&self, id: StepId) -> Option<usize> {
        self.entries.iter().position(|&entry| entry == id)
    }

    pub fn first(&self) -> Option<StepId> {
        self.entries.first().copied()
    }

    /// Successor of `id`, wrapping from the last entry to the first
    pub fn next_of(&self, id: StepId) -> Option<StepId> {
        let index = self.position(id)?;
        Some(self.entries[(index + 1) % self.entries.len()])
    }

    /// Predecessor of `id`, wrapping from the first entry to the last
    pub fn prev_of(&self, id: StepId) -> Option<StepId> {
        let index = self.position(id)?;
        let len = self.entries.len();
        Some(self.entries[(index + len - 1) % len])
    }

    pub fn ids(&self) -> &[StepId] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<StepId> {
        raw.iter().map(|&i| StepId(i)).collect()
    }

    #[test]
    fn add_appends_without_anchor() {
        let mut route = Route::new();
        assert!(route.add(StepId(0), None));
        assert!(route.add(StepId(1), None));
        assert_eq!(route.ids(), ids(&[0, 1]).as_slice());
    }

    #[test]
    fn add_inserts_after_anchor() {
        let mut route = Route::from_ids(ids(&[0, 1, 2]));
        route.add(StepId(9), Some(StepId(0)));
        assert_eq!(route.ids(), ids(&[0, 9, 1, 2]).as_slice());
    }

    #[test]
    fn missing_anchor_appends() {
        let mut route = Route::from_ids(ids(&[0, 1]));
        route.add(StepId(5), Some(StepId(77)));
        assert_eq!(route.ids(), ids(&[0, 1, 5]).as_slice());
    }

    #[test]
    fn duplicates_are_rejected_on_insert() {
        let mut route = Route::from_ids(ids(&[0, 1, 0, 2, 1]));
        assert_eq!(route.ids(), ids(&[0, 1, 2]).as_slice());
        assert!(!route.add(StepId(2), Some(StepId(0))));
        assert_eq!(route.len(), 3);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut route = Route::from_ids(ids(&[0, 1]));
        assert!(!route.remove(StepId(4)));
        assert!(route.remove(StepId(0)));
        assert_eq!(route.ids(), ids(&[1]).as_slice());
    }

    #[test]
    fn neighbours_wrap_around() {
        let route = Route::from_ids(ids(&[0, 1, 2]));
        assert_eq!(route.next_of(StepId(2)), Some(StepId(0)));
        assert_eq!(route.prev_of(StepId(0)), Some(StepId(2)));
        assert_eq!(route.next_of(StepId(0)), Some(StepId(1)));
        assert_eq!(route.next_of(StepId(8)), None);
    }

    #[test]
    fn single_entry_is_its_own_neighbour() {
        let route = Route::from_ids(ids(&[4]));
        assert_eq!(route.next_of(StepId(4)), Some(StepId(4)));
        assert_eq!(route.prev_of(StepId(4)), Some(StepId(4)));
    }
}
