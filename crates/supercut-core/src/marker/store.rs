//! Marker store - ordered marker collection with active-marker tracking
//!
//! Markers are kept sorted by start time. The active marker is tracked by a
//! [`MarkerHandle`] rather than a position, so its identity survives sorting
//! and removals; its index is looked up on demand.

use super::Marker;
use crate::types::NAVIGATION_EPSILON;

/// Stable identity of a marker inside a [`MarkerStore`]
///
/// `generation` changes whenever the store is cleared, so handles taken
/// before a clear never resolve to markers created after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle {
    id: u32,
    generation: u32,
}

/// Direction for time-based navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Previous,
    Next,
}

#[derive(Debug, Clone)]
struct Entry {
    handle: MarkerHandle,
    marker: Marker,
}

/// Ordered collection of markers
#[derive(Debug, Clone, Default)]
pub struct MarkerStore {
    entries: Vec<Entry>,
    next_id: u32,
    generation: u32,
    active: Option<MarkerHandle>,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Markers in store order
    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.entries.iter().map(|e| &e.marker)
    }

    pub fn get(&self, index: usize) -> Option<&Marker> {
        self.entries.get(index).map(|e| &e.marker)
    }

    /// Mutable access by position
    ///
    /// Changing a marker's start may break the ordering until the next
    /// [`MarkerStore::sort_by_start`].
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Marker> {
        self.entries.get_mut(index).map(|e| &mut e.marker)
    }

    pub fn handle_at(&self, index: usize) -> Option<MarkerHandle> {
        self.entries.get(index).map(|e| e.handle)
    }

    /// Current position of a handle, `None` once the marker is gone
    pub fn index_of(&self, handle: MarkerHandle) -> Option<usize> {
        self.entries.iter().position(|e| e.handle == handle)
    }

    pub fn resolve(&self, handle: MarkerHandle) -> Option<&Marker> {
        self.index_of(handle).map(|i| &self.entries[i].marker)
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Insert a marker and restore start ordering
    pub fn add(&mut self, marker: Marker) -> MarkerHandle {
        let handle = MarkerHandle {
            id: self.next_id,
            generation: self.generation,
        };
        self.next_id = self.next_id.wrapping_add(1);
        log::debug!(
            "MarkerStore::add: {:.3}-{:.3} (silent={})",
            marker.start(),
            marker.end(),
            marker.is_silent
        );
        self.entries.push(Entry { handle, marker });
        self.sort_by_start();
        handle
    }

    /// Remove the marker at `index`
    ///
    /// Removing the active marker leaves none active. Markers before the
    /// active one shift its index down by one; markers after it leave it
    /// unchanged. The store re-sorts afterwards.
    pub fn remove(&mut self, index: usize) -> Option<Marker> {
        if index >= self.entries.len() {
            log::warn!("MarkerStore::remove: index {} out of range", index);
            return None;
        }
        let entry = self.entries.remove(index);
        if self.active == Some(entry.handle) {
            self.active = None;
        }
        self.sort_by_start();
        Some(entry.marker)
    }

    /// Stable sort by start time; the active marker keeps its identity
    pub fn sort_by_start(&mut self) {
        self.entries
            .sort_by(|a, b| a.marker.start().total_cmp(&b.marker.start()));
    }

    pub fn is_sorted(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| w[0].marker.start() <= w[1].marker.start())
    }

    /// Keep only markers matching `keep`, returning how many were removed
    pub fn retain(&mut self, mut keep: impl FnMut(&Marker) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| keep(&e.marker));
        if let Some(active) = self.active {
            if self.index_of(active).is_none() {
                self.active = None;
            }
        }
        before - self.entries.len()
    }

    /// Remove every marker and invalidate all outstanding handles
    pub fn clear(&mut self) {
        self.entries.clear();
        self.active = None;
        self.next_id = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Replace the contents wholesale (project import)
    pub fn replace_all(&mut self, markers: impl IntoIterator<Item = Marker>) {
        self.clear();
        for marker in markers {
            self.add(marker);
        }
    }

    // -------------------------------------------------------------------------
    // Active marker
    // -------------------------------------------------------------------------

    /// Make the marker at `index` active, or clear with `None`
    ///
    /// An out-of-range index clears the active marker.
    pub fn set_active(&mut self, index: Option<usize>) -> Option<MarkerHandle> {
        self.active = index.and_then(|i| self.handle_at(i));
        self.active
    }

    pub fn active_handle(&self) -> Option<MarkerHandle> {
        self.active
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.and_then(|h| self.index_of(h))
    }

    pub fn active(&self) -> Option<&Marker> {
        self.active_index().map(|i| &self.entries[i].marker)
    }

    pub fn active_mut(&mut self) -> Option<&mut Marker> {
        let index = self.active_index()?;
        Some(&mut self.entries[index].marker)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Index of the first marker matching `predicate`
    pub fn find(&self, predicate: impl Fn(&Marker) -> bool) -> Option<usize> {
        self.entries.iter().position(|e| predicate(&e.marker))
    }

    /// Case-insensitive search on each marker's label
    ///
    /// Returns `(index, marker)` pairs. An empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<(usize, &Marker)> {
        let needle = term.trim().to_lowercase();
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                needle.is_empty()
                    || e.marker
                        .label()
                        .is_some_and(|label| label.to_lowercase().contains(&needle))
            })
            .map(|(i, e)| (i, &e.marker))
            .collect()
    }

    pub fn silent_count(&self) -> usize {
        self.entries.iter().filter(|e| e.marker.is_silent).count()
    }

    /// Navigate from `time` among markers accepted by `filter`
    ///
    /// Previous is the last marker starting before `time - epsilon`, next is
    /// the first starting after `time + epsilon`. Both wrap around.
    pub fn navigate(
        &self,
        time: f64,
        direction: NavDirection,
        epsilon: f64,
        filter: impl Fn(&Marker) -> bool,
    ) -> Option<usize> {
        let candidates: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| filter(&e.marker))
            .map(|(i, _)| i)
            .collect();

        match direction {
            NavDirection::Previous => candidates
                .iter()
                .rev()
                .find(|&&i| self.entries[i].marker.start() < time - epsilon)
                .or_else(|| candidates.last())
                .copied(),
            NavDirection::Next => candidates
                .iter()
                .find(|&&i| self.entries[i].marker.start() > time + epsilon)
                .or_else(|| candidates.first())
                .copied(),
        }
    }

    /// Previous marker from `time`, wrapping to the last
    pub fn previous_from_time(&self, time: f64) -> Option<usize> {
        self.navigate(time, NavDirection::Previous, NAVIGATION_EPSILON, |_| true)
    }

    /// Next marker from `time`, wrapping to the first
    pub fn next_from_time(&self, time: f64) -> Option<usize> {
        self.navigate(time, NavDirection::Next, NAVIGATION_EPSILON, |_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(bounds: &[(f64, f64)]) -> MarkerStore {
        let mut store = MarkerStore::new();
        for &(s, e) in bounds {
            store.add(Marker::new(s, e));
        }
        store
    }

    fn starts(store: &MarkerStore) -> Vec<f64> {
        store.iter().map(|m| m.start()).collect()
    }

    #[test]
    fn test_add_keeps_sorted() {
        let store = store_with(&[(30.0, 35.0), (10.0, 12.0), (20.0, 25.0)]);
        assert_eq!(starts(&store), vec![10.0, 20.0, 30.0]);
        assert!(store.is_sorted());
    }

    #[test]
    fn test_active_survives_sort() {
        let mut store = store_with(&[(10.0, 12.0), (20.0, 25.0), (30.0, 35.0)]);
        store.set_active(Some(2));
        store.get_mut(2).unwrap().set_bounds(5.0, 8.0);
        store.sort_by_start();
        assert_eq!(store.active_index(), Some(0));
        assert_eq!(store.active().unwrap().start(), 5.0);
    }

    #[test]
    fn test_remove_active_clears() {
        let mut store = store_with(&[(10.0, 12.0), (20.0, 25.0), (30.0, 35.0)]);
        store.set_active(Some(1));
        store.remove(1);
        assert_eq!(store.active_index(), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove_before_active_decrements() {
        let mut store = store_with(&[(10.0, 12.0), (20.0, 25.0), (30.0, 35.0)]);
        store.set_active(Some(2));
        store.remove(0);
        assert_eq!(store.active_index(), Some(1));
        assert_eq!(store.active().unwrap().start(), 30.0);
    }

    #[test]
    fn test_remove_after_active_unchanged() {
        let mut store = store_with(&[(10.0, 12.0), (20.0, 25.0), (30.0, 35.0)]);
        store.set_active(Some(0));
        store.remove(2);
        assert_eq!(store.active_index(), Some(0));
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut store = store_with(&[(10.0, 12.0)]);
        assert!(store.remove(5).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_set_active_out_of_range_clears() {
        let mut store = store_with(&[(10.0, 12.0)]);
        store.set_active(Some(0));
        store.set_active(Some(9));
        assert_eq!(store.active_index(), None);
    }

    #[test]
    fn test_clear_invalidates_handles() {
        let mut store = store_with(&[(10.0, 12.0)]);
        let old = store.handle_at(0).unwrap();
        store.clear();
        store.add(Marker::new(1.0, 2.0));
        assert!(store.resolve(old).is_none());
    }

    #[test]
    fn test_retain_drops_active() {
        let mut store = MarkerStore::new();
        store.add(Marker::new(1.0, 2.0));
        store.add(Marker::silent(3.0, 4.0, 1));
        store.set_active(Some(1));
        let removed = store.retain(|m| !m.is_silent);
        assert_eq!(removed, 1);
        assert_eq!(store.active_index(), None);
    }

    #[test]
    fn test_navigation_wraps() {
        let store = store_with(&[(10.0, 12.0), (20.0, 25.0), (30.0, 35.0)]);
        assert_eq!(store.next_from_time(15.0), Some(1));
        assert_eq!(store.next_from_time(31.0), Some(0));
        assert_eq!(store.previous_from_time(25.0), Some(1));
        assert_eq!(store.previous_from_time(5.0), Some(2));
    }

    #[test]
    fn test_navigation_epsilon() {
        let store = store_with(&[(10.0, 12.0), (20.0, 25.0)]);
        // Sitting just past a marker's start does not count as "after" it
        assert_eq!(store.previous_from_time(10.05), Some(1));
        assert_eq!(store.next_from_time(9.95), Some(1));
    }

    #[test]
    fn test_navigation_is_cyclic() {
        let store = store_with(&[(10.0, 12.0), (20.0, 25.0), (30.0, 35.0), (40.0, 41.0)]);
        let mut time = 0.0;
        let mut visited = Vec::new();
        for _ in 0..store.len() {
            let index = store.next_from_time(time).unwrap();
            visited.push(index);
            time = store.get(index).unwrap().start();
        }
        assert_eq!(visited, vec![0, 1, 2, 3]);
        assert_eq!(store.next_from_time(time), Some(0));

        time = 100.0;
        let mut back = Vec::new();
        for _ in 0..store.len() {
            let index = store.previous_from_time(time).unwrap();
            back.push(index);
            time = store.get(index).unwrap().start();
        }
        assert_eq!(back, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_navigation_empty() {
        let store = MarkerStore::new();
        assert_eq!(store.next_from_time(1.0), None);
        assert_eq!(store.previous_from_time(1.0), None);
    }

    #[test]
    fn test_filtered_navigation() {
        let mut store = MarkerStore::new();
        store.add(Marker::new(10.0, 12.0));
        store.add(Marker::silent(20.0, 21.0, 1));
        store.add(Marker::new(30.0, 32.0));
        let next = store.navigate(0.0, NavDirection::Next, 0.0, |m| m.is_silent);
        assert_eq!(next, Some(1));
        let prev = store.navigate(15.0, NavDirection::Previous, 0.1, |m| m.is_silent);
        assert_eq!(prev, Some(1));
    }

    #[test]
    fn test_search_case_insensitive() {
        let mut store = MarkerStore::new();
        store.add(Marker::new(1.0, 2.0).with_label("Intro Theme"));
        store.add(Marker::new(3.0, 4.0).with_label("outro"));
        store.add(Marker::new(5.0, 6.0));
        let hits = store.search("INTRO");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, 0);
        assert_eq!(store.search("").len(), 3);
    }
}
