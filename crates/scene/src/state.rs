use foundation::RecordId;

use crate::dataset::Dataset;
use crate::filter::Filter;
use crate::record::Record;

/// What happens to the expanded record when a filter change hides it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum OrphanPolicy {
    /// Collapse it; the detail panel never shows a record the list hides.
    #[default]
    AutoClose,
    /// Leave it expanded.
    KeepOpen,
}

/// Outcome of one state transition, for event logs and re-render decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    FilterChanged { collapsed: Option<RecordId> },
    Expanded { id: RecordId, replaced: Option<RecordId> },
    Collapsed(RecordId),
    Hovered(RecordId),
    Unhovered,
    Unchanged,
}

/// UI state of one page: `{ filter, expanded, hovered }`.
///
/// Every transition is accepted and every state is reachable from every
/// other. At most one record is expanded at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState<T> {
    filter: Filter<T>,
    expanded: Option<RecordId>,
    hovered: Option<RecordId>,
    policy: OrphanPolicy,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self {
            filter: Filter::All,
            expanded: None,
            hovered: None,
            policy: OrphanPolicy::default(),
        }
    }
}

impl<T: Clone + Eq + Ord + std::fmt::Debug> PageState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: OrphanPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn filter(&self) -> &Filter<T> {
        &self.filter
    }

    pub fn expanded(&self) -> Option<RecordId> {
        self.expanded
    }

    pub fn hovered(&self) -> Option<RecordId> {
        self.hovered
    }

    pub fn policy(&self) -> OrphanPolicy {
        self.policy
    }

    pub fn is_expanded(&self, id: RecordId) -> bool {
        self.expanded == Some(id)
    }

    /// Applies `filter`. Under `AutoClose` an expanded record that no longer
    /// matches is collapsed; a hovered record that no longer matches is
    /// always cleared, since its list row is gone.
    pub fn select_filter<R>(&mut self, dataset: &Dataset<R>, filter: Filter<T>) -> Transition
    where
        R: Record<Tag = T>,
    {
        if self.filter == filter {
            return Transition::Unchanged;
        }
        self.filter = filter;

        let hidden = |id: RecordId| {
            dataset
                .get(id)
                .is_none_or(|r| !self.filter.matches(r.tag()))
        };

        if self.hovered.is_some_and(hidden) {
            self.hovered = None;
        }

        let mut collapsed = None;
        if self.policy == OrphanPolicy::AutoClose
            && let Some(id) = self.expanded
            && hidden(id)
        {
            self.expanded = None;
            collapsed = Some(id);
        }

        Transition::FilterChanged { collapsed }
    }

    /// Expands `id`, or collapses it if it is already the expanded record.
    pub fn toggle_expand(&mut self, id: RecordId) -> Transition {
        if self.expanded == Some(id) {
            self.expanded = None;
            return Transition::Collapsed(id);
        }
        let replaced = self.expanded.replace(id);
        Transition::Expanded { id, replaced }
    }

    pub fn hover(&mut self, id: RecordId) -> Transition {
        if self.hovered == Some(id) {
            return Transition::Unchanged;
        }
        self.hovered = Some(id);
        Transition::Hovered(id)
    }

    pub fn unhover(&mut self) -> Transition {
        if self.hovered.take().is_some() {
            Transition::Unhovered
        } else {
            Transition::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{OrphanPolicy, PageState, Transition};
    use crate::dataset::Dataset;
    use crate::filter::Filter;
    use crate::record::testing::{Era, Event};
    use foundation::RecordId;

    fn dataset() -> Dataset<Event> {
        Dataset::new(
            (1..=8)
                .map(|i| Event::new(i, i64::from(i), if i % 2 == 0 { Era::A } else { Era::B }))
                .collect(),
        )
        .expect("dataset")
    }

    #[test]
    fn expanding_then_clicking_again_collapses() {
        let mut s: PageState<Era> = PageState::new();
        assert_eq!(
            s.toggle_expand(RecordId(5)),
            Transition::Expanded {
                id: RecordId(5),
                replaced: None
            }
        );
        assert_eq!(s.expanded(), Some(RecordId(5)));
        assert_eq!(s.toggle_expand(RecordId(5)), Transition::Collapsed(RecordId(5)));
        assert_eq!(s.expanded(), None);
    }

    #[test]
    fn expanding_another_record_replaces_the_first() {
        let mut s: PageState<Era> = PageState::new();
        s.toggle_expand(RecordId(5));
        assert_eq!(
            s.toggle_expand(RecordId(7)),
            Transition::Expanded {
                id: RecordId(7),
                replaced: Some(RecordId(5))
            }
        );
        assert_eq!(s.expanded(), Some(RecordId(7)));
        assert!(!s.is_expanded(RecordId(5)));
    }

    #[test]
    fn double_toggle_restores_previous_state() {
        for start in [None, Some(RecordId(2)), Some(RecordId(3))] {
            for id in [RecordId(2), RecordId(3)] {
                let mut s: PageState<Era> = PageState::new();
                if let Some(e) = start {
                    s.toggle_expand(e);
                }
                let before = s.clone();
                s.toggle_expand(id);
                s.toggle_expand(id);
                if start == Some(id) || start.is_none() {
                    assert_eq!(s, before, "start={start:?} id={id:?}");
                } else {
                    // A different record was open: the first click replaced it,
                    // the second closed the new one.
                    assert_eq!(s.expanded(), None);
                }
            }
        }
    }

    #[test]
    fn filter_change_auto_closes_hidden_record() {
        let ds = dataset();
        let mut s = PageState::new();
        s.toggle_expand(RecordId(5)); // Era::B
        assert_eq!(
            s.select_filter(&ds, Filter::Only(Era::A)),
            Transition::FilterChanged {
                collapsed: Some(RecordId(5))
            }
        );
        assert_eq!(s.expanded(), None);
    }

    #[test]
    fn filter_change_keeps_visible_record_open() {
        let ds = dataset();
        let mut s = PageState::new();
        s.toggle_expand(RecordId(4)); // Era::A
        assert_eq!(
            s.select_filter(&ds, Filter::Only(Era::A)),
            Transition::FilterChanged { collapsed: None }
        );
        assert_eq!(s.expanded(), Some(RecordId(4)));
    }

    #[test]
    fn keep_open_policy_leaves_orphan_expanded() {
        let ds = dataset();
        let mut s = PageState::with_policy(OrphanPolicy::KeepOpen);
        s.toggle_expand(RecordId(5));
        s.select_filter(&ds, Filter::Only(Era::A));
        assert_eq!(s.expanded(), Some(RecordId(5)));
    }

    #[test]
    fn hover_is_cleared_when_filtered_out() {
        let ds = dataset();
        let mut s = PageState::new();
        assert_eq!(s.hover(RecordId(3)), Transition::Hovered(RecordId(3)));
        assert_eq!(s.hover(RecordId(3)), Transition::Unchanged);
        s.select_filter(&ds, Filter::Only(Era::A));
        assert_eq!(s.hovered(), None);
        assert_eq!(s.unhover(), Transition::Unchanged);
        s.hover(RecordId(4));
        assert_eq!(s.unhover(), Transition::Unhovered);
    }

    #[test]
    fn selecting_the_same_filter_is_unchanged() {
        let ds = dataset();
        let mut s = PageState::new();
        assert_eq!(s.select_filter(&ds, Filter::All), Transition::Unchanged);
        s.select_filter(&ds, Filter::Only(Era::B));
        assert_eq!(s.filter(), &Filter::Only(Era::B));
        assert_eq!(
            s.select_filter(&ds, Filter::All),
            Transition::FilterChanged { collapsed: None }
        );
    }

    #[test]
    fn every_state_is_reachable() {
        let ds = dataset();
        let mut s = PageState::new();
        s.select_filter(&ds, Filter::Only(Era::B));
        s.toggle_expand(RecordId(1));
        s.hover(RecordId(3));
        assert_eq!(s.filter(), &Filter::Only(Era::B));
        assert_eq!(s.expanded(), Some(RecordId(1)));
        assert_eq!(s.hovered(), Some(RecordId(3)));

        s.select_filter(&ds, Filter::All);
        s.toggle_expand(RecordId(1));
        s.unhover();
        assert_eq!(s, PageState::new());
    }
}
