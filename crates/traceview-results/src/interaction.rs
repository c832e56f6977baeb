use tracing::debug;
use traceview_model::ActiveView;

/// Active view and the single expanded hop, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionState {
    active_view: ActiveView,
    expanded: Option<usize>,
    hop_count: usize,
}

impl InteractionState {
    pub fn new(hop_count: usize) -> Self {
        Self {
            active_view: ActiveView::Timeline,
            expanded: None,
            hop_count,
        }
    }

    pub fn active_view(&self) -> ActiveView {
        self.active_view
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded == Some(index)
    }

    pub fn hop_count(&self) -> usize {
        self.hop_count
    }

    pub fn select_view(&mut self, view: ActiveView) {
        self.active_view = view;
    }

    /// Collapses `index` if it is expanded, otherwise expands it in place of
    /// any other hop. Indices past the last hop leave the state unchanged.
    pub fn toggle_expand(&mut self, index: usize) -> Option<usize> {
        if index >= self.hop_count {
            debug!(index, hop_count = self.hop_count, "ignoring toggle outside result set");
            return self.expanded;
        }

        self.expanded = if self.expanded == Some(index) {
            None
        } else {
            Some(index)
        };
        self.expanded
    }

    pub fn reset(&mut self, hop_count: usize) {
        *self = Self::new(hop_count);
    }
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_timeline_with_nothing_expanded() {
        let state = InteractionState::new(4);
        assert_eq!(state.active_view(), ActiveView::Timeline);
        assert_eq!(state.expanded(), None);
    }

    #[test]
    fn expanding_another_hop_collapses_the_previous_one() {
        let mut state = InteractionState::new(3);
        assert_eq!(state.toggle_expand(0), Some(0));
        assert_eq!(state.toggle_expand(2), Some(2));
        assert!(!state.is_expanded(0));
        assert_eq!(state.toggle_expand(2), None);
    }

    #[test]
    fn toggling_another_hop_twice_leaves_nothing_expanded() {
        let mut state = InteractionState::new(3);
        state.toggle_expand(0);
        assert_eq!(state.toggle_expand(1), Some(1));
        assert_eq!(state.toggle_expand(1), None);
    }

    #[test]
    fn select_view_keeps_expansion() {
        let mut state = InteractionState::new(3);
        state.toggle_expand(1);
        state.select_view(ActiveView::Table);
        assert_eq!(state.active_view(), ActiveView::Table);
        assert_eq!(state.expanded(), Some(1));
    }

    #[test]
    fn out_of_range_toggle_is_ignored() {
        let mut state = InteractionState::new(2);
        state.toggle_expand(1);
        assert_eq!(state.toggle_expand(2), Some(1));

        let mut empty = InteractionState::default();
        assert_eq!(empty.toggle_expand(0), None);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut state = InteractionState::new(3);
        state.select_view(ActiveView::Chart);
        state.toggle_expand(2);
        state.reset(5);
        assert_eq!(state, InteractionState::new(5));
    }
}
