use crate::interaction::InteractionState;
use crate::lookup::LookupLinker;
use crate::project::{self, ChartPoint, TableRow, TimelineEntry};
use crate::result_set::ResultSet;
use crate::summary::summarize;
use crate::validate::{load_snapshot, LoadOutcome, MalformedSnapshot};
use tracing::debug;
use traceview_model::{ActiveView, HopRecord, Summary};

/// What the rendering layer should draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presentation<'a> {
    NoResults,
    Unavailable(&'a MalformedSnapshot),
    Results(&'a ResultSet),
}

/// Load boundary for one results view: the snapshot outcome plus the
/// interaction state, which is reset on every load.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    outcome: LoadOutcome,
    interaction: InteractionState,
}

impl ResultsView {
    pub fn new() -> Self {
        Self {
            outcome: LoadOutcome::NoResults,
            interaction: InteractionState::default(),
        }
    }

    pub fn from_snapshot(raw: Option<&str>) -> Self {
        let mut view = Self::new();
        view.load(raw);
        view
    }

    pub fn load(&mut self, raw: Option<&str>) {
        self.set_outcome(load_snapshot(raw));
    }

    pub fn load_results(&mut self, results: ResultSet) {
        let outcome = if results.is_empty() {
            LoadOutcome::NoResults
        } else {
            LoadOutcome::Loaded(results)
        };
        self.set_outcome(outcome);
    }

    fn set_outcome(&mut self, outcome: LoadOutcome) {
        let hop_count = match &outcome {
            LoadOutcome::Loaded(results) => results.len(),
            _ => 0,
        };
        debug!(hop_count, "results view loaded");
        self.outcome = outcome;
        self.interaction.reset(hop_count);
    }

    pub fn presentation(&self) -> Presentation<'_> {
        match &self.outcome {
            LoadOutcome::NoResults => Presentation::NoResults,
            LoadOutcome::Unavailable(err) => Presentation::Unavailable(err),
            LoadOutcome::Loaded(results) => Presentation::Results(results),
        }
    }

    pub fn results(&self) -> Option<&ResultSet> {
        match &self.outcome {
            LoadOutcome::Loaded(results) => Some(results),
            _ => None,
        }
    }

    pub fn summary(&self) -> Summary {
        self.results().map(summarize).unwrap_or_default()
    }

    pub fn timeline(&self) -> Vec<TimelineEntry<'_>> {
        self.results().map(project::timeline).unwrap_or_default()
    }

    pub fn chart(&self) -> Vec<ChartPoint> {
        self.results().map(project::chart).unwrap_or_default()
    }

    pub fn table(&self) -> Vec<TableRow> {
        self.results().map(project::table).unwrap_or_default()
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn active_view(&self) -> ActiveView {
        self.interaction.active_view()
    }

    pub fn select_view(&mut self, view: ActiveView) {
        self.interaction.select_view(view);
    }

    pub fn toggle_expand(&mut self, index: usize) -> Option<usize> {
        self.interaction.toggle_expand(index)
    }

    pub fn expanded_hop(&self) -> Option<&HopRecord> {
        let index = self.interaction.expanded()?;
        self.results()?.get(index)
    }

    pub fn expanded_lookup(&self, linker: &dyn LookupLinker) -> Option<String> {
        linker.lookup_ref(&self.expanded_hop()?.address)
    }
}

impl Default for ResultsView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{WhoisLinker, WHOIS_LOOKUP_BASE};

    const TWO_HOPS: &str = r#"[
        {"IP Address": "192.168.1.1", "Time": 1.5, "Anomaly": false},
        {"IP Address": "10.0.0.1", "Time": 30.0, "Anomaly": false}
    ]"#;

    #[test]
    fn load_resets_interaction() {
        let mut view = ResultsView::from_snapshot(Some(TWO_HOPS));
        view.select_view(ActiveView::Chart);
        view.toggle_expand(1);

        view.load(Some(TWO_HOPS));
        assert_eq!(view.active_view(), ActiveView::Timeline);
        assert_eq!(view.interaction().expanded(), None);
    }

    #[test]
    fn malformed_snapshot_exposes_no_results() {
        let view = ResultsView::from_snapshot(Some(r#"[{"IP Address": "a", "Anomaly": false}]"#));
        assert!(matches!(view.presentation(), Presentation::Unavailable(_)));
        assert!(view.results().is_none());
        assert!(view.table().is_empty());
        assert_eq!(view.summary(), Summary::default());
    }

    #[test]
    fn expanded_lookup_uses_expanded_hop() {
        let linker = WhoisLinker::new(WHOIS_LOOKUP_BASE).unwrap();
        let mut view = ResultsView::from_snapshot(Some(TWO_HOPS));
        assert_eq!(view.expanded_lookup(&linker), None);

        view.toggle_expand(1);
        assert_eq!(
            view.expanded_lookup(&linker).as_deref(),
            Some("https://who.is/whois-ip/ip-address/10.0.0.1")
        );
    }

    #[test]
    fn load_results_treats_empty_as_no_results() {
        let mut view = ResultsView::from_snapshot(Some(TWO_HOPS));
        view.load_results(ResultSet::empty());
        assert_eq!(view.presentation(), Presentation::NoResults);
        assert_eq!(view.interaction().hop_count(), 0);
    }
}
