//! Derivation of summaries, tiers and view projections from a results
//! snapshot, plus the interaction state that drives the views.

pub mod classify;
pub mod interaction;
pub mod lookup;
pub mod project;
pub mod result_set;
pub mod summary;
pub mod validate;
pub mod view;

pub use classify::{classify, exceeds_threshold, ELEVATED_THRESHOLD_MS, TIER_PRECEDENCE};
pub use interaction::InteractionState;
pub use lookup::{LookupBaseError, LookupLinker, WhoisLinker, WHOIS_LOOKUP_BASE};
pub use project::{chart, table, timeline, ChartPoint, TableRow, TimelineEntry};
pub use result_set::ResultSet;
pub use summary::summarize;
pub use validate::{load_snapshot, validate_snapshot, LoadOutcome, MalformedSnapshot};
pub use view::{Presentation, ResultsView};
