pub mod browse;
pub mod draw;

pub use browse::run_browser;
pub use draw::{render_results, render_summary, DrawOpts};
