//! Conversion of raw traceroute output into results snapshots.

pub mod parser;

pub use parser::{parse_hop_line, parse_traceroute, ParsedTrace};
