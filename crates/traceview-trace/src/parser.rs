use anyhow::{anyhow, Result};
use tracing::debug;
use traceview_model::HopRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTrace {
    pub target: Option<String>,
    pub hops: Vec<HopRecord>,
}

/// One numbered hop line, possibly completed by continuation lines.
#[derive(Debug, Clone, PartialEq)]
pub struct HopLine {
    pub ttl: u32,
    pub address: Option<String>,
    pub time_ms: Option<f64>,
}

impl HopLine {
    /// Hops need both an address and a time to enter a snapshot. The
    /// anomaly flag is left for the upstream detector.
    pub fn into_record(self) -> Option<HopRecord> {
        match (self.address, self.time_ms) {
            (Some(address), Some(time_ms)) => Some(HopRecord::new(address, time_ms, false)),
            _ => None,
        }
    }
}

pub fn parse_traceroute(text: &str) -> Result<ParsedTrace> {
    let mut target: Option<String> = None;
    let mut saw_header = false;
    let mut lines: Vec<HopLine> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.to_ascii_lowercase().starts_with("traceroute") {
            saw_header = true;
            if target.is_none() {
                target = parse_target(line);
            }
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(first_token) = tokens.first() else {
            continue;
        };

        if first_token.chars().all(|c| c.is_ascii_digit()) {
            lines.push(parse_hop_line(line)?);
            continue;
        }

        if let Some(current) = lines.last_mut() {
            if is_probe_line(&tokens) {
                append_probe_tokens(&tokens, current);
            }
        }
    }

    if !saw_header && lines.is_empty() {
        return Err(anyhow!("no traceroute output found"));
    }

    let mut hops = Vec::with_capacity(lines.len());
    for line in lines {
        let ttl = line.ttl;
        match line.into_record() {
            Some(hop) => hops.push(hop),
            None => debug!(ttl, "skipping hop without address or time"),
        }
    }

    Ok(ParsedTrace { target, hops })
}

pub fn parse_hop_line(line: &str) -> Result<HopLine> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(anyhow!("empty hop line"));
    }

    let ttl: u32 = tokens[0]
        .parse()
        .map_err(|_| anyhow!("invalid ttl token: {}", tokens[0]))?;

    let mut hop = HopLine {
        ttl,
        address: None,
        time_ms: None,
    };
    append_probe_tokens(&tokens[1..], &mut hop);

    Ok(hop)
}

fn parse_target(line: &str) -> Option<String> {
    if let Some(start) = line.find('(') {
        if let Some(end) = line[start + 1..].find(')') {
            let inside = line[start + 1..start + 1 + end].trim();
            if !inside.is_empty() {
                return Some(inside.to_string());
            }
        }
    }

    let lower = line.to_ascii_lowercase();
    let idx = lower.find(" to ")?;
    let token = line[idx + " to ".len()..]
        .split(|c: char| c.is_whitespace() || c == ',')
        .next()?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Only the first address and the first answered probe of a hop are kept.
fn append_probe_tokens(tokens: &[&str], hop: &mut HopLine) {
    let mut i = 0;
    while i < tokens.len() {
        let tok = tokens[i];

        if tok == "*" || tok.starts_with('!') {
            i += 1;
            continue;
        }

        if let Some(address) = address_token(tok) {
            if hop.address.is_none() {
                hop.address = Some(address.to_string());
            }
            i += 1;
            continue;
        }

        let next = tokens.get(i + 1).copied();
        if let Some((val, consumed_next)) = parse_rtt(tok, next) {
            if hop.time_ms.is_none() {
                hop.time_ms = Some(val);
            }
            i += if consumed_next { 2 } else { 1 };
            continue;
        }

        i += 1;
    }
}

/// Continuation lines start with `*` or an address, or name a host
/// followed by its parenthesized address.
fn is_probe_line(tokens: &[&str]) -> bool {
    tokens
        .iter()
        .any(|tok| *tok == "*" || address_token(tok).is_some())
}

/// Bare numeric addresses (`-n` output) or the parenthesized form that
/// follows a resolved host name.
fn address_token(token: &str) -> Option<&str> {
    let inner = token
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(token);

    if inner.ends_with("ms") {
        return None;
    }

    if is_ipv4(inner) || is_ipv6(inner) {
        Some(inner)
    } else {
        None
    }
}

fn is_ipv4(token: &str) -> bool {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 4 {
        return false;
    }

    parts.iter().all(|part| {
        !part.is_empty()
            && part.len() <= 3
            && part.chars().all(|c| c.is_ascii_digit())
            && part.parse::<u8>().is_ok()
    })
}

fn is_ipv6(token: &str) -> bool {
    token.contains(':') && token.chars().all(|c| c.is_ascii_hexdigit() || c == ':')
}

fn parse_rtt(token: &str, next: Option<&str>) -> Option<(f64, bool)> {
    if let Some(num) = token.strip_suffix("ms") {
        if let Some(val) = rtt_value(num) {
            return Some((val, false));
        }
    }

    if let Some(val) = rtt_value(token) {
        if matches!(next, Some(next_tok) if next_tok.starts_with("ms")) {
            return Some((val, true));
        }
    }

    None
}

/// Plain decimal digits only, so `nan`, `inf` and signed values never
/// become a round-trip time.
fn rtt_value(num: &str) -> Option<f64> {
    let mut parts = num.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let frac = parts.next().unwrap_or_default();
    let digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if whole.is_empty() || !digits(whole) || !digits(frac) {
        return None;
    }

    num.parse::<f64>().ok().filter(|val| val.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_target_from_header() {
        let line = "traceroute to example.net (93.184.216.34), 30 hops max";
        assert_eq!(parse_target(line), Some("93.184.216.34".to_string()));
        assert_eq!(
            parse_target("traceroute to 9.9.9.9, 30 hops max"),
            Some("9.9.9.9".to_string())
        );
    }

    #[test]
    fn hop_line_takes_first_address_and_time() {
        let hop = parse_hop_line("7  host.example (192.0.2.1)  3.5 ms  2.0 ms").unwrap();
        assert_eq!(hop.ttl, 7);
        assert_eq!(hop.address.as_deref(), Some("192.0.2.1"));
        assert_eq!(hop.time_ms, Some(3.5));
    }

    #[test]
    fn hop_line_rejects_bad_ttl() {
        assert!(parse_hop_line("x1  10.0.0.1  1.0 ms").is_err());
    }

    #[test]
    fn unanswered_hop_has_no_record() {
        let hop = parse_hop_line("3  * * *").unwrap();
        assert_eq!(hop.into_record(), None);
    }

    #[test]
    fn rejects_text_without_traceroute_output() {
        assert!(parse_traceroute("hello\nworld").is_err());
        assert!(parse_traceroute("").is_err());
    }

    #[test]
    fn rtt_forms() {
        assert_eq!(parse_rtt("1.5ms", None), Some((1.5, false)));
        assert_eq!(parse_rtt("1.5", Some("ms")), Some((1.5, true)));
        assert_eq!(parse_rtt("1.5", Some("!H")), None);
        assert_eq!(parse_rtt("12", Some("ms")), Some((12.0, true)));
        assert_eq!(address_token("(10.0.0.1)"), Some("10.0.0.1"));
        assert_eq!(address_token("10.0.0.256"), None);
    }

    #[test]
    fn rtt_rejects_non_decimal_values() {
        assert_eq!(parse_rtt("nan", Some("ms")), None);
        assert_eq!(parse_rtt("inf", Some("ms")), None);
        assert_eq!(parse_rtt("-3.0", Some("ms")), None);
        assert_eq!(parse_rtt("+3.0ms", None), None);
        assert_eq!(parse_rtt("1e3ms", None), None);
        assert_eq!(parse_rtt(".5ms", None), None);
    }

    #[test]
    fn hops_with_nonsense_times_are_dropped() {
        let text = " 1  10.0.0.1  nan ms\n 2  10.0.0.2  -3.0 ms\n 3  10.0.0.3  inf ms\n 4  10.0.0.4  4.25 ms";
        let trace = parse_traceroute(text).unwrap();
        assert_eq!(trace.hops.len(), 1);
        assert_eq!(trace.hops[0].address, "10.0.0.4");
        assert_eq!(trace.hops[0].time_ms, 4.25);
        assert!(trace.hops.iter().all(|hop| hop.time_ms.is_finite() && hop.time_ms >= 0.0));
    }
}
