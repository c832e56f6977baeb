use crate::validate::MalformedSnapshot;
use traceview_model::HopRecord;

/// Validated hops in measurement order. Hop number is index + 1.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    hops: Vec<HopRecord>,
}

impl ResultSet {
    pub fn new(hops: Vec<HopRecord>) -> Result<Self, MalformedSnapshot> {
        for (index, hop) in hops.iter().enumerate() {
            check_time(index, hop.time_ms)?;
        }
        Ok(Self { hops })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn hops(&self) -> &[HopRecord] {
        &self.hops
    }

    pub fn get(&self, index: usize) -> Option<&HopRecord> {
        self.hops.get(index)
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HopRecord> {
        self.hops.iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a HopRecord;
    type IntoIter = std::slice::Iter<'a, HopRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.hops.iter()
    }
}

pub(crate) fn check_time(index: usize, value: f64) -> Result<(), MalformedSnapshot> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MalformedSnapshot::InvalidTime { index, value })
    }
}
