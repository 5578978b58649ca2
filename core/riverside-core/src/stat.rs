use crate::world::commons::HealthStatus;

use std::{
    fmt,
    ops::{Index, IndexMut},
    path::Path,
};

use anyhow::Context;
use enum_map::{Enum, EnumMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthDiff {
    pub from: HealthStatus,
    pub to: HealthStatus,
}

impl HealthDiff {
    pub fn new(from: HealthStatus, to: HealthStatus) -> Self {
        Self { from, to }
    }
}

#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct HealthCount(EnumMap<HealthStatus, u32>);

impl HealthCount {
    pub fn from_statuses<I: IntoIterator<Item = HealthStatus>>(statuses: I) -> Self {
        let mut count = Self::default();
        for s in statuses {
            count[&s] += 1;
        }
        count
    }

    pub fn apply_difference(&mut self, hd: HealthDiff) {
        self.0[&hd.from] -= 1;
        self.0[&hd.to] += 1;
    }

    pub fn n_infected(&self) -> u32 {
        self.0[&HealthStatus::Infected]
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HealthStatus, u32)> + '_ {
        self.0.iter().map(|(h, n)| (h, *n))
    }
}

impl fmt::Display for HealthCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (h, n) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{h}: {n}")?;
            first = false;
        }
        Ok(())
    }
}

impl<'a> Index<&'a HealthStatus> for HealthCount {
    type Output = u32;

    fn index(&self, index: &'a HealthStatus) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IndexMut<&'a HealthStatus> for HealthCount {
    fn index_mut(&mut self, index: &'a HealthStatus) -> &mut Self::Output {
        &mut self.0[index]
    }
}

/// Per-tick history of health counts, stored column-wise.
#[derive(Default, Debug)]
pub struct HealthStat(EnumMap<HealthStatus, Vec<u32>>);

impl HealthStat {
    pub fn push(&mut self, count: &HealthCount) {
        for health in &HealthStatus::ALL {
            self.0[health].push(count[health]);
        }
    }

    pub fn len(&self) -> usize {
        self.0[&HealthStatus::Healthy].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn series(&self, health: &HealthStatus) -> &[u32] {
        &self.0[health]
    }

    pub fn get(&self, step: usize) -> Option<HealthCount> {
        if step >= self.len() {
            return None;
        }
        let mut count = HealthCount::default();
        for (h, column) in self.0.iter() {
            count[&h] = column[step];
        }
        Some(count)
    }

    pub fn clear(&mut self) {
        for column in self.0.values_mut() {
            column.clear();
        }
    }

    /// Writes one CSV row per recorded step, headed by `step` and the status names.
    pub fn export(&self, path: &Path) -> anyhow::Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        let mut header = vec!["step"];
        header.extend(HealthStatus::ALL.iter().map(|h| -> &'static str { h.into() }));
        writer.write_record(&header)?;
        for step in 0..self.len() {
            let mut row = Vec::with_capacity(HealthStatus::LEN + 1);
            row.push(step.to_string());
            row.extend(self.0.values().map(|column| column[step].to_string()));
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{HealthCount, HealthDiff, HealthStat};
    use crate::world::commons::HealthStatus;

    fn sample() -> HealthCount {
        HealthCount::from_statuses([
            HealthStatus::Healthy,
            HealthStatus::Healthy,
            HealthStatus::Infected,
        ])
    }

    #[test]
    fn test_apply_difference_keeps_total() {
        let mut c = sample();
        c.apply_difference(HealthDiff::new(HealthStatus::Healthy, HealthStatus::Infected));
        assert_eq!(c[&HealthStatus::Healthy], 1);
        assert_eq!(c.n_infected(), 2);
        assert_eq!(c.total(), 3);
    }

    #[test]
    fn test_display_lists_every_status() {
        assert_eq!(
            sample().to_string(),
            "healthy: 2, infected: 1, recovered: 0, dead: 0"
        );
    }

    #[test]
    fn test_history_roundtrips_counts() {
        let mut stat = HealthStat::default();
        stat.push(&sample());
        let mut next = sample();
        next.apply_difference(HealthDiff::new(HealthStatus::Infected, HealthStatus::Dead));
        stat.push(&next);
        assert_eq!(stat.len(), 2);
        assert_eq!(stat.get(1), Some(next));
        assert_eq!(stat.series(&HealthStatus::Dead), &[0, 1]);
        assert!(stat.get(2).is_none());
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let mut stat = HealthStat::default();
        stat.push(&sample());
        let path = std::env::temp_dir().join(format!("riverside_stat_{}.csv", std::process::id()));
        stat.export(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("step,healthy,infected,recovered,dead"));
        assert_eq!(lines.next(), Some("0,2,1,0,0"));
        assert_eq!(lines.next(), None);
    }
}
