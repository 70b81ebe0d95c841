//! Type aliases and common types.

use nalgebra::SVector;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 9-dimensional vector of per-decile values.
pub type Vector9 = SVector<f64, 9>;

/// Group identifier within a two-group dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    /// First group (minuend of every difference).
    Group1,
    /// Second group (subtrahend of every difference).
    Group2,
}

impl Group {
    /// Default display label.
    pub fn label(self) -> &'static str {
        match self {
            Group::Group1 => "Group1",
            Group::Group2 => "Group2",
        }
    }
}

/// One observation of a stacked two-group table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Observed value.
    pub value: f64,
    /// Which group the value belongs to.
    pub group: Group,
}

/// Two named samples, the input contract of the shift function and the
/// difference asymmetry function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoGroups {
    /// Display name of group 1.
    pub name1: String,
    /// Display name of group 2.
    pub name2: String,
    /// Observations of group 1.
    pub group1: Vec<f64>,
    /// Observations of group 2.
    pub group2: Vec<f64>,
}

impl TwoGroups {
    /// Pair two samples under the default names `Group1`/`Group2`.
    pub fn new(group1: Vec<f64>, group2: Vec<f64>) -> Self {
        Self {
            name1: Group::Group1.label().to_string(),
            name2: Group::Group2.label().to_string(),
            group1,
            group2,
        }
    }

    /// Override the display names.
    pub fn with_names(mut self, name1: impl Into<String>, name2: impl Into<String>) -> Self {
        self.name1 = name1.into();
        self.name2 = name2.into();
        self
    }

    /// Rebuild the two samples from a stacked table, preserving order within each group.
    pub fn from_observations(observations: &[Observation]) -> Result<Self> {
        let mut group1 = Vec::new();
        let mut group2 = Vec::new();
        for obs in observations {
            match obs.group {
                Group::Group1 => group1.push(obs.value),
                Group::Group2 => group2.push(obs.value),
            }
        }
        if group1.is_empty() || group2.is_empty() {
            return Err(Error::InvalidInput(
                "stacked table must contain observations for both groups".to_string(),
            ));
        }
        Ok(Self::new(group1, group2))
    }

    /// Stack both samples into one labeled table, group 1 first.
    pub fn stacked(&self) -> Vec<Observation> {
        self.group1
            .iter()
            .map(|&value| Observation {
                value,
                group: Group::Group1,
            })
            .chain(self.group2.iter().map(|&value| Observation {
                value,
                group: Group::Group2,
            }))
            .collect()
    }

    /// Sample of the given group.
    pub fn sample(&self, group: Group) -> &[f64] {
        match group {
            Group::Group1 => &self.group1,
            Group::Group2 => &self.group2,
        }
    }

    /// Display name of the given group.
    pub fn name(&self, group: Group) -> &str {
        match group {
            Group::Group1 => &self.name1,
            Group::Group2 => &self.name2,
        }
    }
}

/// A point estimate with its confidence bounds.
///
/// `lower <= estimate <= upper` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantileInterval {
    /// Point estimate.
    pub estimate: f64,
    /// Lower confidence bound.
    pub lower: f64,
    /// Upper confidence bound.
    pub upper: f64,
}

impl QuantileInterval {
    /// Pair an estimate with bounds.
    ///
    /// A percentile interval from a lopsided bootstrap distribution can miss
    /// its own point estimate; the violated bound is moved onto the estimate.
    pub fn new(estimate: f64, lower: f64, upper: f64) -> Self {
        Self {
            estimate,
            lower: lower.min(estimate),
            upper: upper.max(estimate),
        }
    }

    /// Whether `value` lies inside the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Interval width.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_roundtrip_keeps_order() {
        let data = TwoGroups::new(vec![1.0, 2.0, 3.0], vec![10.0, 20.0]);
        let stacked = data.stacked();
        assert_eq!(stacked.len(), 5);
        assert_eq!(stacked[3].group, Group::Group2);

        let rebuilt = TwoGroups::from_observations(&stacked).unwrap();
        assert_eq!(rebuilt, data);
    }

    #[test]
    fn test_from_observations_requires_both_groups() {
        let only_one = [Observation {
            value: 1.0,
            group: Group::Group1,
        }];
        assert!(TwoGroups::from_observations(&only_one).is_err());
    }

    #[test]
    fn test_interval_brackets_estimate() {
        let ci = QuantileInterval::new(2.0, 2.5, 3.0);
        assert_eq!(ci.lower, 2.0);
        assert!(ci.contains(2.0));
        assert!((ci.width() - 1.0).abs() < 1e-12);
    }
}
