//! Quality-indicator summaries.

use crate::constants::UNSPECIFIED_LABEL;
use crate::filter::Filter;
use crate::model::{Indicator, IndicatorKind, IndicatorType, Shift};
use serde::{Deserialize, Serialize};

/// Type and shift selectors of the indicators view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorFilter {
    #[serde(default, rename = "type")]
    pub indicator_type: Filter<IndicatorType>,
    #[serde(default)]
    pub shift: Filter<Shift>,
}

impl IndicatorFilter {
    pub fn matches(&self, indicator: &Indicator) -> bool {
        self.indicator_type.matches(&indicator.kind.indicator_type())
            && self.shift.matches(&indicator.shift)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
    pub lpp: usize,
    pub falls: usize,
    pub extubation: usize,
    pub medication: usize,
}

/// One bucket of a grouping, with its share of the group in percent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupCount {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShiftShare {
    pub shift: Shift,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSummary {
    pub filter: IndicatorFilter,
    pub indicators: Vec<Indicator>,
    pub counts: TypeCounts,
    pub lpp_by_location: Vec<GroupCount>,
    pub falls_by_type: Vec<GroupCount>,
    /// Computed over every indicator, regardless of the filter.
    pub shift_distribution: Vec<ShiftShare>,
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Buckets labels by first appearance.
fn group<'a>(labels: impl Iterator<Item = Option<&'a str>>) -> Vec<GroupCount> {
    let mut buckets: Vec<(String, usize)> = Vec::new();
    let mut total = 0;
    for label in labels {
        let label = label.filter(|l| !l.is_empty()).unwrap_or(UNSPECIFIED_LABEL);
        total += 1;
        match buckets.iter_mut().find(|(l, _)| l == label) {
            Some((_, count)) => *count += 1,
            None => buckets.push((label.to_string(), 1)),
        }
    }
    buckets
        .into_iter()
        .map(|(label, count)| GroupCount {
            label,
            count,
            percentage: percentage(count, total),
        })
        .collect()
}

#[derive(Clone, Debug, Default)]
pub struct IndicatorBoard {
    indicators: Vec<Indicator>,
    filter: IndicatorFilter,
}

impl IndicatorBoard {
    pub fn new(indicators: Vec<Indicator>) -> Self {
        Self {
            indicators,
            filter: IndicatorFilter::default(),
        }
    }

    pub fn all(&self) -> &[Indicator] {
        &self.indicators
    }

    pub fn filter(&self) -> IndicatorFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: IndicatorFilter) {
        self.filter = filter;
    }

    pub fn filtered(&self) -> Vec<&Indicator> {
        self.matching(self.filter)
    }

    fn matching(&self, filter: IndicatorFilter) -> Vec<&Indicator> {
        self.indicators
            .iter()
            .filter(|i| filter.matches(i))
            .collect()
    }

    pub fn counts(&self) -> TypeCounts {
        count_types(&self.filtered())
    }

    /// Filtered pressure-injury events bucketed by location.
    pub fn lpp_by_location(&self) -> Vec<GroupCount> {
        lpp_groups(&self.filtered())
    }

    /// Filtered falls bucketed by fall type.
    pub fn falls_by_type(&self) -> Vec<GroupCount> {
        fall_groups(&self.filtered())
    }

    pub fn shift_distribution(&self) -> Vec<ShiftShare> {
        let total = self.indicators.len();
        Shift::ALL
            .iter()
            .map(|&shift| {
                let count = self.indicators.iter().filter(|i| i.shift == shift).count();
                ShiftShare {
                    shift,
                    count,
                    percentage: percentage(count, total),
                }
            })
            .collect()
    }

    pub fn summary(&self) -> IndicatorSummary {
        self.summary_for(self.filter)
    }

    /// The summary under `filter`, leaving the board's own filter unchanged.
    pub fn summary_for(&self, filter: IndicatorFilter) -> IndicatorSummary {
        let matching = self.matching(filter);
        IndicatorSummary {
            filter,
            counts: count_types(&matching),
            lpp_by_location: lpp_groups(&matching),
            falls_by_type: fall_groups(&matching),
            indicators: matching.into_iter().cloned().collect(),
            shift_distribution: self.shift_distribution(),
        }
    }
}

fn count_types(indicators: &[&Indicator]) -> TypeCounts {
    indicators
        .iter()
        .fold(TypeCounts::default(), |mut acc, i| {
            match i.kind.indicator_type() {
                IndicatorType::Lpp => acc.lpp += 1,
                IndicatorType::Falls => acc.falls += 1,
                IndicatorType::Extubation => acc.extubation += 1,
                IndicatorType::Medication => acc.medication += 1,
            }
            acc
        })
}

fn lpp_groups(indicators: &[&Indicator]) -> Vec<GroupCount> {
    group(indicators.iter().filter_map(|i| match &i.kind {
        IndicatorKind::Lpp { location } => Some(location.as_deref()),
        _ => None,
    }))
}

fn fall_groups(indicators: &[&Indicator]) -> Vec<GroupCount> {
    group(indicators.iter().filter_map(|i| match &i.kind {
        IndicatorKind::Falls { fall_type } => Some(fall_type.as_deref()),
        _ => None,
    }))
}
