//! Stacking membership and stack-base (`y0`) computation.

use std::collections::HashMap;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::types::Datapoint;

/// Ordered bar-series keys per stacking group.
///
/// Load order defines stack order: a series only ever stacks on top of (or
/// below, for negative values) series of its group that were loaded before it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupMembership {
    groups: IndexMap<String, Vec<String>>,
}

impl GroupMembership {
    pub fn add(&mut self, group: &str, key: &str) {
        let members = self.groups.entry(group.to_owned()).or_default();
        if !members.iter().any(|member| member == key) {
            members.push(key.to_owned());
        }
    }

    /// Removes `key` and drops its group once empty. Returns the group name.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let group = self.group_of(key)?.to_owned();
        if let Some(members) = self.groups.get_mut(&group) {
            members.retain(|member| member != key);
            if members.is_empty() {
                self.groups.shift_remove(&group);
            }
        }
        Some(group)
    }

    #[must_use]
    pub fn group_of(&self, key: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|(_, members)| members.iter().any(|member| member == key))
            .map(|(group, _)| group.as_str())
    }

    #[must_use]
    pub fn members(&self, group: &str) -> &[String] {
        self.groups.get(group).map_or(&[], Vec::as_slice)
    }

    /// Keys of the same group loaded before `key`.
    #[must_use]
    pub fn preceding(&self, key: &str) -> &[String] {
        let Some(group) = self.group_of(key) else {
            return &[];
        };
        let members = self.members(group);
        let position = members
            .iter()
            .position(|member| member == key)
            .unwrap_or(members.len());
        &members[..position]
    }

    /// Groups with at least one member accepted by `is_shown`, first-seen order.
    pub fn visible_groups<'a>(&'a self, is_shown: impl Fn(&str) -> bool) -> Vec<&'a str> {
        self.groups
            .iter()
            .filter(|(_, members)| members.iter().any(|member| is_shown(member)))
            .map(|(group, _)| group.as_str())
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Sets `y0` on every datapoint from the series stacked beneath it.
///
/// `preceding_group_series` must hold only shown series of the same group that
/// were loaded earlier. Positive and negative values accumulate separately: a
/// negative datapoint hangs below the sum of earlier negatives, a positive one
/// sits on the sum of earlier positives.
pub fn compute_offsets(datapoints: &mut [Datapoint], preceding_group_series: &[&[Datapoint]]) {
    let mut sums: HashMap<OrderedFloat<f64>, (f64, f64)> = HashMap::new();
    for series in preceding_group_series {
        for point in series.iter() {
            let Some(y) = point.y else {
                continue;
            };
            let entry = sums.entry(OrderedFloat(point.x.as_f64())).or_default();
            if y < 0.0 {
                entry.1 += y;
            } else {
                entry.0 += y;
            }
        }
    }

    for point in datapoints.iter_mut() {
        let (up_y, down_y) = sums
            .get(&OrderedFloat(point.x.as_f64()))
            .copied()
            .unwrap_or_default();
        point.y0 = match point.y {
            Some(y) if y < 0.0 => down_y,
            _ => up_y,
        };
    }
}
