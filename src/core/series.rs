//! Series input (as submitted in JSON) and validated series descriptors.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::axis::AxisSpec;
use crate::core::path::Symbol;
use crate::core::region::{
    Region, RegionInput, RegionRules, ValueRegionInput, ValueRegionPoint, validate_region,
    validate_value_regions,
};
use crate::core::types::{AxisValue, Datapoint, YAxisId};
use crate::error::{ChartError, ChartResult};

/// Chart-content variant a series is rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    Bar,
    Line,
    Scatter,
    PairedResult,
}

impl ContentKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Scatter => "scatter",
            Self::PairedResult => "paired-result",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatapointInput {
    pub x: Value,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
}

/// One series as submitted for Bar, Line and Scatter content.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesInput {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub y_axis: YAxisId,
    #[serde(default)]
    pub values: Option<Vec<DatapointInput>>,
    /// Extra SVG presentation attributes applied to every data shape.
    #[serde(default)]
    pub style: IndexMap<String, String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub shape: Option<Symbol>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub regions: Vec<RegionInput>,
    #[serde(default)]
    pub value_regions: Vec<ValueRegionInput>,
}

/// Validated series owned by one content instance for its lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDescriptor {
    pub key: String,
    pub group: String,
    pub y_axis: YAxisId,
    pub values: Vec<Datapoint>,
    pub style: IndexMap<String, String>,
    pub color: Option<String>,
    pub shape: Symbol,
    pub label: Option<String>,
    pub regions: Vec<Region>,
    pub value_regions: Vec<ValueRegionPoint>,
}

/// Facts about the graph a series is validated against.
#[derive(Debug, Clone, Copy)]
pub struct SeriesRules<'a> {
    pub kind: ContentKind,
    pub x_axis: &'a AxisSpec,
    pub y2_enabled: bool,
}

pub(crate) fn validate_key(key: Option<&str>) -> ChartResult<String> {
    match key {
        Some(key) if !key.trim().is_empty() => Ok(key.to_owned()),
        _ => Err(ChartError::MissingKey),
    }
}

pub(crate) fn validate_y_axis(y_axis: YAxisId, y2_enabled: bool) -> ChartResult<YAxisId> {
    if y_axis == YAxisId::Y2 && !y2_enabled {
        return Err(ChartError::Y2AxisNotEnabled);
    }
    Ok(y_axis)
}

/// Converts one raw datapoint; bar datapoints must sit on a configured tick.
pub(crate) fn validate_datapoint(
    input: &DatapointInput,
    key: &str,
    group: &str,
    y_axis: YAxisId,
    rules: SeriesRules<'_>,
) -> ChartResult<Datapoint> {
    let x = AxisValue::from_json(&input.x, rules.x_axis.axis_type)
        .ok_or(ChartError::ValueTypeMismatch)?;
    if rules.kind == ContentKind::Bar && !rules.x_axis.has_tick(x) {
        return Err(ChartError::TickValueMismatch);
    }
    if let Some(y) = input.y {
        if !y.is_finite() {
            return Err(ChartError::InvalidData("datapoint y must be finite".to_owned()));
        }
    }
    let mut point = Datapoint::new(x, input.y, key, group).with_y_axis(y_axis);
    point.label = input.label.clone();
    Ok(point)
}

impl SeriesInput {
    /// Validates the whole series without touching any graph state.
    pub fn validate(&self, rules: SeriesRules<'_>) -> ChartResult<SeriesDescriptor> {
        let key = validate_key(self.key.as_deref())?;
        let values = self.values.as_ref().ok_or(ChartError::MissingValues)?;
        if rules.kind == ContentKind::Bar && rules.x_axis.ticks.is_empty() {
            return Err(ChartError::MissingTicks);
        }
        let y_axis = validate_y_axis(self.y_axis, rules.y2_enabled)?;
        let group = self
            .group
            .clone()
            .filter(|group| !group.is_empty())
            .unwrap_or_else(|| key.clone());

        let values = values
            .iter()
            .map(|input| validate_datapoint(input, &key, &group, y_axis, rules))
            .collect::<ChartResult<Vec<_>>>()?;

        let region_rules = RegionRules {
            series_axis: y_axis,
            x_axis: rules.x_axis,
            bar: rules.kind == ContentKind::Bar,
        };
        let regions = self
            .regions
            .iter()
            .map(|region| validate_region(region, region_rules))
            .collect::<ChartResult<Vec<_>>>()?;
        let value_regions = if self.value_regions.is_empty() {
            Vec::new()
        } else {
            validate_value_regions(&self.value_regions, rules.x_axis)?
        };

        Ok(SeriesDescriptor {
            key,
            group,
            y_axis,
            values,
            style: self.style.clone(),
            color: self.color.clone(),
            shape: self.shape.unwrap_or_default(),
            label: self.label.clone(),
            regions,
            value_regions,
        })
    }
}

impl SeriesDescriptor {
    /// Finite `y` values, optionally lifted by their stack base.
    pub fn y_values(&self, stacked: bool) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(move |point| {
            if stacked {
                point.stacked_y()
            } else {
                point.y
            }
        })
    }
}

/// Role of a datapoint inside a paired result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PairType {
    High,
    Mid,
    Low,
}

impl PairType {
    pub const ALL: [Self; 3] = [Self::High, Self::Mid, Self::Low];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Mid => "mid",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PairedValueInput {
    #[serde(default)]
    pub high: Option<DatapointInput>,
    #[serde(default)]
    pub mid: Option<DatapointInput>,
    #[serde(default)]
    pub low: Option<DatapointInput>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PairedRegionsInput {
    #[serde(default)]
    pub high: Vec<RegionInput>,
    #[serde(default)]
    pub mid: Vec<RegionInput>,
    #[serde(default)]
    pub low: Vec<RegionInput>,
}

/// Series input for paired-result content (`high`/`mid`/`low` triples).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairedSeriesInput {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub y_axis: YAxisId,
    #[serde(default)]
    pub values: Option<Vec<PairedValueInput>>,
    #[serde(default)]
    pub style: IndexMap<String, String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub shape: Option<Symbol>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub regions: PairedRegionsInput,
    #[serde(default)]
    pub value_regions: Vec<ValueRegionInput>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PairedDatapoint {
    pub high: Option<Datapoint>,
    pub mid: Option<Datapoint>,
    pub low: Option<Datapoint>,
}

impl PairedDatapoint {
    #[must_use]
    pub fn get(&self, pair: PairType) -> Option<&Datapoint> {
        match pair {
            PairType::High => self.high.as_ref(),
            PairType::Mid => self.mid.as_ref(),
            PairType::Low => self.low.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedSeriesDescriptor {
    pub key: String,
    pub y_axis: YAxisId,
    pub values: Vec<PairedDatapoint>,
    pub style: IndexMap<String, String>,
    pub color: Option<String>,
    pub shape: Symbol,
    pub label: Option<String>,
    pub regions: Vec<(PairType, Region)>,
    pub value_regions: Vec<ValueRegionPoint>,
}

impl PairedSeriesInput {
    pub fn validate(&self, rules: SeriesRules<'_>) -> ChartResult<PairedSeriesDescriptor> {
        let key = validate_key(self.key.as_deref())?;
        let values = self.values.as_ref().ok_or(ChartError::MissingValues)?;
        let y_axis = validate_y_axis(self.y_axis, rules.y2_enabled)?;

        let convert = |input: Option<&DatapointInput>| {
            input
                .map(|input| validate_datapoint(input, &key, &key, y_axis, rules))
                .transpose()
        };
        let values = values
            .iter()
            .map(|value| {
                if value.high.is_none() && value.mid.is_none() && value.low.is_none() {
                    return Err(ChartError::EmptyPairedValue);
                }
                Ok(PairedDatapoint {
                    high: convert(value.high.as_ref())?,
                    mid: convert(value.mid.as_ref())?,
                    low: convert(value.low.as_ref())?,
                })
            })
            .collect::<ChartResult<Vec<_>>>()?;

        let region_rules = RegionRules {
            series_axis: y_axis,
            x_axis: rules.x_axis,
            bar: false,
        };
        let mut regions = Vec::new();
        for (pair, inputs) in [
            (PairType::High, &self.regions.high),
            (PairType::Mid, &self.regions.mid),
            (PairType::Low, &self.regions.low),
        ] {
            for input in inputs {
                regions.push((pair, validate_region(input, region_rules)?));
            }
        }
        let value_regions = if self.value_regions.is_empty() {
            Vec::new()
        } else {
            validate_value_regions(&self.value_regions, rules.x_axis)?
        };

        Ok(PairedSeriesDescriptor {
            key,
            y_axis,
            values,
            style: self.style.clone(),
            color: self.color.clone(),
            shape: self.shape.unwrap_or_default(),
            label: self.label.clone(),
            regions,
            value_regions,
        })
    }
}

impl PairedSeriesDescriptor {
    pub fn datapoints(&self) -> impl Iterator<Item = (PairType, &Datapoint)> + '_ {
        self.values.iter().flat_map(|value| {
            PairType::ALL
                .into_iter()
                .filter_map(move |pair| value.get(pair).map(|point| (pair, point)))
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ContentKind, PairedSeriesInput, SeriesInput, SeriesRules};
    use crate::core::axis::AxisSpec;
    use crate::core::types::{AxisValue, YAxisId};
    use crate::error::ChartError;

    fn x_axis() -> AxisSpec {
        AxisSpec::numeric(0.0, 6.0)
            .expect("axis")
            .with_ticks((1..=5).map(|v| AxisValue::Number(f64::from(v))).collect())
            .expect("ticks")
    }

    fn rules(kind: ContentKind, x_axis: &AxisSpec) -> SeriesRules<'_> {
        SeriesRules {
            kind,
            x_axis,
            y2_enabled: false,
        }
    }

    fn parse(value: serde_json::Value) -> SeriesInput {
        serde_json::from_value(value).expect("series json")
    }

    #[test]
    fn group_defaults_to_key() {
        let axis = x_axis();
        let series = parse(json!({"key": "a", "values": [{"x": 1, "y": 2}]}))
            .validate(rules(ContentKind::Bar, &axis))
            .expect("valid");
        assert_eq!(series.group, "a");
        assert_eq!(series.values[0].group, "a");
        assert_eq!(series.values[0].y0, 0.0);
    }

    #[test]
    fn missing_key_and_values_are_rejected() {
        let axis = x_axis();
        assert_eq!(
            parse(json!({"values": []})).validate(rules(ContentKind::Line, &axis)),
            Err(ChartError::MissingKey)
        );
        assert_eq!(
            parse(json!({"key": "a"})).validate(rules(ContentKind::Line, &axis)),
            Err(ChartError::MissingValues)
        );
    }

    #[test]
    fn bar_values_must_sit_on_ticks() {
        let axis = x_axis();
        let series = parse(json!({"key": "a", "values": [{"x": 1.5, "y": 2}]}));
        assert_eq!(
            series.validate(rules(ContentKind::Bar, &axis)),
            Err(ChartError::TickValueMismatch)
        );
        assert!(series.validate(rules(ContentKind::Line, &axis)).is_ok());
    }

    #[test]
    fn y2_requires_enabled_axis() {
        let axis = x_axis();
        let series = parse(json!({"key": "a", "yAxis": "y2", "values": []}));
        assert_eq!(
            series.validate(rules(ContentKind::Line, &axis)),
            Err(ChartError::Y2AxisNotEnabled)
        );
        let enabled = SeriesRules {
            y2_enabled: true,
            ..rules(ContentKind::Line, &axis)
        };
        assert_eq!(
            series.validate(enabled).expect("valid").y_axis,
            YAxisId::Y2
        );
    }

    #[test]
    fn date_x_on_numeric_axis_is_a_type_mismatch() {
        let axis = x_axis();
        let series = parse(json!({"key": "a", "values": [{"x": "2016-03-03T12:00:00Z", "y": 1}]}));
        assert_eq!(
            series.validate(rules(ContentKind::Scatter, &axis)),
            Err(ChartError::ValueTypeMismatch)
        );
    }

    #[test]
    fn paired_value_needs_one_member() {
        let axis = x_axis();
        let series: PairedSeriesInput =
            serde_json::from_value(json!({"key": "p", "values": [{}]})).expect("json");
        assert_eq!(
            series.validate(rules(ContentKind::PairedResult, &axis)),
            Err(ChartError::EmptyPairedValue)
        );
    }
}
