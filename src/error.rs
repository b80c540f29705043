use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

/// Errors surfaced by graph construction and content lifecycle calls.
///
/// Validation variants carry fixed messages: callers and tests match on the
/// exact text, so these strings are part of the public contract.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    #[error("invalid canvas dimensions: width={width}, height={height}")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid Input: bindTo is required")]
    MissingBindTo,

    #[error("Invalid Input: axis definition is required")]
    MissingAxis,

    #[error("Invalid Input: axis lowerLimit and upperLimit are required")]
    MissingAxisLimits,

    #[error("Invalid Input: axis lowerLimit must be less than upperLimit")]
    InvalidAxisLimits,

    #[error("Invalid Input: axis type does not match the limit value types")]
    InvalidAxisType,

    #[error("Invalid Input: x axis tick values are required for bar content")]
    MissingTicks,

    #[error("Invalid Input: key is required")]
    MissingKey,

    #[error("Invalid Input: values are required")]
    MissingValues,

    #[error("Invalid Input: key already exists in the graph")]
    DuplicateKey,

    #[error("Invalid Input: no content is loaded with this key")]
    UnknownKey,

    #[error("Invalid Input: y2 axis is not enabled")]
    Y2AxisNotEnabled,

    #[error("Invalid Input: datapoint x does not match the x axis type")]
    ValueTypeMismatch,

    #[error("Invalid Input: datapoint x is not one of the configured tick values")]
    TickValueMismatch,

    #[error("Invalid Input: paired result values require at least one of high, mid or low")]
    EmptyPairedValue,

    #[error("Invalid Region: start or end is required")]
    RegionMissingBounds,

    #[error("Invalid Region: axis is not supported for this content")]
    RegionInvalidAxis,

    #[error("Invalid Region: start and end must be numbers")]
    RegionNonNumericBound,

    #[error("Invalid Region: start must not be greater than end")]
    RegionStartAfterEnd,

    #[error("Invalid Region: x is not one of the configured tick values")]
    RegionTickMismatch,

    #[error("Invalid Region: x does not match the x axis type")]
    RegionTypeMismatch,

    #[error("Invalid Region: value regions require at least two points")]
    ValueRegionTooShort,

    #[error("invalid lifecycle transition: {operation} while {state}")]
    InvalidLifecycle {
        operation: &'static str,
        state: &'static str,
    },
}
