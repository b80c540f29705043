pub mod axis;
pub mod band_layout;
pub mod path;
pub mod primitives;
pub mod region;
pub mod scale;
pub mod scale_provider;
pub mod selection;
pub mod series;
pub mod stack;
pub mod types;

pub use axis::{AxisConfig, AxisSpec};
pub use band_layout::{
    BandScale, BarAttributes, InnerScale, OUTER_PADDING_RATIO, OuterScale, WIDTH_RATIO,
    build_inner_scale, build_outer_scale, compute_bandwidth_padding_ratio,
    compute_bar_attributes,
};
pub use path::{PathVertex, Symbol};
pub use region::{
    CrossSpan, DEFAULT_GOAL_LINE_STROKE_WIDTH, DEFAULT_REGION_LINE_STROKE_WIDTH,
    REGION_WIDTH_RATIO, Region, RegionInput, RegionRect, ValueRegionInput, ValueRegionPoint,
    compute_area_path, compute_rect,
};
pub use scale::LinearScale;
pub use scale_provider::{
    MAX_Y_TICKS_COUNT, OutlierStretchFactor, Orientation, ValuesRange, build_scale, compute_domain, compute_range,
    determine_outlier_stretch_factor, generate_y_axes_tick_values,
};
pub use selection::{SELECTION_PADDING, SelectionBounds, TickShape, compute_bounds};
pub use series::{
    ContentKind, DatapointInput, PairType, PairedSeriesDescriptor, PairedSeriesInput,
    SeriesDescriptor, SeriesInput,
};
pub use stack::{GroupMembership, compute_offsets};
pub use types::{AxisId, AxisType, AxisValue, Canvas, Datapoint, Padding, Viewport, YAxisId};
