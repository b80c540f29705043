mod bar_content;
mod content;
mod frame_scheduler;
mod graph;
mod graph_config;
mod graph_context;
mod invalidation;
mod legend;
mod line_content;
mod marker_layer;
mod paired_result_content;
mod scatter_content;
mod transform_pipeline;

pub use bar_content::BarContent;
pub use content::{ChartContent, LifecycleOp, LifecycleState, SeriesValues};
pub use frame_scheduler::FrameScheduler;
pub use graph::Graph;
pub use graph_config::{
    AxesInput, AxisInput, DEFAULT_HEIGHT, DEFAULT_WIDTH, DimensionInput, GraphConfig,
    GraphConfigInput, TicksInput,
};
pub use graph_context::{AxisState, GraphContext, LegendEntry, LegendState, ShownTargets};
pub use invalidation::{InvalidationLevel, InvalidationMask, InvalidationTopic};
pub use legend::{LabelShapes, Legend, SeriesSummary};
pub use line_content::LineContent;
pub use marker_layer::{LABEL_FONT_SIZE, LABEL_OFFSET, MARKER_SIZE};
pub use paired_result_content::PairedResultContent;
pub use scatter_content::ScatterContent;
pub use transform_pipeline::{ShapeUpdate, TransformPipeline};
