//! Pipeline configuration

use blockmatch_rs_render::OverlayStyle;

bitflags! {
    /// Switches which influence how a pipeline runs.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct PipelineOption : u8 {
        /// Seek back to the first frame when the source runs dry, instead of
        /// finishing.
        const LOOP_ON_END = 0b1;

        /// Begin paused: block on viewer input between frames rather than
        /// polling.
        const START_PAUSED = 0b10;
    }
}

/// What gets drawn over each presented frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum VisualizationMode {
    /// Tint moving foreground blocks by direction and strength.
    #[default]
    Hsv,

    /// One arrow per block.
    Arrows,

    /// A single arrow for the mean motion of the frame.
    MeanArrow,

    /// Present frames untouched.
    None,
}

/// Everything needed to set up a pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Initial position in the block-size menu. Out-of-range values are
    /// clamped to the largest block size.
    pub block_size_index: usize,

    /// How far the search looks in each direction, in pixels. `None` uses
    /// the grid's step size.
    pub search_radius: Option<usize>,

    /// Settings for the HSV overlay.
    pub overlay: OverlayStyle,

    /// Visualization drawn on each frame.
    pub mode: VisualizationMode,

    /// Color of motion arrows, RGBA.
    pub arrow_color: [u8; 4],

    /// Multiplier applied to the mean vector in `MeanArrow` mode.
    pub mean_arrow_scale: f32,

    pub graph_width: usize,
    pub graph_height: usize,

    /// Number of samples the motion graph holds.
    pub graph_capacity: usize,

    /// Number of samples each FPS timer averages over.
    pub timer_window: usize,

    pub options: PipelineOption,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            block_size_index: 5,
            search_radius: None,
            overlay: OverlayStyle::default(),
            mode: VisualizationMode::default(),
            arrow_color: [0x00, 0xFF, 0x00, 0xFF],
            mean_arrow_scale: 10.0,
            graph_width: 1024,
            graph_height: 512,
            graph_capacity: 128,
            timer_window: 50,
            options: PipelineOption::LOOP_ON_END | PipelineOption::START_PAUSED,
        }
    }
}

impl PipelineConfig {
    pub fn loops(&self) -> bool {
        self.options.contains(PipelineOption::LOOP_ON_END)
    }

    pub fn starts_paused(&self) -> bool {
        self.options.contains(PipelineOption::START_PAUSED)
    }
}
