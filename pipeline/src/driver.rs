//! The frame loop

use crate::config::{PipelineConfig, VisualizationMode};
use crate::error::{Error, Result};
use crate::io::{FrameSource, InputEvent, Viewer, WaitMode};
use crate::status::StatusLine;
use crate::timer::RollingTimer;
use blockmatch_rs::{
    analyse, BlockGrid, BlockSizeMenu, ColorFrame, FrameStatistics, FullSearch, GrayFrame,
};
use blockmatch_rs_render::{
    draw_mean_arrow, draw_motion_arrows, draw_motion_overlay, ScrollingGraph,
};
use log::{debug, info, trace, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A flag that asks a running pipeline to stop before its next frame.
///
/// Clones share the same flag, so one can be handed to another thread or a
/// signal handler while the pipeline runs.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Results of analysing one frame pair.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    pub status: StatusLine,
    pub statistics: FrameStatistics,
}

/// The outcome of a single pipeline step.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// A frame pair was analysed and presented.
    Rendered(FrameReport),

    /// A frame pair could not be analysed and was dropped.
    Skipped,

    /// The source ran dry and was rewound to its first frame.
    Looped,

    /// The source ran dry and will not be rewound.
    Finished,
}

/// Counts of what happened over a whole run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rendered: usize,
    pub skipped: usize,
    pub loops: usize,

    /// The viewer asked to quit.
    pub quit: bool,

    /// The stop signal was raised.
    pub stopped: bool,
}

/// Drives frames from a source through motion estimation and visualization
/// to a viewer.
pub struct Pipeline<S, V> {
    source: S,
    viewer: V,
    config: PipelineConfig,

    /// Block size choices for the frame dimensions last seen.
    menu: BlockSizeMenu,

    /// The frame dimensions `menu` was built for.
    planned_for: (usize, usize),

    /// The menu position asked for, kept across replanning.
    requested_index: usize,

    /// The grid for the current menu selection, once planned.
    grid: Option<BlockGrid>,

    /// Luma of the last frame read.
    previous: Option<GrayFrame>,

    /// Set on rewinding, cleared once a frame pair is read. A second rewind
    /// while still set means the source cannot produce a pair at all.
    rewound: bool,

    graph: ScrollingGraph,
    processing: RollingTimer,
    rendering: RollingTimer,
    wait: WaitMode,
    stop: StopSignal,
}

impl<S, V> Pipeline<S, V>
where
    S: FrameSource,
    V: Viewer,
{
    pub fn new(source: S, viewer: V, config: PipelineConfig) -> Self {
        let planned_for = (source.width(), source.height());
        let requested_index = config.block_size_index;
        let menu = BlockSizeMenu::new(planned_for.0, planned_for.1, requested_index);
        let graph = ScrollingGraph::new(
            config.graph_width,
            config.graph_height,
            config.graph_capacity,
        );
        let wait = if config.starts_paused() {
            WaitMode::Block
        } else {
            WaitMode::Poll
        };

        Self {
            source,
            viewer,
            menu,
            planned_for,
            requested_index,
            grid: None,
            previous: None,
            rewound: false,
            graph,
            processing: RollingTimer::new(config.timer_window),
            rendering: RollingTimer::new(config.timer_window),
            wait,
            stop: StopSignal::new(),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn graph(&self) -> &ScrollingGraph {
        &self.graph
    }

    pub fn wait_mode(&self) -> WaitMode {
        self.wait
    }

    /// The block size currently selected, if the frames admit any.
    pub fn block_size(&self) -> Option<usize> {
        self.menu.block_size()
    }

    /// A handle that stops this pipeline's `run` from elsewhere.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Give back the source and viewer.
    pub fn into_parts(self) -> (S, V) {
        (self.source, self.viewer)
    }

    fn read_frame(&mut self) -> Result<Option<ColorFrame>> {
        self.source.next_frame().map_err(Error::Source)
    }

    /// Get the grid for a frame size, rebuilding the block size menu if the
    /// frame size changed.
    fn plan(&mut self, width: usize, height: usize) -> blockmatch_rs::Result<BlockGrid> {
        if (width, height) != self.planned_for {
            self.menu = BlockSizeMenu::new(width, height, self.requested_index);
            self.planned_for = (width, height);
            self.grid = None;
            info!(
                "frame size is now {}x{}, block size {:?}",
                width,
                height,
                self.menu.block_size()
            );
        }

        if let Some(grid) = self.grid {
            return Ok(grid);
        }

        let grid = self.menu.grid(width, height)?;
        self.grid = Some(grid);

        Ok(grid)
    }

    /// Estimate, summarize and draw one frame pair.
    fn analyse_pair(
        &mut self,
        previous: &GrayFrame,
        current: &GrayFrame,
        display: &mut ColorFrame,
    ) -> blockmatch_rs::Result<(BlockGrid, FrameStatistics)> {
        let grid = self.plan(current.width(), current.height())?;
        let search = match self.config.search_radius {
            Some(radius) => FullSearch::new(grid).with_search_radius(radius),
            None => FullSearch::new(grid),
        };

        let field = search.estimate(current, previous)?;
        self.processing.toc();

        let statistics = analyse(&field);
        match self.config.mode {
            VisualizationMode::Hsv => {
                draw_motion_overlay(display, &field, &grid, &self.config.overlay)?
            }
            VisualizationMode::Arrows => {
                draw_motion_arrows(display, &field, &grid, self.config.arrow_color)?
            }
            VisualizationMode::MeanArrow => draw_mean_arrow(
                display,
                &statistics,
                self.config.mean_arrow_scale,
                self.config.arrow_color,
            ),
            VisualizationMode::None => {}
        }

        Ok((grid, statistics))
    }

    /// Handle the source running dry.
    fn end_of_stream(&mut self) -> Result<Step> {
        self.previous = None;
        let position = self.source.position();

        if !self.config.loops() || self.rewound {
            info!("end of stream at frame {}", position);
            return Ok(Step::Finished);
        }

        self.source.seek(0).map_err(Error::Source)?;
        self.previous = self.read_frame()?.map(|frame| frame.to_gray());
        if self.previous.is_none() {
            info!("source is empty");
            return Ok(Step::Finished);
        }

        info!("end of stream at frame {}, rewinding", position);
        self.rewound = true;

        Ok(Step::Looped)
    }

    /// Read the next frame and process it against the previous one.
    ///
    /// Frames that fail analysis are logged and skipped; only source and
    /// viewer failures are returned as errors.
    pub fn step(&mut self) -> Result<Step> {
        self.processing.tic();
        self.rendering.tic();

        if self.previous.is_none() {
            self.previous = self.read_frame()?.map(|frame| frame.to_gray());
        }

        let (previous, current) = match (self.previous.take(), self.read_frame()?) {
            (Some(previous), Some(current)) => (previous, current),
            _ => return self.end_of_stream(),
        };
        self.rewound = false;

        let position = self.source.position().saturating_sub(1);
        let gray = current.to_gray();
        let mut display = current;

        let analysed = self.analyse_pair(&previous, &gray, &mut display);
        self.previous = Some(gray);

        let (grid, statistics) = match analysed {
            Ok(analysed) => analysed,
            Err(e) => {
                warn!("skipping frame {}: {}", position, e);
                return Ok(Step::Skipped);
            }
        };

        self.graph.add_data(statistics.mean_magnitude);
        self.graph.render();
        self.rendering.toc();

        let status = StatusLine {
            frame: position,
            block_size: grid.block_size(),
            step_size: grid.step_size(),
            processed_fps: self.processing.fps(),
            rendered_fps: self.rendering.fps(),
            mean_magnitude: statistics.mean_magnitude,
        };
        debug!("{}", status);

        self.viewer
            .present(&display, self.graph.canvas(), &status)
            .map_err(Error::Viewer)?;

        Ok(Step::Rendered(FrameReport { status, statistics }))
    }

    fn resize_blocks(&mut self, changed: bool) {
        self.requested_index = self.menu.index();
        if !changed {
            return;
        }

        self.grid = None;
        info!("block size is now {:?}", self.menu.block_size());
    }

    /// Apply a single input event.
    ///
    /// Returns `false` if the event asks the pipeline to quit.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::TogglePause => {
                self.wait = self.wait.toggled();
                info!(
                    "{}",
                    if self.wait == WaitMode::Block {
                        "paused"
                    } else {
                        "resumed"
                    }
                );
            }
            InputEvent::IncreaseBlockSize => {
                let changed = self.menu.increase();
                self.resize_blocks(changed);
            }
            InputEvent::DecreaseBlockSize => {
                let changed = self.menu.decrease();
                self.resize_blocks(changed);
            }
            InputEvent::Pointer { button, x, y } => {
                trace!("{:?} pointer at ({}, {})", button, x, y);
            }
            InputEvent::Quit => return false,
        }

        true
    }

    /// Process frames until the source finishes, the viewer quits or the
    /// stop signal is raised.
    pub fn run(&mut self) -> Result<RunSummary> {
        info!(
            "starting on {}x{} frames, block size {:?}",
            self.source.width(),
            self.source.height(),
            self.menu.block_size()
        );

        let mut summary = RunSummary::default();
        loop {
            if self.stop.is_stopped() {
                info!("stop requested");
                summary.stopped = true;
                break;
            }

            match self.step()? {
                Step::Rendered(_) => summary.rendered += 1,
                Step::Skipped => summary.skipped += 1,
                Step::Looped => {
                    summary.loops += 1;
                    continue;
                }
                Step::Finished => break,
            }

            let event = self.viewer.poll_event(self.wait).map_err(Error::Viewer)?;
            if let Some(event) = event {
                if !self.handle_event(event) {
                    info!("quit requested");
                    summary.quit = true;
                    break;
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineOption;
    use crate::error::CollaboratorError;
    use crate::io::FrameSequence;
    use std::collections::VecDeque;

    /// A viewer that records what it is shown and replays scripted input.
    ///
    /// Once the script runs out it asks to quit.
    #[derive(Default)]
    struct ScriptedViewer {
        script: VecDeque<Option<InputEvent>>,
        presented: Vec<StatusLine>,
        frames: Vec<ColorFrame>,
        waits: Vec<WaitMode>,
    }

    impl ScriptedViewer {
        fn new(script: Vec<Option<InputEvent>>) -> Self {
            Self {
                script: script.into(),
                ..Self::default()
            }
        }
    }

    impl Viewer for ScriptedViewer {
        fn present(
            &mut self,
            frame: &ColorFrame,
            _graph: &ColorFrame,
            status: &StatusLine,
        ) -> std::result::Result<(), CollaboratorError> {
            self.frames.push(frame.clone());
            self.presented.push(*status);
            Ok(())
        }

        fn poll_event(
            &mut self,
            wait: WaitMode,
        ) -> std::result::Result<Option<InputEvent>, CollaboratorError> {
            self.waits.push(wait);
            Ok(self.script.pop_front().unwrap_or(Some(InputEvent::Quit)))
        }
    }

    struct BrokenSource;

    impl FrameSource for BrokenSource {
        fn next_frame(&mut self) -> std::result::Result<Option<ColorFrame>, CollaboratorError> {
            Err("disk on fire".into())
        }

        fn position(&self) -> usize {
            0
        }

        fn frame_count(&self) -> Option<usize> {
            None
        }

        fn width(&self) -> usize {
            32
        }

        fn height(&self) -> usize {
            32
        }

        fn seek(&mut self, _position: usize) -> std::result::Result<(), CollaboratorError> {
            Ok(())
        }
    }

    fn texture(x: usize, y: usize) -> u8 {
        ((x * x * 7 + y * y * 13 + x * y * 3 + 40) % 251) as u8
    }

    /// Bright textured frames whose content moves `speed` pixels right per
    /// frame.
    fn moving(count: usize, size: usize, speed: usize) -> FrameSequence {
        (0..count)
            .map(|k| {
                let gray = GrayFrame::from_fn(size, size, |x, y| {
                    texture(x + size * 4 - k * speed, y)
                });
                ColorFrame::from_gray(&gray)
            })
            .collect()
    }

    fn config(options: PipelineOption) -> PipelineConfig {
        PipelineConfig {
            block_size_index: 3,
            graph_width: 64,
            graph_height: 32,
            options,
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn runs_to_the_end_without_looping() {
        let viewer = ScriptedViewer::new(vec![None, None, None]);
        let mut pipeline =
            Pipeline::new(moving(3, 32, 1), viewer, config(PipelineOption::empty()));

        let summary = pipeline.run().unwrap();
        assert_eq!(
            summary,
            RunSummary {
                rendered: 2,
                ..RunSummary::default()
            }
        );

        let frames: Vec<_> = pipeline.viewer().presented.iter().map(|s| s.frame).collect();
        assert_eq!(frames, vec![1, 2]);
        assert!(pipeline.viewer().waits.iter().all(|w| *w == WaitMode::Poll));
        assert!(pipeline
            .viewer()
            .presented
            .iter()
            .all(|s| (s.block_size, s.step_size) == (8, 4)));
        assert_eq!(pipeline.graph().history().len(), 2);
    }

    #[test]
    fn loops_until_quit() {
        let viewer = ScriptedViewer::new(vec![None, None]);
        let mut pipeline =
            Pipeline::new(moving(3, 32, 1), viewer, config(PipelineOption::LOOP_ON_END));

        let summary = pipeline.run().unwrap();
        assert_eq!(
            summary,
            RunSummary {
                rendered: 3,
                loops: 1,
                quit: true,
                ..RunSummary::default()
            }
        );

        let frames: Vec<_> = pipeline.viewer().presented.iter().map(|s| s.frame).collect();
        assert_eq!(frames, vec![1, 2, 1]);
    }

    #[test]
    fn block_size_follows_input() {
        let viewer = ScriptedViewer::new(vec![
            Some(InputEvent::IncreaseBlockSize),
            Some(InputEvent::DecreaseBlockSize),
            Some(InputEvent::DecreaseBlockSize),
        ]);
        let mut pipeline =
            Pipeline::new(moving(3, 32, 1), viewer, config(PipelineOption::LOOP_ON_END));
        assert_eq!(pipeline.block_size(), Some(8));

        pipeline.run().unwrap();

        let sizes: Vec<_> = pipeline
            .viewer()
            .presented
            .iter()
            .map(|s| (s.block_size, s.step_size))
            .collect();
        assert_eq!(sizes, vec![(8, 4), (16, 8), (8, 4), (4, 2)]);
        assert_eq!(pipeline.block_size(), Some(4));
    }

    #[test]
    fn block_size_is_clamped() {
        let viewer = ScriptedViewer::new(vec![]);
        let config = PipelineConfig {
            block_size_index: 99,
            ..config(PipelineOption::empty())
        };
        let mut pipeline = Pipeline::new(moving(2, 32, 1), viewer, config);
        assert_eq!(pipeline.block_size(), Some(32));

        assert!(pipeline.handle_event(InputEvent::IncreaseBlockSize));
        assert_eq!(pipeline.block_size(), Some(32));
    }

    #[test]
    fn pause_switches_wait_mode() {
        let viewer = ScriptedViewer::new(vec![
            Some(InputEvent::TogglePause),
            Some(InputEvent::Pointer {
                button: crate::io::PointerButton::Left,
                x: 3,
                y: 4,
            }),
        ]);
        let mut pipeline = Pipeline::new(
            moving(4, 32, 1),
            viewer,
            config(PipelineOption::START_PAUSED),
        );
        assert_eq!(pipeline.wait_mode(), WaitMode::Block);

        let summary = pipeline.run().unwrap();
        assert_eq!(summary.rendered, 3);
        assert!(summary.quit);
        assert_eq!(
            pipeline.viewer().waits,
            vec![WaitMode::Block, WaitMode::Poll, WaitMode::Poll]
        );
    }

    #[test]
    fn still_frames_have_no_motion() {
        let frames = vec![ColorFrame::filled(32, 32, [200, 200, 200, 0xFF]); 2];
        let viewer = ScriptedViewer::new(vec![]);
        let mut pipeline = Pipeline::new(
            FrameSequence::new(frames.clone()),
            viewer,
            config(PipelineOption::empty()),
        );

        match pipeline.step().unwrap() {
            Step::Rendered(report) => {
                assert_eq!(report.statistics, FrameStatistics::no_motion());
                assert_eq!(report.status.frame, 1);
            }
            other => panic!("unexpected step {:?}", other),
        }

        // Nothing moved, so the overlay leaves the frame alone.
        assert_eq!(pipeline.viewer().frames, vec![frames[1].clone()]);
        assert_eq!(pipeline.step().unwrap(), Step::Finished);
    }

    #[test]
    fn moving_frames_have_motion() {
        let viewer = ScriptedViewer::new(vec![]);
        let mut pipeline =
            Pipeline::new(moving(2, 32, 2), viewer, config(PipelineOption::empty()));

        match pipeline.step().unwrap() {
            Step::Rendered(report) => {
                assert!(report.statistics.mean_magnitude > 0.0);
                assert_eq!(
                    pipeline.graph().history().latest(),
                    Some(&report.statistics.mean_magnitude)
                );
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn mismatched_frames_are_skipped() {
        let frames = vec![
            ColorFrame::filled(32, 32, [200, 200, 200, 0xFF]),
            ColorFrame::filled(16, 16, [200, 200, 200, 0xFF]),
            ColorFrame::filled(16, 16, [200, 200, 200, 0xFF]),
        ];
        let viewer = ScriptedViewer::new(vec![None, None]);
        let mut pipeline = Pipeline::new(
            FrameSequence::new(frames),
            viewer,
            config(PipelineOption::empty()),
        );

        let summary = pipeline.run().unwrap();
        assert_eq!((summary.skipped, summary.rendered), (1, 1));
        assert_eq!(pipeline.viewer().presented.len(), 1);
        assert_eq!(pipeline.viewer().presented[0].block_size, 8);
    }

    #[test]
    fn short_sources_finish_even_when_looping() {
        let options = PipelineOption::LOOP_ON_END;

        let mut pipeline =
            Pipeline::new(FrameSequence::default(), ScriptedViewer::default(), config(options));
        assert_eq!(pipeline.run().unwrap(), RunSummary::default());

        let single = FrameSequence::new(vec![ColorFrame::filled(8, 8, [0, 0, 0, 0xFF])]);
        let mut pipeline = Pipeline::new(single, ScriptedViewer::default(), config(options));
        let summary = pipeline.run().unwrap();
        assert_eq!(summary.loops, 1);
        assert_eq!(summary.rendered, 0);
    }

    #[test]
    fn stop_signal_halts_before_the_next_frame() {
        let mut pipeline = Pipeline::new(
            moving(3, 32, 1),
            ScriptedViewer::default(),
            config(PipelineOption::LOOP_ON_END),
        );
        pipeline.stop_signal().stop();

        let summary = pipeline.run().unwrap();
        assert!(summary.stopped);
        assert!(pipeline.viewer().presented.is_empty());
    }

    #[test]
    fn source_failures_are_returned() {
        let mut pipeline = Pipeline::new(
            BrokenSource,
            ScriptedViewer::default(),
            config(PipelineOption::LOOP_ON_END),
        );

        assert!(matches!(pipeline.run(), Err(Error::Source(_))));
    }
}
