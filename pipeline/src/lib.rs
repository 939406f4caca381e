//! Frame-at-a-time motion analysis driver.
//!
//! Pulls frames from a [`FrameSource`], estimates motion against the
//! previous frame, renders the selected visualization and hands the result
//! to a [`Viewer`], reacting to the viewer's input between frames.

#[macro_use]
extern crate bitflags;

mod config;
mod driver;
mod error;
mod io;
mod status;
mod timer;

pub use config::{PipelineConfig, PipelineOption, VisualizationMode};
pub use driver::{FrameReport, Pipeline, RunSummary, Step, StopSignal};
pub use error::{CollaboratorError, Error, Result};
pub use io::{
    FrameSequence, FrameSource, InputEvent, PointerButton, SeekOutOfRange, Viewer, WaitMode,
};
pub use status::StatusLine;
pub use timer::RollingTimer;
