//! Frame source and viewer interfaces

use crate::error::CollaboratorError;
use crate::status::StatusLine;
use blockmatch_rs::ColorFrame;
use thiserror::Error;

/// A sequential supply of frames, such as a decoded video file.
pub trait FrameSource {
    /// Retrieve the frame at the current position and advance past it.
    ///
    /// `Ok(None)` signals the end of the stream.
    fn next_frame(&mut self) -> Result<Option<ColorFrame>, CollaboratorError>;

    /// Index of the frame the next call to `next_frame` will return.
    fn position(&self) -> usize;

    /// Total number of frames, if known.
    fn frame_count(&self) -> Option<usize>;

    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Move the read position.
    fn seek(&mut self, position: usize) -> Result<(), CollaboratorError>;
}

/// Which mouse button a pointer event came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// User input interpreted by the pipeline between frames.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Switch between stepping on input and free-running playback.
    TogglePause,

    IncreaseBlockSize,

    DecreaseBlockSize,

    Quit,

    /// A click on the presented frame, in frame pixels.
    Pointer {
        button: PointerButton,
        x: usize,
        y: usize,
    },
}

/// How long a viewer should wait for input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WaitMode {
    /// Wait until an event arrives.
    Block,

    /// Return immediately, with or without an event.
    Poll,
}

impl WaitMode {
    pub fn toggled(self) -> Self {
        match self {
            WaitMode::Block => WaitMode::Poll,
            WaitMode::Poll => WaitMode::Block,
        }
    }
}

/// Somewhere to show results and collect input, such as a window.
pub trait Viewer {
    /// Show a rendered frame alongside the motion graph canvas.
    fn present(
        &mut self,
        frame: &ColorFrame,
        graph: &ColorFrame,
        status: &StatusLine,
    ) -> Result<(), CollaboratorError>;

    /// Fetch the next pending input event.
    fn poll_event(&mut self, wait: WaitMode) -> Result<Option<InputEvent>, CollaboratorError>;
}

#[derive(Error, Debug)]
#[error("cannot seek to frame {position} of {count}")]
pub struct SeekOutOfRange {
    position: usize,
    count: usize,
}

/// A frame source over frames held in memory.
#[derive(Clone, Debug, Default)]
pub struct FrameSequence {
    frames: Vec<ColorFrame>,
    position: usize,
}

impl FrameSequence {
    pub fn new(frames: Vec<ColorFrame>) -> Self {
        Self {
            frames,
            position: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FromIterator<ColorFrame> for FrameSequence {
    fn from_iter<I: IntoIterator<Item = ColorFrame>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl FrameSource for FrameSequence {
    fn next_frame(&mut self) -> Result<Option<ColorFrame>, CollaboratorError> {
        let frame = self.frames.get(self.position).cloned();
        if frame.is_some() {
            self.position += 1;
        }

        Ok(frame)
    }

    fn position(&self) -> usize {
        self.position
    }

    fn frame_count(&self) -> Option<usize> {
        Some(self.frames.len())
    }

    fn width(&self) -> usize {
        self.frames.first().map(ColorFrame::width).unwrap_or(0)
    }

    fn height(&self) -> usize {
        self.frames.first().map(ColorFrame::height).unwrap_or(0)
    }

    fn seek(&mut self, position: usize) -> Result<(), CollaboratorError> {
        if position > self.frames.len() {
            return Err(Box::new(SeekOutOfRange {
                position,
                count: self.frames.len(),
            }));
        }

        self.position = position;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: u8) -> FrameSequence {
        (0..n)
            .map(|i| ColorFrame::filled(4, 2, [i, i, i, 0xFF]))
            .collect()
    }

    #[test]
    fn sequence_reads_in_order() {
        let mut source = frames(3);
        assert_eq!(source.frame_count(), Some(3));
        assert_eq!((source.width(), source.height()), (4, 2));

        for i in 0..3 {
            assert_eq!(source.position(), i as usize);
            let frame = source.next_frame().unwrap().unwrap();
            assert_eq!(frame.pixel(0, 0), Some([i, i, i, 0xFF]));
        }

        assert!(source.next_frame().unwrap().is_none());
        assert_eq!(source.position(), 3);
    }

    #[test]
    fn sequence_seeks() {
        let mut source = frames(3);
        source.next_frame().unwrap();
        source.next_frame().unwrap();

        source.seek(0).unwrap();
        assert_eq!(source.position(), 0);
        assert_eq!(
            source.next_frame().unwrap().and_then(|f| f.pixel(0, 0)),
            Some([0, 0, 0, 0xFF])
        );

        assert!(source.seek(4).is_err());
        assert_eq!(source.position(), 1);
    }

    #[test]
    fn empty_sequence() {
        let mut source = FrameSequence::default();

        assert!(source.is_empty());
        assert_eq!((source.width(), source.height()), (0, 0));
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn pause_toggles_wait_mode() {
        assert_eq!(WaitMode::Block.toggled(), WaitMode::Poll);
        assert_eq!(WaitMode::Poll.toggled().toggled(), WaitMode::Poll);
    }
}
