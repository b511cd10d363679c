use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};

/// High-level behaviour requested by the caller.
///
/// The render policy decides whether frames should animate continuously,
/// be evaluated at a fixed timestamp, or be exported to disk.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPolicy {
    /// Run the render loop continuously, optionally clamping the frame rate.
    Animate {
        /// Optional requested frames-per-second cap.
        target_fps: Option<f32>,
    },
    /// Render a single still frame at an optional timestamp.
    Still {
        /// Specific timestamp to evaluate the shader at (seconds).
        time: Option<f32>,
    },
    /// Render a frame and write the result to disk.
    Export {
        /// Specific timestamp to evaluate the shader at (seconds).
        time: Option<f32>,
        /// Destination path for the exported file.
        path: PathBuf,
        /// Output format the user requested.
        format: ExportFormat,
    },
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Animate { target_fps: None }
    }
}

/// File formats supported by the export pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
}

/// Abstraction over where time values originate from.
pub trait TimeSource: Send {
    /// Seconds to evaluate the next frame at.
    fn seconds(&self) -> f32;
}

/// Time source backed by the system monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    /// Creates a system time source initialised to `Instant::now()`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn seconds(&self) -> f32 {
        self.origin.elapsed().as_secs_f32()
    }
}

/// Time source that always reports a fixed timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource {
    time: f32,
}

impl FixedTimeSource {
    pub fn new(time: f32) -> Self {
        Self { time }
    }
}

impl TimeSource for FixedTimeSource {
    fn seconds(&self) -> f32 {
        self.time
    }
}

/// Convenient alias for owning time sources behind trait objects.
pub type BoxedTimeSource = Box<dyn TimeSource + Send>;

/// Builds a time source suited to the requested render policy.
pub fn time_source_for_policy(policy: &RenderPolicy) -> Result<BoxedTimeSource> {
    match policy {
        RenderPolicy::Animate { .. } => Ok(Box::new(SystemTimeSource::new())),
        RenderPolicy::Still { time } | RenderPolicy::Export { time, .. } => {
            let time = time.unwrap_or(0.0);
            if !time.is_finite() || time < 0.0 {
                return Err(anyhow!("still time must be a non-negative number of seconds"));
            }
            Ok(Box::new(FixedTimeSource::new(time)))
        }
    }
}

/// Decides when the next frame should be produced.
///
/// Animated policies redraw on every display refresh unless a frame cap is
/// set, in which case redraws are spaced by `1 / fps`. Still and export
/// policies produce one frame and then idle until [`FrameScheduler::invalidate`]
/// is called (for example after a resize).
///
/// A suspended scheduler issues no frames at all until it is invalidated;
/// hosts suspend it while the surface has zero area.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Option<Duration>,
    continuous: bool,
    last_frame: Option<Instant>,
    stale: bool,
    suspended: bool,
}

impl FrameScheduler {
    pub fn new(policy: &RenderPolicy) -> Self {
        match policy {
            RenderPolicy::Animate { target_fps } => Self {
                interval: frame_interval(*target_fps),
                continuous: true,
                last_frame: None,
                stale: true,
                suspended: false,
            },
            RenderPolicy::Still { .. } | RenderPolicy::Export { .. } => Self {
                interval: None,
                continuous: false,
                last_frame: None,
                stale: true,
                suspended: false,
            },
        }
    }

    /// Returns true when a frame is due at `now`.
    pub fn ready_for_frame(&self, now: Instant) -> bool {
        if self.suspended {
            return false;
        }
        if self.stale {
            return true;
        }
        if !self.continuous {
            return false;
        }
        match (self.interval, self.last_frame) {
            (Some(interval), Some(last)) => now >= last + interval,
            _ => true,
        }
    }

    /// Deadline for the next capped frame, if the scheduler is waiting on one.
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.suspended || self.stale || !self.continuous {
            return None;
        }
        match (self.interval, self.last_frame) {
            (Some(interval), Some(last)) => Some(last + interval),
            _ => None,
        }
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.last_frame = Some(now);
        self.stale = false;
    }

    /// Forces the next call to [`Self::ready_for_frame`] to return true,
    /// lifting any suspension.
    pub fn invalidate(&mut self) {
        self.stale = true;
        self.suspended = false;
    }

    /// Stops issuing frames until the next [`Self::invalidate`].
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }
}

fn frame_interval(target_fps: Option<f32>) -> Option<Duration> {
    match target_fps {
        Some(fps) if fps.is_finite() && fps > 0.0 => Some(Duration::from_secs_f32(1.0 / fps)),
        _ => None,
    }
}
