//! Frame scheduling.
//!
//! The field never loops on its own. After each frame it asks a
//! [`FrameScheduler`] for the next display refresh and receives a
//! [`FrameRequest`] handle. The host later calls
//! [`ParticleField::run_frame`](crate::field::ParticleField::run_frame)
//! with the handle that fired; `detach` cancels the outstanding handle so
//! no frame runs afterwards.
//!
//! Two schedulers ship with the crate:
//! - [`ManualScheduler`] - a queue the caller drains by hand (headless
//!   rendering, tests, benchmarks)
//! - `RedrawScheduler` in the window host, backed by winit redraw requests

use std::collections::VecDeque;

/// Handle to one requested frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequest(u64);

impl FrameRequest {
    /// Wrap a scheduler-specific identifier.
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// The scheduler-specific identifier.
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Source of "wait for the next display refresh" requests.
pub trait FrameScheduler {
    /// Request one future frame.
    fn request_frame(&mut self) -> FrameRequest;

    /// Cancel a request. Unknown or already fired requests are ignored.
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// A scheduler whose frames fire only when the caller pops them.
///
/// # Example
///
/// ```ignore
/// let mut field = ParticleField::new(FieldConfig::default(), ManualScheduler::new());
/// field.attach(Canvas::new(), 800, 600)?;
///
/// while let Some(request) = field.scheduler_mut().next_due() {
///     field.run_frame(request);
///     if field.stats().frames >= 60 {
///         break;
///     }
/// }
/// ```
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    queue: VecDeque<FrameRequest>,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the oldest outstanding request.
    pub fn next_due(&mut self) -> Option<FrameRequest> {
        self.queue.pop_front()
    }

    /// Number of outstanding requests.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Requests issued since creation.
    pub fn total_requested(&self) -> u64 {
        self.requested
    }

    /// Requests cancelled before they fired.
    pub fn total_cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next_id);
        self.next_id += 1;
        self.requested += 1;
        self.queue.push_back(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let before = self.queue.len();
        self.queue.retain(|r| *r != request);
        if self.queue.len() != before {
            self.cancelled += 1;
        }
    }
}
