use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Converts host timestamps (milliseconds) to seconds.
pub const MS_TO_SECONDS: f64 = 0.001;

/// Timestamp delivered with a tick: milliseconds since the host's time origin.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FrameTime {
    pub timestamp_ms: f64,
}

impl FrameTime {
    pub fn from_millis(timestamp_ms: f64) -> Self {
        Self { timestamp_ms }
    }

    pub fn seconds(&self) -> f64 {
        self.timestamp_ms * MS_TO_SECONDS
    }
}

/// Host-side frame scheduling, the counterpart of a display-refresh callback
/// request. The host answers a request by delivering exactly one tick.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Frame loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// Created, no frame requested yet.
    Idle,
    /// A frame request is pending with the host.
    Scheduled,
    /// The tick body is executing.
    Running,
    /// No further frames will be requested.
    Stopped,
}

impl std::fmt::Display for FrameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FrameState::Idle => "idle",
            FrameState::Scheduled => "scheduled",
            FrameState::Running => "running",
            FrameState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Errors from driving the frame loop out of order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("tick delivered while {state}; no frame was scheduled")]
    NotScheduled { state: FrameState },
    #[error("frame loop already started")]
    AlreadyStarted,
}

/// What the driver did after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The body ran and the next frame was requested.
    Rescheduled,
    /// The loop is stopped; no frame was requested.
    Stopped,
}

/// Clonable cancellation flag for a frame loop.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Explicit run loop replacing a self-rescheduling frame callback.
///
/// `Idle -> Scheduled -> Running -> Scheduled -> ...` until the stop handle
/// fires or the body fails, then `Stopped`.
#[derive(Debug)]
pub struct FrameDriver {
    state: FrameState,
    stop: StopHandle,
    ticks: u64,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            state: FrameState::Idle,
            stop: StopHandle::default(),
            ticks: 0,
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Number of tick bodies that have run.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Request the first frame.
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) -> Result<(), FrameError> {
        if self.state != FrameState::Idle {
            return Err(FrameError::AlreadyStarted);
        }
        if self.stop.is_stopped() {
            self.state = FrameState::Stopped;
            return Ok(());
        }
        self.state = FrameState::Scheduled;
        scheduler.request_frame();
        Ok(())
    }

    /// Handle one host tick: run `body`, then request the next frame.
    ///
    /// A failing body stops the loop and its error is returned. Ticks that
    /// arrive after the loop stopped are ignored.
    pub fn tick<E, F>(
        &mut self,
        time: FrameTime,
        scheduler: &mut impl FrameScheduler,
        body: F,
    ) -> Result<TickOutcome, E>
    where
        F: FnOnce(FrameTime) -> Result<(), E>,
        E: From<FrameError>,
    {
        match self.state {
            FrameState::Scheduled => {}
            FrameState::Stopped => return Ok(TickOutcome::Stopped),
            state => return Err(FrameError::NotScheduled { state }.into()),
        }
        if self.stop.is_stopped() {
            self.state = FrameState::Stopped;
            tracing::debug!(ticks = self.ticks, "frame loop stopped");
            return Ok(TickOutcome::Stopped);
        }

        self.state = FrameState::Running;
        self.ticks += 1;
        if let Err(e) = body(time) {
            self.state = FrameState::Stopped;
            return Err(e);
        }

        if self.stop.is_stopped() {
            self.state = FrameState::Stopped;
            tracing::debug!(ticks = self.ticks, "frame loop stopped");
            return Ok(TickOutcome::Stopped);
        }
        self.state = FrameState::Scheduled;
        scheduler.request_frame();
        Ok(TickOutcome::Rescheduled)
    }
}

/// Scheduler that records requests for a caller-driven loop (headless runs,
/// tests).
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: bool,
    requests: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending request, if any.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Total requests received.
    pub fn requests(&self) -> u64 {
        self.requests
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
        self.requests += 1;
    }
}
