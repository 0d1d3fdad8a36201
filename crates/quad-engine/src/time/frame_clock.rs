use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Fixed-rate frame pacer.
///
/// Produces one deadline per tick interval. The host waits until the deadline,
/// requests a redraw, and calls [`FramePacer::tick`] when the frame runs.
///
/// After a stall longer than one interval the schedule resynchronizes to
/// `now` instead of firing a burst of catch-up frames.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    next: Instant,
    last: Option<Instant>,
    frame_index: u64,
}

impl FramePacer {
    /// Creates a pacer whose first deadline is `start`.
    ///
    /// `fps` of zero is treated as one tick per second.
    pub fn new(fps: u32, start: Instant) -> Self {
        Self {
            interval: Duration::from_secs(1) / fps.max(1),
            next: start,
            last: None,
            frame_index: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Deadline of the next tick.
    pub fn next_deadline(&self) -> Instant {
        self.next
    }

    /// Returns true once the next deadline has passed.
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next
    }

    /// Records a frame at `now` and schedules the next deadline.
    pub fn tick(&mut self, now: Instant) -> FrameTime {
        let dt = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));

        self.next += self.interval;
        if self.next <= now {
            self.next = now + self.interval;
        }
        self.last = Some(now);

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}
