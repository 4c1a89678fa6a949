//! Settle animation: moves a value from where a gesture left it to a resting
//! target, one host frame at a time.

/// Base duration of a slide across the full travel range, in milliseconds.
pub const BASE_SETTLE_DURATION_MILLIS: u64 = 256;

/// Upper bound for any slide, in milliseconds.
pub const MAX_SETTLE_DURATION_MILLIS: u64 = 600;

/// Hard cap on settle frames. A settle still running by then is snapped onto
/// its target, even when the host clock stalls or runs backwards.
pub const MAX_SETTLE_FRAMES: u32 = 240;

/// Trait for types that can be linearly interpolated.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

impl Lerp for f64 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction as f64
    }
}

/// Scalar values a settle animation can drive.
pub trait SettleScalar: Lerp + Copy + PartialEq + std::fmt::Debug {
    fn to_f32(self) -> f32;
}

impl SettleScalar for f32 {
    fn to_f32(self) -> f32 {
        self
    }
}

impl SettleScalar for f64 {
    fn to_f32(self) -> f32 {
        self as f32
    }
}

/// Linear slide whose duration grows with the distance it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideSpec {
    pub base_duration_millis: u64,
    pub max_duration_millis: u64,
}

impl SlideSpec {
    pub fn new(base_duration_millis: u64, max_duration_millis: u64) -> Self {
        Self {
            base_duration_millis,
            max_duration_millis: max_duration_millis.max(base_duration_millis),
        }
    }

    /// Duration for covering `distance` out of a travel `range`.
    ///
    /// A full-range slide takes twice the base duration, a zero-length one
    /// takes the base duration, and nothing exceeds the maximum.
    pub fn duration_millis(&self, distance: f32, range: f32) -> u64 {
        let distance = distance.abs();
        let ratio = if range > 0.0 && range.is_finite() {
            (distance / range).min(1.0)
        } else {
            1.0
        };
        let duration = (self.base_duration_millis as f32 * (1.0 + ratio)).round() as u64;
        duration.min(self.max_duration_millis)
    }
}

impl Default for SlideSpec {
    fn default() -> Self {
        Self::new(BASE_SETTLE_DURATION_MILLIS, MAX_SETTLE_DURATION_MILLIS)
    }
}

/// Spring configuration for a physically settled slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// Damping ratio. 1.0 = critically damped, > 1.0 = over-damped.
    pub damping_ratio: f32,
    /// Stiffness constant. Higher values settle faster.
    pub stiffness: f32,
    /// Velocity threshold (progress units per second) to stop the spring.
    pub velocity_threshold: f32,
    /// Position threshold (progress units) to stop the spring.
    pub position_threshold: f32,
}

impl SpringSpec {
    /// Critically damped spring: no overshoot, so the settled value never
    /// leaves the start..target interval.
    pub fn critically_damped() -> Self {
        Self {
            damping_ratio: 1.0,
            stiffness: 1500.0,
            velocity_threshold: 0.01,
            position_threshold: 0.001,
        }
    }

    pub fn stiff() -> Self {
        Self {
            stiffness: 3000.0,
            ..Self::critically_damped()
        }
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::critically_damped()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettleSpec {
    Slide(SlideSpec),
    Spring(SpringSpec),
}

impl Default for SettleSpec {
    fn default() -> Self {
        SettleSpec::Slide(SlideSpec::default())
    }
}

/// Result of advancing a settle animation by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettleStep<T> {
    Running(T),
    Finished(T),
}

impl<T: Copy> SettleStep<T> {
    pub fn value(&self) -> T {
        match self {
            SettleStep::Running(value) | SettleStep::Finished(value) => *value,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, SettleStep::Finished(_))
    }
}

/// A single in-flight settle from `start` to `target`.
#[derive(Debug, Clone)]
pub struct SettleAnimation<T: SettleScalar> {
    start: T,
    target: T,
    current: T,
    spec: SettleSpec,
    duration_nanos: u64,
    start_time_nanos: Option<u64>,
    last_time_nanos: Option<u64>,
    /// Spring velocity in progress units per second.
    velocity: f32,
    frames: u32,
    finished: bool,
}

impl<T: SettleScalar> SettleAnimation<T> {
    /// Starts a settle. `range` is the full travel distance the value can
    /// cover, used to scale slide durations.
    pub fn new(start: T, target: T, spec: SettleSpec, range: f32) -> Self {
        let distance = target.to_f32() - start.to_f32();
        let duration_nanos = match spec {
            SettleSpec::Slide(slide) => slide.duration_millis(distance, range) * 1_000_000,
            SettleSpec::Spring(_) => 0,
        };
        let finished = start == target;
        log::trace!(
            "settle {:?} -> {:?} over {} ns ({:?})",
            start,
            target,
            duration_nanos,
            spec
        );
        Self {
            start,
            target,
            current: start,
            spec,
            duration_nanos,
            start_time_nanos: None,
            last_time_nanos: None,
            velocity: 0.0,
            frames: 0,
            finished,
        }
    }

    pub fn start(&self) -> T {
        self.start
    }

    pub fn target(&self) -> T {
        self.target
    }

    pub fn value(&self) -> T {
        self.current
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of frames this animation has consumed so far.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Advance to `frame_time_nanos`. The first tick anchors the clock.
    pub fn tick(&mut self, frame_time_nanos: u64) -> SettleStep<T> {
        if self.finished {
            return SettleStep::Finished(self.current);
        }
        self.frames = self.frames.saturating_add(1);

        if self.frames >= MAX_SETTLE_FRAMES {
            log::debug!(
                "settle hit the frame cap at {} ns, snapping to target",
                frame_time_nanos
            );
            self.finish();
        } else {
            match self.spec {
                SettleSpec::Slide(_) => self.tick_slide(frame_time_nanos),
                SettleSpec::Spring(spring) => self.tick_spring(spring, frame_time_nanos),
            }
        }

        if self.finished {
            SettleStep::Finished(self.current)
        } else {
            SettleStep::Running(self.current)
        }
    }

    /// Jump straight to the target.
    pub fn finish(&mut self) -> T {
        self.current = self.target;
        self.start = self.target;
        self.velocity = 0.0;
        self.finished = true;
        self.current
    }

    fn tick_slide(&mut self, frame_time_nanos: u64) {
        let start_time = *self.start_time_nanos.get_or_insert(frame_time_nanos);
        let elapsed = frame_time_nanos.saturating_sub(start_time);
        let duration = self.duration_nanos.max(1);
        let progress = (elapsed as f32 / duration as f32).clamp(0.0, 1.0);

        if progress >= 1.0 {
            self.finish();
        } else {
            self.current = self.start.lerp(&self.target, progress);
        }
    }

    fn tick_spring(&mut self, spec: SpringSpec, frame_time_nanos: u64) {
        let last = *self.last_time_nanos.get_or_insert(frame_time_nanos);
        self.last_time_nanos = Some(frame_time_nanos);
        let dt = frame_time_nanos.saturating_sub(last) as f32 / 1_000_000_000.0;

        if dt <= 0.0 {
            return;
        }

        let stiffness = spec.stiffness;
        let damping = 2.0 * spec.damping_ratio * stiffness.sqrt();
        let span = self.target.to_f32() - self.start.to_f32();
        let mut progress = if span.abs() < f32::EPSILON {
            1.0
        } else {
            (self.current.to_f32() - self.start.to_f32()) / span
        };

        // Semi-implicit Euler in fixed steps for stability.
        let timestep: f32 = 0.004;
        let mut simulated = 0.0f32;
        while simulated < dt {
            let step = timestep.min(dt - simulated);
            let displacement = progress - 1.0;
            let force = -stiffness * displacement - damping * self.velocity;
            self.velocity += force * step;
            progress += self.velocity * step;
            simulated += step;
        }

        let progress = progress.clamp(0.0, 1.0);
        self.current = self.start.lerp(&self.target, progress);

        let at_rest = self.velocity.abs() < spec.velocity_threshold;
        let near_target = (1.0 - progress).abs() < spec.position_threshold;
        if near_target && (at_rest || progress >= 1.0) {
            self.finish();
        }
    }
}

#[cfg(test)]
#[path = "tests/settle_tests.rs"]
mod tests;
