//! Presentational card motion. The flip phase interpolates the question/answer
//! rotation (0 = question face forward, 1 = answer face forward); the slide
//! offset carries the horizontal transition between cards. Both are springs
//! that only ever chase targets set by the logical state.

/// Overdamped spring integrator. The parameter pairs below keep the response
/// monotonic: the value approaches its target without overshoot and settles
/// within a bounded time.
#[derive(Debug, Clone)]
pub struct Spring {
    value: f32,
    velocity: f32,
    target: f32,
    stiffness: f32,
    damping: f32,
}

const SETTLE_EPSILON: f32 = 1e-3;

impl Spring {
    #[must_use]
    pub fn new(value: f32, stiffness: f32, damping: f32) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: value,
            stiffness,
            damping,
        }
    }

    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[must_use]
    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jumps to a value with no animation, clearing any in-flight velocity.
    pub fn snap_to(&mut self, value: f32) {
        self.value = value;
        self.velocity = 0.0;
        self.target = value;
    }

    /// Integrates one step of `dt` seconds. Returns the new value.
    pub fn tick(&mut self, dt: f32) -> f32 {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return self.value;
        }

        let acceleration = self.stiffness * (self.target - self.value) - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.value += self.velocity * dt;

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
        self.value
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < SETTLE_EPSILON && self.velocity.abs() < SETTLE_EPSILON
    }
}

/// Which side of the screen the incoming card slides in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideFrom {
    /// Navigating forward: the new card starts off-screen right.
    Right,
    /// Navigating back: the new card starts off-screen left.
    Left,
}

// Spring constants follow the tuned feel of the flip (slow, soft) versus the
// slide (fast, firm).
const FLIP_STIFFNESS: f32 = 10.0;
const FLIP_DAMPING: f32 = 8.0;
const SLIDE_STIFFNESS: f32 = 60.0;
const SLIDE_DAMPING: f32 = 16.0;

/// The two motion channels of a review card.
#[derive(Debug, Clone)]
pub struct CardMotion {
    flip: Spring,
    slide: Spring,
    view_width: f32,
}

impl CardMotion {
    #[must_use]
    pub fn new(view_width: f32) -> Self {
        Self {
            flip: Spring::new(0.0, FLIP_STIFFNESS, FLIP_DAMPING),
            slide: Spring::new(0.0, SLIDE_STIFFNESS, SLIDE_DAMPING),
            view_width,
        }
    }

    /// Animates the flip toward the answer face (1.0) or question face (0.0).
    pub fn begin_flip(&mut self, to_answer: bool) {
        self.flip.set_target(if to_answer { 1.0 } else { 0.0 });
    }

    /// Snaps the flip back to the question face with no animation, for use
    /// when the card underneath changes.
    pub fn reset_flip(&mut self) {
        self.flip.snap_to(0.0);
    }

    /// Starts a slide from the given off-screen edge toward center.
    pub fn begin_slide(&mut self, from: SlideFrom) {
        let start = match from {
            SlideFrom::Right => self.view_width,
            SlideFrom::Left => -self.view_width,
        };
        self.slide.snap_to(start);
        self.slide.set_target(0.0);
    }

    pub fn tick(&mut self, dt: f32) {
        self.flip.tick(dt);
        self.slide.tick(dt);
    }

    /// Flip interpolation value, clamped to [0, 1].
    #[must_use]
    pub fn flip_phase(&self) -> f32 {
        self.flip.value().clamp(0.0, 1.0)
    }

    /// Horizontal offset of the card; 0 at rest.
    #[must_use]
    pub fn slide_offset(&self) -> f32 {
        self.slide.value()
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.flip.is_settled() && self.slide.is_settled()
    }
}
