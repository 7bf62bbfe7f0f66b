//! Smooth re-centering: a precomputed sequence of transforms and a player
//! that steps through it.

use std::time::{Duration, Instant};
use tracing::debug;
use treebolic_core::Transformer;
use treebolic_hyper::distance::{e2h, h2e, hyperbolic_distance};
use treebolic_hyper::{Complex, HyperTransform};

/// Delay before a requested animation starts moving.
pub const ANIMATION_START_DELAY: Duration = Duration::from_millis(1000);
/// Time an animation takes from first to last step.
pub const ANIMATION_DURATION: Duration = Duration::from_millis(1000);
/// Default steps per unit of hyperbolic distance.
const STEPS_PER_UNIT: f64 = 3.0;

/// Ordered transforms, each composed with the transform active when the
/// sequence was built.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTransforms {
    pub transforms: Vec<HyperTransform>,
}

impl AnimationTransforms {
    /// Interpolate the motion carrying `from` to `to`.
    ///
    /// Intermediate steps advance uniformly in hyperbolic distance. Returns
    /// `None` when the two points coincide. Without an explicit step count
    /// the sequence length grows with the distance to cover.
    pub fn make(
        from: Complex,
        to: Complex,
        transformer: &Transformer,
        orientation: Complex,
        steps: Option<usize>,
    ) -> Option<Self> {
        let distance = hyperbolic_distance(from, to);
        if distance == 0.0 {
            return None;
        }
        let steps = steps
            .unwrap_or_else(|| (distance * STEPS_PER_UNIT).round() as usize)
            .max(1);

        let current = transformer.transform_value();
        let final_transform = transformer.make_transform(from, to, orientation);
        // the point the final transform sends to the origin
        let z0 = final_transform.inverse().map(Complex::ZERO);
        let dist = z0.abs();
        let theta = if dist != 0.0 { z0.scale(1.0 / dist) } else { Complex::ZERO };

        let mut transforms = Vec::with_capacity(steps);
        for i in 1..steps {
            let step = if dist != 0.0 {
                let progress = i as f64 / steps as f64;
                let di = h2e(e2h(dist) * progress);
                let z = theta.scale(di);
                transformer.make_transform(z, Complex::ZERO, orientation)
            } else {
                final_transform
            };
            transforms.push(current.compose(&step));
        }
        transforms.push(current.compose(&final_transform));

        debug!("Animation from {:?} to {:?}: {} steps", from, to, transforms.len());
        Some(Self { transforms })
    }

    /// Single jump to the destination.
    pub fn make_single(from: Complex, to: Complex, transformer: &Transformer, orientation: Complex) -> Self {
        let final_transform = transformer.make_transform(from, to, orientation);
        Self {
            transforms: vec![transformer.transform_value().compose(&final_transform)],
        }
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

/// Whatever an animation moves.
pub trait AnimationTarget {
    fn apply_transform(&mut self, transform: HyperTransform);
    fn repaint(&mut self);
}

/// Cursor over an [`AnimationTransforms`] sequence.
#[derive(Debug, Clone)]
pub struct Animation {
    transforms: Vec<HyperTransform>,
    index: Option<usize>,
}

impl Animation {
    pub fn new(transforms: AnimationTransforms) -> Self {
        Self {
            transforms: transforms.transforms,
            index: None,
        }
    }

    pub fn steps(&self) -> usize {
        self.transforms.len()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_finished(&self) -> bool {
        self.index.is_some_and(|i| i + 1 >= self.transforms.len())
    }

    /// Move to `requested`, or to the next step when `None`.
    ///
    /// Returns `false` without touching the target when the index is
    /// unchanged or past the end.
    pub fn advance<T: AnimationTarget + ?Sized>(&mut self, target: &mut T, requested: Option<usize>) -> bool {
        let index = match requested {
            Some(i) => i,
            None => self.index.map_or(0, |i| i + 1),
        };
        if Some(index) == self.index || index >= self.transforms.len() {
            return false;
        }
        self.index = Some(index);
        target.apply_transform(self.transforms[index]);
        target.repaint();
        true
    }
}

/// Drives an [`Animation`] from wall-clock time: after the start delay the
/// steps are spread linearly over [`ANIMATION_DURATION`]. Ticks that arrive
/// late skip straight to the step due.
#[derive(Debug, Clone)]
pub struct Animator {
    animation: Animation,
    start: Instant,
    delay: Duration,
    duration: Duration,
}

impl Animator {
    pub fn new(animation: Animation, now: Instant, delay: Duration) -> Self {
        Self {
            animation,
            start: now,
            delay,
            duration: ANIMATION_DURATION,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    pub fn is_running(&self) -> bool {
        !self.animation.is_finished()
    }

    /// When the next step is due, for hosts that schedule repaints.
    pub fn next_deadline(&self) -> Instant {
        let last = self.animation.steps().saturating_sub(1).max(1) as u32;
        let begin = self.start + self.delay;
        match self.animation.index() {
            None => begin,
            Some(i) => begin + self.duration * (i as u32 + 1) / last,
        }
    }

    /// Apply the step due at `now`. Returns whether the animation is still
    /// running.
    pub fn tick<T: AnimationTarget + ?Sized>(&mut self, target: &mut T, now: Instant) -> bool {
        let begin = self.start + self.delay;
        if now < begin {
            return true;
        }
        let last = self.animation.steps().saturating_sub(1);
        let elapsed = now - begin;
        let fraction = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };
        let step = (fraction * last as f64) as usize;
        self.animation.advance(target, Some(step));
        self.is_running()
    }

    /// Jump to the last step.
    pub fn finish<T: AnimationTarget + ?Sized>(&mut self, target: &mut T) {
        let last = self.animation.steps().saturating_sub(1);
        self.animation.advance(target, Some(last));
    }
}
