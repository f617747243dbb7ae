use crate::core::params::{
    ACCEL_DAMPING, ACCEL_THRESHOLD, CORNER_IMPULSE, DEFAULT_RADIUS, EPSILON, MAX_ACC, MAX_R,
    MAX_VEL, MAX_X, MAX_Y, MIN_R, MIN_REBOUND_SPEED, RANDOM_ACCEL_FACTOR, REBOUND_FACTOR,
    SEPARATION_MARGIN,
};
use crate::core::vec::Vec2;
use rand::Rng;
use std::fmt;
use std::mem;

/// A circular particle moving inside the `[0, MAX_X] × [0, MAX_Y]` world.
///
/// Fields:
/// - `position`, `velocity`, `acceleration`: 2D kinematic state
/// - `radius`: collision radius (> 0 for meaningful geometry)
/// - `kind`: `0` for dynamic particles, any nonzero value for static ones
///
/// After every [`step`](Particle::step) both velocity components are within
/// `±MAX_VEL`. Position containment is restored by [`bounce`](Particle::bounce)
/// or [`wrap`](Particle::wrap), not by the step itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Center of the particle.
    pub position: Vec2,
    /// Displacement applied per tick.
    pub velocity: Vec2,
    /// Velocity change applied per tick.
    pub acceleration: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Kind tag: `0` = dynamic, nonzero = static.
    pub kind: i32,
}

impl Particle {
    /// Create a particle from fully explicit state.
    pub fn new(position: Vec2, acceleration: Vec2, velocity: Vec2, radius: f32, kind: i32) -> Self {
        Self {
            position,
            velocity,
            acceleration,
            radius,
            kind,
        }
    }

    /// Create a dynamic particle (`kind == 0`) with randomized kinematics.
    ///
    /// The radius is drawn first so the spawn rectangle can keep a margin of
    /// two radii from every wall. Each velocity component is drawn from
    /// `[-MAX_VEL, MAX_VEL]` and snapped to at least `±1.0` (sign-preserving)
    /// so no particle starts near-static. Acceleration starts at zero.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let radius = rng.random_range(MIN_R..=MAX_R);
        let position = Vec2::new(
            rng.random_range(radius * 2.0..=MAX_X - radius * 2.0),
            rng.random_range(radius * 2.0..=MAX_Y - radius * 2.0),
        );

        let mut vx = rng.random_range(-MAX_VEL..=MAX_VEL);
        let mut vy = rng.random_range(-MAX_VEL..=MAX_VEL);
        if vx.abs() < 1.0 {
            vx = if vx >= 0.0 { 1.0 } else { -1.0 };
        }
        if vy.abs() < 1.0 {
            vy = if vy >= 0.0 { 1.0 } else { -1.0 };
        }

        Self {
            position,
            velocity: Vec2::new(vx, vy),
            acceleration: Vec2::zero(),
            radius,
            kind: 0,
        }
    }

    /// Create a static particle: zero motion and the default radius.
    pub fn fixed(kind: i32) -> Self {
        Self {
            position: Vec2::zero(),
            velocity: Vec2::zero(),
            acceleration: Vec2::zero(),
            radius: DEFAULT_RADIUS,
            kind,
        }
    }

    /// Whether this particle is static (`kind != 0`).
    #[inline]
    pub fn is_static(&self) -> bool {
        self.kind != 0
    }

    /// Kinetic energy under the unit-mass convention: `|v|² / 2`.
    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        let v = self.velocity;
        0.5 * (v.x * v.x + v.y * v.y)
    }

    /// Advance one tick of explicit Euler integration.
    ///
    /// Velocity accumulates the acceleration, components below `EPSILON` are
    /// zeroed, both components are clamped to `±MAX_VEL`, and the position
    /// accumulates the result. World boundaries are not consulted here; an
    /// out-of-bounds position is corrected by `bounce` or `wrap`.
    pub fn step(&mut self) {
        self.velocity.add(self.acceleration);

        if self.velocity.x.abs() < EPSILON {
            self.velocity.x = 0.0;
        }
        if self.velocity.y.abs() < EPSILON {
            self.velocity.y = 0.0;
        }

        self.velocity.x = self.velocity.x.clamp(-MAX_VEL, MAX_VEL);
        self.velocity.y = self.velocity.y.clamp(-MAX_VEL, MAX_VEL);

        self.position.add(self.velocity);
    }

    /// Reflect the particle off any world edge its leading edge has crossed.
    ///
    /// Each axis is handled independently: the velocity component is inverted
    /// and amplified by `REBOUND_FACTOR` with a floor of `MIN_REBOUND_SPEED`,
    /// and the particle is repositioned flush against the wall plus
    /// `SEPARATION_MARGIN` so the same bounce cannot re-trigger next tick.
    /// When both axes bounce in one call (a corner hit) both components get an
    /// extra `CORNER_IMPULSE` plus a small random jitter to break periodic
    /// cycling. Bounced axes also damp their acceleration component and
    /// re-seed it toward the world interior once it falls below
    /// `ACCEL_THRESHOLD`. The call always ends with the position clamped to
    /// `[radius, MAX − radius]` on both axes.
    pub fn bounce<R: Rng>(&mut self, rng: &mut R) {
        let hit_x = reflect_axis(&mut self.position.x, &mut self.velocity.x, self.radius, MAX_X);
        let hit_y = reflect_axis(&mut self.position.y, &mut self.velocity.y, self.radius, MAX_Y);

        if hit_x && hit_y {
            self.velocity.x *= CORNER_IMPULSE;
            self.velocity.y *= CORNER_IMPULSE;
            self.velocity.x += rng.random_range(-0.5..=0.5);
            self.velocity.y += rng.random_range(-0.5..=0.5);
        }

        if hit_x {
            reseed_axis_accel(&mut self.acceleration.x, self.position.x, MAX_X, rng);
        }
        if hit_y {
            reseed_axis_accel(&mut self.acceleration.y, self.position.y, MAX_Y, rng);
        }

        // Whatever the arithmetic above produced, the call ends inside the world.
        self.position.x = self.position.x.clamp(self.radius, MAX_X - self.radius);
        self.position.y = self.position.y.clamp(self.radius, MAX_Y - self.radius);
    }

    /// Teleport the particle across the world seam once it has left one side.
    ///
    /// A particle that has fully exited reappears flush inside the opposite
    /// edge. While it still straddles the seam (center out, body partly
    /// visible) it is shifted by the world extent instead, so the visible
    /// portion stays continuous across the seam.
    pub fn wrap(&mut self) {
        if self.position.x + self.radius < 0.0 {
            self.position.x = MAX_X - self.radius;
        } else if self.position.x - self.radius > MAX_X {
            self.position.x = self.radius;
        } else if self.position.x > MAX_X {
            self.position.x -= MAX_X;
        } else if self.position.x < 0.0 {
            self.position.x += MAX_X;
        }

        if self.position.y + self.radius < 0.0 {
            self.position.y = MAX_Y - self.radius;
        } else if self.position.y - self.radius > MAX_Y {
            self.position.y = self.radius;
        } else if self.position.y > MAX_Y {
            self.position.y -= MAX_Y;
        } else if self.position.y < 0.0 {
            self.position.y += MAX_Y;
        }
    }

    /// Whether the two particles overlap: center distance strictly below the
    /// sum of the radii.
    pub fn collides_with(&self, other: &Particle) -> bool {
        self.position.distance(other.position) < self.radius + other.radius
    }

    /// Resolve a collision by exchanging velocity and acceleration vectors.
    ///
    /// The exchange is an elastic collision under the equal-mass assumption.
    /// If the particles still overlap after the swap they are pushed apart
    /// along the line between their centers, half the overlap each. Exactly
    /// coincident centers give a zero separation direction, so no push is
    /// applied in that case.
    pub fn resolve_collision(&mut self, other: &mut Particle) {
        mem::swap(&mut self.velocity, &mut other.velocity);
        mem::swap(&mut self.acceleration, &mut other.acceleration);

        let dist = self.position.distance(other.position);
        let min_dist = self.radius + other.radius;
        if dist < min_dist {
            let mut dir = self.position - other.position;
            dir.normalize();
            dir.scale((min_dist - dist) * 0.5);
            self.position.add(dir);
            other.position.add(-dir);
        }
    }
}

/// Reflect one axis against the `[0, max]` world edges. Returns whether the
/// axis bounced.
fn reflect_axis(pos: &mut f32, vel: &mut f32, radius: f32, max: f32) -> bool {
    if *pos - radius <= 0.0 || *pos + radius >= max {
        *vel = -*vel * REBOUND_FACTOR;
        if vel.abs() < MIN_REBOUND_SPEED {
            *vel = MIN_REBOUND_SPEED.copysign(*vel);
        }

        if *pos - radius < 0.0 {
            *pos = radius + SEPARATION_MARGIN;
        } else if *pos + radius > max {
            *pos = max - radius - SEPARATION_MARGIN;
        }
        true
    } else {
        false
    }
}

/// Damp one acceleration component after a bounce; once it drops below
/// `ACCEL_THRESHOLD`, replace it with a small random value signed toward the
/// interior half of the world.
fn reseed_axis_accel<R: Rng>(acc: &mut f32, pos: f32, max: f32, rng: &mut R) {
    *acc *= ACCEL_DAMPING;
    if acc.abs() < ACCEL_THRESHOLD {
        let toward_center = if pos < max * 0.5 { 1.0 } else { -1.0 };
        *acc = toward_center * RANDOM_ACCEL_FACTOR * rng.random_range(0.0..=MAX_ACC);
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}, {}, {}, {}, {}}}",
            self.position, self.velocity, self.acceleration, self.radius, self.kind
        )
    }
}
