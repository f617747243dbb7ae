//! World dimensions and tuning constants for the particle engine.

/// World width. Positions live in `[0, MAX_X]`.
pub const MAX_X: f32 = 600.0;
/// World height. Positions live in `[0, MAX_Y]`.
pub const MAX_Y: f32 = 600.0;

/// Per-component velocity limit enforced after each integration step.
pub const MAX_VEL: f32 = 7.0;
/// Per-component acceleration limit used when sampling random accelerations.
pub const MAX_ACC: f32 = 2.0;

/// Radius assigned to static particles.
pub const DEFAULT_RADIUS: f32 = 3.0;
/// Smallest radius drawn for randomized particles.
pub const MIN_R: f32 = 3.0;
/// Largest radius drawn for randomized particles.
pub const MAX_R: f32 = 7.0;

/// Velocity components below this magnitude are zeroed during integration.
pub const EPSILON: f32 = 0.01;

/// Storage grows and shrinks in increments of this many slots.
pub const BLOCK_SIZE: usize = 3;

// Bounce tuning. The rebound amplifies slightly and never drops below a
// floor speed, so particles cannot die against a wall.
/// Multiplier applied to the reflected velocity component.
pub const REBOUND_FACTOR: f32 = 1.2;
/// Minimum speed of the reflected component after a bounce.
pub const MIN_REBOUND_SPEED: f32 = 1.5;
/// Gap left between the particle edge and the wall after repositioning.
pub const SEPARATION_MARGIN: f32 = 0.5;
/// Extra outward impulse when both axes bounce in the same call.
pub const CORNER_IMPULSE: f32 = 1.1;
/// Damping applied to the acceleration component of a bounced axis.
pub const ACCEL_DAMPING: f32 = 0.7;
/// Below this magnitude a damped acceleration component is re-seeded.
pub const ACCEL_THRESHOLD: f32 = 0.05;
/// Scale of the randomized replacement acceleration after a bounce.
pub const RANDOM_ACCEL_FACTOR: f32 = 0.1;
