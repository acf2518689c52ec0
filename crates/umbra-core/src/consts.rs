//! Simulation tuning constants.

/// Seconds a freshly placed block must survive before destruction releases
/// its grid cell. Guards against placement/destruction races within the
/// same instant the block appears.
pub const BLOCK_CREATION_GRACE: f32 = 0.05;

/// Seconds without any exposure before a block stops counting as lit.
pub const BLOCK_UNLIT_GRACE: f32 = 0.1;

/// Seconds a mirror keeps its reflected beam after it stops receiving light.
pub const MIRROR_UNLIT_SHUTOFF: f32 = 0.1;

/// Seconds without any exposure before a receptor deactivates.
pub const RECEPTOR_UNLIT_SHUTOFF: f32 = 0.5;

/// Hard cap on reflection chaining. A reflected beam never spawns another
/// bounce, whatever it hits.
pub const MAX_BOUNCE_DEPTH: u8 = 1;

/// Lifetime of a spawned abyss flame, in seconds.
pub const FLAME_LIFETIME: f32 = 5.0;

/// Hit points of a freshly placed block.
pub const BLOCK_MAX_HP: f32 = 5.0;

/// Reach of placement/teleport abilities, in world units.
pub const DEFAULT_ABILITY_RANGE: f32 = 3.0;

/// Size of the shared ability charge pool.
pub const DEFAULT_CHARGES: u32 = 6;

/// Distance at which a patrolling light snaps onto its waypoint.
pub const PATROL_ARRIVAL_EPSILON: f32 = 0.05;

/// Directions shorter than this are treated as "no light cast this tick".
pub const MIN_DIRECTION_LENGTH: f32 = 1e-6;
