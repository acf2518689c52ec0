//! Deterministic 2D light-and-shadow puzzle simulation.
//!
//! Lights cast rays against a frozen per-tick scene; anything a ray
//! reaches takes damage once per source per tick at the closest observed
//! distance. Blocks the player places occlude and reflect light, cells
//! corrupt as the player dies, and a [`Simulation`] ties the whole loop
//! together. Rendering, input and audio live elsewhere; this crate is the
//! rules engine only.

pub mod ability;
pub mod actor;
pub mod block;
pub mod geom;
pub mod grid;
pub mod light;
pub mod score;
pub mod world;

mod consts;
mod rng;
mod sim;

pub use consts::*;
pub use rng::SimRng;
pub use sim::{Simulation, TickOutcome};
