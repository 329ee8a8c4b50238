#![forbid(unsafe_code)]

//! Headless circle geometry for nested-circle layouts.
//!
//! - [`geom`]: points, vectors and circles
//! - [`pack`]: sibling packing and minimal enclosing circles
//! - [`force`]: link and collision simulations with a shared stepping driver

pub mod error;
pub mod force;
pub mod geom;
pub mod pack;
mod rng;

pub use error::{Error, Result};
pub use force::{Body, CollideForce, Force, LinkForce, Simulation, SimulationParams, run_simulations};
pub use geom::{Circle, Point, Vector, point, vector};
pub use pack::{enclosing_circle, pack_enclose, pack_siblings};
