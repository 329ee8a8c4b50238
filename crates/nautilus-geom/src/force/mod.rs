//! Damped-velocity force simulations over a shared body store.
//!
//! Bodies live outside of any simulation so that several simulations (for example one link
//! simulation spanning a whole level plus one collision simulation per parent) can step the same
//! bodies together. Each simulation owns its alpha schedule and the indices of the bodies it
//! integrates.

mod collide;
mod link;

pub use collide::CollideForce;
pub use link::LinkForce;

use crate::geom::{Point, point};
use crate::rng::XorShift64Star;

/// A simulated circle. `fx`/`fy` pin the body in place when set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub r: f64,
    pub fx: Option<f64>,
    pub fy: Option<f64>,
}

impl Body {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            r,
            fx: None,
            fy: None,
        }
    }

    pub fn position(&self) -> Point {
        point(self.x, self.y)
    }

    pub fn fix(&mut self) {
        self.fx = Some(self.x);
        self.fy = Some(self.y);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    pub alpha: f64,
    pub alpha_min: f64,
    pub alpha_decay: f64,
    pub alpha_target: f64,
    /// Fraction of velocity lost per tick.
    pub velocity_decay: f64,
    pub random_seed: u64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        let alpha_min = 0.001;
        Self {
            alpha: 1.0,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            alpha_target: 0.0,
            velocity_decay: 0.4,
            random_seed: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Force {
    Link(LinkForce),
    Collide(CollideForce),
}

impl Force {
    fn apply(&self, bodies: &mut [Body], alpha: f64, rng: &mut XorShift64Star) {
        match self {
            Force::Link(f) => f.apply(bodies, alpha, rng),
            Force::Collide(f) => f.apply(bodies, rng),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Simulation {
    nodes: Vec<usize>,
    forces: Vec<Force>,
    params: SimulationParams,
    alpha: f64,
    rng: XorShift64Star,
}

impl Simulation {
    /// `nodes` are indices into the body slice passed to [`Simulation::tick`].
    pub fn new(nodes: Vec<usize>, params: SimulationParams) -> Self {
        Self {
            nodes,
            forces: Vec::new(),
            alpha: params.alpha,
            rng: XorShift64Star::new(params.random_seed),
            params,
        }
    }

    pub fn with_force(mut self, force: Force) -> Self {
        self.forces.push(force);
        self
    }

    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn is_converged(&self) -> bool {
        self.alpha < self.params.alpha_min
    }

    /// Number of ticks needed for alpha to cool from 1 below `alpha_min`.
    pub fn tick_budget(&self) -> usize {
        let decay = self.params.alpha_decay;
        if !(decay > 0.0 && decay < 1.0) {
            return 0;
        }
        (self.params.alpha_min.ln() / (1.0 - decay).ln()).ceil().max(0.0) as usize
    }

    pub fn tick(&mut self, bodies: &mut [Body]) {
        self.alpha += (self.params.alpha_target - self.alpha) * self.params.alpha_decay;

        for force in &self.forces {
            force.apply(bodies, self.alpha, &mut self.rng);
        }

        let keep = 1.0 - self.params.velocity_decay;
        for &i in &self.nodes {
            let body = &mut bodies[i];
            match body.fx {
                Some(fx) => {
                    body.x = fx;
                    body.vx = 0.0;
                }
                None => {
                    body.vx *= keep;
                    body.x += body.vx;
                }
            }
            match body.fy {
                Some(fy) => {
                    body.y = fy;
                    body.vy = 0.0;
                }
                None => {
                    body.vy *= keep;
                    body.y += body.vy;
                }
            }
        }
    }
}

/// Steps every simulation in lockstep, starting at tick `start`, until the tick budget of
/// `simulations[main]` is spent. `on_tick` runs after each step. Returns the tick count reached,
/// which can be passed as `start` to continue with a different set of simulations.
pub fn run_simulations(
    simulations: &mut [Simulation],
    main: usize,
    start: usize,
    bodies: &mut [Body],
    mut on_tick: impl FnMut(&mut [Body]),
) -> usize {
    let Some(budget) = simulations.get(main).map(Simulation::tick_budget) else {
        return start;
    };

    let mut k = start;
    while k < budget {
        for simulation in simulations.iter_mut() {
            simulation.tick(bodies);
        }
        on_tick(bodies);
        k += 1;
    }
    k
}
