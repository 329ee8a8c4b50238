use super::Body;
use crate::rng::XorShift64Star;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Spring {
    source: usize,
    target: usize,
    distance: f64,
    strength: f64,
    bias: f64,
}

/// Spring force pulling linked bodies towards `r_source + r_target + 2 * padding` apart.
///
/// Strength is `1 / min(degree(source), degree(target))` and the correction is split by degree,
/// so hubs move less than their leaves.
#[derive(Debug, Clone, Default)]
pub struct LinkForce {
    springs: Vec<Spring>,
}

impl LinkForce {
    /// `links` are `(source, target)` body indices; self-links are ignored.
    pub fn new(bodies: &[Body], links: &[(usize, usize)], padding: f64) -> Self {
        let links: Vec<(usize, usize)> = links.iter().copied().filter(|(s, t)| s != t).collect();

        let mut degree = vec![0usize; bodies.len()];
        for &(s, t) in &links {
            degree[s] += 1;
            degree[t] += 1;
        }

        let springs = links
            .into_iter()
            .map(|(source, target)| {
                let (ds, dt) = (degree[source] as f64, degree[target] as f64);
                Spring {
                    source,
                    target,
                    distance: bodies[source].r + bodies[target].r + 2.0 * padding,
                    strength: 1.0 / ds.min(dt),
                    bias: ds / (ds + dt),
                }
            })
            .collect();

        Self { springs }
    }

    pub fn len(&self) -> usize {
        self.springs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.springs.is_empty()
    }

    pub(super) fn apply(&self, bodies: &mut [Body], alpha: f64, rng: &mut XorShift64Star) {
        for spring in &self.springs {
            let (s, t) = (bodies[spring.source], bodies[spring.target]);
            let mut x = t.x + t.vx - s.x - s.vx;
            if x == 0.0 {
                x = rng.jiggle();
            }
            let mut y = t.y + t.vy - s.y - s.vy;
            if y == 0.0 {
                y = rng.jiggle();
            }
            let mut l = (x * x + y * y).sqrt();
            l = (l - spring.distance) / l * alpha * spring.strength;
            x *= l;
            y *= l;

            let b = spring.bias;
            let target = &mut bodies[spring.target];
            target.vx -= x * b;
            target.vy -= y * b;
            let source = &mut bodies[spring.source];
            source.vx += x * (1.0 - b);
            source.vy += y * (1.0 - b);
        }
    }
}
