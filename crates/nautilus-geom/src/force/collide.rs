use super::Body;
use crate::rng::XorShift64Star;

/// Pushes overlapping bodies apart so that their centers end up at least
/// `r_a + r_b + 2 * padding` away from each other. Lighter (smaller) bodies move further.
#[derive(Debug, Clone)]
pub struct CollideForce {
    nodes: Vec<usize>,
    padding: f64,
    strength: f64,
}

impl CollideForce {
    pub fn new(nodes: Vec<usize>, padding: f64) -> Self {
        Self {
            nodes,
            padding,
            strength: 1.0,
        }
    }

    pub(super) fn apply(&self, bodies: &mut [Body], rng: &mut XorShift64Star) {
        for (pos, &i) in self.nodes.iter().enumerate() {
            let ri = bodies[i].r + self.padding;
            let ri2 = ri * ri;
            let xi = bodies[i].x + bodies[i].vx;
            let yi = bodies[i].y + bodies[i].vy;

            for &j in &self.nodes[pos + 1..] {
                let rj = bodies[j].r + self.padding;
                let r = ri + rj;
                let mut x = xi - bodies[j].x - bodies[j].vx;
                let mut y = yi - bodies[j].y - bodies[j].vy;
                let mut l = x * x + y * y;
                if l >= r * r {
                    continue;
                }
                if x == 0.0 {
                    x = rng.jiggle();
                    l += x * x;
                }
                if y == 0.0 {
                    y = rng.jiggle();
                    l += y * y;
                }
                l = l.sqrt();
                l = (r - l) / l * self.strength;
                x *= l;
                y *= l;

                let rj2 = rj * rj;
                let share = rj2 / (ri2 + rj2);
                bodies[i].vx += x * share;
                bodies[i].vy += y * share;
                bodies[j].vx -= x * (1.0 - share);
                bodies[j].vy -= y * (1.0 - share);
            }
        }
    }
}
