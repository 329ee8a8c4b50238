//! Front-chain sibling packing and minimal enclosing circles.
//!
//! `pack_siblings` places circles tangent to each other around the origin, keeping a front chain
//! of the outermost circles; `pack_enclose` computes the smallest circle containing a set of
//! circles (Welzl's algorithm over a shuffled input).

use crate::error::{Error, Result};
use crate::geom::Circle;
use crate::rng::XorShift64Star;

const SHUFFLE_SEED: u64 = 0x5EED_CAFE;

/// Packs `radii` (each grown by `padding`) and returns the enclosing circle around the origin,
/// grown by `padding` once more.
pub fn enclosing_circle(radii: &[f64], padding: f64) -> Result<Circle> {
    let mut circles: Vec<Circle> = radii
        .iter()
        .map(|&r| Circle::new(0.0, 0.0, r + padding))
        .collect();
    let r = pack_siblings(&mut circles)?;
    Ok(Circle::new(0.0, 0.0, r + padding))
}

/// Places every circle so that no two overlap, centered on the smallest enclosing circle.
/// Returns the radius of that enclosing circle. Input radii are kept, positions are overwritten.
pub fn pack_siblings(circles: &mut [Circle]) -> Result<f64> {
    let n = circles.len();
    if n == 0 {
        return Ok(0.0);
    }

    circles[0].x = 0.0;
    circles[0].y = 0.0;
    if n == 1 {
        return Ok(circles[0].r);
    }

    circles[0].x = -circles[1].r;
    circles[1].x = circles[0].r;
    circles[1].y = 0.0;
    if n == 2 {
        return Ok(circles[0].r + circles[1].r);
    }

    circles[2] = place(circles[1], circles[0], circles[2]);

    // Front chain as a circular doubly linked list over circle indices.
    let mut next = vec![0usize; n];
    let mut prev = vec![0usize; n];
    let (mut a, mut b) = (0usize, 1usize);
    next[0] = 1;
    prev[2] = 1;
    next[1] = 2;
    prev[0] = 2;
    next[2] = 0;
    prev[1] = 0;

    let mut i = 3;
    'pack: while i < n {
        let c = i;
        circles[c] = place(circles[a], circles[b], circles[c]);

        // Closest intersecting circle on the front chain, measured by chain length.
        let mut j = next[b];
        let mut k = prev[a];
        let mut sj = circles[b].r;
        let mut sk = circles[a].r;
        loop {
            if sj <= sk {
                if intersects(&circles[j], &circles[c]) {
                    b = j;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sj += circles[j].r;
                j = next[j];
            } else {
                if intersects(&circles[k], &circles[c]) {
                    a = k;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sk += circles[k].r;
                k = prev[k];
            }
            if j == next[k] {
                break;
            }
        }

        prev[c] = a;
        next[c] = b;
        next[a] = c;
        prev[b] = c;

        // Pick the chain pair closest to the centroid as the next insertion point.
        let mut best = score(circles, &next, a);
        let mut cur = next[c];
        while cur != c {
            let s = score(circles, &next, cur);
            if s < best {
                a = cur;
                best = s;
            }
            cur = next[cur];
        }
        b = next[a];
        i += 1;
    }

    let mut chain = vec![circles[b]];
    let mut cur = next[b];
    while cur != b {
        chain.push(circles[cur]);
        cur = next[cur];
    }
    let e = pack_enclose(&chain)?;

    for circle in circles.iter_mut() {
        circle.x -= e.x;
        circle.y -= e.y;
    }
    Ok(e.r)
}

/// Smallest circle enclosing all `circles`.
pub fn pack_enclose(circles: &[Circle]) -> Result<Circle> {
    if circles.is_empty() {
        return Err(Error::NoCircles);
    }

    let mut shuffled = circles.to_vec();
    XorShift64Star::new(SHUFFLE_SEED).shuffle(&mut shuffled);

    let mut basis: Vec<Circle> = Vec::with_capacity(3);
    let mut e: Option<Circle> = None;
    let mut i = 0;
    while i < shuffled.len() {
        let p = shuffled[i];
        match e {
            Some(enc) if encloses_weak(&enc, &p) => i += 1,
            _ => {
                basis = extend_basis(&basis, p).ok_or(Error::DegenerateBasis {
                    count: circles.len(),
                })?;
                e = Some(enclose_basis(&basis));
                i = 0;
            }
        }
    }
    e.ok_or(Error::NoCircles)
}

fn extend_basis(basis: &[Circle], p: Circle) -> Option<Vec<Circle>> {
    if encloses_weak_all(&p, basis) {
        return Some(vec![p]);
    }

    for &bi in basis {
        if encloses_not(&p, &bi) && encloses_weak_all(&enclose_basis2(&bi, &p), basis) {
            return Some(vec![bi, p]);
        }
    }

    for i in 0..basis.len().saturating_sub(1) {
        for j in (i + 1)..basis.len() {
            let (bi, bj) = (basis[i], basis[j]);
            if encloses_not(&enclose_basis2(&bi, &bj), &p)
                && encloses_not(&enclose_basis2(&bi, &p), &bj)
                && encloses_not(&enclose_basis2(&bj, &p), &bi)
                && encloses_weak_all(&enclose_basis3(&bi, &bj, &p), basis)
            {
                return Some(vec![bi, bj, p]);
            }
        }
    }

    None
}

fn encloses_not(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr < 0.0 || dr * dr < dx * dx + dy * dy
}

fn encloses_weak(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r + a.r.max(b.r).max(1.0) * 1e-9;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn encloses_weak_all(a: &Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|b| encloses_weak(a, b))
}

fn enclose_basis(basis: &[Circle]) -> Circle {
    match basis {
        [a] => *a,
        [a, b] => enclose_basis2(a, b),
        [a, b, c] => enclose_basis3(a, b, c),
        _ => Circle::default(),
    }
}

fn enclose_basis2(a: &Circle, b: &Circle) -> Circle {
    let (x1, y1, r1) = (a.x, a.y, a.r);
    let (x2, y2, r2) = (b.x, b.y, b.r);
    let x21 = x2 - x1;
    let y21 = y2 - y1;
    let r21 = r2 - r1;
    let l = (x21 * x21 + y21 * y21).sqrt();
    Circle::new(
        (x1 + x2 + x21 / l * r21) / 2.0,
        (y1 + y2 + y21 / l * r21) / 2.0,
        (l + r1 + r2) / 2.0,
    )
}

fn enclose_basis3(a: &Circle, b: &Circle, c: &Circle) -> Circle {
    let (x1, y1, r1) = (a.x, a.y, a.r);
    let (x2, y2, r2) = (b.x, b.y, b.r);
    let (x3, y3, r3) = (c.x, c.y, c.r);
    let a2 = x1 - x2;
    let a3 = x1 - x3;
    let b2 = y1 - y2;
    let b3 = y1 - y3;
    let c2 = r2 - r1;
    let c3 = r3 - r1;
    let d1 = x1 * x1 + y1 * y1 - r1 * r1;
    let d2 = d1 - x2 * x2 - y2 * y2 + r2 * r2;
    let d3 = d1 - x3 * x3 - y3 * y3 + r3 * r3;
    let ab = a3 * b2 - a2 * b3;
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - x1;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - y1;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (r1 + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - r1 * r1;
    let r = -(if qa.abs() > 1e-6 {
        (qb + (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
    } else {
        qc / qb
    });
    Circle::new(x1 + xa + xb * r, y1 + ya + yb * r, r)
}

/// Places `c` tangent to both `a` and `b`.
fn place(b: Circle, a: Circle, mut c: Circle) -> Circle {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d2 = dx * dx + dy * dy;
    if d2 > 0.0 {
        let a2 = (a.r + c.r) * (a.r + c.r);
        let b2 = (b.r + c.r) * (b.r + c.r);
        if a2 > b2 {
            let x = (d2 + b2 - a2) / (2.0 * d2);
            let y = (b2 / d2 - x * x).max(0.0).sqrt();
            c.x = b.x - x * dx - y * dy;
            c.y = b.y - x * dy + y * dx;
        } else {
            let x = (d2 + a2 - b2) / (2.0 * d2);
            let y = (a2 / d2 - x * x).max(0.0).sqrt();
            c.x = a.x + x * dx - y * dy;
            c.y = a.y + x * dy + y * dx;
        }
    } else {
        c.x = a.x + c.r;
        c.y = a.y;
    }
    c
}

fn intersects(a: &Circle, b: &Circle) -> bool {
    let dr = a.r + b.r - 1e-6;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn score(circles: &[Circle], next: &[usize], node: usize) -> f64 {
    let a = circles[node];
    let b = circles[next[node]];
    let ab = a.r + b.r;
    let dx = (a.x * b.r + b.x * a.r) / ab;
    let dy = (a.y * b.r + b.y * a.r) / ab;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::{enclose_basis2, place};
    use crate::geom::Circle;

    #[test]
    fn place_is_tangent_to_both_circles() {
        let a = Circle::new(-5.0, 0.0, 5.0);
        let b = Circle::new(5.0, 0.0, 5.0);
        let c = place(b, a, Circle::new(0.0, 0.0, 3.0));
        assert!((c.distance(&a) - 8.0).abs() < 1e-9);
        assert!((c.distance(&b) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn enclose_basis2_spans_both_circles() {
        let e = enclose_basis2(&Circle::new(-5.0, 0.0, 5.0), &Circle::new(5.0, 0.0, 5.0));
        assert!((e.r - 10.0).abs() < 1e-9);
        assert!(e.x.abs() < 1e-9 && e.y.abs() < 1e-9);
    }
}
