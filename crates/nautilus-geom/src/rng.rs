/// xorshift64*: small, seedable and reproducible across platforms.
#[derive(Debug, Clone)]
pub(crate) struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    /// Uniform in `[0, 1)` with 53 bits of precision.
    pub(crate) fn next_f64_unit(&mut self) -> f64 {
        let u = self.next_u64() >> 11;
        (u as f64) / ((1u64 << 53) as f64)
    }

    /// A tiny non-zero offset used to separate coincident points.
    pub(crate) fn jiggle(&mut self) -> f64 {
        let v = (self.next_f64_unit() - 0.5) * 1e-6;
        if v == 0.0 { 1e-7 } else { v }
    }

    pub(crate) fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = ((self.next_f64_unit() * ((i + 1) as f64)).floor() as usize).min(i);
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::XorShift64Star;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = XorShift64Star::new(7);
        let mut b = XorShift64Star::new(7);
        for _ in 0..16 {
            assert_eq!(a.next_f64_unit().to_bits(), b.next_f64_unit().to_bits());
        }
    }

    #[test]
    fn jiggle_is_tiny_and_non_zero() {
        let mut rng = XorShift64Star::new(1);
        for _ in 0..64 {
            let j = rng.jiggle();
            assert!(j != 0.0);
            assert!(j.abs() <= 5e-7);
        }
    }

    #[test]
    fn shuffle_keeps_elements() {
        let mut rng = XorShift64Star::new(3);
        let mut items = vec![1, 2, 3, 4, 5, 6];
        rng.shuffle(&mut items);
        items.sort();
        assert_eq!(items, vec![1, 2, 3, 4, 5, 6]);
    }
}
