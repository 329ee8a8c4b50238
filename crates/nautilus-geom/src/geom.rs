pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

/// A positioned circle. `x`/`y` is the center.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    pub fn center(&self) -> Point {
        point(self.x, self.y)
    }

    pub fn distance(&self, other: &Circle) -> f64 {
        (self.center() - other.center()).length()
    }

    /// Touching circles count as overlapping.
    pub fn overlaps(&self, other: &Circle) -> bool {
        self.distance(other) <= self.r + other.r
    }

    pub fn translate(&mut self, delta: Vector) {
        self.x += delta.x;
        self.y += delta.y;
    }

    pub fn move_to(&mut self, center: Point) {
        self.x = center.x;
        self.y = center.y;
    }

    /// Position of `self` relative to the center of `frame`.
    pub fn relative_to(&self, frame: &Circle) -> Vector {
        self.center() - frame.center()
    }
}

#[cfg(test)]
mod tests {
    use super::{Circle, vector};

    #[test]
    fn touching_circles_overlap() {
        let a = Circle::new(0.0, 0.0, 5.0);
        let b = Circle::new(10.0, 0.0, 5.0);
        assert!(a.overlaps(&b));
        let c = Circle::new(10.5, 0.0, 5.0);
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn relative_to_is_center_difference() {
        let mut a = Circle::new(3.0, 4.0, 1.0);
        a.translate(vector(1.0, 1.0));
        let frame = Circle::new(1.0, 1.0, 10.0);
        assert_eq!(a.relative_to(&frame), vector(3.0, 4.0));
        assert_eq!(a.distance(&frame), 5.0);
    }
}
