use nautilus_geom::{Circle, Point, Vector, point};

/// Geometry owned by a single node.
///
/// The relative position is measured from the center of the parent circle; for the root it is
/// measured from the origin. `relative` stays `None` until the node is placed for the first time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeCircle {
    relative: Option<Point>,
    absolute: Circle,
}

impl NodeCircle {
    pub fn radius(&self) -> f64 {
        self.absolute.r
    }

    pub fn absolute(&self) -> Circle {
        self.absolute
    }

    pub fn is_placed(&self) -> bool {
        self.relative.is_some()
    }

    pub fn relative_position(&self) -> Point {
        self.relative.unwrap_or_else(Point::origin)
    }

    pub(crate) fn set_radius(&mut self, r: f64) {
        self.absolute.r = r;
    }

    pub(crate) fn move_to(&mut self, relative: Point, parent: &Circle) {
        self.relative = Some(relative);
        self.absolute.move_to(parent.center() + relative.to_vector());
    }

    pub(crate) fn translate(&mut self, delta: Vector) {
        self.absolute.translate(delta);
    }

    pub(crate) fn translate_relative(&mut self, delta: Vector) {
        self.relative = Some(self.relative_position() + delta);
        self.absolute.translate(delta);
    }

    /// Adopts a simulated absolute position, pulled back inside `parent` (minus `padding`) when
    /// it escaped. Returns the resulting absolute center.
    pub(crate) fn take_absolute_position(
        &mut self,
        position: Point,
        parent: &Circle,
        padding: f64,
    ) -> Point {
        let offset = fit_into(position - parent.center(), self.absolute.r, parent.r, padding);
        self.move_to(point(offset.x, offset.y), parent);
        self.absolute.center()
    }
}

/// Shortens `offset` so that a circle of radius `r` stays inside a circle of radius `outer`.
fn fit_into(offset: Vector, r: f64, outer: f64, padding: f64) -> Vector {
    let max = outer - r - padding;
    if max <= 0.0 {
        return Vector::zero();
    }
    let len = offset.length();
    if len > max { offset * (max / len) } else { offset }
}

#[cfg(test)]
mod tests {
    use super::{NodeCircle, fit_into};
    use nautilus_geom::{Circle, point, vector};

    #[test]
    fn fit_into_keeps_inner_offsets() {
        assert_eq!(fit_into(vector(3.0, 4.0), 1.0, 10.0, 1.0), vector(3.0, 4.0));
    }

    #[test]
    fn fit_into_shortens_escaping_offsets() {
        let v = fit_into(vector(30.0, 40.0), 1.0, 10.0, 1.0);
        assert!((v.length() - 8.0).abs() < 1e-9);
        assert!((v.x / v.y - 0.75).abs() < 1e-9);
    }

    #[test]
    fn fit_into_centers_circles_that_cannot_fit() {
        assert_eq!(fit_into(vector(1.0, 0.0), 10.0, 10.0, 1.0), vector(0.0, 0.0));
    }

    #[test]
    fn take_absolute_position_updates_relative_position() {
        let parent = Circle::new(100.0, 100.0, 50.0);
        let mut circle = NodeCircle::default();
        circle.set_radius(10.0);
        let abs = circle.take_absolute_position(point(300.0, 100.0), &parent, 0.0);
        assert_eq!(abs, point(140.0, 100.0));
        assert_eq!(circle.relative_position(), point(40.0, 0.0));
        assert!(circle.is_placed());
    }
}
