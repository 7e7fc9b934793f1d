//! Ripple geometry
//!
//! A ripple is a circle centred on the interaction point whose radius reaches
//! the farthest corner of the container, so the fully grown ripple covers the
//! container wherever the press landed.

use inkwave_core::{Point, Rect, Size};

/// Pair up optional page coordinates. Anything short of both yields `None`.
pub fn pointer_from(x: Option<f32>, y: Option<f32>) -> Option<Point> {
    match (x, y) {
        (Some(x), Some(y)) => Some(Point::new(x, y)),
        _ => None,
    }
}

/// Largest distance from `center` to any corner of a box of `size` at the origin
pub fn cover_radius(center: Point, size: Size) -> f32 {
    size.corners()
        .iter()
        .map(|corner| center.distance_to(*corner))
        .fold(0.0, f32::max)
}

/// Position and extent of a ripple, local to its container
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleGeometry {
    pub center: Point,
    pub radius: f32,
}

impl RippleGeometry {
    /// Compute the ripple for a page-space pointer position.
    ///
    /// `container` is the container's page frame and `size` the target's size.
    /// Without a pointer the ripple starts at the center of the box.
    pub fn compute(pointer: Option<Point>, container: Rect, size: Size) -> Self {
        let center = match pointer {
            Some(point) => container.to_local(point),
            None => size.center(),
        };
        Self {
            center,
            radius: cover_radius(center, size),
        }
    }

    pub fn diameter(&self) -> f32 {
        self.radius * 2.0
    }

    /// Bounding box of the circle in container-local coordinates
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.diameter(),
            self.diameter(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_center_press_on_square() {
        let geometry = RippleGeometry::compute(
            Some(Point::new(50.0, 50.0)),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Size::new(100.0, 100.0),
        );
        assert!(approx(geometry.radius, 70.71));

        let bounds = geometry.bounds();
        assert!(approx(bounds.x(), -20.71));
        assert!(approx(bounds.y(), -20.71));
        assert!(approx(bounds.width(), 141.42));
        assert!(approx(bounds.height(), 141.42));
    }

    #[test]
    fn test_corner_press_covers_diagonal() {
        let size = Size::new(120.0, 90.0);
        let container = Rect::from_origin_size(Point::ZERO, size);
        let geometry = RippleGeometry::compute(Some(Point::ZERO), container, size);
        assert!(approx(geometry.radius, size.diagonal()));
    }

    #[test]
    fn test_radius_is_farthest_corner() {
        let size = Size::new(200.0, 40.0);
        let presses: [(f32, f32); 4] = [(10.0, 5.0), (150.0, 30.0), (199.0, 0.0), (100.0, 20.0)];
        for (x, y) in presses {
            let radius = cover_radius(Point::new(x, y), size);
            let expected = [
                x.hypot(y),
                (size.width - x).hypot(y),
                (size.width - x).hypot(size.height - y),
                x.hypot(size.height - y),
            ]
            .into_iter()
            .fold(0.0, f32::max);
            assert!(approx(radius, expected));
        }
    }

    #[test]
    fn test_pointer_relative_to_container_offset() {
        let geometry = RippleGeometry::compute(
            Some(Point::new(130.0, 245.0)),
            Rect::new(100.0, 200.0, 60.0, 90.0),
            Size::new(60.0, 90.0),
        );
        assert_eq!(geometry.center, Point::new(30.0, 45.0));
    }

    #[test]
    fn test_keyboard_activation_uses_center() {
        let geometry = RippleGeometry::compute(
            None,
            Rect::new(300.0, 300.0, 100.0, 80.0),
            Size::new(100.0, 80.0),
        );
        assert_eq!(geometry.center, Point::new(50.0, 40.0));
        assert!(approx(geometry.radius, 64.03));
    }

    #[test]
    fn test_partial_coordinates_fall_back_to_center() {
        assert_eq!(pointer_from(Some(1.0), None), None);
        assert_eq!(pointer_from(None, Some(1.0)), None);
        assert_eq!(pointer_from(Some(1.0), Some(2.0)), Some(Point::new(1.0, 2.0)));
    }
}
