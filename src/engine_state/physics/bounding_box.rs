use cgmath::{Point3, Vector3};

/// An axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl BoundingBox {
    /// Builds a box centred on `center` with extents `(width, height, depth)`.
    pub fn new(center: Point3<f32>, dimensions: Vector3<f32>) -> Self {
        let half = dimensions * 0.5;
        BoundingBox {
            min: center - half,
            max: center + half,
        }
    }

    /// The unit box occupied by the block at `position`.
    pub fn block(position: Point3<i32>) -> Self {
        let min = Point3::new(position.x as f32, position.y as f32, position.z as f32);
        BoundingBox {
            min,
            max: min + Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn center(&self) -> Point3<f32> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    pub fn dimensions(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn volume(&self) -> f32 {
        let d = self.dimensions();
        d.x * d.y * d.z
    }

    pub fn translated(&self, offset: Vector3<f32>) -> Self {
        BoundingBox {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Whether the interiors overlap. Boxes that only touch do not intersect.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// The smallest single-axis offset that moves `self` out of `other`.
    ///
    /// Only the axis with the least overlap is non-zero. Its sign pushes `self`
    /// away from `other`'s centre; ties on the centre push towards positive.
    pub fn penetration_vector(&self, other: &BoundingBox) -> Vector3<f32> {
        let self_center = self.center();
        let other_center = other.center();

        let mut axis = 0;
        let mut smallest = f32::INFINITY;
        for i in 0..3 {
            let overlap = (self.max[i] - other.min[i]).min(other.max[i] - self.min[i]);
            if overlap < smallest {
                smallest = overlap;
                axis = i;
            }
        }

        let mut push = Vector3::new(0.0, 0.0, 0.0);
        push[axis] = if self_center[axis] < other_center[axis] {
            -smallest
        } else {
            smallest
        };
        push
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = BoundingBox::block(Point3::new(0, 0, 0));
        let b = BoundingBox::block(Point3::new(1, 0, 0));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&a.translated(Vector3::new(0.5, 0.5, 0.5))));
    }

    #[test]
    fn penetration_uses_the_shallowest_axis() {
        let floor = BoundingBox::block(Point3::new(0, 0, 0));
        let body = BoundingBox::new(Point3::new(0.5, 1.8, 0.5), Vector3::new(0.6, 1.8, 0.6));
        let push = body.penetration_vector(&floor);
        assert!(push.x == 0.0 && push.z == 0.0);
        assert!((push.y - 0.1).abs() < 1e-5);

        let wall = BoundingBox::block(Point3::new(1, 1, 0));
        let body = BoundingBox::new(Point3::new(0.8, 1.5, 0.5), Vector3::new(0.6, 0.8, 0.6));
        let push = body.penetration_vector(&wall);
        assert!(push.y == 0.0 && push.z == 0.0);
        assert!((push.x + 0.1).abs() < 1e-5);
    }

    #[test]
    fn geometry_accessors() {
        let b = BoundingBox::new(Point3::new(1.0, 2.0, 3.0), Vector3::new(2.0, 4.0, 1.0));
        assert_eq!(b.min, Point3::new(0.0, 0.0, 2.5));
        assert_eq!(b.center(), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(b.volume(), 8.0);
    }
}
