use glam::{Mat4, Vec3};

/// An axis aligned bounding box.
///
/// A newly created box is empty (min is +inf, max is -inf) and grows as points
/// are added to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an empty bounding box.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Create the smallest bounding box containing all of `points`.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut aabb = Self::empty();
        points.into_iter().for_each(|p| aabb.extend(p));
        aabb
    }

    /// Grow the box to include `point`.
    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grow the box to include all of `other`.
    pub fn union(&mut self, other: &Aabb) {
        if !other.is_empty() {
            self.extend(other.min);
            self.extend(other.max);
        }
    }

    /// True if no point has been added to this box.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Center of the box. Only meaningful for non-empty boxes.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent of the box along each axis. Empty boxes have zero size.
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Largest extent along any of the three axes.
    pub fn max_extent(&self) -> f32 {
        self.size().max_element()
    }

    /// Bounding box of this box after it is transformed by `matrix`.
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        if self.is_empty() {
            return *self;
        }

        let corners = (0..8).map(|i| {
            Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        });

        Aabb::from_points(corners.map(|c| matrix.transform_point3(c)))
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_has_no_size() {
        let aabb = Aabb::empty();
        assert!(aabb.is_empty());
        assert_eq!(Vec3::ZERO, aabb.size());
        assert_eq!(0.0, aabb.max_extent());
    }

    #[test]
    fn extend_grows_box() {
        let aabb = Aabb::from_points([Vec3::new(-1.0, 2.0, 0.0), Vec3::new(3.0, -2.0, 1.0)]);
        assert_eq!(Vec3::new(-1.0, -2.0, 0.0), aabb.min);
        assert_eq!(Vec3::new(3.0, 2.0, 1.0), aabb.max);
        assert_eq!(Vec3::new(1.0, 0.0, 0.5), aabb.center());
        assert_eq!(4.0, aabb.max_extent());
    }

    #[test]
    fn single_point_box_is_not_empty() {
        let aabb = Aabb::from_points([Vec3::ONE]);
        assert!(!aabb.is_empty());
        assert_eq!(0.0, aabb.max_extent());
    }

    #[test]
    fn transformed_box_follows_scale_and_translation() {
        let aabb = Aabb::from_points([Vec3::ZERO, Vec3::ONE]);
        let m =
            Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)) * Mat4::from_scale(Vec3::splat(2.0));
        let t = aabb.transformed(&m);
        assert_eq!(Vec3::new(1.0, 0.0, 0.0), t.min);
        assert_eq!(Vec3::new(3.0, 2.0, 2.0), t.max);
    }
}
