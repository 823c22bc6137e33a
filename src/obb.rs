//! Oriented bounding boxes used as enclosing-volume proxies.

use crate::float_types::Real;
use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};

// Cap on how many face-normal hints feed candidate orientations.
const MAX_HINTS: usize = 16;

/// An oriented bounding box: orthonormal axes, full extents along them, and
/// the box center in world space.
///
/// Fitting tries the world axes, the principal axes of the point cloud, and
/// every orthogonalized pair of supplied face normals, keeping the smallest
/// box. For prismatic parts the face-normal candidates recover the exact
/// minimal box; for organic shapes the principal axes are a fair fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct Obb {
    pub center: Point3<Real>,
    /// Box axes as the columns of an orthonormal matrix.
    pub axes: Matrix3<Real>,
    /// Full extent of the box along each axis.
    pub extents: Vector3<Real>,
}

impl Obb {
    /// Fit a box around `points`, using `normal_hints` (typically the
    /// part's distinct face normals) as candidate orientations.
    pub fn fit(points: &[Point3<Real>], normal_hints: &[Vector3<Real>]) -> Obb {
        if points.is_empty() {
            return Obb {
                center: Point3::origin(),
                axes: Matrix3::identity(),
                extents: Vector3::zeros(),
            };
        }

        let mut best = Obb::from_axes(points, Matrix3::identity());
        let mut consider = |axes: Matrix3<Real>| {
            let candidate = Obb::from_axes(points, axes);
            if candidate.volume() < best.volume() {
                best = candidate;
            }
        };

        consider(principal_axes(points));
        for (i, a) in normal_hints.iter().take(MAX_HINTS).enumerate() {
            for b in normal_hints.iter().take(MAX_HINTS).skip(i + 1) {
                if a.dot(b).abs() > 0.99 {
                    continue;
                }
                let x = a.normalize();
                let y = (b - x * b.dot(&x)).normalize();
                let z = x.cross(&y);
                consider(Matrix3::from_columns(&[x, y, z]));
            }
        }

        best
    }

    /// The tightest box with the given orthonormal `axes`.
    pub fn from_axes(points: &[Point3<Real>], axes: Matrix3<Real>) -> Obb {
        let mut mins = Vector3::repeat(Real::MAX);
        let mut maxs = Vector3::repeat(-Real::MAX);
        for p in points {
            let local = axes.transpose() * p.coords;
            for k in 0..3 {
                mins[k] = mins[k].min(local[k]);
                maxs[k] = maxs[k].max(local[k]);
            }
        }
        let center_local = (mins + maxs) / 2.0;
        Obb {
            center: Point3::from(axes * center_local),
            axes,
            extents: maxs - mins,
        }
    }

    pub fn volume(&self) -> Real {
        self.extents.x * self.extents.y * self.extents.z
    }

    /// Extents sorted in descending order.
    pub fn sorted_extents(&self) -> [Real; 3] {
        let mut e = [self.extents.x, self.extents.y, self.extents.z];
        e.sort_by(|a, b| b.total_cmp(a));
        e
    }
}

/// Principal axes of the point cloud: eigenvectors of the covariance matrix.
fn principal_axes(points: &[Point3<Real>]) -> Matrix3<Real> {
    let n = points.len() as Real;
    let centroid = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords)
        / n;
    let covariance = points.iter().fold(Matrix3::zeros(), |acc, p| {
        let d = p.coords - centroid;
        acc + d * d.transpose()
    }) / n;
    SymmetricEigen::new(covariance).eigenvectors
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Rotation3;

    fn box_corners(extents: Vector3<Real>) -> Vec<Point3<Real>> {
        let h = extents / 2.0;
        let mut corners = Vec::new();
        for sx in [-1.0, 1.0] {
            for sy in [-1.0, 1.0] {
                for sz in [-1.0, 1.0] {
                    corners.push(Point3::new(sx * h.x, sy * h.y, sz * h.z));
                }
            }
        }
        corners
    }

    #[test]
    fn axis_aligned_box_is_exact() {
        let corners = box_corners(Vector3::new(160.0, 80.0, 40.0));
        let obb = Obb::fit(&corners, &[Vector3::x(), Vector3::y(), Vector3::z()]);
        let extents = obb.sorted_extents();
        assert!((extents[0] - 160.0).abs() < 1e-9);
        assert!((extents[1] - 80.0).abs() < 1e-9);
        assert!((extents[2] - 40.0).abs() < 1e-9);
        assert!((obb.volume() - 160.0 * 80.0 * 40.0).abs() < 1e-6);
    }

    #[test]
    fn rotated_box_recovered_from_normal_hints() {
        let rotation = Rotation3::from_euler_angles(0.3, -0.8, 1.1);
        let corners: Vec<_> = box_corners(Vector3::new(100.0, 50.0, 25.0))
            .into_iter()
            .map(|p| rotation * p)
            .collect();
        let hints = [
            rotation * Vector3::x(),
            rotation * Vector3::y(),
            rotation * Vector3::z(),
        ];
        let obb = Obb::fit(&corners, &hints);
        assert!((obb.volume() - 100.0 * 50.0 * 25.0).abs() < 1e-6);
    }
}
