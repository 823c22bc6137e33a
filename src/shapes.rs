//! Primitive solids, mainly for tests and demos.

use crate::float_types::Real;
use crate::part::Part;
use crate::polygon::{Polygon, Vertex};
use nalgebra::{Point3, Vector3};

impl Part {
    /// Axis-aligned cuboid centered at `center` with the given full extents,
    /// built from six outward-facing quads.
    pub fn cuboid(center: Point3<Real>, extents: Vector3<Real>) -> Part {
        let h = extents / 2.0;
        let corner = |sx: Real, sy: Real, sz: Real| {
            Point3::new(center.x + sx * h.x, center.y + sy * h.y, center.z + sz * h.z)
        };

        // Each face: four corners wound counter-clockwise seen from outside.
        let faces: [(Vector3<Real>, [Point3<Real>; 4]); 6] = [
            (
                -Vector3::x(),
                [
                    corner(-1.0, -1.0, -1.0),
                    corner(-1.0, -1.0, 1.0),
                    corner(-1.0, 1.0, 1.0),
                    corner(-1.0, 1.0, -1.0),
                ],
            ),
            (
                Vector3::x(),
                [
                    corner(1.0, -1.0, -1.0),
                    corner(1.0, 1.0, -1.0),
                    corner(1.0, 1.0, 1.0),
                    corner(1.0, -1.0, 1.0),
                ],
            ),
            (
                -Vector3::y(),
                [
                    corner(-1.0, -1.0, -1.0),
                    corner(1.0, -1.0, -1.0),
                    corner(1.0, -1.0, 1.0),
                    corner(-1.0, -1.0, 1.0),
                ],
            ),
            (
                Vector3::y(),
                [
                    corner(-1.0, 1.0, -1.0),
                    corner(-1.0, 1.0, 1.0),
                    corner(1.0, 1.0, 1.0),
                    corner(1.0, 1.0, -1.0),
                ],
            ),
            (
                -Vector3::z(),
                [
                    corner(-1.0, -1.0, -1.0),
                    corner(-1.0, 1.0, -1.0),
                    corner(1.0, 1.0, -1.0),
                    corner(1.0, -1.0, -1.0),
                ],
            ),
            (
                Vector3::z(),
                [
                    corner(-1.0, -1.0, 1.0),
                    corner(1.0, -1.0, 1.0),
                    corner(1.0, 1.0, 1.0),
                    corner(-1.0, 1.0, 1.0),
                ],
            ),
        ];

        let polygons = faces
            .into_iter()
            .map(|(normal, corners)| {
                Polygon::new(corners.into_iter().map(|p| Vertex::new(p, normal)).collect())
            })
            .collect();
        Part::from_polygons(polygons)
    }

    /// Cube of side `size` centered at the origin.
    pub fn cube(size: Real) -> Part {
        Part::cuboid(Point3::origin(), Vector3::new(size, size, size))
    }
}
