//! Planar polygons and the vertices they are composed of.

use crate::float_types::Real;
use crate::plane::Plane;
use nalgebra::{Point3, Vector3};

/// A vertex of a polygon, holding position and normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub pos: Point3<Real>,
    pub normal: Vector3<Real>,
}

impl Vertex {
    pub const fn new(pos: Point3<Real>, normal: Vector3<Real>) -> Self {
        Vertex { pos, normal }
    }

    /// Flip the vertex normal in place.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    /// Linear interpolation between `self` (`t = 0`) and `other` (`t = 1`).
    /// Normals are interpolated as well.
    pub fn interpolate(&self, other: &Vertex, t: Real) -> Vertex {
        Vertex::new(
            self.pos + (other.pos - self.pos) * t,
            self.normal + (other.normal - self.normal) * t,
        )
    }
}

/// A flat polygon: a closed loop of at least three vertices plus the plane
/// it lies in. Boundary polygons of a solid are wound so the plane normal
/// points out of the material.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vertex>,
    pub plane: Plane,
}

impl Polygon {
    /// Build a polygon from its vertex loop, fitting the plane with
    /// Newell's method.
    pub fn new(vertices: Vec<Vertex>) -> Self {
        debug_assert!(vertices.len() >= 3, "polygon needs at least 3 vertices");
        let plane = Plane::from_vertices(&vertices);
        Polygon { vertices, plane }
    }

    /// Reverse winding and flip all normals, turning the polygon inside out.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }

    /// A flipped copy of this polygon.
    pub fn flipped(&self) -> Polygon {
        let mut poly = self.clone();
        poly.flip();
        poly
    }

    /// Fan triangulation about the first vertex. Exact for the volume
    /// integral on any planar simple polygon since triangle contributions
    /// are signed.
    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        let n = self.vertices.len();
        (1..n.saturating_sub(1))
            .map(move |i| [self.vertices[0], self.vertices[i], self.vertices[i + 1]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Polygon {
        Polygon::new(vec![
            Vertex::new(Point3::origin(), Vector3::z()),
            Vertex::new(Point3::new(2.0, 0.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(2.0, 2.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(0.0, 2.0, 0.0), Vector3::z()),
        ])
    }

    #[test]
    fn newell_plane_matches_winding() {
        let poly = quad();
        assert!((poly.plane.normal() - Vector3::z()).norm() < 1e-12);
        assert!(poly.plane.offset().abs() < 1e-12);
    }

    #[test]
    fn flip_reverses_plane() {
        let mut poly = quad();
        poly.flip();
        assert!((poly.plane.normal() + Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn fan_triangulation_counts() {
        assert_eq!(quad().triangles().count(), 2);
    }
}
