//! Cutting planes and polygon classification against them.

use crate::float_types::{EPSILON, Real};
use crate::polygon::{Polygon, Vertex};
use nalgebra::{Point3, Unit, Vector3};

// Classification of a point or polygon relative to a plane. `SPANNING` is
// the bitwise combination of `FRONT` and `BACK`.
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// An oriented plane `n · p = w` with unit normal `n`.
///
/// Planes are compared only by the geometry they induce (see
/// [`Plane::coincident_with`]), never by identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    normal: Vector3<Real>,
    w: Real,
}

impl Plane {
    /// Build from a (possibly non-unit) normal and the signed offset from
    /// the origin along the *unit* normal.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        let normal = Unit::new_normalize(normal).into_inner();
        Plane { normal, w }
    }

    /// Build from a point on the plane and a (possibly non-unit) normal.
    pub fn from_point_normal(origin: Point3<Real>, normal: Vector3<Real>) -> Self {
        let normal = Unit::new_normalize(normal).into_inner();
        Plane {
            normal,
            w: normal.dot(&origin.coords),
        }
    }

    /// Fit a plane to a vertex loop with Newell's method; the normal follows
    /// the loop's winding.
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        let mut newell = Vector3::zeros();
        for (i, v) in vertices.iter().enumerate() {
            let next = &vertices[(i + 1) % vertices.len()];
            newell += v.pos.coords.cross(&next.pos.coords);
        }
        if newell.norm_squared() < EPSILON * EPSILON {
            // Degenerate loop; fall back to +Z through the first vertex.
            let origin = vertices.first().map_or(Point3::origin(), |v| v.pos);
            return Plane::from_point_normal(origin, Vector3::z());
        }
        let normal = newell.normalize();
        let w = vertices
            .iter()
            .map(|v| normal.dot(&v.pos.coords))
            .sum::<Real>()
            / vertices.len() as Real;
        Plane { normal, w }
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    /// Signed offset from the origin along the unit normal.
    pub const fn offset(&self) -> Real {
        self.w
    }

    /// A reference point on the plane: the projection of the origin.
    pub fn origin(&self) -> Point3<Real> {
        Point3::from(self.normal * self.w)
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    pub fn flipped(&self) -> Plane {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Signed distance from `point` to the plane; positive on the front side.
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point as `FRONT`, `BACK` or `COPLANAR` within `EPSILON`.
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let d = self.signed_distance(point);
        if d > EPSILON {
            FRONT
        } else if d < -EPSILON {
            BACK
        } else {
            COPLANAR
        }
    }

    /// Whether `self` and `other` describe the same cut within tolerances:
    /// normal angle within `angle_tolerance` radians and offsets within
    /// `offset_tolerance`. Opposite orientations of the same plane coincide.
    pub fn coincident_with(
        &self,
        other: &Plane,
        angle_tolerance: Real,
        offset_tolerance: Real,
    ) -> bool {
        let mut dot = self.normal.dot(&other.normal);
        let mut other_w = other.w;
        if dot < 0.0 {
            dot = -dot;
            other_w = -other_w;
        }
        dot.clamp(-1.0, 1.0).acos() <= angle_tolerance
            && (self.w - other_w).abs() <= offset_tolerance
    }

    /// Split `polygon` by this plane into four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    ///
    /// Spanning polygons are clipped; intersection vertices are interpolated
    /// on the crossing edges and shared by both output sides. A side that
    /// comes out disconnected (non-convex polygons) is reassembled into one
    /// simple loop per piece. Fragments keep the parent polygon's plane
    /// rather than refitting it, so repeated splits do not drift.
    #[allow(clippy::type_complexity)]
    pub fn split_polygon(
        &self,
        polygon: &Polygon,
    ) -> (Vec<Polygon>, Vec<Polygon>, Vec<Polygon>, Vec<Polygon>) {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos))
            .collect();
        let polygon_type = types.iter().fold(0, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal()) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let mut split_front: Vec<Vertex> = Vec::new();
                let mut split_back: Vec<Vertex> = Vec::new();

                for i in 0..polygon.vertices.len() {
                    let j = (i + 1) % polygon.vertices.len();
                    let type_i = types[i];
                    let type_j = types[j];
                    let vertex_i = &polygon.vertices[i];
                    let vertex_j = &polygon.vertices[j];

                    if type_i != BACK {
                        split_front.push(*vertex_i);
                    }
                    if type_i != FRONT {
                        split_back.push(*vertex_i);
                    }

                    // Edge crosses the plane: interpolate the intersection
                    // and hand it to both sides.
                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vertex_j.pos - vertex_i.pos));
                        if denom.abs() > EPSILON {
                            let t = (self.w - self.normal.dot(&vertex_i.pos.coords)) / denom;
                            let crossing = vertex_i.interpolate(vertex_j, t);
                            split_front.push(crossing);
                            split_back.push(crossing);
                        }
                    }
                }

                let section_dir = self.normal.cross(&polygon.plane.normal());
                for vertices in self.reconnect_side(split_front, &section_dir) {
                    if vertices.len() >= 3 {
                        front.push(Polygon {
                            vertices,
                            plane: polygon.plane.clone(),
                        });
                    }
                }
                for vertices in self.reconnect_side(split_back, &section_dir) {
                    if vertices.len() >= 3 {
                        back.push(Polygon {
                            vertices,
                            plane: polygon.plane.clone(),
                        });
                    }
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }

    /// Reassemble one clipped side of a polygon into simple loops.
    ///
    /// Clipping a non-convex polygon can leave a side in several pieces; the
    /// vertex splice above then yields one self-touching loop whose bridge
    /// edges run along the cut line. Those bridges degenerate later cuts, so
    /// the loop is taken apart at its on-plane vertices into chains, the
    /// chain endpoints are ordered along the section line, and ends are
    /// rejoined to starts pairwise along that line. A loop with at most one
    /// chain is already simple and passes through untouched.
    fn reconnect_side(
        &self,
        vertices: Vec<Vertex>,
        section_dir: &Vector3<Real>,
    ) -> Vec<Vec<Vertex>> {
        let n = vertices.len();
        let on_plane: Vec<bool> = vertices
            .iter()
            .map(|v| self.orient_point(&v.pos) == COPLANAR)
            .collect();

        let mut chains: Vec<Vec<Vertex>> = Vec::new();
        for start in 0..n {
            if !on_plane[start] || on_plane[(start + 1) % n] {
                continue;
            }
            let mut chain = vec![vertices[start]];
            let mut i = (start + 1) % n;
            while !on_plane[i] {
                chain.push(vertices[i]);
                i = (i + 1) % n;
            }
            chain.push(vertices[i]);
            chains.push(chain);
        }
        if chains.len() <= 1 {
            return vec![vertices];
        }

        struct Endpoint {
            t: Real,
            chain: usize,
            is_end: bool,
        }
        let mut endpoints = Vec::with_capacity(chains.len() * 2);
        for (k, chain) in chains.iter().enumerate() {
            endpoints.push(Endpoint {
                t: section_dir.dot(&chain[0].pos.coords),
                chain: k,
                is_end: false,
            });
            endpoints.push(Endpoint {
                t: section_dir.dot(&chain[chain.len() - 1].pos.coords),
                chain: k,
                is_end: true,
            });
        }
        endpoints.sort_by(|a, b| a.t.total_cmp(&b.t));

        // Consecutive endpoint pairs along the line are the cap-boundary
        // segments, each linking one chain's end to another's start.
        let mut next = vec![usize::MAX; chains.len()];
        for pair in endpoints.chunks_exact(2) {
            let (from, to) = match (pair[0].is_end, pair[1].is_end) {
                (true, false) => (pair[0].chain, pair[1].chain),
                (false, true) => (pair[1].chain, pair[0].chain),
                // Tangent contact; leave the loop alone.
                _ => return vec![vertices],
            };
            next[from] = to;
        }

        let mut loops = Vec::new();
        let mut visited = vec![false; chains.len()];
        for start in 0..chains.len() {
            if visited[start] {
                continue;
            }
            let mut ring = Vec::new();
            let mut k = start;
            loop {
                visited[k] = true;
                ring.extend(chains[k].iter().copied());
                k = next[k];
                if k == start {
                    break;
                }
            }
            loops.push(ring);
        }
        loops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_normalize() {
        let plane = Plane::from_normal(Vector3::new(0.0, 0.0, 3.0), 2.0);
        assert!((plane.normal().norm() - 1.0).abs() < 1e-12);
        assert_eq!(plane.offset(), 2.0);

        let plane = Plane::from_point_normal(
            Point3::new(0.0, 0.0, 2.0),
            Vector3::new(0.0, 0.0, 5.0),
        );
        assert!((plane.offset() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn orients_points() {
        let plane = Plane::from_normal(Vector3::z(), 1.0);
        assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, 2.0)), FRONT);
        assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, 0.0)), BACK);
        assert_eq!(plane.orient_point(&Point3::new(5.0, -3.0, 1.0)), COPLANAR);
    }

    #[test]
    fn coincidence_ignores_orientation() {
        let a = Plane::from_normal(Vector3::x(), 4.0);
        let b = Plane::from_normal(-Vector3::x(), -4.0);
        assert!(a.coincident_with(&b, 0.01, 0.1));
        let c = Plane::from_normal(Vector3::x(), 5.0);
        assert!(!a.coincident_with(&c, 0.01, 0.1));
    }

    #[test]
    fn splits_spanning_polygon() {
        let plane = Plane::from_normal(Vector3::x(), 1.0);
        let square = Polygon::new(vec![
            Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(2.0, 0.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(2.0, 2.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(0.0, 2.0, 0.0), Vector3::z()),
        ]);
        let (cf, cb, front, back) = plane.split_polygon(&square);
        assert!(cf.is_empty() && cb.is_empty());
        assert_eq!(front.len(), 1);
        assert_eq!(back.len(), 1);
        // Each half is a quad sharing the two interpolated vertices.
        assert_eq!(front[0].vertices.len(), 4);
        assert_eq!(back[0].vertices.len(), 4);
        for v in &front[0].vertices {
            assert!(v.pos.x >= 1.0 - EPSILON);
        }
    }

    #[test]
    fn split_reconnects_a_disconnected_side() {
        // U-shaped octagon: a 10 x 10 square with a 2-wide slot cut down to
        // y = 3. Splitting at y = 5 disconnects the front side into the two
        // slot arms.
        let u = Polygon::new(vec![
            Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(10.0, 0.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(10.0, 10.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(6.0, 10.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(6.0, 3.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(4.0, 3.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(4.0, 10.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(0.0, 10.0, 0.0), Vector3::z()),
        ]);
        let plane = Plane::from_normal(Vector3::y(), 5.0);
        let (cf, cb, front, back) = plane.split_polygon(&u);
        assert!(cf.is_empty() && cb.is_empty());

        // One simple quad per arm, confined to its side of the slot.
        assert_eq!(front.len(), 2);
        for poly in &front {
            assert_eq!(poly.vertices.len(), 4);
            let xs: Vec<Real> = poly.vertices.iter().map(|v| v.pos.x).collect();
            assert!(
                xs.iter().all(|x| *x <= 4.0 + EPSILON)
                    || xs.iter().all(|x| *x >= 6.0 - EPSILON)
            );
        }

        // The back side stays connected and comes out as one simple loop.
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].vertices.len(), 8);
    }
}
