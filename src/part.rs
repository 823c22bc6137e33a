//! Watertight solids represented as polygon soups, and the plane bisection
//! the node-splitting contract relies on.

use crate::errors::SplitRejection;
use crate::float_types::{EPSILON, Real, parry3d::bounding_volume::Aabb};
use crate::obb::Obb;
use crate::plane::{COPLANAR, FRONT, Plane, SPANNING};
use crate::polygon::{Polygon, Vertex};
use nalgebra::{Point3, Vector3};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Fragments smaller than this fraction of their parent are degenerate.
const MIN_FRAGMENT_RATIO: Real = 1e-6;

/// A watertight solid: boundary polygons wound with outward normals.
///
/// Parts are immutable inputs to the partitioning tree; every cut produces
/// two new parts and never touches the original.
#[derive(Debug, Clone)]
pub struct Part {
    pub polygons: Vec<Polygon>,
    /// Lazily calculated AABB spanning `polygons`.
    bounding_box: OnceLock<Aabb>,
}

impl Part {
    pub fn from_polygons(polygons: Vec<Polygon>) -> Part {
        Part {
            polygons,
            bounding_box: OnceLock::new(),
        }
    }

    /// All boundary vertices, one per polygon corner (shared corners repeat).
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.polygons.iter().flat_map(|p| p.vertices.iter())
    }

    /// Axis-aligned bounds of all polygons.
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for v in self.vertices() {
                for k in 0..3 {
                    mins[k] = mins[k].min(v.pos[k]);
                    maxs[k] = maxs[k].max(v.pos[k]);
                }
            }
            if mins.x > maxs.x {
                return Aabb::new(Point3::origin(), Point3::origin());
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Signed volume via the divergence theorem; positive for outward-wound
    /// boundaries.
    pub fn volume(&self) -> Real {
        let mut six_v = 0.0;
        for poly in &self.polygons {
            for [a, b, c] in poly.triangles() {
                six_v += a.pos.coords.dot(&b.pos.coords.cross(&c.pos.coords));
            }
        }
        six_v / 6.0
    }

    /// Distinct face normals, deduplicated at 3 decimal places. Useful as
    /// candidate cutting directions and as orientation hints for OBB fitting.
    pub fn unique_normals(&self) -> Vec<Vector3<Real>> {
        let mut seen = HashSet::new();
        let mut normals = Vec::new();
        for poly in &self.polygons {
            let n = poly.plane.normal();
            let key = (
                (n.x * 1e3).round() as i64,
                (n.y * 1e3).round() as i64,
                (n.z * 1e3).round() as i64,
            );
            if seen.insert(key) {
                normals.push(n);
            }
        }
        normals
    }

    /// Oriented bounding box of this part.
    pub fn obb(&self) -> Obb {
        let points: Vec<Point3<Real>> = self.vertices().map(|v| v.pos).collect();
        Obb::fit(&points, &self.unique_normals())
    }

    /// Cut this part with `plane` into the (negative, positive) half-space
    /// fragments, capping both cross-sections so the fragments stay
    /// watertight.
    ///
    /// The part itself is never modified; rejection leaves nothing behind.
    pub fn bisect(&self, plane: &Plane) -> Result<(Part, Part), SplitRejection> {
        let mut negative: Vec<Polygon> = Vec::new();
        let mut positive: Vec<Polygon> = Vec::new();
        let mut section: Vec<[Vertex; 2]> = Vec::new();

        for poly in &self.polygons {
            let (coplanar_front, coplanar_back, front, back) = plane.split_polygon(poly);
            // A face on the cut whose outward normal follows the plane
            // normal closes the material below the plane.
            negative.extend(coplanar_front);
            positive.extend(coplanar_back);
            positive.extend(front);
            negative.extend(back);
            section.extend(crossing_segments(plane, poly));
        }

        if negative.is_empty() || positive.is_empty() {
            return Err(SplitRejection::MissedPart);
        }

        let weld = (self.bounding_box().extents().norm() * 1e-5).max(EPSILON);
        for ring in chain_loops(section, weld)? {
            let cap = cap_polygon(ring, plane);
            positive.push(cap.flipped());
            negative.push(cap);
        }

        let negative = Part::from_polygons(negative);
        let positive = Part::from_polygons(positive);

        let floor = self.volume().abs() * MIN_FRAGMENT_RATIO;
        if negative.volume() <= floor || positive.volume() <= floor {
            return Err(SplitRejection::DegenerateFragment);
        }
        Ok((negative, positive))
    }
}

/// Chords cut across `poly` by `plane`, as vertex pairs on the plane.
///
/// Spanning edges contribute interpolated crossings, and a vertex lying on
/// the plane between opposite-side neighbors is itself a crossing. All
/// crossings of a planar polygon lie on one line, so pairing them in order
/// along that line yields the material chords even for non-convex faces.
fn crossing_segments(plane: &Plane, poly: &Polygon) -> Vec<[Vertex; 2]> {
    let n = poly.vertices.len();
    let types: Vec<i8> = poly
        .vertices
        .iter()
        .map(|v| plane.orient_point(&v.pos))
        .collect();

    match types.iter().fold(0, |acc, &t| acc | t) {
        // An edge of a front-side polygon lying in the plane is a ready-made
        // chord. Its back-side twin is skipped, so a watertight mesh
        // contributes each such edge exactly once.
        FRONT => (0..n)
            .filter(|&i| types[i] == COPLANAR && types[(i + 1) % n] == COPLANAR)
            .map(|i| [poly.vertices[i], poly.vertices[(i + 1) % n]])
            .collect(),
        SPANNING => {
            let mut crossings: Vec<Vertex> = Vec::new();
            for i in 0..n {
                let j = (i + 1) % n;
                if types[i] == COPLANAR
                    && (types[(i + n - 1) % n] | types[j]) == SPANNING
                {
                    crossings.push(poly.vertices[i]);
                }
                if (types[i] | types[j]) == SPANNING {
                    let vi = &poly.vertices[i];
                    let vj = &poly.vertices[j];
                    let denom = plane.normal().dot(&(vj.pos - vi.pos));
                    if denom.abs() > EPSILON {
                        let t =
                            (plane.offset() - plane.normal().dot(&vi.pos.coords)) / denom;
                        crossings.push(vi.interpolate(vj, t));
                    }
                }
            }

            let direction = plane.normal().cross(&poly.plane.normal());
            crossings.sort_by(|a, b| {
                direction
                    .dot(&a.pos.coords)
                    .total_cmp(&direction.dot(&b.pos.coords))
            });
            crossings
                .chunks_exact(2)
                .map(|pair| [pair[0], pair[1]])
                .collect()
        },
        _ => Vec::new(),
    }
}

/// Weld loose segments end-to-end into closed rings. An open chain means
/// the cross-section cannot be capped.
fn chain_loops(
    mut segments: Vec<[Vertex; 2]>,
    weld_tolerance: Real,
) -> Result<Vec<Vec<Vertex>>, SplitRejection> {
    let tol2 = weld_tolerance * weld_tolerance;
    let mut loops = Vec::new();

    while let Some(seed) = segments.pop() {
        let mut ring = vec![seed[0], seed[1]];
        loop {
            let tail = ring[ring.len() - 1].pos;
            if ring.len() >= 3 && (tail - ring[0].pos).norm_squared() <= tol2 {
                ring.pop(); // drop the duplicated closing vertex
                break;
            }
            let Some(idx) = segments.iter().position(|s| {
                (s[0].pos - tail).norm_squared() <= tol2
                    || (s[1].pos - tail).norm_squared() <= tol2
            }) else {
                return Err(SplitRejection::CapFailed);
            };
            let seg = segments.swap_remove(idx);
            let next = if (seg[0].pos - tail).norm_squared() <= tol2 {
                seg[1]
            } else {
                seg[0]
            };
            ring.push(next);
        }
        if ring.len() < 3 {
            return Err(SplitRejection::CapFailed);
        }
        loops.push(ring);
    }

    Ok(loops)
}

/// Build the cap face for the negative fragment: the ring oriented so its
/// outward normal is the cutting plane's normal.
fn cap_polygon(ring: Vec<Vertex>, plane: &Plane) -> Polygon {
    let mut newell = Vector3::zeros();
    for (i, v) in ring.iter().enumerate() {
        let next = &ring[(i + 1) % ring.len()];
        newell += v.pos.coords.cross(&next.pos.coords);
    }
    let mut vertices: Vec<Vertex> = ring
        .into_iter()
        .map(|v| Vertex::new(v.pos, plane.normal()))
        .collect();
    if newell.dot(&plane.normal()) < 0.0 {
        vertices.reverse();
    }
    Polygon::new(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_volume_and_bounds() {
        let cube = Part::cube(2.0);
        assert!((cube.volume() - 8.0).abs() < 1e-9);
        let bb = cube.bounding_box();
        assert!((bb.extents() - Vector3::new(2.0, 2.0, 2.0)).norm() < 1e-12);
    }

    #[test]
    fn cube_has_six_unique_normals() {
        assert_eq!(Part::cube(1.0).unique_normals().len(), 6);
    }

    #[test]
    fn bisect_halves_a_cube() {
        let cube = Part::cube(2.0);
        let plane = Plane::from_normal(Vector3::x(), 0.0);
        let (negative, positive) = cube.bisect(&plane).unwrap();
        assert!((negative.volume() - 4.0).abs() < 1e-9);
        assert!((positive.volume() - 4.0).abs() < 1e-9);
        // Fragments sit on the expected sides.
        assert!(negative.vertices().all(|v| v.pos.x <= EPSILON));
        assert!(positive.vertices().all(|v| v.pos.x >= -EPSILON));
    }

    #[test]
    fn bisect_misses_outside_plane() {
        let cube = Part::cube(2.0);
        let plane = Plane::from_normal(Vector3::x(), 5.0);
        assert_eq!(cube.bisect(&plane).unwrap_err(), SplitRejection::MissedPart);
    }

    #[test]
    fn bisect_rejects_tangent_plane() {
        let cube = Part::cube(2.0);
        // Grazing the +X face: all material ends up on one side.
        let plane = Plane::from_normal(Vector3::x(), 1.0);
        assert!(cube.bisect(&plane).is_err());
    }
}
