//! Test support helpers shared by the integration tests.
#![allow(dead_code)] // not every test binary uses every helper

use meshchop::float_types::Real;
use meshchop::{ChopConfig, Part, Polygon, Vertex};
use nalgebra::{Point3, Vector3};

/// Compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// 80-unit cube build volume with 20-unit plane spacing.
pub fn test_config() -> ChopConfig {
    ChopConfig {
        build_volume: Vector3::new(80.0, 80.0, 80.0),
        plane_spacing: 20.0,
        ..ChopConfig::default()
    }
}

/// A cuboid twice the test build volume along X, centered at the origin.
pub fn double_wide_part() -> Part {
    Part::cuboid(Point3::origin(), Vector3::new(160.0, 80.0, 80.0))
}

/// Extrude a counter-clockwise 2D profile along +Z into a watertight prism
/// spanning `z` in `[0, depth]`.
pub fn prism(profile: &[[Real; 2]], depth: Real) -> Part {
    let mut polygons = Vec::new();
    polygons.push(Polygon::new(
        profile
            .iter()
            .map(|&[x, y]| Vertex::new(Point3::new(x, y, depth), Vector3::z()))
            .collect(),
    ));
    polygons.push(Polygon::new(
        profile
            .iter()
            .rev()
            .map(|&[x, y]| Vertex::new(Point3::new(x, y, 0.0), -Vector3::z()))
            .collect(),
    ));
    for i in 0..profile.len() {
        let [ax, ay] = profile[i];
        let [bx, by] = profile[(i + 1) % profile.len()];
        let normal = Vector3::new(by - ay, ax - bx, 0.0).normalize();
        polygons.push(Polygon::new(vec![
            Vertex::new(Point3::new(ax, ay, 0.0), normal),
            Vertex::new(Point3::new(bx, by, 0.0), normal),
            Vertex::new(Point3::new(bx, by, depth), normal),
            Vertex::new(Point3::new(ax, ay, depth), normal),
        ]));
    }
    Part::from_polygons(polygons)
}
