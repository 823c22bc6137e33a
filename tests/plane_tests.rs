mod support;

use meshchop::float_types::EPSILON;
use meshchop::{ChopConfig, Part, generate_planes};
use nalgebra::{Point3, Vector3};

use crate::support::approx_eq;

/// A 10-unit cube spanning [0, 10] on every axis.
fn unit_extent_part() -> Part {
    Part::cuboid(Point3::new(5.0, 5.0, 5.0), Vector3::new(10.0, 10.0, 10.0))
}

#[test]
fn grid_planes_skip_the_minimum() {
    let config = ChopConfig {
        plane_spacing: 2.0,
        add_middle_plane: false,
        ..ChopConfig::default()
    };
    let planes = generate_planes(&unit_extent_part(), &Vector3::x(), &config);
    let offsets: Vec<_> = planes.iter().map(|p| p.offset()).collect();
    assert_eq!(offsets.len(), 4);
    for (offset, expected) in offsets.iter().zip([2.0, 4.0, 6.0, 8.0]) {
        assert!(approx_eq(*offset, expected, EPSILON));
    }
}

#[test]
fn middle_plane_is_appended_last() {
    let config = ChopConfig {
        plane_spacing: 2.0,
        add_middle_plane: true,
        ..ChopConfig::default()
    };
    let planes = generate_planes(&unit_extent_part(), &Vector3::x(), &config);
    assert_eq!(planes.len(), 5);
    assert!(approx_eq(planes[4].offset(), 5.0, EPSILON));
    // The grid part stays strictly increasing.
    for pair in planes[..4].windows(2) {
        assert!(pair[0].offset() < pair[1].offset());
    }
}

#[test]
fn all_planes_share_the_input_normal() {
    let config = ChopConfig {
        plane_spacing: 2.0,
        add_middle_plane: true,
        ..ChopConfig::default()
    };
    // A non-unit direction must come back normalized.
    let direction = Vector3::new(0.0, 3.0, 0.0);
    let planes = generate_planes(&unit_extent_part(), &direction, &config);
    assert!(!planes.is_empty());
    for plane in &planes {
        assert!((plane.normal() - Vector3::y()).norm() < EPSILON);
    }
}

#[test]
fn extent_smaller_than_spacing_yields_no_grid_planes() {
    let config = ChopConfig {
        plane_spacing: 20.0,
        add_middle_plane: false,
        ..ChopConfig::default()
    };
    let planes = generate_planes(&unit_extent_part(), &Vector3::z(), &config);
    assert!(planes.is_empty());

    let config = ChopConfig {
        add_middle_plane: true,
        ..config
    };
    let planes = generate_planes(&unit_extent_part(), &Vector3::z(), &config);
    assert_eq!(planes.len(), 1);
    assert!(approx_eq(planes[0].offset(), 5.0, EPSILON));
}

#[test]
fn generation_is_deterministic() {
    let config = ChopConfig {
        plane_spacing: 3.0,
        add_middle_plane: true,
        ..ChopConfig::default()
    };
    let part = unit_extent_part();
    let first = generate_planes(&part, &Vector3::x(), &config);
    let second = generate_planes(&part, &Vector3::x(), &config);
    assert_eq!(first, second);
}
