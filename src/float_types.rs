//! Scalar type and tolerances shared across the crate.

// Re-export parry under the name the rest of the crate uses.
pub use parry3d_f64 as parry3d;

/// Scalar type used for all geometry.
pub type Real = f64;

/// Tolerance for point/plane classification and degeneracy checks.
pub const EPSILON: Real = 1e-6;

/// Archimedes' constant (π)
pub const PI: Real = core::f64::consts::PI;
