/// Compare two floats with a tolerance that is relative unless one side is zero.
///
/// Exactly equal values always compare equal. When either value is zero the
/// absolute difference is tested against `tolerance`; otherwise the difference
/// is measured relative to `|a| + |b|`.
pub fn float_nearly_equal(a: f32, b: f32, tolerance: f32) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    if a == 0.0 || b == 0.0 {
        return diff < tolerance;
    }
    diff / (a.abs() + b.abs()) < tolerance
}
