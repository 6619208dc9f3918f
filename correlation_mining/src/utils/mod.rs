/// Assertions shared by the unit tests
#[cfg(test)]
pub(crate) mod test_utils {
    /// Assert that two floats agree up to a small tolerance
    pub fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }
}
