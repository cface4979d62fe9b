pub trait FloatExt {
    fn approximately_eq(self, other: Self) -> bool;

    /// `|self - reference| / |reference|`, or the absolute difference when
    /// `reference` is zero.
    fn relative_diff(self, reference: Self) -> Self;
}

impl FloatExt for f32 {
    fn approximately_eq(self, other: Self) -> bool {
        (self - other).abs() < crate::EPSILON as f32
    }

    fn relative_diff(self, reference: Self) -> Self {
        let diff = (self - reference).abs();
        if reference == 0.0 {
            diff
        } else {
            diff / reference.abs()
        }
    }
}

impl FloatExt for f64 {
    fn approximately_eq(self, other: Self) -> bool {
        (self - other).abs() < crate::EPSILON
    }

    fn relative_diff(self, reference: Self) -> Self {
        let diff = (self - reference).abs();
        if reference == 0.0 {
            diff
        } else {
            diff / reference.abs()
        }
    }
}
