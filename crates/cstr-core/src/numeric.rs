use crate::CoreError;

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: f64, what: &'static str) -> Result<f64, CoreError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::InvalidArg { what })
    }
}

/// Finite and greater than or equal to zero.
pub fn ensure_non_negative(v: f64, what: &'static str) -> Result<f64, CoreError> {
    let v = ensure_finite(v, what)?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(CoreError::InvalidArg { what })
    }
}
