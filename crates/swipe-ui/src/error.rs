/// Errors reported by setup operations on panels and lists.
///
/// Gesture processing never fails; misuse there is logged and ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum SwipeError {
    InvalidGeometry { what: &'static str, value: f32 },
    RowOutOfRange { index: usize, len: usize },
    NotLaidOut,
}

impl std::fmt::Display for SwipeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwipeError::InvalidGeometry { what, value } => {
                write!(f, "invalid {what}: {value}")
            }
            SwipeError::RowOutOfRange { index, len } => {
                write!(f, "row {index} out of range for list of {len} rows")
            }
            SwipeError::NotLaidOut => write!(f, "used before layout"),
        }
    }
}

impl std::error::Error for SwipeError {}

/// Accepts finite, non-negative extents.
pub(crate) fn check_extent(what: &'static str, value: f32) -> Result<f32, SwipeError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SwipeError::InvalidGeometry { what, value })
    }
}
