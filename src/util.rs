/// Returns early with [`Error::OutOfRange`](crate::error::Error::OutOfRange) if a numerical
/// value is not in the provided interval
///
/// ### Forms
/// - `ensure_interval!(x, a, b)` checks `x` in `[a, b]`
/// - `ensure_interval!(x, above a, b)` checks `x` in `(a, b]`
/// - `ensure_interval!(x, above a)` checks `x` in `(a, ∞)`
/// - `ensure_interval!(x, from a)` checks `x` in `[a, ∞)`
///
/// NaN is never in an interval, and the unbounded forms also reject infinities.
///
/// ### Example
/// ```ignore
/// let alpha = 2.0;
/// ensure_interval!(alpha, above 0.0, 1.0);
/// ```
/// This returns an error displayed as "invalid value for \`alpha\`: 2. Must be in the interval (0, 1]."
#[macro_export]
macro_rules! ensure_interval {
    (@check $var:expr, $ok:expr, $interval:expr) => {
        if !($ok) {
            return Err($crate::error::Error::OutOfRange {
                name: stringify!($var),
                value: $var as f64,
                interval: $interval,
            });
        }
    };
    ($var:expr, above $a:expr, $b:expr) => {
        $crate::ensure_interval!(@check $var, $var > $a && $var <= $b, format!("({}, {}]", $a, $b))
    };
    ($var:expr, above $a:expr) => {
        $crate::ensure_interval!(@check $var, $var > $a && $var.is_finite(), format!("({}, ∞)", $a))
    };
    ($var:expr, from $a:expr) => {
        $crate::ensure_interval!(@check $var, $var >= $a && $var.is_finite(), format!("[{}, ∞)", $a))
    };
    ($var:expr, $a:expr, $b:expr) => {
        $crate::ensure_interval!(@check $var, $var >= $a && $var <= $b, format!("[{}, {}]", $a, $b))
    };
}

/// Index of the largest value, preferring the lowest index among ties
///
/// Returns `None` for an empty iterator. A NaN is never chosen over a number.
pub fn argmax(values: impl IntoIterator<Item = f32>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, v) in values.into_iter().enumerate() {
        match best {
            Some((_, b)) if v <= b || v.is_nan() => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
