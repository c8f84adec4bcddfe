//! Sampling helpers for primitives.

/// Values `min, min + step, ..` strictly below `max`, then `max` itself when
/// `include_max` is set.
///
/// A non-positive or non-finite `step` yields nothing but the optional `max`.
pub fn samples(min: f64, max: f64, step: f64, include_max: bool) -> impl Iterator<Item = f64> {
    let count = if step > 0.0 && step.is_finite() && max > min {
        ((max - min) / step).ceil() as usize
    } else {
        0
    };
    (0..count)
        .map(move |i| min + step * i as f64)
        .filter(move |&v| v < max)
        .chain(include_max.then_some(max))
}

/// Multiples of `step` from `ceil(min / step)` to `ceil(max / step)` inclusive.
///
/// Enumerated by integer index so the endpoint never drifts.
pub fn grid_steps(min: f64, max: f64, step: f64) -> impl Iterator<Item = f64> {
    let (first, last) = if step > 0.0 && step.is_finite() {
        ((min / step).ceil() as i64, (max / step).ceil() as i64)
    } else {
        (1, 0)
    };
    (first..=last).map(move |i| i as f64 * step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_always_end_at_max() {
        let v: Vec<f64> = samples(-1.0, 7.0, 3.0, true).collect();
        assert_eq!(v, vec![-1.0, 2.0, 5.0, 7.0]);

        let v: Vec<f64> = samples(0.0, 6.0, 3.0, true).collect();
        assert_eq!(v, vec![0.0, 3.0, 6.0]);

        let v: Vec<f64> = samples(0.0, 6.0, 3.0, false).collect();
        assert_eq!(v, vec![0.0, 3.0]);
    }

    #[test]
    fn samples_guard_bad_step() {
        assert_eq!(samples(0.0, 1.0, 0.0, false).count(), 0);
        assert_eq!(samples(0.0, 1.0, f64::NAN, true).collect::<Vec<_>>(), vec![1.0]);
    }

    #[test]
    fn grid_steps_are_inclusive() {
        let v: Vec<f64> = grid_steps(-4.0, 4.0, 1.0).collect();
        assert_eq!(v.len(), 9);
        assert_eq!(v.first(), Some(&-4.0));
        assert_eq!(v.last(), Some(&4.0));

        let v: Vec<f64> = grid_steps(-0.9, 1.1, 0.5).collect();
        assert_eq!(v, vec![-0.5, 0.0, 0.5, 1.0, 1.5]);
    }

    #[test]
    fn grid_steps_reject_zero_step() {
        assert_eq!(grid_steps(-4.0, 4.0, 0.0).count(), 0);
    }
}
