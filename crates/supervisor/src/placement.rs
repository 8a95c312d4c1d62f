//! Deterministic target placement.
//!
//! Targets start evenly spaced on a circle; each destination sits a
//! configured delta angle further around the same circle.

/// One target's planned trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct PathPlan {
    pub name: String,
    pub start: (f64, f64),
    pub end: (f64, f64),
}

/// Compute the path plan for `count` targets on a circle of `radius`
/// centered at the origin, destinations offset by `delta_deg`.
pub fn circle_placement(count: usize, radius: f64, delta_deg: f64) -> Vec<PathPlan> {
    (0..count)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / count as f64;
            let theta2 = theta + delta_deg.to_radians();
            PathPlan {
                name: format!("target{}", i + 1),
                start: (radius * theta.cos(), radius * theta.sin()),
                end: (radius * theta2.cos(), radius * theta2.sin()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn placement_is_deterministic() {
        assert_eq!(
            circle_placement(3, 10.0, 135.0),
            circle_placement(3, 10.0, 135.0)
        );
    }

    #[test]
    fn starts_are_evenly_spaced_on_the_circle() {
        let plans = circle_placement(4, 10.0, 90.0);
        assert_eq!(plans.len(), 4);

        assert!((plans[0].start.0 - 10.0).abs() < EPS);
        assert!(plans[0].start.1.abs() < EPS);
        assert!(plans[1].start.0.abs() < EPS);
        assert!((plans[1].start.1 - 10.0).abs() < EPS);

        for plan in &plans {
            let r = (plan.start.0.powi(2) + plan.start.1.powi(2)).sqrt();
            assert!((r - 10.0).abs() < EPS);
        }
    }

    #[test]
    fn destination_is_delta_degrees_ahead() {
        let plans = circle_placement(1, 10.0, 90.0);
        // start at angle 0 -> end at angle 90
        assert!(plans[0].end.0.abs() < EPS);
        assert!((plans[0].end.1 - 10.0).abs() < EPS);
    }

    #[test]
    fn names_are_one_based() {
        let plans = circle_placement(2, 10.0, 135.0);
        assert_eq!(plans[0].name, "target1");
        assert_eq!(plans[1].name, "target2");
    }
}
