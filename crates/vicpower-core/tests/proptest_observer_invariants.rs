//! Property-based invariant tests for the viewport observer.
//!
//! 1. Ratio is always within [0, 1].
//! 2. A hidden observation never qualifies for activation.
//! 3. Feeding identical geometry twice never fires twice.
//! 4. Intersection is commutative.

use proptest::prelude::*;
use vicpower_core::geometry::Rect;
use vicpower_core::observer::{IntersectionObserver, ObserverConfig};

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (
        -5000.0f64..5000.0,
        -5000.0f64..5000.0,
        0.0f64..4000.0,
        0.0f64..4000.0,
    )
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn ratio_is_bounded(target in rect_strategy(), viewport in rect_strategy()) {
        let observer = IntersectionObserver::new(ObserverConfig::default());
        let obs = observer.measure(target, viewport);
        prop_assert!((0.0..=1.0).contains(&obs.intersection_ratio));
    }

    #[test]
    fn hidden_never_qualifies(target in rect_strategy(), viewport in rect_strategy()) {
        let observer = IntersectionObserver::new(ObserverConfig::default());
        let obs = observer.measure(target, viewport);
        if !obs.is_intersecting {
            prop_assert_eq!(obs.intersection_ratio, 0.0);
            prop_assert!(!obs.qualifies(0.35));
        }
    }

    #[test]
    fn same_geometry_fires_at_most_once(target in rect_strategy(), viewport in rect_strategy()) {
        let mut observer = IntersectionObserver::new(ObserverConfig::default());
        prop_assert!(observer.observe(target, viewport).is_some());
        prop_assert!(observer.observe(target, viewport).is_none());
    }

    #[test]
    fn intersection_commutative(a in rect_strategy(), b in rect_strategy()) {
        prop_assert_eq!(a.intersection(&b), b.intersection(&a));
    }
}
