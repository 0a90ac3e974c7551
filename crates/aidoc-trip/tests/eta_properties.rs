//! Property tests for travel interpolation.

use aidoc_core::GeoPoint;
use aidoc_trip::{eta_minutes, travel_fraction, TripPhase, TripSimulation, TripTiming, ORIGIN};
use proptest::prelude::*;

proptest! {
    #[test]
    fn eta_is_non_increasing(mut ticks in prop::collection::vec(0u64..20_000, 1..50)) {
        ticks.sort_unstable();
        let etas: Vec<u32> = ticks
            .iter()
            .map(|&t| eta_minutes(travel_fraction(t, 15_000)))
            .collect();
        prop_assert!(etas.windows(2).all(|w| w[1] <= w[0]));
        prop_assert!(etas.iter().all(|&e| e <= 12));
    }

    #[test]
    fn position_stays_on_segment(
        lat in -80.0f64..80.0,
        lng in -170.0f64..170.0,
        elapsed in 0u64..15_000,
    ) {
        let destination = GeoPoint::new(lat, lng);
        let mut sim = TripSimulation::new(destination, TripTiming::default());
        sim.finish_dwell().unwrap();
        prop_assert_eq!(sim.advance(elapsed).unwrap(), TripPhase::OnTheWay);

        let position = sim.position();
        let (lo_lat, hi_lat) = (ORIGIN.lat.min(lat) - 1e-9, ORIGIN.lat.max(lat) + 1e-9);
        let (lo_lng, hi_lng) = (ORIGIN.lng.min(lng) - 1e-9, ORIGIN.lng.max(lng) + 1e-9);
        prop_assert!((lo_lat..=hi_lat).contains(&position.lat));
        prop_assert!((lo_lng..=hi_lng).contains(&position.lng));
        prop_assert!(sim.eta_minutes() >= 1);
    }
}
