use diet_planner::biomarkers::{evaluate_status, BiomarkerReadings, BiomarkerStatus, Catalog};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ROUNDS: usize = 2_000;

fn sorted_range(rng: &mut StdRng) -> [f64; 4] {
    let wl = rng.gen_range(-100.0..100.0);
    let ol = wl + rng.gen_range(0.01..50.0);
    let oh = ol + rng.gen_range(0.0..50.0);
    let wh = oh + rng.gen_range(0.01..50.0);
    [wl, ol, oh, wh]
}

#[test]
fn test_four_point_range_bands() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..ROUNDS {
        let range = sorted_range(&mut rng);
        let [wl, ol, oh, wh] = range;
        let value = rng.gen_range(wl - 60.0..wh + 60.0);

        let expected = if value < wl || value > wh {
            BiomarkerStatus::Danger
        } else if value < ol || value > oh {
            BiomarkerStatus::Warning
        } else {
            BiomarkerStatus::Optimal
        };
        assert_eq!(evaluate_status(Some(value), Some(&range), false), expected, "value {} range {:?}", value, range);
    }
}

#[test]
fn test_four_point_range_boundaries() {
    let range = [15.0, 30.0, 200.0, 300.0];
    assert_eq!(evaluate_status(Some(15.0), Some(&range), false), BiomarkerStatus::Warning);
    assert_eq!(evaluate_status(Some(30.0), Some(&range), false), BiomarkerStatus::Optimal);
    assert_eq!(evaluate_status(Some(200.0), Some(&range), false), BiomarkerStatus::Optimal);
    assert_eq!(evaluate_status(Some(300.0), Some(&range), false), BiomarkerStatus::Warning);
    assert_eq!(evaluate_status(Some(300.5), Some(&range), false), BiomarkerStatus::Danger);
}

#[test]
fn test_inverse_range_bands() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..ROUNDS {
        let ok_max = rng.gen_range(-50.0..50.0);
        let warning_max = ok_max + rng.gen_range(0.01..50.0);
        let range = [ok_max, warning_max];
        let value = rng.gen_range(ok_max - 60.0..warning_max + 60.0);

        let expected = if value <= ok_max {
            BiomarkerStatus::Optimal
        } else if value <= warning_max {
            BiomarkerStatus::Warning
        } else {
            BiomarkerStatus::Danger
        };
        assert_eq!(evaluate_status(Some(value), Some(&range), true), expected, "value {} range {:?}", value, range);
    }
}

#[test]
fn test_missing_or_nan_value_is_none() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..100 {
        let range = sorted_range(&mut rng);
        let inverse = rng.gen_bool(0.5);
        assert_eq!(evaluate_status(None, Some(&range), inverse), BiomarkerStatus::None);
    }
    assert_eq!(evaluate_status(Some(f64::NAN), Some(&[1.0, 2.0, 3.0, 4.0]), false), BiomarkerStatus::None);
}

#[test]
fn test_two_point_fallback_is_inclusive_while_inverse_is_strict() {
    // Both branches see the same boundary value.
    let range = [5.6, 6.4];
    assert_eq!(evaluate_status(Some(5.6), Some(&range), true), BiomarkerStatus::Optimal);
    assert_eq!(evaluate_status(Some(5.6), Some(&range), false), BiomarkerStatus::Optimal);
    assert_eq!(evaluate_status(Some(6.4), Some(&range), true), BiomarkerStatus::Warning);
    assert_eq!(evaluate_status(Some(6.4), Some(&range), false), BiomarkerStatus::Optimal);
}

#[test]
fn test_embedded_catalog_statuses() {
    let catalog = Catalog::embedded().unwrap();
    let readings: BiomarkerReadings = [("ferritin".to_string(), 10.0), ("ldl".to_string(), 130.0)]
        .into_iter()
        .collect();
    let statuses = catalog.statuses(&readings);
    assert_eq!(statuses.len(), catalog.len());

    let status_of = |key: &str| statuses.iter().find(|(d, _)| d.key == key).map(|(_, s)| *s);
    assert_eq!(status_of("ferritin"), Some(BiomarkerStatus::Danger));
    assert_eq!(status_of("ldl"), Some(BiomarkerStatus::Warning));
    assert_eq!(status_of("b12"), Some(BiomarkerStatus::None));
}
