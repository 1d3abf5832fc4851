// Race-weekend scenarios across the analyzers
//
// A synthetic two-stop race for three drivers, with the kinds of gaps real
// timing data has: a safety-car lap, an untimed lap, a missing sector time
// and a retirement.

use super::*;
use crate::config::AnalysisConfig;
use crate::filter::MedianBand;
use crate::session::{Compound, LapRecord, LapTable, SessionData};

/// VER: 1-stop, SOFT laps 1-6 (pit on 6), HARD laps 7-14
/// HAM: same, but lap 9 untimed and lap 10 under safety car
/// SAR: retires after lap 5, never pits, S3 never recorded
fn race() -> LapTable {
    let mut laps = Vec::new();
    for n in 1..=14u32 {
        let soft = n <= 6;
        let compound = if soft { Compound::Soft } else { Compound::Hard };
        let base = if soft { 92.0 + 0.2 * n as f64 } else { 91.0 + 0.1 * (n - 6) as f64 };

        let mut ver = LapRecord::new("VER", n)
            .with_lap_time(base)
            .with_sectors(30.0, 32.0, base - 62.0)
            .with_compound(compound)
            .with_position(1);
        if n == 6 {
            ver = ver.with_pit_in(560.0).with_lap_time(base + 18.0);
        }
        if n == 7 {
            ver = ver.with_pit_out(580.0).with_lap_time(base + 3.0);
        }
        laps.push(ver);

        let mut ham = LapRecord::new("HAM", n)
            .with_lap_time(base + 0.4)
            .with_sectors(30.2, 32.1, base - 61.9)
            .with_compound(compound)
            .with_position(2);
        if n == 6 {
            ham = ham.with_pit_in(561.0).with_lap_time(base + 18.5);
        }
        if n == 7 {
            ham = ham.with_pit_out(581.0).with_lap_time(base + 3.5);
        }
        if n == 9 {
            ham.lap_time = None;
        }
        if n == 10 {
            ham = ham.inaccurate().with_lap_time(base + 25.0);
        }
        laps.push(ham);

        if n <= 5 {
            let mut sar = LapRecord::new("SAR", n)
                .with_lap_time(base + 1.5)
                .with_sectors(30.8, 32.6, 30.0)
                .with_compound(Compound::Medium)
                .with_position(18);
            sar.sector3_time = None;
            laps.push(sar);
        }
    }
    LapTable::new(laps).unwrap()
}

#[test]
fn test_one_stop_race_yields_two_stints() {
    let table = race();
    let stints = build_stints(&table.driver_laps("VER"));

    assert_eq!(stints.len(), 2);
    assert_eq!(stints[0].compound, Compound::Soft);
    assert_eq!((stints[0].start_lap, stints[0].end_lap), (1, 6));
    assert_eq!(stints[1].compound, Compound::Hard);
    assert_eq!((stints[1].start_lap, stints[1].end_lap), (7, 14));
    assert_eq!(stints.iter().map(|s| s.lap_count).sum::<usize>(), 14);
}

#[test]
fn test_retired_driver_has_single_open_stint() {
    let table = race();
    let stints = build_stints(&table.driver_laps("SAR"));
    assert_eq!(stints.len(), 1);
    assert_eq!(stints[0].end_lap, 5);
}

#[test]
fn test_degradation_per_compound() {
    let table = race();
    let deg = DegradationAnalyzer::default().analyze(&table.driver_laps("VER"));

    // Pit-in and pit-out laps are timed, so they count
    let soft = &deg[&Compound::Soft];
    assert_eq!(soft.lap_count, 6);
    assert!(soft.rate_per_lap_s > 0.0);

    let hard = &deg[&Compound::Hard];
    assert_eq!(hard.lap_count, 8);
}

#[test]
fn test_short_run_driver_has_no_degradation_beyond_threshold() {
    let table = race();
    let deg = DegradationAnalyzer::new(5).analyze(&table.driver_laps("SAR"));
    assert!(deg.is_empty());
    let deg = DegradationAnalyzer::new(4).analyze(&table.driver_laps("SAR"));
    assert!(deg.contains_key(&Compound::Medium));
}

#[test]
fn test_sector_map_omits_driver_without_s3() {
    let table = race();
    let profiles = sector_profiles(&table, &["VER", "HAM", "SAR"]);
    assert_eq!(profiles.len(), 2);
    assert!(!profiles.contains_key("SAR"));
    assert!(profiles["VER"].s1.best_s < profiles["HAM"].s1.best_s);
}

#[test]
fn test_consistency_ignores_pit_cycle() {
    let table = race();
    let ver = ConsistencyScorer::default()
        .score(&table.driver_laps("VER"))
        .unwrap()
        .unwrap();
    // 12 clean laps, none slower than 1.1x median
    assert_eq!(ver.laps_used, 12);
    assert!(ver.consistency_score > 99.0 && ver.consistency_score <= 100.0);
}

#[test]
fn test_safety_car_lap_trimmed_from_consistency() {
    let table = race();
    let ham = ConsistencyScorer::default()
        .score(&table.driver_laps("HAM"))
        .unwrap()
        .unwrap();
    // 12 clean laps: one untimed, one far over the trim cutoff
    assert_eq!(ham.laps_used, 10);
}

#[test]
fn test_gap_grows_with_untimed_lap_skipped() {
    let table = race();
    let gap = gap_series(&table, "VER", "HAM");
    assert_eq!(gap.len(), 14);
    assert_eq!(gap[8].lap_number, 9);
    assert_eq!(gap[8].cumulative_gap_s, None);

    let final_gap = gap[13].cumulative_gap_s.unwrap();
    assert!(final_gap > 0.0);

    let reversed = gap_series(&table, "HAM", "VER");
    assert_eq!(reversed[13].cumulative_gap_s, Some(-final_gap));
}

#[test]
fn test_gap_against_retired_driver_stops_at_retirement() {
    let table = race();
    let gap = gap_series(&table, "VER", "SAR");
    assert_eq!(gap.len(), 5);
    assert_eq!(gap[4].position_b, Some(18));
}

#[test]
fn test_head_to_head_matches_individual_analyzers() {
    let table = race();
    let session = SessionData::new(table.clone());
    let config = AnalysisConfig::default();
    let h2h = head_to_head(&session, "VER", "HAM", &config).unwrap();

    assert_eq!(h2h.gap, gap_series(&table, "VER", "HAM"));
    assert_eq!(
        h2h.a.consistency,
        ConsistencyScorer::from_config(&config)
            .score(&table.driver_laps("VER"))
            .unwrap()
    );
    assert_eq!(h2h.a.average_clean_pace_s, average_clean_pace(&table.driver_laps("VER")));
}

#[test]
fn test_fastest_lap_ranking() {
    let table = race();
    let fastest = fastest_laps(&table);
    assert_eq!(fastest[0].driver, "VER");
    assert_eq!(fastest[0].compound, Some(Compound::Hard));

    let gaps = qualifying_gaps(&table);
    assert_eq!(gaps[0].gap_to_pole_s, 0.0);
    assert!(gaps.iter().all(|g| g.gap_to_pole_s >= 0.0));
}

#[test]
fn test_progression_drops_pit_laps() {
    let table = race();
    let prog = lap_progression(&table, &["VER"], MedianBand::PROGRESSION);
    let laps: Vec<u32> = prog["VER"].iter().map(|(n, _)| *n).collect();
    assert!(!laps.contains(&6));
    assert!(laps.contains(&7));
}

#[test]
fn test_pace_distribution_drops_slow_outliers_only() {
    let table = race();
    let dist = pace_distribution(&table, &["VER", "HAM"], MedianBand::PACE_DISTRIBUTION);
    let ver = &dist["VER"];
    assert_eq!(ver.len(), 13);
    assert!(ver.iter().all(|t| *t < 100.0));
}
