//! # Integration Tests
//!
//! End-to-end tests across the workspace crates:
//! - provider -> selection -> normalization -> synchronized dataset
//! - session export round trip through JSON
//! - config file driven provider construction
//! - shared read-only access from concurrent tasks

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::sync::Arc;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{
        ContractError, DriverLap, RawLap, RawSample, SessionBlueprint, SessionDataProvider,
        TimelineConfig,
    };
    use ingestion::{
        normalize, provider_from_blueprint, select_fastest_laps, JsonSessionProvider,
        MockSessionProvider, SessionExport,
    };
    use sync_engine::{SyncedDataset, TimelineSynchronizer};

    const FPS: u32 = 10;

    /// Provider -> fastest laps -> normalized laps -> dataset
    fn build(provider: &dyn SessionDataProvider, drivers: usize) -> SyncedDataset {
        let selected = select_fastest_laps(provider.laps().unwrap(), drivers).unwrap();
        let laps: Vec<DriverLap> = selected.into_iter().map(|l| normalize(l).unwrap()).collect();
        let common = sync_engine::common_duration(&laps).unwrap();

        let mut blueprint = SessionBlueprint::default();
        blueprint.playback.fps = FPS;
        TimelineSynchronizer::new(blueprint.to_timeline_config(common))
            .build(&laps)
            .unwrap()
    }

    fn lap(driver: &str, points: &[(f64, f64)]) -> RawLap {
        RawLap {
            driver_id: driver.into(),
            lap_number: Some(1),
            lap_time: points.last().map(|p| p.0),
            samples: points
                .iter()
                .map(|&(t, d)| RawSample {
                    timestamp: t,
                    x: d,
                    y: 0.0,
                    speed: 200.0,
                    distance: d,
                })
                .collect(),
        }
    }

    #[test]
    fn test_e2e_mock_pipeline() {
        let provider = MockSessionProvider::with_drivers(3);
        let dataset = build(&provider, 3);

        // Fastest lap is 72.0 s, so the grid covers exactly that
        assert_eq!(dataset.tracks().len(), 3);
        assert_eq!(dataset.common_duration(), 72.0);
        assert_eq!(dataset.len(), 720);
        assert_eq!(dataset.time_at(0), Some(0.0));
        assert_eq!(dataset.time_at(719), Some(72.0));

        for track in dataset.tracks() {
            assert_eq!(track.frames.len(), dataset.len());
            assert!(track
                .frames
                .windows(2)
                .all(|w| w[1].distance >= w[0].distance));
        }

        let leader = MockSessionProvider::driver_code(0);
        let chaser = MockSessionProvider::driver_code(1);
        let gap = dataset.gap(&leader, &chaser, 719).unwrap();
        assert!(gap.distance_m > 0.0, "fastest lap should be ahead at the end");
        let back = dataset.gap(&chaser, &leader, 719).unwrap();
        assert_eq!(gap.distance_m, -back.distance_m);

        let ranking = dataset.lap_ranking();
        assert_eq!(ranking[0].driver_id, leader);
    }

    #[test]
    fn test_export_round_trip_rebuilds_same_dataset() {
        let provider = MockSessionProvider::with_drivers(4);
        let direct = build(&provider, 4);

        let export = SessionExport::from_laps("2023 Monaco Q", &provider.laps().unwrap());
        let json = serde_json::to_string(&export).unwrap();
        let reloaded = JsonSessionProvider::from_json("export.json", &json).unwrap();
        assert_eq!(reloaded.session_label(), "2023 Monaco Q");

        let replayed = build(&reloaded, 4);
        assert_eq!(replayed.len(), direct.len());
        for (a, b) in direct.tracks().iter().zip(replayed.tracks()) {
            assert_eq!(a.driver_id, b.driver_id);
            for (fa, fb) in a.frames.iter().zip(&b.frames) {
                assert!((fa.distance - fb.distance).abs() < 1e-6);
                assert!((fa.speed - fb.speed).abs() < 1e-6);
                assert!((fa.x - fb.x).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_config_file_drives_file_provider() {
        let dir = tempfile::tempdir().unwrap();

        let mock = MockSessionProvider::with_drivers(2);
        let export = SessionExport::from_laps("2023 Monaco Q", &mock.laps().unwrap());
        std::fs::write(
            dir.path().join("monaco.json"),
            serde_json::to_string(&export).unwrap(),
        )
        .unwrap();

        let config_path = dir.path().join("session.toml");
        let mut config = std::fs::File::create(&config_path).unwrap();
        writeln!(
            config,
            "[source]\nprovider = \"file\"\npath = \"monaco.json\"\n\n[drivers]\ncount = 2\n"
        )
        .unwrap();

        let blueprint = ConfigLoader::load_from_path(&config_path).unwrap();
        let provider = provider_from_blueprint(&blueprint).unwrap();
        assert_eq!(provider.laps().unwrap().len(), 4);

        let dataset = build(provider.as_ref(), 2);
        assert_eq!(dataset.tracks().len(), 2);
    }

    #[test]
    fn test_mock_config_from_str() {
        let blueprint =
            ConfigLoader::load_from_str("[source]\nmock_drivers = 6\n", ConfigFormat::Toml)
                .unwrap();
        let provider = provider_from_blueprint(&blueprint).unwrap();
        assert_eq!(provider.session_label(), "2023 Monaco Q");
        assert_eq!(provider.laps().unwrap().len(), 12);
    }

    #[test]
    fn test_no_drivers_is_no_overlap() {
        let err = TimelineSynchronizer::new(TimelineConfig::new(100))
            .build(&[])
            .unwrap_err();
        assert!(matches!(err, ContractError::NoOverlap { .. }));
    }

    #[test]
    fn test_single_frame_is_rejected() {
        let laps = vec![normalize(lap("VER", &[(0.0, 0.0), (10.0, 500.0)])).unwrap()];
        let err = TimelineSynchronizer::new(TimelineConfig::new(1))
            .build(&laps)
            .unwrap_err();
        assert!(matches!(err, ContractError::InvalidFrameCount { requested: 1 }));
    }

    #[test]
    fn test_degenerate_lap_is_insufficient() {
        let err = normalize(lap("SAI", &[(3.0, 10.0), (3.0, 12.0)])).unwrap_err();
        assert!(matches!(err, ContractError::InsufficientData { samples: 1, .. }));
        assert!(err.is_driver_local());
    }

    #[test]
    fn test_shorter_lap_bounds_the_grid() {
        let laps = vec![
            normalize(lap("VER", &[(0.0, 0.0), (10.0, 1000.0)])).unwrap(),
            normalize(lap("HAM", &[(5.0, 0.0), (13.0, 800.0)])).unwrap(),
        ];
        let dataset = TimelineSynchronizer::new(TimelineConfig::new(5))
            .build(&laps)
            .unwrap();
        assert_eq!(dataset.common_duration(), 8.0);

        // Grid is lap-relative: HAM's first sample lines up with VER's
        let gap = dataset.gap(&"VER".into(), &"HAM".into(), 4).unwrap();
        assert!((gap.distance_m - 0.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_concurrent_readers_share_dataset() {
        let dataset = Arc::new(build(&MockSessionProvider::with_drivers(5), 5));
        let a = MockSessionProvider::driver_code(0);
        let b = MockSessionProvider::driver_code(4);
        let expected: Vec<f64> = (0..dataset.len())
            .map(|i| dataset.gap(&a, &b, i).unwrap().distance_m)
            .collect();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let dataset = Arc::clone(&dataset);
                let (a, b) = (a.clone(), b.clone());
                tokio::spawn(async move {
                    (0..dataset.len())
                        .map(|i| dataset.gap(&a, &b, i).unwrap().distance_m)
                        .collect::<Vec<f64>>()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), expected);
        }
    }
}
