//! # Integration Tests
//!
//! Cross-crate end-to-end tests wiring real components through loopback
//! channels. Unicast 127.0.0.1 channels keep these independent of the
//! host's multicast routing; each test owns its own ports.

#[cfg(test)]
mod pipeline_tests {
    use std::net::Ipv4Addr;
    use std::time::{Duration, Instant};

    use agents::{run_emitter, run_noisy, EmitterConfig, NoisyConfig};
    use bus::{Publisher, Subscriber};
    use contracts::{Channel, Record, SensorKind};
    use fusion::FusionEngine;
    use tokio::sync::watch;

    fn loopback(port: u16) -> Channel {
        Channel::new(Ipv4Addr::LOCALHOST, port)
    }

    /// End-to-end: emitter -> object-channel -> noisy agent ->
    /// sensor-channel -> fusion engine.
    #[tokio::test]
    async fn emitter_to_noisy_to_fusion() {
        let object_channel = loopback(20210);
        let sensor_channel = loopback(20211);

        // Consumer side first, so nothing is missed
        let mut sensor_sub = Subscriber::join(sensor_channel).await.unwrap();

        let (_noisy_stop_tx, noisy_stop) = watch::channel(false);
        let noisy = tokio::spawn(run_noisy(
            NoisyConfig {
                name: "noisy1".into(),
                noise_std: 0.1,
            },
            object_channel,
            sensor_channel,
            noisy_stop,
        ));

        // Give the agent a moment to join before the emitter starts
        tokio::time::sleep(Duration::from_millis(100)).await;

        let (_emit_stop_tx, emit_stop) = watch::channel(false);
        let emitter = tokio::spawn(run_emitter(
            EmitterConfig {
                name: "target1".into(),
                start: (0.0, 0.0),
                end: (10.0, 0.0),
                duration: Duration::from_millis(500),
                interval: Duration::from_millis(50),
            },
            object_channel,
            emit_stop,
        ));

        // Collect relayed sensor reports while the emitter runs
        let mut engine = FusionEngine::new();
        let mut received = 0;
        let deadline = Instant::now() + Duration::from_secs(5);

        while received < 3 && Instant::now() < deadline {
            let Ok(Some(line)) =
                tokio::time::timeout(Duration::from_millis(500), sensor_sub.recv()).await
            else {
                continue;
            };
            if let Record::Sensor(report) = Record::decode(&line) {
                assert_eq!(report.sensor_name, "noisy1");
                assert_eq!(report.kind, SensorKind::Noisy);
                assert_eq!(report.noise_std, 0.1);
                engine.insert(report, Instant::now());
                received += 1;
            }
        }

        assert!(received >= 3, "expected relayed reports, got {received}");

        let estimate = engine.estimate(Instant::now()).expect("estimate defined");
        assert_eq!(estimate.contributing, 1);
        // Noise is 0.1 and the target moves along y = 0
        assert!(estimate.y.abs() < 2.0);

        emitter.await.unwrap().unwrap();
        noisy.abort();
    }

    /// Malformed and foreign datagrams interleaved with valid traffic must
    /// not disturb valid-record processing.
    #[tokio::test]
    async fn malformed_traffic_does_not_break_the_pipeline() {
        let object_channel = loopback(20220);
        let sensor_channel = loopback(20221);

        let mut sensor_sub = Subscriber::join(sensor_channel).await.unwrap();

        let (_stop_tx, stop) = watch::channel(false);
        let noisy = tokio::spawn(run_noisy(
            NoisyConfig {
                name: "noisy1".into(),
                noise_std: 0.0,
            },
            object_channel,
            sensor_channel,
            stop,
        ));

        tokio::time::sleep(Duration::from_millis(100)).await;

        let publisher = Publisher::bind(object_channel).await.unwrap();
        for garbage in [
            "object,broken,NaN,0.0,0.0",
            "vehicle,t1,1.0,2.0,0.5",
            "object,t1,1.0",
            "%%%%",
        ] {
            publisher.publish_line(garbage).await;
        }
        publisher.publish_line("object,t1,5.000,6.000,0.500").await;

        // The only relayed report is the valid one
        let line = tokio::time::timeout(Duration::from_secs(3), sensor_sub.recv())
            .await
            .expect("valid record should survive garbage")
            .unwrap();

        match Record::decode(&line) {
            Record::Sensor(report) => {
                assert_eq!(report.x, 5.0);
                assert_eq!(report.y, 6.0);
            }
            other => panic!("expected sensor record, got {other:?}"),
        }

        noisy.abort();
    }
}

#[cfg(test)]
mod adas_tests {
    use std::net::Ipv4Addr;
    use std::time::Duration;

    use agents::{run_adas, AdasConfig};
    use bus::{Publisher, Subscriber};
    use contracts::{Channel, Record, SensorKind};
    use tokio::sync::watch;

    /// A fast object stream through an ADAS agent produces tagged,
    /// debounced output.
    #[tokio::test]
    async fn adas_relays_tagged_and_debounced() {
        let object_channel = Channel::new(Ipv4Addr::LOCALHOST, 20230);
        let sensor_channel = Channel::new(Ipv4Addr::LOCALHOST, 20231);

        let mut sensor_sub = Subscriber::join(sensor_channel).await.unwrap();

        let (_stop_tx, stop) = watch::channel(false);
        let adas = tokio::spawn(run_adas(
            AdasConfig {
                name: "adas1".into(),
                mean_interval: Duration::from_millis(300),
            },
            object_channel,
            sensor_channel,
            stop,
        ));

        tokio::time::sleep(Duration::from_millis(100)).await;

        // ~1.2s of 20 Hz traffic; mean interval 0.3s allows at most a
        // handful of publishes
        let publisher = Publisher::bind(object_channel).await.unwrap();
        let feeder = tokio::spawn(async move {
            for i in 0..24 {
                let t = i as f64 / 24.0;
                publisher
                    .publish_line(&format!("object,t1,{:.3},0.000,{:.3}", t * 10.0, t))
                    .await;
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        });

        let mut reports = Vec::new();
        loop {
            match tokio::time::timeout(Duration::from_millis(700), sensor_sub.recv()).await {
                Ok(Some(line)) => {
                    if let Record::Sensor(report) = Record::decode(&line) {
                        reports.push(report);
                    }
                }
                _ => break,
            }
        }

        feeder.await.unwrap();
        adas.abort();

        assert!(!reports.is_empty(), "adas never published");
        // Far fewer publishes than inputs: the debounce is active
        assert!(
            reports.len() <= 7,
            "debounce admitted too many reports: {}",
            reports.len()
        );
        for report in &reports {
            assert_eq!(report.kind, SensorKind::Adas);
            assert_eq!(report.noise_std, 0.0);
        }
    }
}

#[cfg(test)]
mod supervisor_tests {
    use std::time::Duration;

    use supervisor::{AgentHandle, AgentState, ManagedRole, RespawnSpec};

    /// A crashed sensor is observed and relaunched with identical
    /// parameters - the restart contract, exercised on real processes.
    #[tokio::test]
    async fn crash_is_observed_and_respawned_with_same_spec() {
        let spec = RespawnSpec::external("/bin/sh", vec!["-c".into(), "exit 7".into()]);
        let mut agent = AgentHandle::spawn("flaky", ManagedRole::Sensor, spec).unwrap();
        let original_args = agent.spec().args().to_vec();

        let mut status = None;
        for _ in 0..100 {
            status = agent.poll_exit();
            if status.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        let status = status.expect("exit observed within the polling budget");
        assert_eq!(status.code(), Some(7));

        agent.respawn().unwrap();
        assert_eq!(agent.state(), AgentState::Running);
        assert_eq!(agent.spec().args(), original_args.as_slice());
        assert_eq!(agent.restarts(), 1);
    }

    /// Two-phase shutdown: cooperative children stop on stdin EOF within
    /// the grace period, stubborn ones get killed.
    #[tokio::test]
    async fn two_phase_shutdown_handles_both_child_kinds() {
        let cooperative = RespawnSpec::external("/bin/sh", vec!["-c".into(), "read x".into()]);
        let stubborn = RespawnSpec::external("/bin/sh", vec!["-c".into(), "sleep 600".into()]);

        let mut polite = AgentHandle::spawn("polite", ManagedRole::Sensor, cooperative).unwrap();
        let mut rude = AgentHandle::spawn("rude", ManagedRole::Sensor, stubborn).unwrap();

        // Phase 1: graceful
        polite.close_stdin();
        rude.close_stdin();
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(polite.poll_exit().is_some(), "cooperative child should stop");
        assert!(rude.poll_exit().is_none(), "sleep ignores stdin");

        // Phase 2: forceful
        polite.force_kill().await;
        rude.force_kill().await;
        assert_eq!(polite.state(), AgentState::Terminated);
        assert_eq!(rude.state(), AgentState::Terminated);
    }
}

#[cfg(test)]
mod config_tests {
    use config_loader::{ConfigFormat, ConfigLoader};

    /// Blueprint values feed placement the same way the supervisor wires
    /// them.
    #[test]
    fn loaded_blueprint_feeds_placement() {
        let blueprint = ConfigLoader::load_from_str(
            r#"
[targets]
count = 4
radius = 10.0
delta_deg = 90.0

[[sensors]]
kind = "noisy"
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        let plans = supervisor::circle_placement(
            blueprint.targets.count,
            blueprint.targets.radius,
            blueprint.targets.delta_deg,
        );

        assert_eq!(plans.len(), 4);
        // Target 1 starts at angle 0 and ends 90 degrees ahead
        assert!((plans[0].start.0 - 10.0).abs() < 1e-9);
        assert!(plans[0].end.0.abs() < 1e-9);
        assert!((plans[0].end.1 - 10.0).abs() < 1e-9);
    }
}
