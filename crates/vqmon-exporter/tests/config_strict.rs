#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use vqmon_core::MetricKind;
use clap::Parser;
use vqmon_exporter::config::{self, Cli, LogFormat};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
push:
  gateway_url: "http://localhost:9091"
  jobname: "typo" # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_CONFIG");
}

#[test]
fn ok_minimal_config_uses_defaults() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.exporter.listen, "0.0.0.0:8080");
    assert_eq!(cfg.exporter.update_interval_ms, 5000);
    assert_eq!(cfg.push.gateway_url, "http://localhost:9091");
    assert_eq!(cfg.push.job, "studio-web-player");
    assert_eq!(cfg.push.timeout_ms, 5000);
    assert_eq!(cfg.log.format, LogFormat::Text);

    let names: Vec<_> = cfg.catalog.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["videostutter", "video_play_total"]);
    assert_eq!(cfg.catalog[0].label_names, ["table_id", "cdn_id", "quality"]);
    assert_eq!(cfg.catalog[1].kind, MetricKind::Counter);
}

#[test]
fn alternate_player_catalog() {
    let ok = r#"
version: 1
exporter:
  update_interval_ms: 30000
catalog:
  - name: videostutter
    kind: gauge
    help: Video stutter metric for studio web player
    labels: [player_id, video_id, quality]
  - name: video_play_total
    kind: counter
    help: Total number of video plays
    labels: [player_id, video_id]
simulation:
  tables: [player-001, player-002, player-003]
  cdns: [video-001, video-002, video-003]
  qualities: [720p, 1080p, 4K]
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.exporter.update_interval_ms, 30000);
    assert_eq!(cfg.catalog[0].label_names[0], "player_id");
    assert_eq!(cfg.simulation.qualities.len(), 3);
}

#[test]
fn rejects_bad_values() {
    let cases = [
        "version: 2\n",
        "version: 1\nexporter: { listen: \"not-an-addr\" }\n",
        "version: 1\nexporter: { update_interval_ms: 10 }\n",
        "version: 1\npush: { gateway_url: \"localhost:9091\" }\n",
        "version: 1\npush: { job: \"a/b\" }\n",
        "version: 1\npush: { job: \"a#b\" }\n",
        "version: 1\npush: { job: \"a?b\" }\n",
        "version: 1\npush: { job: \"a b\" }\n",
        "version: 1\npush: { job: \"\" }\n",
        "version: 1\npush: { job: \"joß\" }\n",
        "version: 1\npush: { timeout_ms: 0 }\n",
        "version: 1\ncatalog: []\n",
        "version: 1\nsimulation: { max_stutter: 0 }\n",
        "version: 1\nsimulation: { tables: [] }\n",
    ];
    for case in cases {
        let err = config::load_from_str(case).expect_err(case);
        assert_eq!(err.code().as_str(), "INVALID_CONFIG", "{case}");
    }
}

#[test]
fn rejects_catalog_problems() {
    let dup = r#"
version: 1
catalog:
  - { name: videostutter, kind: gauge, labels: [table_id, cdn_id, quality] }
  - { name: videostutter, kind: gauge, labels: [a] }
  - { name: video_play_total, kind: counter, labels: [table_id, cdn_id] }
"#;
    assert!(config::load_from_str(dup).is_err());

    let bad_name = r#"
version: 1
catalog:
  - { name: "video stutter", kind: gauge }
"#;
    assert!(config::load_from_str(bad_name).is_err());

    // Simulation drives a metric with the wrong kind.
    let wrong_kind = r#"
version: 1
catalog:
  - { name: videostutter, kind: counter, labels: [table_id, cdn_id, quality] }
  - { name: video_play_total, kind: counter, labels: [table_id, cdn_id] }
"#;
    let err = config::load_from_str(wrong_kind).expect_err("must fail");
    assert!(err.to_string().contains("videostutter"));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let (cfg, found) = config::load_or_default("definitely/not/here/vqmon.yaml").unwrap();
    assert!(!found);
    assert_eq!(cfg.version, 1);
    cfg.validate().unwrap();
}

#[test]
fn job_accepts_url_unreserved_characters() {
    let cfg = config::load_from_str("version: 1\npush: { job: \"studio-web_player.v2~eu\" }\n").unwrap();
    assert_eq!(cfg.push.job, "studio-web_player.v2~eu");
}

#[test]
fn load_from_file_reads_and_validates() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../vqmon.example.yaml");
    let cfg = config::load_from_file(path).unwrap();
    assert_eq!(cfg.push.job, "studio-web-player");

    let err = config::load_from_file("definitely/not/here/vqmon.yaml").unwrap_err();
    assert_eq!(err.code().as_str(), "INTERNAL");
    assert!(err.to_string().contains("definitely/not/here"));
}

#[test]
fn cli_config_flag_and_default() {
    let cli = Cli::try_parse_from(["vqmon-exporter", "--config", "alt.yaml"]).unwrap();
    assert_eq!(cli.config, "alt.yaml");
    let cli = Cli::try_parse_from(["vqmon-push", "-c", "push.yaml"]).unwrap();
    assert_eq!(cli.config, "push.yaml");

    // Only meaningful when the env var is not set in the test environment.
    if std::env::var_os(config::CONFIG_ENV).is_none() {
        let cli = Cli::try_parse_from(["vqmon-exporter"]).unwrap();
        assert_eq!(cli.config, config::DEFAULT_CONFIG_PATH);
    }

    assert!(Cli::try_parse_from(["vqmon-exporter", "--bogus"]).is_err());
}

#[test]
fn example_config_is_valid() {
    let cfg = config::load_from_str(include_str!("../../../vqmon.example.yaml")).expect("must parse");
    assert_eq!(cfg.simulation.tables.len(), 4);
    assert_eq!(cfg.push.job, "studio-web-player");
}
