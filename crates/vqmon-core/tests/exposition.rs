#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use vqmon_core::exposition::{self, encode, format_sample, format_value};
use vqmon_core::{
    ErrorCode, FamilySnapshot, MetricDescriptor, Registry, Series, Snapshot, NO_LABELS,
};

fn stutter_registry() -> Registry {
    let reg = Registry::new();
    reg.register(MetricDescriptor::gauge(
        "videostutter",
        "Video stutter metric for studio web player",
        &["table_id", "cdn_id", "quality"],
    ))
    .unwrap();
    reg.register(MetricDescriptor::counter(
        "video_play_total",
        "Total number of video plays",
        &["table_id", "cdn_id"],
    ))
    .unwrap();
    reg
}

#[test]
fn end_to_end_stutter_line() {
    let reg = stutter_registry();
    reg.set_gauge(
        "videostutter",
        &[("table_id", "ARO-001"), ("cdn_id", "byteplus"), ("quality", "HD")],
        8.0,
    )
    .unwrap();

    let text = encode(&reg.snapshot().unwrap()).unwrap();
    assert!(text
        .lines()
        .any(|l| l == r#"videostutter{table_id="ARO-001",cdn_id="byteplus",quality="HD"} 8"#));
}

#[test]
fn full_document_layout() {
    let reg = stutter_registry();
    reg.set_gauge("videostutter", &["ARO-002", "tencent", "Hi"], 12.5)
        .unwrap();
    reg.inc_counter("video_play_total", &["ARO-002", "tencent"]).unwrap();
    reg.inc_counter("video_play_total", &["ARO-002", "tencent"]).unwrap();

    let text = encode(&reg.snapshot().unwrap()).unwrap();
    let expected = "\
# HELP videostutter Video stutter metric for studio web player
# TYPE videostutter gauge
videostutter{table_id=\"ARO-002\",cdn_id=\"tencent\",quality=\"Hi\"} 12.5
# HELP video_play_total Total number of video plays
# TYPE video_play_total counter
video_play_total{table_id=\"ARO-002\",cdn_id=\"tencent\"} 2
";
    assert_eq!(text, expected);
}

#[test]
fn headers_emitted_for_empty_families() {
    let reg = stutter_registry();
    let text = encode(&reg.snapshot().unwrap()).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert!(text.contains("# TYPE video_play_total counter\n"));
}

#[test]
fn encoding_is_deterministic() {
    let reg = stutter_registry();
    for (t, c, q, v) in [
        ("SBO-001", "cdnnetwork", "Me", 15.0),
        ("ARO-001", "tencent", "HD", 18.0),
        ("BCR-001", "byteplus", "Lo", 3.0),
        ("ARO-002", "cdnnetwork", "Hi", 7.0),
    ] {
        reg.set_gauge("videostutter", &[t, c, q], v).unwrap();
        reg.inc_counter("video_play_total", &[t, c]).unwrap();
    }

    let snap = reg.snapshot().unwrap();
    let a = encode(&snap).unwrap();
    let b = encode(&snap).unwrap();
    let c = encode(&reg.snapshot().unwrap()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[test]
fn unlabeled_series_omit_braces() {
    let reg = Registry::new();
    reg.register(MetricDescriptor::gauge("up", "Exporter up.", &[]))
        .unwrap();
    reg.set_gauge("up", NO_LABELS, 1.0).unwrap();

    let text = encode(&reg.snapshot().unwrap()).unwrap();
    assert!(text.ends_with("\nup 1\n"));
}

#[test]
fn escaping() {
    let reg = Registry::new();
    reg.register(MetricDescriptor::gauge("x", "line one\nback\\slash", &["path"]))
        .unwrap();
    reg.set_gauge("x", &["C:\\tmp \"q\"\nnext"], -0.5).unwrap();

    let text = encode(&reg.snapshot().unwrap()).unwrap();
    assert!(text.contains("# HELP x line one\\nback\\\\slash\n"));
    assert!(text.contains(r#"x{path="C:\\tmp \"q\"\nnext"} -0.5"#));
}

#[test]
fn value_formatting() {
    assert_eq!(format_value(8.0), "8");
    assert_eq!(format_value(0.0), "0");
    assert_eq!(format_value(12.25), "12.25");
    assert_eq!(format_value(0.1 + 0.2), "0.30000000000000004");
    assert_eq!(format_value(f64::NAN), "NaN");
    assert_eq!(format_value(f64::INFINITY), "+Inf");
    assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");

    // Plain decimal inside [1e-6, 1e21), exponent form outside it.
    assert_eq!(format_value(100000.0), "100000");
    assert_eq!(format_value(1e20), "100000000000000000000");
    assert_eq!(format_value(0.000001), "0.000001");
    assert_eq!(format_value(1e21), "1e21");
    assert_eq!(format_value(1e300), "1e300");
    assert_eq!(format_value(-2.5e22), "-2.5e22");
    assert_eq!(format_value(1e-7), "1e-7");
    assert_eq!(format_value(1e-300), "1e-300");
    assert_eq!(format_value(f64::MAX).len(), "1.7976931348623157e308".len());

    for v in [1.0 / 3.0, 1e-7, 123456789.125, 19.999999999, 1e21, 1e300, 1e-300, f64::MIN_POSITIVE] {
        assert_eq!(format_value(v).parse::<f64>().unwrap(), v);
    }
}

#[test]
fn huge_counter_renders_in_exponent_form() {
    let reg = Registry::new();
    reg.register(MetricDescriptor::counter("bytes_total", "Bytes served.", &[]))
        .unwrap();
    reg.increment_counter("bytes_total", NO_LABELS, 1e21).unwrap();

    let text = encode(&reg.snapshot().unwrap()).unwrap();
    assert!(text.ends_with("\nbytes_total 1e21\n"), "{text}");
}

#[test]
fn empty_help_omits_help_line() {
    let reg = Registry::new();
    reg.register(MetricDescriptor::gauge("up", "", &[])).unwrap();
    reg.set_gauge("up", NO_LABELS, 1.0).unwrap();

    let text = encode(&reg.snapshot().unwrap()).unwrap();
    assert_eq!(text, "# TYPE up gauge\nup 1\n");
    assert!(text.lines().all(|l| !l.ends_with(' ')));
}

#[test]
fn format_sample_keeps_given_order() {
    let line = format_sample(
        "videostutter",
        &[("table_id", "ARO-002"), ("cdn_id", "tencent"), ("quality", "Hi")],
        12.0,
    );
    assert_eq!(line, r#"videostutter{table_id="ARO-002",cdn_id="tencent",quality="Hi"} 12"#);

    let bare = format_sample::<&str, &str>("up", &[], 1.0);
    assert_eq!(bare, "up 1");
}

#[test]
fn arity_violation_is_an_encoding_error() {
    let snap = Snapshot::from_families(vec![FamilySnapshot {
        descriptor: MetricDescriptor::gauge("videostutter", "", &["table_id", "cdn_id"]),
        series: vec![Series {
            label_values: vec!["ARO-001".into()],
            value: 1.0,
        }],
    }]);

    let mut out = String::from("keep");
    let err = exposition::encode_into(&snap, &mut out).expect_err("must fail");
    assert_eq!(err.code(), ErrorCode::Encoding);
    assert_eq!(out, "keep");
}

#[test]
fn content_type_is_text_0_0_4() {
    assert!(exposition::CONTENT_TYPE.starts_with("text/plain; version=0.0.4"));
}
