use rstest::rstest;
use tally_config::load_toml;

#[test]
fn empty_config_is_a_usable_simulated_station() {
    let cfg = load_toml("").expect("empty TOML must parse");
    cfg.validate().expect("defaults must validate");
    assert_eq!(cfg.detector.rate_hz, 20);
    assert_eq!(cfg.capture.partial_every, 6);
    assert!(cfg.export.history_file.is_none());
}

#[test]
fn full_config_round_trips() {
    let toml = r#"
        [station]
        name = "corridor-1"
        lot = "L-042"

        [detector]
        rate_hz = 50
        poll_timeout_ms = 100
        out_ratio = 0.2
        seed = 7

        [weight]
        min_kg = 40.0
        max_kg = 120.0
        sample_timeout_ms = 250
        seed = 9

        [capture]
        partial_every = 10

        [logging]
        level = "debug"
        rotation = "daily"

        [export]
        history_file = "history.csv"
    "#;
    let cfg = load_toml(toml).expect("parse");
    cfg.validate().expect("validate");
    assert_eq!(cfg.station.name.as_deref(), Some("corridor-1"));
    assert_eq!(cfg.detector.seed, Some(7));
    assert_eq!(cfg.weight.max_kg, 120.0);
    assert_eq!(cfg.capture.partial_every, 10);
    assert_eq!(cfg.export.history_file.as_deref(), Some("history.csv"));
}

#[test]
fn weight_section_accepts_sample_ms_alias() {
    let cfg = load_toml("[weight]\nsample_ms = 42\n").expect("parse");
    assert_eq!(cfg.weight.sample_timeout_ms, 42);
}

#[rstest]
#[case("[detector]\nrate_hz = 0\n", "rate_hz")]
#[case("[detector]\nrate_hz = 20000\n", "rate_hz")]
#[case("[detector]\npoll_timeout_ms = 0\n", "poll_timeout_ms")]
#[case("[detector]\nout_ratio = 1.5\n", "out_ratio")]
#[case("[detector]\nout_ratio = -0.1\n", "out_ratio")]
#[case("[weight]\nmin_kg = -1.0\n", "min_kg")]
#[case("[weight]\nmin_kg = 80.0\nmax_kg = 60.0\n", "max_kg")]
#[case("[weight]\nsample_timeout_ms = 0\n", "sample_timeout_ms")]
#[case("[capture]\npartial_every = 0\n", "partial_every")]
#[case("[logging]\nrotation = \"weekly\"\n", "rotation")]
fn out_of_range_values_are_rejected(#[case] toml: &str, #[case] field: &str) {
    let cfg = load_toml(toml).expect("parse should succeed");
    let err = cfg.validate().expect_err("validate should fail");
    assert!(
        err.to_string().contains(field),
        "error for {field} was: {err}"
    );
}

#[test]
fn unknown_sections_are_tolerated() {
    // Forward compatibility: older binaries ignore newer sections.
    let cfg = load_toml("[video]\nretention_days = 30\n").expect("parse");
    cfg.validate().expect("validate");
}
