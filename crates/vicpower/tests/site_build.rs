//! Builds the site from fixture data directories.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;

use vicpower::cli::{Invocation, Opts};
use vicpower::build_site;
use vicpower_data::{
    FEVD_DEMAND_FIRST_FILE, FEVD_REN_FIRST_FILE, FEVD_TREND_FILE, MODEL_READY_FILE,
    REN_SHARE_FILE, ROLLING_BETA_FILE,
};

fn write_fixture(dir: &Path) {
    let files = [
        (
            ROLLING_BETA_FILE,
            r#"[
                {"date":"2016-01","beta":0.42,"lower":0.2,"upper":0.64},
                {"date":"2021-06","beta":0.18,"lower":-0.05,"upper":0.41},
                {"date":"2024-03","beta":-0.04,"lower":-0.2,"upper":0.12}
            ]"#,
        ),
        (
            FEVD_DEMAND_FIRST_FILE,
            r#"[{"horizon":24,"Gas":0.02,"Renewables":0.15,"Imports":0.05,"Demand":0.03,"Own":0.75}]"#,
        ),
        (
            FEVD_REN_FIRST_FILE,
            r#"[{"horizon":24,"Gas":0.02,"Renewables":0.13,"Imports":0.05,"Demand":0.03,"Own":0.77}]"#,
        ),
        (
            FEVD_TREND_FILE,
            r#"[
                {"period":"2019-12","Gas":0.12,"Renewables":0.06,"Imports":0.04,"Demand":0.05,"Own":0.73},
                {"period":"2024-12","Gas":0.02,"Renewables":0.15,"Imports":0.05,"Demand":0.03,"Own":0.75}
            ]"#,
        ),
        (
            REN_SHARE_FILE,
            r#"[{"date":"2015-01","ren_share":0.12},{"date":"2025-06","ren_share":0.43}]"#,
        ),
        (
            MODEL_READY_FILE,
            r#"[
                {"date":"2021-01-01","price":60.0,"gas":7.5,"ren_share":0.35},
                {"date":"2022-06-01","price":210.4,"gas":28.25,"ren_share":0.38}
            ]"#,
        ),
    ];
    for (name, body) in files {
        fs::write(dir.join(name), body).unwrap();
    }
}

fn opts(args: &[String]) -> Opts {
    match Opts::from_sources(args, |_| None) {
        Ok(Invocation::Run(opts)) => opts,
        other => panic!("unexpected parse result: {other:?}"),
    }
}

#[test]
fn full_data_builds_every_chart() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_fixture(data.path());

    let report = build_site(&opts(&[
        format!("--data-dir={}", data.path().display()),
        format!("--out={}", out.path().join("site").display()),
    ]))
    .unwrap();

    assert_eq!(report.missing_data_files, 0);
    assert!(!report.disclaimer_open);
    let html = fs::read_to_string(&report.index).unwrap();
    assert_eq!(html.len(), report.bytes);
    assert!(html.contains("data-section=\"fevd-now\""));
    assert!(html.contains("Renewables first"));
    assert!(html.contains("Global gas price spike"));
    assert!(html.contains("24 Feb 2022: Russia invades Ukraine"));
    assert!(!html.contains("chart-placeholder"));
    // Nothing has scrolled yet, so no chart replays.
    assert!(!html.contains("data-animate=\"true\""));
}

#[test]
fn empty_data_dir_still_builds() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let report = build_site(&opts(&[
        format!("--data-dir={}", data.path().display()),
        format!("--out={}", out.path().display()),
    ]))
    .unwrap();

    assert_eq!(report.missing_data_files, 6);
    let html = fs::read_to_string(&report.index).unwrap();
    assert!(html.contains("chart-placeholder"));
    assert!(html.contains("When gas sneezes, power prices catch a cold."));
}

#[test]
fn disclaimer_dismissal_persists_across_builds() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let state = out.path().join("client-state.json");
    let base = vec![
        format!("--data-dir={}", data.path().display()),
        format!("--out={}", out.path().display()),
        format!("--state-file={}", state.display()),
        "--viewport-width=375".to_string(),
    ];

    let first = build_site(&opts(&base)).unwrap();
    assert!(first.disclaimer_open);
    let html = fs::read_to_string(&first.index).unwrap();
    assert!(html.contains(vicpower_widgets::disclaimer::TITLE));

    let mut dismiss = base.clone();
    dismiss.push("--dismiss-disclaimer".to_string());
    let second = build_site(&opts(&dismiss)).unwrap();
    assert!(!second.disclaimer_open);
    assert!(state.exists());

    let third = build_site(&opts(&base)).unwrap();
    assert!(!third.disclaimer_open);
    let html = fs::read_to_string(&third.index).unwrap();
    assert!(!html.contains(vicpower_widgets::disclaimer::TITLE));
}

#[test]
fn detail_flag_selects_the_narrative_variant() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_fixture(data.path());
    let report = build_site(&opts(&[
        format!("--data-dir={}", data.path().display()),
        format!("--out={}", out.path().display()),
        "--detail=detailed".to_string(),
    ]))
    .unwrap();
    let html = fs::read_to_string(&report.index).unwrap();
    assert!(html.contains("narrative--detailed"));
    assert!(!html.contains("narrative--compact"));
    assert!(html.contains("aria-pressed=\"true\""));
}
