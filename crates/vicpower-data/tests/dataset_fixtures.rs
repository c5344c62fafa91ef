//! Loads a complete fixture directory the way the page build does.

use std::fs;

use vicpower_data::{
    DataDir, Driver, FEVD_DEMAND_FIRST_FILE, FEVD_REN_FIRST_FILE, FEVD_TREND_FILE,
    MODEL_READY_FILE, REN_SHARE_FILE, ROLLING_BETA_FILE, YearMonth,
};

fn write_fixture(dir: &std::path::Path) {
    let files = [
        (
            ROLLING_BETA_FILE,
            r#"[
                {"date":"2016-01","beta":0.42,"lower":0.2,"upper":0.64},
                {"date":"2021-06","beta":0.18,"lower":-0.05,"upper":0.41},
                {"date":"2024-03","beta":-0.04,"lower":-0.2,"upper":0.12,"window_ren_share":0.41}
            ]"#,
        ),
        (
            FEVD_DEMAND_FIRST_FILE,
            r#"[{"horizon":24,"Gas":0.02,"Renewables":0.15,"Imports":0.05,"Demand":0.03,"Own":0.75}]"#,
        ),
        (
            FEVD_REN_FIRST_FILE,
            r#"[{"horizon":24,"Gas":0.03,"Renewables":0.14,"Imports":0.05,"Demand":0.03,"Own":0.75}]"#,
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
            r#"[{"date":"2022-02-01","price":142.5,"gas":11.2,"ren_share":0.31}]"#,
        ),
    ];
    for (name, body) in files {
        fs::write(dir.join(name), body).unwrap();
    }
}

#[test]
fn complete_directory_loads_everything() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let dataset = DataDir::new(dir.path()).load_all();
    assert_eq!(dataset.missing_count(), 0);
    assert_eq!(dataset.rolling_beta.len(), 3);
    assert_eq!(dataset.fevd_trend[1].shares.get(Driver::Renewables), 0.15);
    assert_eq!(
        YearMonth::parse(&dataset.model_ready[0].date),
        YearMonth::new(2022, 2)
    );
    let ren_first = dataset.fevd_ren_first.unwrap();
    assert_eq!(ren_first.shares.dominant(), Driver::Own);
}

#[test]
fn one_bad_file_leaves_the_rest_intact() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    fs::write(dir.path().join(REN_SHARE_FILE), "not json").unwrap();

    let dataset = DataDir::new(dir.path()).load_all();
    assert!(dataset.ren_share.is_empty());
    assert_eq!(dataset.missing_count(), 1);
    assert!(dataset.fevd_demand_first.is_some());
}
