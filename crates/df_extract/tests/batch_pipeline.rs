//! crates/df_extract/tests/batch_pipeline.rs
//!
//! 端到端提取流程测试
//!
//! 在临时目录中构造若干 OpenFOAM 算例，覆盖：
//! - 批处理中缺失时间步的算例失败但不影响其他算例
//! - 标量场具体解析场景
//! - 边界分类具体场景
//! - 报告 JSON 序列化

use std::fs;
use std::path::Path;

use df_config::{CoordinateMode, ExtractionConfig, PatternSelection, TimeStepSelector};
use df_extract::{CaseOutcome, ExtractionDriver, FieldProvenance};
use df_io::foam::parse_field_str;
use tempfile::tempdir;

// ============================================================
// 算例构造
// ============================================================

const POINTS: &str = r#"/*--------------------------------*- C++ -*----------------------------------*\
| =========                 |                                                 |
\*---------------------------------------------------------------------------*/
FoamFile
{
    version     2.0;
    format      ascii;
    class       vectorField;
    location    "constant/polyMesh";
    object      points;
}
// * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * //

4
(
(0.2 7 2)
(7 7 2)
(7 1 2)
(7 7 4.8)
)
"#;

fn velocity(n: usize) -> String {
    let mut s = format!(
        "FoamFile\n{{\n    class volVectorField;\n    object U;\n}}\n\ninternalField   nonuniform List<vector>\n{n}\n(\n"
    );
    for i in 0..n {
        s.push_str(&format!("({} 0 0)\n", 0.5 + i as f64 * 0.1));
    }
    s.push_str(")\n;\n\nboundaryField\n{\n}\n");
    s
}

fn pressure(n: usize) -> String {
    let mut s = String::from("FoamFile\n{\n    object p;\n}\n\ninternalField   nonuniform List<scalar>\n");
    s.push_str(&format!("{n}\n(\n"));
    for i in 0..n {
        s.push_str(&format!("{}\n", i as f64 * 0.01));
    }
    s.push_str(")\n;\n");
    s
}

/// 在 `root/pattern_{id}/debrisCase` 下写一个算例
fn write_case(root: &Path, id: u32, time_dirs: &[&str]) {
    let case = root.join(format!("pattern_{id}/debrisCase"));
    fs::create_dir_all(case.join("constant/polyMesh")).unwrap();
    fs::create_dir_all(case.join("system")).unwrap();
    fs::write(case.join("constant/polyMesh/points"), POINTS).unwrap();
    for t in time_dirs {
        let dir = case.join(t);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("U"), velocity(4)).unwrap();
        fs::write(dir.join("p"), pressure(4)).unwrap();
    }
}

fn config_for(root: &Path, patterns: &str) -> ExtractionConfig {
    let mut config = ExtractionConfig::default();
    config.case.case_root = root.join("simulation_results");
    config.case.patterns = patterns.parse::<PatternSelection>().unwrap();
    config.output.directory = root.join("output");
    config
}

// ============================================================
// 批处理
// ============================================================

#[test]
fn test_batch_with_missing_time_dir() {
    let tmp = tempdir().unwrap();
    let sims = tmp.path().join("simulation_results");
    write_case(&sims, 1, &["0", "5"]);
    write_case(&sims, 2, &[]);
    write_case(&sims, 3, &["5"]);

    let driver = ExtractionDriver::new(config_for(tmp.path(), "1-3"));
    let report = driver.run_batch();

    assert_eq!(report.cases.len(), 3);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert!(report.any_succeeded());

    let ids: Vec<u32> = report.cases.iter().map(|c| c.pattern_id()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(matches!(report.cases[1], CaseOutcome::Failure { pattern_id: 2, .. }));

    let out = tmp.path().join("output");
    assert!(out.join("pattern_1_results.csv").is_file());
    assert!(!out.join("pattern_2_results.csv").exists());
    assert!(out.join("pattern_3_results.csv").is_file());

    let text = fs::read_to_string(out.join("pattern_1_results.csv")).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[0],
        "x,y,z,Ux,Uy,Uz,pressure,velocity_magnitude,patch_id,patch_name"
    );
    assert_eq!(lines[1], "0.2,7,2,0.5,0,0,0,0.5,0,inlet");
}

#[test]
fn test_batch_missing_case_directory() {
    let tmp = tempdir().unwrap();
    let sims = tmp.path().join("simulation_results");
    write_case(&sims, 1, &["5"]);

    let driver = ExtractionDriver::new(config_for(tmp.path(), "1,4"));
    let report = driver.run_batch();
    assert_eq!(report.succeeded(), 1);
    match &report.cases[1] {
        CaseOutcome::Failure { pattern_id, reason, .. } => {
            assert_eq!(*pattern_id, 4);
            assert!(!reason.is_empty());
        }
        other => panic!("期望失败，得到 {other:?}"),
    }
}

#[test]
fn test_parallel_batch_keeps_order() {
    let tmp = tempdir().unwrap();
    let sims = tmp.path().join("simulation_results");
    for id in 1..=6 {
        let dirs: &[&str] = if id % 2 == 0 { &[] } else { &["5"] };
        write_case(&sims, id, dirs);
    }

    let mut config = config_for(tmp.path(), "1-6");
    config.parallel = true;
    let report = ExtractionDriver::new(config).run_batch();

    let ids: Vec<u32> = report.cases.iter().map(|c| c.pattern_id()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(report.succeeded(), 3);
}

#[test]
fn test_report_serializes_to_json() {
    let tmp = tempdir().unwrap();
    let sims = tmp.path().join("simulation_results");
    write_case(&sims, 1, &["5"]);

    let report = ExtractionDriver::new(config_for(tmp.path(), "1")).run_batch();
    let json = serde_json::to_value(&report).unwrap();

    let case = &json["cases"][0];
    assert_eq!(case["status"], "success");
    assert_eq!(case["report"]["time_step"], "5");
    assert_eq!(case["report"]["record_count"], 4);
    assert_eq!(case["report"]["coordinate_source"]["kind"], "mesh_points");
    assert_eq!(case["report"]["fields"]["U"], "parsed");
    assert_eq!(case["report"]["patch_counts"]["debris_region"], 1);
    assert!(json["generated_at"].is_string());
}

// ============================================================
// 具体场景
// ============================================================

#[test]
fn test_scalar_scenario() {
    let (field, diagnostics) =
        parse_field_str("internalField nonuniform List<scalar>\n3\n(\n1.0\n2.5\n-0.3\n);", "p")
            .into_parts()
            .unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(field.values.as_scalar().unwrap(), &[1.0, 2.5, -0.3]);
}

#[test]
fn test_classification_scenario() {
    let tmp = tempdir().unwrap();
    let sims = tmp.path().join("simulation_results");
    write_case(&sims, 1, &["5"]);

    let driver = ExtractionDriver::new(config_for(tmp.path(), "1"));
    let outcome = driver.extract_pattern(1);
    let CaseOutcome::Success { report, .. } = outcome else {
        panic!("算例应当成功");
    };

    let text = fs::read_to_string(&report.output).unwrap();
    let names: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|l| l.rsplit(',').next().unwrap())
        .collect();
    assert_eq!(names, vec!["inlet", "debris_region", "internal", "atmosphere"]);
}

#[test]
fn test_named_time_step_and_shortfall() {
    let tmp = tempdir().unwrap();
    let sims = tmp.path().join("simulation_results");
    write_case(&sims, 1, &["0", "5"]);
    let case = sims.join("pattern_1/debrisCase");
    fs::write(case.join("0/U"), velocity(6)).unwrap();
    fs::write(case.join("0/p"), pressure(6)).unwrap();

    let mut config = config_for(tmp.path(), "1");
    config.time_step = TimeStepSelector::Named("0".into());
    config.coordinates.mode = CoordinateMode::MeshPoints;
    let driver = ExtractionDriver::new(config);

    let report = driver
        .extract_case(&case, &tmp.path().join("t0.csv"))
        .unwrap();
    assert_eq!(report.time_step, "0");
    // 网格点只有 4 个，按最短长度输出
    assert_eq!(report.record_count, 4);
    assert!(report.diagnostics.iter().any(|d| matches!(
        d,
        df_foundation::Diagnostic::CoordinateShortfall { needed: 6, available: 4 }
    )));
    assert_eq!(report.fields.get("p"), Some(&FieldProvenance::Parsed));
}
