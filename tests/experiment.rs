//! End-to-end runs over small review files.

use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use vn_sentiment::experiment::config::Config;
use vn_sentiment::{run_experiment, Error};

const POSITIVE: &[&str] = &[
    "Sản phẩm tuyệt vời, giao hàng nhanh",
    "Rất thích, chất lượng tốt",
    "Hài lòng với sản phẩm, đóng gói cẩn thận",
    "Tuyệt vời, sẽ ủng hộ lần sau",
    "Chính hãng, dưỡng ẩm tốt",
];

const NEGATIVE: &[&str] = &[
    "Thất vọng, hàng giả",
    "Giao hàng chậm, sản phẩm lỗi",
    "Dùng bị kích ứng, nổi mụn",
];

const NEUTRAL: &[&str] = &["Bình thường, tạm được", "Cũng được, giá cả hợp lý"];

fn write_fixture(dir: &Path, extra_rows: &[&str]) -> (String, String) {
    let csv_path = dir.join("reviews.csv");
    let mut csv = std::fs::File::create(&csv_path).unwrap();
    writeln!(csv, "ma_san_pham,noi_dung_binh_luan,so_sao").unwrap();
    let mut id = 0;
    for round in 0..6 {
        for text in POSITIVE {
            writeln!(csv, "{},\"{}\",{}", id, text, 4 + round % 2).unwrap();
            id += 1;
        }
        for text in NEGATIVE {
            writeln!(csv, "{},\"{}\",{}", id, text, 1 + round % 2).unwrap();
            id += 1;
        }
        for text in NEUTRAL {
            writeln!(csv, "{},\"{}\",3", id, text).unwrap();
            id += 1;
        }
    }
    for row in extra_rows {
        writeln!(csv, "{}", row).unwrap();
    }

    let stop_path = dir.join("stopwords.txt");
    std::fs::write(&stop_path, "rất\nvới\nsẽ\n\n  bị  \ncũng\n").unwrap();

    (
        csv_path.to_string_lossy().into_owned(),
        stop_path.to_string_lossy().into_owned(),
    )
}

fn config_for(dir: &TempDir, extra_rows: &[&str]) -> Config {
    let (csv_path, stop_path) = write_fixture(dir.path(), extra_rows);
    let mut config = Config::default();
    config.data.csv_path = csv_path;
    config.data.stopwords_path = Some(stop_path);
    config.data.seed = Some(42);
    config.random_forest.num_trees = 10;
    config
}

#[test]
fn test_full_run_reports_every_model() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &[]);
    let report = run_experiment(&config).unwrap();

    assert_eq!(report.load.rows_read, 60);
    assert_eq!(report.cleaning.kept, 60);
    assert_eq!(report.train_rows + report.test_rows, 60);
    assert_eq!(report.train_rows, 42);
    assert_eq!(report.labels, vec!["positive", "negative", "neutral"]);
    assert_eq!(report.zero_rows, 0);
    assert_eq!(report.test_counts.len(), report.labels.len());
    assert_eq!(report.test_counts.iter().sum::<usize>(), report.test_rows);
    assert_eq!(report.train_counts.iter().sum::<usize>(), report.train_rows);

    let names: Vec<&str> = report.baseline.iter().map(|r| r.model.as_str()).collect();
    assert_eq!(names, vec!["Logistic Regression", "Naive Bayes", "Random Forest"]);
    assert_eq!(report.rebalanced.len(), 3);

    for result in report.baseline.iter().chain(&report.rebalanced) {
        let m = result.metrics;
        for value in [m.accuracy, m.weighted_precision, m.weighted_recall, m.weighted_f1] {
            assert!((0.0..=1.0).contains(&value), "{} out of range", value);
        }
        assert_eq!(result.prediction_counts.iter().sum::<usize>(), report.test_rows);
        assert_eq!(result.confusion.total(), report.test_rows);
    }

    let rebalance = report.rebalance.expect("rebalancing is enabled by default");
    assert_eq!(rebalance.majority, 0);
    let majority = &rebalance.classes[0];
    assert_eq!(majority.before, majority.after);
    for class in &rebalance.classes[1..] {
        assert_eq!(class.ratio, majority.before / class.before);
        assert_eq!(class.after, class.ratio * class.before);
    }
}

#[test]
fn test_same_seed_same_metrics() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &[]);
    let a = run_experiment(&config).unwrap();
    let b = run_experiment(&config).unwrap();

    assert_eq!(a.fit_id, b.fit_id);
    for (x, y) in a.baseline.iter().zip(&b.baseline) {
        assert_eq!(x.metrics, y.metrics);
        assert_eq!(x.confusion, y.confusion);
    }
}

#[test]
fn test_null_and_malformed_rows_are_counted() {
    let dir = TempDir::new().unwrap();
    let config = config_for(
        &dir,
        &[
            "100,,5",
            "101,\"Không có sao\",",
            "102,\"Sáu sao\",6",
            "103,\"Không phải số\",abc",
            "104,\"   \",4",
        ],
    );
    let report = run_experiment(&config).unwrap();

    assert_eq!(report.load.rows_read, 65);
    assert_eq!(report.load.null_rows, 3);
    assert_eq!(report.load.malformed_ratings, 2);
    assert_eq!(report.cleaning.kept, 60);
}

#[test]
fn test_rebalance_can_be_disabled() {
    let dir = TempDir::new().unwrap();
    let mut config = config_for(&dir, &[]);
    config.rebalance.enabled = false;
    let report = run_experiment(&config).unwrap();
    assert!(report.rebalance.is_none());
    assert!(report.rebalanced.is_empty());
}

#[test]
fn test_report_serializes_to_json() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &[]);
    let report = run_experiment(&config).unwrap();

    let path = dir.path().join("report.json");
    report.write_json(&path).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["seed"], 42);
    assert_eq!(value["baseline"].as_array().unwrap().len(), 3);
    assert!(value["baseline"][0]["metrics"]["weighted_f1"].is_f64());
}

#[test]
fn test_all_stop_words_is_empty_vocabulary() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("reviews.csv");
    std::fs::write(&csv_path, "noi_dung_binh_luan,so_sao\nrất,5\nvới,1\n").unwrap();
    let stop_path = dir.path().join("stop.txt");
    std::fs::write(&stop_path, "rất\nvới\n").unwrap();

    let mut config = Config::default();
    config.data.csv_path = csv_path.to_string_lossy().into_owned();
    config.data.stopwords_path = Some(stop_path.to_string_lossy().into_owned());
    config.data.seed = Some(1);

    assert!(matches!(run_experiment(&config), Err(Error::EmptyVocabulary)));
}

#[test]
fn test_missing_rating_column() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("reviews.csv");
    std::fs::write(&csv_path, "noi_dung_binh_luan,rating\ntốt,5\n").unwrap();

    let mut config = Config::default();
    config.data.csv_path = csv_path.to_string_lossy().into_owned();
    config.data.stopwords_path = None;

    assert!(matches!(
        run_experiment(&config),
        Err(Error::MissingColumn(c)) if c == "so_sao"
    ));
}
