use std::path::PathBuf;

use credit_risk::analytics::Aggregator;
use credit_risk::app::Session;
use credit_risk::app::session::load_engine;
use credit_risk::config::DEFAULT_MODEL_PATH;
use credit_risk::data::{DataSource, DatasetStore};
use credit_risk::domain::{ApplicantForm, CategoricalColumn, Decision, NumericColumn};
use credit_risk::error::EXIT_INPUT;
use credit_risk::models::LogisticModel;
use credit_risk::report;
use credit_risk::scoring::ScoringEngine;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/borrowers.csv")
}

fn bundled_model() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_MODEL_PATH)
}

fn session() -> Session {
    let store = DatasetStore::new(DataSource::File(fixture()));
    Session::new(store, load_engine(&bundled_model()))
}

#[test]
fn loads_fixture_and_reports_skipped_rows() {
    let session = session();
    let dataset = session.dataset().unwrap();
    let summary = dataset.summary();

    assert_eq!(summary.rows_read, 15);
    assert_eq!(dataset.len(), 14);
    assert_eq!(summary.dropped_columns, vec!["Unnamed: 0".to_string()]);
    assert_eq!(summary.columns.len(), 15);

    let lines: Vec<usize> = summary.row_errors.iter().map(|e| e.line).collect();
    assert_eq!(lines, vec![14]);
    assert!(summary.row_errors[0].message.contains("person_income"));

    // A blank loan grade keeps the row; only that cell is missing.
    let blank_grade = &dataset.records()[12];
    assert_eq!(blank_grade.loan_grade, None);
    assert_eq!(blank_grade.home_ownership.as_deref(), Some("MORTGAGE"));

    // A second call returns the cached dataset.
    assert!(std::ptr::eq(dataset, session.dataset().unwrap()));
}

#[test]
fn blank_engineered_cells_stay_blank() {
    let session = session();
    let records = session.dataset().unwrap().records();

    // Row 6: blank interest rate and blank engineered cells.
    let r6 = &records[6];
    assert_eq!(r6.interest_rate, None);
    assert_eq!(r6.loan_percent_income, Some(0.45));
    assert_eq!(r6.emp_length_missing, None);
    assert_eq!(r6.income_stability, None);
    assert_eq!(r6.dti_band, None);

    // Row 8: blank employment length, engineered cells left as stored.
    let r8 = &records[8];
    assert_eq!(r8.emp_length, None);
    assert_eq!(r8.emp_length_missing, None);
    assert_eq!(r8.dti_band, None);

    let agg = session.aggregator().unwrap();
    let bands = agg.value_counts(CategoricalColumn::DtiBand);
    assert_eq!(bands.values().sum::<usize>(), 12);
}

#[test]
fn aggregates_match_the_fixture() {
    let session = session();
    let agg = session.aggregator().unwrap();

    let kpis = agg.kpis();
    assert_eq!(kpis.records, 14);
    assert_eq!(kpis.default_rate, Some(0.5));

    let grades = agg.value_counts(CategoricalColumn::LoanGrade);
    assert_eq!(grades.get("A"), Some(&4));
    assert_eq!(grades.get("B"), Some(&4));
    assert_eq!(grades.get("C"), Some(&3));
    assert_eq!(grades.get("D"), Some(&2));

    let bins = agg.histogram(NumericColumn::PersonAge, 40);
    assert_eq!(bins.len(), 40);
    assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 14);

    // Interest rate is blank on one row, employment length on another.
    assert_eq!(agg.scatter_pairs(NumericColumn::PersonEmpLength, NumericColumn::LoanIntRate).len(), 12);

    let boxes = agg
        .grouped_distribution(CategoricalColumn::PersonHomeOwnership, NumericColumn::PersonIncome)
        .box_summaries();
    let names: Vec<&str> = boxes.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, vec!["MORTGAGE", "OWN", "RENT"]);

    let text = report::format_summary(session.dataset().unwrap(), &kpis);
    assert!(text.contains("Total Records  : 14"));
    assert!(text.contains("Default Rate: 50.0%"));
    assert!(text.contains("Skipped rows   : 1 of 15"));
}

#[test]
fn scores_complete_borrowers_with_the_bundled_model() {
    let session = session();
    let engine = session.engine().unwrap();
    let records = session.dataset().unwrap().records();

    let mut scored = 0;
    for record in records {
        // Rows with a blank raw cell (rate, employment, grade) cannot be scored.
        let Ok(input) = record.applicant_input() else {
            continue;
        };
        let result = engine.score(&input).unwrap();
        assert!((0.0..=1.0).contains(&result.probability));
        assert_eq!(
            result.decision == Decision::Default,
            result.probability >= result.threshold
        );
        scored += 1;
    }
    assert_eq!(scored, 11);
}

#[test]
fn form_defaults_score_and_bad_input_is_rejected() {
    let session = session();

    let scored = session.score(&ApplicantForm::default()).unwrap();
    assert_eq!(scored.features.loan_percent_income, 0.4);
    assert_eq!(scored.features.emp_length_missing, 0);
    assert!(report::format_scored(&scored).contains("Default Probability:"));

    let bad = ApplicantForm {
        loan_grade: "Z".to_string(),
        ..ApplicantForm::default()
    };
    let err = session.score(&bad).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_INPUT);
    assert!(err.to_string().contains("loan_grade"));
}

#[test]
fn scoring_matches_a_directly_loaded_model() {
    let direct = ScoringEngine::new(LogisticModel::from_path(&bundled_model()).unwrap()).unwrap();
    let via_session = session().score(&ApplicantForm::default()).unwrap();
    let again = direct.score_form(&ApplicantForm::default()).unwrap();
    assert_eq!(via_session, again);
}
