use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use loanscore_client::ClientError;
use loanscore_core::{
    BatchOrchestrator, CoreError, IdentityExtractor, Scorer, SingleOptions, score_single,
};
use loanscore_model::{FeatureVector, RawRecord, RawValue, RiskLabel, RowState, ScoreResult};
use loanscore_standards::{PreprocessConfig, load_default_preprocess};
use loanscore_transform::vectorize;
use serde_json::json;

/// Scorer that replays a fixed script of responses and counts calls.
struct ScriptedScorer {
    script: RefCell<VecDeque<Result<ScoreResult, ClientError>>>,
    seen: RefCell<Vec<FeatureVector>>,
    calls: Cell<usize>,
    authenticated: Cell<bool>,
}

impl ScriptedScorer {
    fn new(script: Vec<Result<ScoreResult, ClientError>>) -> Self {
        Self {
            script: RefCell::new(script.into()),
            seen: RefCell::new(Vec::new()),
            calls: Cell::new(0),
            authenticated: Cell::new(true),
        }
    }

    fn logged_out() -> Self {
        let scorer = Self::new(Vec::new());
        scorer.authenticated.set(false);
        scorer
    }
}

impl Scorer for ScriptedScorer {
    fn require_auth(&self) -> Result<(), ClientError> {
        if self.authenticated.get() {
            Ok(())
        } else {
            Err(ClientError::Unauthenticated)
        }
    }

    fn score(&self, vector: &FeatureVector) -> Result<ScoreResult, ClientError> {
        self.calls.set(self.calls.get() + 1);
        self.seen.borrow_mut().push(*vector);
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(prediction(1)))
    }

    fn invalidate_session(&self) {
        self.authenticated.set(false);
    }
}

fn prediction(code: u8) -> ScoreResult {
    ScoreResult::from_response(json!({"prediction": [code], "status": "success"}))
}

fn config() -> PreprocessConfig {
    load_default_preprocess().expect("shipped preprocess artifact")
}

fn applicant(name: &str, credit_score: &str) -> RawRecord {
    RawRecord::from_pairs([
        ("Ho_ten", name),
        ("person_age", "30"),
        ("person_gender", "female"),
        ("person_education", "Bachelor"),
        ("Person_Income", "52000"),
        ("person_emp_exp", "5"),
        ("person_home_ownership", "RENT"),
        ("loan_amnt", "10000"),
        ("loan_intent", "EDUCATION"),
        ("loan_int_rate", "11.5"),
        ("loan_percent_income", "0.19"),
        ("cb_person_cred_hist_length", "4"),
        ("Credit_Score", credit_score),
        ("previous_loan_defaults_on_file", "No"),
    ])
}

#[test]
fn out_of_range_credit_score_is_skipped_without_a_call() {
    let config = config();
    let scorer = ScriptedScorer::new(vec![Ok(prediction(1)), Ok(prediction(0))]);
    let records = vec![
        applicant("A", "700"),
        applicant("B", "900"),
        applicant("C", "650"),
    ];

    let report = BatchOrchestrator::new(&scorer, &config)
        .run(&records)
        .expect("batch runs");

    assert_eq!(scorer.calls.get(), 2);
    let states: Vec<RowState> = report.rows.iter().map(|row| row.state()).collect();
    assert_eq!(
        states,
        vec![RowState::Scored, RowState::Skipped, RowState::Scored]
    );
    assert_eq!(report.rows[0].outcome.label(), Some(RiskLabel::LowRisk));
    assert_eq!(report.rows[2].outcome.label(), Some(RiskLabel::HighRisk));
    assert!(report.rows[1].vector.is_none());
    assert_eq!(report.rows[1].credit_score.as_deref(), Some("900"));

    let summary = report.summary();
    assert_eq!(summary.scored, 2);
    assert_eq!(summary.skipped, 1);
    assert!(!summary.session_expired);
}

#[test]
fn expired_session_halts_remaining_rows() {
    let config = config();
    let scorer = ScriptedScorer::new(vec![Ok(prediction(1)), Err(ClientError::AuthExpired)]);
    let records: Vec<RawRecord> = (1..=5)
        .map(|i| applicant(&format!("Applicant {i}"), "700"))
        .collect();

    let report = BatchOrchestrator::new(&scorer, &config)
        .run(&records)
        .expect("batch runs");

    assert_eq!(scorer.calls.get(), 2);
    assert!(!scorer.authenticated.get(), "session must be invalidated");
    let states: Vec<RowState> = report.rows.iter().map(|row| row.state()).collect();
    assert_eq!(
        states,
        vec![
            RowState::Scored,
            RowState::AuthExpired,
            RowState::Pending,
            RowState::Pending,
            RowState::Pending,
        ]
    );
    assert_eq!(report.rows[4].display_name, "Applicant 5");
    assert!(report.session_expired());
    assert_eq!(report.summary().pending, 3);
}

#[test]
fn api_errors_are_row_local() {
    let config = config();
    let scorer = ScriptedScorer::new(vec![
        Err(ClientError::Api {
            status: 500,
            detail: Some("model crashed".to_string()),
        }),
        Ok(prediction(0)),
    ]);
    let records = vec![applicant("A", "700"), applicant("B", "710")];

    let report = BatchOrchestrator::new(&scorer, &config)
        .run(&records)
        .expect("batch runs");

    assert_eq!(scorer.calls.get(), 2);
    assert_eq!(report.rows[0].state(), RowState::ApiErrored);
    assert_eq!(report.rows[1].state(), RowState::Scored);
    assert!(scorer.authenticated.get());
}

#[test]
fn no_session_means_no_rows_and_no_calls() {
    let config = config();
    let scorer = ScriptedScorer::logged_out();
    let records = vec![applicant("A", "700")];

    let err = BatchOrchestrator::new(&scorer, &config)
        .run(&records)
        .expect_err("must require auth");

    assert!(matches!(err, ClientError::Unauthenticated));
    assert_eq!(scorer.calls.get(), 0);
}

#[test]
fn rows_are_scored_lazily_in_input_order() {
    let config = config();
    let scorer = ScriptedScorer::new(Vec::new());
    let records = vec![
        applicant("A", "700"),
        applicant("B", "720"),
        applicant("C", "740"),
    ];
    let orchestrator = BatchOrchestrator::new(&scorer, &config);
    let mut run = orchestrator.start(&records).expect("start");

    assert_eq!(run.len(), 3);
    let first = run.next().expect("first row");
    assert_eq!(first.index, 1);
    assert_eq!(first.display_name, "A");
    assert_eq!(scorer.calls.get(), 1);
    drop(run);
    assert_eq!(scorer.calls.get(), 1);

    assert_eq!(scorer.seen.borrow()[0], vectorize(&config, &records[0]));
}

#[test]
fn identity_falls_back_to_record_number() {
    let config = config();
    let scorer = ScriptedScorer::new(Vec::new());
    let mut unnamed = applicant("", "700");
    unnamed.insert("Full Name", RawValue::Missing);
    let records = vec![unnamed, applicant("B", "700")];

    let report = BatchOrchestrator::new(&scorer, &config)
        .with_identity(IdentityExtractor::default())
        .run(&records)
        .expect("batch runs");

    assert_eq!(report.rows[0].display_name, "Record #1");
    assert_eq!(report.rows[1].display_name, "B");
    assert_eq!(report.rows[0].income.as_deref(), Some("52000"));
}

#[test]
fn single_record_runs_form_rules_first() {
    let config = config();
    let scorer = ScriptedScorer::new(Vec::new());
    let mut record = applicant("A", "700");
    record.insert("person_age", "70");

    let err = score_single(&scorer, &config, &record, SingleOptions::default())
        .expect_err("age out of range");

    match err {
        CoreError::Validation { issues } => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].field.name(), "person_age");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(scorer.calls.get(), 0);
}

#[test]
fn single_record_derives_loan_percent() {
    let config = config();
    let scorer = ScriptedScorer::new(vec![Ok(prediction(1))]);
    let mut record = applicant("A", "700");
    record.insert("loan_percent_income", "");

    let options = SingleOptions {
        derive_loan_percent: true,
    };
    let scored = score_single(&scorer, &config, &record, options).expect("scored");

    assert_eq!(scored.derived_loan_percent, Some(0.192));
    assert_eq!(scored.result.label, RiskLabel::LowRisk);
    assert_eq!(scorer.calls.get(), 1);
}

#[test]
fn single_record_surfaces_api_errors_and_expiry() {
    let config = config();
    let scorer = ScriptedScorer::new(vec![
        Err(ClientError::Api {
            status: 400,
            detail: Some("Credit score must be between 300 and 850".to_string()),
        }),
        Err(ClientError::AuthExpired),
    ]);
    let record = applicant("A", "700");

    let err = score_single(&scorer, &config, &record, SingleOptions::default())
        .expect_err("api error");
    assert!(matches!(err, CoreError::Client(ClientError::Api { status: 400, .. })));
    assert!(scorer.authenticated.get());

    let err = score_single(&scorer, &config, &record, SingleOptions::default())
        .expect_err("expired");
    assert!(err.needs_login());
    assert!(!scorer.authenticated.get());
}
