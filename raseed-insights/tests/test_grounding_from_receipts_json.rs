use chrono::NaiveDate;
use raseed_core::{filter_by_window, TimeExpressionKind, Window};
use raseed_ingest::parse_receipts_json;
use raseed_insights::{
    answer_grounded, ground_question, AnsweringCollaborator, DashboardSnapshot, GroundedContext,
    Grounding, Interpretation, QuestionInterpreter,
};

const RECEIPTS: &str = r#"[
  {"date": "2025-05-03", "storeName": "Grocer", "total": 42.10, "currency": "USD",
   "items": [{"name": "bread", "amount": 4.10, "category": "grocery"},
             {"name": "coffee", "amount": 38.00, "category": "grocery"}]},
  {"date": "2025-05-21", "storeName": "Sports Shop", "total": 60.00, "currency": "USD",
   "items": [{"name": "ball", "amount": 60.00, "category": "sports"}]},
  {"date": "2025-05-40", "storeName": "Smudged", "total": 5.00, "items": []}
]"#;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Panics if called: the grounding gate must answer empty periods by itself.
struct MustNotBeCalled;

impl AnsweringCollaborator for MustNotBeCalled {
    fn answer(&self, _context: &GroundedContext) -> anyhow::Result<String> {
        panic!("collaborator called for a period without data");
    }
}

/// Echoes which stores it was shown, so tests can see exactly what leaked through.
struct StoreEcho;

impl AnsweringCollaborator for StoreEcho {
    fn answer(&self, context: &GroundedContext) -> anyhow::Result<String> {
        let stores: Vec<_> = context.receipts.iter().map(|r| r.store_name.as_str()).collect();
        Ok(stores.join(","))
    }
}

/// May-only data, "last month" asked in July: explicit absence, May never mentioned.
#[test]
fn test_last_month_absence_from_may_only_data() {
    let report = parse_receipts_json(RECEIPTS).unwrap();
    assert_eq!(report.receipts.len(), 2);
    assert_eq!(report.skipped_count(), 1);

    let interpreter = QuestionInterpreter::new().unwrap();
    let question = "How much did I spend last month?";
    let Interpretation::Kind(kind) = interpreter.interpret(question) else {
        panic!("question should be interpretable");
    };
    assert_eq!(kind, TimeExpressionKind::LastMonth);

    let grounding = ground_question(question, kind, &report.receipts, d(2025, 7, 15), 100).unwrap();
    assert!(matches!(grounding, Grounding::NoData { .. }));

    let answer = answer_grounded(&MustNotBeCalled, &grounding).unwrap();
    assert!(answer.contains("last month"));
    assert!(!answer.contains("May"));
    assert!(!answer.contains("60"));
}

/// The same data asked about with no period is never reported as absent.
#[test]
fn test_unbounded_question_sees_all_receipts() {
    let report = parse_receipts_json(RECEIPTS).unwrap();
    let interpreter = QuestionInterpreter::new().unwrap();
    let question = "What is my biggest spending category?";
    assert_eq!(interpreter.interpret(question), Interpretation::Kind(TimeExpressionKind::Unbounded));

    let unfiltered = filter_by_window(&report.receipts, Window::Unbounded);
    assert_eq!(unfiltered.matched, report.receipts);
    assert!(!unfiltered.is_empty);

    let grounding = ground_question(question, TimeExpressionKind::Unbounded, &report.receipts, d(2025, 7, 15), 100).unwrap();
    let answer = answer_grounded(&StoreEcho, &grounding).unwrap();
    assert_eq!(answer, "Sports Shop,Grocer");
}

/// Dashboard over the same file in late May: totals per receipt, categories per item.
#[test]
fn test_dashboard_from_ingested_receipts() {
    let report = parse_receipts_json(RECEIPTS).unwrap();
    let snap = DashboardSnapshot::build(&report.receipts, d(2025, 5, 31), 3).unwrap();

    assert!((snap.total_this_month() - 102.10).abs() < 1e-9);
    let names: Vec<_> = snap.this_month.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["sports", "grocery"]);

    let labels: Vec<_> = snap.rolling.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Mar 2025", "Apr 2025", "May 2025"]);
    assert_eq!(snap.rolling.points[0].total, 0.0);
    // Ingestion already dropped the smudged receipt
    assert_eq!(snap.skipped(), 0);
}

/// Questions about periods the resolver cannot express never fall back to
/// the whole receipt set.
#[test]
fn test_unmappable_periods_are_not_widened_to_all_receipts() {
    let interpreter = QuestionInterpreter::new().unwrap();
    for question in [
        "How much did I spend in the last two weeks?",
        "What did I spend in May?",
        "groceries in Jan",
        "my 2024 spending",
        "spending over the past few months",
    ] {
        assert!(
            matches!(interpreter.interpret(question), Interpretation::Unsupported(_)),
            "{question} should not be interpreted as a period"
        );
    }
}
