//! Integration tests for the prediction cycle

use async_trait::async_trait;
use round_predictor::cycle::{CycleOutcome, PredictionSession, SessionSnapshot};
use round_predictor::ledger::{Digit, Direction, GradingStatus, Period};
use round_predictor::render::RenderSink;
use round_predictor::source::{FetchError, ObservedRound, ResultSource};
use round_predictor::stats::Stats;
use rust_decimal_macros::dec;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// Scripted source: each call pops the next step
#[derive(Clone, Default)]
struct ScriptedSource {
    steps: Arc<Mutex<VecDeque<Step>>>,
}

#[derive(Clone, Copy)]
enum Step {
    Round(u64, u8),
    Fail,
}

impl ScriptedSource {
    fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into_iter().collect())),
        }
    }

    fn push(&self, step: Step) {
        self.steps.lock().unwrap().push_back(step);
    }
}

#[async_trait]
impl ResultSource for ScriptedSource {
    async fn fetch_latest_round(&self) -> Result<ObservedRound, FetchError> {
        match self.steps.lock().unwrap().pop_front() {
            Some(Step::Round(period, outcome)) => Ok(ObservedRound {
                period: Period::new(period),
                outcome: Digit::new(outcome).unwrap(),
            }),
            Some(Step::Fail) | None => Err(FetchError::HttpStatus(503)),
        }
    }
}

/// Sink that keeps what it was shown
#[derive(Clone, Default)]
struct RecordingSink {
    frames: Arc<Mutex<Vec<(Option<Period>, Option<Direction>, usize, Stats)>>>,
}

impl RenderSink for RecordingSink {
    fn render(&self, snapshot: &SessionSnapshot<'_>) {
        self.frames.lock().unwrap().push((
            snapshot.next_period,
            snapshot.prediction,
            snapshot.history.len(),
            snapshot.stats,
        ));
    }
}

fn rounds(session: &PredictionSession<ScriptedSource>) -> Vec<(u64, Direction, GradingStatus)> {
    session
        .ledger()
        .iter()
        .map(|r| (r.period.value(), r.predicted, r.status))
        .collect()
}

#[tokio::test]
async fn test_duplicate_poll_is_idempotent() {
    let source = ScriptedSource::new([Step::Round(500, 7), Step::Round(500, 7)]);
    let mut session = PredictionSession::new(source);

    assert!(session.run_cycle().await.is_advanced());
    let ledger_before = rounds(&session);
    let stats_before = session.stats();
    let sync_before = *session.sync_state();

    let outcome = session.run_cycle().await;
    assert!(matches!(outcome, CycleOutcome::Duplicate(_)));
    assert_eq!(rounds(&session), ledger_before);
    assert_eq!(session.stats(), stats_before);
    assert_eq!(*session.sync_state(), sync_before);
}

#[tokio::test]
async fn test_grade_before_predict() {
    let source = ScriptedSource::new([Step::Round(500, 1)]);
    let mut session = PredictionSession::new(source.clone());
    session.run_cycle().await;

    // Pending round for 501 predicted SMALL; 501 closes on 3 (SMALL)
    let pending = session.ledger().head().unwrap().clone();
    assert_eq!(pending.period, Period::new(501));
    assert_eq!(pending.status, GradingStatus::Pending);

    source.push(Step::Round(501, 3));
    let CycleOutcome::Advanced(report) = session.run_cycle().await else {
        panic!("expected advance");
    };

    let graded = session.ledger().get(Period::new(501)).unwrap();
    let expected = if pending.predicted == Direction::Small {
        GradingStatus::Win
    } else {
        GradingStatus::Loss
    };
    assert_eq!(graded.status, expected);
    assert_eq!(graded.outcome, Some(Digit::new(3).unwrap()));

    assert_eq!(report.next_period, Period::new(502));
    let head = session.ledger().head().unwrap();
    assert_eq!(head.period, Period::new(502));
    assert_eq!(head.status, GradingStatus::Pending);
}

#[tokio::test]
async fn test_predictions_follow_majority() {
    // Outcomes for 101..=103: 7, 2, 8 -> BIG majority for 104
    let source = ScriptedSource::new([
        Step::Round(100, 0),
        Step::Round(101, 7),
        Step::Round(102, 2),
        Step::Round(103, 8),
    ]);
    let mut session = PredictionSession::new(source);
    let mut last = None;
    for _ in 0..4 {
        last = Some(session.run_cycle().await);
    }

    let Some(CycleOutcome::Advanced(report)) = last else {
        panic!("expected advance");
    };
    assert_eq!(report.next_period, Period::new(104));
    assert_eq!(report.prediction, Direction::Big);
}

#[tokio::test]
async fn test_accuracy_three_wins_one_loss() {
    // Empty history -> SMALL for 11. Each later prediction follows the
    // majority of graded outcomes so far.
    let source = ScriptedSource::new([
        Step::Round(10, 0),
        Step::Round(11, 1), // predicted SMALL -> WIN; majority SMALL
        Step::Round(12, 2), // predicted SMALL -> WIN; majority SMALL
        Step::Round(13, 3), // predicted SMALL -> WIN; majority SMALL
        Step::Round(14, 9), // predicted SMALL -> LOSS
    ]);
    let mut session = PredictionSession::new(source);

    assert_eq!(session.stats().accuracy, dec!(0));
    for _ in 0..5 {
        session.run_cycle().await;
    }

    let stats = session.stats();
    assert_eq!(stats.wins, 3);
    assert_eq!(stats.losses, 1);
    assert_eq!(stats.accuracy, dec!(75.00));
}

#[tokio::test]
async fn test_unique_periods_over_many_cycles() {
    let source = ScriptedSource::new((0..200u64).map(|i| Step::Round(20_250_321_100_010_000 + i, (i * 7 % 10) as u8)));
    let mut session = PredictionSession::new(source);

    for _ in 0..200 {
        assert!(session.run_cycle().await.is_advanced());
    }

    let periods: Vec<Period> = session.ledger().iter().map(|r| r.period).collect();
    let unique: HashSet<Period> = periods.iter().copied().collect();
    assert_eq!(periods.len(), 200);
    assert_eq!(unique.len(), periods.len());
    // At most one round is still pending: the newest prediction
    assert_eq!(session.ledger().pending().count(), 1);
}

#[tokio::test]
async fn test_fetch_failure_is_isolated() {
    let source = ScriptedSource::new([Step::Round(1, 5), Step::Round(2, 6), Step::Fail]);
    let mut session = PredictionSession::new(source);
    session.run_cycle().await;
    session.run_cycle().await;

    let len_before = session.ledger().len();
    let stats_before = session.stats();

    let outcome = session.run_cycle().await;
    assert!(matches!(outcome, CycleOutcome::FetchFailed(_)));
    assert_eq!(session.ledger().len(), len_before);
    assert_eq!(session.stats(), stats_before);
}

#[tokio::test]
async fn test_recovers_after_failure() {
    let source = ScriptedSource::new([Step::Round(1, 5), Step::Fail, Step::Round(2, 6)]);
    let mut session = PredictionSession::new(source);

    session.run_cycle().await;
    session.run_cycle().await;
    let CycleOutcome::Advanced(report) = session.run_cycle().await else {
        panic!("expected advance after failure");
    };
    assert_eq!(report.graded.map(|(p, _)| p), Some(Period::new(2)));
}

#[tokio::test]
async fn test_sink_sees_every_advance() {
    let sink = RecordingSink::default();
    let source = ScriptedSource::new([
        Step::Round(1, 8),
        Step::Round(1, 8),
        Step::Fail,
        Step::Round(2, 9),
    ]);
    let mut session = PredictionSession::new(source);
    session.add_sink(sink.clone());

    for _ in 0..4 {
        session.run_cycle().await;
    }

    let frames = sink.frames.lock().unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].0, Some(Period::new(2)));
    assert_eq!(frames[0].1, Some(Direction::Small));
    assert_eq!(frames[1].0, Some(Period::new(3)));
    // 2 closed on 9: SMALL prediction lost, history now BIG
    assert_eq!(frames[1].1, Some(Direction::Big));
    assert_eq!(frames[1].2, 2);
    assert_eq!(frames[1].3.losses, 1);
}

#[tokio::test]
async fn test_large_periods_keep_precision() {
    let big = 9_007_199_254_740_993u64; // 2^53 + 1
    let source = ScriptedSource::new([Step::Round(big, 4), Step::Round(big + 1, 4)]);
    let mut session = PredictionSession::new(source);

    session.run_cycle().await;
    assert_eq!(session.ledger().head().unwrap().period.value(), big + 1);

    let CycleOutcome::Advanced(report) = session.run_cycle().await else {
        panic!("expected advance");
    };
    assert_eq!(report.graded, Some((Period::new(big + 1), GradingStatus::Win)));
    assert_eq!(report.next_period.value(), big + 2);
}
