use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use super::{AnalysisError, AnalysisSession, Phase, SessionTiming};
use crate::models::{PredictionResponse, RiskLabel};
use crate::predict::{PredictionRequest, PredictionService};


const SETTLE: Duration = Duration::from_millis(3_500);

/// Answers from a queue of scripted outcomes and records every request.
#[derive(Default)]
struct ScriptedService {
    outcomes: Mutex<VecDeque<Result<PredictionResponse, AnalysisError>>>,
    requests: Mutex<Vec<PredictionRequest>>,
}

impl ScriptedService {
    fn new(outcomes: Vec<Result<PredictionResponse, AnalysisError>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn wait_for_calls(&self, expected: usize) {
        let started = Instant::now();
        while self.calls() < expected {
            assert!(
                started.elapsed() < Duration::from_secs(2),
                "service was not called {expected} times"
            );
            thread::sleep(Duration::from_millis(2));
        }
        // Give the worker a moment to hand the outcome over.
        thread::sleep(Duration::from_millis(20));
    }
}

impl PredictionService for ScriptedService {
    fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, AnalysisError> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AnalysisError::Transport("no scripted outcome".to_string())))
    }
}

/// Blocks every request until the test releases it.
struct GatedService {
    release: Mutex<Receiver<Result<PredictionResponse, AnalysisError>>>,
    requests: Mutex<Vec<PredictionRequest>>,
}

impl GatedService {
    fn new() -> (Arc<Self>, Sender<Result<PredictionResponse, AnalysisError>>) {
        let (tx, rx) = mpsc::channel();
        let service = Arc::new(Self {
            release: Mutex::new(rx),
            requests: Mutex::new(Vec::new()),
        });
        (service, tx)
    }

    fn requests(&self) -> Vec<PredictionRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn wait_for_request(&self) {
        let started = Instant::now();
        while self.requests.lock().unwrap().is_empty() {
            assert!(started.elapsed() < Duration::from_secs(2), "no request arrived");
            thread::sleep(Duration::from_millis(2));
        }
    }
}

impl PredictionService for GatedService {
    fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, AnalysisError> {
        self.requests.lock().unwrap().push(request.clone());
        self.release
            .lock()
            .unwrap()
            .recv()
            .unwrap_or_else(|_| Err(AnalysisError::Transport("gate dropped".to_string())))
    }
}

fn high_risk(probability: f64) -> PredictionResponse {
    PredictionResponse {
        probability,
        label: RiskLabel::HighRisk,
        logit_score: None,
    }
}

fn low_risk(probability: f64) -> PredictionResponse {
    PredictionResponse {
        probability,
        label: RiskLabel::LowRisk,
        logit_score: None,
    }
}

fn timing(response_timeout: Option<Duration>) -> SessionTiming {
    SessionTiming {
        settle_delay: SETTLE,
        response_timeout,
    }
}

fn session_with(service: Arc<dyn PredictionService>, note: &str) -> AnalysisSession {
    crate::logging::init_test_tracing();
    let mut session = AnalysisSession::new(service, timing(Some(Duration::from_secs(30))));
    session.set_note_text(note);
    session
}

/// Tick at `at` until the phase changes or `budget` of real time passes.
fn tick_until(session: &mut AnalysisSession, at: Instant, budget: Duration) -> bool {
    let started = Instant::now();
    loop {
        if session.tick(at) {
            return true;
        }
        if started.elapsed() >= budget {
            return false;
        }
        thread::sleep(Duration::from_millis(2));
    }
}

fn settle(session: &mut AnalysisSession, submitted_at: Instant) -> Phase {
    assert!(
        tick_until(session, submitted_at + SETTLE, Duration::from_secs(2)),
        "session never left Processing"
    );
    session.phase()
}
