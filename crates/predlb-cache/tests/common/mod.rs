#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use predlb_cache::{MokaStore, PredictionCache};
use predlb_core::models::features::{FeatureValue, FeatureVector};
use predlb_core::models::record::{FeatureEntry, ModalityKind, ModalityRecord, RecordData};
use predlb_core::models::session::ExaminationSession;
use predlb_core::models::subject::{Sex, Subject};
use predlb_core::models::user::User;
use predlb_features::config::DataConfig;
use predlb_predictor::ProbabilityPredictor;
use predlb_storage::RecordStore;

const DATA: &str = r#"{
    "modalities": [
        {
            "modality": "acoustic",
            "features": {"jitter": {"type": "numerical"}},
            "predictor_features": ["jitter"]
        },
        {
            "modality": "questionnaire",
            "features": {
                "q1": {"type": "numerical"},
                "q2": {"type": "numerical"},
                "q3": {"type": "numerical"},
                "q4": {"type": "numerical"},
                "q5": {"type": "numerical"}
            },
            "predictor_features": ["q1", "q2", "q3", "q4", "q5"]
        }
    ]
}"#;

/// Predictor double that counts calls and answers from a script.
#[derive(Default)]
pub struct CountingPredictor {
    pub calls: AtomicUsize,
    /// Answers for successive calls; the last one repeats.
    pub answers: Mutex<VecDeque<Option<f64>>>,
    pub seen: Mutex<Vec<FeatureVector>>,
    /// Runs once, inside the next prediction, before it answers.
    pub during_predict: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl CountingPredictor {
    pub fn answering(answers: &[Option<f64>]) -> Arc<Self> {
        let predictor = Self::default();
        predictor.answers.lock().unwrap().extend(answers);
        Arc::new(predictor)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn during_next_predict(&self, work: impl FnOnce() + Send + 'static) {
        *self.during_predict.lock().unwrap() = Some(Box::new(work));
    }
}

impl ProbabilityPredictor for CountingPredictor {
    fn predict_probability(&self, _user: &mut User, features: &FeatureVector, _model: &str) -> Option<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(features.clone());
        let work = self.during_predict.lock().unwrap().take();
        if let Some(work) = work {
            work();
        }
        let mut answers = self.answers.lock().unwrap();
        if answers.len() > 1 {
            answers.pop_front().flatten()
        } else {
            answers.front().copied().flatten()
        }
    }
}

pub struct Fixture {
    pub store: Arc<RecordStore>,
    pub predictor: Arc<CountingPredictor>,
    pub cache: Arc<PredictionCache>,
    pub user: User,
}

impl Fixture {
    pub fn new(answers: &[Option<f64>]) -> Self {
        Self::with_ttl(answers, Duration::from_secs(3600))
    }

    pub fn with_ttl(answers: &[Option<f64>], ttl: Duration) -> Self {
        let store = Arc::new(RecordStore::in_memory());
        let predictor = CountingPredictor::answering(answers);
        let data = Arc::new(DataConfig::from_json(DATA).unwrap());
        let cache = Arc::new(PredictionCache::new(
            store.clone(),
            Arc::new(MokaStore::new(1_000)),
            predictor.clone(),
            data,
            "lbd",
            ttl,
        ));
        store
            .create_subject(&Subject::new("P001", 70, Sex::Female).unwrap())
            .unwrap();
        Self {
            store,
            predictor,
            cache,
            user: User::new("clinician", None),
        }
    }

    pub fn session(&self) -> ExaminationSession {
        self.store.create_session("P001", None, None).unwrap()
    }

    pub fn acoustic(&self, session: &ExaminationSession, jitter: f64) -> ModalityRecord {
        let record = ModalityRecord::new(
            session.id,
            ModalityKind::Acoustic,
            RecordData::FeatureTable {
                features: vec![FeatureEntry {
                    label: "jitter".into(),
                    value: Some(FeatureValue::Number(jitter)),
                }],
            },
        );
        self.store.save_record(&record).unwrap();
        record
    }
}
