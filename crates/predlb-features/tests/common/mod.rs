#![allow(dead_code)]

use predlb_features::config::DataConfig;

/// Acoustic jitter plus a five-item questionnaire.
pub const SCENARIO: &str = r#"{
    "modalities": [
        {
            "modality": "acoustic",
            "features": {
                "jitter": {"type": "numerical", "name": "Jitter (local)"},
                "shimmer": {"type": "numerical"}
            },
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
            "predictor_features": ["q1", "q2", "q3", "q4", "q5"],
            "questionnaire": [
                {"id": "q1", "question": "question 1", "options": ["A", "B", "C", "D", "E"]},
                {"id": "q2", "question": "question 2", "options": ["A", "B", "C", "D", "E"]},
                {"id": "q3", "question": "question 3", "options": ["A", "B", "C", "D", "E"]},
                {"id": "q4", "question": "question 4", "options": ["A", "B", "C", "D", "E"]},
                {"id": "q5", "question": "question 5", "options": ["A", "B", "C", "D", "E"]}
            ]
        }
    ]
}"#;

/// Demographics plus typed TCS and handwriting blocks.
pub const TYPED: &str = r#"{
    "subject": {
        "features": {
            "age": {"type": "numerical"},
            "sex": {"type": "nominal", "options": ["M", "F"]}
        },
        "predictor_features": ["age", "sex"]
    },
    "modalities": [
        {
            "modality": "tcs",
            "features": {
                "hyperechogenicity": {"type": "ordinal", "order": ["none", "mild", "marked"]},
                "side": {"type": "nominal", "options": ["left", "right", "both"]}
            },
            "predictor_features": ["hyperechogenicity", "side"]
        },
        {
            "modality": "handwriting",
            "features": {
                "velocity": {"type": "numerical"}
            },
            "predictor_features": ["velocity"]
        }
    ]
}"#;

pub fn scenario() -> DataConfig {
    DataConfig::from_json(SCENARIO).expect("scenario config is valid")
}

pub fn typed() -> DataConfig {
    DataConfig::from_json(TYPED).expect("typed config is valid")
}
