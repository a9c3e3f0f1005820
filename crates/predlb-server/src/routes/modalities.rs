use axum::Json;
use axum::extract::State;
use serde::Serialize;

use predlb_core::models::record::ModalityKind;
use predlb_features::config::FeatureType;
use predlb_features::get_modality;

use crate::state::AppState;

#[derive(Serialize)]
pub struct FeatureSummary {
    label: String,
    title: String,
    #[serde(flatten)]
    kind: FeatureType,
    predictor: bool,
}

#[derive(Serialize)]
pub struct ModalitySummary {
    modality: ModalityKind,
    name: String,
    features: Vec<FeatureSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    questions: Vec<String>,
}

/// Configured modalities, in the order their features feed the model.
pub async fn list_modalities(State(state): State<AppState>) -> Json<Vec<ModalitySummary>> {
    let data = &state.data;
    let modalities = data
        .modalities
        .iter()
        .map(|config| {
            let modality = get_modality(config.modality);
            let features = modality
                .feature_names(config)
                .into_iter()
                .filter_map(|label| {
                    let spec = data.feature_spec(label)?;
                    Some(FeatureSummary {
                        label: label.to_string(),
                        title: data.feature_title(label).to_string(),
                        kind: spec.kind.clone(),
                        predictor: config.block.predictor_features.iter().any(|p| p == label),
                    })
                })
                .collect();
            ModalitySummary {
                modality: config.modality,
                name: modality.name().to_string(),
                features,
                questions: config.questions().into_iter().map(str::to_string).collect(),
            }
        })
        .collect();
    Json(modalities)
}
