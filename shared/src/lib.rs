use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

/// Form field names of the tabular measurements, in the order the model expects them.
pub const TABULAR_FEATURE_NAMES: [&str; 11] = [
    "fixed_acidity",
    "volatile_acidity",
    "citric_acid",
    "residual_sugar",
    "chlorides",
    "free_sulfur_dioxide",
    "total_sulfur_dioxide",
    "density",
    "pH",
    "sulphates",
    "alcohol",
];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString, EnumIter,
)]
pub enum QualityLabel {
    #[serde(rename = "Low Quality")]
    #[strum(serialize = "Low Quality")]
    Low,
    #[serde(rename = "Average Quality")]
    #[strum(serialize = "Average Quality")]
    Average,
    #[serde(rename = "High Quality")]
    #[strum(serialize = "High Quality")]
    High,
}

impl QualityLabel {
    pub fn from_quality(quality: i32) -> Self {
        match quality {
            q if q <= 4 => QualityLabel::Low,
            5..=6 => QualityLabel::Average,
            _ => QualityLabel::High,
        }
    }

    /// Display tag used by the result card.
    pub fn severity(&self) -> &'static str {
        match self {
            QualityLabel::Low => "danger",
            QualityLabel::Average => "warning",
            QualityLabel::High => "success",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString, EnumIter,
)]
pub enum PredictionMode {
    #[serde(rename = "Data Only")]
    #[strum(serialize = "Data Only")]
    DataOnly,
    #[serde(rename = "Image Only")]
    #[strum(serialize = "Image Only")]
    ImageOnly,
    #[serde(rename = "Data + Image")]
    #[strum(serialize = "Data + Image")]
    DataAndImage,
}

impl PredictionMode {
    /// Mode implied by which quality sources are present, if any.
    pub fn from_sources(has_data: bool, has_image: bool) -> Option<Self> {
        match (has_data, has_image) {
            (true, true) => Some(PredictionMode::DataAndImage),
            (true, false) => Some(PredictionMode::DataOnly),
            (false, true) => Some(PredictionMode::ImageOnly),
            (false, false) => None,
        }
    }

    /// Fixed display confidence, in percent.
    pub fn confidence(&self) -> u8 {
        match self {
            PredictionMode::DataOnly => 90,
            PredictionMode::ImageOnly => 70,
            PredictionMode::DataAndImage => 85,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionResult {
    pub final_quality: i32,
    pub label: QualityLabel,
    pub mode: PredictionMode,
    pub confidence: u8,
    pub data_quality: Option<i32>,
    pub image_quality: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PredictionOutcome {
    Success { id: Uuid, result: PredictionResult },
    Error { message: String },
}

impl PredictionOutcome {
    pub fn success(result: PredictionResult) -> Self {
        PredictionOutcome::Success {
            id: Uuid::new_v4(),
            result,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        PredictionOutcome::Error {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyticsSnapshot {
    pub total: u64,
    #[serde(rename = "Low Quality")]
    pub low_quality: u64,
    #[serde(rename = "Average Quality")]
    pub average_quality: u64,
    #[serde(rename = "High Quality")]
    pub high_quality: u64,
    #[serde(rename = "Data Only")]
    pub data_only: u64,
    #[serde(rename = "Image Only")]
    pub image_only: u64,
    #[serde(rename = "Data + Image")]
    pub data_and_image: u64,
}

impl AnalyticsSnapshot {
    pub const KEYS: [&'static str; 7] = [
        "total",
        "Low Quality",
        "Average Quality",
        "High Quality",
        "Data Only",
        "Image Only",
        "Data + Image",
    ];

    pub fn get(&self, key: &str) -> Option<u64> {
        match key {
            "total" => Some(self.total),
            "Low Quality" => Some(self.low_quality),
            "Average Quality" => Some(self.average_quality),
            "High Quality" => Some(self.high_quality),
            "Data Only" => Some(self.data_only),
            "Image Only" => Some(self.image_only),
            "Data + Image" => Some(self.data_and_image),
            _ => None,
        }
    }
}
