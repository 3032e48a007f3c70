use crate::model::{FeatureError, ModelError};

const INTERNAL_FAILURE_MESSAGE: &str = "Prediction failed. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("Uploaded image is not a valid beverage image.")]
    InvalidImage,
    #[error("Please enter data or upload an image.")]
    MissingInput,
    #[error("Invalid value for {}.", .0.field)]
    InvalidFeature(#[from] FeatureError),
    #[error("Uploaded file exceeds the {limit} byte limit.")]
    UploadTooLarge { limit: usize },
    #[error("Malformed form submission: {0}")]
    Form(String),
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
    #[error("Worker error: {0}")]
    Worker(String),
}

impl PredictionError {
    /// Failures caused by the service rather than the submitted input.
    pub fn is_internal(&self) -> bool {
        matches!(self, PredictionError::Model(_) | PredictionError::Worker(_))
    }

    /// Text safe to show to the submitter. Internal failures are reduced to a
    /// generic message; the details belong in the log.
    pub fn user_message(&self) -> String {
        match self {
            PredictionError::Model(_) | PredictionError::Worker(_) => INTERNAL_FAILURE_MESSAGE.to_string(),
            PredictionError::Form(_) => "The submitted form could not be read.".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_messages_are_exact() {
        assert_eq!(
            PredictionError::InvalidImage.user_message(),
            "Uploaded image is not a valid beverage image."
        );
        assert_eq!(
            PredictionError::MissingInput.user_message(),
            "Please enter data or upload an image."
        );
        assert_eq!(
            PredictionError::from(FeatureError { field: "alcohol" }).user_message(),
            "Invalid value for alcohol."
        );
    }

    #[test]
    fn internal_details_stay_out_of_user_message() {
        let err = PredictionError::from(ModelError::Unavailable("libtorch missing".to_string()));
        assert!(err.is_internal());
        assert!(!err.user_message().contains("libtorch"));
        assert!(err.to_string().contains("libtorch"));
    }
}
