use std::path::Path;
use std::sync::Mutex;

use tch::{CModule, Device, Kind, Tensor};

use super::{FEATURE_COUNT, ModelError, TabularFeatures, TabularModel};

/// TorchScript regressor taking a `[1, 11]` float tensor.
pub struct TorchModel {
    model: Mutex<CModule>,
    device: Device,
}

impl TorchModel {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let device = Device::cuda_if_available();
        let model = CModule::load_on_device(path, device).map_err(|e| ModelError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        log::info!("Loaded TorchScript model from {} on {:?}", path.display(), device);
        Ok(Self {
            model: Mutex::new(model),
            device,
        })
    }
}

impl TabularModel for TorchModel {
    fn predict(&self, features: &TabularFeatures) -> Result<i32, ModelError> {
        let values: Vec<f32> = features.values().iter().map(|v| *v as f32).collect();
        let input = Tensor::from_slice(&values)
            .view([1, FEATURE_COUNT as i64])
            .to_device(self.device);

        let output = self
            .model
            .lock()
            .map_err(|_| ModelError::Unavailable("model lock poisoned".to_string()))?
            .forward_ts(&[input])
            .map_err(|e| ModelError::Unavailable(e.to_string()))?;

        let quality = output
            .to_kind(Kind::Float)
            .view([-1])
            .f_double_value(&[0])
            .map_err(|e| ModelError::Unavailable(e.to_string()))?;

        if !quality.is_finite() {
            return Err(ModelError::NonFinite);
        }
        Ok(quality as i32)
    }
}
