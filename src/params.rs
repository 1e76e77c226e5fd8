use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// The four atmospheric controls, each normalized to [0,1] — exposed as UI
/// sliders in the frontend. Values are stored exactly as the UI sent them;
/// the sky model clamps before mapping to physical quantities.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkyParams {
    pub turbidity: f32,
    pub sun_elevation: f32,
    pub upper_atmosphere_scattering: f32,
    pub ground_albedo: f32,
}

impl Default for SkyParams {
    /// Initial slider positions of the demo.
    fn default() -> Self {
        Self {
            turbidity: 0.75,
            sun_elevation: 0.5,
            upper_atmosphere_scattering: 0.15,
            ground_albedo: 0.85,
        }
    }
}

/// Partial update from the frontend: only fields that are present overwrite
/// the live values.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct ParamsUpdate {
    pub turbidity: Option<f32>,
    pub sun_elevation: Option<f32>,
    pub upper_atmosphere_scattering: Option<f32>,
    pub ground_albedo: Option<f32>,
}

/// Live slider values, shared between the HTTP layer (writes) and the
/// regeneration scheduler (reads). A job samples these at the moment it
/// starts, never a copy cached at schedule time.
#[derive(Debug, Default)]
pub struct LiveParams {
    inner: Mutex<SkyParams>,
}

impl LiveParams {
    pub fn new(initial: SkyParams) -> Self {
        Self {
            inner: Mutex::new(initial),
        }
    }

    /// The current values at this instant.
    pub fn snapshot(&self) -> SkyParams {
        *self.inner.lock().unwrap()
    }

    /// Overlay the provided fields onto the live values.
    pub fn apply(&self, update: ParamsUpdate) {
        let mut p = self.inner.lock().unwrap();
        if let Some(v) = update.turbidity {
            p.turbidity = v;
        }
        if let Some(v) = update.sun_elevation {
            p.sun_elevation = v;
        }
        if let Some(v) = update.upper_atmosphere_scattering {
            p.upper_atmosphere_scattering = v;
        }
        if let Some(v) = update.ground_albedo {
            p.ground_albedo = v;
        }
    }
}
