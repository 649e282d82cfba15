//! Camera monitoring: a master switch gating per-camera toggles.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    pub id: String,
    pub label: String,
    pub source: u32,
    pub recognition_enabled: bool,
}

impl Camera {
    fn new(id: &str, label: &str, source: u32, recognition_enabled: bool) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            source,
            recognition_enabled,
        }
    }
}

pub fn mock_cameras() -> Vec<Camera> {
    vec![
        Camera::new("door", "Puerta Principal", 0, true),
        Camera::new("living", "Sala de Estar", 1, false),
        Camera::new("kitchen", "Cocina", 2, false),
    ]
}

#[derive(Debug, Clone)]
pub struct SecurityPanel {
    cameras: Vec<Camera>,
    /// Parallel to `cameras`
    active: Vec<bool>,
    system_on: bool,
}

impl SecurityPanel {
    pub fn new(cameras: Vec<Camera>) -> Self {
        let active = vec![false; cameras.len()];
        Self {
            cameras,
            active,
            system_on: false,
        }
    }

    pub fn with_mock_data() -> Self {
        Self::new(mock_cameras())
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn system_on(&self) -> bool {
        self.system_on
    }

    /// Switching off deactivates every camera
    pub fn set_system(&mut self, on: bool) {
        self.system_on = on;
        if !on {
            self.active.iter_mut().for_each(|a| *a = false);
        }
        tracing::info!("Security system {}", if on { "armed" } else { "disarmed" });
    }

    /// Flip one camera. Ignored while the system is off or for unknown ids.
    pub fn toggle_camera(&mut self, id: &str) -> bool {
        if !self.system_on {
            return false;
        }
        match self.cameras.iter().position(|c| c.id == id) {
            Some(i) => {
                self.active[i] = !self.active[i];
                true
            }
            None => false,
        }
    }

    pub fn is_camera_active(&self, id: &str) -> bool {
        self.system_on
            && self
                .cameras
                .iter()
                .position(|c| c.id == id)
                .is_some_and(|i| self.active[i])
    }

    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|a| **a).count()
    }
}
