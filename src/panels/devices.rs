//! Device management panel: catalog, filters, energy estimate and the
//! optimistic toggle.
//!
//! Toggling is two-phase. [`DevicePanel::begin_toggle`] flips the device
//! immediately and hands back a [`PendingToggle`] holding the value it
//! replaced; once the backend answers, [`DevicePanel::finish_toggle`] either
//! commits or puts the captured value back.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::backend::{BackendError, DeviceBackend};
use super::PanelError;

pub type DeviceId = u32;

/// Price used for cost estimates, per kWh
pub const COST_PER_KWH: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Luz,
    Ventilador,
    Clima,
    Puerta,
}

impl DeviceKind {
    pub const ALL: [DeviceKind; 4] = [
        DeviceKind::Luz,
        DeviceKind::Ventilador,
        DeviceKind::Clima,
        DeviceKind::Puerta,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceKind::Luz => "luz",
            DeviceKind::Ventilador => "ventilador",
            DeviceKind::Clima => "clima",
            DeviceKind::Puerta => "puerta",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        DeviceKind::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

/// Status string reported to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceStatus {
    On,
    Off,
    Open,
    Close,
}

impl DeviceStatus {
    /// Status for a device of `kind` that is `on`. Doors open/close.
    pub fn for_state(kind: DeviceKind, on: bool) -> Self {
        match (kind, on) {
            (DeviceKind::Puerta, true) => DeviceStatus::Open,
            (DeviceKind::Puerta, false) => DeviceStatus::Close,
            (_, true) => DeviceStatus::On,
            (_, false) => DeviceStatus::Off,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceStatus::On => "ON",
            DeviceStatus::Off => "OFF",
            DeviceStatus::Open => "OPEN",
            DeviceStatus::Close => "CLOSE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub power: String,
    pub on: bool,
    #[serde(rename = "device_type")]
    pub kind: DeviceKind,
    pub status: DeviceStatus,
    pub last_updated: DateTime<Utc>,
}

impl Device {
    fn new(id: DeviceId, name: &str, power: &str, on: bool, kind: DeviceKind) -> Self {
        Self {
            id,
            name: name.to_string(),
            power: power.to_string(),
            on,
            kind,
            status: DeviceStatus::for_state(kind, on),
            last_updated: Utc::now(),
        }
    }
}

pub fn mock_devices() -> Vec<Device> {
    vec![
        Device::new(1, "Luz Sala", "60W", true, DeviceKind::Luz),
        Device::new(2, "Luz Cocina", "40W", false, DeviceKind::Luz),
        Device::new(3, "Ventilador", "75W", true, DeviceKind::Ventilador),
        Device::new(4, "Aire Acondicionado", "1500W", false, DeviceKind::Clima),
        Device::new(5, "Puerta Principal", "10W", false, DeviceKind::Puerta),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    On,
    Off,
}

impl StatusFilter {
    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "Todos",
            StatusFilter::On => "Encendidos",
            StatusFilter::Off => "Apagados",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "Encendidos" => StatusFilter::On,
            "Apagados" => StatusFilter::Off,
            _ => StatusFilter::All,
        }
    }

    fn accepts(self, device: &Device) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::On => device.on,
            StatusFilter::Off => !device.on,
        }
    }
}

/// A tentatively applied toggle waiting for the backend's answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingToggle {
    pub id: DeviceId,
    /// `on` before the flip, restored on rollback
    pub previous: bool,
    /// Status sent to the backend
    pub requested: DeviceStatus,
}

/// Energy readings and cost projections
#[derive(Debug, Clone, PartialEq)]
pub struct EnergySummary {
    /// Hourly readings in watts, oldest first
    pub history: Vec<u32>,
}

impl EnergySummary {
    /// 24 mock hourly readings between 200 and 699 W
    pub fn mock() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            history: (0..24).map(|_| rng.gen_range(200..700)).collect(),
        }
    }

    /// Latest reading in watts
    pub fn current_usage(&self) -> u32 {
        self.history.last().copied().unwrap_or_default()
    }

    pub fn daily_cost(&self) -> f64 {
        f64::from(self.current_usage()) / 1000.0 * 24.0 * COST_PER_KWH
    }

    pub fn monthly_cost(&self) -> f64 {
        self.daily_cost() * 30.0
    }

    pub fn annual_cost(&self) -> f64 {
        self.monthly_cost() * 12.0
    }
}

#[derive(Debug, Clone)]
pub struct DevicePanel {
    devices: Vec<Device>,
    pub kind_filter: Option<DeviceKind>,
    pub status_filter: StatusFilter,
    pub energy: EnergySummary,
}

impl DevicePanel {
    pub fn new(devices: Vec<Device>, energy: EnergySummary) -> Self {
        Self {
            devices,
            kind_filter: None,
            status_filter: StatusFilter::All,
            energy,
        }
    }

    pub fn with_mock_data() -> Self {
        Self::new(mock_devices(), EnergySummary::mock())
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    /// Devices passing both filters
    pub fn visible(&self) -> Vec<&Device> {
        self.devices
            .iter()
            .filter(|d| self.kind_filter.map_or(true, |k| d.kind == k))
            .filter(|d| self.status_filter.accepts(d))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.devices.iter().filter(|d| d.on).count()
    }

    /// Kinds present in the catalog, for the filter dropdown
    pub fn kinds(&self) -> Vec<DeviceKind> {
        DeviceKind::ALL
            .into_iter()
            .filter(|k| self.devices.iter().any(|d| d.kind == *k))
            .collect()
    }

    /// Phase one: flip `on` and capture what it was
    pub fn begin_toggle(&mut self, id: DeviceId) -> Result<PendingToggle, PanelError> {
        let device = self
            .devices
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(PanelError::UnknownDevice(id))?;

        let previous = device.on;
        device.on = !previous;
        Ok(PendingToggle {
            id,
            previous,
            requested: DeviceStatus::for_state(device.kind, !previous),
        })
    }

    /// Phase two: commit on success, restore the captured value on failure
    pub fn finish_toggle(
        &mut self,
        pending: PendingToggle,
        result: Result<(), BackendError>,
    ) -> Result<(), PanelError> {
        let device = self
            .devices
            .iter_mut()
            .find(|d| d.id == pending.id)
            .ok_or(PanelError::UnknownDevice(pending.id))?;

        match result {
            Ok(()) => {
                device.status = pending.requested;
                device.last_updated = Utc::now();
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Reverting toggle of {}: {}", device.name, e);
                device.on = pending.previous;
                Err(e.into())
            }
        }
    }

    /// Both phases around a backend call
    pub async fn toggle(
        &mut self,
        backend: &dyn DeviceBackend,
        id: DeviceId,
    ) -> Result<(), PanelError> {
        let pending = self.begin_toggle(id)?;
        let result = backend.update_device(id, pending.requested).await;
        self.finish_toggle(pending, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::backend::MockBackend;

    fn fixed_energy() -> EnergySummary {
        EnergySummary {
            history: vec![300, 400, 500],
        }
    }

    fn panel() -> DevicePanel {
        DevicePanel::new(mock_devices(), fixed_energy())
    }

    #[test]
    fn test_filters() {
        let mut panel = panel();
        assert_eq!(panel.visible().len(), 5);

        panel.kind_filter = Some(DeviceKind::Luz);
        assert_eq!(panel.visible().len(), 2);

        panel.status_filter = StatusFilter::On;
        let visible = panel.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Luz Sala");

        panel.kind_filter = None;
        panel.status_filter = StatusFilter::Off;
        assert!(panel.visible().iter().all(|d| !d.on));
    }

    #[test]
    fn test_status_filter_labels_roundtrip() {
        for f in [StatusFilter::All, StatusFilter::On, StatusFilter::Off] {
            assert_eq!(StatusFilter::parse(f.label()), f);
        }
    }

    #[test]
    fn test_energy_costs() {
        let energy = fixed_energy();
        assert_eq!(energy.current_usage(), 500);
        assert!((energy.daily_cost() - 1.8).abs() < 1e-9);
        assert!((energy.monthly_cost() - 54.0).abs() < 1e-9);
        assert!((energy.annual_cost() - 648.0).abs() < 1e-9);
    }

    #[test]
    fn test_mock_energy_range() {
        let energy = EnergySummary::mock();
        assert_eq!(energy.history.len(), 24);
        assert!(energy.history.iter().all(|w| (200..700).contains(w)));
    }

    #[test]
    fn test_door_status_strings() {
        assert_eq!(
            DeviceStatus::for_state(DeviceKind::Puerta, true).as_str(),
            "OPEN"
        );
        assert_eq!(
            DeviceStatus::for_state(DeviceKind::Puerta, false).as_str(),
            "CLOSE"
        );
        assert_eq!(DeviceStatus::for_state(DeviceKind::Luz, true).as_str(), "ON");
    }

    #[test]
    fn test_begin_toggle_unknown_device() {
        let mut panel = panel();
        assert!(matches!(
            panel.begin_toggle(99),
            Err(PanelError::UnknownDevice(99))
        ));
    }

    #[test]
    fn test_begin_toggle_applies_immediately() {
        let mut panel = panel();
        let pending = panel.begin_toggle(2).unwrap();
        assert!(!pending.previous);
        assert_eq!(pending.requested, DeviceStatus::On);
        assert!(panel.device(2).unwrap().on);
    }

    #[tokio::test]
    async fn test_toggle_commits_status() {
        let backend = MockBackend::instant();
        let mut panel = panel();
        panel.toggle(&backend, 5).await.unwrap();
        let door = panel.device(5).unwrap();
        assert!(door.on);
        assert_eq!(door.status, DeviceStatus::Open);
    }

    #[tokio::test]
    async fn test_toggle_rollback_keeps_status() {
        let backend = MockBackend::instant();
        backend.fail_device(1);
        let mut panel = panel();
        let err = panel.toggle(&backend, 1).await.unwrap_err();
        assert!(matches!(err, PanelError::Backend(_)));
        let light = panel.device(1).unwrap();
        assert!(light.on);
        assert_eq!(light.status, DeviceStatus::On);
    }
}
