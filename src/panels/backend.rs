//! Mock backend standing in for device, notification and archive services.
//!
//! Every call waits a fixed latency and then succeeds, unless the target id
//! has been marked to fail. Failure marking exists for tests and for demoing
//! the rollback paths.

use std::cell::RefCell;
use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::devices::{DeviceId, DeviceStatus};
use super::notifications::{mock_notifications, Notification, NotificationId};
use crate::timer;

/// Default simulated round trip
pub const MOCK_LATENCY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("simulated failure updating device {0}")]
    DeviceUpdate(DeviceId),
    #[error("simulated failure fetching notifications")]
    Fetch,
}

/// Remote side of the device panel
#[async_trait(?Send)]
pub trait DeviceBackend {
    async fn update_device(&self, id: DeviceId, status: DeviceStatus) -> Result<(), BackendError>;
}

/// Remote side of the notification tray
#[async_trait(?Send)]
pub trait NotificationBackend {
    async fn fetch_notifications(&self) -> Result<Vec<Notification>, BackendError>;
    /// Mark a notification archived. `false` means the call did not succeed.
    async fn archive(&self, id: NotificationId) -> bool;
}

#[derive(Debug)]
pub struct MockBackend {
    latency: Duration,
    failing_devices: RefCell<HashSet<DeviceId>>,
    failing_archives: RefCell<HashSet<NotificationId>>,
    fail_fetch: RefCell<bool>,
}

impl MockBackend {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            failing_devices: RefCell::default(),
            failing_archives: RefCell::default(),
            fail_fetch: RefCell::new(false),
        }
    }

    /// Zero-latency backend for tests
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn fail_device(&self, id: DeviceId) {
        self.failing_devices.borrow_mut().insert(id);
    }

    pub fn fail_archive(&self, id: NotificationId) {
        self.failing_archives.borrow_mut().insert(id);
    }

    pub fn fail_fetch(&self, fail: bool) {
        *self.fail_fetch.borrow_mut() = fail;
    }

    /// Clear every failure mark
    pub fn heal(&self) {
        self.failing_devices.borrow_mut().clear();
        self.failing_archives.borrow_mut().clear();
        *self.fail_fetch.borrow_mut() = false;
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new(MOCK_LATENCY)
    }
}

#[async_trait(?Send)]
impl DeviceBackend for MockBackend {
    async fn update_device(&self, id: DeviceId, status: DeviceStatus) -> Result<(), BackendError> {
        timer::sleep(self.latency).await;
        if self.failing_devices.borrow().contains(&id) {
            return Err(BackendError::DeviceUpdate(id));
        }
        tracing::debug!("Device {} set to {}", id, status.as_str());
        Ok(())
    }
}

#[async_trait(?Send)]
impl NotificationBackend for MockBackend {
    async fn fetch_notifications(&self) -> Result<Vec<Notification>, BackendError> {
        timer::sleep(self.latency).await;
        if *self.fail_fetch.borrow() {
            return Err(BackendError::Fetch);
        }
        Ok(mock_notifications())
    }

    async fn archive(&self, id: NotificationId) -> bool {
        timer::sleep(self.latency).await;
        !self.failing_archives.borrow().contains(&id)
    }
}
