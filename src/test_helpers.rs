//! Shared test utilities for the folio test suite.
//!
//! Provides a fixture site copied into a temp directory, a scripted
//! [`Deliver`] double, and helpers for reading motion events.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let delivery = RecordingDelivery::succeeding().with_delay(Duration::from_secs(2));
//! let form = ContactForm::new(delivery.clone());
//! form.submit(valid_record()).await;
//! assert_eq!(delivery.calls(), 1);
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::delivery::{Deliver, DeliveryError, Receipt};
use crate::director::MotionEvent;
use crate::validate::FormRecord;
use async_trait::async_trait;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Form records
// =========================================================================

/// A record that passes validation.
pub fn valid_record() -> FormRecord {
    FormRecord {
        name: "Jo".into(),
        email: "jo@x.com".into(),
        subject: "Hi".into(),
        message: "Hello".into(),
    }
}

// =========================================================================
// Delivery double
// =========================================================================

#[derive(Default)]
struct Recorded {
    delivered: Vec<FormRecord>,
}

/// Delivery double that records every call and answers with a fixed result
/// after an optional delay. Clones share the same log.
#[derive(Clone)]
pub struct RecordingDelivery {
    result: Result<Receipt, DeliveryError>,
    delay: Duration,
    log: Arc<Mutex<Recorded>>,
}

impl RecordingDelivery {
    pub fn succeeding() -> Self {
        Self {
            result: Ok(Receipt {
                reference: "recorded".into(),
            }),
            delay: Duration::ZERO,
            log: Arc::default(),
        }
    }

    pub fn failing(error: DeliveryError) -> Self {
        Self {
            result: Err(error),
            ..Self::succeeding()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.log.lock().unwrap().delivered.len()
    }

    pub fn delivered(&self) -> Vec<FormRecord> {
        self.log.lock().unwrap().delivered.clone()
    }
}

#[async_trait]
impl Deliver for RecordingDelivery {
    async fn deliver(&self, record: &FormRecord) -> Result<Receipt, DeliveryError> {
        self.log.lock().unwrap().delivered.push(record.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone()
    }
}

// =========================================================================
// Motion events
// =========================================================================

/// Everything currently queued on `rx`, without waiting.
pub fn drain(rx: &mut UnboundedReceiver<MotionEvent>) -> Vec<MotionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Groups whose steps fired, in firing order.
pub fn fired_groups(events: &[MotionEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|e| match e {
            MotionEvent::StepFired { group, .. } => Some(group.as_str()),
            _ => None,
        })
        .collect()
}
