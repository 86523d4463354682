//! The delivery boundary for validated contact submissions.
//!
//! The contact form never talks to a mail service directly. It awaits a
//! [`Deliver`] implementation injected at construction, so the composition
//! root decides how messages leave the system and tests substitute
//! deterministic doubles.
//!
//! Only [`SimulatedDelivery`] ships with the site: it waits a fixed delay,
//! logs the record and succeeds. It performs no network I/O.

use crate::validate::FormRecord;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("delivery service unavailable: {0}")]
    Unavailable(String),
    #[error("message rejected: {0}")]
    Rejected(String),
}

/// Acknowledgement returned by a successful delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub reference: String,
}

/// Transmits a validated contact submission.
#[async_trait]
pub trait Deliver: Send + Sync {
    async fn deliver(&self, record: &FormRecord) -> Result<Receipt, DeliveryError>;
}

#[async_trait]
impl<T: Deliver + ?Sized> Deliver for std::sync::Arc<T> {
    async fn deliver(&self, record: &FormRecord) -> Result<Receipt, DeliveryError> {
        (**self).deliver(record).await
    }
}

/// Stand-in delivery: sleeps `delay`, logs the record, always succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedDelivery {
    delay: Duration,
}

impl SimulatedDelivery {
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedDelivery {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[async_trait]
impl Deliver for SimulatedDelivery {
    async fn deliver(&self, record: &FormRecord) -> Result<Receipt, DeliveryError> {
        tokio::time::sleep(self.delay).await;
        tracing::info!(
            name = %record.name,
            email = %record.email,
            subject = %record.subject,
            message_len = record.message.len(),
            "contact form submitted (simulated delivery)"
        );
        Ok(Receipt {
            reference: format!("simulated-{}", record.email.trim()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time::Instant;

    fn record() -> FormRecord {
        FormRecord {
            name: "Jo".into(),
            email: "jo@x.com".into(),
            subject: "Hi".into(),
            message: "Hello".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_delivery_waits_its_delay_and_succeeds() {
        let delivery = SimulatedDelivery::default();
        let started = Instant::now();
        let receipt = delivery.deliver(&record()).await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_secs(2));
        assert_eq!(receipt.reference, "simulated-jo@x.com");
    }

    #[tokio::test(start_paused = true)]
    async fn arc_forwards_to_inner_delivery() {
        let delivery: Arc<dyn Deliver> = Arc::new(SimulatedDelivery::new(Duration::from_millis(5)));
        assert!(delivery.deliver(&record()).await.is_ok());
    }

    #[test]
    fn delivery_error_messages() {
        assert_eq!(
            DeliveryError::Unavailable("smtp down".into()).to_string(),
            "delivery service unavailable: smtp down"
        );
        assert_eq!(
            DeliveryError::Rejected("spam".into()).to_string(),
            "message rejected: spam"
        );
    }
}
