use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;

/// Represents an entity responsible for providing dates across application.
/// This can allow it to be used for testing
#[cfg_attr(test, automock)]
pub trait Clock: Sync + Send + 'static {
    fn now(&self) -> DateTime<Utc>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
