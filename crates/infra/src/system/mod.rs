use chrono::{DateTime, Utc};

// Mocking out time so that it is possible to run tests that depend on time.
pub trait ISys: Send + Sync {
    /// The current instant in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// System that gets the real time and is used when not testing
pub struct RealSys {}
impl ISys for RealSys {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System pinned to a single instant, used by tests
pub struct StaticTimeSys(pub DateTime<Utc>);
impl ISys for StaticTimeSys {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
