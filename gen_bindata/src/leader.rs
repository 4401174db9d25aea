//! Leader-election capability shared with the controllers that embed packed
//! assets, and a no-op implementation for setups without coordination.

/// Error reported by a [`LeaderElector`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A component that decides whether this process currently leads.
pub trait LeaderElector: Send + Sync {
    fn init(&mut self) -> Result<(), BoxError>;
    fn run(&mut self) -> Result<(), BoxError>;
    fn stop(&mut self) -> Result<(), BoxError>;
    fn is_leader(&self) -> bool;
    fn healthy(&self) -> Result<(), BoxError>;
}

/// A [`LeaderElector`] with a fixed answer, used where distributed
/// coordination is disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DummyLeaderElector {
    pub leader: bool,
}

impl DummyLeaderElector {
    pub const fn new(leader: bool) -> Self {
        Self { leader }
    }
}

impl LeaderElector for DummyLeaderElector {
    fn init(&mut self) -> Result<(), BoxError> {
        Ok(())
    }

    fn run(&mut self) -> Result<(), BoxError> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), BoxError> {
        Ok(())
    }

    fn is_leader(&self) -> bool {
        self.leader
    }

    fn healthy(&self) -> Result<(), BoxError> {
        Ok(())
    }
}
