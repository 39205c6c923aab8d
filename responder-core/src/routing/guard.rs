//! Cooperative cancellation and compute budget for a single query

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use crate::Error;

/// Shared flag a caller trips to abandon an in-flight query
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Polled by the searches between node expansions
#[derive(Debug)]
pub(crate) struct QueryGuard<'a> {
    cancel: &'a CancelFlag,
    started: Instant,
    budget: Duration,
}

impl<'a> QueryGuard<'a> {
    pub(crate) fn new(cancel: &'a CancelFlag, budget: Duration) -> Self {
        Self {
            cancel,
            started: Instant::now(),
            budget,
        }
    }

    pub(crate) fn check(&self) -> Result<(), Error> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if self.started.elapsed() >= self.budget {
            return Err(Error::RouteComputationTimeout(self.budget));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_visible_through_clones() {
        let flag = CancelFlag::new();
        let guard = QueryGuard::new(&flag, Duration::from_secs(60));
        assert!(guard.check().is_ok());

        flag.clone().cancel();
        assert!(matches!(guard.check(), Err(Error::Cancelled)));
    }

    #[test]
    fn exhausted_budget_times_out() {
        let flag = CancelFlag::new();
        let guard = QueryGuard::new(&flag, Duration::ZERO);
        assert!(matches!(
            guard.check(),
            Err(Error::RouteComputationTimeout(budget)) if budget == Duration::ZERO
        ));
    }
}
