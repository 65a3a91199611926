//! Error reporting collaborators for slotting failures.

use std::cell::RefCell;
use std::rc::Rc;

use crate::traits::SlotError;

/// Receives each slotting failure once, at the interceptor boundary.
pub trait ErrorReporter {
    fn report(&self, error: &SlotError);
}

/// Reports failures as `tracing` errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &SlotError) {
        tracing::error!("{}", error);
    }
}

/// Collects failures in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    errors: RefCell<Vec<SlotError>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the errors reported so far.
    pub fn errors(&self) -> Vec<SlotError> {
        self.errors.borrow().clone()
    }

    /// Drain the errors reported so far.
    pub fn take(&self) -> Vec<SlotError> {
        self.errors.take()
    }

    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, error: &SlotError) {
        self.errors.borrow_mut().push(error.clone());
    }
}

impl<R: ErrorReporter + ?Sized> ErrorReporter for &R {
    fn report(&self, error: &SlotError) {
        (**self).report(error);
    }
}

impl<R: ErrorReporter + ?Sized> ErrorReporter for Rc<R> {
    fn report(&self, error: &SlotError) {
        (**self).report(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_and_drains() {
        let reporter = CollectingReporter::new();
        reporter.report(&SlotError::HostNotFound);
        reporter.report(&SlotError::AmbiguousHost { count: 2 });

        assert_eq!(reporter.len(), 2);
        assert_eq!(
            reporter.take(),
            vec![SlotError::HostNotFound, SlotError::AmbiguousHost { count: 2 }]
        );
        assert!(reporter.is_empty());
    }

    #[test]
    fn shared_reporter_sees_reports() {
        let reporter = Rc::new(CollectingReporter::new());
        let shared = Rc::clone(&reporter);

        shared.report(&SlotError::InvalidHost);

        assert_eq!(reporter.errors(), vec![SlotError::InvalidHost]);
    }
}
