//! Build-complete notification.
//!
//! Observers subscribe explicitly; after every successful walk the engine
//! publishes the flattened result sequence to each subscriber in
//! subscription order. A failed walk publishes nothing.

use crate::engine::pipeline::FileRecord;

type CompleteCallback = Box<dyn Fn(&[FileRecord])>;

/// Holds the "build complete" subscribers.
#[derive(Default)]
pub struct Notifier {
    subscribers: Vec<CompleteCallback>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for successful walks.
    pub fn subscribe(&mut self, callback: impl Fn(&[FileRecord]) + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    /// Publish a completed result sequence to every subscriber.
    pub fn emit(&self, files: &[FileRecord]) {
        for subscriber in &self.subscribers {
            subscriber(files);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier").field("subscribers", &self.subscribers.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_reaches_subscribers_in_order() {
        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

        let mut notifier = Notifier::new();
        let a = seen.clone();
        notifier.subscribe(move |files| a.borrow_mut().push(format!("a:{}", files.len())));
        let b = seen.clone();
        notifier.subscribe(move |files| b.borrow_mut().push(format!("b:{}", files.len())));

        notifier.emit(&[FileRecord::new("x.js")]);

        assert_eq!(*seen.borrow(), vec!["a:1".to_string(), "b:1".to_string()]);
    }

    #[test]
    fn test_emit_without_subscribers_is_noop() {
        let notifier = Notifier::new();
        assert!(notifier.is_empty());
        notifier.emit(&[]);
    }
}
