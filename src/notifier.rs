use crate::contact::ContactField;
use tracing::trace;

/// Receives one call per logical field change on a contact panel.
pub trait ChangeListener {
    fn contact_detail_changed(&mut self, field: ContactField);
}

impl<F: FnMut(ContactField)> ChangeListener for F {
    fn contact_detail_changed(&mut self, field: ContactField) {
        self(field)
    }
}

/// Forwards field changes to the parent listener once initial population has
/// finished. Arming is one-way: there is no way to disarm a notifier.
pub struct ChangeNotifier {
    armed: bool,
    listener: Option<Box<dyn ChangeListener>>,
}

impl ChangeNotifier {
    /// A disarmed notifier with no listener yet.
    pub fn new() -> Self {
        Self {
            armed: false,
            listener: None,
        }
    }

    pub fn with_listener(listener: impl ChangeListener + 'static) -> Self {
        Self {
            armed: false,
            listener: Some(Box::new(listener)),
        }
    }

    pub fn set_listener(&mut self, listener: impl ChangeListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Emit `field` to the listener. Returns whether it was actually delivered.
    pub fn notify(&mut self, field: ContactField) -> bool {
        if !self.armed {
            trace!(%field, "change suppressed while loading");
            return false;
        }
        match self.listener.as_mut() {
            Some(listener) => {
                listener.contact_detail_changed(field);
                true
            }
            None => false,
        }
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("armed", &self.armed)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::ChangeNotifier;
    use crate::contact::ContactField;
    use std::{cell::RefCell, rc::Rc};

    fn recording() -> (ChangeNotifier, Rc<RefCell<Vec<ContactField>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let notifier =
            ChangeNotifier::with_listener(move |field| sink.borrow_mut().push(field));
        (notifier, log)
    }

    #[test]
    fn nothing_is_emitted_before_arming() {
        let (mut notifier, log) = recording();
        for field in [
            ContactField::Name,
            ContactField::Connection,
            ContactField::Loyalty,
            ContactField::File,
        ] {
            assert!(!notifier.notify(field));
        }
        assert!(log.borrow().is_empty());

        notifier.arm();
        assert!(notifier.notify(ContactField::Group));
        assert_eq!(*log.borrow(), vec![ContactField::Group]);
    }

    #[test]
    fn missing_listener_is_not_an_error() {
        let mut notifier = ChangeNotifier::new();
        notifier.arm();
        assert!(!notifier.notify(ContactField::Name));
        assert!(notifier.is_armed());
    }
}
