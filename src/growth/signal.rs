/// Identifies a registered completion listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Synchronous observer list carrying a reference to the sender as payload
pub struct CompletionSignal<T> {
    listeners: Vec<(ListenerId, Box<dyn FnMut(&T)>)>,
    next_id: u64,
}

impl<T> Default for CompletionSignal<T> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> CompletionSignal<T> {
    pub fn connect(&mut self, listener: impl FnMut(&T) + 'static) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the listener was not registered
    pub fn disconnect(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Call every listener in registration order
    pub fn broadcast(&mut self, payload: &T) {
        for (_, listener) in &mut self.listeners {
            listener(payload);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_broadcast_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut signal = CompletionSignal::<u32>::default();

        let a = seen.clone();
        signal.connect(move |v| a.borrow_mut().push(("a", *v)));
        let b = seen.clone();
        signal.connect(move |v| b.borrow_mut().push(("b", *v)));

        signal.broadcast(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_disconnect() {
        let hits = Rc::new(RefCell::new(0));
        let mut signal = CompletionSignal::<()>::default();

        let h = hits.clone();
        let id = signal.connect(move |_| *h.borrow_mut() += 1);
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        assert!(signal.is_empty());

        signal.broadcast(&());
        assert_eq!(*hits.borrow(), 0);
    }
}
