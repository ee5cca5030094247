/// Auto-expiring toast notifications
use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use serde::{Deserialize, Serialize};

/// How long a toast stays up unless dismissed.
pub const TOAST_TTL_MS: u32 = 3200;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToastTone {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub tone: ToastTone,
}

/// Active toasts in display order. Ids are never reused by a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastStore {
    items: Vec<Toast>,
    last_id: u64,
}

impl ToastStore {
    pub fn new() -> Self {
        ToastStore::default()
    }

    pub fn push(&mut self, message: impl Into<String>, tone: ToastTone) -> u64 {
        self.last_id += 1;
        self.items.push(Toast {
            id: self.last_id,
            message: message.into(),
            tone,
        });
        self.last_id
    }

    /// Removes the toast; returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let original_len = self.items.len();
        self.items.retain(|t| t.id != id);
        self.items.len() < original_len
    }

    pub fn get(&self, id: u64) -> Option<&Toast> {
        self.items.iter().find(|t| t.id == id)
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

type Listener = Rc<dyn Fn()>;

/// A shared `ToastStore` whose toasts expire on their own.
///
/// Each push arms its own timer; `listener` runs after every change.
#[derive(Clone)]
pub struct ToastQueue {
    store: Rc<RefCell<ToastStore>>,
    listener: Rc<RefCell<Option<Listener>>>,
    ttl_ms: u32,
}

impl Default for ToastQueue {
    fn default() -> Self {
        ToastQueue::new(TOAST_TTL_MS)
    }
}

impl PartialEq for ToastQueue {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }
}

impl ToastQueue {
    pub fn new(ttl_ms: u32) -> Self {
        ToastQueue {
            store: Rc::new(RefCell::new(ToastStore::new())),
            listener: Rc::new(RefCell::new(None)),
            ttl_ms,
        }
    }

    pub fn set_listener(&self, listener: Option<Listener>) {
        *self.listener.borrow_mut() = listener;
    }

    pub fn push(&self, message: impl Into<String>, tone: ToastTone) -> u64 {
        let id = self.store.borrow_mut().push(message, tone);
        self.notify();

        let queue = self.clone();
        Timeout::new(self.ttl_ms, move || {
            queue.dismiss(id);
        })
        .forget();

        id
    }

    pub fn dismiss(&self, id: u64) {
        let removed = self.store.borrow_mut().dismiss(id);
        if removed {
            self.notify();
        }
    }

    pub fn items(&self) -> Vec<Toast> {
        self.store.borrow().items().to_vec()
    }

    fn notify(&self) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }
}
