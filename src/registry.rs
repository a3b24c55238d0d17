//! Process-wide, id-keyed lookup for the handful of object kinds that need
//! to be reachable from anywhere in a resolution step: entities (for the
//! cross-entity channel and the public API), values, blocks, conditions and
//! roll records.
//!
//! Expressed as an explicit, passed-around table rather than a process
//! global: a `HashMap<Id, Rc<RefCell<T>>>` held by `World`. Resolution is
//! single-threaded and cooperative, so `Rc`/`RefCell` is sufficient — there
//! is never a second thread that could observe a torn borrow.

use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use crate::error::{EngineError, EngineResult};

pub type Handle<T> = Rc<RefCell<T>>;

#[derive(Debug)]
pub struct Registry<K, T> {
    entries: HashMap<K, Handle<T>>,
    kind: &'static str,
}

impl<K, T> Registry<K, T>
where
    K: Eq + Hash + Copy + std::fmt::Display,
{
    pub fn new(kind: &'static str) -> Self {
        Self {
            entries: HashMap::new(),
            kind,
        }
    }

    pub fn register(&mut self, id: K, value: T) -> Handle<T> {
        let handle = Rc::new(RefCell::new(value));
        self.entries.insert(id, Rc::clone(&handle));
        handle
    }

    pub fn insert_handle(&mut self, id: K, handle: Handle<T>) {
        self.entries.insert(id, handle);
    }

    pub fn get(&self, id: K) -> EngineResult<Handle<T>> {
        self.entries
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::not_found(format!("{} {id} not registered", self.kind)))
    }

    pub fn try_get(&self, id: K) -> Option<Handle<T>> {
        self.entries.get(&id).cloned()
    }

    pub fn unregister(&mut self, id: K) -> Option<Handle<T>> {
        self.entries.remove(&id)
    }

    pub fn contains(&self, id: K) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Handle<T>)> {
        self.entries.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &Handle<T>> {
        self.entries.values()
    }
}
