use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

use crate::sidecar::{decode_sidecar, encode_sidecar};
use crate::{Arrow, ArrowPatch, Error, Result};

/// Receives the full arrow list after every mutation of an [`ArrowStore`].
pub trait ArrowObserver {
    fn arrows_changed(&mut self, arrows: &[Arrow]);
}

impl<T: ArrowObserver> ArrowObserver for Rc<RefCell<T>> {
    fn arrows_changed(&mut self, arrows: &[Arrow]) {
        self.borrow_mut().arrows_changed(arrows);
    }
}

/// Ordered arrow collection. An arrow's index is its only identity, and it
/// shifts down when an earlier arrow is deleted.
#[derive(Default)]
pub struct ArrowStore {
    arrows: Vec<Arrow>,
    observers: Vec<Box<dyn ArrowObserver>>,
}

impl ArrowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer` and immediately hands it the current contents.
    pub fn subscribe(&mut self, mut observer: Box<dyn ArrowObserver>) {
        observer.arrows_changed(&self.arrows);
        self.observers.push(observer);
    }

    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    pub fn get(&self, index: usize) -> Result<&Arrow> {
        self.arrows.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.arrows.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.arrows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrows.is_empty()
    }

    pub fn add(&mut self, arrow: Arrow) -> usize {
        self.arrows.push(arrow);
        let index = self.arrows.len() - 1;
        debug!(index, "arrow added");
        self.notify();
        index
    }

    pub fn update(&mut self, index: usize, patch: &ArrowPatch) -> Result<()> {
        let len = self.arrows.len();
        let arrow = self
            .arrows
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        arrow.apply(patch)?;
        debug!(index, "arrow updated");
        self.notify();
        Ok(())
    }

    pub fn delete(&mut self, index: usize) -> Result<Arrow> {
        if index >= self.arrows.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.arrows.len(),
            });
        }
        let removed = self.arrows.remove(index);
        debug!(index, "arrow deleted");
        self.notify();
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.arrows.clear();
        self.notify();
    }

    /// Swaps in a new arrow list wholesale.
    pub fn replace(&mut self, arrows: Vec<Arrow>) {
        self.arrows = arrows;
        self.notify();
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        encode_sidecar(&self.arrows)
    }

    /// Replaces the contents with the arrows in `bytes`. The whole input is
    /// parsed before anything changes; a corrupt file leaves the store as it was.
    pub fn deserialize(&mut self, bytes: &[u8]) -> Result<()> {
        let arrows = decode_sidecar(bytes)?;
        self.replace(arrows);
        Ok(())
    }

    fn notify(&mut self) {
        for observer in &mut self.observers {
            observer.arrows_changed(&self.arrows);
        }
    }
}

impl std::fmt::Debug for ArrowStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrowStore")
            .field("arrows", &self.arrows)
            .field("observers", &self.observers.len())
            .finish()
    }
}
