//! Cross-thread marshaling onto the playback context.
//!
//! Playback state is confined to one cooperative context: ticks, control
//! calls and listener fan-out all run there, unlocked. Work completing on
//! other threads (network-bound layer acquisition, a capture process
//! acknowledging a grabbed frame) must not touch that state directly -
//! instead it posts a closure through an [`InvokeHandle`], and the
//! transport drains the queue at the top of every update, on its own
//! context, in post order.

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::warn;

/// Closure executed on the playback context with access to the owner `T`.
pub type Invoke<T> = Box<dyn FnOnce(&mut T) + Send + 'static>;

/// Queue half owned by the playback context.
pub struct InvokeQueue<T> {
    tx: Sender<Invoke<T>>,
    rx: Receiver<Invoke<T>>,
}

impl<T> InvokeQueue<T> {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Cloneable, `Send` posting handle for off-context collaborators.
    pub fn handle(&self) -> InvokeHandle<T> {
        InvokeHandle { tx: self.tx.clone() }
    }

    /// Take everything posted so far, in post order.
    pub fn drain(&self) -> Vec<Invoke<T>> {
        self.rx.try_iter().collect()
    }
}

impl<T> Default for InvokeQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Posting half; clone freely across threads.
pub struct InvokeHandle<T> {
    tx: Sender<Invoke<T>>,
}

impl<T> Clone for InvokeHandle<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T> InvokeHandle<T> {
    /// Post a closure to run on the playback context during its next update.
    pub fn post(&self, f: impl FnOnce(&mut T) + Send + 'static) {
        if self.tx.send(Box::new(f)).is_err() {
            warn!("playback context is gone, dropping posted invoke");
        }
    }
}
