// src/control.rs

//! Run control requests from inside listeners.
//!
//! A listener is called while the sequencer is busy delivering notifications,
//! so it cannot borrow that sequencer. It holds a [`SequencerHandle`] instead;
//! requests sent through the handle are served once the current batch of
//! notifications has been delivered, in the order they were sent.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    Start,
    End,
    Cancel,
}

/// Cloneable sender of [`ControlRequest`]s to one sequencer.
#[derive(Debug, Clone)]
pub struct SequencerHandle {
    tx: UnboundedSender<ControlRequest>,
}

impl SequencerHandle {
    pub fn start(&self) {
        self.send(ControlRequest::Start);
    }

    pub fn end(&self) {
        self.send(ControlRequest::End);
    }

    pub fn cancel(&self) {
        self.send(ControlRequest::Cancel);
    }

    pub fn send(&self, request: ControlRequest) {
        if self.tx.send(request).is_err() {
            debug!(?request, "sequencer dropped; request ignored");
        }
    }
}

/// Receiving side, owned by the sequencer.
#[derive(Debug)]
pub(crate) struct ControlQueue {
    tx: UnboundedSender<ControlRequest>,
    rx: UnboundedReceiver<ControlRequest>,
}

impl ControlQueue {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub(crate) fn handle(&self) -> SequencerHandle {
        SequencerHandle {
            tx: self.tx.clone(),
        }
    }

    pub(crate) fn next(&mut self) -> Option<ControlRequest> {
        self.rx.try_recv().ok()
    }
}

impl Default for ControlQueue {
    fn default() -> Self {
        Self::new()
    }
}
