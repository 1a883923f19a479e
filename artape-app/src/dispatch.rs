//! Hop from tracking callbacks to the scene-graph thread.
//!
//! Tracking callbacks arrive on arbitrary threads. [`SceneDispatcher`] is
//! registered as the session's anchor and frame listener and turns every
//! callback into a [`SceneMessage`] on a single-consumer queue. The scene
//! thread drains the queue in dispatch order (see
//! [`MeasureController::pump`](crate::MeasureController::pump)).

use artape_data::PlaneAnchor;
use artape_track::{AnchorListener, FrameListener};
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::trace;

/// Work posted to the scene-graph thread.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneMessage {
    AnchorAdded(PlaneAnchor),
    AnchorUpdated(PlaneAnchor),
    AnchorRemoved(PlaneAnchor),
    Frame { time: f64 },
    AddPressed,
}

/// Receives the user's "add" action.
pub trait ActionListener {
    fn on_add(&mut self);
}

/// Sending half of the scene-thread queue.
#[derive(Debug, Clone)]
pub struct SceneDispatcher {
    sender: Sender<SceneMessage>,
}

impl SceneDispatcher {
    /// Create a dispatcher and the receiving end the scene thread drains.
    pub fn channel() -> (Self, Receiver<SceneMessage>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }

    /// Post a message. Returns false once the scene side is gone.
    pub fn post(&self, message: SceneMessage) -> bool {
        match self.sender.send(message) {
            Ok(()) => true,
            Err(err) => {
                trace!("Scene thread gone, dropping {:?}", err.0);
                false
            }
        }
    }
}

impl AnchorListener for SceneDispatcher {
    fn did_add(&self, anchor: &PlaneAnchor) {
        self.post(SceneMessage::AnchorAdded(*anchor));
    }

    fn did_update(&self, anchor: &PlaneAnchor) {
        self.post(SceneMessage::AnchorUpdated(*anchor));
    }

    fn did_remove(&self, anchor: &PlaneAnchor) {
        self.post(SceneMessage::AnchorRemoved(*anchor));
    }
}

impl FrameListener for SceneDispatcher {
    fn on_frame(&self, time: f64) {
        self.post(SceneMessage::Frame { time });
    }
}

impl ActionListener for SceneDispatcher {
    fn on_add(&mut self) {
        self.post(SceneMessage::AddPressed);
    }
}
