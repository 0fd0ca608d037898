//! Observers for node storage attach/release

use crate::SceneNode;

/// Notified whenever node storage enters or leaves the scene.
///
/// `released` runs before the node's buffers are dropped, so an
/// implementation may still read the payload to free matching
/// renderer-side handles.
pub trait ResourceTracker {
    fn attached(&mut self, node: &SceneNode);
    fn released(&mut self, node: &SceneNode);
}

/// Default tracker: logs every transition and keeps a running byte total
#[derive(Debug, Default)]
pub struct LogTracker {
    live_bytes: usize,
}

impl LogTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_bytes(&self) -> usize {
        self.live_bytes
    }
}

impl ResourceTracker for LogTracker {
    fn attached(&mut self, node: &SceneNode) {
        let bytes = node.payload.byte_size();
        self.live_bytes += bytes;
        log::debug!(
            "[scene] attached {} '{}' {} ({} bytes, {} live)",
            node.payload.kind(),
            node.name,
            node.id,
            bytes,
            self.live_bytes
        );
    }

    fn released(&mut self, node: &SceneNode) {
        let bytes = node.payload.byte_size();
        self.live_bytes = self.live_bytes.saturating_sub(bytes);
        log::debug!(
            "[scene] released {} '{}' {} ({} bytes, {} live)",
            node.payload.kind(),
            node.name,
            node.id,
            bytes,
            self.live_bytes
        );
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::ResourceTracker;
    use crate::SceneNode;
    use nebula_core::NodeId;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Event {
        Attached(NodeId),
        Released(NodeId),
    }

    /// Records every transition into a shared log the test keeps a handle to
    pub struct RecordingTracker {
        log: Rc<RefCell<Vec<Event>>>,
    }

    impl RecordingTracker {
        pub fn new() -> (Self, Rc<RefCell<Vec<Event>>>) {
            let log = Rc::new(RefCell::new(Vec::new()));
            (Self { log: log.clone() }, log)
        }
    }

    impl ResourceTracker for RecordingTracker {
        fn attached(&mut self, node: &SceneNode) {
            self.log.borrow_mut().push(Event::Attached(node.id));
        }

        fn released(&mut self, node: &SceneNode) {
            self.log.borrow_mut().push(Event::Released(node.id));
        }
    }
}
