//! What the client hands to a renderer each time the view changes.

use crate::hint::{Hint, HitMarker};
use crate::instances::InstanceBatch;
use crate::trace::Trace;
use echoes_core::Mat4;

/// Everything to draw for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub view_projection: Mat4,
    pub batches: &'a [InstanceBatch],
    pub hint: &'a Hint,
    pub marker: &'a HitMarker,
    pub traces: &'a [Trace],
}

/// A renderer or scene graph. Placing objects is all the client asks of it.
pub trait SceneSink {
    fn draw(&mut self, frame: &Frame<'_>);
}

/// Sink that only logs what it would draw. Used by the headless binary.
#[derive(Debug, Default)]
pub struct LogScene {
    pub frames: u64,
}

impl SceneSink for LogScene {
    fn draw(&mut self, frame: &Frame<'_>) {
        self.frames += 1;
        let instances: usize = frame.batches.iter().map(|b| b.instances.len()).sum();
        log::debug!(
            "Frame {}: {} instances, hint {} (r={:.2}), marker {}, {} traces",
            self.frames,
            instances,
            if frame.hint.visible { "shown" } else { "hidden" },
            frame.hint.radius,
            if frame.marker.visible { "shown" } else { "hidden" },
            frame.traces.len(),
        );
    }
}
