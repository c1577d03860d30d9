//! Where mapped values end up.

use std::cell::Cell;
use std::rc::Rc;

use super::mapper::OutputValues;
use super::surface::SurfaceId;

/// Receives mapped values for a surface.
pub trait OutputSink {
    fn apply(&mut self, surface: SurfaceId, output: &OutputValues);
}

impl<F> OutputSink for F
where
    F: FnMut(SurfaceId, &OutputValues),
{
    fn apply(&mut self, surface: SurfaceId, output: &OutputValues) {
        self(surface, output)
    }
}

/// Latest-value cell shared between the engine and a renderer.
///
/// Cloning shares the cell; the renderer keeps one clone and reads it each
/// frame while the engine writes through another.
#[derive(Debug, Clone, Default)]
pub struct OutputSlot {
    latest: Rc<Cell<Option<OutputValues>>>,
    applied: Rc<Cell<u64>>,
}

impl OutputSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<OutputValues> {
        self.latest.get()
    }

    /// How many outputs have been written in total.
    pub fn applied(&self) -> u64 {
        self.applied.get()
    }

    pub fn clear(&self) {
        self.latest.set(None);
    }
}

impl OutputSink for OutputSlot {
    fn apply(&mut self, _surface: SurfaceId, output: &OutputValues) {
        self.latest.set(Some(*output));
        self.applied.set(self.applied.get() + 1);
    }
}

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::OutputSink;
    use crate::core::mapper::OutputValues;
    use crate::core::surface::SurfaceId;

    /// Records every output it receives, shareable with the test body.
    #[derive(Debug, Clone, Default)]
    pub struct Recorder(pub Rc<RefCell<Vec<(SurfaceId, OutputValues)>>>);

    impl Recorder {
        pub fn len(&self) -> usize {
            self.0.borrow().len()
        }

        pub fn values(&self) -> Vec<f64> {
            self.0.borrow().iter().filter_map(|(_, o)| o.value).collect()
        }

        pub fn last(&self) -> Option<OutputValues> {
            self.0.borrow().last().map(|(_, o)| *o)
        }
    }

    impl OutputSink for Recorder {
        fn apply(&mut self, surface: SurfaceId, output: &OutputValues) {
            self.0.borrow_mut().push((surface, *output));
        }
    }
}
