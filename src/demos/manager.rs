use crate::demos::Demo;

/// Owns every demo and tracks which one is shown.
///
/// All demos are built up front, so switching is only an index change and
/// never recreates device objects.
pub struct DemoManager {
    demos: Vec<Box<dyn Demo>>,
    current: usize,
}

impl DemoManager {
    pub fn new(demos: Vec<Box<dyn Demo>>) -> Self {
        Self { demos, current: 0 }
    }

    pub fn current(&self) -> Option<&dyn Demo> {
        self.demos.get(self.current).map(|demo| demo.as_ref())
    }

    pub fn current_mut(&mut self) -> Option<&mut (dyn Demo + 'static)> {
        self.demos.get_mut(self.current).map(|demo| demo.as_mut())
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.demos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.demos.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Demo>> {
        self.demos.iter_mut()
    }

    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.demos.len() {
            self.switch_to(self.current + 1)
        } else {
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.current > 0 {
            self.switch_to(self.current - 1)
        } else {
            false
        }
    }

    /// Returns false when `index` is out of range or already current.
    pub fn switch_to(&mut self, index: usize) -> bool {
        if index >= self.demos.len() || index == self.current {
            return false;
        }
        self.current = index;
        log::info!(
            "Switched to demo {}: {} ({})",
            index + 1,
            self.demos[index].name(),
            self.demos[index].description()
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demos::{DemoKey, FrameInput};
    use crate::error::SetupResult;
    use crate::frame::{ComputeStep, FramePlan, SimulationContext};
    use crate::gpu::ResourceAllocator;

    struct Stub {
        name: &'static str,
        context: SimulationContext,
    }

    impl Demo for Stub {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            ""
        }

        fn context(&self) -> &SimulationContext {
            &self.context
        }

        fn resize(
            &mut self,
            _allocator: &ResourceAllocator<'_>,
            _width: u32,
            _height: u32,
        ) -> SetupResult<()> {
            Ok(())
        }

        fn on_key(&mut self, _key: DemoKey) -> bool {
            false
        }

        fn prepare(&mut self, _queue: &wgpu::Queue, _input: &FrameInput) -> FramePlan {
            FramePlan::render_only()
        }

        fn record_compute(&self, _encoder: &mut wgpu::CommandEncoder, _step: &ComputeStep) {}

        fn record_render(
            &self,
            _encoder: &mut wgpu::CommandEncoder,
            _target: &wgpu::TextureView,
            _plan: &FramePlan,
        ) {
        }
    }

    fn manager() -> DemoManager {
        let demos: Vec<Box<dyn Demo>> = ["a", "b", "c"]
            .into_iter()
            .map(|name| {
                Box::new(Stub {
                    name,
                    context: SimulationContext::new(),
                }) as Box<dyn Demo>
            })
            .collect();
        DemoManager::new(demos)
    }

    #[test]
    fn next_and_previous_stop_at_the_ends() {
        let mut manager = manager();
        assert!(!manager.previous());
        assert!(manager.next());
        assert!(manager.next());
        assert!(!manager.next());
        assert_eq!(manager.current().map(|demo| demo.name().to_owned()), Some("c".to_owned()));
        assert!(manager.previous());
        assert_eq!(manager.current_index(), 1);
    }

    #[test]
    fn switch_rejects_out_of_range() {
        let mut manager = manager();
        assert!(!manager.switch_to(3));
        assert!(manager.switch_to(2));
        assert!(!manager.switch_to(2));
        assert_eq!(manager.current_index(), 2);
    }

    #[test]
    fn empty_manager_has_no_current_demo() {
        let manager = DemoManager::new(Vec::new());
        assert!(manager.is_empty());
        assert!(manager.current().is_none());
    }
}
