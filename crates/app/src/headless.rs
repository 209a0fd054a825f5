use crate::host::{Container, Host};
use cubestudy_common::Viewport;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// In-memory container. Clones share the same size, so a test or a headless
/// runner can resize a container the App already holds.
#[derive(Debug, Clone)]
pub struct HeadlessContainer {
    viewport: Rc<Cell<Viewport>>,
}

impl HeadlessContainer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport: Rc::new(Cell::new(viewport)),
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        let mut v = self.viewport.get();
        v.width = width;
        v.height = height;
        self.viewport.set(v);
    }

    pub fn set_pixel_ratio(&self, pixel_ratio: f32) {
        let mut v = self.viewport.get();
        v.pixel_ratio = pixel_ratio;
        self.viewport.set(v);
    }
}

impl Container for HeadlessContainer {
    fn viewport(&self) -> Viewport {
        self.viewport.get()
    }
}

/// Host without a display: containers are registered by selector up front.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    containers: BTreeMap<String, HeadlessContainer>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(mut self, selector: impl Into<String>, container: HeadlessContainer) -> Self {
        self.containers.insert(selector.into(), container);
        self
    }
}

impl Host for HeadlessHost {
    type Container = HeadlessContainer;

    fn query_selector(&self, selector: &str) -> Option<HeadlessContainer> {
        self.containers.get(selector).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_selector_finds_registered_container() {
        let host = HeadlessHost::new()
            .with_container("#webgl-container", HeadlessContainer::new(Viewport::new(800, 600)));
        assert!(host.query_selector("#webgl-container").is_some());
        assert!(host.query_selector("#other").is_none());
    }

    #[test]
    fn clones_share_size() {
        let container = HeadlessContainer::new(Viewport::new(800, 600));
        let held = container.clone();
        container.resize(1024, 768);
        container.set_pixel_ratio(2.0);
        assert_eq!(held.viewport(), Viewport::new(1024, 768).with_pixel_ratio(2.0));
    }
}
