use cubestudy_common::Viewport;

/// A display container provided by the host, e.g. a window's client area.
pub trait Container {
    /// Current client size in logical pixels and the device pixel ratio.
    fn viewport(&self) -> Viewport;
}

/// The environment a lesson runs in.
pub trait Host {
    type Container: Container;

    /// Find a container by selector, e.g. `#webgl-container`.
    fn query_selector(&self, selector: &str) -> Option<Self::Container>;
}
