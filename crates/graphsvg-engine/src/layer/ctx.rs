use crate::coords::{DeviceSize, Extent};
use crate::draw::{DrawTarget, Handle, PrimitiveRegistry, RenderFrame};
use crate::scene::NodeId;

/// Everything a layer needs from its graph to run commands.
pub struct LayerCtx<'a> {
    pub target: DrawTarget<'a>,
    pub primitives: &'a PrimitiveRegistry,
    pub extent: Extent,
    pub size: DeviceSize,
}

impl<'a> LayerCtx<'a> {
    #[inline]
    pub fn new(
        target: DrawTarget<'a>,
        primitives: &'a PrimitiveRegistry,
        extent: Extent,
        size: DeviceSize,
    ) -> Self {
        Self { target, primitives, extent, size }
    }

    /// Frame for one command drawing into `container`.
    #[inline]
    pub fn frame(&self, container: NodeId, current: Option<Handle>) -> RenderFrame {
        RenderFrame::new(container, self.extent, self.size, current)
    }
}
