use crate::coords::{DeviceSize, Extent};
use crate::scene::{NodeId, Scene};
use crate::shader::{RasterBackend, RasterStack, SurfaceId};

/// What a primitive produced: a vector node or a raster surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Handle {
    Node(NodeId),
    Surface(SurfaceId),
}

impl Handle {
    #[inline]
    pub fn node(self) -> Option<NodeId> {
        match self {
            Handle::Node(id) => Some(id),
            Handle::Surface(_) => None,
        }
    }

    #[inline]
    pub fn surface(self) -> Option<SurfaceId> {
        match self {
            Handle::Surface(id) => Some(id),
            Handle::Node(_) => None,
        }
    }
}

/// Immutable drawing context for one primitive invocation.
///
/// Built fresh for every call from the owning layer and graph. Nested output
/// (a grid's own group, a labelled point) is expressed by deriving a frame with
/// another container, never by mutating this one.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderFrame {
    pub container: NodeId,
    pub extent: Extent,
    pub size: DeviceSize,
    /// Result of this command on a previous pass, if any.
    pub current: Option<Handle>,
}

impl RenderFrame {
    pub fn new(container: NodeId, extent: Extent, size: DeviceSize, current: Option<Handle>) -> Self {
        Self { container, extent, size, current }
    }

    /// Same frame, drawing into `container`.
    #[inline]
    pub fn with_container(&self, container: NodeId) -> Self {
        Self { container, ..*self }
    }

    /// Logical x to device x.
    #[inline]
    pub fn device_x(&self, x: f64) -> f64 {
        self.extent.world_x(x) * self.size.width_f()
    }

    /// Logical y to device y. Device y grows downward.
    #[inline]
    pub fn device_y(&self, y: f64) -> f64 {
        (1.0 - self.extent.world_y(y)) * self.size.height_f()
    }
}

/// Mutable output shared by all primitives of a graph.
pub struct DrawTarget<'a> {
    pub scene: &'a mut Scene,
    pub rasters: &'a mut RasterStack,
    pub backend: Option<&'a mut (dyn RasterBackend + 'static)>,
}

impl<'a> DrawTarget<'a> {
    pub fn new(scene: &'a mut Scene, rasters: &'a mut RasterStack) -> Self {
        Self { scene, rasters, backend: None }
    }

    pub fn with_backend(mut self, backend: Option<&'a mut (dyn RasterBackend + 'static)>) -> Self {
        self.backend = backend;
        self
    }

    /// Reborrows for a nested call.
    pub fn reborrow(&mut self) -> DrawTarget<'_> {
        DrawTarget {
            scene: &mut *self.scene,
            rasters: &mut *self.rasters,
            backend: self.backend.as_deref_mut(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Tag;

    #[test]
    fn device_mapping_inverts_y() {
        let mut scene = Scene::new();
        let root = scene.create(Tag::Svg);
        let frame = RenderFrame::new(root, Extent::new(-4.0, -4.0, 8.0, 8.0), DeviceSize::new(400, 400), None);
        assert_eq!(frame.device_x(-4.0), 0.0);
        assert_eq!(frame.device_x(0.0), 200.0);
        assert_eq!(frame.device_y(4.0), 0.0);
        assert_eq!(frame.device_y(-4.0), 400.0);
    }

    #[test]
    fn with_container_keeps_everything_else() {
        let mut scene = Scene::new();
        let root = scene.create(Tag::Svg);
        let g = scene.create(Tag::Group);
        let frame = RenderFrame::new(root, Extent::new(0.0, 0.0, 1.0, 1.0), DeviceSize::new(10, 10), None);
        let nested = frame.with_container(g);
        assert_eq!(nested.container, g);
        assert_eq!(nested.extent, frame.extent);
        assert_eq!(nested.size, frame.size);
    }
}
