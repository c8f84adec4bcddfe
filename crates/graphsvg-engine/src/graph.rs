//! The graph: one view onto a logical plane, drawn as layered SVG.

use crate::coords::{DeviceSize, Extent, Vec2};
use crate::draw::{DrawTarget, Handle, Param, PrimitiveRegistry, Props};
use crate::error::GraphError;
use crate::input::{PanPointer, PointerEvent, PointerResponse};
use crate::layer::{Layer, LayerCtx, LayerRegistry};
use crate::scene::{write_svg, NodeId, Scene, Tag};
use crate::shader::{RasterBackend, RasterStack, ShaderUniforms};
use crate::time::FrameTime;

/// Initial view and device size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GraphConfig {
    pub view: Extent,
    pub size: DeviceSize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            view: Extent::new(-4.0, -4.0, 8.0, 8.0),
            size: DeviceSize::new(400, 400),
        }
    }
}

/// One command from a declarative source.
#[derive(Debug, Clone)]
pub struct CommandDecl {
    pub layer: String,
    pub key: String,
    pub params: Vec<Param>,
    pub props: Props,
}

impl CommandDecl {
    pub fn new(layer: impl Into<String>, key: impl Into<String>, params: Vec<Param>, props: Props) -> Self {
        Self { layer: layer.into(), key: key.into(), params, props }
    }
}

/// A whole declarative graph: optional view/size overrides plus commands in
/// document order.
#[derive(Debug, Clone, Default)]
pub struct GraphDecl {
    pub view: Option<Extent>,
    pub size: Option<DeviceSize>,
    pub commands: Vec<CommandDecl>,
}

/// Owns the view, the device size, the layers and everything they draw into.
///
/// Output is an `<svg>` root holding one `<g>` per layer followed by a
/// border rect, plus a stack of raster surfaces painted behind it.
pub struct Graph {
    extent: Extent,
    size: DeviceSize,
    placement: Vec2,
    scene: Scene,
    root: NodeId,
    bounds: NodeId,
    rasters: RasterStack,
    backend: Option<Box<dyn RasterBackend>>,
    primitives: PrimitiveRegistry,
    layers: LayerRegistry,
    pointer: PanPointer,
    mouse: Option<Vec2>,
    time: f32,
}

impl Graph {
    pub fn new(config: GraphConfig) -> Self {
        let mut scene = Scene::new();
        let root = scene.create(Tag::Svg);
        let bounds = scene.create(Tag::Rect);
        scene.set_attr(bounds, "fill", "none");
        scene.set_attr(bounds, "stroke", "black");
        scene.append(root, bounds);

        let mut graph = Self {
            extent: config.view,
            size: config.size,
            placement: Vec2::zero(),
            scene,
            root,
            bounds,
            rasters: RasterStack::new(),
            backend: None,
            primitives: PrimitiveRegistry::with_defaults(),
            layers: LayerRegistry::new(root, bounds),
            pointer: PanPointer::new(),
            mouse: None,
            time: 0.0,
        };
        graph.apply_size();
        graph
    }

    /// Enables `shader` commands.
    pub fn with_backend(mut self, backend: Box<dyn RasterBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    #[inline]
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    #[inline]
    pub fn view(&self) -> Extent {
        self.extent
    }

    #[inline]
    pub fn size(&self) -> DeviceSize {
        self.size
    }

    #[inline]
    pub fn placement(&self) -> Vec2 {
        self.placement
    }

    /// Logical position of the pointer, once it has been seen.
    #[inline]
    pub fn mouse(&self) -> Option<Vec2> {
        self.mouse
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn bounds(&self) -> NodeId {
        self.bounds
    }

    #[inline]
    pub fn rasters(&self) -> &RasterStack {
        &self.rasters
    }

    #[inline]
    pub fn layers(&self) -> &LayerRegistry {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    /// The primitive table, for registering extra primitives.
    #[inline]
    pub fn primitives_mut(&mut self) -> &mut PrimitiveRegistry {
        &mut self.primitives
    }

    /// Replaces the view and redraws.
    pub fn set_view(&mut self, view: Extent) {
        self.extent = view;
        self.draw();
    }

    /// Resizes the output and every raster surface, then redraws.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = DeviceSize::new(width, height);
        self.apply_size();
        self.draw();
    }

    /// Device-space origin of the output on its host, used by [`is_visible`](Self::is_visible).
    pub fn set_placement(&mut self, x: f64, y: f64) {
        self.placement = Vec2::new(x, y);
    }

    fn apply_size(&mut self) {
        let DeviceSize { width, height } = self.size;
        self.scene.set_attr(self.root, "width", width);
        self.scene.set_attr(self.root, "height", height);
        self.scene.set_attr(self.bounds, "x", 0.5);
        self.scene.set_attr(self.bounds, "y", 0.5);
        self.scene.set_attr(self.bounds, "width", f64::from(width) - 1.0);
        self.scene.set_attr(self.bounds, "height", f64::from(height) - 1.0);

        if !self.rasters.is_empty() {
            for (id, err) in self.rasters.resize_all(self.size) {
                log::error!("shader surface {id:?} kept its old size: {err}");
            }
            self.rasters.render_all(&ShaderUniforms::new(self.extent, self.time));
        }
    }

    /// Whether the output overlaps `viewport` (device space) by a positive area.
    pub fn is_visible(&self, viewport: Extent) -> bool {
        let rect = Extent::new(self.placement.x, self.placement.y, self.size.width_f(), self.size.height_f());
        rect.union(viewport).area() > 0.0
    }

    /// Redraws every layer in creation order.
    ///
    /// A layer that fails is logged and left partially drawn; the remaining
    /// layers still draw.
    pub fn draw(&mut self) {
        let Graph { scene, rasters, backend, primitives, layers, extent, size, .. } = self;
        for layer in layers.iter_mut() {
            let target = DrawTarget::new(scene, rasters).with_backend(backend.as_deref_mut());
            let mut ctx = LayerCtx::new(target, primitives, *extent, *size);
            if let Err(err) = layer.draw(&mut ctx) {
                log::error!("{err}");
            }
        }
        log::debug!("graph redrawn ({} layers)", layers.len());
    }

    /// Adds a command to `layer`, creating the layer on first use.
    pub fn add(
        &mut self,
        layer: &str,
        key: &str,
        params: Vec<Param>,
        props: Props,
    ) -> Result<Option<Handle>, GraphError> {
        let Graph { scene, rasters, backend, primitives, layers, extent, size, .. } = self;
        let layer = layers.get_or_create(layer, scene);
        let target = DrawTarget::new(scene, rasters).with_backend(backend.as_deref_mut());
        let mut ctx = LayerCtx::new(target, primitives, *extent, *size);
        layer.add(&mut ctx, key, params, props)
    }

    /// Redraws a single layer. Unknown names are ignored.
    pub fn draw_layer(&mut self, name: &str) -> Result<(), GraphError> {
        let Graph { scene, rasters, backend, primitives, layers, extent, size, .. } = self;
        let Some(layer) = layers.get_mut(name) else { return Ok(()) };
        let target = DrawTarget::new(scene, rasters).with_backend(backend.as_deref_mut());
        let mut ctx = LayerCtx::new(target, primitives, *extent, *size);
        layer.draw(&mut ctx)
    }

    /// Clears a layer's output, keeping its commands.
    pub fn clear_layer(&mut self, name: &str) {
        if let Some(layer) = self.layers.get(name) {
            layer.clear(&mut self.scene);
        }
    }

    /// Clears a layer's output, drops its commands and frees the shader
    /// surfaces they owned.
    pub fn reset_layer(&mut self, name: &str) {
        if let Some(layer) = self.layers.get_mut(name) {
            layer.reset(&mut self.scene, &mut self.rasters);
        }
    }

    /// Applies a declarative description: view and size overrides first, then
    /// every command in order, then one full redraw.
    ///
    /// `blend` props are rewritten into a `mix-blend-mode` style. Stops at the
    /// first fatal error.
    pub fn init(&mut self, decl: GraphDecl) -> Result<(), GraphError> {
        if let Some(view) = decl.view {
            self.extent = view;
        }
        if let Some(size) = decl.size {
            self.size = size;
            self.apply_size();
        }

        for CommandDecl { layer, key, params, mut props } in decl.commands {
            props.take_blend();
            self.add(&layer, &key, params, props)?;
        }

        self.draw();
        Ok(())
    }

    /// Feeds one pointer event. Pans and redraws while dragging, and tracks
    /// the pointer's logical position.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerResponse {
        let response = self.pointer.handle(&event, &mut self.extent, self.size);
        if response.panned {
            self.draw();
        }

        match event {
            PointerEvent::Left => self.mouse = None,
            _ => {
                if let Some(position) = event.position() {
                    self.mouse = Some(self.to_logical(position));
                }
            }
        }
        response
    }

    /// Device position (relative to the output) to logical coordinates.
    pub fn to_logical(&self, position: Vec2) -> Vec2 {
        let t = position.unit_in(self.size);
        Vec2::new(self.extent.local_x(t.x), self.extent.local_y(t.y))
    }

    /// Renders one animation frame of every shader surface.
    pub fn tick(&mut self, time: &FrameTime) {
        self.time = time.elapsed;
        self.rasters.render_all(&ShaderUniforms::new(self.extent, self.time));
    }

    /// Serializes the vector output.
    pub fn to_svg(&self) -> String {
        write_svg(&self.scene, self.root)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}
