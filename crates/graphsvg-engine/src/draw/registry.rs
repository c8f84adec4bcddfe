use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::error::DrawError;

use super::frame::{DrawTarget, Handle, RenderFrame};
use super::params::{Param, Props};
use super::primitives;

/// Signature shared by every primitive.
pub type Primitive =
    Rc<dyn Fn(&mut DrawTarget<'_>, &RenderFrame, &[Param], &Props) -> Result<Option<Handle>, DrawError>>;

/// Name → primitive table shared by every layer of a graph.
#[derive(Clone)]
pub struct PrimitiveRegistry {
    entries: BTreeMap<String, Primitive>,
}

impl PrimitiveRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self { entries: BTreeMap::new() }
    }

    /// Registry preloaded with the built-in primitives.
    pub fn with_defaults() -> Self {
        let mut reg = Self::empty();
        reg.register("lineX", primitives::line_x);
        reg.register("lineY", primitives::line_y);
        reg.register("grid", primitives::grid);
        reg.register("func", primitives::func);
        reg.register("point", primitives::point);
        reg.register("shader", primitives::shader);
        reg
    }

    /// Adds or replaces a primitive.
    pub fn register<F>(&mut self, key: impl Into<String>, primitive: F)
    where
        F: Fn(&mut DrawTarget<'_>, &RenderFrame, &[Param], &Props) -> Result<Option<Handle>, DrawError> + 'static,
    {
        self.entries.insert(key.into(), Rc::new(primitive));
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Primitive> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Runs `key` against `frame`. The one place layers and the graph call
    /// primitives through.
    pub fn invoke(
        &self,
        key: &str,
        target: &mut DrawTarget<'_>,
        frame: &RenderFrame,
        params: &[Param],
        props: &Props,
    ) -> Result<Option<Handle>, DrawError> {
        let primitive = self.entries.get(key).ok_or_else(|| DrawError::Unknown { key: key.to_string() })?;
        primitive(target, frame, params, props)
    }
}

impl Default for PrimitiveRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for PrimitiveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{DeviceSize, Extent};
    use crate::scene::{Scene, Tag};
    use crate::shader::RasterStack;

    #[test]
    fn defaults_are_registered() {
        let reg = PrimitiveRegistry::with_defaults();
        let keys: Vec<_> = reg.keys().collect();
        assert_eq!(keys, vec!["func", "grid", "lineX", "lineY", "point", "shader"]);
    }

    #[test]
    fn invoke_unknown_key_is_an_error() {
        let reg = PrimitiveRegistry::with_defaults();
        let mut scene = Scene::new();
        let mut rasters = RasterStack::new();
        let root = scene.create(Tag::Svg);
        let frame = RenderFrame::new(root, Extent::new(0.0, 0.0, 1.0, 1.0), DeviceSize::new(1, 1), None);
        let err = reg
            .invoke("nonexistent", &mut DrawTarget::new(&mut scene, &mut rasters), &frame, &[], &Props::new())
            .unwrap_err();
        assert_eq!(err, DrawError::Unknown { key: "nonexistent".into() });
    }

    #[test]
    fn registered_primitive_is_invoked() {
        let mut reg = PrimitiveRegistry::empty();
        reg.register("dot", |target: &mut DrawTarget<'_>, frame: &RenderFrame, _: &[Param], _: &Props| {
            let id = target.scene.create(Tag::Circle);
            target.scene.append(frame.container, id);
            Ok(Some(Handle::Node(id)))
        });

        let mut scene = Scene::new();
        let mut rasters = RasterStack::new();
        let root = scene.create(Tag::Svg);
        let frame = RenderFrame::new(root, Extent::new(0.0, 0.0, 1.0, 1.0), DeviceSize::new(1, 1), None);
        let handle = reg
            .invoke("dot", &mut DrawTarget::new(&mut scene, &mut rasters), &frame, &[], &Props::new())
            .unwrap();
        assert_eq!(scene.children(root).len(), 1);
        assert_eq!(handle.and_then(Handle::node), Some(scene.children(root)[0]));
    }
}
