use std::collections::HashMap;

use crate::scene::{NodeId, Scene, Tag};

use super::command::Layer;

/// Layers by name, created on first use and kept in creation order.
///
/// Each new layer's group is inserted directly before the `sentinel` node
/// (the outer border), so later layers paint above earlier ones and the
/// border stays on top of all of them.
#[derive(Debug)]
pub struct LayerRegistry {
    root: NodeId,
    sentinel: NodeId,
    layers: Vec<Layer>,
    by_name: HashMap<String, usize>,
}

impl LayerRegistry {
    pub fn new(root: NodeId, sentinel: NodeId) -> Self {
        Self { root, sentinel, layers: Vec::new(), by_name: HashMap::new() }
    }

    /// Returns the layer called `name`, creating it when missing.
    pub fn get_or_create(&mut self, name: &str, scene: &mut Scene) -> &mut Layer {
        let idx = match self.by_name.get(name) {
            Some(&idx) => idx,
            None => {
                let g = scene.create(Tag::Group);
                scene.set_attr(g, "id", name);
                scene.insert_before(self.root, g, self.sentinel);
                log::debug!("layer \"{name}\" created");

                self.layers.push(Layer::new(name, g));
                self.by_name.insert(name.to_string(), self.layers.len() - 1);
                self.layers.len() - 1
            }
        };
        &mut self.layers[idx]
    }

    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.by_name.get(name).map(|&idx| &self.layers[idx])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.by_name.get(name).map(|&idx| &mut self.layers[idx])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Layer> {
        self.layers.iter_mut()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(Layer::name)
    }
}
