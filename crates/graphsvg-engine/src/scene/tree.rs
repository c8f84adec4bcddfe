use super::NodeId;

/// Element kind. Names match the SVG element each one serializes to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Tag {
    Svg,
    Group,
    Line,
    Polyline,
    Circle,
    Text,
    Rect,
}

impl Tag {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Tag::Svg => "svg",
            Tag::Group => "g",
            Tag::Line => "line",
            Tag::Polyline => "polyline",
            Tag::Circle => "circle",
            Tag::Text => "text",
            Tag::Rect => "rect",
        }
    }
}

/// A single element: tag, attributes in insertion order, optional text content
/// and child handles in paint order (first child is drawn first).
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: Tag,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Element {
    fn new(tag: Tag) -> Self {
        Self { tag, attrs: Vec::new(), text: None, children: Vec::new(), parent: None }
    }

    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    #[inline]
    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// Arena-backed element tree.
///
/// Performance characteristics:
/// - `create()` is O(1) and reuses freed slots
/// - `clear_children()` is O(subtree)
/// - attribute lookup is a linear scan (elements carry a handful of attributes)
///
/// Operations on stale handles are ignored and logged at debug level; a stale
/// handle only arises when a caller holds on to a node across a layer clear.
#[derive(Debug, Default)]
pub struct Scene {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    live: usize,
}

impl Scene {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Creates a detached element and returns its handle.
    pub fn create(&mut self, tag: Tag) -> NodeId {
        self.live += 1;
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.element = Some(Element::new(tag));
            return NodeId { idx, generation: slot.generation };
        }

        let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot { generation: 0, element: Some(Element::new(tag)) });
        NodeId { idx, generation: 0 }
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.slots
            .get(id.idx as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.element.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.slots
            .get_mut(id.idx as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.element.as_mut())
    }

    #[inline]
    pub fn tag(&self, id: NodeId) -> Option<Tag> {
        self.get(id).map(Element::tag)
    }

    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.get(id).and_then(|el| el.attr(key))
    }

    /// Returns the children of `id`, or an empty slice for a stale handle.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Element::children).unwrap_or(&[])
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, id: NodeId, key: &str, value: impl ToString) {
        let Some(el) = self.get_mut(id) else {
            log::debug!("set_attr({key}) on stale {id:?}");
            return;
        };
        let value = value.to_string();
        match el.attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => el.attrs.push((key.to_string(), value)),
        }
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        match self.get_mut(id) {
            Some(el) => el.text = Some(text.into()),
            None => log::debug!("set_text on stale {id:?}"),
        }
    }

    /// Appends `child` as the last child of `parent`, detaching it first if it
    /// already has a parent.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.insert_at(parent, child, None);
    }

    /// Inserts `child` immediately before `reference` among `parent`'s children.
    /// Falls back to appending when `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.insert_at(parent, child, Some(reference));
    }

    fn insert_at(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            log::debug!("insert of {child:?} into {parent:?} ignored");
            return;
        }
        self.detach(child);

        if let Some(el) = self.get_mut(child) {
            el.parent = Some(parent);
        }
        if let Some(el) = self.get_mut(parent) {
            let pos = reference
                .and_then(|r| el.children.iter().position(|&c| c == r))
                .unwrap_or(el.children.len());
            el.children.insert(pos, child);
        }
    }

    fn detach(&mut self, child: NodeId) {
        let Some(old_parent) = self.get(child).and_then(Element::parent) else { return };
        if let Some(el) = self.get_mut(old_parent) {
            el.children.retain(|&c| c != child);
        }
        if let Some(el) = self.get_mut(child) {
            el.parent = None;
        }
    }

    /// Frees every descendant of `id`, leaving `id` itself in place and empty.
    pub fn clear_children(&mut self, id: NodeId) {
        let Some(el) = self.get_mut(id) else {
            log::debug!("clear_children on stale {id:?}");
            return;
        };
        let children = std::mem::take(&mut el.children);
        for child in children {
            self.free_subtree(child);
        }
    }

    fn free_subtree(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(slot) = self.slots.get_mut(id.idx as usize) else { continue };
            if slot.generation != id.generation {
                continue;
            }
            if let Some(el) = slot.element.take() {
                stack.extend(el.children);
                self.free_list.push(id.idx);
                self.live -= 1;
            }
        }
    }

    /// Pre-order walk of the descendants of `id` (excluding `id`).
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_paint_order() {
        let mut scene = Scene::new();
        let root = scene.create(Tag::Svg);
        let a = scene.create(Tag::Line);
        let b = scene.create(Tag::Circle);
        scene.append(root, a);
        scene.append(root, b);
        assert_eq!(scene.children(root), &[a, b]);
        assert_eq!(scene.get(a).and_then(Element::parent), Some(root));
    }

    #[test]
    fn insert_before_places_ahead_of_reference() {
        let mut scene = Scene::new();
        let root = scene.create(Tag::Svg);
        let bounds = scene.create(Tag::Rect);
        scene.append(root, bounds);
        let first = scene.create(Tag::Group);
        let second = scene.create(Tag::Group);
        scene.insert_before(root, first, bounds);
        scene.insert_before(root, second, bounds);
        assert_eq!(scene.children(root), &[first, second, bounds]);
    }

    #[test]
    fn set_attr_replaces_in_place() {
        let mut scene = Scene::new();
        let line = scene.create(Tag::Line);
        scene.set_attr(line, "x1", 1.5);
        scene.set_attr(line, "stroke", "black");
        scene.set_attr(line, "x1", 2);
        let el = scene.get(line).unwrap();
        assert_eq!(el.attrs()[0], ("x1".to_string(), "2".to_string()));
        assert_eq!(el.attrs().len(), 2);
    }

    #[test]
    fn clear_children_frees_subtree_and_stales_handles() {
        let mut scene = Scene::new();
        let root = scene.create(Tag::Svg);
        let g = scene.create(Tag::Group);
        let line = scene.create(Tag::Line);
        scene.append(root, g);
        scene.append(g, line);
        assert_eq!(scene.len(), 3);

        scene.clear_children(root);
        assert_eq!(scene.len(), 1);
        assert!(scene.children(root).is_empty());
        assert!(!scene.contains(g));
        assert!(!scene.contains(line));

        // Recycled slot gets a fresh generation.
        let reused = scene.create(Tag::Text);
        assert!(scene.contains(reused));
        assert!(!scene.contains(g) && !scene.contains(line));
    }

    #[test]
    fn descendants_walks_pre_order() {
        let mut scene = Scene::new();
        let root = scene.create(Tag::Svg);
        let g = scene.create(Tag::Group);
        let c = scene.create(Tag::Circle);
        let t = scene.create(Tag::Text);
        let l = scene.create(Tag::Line);
        scene.append(root, g);
        scene.append(g, c);
        scene.append(g, t);
        scene.append(root, l);
        assert_eq!(scene.descendants(root), vec![g, c, t, l]);
    }

    #[test]
    fn reparenting_detaches_from_old_parent() {
        let mut scene = Scene::new();
        let a = scene.create(Tag::Group);
        let b = scene.create(Tag::Group);
        let c = scene.create(Tag::Line);
        scene.append(a, c);
        scene.append(b, c);
        assert!(scene.children(a).is_empty());
        assert_eq!(scene.children(b), &[c]);
    }
}
