//! Arena scene graph.
//!
//! Panels are addressed by generational [`PanelId`]s. The arena stores an
//! [`Observer`] per slot, so it never keeps a panel alive: strong ownership
//! sits in the registry entry, or in the parent panel for nested children.
//! Parent/child links are ids, never references, and a link to a dead panel
//! simply stops resolving.

use std::cell::{Ref, RefMut};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tessera_core::{Handle, Observer, PanelId};

use crate::error::{SceneError, SceneResult};
use crate::layout::Vec2;
use crate::panel::{Panel, PanelKind};

static NEXT_SCENE: AtomicU64 = AtomicU64::new(1);

/// Identity of one scene; panels remember the scene that created them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneId(u64);

impl SceneId {
    fn next() -> Self {
        Self(NEXT_SCENE.fetch_add(1, Ordering::Relaxed))
    }

    /// Wraps a raw scene number.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene{}", self.0)
    }
}

#[derive(Default)]
struct Slot {
    panel: Observer<Panel>,
    generation: u32,
    occupied: bool,
    parent: PanelId,
    children: Vec<PanelId>,
}

/// Hierarchy of panels created by one UI context.
pub struct Scene {
    id: SceneId,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Scene {
    /// Creates an empty scene with a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SceneId::next(),
            slots: Vec::with_capacity(256),
            free: Vec::with_capacity(16),
        }
    }

    /// Identity of this scene.
    #[must_use]
    pub const fn id(&self) -> SceneId {
        self.id
    }

    /// Creates a panel. The returned handle is its only owner.
    #[allow(clippy::cast_possible_truncation)]
    pub fn create(&mut self, kind: PanelKind) -> Handle<Panel> {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };

        let slot = &mut self.slots[index as usize];
        let id = PanelId::new(index, slot.generation);
        let handle = Handle::new(Panel::new(id, self.id, kind));

        slot.panel = handle.observe();
        slot.occupied = true;
        slot.parent = PanelId::NULL;
        slot.children.clear();

        handle
    }

    fn slot(&self, id: PanelId) -> Option<&Slot> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.occupied && slot.generation == id.generation())
    }

    fn slot_mut(&mut self, id: PanelId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.occupied && slot.generation == id.generation())
    }

    /// Borrows a live panel.
    #[must_use]
    pub fn get(&self, id: PanelId) -> Option<Ref<'_, Panel>> {
        self.slot(id)?.panel.get()
    }

    /// Mutably borrows a live panel.
    #[must_use]
    pub fn get_mut(&self, id: PanelId) -> Option<RefMut<'_, Panel>> {
        self.slot(id)?.panel.get_mut()
    }

    /// Subscribes a new handle to a live panel (empty if it died).
    #[must_use]
    pub fn handle(&self, id: PanelId) -> Handle<Panel> {
        self.slot(id)
            .map_or_else(Handle::empty, |slot| slot.panel.upgrade())
    }

    /// Returns true if `id` names a live panel of this scene.
    #[must_use]
    pub fn contains(&self, id: PanelId) -> bool {
        self.slot(id).is_some_and(|slot| slot.panel.is_live())
    }

    /// Number of live panels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.occupied && slot.panel.is_live())
            .count()
    }

    /// Returns true if no panel is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn require(&self, id: PanelId) -> SceneResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(SceneError::UnknownPanel(id))
        }
    }

    fn unlink(&mut self, child: PanelId) -> PanelId {
        let Some(slot) = self.slot_mut(child) else {
            return PanelId::NULL;
        };
        let parent = std::mem::replace(&mut slot.parent, PanelId::NULL);

        if let Some(parent_slot) = self.slot_mut(parent) {
            parent_slot.children.retain(|&c| c != child);
        }
        parent
    }

    /// Links `child` under `parent` without transferring ownership.
    ///
    /// A child already linked elsewhere is moved; if its old parent owned
    /// it, the owning handle moves along to the new parent.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownPanel`] if either panel is dead,
    /// [`SceneError::Cycle`] if `child` is `parent` or one of its ancestors.
    pub fn attach(&mut self, parent: PanelId, child: PanelId) -> SceneResult<()> {
        self.require(parent)?;
        self.require(child)?;
        if parent == child || self.ancestors(parent).contains(&child) {
            return Err(SceneError::Cycle { parent, child });
        }

        let old_parent = self.unlink(child);
        let moved = self
            .get_mut(old_parent)
            .and_then(|mut old| old.take_owned(child));

        if let Some(slot) = self.slot_mut(child) {
            slot.parent = parent;
        }
        if let Some(slot) = self.slot_mut(parent) {
            slot.children.push(child);
        }
        if let (Some(handle), Some(mut panel)) = (moved, self.get_mut(parent)) {
            panel.push_owned(handle);
        }
        Ok(())
    }

    /// Links the panel behind `child` under `parent` and makes `parent` own it.
    ///
    /// # Errors
    ///
    /// [`SceneError::ForeignPanel`] if the panel was created by another
    /// scene, otherwise as [`Scene::attach`].
    pub fn adopt(&mut self, parent: PanelId, child: &Handle<Panel>) -> SceneResult<()> {
        let (child_id, child_scene) = child
            .get()
            .map(|panel| (panel.id(), panel.scene()))
            .ok_or(SceneError::UnknownPanel(PanelId::NULL))?;

        if child_scene != self.id {
            return Err(SceneError::ForeignPanel {
                expected: self.id,
                found: child_scene,
            });
        }

        self.attach(parent, child_id)?;

        if let Some(mut panel) = self.get_mut(parent) {
            if !panel.owned().iter().any(|owned| owned == child) {
                panel.push_owned(child.clone());
            }
        }
        Ok(())
    }

    /// Unlinks `child` from its parent, making it top-level.
    ///
    /// Returns the owning handle if the parent owned the child; dropping it
    /// destroys the child.
    pub fn detach(&mut self, child: PanelId) -> Option<Handle<Panel>> {
        let parent = self.unlink(child);
        self.get_mut(parent)?.take_owned(child)
    }

    /// Live parent of a panel.
    #[must_use]
    pub fn parent_of(&self, id: PanelId) -> Option<PanelId> {
        let parent = self.slot(id)?.parent;
        self.contains(parent).then_some(parent)
    }

    /// Returns true if the panel was linked under a parent that has since died.
    #[must_use]
    pub fn is_orphaned(&self, id: PanelId) -> bool {
        self.slot(id)
            .is_some_and(|slot| !slot.parent.is_null() && !self.contains(slot.parent))
    }

    /// Snapshot of the live children of a panel, in link order.
    #[must_use]
    pub fn children_of(&self, id: PanelId) -> Vec<PanelId> {
        self.slot(id).map_or_else(Vec::new, |slot| {
            slot.children
                .iter()
                .copied()
                .filter(|&child| self.contains(child))
                .collect()
        })
    }

    /// All live descendants, depth first, parents before children.
    #[must_use]
    pub fn descendants(&self, id: PanelId) -> Vec<PanelId> {
        let mut out = Vec::new();
        let mut stack: Vec<PanelId> = self.children_of(id).into_iter().rev().collect();

        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children_of(next).into_iter().rev());
        }
        out
    }

    fn ancestors(&self, id: PanelId) -> Vec<PanelId> {
        let mut out = Vec::new();
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            out.push(parent);
            current = self.parent_of(parent);
        }
        out
    }

    /// Screen position the panel's own `position` is relative to.
    ///
    /// Sums every ancestor's position net of its scroll translation.
    #[must_use]
    pub fn parent_origin(&self, id: PanelId) -> Vec2 {
        self.ancestors(id)
            .into_iter()
            .filter_map(|ancestor| self.get(ancestor).map(|p| p.position - p.translation))
            .fold(Vec2::ZERO, |origin, offset| origin + offset)
    }

    /// Screen position of a live panel.
    #[must_use]
    pub fn absolute_position(&self, id: PanelId) -> Option<Vec2> {
        let position = self.get(id)?.position;
        Some(self.parent_origin(id) + position)
    }

    /// Frees the slots of dead panels and bumps their generation.
    ///
    /// Returns the number of slots reclaimed.
    #[allow(clippy::cast_possible_truncation)]
    pub fn reclaim(&mut self) -> usize {
        let mut reclaimed = 0;

        for (index, slot) in self.slots.iter_mut().enumerate() {
            if !slot.occupied || slot.panel.is_live() {
                continue;
            }
            slot.panel = Observer::empty();
            slot.occupied = false;
            slot.generation = slot.generation.wrapping_add(1);
            slot.parent = PanelId::NULL;
            slot.children.clear();
            self.free.push(index as u32);
            reclaimed += 1;
        }

        if reclaimed > 0 {
            for index in 0..self.slots.len() {
                let children = std::mem::take(&mut self.slots[index].children);
                let live = children.into_iter().filter(|&c| self.contains(c)).collect();
                self.slots[index].children = live;
            }
            tracing::trace!(reclaimed, "scene slots reclaimed");
        }
        reclaimed
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("id", &self.id)
            .field("slots", &self.slots.len())
            .field("live", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(scene: &mut Scene, x: f32, y: f32) -> (PanelId, Handle<Panel>) {
        let handle = scene.create(PanelKind::Group);
        let id = {
            let mut panel = handle.get_mut().unwrap();
            panel.position = Vec2::new(x, y);
            panel.id()
        };
        (id, handle)
    }

    #[test]
    fn test_tree_hierarchy() {
        let mut scene = Scene::new();
        let (root, _root_h) = spawn(&mut scene, 0.0, 0.0);
        let (a, _a_h) = spawn(&mut scene, 0.0, 0.0);
        let (b, _b_h) = spawn(&mut scene, 0.0, 0.0);
        let (c, _c_h) = spawn(&mut scene, 0.0, 0.0);

        scene.attach(root, a).unwrap();
        scene.attach(root, b).unwrap();
        scene.attach(a, c).unwrap();

        assert_eq!(scene.children_of(root), vec![a, b]);
        assert_eq!(scene.descendants(root), vec![a, c, b]);
        assert_eq!(scene.parent_of(c), Some(a));
        assert_eq!(scene.parent_of(root), None);
    }

    #[test]
    fn test_arena_does_not_keep_panels_alive() {
        let mut scene = Scene::new();
        let (id, handle) = spawn(&mut scene, 0.0, 0.0);

        assert!(scene.contains(id));
        drop(handle);
        assert!(!scene.contains(id));
        assert!(scene.get(id).is_none());
    }

    #[test]
    fn test_reclaim_bumps_generation() {
        let mut scene = Scene::new();
        let (old, handle) = spawn(&mut scene, 0.0, 0.0);
        drop(handle);

        assert_eq!(scene.reclaim(), 1);
        let (new, _handle) = spawn(&mut scene, 0.0, 0.0);

        assert_eq!(old.index(), new.index());
        assert_ne!(old, new);
        assert!(!scene.contains(old));
        assert!(scene.contains(new));
    }

    #[test]
    fn test_attach_rejects_cycles() {
        let mut scene = Scene::new();
        let (a, _a) = spawn(&mut scene, 0.0, 0.0);
        let (b, _b) = spawn(&mut scene, 0.0, 0.0);
        scene.attach(a, b).unwrap();

        assert_eq!(scene.attach(b, a), Err(SceneError::Cycle { parent: b, child: a }));
        assert_eq!(scene.attach(a, a), Err(SceneError::Cycle { parent: a, child: a }));
    }

    #[test]
    fn test_reparent_moves_link() {
        let mut scene = Scene::new();
        let (a, _a) = spawn(&mut scene, 0.0, 0.0);
        let (b, _b) = spawn(&mut scene, 0.0, 0.0);
        let (c, _c) = spawn(&mut scene, 0.0, 0.0);

        scene.attach(a, c).unwrap();
        scene.attach(b, c).unwrap();

        assert!(scene.children_of(a).is_empty());
        assert_eq!(scene.children_of(b), vec![c]);
    }

    #[test]
    fn test_adopted_child_dies_with_parent() {
        let mut scene = Scene::new();
        let (parent, parent_h) = spawn(&mut scene, 0.0, 0.0);
        let child_h = scene.create(PanelKind::Frame);
        let child = child_h.get().unwrap().id();

        scene.adopt(parent, &child_h).unwrap();
        drop(child_h);
        assert!(scene.contains(child), "parent keeps the adopted child alive");

        drop(parent_h);
        assert!(!scene.contains(child));
    }

    #[test]
    fn test_detach_returns_owning_handle() {
        let mut scene = Scene::new();
        let (parent, _parent_h) = spawn(&mut scene, 0.0, 0.0);
        let child_h = scene.create(PanelKind::Frame);
        let child = child_h.get().unwrap().id();
        scene.adopt(parent, &child_h).unwrap();
        drop(child_h);

        let owner = scene.detach(child).unwrap();
        assert_eq!(scene.parent_of(child), None);
        drop(owner);
        assert!(!scene.contains(child));
    }

    #[test]
    fn test_adopt_rejects_foreign_panel() {
        let mut scene = Scene::new();
        let mut other = Scene::new();
        let (parent, _parent_h) = spawn(&mut scene, 0.0, 0.0);
        let stranger = other.create(PanelKind::Group);

        let result = scene.adopt(parent, &stranger);
        assert_eq!(
            result,
            Err(SceneError::ForeignPanel {
                expected: scene.id(),
                found: other.id(),
            })
        );
    }

    #[test]
    fn test_absolute_position_nets_translation() {
        let mut scene = Scene::new();
        let (root, _root_h) = spawn(&mut scene, 100.0, 50.0);
        let (child, _child_h) = spawn(&mut scene, 10.0, 10.0);
        scene.attach(root, child).unwrap();
        scene.get_mut(root).unwrap().translation = Vec2::new(0.0, 5.0);

        assert_eq!(scene.absolute_position(child), Some(Vec2::new(110.0, 55.0)));
        assert_eq!(scene.parent_origin(child), Vec2::new(100.0, 45.0));
    }

    #[test]
    fn test_orphan_detection() {
        let mut scene = Scene::new();
        let (parent, parent_h) = spawn(&mut scene, 0.0, 0.0);
        let (child, _child_h) = spawn(&mut scene, 0.0, 0.0);
        scene.attach(parent, child).unwrap();

        assert!(!scene.is_orphaned(child));
        drop(parent_h);
        assert!(scene.is_orphaned(child));
        assert_eq!(scene.parent_of(child), None);
    }
}
