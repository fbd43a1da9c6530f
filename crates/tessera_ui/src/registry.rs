//! # Element Registry
//!
//! The single source of truth binding element ids to panels, and the
//! paint/hit-test order between them.
//!
//! - Every insertion takes the next draw order; values are never reused.
//! - Paint walks draw orders ascending (back to front), hit testing
//!   descending (front to back).
//! - Entries whose panel died are pruned by the next traversal; there is no
//!   separate cleanup pass. Traversals work on snapshots, so a panel dying
//!   mid-walk never invalidates the walk.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use tessera_core::{Handle, PanelId, StringId};

use crate::error::{RegistryError, RegistryResult};
use crate::panel::Panel;
use crate::scene::Scene;
use crate::skin::Skin;

/// Paint and hit-test priority; higher is in front.
pub type DrawOrder = u64;

struct RegistryEntry {
    handle: Handle<Panel>,
    draw_order: DrawOrder,
}

/// Snapshot of one registered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredElement {
    /// Registry id.
    pub id: StringId,
    /// Arena id of the panel.
    pub panel: PanelId,
    /// Insertion order.
    pub draw_order: DrawOrder,
}

/// Id to panel bindings with z-order.
pub struct ElementRegistry {
    entries: HashMap<StringId, RegistryEntry>,
    order: BTreeMap<DrawOrder, StringId>,
    draw_order_counter: DrawOrder,
    skin: Rc<Skin>,
}

impl ElementRegistry {
    /// Creates an empty registry with an empty skin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::with_capacity(64),
            order: BTreeMap::new(),
            draw_order_counter: 0,
            skin: Rc::new(Skin::new()),
        }
    }

    /// Binds `id` to the panel behind `handle`.
    ///
    /// On success the panel gets the next draw order, its element id and the
    /// active skin (applied to its nested children too).
    ///
    /// # Errors
    ///
    /// - [`RegistryError::DuplicateElement`] if `id` is bound to a live panel
    /// - [`RegistryError::EmptyHandle`] if `handle` observes nothing
    /// - [`RegistryError::ForeignElement`] if the panel was created by
    ///   another scene than `scene`
    /// - [`RegistryError::AlreadyRegistered`] if the panel is bound under
    ///   another id
    #[must_use = "a rejected element is dropped and destroyed"]
    pub fn insert(
        &mut self,
        id: StringId,
        handle: Handle<Panel>,
        scene: &Scene,
    ) -> RegistryResult<DrawOrder> {
        if let Some(existing) = self.entries.get(&id) {
            if existing.handle.is_live() {
                tracing::warn!(element = %id, "insert rejected: id already registered");
                return Err(RegistryError::DuplicateElement(id));
            }
            self.erase(id);
        }

        let (panel_id, panel_scene, bound_as) = {
            let Some(panel) = handle.get() else {
                tracing::warn!(element = %id, "insert rejected: empty handle");
                return Err(RegistryError::EmptyHandle(id));
            };
            (panel.id(), panel.scene(), panel.element_id())
        };

        if panel_scene != scene.id() {
            tracing::warn!(element = %id, found = %panel_scene, "insert rejected: foreign element");
            return Err(RegistryError::ForeignElement {
                element: id,
                expected: scene.id(),
                found: panel_scene,
            });
        }

        if let Some(existing) = bound_as {
            let bound = self
                .entries
                .get(&existing)
                .is_some_and(|entry| entry.handle.is_live() && entry.handle.same_cell(&handle));
            if bound {
                tracing::warn!(element = %id, %existing, "insert rejected: panel already registered");
                return Err(RegistryError::AlreadyRegistered { element: id, existing });
            }
        }

        self.draw_order_counter += 1;
        let draw_order = self.draw_order_counter;

        if let Some(mut panel) = handle.get_mut() {
            panel.set_element_id(id);
        }
        apply_skin_tree(&self.skin, panel_id, scene);

        self.entries.insert(id, RegistryEntry { handle, draw_order });
        self.order.insert(draw_order, id);

        tracing::debug!(element = %id, panel = %panel_id, draw_order, "element registered");
        Ok(draw_order)
    }

    /// Disposes the element bound to `id` and erases the binding.
    ///
    /// Registered descendants of the panel go with it. Returns false if
    /// nothing was bound.
    pub fn remove(&mut self, id: StringId, scene: &Scene) -> bool {
        let Some(mut entry) = self.erase(id) else {
            return false;
        };
        entry.handle.dispose();
        tracing::debug!(element = %id, "element removed");

        self.prune(scene);
        true
    }

    fn erase(&mut self, id: StringId) -> Option<RegistryEntry> {
        let entry = self.entries.remove(&id)?;
        self.order.remove(&entry.draw_order);
        Some(entry)
    }

    /// Handle to the element bound to `id`, or an empty handle.
    #[must_use]
    pub fn lookup(&self, id: StringId) -> Handle<Panel> {
        self.entries
            .get(&id)
            .map_or_else(Handle::empty, |entry| entry.handle.clone())
    }

    /// Returns true if `id` is bound to a live panel.
    #[must_use]
    pub fn contains(&self, id: StringId) -> bool {
        self.entries.get(&id).is_some_and(|entry| entry.handle.is_live())
    }

    /// Draw order of a live element.
    #[must_use]
    pub fn draw_order_of(&self, id: StringId) -> Option<DrawOrder> {
        self.entries
            .get(&id)
            .filter(|entry| entry.handle.is_live())
            .map(|entry| entry.draw_order)
    }

    /// Number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().filter(|entry| entry.handle.is_live()).count()
    }

    /// Returns true if no live element is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops bindings whose panel died, and disposes registered panels whose
    /// parent died.
    ///
    /// Repeats until stable, so a whole registered subtree goes at once.
    /// Returns the number of bindings dropped.
    pub fn prune(&mut self, scene: &Scene) -> usize {
        let mut pruned = 0;

        loop {
            let stale: Vec<StringId> = self
                .entries
                .iter()
                .filter(|(_, entry)| match entry.handle.get() {
                    None => true,
                    Some(panel) => scene.is_orphaned(panel.id()),
                })
                .map(|(&id, _)| id)
                .collect();

            if stale.is_empty() {
                break;
            }
            for id in stale {
                if let Some(mut entry) = self.erase(id) {
                    entry.handle.dispose();
                    pruned += 1;
                }
            }
        }

        if pruned > 0 {
            tracing::trace!(pruned, "registry pruned");
        }
        pruned
    }

    fn snapshot<'a>(
        &'a self,
        orders: impl Iterator<Item = (&'a DrawOrder, &'a StringId)>,
    ) -> Vec<RegisteredElement> {
        orders
            .filter_map(|(&draw_order, &id)| {
                let panel = self.entries.get(&id)?.handle.get()?.id();
                Some(RegisteredElement {
                    id,
                    panel,
                    draw_order,
                })
            })
            .collect()
    }

    /// Live elements, back to front.
    #[must_use]
    pub fn paint_order(&self) -> Vec<RegisteredElement> {
        self.snapshot(self.order.iter())
    }

    /// Live elements, front to back.
    #[must_use]
    pub fn hit_order(&self) -> Vec<RegisteredElement> {
        self.snapshot(self.order.iter().rev())
    }

    /// The blocking element with the highest draw order, if any.
    #[must_use]
    pub fn modal(&self) -> Option<RegisteredElement> {
        self.hit_order().into_iter().find(|element| {
            self.entries
                .get(&element.id)
                .and_then(|entry| entry.handle.get().map(|panel| panel.blocks_input()))
                .unwrap_or(false)
        })
    }

    /// Active skin.
    #[must_use]
    pub fn skin(&self) -> &Rc<Skin> {
        &self.skin
    }

    /// Replaces the skin and re-applies it to every live element and its
    /// nested children.
    pub fn set_skin(&mut self, skin: Rc<Skin>, scene: &Scene) {
        self.skin = skin;
        for element in self.paint_order() {
            apply_skin_tree(&self.skin, element.panel, scene);
        }
        tracing::debug!(elements = self.entries.len(), "skin changed");
    }

    /// Disposes every element and empties the registry.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        for (_, mut entry) in self.entries.drain() {
            entry.handle.dispose();
        }
        self.order.clear();
        tracing::debug!(count, "registry cleared");
    }
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_skin_tree(skin: &Rc<Skin>, root: PanelId, scene: &Scene) {
    for id in std::iter::once(root).chain(scene.descendants(root)) {
        if let Some(mut panel) = scene.get_mut(id) {
            panel.apply_skin(skin);
        }
    }
}
