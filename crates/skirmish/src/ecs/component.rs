//! # Component: Type-Erased, Per-Entity Storage
//!
//! Components are typed fragments of data (and optionally per-frame behavior)
//! attached to exactly one entity. The entity doesn't know at compile time
//! which kinds it carries, so each one keeps a [`ComponentStore`]: an ordered
//! `Vec` of boxed trait objects.
//!
//! ## Lookup by kind
//!
//! `get::<T>()` walks the store in insertion order and returns the first
//! component that downcasts to `T`. Duplicate kinds are permitted; the first
//! one attached wins.
//!
//! ## Storage
//!
//! Each component is boxed and recovered via `downcast_ref`/`downcast_mut`
//! through the [`AsAny`] upcast. No unsafe code is involved.

use std::any::Any;
use std::fmt;

/// Upcast helper so any `'static` type can be viewed as `dyn Any`.
///
/// Blanket-implemented; component authors never implement this by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A piece of data attached to an entity.
///
/// Implementors that need per-frame work override [`update`](Component::update);
/// the registry calls it once per frame for every component of every active
/// entity, in insertion order. The default does nothing.
pub trait Component: AsAny + fmt::Debug {
    fn update(&mut self, _elapsed: f32) {}
}

/// Ordered collection of the components owned by one entity.
#[derive(Default)]
pub struct ComponentStore {
    items: Vec<Box<dyn Component>>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a component at the end of the store.
    pub fn push<C: Component>(&mut self, component: C) {
        self.items.push(Box::new(component));
    }

    /// First component of kind `C`, in insertion order.
    pub fn get<C: Component>(&self) -> Option<&C> {
        self.items
            .iter()
            .find_map(|c| (**c).as_any().downcast_ref::<C>())
    }

    /// Mutable access to the first component of kind `C`.
    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.items
            .iter_mut()
            .find_map(|c| (**c).as_any_mut().downcast_mut::<C>())
    }

    pub fn has<C: Component>(&self) -> bool {
        self.get::<C>().is_some()
    }

    /// Run every component's update hook, in insertion order.
    pub fn update_all(&mut self, elapsed: f32) {
        for component in &mut self.items {
            component.update(elapsed);
        }
    }

    /// Iterate all components as trait objects, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Component> {
        self.items.iter().map(|c| &**c)
    }

    /// Number of components stored.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Debug for ComponentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}
