//! # Injection System
//!
//! An explicit dependency injection container configured at startup. Components
//! register a value once and any later consumer asks for it by type, receiving a
//! shared `StResource` handle to the same instance.
//!
//! ## Usage
//! ```rust
//! use voxel_terrain::core::injection_system::InjectionSystem;
//!
//! let injector = InjectionSystem::new();
//! let greeting = injector.insert("Hello".to_string());
//! greeting.get_mut().push_str(", world");
//!
//! let retrieved = injector.get::<String>().unwrap();
//! assert_eq!(retrieved.get().as_str(), "Hello, world");
//! ```

use super::StResource;
use log::debug;
use std::{
    any::{type_name, Any, TypeId},
    cell::RefCell,
    collections::HashMap,
    rc::Rc,
};

/// A single-threaded dependency injection container.
///
/// Lookups that miss return `None`; wiring code decides whether a missing
/// binding is optional or a configuration error.
#[derive(Default)]
pub struct InjectionSystem {
    systems: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
}

impl InjectionSystem {
    /// Creates a new, empty `InjectionSystem`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new system into the container.
    ///
    /// If a system of the same type already exists, it is replaced; handles to
    /// the previous instance stay valid but are no longer reachable through the
    /// container.
    ///
    /// # Returns
    /// An `StResource<T>` handle to the inserted system
    pub fn insert<T: 'static>(&self, system: T) -> StResource<T> {
        let resource = StResource::new(system);
        self.insert_resource(resource.clone());
        resource
    }

    /// Registers an existing shared handle under its type.
    pub fn insert_resource<T: 'static>(&self, resource: StResource<T>) {
        debug!("Registering {}", type_name::<T>());
        let erased: Rc<dyn Any> = resource.as_rc().clone();
        self.systems.borrow_mut().insert(TypeId::of::<T>(), erased);
    }

    /// Retrieves a system of type `T` from the container.
    ///
    /// # Returns
    /// `Some(StResource<T>)` if the system is registered, `None` otherwise
    pub fn get<T: 'static>(&self) -> Option<StResource<T>> {
        let erased = self.systems.borrow().get(&TypeId::of::<T>())?.clone();
        erased
            .downcast::<RefCell<T>>()
            .ok()
            .map(StResource::from_rc)
    }

    /// Returns true when a system of type `T` is registered.
    pub fn contains<T: 'static>(&self) -> bool {
        self.systems.borrow().contains_key(&TypeId::of::<T>())
    }
}
