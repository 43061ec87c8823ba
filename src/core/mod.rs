//! # Core Module
//!
//! Shared-ownership handles and the dependency injection container used to wire
//! the terrain pipeline together at startup.
//!
//! ## Key Components
//! - `StResource`: Single-threaded reference-counted resource with interior mutability
//! - `InjectionSystem`: Type-keyed container that hands out `StResource` handles
//!
//! ## Usage
//! ```rust
//! use voxel_terrain::core::{injection_system::InjectionSystem, StResource};
//!
//! let counter = StResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//!
//! let injector = InjectionSystem::new();
//! injector.insert(42u32);
//! let value: u32 = *injector.get::<u32>().unwrap().get();
//! assert_eq!(value, 42);
//! ```

pub mod injection_system;
pub mod st_resource;

pub use st_resource::StResource;
