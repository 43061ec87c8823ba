use std::{
    cell::{Ref, RefCell, RefMut},
    fmt,
    rc::Rc,
};

/// A single-threaded, reference-counted resource with interior mutability.
///
/// Everything the control loop shares between collaborators (the task manager,
/// the chunk file loader, configuration) lives behind one of these. The world
/// streamer, the generator provider and the engine state each hold a clone, and
/// all of them run on the same thread.
///
/// # Examples
/// ```
/// use voxel_terrain::core::StResource;
///
/// let resource = StResource::new(vec![1, 2, 3]);
/// let clone = resource.clone();
///
/// clone.get_mut().push(4);
/// assert_eq!(resource.get().len(), 4);
/// ```
///
/// # Panics
/// Borrowing mutably while another borrow of the same resource is alive panics,
/// the same as `RefCell`.
pub struct StResource<T> {
    resource: Rc<RefCell<T>>,
}

impl<T> StResource<T> {
    /// Creates a new `StResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Rc::new(RefCell::new(resource)),
        }
    }

    /// Wraps an already shared cell.
    pub(crate) fn from_rc(resource: Rc<RefCell<T>>) -> Self {
        Self { resource }
    }

    /// Returns the shared cell, used by the injection system for type erasure.
    pub(crate) fn as_rc(&self) -> &Rc<RefCell<T>> {
        &self.resource
    }

    /// Returns a read-only borrow of the contained value.
    pub fn get(&self) -> Ref<'_, T> {
        self.resource.borrow()
    }

    /// Returns a mutable borrow of the contained value.
    pub fn get_mut(&self) -> RefMut<'_, T> {
        self.resource.borrow_mut()
    }

    /// Returns true when both handles point at the same resource.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.resource, &other.resource)
    }
}

impl<T> Clone for StResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StResource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resource.try_borrow() {
            Ok(resource) => f.debug_tuple("StResource").field(&*resource).finish(),
            Err(_) => f.write_str("StResource(<borrowed>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let resource = StResource::new(1);
        let clone = resource.clone();
        *clone.get_mut() += 41;
        assert_eq!(*resource.get(), 42);
        assert!(resource.ptr_eq(&clone));
    }

    #[test]
    fn test_distinct_resources_are_not_equal() {
        let a = StResource::new(1);
        let b = StResource::new(1);
        assert!(!a.ptr_eq(&b));
    }
}
