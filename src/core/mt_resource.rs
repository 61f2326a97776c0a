use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted handle to a shared value.
///
/// `MtResource` wraps an `Arc<RwLock<T>>`. Clones share the same value, so a
/// background task can hold one clone while the simulation thread holds
/// another.
///
/// # Publishing
///
/// A value built elsewhere (for example a freshly generated world) replaces the
/// current one with [`MtResource::publish`]. The swap happens under a single
/// write lock, so readers observe either the old value or the new one, never
/// anything in between.
///
/// # Examples
///
/// ```
/// use voxel_world::core::MtResource;
///
/// let counter = MtResource::new(0);
/// *counter.get_mut() += 1;
/// assert_eq!(*counter.get(), 1);
///
/// let old = counter.publish(10);
/// assert_eq!(old, 1);
/// assert_eq!(*counter.get(), 10);
/// ```
#[derive(Debug)]
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> MtResource<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read guard for the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap()
    }

    /// Returns a write guard for the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap()
    }

    /// Replaces the contained value in one step and returns the previous one.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn publish(&self, value: T) -> T {
        std::mem::replace(&mut *self.get_mut(), value)
    }

    /// Whether `other` is a handle to the same value.
    pub fn shares_with(&self, other: &MtResource<T>) -> bool {
        Arc::ptr_eq(&self.resource, &other.resource)
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clones_share_the_value_across_threads() {
        let shared = MtResource::new(vec![1, 2, 3]);
        let worker_handle = shared.clone();
        assert!(shared.shares_with(&worker_handle));

        thread::spawn(move || worker_handle.get_mut().push(4))
            .join()
            .unwrap();
        assert_eq!(*shared.get(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn publish_swaps_the_whole_value() {
        let shared = MtResource::new(String::from("old"));
        let reader = shared.clone();
        let previous = shared.publish(String::from("new"));
        assert_eq!(previous, "old");
        assert_eq!(*reader.get(), "new");
    }
}
