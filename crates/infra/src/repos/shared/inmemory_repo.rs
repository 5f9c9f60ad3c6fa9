use nudge_domain::{Entity, ID};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Useful functions for creating inmemory repositories

pub fn lock<T>(collection: &Mutex<Vec<T>>) -> MutexGuard<'_, Vec<T>> {
    collection.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    lock(collection).push(val.clone());
}

pub fn find<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    lock(collection)
        .iter()
        .find(|item| item.id() == val_id)
        .cloned()
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(collection: &Mutex<Vec<T>>, mut compare: F) -> Vec<T> {
    lock(collection)
        .iter()
        .filter(|item| compare(item))
        .cloned()
        .collect()
}

/// Applies `update` to every item matching `compare` and returns how many were updated
pub fn update_many<T, F: Fn(&T) -> bool, U: Fn(&mut T)>(
    collection: &Mutex<Vec<T>>,
    compare: F,
    update: U,
) -> usize {
    let mut collection = lock(collection);
    let mut updated = 0;
    for item in collection.iter_mut().filter(|item| compare(item)) {
        update(item);
        updated += 1;
    }
    updated
}
