use agenda_domain::{Entity, ID};
use std::sync::Mutex;

/// Useful functions for creating inmemory repositories

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    collection.push(val.clone());
}

pub fn save<T: Clone + Entity>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    save_locked(val, &mut collection);
}

/// Same as `save` but for a collection that is already locked
pub fn save_locked<T: Clone + Entity>(val: &T, collection: &mut Vec<T>) {
    for item in collection.iter_mut() {
        if item.id() == val.id() {
            *item = val.clone();
        }
    }
}

pub fn find<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let collection = collection.lock().unwrap();
    collection.iter().find(|item| item.id() == val_id).cloned()
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(
    collection: &Mutex<Vec<T>>,
    mut compare: F,
) -> Vec<T> {
    let collection = collection.lock().unwrap();
    collection.iter().filter(|item| compare(item)).cloned().collect()
}

pub fn delete<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let mut collection = collection.lock().unwrap();
    let index = collection.iter().position(|item| item.id() == val_id)?;
    Some(collection.remove(index))
}

pub fn find_and_delete_by<T: Clone, F: Fn(&T) -> bool>(
    collection: &Mutex<Vec<T>>,
    compare: F,
) -> Vec<T> {
    let mut collection = collection.lock().unwrap();
    find_and_delete_by_locked(&mut collection, compare)
}

/// Same as `find_and_delete_by` but for a collection that is already locked
pub fn find_and_delete_by_locked<T, F: Fn(&T) -> bool>(collection: &mut Vec<T>, compare: F) -> Vec<T> {
    let mut deleted_items = Vec::new();
    let mut index = 0;
    while index < collection.len() {
        if compare(&collection[index]) {
            deleted_items.push(collection.remove(index));
        } else {
            index += 1;
        }
    }
    deleted_items
}

/// Applies `update` to every item matching `compare` and returns how many were updated
pub fn update_many<T, F: Fn(&T) -> bool, U: Fn(&mut T)>(
    collection: &Mutex<Vec<T>>,
    compare: F,
    update: U,
) -> usize {
    let mut collection = collection.lock().unwrap();
    let mut updated = 0;
    for item in collection.iter_mut().filter(|item| compare(item)) {
        update(item);
        updated += 1;
    }
    updated
}
