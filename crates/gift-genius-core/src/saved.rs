//! "Save for later" bookmarks.
//!
//! Membership is decided by [`Recommendation::same_gift`]: two gifts with the
//! same name and reason are the same bookmark even if their price ranges
//! differ.

use crate::error::Result;
use crate::model::Recommendation;
use crate::storage::{read_json_list, write_json_list, KeyValueStore, SAVED_KEY};

pub struct SavedItemsStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SavedItemsStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Saved gifts in the order they were saved.
    pub fn load(&self) -> Vec<Recommendation> {
        read_json_list(&self.store, SAVED_KEY)
    }

    pub fn is_saved(&self, gift: &Recommendation) -> bool {
        self.load().iter().any(|s| s.same_gift(gift))
    }

    /// Remove `gift` if it is saved, otherwise append it. Returns whether the
    /// gift is saved afterwards. A gift without a name or price range is
    /// rejected before anything is written.
    pub fn toggle(&self, gift: &Recommendation) -> Result<bool> {
        gift.validate()?;
        let mut items = self.load();
        let before = items.len();
        items.retain(|s| !s.same_gift(gift));
        let saved = items.len() == before;
        if saved {
            items.push(gift.clone());
        }
        write_json_list(&self.store, SAVED_KEY, &items)?;
        Ok(saved)
    }
}
