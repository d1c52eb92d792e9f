//! In-memory catalog
//!
//! Keeps a set of known entity urns and the records emitted so far.
//! Emitting a record marks its entity as existing.

use std::cell::RefCell;
use std::collections::BTreeSet;

use super::{CatalogError, Emitter, EntityOracle};
use crate::models::ChangeRecord;

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    entities: RefCell<BTreeSet<String>>,
    emitted: RefCell<Vec<ChangeRecord>>,
    lookups: RefCell<Vec<String>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog that already knows the given urns
    pub fn with_entities<I, S>(urns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let catalog = Self::new();
        catalog
            .entities
            .borrow_mut()
            .extend(urns.into_iter().map(Into::into));
        catalog
    }

    pub fn insert(&self, urn: impl Into<String>) {
        self.entities.borrow_mut().insert(urn.into());
    }

    pub fn contains(&self, urn: &str) -> bool {
        self.entities.borrow().contains(urn)
    }

    /// Records emitted so far, in emission order
    pub fn emitted(&self) -> Vec<ChangeRecord> {
        self.emitted.borrow().clone()
    }

    /// Every urn passed to `exists`, in query order
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.borrow().clone()
    }
}

impl EntityOracle for InMemoryCatalog {
    fn exists(&self, urn: &str) -> Result<bool, CatalogError> {
        self.lookups.borrow_mut().push(urn.to_string());
        Ok(self.contains(urn))
    }
}

impl Emitter for InMemoryCatalog {
    fn emit(&self, record: &ChangeRecord) -> Result<(), CatalogError> {
        self.insert(record.entity_urn.clone());
        self.emitted.borrow_mut().push(record.clone());
        Ok(())
    }
}
