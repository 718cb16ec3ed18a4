//! Ordered, id-unique collection of [`BlockDescriptor`]s.
//!
//! The registry is built once at startup and read many times afterwards. It
//! owns every descriptor; other components only borrow from it. Registration
//! order is preserved and is the order in which blocks appear in selection
//! controls and on the page.

use indexmap::{IndexMap, IndexSet};
use thiserror::Error;
use tracing::debug;

use crate::model::{BlockDescriptor, Category};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("block id '{0}' is already registered")]
    DuplicateId(String),

    #[error("no block registered with id '{0}'")]
    NotFound(String),

    #[error("block '{id}' uses category '{category}' which this registry does not declare")]
    UndeclaredCategory { id: String, category: Category },

    #[error("unknown category '{0}'")]
    UnknownCategory(String),
}

/// Owner of all block descriptors.
#[derive(Debug, Clone)]
pub struct Registry {
    declared: IndexSet<Category>,
    blocks: IndexMap<String, BlockDescriptor>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Registry accepting every [`Category`], in their natural tab order.
    pub fn new() -> Self {
        Self::with_categories(Category::ALL)
    }

    /// Registry accepting only the given categories. Their order is the tab order.
    pub fn with_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            declared: categories.into_iter().collect(),
            blocks: IndexMap::new(),
        }
    }

    /// Add a descriptor. On error the registry is left untouched.
    pub fn register(&mut self, descriptor: BlockDescriptor) -> Result<(), RegistryError> {
        if self.blocks.contains_key(&descriptor.id) {
            return Err(RegistryError::DuplicateId(descriptor.id));
        }
        if !self.declared.contains(&descriptor.category) {
            return Err(RegistryError::UndeclaredCategory {
                id: descriptor.id,
                category: descriptor.category,
            });
        }
        debug!(
            id = %descriptor.id,
            category = %descriptor.category,
            kind = descriptor.content.kind_name(),
            "registered block"
        );
        self.blocks.insert(descriptor.id.clone(), descriptor);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&BlockDescriptor, RegistryError> {
        self.blocks
            .get(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// Like [`Registry::get`], but the block must also belong to `category`.
    pub fn get_in(&self, category: Category, id: &str) -> Result<&BlockDescriptor, RegistryError> {
        self.get(id)
            .ok()
            .filter(|d| d.category == category)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.blocks.contains_key(id)
    }

    /// Blocks of one category in registration order.
    ///
    /// The iterator is lazy and `Clone`, so callers can walk it more than once.
    /// A category without blocks yields nothing.
    pub fn list_by_category(
        &self,
        category: Category,
    ) -> impl Iterator<Item = &BlockDescriptor> + Clone + '_ {
        self.blocks.values().filter(move |d| d.category == category)
    }

    /// Categories that currently hold at least one block, in declared order.
    pub fn categories(&self) -> IndexSet<Category> {
        self.declared
            .iter()
            .copied()
            .filter(|c| self.blocks.values().any(|d| d.category == *c))
            .collect()
    }

    /// Categories this registry accepts, in tab order.
    pub fn declared_categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.declared.iter().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockDescriptor> + '_ {
        self.blocks.values()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Drop every descriptor, keeping the declared categories.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}
