//! Process catalog read contract
//!
//! The catalog is the read-only pool of process definitions an operator
//! selects from when composing a flow. It is an external collaborator:
//! this module owns only its boundary trait plus an in-memory
//! implementation for tests and embedding.

use crate::errors::FlowResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A reusable manufacturing step as described by the catalog
///
/// Immutable from the composer's perspective. Fields are copied into a
/// flow step at insertion time; later catalog edits never propagate to
/// already-inserted steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDefinition {
    /// Process code, unique within the catalog
    pub code: String,
    /// Human-readable process name
    pub name: String,
    /// Whether this process drives or is driven by automated equipment
    pub equipment_integrated: bool,
    /// Display ordering hint within the catalog
    pub catalog_sort_order: Option<u32>,
}

impl ProcessDefinition {
    /// Create a definition with no catalog ordering hint
    pub fn new(code: impl Into<String>, name: impl Into<String>, equipment_integrated: bool) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            equipment_integrated,
            catalog_sort_order: None,
        }
    }

    /// Set the catalog ordering hint
    pub fn with_sort_order(mut self, order: u32) -> Self {
        self.catalog_sort_order = Some(order);
        self
    }
}

/// Filter criteria for listing process definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Substring match against process code or name, case-insensitive
    pub search: Option<String>,
    /// Zero-based page index
    pub page: usize,
    /// Page size; pages never exceed this many items
    pub page_size: usize,
}

impl CatalogFilter {
    /// Create a filter for the first page with the default page size
    pub fn new() -> Self {
        Self {
            search: None,
            page: 0,
            page_size: 50,
        }
    }

    /// Set the search term
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Select a specific page
    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// One page of catalog results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPage {
    /// Definitions on this page, in catalog order
    pub items: Vec<ProcessDefinition>,
    /// Total number of definitions matching the filter across all pages
    pub total: usize,
}

/// Read contract over the process catalog
///
/// Paged and filterable; no mutation path is exposed to the composer.
#[async_trait]
pub trait ProcessCatalog: Send + Sync {
    /// List process definitions matching the filter
    async fn list_process_definitions(&self, filter: &CatalogFilter) -> FlowResult<CatalogPage>;
}

/// In-memory catalog for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct InMemoryProcessCatalog {
    definitions: Vec<ProcessDefinition>,
}

impl InMemoryProcessCatalog {
    /// Create a catalog over a fixed set of definitions
    pub fn new(definitions: Vec<ProcessDefinition>) -> Self {
        Self { definitions }
    }

    fn matches(definition: &ProcessDefinition, search: &str) -> bool {
        let needle = search.to_lowercase();
        definition.code.to_lowercase().contains(&needle)
            || definition.name.to_lowercase().contains(&needle)
    }
}

#[async_trait]
impl ProcessCatalog for InMemoryProcessCatalog {
    async fn list_process_definitions(&self, filter: &CatalogFilter) -> FlowResult<CatalogPage> {
        let mut matching: Vec<ProcessDefinition> = self
            .definitions
            .iter()
            .filter(|d| match &filter.search {
                Some(search) => Self::matches(d, search),
                None => true,
            })
            .cloned()
            .collect();

        // Catalog order: explicit sort hints first, then code.
        matching.sort_by(|a, b| match (a.catalog_sort_order, b.catalog_sort_order) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.code.cmp(&b.code)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.code.cmp(&b.code),
        });

        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(filter.page * filter.page_size)
            .take(filter.page_size)
            .collect();

        Ok(CatalogPage { items, total })
    }
}
