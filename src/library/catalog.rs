//! Resource catalog and its category/search filter.
//!
//! The catalog is built once per session (from the seed set, a JSON file or
//! a store fetch) and only read afterwards, so shared `&` access is all the
//! presentation layer needs.

use std::convert::Infallible;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use super::resource::{Category, Resource, ResourceId};

/// Category tab selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelector {
    /// No category constraint
    #[default]
    All,

    /// Exactly one category
    Only(Category),

    /// A category name outside the known set; matches nothing
    Unknown(String),
}

impl CategorySelector {
    /// Whether a resource in `category` passes this selector
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategorySelector::All => true,
            CategorySelector::Only(selected) => *selected == category,
            CategorySelector::Unknown(_) => false,
        }
    }

    /// The category to constrain on, if any
    pub fn category(&self) -> Option<Category> {
        match self {
            CategorySelector::Only(category) => Some(*category),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategorySelector::All => "all",
            CategorySelector::Only(category) => category.as_str(),
            CategorySelector::Unknown(name) => name,
        }
    }
}

impl From<Category> for CategorySelector {
    fn from(category: Category) -> Self {
        CategorySelector::Only(category)
    }
}

impl FromStr for CategorySelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(CategorySelector::All);
        }
        Ok(match s.parse::<Category>() {
            Ok(category) => CategorySelector::Only(category),
            Err(_) => CategorySelector::Unknown(s.to_string()),
        })
    }
}

impl fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category tab as presented to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTab {
    pub selector: CategorySelector,
    pub label: &'static str,
}

/// Filter state for one render of the library list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LibraryQuery {
    pub category: CategorySelector,
    pub text: String,
}

impl LibraryQuery {
    pub fn new(category: CategorySelector, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
        }
    }

    /// New state with a different category tab selected
    pub fn with_category(&self, category: CategorySelector) -> Self {
        Self {
            category,
            text: self.text.clone(),
        }
    }

    /// New state with different search text
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            category: self.category.clone(),
            text: text.into(),
        }
    }

    /// Evaluate this query against a catalog
    pub fn apply<'a>(&self, catalog: &'a ResourceCatalog) -> Matches<'a> {
        catalog.filter(self.category.clone(), &self.text)
    }
}

/// Lazy, restartable iterator over the resources matching a filter.
///
/// Clone it to walk the same result again.
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    items: std::slice::Iter<'a, Resource>,
    category: CategorySelector,
    needle: String,
}

impl<'a> Iterator for Matches<'a> {
    type Item = &'a Resource;

    fn next(&mut self) -> Option<Self::Item> {
        let category = &self.category;
        let needle = &self.needle;
        self.items
            .by_ref()
            .find(|r| category.matches(r.category()) && r.mentions(needle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.items.size_hint().1)
    }
}

/// Catalog of library resources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceCatalog {
    /// Catalog format version
    pub version: u32,

    resources: Vec<Resource>,
}

impl ResourceCatalog {
    /// Create a catalog, keeping the given order.
    ///
    /// A later resource with an already-seen id replaces the earlier one in place.
    pub fn new(resources: impl IntoIterator<Item = Resource>) -> Self {
        let mut catalog = Self {
            version: 1,
            resources: Vec::new(),
        };
        for resource in resources {
            catalog.add(resource);
        }
        catalog
    }

    /// The built-in library
    pub fn seed() -> Self {
        Self::new(crate::seed::resources())
    }

    /// Load a catalog from a JSON file, or an empty one if the file is missing
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new(Vec::new()));
        }

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;

        let catalog: Self =
            serde_json::from_str(&content).context("Failed to parse catalog JSON")?;

        // Re-run insertion so duplicate ids in a hand-edited file collapse
        Ok(Self::new(catalog.resources))
    }

    /// Save the catalog as JSON
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write catalog: {}", path.display()))?;

        Ok(())
    }

    fn add(&mut self, resource: Resource) {
        if let Some(existing) = self.resources.iter_mut().find(|r| r.id() == resource.id()) {
            *existing = resource;
        } else {
            self.resources.push(resource);
        }
    }

    /// Resources matching `category` whose title or description contains
    /// `query` case-insensitively, in catalog order.
    ///
    /// An empty query places no text constraint; an unknown category yields
    /// nothing.
    pub fn filter(&self, category: CategorySelector, query: &str) -> Matches<'_> {
        Matches {
            items: self.resources.iter(),
            category,
            needle: query.to_lowercase(),
        }
    }

    /// Get a resource by id
    pub fn get(&self, id: &ResourceId) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id() == id)
    }

    /// All resources in catalog order
    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.resources.iter()
    }

    /// Category tabs, starting with "All Resources"
    pub fn categories() -> Vec<CategoryTab> {
        std::iter::once(CategoryTab {
            selector: CategorySelector::All,
            label: "All Resources",
        })
        .chain(Category::ALL.into_iter().map(|c| CategoryTab {
            selector: CategorySelector::Only(c),
            label: c.label(),
        }))
        .collect()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResourceCatalog {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}
