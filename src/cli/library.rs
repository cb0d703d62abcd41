//! Library browsing command.

use std::path::Path;

use anyhow::Result;

use crate::core::DataService;
use crate::library::{CategorySelector, LibraryQuery, ResourceCatalog};

/// Resolve the catalog to browse: the data store when `remote` is set,
/// otherwise the catalog file, falling back to the built-in resources
pub async fn resolve_catalog(
    data: &DataService,
    catalog_path: &Path,
    remote: bool,
) -> Result<ResourceCatalog> {
    if remote {
        return Ok(data.load_catalog().await);
    }

    if catalog_path.exists() {
        ResourceCatalog::load(catalog_path).await
    } else {
        Ok(ResourceCatalog::seed())
    }
}

pub async fn browse(
    data: &DataService,
    catalog_path: &Path,
    category: &str,
    search: &str,
    remote: bool,
) -> Result<()> {
    let catalog = resolve_catalog(data, catalog_path, remote).await?;
    let selector: CategorySelector = category.parse()?;
    let query = LibraryQuery::new(selector, search);

    let tabs: Vec<String> = ResourceCatalog::categories()
        .into_iter()
        .map(|tab| {
            if tab.selector == query.category {
                format!("[{}]", tab.label)
            } else {
                tab.label.to_string()
            }
        })
        .collect();
    println!("{}", tabs.join("  "));
    println!();

    let matches = query.apply(&catalog);
    if matches.clone().next().is_none() {
        if catalog.is_empty() {
            println!("Library is empty. Run `ageless seed` to install the built-in resources.");
        } else {
            println!("No resources found. Try adjusting your search or filters.");
        }
        return Ok(());
    }

    println!("{:<4} {:<42} {:<20} {:<9} {}", "ID", "TITLE", "CATEGORY", "TYPE", "LENGTH");
    println!("{}", "-".repeat(90));
    for resource in matches {
        println!(
            "{:<4} {:<42} {:<20} {:<9} {}",
            resource.id().as_str(),
            resource.title(),
            resource.category().label(),
            resource.kind().to_string(),
            resource.length()
        );
    }

    Ok(())
}
