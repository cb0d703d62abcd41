//! Resource Catalog Integration Tests
//!
//! Filtering behavior of the library over the built-in resources.

use ageless::library::{Category, CategorySelector, LibraryQuery, Resource, ResourceCatalog};

fn ids<'a>(matches: impl Iterator<Item = &'a Resource>) -> Vec<&'a str> {
    matches.map(|r| r.id().as_str()).collect()
}

fn selectors() -> Vec<CategorySelector> {
    let mut selectors = vec![CategorySelector::All];
    selectors.extend(Category::ALL.iter().copied().map(CategorySelector::from));
    selectors.push(CategorySelector::Unknown("drills".to_string()));
    selectors
}

#[test]
fn test_unfiltered_returns_whole_catalog_in_order() {
    let catalog = ResourceCatalog::seed();
    let all = ids(catalog.filter(CategorySelector::All, ""));
    assert_eq!(all, vec!["1", "2", "3", "4", "5", "6", "7", "8"]);
}

#[test]
fn test_category_and_search_combine() {
    let catalog = ResourceCatalog::seed();

    assert_eq!(ids(catalog.filter("fitness".parse().unwrap(), "")), vec!["1", "8"]);
    assert_eq!(ids(catalog.filter("health".parse().unwrap(), "injur")), vec!["7"]);
    assert_eq!(ids(catalog.filter(CategorySelector::All, "injur")), vec!["1", "7"]);
    assert_eq!(ids(catalog.filter(CategorySelector::All, "passing")), vec!["2"]);
    assert_eq!(ids(catalog.filter(CategorySelector::All, "SOCCER")), vec!["5", "7", "8"]);
}

#[test]
fn test_no_match_is_empty_not_error() {
    let catalog = ResourceCatalog::seed();
    assert_eq!(catalog.filter(CategorySelector::All, "volleyball").count(), 0);
    assert_eq!(catalog.filter("Technique".parse().unwrap(), "").count(), 0);
}

#[test]
fn test_results_are_exactly_the_matching_subsequence() {
    let catalog = ResourceCatalog::seed();
    let all: Vec<&Resource> = catalog.iter().collect();

    for selector in selectors() {
        for query in ["", "improv", "RECOVERY", "foot", "zzz"] {
            let result: Vec<&Resource> = catalog.filter(selector.clone(), query).collect();

            // Subsequence of the catalog: positions strictly increase
            let positions: Vec<usize> = result
                .iter()
                .map(|r| all.iter().position(|c| c.id() == r.id()).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));

            // Exactly the matching entries: nothing extra, nothing dropped
            let needle = query.to_lowercase();
            let expected: Vec<&Resource> = catalog
                .iter()
                .filter(|r| selector.matches(r.category()))
                .filter(|r| {
                    r.title().to_lowercase().contains(&needle)
                        || r.description().to_lowercase().contains(&needle)
                })
                .collect();
            assert_eq!(result, expected, "selector {} query {:?}", selector, query);
        }
    }
}

#[test]
fn test_search_ignores_case() {
    let catalog = ResourceCatalog::seed();
    for selector in selectors() {
        let lower = ids(catalog.filter(selector.clone(), "warm-up"));
        let upper = ids(catalog.filter(selector.clone(), "WARM-UP"));
        let mixed = ids(catalog.filter(selector, "Warm-Up"));
        assert_eq!(lower, upper);
        assert_eq!(lower, mixed);
    }
}

#[test]
fn test_filter_is_idempotent() {
    let catalog = ResourceCatalog::seed();
    let once: Vec<Resource> = catalog
        .filter("technique".parse().unwrap(), "improv")
        .cloned()
        .collect();
    let refiltered = ResourceCatalog::new(once.clone());
    let twice: Vec<Resource> = refiltered
        .filter("technique".parse().unwrap(), "improv")
        .cloned()
        .collect();
    assert_eq!(once, twice);
}

#[test]
fn test_query_state_drives_list() {
    let catalog = ResourceCatalog::seed();
    let query = LibraryQuery::default();
    assert_eq!(query.apply(&catalog).count(), 8);

    let health = query.with_category(Category::Health.into());
    let nutrition = health.with_text("nutrition");
    assert_eq!(ids(nutrition.apply(&catalog)), vec!["5"]);

    // Clearing the search keeps the selected tab
    assert_eq!(ids(nutrition.with_text("").apply(&catalog)), vec!["3", "5", "7"]);
}

#[test]
fn test_every_resource_has_exactly_one_length() {
    for resource in ResourceCatalog::seed().iter() {
        assert_ne!(
            resource.duration_seconds().is_some(),
            resource.read_time_minutes().is_some(),
            "resource {} must carry exactly one of duration/read time",
            resource.id()
        );
        assert_eq!(resource.kind().is_timed(), resource.duration_seconds().is_some());
    }
}
