//! Catalog filter evaluation.
//!
//! Values within one dimension combine with OR, dimensions combine with AND.
//! An item's empty set-valued field matches nothing, so it is excluded from
//! any active dimension over that field and kept when the dimension is idle.

use crate::catalog::ContentItem;
use crate::filter::state::{FilterDimension, FilterState, FilterValue};
use std::collections::BTreeSet;

/// Visible subset of `catalog` under `filters`, in catalog order.
pub fn apply<'a>(catalog: &'a [ContentItem], filters: &FilterState) -> Vec<&'a ContentItem> {
    if filters.is_empty() {
        return catalog.iter().collect();
    }
    let visible: Vec<&ContentItem> = catalog
        .iter()
        .filter(|item| matches(item, filters))
        .collect();
    tracing::trace!(
        filters = %filters,
        total = catalog.len(),
        visible = visible.len(),
        "catalog filtered"
    );
    visible
}

/// Whether `item` satisfies every active dimension of `filters`.
pub fn matches(item: &ContentItem, filters: &FilterState) -> bool {
    filters
        .constraints()
        .all(|(dimension, selected)| dimension_matches(item, dimension, selected))
}

fn dimension_matches(
    item: &ContentItem,
    dimension: FilterDimension,
    selected: &BTreeSet<FilterValue>,
) -> bool {
    if selected.is_empty() {
        return true;
    }
    match dimension {
        FilterDimension::Stage => selected.contains(&FilterValue::Stage(item.stage)),
        FilterDimension::Grade => item
            .grades
            .iter()
            .any(|grade| selected.contains(&FilterValue::Grade(*grade))),
        FilterDimension::Subject => item
            .subjects
            .iter()
            .any(|subject| selected.contains(&FilterValue::Subject(*subject))),
        FilterDimension::Category => item
            .categories
            .iter()
            .any(|category| selected.contains(&FilterValue::Category(*category))),
        FilterDimension::CurricularSkill => selected.iter().any(|value| match value {
            FilterValue::Skill(code) => item.curricular_skill_codes.contains(code),
            _ => false,
        }),
    }
}
