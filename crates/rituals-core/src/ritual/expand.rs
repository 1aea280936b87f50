//! Flattening of nested `next` references into a single act list.

use super::{ActRuntime, ActSpec, RitualCatalog};
use crate::error::{CoreError, Result};

/// Expand a template into its ordered leaf acts.
///
/// References are replaced in place by the expansion of the referenced
/// template. A template may be referenced more than once, but never from
/// inside its own expansion.
///
/// # Errors
/// `CoreError::UnknownRitual` for a dangling reference and
/// `CoreError::CyclicReference` when a reference re-enters a template that is
/// still being expanded.
pub fn expand(template_id: &str, catalog: &RitualCatalog) -> Result<Vec<ActRuntime>> {
    let mut path = Vec::new();
    let mut acts = Vec::new();
    expand_into(template_id, catalog, &mut path, &mut acts)?;
    Ok(acts)
}

fn expand_into<'a>(
    template_id: &'a str,
    catalog: &'a RitualCatalog,
    path: &mut Vec<&'a str>,
    acts: &mut Vec<ActRuntime>,
) -> Result<()> {
    if path.contains(&template_id) {
        let mut chain: Vec<String> = path.iter().map(|id| id.to_string()).collect();
        chain.push(template_id.to_string());
        return Err(CoreError::CyclicReference { chain });
    }
    let template = catalog
        .template(template_id)
        .ok_or_else(|| CoreError::UnknownRitual(template_id.to_string()))?;

    path.push(template_id);
    for spec in &template.acts {
        match spec {
            ActSpec::Leaf(leaf) => acts.push(ActRuntime::from_leaf(leaf)),
            ActSpec::Reference { next } => expand_into(next, catalog, path, acts)?,
        }
    }
    path.pop();
    Ok(())
}

/// Expand every template, stopping at the first broken one.
pub fn validate_catalog(catalog: &RitualCatalog) -> Result<()> {
    for (id, _) in catalog.templates() {
        expand(id, catalog)?;
    }
    Ok(())
}
