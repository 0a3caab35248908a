use std::cell::RefCell;
use std::collections::BTreeSet;

use crate::config::SiteData;
use crate::sections::{plan_page, Fill, PagePlan};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Error rewriting page template")]
    Rewrite(#[from] lol_html::errors::RewritingError),
}

/// Populates the template's elements (found by id) from the site data.
#[tracing::instrument(skip(template, site))]
pub fn render_page(template: &str, site: &SiteData, year: i32) -> Result<String, RenderError> {
    let plan = plan_page(site, year);
    apply_plan(template, &plan)
}

/// Applies a plan to the first element carrying each id, like
/// `getElementById` would find it.
pub fn apply_plan(template: &str, plan: &PagePlan) -> Result<String, RenderError> {
    use lol_html::{rewrite_str, element, RewriteStrSettings};
    use lol_html::html_content::ContentType;

    let filled = RefCell::new(BTreeSet::new());

    let element_content_handlers = vec![
        element!("[id]", |el| {
            let Some(id) = el.get_attribute("id") else { return Ok(()) };
            let Some((&key, fill)) = plan.get_key_value(id.as_str()) else { return Ok(()) };
            if !filled.borrow_mut().insert(key) {
                debug!("duplicate #{} in template, only the first is filled", key);
                return Ok(());
            }
            match fill {
                Fill::Text(text) => el.set_inner_content(text, ContentType::Text),
                Fill::Html(html) => el.set_inner_content(html, ContentType::Html),
                Fill::Attribute(name, value) => {
                    if let Err(e) = el.set_attribute(name, value) {
                        warn!("could not set {} on #{}: {}", name, key, e);
                    }
                },
            }
            Ok(())
        }),
    ];

    let res = rewrite_str(
        template,
        RewriteStrSettings {
            element_content_handlers,
            ..RewriteStrSettings::default()
        }
    )?;

    let filled = filled.into_inner();
    for id in plan.keys().filter(|id| !filled.contains(*id)) {
        debug!("template has no #{}, skipped", id);
    }

    Ok(res)
}
