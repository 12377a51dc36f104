use handlebars::Handlebars;
use serde_json::json;
use thiserror::Error;

use crate::generate::GeneratedPolicy;

/// Free-tier notice carried by previews and exports of unpaid policies.
pub const WATERMARK_TEXT: &str = "FREE TIER - UPGRADE FOR WATERMARK-FREE POLICIES";

const MARKDOWN_TEMPLATE: &str = "# {{title}}

_Last Updated: {{lastUpdated}}_
{{#each sections}}

## {{heading}}
{{#each content}}

{{this}}
{{/each}}
{{/each}}
{{#unless paid}}

---

_{{watermark}}_
{{/unless}}
";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("markdown render failed: {0}")]
    Template(#[from] handlebars::RenderError),
}

/// Plain-text preview of the policy.
pub fn render_text(policy: &GeneratedPolicy, paid: bool) -> String {
    let mut lines = Vec::new();
    lines.push(policy.title.clone());
    lines.push(format!("Last Updated: {}", policy.last_updated));

    for section in &policy.sections {
        lines.push(String::new());
        lines.push(section.heading.clone());
        for paragraph in &section.content {
            lines.push(format!("  {}", paragraph));
        }
    }

    if !paid {
        lines.push(String::new());
        lines.push(WATERMARK_TEXT.to_string());
    }

    lines.join("\n")
}

/// Markdown preview of the policy.
pub fn render_markdown(policy: &GeneratedPolicy, paid: bool) -> Result<String, RenderError> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    let ctx = json!({
        "title": policy.title,
        "lastUpdated": policy.last_updated,
        "sections": policy.sections,
        "paid": paid,
        "watermark": WATERMARK_TEXT,
    });
    Ok(handlebars.render_template(MARKDOWN_TEMPLATE, &ctx)?)
}
