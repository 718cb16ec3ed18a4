//! HTML output: a [`Surface`] that writes markup, plus whole-page and
//! single-block composition.

use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;

use crate::chart::{ChartBuilder, ChartObject};
use crate::config::Dashboard;
use crate::model::Category;
use crate::registry::RegistryError;
use crate::render::{Degraded, RenderResult, Renderer, Surface};
use crate::selector::{Availability, Selection, Selector};
use crate::source::FragmentSource;

/// Accumulates block markup.
#[derive(Debug, Default)]
pub struct HtmlSurface {
    html: String,
}

impl HtmlSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }

    /// Append raw markup produced by the page itself.
    fn push(&mut self, markup: &str) {
        self.html.push_str(markup);
    }
}

impl Surface for HtmlSurface {
    fn embed(&mut self, markup: &str, height: u32) {
        // srcdoc keeps third-party scripts inside their own frame
        let _ = write!(
            self.html,
            r#"<iframe class="embed" sandbox="allow-scripts allow-popups" srcdoc="{}" height="{height}" style="width:100%;border:0"></iframe>"#,
            encode_double_quoted_attribute(markup),
        );
    }

    fn place_chart(&mut self, chart: &ChartObject, height: u32) {
        let _ = write!(
            self.html,
            r#"<div class="chart" style="min-height:{height}px">{}</div>"#,
            chart.to_svg(height)
        );
    }

    fn placeholder(&mut self, degraded: &Degraded) {
        let _ = write!(
            self.html,
            r#"<div class="degraded" role="alert" style="min-height:{}px"><p class="warning">{}</p><p class="placeholder">{}</p></div>"#,
            degraded.height,
            encode_text(&degraded.message),
            encode_text(&degraded.placeholder),
        );
    }
}

const STYLE: &str = "body{font-family:sans-serif;margin:2rem auto;max-width:960px}\
nav.tabs a{margin-right:1rem}\
section{margin-top:2rem}\
.degraded{border:1px solid #e0a800;background:#fff8e1;padding:1rem}\
.warning{color:#8a6d00;font-weight:bold}\
.empty{color:#666;font-style:italic}";

fn page_head(out: &mut String, title: &str) {
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{t}</title><style>{STYLE}</style></head>\n<body>\n<h1>{t}</h1>\n",
        t = encode_text(title),
    );
}

/// Everything a page render produced.
#[derive(Debug)]
pub struct Page {
    pub html: String,
    pub results: Vec<RenderResult>,
}

impl Page {
    pub fn degraded(&self) -> impl Iterator<Item = &Degraded> {
        self.results.iter().filter_map(|r| match r {
            RenderResult::Degraded(d) => Some(d),
            RenderResult::Rendered { .. } => None,
        })
    }
}

/// Render every block of every declared category into one HTML page.
pub fn compose_page<S: FragmentSource, C: ChartBuilder>(
    dashboard: &Dashboard,
    renderer: &mut Renderer<'_, S, C>,
) -> Result<Page, RegistryError> {
    let registry = &dashboard.registry;
    let selector = Selector::new(registry);
    let mut surface = HtmlSurface::new();
    let mut results = Vec::new();

    let mut head = String::new();
    page_head(&mut head, &dashboard.title);
    surface.push(&head);
    if let Some(intro) = &dashboard.intro {
        surface.push(&format!("<p class=\"intro\">{}</p>\n", encode_text(intro)));
    }

    surface.push("<nav class=\"tabs\">");
    for category in registry.declared_categories() {
        surface.push(&format!(
            "<a href=\"#tab-{category}\">{}</a>",
            encode_text(category.title())
        ));
    }
    surface.push("</nav>\n");

    for category in registry.declared_categories() {
        surface.push(&format!(
            "<section id=\"tab-{category}\">\n<h2>{}</h2>\n",
            encode_text(category.title())
        ));
        let available = selector.available_in(category);
        match &available {
            Availability::Empty { .. } => {
                surface.push(&format!(
                    "<p class=\"empty\">{}</p>\n",
                    encode_text(&available.message().unwrap_or_default())
                ));
            }
            Availability::Choices(choices) => {
                for choice in choices {
                    surface.push(&format!(
                        "<div class=\"block\" id=\"block-{}\">\n<h3>{}</h3>\n",
                        encode_double_quoted_attribute(choice.id),
                        encode_text(choice.label)
                    ));
                    let selection = Selection {
                        category,
                        id: choice.id.to_string(),
                    };
                    results.push(renderer.render(&selection, &mut surface)?);
                    surface.push("\n</div>\n");
                }
            }
        }
        surface.push("</section>\n");
    }
    surface.push("</body>\n</html>\n");

    Ok(Page {
        html: surface.into_html(),
        results,
    })
}

/// Render one selected block under a picker listing its category's blocks.
pub fn compose_block<S: FragmentSource, C: ChartBuilder>(
    dashboard: &Dashboard,
    renderer: &mut Renderer<'_, S, C>,
    selection: &Selection,
) -> Result<Page, RegistryError> {
    let selector = Selector::new(&dashboard.registry);
    let descriptor = dashboard
        .registry
        .get_in(selection.category, &selection.id)?;
    let mut surface = HtmlSurface::new();

    let mut head = String::new();
    page_head(&mut head, &dashboard.title);
    surface.push(&head);
    surface.push(&picker(&selector, selection.category, &selection.id));
    surface.push(&format!("<h3>{}</h3>\n", encode_text(&descriptor.display_label)));
    let result = renderer.render(selection, &mut surface)?;
    surface.push("\n</body>\n</html>\n");

    Ok(Page {
        html: surface.into_html(),
        results: vec![result],
    })
}

/// `<select>` listing the blocks of a category with `current` marked.
pub fn picker(selector: &Selector<'_>, category: Category, current: &str) -> String {
    let mut out = format!(
        "<label>{} <select name=\"block\">",
        encode_text(category.title())
    );
    for choice in selector.available_in(category).choices() {
        let _ = write!(
            out,
            "<option value=\"{}\"{}>{}</option>",
            encode_double_quoted_attribute(choice.id),
            if choice.id == current { " selected" } else { "" },
            encode_text(choice.label)
        );
    }
    out.push_str("</select></label>\n");
    out
}
