//! Page rendering at the template boundary.
//!
//! The engine decides *which* template to use; this module is the thin
//! collaborator that checks what exists, reads it and wraps it in the site's
//! document shell.
//!
//! ## Templates
//!
//! A template file is a tera template for the page body. Every `.html` file
//! in the source is registered with one [`tera::Tera`] instance, so
//! `{% include %}` and `{% extends %}` resolve across the whole tree. The
//! context is the layout context plus a few site-setting fields. Output is
//! autoescaped; markdown-rendered fields need `| safe`:
//!
//! ```text
//! <h1>{{ hero_title }}</h1>
//! <section class="variant-{{ template_variant }}">{{ about_html | safe }}</section>
//! ```
//!
//! An undefined variable is a render error.
//!
//! ## Document shell
//!
//! Built with maud, like the rest of the HTML here:
//!
//! ```text
//! <!DOCTYPE html>
//! <html lang="en" data-theme="dark">
//!   <head> … <style>site colors, profile tokens</style> </head>
//!   <body class="variant-modern_saas theme-dark mode-dark" data-variant="modern_saas">
//!     <nav class="site-nav">…</nav>
//!     <main>template body</main>
//!   </body>
//! </html>
//! ```

use crate::models::{LayoutProfile, TemplateVariant};
use crate::nav::NavNode;
use crate::resolve::RequestContext;
use crate::templates::Page;
use crate::tokens::{self, LayoutContext};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Template directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Template not found (tried {})", .0.join(", "))]
    TemplateNotFound(Vec<String>),
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

/// Where templates come from.
pub trait TemplateSource {
    fn exists(&self, name: &str) -> bool;
    fn read(&self, name: &str) -> Result<String, RenderError>;
    /// Every template name, `/`-separated and sorted.
    fn names(&self) -> Result<Vec<String>, RenderError>;
}

/// Templates on disk under a root directory.
#[derive(Debug, Clone)]
pub struct DirTemplates {
    root: PathBuf,
}

impl DirTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> PathBuf {
        name.split('/').fold(self.root.clone(), |path, part| path.join(part))
    }
}

impl TemplateSource for DirTemplates {
    fn exists(&self, name: &str) -> bool {
        self.path_of(name).is_file()
    }

    fn read(&self, name: &str) -> Result<String, RenderError> {
        Ok(fs::read_to_string(self.path_of(name))?)
    }

    fn names(&self) -> Result<Vec<String>, RenderError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(rel) = entry.path().strip_prefix(&self.root) {
                let name: Vec<String> = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                names.push(name.join("/"));
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Templates held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplates {
    files: BTreeMap<String, String>,
}

impl MemoryTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, body: &str) -> Self {
        self.insert(name, body);
        self
    }

    pub fn insert(&mut self, name: &str, body: &str) {
        self.files.insert(name.to_string(), body.to_string());
    }
}

impl TemplateSource for MemoryTemplates {
    fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    fn read(&self, name: &str) -> Result<String, RenderError> {
        self.files.get(name).cloned().ok_or_else(|| {
            RenderError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no template named {name}"),
            ))
        })
    }

    fn names(&self) -> Result<Vec<String>, RenderError> {
        Ok(self.files.keys().cloned().collect())
    }
}

/// First candidate that exists.
pub fn select_template(
    source: &impl TemplateSource,
    candidates: &[String],
) -> Result<String, RenderError> {
    match candidates.iter().find(|name| source.exists(name)) {
        Some(name) => {
            tracing::debug!(template = %name, "template selected");
            Ok(name.clone())
        }
        None => {
            tracing::warn!(tried = candidates.len(), "no candidate template exists");
            Err(RenderError::TemplateNotFound(candidates.to_vec()))
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// The template that was used.
    pub template: String,
    pub html: String,
}

/// Register every `.html` template in `source` with a fresh tera instance.
///
/// Templates are added in one batch so inheritance between them is
/// resolved regardless of listing order.
pub fn load_engine(source: &impl TemplateSource) -> Result<Tera, RenderError> {
    let mut files = Vec::new();
    for name in source.names()? {
        if !name.ends_with(".html") {
            continue;
        }
        let body = source.read(&name)?;
        files.push((name, body));
    }
    let mut tera = Tera::default();
    tera.add_raw_templates(files)?;
    tracing::debug!(templates = tera.get_template_names().count(), "template engine loaded");
    Ok(tera)
}

/// Template context for `page`: the layout context plus the site fields
/// page bodies use.
pub fn page_context(
    ctx: &RequestContext,
    layout: &LayoutContext,
    page: Page,
) -> Result<Context, RenderError> {
    let site = &ctx.site;
    let mut context = Context::from_serialize(layout)?;
    context.insert("full_name", &site.full_name);
    context.insert("headline", &site.headline);
    context.insert("hero_title", &site.hero_title);
    context.insert("hero_subtitle", &site.hero_subtitle);
    context.insert("about_title", &site.about_title);
    context.insert("page_title", page.title());
    context.insert("featured_projects", &site.homepage_featured_projects_count);
    context.insert(
        "featured_category_blocks",
        &site.homepage_featured_category_blocks_count,
    );
    context.insert("about_html", &markdown_to_html(&site.about_body));
    Ok(context)
}

/// Select, render and wrap the template for `page`.
pub fn render_page(
    source: &impl TemplateSource,
    ctx: &RequestContext,
    page: Page,
    nav: &[NavNode],
) -> Result<RenderedPage, RenderError> {
    let candidates = ctx.candidate_paths(&page.template_name());
    let template = select_template(source, &candidates)?;

    let engine = load_engine(source)?;
    let layout = LayoutContext::for_request(ctx);
    let body = engine.render(&template, &page_context(ctx, &layout, page)?)?;

    let site = &ctx.site;
    let css = page_css(ctx, &layout);
    let title = if site.full_name.is_empty() {
        page.title().to_string()
    } else {
        format!("{} | {}", page.title(), site.full_name)
    };
    let document = base_document(&title, &css, &layout, render_nav(nav), PreEscaped(body));

    Ok(RenderedPage {
        template,
        html: document.into_string(),
    })
}

fn page_css(ctx: &RequestContext, layout: &LayoutContext) -> String {
    let mut css = tokens::generate_site_css(&ctx.site);
    let token_css = tokens::generate_token_css(layout);
    if !token_css.is_empty() {
        css.push_str("\n\n");
        css.push_str(&token_css);
    }
    css
}

/// Render markdown to HTML.
pub fn markdown_to_html(source: &str) -> String {
    let parser = Parser::new(source);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

fn base_document(
    title: &str,
    css: &str,
    layout: &LayoutContext,
    nav: Markup,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" data-theme=(layout.theme.as_str()) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body class=(layout.body_classes())
                data-variant=(layout.template_variant.as_str())
                data-profile=[layout.active_profile.as_deref()] {
                (nav)
                main { (content) }
            }
        }
    }
}

/// Site navigation as nested lists.
pub fn render_nav(nodes: &[NavNode]) -> Markup {
    html! {
        @if !nodes.is_empty() {
            nav.site-nav {
                (render_nav_list(nodes))
            }
        }
    }
}

fn render_nav_list(nodes: &[NavNode]) -> Markup {
    html! {
        ul {
            @for node in nodes {
                li {
                    a href=(node.url)
                        target=[node.new_tab.then_some("_blank")]
                        rel=[node.external.then_some("noopener")] {
                        (node.title)
                    }
                    @if !node.children.is_empty() {
                        (render_nav_list(&node.children))
                    }
                }
            }
        }
    }
}

// =============================================================================
// Template inventory and variant review
// =============================================================================

/// Which page templates a variant provides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantInventory {
    pub variant: TemplateVariant,
    pub present: Vec<String>,
    pub missing: Vec<String>,
}

impl VariantInventory {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// For every non-default variant, report which of the page templates exist
/// under `portfolio/variants/<variant>/`.
pub fn template_inventory(source: &impl TemplateSource) -> Vec<VariantInventory> {
    TemplateVariant::ALL
        .into_iter()
        .filter(|v| *v != TemplateVariant::Default)
        .map(|variant| {
            let (present, missing): (Vec<String>, Vec<String>) = Page::ALL
                .into_iter()
                .map(|page| format!("portfolio/variants/{}/{}.html", variant.as_str(), page.as_str()))
                .partition(|name| source.exists(name));
            VariantInventory {
                variant,
                present,
                missing,
            }
        })
        .collect()
}

/// Directories under `portfolio/variants/` that name no known variant.
pub fn unknown_variant_dirs(source: &impl TemplateSource) -> Result<Vec<String>, RenderError> {
    let mut unknown: Vec<String> = source
        .names()?
        .iter()
        .filter_map(|name| name.strip_prefix("portfolio/variants/"))
        .filter_map(|rest| rest.split_once('/').map(|(dir, _)| dir))
        .filter(|dir| TemplateVariant::parse(dir).is_none())
        .map(str::to_string)
        .collect();
    unknown.dedup();
    Ok(unknown)
}

/// One row of the development-mode variant review listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantReview {
    pub variant: TemplateVariant,
    pub label: &'static str,
    /// Profile to preview this variant with, if one exists.
    pub profile_slug: Option<String>,
}

/// Every variant with the first profile (by name) that uses it.
pub fn variant_review(profiles: &[LayoutProfile]) -> Vec<VariantReview> {
    let mut sorted: Vec<&LayoutProfile> = profiles.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    TemplateVariant::ALL
        .into_iter()
        .map(|variant| VariantReview {
            variant,
            label: variant.label(),
            profile_slug: sorted
                .iter()
                .find(|p| p.template_variant == variant)
                .map(|p| p.slug.clone()),
        })
        .collect()
}

/// Pages listed by the variant review, with their URLs. The project detail
/// page is included only when a detail URL is known.
pub fn review_pages(project_detail_url: Option<&str>) -> Vec<(&'static str, String)> {
    Page::ALL
        .into_iter()
        .filter_map(|page| match page.url() {
            Some(url) => Some((page.title(), url.to_string())),
            None => project_detail_url.map(|url| (page.title(), url.to_string())),
        })
        .collect()
}
