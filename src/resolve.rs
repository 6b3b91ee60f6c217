//! Active layout profile resolution and the per-request context.
//!
//! The precedence is fixed:
//!
//! 1. the profile attached to the page's category, if any;
//! 2. otherwise the site-default profile, if any;
//! 3. otherwise none, and callers use the built-in defaults.
//!
//! In development mode a preview slug can replace the result with any
//! profile by slug. Unknown slugs are ignored, and outside development mode
//! the slug is never even looked up.
//!
//! [`RequestContext`] resolves theme, motion and profile once when a request
//! starts; everything downstream reads from it instead of querying the store
//! again.

use crate::models::{Category, CategoryId, LayoutProfile, SiteSetting, TemplateVariant, Theme};
use crate::templates;

/// Read access to layout profiles. Implemented by the store; tests may
/// supply their own.
pub trait ProfileLookup {
    fn profile_for_category(&self, category: CategoryId) -> Option<LayoutProfile>;
    fn site_default_profile(&self) -> Option<LayoutProfile>;
    fn profile_by_slug(&self, slug: &str) -> Option<LayoutProfile>;
}

/// Effective layout profile for a page in `category` (or a page with no
/// category). Never fails and never creates rows.
pub fn resolve_active_profile(
    lookup: &impl ProfileLookup,
    category: Option<&Category>,
) -> Option<LayoutProfile> {
    if let Some(category) = category
        && let Some(profile) = lookup.profile_for_category(category.id)
    {
        tracing::debug!(category = %category.slug, profile = %profile.slug, "category layout profile");
        return Some(profile);
    }
    let profile = lookup.site_default_profile();
    match &profile {
        Some(p) => tracing::debug!(profile = %p.slug, "site default layout profile"),
        None => tracing::debug!("no layout profile; using built-in defaults"),
    }
    profile
}

/// [`resolve_active_profile`] plus the development-mode preview override.
pub fn resolve_with_preview(
    lookup: &impl ProfileLookup,
    category: Option<&Category>,
    preview_slug: Option<&str>,
    debug: bool,
) -> Option<LayoutProfile> {
    let resolved = resolve_active_profile(lookup, category);
    let Some(slug) = preview_slug.map(str::trim).filter(|s| !s.is_empty()) else {
        return resolved;
    };
    if !debug {
        tracing::debug!(slug, "preview override ignored outside development mode");
        return resolved;
    }
    match lookup.profile_by_slug(slug) {
        Some(preview) => {
            tracing::debug!(slug, "preview override applied");
            Some(preview)
        }
        None => {
            tracing::debug!(slug, "preview override names no profile; ignored");
            resolved
        }
    }
}

/// What the caller knows about the incoming request.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    /// Category of the content being rendered, if it has one.
    pub category: Option<Category>,
    /// Preview override slug, honored only in development mode.
    pub preview_slug: Option<String>,
}

impl PageRequest {
    pub fn for_category(category: Category) -> Self {
        Self {
            category: Some(category),
            preview_slug: None,
        }
    }

    pub fn with_preview(mut self, slug: impl Into<String>) -> Self {
        self.preview_slug = Some(slug.into());
        self
    }
}

/// Values resolved once at request entry and shared by every resolver that
/// runs while rendering that request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub theme: Theme,
    pub motion_enabled: bool,
    pub profile: Option<LayoutProfile>,
    /// Site settings in effect, or the built-in defaults when none are saved.
    pub site: SiteSetting,
}

impl RequestContext {
    pub fn build(
        lookup: &impl ProfileLookup,
        site: Option<SiteSetting>,
        request: &PageRequest,
        debug: bool,
    ) -> Self {
        let site = site.unwrap_or_default();
        let theme = site.active_theme();
        let profile = resolve_with_preview(
            lookup,
            request.category.as_ref(),
            request.preview_slug.as_deref(),
            debug,
        );
        Self {
            theme,
            motion_enabled: site.motion_enabled,
            profile,
            site,
        }
    }

    /// The active variant; the built-in default when no profile applies.
    pub fn variant(&self) -> TemplateVariant {
        self.profile
            .as_ref()
            .map(|p| p.template_variant)
            .unwrap_or_default()
    }

    /// Variant axis input for template lookup. Empty without a profile, so
    /// only the theme axis applies.
    pub fn variant_key(&self) -> &'static str {
        match &self.profile {
            Some(p) => p.template_variant.as_str(),
            None => "",
        }
    }

    /// Candidate template paths for `logical_name` under this request.
    pub fn candidate_paths(&self, logical_name: &str) -> Vec<String> {
        templates::candidate_paths(logical_name, self.theme.as_str(), self.variant_key())
    }

    pub fn profile_slug(&self) -> Option<&str> {
        self.profile.as_ref().map(|p| p.slug.as_str())
    }
}
