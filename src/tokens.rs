//! Design-token and theme context injection.
//!
//! [`inject`] turns the resolved profile and site settings into the values a
//! page template sees. The rules that matter for fallbacks:
//!
//! - a token color appears only when the profile sets a non-blank value, so
//!   an absent key means "use the site-setting color";
//! - hero/headshot overrides appear only when a profile exists and sets them;
//! - without a profile the accent theme is `inherit` and the variant is
//!   `default`.
//!
//! The CSS helpers render the same data as custom properties for the
//! document shell.

use crate::models::{
    AccentTheme, DesignTokens, FontStack, LayoutProfile, SiteSetting, TemplateVariant, Theme, ThemeMode,
    TypeScale, non_blank,
};
use crate::resolve::RequestContext;
use serde::Serialize;
use std::collections::BTreeMap;

/// Theme and layout values merged into every page's render context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutContext {
    pub theme: Theme,
    pub theme_mode: ThemeMode,
    pub accent_theme: AccentTheme,
    pub template_variant: TemplateVariant,
    /// Slug of the active profile; `null` when none applies.
    pub active_profile: Option<String>,
    pub motion_enabled: bool,
    /// Themed base layout, only for non-default themes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_template: Option<String>,
    /// Token field name → color, for the tokens the profile overrides.
    #[serde(flatten)]
    pub tokens: BTreeMap<&'static str, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_hero_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_headshot_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_stack: Option<FontStack>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_scale: Option<TypeScale>,
}

/// Build the layout context for one request. Theme and motion come from the
/// site settings; everything else from the profile, when there is one.
pub fn inject(profile: Option<&LayoutProfile>, site: &SiteSetting) -> LayoutContext {
    let theme = site.active_theme();
    let motion_enabled = site.motion_enabled;
    let inherited_mode = ThemeMode::for_theme(theme);
    let base_template =
        (!theme.is_default()).then(|| format!("portfolio/{}/base.html", theme.as_str()));

    let Some(profile) = profile else {
        return LayoutContext {
            theme,
            theme_mode: inherited_mode,
            accent_theme: AccentTheme::Inherit,
            template_variant: TemplateVariant::Default,
            active_profile: None,
            motion_enabled,
            base_template,
            tokens: BTreeMap::new(),
            resolved_hero_image: None,
            resolved_headshot_image: None,
            font_stack: None,
            type_scale: None,
        };
    };

    let tokens = profile
        .tokens
        .slots()
        .into_iter()
        .filter_map(|(field, _, value)| non_blank(value).map(|v| (field, v.to_string())))
        .collect();

    tracing::debug!(
        profile = %profile.slug,
        variant = %profile.template_variant,
        "injecting layout profile"
    );

    LayoutContext {
        theme,
        theme_mode: profile.theme_mode.unwrap_or(inherited_mode),
        accent_theme: profile.accent_theme,
        template_variant: profile.template_variant,
        active_profile: Some(profile.slug.clone()),
        motion_enabled,
        base_template,
        tokens,
        resolved_hero_image: non_blank(profile.hero_image.as_deref()).map(str::to_string),
        resolved_headshot_image: non_blank(profile.headshot_image.as_deref()).map(str::to_string),
        font_stack: Some(profile.font_stack),
        type_scale: Some(profile.type_scale),
    }
}

impl LayoutContext {
    pub fn for_request(ctx: &RequestContext) -> Self {
        inject(ctx.profile.as_ref(), &ctx.site)
    }

    /// The context as a flat JSON object, the shape a template engine takes.
    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        object_or_empty(serde_json::to_value(self))
    }

    /// `<body>` classes: variant, theme, accent and motion.
    pub fn body_classes(&self) -> String {
        let mut classes = vec![
            format!("variant-{}", self.template_variant.as_str()),
            format!("theme-{}", self.theme.as_str()),
            format!("mode-{}", self.theme_mode.as_str()),
        ];
        if self.accent_theme != AccentTheme::Inherit {
            classes.push(format!("accent-{}", self.accent_theme.as_str()));
        }
        if !self.motion_enabled {
            classes.push("no-motion".to_string());
        }
        classes.join(" ")
    }
}

/// The serialized object, or an empty map (logged) when serialization
/// failed or produced something other than an object.
fn object_or_empty(
    value: Result<serde_json::Value, serde_json::Error>,
) -> serde_json::Map<String, serde_json::Value> {
    match value {
        Ok(serde_json::Value::Object(map)) => map,
        Ok(other) => {
            tracing::warn!(value = %other, "layout context did not serialize to an object");
            serde_json::Map::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, "layout context failed to serialize");
            serde_json::Map::new()
        }
    }
}

/// Site-setting colors as `:root` custom properties.
pub fn generate_site_css(site: &SiteSetting) -> String {
    let mut css = String::from(":root {\n");
    for (_, var, value) in site.colors() {
        css.push_str(&format!("    {var}: {value};\n"));
    }
    css.push('}');
    css
}

/// Profile overrides as `:root` custom properties.
///
/// Returns an empty string when the context carries nothing to override, so
/// the site-setting colors apply unchanged.
pub fn generate_token_css(layout: &LayoutContext) -> String {
    let mut lines: Vec<String> = DesignTokens::default()
        .slots()
        .into_iter()
        .filter_map(|(field, var, _)| {
            layout
                .tokens
                .get(field)
                .map(|value| format!("    {var}: {value};"))
        })
        .collect();
    if let Some(font) = layout.font_stack {
        lines.push(format!("    --font-body: {};", font.css()));
    }
    if let Some(scale) = layout.type_scale {
        lines.push(format!("    --type-scale: {};", scale.ratio()));
    }
    if lines.is_empty() {
        return String::new();
    }
    format!(":root {{\n{}\n}}", lines.join("\n"))
}
