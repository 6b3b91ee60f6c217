//! Rows held by the configuration store.
//!
//! Every type here is plain data: serde-serializable so the store can persist
//! it, `Clone` so readers can take snapshots without holding the store lock.
//! Choice fields are closed enums that (de)serialize as their snake_case slug,
//! which is also what templates and CSS class names see.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Choice enums
// =============================================================================

/// Site-wide visual theme preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Blue,
    Green,
    Purple,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Light,
        Theme::Dark,
        Theme::Blue,
        Theme::Green,
        Theme::Purple,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Blue => "blue",
            Theme::Green => "green",
            Theme::Purple => "purple",
        }
    }

    /// Parse a stored theme value. Unknown values are `None`.
    pub fn parse(value: &str) -> Option<Theme> {
        Theme::ALL.into_iter().find(|t| t.as_str() == value)
    }

    /// Parse a stored theme value, coercing anything unrecognized (including
    /// the empty string) to the default theme.
    pub fn coerce(value: &str) -> Theme {
        Theme::parse(value).unwrap_or_default()
    }

    /// The default theme uses the unthemed templates.
    pub fn is_default(self) -> bool {
        self == Theme::Light
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Light/dark override carried by a layout profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Mode implied by a site theme: only the dark preset is dark.
    pub fn for_theme(theme: Theme) -> ThemeMode {
        if theme == Theme::Dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }
}

/// CSS theme preset chosen by a profile, or `inherit` to use the site theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccentTheme {
    #[default]
    Inherit,
    Light,
    Dark,
    Blue,
    Green,
    Purple,
}

impl AccentTheme {
    pub fn as_str(self) -> &'static str {
        match self {
            AccentTheme::Inherit => "inherit",
            AccentTheme::Light => "light",
            AccentTheme::Dark => "dark",
            AccentTheme::Blue => "blue",
            AccentTheme::Green => "green",
            AccentTheme::Purple => "purple",
        }
    }
}

/// One of the alternate visual layouts for the same logical pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateVariant {
    #[default]
    Default,
    ModernSaas,
    ExecutiveMinimal,
    DataLab,
    SplitScreen,
    MagazineEditorial,
    CardDashboard,
    GlassModern,
    BoldBranding,
    TimelinePro,
    TechnicalResearch,
}

impl TemplateVariant {
    /// All variants in admin display order.
    pub const ALL: [TemplateVariant; 11] = [
        TemplateVariant::Default,
        TemplateVariant::ModernSaas,
        TemplateVariant::ExecutiveMinimal,
        TemplateVariant::DataLab,
        TemplateVariant::SplitScreen,
        TemplateVariant::MagazineEditorial,
        TemplateVariant::CardDashboard,
        TemplateVariant::GlassModern,
        TemplateVariant::BoldBranding,
        TemplateVariant::TimelinePro,
        TemplateVariant::TechnicalResearch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateVariant::Default => "default",
            TemplateVariant::ModernSaas => "modern_saas",
            TemplateVariant::ExecutiveMinimal => "executive_minimal",
            TemplateVariant::DataLab => "data_lab",
            TemplateVariant::SplitScreen => "split_screen",
            TemplateVariant::MagazineEditorial => "magazine_editorial",
            TemplateVariant::CardDashboard => "card_dashboard",
            TemplateVariant::GlassModern => "glass_modern",
            TemplateVariant::BoldBranding => "bold_branding",
            TemplateVariant::TimelinePro => "timeline_pro",
            TemplateVariant::TechnicalResearch => "technical_research",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TemplateVariant::Default => "Default",
            TemplateVariant::ModernSaas => "Modern SaaS",
            TemplateVariant::ExecutiveMinimal => "Executive Minimal",
            TemplateVariant::DataLab => "Data Lab",
            TemplateVariant::SplitScreen => "Split Screen",
            TemplateVariant::MagazineEditorial => "Magazine Editorial",
            TemplateVariant::CardDashboard => "Card Dashboard",
            TemplateVariant::GlassModern => "Glass Modern",
            TemplateVariant::BoldBranding => "Bold Branding",
            TemplateVariant::TimelinePro => "Timeline Pro",
            TemplateVariant::TechnicalResearch => "Technical Research",
        }
    }

    pub fn parse(value: &str) -> Option<TemplateVariant> {
        TemplateVariant::ALL.into_iter().find(|v| v.as_str() == value)
    }
}

impl fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body font family choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStack {
    #[default]
    System,
    Serif,
    Humanist,
    Geometric,
    Mono,
}

impl FontStack {
    pub fn as_str(self) -> &'static str {
        match self {
            FontStack::System => "system",
            FontStack::Serif => "serif",
            FontStack::Humanist => "humanist",
            FontStack::Geometric => "geometric",
            FontStack::Mono => "mono",
        }
    }

    /// CSS `font-family` value.
    pub fn css(self) -> &'static str {
        match self {
            FontStack::System => {
                r#"system-ui, -apple-system, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif"#
            }
            FontStack::Serif => r#"Georgia, Cambria, "Times New Roman", Times, serif"#,
            FontStack::Humanist => r#"Seravek, "Gill Sans Nova", Ubuntu, Calibri, sans-serif"#,
            FontStack::Geometric => r#"Avenir, Montserrat, Corbel, "URW Gothic", sans-serif"#,
            FontStack::Mono => {
                r#"ui-monospace, "Cascadia Code", "Source Code Pro", Menlo, Consolas, monospace"#
            }
        }
    }
}

/// Modular type scale ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeScale {
    Compact,
    #[default]
    Standard,
    Spacious,
}

impl TypeScale {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeScale::Compact => "compact",
            TypeScale::Standard => "standard",
            TypeScale::Spacious => "spacious",
        }
    }

    /// Ratio between consecutive heading sizes.
    pub fn ratio(self) -> &'static str {
        match self {
            TypeScale::Compact => "1.125",
            TypeScale::Standard => "1.2",
            TypeScale::Spacious => "1.25",
        }
    }
}

/// Default aspect ratio for site images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRatio {
    Square,
    #[default]
    Landscape,
    Wide,
    Ultrawide,
    Portrait,
}

impl ImageRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageRatio::Square => "square",
            ImageRatio::Landscape => "landscape",
            ImageRatio::Wide => "wide",
            ImageRatio::Ultrawide => "ultrawide",
            ImageRatio::Portrait => "portrait",
        }
    }

    pub fn parse(value: &str) -> Option<ImageRatio> {
        [
            ImageRatio::Square,
            ImageRatio::Landscape,
            ImageRatio::Wide,
            ImageRatio::Ultrawide,
            ImageRatio::Portrait,
        ]
        .into_iter()
        .find(|r| r.as_str() == value)
    }
}

/// CSS `object-fit` choice; also the crop mode of an image preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
}

impl ImageFit {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFit::Cover => "cover",
            ImageFit::Contain => "contain",
        }
    }

    pub fn parse(value: &str) -> Option<ImageFit> {
        match value {
            "cover" => Some(ImageFit::Cover),
            "contain" => Some(ImageFit::Contain),
            _ => None,
        }
    }
}

/// Image corner treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    #[default]
    Rect,
    Rounded,
    Circle,
}

impl Shape {
    pub fn parse(value: &str) -> Option<Shape> {
        match value {
            "rect" => Some(Shape::Rect),
            "rounded" => Some(Shape::Rounded),
            "circle" => Some(Shape::Circle),
            _ => None,
        }
    }
}

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ProfileId(pub u64);

impl ProfileId {
    /// Id carried by a profile that has not been saved yet.
    pub const UNSAVED: ProfileId = ProfileId(0);
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content grouping; owns projects and at most one layout profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// The six overridable design-token colors of a layout profile.
///
/// A `None` or blank slot means "no override": the token is left out of the
/// render context and the page falls back to the site-setting color.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignTokens {
    pub accent_color: Option<String>,
    pub bg_color: Option<String>,
    pub surface_color: Option<String>,
    pub token_text_color: Option<String>,
    pub muted_text_color: Option<String>,
    pub border_color: Option<String>,
}

impl DesignTokens {
    /// `(field name, CSS custom property, value)` for every slot, in order.
    pub fn slots(&self) -> [(&'static str, &'static str, Option<&str>); 6] {
        [
            ("accent_color", "--accent", self.accent_color.as_deref()),
            ("bg_color", "--bg", self.bg_color.as_deref()),
            ("surface_color", "--surface", self.surface_color.as_deref()),
            ("token_text_color", "--text", self.token_text_color.as_deref()),
            ("muted_text_color", "--text-muted", self.muted_text_color.as_deref()),
            ("border_color", "--border", self.border_color.as_deref()),
        ]
    }
}

/// A named bundle of template variant, theme mode and design-token overrides,
/// scoped either site-wide or to a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutProfile {
    #[serde(default)]
    pub id: ProfileId,
    pub name: String,
    /// Derived from `name` on save when left blank.
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub is_site_default: bool,
    #[serde(default)]
    pub template_variant: TemplateVariant,
    /// `None` inherits the mode implied by the site theme.
    #[serde(default)]
    pub theme_mode: Option<ThemeMode>,
    #[serde(default)]
    pub accent_theme: AccentTheme,
    #[serde(default)]
    pub tokens: DesignTokens,
    #[serde(default)]
    pub hero_image: Option<String>,
    #[serde(default)]
    pub headshot_image: Option<String>,
    #[serde(default)]
    pub font_stack: FontStack,
    #[serde(default)]
    pub type_scale: TypeScale,
}

impl LayoutProfile {
    /// An unsaved profile with every choice at its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProfileId::UNSAVED,
            name: name.into(),
            slug: String::new(),
            category: None,
            is_site_default: false,
            template_variant: TemplateVariant::Default,
            theme_mode: None,
            accent_theme: AccentTheme::Inherit,
            tokens: DesignTokens::default(),
            hero_image: None,
            headshot_image: None,
            font_stack: FontStack::default(),
            type_scale: TypeScale::default(),
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn with_variant(mut self, variant: TemplateVariant) -> Self {
        self.template_variant = variant;
        self
    }

    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn site_default(mut self) -> Self {
        self.is_site_default = true;
        self
    }

    /// Admin list label: `Name [default]`, `Name (Category)`, or just `Name`.
    pub fn display_name(&self, category: Option<&Category>) -> String {
        match (self.is_site_default, category) {
            (true, _) => format!("{} [default]", self.name),
            (false, Some(cat)) => format!("{} ({})", self.name, cat.name),
            (false, None) => self.name.clone(),
        }
    }

    /// Admin "Scope" column.
    pub fn scope_display(&self, category: Option<&Category>) -> String {
        match category {
            Some(cat) => format!("Category: {}", cat.name),
            None if self.is_site_default => "Site Default".to_string(),
            None => "Inactive Site Profile".to_string(),
        }
    }
}

/// Site-wide defaults. At most one row exists; when none does, callers use
/// [`SiteSetting::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSetting {
    pub full_name: String,
    pub headline: String,
    pub bio_short: String,
    pub bio_long: String,
    pub headshot: Option<String>,
    pub linkedin_url: String,
    pub github_url: String,

    pub hero_title: String,
    pub hero_subtitle: String,
    pub hero_image: Option<String>,
    pub about_title: String,
    /// Markdown.
    pub about_body: String,
    pub resume_file: Option<String>,

    /// Stored as a raw string so a value written by an older release still
    /// loads; it is coerced through [`Theme::coerce`] on every read.
    pub theme: String,
    pub motion_enabled: bool,
    pub default_image_ratio: ImageRatio,
    pub default_image_fit: ImageFit,

    pub primary_color: String,
    pub button_text_color: String,
    pub nav_bg_color: String,
    pub nav_text_color: String,
    pub hero_start_color: String,
    pub hero_end_color: String,
    pub hero_text_color: String,
    pub footer_bg_color: String,
    pub footer_text_color: String,
    pub page_bg_color: String,
    pub text_color: String,

    pub homepage_featured_projects_count: u32,
    pub homepage_featured_category_blocks_count: u32,
}

impl Default for SiteSetting {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            headline: String::new(),
            bio_short: String::new(),
            bio_long: String::new(),
            headshot: None,
            linkedin_url: String::new(),
            github_url: String::new(),
            hero_title: "Welcome to my portfolio".to_string(),
            hero_subtitle: String::new(),
            hero_image: None,
            about_title: "About Me".to_string(),
            about_body: String::new(),
            resume_file: None,
            theme: Theme::Light.as_str().to_string(),
            motion_enabled: true,
            default_image_ratio: ImageRatio::Landscape,
            default_image_fit: ImageFit::Cover,
            primary_color: "#0d6efd".to_string(),
            button_text_color: "#ffffff".to_string(),
            nav_bg_color: "#0b1220".to_string(),
            nav_text_color: "#ffffff".to_string(),
            hero_start_color: "#0d6efd".to_string(),
            hero_end_color: "#6f42c1".to_string(),
            hero_text_color: "#ffffff".to_string(),
            footer_bg_color: "#0f172a".to_string(),
            footer_text_color: "#cbd5e1".to_string(),
            page_bg_color: "#f8fafc".to_string(),
            text_color: "#0f172a".to_string(),
            homepage_featured_projects_count: 3,
            homepage_featured_category_blocks_count: 3,
        }
    }
}

impl SiteSetting {
    /// The stored theme, coerced to a known preset.
    pub fn active_theme(&self) -> Theme {
        Theme::coerce(&self.theme)
    }

    /// `(field name, CSS custom property, value)` for all eleven colors.
    pub fn colors(&self) -> [(&'static str, &'static str, &str); 11] {
        [
            ("primary_color", "--primary", self.primary_color.as_str()),
            ("button_text_color", "--button-text", self.button_text_color.as_str()),
            ("nav_bg_color", "--nav-bg", self.nav_bg_color.as_str()),
            ("nav_text_color", "--nav-text", self.nav_text_color.as_str()),
            ("hero_start_color", "--hero-start", self.hero_start_color.as_str()),
            ("hero_end_color", "--hero-end", self.hero_end_color.as_str()),
            ("hero_text_color", "--hero-text", self.hero_text_color.as_str()),
            ("footer_bg_color", "--footer-bg", self.footer_bg_color.as_str()),
            ("footer_text_color", "--footer-text", self.footer_text_color.as_str()),
            ("page_bg_color", "--page-bg", self.page_bg_color.as_str()),
            ("text_color", "--page-text", self.text_color.as_str()),
        ]
    }
}

/// A downloadable resume. At most one per category label is primary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    #[serde(default)]
    pub id: u64,
    /// Free-form label such as `general` or `finance`.
    pub category: String,
    #[serde(default)]
    pub is_primary: bool,
    pub title: String,
    pub file: String,
    #[serde(default)]
    pub preview_pdf: Option<String>,
    #[serde(default)]
    pub alternate_file: Option<String>,
    /// Bumped by the store on every save; newest first in listings.
    #[serde(default)]
    pub revision: u64,
}

impl Resume {
    pub fn new(title: impl Into<String>, category: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            id: 0,
            category: category.into(),
            is_primary: false,
            title: title.into(),
            file: file.into(),
            preview_pdf: None,
            alternate_file: None,
            revision: 0,
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }
}

/// Admin-configurable image display preset (e.g. hero, card, portrait).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageVariant {
    pub name: String,
    /// Ratio in `W:H` form, e.g. `16:9`.
    pub aspect_ratio: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub crop_mode: ImageFit,
    #[serde(default)]
    pub shape: Shape,
    #[serde(default)]
    pub border_radius: String,
    #[serde(default = "default_object_position")]
    pub object_position: String,
    #[serde(default)]
    pub background_color: String,
    #[serde(default = "default_true")]
    pub allow_zoom: bool,
    #[serde(default)]
    pub order: u32,
}

fn default_object_position() -> String {
    "center center".to_string()
}

fn default_true() -> bool {
    true
}

impl ImageVariant {
    pub fn new(name: impl Into<String>, aspect_ratio: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aspect_ratio: aspect_ratio.into(),
            width: None,
            height: None,
            crop_mode: ImageFit::Cover,
            shape: Shape::Rect,
            border_radius: String::new(),
            object_position: default_object_position(),
            background_color: String::new(),
            allow_zoom: true,
            order: 0,
        }
    }

    /// `16:9` → `16 / 9` for the CSS `aspect-ratio` property.
    pub fn css_ratio(&self) -> String {
        self.aspect_ratio.replace(':', " / ")
    }
}

/// An editable navigation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    #[serde(default)]
    pub id: u64,
    pub title: String,
    /// Relative (`/about/`) or absolute URL; empty renders as `#`.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub parent: Option<u64>,
    #[serde(default)]
    pub order: u32,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub external: bool,
    #[serde(default)]
    pub new_tab: bool,
    #[serde(default)]
    pub login_required: bool,
    /// When non-empty, only members of one of these groups see the item.
    #[serde(default)]
    pub allowed_groups: Vec<String>,
    #[serde(default)]
    pub icon: String,
}

impl NavItem {
    pub fn new(title: impl Into<String>, url: impl Into<String>, order: u32) -> Self {
        Self {
            id: 0,
            title: title.into(),
            url: url.into(),
            parent: None,
            order,
            visible: true,
            external: false,
            new_tab: false,
            login_required: false,
            allowed_groups: Vec::new(),
            icon: String::new(),
        }
    }

    pub fn link(&self) -> &str {
        if self.url.is_empty() { "#" } else { &self.url }
    }
}

/// `#rgb` or `#rrggbb`.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// The trimmed value of an optional text field, or `None` when it is blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
