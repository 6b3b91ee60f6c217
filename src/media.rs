//! Image markup helpers shared by the page templates.
//!
//! [`media_img`] renders a plain `<img>` with ratio/fit utility classes.
//! [`responsive_image`] resolves a named display preset into the classes and
//! inline style the responsive image partial needs.

use crate::models::{ImageFit, ImageRatio, ImageVariant, Shape, SiteSetting};
use maud::{Markup, html};
use serde::Serialize;

/// Options for [`media_img`]. Empty ratio/fit fall back to the site defaults.
#[derive(Debug, Clone)]
pub struct MediaImg<'a> {
    pub ratio: &'a str,
    pub fit: &'a str,
    pub alt: &'a str,
    pub extra_class: &'a str,
    pub rounded: bool,
    pub shadow: bool,
}

impl Default for MediaImg<'_> {
    fn default() -> Self {
        Self {
            ratio: "",
            fit: "",
            alt: "",
            extra_class: "",
            rounded: true,
            shadow: false,
        }
    }
}

/// `<img>` with `media-img` utility classes; empty markup without an image.
///
/// Unrecognized ratio or fit values drop their class rather than failing.
pub fn media_img(image: Option<&str>, opts: &MediaImg<'_>, site: &SiteSetting) -> Markup {
    let Some(url) = image.filter(|u| !u.is_empty()) else {
        return html! {};
    };

    let ratio = if opts.ratio.is_empty() {
        Some(site.default_image_ratio)
    } else {
        ImageRatio::parse(opts.ratio)
    };
    let fit = if opts.fit.is_empty() {
        Some(site.default_image_fit)
    } else {
        ImageFit::parse(opts.fit)
    };

    let mut classes = vec!["media-img".to_string()];
    if let Some(ratio) = ratio {
        classes.push(format!("media-img--{}", ratio.as_str()));
    }
    if let Some(fit) = fit {
        classes.push(format!("media-img--{}", fit.as_str()));
    }
    if opts.rounded {
        classes.push("media-img--rounded".to_string());
    }
    if opts.shadow {
        classes.push("media-img--shadow".to_string());
    }
    if !opts.extra_class.is_empty() {
        classes.push(opts.extra_class.to_string());
    }

    html! {
        img src=(url) class=(classes.join(" ")) alt=(opts.alt);
    }
}

/// Presets with a stylesheet class of their own.
fn builtin_class(variant: &str) -> Option<&'static str> {
    match variant {
        "hero" => Some("img-hero"),
        "card" => Some("img-card"),
        "square" => Some("img-square"),
        "portrait" => Some("img-portrait"),
        _ => None,
    }
}

/// Template data for the responsive image partial.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsiveImage {
    pub image_url: String,
    pub css_classes: String,
    pub css_style: String,
    pub alt_text: String,
}

impl ResponsiveImage {
    pub fn render(&self) -> Markup {
        html! {
            @if !self.image_url.is_empty() {
                img src=(self.image_url)
                    class=(self.css_classes)
                    style=[(!self.css_style.is_empty()).then_some(&self.css_style)]
                    alt=(self.alt_text);
            }
        }
    }
}

/// Resolve a display preset for an image.
///
/// `variant` is a built-in name (`hero`, `card`, `square`, `portrait`), the
/// name of an [`ImageVariant`] found through `presets`, or empty for the
/// site's default ratio. Unknown names render as a card. `shape` overrides
/// the preset's shape when non-empty.
pub fn responsive_image(
    image: Option<&str>,
    variant: &str,
    alt: &str,
    extra_class: &str,
    shape: &str,
    site: &SiteSetting,
    presets: impl Fn(&str) -> Option<ImageVariant>,
) -> ResponsiveImage {
    let image_url = image.unwrap_or_default().to_string();
    let mut classes: Vec<String> = Vec::new();
    let mut styles: Vec<String> = Vec::new();
    let mut effective_shape = Shape::parse(shape);
    let mut border_radius = String::new();
    let mut allow_zoom = true;

    if variant.is_empty() {
        classes.push(format!(
            "media-img media-img--{} media-img--cover",
            site.default_image_ratio.as_str()
        ));
    } else if let Some(class) = builtin_class(variant) {
        classes.push(class.to_string());
    } else if let Some(preset) = presets(variant) {
        styles.push(format!("aspect-ratio: {}", preset.css_ratio()));
        styles.push(format!("object-fit: {}", preset.crop_mode.as_str()));
        styles.push("width: 100%".to_string());
        styles.push("display: block".to_string());
        if let Some(width) = preset.width {
            styles.push(format!("max-width: {width}px"));
        }
        if let Some(height) = preset.height {
            styles.push(format!("max-height: {height}px"));
        }
        if !preset.object_position.is_empty() && preset.object_position != "center center" {
            styles.push(format!("object-position: {}", preset.object_position));
        }
        if !preset.background_color.is_empty() {
            styles.push(format!("background-color: {}", preset.background_color));
        }
        if shape.is_empty() {
            effective_shape = Some(preset.shape);
        }
        border_radius = preset.border_radius;
        allow_zoom = preset.allow_zoom;
    } else {
        tracing::debug!(variant, "unknown image variant; using card style");
        classes.push("img-card".to_string());
    }

    match effective_shape {
        Some(Shape::Circle) => classes.push("img-shape-circle".to_string()),
        Some(Shape::Rounded) if !border_radius.is_empty() => {
            styles.push(format!("border-radius: {border_radius}"));
            styles.push("overflow: hidden".to_string());
        }
        Some(Shape::Rounded) => classes.push("img-shape-rounded".to_string()),
        Some(Shape::Rect) => {}
        None => classes.push("media-img--rounded".to_string()),
    }

    if !image_url.is_empty() && allow_zoom {
        classes.push("img-hover-scale".to_string());
    }
    if !extra_class.is_empty() {
        classes.push(extra_class.to_string());
    }

    let css_style = if styles.is_empty() {
        String::new()
    } else {
        format!("{};", styles.join("; "))
    };

    ResponsiveImage {
        image_url,
        css_classes: classes.join(" "),
        css_style,
        alt_text: alt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_presets(_: &str) -> Option<ImageVariant> {
        None
    }

    fn banner_preset(name: &str) -> Option<ImageVariant> {
        (name == "banner").then(|| {
            let mut v = ImageVariant::new("banner", "21:9");
            v.crop_mode = ImageFit::Contain;
            v.width = Some(1200);
            v.object_position = "top center".to_string();
            v.background_color = "#000000".to_string();
            v.shape = Shape::Rounded;
            v.border_radius = "12px".to_string();
            v.allow_zoom = false;
            v
        })
    }

    #[test]
    fn media_img_empty_without_image() {
        let site = SiteSetting::default();
        assert_eq!(media_img(None, &MediaImg::default(), &site).into_string(), "");
        assert_eq!(media_img(Some(""), &MediaImg::default(), &site).into_string(), "");
    }

    #[test]
    fn media_img_uses_site_defaults() {
        let site = SiteSetting {
            default_image_ratio: ImageRatio::Wide,
            default_image_fit: ImageFit::Contain,
            ..Default::default()
        };
        let html = media_img(Some("/media/a.jpg"), &MediaImg::default(), &site).into_string();
        assert!(html.contains(r#"class="media-img media-img--wide media-img--contain media-img--rounded""#));
        assert!(html.contains(r#"src="/media/a.jpg""#));
    }

    #[test]
    fn media_img_drops_unknown_ratio() {
        let opts = MediaImg {
            ratio: "panorama",
            fit: "cover",
            rounded: false,
            shadow: true,
            ..Default::default()
        };
        let html = media_img(Some("a.jpg"), &opts, &SiteSetting::default()).into_string();
        assert!(html.contains(r#"class="media-img media-img--cover media-img--shadow""#));
    }

    #[test]
    fn media_img_escapes_alt() {
        let opts = MediaImg {
            alt: r#"say "hi""#,
            ..Default::default()
        };
        let html = media_img(Some("a.jpg"), &opts, &SiteSetting::default()).into_string();
        assert!(html.contains("&quot;hi&quot;"));
    }

    #[test]
    fn builtin_variant_class() {
        let img = responsive_image(Some("a.jpg"), "hero", "", "", "", &SiteSetting::default(), no_presets);
        assert_eq!(img.css_classes, "img-hero media-img--rounded img-hover-scale");
        assert_eq!(img.css_style, "");
    }

    #[test]
    fn unknown_variant_is_card() {
        let img = responsive_image(Some("a.jpg"), "mystery", "", "", "rect", &SiteSetting::default(), no_presets);
        assert_eq!(img.css_classes, "img-card img-hover-scale");
    }

    #[test]
    fn no_variant_uses_site_ratio() {
        let site = SiteSetting {
            default_image_ratio: ImageRatio::Portrait,
            ..Default::default()
        };
        let img = responsive_image(None, "", "Alt", "", "", &site, no_presets);
        assert_eq!(img.css_classes, "media-img media-img--portrait media-img--cover media-img--rounded");
        assert_eq!(img.alt_text, "Alt");
    }

    #[test]
    fn preset_builds_inline_style() {
        let img = responsive_image(Some("a.jpg"), "banner", "", "", "", &SiteSetting::default(), banner_preset);
        assert_eq!(
            img.css_style,
            "aspect-ratio: 21 / 9; object-fit: contain; width: 100%; display: block; \
             max-width: 1200px; object-position: top center; background-color: #000000; \
             border-radius: 12px; overflow: hidden;"
        );
        // zoom disabled by the preset
        assert_eq!(img.css_classes, "");
    }

    #[test]
    fn shape_argument_overrides_preset() {
        let img = responsive_image(Some("a.jpg"), "banner", "", "extra", "circle", &SiteSetting::default(), banner_preset);
        assert_eq!(img.css_classes, "img-shape-circle extra");
        assert!(!img.css_style.contains("border-radius"));
    }

    #[test]
    fn rounded_without_radius_uses_class() {
        let img = responsive_image(Some("a.jpg"), "square", "", "", "rounded", &SiteSetting::default(), no_presets);
        assert_eq!(img.css_classes, "img-square img-shape-rounded img-hover-scale");
    }

    #[test]
    fn hover_scale_needs_image() {
        let img = responsive_image(None, "card", "", "", "rect", &SiteSetting::default(), no_presets);
        assert_eq!(img.css_classes, "img-card");
    }

    #[test]
    fn render_skips_empty_style() {
        let img = responsive_image(Some("a.jpg"), "card", "Pic", "", "", &SiteSetting::default(), no_presets);
        let html = img.render().into_string();
        assert!(html.starts_with("<img"));
        assert!(!html.contains("style="));
        assert!(html.contains(r#"alt="Pic""#));
    }
}
