//! CLI output formatting.
//!
//! Output is **information-centric**: each entity leads with its positional
//! index and name, and details follow on indented context lines.
//!
//! # Output Format
//!
//! ## Resolve
//!
//! ```text
//! Profile: saas (modern_saas)
//! Theme: dark
//! Candidates
//!     001 portfolio/variants/modern_saas/dark/home.html
//!     002 portfolio/variants/modern_saas/home.html
//!     003 portfolio/dark/home.html
//!     004 portfolio/home.html
//! Context
//!     accent_color = "#ff0000"
//!     theme_mode = "dark"
//! ```
//!
//! ## Profiles
//!
//! ```text
//! 001 Modern SaaS [default]
//!     Id: 4
//!     Slug: saas
//!     Scope: Site Default
//!     Variant: modern_saas
//!     Tokens: accent_color
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::models::{Category, LayoutProfile, non_blank};
use crate::render::{VariantInventory, VariantReview};
use crate::store::SeedReport;
use crate::tokens::LayoutContext;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// resolve
// ============================================================================

/// Format the outcome of resolving one page request.
pub fn format_resolution(layout: &LayoutContext, candidates: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    match &layout.active_profile {
        Some(slug) => lines.push(format!("Profile: {} ({})", slug, layout.template_variant)),
        None => lines.push("Profile: none (built-in defaults)".to_string()),
    }
    lines.push(format!("Theme: {}", layout.theme));

    lines.push("Candidates".to_string());
    for (i, path) in candidates.iter().enumerate() {
        lines.push(format!("{}{} {}", indent(1), format_index(i + 1), path));
    }

    lines.push("Context".to_string());
    for (key, value) in layout.to_map() {
        lines.push(format!("{}{} = {}", indent(1), key, value));
    }
    lines
}

pub fn print_resolution(layout: &LayoutContext, candidates: &[String]) {
    print_lines(format_resolution(layout, candidates));
}

// ============================================================================
// render
// ============================================================================

pub fn format_render(template: &str, bytes: usize, target: Option<&str>) -> Vec<String> {
    let mut lines = vec![format!("Template: {}", template)];
    match target {
        Some(path) => lines.push(format!("Wrote {} bytes \u{2192} {}", bytes, path)),
        None => lines.push(format!("Rendered {} bytes", bytes)),
    }
    lines
}

pub fn print_render(template: &str, bytes: usize, target: Option<&str>) {
    print_lines(format_render(template, bytes, target));
}

// ============================================================================
// profiles
// ============================================================================

/// Format the layout profile listing in the order given.
pub fn format_profiles(profiles: &[LayoutProfile], categories: &[Category]) -> Vec<String> {
    if profiles.is_empty() {
        return vec!["No layout profiles (run `seed` to create one per variant)".to_string()];
    }
    let mut lines = Vec::new();
    for (i, profile) in profiles.iter().enumerate() {
        let category = profile
            .category
            .and_then(|id| categories.iter().find(|c| c.id == id));
        lines.push(format!(
            "{} {}",
            format_index(i + 1),
            profile.display_name(category)
        ));
        lines.push(format!("{}Id: {}", indent(1), profile.id));
        lines.push(format!("{}Slug: {}", indent(1), profile.slug));
        lines.push(format!("{}Scope: {}", indent(1), profile.scope_display(category)));
        lines.push(format!("{}Variant: {}", indent(1), profile.template_variant));
        let tokens: Vec<&str> = profile
            .tokens
            .slots()
            .into_iter()
            .filter(|(_, _, value)| non_blank(*value).is_some())
            .map(|(field, _, _)| field)
            .collect();
        if !tokens.is_empty() {
            lines.push(format!("{}Tokens: {}", indent(1), tokens.join(", ")));
        }
    }
    lines
}

pub fn print_profiles(profiles: &[LayoutProfile], categories: &[Category]) {
    print_lines(format_profiles(profiles, categories));
}

// ============================================================================
// seed
// ============================================================================

pub fn format_seed_report(report: &SeedReport) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, slug) in report.created.iter().enumerate() {
        lines.push(format!("{} {} (created)", format_index(i + 1), slug));
    }
    lines.push(format!(
        "Seeded {} profiles, {} already present",
        report.created.len(),
        report.existing
    ));
    lines
}

pub fn print_seed_report(report: &SeedReport) {
    print_lines(format_seed_report(report));
}

// ============================================================================
// check
// ============================================================================

/// Format the template inventory. Complete variants get a single line.
pub fn format_inventory(inventory: &[VariantInventory], unknown_dirs: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, entry) in inventory.iter().enumerate() {
        let total = entry.present.len() + entry.missing.len();
        lines.push(format!(
            "{} {} ({}/{} pages)",
            format_index(i + 1),
            entry.variant,
            entry.present.len(),
            total
        ));
        for missing in &entry.missing {
            lines.push(format!("{}missing: {}", indent(1), missing));
        }
    }
    for dir in unknown_dirs {
        lines.push(format!("Unknown variant directory: portfolio/variants/{}/", dir));
    }
    let complete = inventory.iter().filter(|e| e.is_complete()).count();
    lines.push(format!(
        "{} of {} variants complete",
        complete,
        inventory.len()
    ));
    lines
}

pub fn print_inventory(inventory: &[VariantInventory], unknown_dirs: &[String]) {
    print_lines(format_inventory(inventory, unknown_dirs));
}

// ============================================================================
// variant-review
// ============================================================================

/// Format the development-mode variant review: one block per variant with
/// the preview link for every page.
pub fn format_variant_review(rows: &[VariantReview], pages: &[(&str, String)]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        lines.push(format!("{} {} ({})", format_index(i + 1), row.label, row.variant));
        match &row.profile_slug {
            Some(slug) => {
                for (title, url) in pages {
                    lines.push(format!("{}{}: {}?profile={}", indent(1), title, url, slug));
                }
            }
            None => lines.push(format!("{}no profile uses this variant", indent(1))),
        }
    }
    lines
}

pub fn print_variant_review(rows: &[VariantReview], pages: &[(&str, String)]) {
    print_lines(format_variant_review(rows, pages));
}

// ============================================================================
// Tests
// ============================================================================
