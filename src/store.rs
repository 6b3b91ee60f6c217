//! Configuration store: site settings, layout profiles and their neighbours.
//!
//! # Design
//!
//! All rows live in memory behind a single `RwLock`. Reads clone what they
//! need and release the lock immediately; nothing hands out references into
//! the store.
//!
//! Every write goes through [`ConfigStore::transaction`]: the closure works on
//! a *copy* of the current state, and the copy is persisted and swapped in
//! only if the closure succeeds. A failed validation leaves the store exactly
//! as it was, and readers never see a half-applied write. This is what makes
//! the two demote-then-set invariants hold:
//!
//! 1. at most one layout profile has `is_site_default = true`;
//! 2. at most one resume per category label has `is_primary = true`.
//!
//! In both cases the write that sets the flag clears it on every other row
//! in the same transaction, so the last writer wins.
//!
//! ## Storage
//!
//! The store file is versioned pretty-printed JSON. It is written to a
//! sibling temp file and renamed into place. A store opened without a path
//! ([`ConfigStore::in_memory`]) never touches disk.

use crate::models::{
    Category, CategoryId, ImageVariant, LayoutProfile, NavItem, ProfileId, Resume, SiteSetting,
    TemplateVariant, is_hex_color, non_blank,
};
use crate::nav::{self, NavCache, NavNode, Viewer};
use crate::naming::slugify;
use crate::resolve::ProfileLookup;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Version of the store file format.
const STORE_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Store file {path} has format version {found}, expected {expected}")]
    Version {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Slug already in use: {0}")]
    DuplicateSlug(String),
    #[error("Category '{0}' already has a layout profile")]
    CategoryTaken(String),
    #[error("No category with id {0}")]
    UnknownCategory(u64),
    #[error("No layout profile with id {0}")]
    UnknownProfile(ProfileId),
    #[error("No {kind} with id {id}")]
    UnknownRow { kind: &'static str, id: u64 },
    #[error("Select exactly one layout profile (got {0})")]
    SelectionCount(usize),
}

/// Everything the store persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreState {
    pub version: u32,
    next_id: u64,
    #[serde(default)]
    pub site_setting: Option<SiteSetting>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub profiles: Vec<LayoutProfile>,
    #[serde(default)]
    pub resumes: Vec<Resume>,
    #[serde(default)]
    pub image_variants: Vec<ImageVariant>,
    #[serde(default)]
    pub nav_items: Vec<NavItem>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            next_id: 1,
            site_setting: None,
            categories: Vec::new(),
            profiles: Vec::new(),
            resumes: Vec::new(),
            image_variants: Vec::new(),
            nav_items: Vec::new(),
        }
    }
}

impl StoreState {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }
}

/// Outcome of [`ConfigStore::seed_layout_profiles`].
#[derive(Debug, Default, PartialEq)]
pub struct SeedReport {
    /// Slugs of the profiles created by this run.
    pub created: Vec<String>,
    /// Number of variant profiles that already existed and were left alone.
    pub existing: usize,
}

pub struct ConfigStore {
    path: Option<PathBuf>,
    state: RwLock<StoreState>,
    nav_cache: NavCache,
}

impl ConfigStore {
    /// A store that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: RwLock::new(StoreState::default()),
            nav_cache: NavCache::new(),
        }
    }

    /// Open the store persisted at `path`. A missing file is an empty store;
    /// the file is created on the first write.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let state = read_state(path)?;
        tracing::debug!(
            path = %path.display(),
            profiles = state.profiles.len(),
            "opened configuration store"
        );
        Ok(Self {
            path: Some(path.to_path_buf()),
            state: RwLock::new(state),
            nav_cache: NavCache::new(),
        })
    }

    /// Re-read persisted state, picking up edits made by another process.
    pub fn reload(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let fresh = read_state(path)?;
        *self.state.write() = fresh;
        self.nav_cache.invalidate();
        tracing::info!(path = %path.display(), "configuration store reloaded");
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run `apply` against a copy of the state; persist and commit only when
    /// it succeeds and the result still passes [`validate_state`].
    pub fn transaction<T>(
        &self,
        apply: impl FnOnce(&mut StoreState) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.state.write();
        let mut draft = guard.clone();
        let out = apply(&mut draft)?;
        validate_state(&draft)?;
        if let Some(path) = &self.path {
            write_state(path, &draft)?;
        }
        *guard = draft;
        Ok(out)
    }

    /// Clone of the full state, for listings and diagnostics.
    pub fn snapshot(&self) -> StoreState {
        self.state.read().clone()
    }

    // =========================================================================
    // SiteSetting
    // =========================================================================

    /// The singleton settings row, if one has been saved.
    pub fn site_setting(&self) -> Option<SiteSetting> {
        self.state.read().site_setting.clone()
    }

    /// Create or replace the settings row. There is no delete.
    pub fn save_site_setting(&self, setting: SiteSetting) -> Result<SiteSetting, StoreError> {
        check_site_colors(&setting)?;
        let saved = self.transaction(|state| {
            state.site_setting = Some(setting.clone());
            Ok(setting)
        })?;
        tracing::info!(theme = %saved.theme, "site settings saved");
        Ok(saved)
    }

    // =========================================================================
    // Categories
    // =========================================================================

    pub fn categories(&self) -> Vec<Category> {
        let mut categories = self.state.read().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }

    pub fn category(&self, id: CategoryId) -> Option<Category> {
        self.state.read().category(id).cloned()
    }

    pub fn category_by_slug(&self, slug: &str) -> Option<Category> {
        self.state
            .read()
            .categories
            .iter()
            .find(|c| c.slug == slug)
            .cloned()
    }

    /// Create a category; the slug is derived from the name.
    pub fn create_category(&self, name: &str, description: &str) -> Result<Category, StoreError> {
        let name = name.trim();
        let slug = slugify(name);
        if name.is_empty() || slug.is_empty() {
            return Err(StoreError::Validation(
                "category name must contain letters or digits".into(),
            ));
        }
        self.transaction(|state| {
            if state.categories.iter().any(|c| c.name == name || c.slug == slug) {
                return Err(StoreError::DuplicateSlug(slug.clone()));
            }
            let category = Category {
                id: CategoryId(state.allocate_id()),
                name: name.to_string(),
                slug: slug.clone(),
                description: description.to_string(),
                image: None,
            };
            state.categories.push(category.clone());
            Ok(category)
        })
    }

    /// Delete a category. Its layout profile, if any, is kept but detached.
    pub fn delete_category(&self, id: CategoryId) -> Result<(), StoreError> {
        self.transaction(|state| {
            let before = state.categories.len();
            state.categories.retain(|c| c.id != id);
            if state.categories.len() == before {
                return Err(StoreError::UnknownCategory(id.0));
            }
            for profile in state.profiles.iter_mut().filter(|p| p.category == Some(id)) {
                profile.category = None;
            }
            Ok(())
        })
    }

    // =========================================================================
    // Layout profiles
    // =========================================================================

    /// All profiles ordered by name.
    pub fn profiles(&self) -> Vec<LayoutProfile> {
        let mut profiles = self.state.read().profiles.clone();
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        profiles
    }

    pub fn profile(&self, id: ProfileId) -> Option<LayoutProfile> {
        self.state
            .read()
            .profiles
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// Insert (when `profile.id` is [`ProfileId::UNSAVED`]) or update a profile.
    ///
    /// A blank slug is derived from the name. Saving with
    /// `is_site_default = true` clears the flag on every other profile in the
    /// same transaction.
    pub fn save_profile(&self, mut profile: LayoutProfile) -> Result<LayoutProfile, StoreError> {
        profile.name = profile.name.trim().to_string();
        if profile.name.is_empty() {
            return Err(StoreError::Validation("profile name is required".into()));
        }
        profile.slug = profile.slug.trim().to_string();
        if profile.slug.is_empty() {
            profile.slug = slugify(&profile.name);
        }
        if profile.slug.is_empty() {
            return Err(StoreError::Validation(
                "profile slug could not be derived from its name".into(),
            ));
        }
        check_token_colors(&profile)?;

        let saved = self.transaction(|state| {
            if let Some(category_id) = profile.category {
                let category = state
                    .category(category_id)
                    .ok_or(StoreError::UnknownCategory(category_id.0))?;
                if state
                    .profiles
                    .iter()
                    .any(|p| p.id != profile.id && p.category == Some(category_id))
                {
                    return Err(StoreError::CategoryTaken(category.name.clone()));
                }
            }
            if state
                .profiles
                .iter()
                .any(|p| p.id != profile.id && p.slug == profile.slug)
            {
                return Err(StoreError::DuplicateSlug(profile.slug.clone()));
            }

            if profile.id == ProfileId::UNSAVED {
                profile.id = ProfileId(state.allocate_id());
                state.profiles.push(profile.clone());
            } else {
                let slot = state
                    .profiles
                    .iter_mut()
                    .find(|p| p.id == profile.id)
                    .ok_or(StoreError::UnknownProfile(profile.id))?;
                *slot = profile.clone();
            }

            if profile.is_site_default {
                demote_other_defaults(state, profile.id);
            }
            Ok(profile)
        })?;

        tracing::info!(
            slug = %saved.slug,
            variant = %saved.template_variant,
            site_default = saved.is_site_default,
            "layout profile saved"
        );
        Ok(saved)
    }

    /// Admin action: promote the single selected profile to site default.
    ///
    /// Anything other than exactly one selected id is rejected and nothing
    /// changes.
    pub fn make_site_default(&self, selection: &[ProfileId]) -> Result<LayoutProfile, StoreError> {
        let [id] = selection else {
            return Err(StoreError::SelectionCount(selection.len()));
        };
        let promoted = self.transaction(|state| {
            let profile = state
                .profiles
                .iter_mut()
                .find(|p| p.id == *id)
                .ok_or(StoreError::UnknownProfile(*id))?;
            profile.is_site_default = true;
            let promoted = profile.clone();
            demote_other_defaults(state, *id);
            Ok(promoted)
        })?;
        tracing::info!(slug = %promoted.slug, "layout profile promoted to site default");
        Ok(promoted)
    }

    pub fn delete_profile(&self, id: ProfileId) -> Result<(), StoreError> {
        self.transaction(|state| {
            let before = state.profiles.len();
            state.profiles.retain(|p| p.id != id);
            if state.profiles.len() == before {
                return Err(StoreError::UnknownProfile(id));
            }
            Ok(())
        })
    }

    /// Create one profile per template variant (`variant-<slug>`).
    ///
    /// Existing variant profiles are left untouched, so re-running keeps any
    /// customized tokens. The `default` variant's profile becomes the site
    /// default only when no site default exists yet.
    pub fn seed_layout_profiles(&self) -> Result<SeedReport, StoreError> {
        let report = self.transaction(|state| {
            let mut report = SeedReport::default();
            for variant in TemplateVariant::ALL {
                let slug = format!("variant-{}", variant.as_str());
                if state.profiles.iter().any(|p| p.slug == slug) {
                    report.existing += 1;
                    continue;
                }
                let mut profile = LayoutProfile::new(format!("{} Layout", variant.label()))
                    .with_slug(slug.clone())
                    .with_variant(variant);
                profile.id = ProfileId(state.allocate_id());
                if variant == TemplateVariant::Default
                    && !state.profiles.iter().any(|p| p.is_site_default)
                {
                    profile.is_site_default = true;
                }
                state.profiles.push(profile);
                report.created.push(slug);
            }
            Ok(report)
        })?;
        tracing::info!(
            created = report.created.len(),
            existing = report.existing,
            "seeded layout profiles"
        );
        Ok(report)
    }

    // =========================================================================
    // Resumes
    // =========================================================================

    /// All resumes, most recently saved first.
    pub fn resumes(&self) -> Vec<Resume> {
        let mut resumes = self.state.read().resumes.clone();
        resumes.sort_by(|a, b| b.revision.cmp(&a.revision));
        resumes
    }

    /// The primary resume for a category label.
    pub fn primary_resume(&self, category: &str) -> Option<Resume> {
        self.state
            .read()
            .resumes
            .iter()
            .find(|r| r.is_primary && r.category == category)
            .cloned()
    }

    /// Insert (id 0) or update a resume. Saving a primary resume demotes every
    /// other primary resume with the same category label, and only those.
    pub fn save_resume(&self, mut resume: Resume) -> Result<Resume, StoreError> {
        resume.title = resume.title.trim().to_string();
        if resume.title.is_empty() {
            return Err(StoreError::Validation("resume title is required".into()));
        }
        if resume.file.trim().is_empty() {
            return Err(StoreError::Validation("resume file is required".into()));
        }
        if resume.category.trim().is_empty() {
            resume.category = "general".to_string();
        }
        let saved = self.transaction(|state| {
            resume.revision = state.allocate_id();
            if resume.id == 0 {
                resume.id = state.allocate_id();
                state.resumes.push(resume.clone());
            } else {
                let slot = state
                    .resumes
                    .iter_mut()
                    .find(|r| r.id == resume.id)
                    .ok_or(StoreError::UnknownRow {
                        kind: "resume",
                        id: resume.id,
                    })?;
                *slot = resume.clone();
            }
            if resume.is_primary {
                for other in state
                    .resumes
                    .iter_mut()
                    .filter(|r| r.id != resume.id && r.category == resume.category)
                {
                    other.is_primary = false;
                }
            }
            Ok(resume)
        })?;
        tracing::info!(
            title = %saved.title,
            category = %saved.category,
            primary = saved.is_primary,
            "resume saved"
        );
        Ok(saved)
    }

    // =========================================================================
    // Image variants
    // =========================================================================

    /// Presets ordered by `(order, name)`.
    pub fn image_variants(&self) -> Vec<ImageVariant> {
        let mut variants = self.state.read().image_variants.clone();
        variants.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        variants
    }

    pub fn image_variant(&self, name: &str) -> Option<ImageVariant> {
        self.state
            .read()
            .image_variants
            .iter()
            .find(|v| v.name == name)
            .cloned()
    }

    /// Create or replace the preset with the same name.
    pub fn save_image_variant(&self, variant: ImageVariant) -> Result<ImageVariant, StoreError> {
        if variant.name.trim().is_empty() {
            return Err(StoreError::Validation("image variant name is required".into()));
        }
        if !is_ratio(&variant.aspect_ratio) {
            return Err(StoreError::Validation(format!(
                "aspect_ratio must look like 16:9 (got '{}')",
                variant.aspect_ratio
            )));
        }
        if !variant.background_color.is_empty() && !is_hex_color(&variant.background_color) {
            return Err(StoreError::Validation(format!(
                "background_color: enter a valid hex color (got '{}')",
                variant.background_color
            )));
        }
        self.transaction(|state| {
            match state.image_variants.iter_mut().find(|v| v.name == variant.name) {
                Some(slot) => *slot = variant.clone(),
                None => state.image_variants.push(variant.clone()),
            }
            Ok(variant)
        })
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn nav_items(&self) -> Vec<NavItem> {
        self.state.read().nav_items.clone()
    }

    /// Insert (id 0) or update a nav row, then invalidate the nav cache.
    pub fn save_nav_item(&self, mut item: NavItem) -> Result<NavItem, StoreError> {
        if item.title.trim().is_empty() {
            return Err(StoreError::Validation("nav item title is required".into()));
        }
        let saved = self.transaction(|state| {
            if let Some(parent) = item.parent {
                if !state.nav_items.iter().any(|n| n.id == parent) {
                    return Err(StoreError::UnknownRow {
                        kind: "nav item",
                        id: parent,
                    });
                }
                if item.id != 0 && nav_subtree(&state.nav_items, item.id).contains(&parent) {
                    return Err(StoreError::Validation(format!(
                        "nav item '{}' cannot be nested under itself or one of its children",
                        item.title
                    )));
                }
            }
            if item.id == 0 {
                item.id = state.allocate_id();
                state.nav_items.push(item.clone());
            } else {
                let slot = state
                    .nav_items
                    .iter_mut()
                    .find(|n| n.id == item.id)
                    .ok_or(StoreError::UnknownRow {
                        kind: "nav item",
                        id: item.id,
                    })?;
                *slot = item.clone();
            }
            Ok(item)
        })?;
        self.nav_cache.invalidate();
        Ok(saved)
    }

    /// Delete a nav row and its descendants, then invalidate the nav cache.
    pub fn delete_nav_item(&self, id: u64) -> Result<(), StoreError> {
        self.transaction(|state| {
            if !state.nav_items.iter().any(|n| n.id == id) {
                return Err(StoreError::UnknownRow {
                    kind: "nav item",
                    id,
                });
            }
            let doomed = nav_subtree(&state.nav_items, id);
            state.nav_items.retain(|n| !doomed.contains(&n.id));
            Ok(())
        })?;
        self.nav_cache.invalidate();
        Ok(())
    }

    /// Menu tree for `viewer`, served from the process-wide nav cache.
    pub fn navigation(&self, viewer: &Viewer) -> Vec<NavNode> {
        let rows = self
            .nav_cache
            .get_or_load(|| nav::visible_sorted(&self.state.read().nav_items));
        nav::build_nav_tree(&rows, viewer)
    }

    pub fn nav_cache(&self) -> &NavCache {
        &self.nav_cache
    }
}

impl ProfileLookup for ConfigStore {
    fn profile_for_category(&self, category: CategoryId) -> Option<LayoutProfile> {
        self.state
            .read()
            .profiles
            .iter()
            .find(|p| p.category == Some(category))
            .cloned()
    }

    fn site_default_profile(&self) -> Option<LayoutProfile> {
        self.state
            .read()
            .profiles
            .iter()
            .find(|p| p.is_site_default)
            .cloned()
    }

    fn profile_by_slug(&self, slug: &str) -> Option<LayoutProfile> {
        self.state
            .read()
            .profiles
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
    }
}

fn demote_other_defaults(state: &mut StoreState, keep: ProfileId) {
    for other in state
        .profiles
        .iter_mut()
        .filter(|p| p.id != keep && p.is_site_default)
    {
        tracing::debug!(slug = %other.slug, "demoting previous site default");
        other.is_site_default = false;
    }
}

/// `root` and every row below it. Each id is visited once, so a parent
/// cycle cannot loop.
fn nav_subtree(items: &[NavItem], root: u64) -> HashSet<u64> {
    let mut seen = HashSet::from([root]);
    let mut queue = vec![root];
    while let Some(parent) = queue.pop() {
        for child in items.iter().filter(|n| n.parent == Some(parent)) {
            if seen.insert(child.id) {
                queue.push(child.id);
            }
        }
    }
    seen
}

/// True when following parent links from `id` comes back to `id`.
fn nav_in_cycle(items: &[NavItem], id: u64) -> bool {
    let mut seen = HashSet::new();
    let mut current = items.iter().find(|n| n.id == id).and_then(|n| n.parent);
    while let Some(parent) = current {
        if parent == id || !seen.insert(parent) {
            return parent == id;
        }
        current = items.iter().find(|n| n.id == parent).and_then(|n| n.parent);
    }
    false
}

fn check_site_colors(setting: &SiteSetting) -> Result<(), StoreError> {
    for (field, _, value) in setting.colors() {
        if !is_hex_color(value) {
            return Err(StoreError::Validation(format!(
                "{field}: enter a valid hex color, e.g. #00aaff (got '{value}')"
            )));
        }
    }
    Ok(())
}

fn check_token_colors(profile: &LayoutProfile) -> Result<(), StoreError> {
    for (field, _, value) in profile.tokens.slots() {
        if let Some(value) = non_blank(value)
            && !is_hex_color(value)
        {
            return Err(StoreError::Validation(format!(
                "{}: {field}: enter a valid hex color, e.g. #00aaff (got '{value}')",
                profile.slug
            )));
        }
    }
    Ok(())
}

/// Invariants every committed or loaded state must satisfy: one site
/// default at most, one primary resume per category at most, unique
/// profile slugs, one profile per category, hex colors, and acyclic
/// navigation.
pub fn validate_state(state: &StoreState) -> Result<(), StoreError> {
    let defaults: Vec<&str> = state
        .profiles
        .iter()
        .filter(|p| p.is_site_default)
        .map(|p| p.slug.as_str())
        .collect();
    if defaults.len() > 1 {
        return Err(StoreError::Validation(format!(
            "more than one site-default layout profile: {}",
            defaults.join(", ")
        )));
    }

    let mut primaries = HashSet::new();
    for resume in state.resumes.iter().filter(|r| r.is_primary) {
        if !primaries.insert(resume.category.as_str()) {
            return Err(StoreError::Validation(format!(
                "more than one primary resume in category '{}'",
                resume.category
            )));
        }
    }

    let mut slugs = HashSet::new();
    let mut scoped = HashSet::new();
    for profile in &state.profiles {
        if !slugs.insert(profile.slug.as_str()) {
            return Err(StoreError::DuplicateSlug(profile.slug.clone()));
        }
        if let Some(category) = profile.category
            && !scoped.insert(category)
        {
            return Err(StoreError::CategoryTaken(
                state
                    .category(category)
                    .map_or_else(|| category.0.to_string(), |c| c.name.clone()),
            ));
        }
        check_token_colors(profile)?;
    }

    if let Some(setting) = &state.site_setting {
        check_site_colors(setting)?;
    }

    if let Some(item) = state
        .nav_items
        .iter()
        .find(|n| nav_in_cycle(&state.nav_items, n.id))
    {
        return Err(StoreError::Validation(format!(
            "nav item '{}' is its own ancestor",
            item.title
        )));
    }
    Ok(())
}

/// `W:H` with positive integers.
fn is_ratio(value: &str) -> bool {
    match value.split_once(':') {
        Some((w, h)) => matches!(
            (w.trim().parse::<u32>(), h.trim().parse::<u32>()),
            (Ok(w), Ok(h)) if w > 0 && h > 0
        ),
        None => false,
    }
}

fn read_state(path: &Path) -> Result<StoreState, StoreError> {
    if !path.exists() {
        return Ok(StoreState::default());
    }
    let content = fs::read_to_string(path)?;
    let state: StoreState = serde_json::from_str(&content)?;
    if state.version != STORE_VERSION {
        return Err(StoreError::Version {
            path: path.to_path_buf(),
            found: state.version,
            expected: STORE_VERSION,
        });
    }
    validate_state(&state)?;
    Ok(state)
}

fn write_state(path: &Path, state: &StoreState) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DesignTokens;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    // =========================================================================
    // Site default invariant
    // =========================================================================

    #[test]
    fn setting_site_default_demotes_existing() {
        let store = ConfigStore::in_memory();
        let first = store
            .save_profile(LayoutProfile::new("First LP").site_default())
            .unwrap();
        let second = store
            .save_profile(LayoutProfile::new("Second LP").site_default())
            .unwrap();

        assert!(!store.profile(first.id).unwrap().is_site_default);
        assert!(store.profile(second.id).unwrap().is_site_default);
        assert_eq!(site_default_count(&store), 1);
    }

    #[test]
    fn updating_existing_profile_to_default_demotes_others() {
        let store = ConfigStore::in_memory();
        store
            .save_profile(LayoutProfile::new("Old Default").site_default())
            .unwrap();
        let mut newer = store.save_profile(LayoutProfile::new("New Default")).unwrap();
        newer.is_site_default = true;
        store.save_profile(newer).unwrap();

        assert_eq!(site_default_count(&store), 1);
        assert!(find_profile(&store, "new-default").is_site_default);
    }

    #[test]
    fn make_site_default_sets_only_one() {
        let store = ConfigStore::in_memory();
        store
            .save_profile(LayoutProfile::new("LP1").site_default())
            .unwrap();
        store.save_profile(LayoutProfile::new("LP2")).unwrap();
        let lp3 = store.save_profile(LayoutProfile::new("LP3")).unwrap();

        store.make_site_default(&[lp3.id]).unwrap();

        assert_eq!(site_default_count(&store), 1);
        assert!(store.profile(lp3.id).unwrap().is_site_default);
    }

    #[test]
    fn make_site_default_rejects_multi_select() {
        let store = ConfigStore::in_memory();
        let a = store.save_profile(LayoutProfile::new("Act1")).unwrap();
        let b = store.save_profile(LayoutProfile::new("Act2")).unwrap();

        let err = store.make_site_default(&[a.id, b.id]).unwrap_err();
        assert!(matches!(err, StoreError::SelectionCount(2)));
        assert_eq!(site_default_count(&store), 0);

        let err = store.make_site_default(&[]).unwrap_err();
        assert!(matches!(err, StoreError::SelectionCount(0)));
    }

    #[test]
    fn make_site_default_unknown_id() {
        let store = ConfigStore::in_memory();
        let err = store.make_site_default(&[ProfileId(42)]).unwrap_err();
        assert!(matches!(err, StoreError::UnknownProfile(ProfileId(42))));
    }

    // =========================================================================
    // Slugs and category uniqueness
    // =========================================================================

    #[test]
    fn blank_slug_derived_from_name() {
        let store = ConfigStore::in_memory();
        let lp = store.save_profile(LayoutProfile::new("Modern SaaS Look")).unwrap();
        assert_eq!(lp.slug, "modern-saas-look");
    }

    #[test]
    fn explicit_slug_is_trimmed() {
        let store = ConfigStore::in_memory();
        store
            .save_profile(LayoutProfile::new("Fin").with_slug(" fin "))
            .unwrap();
        assert_eq!(find_profile(&store, "fin").name, "Fin");
        assert!(store.profile_by_slug("fin").is_some());
    }

    #[test]
    fn duplicate_slug_rejected() {
        let store = ConfigStore::in_memory();
        store
            .save_profile(LayoutProfile::new("A").with_slug("same"))
            .unwrap();
        let err = store
            .save_profile(LayoutProfile::new("B").with_slug("same"))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSlug(s) if s == "same"));
    }

    #[test]
    fn one_profile_per_category() {
        let (store, cats) = store_with_categories(&["LP Cat"]);
        store
            .save_profile(LayoutProfile::new("Cat A").with_category(cats[0].id))
            .unwrap();
        let err = store
            .save_profile(LayoutProfile::new("Cat B").with_category(cats[0].id))
            .unwrap_err();
        assert!(matches!(err, StoreError::CategoryTaken(name) if name == "LP Cat"));
        assert_eq!(store.profiles().len(), 1);
    }

    #[test]
    fn resaving_category_profile_is_not_a_conflict() {
        let (store, cats) = store_with_categories(&["LP Cat"]);
        let mut lp = store
            .save_profile(LayoutProfile::new("Cat A").with_category(cats[0].id))
            .unwrap();
        lp.template_variant = TemplateVariant::DataLab;
        let lp = store.save_profile(lp).unwrap();
        assert_eq!(lp.template_variant, TemplateVariant::DataLab);
    }

    #[test]
    fn unknown_category_rejected() {
        let store = ConfigStore::in_memory();
        let err = store
            .save_profile(LayoutProfile::new("X").with_category(CategoryId(99)))
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownCategory(99)));
    }

    #[test]
    fn invalid_token_color_rejected_without_side_effects() {
        let store = ConfigStore::in_memory();
        let mut lp = LayoutProfile::new("Bad");
        lp.tokens = DesignTokens {
            accent_color: Some("red".to_string()),
            ..Default::default()
        };
        let err = store.save_profile(lp).unwrap_err();
        assert!(err.to_string().contains("accent_color"));
        assert!(store.profiles().is_empty());
    }

    #[test]
    fn blank_token_is_allowed() {
        let store = ConfigStore::in_memory();
        let mut lp = LayoutProfile::new("Blank");
        lp.tokens.bg_color = Some("   ".to_string());
        assert!(store.save_profile(lp).is_ok());
    }

    #[test]
    fn deleting_category_detaches_profile() {
        let (store, cats) = store_with_categories(&["Finance"]);
        let lp = store
            .save_profile(LayoutProfile::new("Fin").with_category(cats[0].id))
            .unwrap();
        store.delete_category(cats[0].id).unwrap();
        assert_eq!(store.profile(lp.id).unwrap().category, None);
    }

    #[test]
    fn duplicate_category_name_rejected() {
        let (store, _) = store_with_categories(&["Finance"]);
        assert!(store.create_category("Finance", "").is_err());
    }

    // =========================================================================
    // Resumes
    // =========================================================================

    #[test]
    fn primary_resume_demotes_same_category() {
        let store = ConfigStore::in_memory();
        let r1 = store
            .save_resume(Resume::new("Resume A", "general", "a.pdf").primary())
            .unwrap();
        let r2 = store
            .save_resume(Resume::new("Resume B", "general", "b.pdf").primary())
            .unwrap();

        let resumes = store.resumes();
        let r1 = resumes.iter().find(|r| r.id == r1.id).unwrap();
        let r2 = resumes.iter().find(|r| r.id == r2.id).unwrap();
        assert!(!r1.is_primary);
        assert!(r2.is_primary);
    }

    #[test]
    fn primary_resume_leaves_other_categories() {
        let store = ConfigStore::in_memory();
        store
            .save_resume(Resume::new("Resume Gen", "general", "g.pdf").primary())
            .unwrap();
        store
            .save_resume(Resume::new("Resume Fin", "finance", "f.pdf").primary())
            .unwrap();

        assert_eq!(store.primary_resume("general").unwrap().title, "Resume Gen");
        assert_eq!(store.primary_resume("finance").unwrap().title, "Resume Fin");
    }

    #[test]
    fn non_primary_save_keeps_existing_primary() {
        let store = ConfigStore::in_memory();
        store
            .save_resume(Resume::new("Resume P", "general", "p.pdf").primary())
            .unwrap();
        store
            .save_resume(Resume::new("Resume NP", "general", "np.pdf"))
            .unwrap();
        assert_eq!(store.primary_resume("general").unwrap().title, "Resume P");
    }

    #[test]
    fn blank_resume_category_becomes_general() {
        let store = ConfigStore::in_memory();
        let r = store.save_resume(Resume::new("CV", " ", "cv.pdf")).unwrap();
        assert_eq!(r.category, "general");
    }

    #[test]
    fn resumes_newest_first() {
        let store = ConfigStore::in_memory();
        store.save_resume(Resume::new("Old", "general", "o.pdf")).unwrap();
        store.save_resume(Resume::new("New", "general", "n.pdf")).unwrap();
        let titles: Vec<String> = store.resumes().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["New", "Old"]);
    }

    // =========================================================================
    // Site settings, presets, seeding
    // =========================================================================

    #[test]
    fn site_setting_absent_until_saved() {
        let store = ConfigStore::in_memory();
        assert!(store.site_setting().is_none());
        let mut s = SiteSetting::default();
        s.theme = "dark".to_string();
        store.save_site_setting(s).unwrap();
        assert_eq!(store.site_setting().unwrap().theme, "dark");
    }

    #[test]
    fn site_setting_bad_color_rejected() {
        let store = ConfigStore::in_memory();
        let mut s = SiteSetting::default();
        s.nav_bg_color = "navy".to_string();
        let err = store.save_site_setting(s).unwrap_err();
        assert!(err.to_string().contains("nav_bg_color"));
        assert!(store.site_setting().is_none());
    }

    #[test]
    fn image_variant_upsert_by_name() {
        let store = ConfigStore::in_memory();
        store.save_image_variant(ImageVariant::new("hero", "16:9")).unwrap();
        store.save_image_variant(ImageVariant::new("hero", "21:9")).unwrap();
        assert_eq!(store.image_variants().len(), 1);
        assert_eq!(store.image_variant("hero").unwrap().aspect_ratio, "21:9");
    }

    #[test]
    fn image_variant_bad_ratio_rejected() {
        let store = ConfigStore::in_memory();
        assert!(store.save_image_variant(ImageVariant::new("x", "16/9")).is_err());
        assert!(store.save_image_variant(ImageVariant::new("x", "0:9")).is_err());
    }

    #[test]
    fn seed_creates_one_profile_per_variant() {
        let store = ConfigStore::in_memory();
        let report = store.seed_layout_profiles().unwrap();
        assert_eq!(report.created.len(), TemplateVariant::ALL.len());
        for variant in TemplateVariant::ALL {
            find_profile(&store, &format!("variant-{}", variant.as_str()));
        }
        let defaults: Vec<LayoutProfile> = store
            .profiles()
            .into_iter()
            .filter(|p| p.is_site_default)
            .collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].template_variant, TemplateVariant::Default);
    }

    #[test]
    fn seed_is_idempotent_and_preserves_tokens() {
        let store = ConfigStore::in_memory();
        store.seed_layout_profiles().unwrap();
        let mut lp = find_profile(&store, "variant-data_lab");
        lp.tokens.accent_color = Some("#ff00ff".to_string());
        store.save_profile(lp).unwrap();

        let report = store.seed_layout_profiles().unwrap();
        assert!(report.created.is_empty());
        assert_eq!(report.existing, TemplateVariant::ALL.len());
        assert_eq!(
            find_profile(&store, "variant-data_lab").tokens.accent_color.as_deref(),
            Some("#ff00ff")
        );
        assert_eq!(store.profiles().len(), TemplateVariant::ALL.len());
    }

    #[test]
    fn seed_keeps_existing_site_default() {
        let store = ConfigStore::in_memory();
        store
            .save_profile(LayoutProfile::new("Mine").site_default())
            .unwrap();
        store.seed_layout_profiles().unwrap();
        assert!(find_profile(&store, "mine").is_site_default);
        assert_eq!(site_default_count(&store), 1);
    }

    // =========================================================================
    // Navigation cache
    // =========================================================================

    #[test]
    fn nav_write_invalidates_cache() {
        let store = ConfigStore::in_memory();
        store.save_nav_item(NavItem::new("Home", "/", 1)).unwrap();
        assert_eq!(store.navigation(&Viewer::anonymous()).len(), 1);
        assert!(store.nav_cache().is_warm());

        store.save_nav_item(NavItem::new("About", "/about/", 2)).unwrap();
        assert!(!store.nav_cache().is_warm());
        assert_eq!(store.navigation(&Viewer::anonymous()).len(), 2);
    }

    #[test]
    fn nav_delete_removes_descendants() {
        let store = ConfigStore::in_memory();
        let parent = store.save_nav_item(NavItem::new("Portfolio", "", 1)).unwrap();
        let mut child = NavItem::new("Education", "/education/", 1);
        child.parent = Some(parent.id);
        store.save_nav_item(child).unwrap();

        store.delete_nav_item(parent.id).unwrap();
        assert!(store.nav_items().is_empty());
        assert!(store.navigation(&Viewer::anonymous()).is_empty());
    }

    #[test]
    fn nav_unknown_parent_rejected() {
        let store = ConfigStore::in_memory();
        let mut orphan = NavItem::new("Orphan", "/", 1);
        orphan.parent = Some(7);
        assert!(matches!(
            store.save_nav_item(orphan),
            Err(StoreError::UnknownRow { kind: "nav item", id: 7 })
        ));
    }

    #[test]
    fn nav_self_parent_rejected() {
        let store = ConfigStore::in_memory();
        let mut looped = store.save_nav_item(NavItem::new("Loop", "/", 1)).unwrap();
        looped.parent = Some(looped.id);
        let err = store.save_nav_item(looped.clone()).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.nav_items()[0].parent, None);

        store.delete_nav_item(looped.id).unwrap();
        assert!(store.nav_items().is_empty());
    }

    #[test]
    fn nav_two_row_cycle_rejected() {
        let store = ConfigStore::in_memory();
        let mut top = store.save_nav_item(NavItem::new("Top", "/", 1)).unwrap();
        let mut child = NavItem::new("Child", "/child/", 1);
        child.parent = Some(top.id);
        let child = store.save_nav_item(child).unwrap();

        top.parent = Some(child.id);
        assert!(matches!(
            store.save_nav_item(top.clone()),
            Err(StoreError::Validation(_))
        ));

        store.delete_nav_item(top.id).unwrap();
        assert!(store.nav_items().is_empty());
    }

    #[test]
    fn nav_subtree_terminates_on_cycle() {
        let mut a = NavItem::new("A", "/a/", 1);
        a.id = 1;
        a.parent = Some(2);
        let mut b = NavItem::new("B", "/b/", 1);
        b.id = 2;
        b.parent = Some(1);
        let mut own = NavItem::new("Own", "/own/", 1);
        own.id = 3;
        own.parent = Some(3);
        let rows = vec![a, b, own];

        assert_eq!(nav_subtree(&rows, 1), HashSet::from([1, 2]));
        assert_eq!(nav_subtree(&rows, 3), HashSet::from([3]));
        assert!(nav_in_cycle(&rows, 1));
        assert!(nav_in_cycle(&rows, 3));
    }

    #[test]
    fn nav_moving_under_sibling_allowed() {
        let store = ConfigStore::in_memory();
        let first = store.save_nav_item(NavItem::new("First", "/1/", 1)).unwrap();
        let mut second = store.save_nav_item(NavItem::new("Second", "/2/", 2)).unwrap();
        second.parent = Some(first.id);
        assert_eq!(store.save_nav_item(second).unwrap().parent, Some(first.id));
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    #[test]
    fn open_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = ConfigStore::open(&tmp.path().join("portfolio.json")).unwrap();
        assert!(store.profiles().is_empty());
        assert!(!tmp.path().join("portfolio.json").exists());
    }

    #[test]
    fn writes_persist_across_open() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data/portfolio.json");
        {
            let store = ConfigStore::open(&path).unwrap();
            store
                .save_profile(LayoutProfile::new("Persisted").site_default())
                .unwrap();
        }
        let reopened = ConfigStore::open(&path).unwrap();
        assert!(find_profile(&reopened, "persisted").is_site_default);
    }

    #[test]
    fn reload_picks_up_external_writes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("portfolio.json");
        let reader = ConfigStore::open(&path).unwrap();
        let writer = ConfigStore::open(&path).unwrap();
        writer.save_profile(LayoutProfile::new("Late")).unwrap();

        assert!(reader.profiles().is_empty());
        reader.reload().unwrap();
        assert_eq!(reader.profiles().len(), 1);
    }

    #[test]
    fn version_mismatch_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("portfolio.json");
        fs::write(&path, r#"{"version": 99, "next_id": 1}"#).unwrap();
        assert!(matches!(
            ConfigStore::open(&path),
            Err(StoreError::Version { found: 99, .. })
        ));
    }

    #[test]
    fn file_with_two_site_defaults_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("portfolio.json");
        fs::write(
            &path,
            r#"{"version": 1, "next_id": 3, "profiles": [
                {"id": 1, "name": "A", "slug": "a", "is_site_default": true},
                {"id": 2, "name": "B", "slug": "b", "is_site_default": true}
            ]}"#,
        )
        .unwrap();
        let err = ConfigStore::open(&path).err().unwrap();
        assert!(matches!(&err, StoreError::Validation(msg) if msg.contains("a, b")));
    }

    #[test]
    fn file_with_two_primary_resumes_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("portfolio.json");
        fs::write(
            &path,
            r#"{"version": 1, "next_id": 3, "resumes": [
                {"id": 1, "category": "general", "is_primary": true, "title": "A", "file": "a.pdf"},
                {"id": 2, "category": "general", "is_primary": true, "title": "B", "file": "b.pdf"}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(
            ConfigStore::open(&path),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn file_with_bad_site_color_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("portfolio.json");
        fs::write(
            &path,
            r#"{"version": 1, "next_id": 1, "site_setting": {"primary_color": "red;}</style>"}}"#,
        )
        .unwrap();
        assert!(matches!(
            ConfigStore::open(&path),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn reload_keeps_state_when_file_is_invalid() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("portfolio.json");
        let store = ConfigStore::open(&path).unwrap();
        store.save_profile(LayoutProfile::new("Kept")).unwrap();
        fs::write(
            &path,
            r#"{"version": 1, "next_id": 3, "profiles": [
                {"id": 1, "name": "A", "slug": "dup"},
                {"id": 2, "name": "B", "slug": "dup"}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(store.reload(), Err(StoreError::DuplicateSlug(_))));
        assert_eq!(store.profiles()[0].slug, "kept");
    }

    #[test]
    fn corrupt_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("portfolio.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(ConfigStore::open(&path), Err(StoreError::Json(_))));
    }

    #[test]
    fn ratio_parsing() {
        assert!(is_ratio("16:9"));
        assert!(is_ratio("1:1"));
        assert!(!is_ratio("16"));
        assert!(!is_ratio("a:b"));
    }
}
