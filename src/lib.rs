//! # Portfolio Layout
//!
//! Layout, theme and template-variant resolution for an admin-editable
//! portfolio site. Given a page request, it decides which layout profile
//! applies, which template file renders the page, and which design-token
//! values the page gets.
//!
//! # Architecture: Resolve Once, Render Once
//!
//! Every request flows through the same three steps:
//!
//! ```text
//! 1. Resolve   category + preview slug  →  RequestContext   (profile, theme, motion)
//! 2. Select    logical page name        →  candidate paths  (first existing wins)
//! 3. Inject    profile + site settings  →  LayoutContext    (tokens, classes, CSS)
//! ```
//!
//! Step 1 is the only one that reads the store. Steps 2 and 3 are pure
//! functions of the [`resolve::RequestContext`] built there, so they can be
//! tested without a store and never disagree about which profile is active.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | Transactional configuration store: site settings, profiles, categories, resumes, presets, nav |
//! | [`resolve`] | Active profile precedence, preview override, per-request context |
//! | [`templates`] | Candidate template paths over the theme and variant axes; logical pages |
//! | [`tokens`] | Layout context injection and CSS custom properties |
//! | [`render`] | Template sources, template selection, document shell, variant inventory |
//! | [`models`] | Store rows and choice enums |
//! | [`media`] | Image markup helpers (`media_img`, `responsive_image`) |
//! | [`attachments`] | Attachment visibility, preview kinds, resume PDF selection |
//! | [`nav`] | Navigation tree and its process-wide cache |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`naming`] | Slug and file-extension helpers |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Two Override Axes
//!
//! Templates can be overridden per site theme and per template variant,
//! independently. A variant author only writes the pages that differ; every
//! page the variant lacks falls back to the themed or stock template. See
//! [`templates::candidate_paths`].
//!
//! ## Demote-Then-Set
//!
//! "At most one site-default profile" and "at most one primary resume per
//! category" are enforced by the write that sets the flag: it clears the flag
//! on the other rows in the same transaction. There is no separate repair
//! step and readers never see two flagged rows.
//!
//! ## Absent Means Inherit
//!
//! A blank token override is left out of the render context entirely rather
//! than passed as an empty string. Templates and stylesheets fall back to the
//! site-setting color whenever the key is missing.
//!
//! ## Preview Is Development-Only
//!
//! The preview override lets a developer view any profile by slug. Outside
//! development mode the slug is never looked up, so it cannot be used to
//! probe for unpublished profiles.

pub mod attachments;
pub mod config;
pub mod media;
pub mod models;
pub mod nav;
pub mod naming;
pub mod output;
pub mod render;
pub mod resolve;
pub mod store;
pub mod templates;
pub mod tokens;

#[cfg(test)]
pub(crate) mod test_helpers;
