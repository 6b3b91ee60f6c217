//! Template-path resolution.
//!
//! Pages are rendered from a template tree with two independent override
//! axes. For a logical name like `portfolio/home.html`:
//!
//! ```text
//! portfolio/variants/<variant>/<theme>/home.html   variant + theme
//! portfolio/variants/<variant>/home.html           variant only
//! portfolio/<theme>/home.html                      theme only
//! portfolio/home.html                              stock template
//! ```
//!
//! [`candidate_paths`] produces that list, most specific first; the renderer
//! picks the first one that exists. Nothing here touches the filesystem.

use crate::models::Theme;

/// Ordered candidate list, built one axis at a time.
///
/// Each axis rewrites every current entry and puts the rewritten entries
/// ahead of the existing ones, so the list always ends with the unmodified
/// logical name.
#[derive(Debug, Clone)]
pub struct CandidateList {
    paths: Vec<String>,
}

impl CandidateList {
    pub fn new(logical_name: &str) -> Self {
        Self {
            paths: vec![logical_name.to_string()],
        }
    }

    /// Theme axis. The default theme (and the empty string) leaves the list
    /// alone; an unknown theme is treated as the default.
    pub fn with_theme(mut self, theme: &str) -> Self {
        let theme = Theme::coerce(theme);
        if theme.is_default() {
            return self;
        }
        let themed: Vec<String> = self
            .paths
            .iter()
            .map(|path| match path.split_once('/') {
                Some((group, rest)) => format!("{group}/{}/{rest}", theme.as_str()),
                None => format!("{}/{path}", theme.as_str()),
            })
            .collect();
        self.paths.splice(0..0, themed);
        self
    }

    /// Variant axis. Applies to any non-empty variant, `"default"` included.
    pub fn with_variant(mut self, variant: &str) -> Self {
        if variant.is_empty() {
            return self;
        }
        let varianted: Vec<String> = self
            .paths
            .iter()
            .map(|path| match path.split_once('/') {
                Some((group, rest)) => format!("{group}/variants/{variant}/{rest}"),
                None => format!("variants/{variant}/{path}"),
            })
            .collect();
        self.paths.splice(0..0, varianted);
        self
    }

    pub fn into_paths(self) -> Vec<String> {
        self.paths
    }
}

/// Candidate template paths for `logical_name`, most specific first.
///
/// The last entry is always `logical_name` itself. Existence is never
/// checked here.
pub fn candidate_paths(logical_name: &str, theme: &str, variant: &str) -> Vec<String> {
    CandidateList::new(logical_name)
        .with_theme(theme)
        .with_variant(variant)
        .into_paths()
}

/// The logical pages of the public site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    ProjectList,
    ProjectDetail,
    About,
    Resume,
    Education,
    Certifications,
    Contact,
}

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Home,
        Page::ProjectList,
        Page::ProjectDetail,
        Page::About,
        Page::Resume,
        Page::Education,
        Page::Certifications,
        Page::Contact,
    ];

    /// Short name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::ProjectList => "project_list",
            Page::ProjectDetail => "project_detail",
            Page::About => "about",
            Page::Resume => "resume",
            Page::Education => "education",
            Page::Certifications => "certifications",
            Page::Contact => "contact",
        }
    }

    pub fn parse(value: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|p| p.as_str() == value)
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::ProjectList => "Projects",
            Page::ProjectDetail => "Project Detail",
            Page::About => "About",
            Page::Resume => "Resume",
            Page::Education => "Education",
            Page::Certifications => "Certifications",
            Page::Contact => "Contact",
        }
    }

    /// Public URL path. The project detail page has no fixed URL.
    pub fn url(self) -> Option<&'static str> {
        match self {
            Page::Home => Some("/"),
            Page::ProjectList => Some("/projects/"),
            Page::ProjectDetail => None,
            Page::About => Some("/about/"),
            Page::Resume => Some("/resume/"),
            Page::Education => Some("/education/"),
            Page::Certifications => Some("/certifications/"),
            Page::Contact => Some("/contact/"),
        }
    }

    /// Logical template name, e.g. `portfolio/home.html`.
    pub fn template_name(self) -> String {
        format!("portfolio/{}.html", self.as_str())
    }
}
