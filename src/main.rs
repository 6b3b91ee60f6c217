use clap::{Parser, Subcommand};
use portfolio_layout::config::{self, AppConfig};
use portfolio_layout::models::ProfileId;
use portfolio_layout::nav::Viewer;
use portfolio_layout::output;
use portfolio_layout::render::{self, DirTemplates};
use portfolio_layout::resolve::{PageRequest, RequestContext};
use portfolio_layout::store::ConfigStore;
use portfolio_layout::templates::Page;
use portfolio_layout::tokens::LayoutContext;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup; called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "portfolio-layout")]
#[command(about = "Layout profile and template resolution for a portfolio site")]
#[command(long_about = "\
Layout profile and template resolution for a portfolio site

Pages are rendered from a template tree with two override axes, the site
theme and the active layout profile's template variant:

  templates/
  └── portfolio/
      ├── home.html                          # stock template
      ├── dark/home.html                     # theme override
      └── variants/
          └── modern_saas/
              ├── home.html                  # variant override
              └── dark/home.html             # variant + theme override

The active profile is the one attached to the page's category, else the
site default, else none. In debug mode --profile <slug> previews any
profile.

Run 'portfolio-layout gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Development mode (overrides config.toml)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

/// Which page to resolve, for which content.
#[derive(clap::Args, Clone)]
struct PageArgs {
    /// Logical page (home, project_list, project_detail, about, resume,
    /// education, certifications, contact)
    #[arg(long, default_value = "home")]
    page: String,

    /// Slug of the content's category
    #[arg(long)]
    category: Option<String>,

    /// Preview a profile by slug (debug mode only)
    #[arg(long)]
    profile: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the active profile, template candidates and layout context
    Resolve(PageArgs),
    /// Render a page through the first existing template
    Render {
        #[command(flatten)]
        page: PageArgs,
        /// Write the HTML here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List layout profiles
    Profiles,
    /// Promote exactly one layout profile to site default
    MakeDefault {
        /// Profile id (exactly one)
        ids: Vec<u64>,
    },
    /// Create one layout profile per template variant
    Seed,
    /// Report which variant templates exist
    Check,
    /// List preview links for every variant (debug mode only)
    VariantReview {
        /// URL of a project detail page to include
        #[arg(long)]
        project_url: Option<String>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let mut app_config = config::load_config(&cli.root)?;
    if cli.debug {
        app_config.debug = true;
    }
    init_tracing(&app_config);

    let store = ConfigStore::open(&app_config.store_path_in(&cli.root))?;
    let templates = DirTemplates::new(app_config.template_dir_in(&cli.root));

    match cli.command {
        Command::Resolve(args) => {
            let (ctx, page) = request_context(&store, &app_config, &args)?;
            let layout = LayoutContext::for_request(&ctx);
            output::print_resolution(&layout, &ctx.candidate_paths(&page.template_name()));
        }
        Command::Render { page: args, out } => {
            let (ctx, page) = request_context(&store, &app_config, &args)?;
            let nav = store.navigation(&Viewer::anonymous());
            let rendered = render::render_page(&templates, &ctx, page, &nav)?;
            match out {
                Some(path) => {
                    write_output(&path, &rendered.html)?;
                    let target = path.display().to_string();
                    output::print_render(&rendered.template, rendered.html.len(), Some(&target));
                }
                None => print!("{}", rendered.html),
            }
        }
        Command::Profiles => {
            output::print_profiles(&store.profiles(), &store.categories());
        }
        Command::MakeDefault { ids } => {
            let selection: Vec<ProfileId> = ids.into_iter().map(ProfileId).collect();
            let promoted = store.make_site_default(&selection)?;
            println!("{} is now the site default", promoted.name);
        }
        Command::Seed => {
            let report = store.seed_layout_profiles()?;
            output::print_seed_report(&report);
        }
        Command::Check => {
            println!("==> Checking {}", templates.root().display());
            let inventory = render::template_inventory(&templates);
            let unknown = render::unknown_variant_dirs(&templates)?;
            output::print_inventory(&inventory, &unknown);
        }
        Command::VariantReview { project_url } => {
            if !app_config.debug {
                return Err("variant-review is only available in debug mode".into());
            }
            let rows = render::variant_review(&store.profiles());
            let pages = render::review_pages(project_url.as_deref());
            output::print_variant_review(&rows, &pages);
        }
        Command::GenConfig => unreachable!("handled before config load"),
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise the filter from `config.toml`. Logs go to
/// stderr so command output stays clean.
fn init_tracing(app_config: &AppConfig) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&app_config.logging.filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn request_context(
    store: &ConfigStore,
    app_config: &AppConfig,
    args: &PageArgs,
) -> Result<(RequestContext, Page), Box<dyn std::error::Error>> {
    let page = Page::parse(&args.page).ok_or_else(|| format!("unknown page '{}'", args.page))?;
    let category = match &args.category {
        Some(slug) => Some(
            store
                .category_by_slug(slug)
                .ok_or_else(|| format!("no category with slug '{slug}'"))?,
        ),
        None => None,
    };
    let request = PageRequest {
        category,
        preview_slug: args.profile.clone(),
    };
    let site = store
        .site_setting()
        .unwrap_or_else(|| app_config.fallback_site_setting());
    let ctx = RequestContext::build(store, Some(site), &request, app_config.debug);
    Ok((ctx, page))
}

fn write_output(path: &Path, html: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
}
