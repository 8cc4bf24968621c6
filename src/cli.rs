use crate::types::{Facet, SortKey};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "tender-compare")]
#[command(about = "Compare supplier bids for a tender side by side")]
#[command(version)]
pub struct CliArgs {
    /// Catalogue file to load (default: $TENDER_CATALOG, the user config file, or the built-in catalogue)
    #[arg(long, global = true, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Override console width for testing (default: auto-detect)
    #[arg(long, global = true, value_name = "COLUMNS")]
    pub console_width: Option<usize>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the tenders in the catalogue
    List,

    /// Show a tender: overview, supplier cards and the grouped comparison
    Show(ShowArgs),

    /// Show the full bid of one supplier
    Supplier {
        /// Tender slug (see `list`)
        slug: String,

        /// Supplier id within the tender
        id: String,

        /// Facet highlighted in the score breakdown
        #[arg(long, value_enum, default_value = "technical")]
        facet: Facet,
    },

    /// Explain the key fields of a tender
    Fields {
        /// Tender slug (see `list`)
        slug: String,
    },

    /// Export the comparison of a tender as CSV
    Export {
        /// Tender slug (see `list`)
        slug: String,

        #[command(flatten)]
        view: ViewArgs,

        /// Output path (default: <slug>-tender-comparison.csv in the current directory)
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Load the catalogue and report fields that reference unknown keys
    Validate,
}

/// Sort and facet shared by `show` and `export`
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Supplier order
    #[arg(long, value_enum, default_value = "price")]
    pub sort: SortKey,

    /// Lens used to order categories
    #[arg(long, value_enum, default_value = "technical")]
    pub facet: Facet,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Tender slug (see `list`)
    pub slug: String,

    #[command(flatten)]
    pub view: ViewArgs,

    /// Toggle a category open or closed (can be repeated)
    #[arg(long, value_name = "CATEGORY")]
    pub expand: Vec<String>,

    /// Start with every category collapsed
    #[arg(long)]
    pub collapse_all: bool,

    /// Expand every category
    #[arg(long, conflicts_with = "collapse_all")]
    pub expand_all: bool,

    /// Page scroll offset in pixels; past 800 the jump-to-comparison shortcut is shown
    #[arg(long, value_name = "OFFSET", default_value_t = 0.0)]
    pub scroll: f64,

    /// Include the tender overview breakdown
    #[arg(long)]
    pub details: bool,

    /// Print the grouped comparison as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        CliArgs::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if let Some(width) = self.console_width
            && width < 40
        {
            return Err(format!("--console-width must be at least 40 (got {})", width));
        }

        match &self.command {
            Command::Show(show) => {
                validate_slug(&show.slug)?;
                if show.expand.iter().any(|name| name.trim().is_empty()) {
                    return Err("--expand needs a category name".to_string());
                }
                if !show.scroll.is_finite() || show.scroll < 0.0 {
                    return Err(format!("--scroll must be a non-negative number (got {})", show.scroll));
                }
            }
            Command::Supplier { slug, id, .. } => {
                validate_slug(slug)?;
                if id.trim().is_empty() {
                    return Err("Supplier id must not be empty".to_string());
                }
            }
            Command::Fields { slug } | Command::Export { slug, .. } => validate_slug(slug)?,
            Command::List | Command::Validate => {}
        }

        Ok(())
    }

    /// Colors are used unless disabled or stdout is not a terminal
    pub fn use_colors(&self) -> bool {
        !self.no_color && std::io::IsTerminal::is_terminal(&std::io::stdout())
    }
}

fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.trim().is_empty() {
        return Err("Tender slug must not be empty".to_string());
    }
    Ok(())
}
