use clap::{Args, Parser, Subcommand};
use folio::content::{self, Manifest};
use folio::delivery::SimulatedDelivery;
use folio::motion::{self, Capabilities};
use folio::site::{self, RehearsalSettings, Site};
use folio::submit::SubmitOutcome;
use folio::types::Route;
use folio::validate::FormRecord;
use folio::{config, generate, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Four-page portfolio site: generator, contact form and motion rehearsal")]
#[command(long_about = "\
Four-page portfolio site: generator, contact form and motion rehearsal

The site is Home, About & Contact, Terms & Conditions and Privacy Policy.
All copy ships with the binary; a source directory only overrides it.

Source structure (every file optional):

  site/
  ├── config.toml          # Site name, colors, contact timings, motion
  ├── content.toml         # Copy overrides, merged over the stock copy
  └── assets/              # Copied to dist/assets/ (images, favicon)

Run 'folio gen-config' to print a documented config.toml.
Set RUST_LOG=debug to trace delivery and motion.")]
#[command(version)]
struct Cli {
    /// Site source directory
    #[arg(long, default_value = "site", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// One contact form submission.
#[derive(Args)]
struct SendArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    subject: String,
    #[arg(long, default_value = "")]
    message: String,
}

impl From<SendArgs> for FormRecord {
    fn from(args: SendArgs) -> Self {
        FormRecord {
            name: args.name,
            email: args.email,
            subject: args.subject,
            message: args.message,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Render the four pages and copy assets into the output directory
    Build,
    /// Load and validate the site source without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Submit the contact form through the configured delivery
    Send(SendArgs),
    /// Scroll a page top to bottom and print its motion timeline
    Rehearse {
        /// Page to rehearse: home, contact, terms or privacy (all when omitted)
        page: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Build => {
            println!("==> Loading {}", cli.source.display());
            let manifest = content::load(&cli.source)?;
            println!("==> Generating HTML → {}", cli.output.display());
            let report = generate::generate(&manifest, &cli.output)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = content::load(&cli.source)?;
            output::print_check_output(&manifest);
            println!("==> Site is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Send(args) => {
            let manifest = content::load(&cli.source)?;
            let capabilities = manifest.config.motion.capabilities(false);
            let outcome = runtime()?.block_on(async {
                let site = build_site(manifest, capabilities);
                let layout = site.layout(Route::Contact, 0.0);
                let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
                let page = site.mount(Route::Contact, &layout, tx);
                let outcome = match page.form() {
                    Some(form) => form.submit(args.into()).await,
                    None => SubmitOutcome::Ignored,
                };
                page.unmount();
                outcome
            });
            output::print_submit_outcome(&outcome);
            if !matches!(outcome, SubmitOutcome::Delivered(_)) {
                std::process::exit(1);
            }
        }
        Command::Rehearse { page } => {
            let routes = match page.as_deref() {
                None => Route::ALL.to_vec(),
                Some(slug) => match Route::from_slug(slug) {
                    Some(route) => vec![route],
                    None => {
                        return Err(format!(
                            "unknown page '{slug}' (expected home, contact, terms or privacy)"
                        )
                        .into());
                    }
                },
            };
            let manifest = content::load(&cli.source)?;
            let settings = RehearsalSettings::from_config(&manifest.config.motion);
            let capabilities = manifest.config.motion.capabilities(true);
            let rehearsals = runtime()?.block_on(async {
                let site = build_site(manifest, capabilities);
                let mut rehearsals = Vec::with_capacity(routes.len());
                for route in routes {
                    rehearsals.push(site.rehearse(route, &settings).await);
                }
                rehearsals
            });
            for (i, rehearsal) in rehearsals.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                output::print_rehearsal(rehearsal);
            }
        }
    }

    Ok(())
}

/// Single-threaded runtime: every timer and delivery runs on this thread.
fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
}

/// Install process-wide motion capabilities and assemble the site.
fn build_site(manifest: Manifest, capabilities: Capabilities) -> Site<SimulatedDelivery> {
    let capabilities = *motion::install(capabilities);
    let delivery = site::delivery_from_config(&manifest.config.contact);
    Site::new(manifest.config, manifest.content, delivery, capabilities)
}
