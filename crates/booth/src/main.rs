use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use photobooth_core::gallery::GalleryRecord;
use photobooth_core::image::{decode_data_uri, extension_for_mime};
use photobooth_core::theme::{self, ThemeCategory};
use photobooth_db::GalleryStore;

use photobooth_booth::{Booth, BoothConfig, FileCapture, FlowState, Notice, RelayClient};

/// Party Favor photo booth: restyle photos with AI themes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Relay transform endpoint (overrides RELAY_URL)
    #[arg(long, global = true)]
    relay_url: Option<String>,

    /// Gallery database file (overrides GALLERY_PATH)
    #[arg(long, global = true)]
    gallery: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available themes
    Themes {
        /// Only show one category (events, fun, holidays)
        #[arg(short, long)]
        category: Option<ThemeCategory>,
    },

    /// Transform a photo with a theme
    Transform {
        /// Image file to transform (JPEG, PNG, WebP or GIF)
        image: PathBuf,

        /// Theme id (see `photobooth themes`)
        #[arg(short, long)]
        theme: String,

        /// Where to write the transformed image
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Save the result to the gallery
        #[arg(long)]
        save: bool,
    },

    /// Manage saved photos
    Gallery {
        #[command(subcommand)]
        action: GalleryAction,
    },
}

#[derive(Subcommand, Debug)]
enum GalleryAction {
    /// List saved photos, newest first
    List,
    /// Show one saved photo
    Show { id: String },
    /// Write a saved photo's transformed image to disk
    Export {
        id: String,
        /// Target directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
    /// Delete one saved photo
    Delete { id: String },
    /// Delete every saved photo
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        "photobooth=debug,photobooth_booth=debug,photobooth_db=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = BoothConfig::from_env();
    if let Some(url) = args.relay_url {
        config.relay_url = url;
    }
    if let Some(path) = args.gallery {
        config.gallery_path = path;
    }
    tracing::debug!(relay_url = %config.relay_url, gallery = %config.gallery_path.display(), "Booth configuration");

    match args.command {
        Command::Themes { category } => {
            print_themes(category);
            Ok(())
        }
        Command::Transform {
            image,
            theme,
            out,
            save,
        } => transform(new_booth(&config), &image, &theme, out, save).await,
        Command::Gallery { action } => {
            let booth = new_booth(&config);
            let outcome = gallery(&booth, action).await;
            booth.close().await;
            outcome
        }
    }
}

fn new_booth(config: &BoothConfig) -> Booth<RelayClient> {
    Booth::new(
        RelayClient::new(config.relay_url.clone()),
        GalleryStore::open(&config.gallery_path),
    )
}

// ---------------------------------------------------------------------------
// Themes
// ---------------------------------------------------------------------------

fn print_themes(only: Option<ThemeCategory>) {
    for category in ThemeCategory::ALL {
        if only.is_some_and(|c| c != category) {
            continue;
        }
        let info = category.info();
        println!("{} {}", info.icon, info.name);
        for t in theme::themes_in_category(category) {
            println!("  {} {:<24} {} - {}", t.icon, t.id, t.name, t.description);
        }
        println!();
    }
}

// ---------------------------------------------------------------------------
// Transform
// ---------------------------------------------------------------------------

async fn transform(
    mut booth: Booth<RelayClient>,
    image: &Path,
    theme_id: &str,
    out: Option<PathBuf>,
    save: bool,
) -> Result<()> {
    let outcome = run_transform(&mut booth, image, theme_id, out, save).await;
    booth.close().await;
    outcome
}

async fn run_transform(
    booth: &mut Booth<RelayClient>,
    image: &Path,
    theme_id: &str,
    out: Option<PathBuf>,
    save: bool,
) -> Result<()> {
    let theme = theme::require_theme(theme_id)?;
    let photo = FileCapture::new(image)
        .capture()
        .await
        .context("Failed to read photo")?;

    booth.start()?;
    booth.select_theme(theme)?;

    println!("{} Transforming with {}...", theme.icon, theme.name);
    booth.capture(photo).await?;
    while let FlowState::Error { message, .. } = booth.state() {
        eprintln!("{message}");
        if !ask_retry().await? {
            break;
        }
        println!("{} Trying again...", theme.icon);
        booth.retry().await?;
    }

    let result = match booth.state() {
        FlowState::Result { result, .. } => result,
        FlowState::Error { message, .. } => bail!("{message}"),
        other => bail!("Unexpected booth step: {}", other.step()),
    };

    let (mime, bytes) = decode_data_uri(&result.transformed_image)?;
    let out = out.unwrap_or_else(|| {
        PathBuf::from(format!(
            "party-favor-{}.{}",
            theme.id,
            extension_for_mime(&mime)
        ))
    });
    tokio::fs::write(&out, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!("{}", result.message);
    println!("Saved image to {}", out.display());

    if save {
        let notice = booth.save_to_gallery().await?;
        report(&notice);
    }
    Ok(())
}

/// Ask on stdin whether to replay a failed transformation. End of input
/// counts as no.
async fn ask_retry() -> Result<bool> {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt};

    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"Try again? [y/N] ").await?;
    stdout.flush().await?;

    let mut answer = String::new();
    tokio::io::BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await
        .context("Failed to read answer")?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

// ---------------------------------------------------------------------------
// Gallery
// ---------------------------------------------------------------------------

async fn gallery(booth: &Booth<RelayClient>, action: GalleryAction) -> Result<()> {
    match action {
        GalleryAction::List => {
            let photos = booth.photos().await;
            if photos.is_empty() {
                println!("No saved photos yet.");
            }
            for photo in &photos {
                println!(
                    "{}  {}  {} {}",
                    photo.id,
                    format_timestamp(photo.created_at),
                    photo.theme_icon,
                    photo.theme_name
                );
            }
        }
        GalleryAction::Show { id } => {
            let photo = find_photo(booth, &id).await?;
            println!("id:          {}", photo.id);
            println!("theme:       {} {} ({})", photo.theme_icon, photo.theme_name, photo.theme_id);
            println!("saved:       {}", format_timestamp(photo.created_at));
            println!("original:    {} chars", photo.original_image_data.len());
            println!("transformed: {} chars", photo.transformed_image_data.len());
        }
        GalleryAction::Export { id, dir } => {
            let photo = find_photo(booth, &id).await?;
            let (_, bytes) = decode_data_uri(&photo.transformed_image_data)?;
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            let path = dir.join(photo.export_file_name());
            tokio::fs::write(&path, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported {}", path.display());
        }
        GalleryAction::Delete { id } => report(&booth.delete_photo(&id).await),
        GalleryAction::Clear => report(&booth.clear_gallery().await),
    }
    Ok(())
}

async fn find_photo(booth: &Booth<RelayClient>, id: &str) -> Result<GalleryRecord> {
    booth
        .gallery()
        .get(id)
        .await
        .context("Failed to read the gallery")?
        .with_context(|| format!("No saved photo with id {id}"))
}

fn report(notice: &Notice) {
    match notice {
        Notice::Cleared { removed } => println!("{} ({removed} removed)", notice.message()),
        _ if notice.is_error() => eprintln!("{}", notice.message()),
        _ => println!("{}", notice.message()),
    }
}

fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|t| t.with_timezone(&chrono::Local).format("%b %e, %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}
