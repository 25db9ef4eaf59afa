use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gift_genius_core::app::GiftGenius;
use gift_genius_core::config::GiftGeniusConfig;
use gift_genius_core::history::HistoryStore;
use gift_genius_core::i18n::{Budget, Locale, Occasion};
use gift_genius_core::llm::GeminiBackend;
use gift_genius_core::model::{
    AlchemyRequest, HistoryEntry, ImagePayload, Recommendation, RecommendationRequest,
};
use gift_genius_core::preferences::{Preferences, Theme};
use gift_genius_core::saved::SavedItemsStore;
use gift_genius_core::shopping;
use gift_genius_core::state::AppState;
use gift_genius_core::storage::{create_store, Storage};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gift-genius",
    about = "Gift Genius: three gift ideas from a description or a photo",
    version
)]
struct Cli {
    /// Interface and output language (id, en). Defaults to the saved preference
    #[arg(long, global = true)]
    locale: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Get three gift ideas for a person
    Suggest {
        /// Who the gift is for (optional when --image is given)
        description: Option<String>,
        /// Photo of the person (png, jpg, webp, gif, heic)
        #[arg(long)]
        image: Option<PathBuf>,
        /// Occasion key (birthday, anniversary, apology, cheerUp, justBecause, housewarming, graduation, christmas, eid)
        #[arg(short, long)]
        occasion: Option<String>,
        /// Budget key (under100, range100_500, range500_1m, sultan)
        #[arg(short, long)]
        budget: Option<String>,
        /// Zodiac sign, used to tailor the style of each gift
        #[arg(long)]
        zodiac: Option<String>,
        /// Music taste, used to tailor the style of each gift
        #[arg(long)]
        music: Option<String>,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Fuse two ideas into three real products
    Alchemy {
        /// First element
        element_a: String,
        /// Second element
        element_b: String,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a short greeting card message for a gift
    Greet {
        /// Gift name
        gift: String,
        /// Who receives the gift
        #[arg(long)]
        recipient: String,
        /// Why the gift fits; picks between saved gifts that share a name
        #[arg(long)]
        reason: Option<String>,
        /// Occasion key (default from config)
        #[arg(short, long)]
        occasion: Option<String>,
    },
    /// Browse past requests
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Gifts saved for later
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
    /// Show or change stored preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
    /// Print web and marketplace search links for a gift
    Links {
        /// Gift name
        gift: String,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List past requests, newest first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show the gift ideas of one past request
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Delete one past request
    Remove { id: String },
    /// Delete all history
    Clear,
}

#[derive(Subcommand)]
enum SavedAction {
    /// List saved gifts
    List {
        #[arg(long)]
        json: bool,
    },
    /// Save a gift, or remove it if already saved
    Toggle {
        name: String,
        reason: String,
        price_range: String,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print the stored locale and theme
    Show,
    /// Set the default locale (id, en)
    Locale { locale: String },
    /// Set the theme (dark, light)
    Theme { theme: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .compact()
        .init();

    let cli = Cli::parse();
    let config = GiftGeniusConfig::load(Some(&std::env::current_dir()?))
        .unwrap_or_else(|_| GiftGeniusConfig::default_config());

    run(cli, &config).await
}

async fn run(cli: Cli, config: &GiftGeniusConfig) -> Result<()> {
    let store = create_store(config);
    let locale = match cli.locale.as_deref() {
        Some(code) => code.parse::<Locale>()?,
        None => Preferences::new(&store).locale(),
    };

    match cli.command {
        Command::Suggest {
            description,
            image,
            occasion,
            budget,
            zodiac,
            music,
            json,
        } => {
            let occasion = match occasion {
                Some(key) => Occasion::from_key(&key)?,
                None => config.defaults.occasion(),
            };
            let budget = match budget {
                Some(key) => Budget::from_key(&key)?,
                None => config.defaults.budget(),
            };
            let mut request = RecommendationRequest::from_options(
                description.unwrap_or_default(),
                occasion,
                budget,
                locale,
            );
            if let Some(path) = image {
                let payload = ImagePayload::from_path(&path)
                    .with_context(|| format!("failed to load image {}", path.display()))?;
                request = request.with_image(payload);
            }
            if let Some(sign) = zodiac {
                request = request.with_zodiac(sign);
            }
            if let Some(vibe) = music {
                request = request.with_music_vibe(vibe);
            }

            let app = make_app(config, store)?;
            cmd_suggest(&app, locale, &request, json).await
        }
        Command::Alchemy {
            element_a,
            element_b,
            json,
        } => {
            let app = make_app(config, store)?;
            let request = AlchemyRequest::new(element_a, element_b, locale);
            cmd_alchemy(&app, locale, &request, json).await
        }
        Command::Greet {
            gift,
            recipient,
            reason,
            occasion,
        } => {
            let occasion = match occasion {
                Some(key) => Occasion::from_key(&key)?,
                None => config.defaults.occasion(),
            };
            let app = make_app(config, store)?;
            let gift = pick_saved_gift(app.saved().load(), &gift, reason.as_deref());
            cmd_greet(&app, locale, &gift, &recipient, occasion).await
        }
        Command::History { action } => cmd_history(&store, locale, action),
        Command::Saved { action } => cmd_saved(&store, locale, action),
        Command::Prefs { action } => cmd_prefs(&store, action),
        Command::Links { gift } => cmd_links(&gift, locale),
    }
}

fn make_app(
    config: &GiftGeniusConfig,
    store: Storage,
) -> Result<GiftGenius<GeminiBackend, Storage>> {
    let backend =
        GeminiBackend::from_config(&config.llm).context("failed to create Gemini backend")?;
    tracing::debug!(model = backend.model(), "using Gemini backend");
    Ok(GiftGenius::new(backend, store))
}

// ---------------------------------------------------------------------------
// suggest / alchemy
// ---------------------------------------------------------------------------

async fn cmd_suggest(
    app: &GiftGenius<GeminiBackend, Storage>,
    locale: Locale,
    request: &RecommendationRequest,
    json: bool,
) -> Result<()> {
    let mut state = app.initial_state();
    state.set_locale(locale);
    let result = app.suggest(&mut state, request).await;
    report(result, &state, json)
}

async fn cmd_alchemy(
    app: &GiftGenius<GeminiBackend, Storage>,
    locale: Locale,
    request: &AlchemyRequest,
    json: bool,
) -> Result<()> {
    let mut state = app.initial_state();
    state.set_locale(locale);
    let result = app.alchemy(&mut state, request).await;
    report(result, &state, json)
}

fn report(
    result: gift_genius_core::error::Result<Vec<Recommendation>>,
    state: &AppState,
    json: bool,
) -> Result<()> {
    match result {
        Ok(recs) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&recs)?);
            } else {
                print_recommendations(&recs, state.results_summary(), state.locale())?;
            }
            Ok(())
        }
        Err(e) if e.is_generation_failure() => {
            let message = state
                .error_message()
                .unwrap_or(state.locale().translations().error_generic);
            Err(anyhow::Error::new(e).context(message.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

fn print_recommendations(
    recs: &[Recommendation],
    summary: Option<&str>,
    locale: Locale,
) -> Result<()> {
    let t = locale.translations();
    println!("{}", t.results_title.bold());
    if let Some(summary) = summary {
        println!("{}", summary.dimmed());
    }
    println!("{}", "─".repeat(60).dimmed());

    for (i, rec) in recs.iter().enumerate() {
        println!("{}. {}", i + 1, rec.name.bold().cyan());
        if !rec.reason.is_empty() {
            println!("   {}", rec.reason);
        }
        println!("   {}", rec.price_range.green());
        println!(
            "   {} {}",
            format!("{}:", t.btn_search_google).dimmed(),
            shopping::web_search_url(&rec.name)?
        );
        println!(
            "   {} {}",
            format!("{}:", t.btn_search_shop).dimmed(),
            shopping::shop_search_url(&rec.name, locale)?
        );
        println!();
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// greet
// ---------------------------------------------------------------------------

async fn cmd_greet(
    app: &GiftGenius<GeminiBackend, Storage>,
    locale: Locale,
    gift: &Recommendation,
    recipient: &str,
    occasion: Occasion,
) -> Result<()> {
    let message = app
        .greet(gift, recipient, occasion.label(locale), locale)
        .await;

    println!("{}", locale.translations().greeting_title.bold());
    println!("{}", message.italic());
    Ok(())
}

/// The saved record for `name` so its reason travels with it. With `reason`
/// both fields must match; without it the earliest saved gift of that name
/// wins. Unsaved gifts are built from the arguments alone.
fn pick_saved_gift(
    saved: Vec<Recommendation>,
    name: &str,
    reason: Option<&str>,
) -> Recommendation {
    saved
        .into_iter()
        .find(|s| s.name == name && reason.map_or(true, |r| s.reason == r))
        .unwrap_or_else(|| Recommendation::new(name, reason.unwrap_or_default(), ""))
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

fn cmd_history(store: &Storage, locale: Locale, action: HistoryAction) -> Result<()> {
    let history = HistoryStore::new(store);
    let t = locale.translations();

    match action {
        HistoryAction::List { json } => {
            let entries = history.load();
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }
            if entries.is_empty() {
                println!("{}", t.history_empty.dimmed());
                return Ok(());
            }

            println!("{}", t.history_title.bold());
            println!(
                "  {}  {}  {}",
                format!("{:<36}", "ID").dimmed(),
                format!("{:<16}", "Date").dimmed(),
                "Request".dimmed(),
            );
            println!("{}", "─".repeat(90).dimmed());
            for entry in &entries {
                println!(
                    "  {}  {:<16}  {}",
                    entry.id.cyan(),
                    format_timestamp(entry),
                    entry.summary,
                );
            }
            println!("{}", "─".repeat(90).dimmed());
            println!(
                "  {} entr{}",
                entries.len(),
                if entries.len() == 1 { "y" } else { "ies" }
            );
            Ok(())
        }
        HistoryAction::Show { id, json } => {
            let entry = history
                .get(&id)
                .with_context(|| format!("no history entry with id {id}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
                return Ok(());
            }
            let mut state = AppState::new(locale, Theme::default());
            state.show_entry(&entry);
            println!("{}", format_timestamp(&entry).dimmed());
            print_recommendations(state.results(), state.results_summary(), locale)
        }
        HistoryAction::Remove { id } => {
            history.remove(&id).context("failed to remove history entry")?;
            println!("{} {}", "Removed".green(), id.cyan());
            Ok(())
        }
        HistoryAction::Clear => {
            history.clear().context("failed to clear history")?;
            println!("{}", "History cleared.".green());
            Ok(())
        }
    }
}

fn format_timestamp(entry: &HistoryEntry) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(entry.created_at_millis)
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

// ---------------------------------------------------------------------------
// saved
// ---------------------------------------------------------------------------

fn cmd_saved(store: &Storage, locale: Locale, action: SavedAction) -> Result<()> {
    let saved = SavedItemsStore::new(store);
    let t = locale.translations();

    match action {
        SavedAction::List { json } => {
            let items = saved.load();
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
                return Ok(());
            }
            if items.is_empty() {
                println!("{}", t.saved_empty.dimmed());
                return Ok(());
            }
            println!("{}", t.saved_title.bold());
            for item in &items {
                println!(
                    "  {}  {}  {}",
                    item.name.cyan(),
                    item.price_range.green(),
                    item.reason.dimmed()
                );
            }
            Ok(())
        }
        SavedAction::Toggle {
            name,
            reason,
            price_range,
        } => {
            let gift = Recommendation::new(name, reason, price_range);
            let now_saved = saved.toggle(&gift).context("failed to update saved items")?;
            if now_saved {
                println!("{} {}", t.save_for_later.green(), gift.name.cyan());
            } else {
                println!("{} {}", t.remove_from_saved.yellow(), gift.name.cyan());
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// prefs / links
// ---------------------------------------------------------------------------

fn cmd_prefs(store: &Storage, action: PrefsAction) -> Result<()> {
    let prefs = Preferences::new(store);
    match action {
        PrefsAction::Show => {
            println!("{:<8} {}", "locale".dimmed(), prefs.locale());
            println!("{:<8} {}", "theme".dimmed(), prefs.theme());
        }
        PrefsAction::Locale { locale } => {
            let locale: Locale = locale.parse()?;
            prefs.set_locale(locale).context("failed to save locale")?;
            println!("{} {}", "locale =".dimmed(), locale.green());
        }
        PrefsAction::Theme { theme } => {
            let theme: Theme = theme.parse()?;
            prefs.set_theme(theme).context("failed to save theme")?;
            println!("{} {}", "theme =".dimmed(), theme.green());
        }
    }
    Ok(())
}

fn cmd_links(gift: &str, locale: Locale) -> Result<()> {
    let t = locale.translations();
    println!("{:<24} {}", t.btn_search_google, shopping::web_search_url(gift)?);
    println!(
        "{:<24} {}",
        t.btn_search_shop,
        shopping::shop_search_url(gift, locale)?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved_twins() -> Vec<Recommendation> {
        vec![
            Recommendation::new("Star Map", "Night you met", "Rp 200rb"),
            Recommendation::new("Star Map", "Loves astronomy", "Rp 250rb"),
        ]
    }

    #[test]
    fn test_pick_saved_gift_uses_reason_to_disambiguate() {
        let gift = pick_saved_gift(saved_twins(), "Star Map", Some("Loves astronomy"));
        assert_eq!(gift.price_range, "Rp 250rb");
    }

    #[test]
    fn test_pick_saved_gift_without_reason_takes_earliest() {
        let gift = pick_saved_gift(saved_twins(), "Star Map", None);
        assert_eq!(gift.reason, "Night you met");
    }

    #[test]
    fn test_pick_saved_gift_falls_back_to_arguments() {
        let gift = pick_saved_gift(saved_twins(), "Star Map", Some("First date"));
        assert_eq!(gift, Recommendation::new("Star Map", "First date", ""));

        let gift = pick_saved_gift(Vec::new(), "Mug", None);
        assert_eq!(gift, Recommendation::new("Mug", "", ""));
    }
}
