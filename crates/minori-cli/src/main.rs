//! Command-line driver for the catalog client.
//!
//! Resolves preferences, runs one controller cycle against a live backend,
//! and prints the resulting view state. Unauthenticated by design, so the
//! watch-list cache stays empty and cards render without the add button.

use clap::{Parser, Subcommand, ValueEnum};
use minori_api::request::{CuratedKind, FilterSet, SortKey};
use minori_api::{CatalogClient, CatalogService};
use minori_core::prefs::{resolve_nsfw, PrefStore};
use minori_core::query::{PageConfig, QueryController};
use minori_core::render::{render_page, RenderContext};
use minori_core::{format, ModalViewer, WatchList};

#[derive(Parser)]
#[command(name = "minori", about = "Browse the anime catalog from the terminal", version)]
struct Opts {
    /// Catalog backend base URL.
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    base_url: String,

    /// Allow NSFW results, overriding the stored preference.
    #[arg(long)]
    nsfw: bool,

    /// Print rendered card markup instead of the plain listing.
    #[arg(long)]
    html: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search titles by name.
    Search {
        term: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
    },
    /// Most popular titles.
    Popular {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Top-rated titles.
    Top {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Currently airing titles.
    Airing {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// A random draw, optionally narrowed by filters.
    Random {
        #[arg(long = "type")]
        media_type: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        rating: Option<String>,
        #[arg(long)]
        min_year: Option<u32>,
        #[arg(long)]
        max_year: Option<u32>,
        /// Genre id, repeatable.
        #[arg(long = "genre")]
        genres: Vec<u64>,
    },
    /// Extended detail for one title.
    Detail { id: u64 },
    /// The available genres.
    Genres,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Score,
    Popularity,
    StartDate,
    Episodes,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Score => SortKey::Score,
            SortArg::Popularity => SortKey::Popularity,
            SortArg::StartDate => SortKey::StartDate,
            SortArg::Episodes => SortKey::Episodes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "minori=info".into()))
        .init();

    let opts = Opts::parse();
    let client = CatalogClient::new(&opts.base_url);

    let store = PrefStore::load();
    let resolved = resolve_nsfw(false, false, store.nsfw_choice());
    let nsfw_allowed = opts.nsfw || resolved.allowed;
    tracing::debug!(
        base_url = %opts.base_url,
        nsfw_allowed,
        prefs = %store.path().display(),
        "starting"
    );

    match opts.command {
        Command::Detail { id } => show_detail(&client, id).await,
        Command::Genres => {
            for genre in client.genres().await? {
                println!("{:>6}  {}", genre.mal_id, genre.name);
            }
            Ok(())
        }
        command => run_grid(&client, command, nsfw_allowed, opts.html).await,
    }
}

async fn run_grid(
    client: &CatalogClient,
    command: Command,
    nsfw_allowed: bool,
    html: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = QueryController::new(PageConfig::catalog());
    controller.set_nsfw_allowed(nsfw_allowed);

    let (issued, target_page) = match command {
        Command::Search { term, page, sort } => {
            if let Some(sort) = sort {
                controller.set_sort(sort.into());
            }
            let Some(issued) = controller.search_input(&term) else {
                eprintln!("пустой запрос");
                return Ok(());
            };
            (issued, page)
        }
        Command::Popular { page } => (controller.select_curated(CuratedKind::Popular), page),
        Command::Top { page } => (controller.select_curated(CuratedKind::Top), page),
        Command::Airing { page } => (controller.select_curated(CuratedKind::Airing), page),
        Command::Random {
            media_type,
            status,
            rating,
            min_year,
            max_year,
            genres,
        } => {
            let filters = FilterSet {
                media_type,
                status,
                rating,
                min_year,
                max_year,
                genre_ids: genres.into_iter().collect(),
            };
            let issued = if filters.is_empty() {
                controller.draw_random()
            } else {
                controller
                    .apply_filters(filters)
                    .ok_or("filters rejected")?
            };
            (issued, 1)
        }
        Command::Detail { .. } | Command::Genres => unreachable!("handled in main"),
    };

    controller.run(client, issued).await;

    // Walk forward to the requested page; stop early when the server says
    // there is nothing further.
    while controller.state().page < target_page && controller.error().is_none() {
        let Some(issued) = controller.next_page() else {
            break;
        };
        controller.run(client, issued).await;
    }

    print_grid(&controller, html);
    if controller.error().is_some() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_grid(controller: &QueryController, html: bool) {
    if let Some(message) = controller.error() {
        eprintln!("{message}");
        return;
    }
    if let Some(line) = controller.total_line() {
        println!("{line}");
    }
    if controller.is_empty_state() {
        return;
    }

    if html {
        let watchlist = WatchList::new();
        let ctx = RenderContext {
            authenticated: false,
            watchlist: &watchlist,
        };
        let page = render_page(controller.results(), &ctx);
        println!("{}", page.markup);
    } else {
        for anime in controller.results() {
            println!(
                "{:>8}  {}  ({})  ⭐ {}  👥 {}  🎬 {} эп.",
                anime.mal_id,
                anime.title,
                format::year(anime.start_date.as_deref()),
                format::score(anime.score),
                format::popularity(anime.popularity),
                format::episodes(anime.episodes),
            );
        }
    }

    let pagination = controller.pagination();
    if pagination.visible {
        let more = if pagination.next_enabled() { " →" } else { "" };
        println!("{}{more}", pagination.label());
    }
}

async fn show_detail(client: &CatalogClient, id: u64) -> Result<(), Box<dyn std::error::Error>> {
    let mut modal = ModalViewer::new();
    if !modal.open(client.get_anime(id).await) {
        if let Some(notice) = modal.take_notice() {
            eprintln!("{notice}");
        }
        std::process::exit(1);
    }

    let Some(view) = modal.current() else {
        return Ok(());
    };
    println!("{}", view.title);
    if let Some(en) = &view.title_en {
        println!("{en}");
    }
    if let Some(jp) = &view.title_jp {
        println!("{jp}");
    }
    println!("{}  {}  {}", view.media_type, view.year, view.episodes_line);
    println!("{}", view.score_line);
    println!();
    println!("{}", view.synopsis);
    println!();
    if let Some(placeholder) = view.links_placeholder() {
        println!("{placeholder}");
    } else {
        for link in &view.links {
            if link.inert {
                println!("{} (недоступна)", link.label);
            } else {
                println!("{}: {}", link.label, link.url);
            }
        }
    }
    Ok(())
}
