use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use midmeet::config::Config;
use midmeet::geo::Coordinate;
use midmeet::hotspots::HOTSPOTS;
use midmeet::places::PlaceResolver;
use midmeet::recommend::{render_summary, RecommendError, Recommender, Strategy};
use midmeet::server;
use midmeet::session::Session;
use midmeet::venues::{render_venues, venues_around};
use midmeet::vibe::Vibe;

/// MIDMEET: find a fair place to meet, and what to do once you're there.
///
/// Examples:
///   midmeet search 강남역
///   midmeet recommend --from 강남역 --from 홍대입구역 --from 잠실역
///   midmeet recommend --at 37.4979,127.0276 --at 37.5572,126.9245 --strategy hotspot
///   midmeet venues --at 37.5,127.0 --vibe drinking
///   midmeet serve --port 8080
#[derive(Parser)]
#[command(name = "midmeet", version, about, long_about = None)]
struct Cli {
    /// Offline mode: only use cache and built-in data.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search for a starting point by name or address.
    Search {
        query: String,
        #[arg(long)]
        json: bool,
    },

    /// Recommend meeting points for a group.
    Recommend {
        /// Starting point by name; the first search result is used.
        #[arg(long = "from")]
        from: Vec<String>,

        /// Starting point as "lat,lon".
        #[arg(long = "at", allow_hyphen_values = true)]
        at: Vec<Coordinate>,

        /// "distance" (hubs near the centroid) or "hotspot" (least total travel).
        #[arg(long, default_value = "distance")]
        strategy: Strategy,

        #[arg(long, default_value = "dining")]
        vibe: Vibe,

        /// Also list venues around the top candidate.
        #[arg(long)]
        venues: bool,

        #[arg(long)]
        json: bool,
    },

    /// List food, cafes and things to do around a point.
    Venues {
        #[arg(long, allow_hyphen_values = true)]
        at: Coordinate,

        #[arg(long, default_value = "dining")]
        vibe: Vibe,

        #[arg(long)]
        json: bool,
    },

    /// Show the built-in hotspot catalog.
    Hotspots,

    /// Run the web server.
    Serve {
        /// Overrides MIDMEET_HOST.
        #[arg(long)]
        host: Option<String>,

        /// Overrides MIDMEET_PORT.
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("midmeet=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        let code = if e.downcast_ref::<RecommendError>().is_some() { 2 } else { 1 };
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let mut resolver = PlaceResolver::from_config(&config);
    if cli.offline {
        resolver.set_offline(true);
    }

    match cli.command {
        Command::Search { query, json } => {
            let places = resolver.search_address(&query);
            if json {
                println!("{}", serde_json::to_string_pretty(&places)?);
            } else if places.is_empty() {
                eprintln!("  No results for '{}'.", query);
            } else {
                for (i, place) in places.iter().enumerate() {
                    println!("  {:>2}. {}", i + 1, place.display_line());
                }
            }
        }

        Command::Recommend { from, at, strategy, vibe, venues, json } => {
            let session = build_session(&resolver, &from, &at, strategy, vibe)?;
            let recommendation = Recommender::default().recommend(&session, &resolver)?;

            let nearby = match recommendation.candidates.first() {
                Some(top) if venues => Some(venues_around(&resolver, top.coordinate, vibe)),
                _ => None,
            };

            if json {
                let out = serde_json::json!({
                    "recommendation": recommendation,
                    "vibe": vibe,
                    "venues": nearby.as_ref().map(|v| v.list_preview()),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print!("{}", render_summary(&recommendation, &session));
                if let (Some(top), Some(nearby)) = (recommendation.candidates.first(), &nearby) {
                    println!("\n  📍 {} 주변 ({})", top.name, vibe.label());
                    print!("{}", render_venues(nearby));
                }
            }
        }

        Command::Venues { at, vibe, json } => {
            let nearby = venues_around(&resolver, at, vibe);
            if json {
                println!("{}", serde_json::to_string_pretty(&nearby)?);
            } else {
                println!("  📍 {} ({})", at, vibe.label());
                print!("{}", render_venues(&nearby));
            }
        }

        Command::Hotspots => {
            for spot in HOTSPOTS {
                println!("  {:<10} {:>9.4}, {:>9.4}  {}", spot.name(), spot.lat, spot.lon, spot.description);
            }
        }

        Command::Serve { host, port } => {
            let host = host.unwrap_or(config.host);
            let port = port.unwrap_or(config.port);
            info!(%host, port, offline = resolver.is_offline(), "starting MIDMEET server");
            let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
            runtime.block_on(server::start(&host, port, resolver))?;
        }
    }

    Ok(())
}

/// Fill one slot per `--from` query and `--at` coordinate, in that order.
fn build_session(
    resolver: &PlaceResolver,
    from: &[String],
    at: &[Coordinate],
    strategy: Strategy,
    vibe: Vibe,
) -> anyhow::Result<Session> {
    if from.is_empty() && at.is_empty() {
        bail!("no starting points given; use --from <name> or --at <lat,lon>");
    }

    let mut session = Session::new(from.len() + at.len())
        .with_strategy(strategy)
        .with_vibe(vibe);

    for (index, query) in from.iter().enumerate() {
        let place = resolver
            .search_address(query)
            .into_iter()
            .next()
            .with_context(|| format!("no place found for '{}'", query))?;
        eprintln!("  👤 친구 {}: {} ({})", index + 1, place.name, place.source);
        session.select(index, &place)?;
    }
    for (offset, coordinate) in at.iter().enumerate() {
        session.set_location(from.len() + offset, None, *coordinate)?;
    }

    Ok(session)
}
