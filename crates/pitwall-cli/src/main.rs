//! Pitwall CLI - circuit weather from the pit wall

use clap::{Parser, Subcommand};
use pitwall_analysis::{decompose_wind, estimate_track_temperature, TrackTempInput};
use pitwall_circuits::{Catalog, Category, Circuit};
use pitwall_core::{AppError, Config};
use pitwall_favorites::{FavoriteCircuit, FavoritesStore, StoreError};
use pitwall_weather::{Forecast, WeatherError, WeatherProvider};

#[derive(Parser)]
#[command(name = "pitwall", about = "Weather intelligence for motorsport circuits", version)]
struct Cli {
    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Browse the circuit catalog
    #[command(subcommand)]
    Circuits(CircuitsCommand),

    /// Current conditions and forecast for a circuit
    Weather {
        category: Category,
        slug: String,
        /// Forecast horizon in days (defaults to the configured value)
        #[arg(long)]
        days: Option<u8>,
    },

    /// Wind components over a circuit's main straight
    Wind {
        category: Category,
        slug: String,
        /// Wind speed; the live reading is used when omitted
        #[arg(long, requires = "direction")]
        speed: Option<f64>,
        /// Wind direction in meteorological degrees
        #[arg(long, requires = "speed")]
        direction: Option<f64>,
        /// Override the circuit's recorded main-straight bearing
        #[arg(long)]
        bearing: Option<f64>,
    },

    /// Estimated track surface temperature
    TrackTemp {
        category: Category,
        slug: String,
    },

    /// Manage starred circuits
    #[command(subcommand)]
    Favorites(FavoritesCommand),
}

#[derive(Subcommand)]
enum CircuitsCommand {
    /// List circuits, optionally for one series
    List {
        #[arg(long)]
        category: Option<Category>,
    },
    /// Search circuits by name, country, or slug
    Search { query: String },
    /// Closest circuit to a coordinate
    Nearest { latitude: f64, longitude: f64 },
}

#[derive(Subcommand)]
enum FavoritesCommand {
    /// Starred circuits, most recent first
    List,
    /// Star a circuit
    Add { category: Category, slug: String },
    /// Unstar a circuit
    Remove { category: Category, slug: String },
    /// Star or unstar depending on current state
    Toggle { category: Category, slug: String },
}

fn weather_err(e: WeatherError) -> AppError {
    match e {
        WeatherError::Network(net) => AppError::Network(net),
        other => AppError::Service(other.to_string()),
    }
}

fn store_err(e: StoreError) -> AppError {
    match e {
        StoreError::Storage(storage) => AppError::Storage(storage),
        other => AppError::Service(other.to_string()),
    }
}

fn find_circuit<'a>(
    catalog: &'a Catalog,
    category: Category,
    slug: &str,
) -> Result<&'a Circuit, AppError> {
    catalog.find(category, slug).ok_or_else(|| {
        AppError::Service(format!(
            "unknown circuit '{}' in {} (try: pitwall circuits search {})",
            slug, category, slug
        ))
    })
}

fn print_circuit_rows(circuits: &[&Circuit]) {
    for circuit in circuits {
        println!(
            "{:<8} {:<28} {} ({})",
            circuit.category.label(),
            circuit.slug,
            circuit.name,
            circuit.country
        );
    }
}

fn print_forecast(circuit: &Circuit, forecast: &Forecast) {
    let units = forecast.units;
    let temp = units.temperature_symbol();
    let speed = units.speed_symbol();

    println!("{} ({}) - {}", circuit.name, circuit.country, circuit.category);
    if forecast.stale {
        println!("  [cached data; the weather service was unreachable]");
    }
    println!(
        "  Observed {} local",
        forecast.current.observed_at.format("%Y-%m-%d %H:%M")
    );
    println!(
        "  {}  {:.1}{} (feels like {:.1}{})",
        forecast.current.condition.description(),
        forecast.current.temperature,
        temp,
        forecast.current.feels_like,
        temp
    );
    println!(
        "  Humidity {}%   Pressure {:.0} hPa   Cloud {:.0}%   UV {:.1}",
        forecast.current.humidity,
        forecast.current.pressure_hpa,
        forecast.current.cloud_cover,
        forecast.current.uv_index
    );
    match forecast.current.wind_gusts {
        Some(gusts) => println!(
            "  Wind {:.1} {} from {:.0}°, gusting {:.1} {}",
            forecast.current.wind_speed, speed, forecast.current.wind_direction, gusts, speed
        ),
        None => println!(
            "  Wind {:.1} {} from {:.0}°",
            forecast.current.wind_speed, speed, forecast.current.wind_direction
        ),
    }

    if !forecast.daily.is_empty() {
        println!();
        println!("  Forecast:");
        for day in &forecast.daily {
            println!(
                "    {}  {:<13} {:>5.1} to {:.1}{}  rain {:>3}%  sun {}-{}",
                day.date,
                day.condition.description(),
                day.low,
                day.high,
                temp,
                day.precipitation_chance,
                day.sunrise.format("%H:%M"),
                day.sunset.format("%H:%M")
            );
        }
    }
}

async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let (config, _validation) = Config::load_validated()?;
    let catalog = Catalog::load().map_err(|e| AppError::Service(e.to_string()))?;
    tracing::debug!("Catalog ready with {} circuits", catalog.all().len());

    match cli.command {
        Command::Circuits(command) => match command {
            CircuitsCommand::List { category } => {
                let circuits = match category {
                    Some(category) => catalog.by_category(category),
                    None => catalog.all().iter().collect(),
                };
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&circuits).map_err(anyhow::Error::from)?);
                } else {
                    print_circuit_rows(&circuits);
                }
            }
            CircuitsCommand::Search { query } => {
                let matches = catalog.search(&query);
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&matches).map_err(anyhow::Error::from)?);
                } else if matches.is_empty() {
                    println!("No circuits match '{}'", query);
                } else {
                    print_circuit_rows(&matches);
                }
            }
            CircuitsCommand::Nearest { latitude, longitude } => {
                let (circuit, distance) = catalog
                    .nearest(latitude, longitude)
                    .ok_or_else(|| AppError::Service("circuit catalog is empty".into()))?;
                if cli.json {
                    let payload = serde_json::json!({
                        "circuit": circuit,
                        "distance_km": distance,
                    });
                    println!("{}", serde_json::to_string_pretty(&payload).map_err(anyhow::Error::from)?);
                } else {
                    println!(
                        "{} ({}) - {} - {:.0} km away",
                        circuit.name, circuit.country, circuit.category, distance
                    );
                }
            }
        },

        Command::Weather { category, slug, days } => {
            let circuit = find_circuit(&catalog, category, &slug)?;
            let mut weather_config = config.weather.clone();
            if let Some(days) = days {
                weather_config.forecast_days = days;
            }
            let provider = WeatherProvider::new(
                &weather_config.base_url,
                config.units,
                weather_config.forecast_days,
                std::time::Duration::from_secs(u64::from(weather_config.refresh_minutes) * 60),
            )
            .map_err(weather_err)?;

            let forecast = provider.forecast(circuit).await.map_err(weather_err)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&forecast).map_err(anyhow::Error::from)?);
            } else {
                print_forecast(circuit, &forecast);
            }
        }

        Command::Wind { category, slug, speed, direction, bearing } => {
            let circuit = find_circuit(&catalog, category, &slug)?;
            let bearing = bearing.or(circuit.track_bearing).ok_or_else(|| {
                AppError::Service(format!(
                    "{} has no recorded main-straight bearing; pass --bearing",
                    circuit.name
                ))
            })?;

            let (wind_speed, wind_direction) = match (speed, direction) {
                (Some(speed), Some(direction)) => (speed, direction),
                _ => {
                    let provider =
                        WeatherProvider::from_config(&config).map_err(weather_err)?;
                    let forecast = provider.forecast(circuit).await.map_err(weather_err)?;
                    (forecast.current.wind_speed, forecast.current.wind_direction)
                }
            };

            let components = decompose_wind(wind_speed, wind_direction, bearing);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&components).map_err(anyhow::Error::from)?);
            } else {
                let speed_unit = config.units.speed_symbol();
                println!("{} - main straight bearing {:.0}°", circuit.name, bearing);
                println!(
                    "  Wind {:.1} {} from {:.0}° ({:+.0}° off the straight)",
                    wind_speed, speed_unit, wind_direction, components.angle_diff
                );
                println!("  {}", components.class);
                println!(
                    "  Along track {:+.1} {}   Across track {:.1} {}",
                    components.headwind, speed_unit, components.crosswind, speed_unit
                );
            }
        }

        Command::TrackTemp { category, slug } => {
            let circuit = find_circuit(&catalog, category, &slug)?;
            let provider = WeatherProvider::from_config(&config).map_err(weather_err)?;
            let forecast = provider.forecast(circuit).await.map_err(weather_err)?;

            let (sunrise, sunset) = forecast.sun_times();
            let input = TrackTempInput {
                air_temperature: forecast.current.temperature,
                uv_index: forecast.current.uv_index,
                cloud_cover: forecast.current.cloud_cover,
                wind_speed: forecast.current.wind_speed,
                observed_at: forecast.current.observed_at.time(),
                sunrise,
                sunset,
            };
            let estimate = estimate_track_temperature(&input, config.units);

            if cli.json {
                let payload = serde_json::json!({
                    "circuit": circuit,
                    "air_temperature": input.air_temperature,
                    "estimate": estimate,
                });
                println!("{}", serde_json::to_string_pretty(&payload).map_err(anyhow::Error::from)?);
            } else {
                let temp = config.units.temperature_symbol();
                println!("{} ({})", circuit.name, circuit.country);
                println!(
                    "  Air {:.1}{}   Track ~{:.1}{}  ({})",
                    input.air_temperature,
                    temp,
                    estimate.track_temperature,
                    temp,
                    if estimate.daytime { "daytime" } else { "after dark" }
                );
            }
        }

        Command::Favorites(command) => {
            let mut store = FavoritesStore::open_default().map_err(store_err)?;
            match command {
                FavoritesCommand::List => {
                    let favorites = store.list();
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&favorites).map_err(anyhow::Error::from)?);
                    } else if favorites.is_empty() {
                        println!("No favorites yet. Star one with: pitwall favorites add f1 spa");
                    } else {
                        for favorite in favorites {
                            println!(
                                "{:<8} {:<28} {} ({})  added {}",
                                favorite.category.label(),
                                favorite.slug,
                                favorite.name,
                                favorite.country,
                                favorite.added_at.format("%Y-%m-%d")
                            );
                        }
                    }
                }
                FavoritesCommand::Add { category, slug } => {
                    let circuit = find_circuit(&catalog, category, &slug)?;
                    store
                        .add(FavoriteCircuit::from_circuit(circuit))
                        .map_err(store_err)?;
                    println!("Starred {} ({})", circuit.name, circuit.category);
                }
                FavoritesCommand::Remove { category, slug } => {
                    let removed = store.remove(category, &slug).map_err(store_err)?;
                    println!("Unstarred {} ({})", removed.name, removed.category);
                }
                FavoritesCommand::Toggle { category, slug } => {
                    let circuit = find_circuit(&catalog, category, &slug)?;
                    let starred = store.toggle(circuit).map_err(store_err)?;
                    if starred {
                        println!("Starred {} ({})", circuit.name, circuit.category);
                    } else {
                        println!("Unstarred {} ({})", circuit.name, circuit.category);
                    }
                }
            }
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = pitwall_core::init() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run().await {
        eprintln!("{}", e.user_message());
        eprintln!("  ({})", e);
        std::process::exit(1);
    }
}
