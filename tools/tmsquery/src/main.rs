use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use env_logger::{Env, TimestampPrecision};
use geo::BoundingBox;
use tms::{Configuration, Error, ResolutionStrategy, Result, TileMap, TileMapRegistry, TileSet};

#[derive(Parser, Debug)]
#[command(name = "tmsquery")]
#[command(about = "Query the tiles of the configured TMS tile maps")]
struct Cli {
    #[arg(short = 'c', long = "config", env = "TMS_CONFIG", help = "Tile map service configuration file")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(name = "list", about = "List the configured tile maps")]
    List,
    #[command(name = "tiles", about = "List the tiles that cover a bounding box")]
    Tiles {
        #[arg(short = 't', long = "tilemap", help = "Title of the tile map")]
        tile_map: String,
        #[arg(
            short = 'o',
            long = "order",
            conflicts_with = "resolution",
            required_unless_present = "resolution",
            help = "Order of the tile set"
        )]
        order: Option<u32>,
        #[arg(short = 'r', long = "resolution", help = "Map units per pixel, selects the tile set")]
        resolution: Option<f64>,
        #[arg(long = "strategy", value_enum, default_value_t = Strategy::Lower, help = "Tile set selection for a resolution")]
        strategy: Strategy,
        #[arg(short = 'b', long = "bbox", allow_hyphen_values = true, help = "Bounding box: minx,miny,maxx,maxy")]
        bbox: BoundingBox,
        #[arg(long = "clip", help = "Clip the bounding box to the extent of the tile map")]
        clip: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Strategy {
    Higher,
    Lower,
    Closest,
}

impl From<Strategy> for ResolutionStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Higher => ResolutionStrategy::PreferHigher,
            Strategy::Lower => ResolutionStrategy::PreferLower,
            Strategy::Closest => ResolutionStrategy::Closest,
        }
    }
}

fn select_tile_set<'a>(tile_map: &'a TileMap, order: Option<u32>, resolution: Option<f64>, strategy: Strategy) -> Result<&'a TileSet> {
    let tile_set = match (order, resolution) {
        (Some(order), _) => tile_map.tile_set(order),
        (None, Some(resolution)) => tile_map.tile_set_for_resolution(resolution, strategy.into()),
        (None, None) => None,
    };

    tile_set.ok_or_else(|| Error::InvalidArgument(format!("No matching tile set in tile map '{}'", tile_map.title())))
}

fn list(registry: &TileMapRegistry) {
    for name in registry.tile_map_names() {
        if let Some(tile_map) = registry.tile_map(&name) {
            let orders: Vec<String> = tile_map.tile_sets().iter().map(|set| set.order().to_string()).collect();
            println!(
                "{} [{}] {} levels: {}",
                tile_map.title(),
                tile_map.srs(),
                tile_map.bounding_box(),
                orders.join(",")
            );
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let cli = Cli::parse();
    let config = Configuration::from_file(&cli.config)?;
    let registry = TileMapRegistry::configure_default(&config)?;
    log::info!("{} tile maps available", registry.len());

    match cli.command {
        Commands::List => list(&registry),
        Commands::Tiles {
            tile_map,
            order,
            resolution,
            strategy,
            bbox,
            clip,
        } => {
            let tile_map = registry
                .tile_map(&tile_map)
                .ok_or_else(|| Error::InvalidArgument(format!("Unknown tile map '{tile_map}'")))?;
            let tile_set = select_tile_set(tile_map, order, resolution, strategy)?;
            let bbox = if clip { tile_map.clip_to_max_bounding_box(&bbox) } else { bbox };

            let mut tiles: Vec<_> = tile_map.tiles_for(tile_set, &bbox)?.into_iter().collect();
            tiles.sort_by_key(|tile| tile.coordinate());
            for tile in tiles {
                println!("{} {}", tile.coordinate(), tile.source().location());
            }
        }
    }

    Ok(())
}
