extern crate nfl_sql;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{info, warn};

use nfl_sql::{
    Catalog,
    CatalogOptions,
    CommandRouter,
    Config,
    Flow,
    SqliteStore,
    config::DEFAULT_CONFIG_FILE,
    error::InputError,
    loader::load_script,
    prompt::Console,
};

/// Interactive shell over an NFL statistics database.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Properties file naming the database and load script
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Open the database as is, without running the load script
    #[arg(long)]
    skip_load: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        },
    };

    let store = match SqliteStore::open(&config.database) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Could not open database {}: {}", config.database.display(), e);
            process::exit(1);
        },
    };
    info!("opened {}", config.database.display());

    if !args.skip_load {
        match load_script(&store, &config.script) {
            Ok(n) => println!("Successfully executed {} SQL statements from {}", n, config.script.display()),
            Err(e) => {
                warn!("load script skipped: {}", e);
                println!("Warning: {}", e);
            },
        }
    }

    println!("\nWelcome to the NFL Database! Type 'h' for help, 'q' to quit.");

    let catalog = Catalog::new(&CatalogOptions::from(&config));
    let router = CommandRouter::new(&catalog, &store);
    let mut console = Console::new();
    let mut out = io::stdout();

    loop {
        let line = match console.read_command("NFL > ") {
            Ok(line) => line,
            Err(InputError::Interrupted) => {
                println!("Type 'q' to quit.");
                continue;
            },
            Err(InputError::Eof) => {
                println!("\nExiting NFL Database. Goodbye!");
                break;
            },
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            },
        };

        let flow = router.route(&line, &mut console, &mut out);
        let _ = out.flush();

        match flow {
            Flow::Continue => {},
            Flow::Quit => break,
            Flow::Disconnected => process::exit(1),
        }
    }
}
