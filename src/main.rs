use std::process::ExitCode;
use std::sync::Arc;
use std::time::SystemTime;

mod cli;
mod config;
mod handler;
mod http;
mod listing;
mod logger;
mod server;

type BoxError = Box<dyn std::error::Error>;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", env!("CARGO_PKG_NAME"));
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), BoxError> {
    let args = cli::parse_args(std::env::args().skip(1))?;
    if args.help {
        print!("{}", cli::usage());
        return Ok(());
    }
    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let cfg = config::Config::load(&args)?;
    cfg.validate()?;

    if args.print {
        return print_listing(&cfg);
    }

    logger::init(&cfg)?;

    // Worker thread count comes from config, defaulting to one per core
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), BoxError> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;

    logger::log_server_start(&addr, &cfg);
    let state = Arc::new(config::AppState::new(cfg)?);

    server::start_server_loop(listener, state).await
}

/// `--print`: write the root listing to stdout instead of serving it
fn print_listing(cfg: &config::Config) -> Result<(), BoxError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let root = std::path::Path::new(&cfg.listing.root);
    let entries = runtime.block_on(listing::read_entries(root, cfg.listing.show_hidden))?;

    let page = listing::ListingPage::plain(
        &cfg.listing.root,
        &entries,
        cfg.listing.size_units(),
        SystemTime::now(),
    );
    print!("{}", listing::render_text(&page));
    Ok(())
}
