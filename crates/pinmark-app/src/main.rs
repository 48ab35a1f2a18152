//! Main application entry point.

use pinmark_app::{App, AppConfig, USAGE};

fn main() {
    env_logger::init();
    log::info!("Starting pinmark");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return;
    }

    let result = AppConfig::from_args(args).and_then(|config| {
        if config.list {
            let summaries = pollster::block_on(App::list(&config))?;
            for summary in summaries {
                println!("{}", summary);
            }
            Ok(())
        } else {
            pollster::block_on(App::run(config))
        }
    });
    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
