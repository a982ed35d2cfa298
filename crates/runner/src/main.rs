use helios_runner::{SimulationConfig, TradingSimulation};

fn print_help() {
    eprintln!(
        r#"Helios - pulse-driven trading simulation

USAGE:
    helios <CONFIG.json>

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)
"#
    );
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let path = match args.get(1).map(String::as_str) {
        Some("--help" | "-h") => {
            print_help();
            return;
        }
        Some(path) => path.to_string(),
        None => {
            print_help();
            std::process::exit(2);
        }
    };

    log::info!("Loading configuration from: {}", path);
    let config = match SimulationConfig::from_file(&path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let simulation = match TradingSimulation::with_config(config).await {
        Ok(simulation) => simulation,
        Err(e) => {
            log::error!("Cannot start simulation: {}", e);
            std::process::exit(1);
        }
    };

    match simulation.run().await {
        Ok(results) => {
            log::info!("Pulses:           {}", results.pulses);
            log::info!("Proposals:        {}", results.proposals);
            log::info!("Orders submitted: {}", results.orders_submitted);
            log::info!("Positions closed: {}", results.positions_closed);
            log::info!("Paths reinserted: {}", results.reinserted);
            log::info!(
                "Capital:          {} available of {} total",
                results.available,
                results.total
            );
            log::info!(
                "Account:          {} cash, {} value",
                results.balances.cash,
                results.balances.value
            );
        }
        Err(e) => {
            log::error!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    }
}
