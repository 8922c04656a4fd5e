use std::env;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let raw_args: Vec<String> = env::args().collect();
    match raw_args.get(1).map(|s| s.as_str()) {
        Some("serve") => {
            let port = raw_args
                .get(2)
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(8080);
            if let Err(e) = rentvsbuy::api::run_http_server(port).await {
                tracing::error!(error = %e, "server error");
                std::process::exit(1);
            }
        }
        Some("compare") => {
            let args = std::iter::once(raw_args[0].clone()).chain(raw_args[2..].iter().cloned());
            match rentvsbuy::api::run_cli_comparison(args) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(2);
                }
            }
        }
        _ => {
            eprintln!("Usage: rentvsbuy serve [port]");
            eprintln!("       rentvsbuy compare --home-price <PRICE> --monthly-rent <RENT> [options]");
            std::process::exit(1);
        }
    }
}
