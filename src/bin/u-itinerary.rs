use anyhow::{anyhow, Context, Result};
use clap::{arg, Command};
use log::LevelFilter;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use std::{fs, io};
use u_itinerary::logging::init_logger;
use u_itinerary::protocol::{RouteRequestMessage, RouteResponse};
use u_itinerary::Optimizer;

fn cli() -> Command {
    Command::new("u-itinerary")
        .about("Plans itineraries over free-edge networks")
        .arg_required_else_help(true)
        .arg(
            arg!(--"log-level" [LEVEL] "Log verbosity on stderr")
                .global(true)
                .default_value("warn")
                .value_parser(["off", "error", "warn", "info", "debug", "trace"]),
        )
        .subcommand(
            Command::new("solve")
                .about("Solves a route request and prints the response message")
                .arg(
                    arg!(<REQUEST> "Request json string, path to a json file, or - for stdin")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--"timeout-ms" [MS] "Cancel the request after this many milliseconds")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(arg!(--pretty "Pretty-print the response")),
        )
}

fn main() {
    let matches = cli().get_matches();

    let level = matches
        .get_one::<String>("log-level")
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);
    if let Err(e) = init_logger(level) {
        eprintln!("Error: {e}");
    }

    if let Err(e) = match matches.subcommand() {
        Some(("solve", sub_m)) => solve(
            sub_m.get_one::<String>("REQUEST").cloned().unwrap_or_default(),
            sub_m.get_one::<u64>("timeout-ms").copied(),
            sub_m.get_flag("pretty"),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn solve(request: String, timeout_ms: Option<u64>, pretty: bool) -> Result<()> {
    let text = load_request(&request)?;
    let optimizer = Optimizer::new();

    let response = match RouteRequestMessage::from_json(&text) {
        Ok(request) => {
            let job = optimizer.submit(request);
            match timeout_ms {
                Some(ms) => job.wait_timeout(Duration::from_millis(ms)),
                None => job.wait(),
            }
        }
        Err(e) => RouteResponse::error("", &e),
    };

    let json = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        response.to_json()?
    };
    println!("{json}");

    match response {
        RouteResponse::Error { message, .. } => Err(anyhow!(message)),
        _ => Ok(()),
    }
}

fn load_request(request: &str) -> Result<String> {
    if request == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read request from stdin")?;
        Ok(text)
    } else if request.trim_start().starts_with('{') {
        Ok(request.to_string())
    } else {
        let path = Path::new(request);
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file: {}", path.display()))
    }
}
