//! Solar sizer entry point: CLI wiring and config-driven estimator construction.

use std::path::Path;
use std::process;

use tracing_subscriber::EnvFilter;

use solar_sizer::config::ReferenceConfig;
use solar_sizer::io::export::export_cost_csv;
use solar_sizer::sizing::{
    ApplianceKind, Estimator, InverterType, LoadInput, ReferenceData, SiteInput,
};

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    preset: Option<String>,
    city: String,
    outage_hours: f64,
    inverter_type: InverterType,
    roof_height_m: f64,
    load: LoadInput,
    cost_out: Option<String>,
    list_cities: bool,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("solar-sizer: residential rooftop solar sizing tool");
    eprintln!();
    eprintln!("Usage: solar-sizer [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load reference data from a TOML file");
    eprintln!("  --preset <name>          Use built-in reference data (reference)");
    eprintln!("  --city <name>            City for tariff and irradiance (default: pune)");
    eprintln!("  --outage <hours>         Weekly grid outage, 0-168 (default: 4)");
    eprintln!("  --inverter <type>        grid, hybrid or offgrid (default: hybrid)");
    eprintln!("  --roof-height <m>        Roof height in meters (default: 10)");
    eprintln!("  --load <kind>=<qty>      Appliance quantity, repeatable (e.g. \"Fridge=1\")");
    eprintln!("  --cost-out <path>        Export the cost breakdown to CSV");
    eprintln!("  --list-cities            Print the configured cities and exit");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start the JSON API server");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("Appliance kinds:");
    for kind in ApplianceKind::ALL {
        eprintln!("  {kind}");
    }
    eprintln!();
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=debug) to see engine logs on stderr.");
}

fn fail(message: &str) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str, what: &str) -> &'a str {
    *i += 1;
    match args.get(*i) {
        Some(v) => v.as_str(),
        None => fail(&format!("{flag} requires {what}")),
    }
}

fn parse_f64(value: &str, flag: &str) -> f64 {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => fail(&format!("{flag} value \"{value}\" is not a valid number")),
    }
}

/// Parses `"<kind>=<qty>"`, e.g. `"AC 1.5 ton=2"`.
fn parse_load(spec: &str) -> Result<(ApplianceKind, u32), String> {
    let (label, qty) = spec
        .rsplit_once('=')
        .ok_or_else(|| format!("--load value \"{spec}\" must look like <kind>=<qty>"))?;
    let kind = ApplianceKind::from_label(label)
        .ok_or_else(|| format!("unknown appliance \"{}\"", label.trim()))?;
    let qty = qty
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("quantity \"{}\" must be a non-negative integer", qty.trim()))?;
    Ok((kind, qty))
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        preset: None,
        city: "pune".to_string(),
        outage_hours: 4.0,
        inverter_type: InverterType::Hybrid,
        roof_height_m: 10.0,
        load: LoadInput::new(),
        cost_out: None,
        list_cities: false,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                let v = next_value(&args, &mut i, "--config", "a path argument");
                cli.config_path = Some(v.to_string());
            }
            "--preset" => {
                let v = next_value(&args, &mut i, "--preset", "a name argument");
                cli.preset = Some(v.to_string());
            }
            "--city" => {
                cli.city = next_value(&args, &mut i, "--city", "a city name").into();
            }
            "--outage" => {
                let v = next_value(&args, &mut i, "--outage", "an hours argument");
                cli.outage_hours = parse_f64(v, "--outage");
            }
            "--inverter" => {
                let v = next_value(&args, &mut i, "--inverter", "a type argument");
                cli.inverter_type = InverterType::parse(v).unwrap_or_else(|e| fail(&e));
            }
            "--roof-height" => {
                let v = next_value(&args, &mut i, "--roof-height", "a height in meters");
                cli.roof_height_m = parse_f64(v, "--roof-height");
            }
            "--load" => {
                let v = next_value(&args, &mut i, "--load", "a <kind>=<qty> argument");
                let (kind, qty) = parse_load(v).unwrap_or_else(|e| fail(&e));
                cli.load.set(kind, qty);
            }
            "--cost-out" => {
                let v = next_value(&args, &mut i, "--cost-out", "a path argument");
                cli.cost_out = Some(v.to_string());
            }
            "--list-cities" => {
                cli.list_cities = true;
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                let v = next_value(&args, &mut i, "--port", "a u16 argument");
                cli.port = v
                    .parse::<u16>()
                    .unwrap_or_else(|_| fail(&format!("--port value \"{v}\" is not a valid u16")));
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.config_path.is_some() && cli.preset.is_some() {
        fail("--config and --preset are mutually exclusive; choose one source");
    }

    cli
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();

    // Load reference data: --config takes priority, then --preset, then the built-in data
    let config = if let Some(ref path) = cli.config_path {
        ReferenceConfig::from_toml_file(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("{e}");
            process::exit(1);
        })
    } else if let Some(ref name) = cli.preset {
        ReferenceConfig::from_preset(name).unwrap_or_else(|e| {
            eprintln!("{e}");
            process::exit(1);
        })
    } else {
        ReferenceConfig::reference()
    };

    let reference = ReferenceData::from_config(&config).unwrap_or_else(|errors| {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    });

    if cli.list_cities {
        for name in reference.city_names() {
            let c = reference.city_profile(name);
            println!(
                "{name:<14} tariff={:.2} export={:.2} irradiance={:.1}",
                c.grid_tariff, c.export_rate, c.irradiance
            );
        }
        return;
    }

    let estimator = Estimator::new(reference);
    let site = SiteInput {
        city: cli.city,
        outage_hours_per_week: cli.outage_hours,
        inverter_type: cli.inverter_type,
        roof_height_m: cli.roof_height_m,
    };

    let estimate = estimator
        .estimate(&cli.load, &site)
        .unwrap_or_else(|e| fail(&e.to_string()));
    println!("{estimate}");

    if let Some(ref path) = cli.cost_out {
        if let Err(e) = export_cost_csv(&estimate, Path::new(path)) {
            fail(&format!("failed to write CSV: {e}"));
        }
        eprintln!("Cost breakdown written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(solar_sizer::api::AppState { estimator });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new()
            .unwrap_or_else(|e| fail(&format!("failed to create tokio runtime: {e}")));
        if let Err(e) = rt.block_on(solar_sizer::api::serve(state, addr)) {
            fail(&format!("server error: {e}"));
        }
    }
}
