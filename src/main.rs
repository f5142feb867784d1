use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use pvfirst_accountant::{accountant, cli, config, location, report, simulation, telemetry, weather};

use accountant::{EnergyAccountant, ModelParameters, Readings};
use cli::{Cli, Command, ProfileArgs, ProfileKind, RunArgs};
use config::Config;
use location::{GeoLocation, IpApiClient, LocationProvider, StaticLocation};
use report::{profile_rows, CsvReport, CsvRow, IntervalSummary, TotalsSummary};
use simulation::ClearSkyModel;
use telemetry::init_tracing;
use tracing::{info, warn};
use weather::{fetch_or_neutral, NeutralWeather, OpenMeteoClient, WeatherProvider};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let cfg = Config::load(cli.config.as_deref())?;
    init_tracing(cfg.telemetry.json);

    match cli.command {
        Command::Run(args) => run_live(&cfg, args).await,
        Command::Profile(args) => run_profile(&cfg, args),
    }
}

async fn run_live(cfg: &Config, args: RunArgs) -> Result<()> {
    let offline = args.offline || cfg.providers.offline;
    let location = resolve_location(cfg, offline).await;
    println!("Location: {location}");

    let now = Local::now().naive_local();
    let irradiance = ClearSkyModel::new(location.latitude).irradiance_at(now);
    println!("Local time: {}", now.format("%H:%M"));
    println!("Day of year: {}", now.format("%j"));

    let weather_provider: Box<dyn WeatherProvider> = if offline {
        Box::new(NeutralWeather)
    } else {
        Box::new(OpenMeteoClient::new(
            cfg.providers.weather_url.clone(),
            cfg.providers.http_timeout(),
        ))
    };
    let observation = fetch_or_neutral(weather_provider.as_ref(), &location).await;

    let readings = Readings::new(irradiance, cfg.workload_power()).with_weather(observation);
    let params = cfg.model_parameters();

    let mut accountant = EnergyAccountant::new(params).context("invalid model parameters")?;
    let record = match (args.duration, params.fixed_step_seconds) {
        (Some(duration), _) => {
            println!("Simulating {} seconds...", duration.as_secs_f64());
            accountant.update(&readings.over(duration.as_secs_f64()))?
        }
        (None, Some(step)) => {
            println!("Simulating one {step} second step...");
            accountant.advance(readings)?
        }
        (None, None) => bail!("no --duration given and accounting.step_seconds is not configured"),
    };

    let totals = accountant.statistics();
    let Some(record) = record else {
        warn!("zero-length interval, nothing accounted");
        println!("{}", TotalsSummary(&totals));
        return Ok(());
    };

    println!();
    println!("{}", IntervalSummary::new(&record, &totals));
    info!(
        pv_kwh = totals.pv_energy_kwh,
        grid_kwh = totals.grid_energy_kwh,
        co2_g = totals.co2_grams,
        "live interval accounted"
    );

    if let Some(report) = csv_report(cfg, args.csv) {
        report.append(&CsvRow::new(now, &record, &totals))?;
        info!(path = %report.path().display(), "interval appended");
    }
    Ok(())
}

async fn resolve_location(cfg: &Config, offline: bool) -> GeoLocation {
    let fallback = cfg.site.location();
    let provider: Box<dyn LocationProvider> = if offline {
        Box::new(StaticLocation(fallback.clone()))
    } else {
        Box::new(IpApiClient::new(
            cfg.providers.geolocation_url.clone(),
            cfg.providers.http_timeout(),
        ))
    };

    match provider.locate().await {
        Ok(location) => location,
        Err(error) => {
            warn!(%error, fallback = %fallback, "geolocation failed, using configured site");
            fallback
        }
    }
}

fn run_profile(cfg: &Config, args: ProfileArgs) -> Result<()> {
    let params: ModelParameters = cfg.model_parameters();

    let (start, run) = match args.kind {
        ProfileKind::Synthetic => {
            let start = Local::now().naive_local();
            (start, simulation::run_synthetic_profile(params)?)
        }
        ProfileKind::ClearSky => {
            let date = args.date.unwrap_or_else(|| Local::now().date_naive());
            let start = date.and_time(chrono::NaiveTime::MIN);
            let run = simulation::simulate_clear_sky_day(
                params,
                cfg.site.latitude,
                start,
                args.step_minutes,
                cfg.workload_power(),
            )?;
            (start, run)
        }
    };

    if args.verbose {
        for step in &run.steps {
            println!(
                "t = {:>8.0} s | irradiance = {} | pv = {} | grid = {:.4} kWh",
                step.time_seconds,
                step.irradiance,
                step.record.map(|r| r.pv_power).unwrap_or_default(),
                step.totals.grid_energy_kwh
            );
        }
        println!();
    }
    println!("{}", TotalsSummary(&run.totals));

    if let Some(report) = csv_report(cfg, None) {
        report.append_all(&profile_rows(start, &run))?;
        info!(path = %report.path().display(), rows = run.steps.len(), "profile appended");
    }
    Ok(())
}

fn csv_report(cfg: &Config, override_path: Option<std::path::PathBuf>) -> Option<CsvReport> {
    override_path
        .or_else(|| cfg.output.csv_path.clone())
        .map(|path| CsvReport::new(path, cfg.output.delimiter))
}
