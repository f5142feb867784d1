use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use validator::Validate;

use crate::accountant::ModelParameters;
use crate::domain::Power;
use crate::energy::PvArray;
use crate::location::{GeoLocation, DEFAULT_GEOLOCATION_URL};
use crate::report::Delimiter;
use crate::weather::open_meteo::DEFAULT_BASE_URL;
use crate::weather::DeratingCoefficients;

const DEFAULT_CONFIG_FILE: &str = "config/default.toml";
const ENV_PREFIX: &str = "PVF__";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    #[validate(nested)]
    pub pv: PvConfig,
    #[validate(nested)]
    pub workload: WorkloadConfig,
    #[validate(nested)]
    pub grid: GridConfig,
    #[validate(nested)]
    pub accounting: AccountingConfig,
    #[validate(nested)]
    pub site: SiteConfig,
    #[validate(nested)]
    pub providers: ProvidersConfig,
    pub output: OutputConfig,
    pub telemetry: TelemetryConfig,
    /// Weather derating coefficients, checked when parameters are built
    pub derating: DeratingCoefficients,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PvConfig {
    #[validate(range(min = 0.0))]
    pub area_m2: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub module_efficiency: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub system_efficiency: f64,
}

impl Default for PvConfig {
    fn default() -> Self {
        Self {
            area_m2: 10.0,
            module_efficiency: 0.20,
            system_efficiency: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WorkloadConfig {
    #[validate(range(min = 0.0))]
    pub power_watts: f64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            power_watts: 2000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GridConfig {
    #[validate(range(min = 0.0))]
    pub carbon_intensity_g_per_kwh: f64,
    #[validate(range(min = 0.0))]
    pub water_intensity_l_per_kwh: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            carbon_intensity_g_per_kwh: 100.0,
            water_intensity_l_per_kwh: 2.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AccountingConfig {
    /// Fixed discretisation step; unset means elapsed time is given per run
    #[validate(range(exclusive_min = 0.0))]
    pub step_seconds: Option<f64>,
}

/// Fallback location used when geolocation is unavailable or disabled
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SiteConfig {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    pub name: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            name: None,
        }
    }
}

impl SiteConfig {
    pub fn location(&self) -> GeoLocation {
        GeoLocation::new(self.latitude, self.longitude, self.name.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProvidersConfig {
    #[validate(url)]
    pub geolocation_url: String,
    #[validate(url)]
    pub weather_url: String,
    #[validate(range(min = 1, max = 300))]
    pub http_timeout_seconds: u64,
    /// Skip all network lookups
    pub offline: bool,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            geolocation_url: DEFAULT_GEOLOCATION_URL.to_string(),
            weather_url: DEFAULT_BASE_URL.to_string(),
            http_timeout_seconds: 10,
            offline: false,
        }
    }
}

impl ProvidersConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub csv_path: Option<PathBuf>,
    #[serde(default)]
    pub delimiter: Delimiter,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub json: bool,
}

impl Config {
    /// Defaults, then `config/default.toml`, then `extra_file`, then `PVF__*` env vars
    pub fn load(extra_file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(DEFAULT_CONFIG_FILE));
        if let Some(path) = extra_file {
            figment = figment.merge(Toml::file(path));
        }
        let figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract().context("failed to read configuration")?;
        cfg.validate().context("invalid configuration")?;
        Ok(cfg)
    }

    pub fn model_parameters(&self) -> ModelParameters {
        ModelParameters {
            pv: PvArray {
                panel_area_m2: self.pv.area_m2,
                module_efficiency: self.pv.module_efficiency,
                system_efficiency: self.pv.system_efficiency,
            },
            grid_carbon_intensity_g_per_kwh: self.grid.carbon_intensity_g_per_kwh,
            water_intensity_l_per_kwh: self.grid.water_intensity_l_per_kwh,
            derating: self.derating,
            fixed_step_seconds: self.accounting.step_seconds,
        }
    }

    pub fn workload_power(&self) -> Power {
        Power::watts(self.workload.power_watts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
    }

    #[test]
    fn test_defaults_are_valid() {
        let cfg = Config::from_figment(defaults()).unwrap();
        assert_eq!(cfg.pv.area_m2, 10.0);
        assert_eq!(cfg.workload.power_watts, 2000.0);
        assert_eq!(cfg.output.delimiter, Delimiter::Semicolon);
        assert!(cfg.model_parameters().validate().is_ok());
    }

    #[test]
    fn test_model_parameters_mapping() {
        let mut cfg = Config::default();
        cfg.pv.module_efficiency = 0.18;
        cfg.grid.carbon_intensity_g_per_kwh = 400.0;
        cfg.accounting.step_seconds = Some(900.0);

        let params = cfg.model_parameters();
        assert_eq!(params.pv.module_efficiency, 0.18);
        assert_eq!(params.grid_carbon_intensity_g_per_kwh, 400.0);
        assert_eq!(params.fixed_step_seconds, Some(900.0));
        assert_eq!(params.derating, DeratingCoefficients::default());
    }

    #[test]
    fn test_negative_derating_caught_by_model() {
        let mut cfg = Config::default();
        cfg.derating.rain_factor = -0.5;
        assert!(cfg.model_parameters().validate().is_err());
    }

    #[test]
    fn test_out_of_range_efficiency_rejected() {
        let figment = defaults().merge(Serialized::default("pv.module_efficiency", 1.5));
        assert!(Config::from_figment(figment).is_err());
    }

    #[test]
    fn test_zero_step_rejected() {
        let figment = defaults().merge(Serialized::default("accounting.step_seconds", 0.0));
        assert!(Config::from_figment(figment).is_err());
    }

    #[test]
    fn test_toml_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "site.toml",
                r#"
                [site]
                latitude = -23.55
                longitude = -46.63
                name = "Sao Paulo"

                [output]
                csv_path = "history.csv"
                delimiter = "comma"
                "#,
            )?;
            jail.set_env("PVF__GRID__CARBON_INTENSITY_G_PER_KWH", "250");
            jail.set_env("PVF__PROVIDERS__OFFLINE", "true");

            let cfg = Config::load(Some(Path::new("site.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(cfg.site.latitude, -23.55);
            assert_eq!(cfg.site.location().name.as_deref(), Some("Sao Paulo"));
            assert_eq!(cfg.output.delimiter, Delimiter::Comma);
            assert_eq!(cfg.output.csv_path, Some(PathBuf::from("history.csv")));
            assert_eq!(cfg.grid.carbon_intensity_g_per_kwh, 250.0);
            assert!(cfg.providers.offline);
            Ok(())
        });
    }
}
