#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas for the counting station.
//!
//! `Config` and its sub-structs are deserialized from TOML and validated.
//! Every section has sensible defaults so an empty file is a usable
//! simulated station.
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct StationCfg {
    /// Display name used in logs and exported rows.
    pub name: Option<String>,
    /// Default lot tag applied to a fresh session.
    pub lot: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DetectorCfg {
    /// Polling rate for the paced crossing feed (Hz).
    pub rate_hz: u32,
    /// Max wait per detector poll (ms).
    pub poll_timeout_ms: u64,
    /// Fraction of simulated crossings that are outbound, in [0.0, 1.0].
    pub out_ratio: f32,
    /// Optional RNG seed for a reproducible simulated crossing stream.
    pub seed: Option<u64>,
}

impl Default for DetectorCfg {
    fn default() -> Self {
        Self {
            rate_hz: 20,
            poll_timeout_ms: 150,
            out_ratio: 0.1,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WeightCfg {
    /// Lower bound of the simulated platform reading (kg).
    pub min_kg: f32,
    /// Upper bound of the simulated platform reading (kg).
    pub max_kg: f32,
    /// Max wait per weight sample (ms). Also accepts alias "sample_ms".
    #[serde(alias = "sample_ms")]
    pub sample_timeout_ms: u64,
    /// Optional RNG seed for reproducible simulated weights.
    pub seed: Option<u64>,
}

impl Default for WeightCfg {
    fn default() -> Self {
        Self {
            min_kg: 50.0,
            max_kg: 100.0,
            sample_timeout_ms: 500,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CaptureCfg {
    /// In automated runs, capture a partial every N applied crossings.
    pub partial_every: u32,
}

impl Default for CaptureCfg {
    fn default() -> Self {
        Self { partial_every: 6 }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ExportCfg {
    /// CSV file finalized-session summaries are appended to.
    pub history_file: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub station: StationCfg,
    pub detector: DetectorCfg,
    pub weight: WeightCfg,
    pub capture: CaptureCfg,
    pub logging: Logging,
    pub export: ExportCfg,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Detector
        if self.detector.rate_hz == 0 {
            eyre::bail!("detector.rate_hz must be > 0");
        }
        if self.detector.rate_hz > 10_000 {
            eyre::bail!("detector.rate_hz is unreasonably large (>10kHz)");
        }
        if self.detector.poll_timeout_ms == 0 {
            eyre::bail!("detector.poll_timeout_ms must be >= 1");
        }
        if !(0.0..=1.0).contains(&self.detector.out_ratio) {
            eyre::bail!("detector.out_ratio must be in [0.0, 1.0]");
        }

        // Weight
        if !self.weight.min_kg.is_finite() || self.weight.min_kg < 0.0 {
            eyre::bail!("weight.min_kg must be >= 0");
        }
        if !self.weight.max_kg.is_finite() || self.weight.max_kg <= self.weight.min_kg {
            eyre::bail!("weight.max_kg must be > weight.min_kg");
        }
        if self.weight.sample_timeout_ms == 0 {
            eyre::bail!("weight.sample_timeout_ms must be >= 1");
        }

        // Capture
        if self.capture.partial_every == 0 {
            eyre::bail!("capture.partial_every must be >= 1");
        }

        // Logging
        if let Some(rotation) = &self.logging.rotation
            && !matches!(rotation.as_str(), "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of: never, daily, hourly");
        }

        Ok(())
    }
}
