//! Pipeline configuration and process setup.

use adreel_synthesis::SynthesisConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Brand identity injected into generation instructions.
#[derive(Debug, Clone)]
pub struct BrandProfile {
    pub name: String,
    pub tagline: String,
}

impl Default for BrandProfile {
    fn default() -> Self {
        Self {
            name: "Poppat Jamals".to_string(),
            tagline: "Premium homeware retailer".to_string(),
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub brand: BrandProfile,
    pub synthesis: SynthesisConfig,
}

impl PipelineConfig {
    /// Create config from environment variables (a `.env` file is
    /// honored when present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = BrandProfile::default();
        Self {
            brand: BrandProfile {
                name: std::env::var("ADREEL_BRAND").unwrap_or(defaults.name),
                tagline: std::env::var("ADREEL_BRAND_TAGLINE").unwrap_or(defaults.tagline),
            },
            synthesis: SynthesisConfig::from_env(),
        }
    }
}

/// Initialize tracing with colored output for dev, JSON for production.
pub fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("adreel=info".parse().expect("static directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true))
            .with(env_filter)
            .init();
    }
}
