use clap::{ArgAction, Parser};
use weathr_core::{
    Config, Credential, ForecastClient, OutputFormat, ReqwestTransport, Settings, Transport, Units,
    WeathrError, render,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weathr",
    version,
    disable_version_flag = true,
    about = "A command-line tool that accepts a city name as an argument and returns the weather forecast for that city."
)]
pub struct Cli {
    /// City name. Default: London
    #[arg(short, long)]
    pub city: Option<String>,

    /// Units of measurement. Default: standard (Kelvin)
    #[arg(short, long, value_enum)]
    pub units: Option<Units>,

    /// Output format. Default: raw
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Forecast endpoint override.
    #[arg(long, hide = true)]
    pub endpoint: Option<String>,

    /// Log request details to stderr.
    #[arg(long)]
    pub verbose: bool,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: (),
}

impl Cli {
    /// Flags win over the settings file, which wins over built-in defaults.
    pub fn resolve(&self, file: Settings) -> Config {
        let flags = Settings {
            city: self.city.clone(),
            units: self.units,
            format: self.format,
            endpoint: self.endpoint.clone(),
            timeout_secs: self.timeout,
        };
        flags.or(file).into()
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.resolve(Settings::load()?);
        log::debug!("resolved {config:?}");

        let transport = ReqwestTransport::new(config.timeout)?;
        let text = forecast_text(&config, |name| std::env::var(name).ok(), transport).await?;
        println!("{text}");

        Ok(())
    }
}

/// Resolve the credential, fetch, and render. Nothing is requested unless a
/// credential is found.
async fn forecast_text<T, F>(
    config: &Config,
    lookup: F,
    transport: T,
) -> Result<String, WeathrError>
where
    T: Transport,
    F: FnOnce(&str) -> Option<String>,
{
    let credential = Credential::from_lookup(lookup)?;
    let client = ForecastClient::with_transport(credential, &config.endpoint, transport);
    let forecast = client.fetch(&config.city, config.units).await?;
    render(&forecast, config)
}
