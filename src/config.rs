//! Configuration and CLI argument handling

use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "sauna-bell")]
#[command(about = "A state-managed elapsed-time clock server with periodic rotation alarms")]
#[command(version = "1.1.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Alarm interval in minutes
    #[arg(short, long, default_value = "12", value_parser = clap::value_parser!(u32).range(1..=60))]
    pub interval: u32,

    /// Start with the interval alarm enabled
    #[arg(long)]
    pub alarm: bool,

    /// External command used to play the alarm sound
    #[arg(long, default_value = "aplay")]
    pub alarm_command: String,

    /// Sound file passed to the alarm command
    #[arg(long, default_value = "zen-bell.wav")]
    pub alarm_sound: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
