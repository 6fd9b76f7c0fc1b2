use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};

use crate::models::smart_heating::{EfficiencyPeriod, HeatingType, HvacMode, PresetMode};

#[derive(Debug, Parser)]
#[command(name = "smart-heating-dash", version, about = "Terminal dashboard for the smart_heating add-on")]
pub struct Cli {
    /// Load environment variables from this file instead of `./.env`.
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every area card once.
    Areas {
        #[arg(long)]
        all: bool,
    },
    /// Keep the dashboard up to date from the push feed (or by polling).
    Watch {
        #[arg(long)]
        poll: bool,
        #[arg(long)]
        all: bool,
    },
    /// Interactive session: drag, commit and tune presets from stdin.
    Console {
        #[arg(long)]
        all: bool,
    },
    /// Render synthetic areas without a backend.
    Demo {
        #[arg(long, default_value_t = 4)]
        areas: usize,
        #[arg(long, default_value_t = 5)]
        ticks: u32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    SetTemp {
        area: String,
        temperature: f64,
    },
    Boost {
        area: String,
        #[arg(long)]
        temperature: f64,
        /// Minutes.
        #[arg(long, default_value_t = 60)]
        duration: u32,
    },
    CancelBoost {
        area: String,
    },
    Override {
        area: String,
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },
    Hvac {
        area: String,
        mode: HvacMode,
    },
    Preset {
        area: String,
        mode: PresetMode,
    },
    HeatingType {
        area: String,
        heating_type: HeatingType,
        #[arg(long)]
        overhead: Option<f64>,
    },
    Enable {
        area: String,
    },
    Disable {
        area: String,
    },
    Hide {
        area: String,
    },
    Unhide {
        area: String,
    },
    CopySchedule {
        source: String,
        target: String,
        #[arg(long, value_delimiter = ',')]
        source_days: Option<Vec<String>>,
        #[arg(long, value_delimiter = ',')]
        target_days: Option<Vec<String>>,
    },
    Devices,
    Efficiency {
        /// Omit for the all-areas summary.
        area: Option<String>,
        #[arg(long)]
        period: Option<EfficiencyPeriod>,
    },
    History {
        area: String,
        #[arg(long)]
        hours: Option<u32>,
    },
    Metrics {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    Config,
    Export {
        file: PathBuf,
    },
    Import {
        file: PathBuf,
        #[arg(long)]
        validate_only: bool,
        #[arg(long)]
        no_backup: bool,
    },
    Backups,
    Restore {
        filename: String,
    },
    Safety,
    Users,
    Vacation {
        #[command(subcommand)]
        action: VacationAction,
    },
    Opentherm {
        #[command(subcommand)]
        action: OpenThermAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum VacationAction {
    Status,
    Enable {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long, default_value = "away")]
        preset: PresetMode,
    },
    Disable,
}

#[derive(Debug, Subcommand)]
pub enum OpenThermAction {
    Logs {
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    Capabilities {
        #[arg(long)]
        discover: bool,
    },
    Gateways,
    Calibrate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_copy_schedule_days() {
        let cli = Cli::try_parse_from([
            "smart-heating-dash",
            "copy-schedule",
            "a1",
            "a2",
            "--source-days",
            "mon,tue",
        ])
        .unwrap();
        match cli.command {
            Command::CopySchedule {
                source_days,
                target_days,
                ..
            } => {
                assert_eq!(source_days, Some(vec!["mon".to_string(), "tue".to_string()]));
                assert_eq!(target_days, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn parses_typed_arguments() {
        let cli = Cli::try_parse_from(["smart-heating-dash", "heating-type", "bath", "floor_heating", "--overhead", "42"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::HeatingType {
                heating_type: HeatingType::FloorHeating,
                overhead: Some(o),
                ..
            } if o == 42.0
        ));
        assert!(Cli::try_parse_from(["smart-heating-dash", "preset", "bath", "party"]).is_err());
    }
}
