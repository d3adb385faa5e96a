//! CLI commands for reports

use clap::Subcommand;

use crate::clock::{Clock, SystemClock};
use crate::config::settings::Settings;
use crate::display::report::format_chart_bars;
use crate::error::{ParcelaError, ParcelaResult};
use crate::models::{DateRange, MonthPeriod, OwnerId};
use crate::reports::{DashboardReport, GroupBy, MonthlyChart, ProjectionReport, ReportSummary};
use crate::storage::Storage;

use super::parse_range;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Balances, card statements, period totals and recent transactions
    Dashboard {
        /// Start date (YYYY-MM-DD); defaults to the current month
        #[arg(short, long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,
    },

    /// Projected account balance for the coming months
    #[command(alias = "projection")]
    Projections {
        /// Number of months to project
        #[arg(short, long)]
        months: Option<u32>,
    },

    /// Income and expense totals for a date range
    Summary {
        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,
        /// Month to report on (YYYY-MM), instead of start/end
        #[arg(short, long, conflicts_with_all = ["start", "end"])]
        period: Option<String>,
        /// Group by category or month
        #[arg(short, long, default_value = "category")]
        group_by: String,
    },

    /// Income and expenses over the last six months
    Chart {
        /// Draw bars instead of a table
        #[arg(short, long)]
        bars: bool,
    },
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    owner: OwnerId,
    cmd: ReportCommands,
) -> ParcelaResult<()> {
    let clock = SystemClock;
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ReportCommands::Dashboard { start, end } => {
            let range = parse_range(start.as_deref(), end.as_deref())?;
            let report = DashboardReport::generate_with_limit(
                storage,
                &clock,
                owner,
                range,
                settings.recent_transactions,
            )?;
            print!("{}", report.format_terminal(currency));
        }

        ReportCommands::Projections { months } => {
            let months = months.unwrap_or(settings.projection_months);
            let report = ProjectionReport::generate(storage, &clock, owner, months)?;
            print!("{}", report.format_terminal(currency));
        }

        ReportCommands::Summary {
            start,
            end,
            period,
            group_by,
        } => {
            let range = match period {
                Some(period) => {
                    let month: MonthPeriod = period.parse().map_err(|e| {
                        ParcelaError::validation(
                            "period",
                            format!("Invalid period '{}': {}. Use YYYY-MM (e.g., 2024-01)", period, e),
                        )
                    })?;
                    DateRange::month(month)
                }
                None => parse_range(start.as_deref(), end.as_deref())?
                    .unwrap_or_else(|| DateRange::month(MonthPeriod::of(clock.today()))),
            };
            let group_by = GroupBy::parse(&group_by)?;

            let report = ReportSummary::generate(storage, owner, range, group_by)?;
            print!("{}", report.format_terminal(currency));
        }

        ReportCommands::Chart { bars } => {
            let chart = MonthlyChart::generate(storage, &clock, owner)?;
            if bars {
                print!("{}", format_chart_bars(&chart, currency));
            } else {
                print!("{}", chart.format_terminal(currency));
            }
        }
    }

    Ok(())
}
