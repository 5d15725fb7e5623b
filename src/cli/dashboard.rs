use ansi_term::Colour;
use anyhow::Result;
use clap::Parser;

use crate::store::{
    aggregate::sum_for_day, entities::ActivityKind, kv::KeyValueStore, snapshot::ActivityStore,
};

use super::{format_value, parse_reference_day, DateStyle};

#[derive(Debug, Parser)]
pub struct DashboardCommand {
    #[arg(
        short,
        long = "date",
        help = "Day to summarize. Examples are \"yesterday\", \"15/03/2025\""
    )]
    date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

/// Command to process `dashboard` command. Prints the summed total of every
/// activity kind for one calendar day.
pub async fn process_dashboard_command(
    store: &ActivityStore<impl KeyValueStore>,
    DashboardCommand { date, date_style }: DashboardCommand,
) -> Result<()> {
    let day = parse_reference_day(date, date_style)?;
    let records = store.load().await.into_records();

    println!(
        "{}",
        Colour::White
            .bold()
            .paint(day.format("%A, %B %e %Y").to_string())
    );
    for kind in ActivityKind::ALL {
        let total = sum_for_day(&records, kind, day);
        println!(
            "{}\t{} {}",
            kind_colour(kind).paint(kind.label()),
            format_value(total),
            kind.unit()
        );
    }
    Ok(())
}

fn kind_colour(kind: ActivityKind) -> Colour {
    match kind {
        ActivityKind::Water => Colour::Cyan,
        ActivityKind::Steps => Colour::Yellow,
        ActivityKind::Sleep => Colour::Purple,
    }
}
