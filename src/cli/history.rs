use ansi_term::Colour;
use anyhow::Result;
use chrono::Local;
use clap::Parser;

use crate::store::{
    aggregate::trailing_day_sections, kv::KeyValueStore, snapshot::ActivityStore,
};

use super::{format_value, parse_reference_day, DateStyle};

#[derive(Debug, Parser)]
pub struct HistoryCommand {
    #[arg(long, default_value_t = 7, help = "Number of trailing days to include")]
    days: u32,
    #[arg(
        short,
        long = "date",
        help = "Last day of the range. Examples are \"yesterday\", \"15/03/2025\""
    )]
    date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

/// Command to process `history` command. Prints every entry of the trailing
/// days grouped per day, newest first. Days without entries are skipped.
pub async fn process_history_command(
    store: &ActivityStore<impl KeyValueStore>,
    HistoryCommand {
        days,
        date,
        date_style,
    }: HistoryCommand,
) -> Result<()> {
    let reference = parse_reference_day(date, date_style)?;
    let records = store.load().await.into_records();

    let sections = trailing_day_sections(&records, days, reference);
    if sections.is_empty() {
        println!("No activities logged in the last {days} days.");
        return Ok(());
    }

    for section in sections {
        println!(
            "{}",
            Colour::White
                .bold()
                .paint(section.day.format("%a %b %e %Y").to_string())
        );
        for item in section.items {
            println!(
                "{}\t{}\t{} {}\t{}",
                item.time.with_timezone(&Local).format("%H:%M:%S"),
                item.kind,
                format_value(item.value),
                item.kind.unit(),
                item.notes.as_deref().unwrap_or("")
            );
        }
        println!();
    }
    Ok(())
}
