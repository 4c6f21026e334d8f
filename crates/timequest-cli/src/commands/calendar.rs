use chrono::NaiveDate;
use clap::Subcommand;
use timequest_core::{CalendarEvent, TaskCategory, CATALOG};

use super::{today, with_state, CliResult};

#[derive(Subcommand)]
pub enum CalendarAction {
    /// List events (all dates, or one with --date)
    List {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
    /// Add an event
    Add {
        /// YYYY-MM-DD
        date: NaiveDate,
        /// e.g. "3:30 PM"
        time: String,
        title: String,
        /// school, fun or chore
        #[arg(long, default_value = "school")]
        category: TaskCategory,
    },
    /// Delete the n-th event (from 0) on a date
    Delete {
        date: NaiveDate,
        index: usize,
    },
}

pub fn run(action: CalendarAction) -> CliResult {
    with_state(|state, _, _| {
        let book = &mut state.session.calendar;
        match action {
            CalendarAction::List { date, json } => {
                if json {
                    match date {
                        Some(d) => println!("{}", serde_json::to_string_pretty(book.events_on(d))?),
                        None => println!("{}", serde_json::to_string_pretty(book)?),
                    }
                    return Ok(());
                }
                for (day, events) in book.iter().filter(|(d, _)| date.map_or(true, |want| **d == want)) {
                    println!("{day}");
                    for (i, event) in events.iter().enumerate() {
                        println!("  {i}  {:>8}  {} ({})", event.time, event.title, event.category);
                    }
                }
            }
            CalendarAction::Add { date, time, title, category } => {
                let pos = book.add_event(date, CalendarEvent::new(time, title, category))?;
                println!("added at position {pos} on {date}");
            }
            CalendarAction::Delete { date, index } => match book.delete_event(date, index) {
                Some(event) => println!("deleted {} on {date}", event.title),
                None => println!("nothing to delete"),
            },
        }
        Ok(())
    })
}

/// Coins, the next three things due and the lesson count.
pub fn dashboard() -> CliResult {
    with_state(|state, _, _| {
        let today = today();
        println!("Welcome back! You have {} coins.", state.session.coins.coins());
        println!();
        println!("Upcoming deadlines:");
        let upcoming = state.session.upcoming_deadlines(today);
        if upcoming.is_empty() {
            println!("  Nothing due. Enjoy your free time!");
        }
        for deadline in upcoming {
            println!("  {:<10} {}", deadline.due, deadline.task);
        }
        println!();
        println!("{} lessons to explore: run `timequest lesson list`.", CATALOG.len());
        Ok(())
    })
}
