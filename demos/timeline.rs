//! Timeline Example
//!
//! Prints the customer-facing timeline for a booking, and the internal print steps when a print
//! order exists.
//!
//! Use `-f` to load a fixture set by name
//! Use `-b` to pick a booking by code (defaults to every booking in the set)

use std::io::{self, Write};

use anyhow::Result;

use clap::Parser;
use studio_lifecycle::{
    booking::Booking,
    fixtures::Fixture,
    utils::{DemoArgs, init_logging},
};

/// Timeline Example
pub fn main() -> Result<()> {
    let args = DemoArgs::parse();

    init_logging(&args.log_level, args.log_format)?;

    let fixture = Fixture::from_set(&args.fixture)?;

    let bookings: Vec<&Booking<'_>> = match args.booking.as_deref() {
        Some(code) => vec![fixture.booking(code)?],
        None => fixture.bookings().iter().collect(),
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    for booking in bookings {
        writeln!(
            handle,
            "{} · {} · {}",
            booking.code(),
            booking.client_name(),
            booking.status().label()
        )?;

        booking.timeline().write_to(&mut handle)?;

        if let Some(order) = booking.print_order() {
            writeln!(handle, "Print order (internal):")?;

            for step in order.internal_steps() {
                writeln!(handle, "  [{:>9}] {}", step.state.as_str(), step.status.label())?;
            }
        }

        writeln!(handle)?;
    }

    Ok(())
}
