//! Quote Example
//!
//! Prints the receipt for a booking from a fixture set, plus the statuses each role may pick.
//!
//! Use `-f` to load a fixture set by name
//! Use `-b` to pick a booking by code (defaults to the first booking in the set)

use std::io::{self, Write};

use anyhow::{Result, anyhow};

use clap::Parser;
use studio_lifecycle::{
    booking::Booking,
    fixtures::Fixture,
    receipt::Receipt,
    roles::ActorRole,
    utils::{DemoArgs, init_logging},
};

/// Quote Example
pub fn main() -> Result<()> {
    let args = DemoArgs::parse();

    init_logging(&args.log_level, args.log_format)?;

    let fixture = Fixture::from_set(&args.fixture)?;

    let booking: &Booking<'_> = match args.booking.as_deref() {
        Some(code) => fixture.booking(code)?,
        None => fixture
            .bookings()
            .first()
            .ok_or_else(|| anyhow!("fixture set {} has no bookings", args.fixture))?,
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Receipt::from_booking(booking)?.write_to(&mut handle)?;

    writeln!(handle)?;

    for role in ActorRole::ALL {
        let options: Vec<_> = booking
            .available_options(role)
            .iter()
            .map(ToString::to_string)
            .collect();

        writeln!(handle, "{:>16}: {}", role.to_string(), options.join(", "))?;
    }

    Ok(())
}
