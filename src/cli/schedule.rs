// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Schedule command - compile a schedule expression

use chrono::{DateTime, Utc};
use colored::Colorize;
use miette::Result;

use crate::schedule;

/// Run the schedule command
pub async fn run(
    expression: String,
    start_time: Option<DateTime<Utc>>,
    time_zone: String,
    verbose: bool,
) -> Result<()> {
    let start_time = start_time.unwrap_or_else(Utc::now);
    let recurrence =
        schedule::compile(&expression, start_time, &time_zone).map_err(super::with_suggestion)?;

    if verbose {
        eprintln!(
            "{} {} → {}",
            "✓".green(),
            expression.cyan(),
            recurrence.describe()
        );
    }

    let json = serde_json::to_string_pretty(&recurrence)
        .map_err(|e| miette::miette!("Failed to serialize recurrence: {}", e))?;
    println!("{}", json);

    Ok(())
}
