use crate::cli::args::{CliArgs, Command, ListArgs};

fn validate_list(list: &ListArgs) -> Result<(), String> {
    if list.page == Some(0) {
        return Err("invalid --page, pages start at 1".to_string());
    }
    if list.per_page == Some(0) {
        return Err("invalid --per-page, expected positive integer".to_string());
    }
    Ok(())
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive number of seconds".to_string());
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        crate::output::OutputFormat::parse(raw)
            .ok_or_else(|| format!("invalid --output-format '{raw}', expected text, json or html"))?;
    }
    if let Some(raw) = args.date_format.as_deref() {
        crate::utils::validate_date_format(raw)
            .map_err(|e| format!("invalid --date-format '{raw}': {e}"))?;
    }
    if let Some(symbol) = args.currency_symbol.as_deref() {
        if symbol.chars().any(char::is_control) {
            return Err("invalid --currency, control characters are not allowed".to_string());
        }
    }
    match args.command.as_ref() {
        Some(Command::Drivers { list, envelope }) => {
            validate_list(list)?;
            if let Some(raw) = envelope.as_deref() {
                crate::fetcher::Envelope::parse(raw)
                    .ok_or_else(|| format!("invalid --envelope '{raw}', expected data or bare"))?;
            }
        }
        Some(Command::Trips { list }) | Some(Command::NewDrivers { list }) => validate_list(list)?,
        Some(Command::Driver { id }) => {
            if id.trim().is_empty() {
                return Err("driver id must not be empty".to_string());
            }
        }
        Some(Command::UpdateDriver { id, per_page, .. })
        | Some(Command::DeleteDriver { id, per_page, .. }) => {
            if id.trim().is_empty() {
                return Err("driver id must not be empty".to_string());
            }
            if *per_page == Some(0) {
                return Err("invalid --per-page, expected positive integer".to_string());
            }
        }
        Some(Command::Dashboard) | None => {}
    }
    Ok(())
}
