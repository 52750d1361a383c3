use crate::error::{CheckError, ErrorContext};
use colored::Colorize;

pub fn format_error_chain(error: &CheckError) -> String {
    ErrorContext::new(error).to_string()
}

/// Format an error for the terminal, optionally colored.
pub fn format_error_with_color(error: &CheckError, use_color: bool) -> String {
    let context = ErrorContext::new(error);
    let mut output = String::new();

    let header = format!("Error [{}]:", error.stage());
    if use_color {
        output.push_str(&format!("{} {error}\n", header.red().bold()));
    } else {
        output.push_str(&format!("{header} {error}\n"));
    }

    if let Some(details) = &context.details {
        output.push_str(&format!("\n{details}\n"));
    }

    if let Some(suggestion) = &context.suggestion {
        let label = "Suggestion:";
        if use_color {
            output.push_str(&format!("\n{}\n", label.yellow().bold()));
        } else {
            output.push_str(&format!("\n{label}\n"));
        }
        for line in suggestion.lines().filter(|l| !l.trim().is_empty()) {
            if use_color {
                output.push_str(&format!("{}\n", format!("• {line}").cyan()));
            } else {
                output.push_str(&format!("• {line}\n"));
            }
        }
    }

    output
}
