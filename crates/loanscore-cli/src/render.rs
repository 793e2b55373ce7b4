//! Plain-text renderings shared by the commands.

use loanscore_core::BatchSummary;
use loanscore_model::ScoreResult;

/// One-line verdict for a scored record.
pub fn score_line(result: &ScoreResult) -> String {
    let mut line = format!("{} (prediction {})", result.label, result.label.code());
    if result.defaulted {
        line.push_str(" [no prediction in response, defaulted]");
    }
    line
}

/// One-paragraph batch summary.
pub fn summary_line(summary: &BatchSummary) -> String {
    let mut line = format!(
        "{} rows: {} scored ({} low risk, {} high risk), {} skipped, {} API errors, {} not processed",
        summary.total,
        summary.scored,
        summary.low_risk,
        summary.high_risk,
        summary.skipped,
        summary.api_errors,
        summary.pending,
    );
    if summary.defaulted > 0 {
        line.push_str(&format!(
            "\n{} scored rows had no prediction and defaulted to high risk",
            summary.defaulted
        ));
    }
    if summary.session_expired {
        line.push_str("\nSession expired during the run. Log in again and re-run the remaining rows.");
    }
    line
}

/// Group the integer part of a numeric string with commas.
///
/// Non-numeric text is returned unchanged.
pub fn group_thousands(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.parse::<f64>().is_err() {
        return text.to_string();
    }
    let (sign, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", trimmed),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };
    if !integer.bytes().all(|b| b.is_ascii_digit()) {
        return text.to_string();
    }
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}
