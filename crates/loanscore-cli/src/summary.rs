use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use loanscore_cli::render::{group_thousands, summary_line};
use loanscore_client::{EvaluationReport, ModelKind, UserProfile};
use loanscore_core::{BatchReport, ContactLog, result_text};
use loanscore_model::{FeatureVector, FieldSpec, RiskLabel, RowOutcome, ValidationIssue};
use loanscore_standards::PreprocessConfig;
use loanscore_transform::EncodingDefault;

pub fn print_fields(config: &PreprocessConfig) {
    println!("Preprocessing: {}", config.describe());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Field"),
        header_cell("Kind"),
        header_cell("Encoding"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for field in FieldSpec::ALL {
        let (kind, encoding) = if field.is_categorical() {
            let labels = config
                .category(field)
                .map(|categories| {
                    categories
                        .labels()
                        .filter_map(|label| {
                            categories.lookup(label).map(|code| format!("{label}={code}"))
                        })
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_else(|| "-".to_string());
            ("categorical", labels)
        } else {
            let params = config
                .scaler(field)
                .map(|p| format!("mean {:.4}, scale {:.4}", p.mean, p.scale))
                .unwrap_or_else(|| "raw".to_string());
            ("numeric", params)
        };
        table.add_row(vec![
            Cell::new(field.index()),
            Cell::new(field.name()).add_attribute(Attribute::Bold),
            Cell::new(kind),
            Cell::new(encoding),
        ]);
    }
    println!("{table}");
}

pub fn print_vector(vector: &FeatureVector, defaults: &[(FieldSpec, EncodingDefault)]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Field"),
        header_cell("Value"),
        header_cell("Note"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (field, value) in vector.iter() {
        let note = defaults
            .iter()
            .find(|(defaulted, _)| *defaulted == field)
            .map_or_else(|| dim_cell("-"), |(_, reason)| {
                Cell::new(reason.to_string()).fg(Color::Yellow)
            });
        table.add_row(vec![
            Cell::new(field.index()),
            Cell::new(field.name()),
            Cell::new(format!("{value:.6}")),
            note,
        ]);
    }
    println!("{table}");
}

pub fn print_issues(issues: &[ValidationIssue]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Value"),
        header_cell("Problem"),
    ]);
    apply_table_style(&mut table);
    for issue in issues {
        table.add_row(vec![
            Cell::new(issue.field.name()).fg(Color::Red),
            Cell::new(&issue.value),
            Cell::new(&issue.message),
        ]);
    }
    eprintln!("{table}");
}

pub fn print_batch(report: &BatchReport, contacts: &ContactLog) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Name"),
        header_cell("Income"),
        header_cell("Credit score"),
        header_cell("Result"),
        header_cell("Contact"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Center);
    for row in &report.rows {
        let income = row
            .income
            .as_deref()
            .map_or_else(|| dim_cell("-"), |income| Cell::new(group_thousands(income)));
        let score = row
            .credit_score
            .as_deref()
            .map_or_else(|| dim_cell("-"), Cell::new);
        let contact = contacts
            .status(row.index)
            .map_or_else(|| dim_cell("-"), |status| Cell::new(status.to_string()));
        table.add_row(vec![
            Cell::new(row.index),
            Cell::new(&row.display_name).add_attribute(Attribute::Bold),
            income,
            score,
            outcome_cell(&row.outcome),
            contact,
        ]);
    }
    println!("{table}");
    println!("{}", summary_line(&report.summary()));
}

pub fn print_evaluation(report: &EvaluationReport) {
    let best = report.best_model();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Model"),
        header_cell("Accuracy"),
        header_cell("Precision"),
        header_cell("Recall"),
        header_cell("F1"),
        header_cell("Time"),
    ]);
    apply_table_style(&mut table);
    for column in 1..=5 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for kind in ModelKind::ALL {
        let name = if kind == best {
            Cell::new(format!("{kind} *"))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(kind.label())
        };
        let row = match report.metrics(kind) {
            Some(metrics) if metrics.is_available() => vec![
                name,
                Cell::new(format!("{:.1}%", metrics.accuracy_percent())),
                Cell::new(format!("{:.2}", metrics.precision)),
                Cell::new(format!("{:.2}", metrics.recall)),
                Cell::new(format!("{:.2}", metrics.f1)),
                Cell::new(format!("{}", metrics.time.round())),
            ],
            Some(metrics) => vec![
                name,
                Cell::new(metrics.error.clone().unwrap_or_default()).fg(Color::Red),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
            ],
            None => vec![
                name,
                dim_cell("missing"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
            ],
        };
        table.add_row(row);
    }
    println!("{table}");
    println!("Best model: {best}");
}

pub fn print_profile(profile: &UserProfile) {
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.add_row(vec![header_cell("Username"), Cell::new(&profile.username)]);
    table.add_row(vec![header_cell("Email"), Cell::new(&profile.email)]);
    table.add_row(vec![
        header_cell("Full name"),
        profile
            .full_name
            .as_deref()
            .map_or_else(|| dim_cell("-"), Cell::new),
    ]);
    table.add_row(vec![
        header_cell("Role"),
        profile.role.as_deref().map_or_else(|| dim_cell("-"), Cell::new),
    ]);
    table.add_row(vec![
        header_cell("Active"),
        Cell::new(if profile.is_active { "yes" } else { "no" }),
    ]);
    table.add_row(vec![
        header_cell("Created"),
        Cell::new(profile.created_at.format("%Y-%m-%d %H:%M").to_string()),
    ]);
    println!("{table}");
}

pub fn print_contacts(contacts: &ContactLog) {
    if contacts.is_empty() {
        println!("No contact statuses recorded.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Name"),
        header_cell("Status"),
        header_cell("Updated"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for annotation in contacts.iter() {
        table.add_row(vec![
            Cell::new(annotation.row),
            Cell::new(&annotation.name),
            Cell::new(annotation.status.to_string()),
            Cell::new(annotation.updated_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }
    println!("{table}");
}

fn outcome_cell(outcome: &RowOutcome) -> Cell {
    let text = result_text(outcome);
    match outcome {
        RowOutcome::Scored { result } => match result.label {
            RiskLabel::LowRisk => Cell::new(text)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            RiskLabel::HighRisk => Cell::new(text)
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
        },
        RowOutcome::Skipped { .. } | RowOutcome::AuthExpired => Cell::new(text).fg(Color::Red),
        RowOutcome::ApiErrored { .. } => Cell::new(text).fg(Color::Yellow),
        RowOutcome::Pending => dim_cell(text),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
