//! Output formatting for the CLI.

use anyhow::Result;
use blog_core::{Post, User};
use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;
use std::fmt::Write;
use uuid::Uuid;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// Print a value in the specified format.
pub fn print<T: Serialize + HumanDisplay>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => println!("{}", value.human_display()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}

/// Print a list of rows in the specified format.
pub fn print_table<T: Serialize + TableRow>(rows: &[T], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => println!("{}", render_table(rows)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(rows)?),
    }
    Ok(())
}

/// Print a success message.
pub fn print_success(message: &str, format: OutputFormat) -> Result<()> {
    #[derive(Serialize)]
    struct Status<'a> {
        status: &'static str,
        message: &'a str,
    }

    let status = Status {
        status: "ok",
        message,
    };

    match format {
        OutputFormat::Human => println!("{}", style(message).green()),
        OutputFormat::Json => println!("{}", serde_json::to_string(&status)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&status)?),
    }
    Ok(())
}

/// Trait for human-readable display.
pub trait HumanDisplay {
    fn human_display(&self) -> String;
}

/// A value shown as one line of a table.
pub trait TableRow {
    const HEADERS: &'static [&'static str];
    const EMPTY: &'static str;

    fn cells(&self) -> Vec<String>;
}

fn render_table<T: TableRow>(rows: &[T]) -> String {
    if rows.is_empty() {
        return T::EMPTY.to_string();
    }

    let cells: Vec<Vec<String>> = rows.iter().map(TableRow::cells).collect();

    // Last column is left unpadded.
    let mut widths: Vec<usize> = T::HEADERS.iter().map(|h| h.len()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = format_row(T::HEADERS.iter().map(ToString::to_string), &widths);
    let _ = writeln!(out, "{}", style(header).bold());
    let _ = writeln!(out, "{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len()));
    for row in cells {
        let _ = writeln!(out, "{}", format_row(row.into_iter(), &widths));
    }
    out.trim_end().to_string()
}

fn format_row(cells: impl Iterator<Item = String>, widths: &[usize]) -> String {
    let cells: Vec<String> = cells.collect();
    let last = cells.len().saturating_sub(1);
    cells
        .into_iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            if i == last {
                cell
            } else {
                format!("{cell:<width$}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn format_time(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// User as shown by the CLI. The password hash is never printed.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: chrono::NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            birth_date: user.birth_date,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl HumanDisplay for UserView {
    fn human_display(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "ID:        {}", self.id);
        let _ = writeln!(out, "Username:  {}", self.username);
        let name = format!("{} {}", self.first_name, self.last_name);
        if !name.trim().is_empty() {
            let _ = writeln!(out, "Name:      {}", name.trim());
        }
        let _ = writeln!(out, "Email:     {}", self.email);
        if self.birth_date != chrono::NaiveDate::default() {
            let _ = writeln!(out, "Born:      {}", self.birth_date);
        }
        let _ = writeln!(out, "Created:   {}", format_time(&self.created_at));
        let _ = write!(out, "Updated:   {}", format_time(&self.updated_at));

        out
    }
}

impl TableRow for UserView {
    const HEADERS: &'static [&'static str] = &["ID", "USERNAME", "EMAIL", "CREATED"];
    const EMPTY: &'static str = "No users found.";

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.username.clone(),
            self.email.clone(),
            format_time(&self.created_at),
        ]
    }
}

impl HumanDisplay for Post {
    fn human_display(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "ID:        {}", self.id);
        let _ = writeln!(out, "Title:     {}", self.title);
        let _ = writeln!(out, "Author:    {}", self.author_id);
        if !self.extract.is_empty() {
            let _ = writeln!(out, "Extract:   {}", self.extract);
        }
        let _ = writeln!(out, "Created:   {}", format_time(&self.created_at));
        let _ = writeln!(out, "Updated:   {}", format_time(&self.updated_at));

        if !self.content.is_empty() {
            let _ = writeln!(out);
            for line in self.content.lines() {
                let _ = writeln!(out, "  {line}");
            }
        }

        out.trim_end().to_string()
    }
}

impl TableRow for Post {
    const HEADERS: &'static [&'static str] = &["ID", "AUTHOR", "CREATED", "TITLE"];
    const EMPTY: &'static str = "No posts found.";

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.author_id.to_string(),
            format_time(&self.created_at),
            self.title.clone(),
        ]
    }
}
