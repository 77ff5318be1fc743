use crate::cli::markdown;
use crate::cli::normalize::or_default;
use crate::common::{Issue, IssueState, Note, User};
use chrono::{DateTime, Utc};
use console::{Alignment, Color, measure_text_width, pad_str, style};
use indicatif::ProgressBar;
use std::fmt;
use std::time::Duration;

pub const SUMMARY_MAX_WIDTH: usize = 70;
pub const COMMENTS_MAX_WIDTH: usize = 100;
pub const NO_COMMENTS_MESSAGE: &str = "There are no comments on this issue";

const RULE: &str = "--------------------------------------------";

fn format_time_ago(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    if total_seconds < 60 {
        return format!(
            "{} second{}",
            total_seconds,
            if total_seconds == 1 { "" } else { "s" }
        );
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" });
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} hour{}", hours, if hours == 1 { "" } else { "s" });
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{} day{}", days, if days == 1 { "" } else { "s" });
    }

    let months = days / 30;
    if months < 12 {
        return format!("{} month{}", months, if months == 1 { "" } else { "s" });
    }

    let years = months / 12;
    format!("{} year{}", years, if years == 1 { "" } else { "s" })
}

/// Human phrase for an elapsed duration, e.g. "3 days ago"
pub fn time_ago(duration: Duration) -> String {
    format!("{} ago", format_time_ago(duration))
}

/// `time_ago` between two instants; timestamps in the future read as "0 seconds ago"
pub fn time_since(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    time_ago((now - then).to_std().unwrap_or_default())
}

/// Two-column label/value table
///
/// Values wrap at `max_col_width` and may span several lines; continuation
/// lines are indented under the value column. A row whose cells are both
/// empty renders as a blank line.
#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<(String, String)>,
    max_col_width: usize,
}

impl Table {
    pub fn new(max_col_width: usize) -> Self {
        Self {
            rows: Vec::new(),
            max_col_width,
        }
    }

    pub fn add_row(&mut self, label: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.rows.push((label.into(), value.into()));
        self
    }

    pub fn add_blank_row(&mut self) -> &mut Self {
        self.add_row("", "")
    }
}

#[cfg(test)]
impl Table {
    fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|(label, _)| label.as_str()).collect()
    }

    /// Value of the first row with `label`
    fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(row_label, _)| row_label == label)
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self
            .rows
            .iter()
            .map(|(label, _)| measure_text_width(label))
            .max()
            .unwrap_or(0);
        let indent = " ".repeat(label_width + 1);

        for (label, value) in &self.rows {
            if label.is_empty() && value.is_empty() {
                writeln!(f)?;
                continue;
            }

            let lines: Vec<String> = value
                .split('\n')
                .flat_map(|line| wrap_line(line, self.max_col_width))
                .collect();

            let padded = pad_str(label, label_width, Alignment::Left, None);
            let first = lines.first().map(String::as_str).unwrap_or("");
            writeln!(f, "{}", format!("{} {}", padded, first).trim_end())?;
            for line in lines.iter().skip(1) {
                writeln!(f, "{}{}", indent, line)?;
            }
        }

        Ok(())
    }
}

/// Wrap one line of a value, keeping leading indentation and inner spacing
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    textwrap::wrap(line, textwrap::Options::new(width))
        .into_iter()
        .map(|wrapped| wrapped.into_owned())
        .collect()
}

pub fn format_issue_state(state: &IssueState) -> console::StyledObject<String> {
    match state {
        IssueState::Opened => style(state.to_string()).fg(Color::Green),
        IssueState::Closed => style(state.to_string()).fg(Color::Red),
    }
}

fn format_assignees(assignees: &[User]) -> String {
    assignees
        .iter()
        .map(|user| format!("{}({})", user.username, user.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Attribute rows shown under the issue description
pub fn build_summary_table(issue: &Issue, now: DateTime<Utc>) -> Table {
    let mut table = Table::new(SUMMARY_MAX_WIDTH);

    table
        .add_row("Project ID:", issue.project_id.to_string())
        .add_row("Labels:", or_default(Some(issue.labels.join(", ")), "None"))
        .add_row("Milestone:", or_default(issue.milestone.as_ref(), "None"))
        .add_row(
            "Assignees:",
            or_default(Some(format_assignees(&issue.assignees)), "None"),
        )
        .add_row("Due date:", or_default(issue.due_date, "None"))
        .add_row("Weight:", or_default(issue.weight, "None"))
        .add_row("Confidential:", or_default(Some(issue.confidential), "None"))
        .add_row(
            "Discussion Locked:",
            or_default(issue.discussion_locked, "false"),
        )
        .add_row("Subscribed:", or_default(issue.subscribed, "false"));

    if let Some((closer, closed_at)) = issue.closure() {
        table.add_row(
            "Closed By:",
            format!("{} {}", closer, time_since(closed_at, now)),
        );
    }

    table
        .add_row("Reference:", issue.references.full.clone())
        .add_row("Web URL:", issue.web_url.clone());

    table
}

pub fn format_issue_summary(issue: &Issue, now: DateTime<Utc>) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{} {}\n",
        issue.title,
        style(format!("#{}", issue.iid)).dim()
    ));

    output.push_str(&format!(
        "({}){}\n",
        format_issue_state(&issue.state),
        style(format!(
            " • opened by {} {}",
            issue.author,
            time_since(issue.created_at, now)
        ))
        .dim()
    ));

    if !issue.description.is_empty() {
        output.push_str(&format!("{}\n", markdown::render(&issue.description)));
    }

    output.push_str(&format!(
        "\n{}\n\n",
        style(format!(
            "{} upvotes • {} downvotes • {} comments",
            issue.upvotes, issue.downvotes, issue.user_notes_count
        ))
        .dim()
    ));

    output.push_str(&build_summary_table(issue, now).to_string());
    output.push('\n');

    output
}

/// Human-authored notes, in the order the server returned them
pub fn visible_notes(notes: &[Note]) -> Vec<&Note> {
    notes.iter().filter(|note| note.is_human()).collect()
}

pub fn build_comments_table(notes: &[&Note], now: DateTime<Utc>) -> Table {
    let mut table = Table::new(COMMENTS_MAX_WIDTH);
    for note in notes {
        table
            .add_row(
                format!("{}:", note.author.username),
                format!(
                    "{}\n{}",
                    note.body,
                    style(time_since(note.created_at, now)).dim()
                ),
            )
            .add_blank_row();
    }
    table
}

pub fn format_comments(notes: &[Note], now: DateTime<Utc>) -> String {
    let mut output = format!("{}\nComments / Notes\n{}\n\n", RULE, RULE);

    let visible = visible_notes(notes);
    if visible.is_empty() {
        output.push_str(NO_COMMENTS_MESSAGE);
        output.push('\n');

        let hidden = notes.len();
        if hidden > 0 {
            output.push_str(&format!(
                "{}\n",
                style(format!(
                    "({} system note{} hidden)",
                    hidden,
                    if hidden == 1 { "" } else { "s" }
                ))
                .dim()
            ));
        }
        return output;
    }

    output.push_str(&build_comments_table(&visible, now).to_string());
    output
}

/// Stderr spinner shown while waiting on the network; invisible off-terminal
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn error_message(message: &str) -> String {
    format!("{} {}", style("✗").red().bold(), message)
}

/// Error line for the process exit path, including every cause in the chain
pub fn error_report(err: &anyhow::Error) -> String {
    error_message(&format!("{:#}", err))
}
