use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use std::io::Write;

use crate::cli::browser::{BrowserLauncher, SystemBrowser};
use crate::cli::output::{format_comments, format_issue_summary, spinner};
use crate::cli::target::{IssueTarget, resolve_target};
use crate::common::{Config, NotesQuery, SystemEnvProvider};
use crate::remote::{GitContext, GitLabClient, IssueSource};

#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Issue number
    pub id: String,

    /// Select another repository using the OWNER/REPO format. Supports group namespaces
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Show issue comments and activities
    #[arg(short, long)]
    pub comments: bool,

    /// Open issue in a browser. Uses default browser or browser specified in BROWSER variable
    #[arg(short, long)]
    pub web: bool,

    /// Page number
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Number of items to list per page
    #[arg(short = 'P', long, default_value_t = 20)]
    pub per_page: u32,
}

/// What to do once the issue is fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub web: bool,
    pub comments: bool,
    pub notes_query: NotesQuery,
}

impl From<&ViewArgs> for ViewOptions {
    fn from(args: &ViewArgs) -> Self {
        Self {
            web: args.web,
            comments: args.comments,
            notes_query: NotesQuery::from_flags(args.page, args.per_page),
        }
    }
}

pub fn handle_view(args: ViewArgs) -> Result<()> {
    let target = resolve_target(&args.id, args.repo.as_deref(), || {
        GitContext::discover_current()?.remote()
    })?;

    let config = Config::from_env(SystemEnvProvider, target.base_url.as_deref());
    let client = GitLabClient::new(config)?;
    log::debug!("Using GitLab instance {}", client.base_url());

    let browser = SystemBrowser::new(SystemEnvProvider);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    view_issue(
        &client,
        &browser,
        &target,
        &ViewOptions::from(&args),
        &mut out,
        Utc::now(),
    )
}

/// Fetch an issue and either open it in the browser or print it
///
/// The summary is written before notes are requested, so a failed notes
/// fetch still leaves the summary on screen while the command fails.
pub fn view_issue<S, B, W>(
    source: &S,
    browser: &B,
    target: &IssueTarget,
    options: &ViewOptions,
    out: &mut W,
    now: DateTime<Utc>,
) -> Result<()>
where
    S: IssueSource,
    B: BrowserLauncher,
    W: Write,
{
    let progress = spinner("Fetching issue");
    let issue = source.get_issue(&target.project, target.iid);
    progress.finish_and_clear();
    let issue = issue?;

    if options.web {
        browser.open(&issue.web_url)?;
        return Ok(());
    }

    write!(out, "{}", format_issue_summary(&issue, now))?;
    out.flush()?;

    if !options.comments {
        return Ok(());
    }

    let progress = spinner("Fetching comments");
    let notes = source.list_issue_notes(&target.project, target.iid, &options.notes_query);
    progress.finish_and_clear();
    let notes = notes?;

    log::debug!(
        "Fetched {} notes, {} system-generated",
        notes.len(),
        notes.iter().filter(|note| note.system).count()
    );

    write!(out, "{}", format_comments(&notes, now))?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::browser::BrowserError;
    use crate::cli::output::NO_COMMENTS_MESSAGE;
    use crate::cli::{Cli, Commands, IssueCommands};
    use crate::common::{Issue, IssueId, Note, ProjectPath, User};
    use crate::remote::{ApiError, ApiResult};
    use chrono::{TimeDelta, TimeZone};
    use clap::Parser;
    use std::cell::RefCell;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn create_test_issue() -> Issue {
        let mut issue = Issue::new(
            42,
            7,
            "Fix crash",
            User::new("alice", "Alice A"),
            now() - TimeDelta::hours(2),
            "https://x/42",
        );
        issue.description = "It crashes on start".to_string();
        issue
    }

    fn target() -> IssueTarget {
        IssueTarget {
            project: ProjectPath::new("alice", "tools"),
            iid: 42,
            base_url: None,
        }
    }

    #[derive(Default)]
    struct FakeSource {
        issue: Option<Issue>,
        notes: Option<Vec<Note>>,
        note_queries: RefCell<Vec<NotesQuery>>,
    }

    impl FakeSource {
        fn with_issue(issue: Issue) -> Self {
            Self {
                issue: Some(issue),
                ..Self::default()
            }
        }
    }

    impl IssueSource for FakeSource {
        fn get_issue(&self, project: &ProjectPath, iid: IssueId) -> ApiResult<Issue> {
            self.issue.clone().ok_or_else(|| ApiError::NotFound {
                resource: format!("Issue {}#{}", project, iid),
            })
        }

        fn list_issue_notes(
            &self,
            _project: &ProjectPath,
            _iid: IssueId,
            query: &NotesQuery,
        ) -> ApiResult<Vec<Note>> {
            self.note_queries.borrow_mut().push(*query);
            self.notes.clone().ok_or_else(|| ApiError::Status {
                status: 500,
                message: "notes unavailable".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingBrowser {
        opened: RefCell<Vec<String>>,
        fail: bool,
    }

    impl BrowserLauncher for RecordingBrowser {
        fn open(&self, url: &str) -> Result<(), BrowserError> {
            self.opened.borrow_mut().push(url.to_string());
            if self.fail {
                return Err(BrowserError::EmptyCommand);
            }
            Ok(())
        }
    }

    fn options(web: bool, comments: bool) -> ViewOptions {
        ViewOptions {
            web,
            comments,
            notes_query: NotesQuery::from_flags(1, 20),
        }
    }

    fn run(source: &FakeSource, browser: &RecordingBrowser, options: &ViewOptions) -> (Result<()>, String) {
        let mut out = Vec::new();
        let result = view_issue(source, browser, &target(), options, &mut out, now());
        let text = console::strip_ansi_codes(&String::from_utf8(out).unwrap()).to_string();
        (result, text)
    }

    fn view_args(argv: &[&str]) -> ViewArgs {
        let cli = Cli::try_parse_from(argv.iter().copied()).expect("arguments should parse");
        match cli.command {
            Commands::Issue(issue) => match issue.command {
                IssueCommands::View(args) => args,
            },
        }
    }

    #[test]
    fn test_web_opens_browser_and_prints_nothing() {
        let source = FakeSource::with_issue(create_test_issue());
        let browser = RecordingBrowser::default();

        let (result, output) = run(&source, &browser, &options(true, true));

        assert!(result.is_ok());
        assert_eq!(*browser.opened.borrow(), vec!["https://x/42".to_string()]);
        assert!(output.is_empty(), "web mode should not render anything");
        assert!(source.note_queries.borrow().is_empty());
    }

    #[test]
    fn test_web_launch_failure_is_fatal() {
        let source = FakeSource::with_issue(create_test_issue());
        let browser = RecordingBrowser {
            fail: true,
            ..RecordingBrowser::default()
        };

        let (result, output) = run(&source, &browser, &options(true, false));

        assert!(result.is_err());
        assert!(output.is_empty());
    }

    #[test]
    fn test_summary_without_comments() {
        let source = FakeSource::with_issue(create_test_issue());
        let browser = RecordingBrowser::default();

        let (result, output) = run(&source, &browser, &options(false, false));

        assert!(result.is_ok());
        assert!(output.contains("Fix crash #42"));
        assert!(output.contains("It crashes on start"));
        assert!(output.contains("Web URL:"));
        assert!(!output.contains("Comments / Notes"));
        assert!(browser.opened.borrow().is_empty());
        assert!(source.note_queries.borrow().is_empty());
    }

    #[test]
    fn test_issue_fetch_failure_prints_nothing() {
        let source = FakeSource::default();
        let browser = RecordingBrowser::default();

        let (result, output) = run(&source, &browser, &options(false, true));

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Issue alice/tools#42 not found");
        assert!(output.is_empty());
    }

    #[test]
    fn test_comments_rendered_after_summary() {
        let mut system_note = Note::new(2, "closed", User::new("bot", "Bot"), now());
        system_note.system = true;
        let source = FakeSource {
            notes: Some(vec![
                Note::new(1, "Same here", User::new("bob", "Bob"), now() - TimeDelta::days(1)),
                system_note,
            ]),
            ..FakeSource::with_issue(create_test_issue())
        };
        let browser = RecordingBrowser::default();

        let (result, output) = run(&source, &browser, &options(false, true));

        assert!(result.is_ok());
        let summary_pos = output.find("Web URL:").unwrap();
        let comment_pos = output.find("bob: Same here").unwrap();
        assert!(summary_pos < comment_pos);
        assert!(output.contains("1 day ago"));
        assert!(!output.contains("bot:"));
    }

    #[test]
    fn test_empty_notes_page() {
        let source = FakeSource {
            notes: Some(vec![]),
            ..FakeSource::with_issue(create_test_issue())
        };
        let browser = RecordingBrowser::default();

        let (result, output) = run(&source, &browser, &options(false, true));

        assert!(result.is_ok());
        assert!(output.contains(NO_COMMENTS_MESSAGE));
    }

    #[test]
    fn test_notes_failure_keeps_summary() {
        let source = FakeSource::with_issue(create_test_issue());
        let browser = RecordingBrowser::default();

        let (result, output) = run(&source, &browser, &options(false, true));

        assert!(result.is_err());
        assert!(output.contains("Fix crash #42"));
        assert!(!output.contains("Comments / Notes"));
    }

    #[test]
    fn test_closed_by_row_only_for_closed_issues() {
        let browser = RecordingBrowser::default();

        let open = FakeSource::with_issue(create_test_issue());
        let (_, output) = run(&open, &browser, &options(false, false));
        assert!(!output.contains("Closed By:"));

        let mut issue = create_test_issue();
        issue.close(User::new("bob", "Bob B"), now() - TimeDelta::hours(1));
        let closed = FakeSource::with_issue(issue);
        let (_, output) = run(&closed, &browser, &options(false, false));
        assert!(output.contains("Closed By:"));
        assert!(output.contains("bob (Bob B) 1 hour ago"));
    }

    #[test]
    fn test_page_flags_forwarded_to_notes_fetch() {
        let args = view_args(&[
            "gitlab-issue", "issue", "view", "42", "--comments", "--page", "2", "--per-page", "5",
        ]);
        let source = FakeSource {
            notes: Some(vec![]),
            ..FakeSource::with_issue(create_test_issue())
        };

        let (result, _) = run(&source, &RecordingBrowser::default(), &ViewOptions::from(&args));

        assert!(result.is_ok());
        assert_eq!(
            *source.note_queries.borrow(),
            vec![NotesQuery {
                page: Some(2),
                per_page: Some(5)
            }]
        );
    }

    #[test]
    fn test_default_page_flags() {
        let args = view_args(&["gitlab-issue", "issue", "show", "42", "-c"]);
        let source = FakeSource {
            notes: Some(vec![]),
            ..FakeSource::with_issue(create_test_issue())
        };

        let (result, _) = run(&source, &RecordingBrowser::default(), &ViewOptions::from(&args));

        assert!(result.is_ok());
        assert_eq!(
            *source.note_queries.borrow(),
            vec![NotesQuery {
                page: Some(1),
                per_page: Some(20)
            }]
        );
    }

    #[test]
    fn test_zero_page_flags_defer_to_server() {
        let args = view_args(&["gitlab-issue", "issue", "view", "42", "-c", "-p", "0", "-P", "0"]);
        assert_eq!(ViewOptions::from(&args).notes_query, NotesQuery::default());
    }
}
