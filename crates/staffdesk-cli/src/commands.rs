//! Command table for the terminal front-end.
//!
//! Each command maps to one or a few core operations and prints the
//! result. Errors bubble up to `main`, which shows a friendly message.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, warn};

use staffdesk_core::models::{Id, LeaveApplication, NewFeedback, NewQuery, Selfie};
use staffdesk_core::{AppContext, AuthState, Config};

use crate::utils::{format_amount, format_date, format_optional, truncate_string};

/// Width of free-text columns in list output
const TEXT_COLUMN_WIDTH: usize = 48;

/// Environment variable supplying the login id
const LOGIN_ENV: &str = "STAFFDESK_LOGIN";

/// Environment variable supplying the password
const PASSWORD_ENV: &str = "STAFFDESK_PASSWORD";

#[derive(Parser, Debug)]
#[command(name = "staffdesk", version, about = "Employee self-service from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in (prompts for the password)
    Login {
        #[arg(env = LOGIN_ENV)]
        login_id: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show whether you are signed in
    Status,
    /// Show your employee profile
    Profile,
    /// Today at a glance
    Dashboard,
    /// Attendance between two dates (YYYY-MM-DD), this month by default
    Attendance {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    /// Check in with a selfie
    CheckIn { selfie: PathBuf },
    /// Check out with a selfie
    CheckOut { selfie: PathBuf },
    /// Start or end a break
    Break {
        #[arg(value_enum)]
        action: BreakAction,
    },
    /// Leave balances, history and applications
    Leave {
        #[command(subcommand)]
        command: LeaveCommand,
    },
    /// Payslip for a month
    Salary { month: u32, year: i32 },
    /// Company memos
    Memos,
    /// Holiday calendar
    Holidays { year: Option<i32> },
    /// Today's birthdays
    Birthdays,
    /// List your queries
    Queries,
    /// Raise or withdraw a query
    Query {
        #[command(subcommand)]
        command: QueryCommand,
    },
    /// List, give or withdraw feedback
    Feedback {
        #[command(subcommand)]
        command: Option<FeedbackCommand>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreakAction {
    Start,
    End,
}

#[derive(Subcommand, Debug)]
pub enum LeaveCommand {
    /// Remaining balances, optionally for one leave type
    Summary { leave_type: Option<String> },
    /// Past leave requests
    History,
    /// Apply for leave
    Apply {
        leave_type: String,
        from: NaiveDate,
        to: NaiveDate,
        #[arg(required = true, num_args = 1..)]
        reason: Vec<String>,
        #[arg(long)]
        half_day: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum QueryCommand {
    New {
        subject: String,
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum FeedbackCommand {
    New {
        message: String,
        /// 1 to 5
        rating: Option<u8>,
    },
    Delete { id: String },
}

impl Command {
    fn requires_session(&self) -> bool {
        !matches!(self, Command::Login { .. } | Command::Logout | Command::Status)
    }
}

pub async fn run(ctx: &AppContext, config: &mut Config, command: Command) -> Result<()> {
    debug!(?command, "Running command");

    if command.requires_session() && ctx.auth.state() != AuthState::Authenticated {
        bail!("You are not signed in. Run `staffdesk login` first.");
    }

    match command {
        Command::Login { login_id } => login(ctx, config, login_id).await,
        Command::Logout => logout(ctx),
        Command::Status => status(ctx),
        Command::Profile => profile(ctx).await,
        Command::Dashboard => dashboard(ctx).await,
        Command::Attendance { from, to } => attendance(ctx, from, to).await,
        Command::CheckIn { selfie } => {
            ctx.api.check_in(read_selfie(&selfie).await?).await?;
            println!("Checked in.");
            Ok(())
        }
        Command::CheckOut { selfie } => {
            ctx.api.check_out(read_selfie(&selfie).await?).await?;
            println!("Checked out.");
            Ok(())
        }
        Command::Break { action: BreakAction::Start } => {
            ctx.api.start_break().await?;
            println!("Break started.");
            Ok(())
        }
        Command::Break { action: BreakAction::End } => {
            ctx.api.end_break().await?;
            println!("Break ended.");
            Ok(())
        }
        Command::Leave { command } => match command {
            LeaveCommand::Summary { leave_type } => leave_summary(ctx, leave_type.as_deref()).await,
            LeaveCommand::History => leave_history(ctx).await,
            LeaveCommand::Apply {
                leave_type,
                from,
                to,
                reason,
                half_day,
            } => {
                let application = LeaveApplication {
                    leave_type,
                    from,
                    to,
                    reason: reason.join(" "),
                    half_day,
                };
                apply_leave(ctx, &application).await
            }
        },
        Command::Salary { month, year } => salary(ctx, month, year).await,
        Command::Memos => memos(ctx).await,
        Command::Holidays { year } => holidays(ctx, year).await,
        Command::Birthdays => birthdays(ctx).await,
        Command::Queries => queries(ctx).await,
        Command::Query { command } => match command {
            QueryCommand::New { subject, message } => {
                let query = NewQuery {
                    subject,
                    message: message.join(" "),
                };
                ctx.api.create_query(&query).await?;
                println!("Query submitted.");
                Ok(())
            }
            QueryCommand::Delete { id } => {
                ctx.api.delete_query(&parse_id(&id)).await?;
                println!("Query deleted.");
                Ok(())
            }
        },
        Command::Feedback { command } => match command {
            None => feedback(ctx).await,
            Some(FeedbackCommand::New { message, rating }) => {
                ctx.api.create_feedback(&NewFeedback { message, rating }).await?;
                println!("Thanks for the feedback.");
                Ok(())
            }
            Some(FeedbackCommand::Delete { id }) => {
                ctx.api.delete_feedback(&parse_id(&id)).await?;
                println!("Feedback deleted.");
                Ok(())
            }
        },
    }
}

// ===== Session =====

async fn login(ctx: &AppContext, config: &mut Config, login_id: Option<String>) -> Result<()> {
    let login_id = match login_id.or_else(|| config.last_login_id.clone()) {
        Some(id) => id,
        None => prompt_login_id()?,
    };
    let password = match std::env::var(PASSWORD_ENV) {
        Ok(p) if !p.is_empty() => p,
        _ => rpassword::prompt_password(format!("Password for {}: ", login_id))?,
    };

    let user = ctx.auth.sign_in(&ctx.api, &login_id, &password).await?;

    config.last_login_id = Some(login_id);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }
    println!("Signed in as {}.", user.display_name());
    Ok(())
}

fn prompt_login_id() -> Result<String> {
    use std::io::Write;

    print!("Login id: ");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn logout(ctx: &AppContext) -> Result<()> {
    ctx.auth.logout()?;
    println!("Signed out.");
    Ok(())
}

fn status(ctx: &AppContext) -> Result<()> {
    match (ctx.auth.state(), ctx.auth.session()) {
        (AuthState::Authenticated, Some(session)) => {
            println!("Signed in as {} ({})", session.user.display_name(), session.user.employee_id);
            println!("API: {}", ctx.api.base_url());
        }
        _ => println!("Not signed in."),
    }
    Ok(())
}

async fn profile(ctx: &AppContext) -> Result<()> {
    let user = ctx.api.fetch_profile().await?;
    println!("{}", user.display_name());
    println!("  Employee id: {}", user.employee_id);
    println!("  Email:       {}", format_optional(&user.email, "-"));
    println!("  Role:        {}", format_optional(&user.role, "-"));
    println!("  Branch:      {}", format_optional(&user.branch_code, "-"));
    for (key, value) in &user.extra {
        match value.as_str() {
            Some(s) => println!("  {}: {}", key, s),
            None => println!("  {}: {}", key, value),
        }
    }
    Ok(())
}

// ===== Attendance =====

async fn dashboard(ctx: &AppContext) -> Result<()> {
    let (dashboard, leave, birthdays) = futures::try_join!(
        ctx.api.fetch_dashboard(),
        ctx.api.fetch_leave_summary(),
        ctx.api.fetch_birthdays(),
    )?;

    match dashboard.today {
        Some(ref today) => println!(
            "Today: {}{} (in {}, out {})",
            today.status_display(),
            if today.on_break() { ", on break" } else { "" },
            format_optional(&today.check_in, "-"),
            format_optional(&today.check_out, "-")
        ),
        None => println!("Today: not checked in"),
    }
    if let Some(present) = dashboard.present_days {
        println!("Present this month: {} day(s)", present);
    }
    if let Some(absent) = dashboard.absent_days {
        println!("Absent this month:  {} day(s)", absent);
    }
    let remaining = dashboard.leave_balance.unwrap_or_else(|| leave.total_remaining());
    println!("Leave remaining:    {}", remaining);
    if let Some(pending) = dashboard.pending_queries {
        println!("Open queries:       {}", pending);
    }
    for holiday in dashboard.upcoming_holidays.iter().take(3) {
        println!(
            "Holiday: {} {}",
            format_date(holiday.date.as_deref().unwrap_or("")),
            format_optional(&holiday.name, "")
        );
    }
    for notice in &birthdays {
        println!("Birthday: {}", format_optional(&notice.full_name, "a colleague"));
    }
    Ok(())
}

async fn attendance(ctx: &AppContext, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    let today = Local::now().date_naive();
    let from = from.unwrap_or_else(|| today.with_day(1).unwrap_or(today));
    let to = to.unwrap_or(today);

    let records = ctx.api.fetch_attendance_history(from, to).await?;
    if records.is_empty() {
        println!("No attendance between {} and {}.", from, to);
    }
    for r in &records {
        println!(
            "{:<14} {:<12} in {:<8} out {:<8} {}",
            format_date(r.date.as_deref().unwrap_or("-")),
            r.status_display(),
            format_optional(&r.check_in, "-"),
            format_optional(&r.check_out, "-"),
            format_optional(&r.working_hours, "")
        );
    }
    Ok(())
}

async fn read_selfie(path: &Path) -> Result<Selfie> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read selfie from {}", path.display()))?;
    Ok(Selfie::jpeg(bytes))
}

// ===== Leave and pay =====

async fn leave_summary(ctx: &AppContext, leave_type: Option<&str>) -> Result<()> {
    let summary = ctx.api.fetch_leave_summary().await?;
    let balances: Vec<_> = match leave_type {
        Some(t) => match summary.balance_for(t) {
            Some(balance) => vec![balance],
            None => bail!("No {} leave on record", t),
        },
        None => summary.balances.iter().collect(),
    };

    for b in balances {
        println!(
            "{:<16} used {:>5} of {:>5}, {:>5} left",
            format_optional(&b.leave_type, "Leave"),
            b.used.unwrap_or(0.0),
            b.total.unwrap_or(0.0),
            b.remaining.unwrap_or(0.0)
        );
    }
    if leave_type.is_none() {
        println!("Total remaining: {}", summary.total_remaining());
    }
    Ok(())
}

async fn leave_history(ctx: &AppContext) -> Result<()> {
    let records = ctx.api.fetch_leave_history().await?;
    if records.is_empty() {
        println!("No leave requests.");
    }
    for r in &records {
        println!(
            "{} {:<12} {} - {}  {:<10} {}",
            if r.is_pending() { "*" } else { " " },
            format_optional(&r.leave_type, "Leave"),
            format_date(r.from_date.as_deref().unwrap_or("?")),
            format_date(r.to_date.as_deref().unwrap_or("?")),
            format_optional(&r.status, "-"),
            truncate_string(r.reason.as_deref().unwrap_or(""), TEXT_COLUMN_WIDTH)
        );
    }
    let pending = records.iter().filter(|r| r.is_pending()).count();
    if pending > 0 {
        println!("{} request(s) awaiting approval (*)", pending);
    }
    Ok(())
}

async fn apply_leave(ctx: &AppContext, application: &LeaveApplication) -> Result<()> {
    ctx.api.apply_leave(application).await?;
    println!(
        "Applied for {} day(s) of {} leave.",
        application.days(),
        application.leave_type
    );
    Ok(())
}

async fn salary(ctx: &AppContext, month: u32, year: i32) -> Result<()> {
    let Some(slip) = ctx.api.fetch_salary_slip(month, year).await? else {
        println!("No payslip for {}/{} yet.", month, year);
        return Ok(());
    };

    println!("Payslip {:02}/{}", month, year);
    for c in &slip.earnings {
        println!("  + {:<24} {:>14}", c.name, format_amount(c.amount));
    }
    println!("  {:<26} {:>14}", "Total earnings", format_amount(slip.total_earnings()));
    for c in &slip.deductions {
        println!("  - {:<24} {:>14}", c.name, format_amount(c.amount));
    }
    println!("  {:<26} {:>14}", "Total deductions", format_amount(slip.total_deductions()));
    println!("  {:<26} {:>14}", "Gross", format_amount(slip.gross()));
    println!("  {:<26} {:>14}", "Net pay", format_amount(slip.net()));
    Ok(())
}

// ===== Notices =====

async fn memos(ctx: &AppContext) -> Result<()> {
    let memos = ctx.api.fetch_memos().await?;
    if memos.is_empty() {
        println!("No memos.");
    }
    for m in &memos {
        println!(
            "{}  {}",
            format_date(m.issued_on.as_deref().unwrap_or("")),
            format_optional(&m.title, "(untitled)")
        );
        if let Some(ref body) = m.body {
            println!("    {}", truncate_string(body, TEXT_COLUMN_WIDTH * 2));
        }
    }
    Ok(())
}

async fn holidays(ctx: &AppContext, year: Option<i32>) -> Result<()> {
    for h in ctx.api.fetch_holidays(year).await? {
        println!(
            "{:<14} {}{}",
            format_date(h.date.as_deref().unwrap_or("")),
            format_optional(&h.name, "Holiday"),
            if h.optional { " (optional)" } else { "" }
        );
    }
    Ok(())
}

async fn birthdays(ctx: &AppContext) -> Result<()> {
    let notices = ctx.api.fetch_birthdays().await?;
    if notices.is_empty() {
        println!("No birthdays today.");
    }
    for n in &notices {
        println!(
            "{} ({})",
            format_optional(&n.full_name, "A colleague"),
            format_optional(&n.department, "-")
        );
    }
    Ok(())
}

// ===== Queries and feedback =====

async fn queries(ctx: &AppContext) -> Result<()> {
    for q in ctx.api.fetch_queries().await? {
        println!(
            "[{}] {:<10} {}",
            q.id.as_ref().map(Id::to_string).unwrap_or_default(),
            format_optional(&q.status, if q.is_answered() { "Answered" } else { "Open" }),
            truncate_string(q.subject.as_deref().unwrap_or(""), TEXT_COLUMN_WIDTH)
        );
    }
    Ok(())
}

async fn feedback(ctx: &AppContext) -> Result<()> {
    for f in ctx.api.fetch_feedback().await? {
        let stars = f.rating.map(|r| "*".repeat(r as usize)).unwrap_or_default();
        println!(
            "[{}] {:<5} {}",
            f.id.as_ref().map(Id::to_string).unwrap_or_default(),
            stars,
            truncate_string(f.message.as_deref().unwrap_or(""), TEXT_COLUMN_WIDTH)
        );
    }
    Ok(())
}

/// Numeric ids go over the wire as numbers, anything else as text.
fn parse_id(s: &str) -> Id {
    s.parse::<i64>().map(Id::Number).unwrap_or_else(|_| Id::Text(s.to_string()))
}
