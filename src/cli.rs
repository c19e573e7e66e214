//! `cy-dashboard` command line.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use cy_app::{App, PendingSync};
use cy_core::{
    Board, BucketKey, Channel, Credentials, Event, EventStatus, Metrics, Phase, Priority,
    Project, ProjectStatus,
};

use crate::bootstrap::{StorageMode, WiredApp};

#[derive(Parser, Debug)]
#[command(name = "cy-dashboard")]
#[command(about = "CodeYatri project and event dashboard", long_about = None)]
pub struct Cli {
    /// Config file (defaults to ./config.toml, then the data directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep session and event cache in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Commands,
}

fn project_status(raw: &str) -> Result<ProjectStatus, String> {
    ProjectStatus::parse(raw)
        .ok_or_else(|| format!("expected one of: {}", names(ProjectStatus::ALL)))
}

fn event_status(raw: &str) -> Result<EventStatus, String> {
    EventStatus::parse(raw).ok_or_else(|| format!("expected one of: {}", names(EventStatus::ALL)))
}

fn channel(raw: &str) -> Result<Channel, String> {
    Channel::parse(raw).ok_or_else(|| "expected whatsapp, linkedin, instagram or website".into())
}

fn priority(raw: &str) -> Result<Priority, String> {
    Priority::parse(raw).ok_or_else(|| "expected low, medium or high".to_string())
}

fn phase(raw: &str) -> Result<Phase, String> {
    Phase::parse(raw).ok_or_else(|| {
        "expected MVP, Product Research, Research Paper or Ready to Launch".to_string()
    })
}

fn names<K: BucketKey>(all: &[K]) -> String {
    all.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open a session
    Login {
        #[arg(short, long, default_value = "")]
        username: String,
        #[arg(short, long, default_value = "")]
        password: String,
    },
    /// Close the session
    Logout,
    /// Load everything and print boards and metrics
    Status,
    /// Print the project board
    Projects,
    /// Print the event board
    Events,
    /// Move a project to another column
    MoveProject {
        id: String,
        #[arg(value_parser = project_status)]
        to: ProjectStatus,
    },
    /// Move an event to another column
    MoveEvent {
        id: String,
        #[arg(value_parser = event_status)]
        to: EventStatus,
    },
    /// Delete a project
    DeleteProject { id: String },
    /// Delete an event
    DeleteEvent { id: String },
    /// Create a project
    AddProject {
        title: String,
        #[arg(long, value_parser = project_status, default_value = "planning")]
        status: ProjectStatus,
        #[arg(long, default_value = "")]
        lead: String,
        #[arg(long, value_parser = priority, default_value = "medium")]
        priority: Priority,
        #[arg(long, value_parser = phase, default_value = "MVP")]
        phase: Phase,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        github: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Create an event
    AddEvent {
        title: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        #[arg(long, value_parser = event_status, default_value = "upcoming")]
        status: EventStatus,
        #[arg(long = "type", default_value = "")]
        eventtype: String,
        #[arg(long, default_value = "")]
        participants: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Change fields of an existing project
    EditProject(ProjectPatch),
    /// Change fields of an existing event
    EditEvent(EventPatch),
    /// Step a growth counter up (or down with --down) after refreshing it
    Metric {
        #[arg(value_parser = channel)]
        channel: Channel,
        #[arg(long)]
        down: bool,
    },
    /// Events scheduled on a date (default: today)
    On { date: Option<String> },
}

/// Fields left out keep their current value.
#[derive(Args, Debug, Default)]
pub struct ProjectPatch {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, value_parser = project_status)]
    pub status: Option<ProjectStatus>,
    #[arg(long)]
    pub lead: Option<String>,
    #[arg(long, value_parser = priority)]
    pub priority: Option<Priority>,
    #[arg(long, value_parser = phase)]
    pub phase: Option<Phase>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub github: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
}

impl ProjectPatch {
    fn apply(self, project: &mut Project) {
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(lead) = self.lead {
            project.lead = lead;
        }
        if let Some(priority) = self.priority {
            project.priority = priority;
        }
        if let Some(phase) = self.phase {
            project.phase = phase;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(github) = self.github {
            project.githubrepo = github;
        }
        if let Some(phone) = self.phone {
            project.phone = phone;
        }
    }
}

/// Fields left out keep their current value.
#[derive(Args, Debug, Default)]
pub struct EventPatch {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long, value_parser = event_status)]
    pub status: Option<EventStatus>,
    #[arg(long = "type")]
    pub eventtype: Option<String>,
    #[arg(long)]
    pub participants: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
}

impl EventPatch {
    fn apply(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(status) = self.status {
            event.status = status;
        }
        if let Some(eventtype) = self.eventtype {
            event.eventtype = eventtype;
        }
        if let Some(participants) = self.participants {
            event.participants = participants;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
    }
}

impl Cli {
    pub fn storage_mode(&self) -> StorageMode {
        if self.ephemeral {
            StorageMode::Ephemeral
        } else {
            StorageMode::Persistent
        }
    }
}

pub async fn run(command: Commands, wired: WiredApp) -> Result<()> {
    let WiredApp { app, messages } = wired;

    match command {
        Commands::Login { username, password } => {
            app.session()
                .login(&Credentials::new(username, password))
                .await?;
            println!("Logged in.");
            return Ok(());
        }
        Commands::Logout => {
            app.session().logout()?;
            println!("Logged out.");
            return Ok(());
        }
        _ => {}
    }

    if !app.session().is_authenticated() {
        bail!("Not logged in. Run `cy-dashboard login -u <user> -p <password>` first.");
    }

    let sync = match command {
        Commands::Login { .. } | Commands::Logout => None,
        Commands::Status => {
            let report = app.mount().await;
            let state = app.state().snapshot();
            print_metrics(&state.metrics);
            print_projects(&state.projects);
            print_events(&state.events);
            if report.projects.is_none() || report.events.is_none() {
                println!("(some results were discarded)");
            }
            if let Some(error) = state.view.fetch_error {
                eprintln!("{error}");
            }
            None
        }
        Commands::Projects => {
            app.hydrate_projects().await;
            app.state().read(|s| print_projects(&s.projects));
            None
        }
        Commands::Events => {
            app.hydrate_events().await;
            app.state().read(|s| print_events(&s.events));
            None
        }
        Commands::MoveProject { id, to } => {
            app.hydrate_projects().await;
            let (project, from) = find_project(&app, &id)?;
            let outcome = app.dispatcher().move_project(project, from, to);
            if outcome.sync.is_noop() {
                println!("Project {id} is already in {to}.");
            } else {
                println!("Moved project {id}: {from} -> {to}");
            }
            if outcome.celebrate {
                println!("🎉 Project completed!");
            }
            Some(outcome.sync)
        }
        Commands::MoveEvent { id, to } => {
            app.hydrate_events().await;
            let (event, from) = find_event(&app, &id)?;
            let sync = app.dispatcher().move_event(event, from, to);
            println!("Moved event {id}: {from} -> {to}");
            Some(sync)
        }
        Commands::DeleteProject { id } => {
            let sync = app.dispatcher().delete_project(&id);
            println!("Deleted project {}", id.trim());
            Some(sync)
        }
        Commands::DeleteEvent { id } => {
            let sync = app.dispatcher().delete_event(&id);
            println!("Deleted event {}", id.trim());
            Some(sync)
        }
        Commands::AddProject {
            title,
            status,
            lead,
            priority,
            phase,
            description,
            github,
            phone,
        } => {
            let project = Project {
                lead,
                priority,
                phase,
                description,
                githubrepo: github,
                phone,
                ..Project::new(title, status)
            };
            let applied = app.dispatcher().create_project(project);
            println!("Created project {} in {}", applied.item.id, applied.item.status);
            Some(applied.sync)
        }
        Commands::AddEvent {
            title,
            date,
            status,
            eventtype,
            participants,
            description,
        } => {
            let event = Event {
                eventtype,
                participants,
                description,
                ..Event::new(title, date, status)
            };
            let applied = app.dispatcher().create_event(event);
            println!("Created event {} in {}", applied.item.id, applied.item.status);
            Some(applied.sync)
        }
        Commands::EditProject(patch) => {
            app.hydrate_projects().await;
            let (mut project, _) = find_project(&app, &patch.id)?;
            patch.apply(&mut project);
            let applied = app.dispatcher().edit_project(project);
            println!("Updated project {} in {}", applied.item.id, applied.item.status);
            Some(applied.sync)
        }
        Commands::EditEvent(patch) => {
            app.hydrate_events().await;
            let (mut event, _) = find_event(&app, &patch.id)?;
            patch.apply(&mut event);
            let applied = app.dispatcher().edit_event(event);
            println!("Updated event {} in {}", applied.item.id, applied.item.status);
            Some(applied.sync)
        }
        Commands::Metric { channel, down } => {
            app.refresh_metrics().await;
            let value = app.adjust_metric(channel, !down);
            println!("{}: {value}", channel.label());
            None
        }
        Commands::On { date } => {
            let date =
                date.unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
            app.hydrate_events().await;
            app.state().read(|s| {
                let on_day = s.events.events_on(&date);
                if on_day.is_empty() {
                    println!("No events on {date}.");
                }
                for (status, event) in on_day {
                    println!("{date}  [{status}] {} ({})", event.title, event.id);
                }
            });
            None
        }
    };

    if let Some(sync) = sync {
        finish(sync, &messages).await;
    }
    Ok(())
}

async fn finish(sync: PendingSync, messages: &cy_infra::TransientMessageBoard) {
    if sync.wait().await {
        return;
    }
    let warning = messages
        .current()
        .unwrap_or_else(|| "Warning: change is local only, Sheet sync failed.".to_string());
    eprintln!("{warning}");
}

fn find_project(app: &App, id: &str) -> Result<(Project, ProjectStatus)> {
    let id = id.trim();
    app.state()
        .read(|s| {
            let status = s.projects.locate(id)?;
            s.projects.find(id).cloned().map(|p| (p, status))
        })
        .ok_or_else(|| anyhow!("No project with id {id}"))
}

fn find_event(app: &App, id: &str) -> Result<(Event, EventStatus)> {
    let id = id.trim();
    app.state()
        .read(|s| {
            let status = s.events.locate(id)?;
            s.events.find(id).cloned().map(|e| (e, status))
        })
        .with_context(|| format!("No event with id {id}"))
}

fn print_metrics(metrics: &Metrics) {
    println!("== Metrics ==");
    for channel in cy_core::Channel::ALL {
        println!("{:<22}{:>8}", channel.label(), metrics.get(channel));
    }
    println!("{:<22}{:>8}", "  this week", format!("+{}", metrics.website_weekly));
}

fn print_projects(board: &Board<Project>) {
    println!("== Projects ({}) ==", board.len());
    for (status, items) in board.buckets() {
        println!("[{status}] {}", items.len());
        for p in items {
            let lead = if p.lead.is_empty() { "-" } else { p.lead.as_str() };
            println!("  {:<16} {}  lead: {lead}  {:?}/{:?}", p.id, p.title, p.priority, p.phase);
        }
    }
}

fn print_events(board: &Board<Event>) {
    println!("== Events ({}) ==", board.len());
    for (status, items) in board.buckets() {
        println!("[{status}] {}", items.len());
        for e in items {
            let date = if e.date.is_empty() { "----------" } else { e.date.as_str() };
            println!("  {:<16} {date}  {}", e.id, e.title);
        }
    }
}
