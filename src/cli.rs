// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

use crate::core::{ConfigManager, Database, FsOps};
use crate::error::{CareerMatchError, CareerResult};
use crate::job_search::{JobSearchService, RapidApiJobSearch};
use crate::profile::{LocalBlobStore, ProfileService, SavedJobs, SqliteStore};
use crate::recommendation::{OpenAiCompletionClient, RecommendationPipeline};
use crate::state::{AnalysisController, RequestState, SearchController};
use crate::transcript::TranscriptService;
use crate::types::{JobPosting, Session, UserId};
use crate::utils;

#[derive(Parser)]
#[command(name = "careermatch")]
#[command(about = "Match your academic transcript against job postings")]
pub struct Cli {
    /// Identity provider subject of the signed-in user
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[arg(long, global = true)]
    pub email: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create directories and the database
    Init,
    /// Department catalog
    #[command(subcommand)]
    Departments(DepartmentsCommand),
    /// Choose the user's department
    #[command(subcommand)]
    Department(DepartmentCommand),
    /// Upload or inspect the transcript PDF
    #[command(subcommand)]
    Transcript(TranscriptCommand),
    /// Supplementary experience and projects
    #[command(subcommand)]
    ExtraInfo(ExtraInfoCommand),
    /// Search recent job postings
    Search {
        title: String,
        location: String,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Postings from the last search
    Results,
    /// Saved (favourite) job postings
    #[command(subcommand)]
    Saved(SavedCommand),
    /// Compatibility report against a saved or last-searched posting
    Analyze {
        #[arg(required_unless_present = "text")]
        job_id: Option<String>,
        /// Analyze a pasted job description instead
        #[arg(long, conflicts_with = "job_id")]
        text: Option<String>,
    },
    /// Career report from the transcript alone
    Report,
}

#[derive(Subcommand)]
pub enum DepartmentsCommand {
    List,
    Add { id: String, name: String },
}

#[derive(Subcommand)]
pub enum DepartmentCommand {
    Select { id: String },
}

#[derive(Subcommand)]
pub enum TranscriptCommand {
    Upload { file: PathBuf },
    Show,
}

#[derive(Subcommand)]
pub enum ExtraInfoCommand {
    Set { text: String },
    Show,
    Clear,
}

#[derive(Subcommand)]
pub enum SavedCommand {
    List,
    Add { job_id: String },
    Remove { job_id: String },
    Toggle { job_id: String },
}

/// Backends constructed once and shared by every command.
pub struct AppContext {
    pub config: ConfigManager,
    pub store: Arc<SqliteStore>,
    pub blobs: Arc<LocalBlobStore>,
}

impl AppContext {
    pub async fn new(config: ConfigManager) -> Result<Self> {
        config.ensure_directories().await?;
        let db = Database::new(&config.environment.database_path).await?;
        let blobs = Arc::new(LocalBlobStore::new(
            config.environment.blob_storage_path.clone(),
        ));

        Ok(Self {
            config,
            store: Arc::new(SqliteStore::new(db)),
            blobs,
        })
    }

    pub fn profiles(&self) -> ProfileService {
        ProfileService::new(self.store.clone(), self.store.clone())
    }

    pub fn saved_jobs(&self) -> SavedJobs {
        SavedJobs::new(self.store.clone())
    }

    pub fn transcripts(&self) -> TranscriptService {
        TranscriptService::new(self.store.clone(), self.blobs.clone())
    }

    /// Needs `RAPID_API_KEY`.
    pub fn job_search(&self) -> Result<JobSearchService> {
        let provider = RapidApiJobSearch::new(
            &self.config.service.job_search,
            self.config.service.timeout(),
        )?;
        Ok(JobSearchService::new(Arc::new(provider)))
    }

    /// Needs `OPENAI_API_KEY`.
    pub fn pipeline(&self) -> Result<RecommendationPipeline> {
        let provider = OpenAiCompletionClient::new(
            &self.config.service.completion,
            self.config.service.timeout(),
        )?;
        Ok(RecommendationPipeline::new(
            self.store.clone(),
            Arc::new(provider),
        ))
    }
}

pub async fn run(cli: Cli, config: ConfigManager) -> Result<ExitCode> {
    let ctx = AppContext::new(config).await?;

    match handle_command(&ctx, &cli).await? {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!("Command failed ({}): {}", e.kind(), e);
            println!("❌ {}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn session(cli: &Cli) -> Result<Session> {
    let uid = cli
        .user
        .as_deref()
        .and_then(UserId::new)
        .context("This command needs a signed-in user: pass --user <uid>")?;

    Ok(Session {
        uid,
        email: cli.email.clone(),
    })
}

/// Outer error: setup problems (configuration, missing user). Inner error:
/// the failed user operation, reported as a message.
async fn handle_command(ctx: &AppContext, cli: &Cli) -> Result<CareerResult<()>> {
    let outcome = match &cli.command {
        Command::Init => {
            ctx.store.database().health_check().await?;
            println!("✅ Initialized");
            println!("   Database: {}", ctx.config.environment.database_path.display());
            println!("   Blobs:    {}", ctx.blobs.root().display());
            Ok(())
        }

        Command::Departments(DepartmentsCommand::List) => list_departments(ctx).await,

        Command::Departments(DepartmentsCommand::Add { id, name }) => {
            ctx.profiles().add_department(id, name).await.map(|dept| {
                println!("✅ Department added: {} ({})", dept.name, dept.id);
            })
        }

        Command::Department(DepartmentCommand::Select { id }) => {
            let session = session(cli)?;
            ctx.profiles()
                .select_department(&session, id)
                .await
                .map(|dept| println!("✅ Department selected: {}", dept.name))
        }

        Command::Transcript(TranscriptCommand::Upload { file }) => {
            let session = session(cli)?;
            upload_transcript(ctx, &session.uid, file).await
        }

        Command::Transcript(TranscriptCommand::Show) => {
            let session = session(cli)?;
            show_transcript(ctx, &session.uid).await
        }

        Command::ExtraInfo(command) => {
            let session = session(cli)?;
            extra_info(ctx, &session.uid, command).await
        }

        Command::Search {
            title,
            location,
            limit,
            offset,
        } => {
            let session = session(cli)?;
            let service = ctx.job_search()?;
            search(ctx, &session.uid, service, title, location, *limit, *offset).await
        }

        Command::Results => {
            let session = session(cli)?;
            last_results(ctx, &session.uid).await
        }

        Command::Saved(command) => {
            let session = session(cli)?;
            saved(ctx, &session.uid, command).await
        }

        Command::Analyze { job_id, text } => {
            let target = match (job_id.as_deref(), text.as_deref()) {
                (_, Some(text)) => AnalysisTarget::Text(text),
                (Some(job_id), None) => AnalysisTarget::Posting(job_id),
                (None, None) => anyhow::bail!("Pass a job id or --text <description>"),
            };
            let session = session(cli)?;
            let pipeline = ctx.pipeline()?;
            analyze(ctx, &session.uid, pipeline, target).await
        }

        Command::Report => {
            let session = session(cli)?;
            let pipeline = ctx.pipeline()?;
            println!("Reviewing your transcript...");
            pipeline
                .career_report(&session.uid)
                .await
                .map(|report| println!("\n{}", report))
                .map_err(CareerMatchError::from)
        }
    };

    Ok(outcome)
}

async fn list_departments(ctx: &AppContext) -> CareerResult<()> {
    let departments = ctx.profiles().list_departments().await?;
    if departments.is_empty() {
        println!("No departments found. Add one with: careermatch departments add <id> <name>");
        return Ok(());
    }

    println!("{:<15} {}", "ID", "Name");
    println!("{}", "-".repeat(60));
    for dept in departments {
        println!("{:<15} {}", utils::truncate(&dept.id, 15), dept.name);
    }
    Ok(())
}

async fn upload_transcript(ctx: &AppContext, uid: &UserId, file: &Path) -> CareerResult<()> {
    println!("Reading {}...", file.display());
    let outcome = ctx.transcripts().upload_file(uid, file).await?;

    println!("✅ Transcript uploaded");
    println!("   Pages:      {}", outcome.page_count);
    println!("   Characters: {}", outcome.characters);
    println!("   Stored at:  {}", outcome.url);
    if outcome.image_only {
        println!("⚠️  No readable text was found. Scanned transcripts are not supported;");
        println!("   analysis will not be possible until a text-based PDF is uploaded.");
    }
    Ok(())
}

async fn show_transcript(ctx: &AppContext, uid: &UserId) -> CareerResult<()> {
    let status = ctx.transcripts().existing(uid).await?;
    let profile = ctx.profiles().load(uid).await?;

    if let Some(name) = profile.department_name.as_deref() {
        println!("Department: {}", name);
    }

    match status.url.as_deref() {
        Some(url) => {
            let location = FsOps::path_from_file_url(url)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| url.to_string());
            println!("Transcript: {}", location);
            if status.has_text {
                println!("Text:       {} characters", status.characters);
            } else {
                println!("Text:       none (scanned document?)");
            }
        }
        None => println!("No transcript uploaded yet."),
    }
    Ok(())
}

async fn extra_info(ctx: &AppContext, uid: &UserId, command: &ExtraInfoCommand) -> CareerResult<()> {
    let profiles = ctx.profiles();
    match command {
        ExtraInfoCommand::Set { text } => match profiles.save_extra_info(uid, text).await? {
            Some(_) => println!("✅ Extra info saved"),
            None => println!("✅ Extra info cleared"),
        },
        ExtraInfoCommand::Clear => {
            profiles.save_extra_info(uid, "").await?;
            println!("✅ Extra info cleared");
        }
        ExtraInfoCommand::Show => {
            let profile = profiles.load(uid).await?;
            match profile.extra_info.as_deref() {
                Some(text) => println!("{}", text),
                None => println!("No extra info saved."),
            }
        }
    }
    Ok(())
}

async fn search(
    ctx: &AppContext,
    uid: &UserId,
    service: JobSearchService,
    title: &str,
    location: &str,
    limit: Option<u32>,
    offset: Option<u32>,
) -> CareerResult<()> {
    let controller = SearchController::new(Arc::new(service));
    controller.search(title, location, limit, offset);
    let state = controller.settled().await;

    if let Some(e) = state.error {
        return Err(e);
    }

    ctx.store.cache_search_results(uid, &state.jobs).await?;
    let saved_ids = ctx.saved_jobs().saved_ids(uid).await?;

    if state.jobs.is_empty() {
        println!("No postings found for '{}' in '{}'.", title, location);
        return Ok(());
    }

    print_postings(&state.jobs, |posting| saved_ids.contains(&posting.id));
    info!("Displayed {} search results for {}", state.jobs.len(), uid);
    Ok(())
}

async fn last_results(ctx: &AppContext, uid: &UserId) -> CareerResult<()> {
    let postings = ctx.store.cached_search_results(uid).await?;
    if postings.is_empty() {
        println!("No previous search. Run: careermatch search <title> <location>");
        return Ok(());
    }

    let saved_ids = ctx.saved_jobs().saved_ids(uid).await?;
    print_postings(&postings, |posting| saved_ids.contains(&posting.id));
    Ok(())
}

fn print_postings(postings: &[JobPosting], is_saved: impl Fn(&JobPosting) -> bool) {
    println!(
        "{:<2} {:<14} {:<35} {:<22} {:<20}",
        "", "ID", "Title", "Company", "Location"
    );
    println!("{}", "-".repeat(96));
    for posting in postings {
        println!(
            "{:<2} {:<14} {:<35} {:<22} {:<20}",
            if is_saved(posting) { "★" } else { "" },
            utils::truncate(&posting.id, 14),
            utils::truncate(posting.title_display(), 35),
            utils::truncate(posting.company_display(), 22),
            utils::truncate(posting.location_display(), 20),
        );
    }
}

async fn find_posting(ctx: &AppContext, uid: &UserId, job_id: &str) -> CareerResult<JobPosting> {
    ctx.store.find_posting(uid, job_id).await?.ok_or_else(|| {
        CareerMatchError::Persistence(format!(
            "Job '{}' is neither saved nor part of your last search",
            job_id
        ))
    })
}

async fn saved(ctx: &AppContext, uid: &UserId, command: &SavedCommand) -> CareerResult<()> {
    let saved = ctx.saved_jobs();
    match command {
        SavedCommand::List => {
            let postings = saved.list(uid).await?;
            if postings.is_empty() {
                println!("No saved jobs.");
            } else {
                print_postings(&postings, |_| true);
                for posting in &postings {
                    if let Some(url) = posting.job_url.as_deref() {
                        println!("   {} -> {}", posting.id, url);
                    }
                }
            }
        }
        SavedCommand::Add { job_id } => {
            let posting = find_posting(ctx, uid, job_id).await?;
            saved.save(uid, &posting).await?;
            println!("✅ Saved: {}", posting.title_display());
        }
        SavedCommand::Remove { job_id } => {
            if saved.remove(uid, job_id).await? {
                println!("✅ Removed {}", job_id);
            } else {
                println!("Job {} was not saved.", job_id);
            }
        }
        SavedCommand::Toggle { job_id } => {
            let posting = find_posting(ctx, uid, job_id).await?;
            if saved.toggle(uid, &posting).await? {
                println!("★ Saved: {}", posting.title_display());
            } else {
                println!("☆ Removed: {}", posting.title_display());
            }
        }
    }
    Ok(())
}

enum AnalysisTarget<'a> {
    Posting(&'a str),
    Text(&'a str),
}

async fn analyze(
    ctx: &AppContext,
    uid: &UserId,
    pipeline: RecommendationPipeline,
    target: AnalysisTarget<'_>,
) -> CareerResult<()> {
    let description = match target {
        AnalysisTarget::Text(text) => text.to_string(),
        AnalysisTarget::Posting(job_id) => {
            let posting = find_posting(ctx, uid, job_id).await?;
            println!(
                "Analyzing: {} at {}",
                posting.title_display(),
                posting.company_display()
            );
            posting.description_or_placeholder().to_string()
        }
    };

    let controller = AnalysisController::new(Arc::new(pipeline), uid.clone());
    controller.request(&description);

    match controller.settled().await {
        RequestState::Completed(result) => {
            println!();
            println!("Compatibility: {}% ({})", result.score, result.band().label());
            println!("{}", "-".repeat(60));
            println!("{}", result.sections);
            Ok(())
        }
        RequestState::Failed(e) => Err(e.into()),
        RequestState::Idle | RequestState::Requesting => Ok(()),
    }
}
