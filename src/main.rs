use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use jobtrack::config::{Config, DEFAULT_LOG_FILTER};
use jobtrack::seed::{self, SeedParams, SeedPlan};
use jobtrack::{
    Company, Database, NewApplication, NewApplicationStatus, NewCompany, NewContact,
    NewJobPosting, StatusEvent, StatusType,
};

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(about = "Track companies, contacts, postings and application timelines")]
struct Cli {
    /// Database file (defaults to the platform data directory)
    #[arg(long, global = true, env = "JOBTRACK_DB")]
    db: Option<PathBuf>,

    /// Log filter, e.g. "info" or "jobtrack=debug"
    #[arg(long, global = true, env = "JOBTRACK_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema (safe to re-run)
    Init,

    /// Populate the store with deterministic demo data
    Seed {
        /// Base date the generated timelines are anchored to
        #[arg(short, long)]
        base_date: Option<NaiveDate>,

        /// Number of companies to generate
        #[arg(short, long, default_value_t = seed::DEFAULT_COUNT)]
        count: u32,

        /// Add to existing data instead of wiping it first
        #[arg(long)]
        no_reset: bool,

        /// Print the generated rows as JSON without touching the store
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete every row
    Reset,

    /// Show row counts per table
    Stats,

    /// Manage companies
    Company {
        #[command(subcommand)]
        command: CompanyCommands,
    },

    /// Manage contacts
    Contact {
        #[command(subcommand)]
        command: ContactCommands,
    },

    /// Manage job postings
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },

    /// Manage applications
    Application {
        #[command(subcommand)]
        command: ApplicationCommands,
    },

    /// Record and inspect application status events
    Status {
        #[command(subcommand)]
        command: StatusCommands,
    },
}

#[derive(Subcommand)]
enum CompanyCommands {
    /// List all companies
    List {
        #[arg(long)]
        json: bool,
    },

    /// Add a company
    Add {
        name: String,
        #[arg(short, long)]
        website: Option<String>,
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Show a company with its contacts and postings
    Show {
        /// Company name or ID
        name: String,
        #[arg(long)]
        json: bool,
    },

    /// Change company fields
    Update {
        id: i64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        website: Option<String>,
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Delete a company and everything under it
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum ContactCommands {
    /// List contacts
    List {
        /// Only contacts at this company ID
        #[arg(short, long)]
        company: Option<i64>,
        #[arg(long)]
        json: bool,
    },

    /// Add a contact
    Add {
        company_id: i64,
        full_name: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        /// Profile URL (LinkedIn or similar)
        #[arg(long)]
        profile: Option<String>,
    },

    /// Delete a contact (status history keeps the event, without the contact)
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum JobCommands {
    /// List job postings
    List {
        /// Only postings at this company ID
        #[arg(short, long)]
        company: Option<i64>,
        #[arg(long)]
        json: bool,
    },

    /// Add a job posting
    Add {
        company_id: i64,
        title: String,
        #[arg(short, long)]
        location: Option<String>,
        /// Full-time, Contract, ...
        #[arg(short, long)]
        employment_type: Option<String>,
        #[arg(short, long)]
        url: Option<String>,
        #[arg(short, long)]
        salary: Option<Decimal>,
        #[arg(short, long)]
        posted: Option<NaiveDate>,
    },

    /// Delete a posting and its applications
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum ApplicationCommands {
    /// List applications
    List {
        /// Only applications for this job posting ID
        #[arg(short, long)]
        job: Option<i64>,
        #[arg(long)]
        json: bool,
    },

    /// Add an application
    Add {
        job_id: i64,
        #[arg(short, long)]
        applied: Option<NaiveDate>,
        #[arg(short, long)]
        source: Option<String>,
        /// 1 (highest) to 5
        #[arg(short, long)]
        priority: Option<u8>,
        #[arg(short, long)]
        resume: Option<String>,
    },

    /// Delete an application and its status history
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum StatusCommands {
    /// Append a status event to an application's timeline
    Add {
        application_id: i64,
        /// SAVED, APPLIED, SCREEN, INTERVIEW, ASSESSMENT, OFFER, ACCEPTED,
        /// REJECTED, WITHDRAWN or GHOSTED
        status: String,
        /// Contact involved in this step
        #[arg(short, long)]
        contact: Option<i64>,
    },

    /// Show an application's timeline
    History {
        application_id: i64,
        #[arg(long)]
        json: bool,
    },

    /// Show one status event with its application, posting, company and contact
    Show {
        status_id: i64,
        #[arg(long)]
        json: bool,
    },

    /// List status events with their context
    List {
        /// Only events for this application ID
        #[arg(short, long)]
        application: Option<i64>,
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(f) => EnvFilter::new(f),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn find_company(db: &Database, name: &str) -> Result<Option<Company>> {
    let company = if let Ok(id) = name.parse::<i64>() {
        db.get_company(id)?
    } else {
        db.get_company_by_name(name)?
    };
    Ok(company)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.db, cli.log_level);
    init_tracing(config.log_filter.as_deref());

    if let Commands::Seed {
        base_date,
        count,
        dry_run: true,
        ..
    } = &cli.command
    {
        let params = SeedParams::new(base_date.unwrap_or_else(seed::default_base_date), *count);
        println!("{}", SeedPlan::generate(params).to_json()?);
        return Ok(());
    }

    let db = Database::open(&config.db_path)
        .with_context(|| format!("Failed to open database at {}", config.db_path.display()))?;

    match cli.command {
        Commands::Init => {
            db.init()?;
            let path = db.path().unwrap_or(config.db_path.as_path());
            println!("Database initialized at {}", path.display());
        }

        Commands::Seed {
            base_date,
            count,
            no_reset,
            ..
        } => {
            db.ensure_initialized()?;
            let params = SeedParams::new(base_date.unwrap_or_else(seed::default_base_date), count);
            let plan = SeedPlan::generate(params);
            let written = if no_reset {
                db.seed(&plan)?
            } else {
                db.reset_and_seed(&plan)?
            };
            println!(
                "Seeded {} companies, {} contacts, {} postings, {} applications, {} status events (base date {})",
                written.companies,
                written.contacts,
                written.job_postings,
                written.applications,
                written.statuses,
                params.base_date
            );
        }

        Commands::Reset => {
            db.ensure_initialized()?;
            db.reset()?;
            println!("All rows removed.");
        }

        Commands::Stats => {
            db.ensure_initialized()?;
            let counts = db.counts()?;
            println!("{:<20} {:>8}", "TABLE", "ROWS");
            println!("{}", "-".repeat(29));
            println!("{:<20} {:>8}", "company", counts.companies);
            println!("{:<20} {:>8}", "contact", counts.contacts);
            println!("{:<20} {:>8}", "job_posting", counts.job_postings);
            println!("{:<20} {:>8}", "application", counts.applications);
            println!("{:<20} {:>8}", "application_status", counts.statuses);
        }

        Commands::Company { command } => {
            db.ensure_initialized()?;
            run_company(&db, command)?;
        }

        Commands::Contact { command } => {
            db.ensure_initialized()?;
            run_contact(&db, command)?;
        }

        Commands::Job { command } => {
            db.ensure_initialized()?;
            run_job(&db, command)?;
        }

        Commands::Application { command } => {
            db.ensure_initialized()?;
            run_application(&db, command)?;
        }

        Commands::Status { command } => {
            db.ensure_initialized()?;
            run_status(&db, command)?;
        }
    }

    Ok(())
}

fn run_company(db: &Database, command: CompanyCommands) -> Result<()> {
    match command {
        CompanyCommands::List { json } => {
            let companies = db.list_companies()?;
            if json {
                return print_json(&companies);
            }
            if companies.is_empty() {
                println!("No companies found.");
            } else {
                println!("{:<6} {:<28} {:<20} {:<30}", "ID", "NAME", "LOCATION", "WEBSITE");
                println!("{}", "-".repeat(87));
                for c in companies {
                    println!(
                        "{:<6} {:<28} {:<20} {:<30}",
                        c.id,
                        truncate(&c.name, 26),
                        truncate(&c.location.unwrap_or_default(), 18),
                        truncate(&c.website.unwrap_or_default(), 28)
                    );
                }
            }
        }

        CompanyCommands::Add {
            name,
            website,
            location,
        } => {
            let company = db.create_company(&NewCompany {
                name,
                website,
                location,
            })?;
            println!("Added company '{}' (ID: {})", company.name, company.id);
        }

        CompanyCommands::Show { name, json } => {
            let Some(company) = find_company(db, &name)? else {
                println!("Company '{}' not found.", name);
                return Ok(());
            };
            let contacts = db.list_contacts(Some(company.id))?;
            let jobs = db.list_job_postings(Some(company.id))?;
            if json {
                return print_json(&serde_json::json!({
                    "company": company,
                    "contacts": contacts,
                    "job_postings": jobs,
                }));
            }
            println!("Company #{}", company.id);
            println!("Name: {}", company.name);
            if let Some(website) = &company.website {
                println!("Website: {}", website);
            }
            if let Some(location) = &company.location {
                println!("Location: {}", location);
            }
            if !contacts.is_empty() {
                println!("\nContacts ({}):", contacts.len());
                for contact in contacts {
                    println!(
                        "  #{} - {} ({})",
                        contact.id,
                        contact.full_name,
                        contact.title.unwrap_or_default()
                    );
                }
            }
            if !jobs.is_empty() {
                println!("\nJob postings ({}):", jobs.len());
                for job in jobs {
                    let salary = job.salary.map(|s| format!(", ${}", s)).unwrap_or_default();
                    println!("  #{} - {}{}", job.id, job.title, salary);
                }
            }
        }

        CompanyCommands::Update {
            id,
            name,
            website,
            location,
        } => {
            let mut company = db
                .get_company(id)?
                .ok_or_else(|| anyhow!("Company #{} not found", id))?;
            if let Some(name) = name {
                company.name = name;
            }
            if website.is_some() {
                company.website = website;
            }
            if location.is_some() {
                company.location = location;
            }
            db.update_company(&company)?;
            println!("Updated company #{}.", id);
        }

        CompanyCommands::Delete { id } => {
            if db.delete_company(id)? {
                println!("Deleted company #{} with its contacts, postings and applications.", id);
            } else {
                println!("Company #{} not found.", id);
            }
        }
    }
    Ok(())
}

fn run_contact(db: &Database, command: ContactCommands) -> Result<()> {
    match command {
        ContactCommands::List { company, json } => {
            let contacts = db.list_contacts(company)?;
            if json {
                return print_json(&contacts);
            }
            if contacts.is_empty() {
                println!("No contacts found.");
            } else {
                println!("{:<6} {:<8} {:<24} {:<22} {:<30}", "ID", "COMPANY", "NAME", "TITLE", "EMAIL");
                println!("{}", "-".repeat(94));
                for c in contacts {
                    println!(
                        "{:<6} {:<8} {:<24} {:<22} {:<30}",
                        c.id,
                        c.company_id,
                        truncate(&c.full_name, 22),
                        truncate(&c.title.unwrap_or_default(), 20),
                        truncate(&c.email.unwrap_or_default(), 28)
                    );
                }
            }
        }

        ContactCommands::Add {
            company_id,
            full_name,
            title,
            email,
            phone,
            profile,
        } => {
            let contact = db.create_contact(&NewContact {
                company_id,
                full_name,
                title,
                email,
                phone,
                profile_link: profile,
            })?;
            println!("Added contact '{}' (ID: {})", contact.full_name, contact.id);
        }

        ContactCommands::Delete { id } => {
            if db.delete_contact(id)? {
                println!("Deleted contact #{}.", id);
            } else {
                println!("Contact #{} not found.", id);
            }
        }
    }
    Ok(())
}

fn run_job(db: &Database, command: JobCommands) -> Result<()> {
    match command {
        JobCommands::List { company, json } => {
            let jobs = db.list_job_postings(company)?;
            if json {
                return print_json(&jobs);
            }
            if jobs.is_empty() {
                println!("No job postings found.");
            } else {
                println!(
                    "{:<6} {:<8} {:<28} {:<18} {:>12} {:<10}",
                    "ID", "COMPANY", "TITLE", "TYPE", "SALARY", "POSTED"
                );
                println!("{}", "-".repeat(87));
                for job in jobs {
                    println!(
                        "{:<6} {:<8} {:<28} {:<18} {:>12} {:<10}",
                        job.id,
                        job.company_id,
                        truncate(&job.title, 26),
                        truncate(&job.employment_type.unwrap_or_default(), 16),
                        job.salary.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
                        job.posted_date.map(|d| d.to_string()).unwrap_or_default()
                    );
                }
            }
        }

        JobCommands::Add {
            company_id,
            title,
            location,
            employment_type,
            url,
            salary,
            posted,
        } => {
            let job = db.create_job_posting(&NewJobPosting {
                company_id,
                title,
                location,
                employment_type,
                url,
                salary,
                posted_date: posted,
            })?;
            println!("Added job posting '{}' (ID: {})", job.title, job.id);
        }

        JobCommands::Delete { id } => {
            if db.delete_job_posting(id)? {
                println!("Deleted job posting #{} and its applications.", id);
            } else {
                println!("Job posting #{} not found.", id);
            }
        }
    }
    Ok(())
}

fn run_application(db: &Database, command: ApplicationCommands) -> Result<()> {
    match command {
        ApplicationCommands::List { job, json } => {
            let apps = db.list_applications(job)?;
            if json {
                return print_json(&apps);
            }
            if apps.is_empty() {
                println!("No applications found.");
            } else {
                println!(
                    "{:<6} {:<6} {:<10} {:<20} {:>8} {:<12}",
                    "ID", "JOB", "APPLIED", "SOURCE", "PRIORITY", "STATUS"
                );
                println!("{}", "-".repeat(67));
                for app in apps {
                    let status = db
                        .latest_status(app.id)?
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<6} {:<6} {:<10} {:<20} {:>8} {:<12}",
                        app.id,
                        app.job_id,
                        app.applied_date.map(|d| d.to_string()).unwrap_or_default(),
                        truncate(&app.source.unwrap_or_default(), 18),
                        app.priority.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
                        status
                    );
                }
            }
        }

        ApplicationCommands::Add {
            job_id,
            applied,
            source,
            priority,
            resume,
        } => {
            let app = db.create_application(&NewApplication {
                job_id,
                applied_date: applied,
                source,
                priority,
                resume_ref: resume,
            })?;
            println!("Added application #{} for job #{}", app.id, app.job_id);
        }

        ApplicationCommands::Delete { id } => {
            if db.delete_application(id)? {
                println!("Deleted application #{} and its status history.", id);
            } else {
                println!("Application #{} not found.", id);
            }
        }
    }
    Ok(())
}

fn run_status(db: &Database, command: StatusCommands) -> Result<()> {
    match command {
        StatusCommands::Add {
            application_id,
            status,
            contact,
        } => {
            let status: StatusType = status.trim().to_uppercase().parse()?;
            let event = db.append_status(&NewApplicationStatus {
                application_id,
                contact_id: contact,
                status,
                recorded_at: None,
            })?;
            println!(
                "Application #{} is now {} (event #{}, step {})",
                application_id, event.status, event.id, event.seq
            );
        }

        StatusCommands::History {
            application_id,
            json,
        } => {
            let history = db.status_history(application_id)?;
            if json {
                return print_json(&history);
            }
            if history.is_empty() {
                println!("No status events for application #{}.", application_id);
            } else {
                println!("{:<5} {:<6} {:<12} {:<20} {:<8}", "STEP", "ID", "STATUS", "RECORDED", "CONTACT");
                println!("{}", "-".repeat(55));
                for event in history {
                    println!(
                        "{:<5} {:<6} {:<12} {:<20} {:<8}",
                        event.seq,
                        event.id,
                        event.status,
                        event.recorded_at.format("%Y-%m-%d %H:%M"),
                        event.contact_id.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string())
                    );
                }
            }
        }

        StatusCommands::Show { status_id, json } => match db.get_status_event(status_id)? {
            Some(event) => {
                if json {
                    return print_json(&event);
                }
                print_status_event(&event);
            }
            None => {
                println!("Status event #{} not found.", status_id);
            }
        },

        StatusCommands::List { application, json } => {
            let events = db.list_status_events(application)?;
            if json {
                return print_json(&events);
            }
            if events.is_empty() {
                println!("No status events found.");
            } else {
                println!(
                    "{:<6} {:<6} {:<12} {:<22} {:<24} {:<20}",
                    "ID", "APP", "STATUS", "COMPANY", "JOB", "CONTACT"
                );
                println!("{}", "-".repeat(95));
                for e in events {
                    println!(
                        "{:<6} {:<6} {:<12} {:<22} {:<24} {:<20}",
                        e.status.id,
                        e.application.id,
                        e.status.status,
                        truncate(&e.company.name, 20),
                        truncate(&e.job.title, 22),
                        truncate(
                            &e.contact.map(|c| c.full_name).unwrap_or_else(|| "-".to_string()),
                            18
                        )
                    );
                }
            }
        }
    }
    Ok(())
}

fn print_status_event(event: &StatusEvent) {
    println!("Status event #{}", event.status.id);
    println!("Status: {}", event.status.status);
    println!("Step: {}", event.status.seq);
    println!("Recorded: {}", event.status.recorded_at);
    println!("Company: {} (#{})", event.company.name, event.company.id);
    println!("Job: {} (#{})", event.job.title, event.job.id);
    println!("Application: #{}", event.application.id);
    if let Some(applied) = event.application.applied_date {
        println!("Applied: {}", applied);
    }
    if let Some(source) = &event.application.source {
        println!("Source: {}", source);
    }
    match &event.contact {
        Some(contact) => println!("Contact: {} (#{})", contact.full_name, contact.id),
        None => println!("Contact: none"),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
