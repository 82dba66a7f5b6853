//! SQLite-backed store for companies, contacts, job postings, applications and
//! their status timelines.
//!
//! Referential rules live in the schema itself: foreign keys with
//! `ON DELETE CASCADE` carry a company delete down through its whole subtree,
//! and `ON DELETE SET NULL` detaches status events from a removed contact.
//! Foreign key enforcement is per-connection in SQLite, so every connection
//! opened here turns it on before doing anything else.

use chrono::Utc;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::models::{
    Application, ApplicationStatus, Company, Contact, JobPosting, NewApplication,
    NewApplicationStatus, NewCompany, NewContact, NewJobPosting, StatusEvent, StatusType,
    TableCounts,
};

const TABLES: [&str; 5] = [
    "company",
    "contact",
    "job_posting",
    "application",
    "application_status",
];

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS company (
        company_id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE CHECK (length(trim(name)) > 0),
        website TEXT,
        location TEXT
    );

    CREATE TABLE IF NOT EXISTS contact (
        contact_id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_id INTEGER NOT NULL REFERENCES company(company_id) ON DELETE CASCADE,
        full_name TEXT NOT NULL,
        title TEXT,
        email TEXT,
        phone TEXT,
        profile_link TEXT
    );

    CREATE TABLE IF NOT EXISTS job_posting (
        job_id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_id INTEGER NOT NULL REFERENCES company(company_id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        location TEXT,
        employment_type TEXT,
        url TEXT,
        salary TEXT,
        posted_date TEXT
    );

    CREATE TABLE IF NOT EXISTS application (
        application_id INTEGER PRIMARY KEY AUTOINCREMENT,
        job_id INTEGER NOT NULL REFERENCES job_posting(job_id) ON DELETE CASCADE,
        applied_date TEXT,
        source TEXT,
        priority INTEGER CHECK (priority IS NULL OR priority BETWEEN 1 AND 5),
        resume_ref TEXT
    );

    CREATE TABLE IF NOT EXISTS application_status (
        status_id INTEGER PRIMARY KEY AUTOINCREMENT,
        application_id INTEGER NOT NULL REFERENCES application(application_id) ON DELETE CASCADE,
        contact_id INTEGER REFERENCES contact(contact_id) ON DELETE SET NULL,
        status TEXT NOT NULL CHECK (status IN (
            'SAVED', 'APPLIED', 'SCREEN', 'INTERVIEW', 'ASSESSMENT',
            'OFFER', 'ACCEPTED', 'REJECTED', 'WITHDRAWN', 'GHOSTED'
        )),
        seq INTEGER NOT NULL CHECK (seq >= 1),
        recorded_at TEXT NOT NULL,
        UNIQUE (application_id, seq)
    );

    CREATE INDEX IF NOT EXISTS idx_contact_company ON contact(company_id);
    CREATE INDEX IF NOT EXISTS idx_job_posting_company ON job_posting(company_id);
    CREATE INDEX IF NOT EXISTS idx_application_job ON application(job_id);
    CREATE INDEX IF NOT EXISTS idx_status_contact ON application_status(contact_id);
"#;

const COMPANY_COLUMNS: &str = "company_id, name, website, location";
const CONTACT_COLUMNS: &str =
    "contact_id, company_id, full_name, title, email, phone, profile_link";
const JOB_POSTING_COLUMNS: &str =
    "job_id, company_id, title, location, employment_type, url, salary, posted_date";
const APPLICATION_COLUMNS: &str =
    "application_id, job_id, applied_date, source, priority, resume_ref";
const STATUS_COLUMNS: &str = "status_id, application_id, contact_id, status, seq, recorded_at";

// Column offsets inside STATUS_EVENT_SELECT.
const EVENT_APPLICATION_AT: usize = 6;
const EVENT_JOB_AT: usize = 12;
const EVENT_COMPANY_AT: usize = 20;
const EVENT_CONTACT_AT: usize = 24;

const STATUS_EVENT_SELECT: &str = r#"
    SELECT s.status_id, s.application_id, s.contact_id, s.status, s.seq, s.recorded_at,
           a.application_id, a.job_id, a.applied_date, a.source, a.priority, a.resume_ref,
           j.job_id, j.company_id, j.title, j.location, j.employment_type, j.url,
           j.salary, j.posted_date,
           c.company_id, c.name, c.website, c.location,
           ct.contact_id, ct.company_id, ct.full_name, ct.title, ct.email, ct.phone,
           ct.profile_link
    FROM application_status s
    JOIN application a ON s.application_id = a.application_id
    JOIN job_posting j ON a.job_id = j.job_id
    JOIN company c ON j.company_id = c.company_id
    LEFT JOIN contact ct ON s.contact_id = ct.contact_id
"#;

impl ToSql for StatusType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for StatusType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&path)?;
        Self::configure(&conn)?;
        debug!(path = %path.display(), "opened database");
        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        Ok(Self { conn, path: None })
    }

    fn configure(conn: &Connection) -> Result<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    }

    /// `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create-if-absent; safe to run against an existing database.
    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        info!("schema ready");
        Ok(())
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        let names = TABLES.map(|t| format!("'{t}'")).join(", ");
        let present: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ({names})"),
            [],
            |row| row.get(0),
        )?;
        if present as usize != TABLES.len() {
            return Err(StoreError::NotInitialized);
        }
        Ok(())
    }

    /// Run `f` inside a transaction. Commits on `Ok`; any `Err` rolls back
    /// everything `f` wrote.
    pub fn with_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let tx = self.conn.unchecked_transaction()?;
        match f(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                if e.is_constraint() {
                    warn!(error = %e, "write rejected, rolling back");
                }
                // Dropping the transaction rolls it back.
                drop(tx);
                Err(e)
            }
        }
    }

    /// Remove every row and restart identifier assignment.
    pub fn reset(&self) -> Result<()> {
        self.with_transaction(|tx| clear_all(tx))?;
        info!("store reset");
        Ok(())
    }

    pub fn counts(&self) -> Result<TableCounts> {
        let counts = self.conn.query_row(
            "SELECT (SELECT COUNT(*) FROM company),
                    (SELECT COUNT(*) FROM contact),
                    (SELECT COUNT(*) FROM job_posting),
                    (SELECT COUNT(*) FROM application),
                    (SELECT COUNT(*) FROM application_status)",
            [],
            |row| {
                Ok(TableCounts {
                    companies: row.get(0)?,
                    contacts: row.get(1)?,
                    job_postings: row.get(2)?,
                    applications: row.get(3)?,
                    statuses: row.get(4)?,
                })
            },
        )?;
        Ok(counts)
    }

    // --- Company operations ---

    pub fn create_company(&self, company: &NewCompany) -> Result<Company> {
        self.with_transaction(|tx| insert_company(tx, company))
    }

    pub fn get_company(&self, id: i64) -> Result<Option<Company>> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM company WHERE company_id = ?1");
        let company = self
            .conn
            .query_row(&sql, [id], |row| company_at(row, 0))
            .optional()?;
        Ok(company)
    }

    pub fn get_company_by_name(&self, name: &str) -> Result<Option<Company>> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM company WHERE name = ?1");
        let company = self
            .conn
            .query_row(&sql, [name], |row| company_at(row, 0))
            .optional()?;
        Ok(company)
    }

    pub fn list_companies(&self) -> Result<Vec<Company>> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM company ORDER BY company_id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| company_at(row, 0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Returns `false` when no company has `company.id`.
    pub fn update_company(&self, company: &Company) -> Result<bool> {
        self.with_transaction(|tx| {
            let changed = tx.execute(
                "UPDATE company SET name = ?1, website = ?2, location = ?3 WHERE company_id = ?4",
                params![company.name, company.website, company.location, company.id],
            )?;
            debug!(company_id = company.id, found = changed > 0, "update company");
            Ok(changed > 0)
        })
    }

    /// Deletes the company along with its contacts, postings, applications and
    /// status events.
    pub fn delete_company(&self, id: i64) -> Result<bool> {
        self.with_transaction(|tx| {
            let removed = tx.execute("DELETE FROM company WHERE company_id = ?1", [id])?;
            debug!(company_id = id, removed, "delete company (cascading)");
            Ok(removed > 0)
        })
    }

    // --- Contact operations ---

    pub fn create_contact(&self, contact: &NewContact) -> Result<Contact> {
        self.with_transaction(|tx| insert_contact(tx, contact))
    }

    pub fn get_contact(&self, id: i64) -> Result<Option<Contact>> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contact WHERE contact_id = ?1");
        let contact = self
            .conn
            .query_row(&sql, [id], |row| contact_at(row, 0))
            .optional()?;
        Ok(contact)
    }

    pub fn list_contacts(&self, company_id: Option<i64>) -> Result<Vec<Contact>> {
        let sql = format!(
            "SELECT {CONTACT_COLUMNS} FROM contact
             WHERE (?1 IS NULL OR company_id = ?1)
             ORDER BY contact_id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([company_id], |row| contact_at(row, 0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn update_contact(&self, contact: &Contact) -> Result<bool> {
        self.with_transaction(|tx| {
            let changed = tx.execute(
                "UPDATE contact
                 SET company_id = ?1, full_name = ?2, title = ?3, email = ?4, phone = ?5,
                     profile_link = ?6
                 WHERE contact_id = ?7",
                params![
                    contact.company_id,
                    contact.full_name,
                    contact.title,
                    contact.email,
                    contact.phone,
                    contact.profile_link,
                    contact.id,
                ],
            )?;
            debug!(contact_id = contact.id, found = changed > 0, "update contact");
            Ok(changed > 0)
        })
    }

    /// Status events that mention the contact keep existing with the
    /// reference cleared.
    pub fn delete_contact(&self, id: i64) -> Result<bool> {
        self.with_transaction(|tx| {
            let removed = tx.execute("DELETE FROM contact WHERE contact_id = ?1", [id])?;
            debug!(contact_id = id, removed, "delete contact");
            Ok(removed > 0)
        })
    }

    // --- Job posting operations ---

    pub fn create_job_posting(&self, job: &NewJobPosting) -> Result<JobPosting> {
        self.with_transaction(|tx| insert_job_posting(tx, job))
    }

    pub fn get_job_posting(&self, id: i64) -> Result<Option<JobPosting>> {
        let sql = format!("SELECT {JOB_POSTING_COLUMNS} FROM job_posting WHERE job_id = ?1");
        let job = self
            .conn
            .query_row(&sql, [id], |row| job_posting_at(row, 0))
            .optional()?;
        Ok(job)
    }

    pub fn list_job_postings(&self, company_id: Option<i64>) -> Result<Vec<JobPosting>> {
        let sql = format!(
            "SELECT {JOB_POSTING_COLUMNS} FROM job_posting
             WHERE (?1 IS NULL OR company_id = ?1)
             ORDER BY job_id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([company_id], |row| job_posting_at(row, 0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn update_job_posting(&self, job: &JobPosting) -> Result<bool> {
        self.with_transaction(|tx| {
            let changed = tx.execute(
                "UPDATE job_posting
                 SET company_id = ?1, title = ?2, location = ?3, employment_type = ?4, url = ?5,
                     salary = ?6, posted_date = ?7
                 WHERE job_id = ?8",
                params![
                    job.company_id,
                    job.title,
                    job.location,
                    job.employment_type,
                    job.url,
                    job.salary.map(|s| s.to_string()),
                    job.posted_date,
                    job.id,
                ],
            )?;
            debug!(job_id = job.id, found = changed > 0, "update job posting");
            Ok(changed > 0)
        })
    }

    pub fn delete_job_posting(&self, id: i64) -> Result<bool> {
        self.with_transaction(|tx| {
            let removed = tx.execute("DELETE FROM job_posting WHERE job_id = ?1", [id])?;
            debug!(job_id = id, removed, "delete job posting (cascading)");
            Ok(removed > 0)
        })
    }

    // --- Application operations ---

    pub fn create_application(&self, app: &NewApplication) -> Result<Application> {
        self.with_transaction(|tx| insert_application(tx, app))
    }

    pub fn get_application(&self, id: i64) -> Result<Option<Application>> {
        let sql =
            format!("SELECT {APPLICATION_COLUMNS} FROM application WHERE application_id = ?1");
        let app = self
            .conn
            .query_row(&sql, [id], |row| application_at(row, 0))
            .optional()?;
        Ok(app)
    }

    pub fn list_applications(&self, job_id: Option<i64>) -> Result<Vec<Application>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM application
             WHERE (?1 IS NULL OR job_id = ?1)
             ORDER BY application_id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([job_id], |row| application_at(row, 0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn update_application(&self, app: &Application) -> Result<bool> {
        self.with_transaction(|tx| {
            let changed = tx.execute(
                "UPDATE application
                 SET job_id = ?1, applied_date = ?2, source = ?3, priority = ?4, resume_ref = ?5
                 WHERE application_id = ?6",
                params![
                    app.job_id,
                    app.applied_date,
                    app.source,
                    app.priority,
                    app.resume_ref,
                    app.id,
                ],
            )?;
            debug!(application_id = app.id, found = changed > 0, "update application");
            Ok(changed > 0)
        })
    }

    pub fn delete_application(&self, id: i64) -> Result<bool> {
        self.with_transaction(|tx| {
            let removed =
                tx.execute("DELETE FROM application WHERE application_id = ?1", [id])?;
            debug!(application_id = id, removed, "delete application (cascading)");
            Ok(removed > 0)
        })
    }

    // --- Status timeline operations ---

    /// Append the next event to an application's timeline.
    pub fn append_status(&self, status: &NewApplicationStatus) -> Result<ApplicationStatus> {
        self.with_transaction(|tx| insert_status(tx, status))
    }

    pub fn get_application_status(&self, id: i64) -> Result<Option<ApplicationStatus>> {
        let sql =
            format!("SELECT {STATUS_COLUMNS} FROM application_status WHERE status_id = ?1");
        let status = self
            .conn
            .query_row(&sql, [id], |row| status_at(row, 0))
            .optional()?;
        Ok(status)
    }

    /// Events for one application, oldest first.
    pub fn status_history(&self, application_id: i64) -> Result<Vec<ApplicationStatus>> {
        let sql = format!(
            "SELECT {STATUS_COLUMNS} FROM application_status
             WHERE application_id = ?1
             ORDER BY seq"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([application_id], |row| status_at(row, 0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn latest_status(&self, application_id: i64) -> Result<Option<StatusType>> {
        let status = self
            .conn
            .query_row(
                "SELECT status FROM application_status
                 WHERE application_id = ?1
                 ORDER BY seq DESC LIMIT 1",
                [application_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(status)
    }

    /// Correct an event in place. Only the status value and contact reference
    /// can change; the owning application and timeline position are fixed.
    pub fn update_application_status(&self, status: &ApplicationStatus) -> Result<bool> {
        self.with_transaction(|tx| {
            let changed = tx.execute(
                "UPDATE application_status SET status = ?1, contact_id = ?2 WHERE status_id = ?3",
                params![status.status, status.contact_id, status.id],
            )?;
            debug!(status_id = status.id, found = changed > 0, "update status event");
            Ok(changed > 0)
        })
    }

    pub fn delete_application_status(&self, id: i64) -> Result<bool> {
        self.with_transaction(|tx| {
            let removed =
                tx.execute("DELETE FROM application_status WHERE status_id = ?1", [id])?;
            debug!(status_id = id, removed, "delete status event");
            Ok(removed > 0)
        })
    }

    // --- Joined views ---

    pub fn get_status_event(&self, status_id: i64) -> Result<Option<StatusEvent>> {
        let sql = format!("{STATUS_EVENT_SELECT} WHERE s.status_id = ?1");
        let event = self
            .conn
            .query_row(&sql, [status_id], row_to_status_event)
            .optional()?;
        Ok(event)
    }

    /// All events, or one application's, grouped by application in timeline
    /// order.
    pub fn list_status_events(&self, application_id: Option<i64>) -> Result<Vec<StatusEvent>> {
        let sql = format!(
            "{STATUS_EVENT_SELECT}
             WHERE (?1 IS NULL OR s.application_id = ?1)
             ORDER BY s.application_id, s.seq"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([application_id], row_to_status_event)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

// --- Statement-level helpers, callable inside any open transaction ---

pub(crate) fn insert_company(conn: &Connection, company: &NewCompany) -> Result<Company> {
    conn.execute(
        "INSERT INTO company (name, website, location) VALUES (?1, ?2, ?3)",
        params![company.name, company.website, company.location],
    )?;
    let id = conn.last_insert_rowid();
    debug!(company_id = id, name = %company.name, "inserted company");
    Ok(Company {
        id,
        name: company.name.clone(),
        website: company.website.clone(),
        location: company.location.clone(),
    })
}

pub(crate) fn insert_contact(conn: &Connection, contact: &NewContact) -> Result<Contact> {
    conn.execute(
        "INSERT INTO contact (company_id, full_name, title, email, phone, profile_link)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            contact.company_id,
            contact.full_name,
            contact.title,
            contact.email,
            contact.phone,
            contact.profile_link,
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(contact_id = id, company_id = contact.company_id, "inserted contact");
    Ok(Contact {
        id,
        company_id: contact.company_id,
        full_name: contact.full_name.clone(),
        title: contact.title.clone(),
        email: contact.email.clone(),
        phone: contact.phone.clone(),
        profile_link: contact.profile_link.clone(),
    })
}

pub(crate) fn insert_job_posting(conn: &Connection, job: &NewJobPosting) -> Result<JobPosting> {
    conn.execute(
        "INSERT INTO job_posting
            (company_id, title, location, employment_type, url, salary, posted_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            job.company_id,
            job.title,
            job.location,
            job.employment_type,
            job.url,
            job.salary.map(|s| s.to_string()),
            job.posted_date,
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(job_id = id, company_id = job.company_id, "inserted job posting");
    Ok(JobPosting {
        id,
        company_id: job.company_id,
        title: job.title.clone(),
        location: job.location.clone(),
        employment_type: job.employment_type.clone(),
        url: job.url.clone(),
        salary: job.salary,
        posted_date: job.posted_date,
    })
}

pub(crate) fn insert_application(conn: &Connection, app: &NewApplication) -> Result<Application> {
    conn.execute(
        "INSERT INTO application (job_id, applied_date, source, priority, resume_ref)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            app.job_id,
            app.applied_date,
            app.source,
            app.priority,
            app.resume_ref,
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(application_id = id, job_id = app.job_id, "inserted application");
    Ok(Application {
        id,
        job_id: app.job_id,
        applied_date: app.applied_date,
        source: app.source.clone(),
        priority: app.priority,
        resume_ref: app.resume_ref.clone(),
    })
}

/// The sequence number is computed inside the INSERT so it is read and
/// written under the same write lock.
pub(crate) fn insert_status(
    conn: &Connection,
    status: &NewApplicationStatus,
) -> Result<ApplicationStatus> {
    let recorded_at = status
        .recorded_at
        .unwrap_or_else(|| Utc::now().naive_utc());
    conn.execute(
        "INSERT INTO application_status (application_id, contact_id, status, seq, recorded_at)
         VALUES (?1, ?2, ?3,
                 (SELECT COALESCE(MAX(seq), 0) + 1 FROM application_status
                  WHERE application_id = ?1),
                 ?4)",
        params![status.application_id, status.contact_id, status.status, recorded_at],
    )?;
    let id = conn.last_insert_rowid();
    let seq: i64 = conn.query_row(
        "SELECT seq FROM application_status WHERE status_id = ?1",
        [id],
        |row| row.get(0),
    )?;
    debug!(
        status_id = id,
        application_id = status.application_id,
        seq,
        status = %status.status,
        "appended status event"
    );
    Ok(ApplicationStatus {
        id,
        application_id: status.application_id,
        contact_id: status.contact_id,
        status: status.status,
        seq,
        recorded_at,
    })
}

pub(crate) fn clear_all(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "DELETE FROM application_status;
         DELETE FROM application;
         DELETE FROM job_posting;
         DELETE FROM contact;
         DELETE FROM company;
         DELETE FROM sqlite_sequence WHERE name IN
            ('company', 'contact', 'job_posting', 'application', 'application_status');",
    )?;
    Ok(())
}

// --- Row mappers; `at` is the index of the entity's first column ---

fn company_at(row: &Row, at: usize) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get(at)?,
        name: row.get(at + 1)?,
        website: row.get(at + 2)?,
        location: row.get(at + 3)?,
    })
}

fn contact_at(row: &Row, at: usize) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(at)?,
        company_id: row.get(at + 1)?,
        full_name: row.get(at + 2)?,
        title: row.get(at + 3)?,
        email: row.get(at + 4)?,
        phone: row.get(at + 5)?,
        profile_link: row.get(at + 6)?,
    })
}

fn job_posting_at(row: &Row, at: usize) -> rusqlite::Result<JobPosting> {
    Ok(JobPosting {
        id: row.get(at)?,
        company_id: row.get(at + 1)?,
        title: row.get(at + 2)?,
        location: row.get(at + 3)?,
        employment_type: row.get(at + 4)?,
        url: row.get(at + 5)?,
        salary: decimal_at(row, at + 6)?,
        posted_date: row.get(at + 7)?,
    })
}

fn application_at(row: &Row, at: usize) -> rusqlite::Result<Application> {
    Ok(Application {
        id: row.get(at)?,
        job_id: row.get(at + 1)?,
        applied_date: row.get(at + 2)?,
        source: row.get(at + 3)?,
        priority: row.get(at + 4)?,
        resume_ref: row.get(at + 5)?,
    })
}

fn status_at(row: &Row, at: usize) -> rusqlite::Result<ApplicationStatus> {
    Ok(ApplicationStatus {
        id: row.get(at)?,
        application_id: row.get(at + 1)?,
        contact_id: row.get(at + 2)?,
        status: row.get(at + 3)?,
        seq: row.get(at + 4)?,
        recorded_at: row.get(at + 5)?,
    })
}

fn row_to_status_event(row: &Row) -> rusqlite::Result<StatusEvent> {
    let contact_id: Option<i64> = row.get(EVENT_CONTACT_AT)?;
    let contact = match contact_id {
        Some(_) => Some(contact_at(row, EVENT_CONTACT_AT)?),
        None => None,
    };
    Ok(StatusEvent {
        status: status_at(row, 0)?,
        application: application_at(row, EVENT_APPLICATION_AT)?,
        job: job_posting_at(row, EVENT_JOB_AT)?,
        company: company_at(row, EVENT_COMPANY_AT)?,
        contact,
    })
}

// Salaries are kept as decimal text so no float rounding creeps in.
fn decimal_at(row: &Row, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|text| {
        Decimal::from_str(&text)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}
