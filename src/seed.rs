//! Deterministic demo data.
//!
//! Every generated field is a function of the row's 1-based index and the base
//! date, so a plan for the same parameters is identical on every run. Rows are
//! built in memory first and written in a single transaction.

use chrono::{Days, Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::{self, Database};
use crate::error::Result;
use crate::models::{
    NewApplication, NewApplicationStatus, NewCompany, NewContact, NewJobPosting, StatusType,
    TableCounts,
};

pub const DEFAULT_COUNT: u32 = 50;
pub const EVENTS_PER_APPLICATION: usize = 3;

const COMPANY_STEMS: [&str; 10] = [
    "Northwind", "Bluepeak", "Copperleaf", "Driftwood", "Evergreen",
    "Foxglove", "Granite", "Harborview", "Ironbark", "Juniper",
];

const LOCATIONS: [&str; 8] = [
    "Remote",
    "Austin, TX",
    "Seattle, WA",
    "New York, NY",
    "Denver, CO",
    "Chicago, IL",
    "Boston, MA",
    "San Francisco, CA",
];

const FIRST_NAMES: [&str; 10] = [
    "Avery", "Jordan", "Riley", "Morgan", "Casey",
    "Taylor", "Quinn", "Jamie", "Drew", "Reese",
];

const LAST_NAMES: [&str; 10] = [
    "Nguyen", "Patel", "Garcia", "Kim", "Okafor",
    "Schmidt", "Rossi", "Haddad", "Larsen", "Tanaka",
];

const CONTACT_TITLES: [&str; 5] = [
    "Technical Recruiter",
    "Engineering Manager",
    "Talent Partner",
    "Hiring Manager",
    "Head of Engineering",
];

const JOB_TITLES: [&str; 8] = [
    "Backend Engineer",
    "Platform Engineer",
    "Site Reliability Engineer",
    "Data Engineer",
    "Systems Programmer",
    "Infrastructure Engineer",
    "Staff Software Engineer",
    "DevOps Engineer",
];

const EMPLOYMENT_TYPES: [&str; 4] = ["Full-time", "Contract", "Part-time", "Contract-to-hire"];

const SOURCES: [&str; 6] = [
    "LinkedIn",
    "Company site",
    "Referral",
    "Indeed",
    "Recruiter outreach",
    "Hacker News",
];

/// Statuses an application can move to after SAVED and APPLIED.
pub const FOLLOW_UP: [StatusType; 8] = [
    StatusType::Screen,
    StatusType::Interview,
    StatusType::Assessment,
    StatusType::Offer,
    StatusType::Accepted,
    StatusType::Rejected,
    StatusType::Withdrawn,
    StatusType::Ghosted,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedParams {
    pub base_date: NaiveDate,
    pub count: u32,
}

impl SeedParams {
    pub fn new(base_date: NaiveDate, count: u32) -> Self {
        Self { base_date, count }
    }
}

impl Default for SeedParams {
    fn default() -> Self {
        Self {
            base_date: default_base_date(),
            count: DEFAULT_COUNT,
        }
    }
}

pub fn default_base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 4).unwrap_or_default()
}

/// Row indices `1..=count`. Restartable: call again for a fresh pass.
pub fn indices(count: u32) -> impl Iterator<Item = u32> + Clone {
    1..=count
}

/// Third event for application `i`. Indexing by `i % 8` covers every index.
pub fn follow_up_status(i: u32) -> StatusType {
    FOLLOW_UP[i as usize % FOLLOW_UP.len()]
}

/// Offsets are computed in `u64`; any `u32` index is valid.
fn pick<T: Copy>(list: &[T], n: u64) -> T {
    list[(n % list.len() as u64) as usize]
}

fn slug(i: u32) -> String {
    format!("{}{:03}", pick(&COMPANY_STEMS, u64::from(i)).to_lowercase(), i)
}

fn at_hour(date: NaiveDate, hour: i64) -> NaiveDateTime {
    NaiveDateTime::from(date) + Duration::hours(hour)
}

pub fn company(i: u32) -> NewCompany {
    let n = u64::from(i);
    NewCompany {
        name: format!("{} {:03}", pick(&COMPANY_STEMS, n), i),
        website: Some(format!("https://www.{}.example.com", slug(i))),
        location: Some(pick(&LOCATIONS, n).to_string()),
    }
}

/// Contact at company `i`; `company_id` is the id the store assigned to it.
pub fn contact(i: u32, company_id: i64) -> NewContact {
    let n = u64::from(i);
    let first = pick(&FIRST_NAMES, n);
    let last = pick(&LAST_NAMES, n * 3 + 1);
    NewContact {
        company_id,
        full_name: format!("{first} {last}"),
        title: Some(pick(&CONTACT_TITLES, n).to_string()),
        email: Some(format!(
            "{}.{}@{}.example.com",
            first.to_lowercase(),
            last.to_lowercase(),
            slug(i)
        )),
        phone: Some(format!("555-{:04}", 1000 + n)),
        profile_link: Some(format!(
            "https://www.linkedin.com/in/{}-{}-{:03}",
            first.to_lowercase(),
            last.to_lowercase(),
            i
        )),
    }
}

fn posted_date(params: &SeedParams, i: u32) -> NaiveDate {
    params.base_date - Days::new(u64::from(i % 30) + 7)
}

fn applied_date(params: &SeedParams, i: u32) -> NaiveDate {
    posted_date(params, i) + Days::new(u64::from(i % 5) + 1)
}

pub fn job_posting(params: &SeedParams, i: u32, company_id: i64) -> NewJobPosting {
    let n = u64::from(i);
    let salary = 90_000 + i64::from(i % 12) * 5_000;
    NewJobPosting {
        company_id,
        title: pick(&JOB_TITLES, n).to_string(),
        location: Some(pick(&LOCATIONS, n + 3).to_string()),
        employment_type: Some(pick(&EMPLOYMENT_TYPES, n).to_string()),
        url: Some(format!("https://careers.{}.example.com/jobs/{}", slug(i), 1000 + n)),
        salary: Some(Decimal::new(salary * 100, 2)),
        posted_date: Some(posted_date(params, i)),
    }
}

pub fn application(params: &SeedParams, i: u32, job_id: i64) -> NewApplication {
    NewApplication {
        job_id,
        applied_date: Some(applied_date(params, i)),
        source: Some(pick(&SOURCES, u64::from(i)).to_string()),
        priority: Some((i % 5) as u8 + 1),
        resume_ref: Some(format!("resume_v{}.pdf", i % 3 + 1)),
    }
}

/// SAVED, then APPLIED, then the index's follow-up status. Only the follow-up
/// names a contact.
pub fn status_events(
    params: &SeedParams,
    i: u32,
    application_id: i64,
    contact_id: i64,
) -> [NewApplicationStatus; EVENTS_PER_APPLICATION] {
    let applied = applied_date(params, i);
    let follow_up_day = applied + Days::new(u64::from(i % 14) + 7);
    [
        NewApplicationStatus {
            application_id,
            contact_id: None,
            status: StatusType::Saved,
            recorded_at: Some(at_hour(posted_date(params, i), 9)),
        },
        NewApplicationStatus {
            application_id,
            contact_id: None,
            status: StatusType::Applied,
            recorded_at: Some(at_hour(applied, 10)),
        },
        NewApplicationStatus {
            application_id,
            contact_id: Some(contact_id),
            status: follow_up_status(i),
            recorded_at: Some(at_hour(follow_up_day, 15)),
        },
    ]
}

/// Everything generated for one index. Foreign keys are expressed as indices
/// into the plan; the store's ids are substituted at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedRow {
    pub index: u32,
    pub company: NewCompany,
    pub contact: NewContact,
    pub job_posting: NewJobPosting,
    pub application: NewApplication,
    pub statuses: Vec<NewApplicationStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedPlan {
    pub params: SeedParams,
    pub rows: Vec<SeedRow>,
}

impl SeedPlan {
    /// Pure: no clock, no randomness, no store access.
    pub fn generate(params: SeedParams) -> Self {
        let rows = indices(params.count)
            .map(|i| {
                // Placeholder ids are the index itself, which is what a fresh
                // store assigns.
                let id = i64::from(i);
                SeedRow {
                    index: i,
                    company: company(i),
                    contact: contact(i, id),
                    job_posting: job_posting(&params, i, id),
                    application: application(&params, i, id),
                    statuses: status_events(&params, i, id, id).to_vec(),
                }
            })
            .collect();
        Self { params, rows }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn expected_counts(&self) -> TableCounts {
        let n = self.rows.len() as i64;
        TableCounts {
            companies: n,
            contacts: n,
            job_postings: n,
            applications: n,
            statuses: self.rows.iter().map(|r| r.statuses.len() as i64).sum(),
        }
    }
}

fn write_plan(conn: &rusqlite::Connection, plan: &SeedPlan) -> Result<TableCounts> {
    let mut written = TableCounts::default();
    for row in &plan.rows {
        let company = db::insert_company(conn, &row.company)?;
        let contact = db::insert_contact(
            conn,
            &NewContact {
                company_id: company.id,
                ..row.contact.clone()
            },
        )?;
        let job = db::insert_job_posting(
            conn,
            &NewJobPosting {
                company_id: company.id,
                ..row.job_posting.clone()
            },
        )?;
        let app = db::insert_application(
            conn,
            &NewApplication {
                job_id: job.id,
                ..row.application.clone()
            },
        )?;
        for event in &row.statuses {
            db::insert_status(
                conn,
                &NewApplicationStatus {
                    application_id: app.id,
                    contact_id: event.contact_id.map(|_| contact.id),
                    ..event.clone()
                },
            )?;
            written.statuses += 1;
        }
        written.companies += 1;
        written.contacts += 1;
        written.job_postings += 1;
        written.applications += 1;
    }
    Ok(written)
}

impl Database {
    /// Insert the plan on top of whatever is already stored. All-or-nothing.
    pub fn seed(&self, plan: &SeedPlan) -> Result<TableCounts> {
        let written = self.with_transaction(|tx| write_plan(tx, plan))?;
        info!(
            base_date = %plan.params.base_date,
            companies = written.companies,
            statuses = written.statuses,
            "seeded store"
        );
        Ok(written)
    }

    /// Wipe the store and seed it, as one transaction.
    pub fn reset_and_seed(&self, plan: &SeedPlan) -> Result<TableCounts> {
        let written = self.with_transaction(|tx| {
            db::clear_all(tx)?;
            write_plan(tx, plan)
        })?;
        info!(
            base_date = %plan.params.base_date,
            companies = written.companies,
            statuses = written.statuses,
            "reset and seeded store"
        );
        Ok(written)
    }
}
