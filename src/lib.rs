//! Job application tracker: companies, contacts, postings, applications and
//! per-application status timelines on an embedded SQLite store, plus a
//! deterministic demo-data generator.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod seed;

pub use db::Database;
pub use error::{Result, StoreError};
pub use models::{
    Application, ApplicationStatus, Company, Contact, JobPosting, NewApplication,
    NewApplicationStatus, NewCompany, NewContact, NewJobPosting, StatusEvent, StatusType,
    TableCounts,
};
pub use seed::{SeedParams, SeedPlan};
