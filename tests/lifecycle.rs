use chrono::NaiveDate;
use jobtrack::seed::{follow_up_status, SeedParams, SeedPlan};
use jobtrack::{
    Database, NewApplication, NewApplicationStatus, NewCompany, NewContact, NewJobPosting,
    StatusType, StoreError, TableCounts,
};
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> Database {
    let db = Database::open(dir.path().join("jobtrack.db")).expect("open store");
    db.init().expect("init schema");
    db
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 4).expect("valid date")
}

/// Seeds `n` companies and returns the store.
fn seeded(dir: &TempDir, n: u32) -> Database {
    let db = open_store(dir);
    db.reset_and_seed(&SeedPlan::generate(SeedParams::new(base_date(), n)))
        .expect("seed");
    db
}

#[test]
fn seed_fifty_produces_expected_rows_and_timeline() {
    let dir = TempDir::new().expect("tempdir");
    let db = seeded(&dir, 50);

    assert_eq!(
        db.counts().expect("counts"),
        TableCounts {
            companies: 50,
            contacts: 50,
            job_postings: 50,
            applications: 50,
            statuses: 150,
        }
    );

    let history = db.status_history(1).expect("history");
    let statuses: Vec<StatusType> = history.iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        vec![StatusType::Saved, StatusType::Applied, follow_up_status(1 % 8)]
    );
    assert_eq!(statuses[2], StatusType::Interview);
    assert!(history[0].recorded_at < history[1].recorded_at);
    assert!(history[1].recorded_at < history[2].recorded_at);

    for app in db.list_applications(None).expect("applications") {
        let priority = app.priority.expect("seeded priority");
        assert!((1..=5).contains(&priority));
        let history = db.status_history(app.id).expect("history");
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].status, StatusType::Saved);
        assert_eq!(history[1].status, StatusType::Applied);
    }
}

#[test]
fn reset_then_seed_twice_yields_identical_rows() {
    let dir = TempDir::new().expect("tempdir");
    let db = seeded(&dir, 20);
    let first_companies = db.list_companies().expect("companies");
    let first_events = db.list_status_events(None).expect("events");

    let plan = SeedPlan::generate(SeedParams::new(base_date(), 20));
    db.reset_and_seed(&plan).expect("reseed");

    assert_eq!(db.list_companies().expect("companies"), first_companies);
    assert_eq!(db.list_status_events(None).expect("events"), first_events);
}

#[test]
fn deleting_company_removes_exactly_its_subtree() {
    let dir = TempDir::new().expect("tempdir");
    let db = seeded(&dir, 5);
    let before = db.counts().expect("counts");
    let target = db.get_company(3).expect("read").expect("company 3");
    let jobs = db.list_job_postings(Some(target.id)).expect("jobs");
    let apps: Vec<i64> = jobs
        .iter()
        .flat_map(|j| db.list_applications(Some(j.id)).expect("apps"))
        .map(|a| a.id)
        .collect();
    assert!(!apps.is_empty());

    assert!(db.delete_company(target.id).expect("delete"));

    let after = db.counts().expect("counts");
    assert_eq!(after.companies, before.companies - 1);
    assert_eq!(after.contacts, before.contacts - 1);
    assert_eq!(after.job_postings, before.job_postings - 1);
    assert_eq!(after.applications, before.applications - 1);
    assert_eq!(after.statuses, before.statuses - 3);

    assert!(db.list_contacts(Some(target.id)).expect("contacts").is_empty());
    for app_id in apps {
        assert!(db.get_application(app_id).expect("read").is_none());
        assert!(db.status_history(app_id).expect("history").is_empty());
    }
    // Neighbours are untouched.
    assert_eq!(db.status_history(2).expect("history").len(), 3);
    assert_eq!(db.status_history(4).expect("history").len(), 3);
}

#[test]
fn deleting_contact_clears_references_but_keeps_history() {
    let dir = TempDir::new().expect("tempdir");
    let db = seeded(&dir, 3);
    let history = db.status_history(2).expect("history");
    let contact_id = history[2].contact_id.expect("follow-up names a contact");

    assert!(db.delete_contact(contact_id).expect("delete"));

    let after = db.status_history(2).expect("history");
    assert_eq!(after.len(), 3);
    assert!(after.iter().all(|s| s.contact_id.is_none()));
    assert_eq!(after[2].status, history[2].status);
    assert_eq!(after[2].seq, history[2].seq);

    let view = db.get_status_event(after[2].id).expect("view").expect("event");
    assert!(view.contact.is_none());
    assert_eq!(view.company.id, 2);
}

#[test]
fn contact_for_missing_company_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let db = open_store(&dir);

    let err = db
        .create_contact(&NewContact {
            company_id: 9_999,
            full_name: "Orphan Person".to_string(),
            ..Default::default()
        })
        .expect_err("orphan contact");
    assert!(matches!(err, StoreError::ReferentialIntegrity(_)), "{err}");
    assert_eq!(db.counts().expect("counts"), TableCounts::default());
}

#[test]
fn duplicate_company_name_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let db = open_store(&dir);
    let acme = NewCompany {
        name: "Acme Corp".to_string(),
        website: Some("https://acme.example.com".to_string()),
        location: None,
    };

    let first = db.create_company(&acme).expect("first insert");
    let err = db.create_company(&acme).expect_err("second insert");
    assert!(matches!(err, StoreError::DuplicateKey(_)), "{err}");
    assert_eq!(db.list_companies().expect("companies"), vec![first]);
}

#[test]
fn priority_outside_range_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let db = open_store(&dir);
    let company = db
        .create_company(&NewCompany {
            name: "Initech".to_string(),
            ..Default::default()
        })
        .expect("company");
    let job = db
        .create_job_posting(&NewJobPosting {
            company_id: company.id,
            title: "Backend Engineer".to_string(),
            ..Default::default()
        })
        .expect("job");

    for priority in [0u8, 6] {
        let err = db
            .create_application(&NewApplication {
                job_id: job.id,
                priority: Some(priority),
                ..Default::default()
            })
            .expect_err("out of range");
        assert!(matches!(err, StoreError::DomainConstraint(_)), "{err}");
    }
    assert!(db.list_applications(None).expect("apps").is_empty());
}

#[test]
fn unknown_status_is_a_domain_error() {
    let err = "INTERVIEWING".parse::<StatusType>().expect_err("not in the set");
    assert!(matches!(err, StoreError::DomainConstraint(_)));
}

#[test]
fn status_for_missing_application_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let db = open_store(&dir);
    let err = db
        .append_status(&NewApplicationStatus {
            application_id: 1,
            contact_id: None,
            status: StatusType::Saved,
            recorded_at: None,
        })
        .expect_err("no such application");
    assert!(matches!(err, StoreError::ReferentialIntegrity(_)), "{err}");
}

#[test]
fn data_survives_reopen() {
    let dir = TempDir::new().expect("tempdir");
    {
        seeded(&dir, 4);
    }
    let db = Database::open(dir.path().join("jobtrack.db")).expect("reopen");
    db.ensure_initialized().expect("schema present");
    assert_eq!(db.path(), Some(dir.path().join("jobtrack.db").as_path()));
    assert_eq!(db.counts().expect("counts").statuses, 12);

    // Foreign keys are enforced on the new connection as well.
    let err = db
        .create_job_posting(&NewJobPosting {
            company_id: 500,
            title: "Nowhere".to_string(),
            ..Default::default()
        })
        .expect_err("missing company");
    assert!(matches!(err, StoreError::ReferentialIntegrity(_)));
}
