use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, TimeZone, Utc};

use crate::catalog::CategoryCatalog;
use crate::error::{StoreError, ValidationError};
use crate::types::{Complaint, ComplaintStatus, NewComplaint, SUBMITTER_PLACEHOLDER};

/// Source of creation timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// A stored complaint. Everything except the status is fixed at creation, so
/// only the status sits behind its own lock.
struct Record {
    id: String,
    title: String,
    description: String,
    category: String,
    submitter: String,
    submitted_at: DateTime<Utc>,
    status: Mutex<ComplaintStatus>,
}

impl Record {
    fn from_complaint(complaint: Complaint) -> Self {
        Self {
            id: complaint.id,
            title: complaint.title,
            description: complaint.description,
            category: complaint.category,
            submitter: complaint.submitter,
            submitted_at: complaint.submitted_at,
            status: Mutex::new(complaint.status),
        }
    }

    fn status(&self) -> MutexGuard<'_, ComplaintStatus> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self) -> Complaint {
        let status = *self.status();
        self.snapshot_with(status)
    }

    fn snapshot_with(&self, status: ComplaintStatus) -> Complaint {
        Complaint {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            submitter: self.submitter.clone(),
            status,
            submitted_at: self.submitted_at,
        }
    }
}

#[derive(Default)]
struct Inner {
    records: Vec<Record>,
    index: HashMap<String, usize>,
    counter: u64,
}

impl Inner {
    fn push(&mut self, record: Record) {
        self.index.insert(record.id.clone(), self.records.len());
        self.records.push(record);
    }

    fn find(&self, id: &str) -> Option<&Record> {
        self.index.get(id).map(|&position| &self.records[position])
    }
}

/// In-memory, append-only complaint collection shared by all request handlers.
///
/// Creation holds the write lock for the whole increment-build-append step, so
/// identifiers are handed out in list order without gaps. Status updates only
/// need the read lock plus the target record's mutex.
pub struct ComplaintStore {
    catalog: CategoryCatalog,
    inner: RwLock<Inner>,
    clock: Clock,
}

impl ComplaintStore {
    /// Creates a store holding the three startup complaints.
    pub fn new() -> Self {
        Self::with_complaints(seed_complaints())
    }

    /// Creates a store with no complaints and the id counter at zero.
    pub fn empty() -> Self {
        Self::with_complaints(Vec::new())
    }

    fn with_complaints(complaints: Vec<Complaint>) -> Self {
        let mut inner = Inner {
            counter: complaints.len() as u64,
            ..Inner::default()
        };
        for complaint in complaints {
            inner.push(Record::from_complaint(complaint));
        }

        Self {
            catalog: CategoryCatalog::new(),
            inner: RwLock::new(inner),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns complaints in creation order, optionally keeping only those
    /// whose status matches `filter_status` case-insensitively.
    ///
    /// An empty filter behaves like no filter; unknown values match nothing.
    pub fn list(&self, filter_status: Option<&str>) -> Vec<Complaint> {
        let inner = self.read();
        match filter_status.filter(|value| !value.is_empty()) {
            None => inner.records.iter().map(Record::snapshot).collect(),
            Some(filter) => inner
                .records
                .iter()
                .filter_map(|record| {
                    let status = *record.status();
                    status
                        .matches_filter(filter)
                        .then(|| record.snapshot_with(status))
                })
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<Complaint> {
        self.read().find(id).map(Record::snapshot)
    }

    /// Validates and appends a new complaint, assigning the next `cNNN` id.
    ///
    /// The category is checked against the catalog ignoring case but stored
    /// exactly as submitted.
    pub fn create(&self, request: NewComplaint) -> Result<Complaint, StoreError> {
        let title = required(request.title, "title")?;
        let description = required(request.description, "description")?;
        let category = required(request.category, "category")?;

        if !self.catalog.exists(&category) {
            return Err(ValidationError::UnknownCategory(category).into());
        }

        let mut inner = self.write();
        inner.counter += 1;
        let complaint = Complaint {
            id: format_id(inner.counter),
            title,
            description,
            category,
            submitter: SUBMITTER_PLACEHOLDER.to_string(),
            status: ComplaintStatus::Pending,
            submitted_at: (self.clock)(),
        };
        inner.push(Record::from_complaint(complaint.clone()));

        Ok(complaint)
    }

    /// Replaces the status of the complaint with the given id.
    ///
    /// The status must exactly match one of the wire names. Any status may
    /// follow any other, including itself.
    pub fn update_status(
        &self,
        id: &str,
        new_status: Option<&str>,
    ) -> Result<Complaint, StoreError> {
        let raw = new_status
            .filter(|value| !value.is_empty())
            .ok_or(ValidationError::MissingField("status"))?;
        let status: ComplaintStatus = raw.parse()?;

        let inner = self.read();
        let record = inner
            .find(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut current = record.status();
        *current = status;
        Ok(record.snapshot_with(status))
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ComplaintStore {
    fn default() -> Self {
        Self::new()
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value
        .filter(|value| !value.is_empty())
        .ok_or(ValidationError::MissingField(field))
}

fn format_id(counter: u64) -> String {
    format!("c{counter:03}")
}

fn seed_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("seed timestamps are valid UTC instants")
}

fn seed_complaints() -> Vec<Complaint> {
    let seed = |id: &str,
                title: &str,
                description: &str,
                category: &str,
                submitter: &str,
                status: ComplaintStatus,
                submitted_at: DateTime<Utc>| Complaint {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        submitter: submitter.to_string(),
        status,
        submitted_at,
    };

    vec![
        seed(
            "c001",
            "Internet Disconnection",
            "My internet keeps dropping.",
            "Technical Support",
            "user123",
            ComplaintStatus::Pending,
            seed_time(2023, 10, 26, 10, 0),
        ),
        seed(
            "c002",
            "Incorrect Charge on Bill",
            "I was charged twice this month.",
            "Billing Inquiry",
            "jane_doe",
            ComplaintStatus::Resolved,
            seed_time(2023, 10, 25, 14, 30),
        ),
        seed(
            "c003",
            "Website UI Improvement",
            "The navigation is confusing.",
            "Feature Request",
            "admin",
            ComplaintStatus::InProgress,
            seed_time(2023, 10, 24, 9, 15),
        ),
    ]
}
