//! Dashboard view state.
//!
//! Everything the dashboard does happens here, locally: form editing,
//! inline edit, sorting, date filtering and pagination. Each mutation
//! returns the complete collection, which the caller uploads as a full
//! replace.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tracing::debug;

use crate::error::{Error, Result};
use crate::record::{DayZone, Device, Record};

/// Default table rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Client-side dashboard state.
#[derive(Debug, Clone)]
pub struct Dashboard {
    records: Vec<Record>,
    devices: Vec<Device>,
    form: Record,
    editing: Option<i64>,
    current_page: usize,
    date_filter: Option<NaiveDate>,
    sorted: bool,
    page_size: usize,
    zone: DayZone,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Dashboard {
    /// An empty dashboard placing records on days in the machine's zone.
    ///
    /// A `page_size` of 0 is treated as 1.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            devices: Vec::new(),
            form: Record::blank(Utc::now()),
            editing: None,
            current_page: 1,
            date_filter: None,
            sorted: false,
            page_size: page_size.max(1),
            zone: DayZone::Local,
        }
    }

    /// Use a fixed `offset` when deciding which calendar day a record
    /// falls on.
    #[must_use]
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.zone = DayZone::Fixed(offset);
        self
    }

    /// Replace local state with freshly fetched lists, newest first.
    pub fn load(&mut self, records: Vec<Record>, devices: Vec<Device>) {
        self.records = records;
        sort_newest_first(&mut self.records);
        self.devices = devices;
        debug!(
            "Loaded {} records and {} devices",
            self.records.len(),
            self.devices.len()
        );
    }

    /// All records in display order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The device vocabulary.
    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// The form draft.
    #[must_use]
    pub fn form(&self) -> &Record {
        &self.form
    }

    /// Id of the record under edit, if any.
    #[must_use]
    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    /// Whether the sort toggle is on.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Zone used for calendar-day comparisons.
    #[must_use]
    pub fn zone(&self) -> DayZone {
        self.zone
    }

    /// Set a text field of the draft.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] for a field the draft doesn't have.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        self.form.set_field(field, value)
    }

    /// Set the draft's date.
    pub fn set_form_date(&mut self, date: DateTime<Utc>) {
        self.form.date = date;
    }

    /// Add the draft as a new record at the top of the list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EditInProgress`] while an inline edit is open and
    /// [`Error::IdSpaceExhausted`] when the largest id is `i64::MAX`. The
    /// draft is kept on error.
    pub fn add(&mut self) -> Result<&[Record]> {
        if let Some(id) = self.editing {
            return Err(Error::EditInProgress { id });
        }

        let id = self.next_id()?;
        let mut record = std::mem::replace(&mut self.form, Record::blank(Utc::now()));
        record.id = id;
        debug!("Adding record {}", record.id);
        self.records.insert(0, record);
        Ok(&self.records)
    }

    /// Load a record into the draft for inline editing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EditInProgress`] if another edit is open and
    /// [`Error::RecordNotFound`] if no record has `id`.
    pub fn begin_edit(&mut self, id: i64) -> Result<()> {
        if let Some(open) = self.editing {
            return Err(Error::EditInProgress { id: open });
        }
        let record = self
            .records
            .iter()
            .find(|r| r.id == id)
            .ok_or(Error::RecordNotFound { id })?;
        self.form = record.clone();
        self.editing = Some(id);
        Ok(())
    }

    /// Write the draft over the record under edit and close the edit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotEditing`] if no edit is open.
    pub fn save(&mut self) -> Result<&[Record]> {
        let id = self.editing.ok_or(Error::NotEditing)?;
        let mut updated = std::mem::replace(&mut self.form, Record::blank(Utc::now()));
        updated.id = id;

        for record in self.records.iter_mut().filter(|r| r.id == id) {
            *record = updated.clone();
        }
        self.editing = None;
        debug!("Saved record {id}");
        Ok(&self.records)
    }

    /// Close the edit without saving and reset the draft.
    pub fn cancel(&mut self) {
        self.editing = None;
        self.form = Record::blank(Utc::now());
    }

    /// Remove every record with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EditInProgress`] while an edit is open and
    /// [`Error::RecordNotFound`] if no record has `id`.
    pub fn delete(&mut self, id: i64) -> Result<&[Record]> {
        if let Some(open) = self.editing {
            return Err(Error::EditInProgress { id: open });
        }
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return Err(Error::RecordNotFound { id });
        }
        debug!("Deleted record {id}");
        Ok(&self.records)
    }

    /// Re-sort newest first and flip the sort toggle.
    pub fn sort_by_date(&mut self) {
        sort_newest_first(&mut self.records);
        self.sorted = !self.sorted;
    }

    /// Show only records from `date`, or everything for `None`.
    pub fn set_date_filter(&mut self, date: Option<NaiveDate>) {
        self.date_filter = date;
    }

    /// Drop the date filter.
    pub fn clear_filter(&mut self) {
        self.date_filter = None;
    }

    /// The active date filter.
    #[must_use]
    pub fn date_filter(&self) -> Option<NaiveDate> {
        self.date_filter
    }

    /// Records passing the date filter, in display order.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Record> {
        match self.date_filter {
            Some(day) => self
                .records
                .iter()
                .filter(|r| r.local_date(self.zone) == day)
                .collect(),
            None => self.records.iter().collect(),
        }
    }

    /// Number of pages in the filtered view.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.filtered().len().div_ceil(self.page_size)
    }

    /// Rows per page.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The current 1-based page.
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Jump to a 1-based page. Page 0 is treated as page 1.
    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    /// Rows of the current page; empty when the page is past the end.
    #[must_use]
    pub fn current_page_records(&self) -> Vec<&Record> {
        let start = (self.current_page - 1).saturating_mul(self.page_size);
        self.filtered()
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect()
    }

    fn next_id(&self) -> Result<i64> {
        let max = self.records.iter().map(|r| r.id).max().unwrap_or(0);
        max.checked_add(1).ok_or(Error::IdSpaceExhausted { max })
    }
}

fn sort_newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| b.date.cmp(&a.date));
}
