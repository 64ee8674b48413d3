//! Entry session controller
//!
//! One `EntrySession` drives a single patient entry through
//! lookup, compute and save. The derived results are cached in the session
//! between compute and save, and save is refused unless they were computed
//! from the values being saved.

use std::mem;

use chrono::NaiveDate;
use log::{debug, info};

use crate::algorithm::defaults::form_defaults;
use crate::algorithm::derived::{DerivedInputs, DerivedResults, compute_derived};
use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::models::entry::EntryForm;
use crate::models::record::PatientRecord;
use crate::store::{RecordStore, normalize_key};
use crate::utils::logging::log_store_warning;

/// The entry a session is working on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEntry {
    /// Normalized MRN
    pub key: String,
    /// First stored row for the MRN, if there was one
    pub prior: Option<PatientRecord>,
    /// Form defaults seeded from `prior`
    pub defaults: EntryForm,
}

/// Lifecycle state of an entry session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No MRN entered yet
    #[default]
    Empty,
    /// MRN entered and defaults loaded
    LookedUp(ActiveEntry),
    /// Derived fields calculated for the current values
    Computed {
        entry: ActiveEntry,
        inputs: DerivedInputs,
        results: DerivedResults,
    },
    /// A row was appended; the next lookup starts a new entry
    Saved { key: String, record: PatientRecord },
}

impl SessionState {
    /// Short name of the state, for logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::LookedUp(_) => "looked-up",
            Self::Computed { .. } => "computed",
            Self::Saved { .. } => "saved",
        }
    }
}

/// A single-user entry session over a record store
#[derive(Debug)]
pub struct EntrySession<S: RecordStore> {
    store: S,
    config: RegistryConfig,
    state: SessionState,
}

impl<S: RecordStore> EntrySession<S> {
    /// Start an empty session
    pub fn new(store: S, config: RegistryConfig) -> Self {
        Self {
            store,
            config,
            state: SessionState::Empty,
        }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the session, returning its store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Reference date used for age calculation
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.config.today()
    }

    /// MRN of the current entry
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match &self.state {
            SessionState::Empty => None,
            SessionState::LookedUp(entry) | SessionState::Computed { entry, .. } => {
                Some(entry.key.as_str())
            }
            SessionState::Saved { key, .. } => Some(key.as_str()),
        }
    }

    /// Defaults of the current lookup
    #[must_use]
    pub fn defaults(&self) -> Option<&EntryForm> {
        self.active().map(|entry| &entry.defaults)
    }

    /// Prior stored row of the current lookup
    #[must_use]
    pub fn prior(&self) -> Option<&PatientRecord> {
        self.active().and_then(|entry| entry.prior.as_ref())
    }

    /// Cached results of the last calculation
    #[must_use]
    pub fn results(&self) -> Option<&DerivedResults> {
        match &self.state {
            SessionState::Computed { results, .. } => Some(results),
            _ => None,
        }
    }

    fn active(&self) -> Option<&ActiveEntry> {
        match &self.state {
            SessionState::LookedUp(entry) | SessionState::Computed { entry, .. } => Some(entry),
            _ => None,
        }
    }

    /// Drop the current entry and any cached results
    pub fn reset(&mut self) {
        self.state = SessionState::Empty;
    }

    /// Enter an MRN, loading the prior row and seeding defaults
    ///
    /// Works from any state and discards cached results. A missing prior
    /// row is not an error, and neither is an unreadable store: both give
    /// the empty defaults. A blank MRN is rejected and leaves the session
    /// empty.
    pub fn lookup(&mut self, key: &str) -> Result<&EntryForm> {
        let key = normalize_key(key);
        if key.is_empty() {
            self.state = SessionState::Empty;
            return Err(Error::Validation("MRN is required".to_string()));
        }

        let prior = match self.store.find_by_key(&key) {
            Ok(prior) => prior,
            Err(e) => {
                log_store_warning(
                    self.store.location(),
                    &format!("unreadable, continuing without prior record ({e})"),
                );
                None
            }
        };
        if prior.is_some() {
            info!("Loaded prior record for MRN {key}");
        } else {
            info!("No prior record for MRN {key}");
        }

        let defaults = form_defaults(prior.as_ref(), self.today(), &self.config.date_format);
        self.state = SessionState::LookedUp(ActiveEntry {
            key,
            prior,
            defaults,
        });
        Ok(&self.active_entry()?.defaults)
    }

    /// Look up an MRN and return a copy of its defaults
    pub fn get_defaults(&mut self, key: &str) -> Result<EntryForm> {
        self.lookup(key).cloned()
    }

    fn active_entry(&self) -> Result<&ActiveEntry> {
        self.active().ok_or(Error::NoActiveEntry)
    }

    /// Calculate derived fields for the submitted values and cache them
    ///
    /// A failed calculation drops any earlier cached results.
    pub fn compute(&mut self, form: &EntryForm) -> Result<DerivedResults> {
        let entry = match mem::take(&mut self.state) {
            SessionState::LookedUp(entry) | SessionState::Computed { entry, .. } => entry,
            other => {
                self.state = other;
                return Err(Error::NoActiveEntry);
            }
        };

        let today = self.today();
        let inputs = DerivedInputs::from(form);
        let computed = form
            .validate(today)
            .and_then(|()| compute_derived(&inputs, today));

        match computed {
            Ok(results) => {
                debug!("Computed derived fields for MRN {}: {results:?}", entry.key);
                self.state = SessionState::Computed {
                    entry,
                    inputs,
                    results,
                };
                Ok(results)
            }
            Err(e) => {
                self.state = SessionState::LookedUp(entry);
                Err(e)
            }
        }
    }

    /// Append a row for the submitted values
    ///
    /// Requires a calculation made from the same dates and outcome flags.
    /// If the store cannot be written the session stays computed so the
    /// save can be retried.
    pub fn save(&mut self, form: &EntryForm) -> Result<PatientRecord> {
        let (entry, inputs, results) = match &self.state {
            SessionState::Empty => return Err(Error::NoActiveEntry),
            SessionState::LookedUp(_) | SessionState::Saved { .. } => {
                return Err(Error::SaveWithoutComputation);
            }
            SessionState::Computed {
                entry,
                inputs,
                results,
            } => (entry, *inputs, *results),
        };

        if DerivedInputs::from(form) != inputs {
            return Err(Error::ComputationOutdated);
        }
        form.validate(self.today())?;

        let key = entry.key.clone();
        let record = PatientRecord::from_entry(&key, form, &results);
        self.store.append(record.clone()).map_err(|e| match e {
            Error::StorageUnavailable { .. } => e,
            other => Error::storage_unavailable(self.store.location(), other),
        })?;

        info!("Saved entry for MRN {key} to {}", self.store.location());
        self.state = SessionState::Saved {
            key,
            record: record.clone(),
        };
        Ok(record)
    }
}
