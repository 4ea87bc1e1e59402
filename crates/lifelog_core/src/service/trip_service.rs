//! Trip use-case service: trip CRUD and per-item packing operations.
//!
//! # Invariants
//! - Blank destinations/names and inverted date ranges are rejected before
//!   any write; the UI disables such actions, the core still guards.
//! - `quantity` updates with a non-positive value are rejected and leave the
//!   stored value unchanged.
//! - Mutations on ids that no longer exist are no-ops, not failures.

use crate::events::{notify, ChangeBus, ChangeEvent};
use crate::model::travel::{PackingItem, PackingItemId, Trip, TripId};
use crate::repo::trip_repo::TripRepository;
use crate::repo::{RepoError, RepoResult};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Errors from trip service operations.
#[derive(Debug)]
pub enum TripServiceError {
    /// Destination or item name is blank after trim.
    InvalidName,
    /// `end_date` precedes `start_date`.
    InvalidDateRange { start: i64, end: i64 },
    /// Quantity must be at least 1.
    InvalidQuantity(i64),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for TripServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "name must not be blank"),
            Self::InvalidDateRange { start, end } => {
                write!(f, "end date {end} precedes start date {start}")
            }
            Self::InvalidQuantity(value) => write!(f, "quantity must be positive, got {value}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TripServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TripServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

type TripResult<T> = Result<T, TripServiceError>;

/// Patch for `update_trip`; `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct TripUpdate {
    pub destination: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
}

/// Use-case service over the trip repository.
pub struct TripService<R: TripRepository> {
    repo: R,
    events: Option<Rc<ChangeBus>>,
}

impl<R: TripRepository> TripService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo, events: None }
    }

    /// Attaches a change bus; mutations emit [`ChangeEvent::Trip`].
    pub fn with_events(repo: R, events: Rc<ChangeBus>) -> Self {
        Self {
            repo,
            events: Some(events),
        }
    }

    pub fn create_trip(&self, destination: &str, start: i64, end: i64) -> TripResult<Trip> {
        let destination = non_blank(destination)?;
        check_date_range(start, end)?;
        let trip = Trip::new(destination, start, end);
        self.repo.create_trip(&trip)?;
        notify(&self.events, ChangeEvent::Trip(trip.uuid));
        Ok(trip)
    }

    /// Applies a partial update. No-op when the trip no longer exists.
    pub fn update_trip(&self, id: TripId, update: TripUpdate) -> TripResult<()> {
        let Some(mut trip) = self.repo.get_trip(id)? else {
            debug!("event=trip_update module=travel status=noop trip={id}");
            return Ok(());
        };
        if let Some(destination) = update.destination {
            trip.destination = non_blank(&destination)?.to_string();
        }
        if let Some(start) = update.start_date {
            trip.start_date = start;
        }
        if let Some(end) = update.end_date {
            trip.end_date = end;
        }
        check_date_range(trip.start_date, trip.end_date)?;
        if self.repo.update_trip(&trip)? {
            notify(&self.events, ChangeEvent::Trip(id));
        }
        Ok(())
    }

    /// Deletes a trip and, via cascade, all its packing items.
    pub fn delete_trip(&self, id: TripId) -> RepoResult<()> {
        if self.repo.delete_trip(id)? {
            notify(&self.events, ChangeEvent::Trip(id));
        }
        Ok(())
    }

    pub fn get_trip(&self, id: TripId) -> RepoResult<Option<Trip>> {
        self.repo.get_trip(id)
    }

    /// All trips sorted by start date ascending.
    pub fn list_trips(&self) -> RepoResult<Vec<Trip>> {
        self.repo.list_trips()
    }

    /// Splits trips into (upcoming, past) around `now_ms`. A trip is past
    /// once its end date has gone by.
    pub fn split_by_date(&self, now_ms: i64) -> RepoResult<(Vec<Trip>, Vec<Trip>)> {
        let (upcoming, past) = self
            .repo
            .list_trips()?
            .into_iter()
            .partition(|trip| trip.end_date >= now_ms);
        Ok((upcoming, past))
    }

    /// Adds a manual item to the trip, unpacked, appended to the end of the
    /// trip's order space.
    pub fn add_item(
        &self,
        trip_id: TripId,
        name: &str,
        category_name: &str,
        quantity: i64,
    ) -> TripResult<Option<PackingItem>> {
        let name = non_blank(name)?;
        if quantity <= 0 {
            return Err(TripServiceError::InvalidQuantity(quantity));
        }
        if self.repo.get_trip(trip_id)?.is_none() {
            debug!("event=item_add module=travel status=noop trip={trip_id}");
            return Ok(None);
        }
        let order_index = self.repo.count_items(trip_id)?;
        let item = PackingItem::new(trip_id, name, category_name, quantity, order_index);
        self.repo.insert_item(&item)?;
        notify(&self.events, ChangeEvent::Trip(trip_id));
        Ok(Some(item))
    }

    /// Flips an item's packed flag. No-op when the item is gone.
    pub fn toggle_packed(&self, id: PackingItemId) -> RepoResult<()> {
        if let Some(item) = self.repo.get_item(id)? {
            self.repo.toggle_packed(id)?;
            notify(&self.events, ChangeEvent::Trip(item.trip_uuid));
        }
        Ok(())
    }

    /// Sets an item's quantity. Rejects non-positive values, leaving the
    /// stored quantity unchanged. No-op when the item is gone.
    pub fn set_quantity(&self, id: PackingItemId, quantity: i64) -> TripResult<()> {
        if quantity <= 0 {
            return Err(TripServiceError::InvalidQuantity(quantity));
        }
        if let Some(item) = self.repo.get_item(id)? {
            self.repo.set_quantity(id, quantity)?;
            notify(&self.events, ChangeEvent::Trip(item.trip_uuid));
        }
        Ok(())
    }

    pub fn delete_item(&self, id: PackingItemId) -> RepoResult<()> {
        if let Some(item) = self.repo.get_item(id)? {
            self.repo.delete_item(id)?;
            notify(&self.events, ChangeEvent::Trip(item.trip_uuid));
        }
        Ok(())
    }
}

fn non_blank(value: &str) -> Result<&str, TripServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TripServiceError::InvalidName);
    }
    Ok(trimmed)
}

fn check_date_range(start: i64, end: i64) -> Result<(), TripServiceError> {
    if end < start {
        return Err(TripServiceError::InvalidDateRange { start, end });
    }
    Ok(())
}
