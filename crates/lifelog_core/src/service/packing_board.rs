//! Packing board read model: bucket composition, reorder, and catalog merge.
//!
//! # Responsibility
//! - Compose a trip's rendering plan: one section per catalog category plus
//!   the derived "Other" bucket, with packed progress.
//! - Reorder one bucket after a drag-and-drop move without touching any
//!   other bucket's order indices.
//! - Instantiate trip items from selected catalog templates.
//!
//! # Invariants
//! - The board is recomputed on every read, never cached: category renames
//!   and deletions move items into/out of "Other" without any item write.
//! - "Other" holds exactly the items whose `category_name` matches no
//!   currently existing category.
//! - After a reorder, the reordered bucket's indices are dense `0..len`.
//! - Merging appends past the trip's current order-space maximum; the new
//!   items regroup into their buckets on the next read.

use crate::events::{notify, ChangeBus, ChangeEvent};
use crate::model::travel::{PackingCategory, PackingItem, TemplateId, TripId};
use crate::repo::catalog_repo::CatalogRepository;
use crate::repo::trip_repo::TripRepository;
use crate::repo::RepoResult;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::rc::Rc;

/// Identifies one bucket of a trip's packing list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BucketRef {
    /// Items carrying this exact category name.
    Category(String),
    /// Items whose category name matches no current catalog category.
    Other,
}

/// One rendered section of the board. Sections are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSection {
    /// The catalog category backing this section; `None` for "Other".
    pub category: Option<PackingCategory>,
    /// Items sorted by `order_index` ascending.
    pub items: Vec<PackingItem>,
}

/// Rendering plan for one trip's packing list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingBoard {
    pub sections: Vec<BoardSection>,
    pub packed_count: usize,
    pub total_count: usize,
}

impl PackingBoard {
    /// Packed fraction over the full trip item list; `0.0` when empty.
    pub fn progress(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        self.packed_count as f64 / self.total_count as f64
    }
}

/// Builds the board from a catalog snapshot and a trip's items.
///
/// `categories` must already be in catalog order (name ascending); sections
/// are emitted in that order, "Other" last.
pub fn compose_board(categories: &[PackingCategory], items: &[PackingItem]) -> PackingBoard {
    let packed_count = items.iter().filter(|item| item.is_packed).count();
    let mut sections = Vec::new();

    for category in categories {
        let bucket = sorted_bucket(items, |item| item.category_name == category.name);
        if !bucket.is_empty() {
            sections.push(BoardSection {
                category: Some(category.clone()),
                items: bucket,
            });
        }
    }

    let known: HashSet<&str> = categories
        .iter()
        .map(|category| category.name.as_str())
        .collect();
    let other = sorted_bucket(items, |item| !known.contains(item.category_name.as_str()));
    if !other.is_empty() {
        sections.push(BoardSection {
            category: None,
            items: other,
        });
    }

    PackingBoard {
        sections,
        packed_count,
        total_count: items.len(),
    }
}

fn sorted_bucket(items: &[PackingItem], keep: impl Fn(&PackingItem) -> bool) -> Vec<PackingItem> {
    let mut bucket: Vec<PackingItem> = items.iter().filter(|item| keep(item)).cloned().collect();
    bucket.sort_by_key(|item| item.order_index);
    bucket
}

/// Plans a drag-and-drop move within one bucket of `len` elements.
///
/// Removes the source positions (deduplicated; out-of-range positions are
/// ignored) preserving their relative order, then inserts them as one block
/// at `destination`, an index into the list after removal, clamped to append.
/// Returns the original positions in their new visit order, or `None` when
/// there is nothing to move.
pub fn plan_move(len: usize, sources: &[usize], destination: usize) -> Option<Vec<usize>> {
    let mut moving: Vec<usize> = sources
        .iter()
        .copied()
        .filter(|position| *position < len)
        .collect();
    moving.sort_unstable();
    moving.dedup();
    if moving.is_empty() {
        return None;
    }

    let moving_set: HashSet<usize> = moving.iter().copied().collect();
    let remaining: Vec<usize> = (0..len)
        .filter(|position| !moving_set.contains(position))
        .collect();

    let destination = destination.min(remaining.len());
    let mut order = Vec::with_capacity(len);
    order.extend_from_slice(&remaining[..destination]);
    order.extend_from_slice(&moving);
    order.extend_from_slice(&remaining[destination..]);
    Some(order)
}

/// Board service wiring the catalog and trip repositories together.
pub struct PackingBoardService<C: CatalogRepository, T: TripRepository> {
    catalog: C,
    trips: T,
    events: Option<Rc<ChangeBus>>,
}

impl<C: CatalogRepository, T: TripRepository> PackingBoardService<C, T> {
    pub fn new(catalog: C, trips: T) -> Self {
        Self {
            catalog,
            trips,
            events: None,
        }
    }

    /// Attaches a change bus; reorders and merges emit [`ChangeEvent::Trip`].
    pub fn with_events(catalog: C, trips: T, events: Rc<ChangeBus>) -> Self {
        Self {
            catalog,
            trips,
            events: Some(events),
        }
    }

    /// Current rendering plan for one trip. The catalog is read once per
    /// invocation, so the board is internally consistent.
    pub fn board_for_trip(&self, trip_id: TripId) -> RepoResult<PackingBoard> {
        let categories = self.catalog.list_categories()?;
        let items = self.trips.list_items(trip_id)?;
        Ok(compose_board(&categories, &items))
    }

    /// Packed progress for one trip; `0.0` for an empty (or missing) trip.
    pub fn progress_for_trip(&self, trip_id: TripId) -> RepoResult<f64> {
        let items = self.trips.list_items(trip_id)?;
        if items.is_empty() {
            return Ok(0.0);
        }
        let packed = items.iter().filter(|item| item.is_packed).count();
        Ok(packed as f64 / items.len() as f64)
    }

    /// Moves items within one bucket and rewrites that bucket's order
    /// indices to dense `0..len`. Every other bucket is left untouched.
    pub fn move_in_bucket(
        &self,
        trip_id: TripId,
        bucket: &BucketRef,
        sources: &[usize],
        destination: usize,
    ) -> RepoResult<()> {
        let items = self.trips.list_items(trip_id)?;
        let bucket_items = match bucket {
            BucketRef::Category(name) => {
                sorted_bucket(&items, |item| item.category_name == *name)
            }
            BucketRef::Other => {
                let known: HashSet<String> = self
                    .catalog
                    .list_categories()?
                    .into_iter()
                    .map(|category| category.name)
                    .collect();
                sorted_bucket(&items, |item| !known.contains(&item.category_name))
            }
        };

        let Some(order) = plan_move(bucket_items.len(), sources, destination) else {
            debug!("event=bucket_reorder module=travel status=noop trip={trip_id}");
            return Ok(());
        };

        let assignments: Vec<_> = order
            .iter()
            .enumerate()
            .map(|(position, original)| (bucket_items[*original].uuid, position as i64))
            .collect();
        self.trips.set_order_indices(&assignments)?;

        info!(
            "event=bucket_reorder module=travel status=ok trip={trip_id} moved={} bucket_len={}",
            sources.len(),
            bucket_items.len()
        );
        notify(&self.events, ChangeEvent::Trip(trip_id));
        Ok(())
    }

    /// Instantiates trip items from the selected catalog templates.
    ///
    /// Templates already represented in the trip by an exact
    /// `(name, category_name)` pair are skipped, as are templates without an
    /// owning category. Survivors are appended in catalog iteration order
    /// with order indices continuing past the trip's current item count.
    /// Returns the number of items added.
    pub fn merge_selection(
        &self,
        trip_id: TripId,
        selected: &HashSet<TemplateId>,
    ) -> RepoResult<u32> {
        if selected.is_empty() || self.trips.get_trip(trip_id)?.is_none() {
            return Ok(0);
        }

        let mut existing: HashSet<(String, String)> = self
            .trips
            .list_items(trip_id)?
            .into_iter()
            .map(|item| (item.name, item.category_name))
            .collect();

        let mut next_index = self.trips.count_items(trip_id)?;
        let mut added = 0u32;

        for entry in self.catalog.list_templates_with_categories()? {
            if !selected.contains(&entry.template.uuid) {
                continue;
            }
            let Some(category_name) = entry.category_name else {
                continue;
            };
            let key = (entry.template.name.clone(), category_name.clone());
            if existing.contains(&key) {
                continue;
            }

            let item = PackingItem::new(
                trip_id,
                entry.template.name,
                category_name,
                1,
                next_index,
            );
            self.trips.insert_item(&item)?;
            existing.insert(key);
            next_index += 1;
            added += 1;
        }

        if added > 0 {
            info!(
                "event=catalog_merge module=travel status=ok trip={trip_id} selected={} added={added}",
                selected.len()
            );
            notify(&self.events, ChangeEvent::Trip(trip_id));
        }
        Ok(added)
    }
}
