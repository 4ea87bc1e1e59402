//! Catalog use-case service: the global packing pool.
//!
//! # Responsibility
//! - Category and template CRUD with input guards.
//! - Per-word capitalization of template names before storage.
//! - First-launch starter category seeding.
//!
//! # Invariants
//! - Name collisions are permitted; no dedup check on creation.
//! - Mutations on ids that no longer exist are no-ops, not failures.

use crate::events::{notify, ChangeBus, ChangeEvent};
use crate::model::travel::{CategoryId, MasterPackingItem, PackingCategory, TemplateId};
use crate::repo::catalog_repo::CatalogRepository;
use crate::repo::{RepoError, RepoResult};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Fixed starter set inserted on first launch.
const STARTER_CATEGORIES: &[(&str, &str)] = &[
    ("Hygiene", "cross.case.fill"),
    ("Camera", "camera.fill"),
    ("Border Control", "passport.fill"),
    ("Medicine", "pills.fill"),
    ("Hiking", "figure.hiking"),
    ("Clothings", "tshirt.fill"),
    ("Electronics", "laptopcomputer"),
];

/// Errors from catalog service operations.
#[derive(Debug)]
pub enum CatalogServiceError {
    /// Name is blank after trim.
    InvalidName,
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for CatalogServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "name must not be blank"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidName => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for CatalogServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

type CatalogResult<T> = Result<T, CatalogServiceError>;

/// Use-case service over the catalog repository.
pub struct CatalogService<R: CatalogRepository> {
    repo: R,
    events: Option<Rc<ChangeBus>>,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo, events: None }
    }

    /// Attaches a change bus; every successful mutation emits
    /// [`ChangeEvent::Catalog`].
    pub fn with_events(repo: R, events: Rc<ChangeBus>) -> Self {
        Self {
            repo,
            events: Some(events),
        }
    }

    /// Creates a category with the name exactly as given (no capitalization).
    pub fn create_category(
        &self,
        name: &str,
        icon: &str,
    ) -> CatalogResult<PackingCategory> {
        let name = non_blank(name)?;
        let category = PackingCategory::new(name, icon);
        self.repo.create_category(&category)?;
        notify(&self.events, ChangeEvent::Catalog);
        Ok(category)
    }

    /// Renames a category in place. No-op when the category is gone.
    pub fn rename_category(&self, id: CategoryId, name: &str) -> CatalogResult<()> {
        let name = non_blank(name)?;
        if self.repo.rename_category(id, name)? {
            notify(&self.events, ChangeEvent::Catalog);
        } else {
            debug!("event=category_rename module=catalog status=noop category={id}");
        }
        Ok(())
    }

    /// Deletes a category and, via cascade, all its templates.
    pub fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        if self.repo.delete_category(id)? {
            notify(&self.events, ChangeEvent::Catalog);
        }
        Ok(())
    }

    /// Adds a template under a category, capitalizing each word of the name.
    ///
    /// Returns `None` when the category no longer exists.
    pub fn add_template(
        &self,
        category_id: CategoryId,
        name: &str,
    ) -> CatalogResult<Option<MasterPackingItem>> {
        let name = non_blank(name)?;
        if self.repo.get_category(category_id)?.is_none() {
            debug!("event=template_add module=catalog status=noop category={category_id}");
            return Ok(None);
        }
        let template = MasterPackingItem::new(capitalize_words(name), Some(category_id));
        self.repo.create_template(&template)?;
        notify(&self.events, ChangeEvent::Catalog);
        Ok(Some(template))
    }

    /// Renames a template, applying the same capitalization rule as creation.
    pub fn rename_template(&self, id: TemplateId, name: &str) -> CatalogResult<()> {
        let name = non_blank(name)?;
        if self.repo.rename_template(id, &capitalize_words(name))? {
            notify(&self.events, ChangeEvent::Catalog);
        } else {
            debug!("event=template_rename module=catalog status=noop template={id}");
        }
        Ok(())
    }

    pub fn delete_template(&self, id: TemplateId) -> RepoResult<()> {
        if self.repo.delete_template(id)? {
            notify(&self.events, ChangeEvent::Catalog);
        }
        Ok(())
    }

    /// Categories in catalog order (name ascending, case-sensitive).
    pub fn list_categories(&self) -> RepoResult<Vec<PackingCategory>> {
        self.repo.list_categories()
    }

    /// One category's templates in creation order.
    pub fn list_templates(&self, category_id: CategoryId) -> RepoResult<Vec<MasterPackingItem>> {
        self.repo.list_templates(category_id)
    }

    /// Inserts the fixed starter categories when the catalog is empty.
    ///
    /// The trigger is count-based, matching the shipped behavior: a user who
    /// deletes every category gets the starter set back on next launch.
    /// Returns the number of categories inserted (0 when already seeded).
    pub fn seed_starter_categories(&self) -> RepoResult<u32> {
        if self.repo.count_categories()? > 0 {
            return Ok(0);
        }
        for (name, icon) in STARTER_CATEGORIES {
            self.repo
                .create_category(&PackingCategory::new(*name, *icon))?;
        }
        info!(
            "event=catalog_seed module=catalog status=ok count={}",
            STARTER_CATEGORIES.len()
        );
        notify(&self.events, ChangeEvent::Catalog);
        Ok(STARTER_CATEGORIES.len() as u32)
    }
}

fn non_blank(name: &str) -> Result<&str, CatalogServiceError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CatalogServiceError::InvalidName);
    }
    Ok(trimmed)
}

/// Uppercases the first letter of each word and lowercases the rest.
fn capitalize_words(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = !ch.is_numeric();
        }
    }
    out
}
