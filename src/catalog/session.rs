//! Per-view catalog cache with single-flight fetches.
//!
//! A session lives as long as the view that owns it. Each catalog kind has at
//! most one fetch in flight; finished catalogs are cached until the session
//! closes. Closing invalidates every outstanding ticket, so a fetch that
//! completes after the view is gone is dropped instead of stored.

use crate::catalog::error::LoadError;
use crate::catalog::identity::CatalogKind;
use crate::catalog::index::CatalogIndex;
use crate::catalog::loader::load_catalog_from_path;
use crate::catalog::model::Catalog;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug)]
enum Slot {
    InFlight { ticket: u64 },
    Ready(Arc<Catalog>),
}

/// Proof of an in-flight fetch; hand it back to `complete`.
#[derive(Debug)]
#[must_use = "an unfinished ticket leaves its catalog marked in flight"]
pub struct FetchTicket {
    kind: CatalogKind,
    id: u64,
}

impl FetchTicket {
    pub fn kind(&self) -> CatalogKind {
        self.kind
    }
}

#[derive(Debug)]
pub enum FetchStart {
    /// Caller should fetch and then call `complete` with this ticket.
    Started(FetchTicket),
    /// Another fetch for this kind is already running.
    Pending,
    Cached(Arc<Catalog>),
    Closed,
}

#[derive(Debug)]
pub enum Completion {
    Stored(Arc<Catalog>),
    Failed(LoadError),
    /// The session closed or the ticket is stale; the result was dropped.
    Discarded,
}

#[derive(Debug, Default)]
pub struct CatalogSession {
    slots: BTreeMap<CatalogKind, Slot>,
    next_ticket: u64,
    closed: bool,
}

impl CatalogSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, kind: CatalogKind) -> FetchStart {
        if self.closed {
            return FetchStart::Closed;
        }
        match self.slots.get(&kind) {
            Some(Slot::Ready(catalog)) => FetchStart::Cached(Arc::clone(catalog)),
            Some(Slot::InFlight { .. }) => FetchStart::Pending,
            None => {
                self.next_ticket += 1;
                let id = self.next_ticket;
                self.slots.insert(kind, Slot::InFlight { ticket: id });
                debug!(kind = %kind, ticket = id, "catalog fetch started");
                FetchStart::Started(FetchTicket { kind, id })
            }
        }
    }

    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Catalog, LoadError>,
    ) -> Completion {
        let FetchTicket { kind, id } = ticket;
        let current = matches!(
            self.slots.get(&kind),
            Some(Slot::InFlight { ticket }) if *ticket == id
        );
        if self.closed || !current {
            debug!(kind = %kind, ticket = id, "discarding catalog fetch for closed session");
            return Completion::Discarded;
        }

        match result {
            Ok(catalog) => {
                let catalog = Arc::new(catalog);
                self.slots.insert(kind, Slot::Ready(Arc::clone(&catalog)));
                Completion::Stored(catalog)
            }
            Err(err) => {
                // Free the slot so a later attempt can retry.
                self.slots.remove(&kind);
                error!(kind = %kind, error = %err, "catalog load failed");
                Completion::Failed(err)
            }
        }
    }

    /// Run `fetch` under single-flight rules.
    ///
    /// Returns `Ok(None)` when nothing was stored: another fetch is pending,
    /// the session is closed, or the result arrived after closing.
    pub fn load_with<F>(
        &mut self,
        kind: CatalogKind,
        fetch: F,
    ) -> Result<Option<Arc<Catalog>>, LoadError>
    where
        F: FnOnce() -> Result<Catalog, LoadError>,
    {
        let ticket = match self.begin(kind) {
            FetchStart::Started(ticket) => ticket,
            FetchStart::Cached(catalog) => return Ok(Some(catalog)),
            FetchStart::Pending | FetchStart::Closed => return Ok(None),
        };
        match self.complete(ticket, fetch()) {
            Completion::Stored(catalog) => Ok(Some(catalog)),
            Completion::Failed(err) => Err(err),
            Completion::Discarded => Ok(None),
        }
    }

    pub fn load_from_path(
        &mut self,
        kind: CatalogKind,
        path: &Path,
    ) -> Result<Option<Arc<Catalog>>, LoadError> {
        self.load_with(kind, || load_catalog_from_path(kind, path))
    }

    pub fn get(&self, kind: CatalogKind) -> Option<Arc<Catalog>> {
        match self.slots.get(&kind) {
            Some(Slot::Ready(catalog)) => Some(Arc::clone(catalog)),
            _ => None,
        }
    }

    pub fn is_in_flight(&self, kind: CatalogKind) -> bool {
        matches!(self.slots.get(&kind), Some(Slot::InFlight { .. }))
    }

    /// Searchable view over every catalog loaded so far.
    pub fn index(&self) -> CatalogIndex {
        let ready: Vec<Arc<Catalog>> = self
            .slots
            .values()
            .filter_map(|slot| match slot {
                Slot::Ready(catalog) => Some(Arc::clone(catalog)),
                Slot::InFlight { .. } => None,
            })
            .collect();
        CatalogIndex::from_catalogs(ready.iter().map(|catalog| catalog.as_ref()))
    }

    /// Tear down the session: drop cached catalogs and orphan in-flight tickets.
    pub fn close(&mut self) {
        self.closed = true;
        self.slots.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_catalog;

    const RESOURCES: &str = "id,title,description,category,link\nr1,Zotero,,Research,zotero.org\n";

    fn resources() -> Result<Catalog, LoadError> {
        parse_catalog(CatalogKind::Resources, RESOURCES)
    }

    #[test]
    fn second_begin_while_in_flight_is_pending() {
        let mut session = CatalogSession::new();
        let FetchStart::Started(ticket) = session.begin(CatalogKind::Resources) else {
            panic!("first fetch should start");
        };
        assert!(matches!(
            session.begin(CatalogKind::Resources),
            FetchStart::Pending
        ));
        assert!(session.is_in_flight(CatalogKind::Resources));
        // Other kinds are independent.
        assert!(matches!(
            session.begin(CatalogKind::Perks),
            FetchStart::Started(_)
        ));

        assert!(matches!(
            session.complete(ticket, resources()),
            Completion::Stored(_)
        ));
        assert!(matches!(
            session.begin(CatalogKind::Resources),
            FetchStart::Cached(_)
        ));
    }

    #[test]
    fn completion_after_close_is_discarded() {
        let mut session = CatalogSession::new();
        let FetchStart::Started(ticket) = session.begin(CatalogKind::Resources) else {
            panic!("fetch should start");
        };
        session.close();
        assert!(matches!(
            session.complete(ticket, resources()),
            Completion::Discarded
        ));
        assert!(session.get(CatalogKind::Resources).is_none());
        assert!(matches!(
            session.begin(CatalogKind::Resources),
            FetchStart::Closed
        ));
        assert!(session.index().is_empty());
    }

    #[test]
    fn failed_fetch_frees_slot_for_retry() {
        let mut session = CatalogSession::new();
        let err = session
            .load_with(CatalogKind::Resources, || {
                parse_catalog(CatalogKind::Resources, "id,title\n")
            })
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingColumns { .. }));
        assert!(!session.is_in_flight(CatalogKind::Resources));

        let loaded = session
            .load_with(CatalogKind::Resources, resources)
            .unwrap()
            .expect("stored");
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn cached_catalog_skips_refetch() {
        let mut session = CatalogSession::new();
        session
            .load_with(CatalogKind::Resources, resources)
            .unwrap();
        let mut fetched_again = false;
        let cached = session
            .load_with(CatalogKind::Resources, || {
                fetched_again = true;
                resources()
            })
            .unwrap();
        assert!(cached.is_some());
        assert!(!fetched_again);
        assert_eq!(session.index().len(), 1);
    }
}
