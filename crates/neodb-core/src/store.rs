//! NeoDatabase - linked in-memory store of NEOs and close approaches
//!
//! Construction indexes NEOs by designation and by name, then links every
//! close approach to its NEO in a single pass. Links are positions into the
//! store's own vectors ([`NeoId`], [`ApproachId`]), so navigation is O(1) in
//! both directions without reference cycles. After construction the store is
//! immutable and every read goes through borrowed views ([`NeoRef`],
//! [`ApproachRef`]).

use std::collections::HashMap;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::Deref;

use tracing::{debug, warn};

use crate::error::DatabaseError;
use crate::filter::AttributeFilter;
use crate::model::{ApproachId, ApproachRecord, CloseApproach, NearEarthObject, NeoId, NeoRecord};

/// Linked collection of NEOs and their close approaches
#[derive(Debug, Clone)]
pub struct NeoDatabase {
    neos: Vec<NearEarthObject>,
    approaches: Vec<CloseApproach>,
    by_designation: HashMap<String, NeoId>,
    by_name: HashMap<String, NeoId>,
}

impl NeoDatabase {
    /// Index `neos` and link every approach to its NEO
    ///
    /// Fails on the first approach whose designation matches no NEO. A later
    /// NEO with a duplicate designation or name replaces the earlier one in
    /// the index.
    pub fn new(
        neos: impl IntoIterator<Item = NearEarthObject>,
        approaches: impl IntoIterator<Item = CloseApproach>,
    ) -> Result<Self, DatabaseError> {
        let mut neos: Vec<NearEarthObject> = neos.into_iter().collect();
        let mut approaches: Vec<CloseApproach> = approaches.into_iter().collect();

        let mut by_designation = HashMap::with_capacity(neos.len());
        let mut by_name = HashMap::new();

        for (idx, neo) in neos.iter().enumerate() {
            let id = NeoId(idx);
            if by_designation.insert(neo.designation().to_string(), id).is_some() {
                warn!("Duplicate designation '{}' replaces earlier NEO", neo.designation());
            }
            if let Some(name) = neo.name() {
                if by_name.insert(name.to_string(), id).is_some() {
                    warn!("Duplicate name '{}' replaces earlier NEO", name);
                }
            }
        }

        for (idx, approach) in approaches.iter_mut().enumerate() {
            let neo_id = *by_designation.get(approach.designation()).ok_or_else(|| {
                DatabaseError::UnlinkableApproach {
                    designation: approach.designation().to_string(),
                    index: idx,
                }
            })?;
            approach.neo = Some(neo_id);
            neos[neo_id.0].approaches.push(ApproachId(idx));
        }

        debug!(
            "Linked {} close approaches to {} NEOs ({} named)",
            approaches.len(),
            neos.len(),
            by_name.len()
        );

        Ok(Self {
            neos,
            approaches,
            by_designation,
            by_name,
        })
    }

    /// Normalize raw loader rows and build the database
    pub fn from_records(
        neos: impl IntoIterator<Item = NeoRecord>,
        approaches: impl IntoIterator<Item = ApproachRecord>,
    ) -> Result<Self, DatabaseError> {
        let approaches = approaches
            .into_iter()
            .map(CloseApproach::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(neos.into_iter().map(NearEarthObject::from_record), approaches)
    }

    pub fn neo_count(&self) -> usize {
        self.neos.len()
    }

    pub fn approach_count(&self) -> usize {
        self.approaches.len()
    }

    /// Exact, case-sensitive designation lookup
    pub fn get_neo_by_designation(&self, designation: &str) -> Option<NeoRef<'_>> {
        self.by_designation.get(designation).and_then(|&id| self.neo(id))
    }

    /// Exact, case-sensitive name lookup
    ///
    /// No NEO is indexed under the empty string or `None`, so both miss.
    pub fn get_neo_by_name<'q>(&self, name: impl Into<Option<&'q str>>) -> Option<NeoRef<'_>> {
        let name = name.into().filter(|n| !n.is_empty())?;
        self.by_name.get(name).and_then(|&id| self.neo(id))
    }

    pub fn neo(&self, id: NeoId) -> Option<NeoRef<'_>> {
        let neo = self.neos.get(id.0)?;
        Some(NeoRef { db: self, neo })
    }

    pub fn approach(&self, id: ApproachId) -> Option<ApproachRef<'_>> {
        self.link(self.approaches.get(id.0)?)
    }

    /// Every NEO in load order
    pub fn neos(&self) -> impl Iterator<Item = NeoRef<'_>> + '_ {
        self.neos.iter().map(move |neo| NeoRef { db: self, neo })
    }

    /// Lazily yield the approaches that satisfy every filter, in load order
    ///
    /// An empty filter list yields every approach. Filters are tested in
    /// order and stop at the first failure; nothing past the last pulled
    /// item is evaluated.
    pub fn query<'a, 'f>(&'a self, filters: &'f [AttributeFilter]) -> Query<'a, 'f> {
        Query {
            db: self,
            filters,
            approaches: self.approaches.iter(),
        }
    }

    /// Every stored approach is linked, so this only misses for foreign ids
    fn link<'a>(&'a self, approach: &'a CloseApproach) -> Option<ApproachRef<'a>> {
        let neo = self.neos.get(approach.neo?.0)?;
        Some(ApproachRef {
            db: self,
            approach,
            neo,
        })
    }
}

/// Forward-only stream returned by [`NeoDatabase::query`]
///
/// Yielded approaches borrow the database only, not the filters.
pub struct Query<'a, 'f> {
    db: &'a NeoDatabase,
    filters: &'f [AttributeFilter],
    approaches: std::slice::Iter<'a, CloseApproach>,
}

impl<'a> Iterator for Query<'a, '_> {
    type Item = ApproachRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let filters = self.filters;
        let db = self.db;
        self.approaches
            .by_ref()
            .filter_map(|approach| db.link(approach))
            .find(|approach| filters.iter().all(|f| f.matches(approach)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.approaches.size_hint().1)
    }
}

impl FusedIterator for Query<'_, '_> {}

impl fmt::Debug for Query<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("filters", &self.filters)
            .field("remaining", &self.approaches.len())
            .finish()
    }
}

/// A NEO borrowed from its database
#[derive(Clone, Copy)]
pub struct NeoRef<'a> {
    db: &'a NeoDatabase,
    neo: &'a NearEarthObject,
}

impl<'a> NeoRef<'a> {
    /// Close approaches of this NEO, in load order
    pub fn approaches(&self) -> impl Iterator<Item = ApproachRef<'a>> + 'a {
        let db = self.db;
        self.neo.approach_ids().iter().filter_map(move |&id| db.approach(id))
    }

    pub fn get(&self) -> &'a NearEarthObject {
        self.neo
    }
}

impl Deref for NeoRef<'_> {
    type Target = NearEarthObject;

    fn deref(&self) -> &Self::Target {
        self.neo
    }
}

impl PartialEq for NeoRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.neo, other.neo)
    }
}

impl fmt::Debug for NeoRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NeoRef").field(self.neo).finish()
    }
}

impl fmt::Display for NeoRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.neo, f)
    }
}

/// A close approach borrowed from its database, with its NEO resolvable
#[derive(Clone, Copy)]
pub struct ApproachRef<'a> {
    db: &'a NeoDatabase,
    approach: &'a CloseApproach,
    neo: &'a NearEarthObject,
}

impl<'a> ApproachRef<'a> {
    /// The approaching NEO
    pub fn neo(&self) -> NeoRef<'a> {
        NeoRef {
            db: self.db,
            neo: self.neo,
        }
    }

    pub fn get(&self) -> &'a CloseApproach {
        self.approach
    }
}

impl Deref for ApproachRef<'_> {
    type Target = CloseApproach;

    fn deref(&self) -> &Self::Target {
        self.approach
    }
}

impl PartialEq for ApproachRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.approach, other.approach)
    }
}

impl fmt::Debug for ApproachRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApproachRef").field(self.approach).finish()
    }
}

impl fmt::Display for ApproachRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "On {}, '{}' approaches Earth at a distance of {:.2} au and a velocity of {:.2} km/s.",
            self.time_str(),
            self.neo().full_name(),
            self.distance(),
            self.velocity()
        )
    }
}
