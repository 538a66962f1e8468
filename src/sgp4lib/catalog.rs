//! The set of tracked satellites and its element updates

use super::{Satellite, TleSet};
use crate::{PlanisphereError, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Launch of the first artificial satellite, 1957-10-04 19:28:34 UT
pub const FIRST_LAUNCH_JD: f64 = 2_436_116.311_5;

/// Element sets are trusted for this many days after the last update
pub const ELEMENT_VALIDITY_DAYS: f64 = 1_825.0;

/// Counts from one catalog update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSummary {
    /// Satellites whose elements or name changed
    pub updated: usize,
    /// Satellites in the catalog when the update started, user-defined included
    pub total: usize,
    pub added: usize,
    /// Managed satellites absent from the update sources
    pub missing: usize,
    /// Missing satellites actually removed
    pub removed: usize,
}

impl UpdateSummary {
    /// Whether the catalog contents changed
    pub fn changed(&self) -> bool {
        self.updated > 0 || self.added > 0 || self.removed > 0
    }
}

/// Tracked satellites keyed by catalog number
#[derive(Debug, Clone, Default)]
pub struct SatelliteCatalog {
    satellites: BTreeMap<String, Satellite>,
    /// Drop managed satellites that no update source lists any more
    pub auto_remove: bool,
    last_update_jd: Option<f64>,
}

impl SatelliteCatalog {
    pub fn new(auto_remove: bool) -> Self {
        Self {
            satellites: BTreeMap::new(),
            auto_remove,
            last_update_jd: None,
        }
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Satellite> {
        self.satellites.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Satellite> {
        self.satellites.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Satellite> {
        self.satellites.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Satellite> {
        self.satellites.values_mut()
    }

    pub fn last_update_jd(&self) -> Option<f64> {
        self.last_update_jd
    }

    pub fn set_last_update_jd(&mut self, jd: f64) {
        self.last_update_jd = Some(jd);
    }

    /// Add a satellite built from `tle`.
    ///
    /// Fails on incomplete sets and on ids already tracked.
    pub fn add(&mut self, tle: TleSet, user_defined: bool) -> Result<()> {
        if tle.id.is_empty() || tle.name.is_empty() || tle.line1.is_empty() || tle.line2.is_empty() {
            return Err(PlanisphereError::InvalidTle(format!(
                "incomplete element set for '{}'",
                tle.name
            )));
        }
        if self.satellites.contains_key(&tle.id) {
            return Err(PlanisphereError::InvalidTle(format!(
                "satellite {} is already tracked",
                tle.id
            )));
        }
        let satellite = Satellite::from_tle(tle, user_defined);
        self.satellites.insert(satellite.id.clone(), satellite);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Option<Satellite> {
        self.satellites.remove(id)
    }

    /// Replace elements from freshly parsed catalog sets.
    ///
    /// User-defined satellites are never touched. Managed satellites take
    /// the new elements when their lines or name differ; those absent from
    /// `sets` are counted missing and removed when `auto_remove` is on.
    /// Remaining sets flagged `add_this` become new satellites.
    pub fn update_from_tle_sets(
        &mut self,
        mut sets: BTreeMap<String, TleSet>,
        update_jd: f64,
    ) -> UpdateSummary {
        let mut summary = UpdateSummary {
            total: self.satellites.len(),
            ..UpdateSummary::default()
        };
        let auto_remove = self.auto_remove;
        let mut to_remove = Vec::new();

        for satellite in self.satellites.values_mut() {
            if satellite.user_defined {
                debug!("satellite {} {} is user-defined, not updated", satellite.id, satellite.name);
                sets.remove(&satellite.id);
                continue;
            }

            match sets.remove(&satellite.id) {
                Some(tle) => {
                    if satellite.differs_from(&tle) {
                        satellite.set_new_tle_elements(tle);
                        summary.updated += 1;
                    }
                }
                None => {
                    if auto_remove {
                        to_remove.push(satellite.id.clone());
                    } else {
                        warn!("satellite {} {} is missing from the update sources", satellite.id, satellite.name);
                    }
                    summary.missing += 1;
                }
            }
        }

        for tle in sets.into_values().filter(|tle| tle.add_this) {
            match self.add(tle, false) {
                Ok(()) => summary.added += 1,
                Err(e) => warn!("satellite not added: {}", e),
            }
        }

        for id in to_remove {
            if self.satellites.remove(&id).is_some() {
                summary.removed += 1;
            }
        }

        self.last_update_jd = Some(update_jd);
        info!(
            "satellite update finished: {}/{} updated, {} added, {} missing, {} removed",
            summary.updated, summary.total, summary.added, summary.missing, summary.removed
        );
        summary
    }

    /// Whether satellites should be shown at `jd`.
    ///
    /// Nothing flew before the first launch, and element sets are not
    /// trusted more than five years past the last update. Without any update
    /// only the lower bound applies.
    pub fn is_valid_date(&self, jd: f64) -> bool {
        let last_update = self.last_update_jd.unwrap_or(jd);
        jd >= FIRST_LAUNCH_JD && jd <= last_update + ELEMENT_VALIDITY_DAYS
    }
}
