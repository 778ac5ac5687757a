//! Salary upsert engine.
//!
//! Each qualifying row resolves (or creates) its location, then inserts a
//! salary record only when none exists for (career keyword, location, year).
//! Existing records are skipped, never overwritten, so re-running an import
//! is idempotent. A failing row is logged and counted; the batch carries on.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::bls::area::{parse_area_title, state_name};
use crate::bls::error::ImportError;
use crate::bls::row::{BlsRow, ImportScope, Wages};
use crate::bls::soc::is_healthcare;
use crate::seo::slugs::slugify;

/// Number of row failures logged at warn level before dropping to debug.
const MAX_LOGGED_ERRORS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLocation {
    pub city: String,
    pub state: String,
    pub state_name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSalaryRecord {
    pub career_keyword: String,
    pub location_id: Option<Uuid>,
    pub year: i32,
    pub wages: Wages,
    pub source: String,
}

/// Persistence used by the importer. Carried as a trait so the engine can be
/// driven against an in-memory store in tests.
#[async_trait]
pub trait SalaryStore: Send + Sync {
    /// Returns the location id and whether it was created by this call.
    async fn find_or_create_location(
        &self,
        location: &NewLocation,
    ) -> Result<(Uuid, bool), ImportError>;

    async fn salary_exists(
        &self,
        career_keyword: &str,
        location_id: Option<Uuid>,
        year: i32,
    ) -> Result<bool, ImportError>;

    /// Returns `false` when the unique constraint suppressed the insert.
    async fn insert_salary(&self, record: &NewSalaryRecord) -> Result<bool, ImportError>;
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub year: i32,
    pub scopes: Vec<ImportScope>,
    pub healthcare_only: bool,
    pub source: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            year: 2024,
            scopes: vec![ImportScope::City],
            healthcare_only: false,
            source: "BLS".to_string(),
        }
    }
}

impl ImportOptions {
    /// Scope a row imports under, or `None` when the row is filtered out.
    /// Only detailed, cross-industry rows at a selected granularity qualify;
    /// coarser occupation groups would double count.
    pub fn scope_for(&self, row: &BlsRow) -> Option<ImportScope> {
        if !row.is_detailed() || !row.is_cross_industry() {
            return None;
        }
        if self.healthcare_only && !is_healthcare(&row.occ_code) {
            return None;
        }
        ImportScope::for_area(&row.area_type).filter(|s| self.scopes.contains(s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Created,
    Skipped,
    Filtered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowResult {
    pub outcome: RowOutcome,
    pub location_created: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub rows_read: u64,
    pub filtered: u64,
    pub created: u64,
    pub skipped: u64,
    pub errors: u64,
    pub locations_created: u64,
}

impl ImportSummary {
    fn record(&mut self, result: RowResult) {
        match result.outcome {
            RowOutcome::Created => self.created += 1,
            RowOutcome::Skipped => self.skipped += 1,
            RowOutcome::Filtered => self.filtered += 1,
        }
        if result.location_created {
            self.locations_created += 1;
        }
    }
}

pub struct SalaryImporter<'a, S: SalaryStore + ?Sized> {
    store: &'a S,
    options: ImportOptions,
}

impl<'a, S: SalaryStore + ?Sized> SalaryImporter<'a, S> {
    pub fn new(store: &'a S, options: ImportOptions) -> Self {
        Self { store, options }
    }

    /// Imports a single row.
    pub async fn import_row(&self, row: &BlsRow) -> Result<RowResult, ImportError> {
        let Some(scope) = self.options.scope_for(row) else {
            return Ok(RowResult {
                outcome: RowOutcome::Filtered,
                location_created: false,
            });
        };

        let career_keyword = slugify(&row.occ_title);
        if career_keyword.is_empty() {
            return Err(ImportError::MissingField("OCC_TITLE"));
        }

        let (location_id, location_created) = match location_for(scope, row)? {
            Some(location) => {
                let (id, created) = self.store.find_or_create_location(&location).await?;
                (Some(id), created)
            }
            None => (None, false),
        };

        if self
            .store
            .salary_exists(&career_keyword, location_id, self.options.year)
            .await?
        {
            return Ok(RowResult {
                outcome: RowOutcome::Skipped,
                location_created,
            });
        }

        let inserted = self
            .store
            .insert_salary(&NewSalaryRecord {
                career_keyword,
                location_id,
                year: self.options.year,
                wages: Wages::from_row(row),
                source: self.options.source.clone(),
            })
            .await?;

        Ok(RowResult {
            outcome: if inserted {
                RowOutcome::Created
            } else {
                RowOutcome::Skipped
            },
            location_created,
        })
    }

    /// Imports rows sequentially in file order and tallies the outcomes.
    /// Row failures never abort the run.
    pub async fn import_rows(&self, rows: &[BlsRow]) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for row in rows {
            summary.rows_read += 1;
            match self.import_row(row).await {
                Ok(result) => summary.record(result),
                Err(e) => {
                    summary.errors += 1;
                    if summary.errors <= MAX_LOGGED_ERRORS {
                        warn!("Failed to import {} - {}: {e}", row.area_title, row.occ_title);
                    } else {
                        debug!("Failed to import {} - {}: {e}", row.area_title, row.occ_title);
                    }
                }
            }

            if summary.rows_read % 1000 == 0 {
                debug!(
                    "Processed {} rows ({} created, {} skipped)",
                    summary.rows_read, summary.created, summary.skipped
                );
            }
        }

        info!(
            "Import finished: {} rows, {} created, {} skipped, {} filtered, {} errors, {} new locations",
            summary.rows_read,
            summary.created,
            summary.skipped,
            summary.filtered,
            summary.errors,
            summary.locations_created
        );
        summary
    }
}

/// Location record for a row, `None` for the national aggregate.
fn location_for(scope: ImportScope, row: &BlsRow) -> Result<Option<NewLocation>, ImportError> {
    match scope {
        ImportScope::National => Ok(None),
        ImportScope::State => {
            let state = row.prim_state.trim();
            if state.is_empty() {
                return Err(ImportError::MissingField("PRIM_STATE"));
            }
            Ok(Some(NewLocation {
                city: String::new(),
                state: state.to_string(),
                state_name: row.area_title.clone(),
                slug: slugify(&row.area_title),
            }))
        }
        ImportScope::City => {
            let parts = parse_area_title(&row.area_title)?;
            Ok(Some(NewLocation {
                slug: slugify(&parts.city),
                state_name: state_name(&parts.state)
                    .map(String::from)
                    .unwrap_or_else(|| parts.state.clone()),
                city: parts.city,
                state: parts.state,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bls::normalize::Cell;
    use crate::bls::row::fixtures::metro_row;
    use crate::bls::row::AreaType;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        locations: Mutex<HashMap<(String, String), (Uuid, NewLocation)>>,
        salaries: Mutex<Vec<NewSalaryRecord>>,
        fail_inserts_for: Option<String>,
        // Another writer got there between the existence check and the insert.
        conflict_on_insert: bool,
    }

    #[async_trait]
    impl SalaryStore for MemoryStore {
        async fn find_or_create_location(
            &self,
            location: &NewLocation,
        ) -> Result<(Uuid, bool), ImportError> {
            let mut locations = self.locations.lock().unwrap();
            let key = (location.city.clone(), location.state.clone());
            if let Some((id, _)) = locations.get(&key) {
                return Ok((*id, false));
            }
            let id = Uuid::new_v4();
            locations.insert(key, (id, location.clone()));
            Ok((id, true))
        }

        async fn salary_exists(
            &self,
            career_keyword: &str,
            location_id: Option<Uuid>,
            year: i32,
        ) -> Result<bool, ImportError> {
            Ok(self.salaries.lock().unwrap().iter().any(|s| {
                s.career_keyword == career_keyword && s.location_id == location_id && s.year == year
            }))
        }

        async fn insert_salary(&self, record: &NewSalaryRecord) -> Result<bool, ImportError> {
            if self.fail_inserts_for.as_deref() == Some(record.career_keyword.as_str()) {
                return Err(ImportError::Database(sqlx::Error::PoolTimedOut));
            }
            if self.conflict_on_insert {
                return Ok(false);
            }
            self.salaries.lock().unwrap().push(record.clone());
            Ok(true)
        }
    }

    fn sample_rows() -> Vec<BlsRow> {
        let mut phlebotomists = metro_row("Scranton--Wilkes-Barre, PA");
        phlebotomists.occ_title = "Phlebotomists".into();
        vec![
            metro_row("San Francisco, CA"),
            metro_row("Scranton, PA-NJ"),
            phlebotomists,
        ]
    }

    #[tokio::test]
    async fn test_suppressed_insert_counts_as_skipped() {
        let store = MemoryStore {
            conflict_on_insert: true,
            ..Default::default()
        };
        let importer = SalaryImporter::new(&store, ImportOptions::default());

        let result = importer.import_row(&metro_row("Boise City, ID")).await.unwrap();
        assert_eq!(result.outcome, RowOutcome::Skipped);
        assert!(result.location_created);

        let summary = importer.import_rows(&sample_rows()).await;
        assert_eq!(summary.created, 0);
        assert_eq!(summary.skipped, 3);
        assert_eq!(summary.errors, 0);
    }

    #[tokio::test]
    async fn test_second_run_creates_nothing() {
        let store = MemoryStore::default();
        let importer = SalaryImporter::new(&store, ImportOptions::default());
        let rows = sample_rows();

        let first = importer.import_rows(&rows).await;
        assert_eq!(first.created, 3);
        assert_eq!(first.skipped, 0);
        assert_eq!(first.locations_created, 3);

        let second = importer.import_rows(&rows).await;
        assert_eq!(second.created, 0);
        assert_eq!(second.skipped, 3);
        assert_eq!(second.locations_created, 0);
        assert_eq!(store.salaries.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_location_shared_across_occupations() {
        let store = MemoryStore::default();
        let importer = SalaryImporter::new(&store, ImportOptions::default());
        let mut lpn = metro_row("Scranton, PA-NJ");
        lpn.occ_title = "Licensed Practical and Licensed Vocational Nurses".into();

        let summary = importer
            .import_rows(&[metro_row("Scranton, PA-NJ"), lpn])
            .await;
        assert_eq!(summary.created, 2);
        assert_eq!(summary.locations_created, 1);

        let locations = store.locations.lock().unwrap();
        let (_, scranton) = &locations[&("Scranton".to_string(), "PA".to_string())];
        assert_eq!(scranton.state_name, "Pennsylvania");
        assert_eq!(scranton.slug, "scranton");
    }

    #[tokio::test]
    async fn test_record_fields_are_normalized() {
        let store = MemoryStore::default();
        let importer = SalaryImporter::new(&store, ImportOptions::default());
        importer.import_rows(&[metro_row("San Francisco, CA")]).await;

        let salaries = store.salaries.lock().unwrap();
        let record = &salaries[0];
        assert_eq!(record.career_keyword, "registered-nurses");
        assert_eq!(record.year, 2024);
        assert_eq!(record.source, "BLS");
        assert_eq!(record.wages.annual_median, Some(164_100.0));
        assert_eq!(record.wages.annual_90th, None);
    }

    #[tokio::test]
    async fn test_non_detailed_rows_are_excluded() {
        let store = MemoryStore::default();
        let importer = SalaryImporter::new(&store, ImportOptions::default());
        let mut major = metro_row("San Francisco, CA");
        major.o_group = "major".into();
        let mut broad = metro_row("San Francisco, CA");
        broad.o_group = "broad".into();

        let summary = importer.import_rows(&[major, broad]).await;
        assert_eq!(summary.filtered, 2);
        assert_eq!(summary.created, 0);
        assert!(store.salaries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_area_is_counted_and_batch_continues() {
        let store = MemoryStore::default();
        let importer = SalaryImporter::new(&store, ImportOptions::default());
        let rows = vec![metro_row("Nowhere"), metro_row("Abilene, TX")];

        let summary = importer.import_rows(&rows).await;
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.created, 1);
    }

    #[tokio::test]
    async fn test_store_failure_does_not_abort_run() {
        let store = MemoryStore {
            fail_inserts_for: Some("registered-nurses".into()),
            ..Default::default()
        };
        let importer = SalaryImporter::new(&store, ImportOptions::default());

        let summary = importer.import_rows(&sample_rows()).await;
        assert_eq!(summary.errors, 2);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.rows_read, 3);
    }

    #[tokio::test]
    async fn test_scopes_select_area_types() {
        let store = MemoryStore::default();
        let options = ImportOptions {
            scopes: vec![ImportScope::National, ImportScope::State],
            ..Default::default()
        };
        let importer = SalaryImporter::new(&store, options);

        let mut national = metro_row("U.S.");
        national.area_type = AreaType::National;
        let mut state = metro_row("California");
        state.area_type = AreaType::State;
        let metro = metro_row("San Francisco, CA");

        let rows = vec![national.clone(), state, metro];
        let summary = importer.import_rows(&rows).await;
        assert_eq!(summary.created, 2);
        assert_eq!(summary.filtered, 1);

        // National rows have no location and still deduplicate.
        let again = importer.import_rows(&[national]).await;
        assert_eq!(again.skipped, 1);

        let salaries = store.salaries.lock().unwrap();
        assert!(salaries.iter().any(|s| s.location_id.is_none()));
        let locations = store.locations.lock().unwrap();
        let (_, california) = &locations[&(String::new(), "CA".to_string())];
        assert_eq!(california.state_name, "California");
        assert_eq!(california.slug, "california");
    }

    #[tokio::test]
    async fn test_healthcare_only_filters_other_occupations() {
        let store = MemoryStore::default();
        let options = ImportOptions {
            healthcare_only: true,
            ..Default::default()
        };
        let importer = SalaryImporter::new(&store, options);
        let mut developers = metro_row("San Francisco, CA");
        developers.occ_code = "15-1252".into();
        developers.occ_title = "Software Developers".into();

        let summary = importer
            .import_rows(&[developers, metro_row("San Francisco, CA")])
            .await;
        assert_eq!(summary.filtered, 1);
        assert_eq!(summary.created, 1);
    }

    #[tokio::test]
    async fn test_industry_specific_rows_are_excluded() {
        let store = MemoryStore::default();
        let importer = SalaryImporter::new(&store, ImportOptions::default());
        let mut hospitals = metro_row("San Francisco, CA");
        hospitals.naics = Some("622000".into());
        hospitals.tot_emp = Cell::Text("1000".into());

        let summary = importer.import_rows(&[hospitals]).await;
        assert_eq!(summary.filtered, 1);
    }
}
