use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::bls::error::ImportError;
use crate::bls::importer::{NewLocation, NewSalaryRecord, SalaryStore};

/// `SalaryStore` backed by the `locations` and `salary_data` tables.
#[derive(Clone)]
pub struct PgSalaryStore {
    db: PgPool,
}

impl PgSalaryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SalaryStore for PgSalaryStore {
    async fn find_or_create_location(
        &self,
        location: &NewLocation,
    ) -> Result<(Uuid, bool), ImportError> {
        let inserted: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO locations (city, state, state_name, slug)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (city, state) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&location.city)
        .bind(&location.state)
        .bind(&location.state_name)
        .bind(&location.slug)
        .fetch_optional(&self.db)
        .await?;

        if let Some((id,)) = inserted {
            return Ok((id, true));
        }

        let (id,): (Uuid,) =
            sqlx::query_as("SELECT id FROM locations WHERE city = $1 AND state = $2")
                .bind(&location.city)
                .bind(&location.state)
                .fetch_one(&self.db)
                .await?;
        Ok((id, false))
    }

    async fn salary_exists(
        &self,
        career_keyword: &str,
        location_id: Option<Uuid>,
        year: i32,
    ) -> Result<bool, ImportError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM salary_data
                WHERE career_keyword = $1
                  AND location_id IS NOT DISTINCT FROM $2
                  AND year = $3
            )
            "#,
        )
        .bind(career_keyword)
        .bind(location_id)
        .bind(year)
        .fetch_one(&self.db)
        .await?;
        Ok(exists)
    }

    async fn insert_salary(&self, record: &NewSalaryRecord) -> Result<bool, ImportError> {
        let w = &record.wages;
        // A concurrent importer can win the race after `salary_exists`.
        let result = sqlx::query(
            r#"
            INSERT INTO salary_data
                (career_keyword, location_id, year,
                 hourly_mean, hourly_10th, hourly_25th, hourly_median, hourly_75th, hourly_90th,
                 annual_mean, annual_10th, annual_25th, annual_median, annual_75th, annual_90th,
                 employment_count, jobs_per_1000, location_quotient, source)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19)
            ON CONFLICT (career_keyword, location_id, year) DO NOTHING
            "#,
        )
        .bind(&record.career_keyword)
        .bind(record.location_id)
        .bind(record.year)
        .bind(w.hourly_mean)
        .bind(w.hourly_10th)
        .bind(w.hourly_25th)
        .bind(w.hourly_median)
        .bind(w.hourly_75th)
        .bind(w.hourly_90th)
        .bind(w.annual_mean)
        .bind(w.annual_10th)
        .bind(w.annual_25th)
        .bind(w.annual_median)
        .bind(w.annual_75th)
        .bind(w.annual_90th)
        .bind(w.employment_count)
        .bind(w.jobs_per_1000)
        .bind(w.location_quotient)
        .bind(&record.source)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
