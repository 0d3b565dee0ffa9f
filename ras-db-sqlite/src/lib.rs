mod factory;

pub use factory::SqliteRepositoryFactory;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::{FromRow, sqlite::SqlitePool};

use ras_core::{
    Collaborator, CollaboratorId, CollaboratorRole, ConditionalData, EquipmentItem,
    Furnishing, LifecycleTag, Location, NewCollaborator, PropertyCategory, PropertyDraft,
    PropertyId, PropertyRepository, PropertySummary, Recurrence, RecurrenceUnit, RentalTerms,
    RepositoryError, SaleTerms, Service, ServiceAmount, ServiceKind, Space, SpaceDetails,
    SpaceKind, VacationTerms,
};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self, RepositoryError> {
        let pool = SqlitePool::connect(database_url)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// ── row types ────────────────────────────────────────────────────────────

#[derive(FromRow)]
struct PropertyRow {
    id: i64,
    name: String,
    category: String,
    states: String,
    furnishing: String,
    street: Option<String>,
    city: Option<String>,
    postal_code: Option<String>,
    region: Option<String>,
    cadastral_ref: Option<String>,
    size_m2: Option<String>,
    capacity: Option<i64>,
    rental_terms: Option<String>,
    vacation_terms: Option<String>,
    sale_terms: Option<String>,
    published: bool,
}

impl TryFrom<PropertyRow> for PropertyDraft {
    type Error = RepositoryError;

    /// Builds the draft without its spaces and services; the caller loads
    /// the child tables separately.
    fn try_from(row: PropertyRow) -> Result<Self, Self::Error> {
        Ok(PropertyDraft {
            id: Some(row.id),
            name: row.name,
            category: PropertyCategory::parse(&row.category)
                .ok_or_else(|| invalid_code("category", &row.category))?,
            states: parse_states(&row.states)?,
            furnishing: Furnishing::parse(&row.furnishing)
                .ok_or_else(|| invalid_code("furnishing", &row.furnishing))?,
            location: Location {
                street: row.street,
                city: row.city,
                postal_code: row.postal_code,
                region: row.region,
                cadastral_ref: row.cadastral_ref,
            },
            size_m2: parse_optional_decimal(&row.size_m2)?,
            capacity: row.capacity.map(|c| c as u32),
            spaces: Vec::new(),
            services: Vec::new(),
            conditions: ConditionalData {
                rental: parse_optional_json::<RentalTerms>(&row.rental_terms)?,
                vacation: parse_optional_json::<VacationTerms>(&row.vacation_terms)?,
                sale: parse_optional_json::<SaleTerms>(&row.sale_terms)?,
            },
            published: row.published,
        })
    }
}

#[derive(FromRow)]
struct SpaceRow {
    id: i64,
    kind: String,
    name: String,
    details: String,
}

impl TryFrom<SpaceRow> for Space {
    type Error = RepositoryError;

    fn try_from(row: SpaceRow) -> Result<Self, Self::Error> {
        Ok(Space {
            id: Some(row.id),
            kind: SpaceKind::parse(&row.kind).ok_or_else(|| invalid_code("space kind", &row.kind))?,
            name: row.name,
            details: serde_json::from_str::<SpaceDetails>(&row.details).map_err(|e| {
                RepositoryError::Database(format!("Failed to parse space details: {}", e))
            })?,
        })
    }
}

#[derive(FromRow)]
struct ServiceRow {
    id: i64,
    kind: String,
    name: String,
    contract_number: Option<String>,
    amount_kind: String,
    amount: String,
    last_paid: Option<String>,
    recur_every: i64,
    recur_unit: String,
}

impl TryFrom<ServiceRow> for Service {
    type Error = RepositoryError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        let amount = parse_decimal(&row.amount)?;
        Ok(Service {
            id: Some(row.id),
            kind: ServiceKind::parse(&row.kind)
                .ok_or_else(|| invalid_code("service kind", &row.kind))?,
            name: row.name,
            contract_number: row.contract_number,
            amount: match row.amount_kind.as_str() {
                "fixed" => ServiceAmount::Fixed(amount),
                "variable" => ServiceAmount::Variable(amount),
                other => return Err(invalid_code("amount kind", other)),
            },
            last_paid: row.last_paid.as_deref().map(parse_date).transpose()?,
            recurrence: Recurrence {
                every: row.recur_every as u32,
                unit: RecurrenceUnit::parse(&row.recur_unit)
                    .ok_or_else(|| invalid_code("recurrence unit", &row.recur_unit))?,
            },
        })
    }
}

#[derive(FromRow)]
struct SummaryRow {
    id: i64,
    name: String,
    category: String,
    states: String,
    published: bool,
    updated_at: String,
}

impl TryFrom<SummaryRow> for PropertySummary {
    type Error = RepositoryError;

    fn try_from(row: SummaryRow) -> Result<Self, Self::Error> {
        Ok(PropertySummary {
            id: row.id,
            name: row.name,
            category: PropertyCategory::parse(&row.category)
                .ok_or_else(|| invalid_code("category", &row.category))?,
            states: parse_states(&row.states)?,
            published: row.published,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct CollaboratorRow {
    id: i64,
    property_id: i64,
    email: String,
    role: String,
}

impl TryFrom<CollaboratorRow> for Collaborator {
    type Error = RepositoryError;

    fn try_from(row: CollaboratorRow) -> Result<Self, Self::Error> {
        Ok(Collaborator {
            id: row.id,
            property_id: row.property_id,
            email: row.email,
            role: CollaboratorRole::parse(&row.role)
                .ok_or_else(|| invalid_code("collaborator role", &row.role))?,
        })
    }
}

#[derive(FromRow)]
struct EquipmentRow {
    space_kind: String,
    code: String,
    label: String,
}

impl TryFrom<EquipmentRow> for EquipmentItem {
    type Error = RepositoryError;

    fn try_from(row: EquipmentRow) -> Result<Self, Self::Error> {
        Ok(EquipmentItem {
            kind: SpaceKind::parse(&row.space_kind)
                .ok_or_else(|| invalid_code("space kind", &row.space_kind))?,
            code: row.code,
            label: row.label,
        })
    }
}

// ── column codecs ────────────────────────────────────────────────────────

fn invalid_code(
    what: &str,
    value: &str,
) -> RepositoryError {
    RepositoryError::Database(format!("Invalid {}: '{}'", what, value))
}

fn parse_decimal(s: &str) -> Result<Decimal, RepositoryError> {
    s.parse::<Decimal>()
        .map_err(|e| RepositoryError::Database(format!("Failed to parse decimal '{}': {}", s, e)))
}

fn parse_optional_decimal(s: &Option<String>) -> Result<Option<Decimal>, RepositoryError> {
    s.as_ref().map(|s| parse_decimal(s)).transpose()
}

fn parse_date(s: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| RepositoryError::Database(format!("Failed to parse date '{}': {}", s, e)))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    // SQLite stores timestamps in various formats, try common ones
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| RepositoryError::Database(format!("Failed to parse datetime '{}': {}", s, e)))
}

fn encode_states(states: &std::collections::BTreeSet<LifecycleTag>) -> String {
    states
        .iter()
        .map(|tag| tag.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_states(
    s: &str,
) -> Result<std::collections::BTreeSet<LifecycleTag>, RepositoryError> {
    s.split(',')
        .filter(|part| !part.is_empty())
        .map(|part| LifecycleTag::parse(part).ok_or_else(|| invalid_code("lifecycle tag", part)))
        .collect()
}

fn encode_optional_json<T: Serialize>(
    value: &Option<T>,
) -> Result<Option<String>, RepositoryError> {
    value
        .as_ref()
        .map(|v| {
            serde_json::to_string(v)
                .map_err(|e| RepositoryError::Database(format!("Failed to encode JSON: {}", e)))
        })
        .transpose()
}

fn parse_optional_json<T: DeserializeOwned>(
    s: &Option<String>,
) -> Result<Option<T>, RepositoryError> {
    s.as_ref()
        .map(|s| {
            serde_json::from_str::<T>(s)
                .map_err(|e| RepositoryError::Database(format!("Failed to parse JSON: {}", e)))
        })
        .transpose()
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(value)
        .map_err(|e| RepositoryError::Database(format!("Failed to encode JSON: {}", e)))
}

// ── repository implementation ────────────────────────────────────────────

impl SqliteRepository {
    async fn insert_children(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        property_id: PropertyId,
        draft: &PropertyDraft,
    ) -> Result<(), RepositoryError> {
        for (position, space) in draft.spaces.iter().enumerate() {
            sqlx::query(
                "INSERT INTO spaces (property_id, position, kind, name, details)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(property_id)
            .bind(position as i64)
            .bind(space.kind.as_str())
            .bind(&space.name)
            .bind(encode_json(&space.details)?)
            .execute(&mut **tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        }

        for (position, service) in draft.services.iter().enumerate() {
            let (amount_kind, amount) = match service.amount {
                ServiceAmount::Fixed(v) => ("fixed", v),
                ServiceAmount::Variable(v) => ("variable", v),
            };
            sqlx::query(
                "INSERT INTO services (
                    property_id, position, kind, name, contract_number,
                    amount_kind, amount, last_paid, recur_every, recur_unit
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(property_id)
            .bind(position as i64)
            .bind(service.kind.as_str())
            .bind(&service.name)
            .bind(&service.contract_number)
            .bind(amount_kind)
            .bind(amount.to_string())
            .bind(service.last_paid.map(|d| d.format("%Y-%m-%d").to_string()))
            .bind(service.recurrence.every as i64)
            .bind(service.recurrence.unit.as_str())
            .execute(&mut **tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        }

        Ok(())
    }

    async fn delete_children(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        property_id: PropertyId,
    ) -> Result<(), RepositoryError> {
        for table in ["spaces", "services"] {
            sqlx::query(&format!("DELETE FROM {} WHERE property_id = ?", table))
                .bind(property_id)
                .execute(&mut **tx)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl PropertyRepository for SqliteRepository {
    async fn create_property(
        &self,
        draft: &PropertyDraft,
    ) -> Result<PropertyId, RepositoryError> {
        let now = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO properties (
                name, category, states, furnishing,
                street, city, postal_code, region, cadastral_ref,
                size_m2, capacity, rental_terms, vacation_terms, sale_terms,
                published, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&draft.name)
        .bind(draft.category.as_str())
        .bind(encode_states(&draft.states))
        .bind(draft.furnishing.as_str())
        .bind(&draft.location.street)
        .bind(&draft.location.city)
        .bind(&draft.location.postal_code)
        .bind(&draft.location.region)
        .bind(&draft.location.cadastral_ref)
        .bind(draft.size_m2.map(|d| d.to_string()))
        .bind(draft.capacity.map(|c| c as i64))
        .bind(encode_optional_json(&draft.conditions.rental)?)
        .bind(encode_optional_json(&draft.conditions.vacation)?)
        .bind(encode_optional_json(&draft.conditions.sale)?)
        .bind(draft.published)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        Self::insert_children(&mut tx, id, draft).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(id)
    }

    async fn get_property(
        &self,
        id: PropertyId,
    ) -> Result<PropertyDraft, RepositoryError> {
        let row: PropertyRow = sqlx::query_as(
            "SELECT id, name, category, states, furnishing,
                    street, city, postal_code, region, cadastral_ref,
                    size_m2, capacity, rental_terms, vacation_terms, sale_terms,
                    published
             FROM properties WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        let mut draft: PropertyDraft = row.try_into()?;

        let space_rows: Vec<SpaceRow> = sqlx::query_as(
            "SELECT id, kind, name, details FROM spaces
             WHERE property_id = ? ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;
        draft.spaces = space_rows
            .into_iter()
            .map(|r| r.try_into())
            .collect::<Result<_, _>>()?;

        let service_rows: Vec<ServiceRow> = sqlx::query_as(
            "SELECT id, kind, name, contract_number, amount_kind, amount,
                    last_paid, recur_every, recur_unit
             FROM services WHERE property_id = ? ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;
        draft.services = service_rows
            .into_iter()
            .map(|r| r.try_into())
            .collect::<Result<_, _>>()?;

        Ok(draft)
    }

    async fn update_property(
        &self,
        draft: &PropertyDraft,
    ) -> Result<(), RepositoryError> {
        let id = draft.id.ok_or_else(|| {
            RepositoryError::Configuration("cannot update a draft without an id".to_string())
        })?;
        let now = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let result = sqlx::query(
            "UPDATE properties SET
                name = ?, category = ?, states = ?, furnishing = ?,
                street = ?, city = ?, postal_code = ?, region = ?, cadastral_ref = ?,
                size_m2 = ?, capacity = ?, rental_terms = ?, vacation_terms = ?,
                sale_terms = ?, published = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&draft.name)
        .bind(draft.category.as_str())
        .bind(encode_states(&draft.states))
        .bind(draft.furnishing.as_str())
        .bind(&draft.location.street)
        .bind(&draft.location.city)
        .bind(&draft.location.postal_code)
        .bind(&draft.location.region)
        .bind(&draft.location.cadastral_ref)
        .bind(draft.size_m2.map(|d| d.to_string()))
        .bind(draft.capacity.map(|c| c as i64))
        .bind(encode_optional_json(&draft.conditions.rental)?)
        .bind(encode_optional_json(&draft.conditions.vacation)?)
        .bind(encode_optional_json(&draft.conditions.sale)?)
        .bind(draft.published)
        .bind(&now)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        // Owned collections are replaced wholesale with their parent.
        Self::delete_children(&mut tx, id).await?;
        Self::insert_children(&mut tx, id, draft).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_property(
        &self,
        id: PropertyId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Self::delete_children(&mut tx, id).await?;
        sqlx::query("DELETE FROM collaborators WHERE property_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let result = sqlx::query("DELETE FROM properties WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn list_properties(
        &self,
        published: Option<bool>,
    ) -> Result<Vec<PropertySummary>, RepositoryError> {
        let rows: Vec<SummaryRow> = match published {
            Some(flag) => {
                sqlx::query_as(
                    "SELECT id, name, category, states, published, updated_at
                     FROM properties WHERE published = ? ORDER BY updated_at DESC",
                )
                .bind(flag)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(
                    "SELECT id, name, category, states, published, updated_at
                     FROM properties ORDER BY updated_at DESC",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn add_collaborator(
        &self,
        collaborator: &NewCollaborator,
    ) -> Result<Collaborator, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO collaborators (property_id, email, role) VALUES (?, ?, ?)",
        )
        .bind(collaborator.property_id)
        .bind(&collaborator.email)
        .bind(collaborator.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(Collaborator {
            id: result.last_insert_rowid(),
            property_id: collaborator.property_id,
            email: collaborator.email.clone(),
            role: collaborator.role,
        })
    }

    async fn remove_collaborator(
        &self,
        id: CollaboratorId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM collaborators WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_collaborators(
        &self,
        property_id: PropertyId,
    ) -> Result<Vec<Collaborator>, RepositoryError> {
        let rows: Vec<CollaboratorRow> = sqlx::query_as(
            "SELECT id, property_id, email, role FROM collaborators
             WHERE property_id = ? ORDER BY email",
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn list_equipment(
        &self,
        kind: SpaceKind,
    ) -> Result<Vec<EquipmentItem>, RepositoryError> {
        let rows: Vec<EquipmentRow> = sqlx::query_as(
            "SELECT space_kind, code, label FROM equipment_catalog
             WHERE space_kind = ? ORDER BY code",
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn insert_equipment(
        &self,
        item: &EquipmentItem,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT OR REPLACE INTO equipment_catalog (space_kind, code, label)
             VALUES (?, ?, ?)",
        )
        .bind(item.kind.as_str())
        .bind(&item.code)
        .bind(&item.label)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_equipment(
        &self,
        kind: SpaceKind,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM equipment_catalog WHERE space_kind = ?")
            .bind(kind.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }
}
