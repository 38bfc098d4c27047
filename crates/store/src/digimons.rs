//! CRUD operations over the digimons table
//!
//! Every mutation validates and coerces its input before touching the
//! database. Create and update run the name check and the write inside one
//! transaction, and the `name` column carries a UNIQUE constraint, so a
//! concurrent writer that slips past the check still ends in
//! [`StoreError::DuplicateName`]. On SQLite writers additionally queue on
//! [`Database::lock_writes`].

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::database::Database;
use crate::entity::digimons;
use crate::entity::{DigimonLevel, DigimonType, Digimons};
use crate::error::{Result, StoreError};
use crate::input::{DigimonInput, NumberInput, TextInput};
use crate::validation::{validate_digimon, FieldError};

/// Parse a record identifier from its textual form (e.g. a URL segment)
pub fn parse_id(raw: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| StoreError::InvalidArgument(format!("invalid digimon id: {:?}", raw)))
}

/// Mutable fields of a record after validation and coercion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDigimon {
    pub name: String,
    pub level: DigimonLevel,
    pub digimon_type: DigimonType,
    pub description: String,
    pub image_url: Option<String>,
    pub attack_power: i32,
    pub defense_value: i32,
}

impl NewDigimon {
    /// Validate `input` and coerce it into storable values.
    ///
    /// Validator errors win. After that, stats must resolve to integers
    /// >= 0 and `imageUrl` must be text if given; both are reported as
    /// field errors. Finally `level` and `type` must name a known variant.
    pub fn try_from_input(input: &DigimonInput) -> Result<Self> {
        let errors = validate_digimon(input);
        if !errors.is_empty() {
            return Err(StoreError::ValidationFailed(errors));
        }

        let mut errors = Vec::new();
        let attack_power = coerce_stat(&input.attack_power, "attackPower", "Attack power", &mut errors);
        let defense_value =
            coerce_stat(&input.defense_value, "defenseValue", "Defense value", &mut errors);

        let image_url = match &input.image_url {
            TextInput::Missing => None,
            TextInput::Text(url) if url.is_empty() => None,
            TextInput::Text(url) => Some(url.clone()),
            TextInput::NotText => {
                errors.push(FieldError::new("imageUrl", "Image URL must be text"));
                None
            }
        };

        if !errors.is_empty() {
            return Err(StoreError::ValidationFailed(errors));
        }

        let level_text = text_of(&input.level);
        let level = DigimonLevel::parse(level_text)
            .ok_or_else(|| StoreError::InvalidArgument(format!("unknown level: {:?}", level_text)))?;

        let type_text = text_of(&input.digimon_type);
        let digimon_type = DigimonType::parse(type_text)
            .ok_or_else(|| StoreError::InvalidArgument(format!("unknown type: {:?}", type_text)))?;

        Ok(Self {
            name: text_of(&input.name).to_string(),
            level,
            digimon_type,
            description: text_of(&input.description).to_string(),
            image_url,
            attack_power: attack_power.unwrap_or_default(),
            defense_value: defense_value.unwrap_or_default(),
        })
    }
}

fn text_of(value: &TextInput) -> &str {
    value.as_text().unwrap_or_default()
}

fn coerce_stat(
    value: &NumberInput,
    field: &str,
    label: &str,
    errors: &mut Vec<FieldError>,
) -> Option<i32> {
    match value.to_int() {
        Some(n) if n >= 0 => Some(n),
        Some(_) => {
            errors.push(FieldError::new(field, format!("{} must be a valid number", label)));
            None
        }
        None => {
            errors.push(FieldError::new(field, format!("{} is required", label)));
            None
        }
    }
}

/// Owner of the digimon record set
#[derive(Clone)]
pub struct DigimonStore {
    db: Arc<Database>,
}

impl DigimonStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// All records, newest first
    pub async fn list(&self) -> Result<Vec<digimons::Model>> {
        let records = Digimons::find()
            .order_by_desc(digimons::Column::CreatedAt)
            .order_by_desc(digimons::Column::Id)
            .all(self.db.connection())
            .await?;

        debug!("Listed {} digimons", records.len());
        Ok(records)
    }

    pub async fn get(&self, id: i32) -> Result<digimons::Model> {
        Digimons::find_by_id(id)
            .one(self.db.connection())
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    pub async fn create(&self, input: &DigimonInput) -> Result<digimons::Model> {
        let candidate = NewDigimon::try_from_input(input)?;

        let _writer = self.db.lock_writes().await;
        let txn = self.db.begin_transaction().await?;
        let record = insert_new(&txn, candidate).await?;
        txn.commit().await?;

        info!(id = record.id, name = %record.name, "Created digimon");
        Ok(record)
    }

    /// Replace every mutable field of record `id`
    pub async fn update(&self, id: i32, input: &DigimonInput) -> Result<digimons::Model> {
        let _writer = self.db.lock_writes().await;
        let txn = self.db.begin_transaction().await?;

        let existing = Digimons::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(StoreError::NotFound(id))?;

        let candidate = NewDigimon::try_from_input(input)?;

        if find_by_name(&txn, &candidate.name, Some(id)).await?.is_some() {
            txn.rollback().await?;
            return Err(StoreError::DuplicateName(candidate.name));
        }

        let mut record: digimons::ActiveModel = existing.into();
        record.name = Set(candidate.name.clone());
        record.level = Set(candidate.level);
        record.digimon_type = Set(candidate.digimon_type);
        record.description = Set(candidate.description);
        record.image_url = Set(candidate.image_url);
        record.attack_power = Set(candidate.attack_power);
        record.defense_value = Set(candidate.defense_value);
        record.updated_at = Set(Utc::now());

        let updated = record
            .update(&txn)
            .await
            .map_err(|e| write_error(e, &candidate.name))?;

        txn.commit().await?;

        info!(id = updated.id, name = %updated.name, "Updated digimon");
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        let _writer = self.db.lock_writes().await;
        let result = Digimons::delete_by_id(id).exec(self.db.connection()).await?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }

        info!(id, "Deleted digimon");
        Ok(())
    }

    /// Remove every record, returning how many were deleted
    pub async fn delete_all(&self) -> Result<u64> {
        let _writer = self.db.lock_writes().await;
        let result = Digimons::delete_many().exec(self.db.connection()).await?;
        info!("Deleted {} digimons", result.rows_affected);
        Ok(result.rows_affected)
    }

    /// Atomically replace the whole collection with `inputs`.
    ///
    /// Every input is validated before the table is touched; if any insert
    /// fails the previous records are kept.
    pub async fn replace_all(&self, inputs: &[DigimonInput]) -> Result<Vec<digimons::Model>> {
        let candidates = inputs
            .iter()
            .map(NewDigimon::try_from_input)
            .collect::<Result<Vec<_>>>()?;

        let _writer = self.db.lock_writes().await;
        let txn = self.db.begin_transaction().await?;

        let removed = Digimons::delete_many().exec(&txn).await?;
        debug!("Cleared {} digimons", removed.rows_affected);

        let mut created = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            created.push(insert_new(&txn, candidate).await?);
        }

        txn.commit().await?;

        info!(
            "Replaced {} digimons with {} records",
            removed.rows_affected,
            created.len()
        );
        Ok(created)
    }
}

/// Insert a coerced record unless its name is taken
async fn insert_new<C>(conn: &C, candidate: NewDigimon) -> Result<digimons::Model>
where
    C: ConnectionTrait,
{
    if find_by_name(conn, &candidate.name, None).await?.is_some() {
        return Err(StoreError::DuplicateName(candidate.name));
    }

    let now = Utc::now();
    digimons::ActiveModel {
        id: NotSet,
        name: Set(candidate.name.clone()),
        level: Set(candidate.level),
        digimon_type: Set(candidate.digimon_type),
        description: Set(candidate.description),
        image_url: Set(candidate.image_url),
        attack_power: Set(candidate.attack_power),
        defense_value: Set(candidate.defense_value),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(|e| write_error(e, &candidate.name))
}

/// Exact, case-sensitive name lookup, optionally ignoring one record
async fn find_by_name<C>(
    conn: &C,
    name: &str,
    exclude_id: Option<i32>,
) -> Result<Option<digimons::Model>>
where
    C: ConnectionTrait,
{
    let mut query = Digimons::find().filter(digimons::Column::Name.eq(name));
    if let Some(id) = exclude_id {
        query = query.filter(digimons::Column::Id.ne(id));
    }
    Ok(query.one(conn).await?)
}

/// A unique violation on write means a concurrent writer took the name
fn write_error(err: DbErr, name: &str) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::DuplicateName(name.to_string()),
        _ => StoreError::StorageUnavailable(err),
    }
}
