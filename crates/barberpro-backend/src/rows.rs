//! Typed helpers over [`Backend`]'s JSON rows.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use barberpro_models::Table;

use crate::error::BackendError;
use crate::query::Query;
use crate::traits::Backend;

fn decode<T: DeserializeOwned>(table: Table, value: Value) -> Result<T, BackendError> {
    serde_json::from_value(value)
        .map_err(|e| BackendError::Decode(format!("{table} row: {e}")))
}

fn encode<T: Serialize>(table: Table, row: &T) -> Result<Value, BackendError> {
    serde_json::to_value(row).map_err(|e| BackendError::Decode(format!("{table} payload: {e}")))
}

pub async fn fetch_all<B, T>(backend: &B, table: Table, query: &Query) -> Result<Vec<T>, BackendError>
where
    B: Backend + ?Sized,
    T: DeserializeOwned,
{
    backend
        .select(table, query)
        .await?
        .into_iter()
        .map(|row| decode(table, row))
        .collect()
}

pub async fn fetch_optional<B, T>(
    backend: &B,
    table: Table,
    query: &Query,
) -> Result<Option<T>, BackendError>
where
    B: Backend + ?Sized,
    T: DeserializeOwned,
{
    let query = query.clone().limit(1);
    match backend.select(table, &query).await?.into_iter().next() {
        Some(row) => decode(table, row).map(Some),
        None => Ok(None),
    }
}

pub async fn insert<B, N, T>(backend: &B, table: Table, row: &N) -> Result<T, BackendError>
where
    B: Backend + ?Sized,
    N: Serialize + Sync,
    T: DeserializeOwned,
{
    let stored = backend.insert(table, encode(table, row)?).await?;
    decode(table, stored)
}

pub async fn count<B>(backend: &B, table: Table, query: &Query) -> Result<usize, BackendError>
where
    B: Backend + ?Sized,
{
    backend.count(table, query).await
}
