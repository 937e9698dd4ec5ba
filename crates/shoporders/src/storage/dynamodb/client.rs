//! Thin typed wrapper around the DynamoDB table.
//!
//! All higher-level code goes through `TableClient`; it knows attribute
//! names and pagination, nothing about entities.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, WriteRequest};
use aws_sdk_dynamodb::Client;
use shoporders_core::storage::{Result, StoreError};

use super::error::{
    map_batch_write_error, map_get_item_error, map_put_item_error, map_query_error, map_scan_error,
    map_update_item_error,
};
use super::keys::{ATTR_ENTITY_TYPE, ATTR_PK, ATTR_SK};

/// A raw stored item.
pub type Item = HashMap<String, AttributeValue>;

/// Resubmission cap for unprocessed items in a batch write.
const BATCH_WRITE_PASSES: usize = 3;

/// DynamoDB writes at most 25 items per batch request.
const BATCH_WRITE_CHUNK: usize = 25;

#[derive(Debug, Clone)]
pub struct TableClient {
    client: Client,
    table_name: String,
}

impl TableClient {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Point lookup by composite key.
    pub async fn get_item(&self, pk: String, sk: String) -> Result<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ATTR_PK, AttributeValue::S(pk))
            .key(ATTR_SK, AttributeValue::S(sk))
            .send()
            .await
            .map_err(map_get_item_error)?;

        Ok(result.item)
    }

    /// Unconditional single-item write.
    pub async fn put_item(&self, item: Item) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(())
    }

    /// Writes all items in chunks of 25, resubmitting unprocessed items a
    /// bounded number of times. Not atomic across items: a surfaced error
    /// means some items may already be persisted.
    pub async fn batch_put_items(&self, items: Vec<Item>) -> Result<()> {
        for chunk in items.chunks(BATCH_WRITE_CHUNK) {
            let mut requests = chunk
                .iter()
                .cloned()
                .map(|item| {
                    let put = PutRequest::builder()
                        .set_item(Some(item))
                        .build()
                        .map_err(|e| StoreError::Serialization(e.to_string()))?;
                    Ok(WriteRequest::builder().put_request(put).build())
                })
                .collect::<Result<Vec<_>>>()?;

            for pass in 0..BATCH_WRITE_PASSES {
                let result = self
                    .client
                    .batch_write_item()
                    .request_items(&self.table_name, requests)
                    .send()
                    .await
                    .map_err(map_batch_write_error)?;

                let mut unprocessed = result.unprocessed_items.unwrap_or_default();
                match unprocessed.remove(&self.table_name) {
                    Some(remaining) if !remaining.is_empty() => {
                        tracing::warn!(
                            remaining = remaining.len(),
                            pass = pass + 1,
                            "batch write left unprocessed items, resubmitting"
                        );
                        requests = remaining;
                    }
                    _ => {
                        requests = Vec::new();
                        break;
                    }
                }
            }

            if !requests.is_empty() {
                return Err(StoreError::QueryFailed(format!(
                    "{} items unprocessed after {BATCH_WRITE_PASSES} batch write passes",
                    requests.len()
                )));
            }
        }

        Ok(())
    }

    /// Key-condition query: partition equality plus an optional sort-key
    /// prefix, on the base table or a secondary index. Follows
    /// continuation keys until the result set is exhausted.
    pub async fn query(
        &self,
        index: Option<&str>,
        pk_attr: &str,
        pk_value: String,
        sk_prefix: Option<(&str, String)>,
    ) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let mut request = self
                .client
                .query()
                .table_name(&self.table_name)
                .set_index_name(index.map(String::from))
                .expression_attribute_names("#pk", pk_attr)
                .expression_attribute_values(":pk", AttributeValue::S(pk_value.clone()))
                .set_exclusive_start_key(start_key.take());

            request = match &sk_prefix {
                Some((sk_attr, prefix)) => request
                    .key_condition_expression("#pk = :pk AND begins_with(#sk, :sk)")
                    .expression_attribute_names("#sk", *sk_attr)
                    .expression_attribute_values(":sk", AttributeValue::S(prefix.clone())),
                None => request.key_condition_expression("#pk = :pk"),
            };

            let result = request.send().await.map_err(map_query_error)?;
            items.extend(result.items.unwrap_or_default());

            match result.last_evaluated_key {
                Some(key) => start_key = Some(key),
                None => return Ok(items),
            }
        }
    }

    /// Full scan filtered to one entity type, on the base table or a
    /// secondary index, draining pagination.
    pub async fn scan_entity(&self, index: Option<&str>, entity_type: &str) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let result = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_index_name(index.map(String::from))
                .filter_expression("#t = :t")
                .expression_attribute_names("#t", ATTR_ENTITY_TYPE)
                .expression_attribute_values(":t", AttributeValue::S(entity_type.to_string()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(map_scan_error)?;

            items.extend(result.items.unwrap_or_default());

            match result.last_evaluated_key {
                Some(key) => start_key = Some(key),
                None => return Ok(items),
            }
        }
    }

    /// Single-item compare-and-swap: applies `update_expression` only when
    /// `condition_expression` holds. A failed condition surfaces as the
    /// distinct `PreconditionFailed` outcome carrying `entity_type`/`id`.
    #[allow(clippy::too_many_arguments)]
    pub async fn conditional_update(
        &self,
        pk: String,
        sk: String,
        update_expression: &str,
        values: Vec<(String, AttributeValue)>,
        condition_expression: &str,
        entity_type: &'static str,
        id: &str,
    ) -> Result<()> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key(ATTR_PK, AttributeValue::S(pk))
            .key(ATTR_SK, AttributeValue::S(sk))
            .update_expression(update_expression)
            .condition_expression(condition_expression)
            .set_expression_attribute_values(Some(values.into_iter().collect()))
            .send()
            .await
            .map_err(|e| map_update_item_error(e, entity_type, id))?;

        Ok(())
    }
}
