//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! All Qdrant interactions sit behind this minimal API, keeping the builder
//! pattern out of the rest of the crate.

use std::collections::HashMap;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchParamsBuilder, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QValue, VectorParamsBuilder,
};
use tracing::{debug, info};

use crate::config::QdrantIndexConfig;
use crate::errors::IndexError;

pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    exact: bool,
}

impl QdrantFacade {
    /// Builds the client; no network I/O happens here.
    pub fn new(cfg: &QdrantIndexConfig) -> Result<Self, IndexError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.url);
        if let Some(key) = &cfg.api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            exact: cfg.exact_search,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub async fn collection_exists(&self) -> Result<bool, IndexError> {
        self.client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))
    }

    /// Deletes the collection; a missing collection is not an error.
    pub async fn drop_collection(&self) -> Result<(), IndexError> {
        if self.collection_exists().await? {
            info!("Dropping collection '{}'", self.collection);
            self.client
                .delete_collection(&self.collection)
                .await
                .map_err(|e| IndexError::Qdrant(e.to_string()))?;
        }
        Ok(())
    }

    /// Drops the collection if present and creates it empty (cosine distance).
    pub async fn recreate_collection(&self, size: usize) -> Result<(), IndexError> {
        self.drop_collection().await?;

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(size as u64, Distance::Cosine)),
            )
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        info!("Collection '{}' created with size={}", self.collection, size);
        Ok(())
    }

    /// Upserts a batch of points and waits for it to be applied.
    pub async fn upsert_points(&self, points: Vec<PointStruct>) -> Result<usize, IndexError> {
        if points.is_empty() {
            return Ok(0);
        }
        let n = points.len();
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;
        debug!("Upserted {} points into '{}'", n, self.collection);
        Ok(n)
    }

    /// Top-k similarity search returning `(score, payload)` tuples, best first.
    pub async fn search(
        &self,
        vector: Vec<f32>,
        top_k: u64,
    ) -> Result<Vec<(f32, serde_json::Value)>, IndexError> {
        let mut builder =
            SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true);
        if self.exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        let out: Vec<(f32, serde_json::Value)> = res
            .result
            .into_iter()
            .map(|p| (p.score, qpayload_to_json(p.payload)))
            .collect();
        debug!("Search in '{}' returned {} hits", self.collection, out.len());
        Ok(out)
    }
}

/// Converts a Qdrant payload into JSON. Nested values map to `Null`.
fn qpayload_to_json(p: HashMap<String, QValue>) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind as K;
    let m = p
        .into_iter()
        .map(|(k, v)| {
            let j = match v.kind {
                Some(K::StringValue(s)) => serde_json::Value::String(s),
                Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
                Some(K::DoubleValue(f)) => serde_json::json!(f),
                Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
                _ => serde_json::Value::Null,
            };
            (k, j)
        })
        .collect();
    serde_json::Value::Object(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdrant_client::qdrant::value::Kind;

    #[test]
    fn payload_strings_survive_conversion() {
        let mut p = HashMap::new();
        p.insert(
            "source".to_string(),
            QValue {
                kind: Some(Kind::StringValue("login.md".into())),
            },
        );
        p.insert(
            "ordinal".to_string(),
            QValue {
                kind: Some(Kind::IntegerValue(3)),
            },
        );
        let json = qpayload_to_json(p);
        assert_eq!(json["source"], "login.md");
        assert_eq!(json["ordinal"], 3);
    }
}
