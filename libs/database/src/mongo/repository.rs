//! Generic typed repository over a MongoDB collection.
//!
//! [`Repository<T>`] is a mechanical pass-through: it performs no input
//! validation and no error classification. Driver errors surface unchanged;
//! "not found" is `None`/empty, never an error. Business meaning is assigned
//! by the domain services sitting above the entity repositories.
//!
//! Every update-family operation routes its [`UpdateSpec`] through
//! [`UpdateSpec::with_revision_increment`], so each successful update bumps
//! the document's revision counter by exactly one. The counter is an audit
//! trail, not an optimistic-concurrency gate: no operation reads it back or
//! conditions a write on it.

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::error::{ErrorKind, Result, WriteFailure};
use mongodb::options::{
    FindOneAndUpdateOptions, FindOneOptions, FindOptions, ReturnDocument, UpdateModifications,
};
use mongodb::results::{DeleteResult, UpdateResult};
use mongodb::Collection;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Per-document revision counter, incremented on every update-family write.
pub const REVISION_FIELD: &str = "revision";

/// Projection, sort and pagination options for read operations.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    pub projection: Option<Document>,
    pub sort: Option<Document>,
    pub skip: Option<u64>,
    pub limit: Option<i64>,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projection(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn sort(mut self, sort: Document) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Describes a `$lookup` dereferencing one foreign-key field into an
/// embedded document on the result rows.
#[derive(Debug, Clone)]
pub struct Lookup {
    /// Foreign collection name
    pub from: String,
    /// Field on this collection holding the reference
    pub local_field: String,
    /// Field on the foreign collection (usually `_id`)
    pub foreign_field: String,
    /// Name of the embedded field on the result row
    pub as_field: String,
}

impl Lookup {
    /// Lookup joining `local_field` against the foreign collection's `_id`,
    /// embedding the match under `as_field`.
    pub fn by_id(
        from: impl Into<String>,
        local_field: impl Into<String>,
        as_field: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            local_field: local_field.into(),
            foreign_field: "_id".to_string(),
            as_field: as_field.into(),
        }
    }
}

/// Update payload in one of the two forms MongoDB accepts.
///
/// The two forms attach the revision increment differently: an operator
/// document gets `$inc: {revision: 1}` merged in, while a pipeline gets a
/// terminal `$set` stage appended (operator merging does not exist for
/// pipelines). Callers pick the form explicitly; nothing inspects the
/// payload at runtime to guess.
#[derive(Debug, Clone)]
pub enum UpdateSpec {
    /// Update-operator document, e.g. `{"$set": {...}, "$unset": {...}}`
    Patch(Document),
    /// Aggregation-pipeline update: an ordered list of stages
    Pipeline(Vec<Document>),
}

impl UpdateSpec {
    /// Patch that sets the given fields (wraps them in `$set`).
    pub fn fields(fields: Document) -> Self {
        UpdateSpec::Patch(doc! { "$set": fields })
    }

    /// Patch from a raw update-operator document.
    pub fn patch(update: Document) -> Self {
        UpdateSpec::Patch(update)
    }

    /// Aggregation-pipeline update.
    pub fn pipeline(stages: Vec<Document>) -> Self {
        UpdateSpec::Pipeline(stages)
    }

    /// Attach the revision increment and produce the driver-level update.
    ///
    /// This is the only route from an `UpdateSpec` to the driver, so no
    /// mutation path can skip the counter. Caller-supplied `$inc` entries
    /// are preserved.
    pub fn with_revision_increment(self) -> UpdateModifications {
        match self {
            UpdateSpec::Patch(mut update) => {
                match update.get_document_mut("$inc") {
                    Ok(inc) => {
                        inc.insert(REVISION_FIELD, 1i64);
                    }
                    Err(_) => {
                        update.insert("$inc", doc! { REVISION_FIELD: 1i64 });
                    }
                }
                UpdateModifications::Document(update)
            }
            UpdateSpec::Pipeline(mut stages) => {
                stages.push(doc! {
                    "$set": { REVISION_FIELD: { "$add": [format!("${}", REVISION_FIELD), 1] } }
                });
                UpdateModifications::Pipeline(stages)
            }
        }
    }
}

/// Returns true when the error is a storage-level uniqueness violation
/// (duplicate key, server code 11000).
pub fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    match &*error.kind {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        ErrorKind::InsertMany(insert_error) => insert_error
            .write_errors
            .iter()
            .flatten()
            .any(|e| e.code == 11000),
        ErrorKind::Command(command_error) => command_error.code == 11000,
        _ => false,
    }
}

/// Generic repository bound to one collection.
///
/// Entity repositories wrap an instance of this and add their named finders.
/// The collection handle is injected at construction; the repository never
/// creates or discovers its own collection.
#[derive(Clone)]
pub struct Repository<T: Send + Sync> {
    collection: Collection<T>,
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(collection: Collection<T>) -> Self {
        Self { collection }
    }

    /// The underlying collection, for operations outside the generic
    /// contract (counts, index management).
    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    /// Insert a batch and return the hydrated records.
    ///
    /// Identity and timestamps are assigned by the entity constructors
    /// before the insert, so the input already is the persisted shape.
    /// An empty batch returns an empty vector without a driver round trip.
    pub async fn create(&self, records: Vec<T>) -> Result<Vec<T>> {
        if records.is_empty() {
            return Ok(records);
        }
        self.collection.insert_many(&records).await?;
        Ok(records)
    }

    /// Find a single document. `None` when nothing matches.
    pub async fn find_one(&self, filter: Document, options: ReadOptions) -> Result<Option<T>> {
        let opts = FindOneOptions::builder()
            .projection(options.projection)
            .sort(options.sort)
            .skip(options.skip)
            .build();

        self.collection.find_one(filter).with_options(opts).await
    }

    /// Find all matching documents. Empty vector when nothing matches.
    pub async fn find(&self, filter: Document, options: ReadOptions) -> Result<Vec<T>> {
        let opts = FindOptions::builder()
            .projection(options.projection)
            .sort(options.sort)
            .skip(options.skip)
            .limit(options.limit)
            .build();

        let cursor = self.collection.find(filter).with_options(opts).await?;
        cursor.try_collect().await
    }

    /// Find matching documents with one foreign-key field dereferenced into
    /// an embedded document (`$match`/`$lookup`/`$unwind` aggregation).
    ///
    /// `U` is the populated row shape; rows whose reference resolves to
    /// nothing are dropped by the `$unwind`.
    pub async fn find_populated<U>(
        &self,
        filter: Document,
        lookup: Lookup,
        options: ReadOptions,
    ) -> Result<Vec<U>>
    where
        U: DeserializeOwned + Send + Sync,
    {
        let unwind_path = format!("${}", lookup.as_field);

        let mut pipeline = vec![doc! { "$match": filter }];
        if let Some(sort) = options.sort {
            pipeline.push(doc! { "$sort": sort });
        }
        if let Some(skip) = options.skip {
            pipeline.push(doc! { "$skip": skip as i64 });
        }
        if let Some(limit) = options.limit {
            pipeline.push(doc! { "$limit": limit });
        }
        pipeline.push(doc! {
            "$lookup": {
                "from": lookup.from,
                "localField": lookup.local_field,
                "foreignField": lookup.foreign_field,
                "as": lookup.as_field,
            }
        });
        pipeline.push(doc! { "$unwind": unwind_path });
        if let Some(projection) = options.projection {
            pipeline.push(doc! { "$project": projection });
        }

        let cursor = self.collection.aggregate(pipeline).with_type::<U>().await?;
        cursor.try_collect().await
    }

    /// Apply an update to the first matching document, bumping its revision
    /// counter as part of the same write.
    pub async fn update_one(&self, filter: Document, update: UpdateSpec) -> Result<UpdateResult> {
        self.collection
            .update_one(filter, update.with_revision_increment())
            .await
    }

    /// Update by identity and return the post-update document.
    pub async fn find_by_id_and_update(
        &self,
        id: ObjectId,
        update: UpdateSpec,
    ) -> Result<Option<T>> {
        self.find_one_and_update(doc! { "_id": id }, update).await
    }

    /// Update by filter and return the post-update document.
    pub async fn find_one_and_update(
        &self,
        filter: Document,
        update: UpdateSpec,
    ) -> Result<Option<T>> {
        let opts = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection
            .find_one_and_update(filter, update.with_revision_increment())
            .with_options(opts)
            .await
    }

    /// Remove and return the matching document.
    ///
    /// The revision counter is not bumped here: the document ceases to
    /// exist, so the increment the update family performs would be inert.
    pub async fn find_one_and_delete(&self, filter: Document) -> Result<Option<T>> {
        self.collection.find_one_and_delete(filter).await
    }

    /// Remove the first matching document. No revision semantics.
    pub async fn delete_one(&self, filter: Document) -> Result<DeleteResult> {
        self.collection.delete_one(filter).await
    }

    /// Remove all matching documents. No revision semantics.
    pub async fn delete_many(&self, filter: Document) -> Result<DeleteResult> {
        self.collection.delete_many(filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Gadget {
        #[serde(rename = "_id")]
        id: ObjectId,
        name: String,
        tally: i64,
        revision: i64,
    }

    fn as_document(update: UpdateModifications) -> Document {
        match update {
            UpdateModifications::Document(doc) => doc,
            other => panic!("expected document update, got {other:?}"),
        }
    }

    fn as_pipeline(update: UpdateModifications) -> Vec<Document> {
        match update {
            UpdateModifications::Pipeline(stages) => stages,
            other => panic!("expected pipeline update, got {other:?}"),
        }
    }

    #[test]
    fn test_fields_wraps_in_set_and_adds_increment() {
        let update = UpdateSpec::fields(doc! { "name": "widget" }).with_revision_increment();
        let doc = as_document(update);

        assert_eq!(
            doc.get_document("$set").unwrap().get_str("name").unwrap(),
            "widget"
        );
        assert_eq!(
            doc.get_document("$inc")
                .unwrap()
                .get_i64(REVISION_FIELD)
                .unwrap(),
            1
        );
    }

    #[test]
    fn test_patch_preserves_existing_inc_entries() {
        let update = UpdateSpec::patch(doc! {
            "$inc": { "tally": -3 },
            "$set": { "name": "widget" },
        })
        .with_revision_increment();
        let doc = as_document(update);

        let inc = doc.get_document("$inc").unwrap();
        assert_eq!(inc.get_i32("tally").unwrap(), -3);
        assert_eq!(inc.get_i64(REVISION_FIELD).unwrap(), 1);
    }

    #[test]
    fn test_patch_without_operators_gains_inc_only() {
        let update = UpdateSpec::patch(doc! { "$unset": { "name": 1 } }).with_revision_increment();
        let doc = as_document(update);

        assert!(doc.get_document("$unset").is_ok());
        assert_eq!(
            doc.get_document("$inc")
                .unwrap()
                .get_i64(REVISION_FIELD)
                .unwrap(),
            1
        );
    }

    #[test]
    fn test_pipeline_appends_terminal_increment_stage() {
        let stages = vec![doc! { "$set": { "name": "widget" } }];
        let update = UpdateSpec::pipeline(stages).with_revision_increment();
        let stages = as_pipeline(update);

        assert_eq!(stages.len(), 2);
        let last = stages.last().unwrap().get_document("$set").unwrap();
        let add = last.get_document(REVISION_FIELD).unwrap();
        assert_eq!(
            add.get_array("$add").unwrap()[0],
            Bson::String(format!("${}", REVISION_FIELD))
        );
    }

    #[test]
    fn test_read_options_builder() {
        let options = ReadOptions::new()
            .projection(doc! { "password": 0 })
            .sort(doc! { "created_at": -1 })
            .skip(10)
            .limit(5);

        assert_eq!(options.projection, Some(doc! { "password": 0 }));
        assert_eq!(options.sort, Some(doc! { "created_at": -1 }));
        assert_eq!(options.skip, Some(10));
        assert_eq!(options.limit, Some(5));
    }

    #[test]
    fn test_lookup_by_id_defaults_foreign_field() {
        let lookup = Lookup::by_id("products", "product_id", "product");
        assert_eq!(lookup.from, "products");
        assert_eq!(lookup.local_field, "product_id");
        assert_eq!(lookup.foreign_field, "_id");
        assert_eq!(lookup.as_field, "product");
    }

    // Integration coverage below requires a running MongoDB instance.

    async fn test_repository() -> Repository<Gadget> {
        let client = mongodb::Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let collection = client
            .database("catalog_repo_test")
            .collection::<Gadget>("gadgets");
        collection.drop().await.ok();
        Repository::new(collection)
    }

    #[tokio::test]
    async fn test_create_empty_batch_is_a_noop() {
        // Client construction is lazy, and the empty batch returns
        // before any driver round trip, so no server is needed here.
        let client = mongodb::Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let repo: Repository<Gadget> =
            Repository::new(client.database("catalog_repo_test").collection("gadgets"));

        let created = repo.create(vec![]).await.unwrap();
        assert!(created.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_revision_increments_on_both_update_forms() {
        let repo = test_repository().await;

        let gadget = Gadget {
            id: ObjectId::new(),
            name: "widget".to_string(),
            tally: 0,
            revision: 0,
        };
        let id = gadget.id;
        repo.create(vec![gadget]).await.unwrap();

        let after_patch = repo
            .find_by_id_and_update(id, UpdateSpec::fields(doc! { "name": "sprocket" }))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after_patch.revision, 1);

        let after_pipeline = repo
            .find_by_id_and_update(
                id,
                UpdateSpec::pipeline(vec![doc! { "$set": { "tally": 7 } }]),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after_pipeline.revision, 2);
        assert_eq!(after_pipeline.tally, 7);
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_delete_family_reports_deleted_counts() {
        let repo = test_repository().await;

        let gadgets: Vec<Gadget> = (0i64..3)
            .map(|i| Gadget {
                id: ObjectId::new(),
                name: format!("gadget-{i}"),
                tally: i,
                revision: 0,
            })
            .collect();
        let created = repo.create(gadgets).await.unwrap();
        assert_eq!(created.len(), 3);

        let first = repo
            .delete_one(doc! { "name": "gadget-0" })
            .await
            .unwrap();
        assert_eq!(first.deleted_count, 1);

        let rest = repo.delete_many(doc! {}).await.unwrap();
        assert_eq!(rest.deleted_count, 2);

        let gone = repo
            .find_one_and_delete(doc! { "name": "gadget-1" })
            .await
            .unwrap();
        assert!(gone.is_none());
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_zero_match_reads_return_empty() {
        let repo = test_repository().await;

        let one = repo
            .find_one(doc! { "name": "nope" }, ReadOptions::new())
            .await
            .unwrap();
        assert!(one.is_none());

        let many = repo
            .find(doc! { "name": "nope" }, ReadOptions::new())
            .await
            .unwrap();
        assert!(many.is_empty());
    }
}
