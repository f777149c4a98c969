//! MongoDB implementation of CustomerRepository

use async_trait::async_trait;
use chrono::Utc;
use database::mongo::{ReadOptions, Repository, UpdateSpec};
use mongodb::bson::{doc, oid::ObjectId, to_bson, Bson, Document};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use tracing::instrument;

use crate::error::{CustomerError, CustomerResult};
use crate::models::{normalize_email, Customer, UpdateCustomer};
use crate::repository::CustomerRepository;

const COLLECTION: &str = "customers";

/// MongoDB implementation of the CustomerRepository
pub struct MongoCustomerRepository {
    repo: Repository<Customer>,
}

impl MongoCustomerRepository {
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, COLLECTION)
    }

    /// Bind to a custom collection name (isolated test databases)
    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        Self {
            repo: Repository::new(db.collection::<Customer>(collection_name)),
        }
    }

    /// Create the unique email and phone indexes. Idempotent.
    pub async fn ensure_indexes(&self) -> mongodb::error::Result<()> {
        let unique = || IndexOptions::builder().unique(true).build();
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(unique())
                .build(),
            IndexModel::builder()
                .keys(doc! { "phone": 1 })
                .options(unique())
                .build(),
        ];
        self.repo.collection().create_indexes(indexes).await?;
        Ok(())
    }

    /// Default projection: the password digest never leaves the database
    fn password_excluded() -> Document {
        doc! { "password": 0 }
    }

    fn build_profile_patch(update: UpdateCustomer) -> Document {
        let mut fields = doc! {};
        if let Some(first_name) = update.first_name {
            fields.insert("first_name", first_name);
        }
        if let Some(last_name) = update.last_name {
            fields.insert("last_name", last_name);
        }
        if let Some(phone) = update.phone {
            fields.insert("phone", phone.trim());
        }
        if let Some(address) = update.address {
            fields.insert("address", to_bson(&address).unwrap_or(Bson::Null));
        }
        fields.insert("updated_at", Utc::now().to_rfc3339());
        fields
    }
}

#[async_trait]
impl CustomerRepository for MongoCustomerRepository {
    #[instrument(skip(self, customer), fields(customer_email = %customer.email))]
    async fn create(&self, customer: Customer) -> CustomerResult<Customer> {
        let mut created = self.repo.create(vec![customer]).await?;

        match created.pop() {
            Some(customer) => {
                tracing::info!(customer_id = %customer.id, "Customer created successfully");
                Ok(customer)
            }
            None => Err(CustomerError::CreateFailed),
        }
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> CustomerResult<Option<Customer>> {
        let customer = self
            .repo
            .find_one(
                doc! { "_id": id },
                ReadOptions::new().projection(Self::password_excluded()),
            )
            .await?;
        Ok(customer)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> CustomerResult<Option<Customer>> {
        let customer = self
            .repo
            .find_one(
                doc! { "email": normalize_email(email) },
                ReadOptions::new().projection(Self::password_excluded()),
            )
            .await?;
        Ok(customer)
    }

    #[instrument(skip(self))]
    async fn find_by_email_with_password(&self, email: &str) -> CustomerResult<Option<Customer>> {
        let customer = self
            .repo
            .find_one(doc! { "email": normalize_email(email) }, ReadOptions::new())
            .await?;
        Ok(customer)
    }

    #[instrument(skip(self))]
    async fn find_by_phone(&self, phone: &str) -> CustomerResult<Option<Customer>> {
        let customer = self
            .repo
            .find_one(
                doc! { "phone": phone.trim() },
                ReadOptions::new().projection(Self::password_excluded()),
            )
            .await?;
        Ok(customer)
    }

    #[instrument(skip(self))]
    async fn find_by_id_with_password(&self, id: ObjectId) -> CustomerResult<Option<Customer>> {
        let customer = self
            .repo
            .find_one(doc! { "_id": id }, ReadOptions::new())
            .await?;
        Ok(customer)
    }

    #[instrument(skip(self, update))]
    async fn update_profile(
        &self,
        id: ObjectId,
        update: UpdateCustomer,
    ) -> CustomerResult<Option<Customer>> {
        let updated = self
            .repo
            .find_one_and_update(
                doc! { "_id": id },
                UpdateSpec::fields(Self::build_profile_patch(update)),
            )
            .await?;
        Ok(updated.map(Customer::redacted))
    }

    #[instrument(skip(self, password_hash))]
    async fn set_password(&self, id: ObjectId, password_hash: String) -> CustomerResult<bool> {
        let result = self
            .repo
            .update_one(
                doc! { "_id": id },
                UpdateSpec::fields(doc! {
                    "password": password_hash,
                    "updated_at": Utc::now().to_rfc3339(),
                }),
            )
            .await?;

        Ok(result.matched_count > 0)
    }
}
