use crate::error::AppError;
use crate::models::User;
use mongodb::{
    bson::{doc, DateTime as BsonDateTime},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Client as MongoClient, Collection, Database, IndexModel,
};

#[derive(Clone)]
pub struct UserDb {
    client: MongoClient,
    db: Database,
}

impl UserDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    /// Create the unique index on `number`.
    ///
    /// The index backstops the query-then-insert uniqueness check in the
    /// create handler: the loser of a concurrent create gets a duplicate-key
    /// write error instead of a second document.
    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for user-service");

        let number_index = IndexModel::builder()
            .keys(doc! { "number": 1 })
            .options(
                IndexOptions::builder()
                    .name("number_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.users().create_index(number_index, None).await.map_err(|e| {
            tracing::error!("Failed to create number index: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        tracing::info!("Successfully created MongoDB indexes");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }

    pub async fn find_by_number(&self, number: &str) -> Result<Option<User>, AppError> {
        self.users()
            .find_one(doc! { "number": number }, None)
            .await
            .map_err(AppError::from)
    }

    /// Insert a new user and return it with the driver-assigned id.
    pub async fn insert(&self, mut user: User) -> Result<User, AppError> {
        let result = self.users().insert_one(&user, None).await?;
        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    /// Apply the given field values to the user with this `number` and return
    /// the post-update document. `None` fields are left untouched.
    pub async fn update_by_number(
        &self,
        number: &str,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let mut set = doc! { "updated_at": BsonDateTime::now() };
        if let Some(name) = name {
            set.insert("name", name);
        }
        if let Some(email) = email {
            set.insert("email", email);
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.users()
            .find_one_and_update(doc! { "number": number }, doc! { "$set": set }, options)
            .await
            .map_err(AppError::from)
    }
}
