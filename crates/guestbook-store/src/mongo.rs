//! MongoDB backend.
//!
//! Comments live in a single collection; documents are mapped to and from
//! [`Comment`] by hand so the wire JSON shape stays independent of the
//! stored BSON shape (`_id` is a real object id, `when` a BSON datetime so
//! the newest-first sort is a date sort, not a string sort).

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use futures::TryStreamExt;
use mongodb::{Client, Collection};

use crate::backend::CommentBackend;
use crate::error::Result;
use crate::models::Comment;

pub struct MongoBackend {
    collection: Collection<Document>,
}

impl MongoBackend {
    /// Connect to the store and bind the comments collection.
    ///
    /// The driver connects lazily, so we ping the target database here: a
    /// bad address fails at startup instead of on the first request.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        client.database(database).run_command(doc! { "ping": 1 }).await?;

        tracing::info!(%database, %collection, "connected to document store");

        Ok(Self {
            collection: client.database(database).collection(collection),
        })
    }
}

#[async_trait]
impl CommentBackend for MongoBackend {
    async fn insert(&self, comment: &Comment) -> Result<()> {
        self.collection.insert_one(comment_to_doc(comment)?).await?;
        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Comment>> {
        let mut cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "when": -1 })
            .limit(limit)
            .await?;

        let mut comments = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            comments.push(doc_to_comment(&document)?);
        }
        Ok(comments)
    }
}

fn comment_to_doc(comment: &Comment) -> Result<Document> {
    let id = ObjectId::parse_str(&comment.id)?;
    Ok(doc! {
        "_id": id,
        "author": comment.author.as_str(),
        "text": comment.text.as_str(),
        "when": BsonDateTime::from_chrono(comment.when),
    })
}

fn doc_to_comment(document: &Document) -> Result<Comment> {
    Ok(Comment {
        id: document.get_object_id("_id")?.to_hex(),
        author: document.get_str("author")?.to_string(),
        text: document.get_str("text")?.to_string(),
        when: document.get_datetime("when")?.to_chrono(),
    })
}
