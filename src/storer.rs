use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::error::Error;

// Puts a byte buffer at a key and returns a publicly resolvable URL.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn put(&self, key: &str, bytes: &[u8], mime: &str) -> Result<String, Error>;
}

pub struct LocalStore {
    root: PathBuf,
    base_url: String,
}

impl LocalStore {
    pub fn new(root: &str, base_url: &str) -> Self {
        Self {
            root: PathBuf::from(root),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

#[async_trait]
impl FileStore for LocalStore {
    async fn put(&self, key: &str, bytes: &[u8], _mime: &str) -> Result<String, Error> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::ExternalService(format!("local storage: {}", e)))?;
        }
        fs::write(&path, bytes).map_err(|e| Error::ExternalService(format!("local storage: {}", e)))?;
        // the upload root is served read-only under /static
        Ok(format!("{}/static/{}", self.base_url, key))
    }
}

pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub async fn from_env(bucket: String) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: Client::new(&config),
            bucket,
        }
    }
}

#[async_trait]
impl FileStore for S3Store {
    async fn put(&self, key: &str, bytes: &[u8], mime: &str) -> Result<String, Error> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(mime)
            .body(ByteStream::from(bytes.to_vec()))
            .send()
            .await
            .map_err(|e| Error::ExternalService(format!("s3 upload: {}", e)))?;
        Ok(format!("https://{}.s3.amazonaws.com/{}", self.bucket, key))
    }
}

// Tries cloud storage once and falls back to local before giving up.
pub struct FallbackStore {
    primary: S3Store,
    fallback: LocalStore,
}

impl FallbackStore {
    pub fn new(primary: S3Store, fallback: LocalStore) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl FileStore for FallbackStore {
    async fn put(&self, key: &str, bytes: &[u8], mime: &str) -> Result<String, Error> {
        match self.primary.put(key, bytes, mime).await {
            Ok(url) => Ok(url),
            Err(e) => {
                log::warn!("cloud upload failed, falling back to local storage: {}", e);
                self.fallback.put(key, bytes, mime).await
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_local_store_writes_and_returns_url() {
        let root = std::env::temp_dir().join(format!("bnwg-store-{}", Uuid::new_v4()));
        let store = LocalStore::new(root.to_str().unwrap(), "http://localhost:8000/");
        let key = "member-files/2024-01-01/test.pdf";

        let url = store.put(key, b"hello", "application/pdf").await.unwrap();

        assert_eq!(url, format!("http://localhost:8000/static/{}", key));
        assert_eq!(fs::read(root.join(key)).unwrap(), b"hello");
        fs::remove_dir_all(&root).unwrap();
    }
}
