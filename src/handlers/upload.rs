use actix_multipart::Multipart;
use actix_web::web::{Data, Json};
use chrono::Utc;
use futures_util::TryStreamExt;
use uuid::Uuid;

use crate::error::Error;
use crate::response::UploadResponse;
use crate::storer::FileStore;

const MAX_FILE_SIZE: usize = 16 * 1024 * 1024;

pub async fn create(mut payload: Multipart, store: Data<dyn FileStore>) -> Result<Json<UploadResponse>, Error> {
    while let Some(mut field) = payload.try_next().await.map_err(|e| Error::BadRequest(e.to_string()))? {
        let file_name = field
            .content_disposition()
            .get_filename()
            .map(|name| name.to_owned())
            .unwrap_or_else(|| "file".to_owned());
        let mime_type = field
            .content_type()
            .map(|mime| mime.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_owned());

        let mut content = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(|e| Error::BadRequest(e.to_string()))? {
            if content.len() + chunk.len() > MAX_FILE_SIZE {
                return Err(Error::BadRequest("file exceeds the 16 MiB limit".to_owned()));
            }
            content.extend_from_slice(&chunk);
        }

        // random key; the original filename only survives in the metadata
        let key = match file_name.rsplit_once('.') {
            Some((_, extension)) => format!(
                "member-files/{}/{}.{}",
                Utc::now().format("%Y-%m-%d"),
                Uuid::new_v4(),
                extension.to_ascii_lowercase(),
            ),
            None => format!("member-files/{}/{}", Utc::now().format("%Y-%m-%d"), Uuid::new_v4()),
        };
        let file_size = content.len() as i64;
        let file_url = store.put(&key, &content, &mime_type).await?;

        return Ok(Json(UploadResponse {
            success: true,
            file_key: key,
            file_url,
            file_name,
            file_size,
            mime_type,
        }));
    }
    Err(Error::BadRequest("no file uploaded".to_owned()))
}
