//! Body of the upload routes: a JSON object, or `multipart/form-data` whose
//! file parts are page images in page order and whose text parts are fields.

use axum::{
    Json,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde_json::{Map, Value};

use grader::{MemoryPageSource, PAGE_IMAGE_EXTENSIONS, page_media_type};

use super::error::GatewayError;

const PAGES_FIELD: &str = "pages";

#[derive(Debug, Default)]
pub struct UploadBody {
    /// JSON members, or multipart text fields as strings.
    pub fields: Map<String, Value>,
    /// Uploaded page images; empty for JSON bodies.
    pub images: MemoryPageSource,
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
}

impl<S> FromRequest<S> for UploadBody
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(&req) {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
            return read_multipart(multipart).await;
        }

        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
        match body {
            Value::Object(fields) => Ok(Self {
                fields,
                images: MemoryPageSource::new(),
            }),
            _ => Err(GatewayError::InvalidRequest(
                "request body must be a JSON object".to_string(),
            )),
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<UploadBody, GatewayError> {
    let invalid = |e: axum::extract::multipart::MultipartError| {
        GatewayError::InvalidRequest(format!("malformed multipart body: {}", e.body_text()))
    };

    let mut upload = UploadBody::default();
    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        let name = field.name().unwrap_or_default().to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let text = Value::String(field.text().await.map_err(invalid)?);
            // Repeated `pages` parts are inline page texts, in order.
            if name == PAGES_FIELD {
                if let Value::Array(pages) = upload
                    .fields
                    .entry(PAGES_FIELD)
                    .or_insert_with(|| Value::Array(Vec::new()))
                {
                    pages.push(text);
                }
            } else {
                upload.fields.insert(name, text);
            }
            continue;
        };

        let media_type = page_media_type(&file_name, field.content_type()).ok_or_else(|| {
            GatewayError::InvalidRequest(format!(
                "unsupported page file '{file_name}': upload one {} image per page",
                PAGE_IMAGE_EXTENSIONS.join("/")
            ))
        })?;
        let bytes = field.bytes().await.map_err(invalid)?;
        upload.images.push(file_name, media_type, bytes.to_vec());
    }

    Ok(upload)
}
