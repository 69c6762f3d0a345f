use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{multipart, Body, Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    application::{
        context::RequestContext,
        error::ApplicationError,
        services::{FileStoreApi, ProgressSink},
    },
    domain::models::{
        file::{FileData, FileId, FileRecord},
        pagination::{FilePage, PageRequest, Pagination},
        search::SearchFilters,
        session::Credentials,
        stats::StorageStats,
    },
    services::error::StorageError,
};

/// Upload bodies are streamed in chunks of this size; progress is reported per chunk.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    hash: String,
}

#[derive(Debug, Deserialize)]
struct FileListResponse {
    #[serde(default)]
    files: Option<Vec<FileRecord>>,
    pagination: Pagination,
}

impl From<FileListResponse> for FilePage {
    fn from(value: FileListResponse) -> Self {
        FilePage {
            files: value.files.unwrap_or_default(),
            pagination: value.pagination,
        }
    }
}

pub struct HttpFileStoreApi {
    client: Client,
    base_url: String,
}

impl HttpFileStoreApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(builder: RequestBuilder, ctx: &RequestContext) -> RequestBuilder {
        match ctx.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn ensure_success(response: Response) -> Result<Response, StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!("Remote call failed with status {}", status);
        Err(StorageError::from_response(status.as_u16(), &body))
    }

    async fn fetch_page(
        &self,
        ctx: &RequestContext,
        path: &str,
        params: Vec<(&'static str, String)>,
    ) -> Result<FilePage, ApplicationError> {
        debug!("GET {} with {} parameter(s)", path, params.len());

        let request = self.client.get(self.url(path)).query(&params);
        let response = Self::authorize(request, ctx)
            .send()
            .await
            .map_err(StorageError::from)?;
        let response = Self::ensure_success(response).await?;

        let body: FileListResponse = response.json().await.map_err(StorageError::from)?;
        Ok(body.into())
    }
}

fn page_params(page: PageRequest) -> Vec<(&'static str, String)> {
    vec![
        ("page", page.page.to_string()),
        ("pageSize", page.page_size.to_string()),
    ]
}

#[async_trait]
impl FileStoreApi for HttpFileStoreApi {
    async fn login(&self, credentials: &Credentials) -> Result<String, ApplicationError> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(credentials)
            .send()
            .await
            .map_err(StorageError::from)?;
        let response = Self::ensure_success(response).await?;

        let body: TokenResponse = response.json().await.map_err(StorageError::from)?;
        if body.token.is_empty() {
            return Err(StorageError::InvalidResponse("empty token".to_string()).into());
        }
        Ok(body.token)
    }

    async fn register(&self, credentials: &Credentials) -> Result<(), ApplicationError> {
        let response = self
            .client
            .post(self.url("/register"))
            .json(credentials)
            .send()
            .await
            .map_err(StorageError::from)?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn list_files(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<FilePage, ApplicationError> {
        self.fetch_page(ctx, "/files", page_params(page)).await
    }

    async fn search_files(
        &self,
        ctx: &RequestContext,
        filters: &SearchFilters,
        page: PageRequest,
    ) -> Result<FilePage, ApplicationError> {
        let mut params = filters.to_query_pairs();
        params.extend(page_params(page));
        self.fetch_page(ctx, "/search", params).await
    }

    async fn upload(
        &self,
        ctx: &RequestContext,
        file: FileData,
        progress: ProgressSink,
    ) -> Result<String, ApplicationError> {
        let total = file.size();
        let chunks: Vec<Vec<u8>> = file
            .content
            .chunks(UPLOAD_CHUNK_SIZE)
            .map(<[u8]>::to_vec)
            .collect();

        let mut sent = 0u64;
        let stream = futures::stream::iter(chunks).map(move |chunk| {
            sent += chunk.len() as u64;
            progress(sent, total);
            Ok::<Vec<u8>, std::io::Error>(chunk)
        });

        let file_part = multipart::Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(file.filename.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| StorageError::InternalError(e.to_string()))?;
        let form = multipart::Form::new().part("file", file_part);

        debug!("Uploading {} ({} bytes)", file.filename, total);

        let request = self.client.post(self.url("/upload")).multipart(form);
        let response = Self::authorize(request, ctx)
            .send()
            .await
            .map_err(StorageError::from)?;
        let response = Self::ensure_success(response).await?;

        let body: UploadResponse = response.json().await.map_err(StorageError::from)?;
        Ok(body.hash)
    }

    async fn delete_file(&self, ctx: &RequestContext, id: FileId) -> Result<(), ApplicationError> {
        let request = self.client.delete(self.url(&format!("/files/{}/delete", id)));
        let response = Self::authorize(request, ctx)
            .send()
            .await
            .map_err(StorageError::from)?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn download_file(
        &self,
        ctx: &RequestContext,
        id: FileId,
    ) -> Result<Vec<u8>, ApplicationError> {
        let request = self.client.get(self.url(&format!("/files/{}/download", id)));
        let response = Self::authorize(request, ctx)
            .send()
            .await
            .map_err(StorageError::from)?;
        let response = Self::ensure_success(response).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::NetworkError(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn stats(&self, ctx: &RequestContext) -> Result<StorageStats, ApplicationError> {
        let request = self.client.get(self.url("/stats"));
        let response = Self::authorize(request, ctx)
            .send()
            .await
            .map_err(StorageError::from)?;
        let response = Self::ensure_success(response).await?;

        Ok(response.json().await.map_err(StorageError::from)?)
    }

    fn preview_url(&self, ctx: &RequestContext, id: FileId) -> String {
        let url = self.url(&format!("/files/{}/download", id));
        match ctx.bearer_token() {
            Some(token) => Url::parse_with_params(&url, &[("auth", token)])
                .map(|u| u.to_string())
                .unwrap_or(url),
            None => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_url_carries_token_as_query_parameter() {
        let api = HttpFileStoreApi::new("http://localhost:8080/");
        let ctx = RequestContext::authenticated("abc.def");
        assert_eq!(
            api.preview_url(&ctx, 12),
            "http://localhost:8080/files/12/download?auth=abc.def"
        );
        assert_eq!(
            api.preview_url(&RequestContext::anonymous(), 12),
            "http://localhost:8080/files/12/download"
        );
    }

    #[test]
    fn list_response_tolerates_null_files() {
        let body: FileListResponse = serde_json::from_str(
            r#"{"files":null,"pagination":{"currentPage":1,"totalPages":0,"totalFiles":0}}"#,
        )
        .unwrap();
        let page = FilePage::from(body);
        assert!(page.files.is_empty());
        assert_eq!(page.pagination.total_pages, 0);
    }
}
