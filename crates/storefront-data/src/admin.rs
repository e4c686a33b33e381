//! Admin API client.

use async_trait::async_trait;
use serde::Deserialize;
use storefront_catalog::{Product, ProductId};

use crate::error::FetchError;
use crate::form::ProductForm;
use crate::timeout::{build_http, TimeoutConfig};

/// Default base URL of the admin API.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";

/// Operations the admin page performs against the backend.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Check the admin password. `Ok(false)` means the password was wrong.
    async fn authenticate(&self, password: &str) -> Result<bool, FetchError>;

    async fn list_products(&self) -> Result<Vec<Product>, FetchError>;

    async fn create_product(&self, form: &ProductForm) -> Result<(), FetchError>;

    async fn update_product(&self, id: ProductId, form: &ProductForm) -> Result<(), FetchError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), FetchError>;
}

/// HTTP implementation of [`CatalogApi`].
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    base_url: String,
    timeout: TimeoutConfig,
}

impl AdminClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, TimeoutConfig::default())
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: TimeoutConfig) -> Result<Self, FetchError> {
        let http = build_http(timeout).map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<(u16, Vec<u8>), FetchError> {
        let resp = req
            .send()
            .await
            .map_err(|e| FetchError::from_transport(e, self.timeout.total))?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::from_transport(e, self.timeout.total))?;
        Ok((status, body.to_vec()))
    }

    /// Send a mutation and map a non-2xx answer to the server's message.
    async fn mutate(&self, req: reqwest::RequestBuilder, url: &str) -> Result<(), FetchError> {
        let (status, body) = self.send(req).await?;
        if !(200..300).contains(&status) {
            let err = FetchError::from_response(status, url, &body);
            tracing::warn!(url, status, error = %err, "admin request rejected");
            return Err(err);
        }
        Ok(())
    }
}

/// Read `{success: bool}` from an auth response, whatever its status code.
pub fn parse_auth_response(body: &[u8]) -> Result<bool, FetchError> {
    #[derive(Deserialize)]
    struct AuthBody {
        success: Option<bool>,
    }

    let parsed: AuthBody =
        serde_json::from_slice(body).map_err(|e| FetchError::MalformedAuth(e.to_string()))?;
    parsed
        .success
        .ok_or_else(|| FetchError::MalformedAuth("missing `success` field".to_string()))
}

#[async_trait]
impl CatalogApi for AdminClient {
    async fn authenticate(&self, password: &str) -> Result<bool, FetchError> {
        let url = self.url("/api/auth");
        tracing::debug!(%url, "authenticating");
        let req = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "password": password }));
        let (status, body) = self.send(req).await?;
        let ok = parse_auth_response(&body)?;
        tracing::debug!(status, success = ok, "auth response");
        Ok(ok)
    }

    async fn list_products(&self) -> Result<Vec<Product>, FetchError> {
        let url = self.url("/api/products");
        tracing::debug!(%url, "listing products");
        let (status, body) = self.send(self.http.get(&url)).await?;
        if !(200..300).contains(&status) {
            return Err(FetchError::from_response(status, &url, &body));
        }
        serde_json::from_slice(&body).map_err(|e| FetchError::Deserialization(e.to_string()))
    }

    async fn create_product(&self, form: &ProductForm) -> Result<(), FetchError> {
        form.validate()?;
        let url = self.url("/api/products");
        tracing::debug!(%url, name = %form.name, "creating product");
        let req = self.http.post(&url).multipart(form.to_multipart()?);
        self.mutate(req, &url).await
    }

    async fn update_product(&self, id: ProductId, form: &ProductForm) -> Result<(), FetchError> {
        form.validate()?;
        let url = self.url(&format!("/api/products/{id}"));
        tracing::debug!(%url, image = form.image.is_some(), "updating product");
        let req = self.http.put(&url).multipart(form.to_multipart()?);
        self.mutate(req, &url).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), FetchError> {
        let url = self.url(&format!("/api/products/{id}"));
        tracing::debug!(%url, "deleting product");
        self.mutate(self.http.delete(&url), &url).await
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::form::ImageUpload;

    /// Serve one canned response; returns the base URL and the captured request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });
        (format!("http://{addr}"), handle)
    }

    /// Read headers plus a content-length body.
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    #[test]
    fn test_parse_auth_response() {
        assert!(parse_auth_response(br#"{"success": true}"#).unwrap());
        assert!(!parse_auth_response(br#"{"success": false, "message": "Invalid password"}"#).unwrap());
        assert!(matches!(parse_auth_response(b"<html>"), Err(FetchError::MalformedAuth(_))));
        assert!(matches!(parse_auth_response(b"{}"), Err(FetchError::MalformedAuth(_))));
    }

    #[tokio::test]
    async fn test_wrong_password_with_401_is_false() {
        let (base, handle) = serve_once("401 Unauthorized", r#"{"success": false, "message": "Invalid password"}"#).await;
        let client = AdminClient::new(base).unwrap();
        assert!(!client.authenticate("nope").await.unwrap());

        let request = handle.await.unwrap();
        assert!(request.starts_with("POST /api/auth"));
        assert!(request.contains(r#"{"password":"nope"}"#));
    }

    #[tokio::test]
    async fn test_update_without_image_has_no_image_field() {
        let (base, handle) = serve_once("200 OK", r#"{"id": 7}"#).await;
        let client = AdminClient::new(format!("{base}/")).unwrap();
        let form = ProductForm::new("Funko Goku", 12990.0).with_tags("Funko, trending");

        client.update_product(ProductId::new(7), &form).await.unwrap();

        let request = handle.await.unwrap();
        assert!(request.starts_with("PUT /api/products/7"));
        assert!(request.contains(r#"name="name""#));
        assert!(request.contains(r#"name="tags""#));
        assert!(!request.contains(r#"name="image""#));
    }

    #[tokio::test]
    async fn test_create_with_image_sends_file_part() {
        let (base, handle) = serve_once("201 CREATED", r#"{"id": 8}"#).await;
        let client = AdminClient::new(base).unwrap();
        let form = ProductForm::new("Taza", 4990.0)
            .with_image(ImageUpload::new("taza.png", b"png-bytes".to_vec()).unwrap());

        client.create_product(&form).await.unwrap();

        let request = handle.await.unwrap();
        assert!(request.starts_with("POST /api/products"));
        assert!(request.contains(r#"name="image"; filename="taza.png""#));
        assert!(request.contains("image/png"));
    }

    #[tokio::test]
    async fn test_rejected_mutation_surfaces_server_message() {
        let (base, _handle) = serve_once("500 INTERNAL SERVER ERROR", r#"{"error": "disk full"}"#).await;
        let client = AdminClient::new(base).unwrap();
        let err = client.delete_product(ProductId::new(3)).await.unwrap_err();
        assert_eq!(err.user_message(), "disk full");
    }

    #[tokio::test]
    async fn test_invalid_form_never_sends() {
        // Nothing listens here; validation must fail first.
        let client = AdminClient::new("http://127.0.0.1:9").unwrap();
        let err = client.create_product(&ProductForm::new("", 1.0)).await.unwrap_err();
        assert!(matches!(err, FetchError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_products() {
        let (base, _handle) = serve_once("200 OK", r#"[{"id":1,"name":"A","price":10},{"id":2,"name":"B","price":20}]"#).await;
        let products = AdminClient::new(base).unwrap().list_products().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].id, ProductId::new(2));
    }
}
