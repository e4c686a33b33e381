//! Product create/edit form payload.

use std::path::Path;

use storefront_catalog::Product;

use crate::error::FetchError;

/// Image extensions the backend accepts.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// A file chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl ImageUpload {
    /// Wrap in-memory bytes, checking the extension of `file_name`.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, FetchError> {
        let file_name = file_name.into();
        let mime = mime_for(&file_name).ok_or_else(|| {
            FetchError::Validation(format!(
                "Formato de imagen no permitido: {file_name} (usa png, jpg, jpeg o gif)"
            ))
        })?;
        Ok(Self {
            file_name,
            bytes,
            mime: mime.to_string(),
        })
    }

    /// Read an image from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FetchError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FetchError::Validation(format!("Ruta inválida: {}", path.display())))?
            .to_string();
        // Check the extension before touching the file.
        if mime_for(&file_name).is_none() {
            return Self::new(file_name, Vec::new());
        }
        let bytes = std::fs::read(path)?;
        Self::new(file_name, bytes)
    }
}

fn mime_for(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// One part of the outgoing form, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Text { name: &'static str, value: String },
    File { name: &'static str, upload: ImageUpload },
}

impl FormField {
    pub fn name(&self) -> &'static str {
        match self {
            FormField::Text { name, .. } | FormField::File { name, .. } => name,
        }
    }
}

/// What the admin form submits.
///
/// Categories and tags are kept as the comma-separated text the user typed;
/// the backend splits them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub categories: String,
    pub tags: String,
    pub image: Option<ImageUpload>,
}

impl ProductForm {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            ..Default::default()
        }
    }

    /// Pre-fill an edit form from an existing product. No image is chosen.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price,
            description: product.description.clone(),
            categories: product.categories.join(", "),
            tags: product.tags.join(", "),
            image: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_categories(mut self, categories: impl Into<String>) -> Self {
        self.categories = categories.into();
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    /// Reject input the backend would choke on.
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.name.trim().is_empty() {
            return Err(FetchError::Validation("El nombre es obligatorio.".to_string()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(FetchError::Validation(
                "El precio debe ser un número mayor o igual a cero.".to_string(),
            ));
        }
        Ok(())
    }

    /// Ordered form fields. `image` appears only when a file was chosen.
    pub fn fields(&self) -> Vec<FormField> {
        let mut fields = vec![
            FormField::Text {
                name: "name",
                value: self.name.trim().to_string(),
            },
            FormField::Text {
                name: "price",
                value: format_price(self.price),
            },
            FormField::Text {
                name: "description",
                value: self.description.clone(),
            },
            FormField::Text {
                name: "categories",
                value: self.categories.clone(),
            },
            FormField::Text {
                name: "tags",
                value: self.tags.clone(),
            },
        ];
        if let Some(upload) = &self.image {
            fields.push(FormField::File {
                name: "image",
                upload: upload.clone(),
            });
        }
        fields
    }

    /// Build the multipart body.
    pub fn to_multipart(&self) -> Result<reqwest::multipart::Form, FetchError> {
        let mut form = reqwest::multipart::Form::new();
        for field in self.fields() {
            form = match field {
                FormField::Text { name, value } => form.text(name, value),
                FormField::File { name, upload } => {
                    let part = reqwest::multipart::Part::bytes(upload.bytes)
                        .file_name(upload.file_name)
                        .mime_str(&upload.mime)
                        .map_err(|e| FetchError::Request(e.to_string()))?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

/// Parse a price typed by the user.
pub fn parse_price(input: &str) -> Result<f64, FetchError> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| FetchError::Validation(format!("Precio inválido: {}", input.trim())))?;
    if !value.is_finite() || value < 0.0 {
        return Err(FetchError::Validation(format!("Precio inválido: {}", input.trim())));
    }
    Ok(value)
}

fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{}", price as i64)
    } else {
        price.to_string()
    }
}
