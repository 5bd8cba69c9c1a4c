//! Style request builder
//!
//! Turns a locally cropped photo plus user/clothing metadata into the
//! multipart payload the `style_recommendation` endpoint expects.

use clap::ValueEnum;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{StyleError, StyleResult};

/// Sent as `uid` when the caller has no authenticated identity
pub const ANONYMOUS_USER: &str = "unknown_user";

/// Sent as `clothing_type` when the caller did not pick one
pub const DEFAULT_CLOTHING_TYPE: &str = "streetwear";

const FALLBACK_IMAGE_MIME: &str = "image/jpeg";

/// Clothing categories offered on the capture screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ClothingStyle {
    Formal,
    Wedding,
    Streetwear,
    Pajamas,
    Vintage,
    Casual,
    Sportswear,
}

impl ClothingStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Wedding => "wedding",
            Self::Streetwear => "streetwear",
            Self::Pajamas => "pajamas",
            Self::Vintage => "vintage",
            Self::Casual => "casual",
            Self::Sportswear => "sportswear",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
        }
    }
}

/// `"<style>-<gender>"` tag, e.g. `formal-men`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClothingTag {
    pub style: ClothingStyle,
    pub gender: Gender,
}

impl ClothingTag {
    pub fn new(style: ClothingStyle, gender: Gender) -> Self {
        Self { style, gender }
    }
}

impl fmt::Display for ClothingTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.style.as_str(), self.gender.as_str())
    }
}

/// One scan's worth of input, immutable once created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRequest {
    image_path: PathBuf,
    user_id: String,
    clothing_type: String,
}

impl StyleRequest {
    /// Empty or absent user/clothing values fall back to the defaults
    pub fn new(
        image_path: impl Into<PathBuf>,
        user_id: Option<&str>,
        clothing_type: Option<&str>,
    ) -> Self {
        Self {
            image_path: image_path.into(),
            user_id: or_default(user_id, ANONYMOUS_USER),
            clothing_type: or_default(clothing_type, DEFAULT_CLOTHING_TYPE),
        }
    }

    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn clothing_type(&self) -> &str {
        &self.clothing_type
    }

    /// Read the image and assemble the payload
    ///
    /// Fails with `MissingImage` before anything is sent if the file is gone.
    /// The file itself is left untouched.
    pub fn build(&self) -> StyleResult<MultipartPayload> {
        if !self.image_path.is_file() {
            return Err(StyleError::MissingImage {
                path: self.image_path.clone(),
            });
        }

        let bytes = std::fs::read(&self.image_path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                StyleError::MissingImage {
                    path: self.image_path.clone(),
                }
            } else {
                StyleError::UnreadableImage {
                    path: self.image_path.clone(),
                    source,
                }
            }
        })?;

        let file_name = self
            .image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.jpg".to_string());

        let mime_type = mime_guess::from_path(&self.image_path)
            .first()
            .filter(|m| m.type_().as_str() == "image")
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| FALLBACK_IMAGE_MIME.to_string());

        tracing::debug!(
            file = %file_name,
            mime = %mime_type,
            size = bytes.len(),
            uid = %self.user_id,
            clothing_type = %self.clothing_type,
            "built style request payload"
        );

        Ok(MultipartPayload {
            image: ImagePart {
                file_name,
                mime_type,
                bytes,
            },
            uid: self.user_id.clone(),
            clothing_type: self.clothing_type.clone(),
        })
    }
}

/// Convenience wrapper: `StyleRequest::new(..).build()`
pub fn build(
    image_path: impl Into<PathBuf>,
    user_id: Option<&str>,
    clothing_type: Option<&str>,
) -> StyleResult<MultipartPayload> {
    StyleRequest::new(image_path, user_id, clothing_type).build()
}

fn or_default(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// The binary `image` part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePart {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Ready-to-send multipart body: `image`, `uid`, `clothing_type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPayload {
    image: ImagePart,
    uid: String,
    clothing_type: String,
}

impl MultipartPayload {
    pub fn image(&self) -> &ImagePart {
        &self.image
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn clothing_type(&self) -> &str {
        &self.clothing_type
    }

    /// Convert into a reqwest form
    pub fn into_form(self) -> StyleResult<Form> {
        let image = Part::bytes(self.image.bytes)
            .file_name(self.image.file_name)
            .mime_str(&self.image.mime_type)?;

        Ok(Form::new()
            .part("image", image)
            .text("uid", self.uid)
            .text("clothing_type", self.clothing_type))
    }
}
