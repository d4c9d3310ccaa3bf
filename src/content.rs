//! Page copy and styling shown on the public pages.
//!
//! The document has a fixed set of fields ([`ContentField`]). Each field carries a
//! text and a style record. Saves merge by key: unknown keys are ignored and fields
//! absent from the update keep their current values.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::RwLock;

const CONTENT_FILE: &str = "content.json";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The editable fields of the public pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentField {
    Title,
    Subtitle,
    ParticipateTitle,
    ParticipateSubtitle,
    GalleryTitle,
    GallerySubtitle,
    Footer,
}

impl ContentField {
    pub const ALL: [ContentField; 7] = [
        ContentField::Title,
        ContentField::Subtitle,
        ContentField::ParticipateTitle,
        ContentField::ParticipateSubtitle,
        ContentField::GalleryTitle,
        ContentField::GallerySubtitle,
        ContentField::Footer,
    ];

    /// JSON key of this field.
    pub fn key(self) -> &'static str {
        match self {
            ContentField::Title => "title",
            ContentField::Subtitle => "subtitle",
            ContentField::ParticipateTitle => "participateTitle",
            ContentField::ParticipateSubtitle => "participateSubtitle",
            ContentField::GalleryTitle => "galleryTitle",
            ContentField::GallerySubtitle => "gallerySubtitle",
            ContentField::Footer => "footer",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn default_text(self) -> &'static str {
        match self {
            ContentField::Title => "소리를 담는 글자, 한글",
            ContentField::Subtitle => {
                "의성어·의태어를 직접 말하고 기록해 한글날 디지털 아카이브로 남겨요."
            }
            ContentField::ParticipateTitle => "소리를 담고, 소리를 남기다",
            ContentField::ParticipateSubtitle => {
                "의성어·의태어를 입력하고 직접 소리 내어 녹음해 주세요."
            }
            ContentField::GalleryTitle => "온라인 전시관",
            ContentField::GallerySubtitle => "단어 카드를 눌러 직접 들어보세요.",
            ContentField::Footer => "© 2025 withqnx",
        }
    }
}

/// CSS overrides for one field. Empty strings mean "use the stylesheet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleRecord {
    pub size: String,
    pub color: String,
    pub align: String,
    pub weight: String,
    pub line_height: String,
}

impl StyleRecord {
    /// Build a record from loosely typed JSON. Missing or non-object input yields empty attributes.
    fn from_value(value: &Value) -> Self {
        let attr = |name: &str| value.get(name).map(value_to_string).unwrap_or_default();
        Self {
            size: attr("size"),
            color: attr("color"),
            align: attr("align"),
            weight: attr("weight"),
            line_height: attr("lineHeight"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentDocument {
    pub texts: BTreeMap<ContentField, String>,
    pub styles: BTreeMap<ContentField, StyleRecord>,
}

impl Default for ContentDocument {
    fn default() -> Self {
        Self {
            texts: ContentField::ALL
                .into_iter()
                .map(|f| (f, f.default_text().to_string()))
                .collect(),
            styles: ContentField::ALL
                .into_iter()
                .map(|f| (f, StyleRecord::default()))
                .collect(),
        }
    }
}

/// A save request. Both halves are optional; keys outside [`ContentField`] are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentUpdate {
    #[serde(default)]
    pub texts: Option<Map<String, Value>>,
    #[serde(default)]
    pub styles: Option<Map<String, Value>>,
}

impl ContentDocument {
    /// Rebuild a document from its stored JSON, filling gaps with defaults.
    ///
    /// Older files stored the texts as a flat top-level object; those load as texts.
    pub fn from_json(raw: &Value) -> Self {
        let mut doc = Self::default();

        let texts = match raw.get("texts") {
            Some(Value::Object(map)) => Some(map),
            Some(_) => None,
            None => raw.as_object(),
        };
        if let Some(texts) = texts {
            for (key, value) in texts {
                if let Some(field) = ContentField::from_key(key) {
                    doc.texts.insert(field, value_to_string(value));
                }
            }
        }

        if let Some(Value::Object(styles)) = raw.get("styles") {
            for (key, value) in styles {
                if let Some(field) = ContentField::from_key(key) {
                    doc.styles.insert(field, StyleRecord::from_value(value));
                }
            }
        }

        doc
    }

    /// Apply an update in place. Only recognized keys present in the update change.
    pub fn merge(&mut self, update: &ContentUpdate) {
        if let Some(ref texts) = update.texts {
            for field in ContentField::ALL {
                if let Some(value) = texts.get(field.key()) {
                    self.texts.insert(field, value_to_string(value));
                }
            }
        }

        if let Some(ref styles) = update.styles {
            for field in ContentField::ALL {
                if let Some(value) = styles.get(field.key()) {
                    self.styles.insert(field, StyleRecord::from_value(value));
                }
            }
        }
    }

    pub fn text(&self, field: ContentField) -> &str {
        self.texts.get(&field).map(String::as_str).unwrap_or_default()
    }

    pub fn style(&self, field: ContentField) -> Option<&StyleRecord> {
        self.styles.get(&field)
    }
}

/// `null` becomes the empty string; other scalars use their JSON rendering.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// The singleton content document, cached in memory and persisted as JSON.
pub struct ContentStore {
    path: PathBuf,
    current: RwLock<ContentDocument>,
}

impl ContentStore {
    /// Open the document in `data_dir`, writing the defaults if none exists yet.
    pub async fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, ContentError> {
        tokio::fs::create_dir_all(data_dir.as_ref()).await?;
        let path = data_dir.as_ref().join(CONTENT_FILE);

        let doc = match tokio::fs::read(&path).await {
            Ok(raw) => match serde_json::from_slice::<Value>(&raw) {
                Ok(value) => ContentDocument::from_json(&value),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Unreadable content document, using defaults");
                    ContentDocument::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let doc = ContentDocument::default();
                persist(&path, &doc).await?;
                tracing::info!(path = %path.display(), "Created default content document");
                doc
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            current: RwLock::new(doc),
        })
    }

    pub async fn load(&self) -> ContentDocument {
        self.current.read().await.clone()
    }

    /// Merge and persist. The in-memory document only changes once the write succeeds.
    pub async fn save(&self, update: &ContentUpdate) -> Result<ContentDocument, ContentError> {
        let mut current = self.current.write().await;
        let mut next = current.clone();
        next.merge(update);
        persist(&self.path, &next).await?;
        *current = next.clone();
        Ok(next)
    }
}

async fn persist(path: &Path, doc: &ContentDocument) -> Result<(), ContentError> {
    let data = serde_json::to_vec_pretty(doc)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &data).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
