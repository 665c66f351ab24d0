//! Static asset table.

use bytes::Bytes;
use http::Method;
use mime_guess::mime;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path};
use std::sync::Arc;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{Result, StaticError, StaticResponse};

/// Cache policy sent with every asset.
pub const CACHE_CONTROL: &str = "public, max-age=604800, immutable";

/// One servable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// URL path the file is served under
    pub path: String,
    /// Value of the `Content-Type` header
    pub mime_type: String,
    /// Whether the body must be base64 encoded in an ALB response
    pub is_binary: bool,
    /// File contents
    pub contents: Bytes,
}

impl Asset {
    /// Build an asset, classifying it by the extension of `file_name`.
    ///
    /// `text/*` types are served as text with a UTF-8 charset; everything
    /// else, and text that is not valid UTF-8, is binary.
    pub fn new(path: impl Into<String>, file_name: &Path, contents: impl Into<Bytes>) -> Self {
        let contents = contents.into();
        let guessed = mime_guess::from_path(file_name).first_or_octet_stream();
        let is_text = guessed.type_() == mime::TEXT && std::str::from_utf8(&contents).is_ok();

        let mime_type = if is_text && guessed.get_param(mime::CHARSET).is_none() {
            format!("{}; charset=utf-8", guessed.essence_str())
        } else {
            guessed.to_string()
        };

        Self {
            path: path.into(),
            mime_type,
            is_binary: !is_text,
            contents,
        }
    }

    /// Same asset served under another path.
    fn alias(&self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..self.clone()
        }
    }

    /// 200 response carrying this asset.
    pub fn to_response(&self) -> StaticResponse {
        StaticResponse::new(200, self.contents.clone())
            .content_type(&self.mime_type)
            .header("cache-control", CACHE_CONTROL)
            .binary(self.is_binary)
    }
}

/// Path-to-asset table built once at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticAssets {
    assets: HashMap<String, Arc<Asset>>,
}

impl StaticAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every file under `base`.
    ///
    /// A file's URL path is its filesystem path with `prefix` removed, using
    /// `/` separators and a leading `/`. A file named `index` is also served
    /// for its directory, both with and without the trailing slash (the
    /// root directory yields `/` and the empty path).
    pub fn load_directory_tree(
        base: impl AsRef<Path>,
        prefix: impl AsRef<Path>,
        index: &str,
    ) -> Result<Self> {
        let base = base.as_ref();
        let prefix = prefix.as_ref();
        let mut assets = Self::new();

        for entry in WalkDir::new(base).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let file = entry.path();
            let contents = fs::read(file).map_err(|source| StaticError::Read {
                path: file.to_path_buf(),
                source,
            })?;
            let asset = Asset::new(url_path(file, prefix), file, contents);
            debug!(path = %asset.path, mime_type = %asset.mime_type, binary = asset.is_binary, "Registered asset");

            if entry.file_name() == index {
                let dir = asset.path.strip_suffix(index).unwrap_or(&asset.path).to_string();
                let bare = dir.strip_suffix('/').unwrap_or(&dir).to_string();
                assets.insert(asset.alias(bare));
                assets.insert(asset.alias(dir));
            }
            assets.insert(asset);
        }

        info!(base = %base.display(), paths = assets.len(), "Loaded static assets");
        Ok(assets)
    }

    /// Register an asset under its path, replacing any previous one.
    pub fn insert(&mut self, asset: Asset) {
        self.assets.insert(asset.path.clone(), Arc::new(asset));
    }

    pub fn get(&self, path: &str) -> Option<&Asset> {
        self.assets.get(path).map(Arc::as_ref)
    }

    /// Response for a request, if this table serves it.
    ///
    /// Only `GET` is served. `None` means the request belongs to some other
    /// handler.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<StaticResponse> {
        if method != Method::GET {
            return None;
        }
        self.get(path).map(Asset::to_response)
    }

    /// Registered URL paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.assets.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// URL path of `file` relative to `prefix`.
fn url_path(file: &Path, prefix: &Path) -> String {
    let relative = file.strip_prefix(prefix).unwrap_or(file);
    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    format!("/{}", segments.join("/"))
}
