//! Availability payloads as returned by each provider.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::{ProviderKind, ReconcileError};

const SUCCESS: &str = "success";

// ============================================================================
// RealDebrid
// ============================================================================

/// A file descriptor inside a RealDebrid variant group.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RealDebridFile {
    pub filename: String,
    #[serde(default)]
    pub filesize: u64,
}

/// One variant group: provider-local file index -> file, in response order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RealDebridVariant {
    pub files: Vec<(String, RealDebridFile)>,
}

impl<'de> Deserialize<'de> for RealDebridVariant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct VariantVisitor;

        impl<'de> Visitor<'de> for VariantVisitor {
            type Value = RealDebridVariant;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of file index to file descriptor")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut files = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((index, file)) = map.next_entry::<String, RealDebridFile>()? {
                    files.push((index, file));
                }
                Ok(RealDebridVariant { files })
            }
        }

        deserializer.deserialize_map(VariantVisitor)
    }
}

/// Cached variants reported for one info hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealDebridEntry {
    pub info_hash: String,
    pub variants: Vec<RealDebridVariant>,
}

#[derive(Deserialize)]
struct RealDebridDetails {
    #[serde(default)]
    rd: Option<Vec<RealDebridVariant>>,
}

/// Read a RealDebrid instant-availability body.
///
/// Entries without provider-confirmed data (no `rd` key, or RealDebrid's
/// empty-array placeholder) are left out.
pub fn parse_realdebrid(response: &Value) -> Result<Vec<RealDebridEntry>, ReconcileError> {
    let provider = ProviderKind::RealDebrid;
    let object = response
        .as_object()
        .ok_or_else(|| ReconcileError::malformed(provider, "expected a JSON object"))?;

    let mut entries = Vec::with_capacity(object.len());
    for (info_hash, details) in object {
        if !details.is_object() {
            continue;
        }
        let details: RealDebridDetails = serde_json::from_value(details.clone())
            .map_err(|e| ReconcileError::malformed(provider, format!("{}: {}", info_hash, e)))?;
        if let Some(variants) = details.rd {
            entries.push(RealDebridEntry {
                info_hash: info_hash.clone(),
                variants,
            });
        }
    }
    Ok(entries)
}

// ============================================================================
// AllDebrid
// ============================================================================

/// A node of the AllDebrid file tree: a folder when `e` is set, a file otherwise.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AllDebridNode {
    #[serde(default)]
    pub n: String,
    #[serde(default)]
    pub s: Option<u64>,
    #[serde(default)]
    pub e: Option<Vec<AllDebridNode>>,
}

impl AllDebridNode {
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            n: name.into(),
            s: Some(size),
            e: None,
        }
    }

    pub fn folder(name: impl Into<String>, children: Vec<AllDebridNode>) -> Self {
        Self {
            n: name.into(),
            s: None,
            e: Some(children),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllDebridMagnet {
    pub hash: String,
    #[serde(default)]
    pub instant: bool,
    #[serde(default)]
    pub files: Vec<AllDebridNode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllDebridData {
    #[serde(default)]
    pub magnets: Vec<AllDebridMagnet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllDebridResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<AllDebridData>,
}

/// Read an AllDebrid instant-availability body, failing if the call itself failed.
pub fn parse_alldebrid(response: &Value) -> Result<Vec<AllDebridMagnet>, ReconcileError> {
    let provider = ProviderKind::AllDebrid;
    check_status(provider, response)?;
    let parsed: AllDebridResponse = serde_json::from_value(response.clone())
        .map_err(|e| ReconcileError::malformed(provider, e.to_string()))?;
    Ok(parsed.data.unwrap_or_default().magnets)
}

// ============================================================================
// Premiumize
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct PremiumizeResponse {
    pub status: String,
    #[serde(default)]
    pub response: Vec<Value>,
    #[serde(default)]
    pub transcoded: Vec<Value>,
}

/// Per-position flags from a Premiumize cache check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PremiumizeFlags {
    pub cached: Vec<bool>,
    pub transcoded: Vec<bool>,
}

/// Read a Premiumize cache-check body, failing if the call itself failed.
///
/// `response` entries are read by truthiness, `transcoded` entries only count
/// when they are literally `true`.
pub fn parse_premiumize(response: &Value) -> Result<PremiumizeFlags, ReconcileError> {
    let provider = ProviderKind::Premiumize;
    check_status(provider, response)?;
    let parsed: PremiumizeResponse = serde_json::from_value(response.clone())
        .map_err(|e| ReconcileError::malformed(provider, e.to_string()))?;
    Ok(PremiumizeFlags {
        cached: parsed.response.iter().map(is_truthy).collect(),
        transcoded: parsed
            .transcoded
            .iter()
            .map(|v| v.as_bool() == Some(true))
            .collect(),
    })
}

fn check_status(provider: ProviderKind, response: &Value) -> Result<(), ReconcileError> {
    let status = response.get("status").and_then(Value::as_str);
    if status == Some(SUCCESS) {
        return Ok(());
    }
    let status = status.unwrap_or("missing").to_string();
    tracing::error!(
        "Error while updating availability from {}: {}",
        provider,
        response
    );
    Err(ReconcileError::ProviderFailure { provider, status })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
