use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use reconciler_core::{
    apply_filters, AvailabilityReport, FilenameParser, MediaCriteria, ProviderKind,
    ReconcileError, SceneFilenameParser, StreamFilter, TorrentItem, TorrentSmartContainer,
};

use super::handlers::{error_response, ErrorResponse};
use crate::state::AppState;

/// One provider's raw availability body.
#[derive(Debug, Deserialize)]
pub struct ProviderResponse {
    pub provider: String,
    pub response: Value,
}

#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    pub media: MediaCriteria,
    pub items: Vec<TorrentItem>,
    #[serde(default)]
    pub responses: Vec<ProviderResponse>,
    /// Persist the reconciled items in the background.
    #[serde(default)]
    pub cache: bool,
}

#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub items: Vec<TorrentItem>,
    pub best_matching: Vec<TorrentItem>,
    pub direct_torrentable: Vec<TorrentItem>,
    pub reports: Vec<AvailabilityReport>,
    /// Whether a background cache write was scheduled.
    pub cached: bool,
}

/// POST /api/v1/reconcile
pub async fn reconcile(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReconcileRequest>,
) -> Result<Json<ReconcileResponse>, (StatusCode, Json<ErrorResponse>)> {
    // Resolve every provider up front so a bad name rejects the whole request
    let mut responses = Vec::with_capacity(request.responses.len());
    for entry in request.responses {
        let provider: ProviderKind = entry
            .provider
            .parse()
            .map_err(|e: ReconcileError| error_response(StatusCode::BAD_REQUEST, e))?;
        responses.push((provider, entry.response));
    }

    let parser = SceneFilenameParser::new();
    let items: Vec<TorrentItem> = request
        .items
        .into_iter()
        .map(|item| tag_quality(&parser, item))
        .collect();

    let filter = state.filter();
    let hashes: Vec<String> = items.iter().map(|i| i.info_hash.trim().to_string()).collect();
    let allowed: Vec<bool> = items
        .iter()
        .map(|item| !StreamFilter::<TorrentItem>::can_filter(filter) || filter.is_allowed(item))
        .collect();

    let received = items.len();
    let items = apply_filters(items, &[filter as &dyn StreamFilter<TorrentItem>]);
    if items.len() < received {
        debug!("Quality filter removed {} items", received - items.len());
    }

    let mut container = TorrentSmartContainer::build(items, &request.media);
    let order = SubmittedOrder::new(&hashes, &allowed, &container);

    let mut reports = Vec::with_capacity(responses.len());
    for (provider, body) in &responses {
        let body = match provider {
            ProviderKind::Premiumize => Cow::Owned(order.align_positional(body, container.len())),
            _ => Cow::Borrowed(body),
        };

        // A rejected response is skipped whole; the others still apply
        let report = match container.update_availability(&body, *provider, &request.media) {
            Ok(report) => report,
            Err(e) => {
                warn!("Skipping {} response: {}", provider, e);
                AvailabilityReport::failed(*provider, &e)
            }
        };
        reports.push(report);
    }

    let cached = match (request.cache, state.cache()) {
        (true, Some(cache)) => {
            let task = container.cache_container_items(cache);
            tokio::spawn(async move {
                match task.wait().await {
                    Ok(count) => debug!("Background cache stored {} items", count),
                    Err(e) => warn!("Background cache failed: {}", e),
                }
            });
            true
        }
        (true, None) => {
            warn!("Caching requested but the result cache is disabled");
            false
        }
        (false, _) => false,
    };

    let best_matching = container.get_best_matching().into_iter().cloned().collect();
    let direct_torrentable = container
        .get_direct_torrentable()
        .into_iter()
        .cloned()
        .collect();

    info!(
        items = container.len(),
        providers = reports.len(),
        failed = reports.iter().filter(|r| r.is_failed()).count(),
        cached,
        "Reconciled availability"
    );

    Ok(Json(ReconcileResponse {
        items: container.into_items(),
        best_matching,
        direct_torrentable,
        reports,
        cached,
    }))
}

/// Fill in quality tags from the title when the caller sent none.
fn tag_quality(parser: &dyn FilenameParser, mut item: TorrentItem) -> TorrentItem {
    let parsed = &item.parsed_data;
    if parsed.quality.is_empty() && parsed.resolution.is_empty() {
        item.parsed_data = parser.parse(&item.raw_title).metadata;
    }
    item
}

/// Where each submitted item ended up in the container.
///
/// Callers line positional provider arrays up with the items they sent,
/// while the container drops filtered items and repeated hashes.
struct SubmittedOrder {
    /// Container position per submitted item; `None` when it was filtered
    /// out or repeated an earlier hash.
    positions: Vec<Option<usize>>,
}

impl SubmittedOrder {
    fn new(hashes: &[String], allowed: &[bool], container: &TorrentSmartContainer) -> Self {
        let mut claimed = HashSet::new();
        let positions = hashes
            .iter()
            .zip(allowed)
            .map(|(hash, &allowed)| {
                if !allowed {
                    return None;
                }
                let position = container.position_of(hash)?;
                claimed.insert(position).then_some(position)
            })
            .collect();
        Self { positions }
    }

    /// Rewrite `response`/`transcoded` arrays from submitted order to
    /// container order.
    ///
    /// Bodies whose arrays do not have one entry per submitted item are
    /// returned unchanged, to be rejected by the length check.
    fn align_positional(&self, body: &Value, container_len: usize) -> Value {
        let (Some(cached), Some(transcoded)) = (
            body.get("response").and_then(Value::as_array),
            body.get("transcoded").and_then(Value::as_array),
        ) else {
            return body.clone();
        };
        let submitted = self.positions.len();
        if cached.len() != submitted || transcoded.len() != submitted {
            return body.clone();
        }

        let mut aligned_cached = vec![Value::Bool(false); container_len];
        let mut aligned_transcoded = vec![Value::Bool(false); container_len];
        for (index, position) in self.positions.iter().enumerate() {
            if let Some(position) = *position {
                aligned_cached[position] = cached[index].clone();
                aligned_transcoded[position] = transcoded[index].clone();
            }
        }

        let mut aligned = body.clone();
        aligned["response"] = Value::Array(aligned_cached);
        aligned["transcoded"] = Value::Array(aligned_transcoded);
        aligned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconciler_core::MediaKind;
    use serde_json::json;

    #[test]
    fn test_tag_quality_fills_empty_metadata() {
        let parser = SceneFilenameParser::new();
        let item = TorrentItem::new("a", "Movie.2020.1080p.WEBRip.x264", MediaKind::Movie);
        let tagged = tag_quality(&parser, item);
        assert!(tagged.parsed_data.quality.contains(&"1080p".to_string()));
        assert!(tagged.parsed_data.resolution.contains(&"WEBRIP".to_string()));
    }

    #[test]
    fn test_tag_quality_keeps_caller_metadata() {
        let parser = SceneFilenameParser::new();
        let mut item = TorrentItem::new("a", "Movie.2020.1080p.WEBRip.x264", MediaKind::Movie);
        item.parsed_data.quality = vec!["720p".to_string()];
        let tagged = tag_quality(&parser, item);
        assert_eq!(tagged.parsed_data.quality, vec!["720p".to_string()]);
        assert!(tagged.parsed_data.resolution.is_empty());
    }

    fn container_of(hashes: &[&str]) -> TorrentSmartContainer {
        let items = hashes
            .iter()
            .map(|h| TorrentItem::new(*h, *h, MediaKind::Movie))
            .collect();
        TorrentSmartContainer::build(items, &MediaCriteria::movie())
    }

    fn strings(hashes: &[&str]) -> Vec<String> {
        hashes.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn test_submitted_order_skips_filtered_and_repeated() {
        let container = container_of(&["bbb", "ccc"]);
        let order = SubmittedOrder::new(
            &strings(&["aaa", "bbb", "BBB", "ccc"]),
            &[false, true, true, true],
            &container,
        );
        assert_eq!(order.positions, vec![None, Some(0), None, Some(1)]);
    }

    #[test]
    fn test_align_positional_drops_filtered_slots() {
        let container = container_of(&["bbb", "ccc"]);
        let order = SubmittedOrder::new(
            &strings(&["aaa", "bbb", "ccc"]),
            &[false, true, true],
            &container,
        );
        let body = json!({
            "status": "success",
            "response": [true, true, false],
            "transcoded": [true, false, false]
        });

        let aligned = order.align_positional(&body, container.len());
        assert_eq!(aligned["status"], "success");
        assert_eq!(aligned["response"], json!([true, false]));
        assert_eq!(aligned["transcoded"], json!([false, false]));
    }

    #[test]
    fn test_align_positional_leaves_mismatched_body() {
        let container = container_of(&["aaa", "bbb"]);
        let order = SubmittedOrder::new(&strings(&["aaa", "bbb"]), &[true, true], &container);
        let body = json!({"status": "success", "response": [true], "transcoded": [true]});

        assert_eq!(order.align_positional(&body, container.len()), body);
    }
}
