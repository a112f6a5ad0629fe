//! Projection of stored map-archive manifests into API payloads.
//!
//! Manifests are authored by the map render pipeline and uploaded as plain
//! JSON. The API echoes them back with `previewUrl` and `mapUrl` fields
//! pointing at the public bucket, so clients never assemble bucket URLs
//! themselves.

use serde_json::Value;

/// A manifest that does not have the shape the render pipeline promises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionError {
    message: String,
}

impl ProjectionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProjectionError {}

pub fn world_preview_url(base_url: &str, prefix: &str, world: &str) -> String {
    format!("{base_url}/{prefix}{world}/preview.png")
}

pub fn custom_preview_url(base_url: &str, prefix: &str, preview: &str) -> String {
    format!("{base_url}/{prefix}{preview}")
}

pub fn world_map_url(base_url: &str, prefix: &str, world: &str) -> String {
    format!("{base_url}/{prefix}{world}/")
}

pub fn map_preview_url(base_url: &str, prefix: &str, world: &str, map: &str) -> String {
    format!("{base_url}/{prefix}{world}/{map}/preview.png")
}

pub fn map_url(base_url: &str, prefix: &str, world: &str, map: &str) -> String {
    format!("{base_url}/{prefix}{world}/{map}/")
}

/// Decorates every entry of the world index with `previewUrl` and `mapUrl`.
/// An entry may override its preview image with a bucket-relative `preview`
/// key; otherwise the conventional `{world}/preview.png` is used.
pub fn enrich_world_index(
    index: Value,
    base_url: &str,
    prefix: &str,
) -> Result<Value, ProjectionError> {
    let Value::Array(entries) = index else {
        return Err(ProjectionError::new(
            "world index must be a JSON array of world entries",
        ));
    };

    let mut enriched = Vec::with_capacity(entries.len());
    for entry in entries {
        let Value::Object(mut fields) = entry else {
            return Err(ProjectionError::new(
                "world index entries must be JSON objects",
            ));
        };
        let world = fields
            .get("world")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                ProjectionError::new("world index entry is missing the 'world' field")
            })?;

        let preview_url = match fields.get("preview").and_then(Value::as_str) {
            Some(preview) => custom_preview_url(base_url, prefix, preview),
            None => world_preview_url(base_url, prefix, &world),
        };
        fields.insert("previewUrl".to_string(), Value::String(preview_url));
        fields.insert(
            "mapUrl".to_string(),
            Value::String(world_map_url(base_url, prefix, &world)),
        );
        enriched.push(Value::Object(fields));
    }
    Ok(Value::Array(enriched))
}

/// Decorates a world manifest with its preview URL, and every entry of its
/// `maps` list with per-map `previewUrl` and `mapUrl` fields. Worlds without
/// rendered maps may omit the `maps` list entirely.
pub fn enrich_world_manifest(
    manifest: Value,
    world: &str,
    base_url: &str,
    prefix: &str,
) -> Result<Value, ProjectionError> {
    let Value::Object(mut fields) = manifest else {
        return Err(ProjectionError::new("world manifest must be a JSON object"));
    };

    fields.insert(
        "previewUrl".to_string(),
        Value::String(world_preview_url(base_url, prefix, world)),
    );

    if let Some(maps) = fields.remove("maps") {
        let Value::Array(entries) = maps else {
            return Err(ProjectionError::new(
                "world manifest 'maps' must be a JSON array",
            ));
        };
        let mut enriched = Vec::with_capacity(entries.len());
        for entry in entries {
            let Value::Object(mut map_fields) = entry else {
                return Err(ProjectionError::new(
                    "world manifest map entries must be JSON objects",
                ));
            };
            let map = map_fields
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    ProjectionError::new("world manifest map entry is missing the 'name' field")
                })?;
            map_fields.insert(
                "previewUrl".to_string(),
                Value::String(map_preview_url(base_url, prefix, world, &map)),
            );
            map_fields.insert(
                "mapUrl".to_string(),
                Value::String(map_url(base_url, prefix, world, &map)),
            );
            enriched.push(Value::Object(map_fields));
        }
        fields.insert("maps".to_string(), Value::Array(enriched));
    }

    Ok(Value::Object(fields))
}

/// Decorates a map manifest with its `previewUrl` and `mapUrl`.
pub fn enrich_map_manifest(
    manifest: Value,
    world: &str,
    map: &str,
    base_url: &str,
    prefix: &str,
) -> Result<Value, ProjectionError> {
    let Value::Object(mut fields) = manifest else {
        return Err(ProjectionError::new("map manifest must be a JSON object"));
    };
    fields.insert(
        "previewUrl".to_string(),
        Value::String(map_preview_url(base_url, prefix, world, map)),
    );
    fields.insert(
        "mapUrl".to_string(),
        Value::String(map_url(base_url, prefix, world, map)),
    );
    Ok(Value::Object(fields))
}
