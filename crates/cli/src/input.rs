use anyhow::Context;
use autosocial_core::domain::post::Post;
use serde_json::Value;
use std::path::Path;

/// Reads posts from a file holding either a bare JSON array or an object with a `posts` or
/// `all_posts` array.
pub fn read_posts(path: &Path) -> anyhow::Result<Vec<Post>> {
    let raw = read_json(path)?;
    posts_from_value(raw).with_context(|| format!("no posts array in {}", path.display()))
}

pub fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn posts_from_value(raw: Value) -> anyhow::Result<Vec<Post>> {
    let array = match raw {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("posts").or_else(|| map.remove("all_posts")) {
            Some(Value::Array(items)) => items,
            _ => anyhow::bail!("expected a `posts` or `all_posts` array"),
        },
        other => anyhow::bail!("expected an array or object, got {other}"),
    };

    array
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(Post(map)),
            other => anyhow::bail!("post #{i} is not an object: {other}"),
        })
        .collect()
}
