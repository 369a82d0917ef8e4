use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use url::Url;

/// Re-encodes a request target as compact JSON:
/// `{"fragment"?, "path", "query"}` with sorted keys.
///
/// Query keys with a single value map to a string, repeated keys to an array.
/// A query that cannot be decoded is kept verbatim under `rawQuery` instead.
pub fn encode_url(raw: &str) -> Result<String, url::ParseError> {
    let base = Url::parse("http://localhost/")?;
    let url = Url::options().base_url(Some(&base)).parse(raw)?;

    // Inserted in key order so the output is sorted whichever map backs `Map`.
    let mut out = Map::new();
    if let Some(fragment) = url.fragment().filter(|f| !f.is_empty()) {
        out.insert(
            "fragment".to_string(),
            Value::String(percent_decode_str(fragment).decode_utf8_lossy().into_owned()),
        );
    }
    out.insert(
        "path".to_string(),
        Value::String(percent_decode_str(url.path()).decode_utf8_lossy().into_owned()),
    );
    match url.query() {
        Some(raw_query) if !query_is_decodable(raw_query) => {
            out.insert("rawQuery".to_string(), Value::String(raw_query.to_string()));
        }
        _ => {
            out.insert("query".to_string(), Value::Object(query_object(&url)));
        }
    }

    Ok(Value::Object(out).to_string())
}

fn query_object(url: &Url) -> Map<String, Value> {
    let mut query: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (k, v) in url.query_pairs() {
        query.entry(k.into_owned()).or_default().push(v.into_owned());
    }

    let mut object = Map::new();
    for (k, mut values) in query {
        let value = match values.len() {
            0 => continue,
            1 => Value::String(values.remove(0)),
            _ => Value::Array(values.into_iter().map(Value::String).collect()),
        };
        object.insert(k, value);
    }
    object
}

/// False when a `%` is not followed by two hex digits, or when `;` is used
/// as a pair separator.
fn query_is_decodable(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b';' => return false,
            b'%' => {
                let escape = bytes.get(i + 1..i + 3);
                if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                    return false;
                }
                i += 3;
            }
            _ => i += 1,
        }
    }
    true
}
