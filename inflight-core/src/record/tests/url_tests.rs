use crate::record::encode_url;
use pretty_assertions::assert_eq;

#[test]
fn plain_path_has_empty_query() {
    assert_eq!(encode_url("/ping").unwrap(), r#"{"path":"/ping","query":{}}"#);
}

#[test]
fn query_values_are_decoded() {
    assert_eq!(
        encode_url("/query?q=select+count%28x%29").unwrap(),
        r#"{"path":"/query","query":{"q":"select count(x)"}}"#
    );
}

#[test]
fn repeated_keys_become_arrays() {
    assert_eq!(
        encode_url("/a%20b?x=1&x=2&y=#top").unwrap(),
        r#"{"fragment":"top","path":"/a b","query":{"x":["1","2"],"y":""}}"#
    );
}

#[test]
fn absolute_targets_keep_only_path_and_query() {
    assert_eq!(
        encode_url("http://db.internal:8086/write?db=metrics").unwrap(),
        r#"{"path":"/write","query":{"db":"metrics"}}"#
    );
}

#[test]
fn undecodable_query_is_kept_raw() {
    assert_eq!(
        encode_url("/query?q=100%zz&db=metrics").unwrap(),
        r#"{"path":"/query","rawQuery":"q=100%zz&db=metrics"}"#
    );
}

#[test]
fn truncated_escape_or_semicolon_keeps_query_raw() {
    assert_eq!(
        encode_url("/query?q=50%2").unwrap(),
        r#"{"path":"/query","rawQuery":"q=50%2"}"#
    );
    assert_eq!(
        encode_url("/query?a=1;b=2").unwrap(),
        r#"{"path":"/query","rawQuery":"a=1;b=2"}"#
    );
}
