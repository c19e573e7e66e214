//! Tolerant decoding of sheet responses.
//!
//! The sheet endpoint answers with a bare JSON array, an object wrapping the
//! rows under `data`, an object wrapping them under some other key, or plain
//! comma-separated text. Each shape is handled by one [`BodyStrategy`]; the
//! strategies in [`STRATEGIES`] are tried in order and the first hit wins.

use serde_json::Value;

use cy_core::RawRow;

/// A response body, with its JSON parse attempted once up front.
pub struct ResponseBody<'a> {
    text: &'a str,
    json: Option<Value>,
}

impl<'a> ResponseBody<'a> {
    pub fn parse(text: &'a str) -> Self {
        let json = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str(text).ok()
        };
        Self { text, json }
    }

    pub fn text(&self) -> &str {
        self.text
    }

    pub fn json(&self) -> Option<&Value> {
        self.json.as_ref()
    }
}

pub trait BodyStrategy: Sync {
    fn name(&self) -> &'static str;

    /// Rows when this strategy recognizes the body, `None` otherwise.
    fn extract(&self, body: &ResponseBody<'_>) -> Option<Vec<RawRow>>;
}

/// Objects of a JSON array. Non-object elements are skipped.
fn object_rows(items: &[Value]) -> Vec<RawRow> {
    items.iter().filter_map(Value::as_object).cloned().collect()
}

/// `[ {...}, {...} ]`
pub struct JsonArray;

impl BodyStrategy for JsonArray {
    fn name(&self) -> &'static str {
        "json-array"
    }

    fn extract(&self, body: &ResponseBody<'_>) -> Option<Vec<RawRow>> {
        body.json()?.as_array().map(|items| object_rows(items))
    }
}

/// `{ "data": [ ... ] }`
pub struct JsonDataField;

impl BodyStrategy for JsonDataField {
    fn name(&self) -> &'static str {
        "json-data-field"
    }

    fn extract(&self, body: &ResponseBody<'_>) -> Option<Vec<RawRow>> {
        body.json()?
            .get("data")?
            .as_array()
            .map(|items| object_rows(items))
    }
}

/// First array-valued field of a JSON object, in document order.
pub struct FirstArrayField;

impl BodyStrategy for FirstArrayField {
    fn name(&self) -> &'static str {
        "json-first-array-field"
    }

    fn extract(&self, body: &ResponseBody<'_>) -> Option<Vec<RawRow>> {
        body.json()?
            .as_object()?
            .values()
            .find_map(Value::as_array)
            .map(|items| object_rows(items))
    }
}

/// Header line plus comma-separated records. No quoting or escaping.
pub struct DelimitedText;

impl BodyStrategy for DelimitedText {
    fn name(&self) -> &'static str {
        "delimited-text"
    }

    fn extract(&self, body: &ResponseBody<'_>) -> Option<Vec<RawRow>> {
        if body.json().is_some() {
            return None;
        }
        let text = body.text();
        if !text.contains('\n') || !text.contains(',') {
            return None;
        }

        let lines: Vec<&str> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.is_empty())
            .collect();
        let (header, records) = lines.split_first()?;
        if records.is_empty() {
            return None;
        }

        let headers: Vec<&str> = header.split(',').map(str::trim).collect();
        let rows = records
            .iter()
            .map(|line| {
                let cols: Vec<&str> = line.split(',').map(str::trim).collect();
                headers
                    .iter()
                    .enumerate()
                    .map(|(idx, name)| {
                        let cell = cols.get(idx).copied().unwrap_or("");
                        (name.to_string(), Value::String(cell.to_string()))
                    })
                    .collect::<RawRow>()
            })
            .collect();
        Some(rows)
    }
}

pub static STRATEGIES: &[&dyn BodyStrategy] =
    &[&JsonArray, &JsonDataField, &FirstArrayField, &DelimitedText];

/// Rows of `text`, or `None` when no strategy recognizes it.
pub fn decode_rows(text: &str) -> Option<Vec<RawRow>> {
    let body = ResponseBody::parse(text);
    STRATEGIES.iter().find_map(|strategy| {
        let rows = strategy.extract(&body)?;
        tracing::trace!(strategy = strategy.name(), rows = rows.len(), "decoded sheet body");
        Some(rows)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(rows: &[RawRow]) -> Vec<&str> {
        rows.iter().map(|r| r["id"].as_str().unwrap()).collect()
    }

    #[test]
    fn bare_array_is_returned_as_is() {
        let rows = decode_rows(r#"[{"id":"1"},{"id":"2"}]"#).unwrap();
        assert_eq!(ids(&rows), vec!["1", "2"]);
    }

    #[test]
    fn empty_array_is_usable() {
        assert_eq!(decode_rows("[]"), Some(vec![]));
    }

    #[test]
    fn data_field_takes_precedence_over_other_arrays() {
        let rows = decode_rows(r#"{"meta":[{"id":"m"}],"data":[{"id":"d"}]}"#).unwrap();
        assert_eq!(ids(&rows), vec!["d"]);
    }

    #[test]
    fn first_array_field_in_document_order() {
        let rows = decode_rows(r#"{"ok":true,"zeta":[{"id":"z"}],"alpha":[{"id":"a"}]}"#).unwrap();
        assert_eq!(ids(&rows), vec!["z"]);
    }

    #[test]
    fn object_without_arrays_is_unusable() {
        assert_eq!(decode_rows(r#"{"success":true}"#), None);
    }

    #[test]
    fn comma_separated_text_becomes_rows() {
        let rows = decode_rows("id,title\n1,Foo\n2,Bar").unwrap();
        assert_eq!(
            serde_json::Value::Array(rows.into_iter().map(Value::Object).collect()),
            json!([{"id": "1", "title": "Foo"}, {"id": "2", "title": "Bar"}])
        );
    }

    #[test]
    fn delimited_text_trims_and_pads_cells() {
        let rows = decode_rows("id , title, status\r\n\r\n 7 ,Launch\r\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "7");
        assert_eq!(rows[0]["title"], "Launch");
        assert_eq!(rows[0]["status"], "");
    }

    #[test]
    fn header_only_text_is_unusable() {
        assert_eq!(decode_rows("id,title\n"), None);
    }

    #[test]
    fn plain_text_is_unusable() {
        assert_eq!(decode_rows("<html>Service unavailable</html>"), None);
        assert_eq!(decode_rows(""), None);
    }

    #[test]
    fn non_object_array_items_are_skipped() {
        let rows = decode_rows(r#"[{"id":"1"}, 5, "x", null]"#).unwrap();
        assert_eq!(ids(&rows), vec!["1"]);
    }
}
