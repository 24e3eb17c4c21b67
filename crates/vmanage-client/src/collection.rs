use hashbrown::DefaultHashBuilder;

use indexmap::IndexMap;

use serde_json::Value;

use tracing::warn;

use vmanage::Fields;

/// An insertion-ordered mapping from a record key to the record.
pub type Dict<R> = IndexMap<String, R, DefaultHashBuilder>;

fn key_to_string(key: Value) -> String {
    match key {
        Value::String(key) => key,
        key => key.to_string(),
    }
}

/// Converts a list of records into a [`Dict`] keyed by the value of the
/// `key_name` field.
///
/// Records keep their list order. When `remove_key` is set, the key field
/// is removed from the stored records. Records without the key field are
/// skipped, and a later record replaces an earlier one with the same key.
pub fn list_to_dict<R, I>(records: I, key_name: &str, remove_key: bool) -> Dict<R>
where
    R: Fields,
    I: IntoIterator<Item = R>,
{
    let mut dict = Dict::default();

    for mut record in records {
        let key = if remove_key {
            record.fields_mut().remove(key_name)
        } else {
            record.fields().get(key_name).cloned()
        };

        let Some(key) = key else {
            warn!("Skip record without the `{key_name}` key");
            continue;
        };

        let _ = dict.insert(key_to_string(key), record);
    }

    dict
}
