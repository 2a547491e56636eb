use anyhow::{bail, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Narrative statement character limit given to the model.
pub const MAX_BULLET_CHARS: usize = 350;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Performance,
    Leadership,
    Training,
    Other,
    /// Missing, unknown or non-string category. Such entries belong to no group.
    #[default]
    Unrecognized,
}

impl Category {
    pub fn from_name(name: &str) -> Self {
        match name {
            "performance" => Category::Performance,
            "leadership" => Category::Leadership,
            "training" => Category::Training,
            "other" => Category::Other,
            _ => Category::Unrecognized,
        }
    }
}

/// Category matching is exact and case-sensitive; anything else is dropped later.
fn lenient_category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Category, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(Category::from_name).unwrap_or_default())
}

/// One logged accomplishment as submitted by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Category,
}

impl Entry {
    /// Reads one element of the `entries` list.
    ///
    /// Objects become entries. Scalars and arrays carry no category and are
    /// skipped (`Ok(None)`). A `null` element is an error.
    pub fn from_item(item: Value) -> Result<Option<Entry>> {
        match item {
            Value::Null => bail!("entry is null"),
            Value::Object(_) => Ok(Some(serde_json::from_value(item)?)),
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateBulletsRequest {
    pub entries: Option<Vec<Value>>,
}

/// Entries partitioned by category, input order preserved within each group.
#[derive(Debug, Default, PartialEq)]
pub struct OrganizedEntries<'a> {
    pub performance: Vec<&'a Entry>,
    pub leadership: Vec<&'a Entry>,
    pub training: Vec<&'a Entry>,
    pub other: Vec<&'a Entry>,
}

impl<'a> OrganizedEntries<'a> {
    pub fn from_entries(entries: &'a [Entry]) -> Self {
        let mut organized = Self::default();
        for entry in entries {
            match entry.category {
                Category::Performance => organized.performance.push(entry),
                Category::Leadership => organized.leadership.push(entry),
                Category::Training => organized.training.push(entry),
                Category::Other => organized.other.push(entry),
                Category::Unrecognized => {}
            }
        }
        organized
    }

    pub fn total(&self) -> usize {
        self.performance.len() + self.leadership.len() + self.training.len() + self.other.len()
    }
}

/// A single generated narrative statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletResult {
    pub bullet: String,
    #[serde(default)]
    pub chars: Option<u64>,
}

/// The shape the model is asked to return. Only used to inspect the reply;
/// the caller receives the model's JSON untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedBullets {
    #[serde(default)]
    pub performance: Vec<BulletResult>,
    #[serde(default)]
    pub leadership: Vec<BulletResult>,
    #[serde(default)]
    pub training: Vec<BulletResult>,
    #[serde(default)]
    pub other: Vec<BulletResult>,
}

impl GeneratedBullets {
    pub fn iter(&self) -> impl Iterator<Item = &BulletResult> {
        self.performance
            .iter()
            .chain(&self.leadership)
            .chain(&self.training)
            .chain(&self.other)
    }

    /// Bullets whose actual length exceeds the narrative limit.
    pub fn over_limit(&self) -> usize {
        self.iter()
            .filter(|b| b.bullet.chars().count() > MAX_BULLET_CHARS)
            .count()
    }

    /// Bullets whose reported `chars` disagrees with the real length.
    pub fn miscounted(&self) -> usize {
        self.iter()
            .filter(|b| b.chars != Some(b.bullet.chars().count() as u64))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(text: &str, category: Category) -> Entry {
        Entry {
            text: text.to_string(),
            date: "2024-01".to_string(),
            category,
        }
    }

    #[test]
    fn test_unknown_category_deserializes_as_unrecognized() {
        let e: Entry = serde_json::from_value(json!({
            "text": "Fixed radar", "date": "2024-02", "category": "maintenance"
        }))
        .unwrap();
        assert_eq!(e.category, Category::Unrecognized);
    }

    #[test]
    fn test_non_string_category_is_unrecognized() {
        for category in [json!(null), json!(3), json!("Leadership")] {
            let e: Entry = serde_json::from_value(json!({ "text": "t", "category": category }))
                .unwrap();
            assert_eq!(e.category, Category::Unrecognized);
        }
    }

    #[test]
    fn test_missing_fields_default() {
        let e: Entry = serde_json::from_value(json!({})).unwrap();
        assert_eq!(e.text, "");
        assert_eq!(e.date, "");
        assert_eq!(e.category, Category::Unrecognized);
    }

    #[test]
    fn test_wrong_field_type_rejected() {
        let result = serde_json::from_value::<Entry>(json!({ "text": 5, "category": "other" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_item_skips_non_objects() {
        for item in [json!(1), json!("leadership"), json!(true), json!([])] {
            assert!(Entry::from_item(item).unwrap().is_none());
        }
    }

    #[test]
    fn test_from_item_reads_objects() {
        let e = Entry::from_item(json!({ "text": "Led team", "category": "leadership" }))
            .unwrap()
            .unwrap();
        assert_eq!(e.text, "Led team");
        assert_eq!(e.category, Category::Leadership);
    }

    #[test]
    fn test_from_item_rejects_null() {
        assert!(Entry::from_item(json!(null)).is_err());
    }

    #[test]
    fn test_partition_preserves_order_within_group() {
        let entries = vec![
            entry("a", Category::Leadership),
            entry("b", Category::Performance),
            entry("c", Category::Leadership),
            entry("d", Category::Training),
            entry("e", Category::Leadership),
        ];
        let organized = OrganizedEntries::from_entries(&entries);
        let texts: Vec<&str> = organized
            .leadership
            .iter()
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(texts, vec!["a", "c", "e"]);
        assert_eq!(organized.performance.len(), 1);
        assert_eq!(organized.training.len(), 1);
        assert!(organized.other.is_empty());
    }

    #[test]
    fn test_partition_drops_unrecognized() {
        let entries = vec![
            entry("kept", Category::Other),
            entry("dropped", Category::Unrecognized),
        ];
        let organized = OrganizedEntries::from_entries(&entries);
        assert_eq!(organized.total(), 1);
        assert_eq!(organized.other[0].text, "kept");
    }

    #[test]
    fn test_every_recognized_entry_lands_in_exactly_one_group() {
        let categories = [
            Category::Performance,
            Category::Leadership,
            Category::Training,
            Category::Other,
            Category::Unrecognized,
        ];
        let entries: Vec<Entry> = (0..20)
            .map(|i| entry(&i.to_string(), categories[i % categories.len()]))
            .collect();
        let organized = OrganizedEntries::from_entries(&entries);
        assert_eq!(organized.total(), 16);
        for (group, category) in [
            (&organized.performance, Category::Performance),
            (&organized.leadership, Category::Leadership),
            (&organized.training, Category::Training),
            (&organized.other, Category::Other),
        ] {
            assert!(group.iter().all(|e| e.category == category));
        }
    }

    #[test]
    fn test_generated_bullets_counts_over_limit() {
        let bullets: GeneratedBullets = serde_json::from_value(json!({
            "performance": [{ "bullet": "x".repeat(351), "chars": 351 }],
            "leadership": [{ "bullet": "Led team of 5 to complete mission.", "chars": 35 }]
        }))
        .unwrap();
        assert_eq!(bullets.iter().count(), 2);
        assert_eq!(bullets.over_limit(), 1);
        assert_eq!(bullets.miscounted(), 1);
        assert!(bullets.training.is_empty());
    }
}
