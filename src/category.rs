//! Categorical values for categorical scatter maps.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A categorical value: an integer, a floating point number or a text
/// label.
///
/// Categories are totally ordered: numbers sort before text, numbers by
/// value (`total_cmp`), text lexicographically. An integer and a float of
/// the same value are the same category; each keeps its own spelling when
/// displayed, so `2.0` reads "2.0" and `2` reads "2".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl Category {
    /// Numeric value of the category, `None` for text
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Category::Integer(value) => Some(*value as f64),
            Category::Number(value) => Some(*value),
            Category::Text(_) => None,
        }
    }

    fn number_bits(value: f64) -> u64 {
        // -0.0 and 0.0 are the same category
        if value == 0.0 {
            0.0f64.to_bits()
        } else {
            value.to_bits()
        }
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Category {}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => {
                if a == 0.0 && b == 0.0 {
                    Ordering::Equal
                } else {
                    a.total_cmp(&b)
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => match (self, other) {
                (Category::Text(a), Category::Text(b)) => a.cmp(b),
                _ => Ordering::Equal,
            },
        }
    }
}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match (self.as_number(), self) {
            (Some(value), _) => {
                0u8.hash(state);
                Self::number_bits(value).hash(state);
            }
            (None, Category::Text(text)) => {
                1u8.hash(state);
                text.hash(state);
            }
            (None, _) => {}
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Integer(value) => write!(f, "{}", value),
            Category::Number(value) if value.is_finite() && value.fract() == 0.0 => {
                write!(f, "{:.1}", value)
            }
            Category::Number(value) => write!(f, "{}", value),
            Category::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for Category {
    fn from(value: f64) -> Self {
        Category::Number(value)
    }
}

impl From<i32> for Category {
    fn from(value: i32) -> Self {
        Category::Integer(value.into())
    }
}

impl From<i64> for Category {
    fn from(value: i64) -> Self {
        Category::Integer(value)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::Text(value.to_string())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_ordering_numbers_before_text() {
        let mut values = vec![
            Category::from("a"),
            Category::from(2.0),
            Category::from(1),
            Category::from(-3),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Category::from(-3),
                Category::from(1),
                Category::from(2.0),
                Category::from("a"),
            ]
        );
    }

    #[test]
    fn test_integer_and_float_are_same_category() {
        assert_eq!(Category::from(1), Category::from(1.0));
        assert_eq!(Category::from(0.0), Category::from(-0.0));

        let mut names = HashMap::new();
        names.insert(Category::from(2.0), "float".to_string());
        assert_eq!(names.get(&Category::from(2)), Some(&"float".to_string()));
        names.insert(Category::from(-0.0), "zero".to_string());
        assert_eq!(names.get(&Category::from(0)), Some(&"zero".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Category::from(1).to_string(), "1");
        assert_eq!(Category::from(2.0).to_string(), "2.0");
        assert_eq!(Category::from(2.5).to_string(), "2.5");
        assert_eq!(Category::from(-0.0).to_string(), "-0.0");
        assert_eq!(Category::from("a").to_string(), "a");
    }

    #[test]
    fn test_deserialize_mixed() {
        let values: Vec<Category> = serde_json::from_str(r#"[1, 2.0, 1, "a"]"#).unwrap();
        assert!(matches!(values[0], Category::Integer(1)));
        assert!(matches!(values[1], Category::Number(v) if v == 2.0));
        assert_eq!(values[1].to_string(), "2.0");
        assert_eq!(values[3], Category::from("a"));
    }
}
