use std::path::{Path, PathBuf};

/// A bag, optionally narrowed to a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BagRef {
    pub bag_name: String,
    pub item_name: Option<String>,
}

impl BagRef {
    pub fn new(bag_name: impl Into<String>, item_name: Option<String>) -> Self {
        Self {
            bag_name: bag_name.into(),
            item_name,
        }
    }
}

pub fn bag_path(bags_path: &Path, bag_name: &str) -> PathBuf {
    bags_path.join(bag_name)
}

pub fn item_path(bag_path: &Path, item_name: &str) -> PathBuf {
    bag_path.join(format!("{}.json", item_name))
}

/// Item ids (and bag names) are limited to `[.\-[:alnum:]_]+`.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let bag = bag_path(Path::new("/srv/kitchen/data_bags"), "users");
        assert_eq!(bag, PathBuf::from("/srv/kitchen/data_bags/users"));
        assert_eq!(
            item_path(&bag, "alice"),
            PathBuf::from("/srv/kitchen/data_bags/users/alice.json")
        );
    }

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("alice"));
        assert!(is_valid_name("db-prod_1.2"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("../etc"));
        assert!(!is_valid_name("with space"));
    }
}
