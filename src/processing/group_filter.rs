use crate::error::{config_err, StrmSyncError};
use std::collections::HashSet;

fn group_key(label: &str) -> String {
    label.trim().to_lowercase()
}

fn group_keys(labels: &[String]) -> HashSet<String> {
    labels.iter()
        .map(|label| group_key(label))
        .filter(|key| !key.is_empty())
        .collect()
}

/// Include/exclude filter on the group label of a stream record.
#[derive(Debug, Clone, Default)]
pub struct GroupFilter {
    default_group: String,
    exclude: HashSet<String>,
    include: HashSet<String>,
}

impl GroupFilter {
    /// Fails when a group is both included and excluded.
    pub fn new(default_group: &str, exclude: &[String], include: &[String]) -> Result<Self, StrmSyncError> {
        let exclude = group_keys(exclude);
        let include = group_keys(include);
        let mut overlap: Vec<&String> = exclude.intersection(&include).collect();
        if !overlap.is_empty() {
            overlap.sort();
            let groups: Vec<&str> = overlap.iter().map(|s| s.as_str()).collect();
            return Err(config_err!("Groups can't be included and excluded at the same time: {}", groups.join(", ")));
        }
        Ok(Self {
            default_group: default_group.trim().to_string(),
            exclude,
            include,
        })
    }

    /// Returns the normalized group label when the record passes the filter.
    /// An empty label is replaced by the default group.
    pub fn accept(&self, group_label: &str) -> Option<String> {
        let mut label = group_key(group_label);
        if label.is_empty() {
            label.clone_from(&self.default_group);
        }
        let key = group_key(&label);
        if self.exclude.contains(&key) {
            return None;
        }
        if !self.include.is_empty() && !self.include.contains(&key) {
            return None;
        }
        Some(label)
    }

    pub fn excluded_groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = self.exclude.iter().map(String::as_str).collect();
        groups.sort_unstable();
        groups
    }

    pub fn included_groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = self.include.iter().map(String::as_str).collect();
        groups.sort_unstable();
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::GroupFilter;

    fn to_vec(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_exclude_is_case_insensitive() {
        let filter = GroupFilter::new("Dummy", &to_vec(&["kids"]), &[]).unwrap();
        assert_eq!(filter.accept("Kids"), None);
        assert_eq!(filter.accept("  KIDS "), None);
        assert_eq!(filter.accept("News"), Some("news".to_string()));
    }

    #[test]
    fn test_include_list() {
        let filter = GroupFilter::new("Dummy", &[], &to_vec(&["News ", "Sports"])).unwrap();
        assert_eq!(filter.accept("news"), Some("news".to_string()));
        assert_eq!(filter.accept("SPORTS"), Some("sports".to_string()));
        assert_eq!(filter.accept("Kids"), None);
        assert_eq!(filter.accept(""), None);
    }

    #[test]
    fn test_default_group() {
        let filter = GroupFilter::new("Dummy", &[], &[]).unwrap();
        assert_eq!(filter.accept(""), Some("Dummy".to_string()));
        assert_eq!(filter.accept("   "), Some("Dummy".to_string()));

        let filter = GroupFilter::new("Dummy", &to_vec(&["dummy"]), &[]).unwrap();
        assert_eq!(filter.accept(""), None);

        let filter = GroupFilter::new("Dummy", &[], &to_vec(&["dummy"])).unwrap();
        assert_eq!(filter.accept(""), Some("Dummy".to_string()));
    }

    #[test]
    fn test_overlap_is_rejected() {
        let result = GroupFilter::new("Dummy", &to_vec(&["kids", "news"]), &to_vec(&["KIDS"]));
        let err = result.unwrap_err();
        assert!(err.message.contains("kids"));
        assert!(!err.message.contains("news"));
    }
}
