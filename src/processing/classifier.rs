use crate::model::{ClassifiedTarget, MediaKind, StreamRecord};
use crate::utils::{sanitize_file_name, title_name, CONSTANTS};
use log::debug;

// `S1E02` and `S01E02` both belong to season `S01`
fn season_of(episode_marker: &str) -> Option<String> {
    let caps = CONSTANTS.re_season_number.captures(episode_marker)?;
    let number = caps.get(1)?.as_str().parse::<u32>().ok()?;
    Some(format!("S{number:02}"))
}

/// Classifies a record as TV episode or movie by looking for an `SxxEyy` marker in the display name.
///
/// Returns an error message when no usable show or movie name remains after sanitizing.
pub fn classify_stream(record: &StreamRecord, group_label: String) -> Result<ClassifiedTarget, String> {
    let display_name = record.display_name.as_str();
    if let Some(marker) = CONSTANTS.re_tv_episode.find(display_name) {
        let prefix = &display_name[..marker.start()];
        let canonical_name = title_name(prefix);
        let path_name = sanitize_file_name(prefix);
        if canonical_name.is_empty() || path_name.is_empty() {
            return Err(format!("Invalid TV show name format: {display_name}"));
        }
        let season = season_of(marker.as_str())
            .ok_or_else(|| format!("Invalid season marker {} in {display_name}", marker.as_str()))?;
        debug!("Classified as TV episode: {display_name} => {canonical_name} {season}");
        Ok(ClassifiedTarget {
            kind: MediaKind::TvEpisode { season },
            canonical_name,
            path_name,
            file_name: sanitize_file_name(display_name),
            group_label,
        })
    } else {
        let canonical_name = title_name(display_name);
        let path_name = sanitize_file_name(display_name);
        if canonical_name.is_empty() || path_name.is_empty() {
            return Err(format!("Invalid movie name format: {display_name}"));
        }
        debug!("Classified as movie: {display_name} => {canonical_name}");
        Ok(ClassifiedTarget {
            kind: MediaKind::Movie,
            canonical_name,
            file_name: path_name.clone(),
            path_name,
            group_label,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_stream, season_of};
    use crate::model::{MediaKind, StreamRecord};

    fn classify(name: &str) -> Result<crate::model::ClassifiedTarget, String> {
        classify_stream(&StreamRecord::new("http://x/a.mkv", name, ""), "Dummy".to_string())
    }

    #[test]
    fn test_tv_episode() {
        let target = classify("Show.Name.S01E02").unwrap();
        assert_eq!(target.kind, MediaKind::TvEpisode { season: "S01".to_string() });
        assert_eq!(target.canonical_name, "Show Name");
        assert_eq!(target.path_name, "Show_Name");
        assert_eq!(target.file_name, "Show_Name_S01E02");
        assert_eq!(target.group_label, "Dummy");
    }

    #[test]
    fn test_movie() {
        let target = classify("Movie.Title.2020").unwrap();
        assert_eq!(target.kind, MediaKind::Movie);
        assert!(target.kind.season().is_none());
        assert_eq!(target.canonical_name, "Movie Title 2020");
        assert_eq!(target.path_name, "Movie_Title_2020");
        assert_eq!(target.file_name, "Movie_Title_2020");
    }

    #[test]
    fn test_season_padding() {
        assert_eq!(season_of("S1E02").as_deref(), Some("S01"));
        assert_eq!(season_of("S12E100").as_deref(), Some("S12"));
        let target = classify("Show S2E5").unwrap();
        assert_eq!(target.kind.season(), Some("S02"));
        assert_eq!(target.canonical_name, "Show");
    }

    #[test]
    fn test_first_marker_wins() {
        let target = classify("Show S01E01 S02E02").unwrap();
        assert_eq!(target.kind.season(), Some("S01"));
        assert_eq!(target.canonical_name, "Show");
    }

    #[test]
    fn test_empty_names_are_errors() {
        assert!(classify("S01E01").is_err());
        assert!(classify("...S01E01").is_err());
        assert!(classify("").is_err());
        assert!(classify("???").is_err());
    }
}
