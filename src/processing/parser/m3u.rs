use crate::model::{RunStatistics, StreamRecord};
use crate::utils::{M3U_EXTINF, CONSTANTS};
use log::debug;
use regex::Regex;

fn attribute_value(re: &Regex, line: &str) -> String {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map_or_else(String::new, |m| m.as_str().to_string())
}

#[inline]
pub fn has_allowed_extension(url: &str, file_types: &[String]) -> bool {
    let lc_url = url.to_lowercase();
    file_types.iter()
        .filter(|ext| !ext.is_empty())
        .any(|ext| lc_url.ends_with(ext.as_str()))
}

struct PendingRecord {
    display_name: String,
    group_label: String,
}

fn process_header(line: &str) -> PendingRecord {
    PendingRecord {
        display_name: attribute_value(&CONSTANTS.re_tvg_name, line),
        group_label: attribute_value(&CONSTANTS.re_group_title, line),
    }
}

/// Visits every `#EXTINF` entry with an accepted url in playlist order.
///
/// `file_types` are lower-cased url suffixes. Rejected urls are counted in `rejected_file_exts`.
pub fn consume_m3u<F: FnMut(StreamRecord)>(content: &str, file_types: &[String], stats: &mut RunStatistics, mut visit: F) {
    let mut header: Option<PendingRecord> = None;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with(M3U_EXTINF) {
            // an entry without url is replaced
            header = Some(process_header(line));
            continue;
        }
        if line.starts_with('#') {
            continue;
        }
        if let Some(pending) = header.take() {
            if has_allowed_extension(line, file_types) {
                visit(StreamRecord {
                    url: line.to_string(),
                    display_name: pending.display_name,
                    group_label: pending.group_label,
                });
            } else {
                debug!("Skipping url with unsupported file type: {line}");
                stats.rejected_file_exts += 1;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::{consume_m3u, has_allowed_extension};
    use crate::model::{RunStatistics, StreamRecord};

    fn file_types() -> Vec<String> {
        vec!["mkv".to_string(), "avi".to_string(), ".mp4".to_string()]
    }

    fn parse(content: &str, stats: &mut RunStatistics) -> Vec<StreamRecord> {
        let mut records = vec![];
        consume_m3u(content, &file_types(), stats, |record| records.push(record));
        records
    }

    #[test]
    fn test_extension_filter() {
        let types = file_types();
        assert!(has_allowed_extension("http://x/a.MKV", &types));
        assert!(has_allowed_extension("http://x/a.mp4", &types));
        assert!(!has_allowed_extension("http://x/a.ts", &types));
        assert!(!has_allowed_extension("http://x/a.mkv", &[String::new()]));
    }

    #[test]
    fn test_parse_playlist() {
        let content = "#EXTM3U\r\n\
            #EXTINF:-1 tvg-name=\"Show.S01E01\" group-title=\"Kids\",Show S01E01\r\n\
            #EXTVLCOPT:http-user-agent=VLC\r\n\
            \r\n\
            http://x/a.mkv\r\n\
            #EXTINF:-1 group-title=\"News\",Live\n\
            http://x/live.ts\n\
            #EXTINF:-1 tvg-name=\"Old.Movie\",Old Movie\n\
            http://x/b.avi\n";
        let mut stats = RunStatistics::default();
        let records = parse(content, &mut stats);
        assert_eq!(records, vec![
            StreamRecord::new("http://x/a.mkv", "Show.S01E01", "Kids"),
            StreamRecord::new("http://x/b.avi", "Old.Movie", ""),
        ]);
        assert_eq!(stats.rejected_file_exts, 1);
    }

    #[test]
    fn test_dangling_entries_are_dropped() {
        let content = "#EXTINF:-1 tvg-name=\"Lost\",Lost\n\
            #EXTINF:-1 tvg-name=\"Found\",Found\n\
            http://x/found.mkv\n\
            http://x/orphan.mkv\n\
            #EXTINF:-1 tvg-name=\"Last\",Last\n";
        let mut stats = RunStatistics::default();
        let records = parse(content, &mut stats);
        assert_eq!(records, vec![StreamRecord::new("http://x/found.mkv", "Found", "")]);
        assert_eq!(stats.rejected_file_exts, 0);
    }
}
