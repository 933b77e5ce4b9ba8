//! Platform search.
//!
//! Only the latest release of each platform is considered. A query that
//! contains a USB `vid:pid` pair is answered from board identifiers alone,
//! with the vendor id read from the first four characters of the query and
//! the product id from the four after offset 5. Any other query is matched as a case-insensitive substring against the
//! platform name, its architecture and the names of its boards.
//!
//! Results keep catalog order (package order, then platform order) and hold
//! each release at most once.

use std::sync::LazyLock;

use regex::Regex;

use corepm_index::{Catalog, Platform, PlatformRelease};

static USB_ID_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9a-f]{4}:[0-9a-f]{4}").expect("valid regex"));

/// Search the catalog for platforms matching `query`.
pub fn search<'a>(catalog: &'a Catalog, query: &str) -> Vec<&'a PlatformRelease> {
    let query = query.to_lowercase();

    if USB_ID_PAIR.is_match(&query) {
        let Some((vid, pid)) = usb_id_query(&query) else {
            return Vec::new();
        };
        tracing::debug!(vid, pid, "searching by USB id");
        return find_releases_with_usb_id(catalog, vid, pid);
    }

    let matches = |text: &str| text.to_lowercase().contains(&query);

    latest_releases(catalog)
        .filter(|(platform, release)| {
            matches(platform.name())
                || matches(&platform.architecture)
                || release
                    .boards
                    .iter()
                    .any(|board| matches(&board.name) || board.has_usb_id(&query))
        })
        .map(|(_, release)| release)
        .collect()
}

/// Extract the `(vid, pid)` pair from a lowercase query, if it holds one.
///
/// Once a `hhhh:hhhh` pair appears anywhere in the query, the ids are the
/// first four characters and the four starting at offset 5, wherever the
/// pair itself sits.
pub fn usb_id_query(query: &str) -> Option<(&str, &str)> {
    if !USB_ID_PAIR.is_match(query) {
        return None;
    }
    Some((query.get(..4)?, query.get(5..9)?))
}

/// Latest platform releases with a board advertising exactly `vid:pid`.
pub fn find_releases_with_usb_id<'a>(
    catalog: &'a Catalog,
    vid: &str,
    pid: &str,
) -> Vec<&'a PlatformRelease> {
    latest_releases(catalog)
        .filter(|(_, release)| release.boards.iter().any(|b| b.provides(vid, pid)))
        .map(|(_, release)| release)
        .collect()
}

/// Every platform with at least one release, paired with its latest release.
fn latest_releases(catalog: &Catalog) -> impl Iterator<Item = (&Platform, &PlatformRelease)> {
    catalog
        .packages()
        .iter()
        .flat_map(|package| package.platforms.iter())
        .filter_map(|platform| platform.latest_release().map(|release| (platform, release)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use corepm_index::{Board, Package, UsbId, Version};

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn usb(pair: &str) -> UsbId {
        UsbId::parse(pair).unwrap()
    }

    fn catalog() -> Catalog {
        let mut arduino = Package::new("arduino")
            .with_platform_release(
                PlatformRelease::new("arduino", "avr", v("1.6.20"))
                    .with_name("Arduino AVR Boards")
                    .with_board(Board::new("Arduino Uno").with_usb_id(usb("2341:0043")))
                    .with_board(Board::new("Arduino Mega").with_usb_id(usb("2341:0042"))),
            )
            .with_platform_release(
                PlatformRelease::new("arduino", "samd", v("1.6.9"))
                    .with_name("Arduino SAMD Boards")
                    .with_board(Board::new("Arduino Zero").with_usb_id(usb("2341:804d"))),
            )
            .with_platform_release(
                PlatformRelease::new("arduino", "samd", v("1.6.18"))
                    .with_name("Arduino SAMD Boards (32-bits ARM Cortex-M0+)")
                    .with_board(Board::new("Arduino MKRZero").with_usb_id(usb("2341:804f")))
                    .with_board(Board::new("Arduino MKR1000").with_usb_id(usb("2341:804e"))),
            );

        arduino.platforms.push(Platform::new("arduino", "sam"));

        let third_party = Package::new("acme").with_platform_release(
            PlatformRelease::new("acme", "samd", v("2.0.0"))
                .with_name("ACME Boards")
                .with_board(Board::new("ACME Zero clone").with_usb_id(usb("2341:804d"))),
        );

        Catalog::from_packages(vec![arduino, third_party])
    }

    fn ids(results: &[&PlatformRelease]) -> Vec<String> {
        results.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn board_name_match_mkrzero() {
        let catalog = catalog();
        let results = search(&catalog, "MKRZero");
        assert_eq!(ids(&results), vec!["arduino:samd@1.6.18"]);
    }

    #[test]
    fn only_latest_release_is_eligible() {
        let catalog = catalog();
        // "Arduino Zero" only exists in the superseded samd 1.6.9 release.
        assert!(search(&catalog, "arduino zero").is_empty());
    }

    #[test]
    fn architecture_match_keeps_catalog_order() {
        let catalog = catalog();
        let results = search(&catalog, "SAMD");
        assert_eq!(ids(&results), vec!["arduino:samd@1.6.18", "acme:samd@2.0.0"]);
    }

    #[test]
    fn each_release_listed_once() {
        let catalog = catalog();
        // Matches the platform name and both AVR boards.
        let results = search(&catalog, "arduino");
        assert_eq!(ids(&results), vec!["arduino:avr@1.6.20", "arduino:samd@1.6.18"]);
    }

    #[test]
    fn platform_name_match() {
        let catalog = catalog();
        assert_eq!(ids(&search(&catalog, "cortex-m0")), vec!["arduino:samd@1.6.18"]);
    }

    #[test]
    fn usb_id_fast_path() {
        let catalog = catalog();
        assert_eq!(ids(&search(&catalog, "2341:804F")), vec!["arduino:samd@1.6.18"]);
        assert_eq!(ids(&search(&catalog, "2341:0042")), vec!["arduino:avr@1.6.20"]);
    }

    #[test]
    fn usb_id_fast_path_excludes_substring_matches() {
        let catalog = catalog();
        // The arduino board with 2341:804d is in a superseded release.
        assert_eq!(ids(&search(&catalog, "2341:804d")), vec!["acme:samd@2.0.0"]);
        // A pair anywhere in the query takes the fast path, but the ids are
        // read from the start of the query, so these find no board.
        assert!(search(&catalog, "arduino 2341:804d").is_empty());
        assert!(search(&catalog, "x2341:804f").is_empty());
        assert!(search(&catalog, "0000:0000").is_empty());
    }

    #[test]
    fn usb_id_query_never_falls_back_to_names() {
        let catalog = catalog();
        // "mkrzero" would match a board name, the ids "mkrz"/"ro 2" match nothing.
        assert!(search(&catalog, "mkrzero 2341:804f").is_empty());
        // Offsets that split a multi-byte character yield no ids and no results.
        assert_eq!(usb_id_query("abcé 2341:804f"), None);
        assert!(search(&catalog, "abcé 2341:804f").is_empty());
    }

    #[test]
    fn usb_query_extraction() {
        assert_eq!(usb_id_query("2341:804f"), Some(("2341", "804f")));
        assert_eq!(usb_id_query("2341:804f rev3"), Some(("2341", "804f")));
        assert_eq!(usb_id_query("board 2341:804f please"), Some(("boar", " 234")));
        assert_eq!(usb_id_query("x2341:804f"), Some(("x234", "1:80")));
        assert_eq!(usb_id_query("2341-804f"), None);
        assert_eq!(usb_id_query("mkrzero"), None);
        assert_eq!(usb_id_query("2341:80"), None);
    }

    #[test]
    fn no_match_is_empty() {
        let catalog = catalog();
        assert!(search(&catalog, "esp32").is_empty());
    }

    #[test]
    fn empty_catalog_yields_empty() {
        let catalog = Catalog::new();
        assert!(search(&catalog, "anything").is_empty());
        assert!(search(&catalog, "2341:804f").is_empty());
    }

    #[test]
    fn platforms_without_releases_are_skipped() {
        let catalog = catalog();
        // The empty "sam" platform would match by architecture.
        let results = search(&catalog, "sam");
        assert!(results.iter().all(|r| r.architecture == "samd"));
    }
}
