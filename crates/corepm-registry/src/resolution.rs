//! Turning platform references into the releases and tools to fetch.
//!
//! Each reference selects one platform release: the exact version when the
//! reference pins one, the latest release otherwise. The tools those
//! releases depend on are looked up by exact version. Both lists keep the
//! order in which items were first requested and hold each item once.

use std::collections::HashSet;

use corepm_index::{Catalog, PlatformRelease, ToolRelease};

use crate::error::ResolveError;
use crate::reference::PlatformReference;

/// Everything a set of references implies, borrowed from the catalog.
#[derive(Debug, Clone, Default)]
pub struct DownloadPlan<'a> {
    /// Platform releases, in request order.
    pub platforms: Vec<&'a PlatformRelease>,
    /// Tool releases required by `platforms`, in first-use order.
    pub tools: Vec<&'a ToolRelease>,
}

/// Resolve references against the catalog.
///
/// Fails on the first reference or tool dependency that cannot be found.
pub fn find_items_to_download<'a>(
    catalog: &'a Catalog,
    references: &[PlatformReference],
) -> Result<DownloadPlan<'a>, ResolveError> {
    let mut plan = DownloadPlan::default();
    let mut seen_platforms = HashSet::new();
    let mut seen_tools = HashSet::new();

    for reference in references {
        let release = resolve_platform(catalog, reference)?;
        let key = (
            release.package.as_str(),
            release.architecture.as_str(),
            &release.version,
        );
        if !seen_platforms.insert(key) {
            tracing::debug!("{release} requested more than once");
            continue;
        }
        plan.platforms.push(release);

        for dependency in &release.tool_dependencies {
            let tool = catalog
                .find_tool_release(&dependency.packager, &dependency.name, &dependency.version)
                .ok_or_else(|| ResolveError::ToolNotFound {
                    tool: dependency.to_string(),
                    release: release.to_string(),
                })?;
            if seen_tools.insert((tool.package.as_str(), tool.name.as_str(), &tool.version)) {
                plan.tools.push(tool);
            }
        }
    }

    tracing::debug!(
        platforms = plan.platforms.len(),
        tools = plan.tools.len(),
        "resolved download plan"
    );
    Ok(plan)
}

/// Pick the release a single reference asks for.
fn resolve_platform<'a>(
    catalog: &'a Catalog,
    reference: &PlatformReference,
) -> Result<&'a PlatformRelease, ResolveError> {
    let package = catalog
        .package(&reference.package)
        .ok_or_else(|| ResolveError::PackageNotFound {
            package: reference.package.clone(),
        })?;
    let platform =
        package
            .platform(&reference.architecture)
            .ok_or_else(|| ResolveError::PlatformNotFound {
                package: reference.package.clone(),
                architecture: reference.architecture.clone(),
            })?;

    match &reference.version {
        None => platform
            .latest_release()
            .ok_or_else(|| ResolveError::NoReleases {
                package: reference.package.clone(),
                architecture: reference.architecture.clone(),
            }),
        Some(version) => platform
            .release(version)
            .ok_or_else(|| ResolveError::ReleaseNotFound {
                package: reference.package.clone(),
                architecture: reference.architecture.clone(),
                version: version.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corepm_index::{Flavour, Package, Platform, Resource, ToolDependency, Version};

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn r(token: &str) -> PlatformReference {
        PlatformReference::parse(token).unwrap()
    }

    fn tool(name: &str, version: &str) -> ToolRelease {
        ToolRelease::new("arduino", name, v(version)).with_flavour(Flavour::new(
            "all",
            Resource::new(format!("http://h/{name}.zip"), format!("{name}.zip")),
        ))
    }

    fn catalog() -> Catalog {
        let mut arduino = Package::new("arduino")
            .with_platform_release(
                PlatformRelease::new("arduino", "avr", v("1.6.20"))
                    .with_tool_dependency(ToolDependency::new("arduino", "avrdude", v("6.3.0")))
                    .with_tool_dependency(ToolDependency::new("arduino", "avr-gcc", v("5.4.0"))),
            )
            .with_platform_release(
                PlatformRelease::new("arduino", "samd", v("1.6.18"))
                    .with_tool_dependency(ToolDependency::new("arduino", "bossac", v("1.7.0")))
                    .with_tool_dependency(ToolDependency::new("arduino", "avrdude", v("6.3.0"))),
            )
            .with_platform_release(
                PlatformRelease::new("arduino", "samd", v("1.6.19"))
                    .with_tool_dependency(ToolDependency::new("arduino", "bossac", v("1.8.0"))),
            )
            .with_platform_release(
                PlatformRelease::new("arduino", "broken", v("1.0.0"))
                    .with_tool_dependency(ToolDependency::new("arduino", "ghost", v("0.1.0"))),
            )
            .with_tool_release(tool("avrdude", "6.3.0"))
            .with_tool_release(tool("avr-gcc", "5.4.0"))
            .with_tool_release(tool("bossac", "1.7.0"))
            .with_tool_release(tool("bossac", "1.8.0"));
        arduino.platforms.push(Platform::new("arduino", "sam"));
        Catalog::from_packages(vec![arduino])
    }

    fn labels<T: ToString>(items: &[&T]) -> Vec<String> {
        items.iter().map(|i| i.to_string()).collect()
    }

    #[test]
    fn latest_release_with_tools() {
        let catalog = catalog();
        let plan = find_items_to_download(&catalog, &[r("arduino:samd")]).unwrap();
        assert_eq!(labels(&plan.platforms), vec!["arduino:samd@1.6.19"]);
        assert_eq!(labels(&plan.tools), vec!["arduino:bossac@1.8.0"]);
    }

    #[test]
    fn pinned_release() {
        let catalog = catalog();
        let plan = find_items_to_download(&catalog, &[r("arduino:samd=1.6.18")]).unwrap();
        assert_eq!(labels(&plan.platforms), vec!["arduino:samd@1.6.18"]);
        assert_eq!(
            labels(&plan.tools),
            vec!["arduino:bossac@1.7.0", "arduino:avrdude@6.3.0"]
        );
    }

    #[test]
    fn shared_tools_and_repeated_platforms_are_deduplicated() {
        let catalog = catalog();
        let plan = find_items_to_download(
            &catalog,
            &[
                r("arduino:avr"),
                r("arduino:samd=1.6.18"),
                r("arduino:avr=1.6.20"),
            ],
        )
        .unwrap();
        assert_eq!(
            labels(&plan.platforms),
            vec!["arduino:avr@1.6.20", "arduino:samd@1.6.18"]
        );
        assert_eq!(
            labels(&plan.tools),
            vec![
                "arduino:avrdude@6.3.0",
                "arduino:avr-gcc@5.4.0",
                "arduino:bossac@1.7.0"
            ]
        );
    }

    #[test]
    fn missing_version() {
        let catalog = catalog();
        let err = find_items_to_download(&catalog, &[r("arduino:samd=1.6.9")]).unwrap_err();
        assert!(matches!(err, ResolveError::ReleaseNotFound { .. }));
        assert_eq!(
            err.to_string(),
            "required version 1.6.9 not found for platform arduino:samd"
        );
    }

    #[test]
    fn missing_package_platform_and_releases() {
        let catalog = catalog();
        assert!(matches!(
            find_items_to_download(&catalog, &[r("esp8266:esp8266")]),
            Err(ResolveError::PackageNotFound { .. })
        ));
        assert!(matches!(
            find_items_to_download(&catalog, &[r("arduino:stm32")]),
            Err(ResolveError::PlatformNotFound { .. })
        ));
        assert!(matches!(
            find_items_to_download(&catalog, &[r("arduino:sam")]),
            Err(ResolveError::NoReleases { .. })
        ));
    }

    #[test]
    fn missing_tool_fails_whole_plan() {
        let catalog = catalog();
        let err =
            find_items_to_download(&catalog, &[r("arduino:avr"), r("arduino:broken")]).unwrap_err();
        match err {
            ResolveError::ToolNotFound { tool, release } => {
                assert_eq!(tool, "arduino:ghost@0.1.0");
                assert_eq!(release, "arduino:broken@1.0.0");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn empty_request_is_empty_plan() {
        let catalog = catalog();
        let plan = find_items_to_download(&catalog, &[]).unwrap();
        assert!(plan.platforms.is_empty());
        assert!(plan.tools.is_empty());
    }
}
