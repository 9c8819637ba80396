mod helper;

use serde_json::json;
use tempfile::TempDir;

use helper::{ChannelSpec, catalog_json, write_catalog};
use update_resolver::app::{CheckOptions, run_check};
use update_resolver::config::ResolverConfig;
use update_resolver::update::{ChannelStatus, Platform, ResolveError};

fn channels() -> Vec<ChannelSpec> {
    vec![
        ChannelSpec::new("IDEA_EAP", "eap", &["145.600"]),
        ChannelSpec::new("IDEA_Release", "release", &["145.596"]).with_build(json!({
            "number": "145.597",
            "version": "2016.1.1",
            "releaseDate": "20160420",
            "patches": [{ "from": "145.596", "size": 7 }]
        })),
    ]
}

fn options(build: &str) -> CheckOptions {
    CheckOptions {
        build: build.to_string(),
        platform: Some(Platform::Unix),
        ..Default::default()
    }
}

#[tokio::test]
async fn check_against_file_catalog_reports_release_update() {
    let (_dir, path) = write_catalog(&channels());

    let report = run_check(
        CheckOptions {
            catalog_file: Some(path),
            ..options("IU-145.596")
        },
        ResolverConfig::default(),
    )
    .await
    .unwrap();

    assert!(report.update_available);
    assert_eq!(report.build.as_deref(), Some("145.597"));
    assert_eq!(report.channel.as_deref(), Some("IDEA_Release"));
    assert_eq!(report.release_date.as_deref(), Some("2016-04-20"));
    assert_eq!(report.patch.as_ref().map(|p| p.size), Some(Some(7)));
}

#[tokio::test]
async fn channel_override_widens_the_subscription() {
    let (_dir, path) = write_catalog(&channels());

    let report = run_check(
        CheckOptions {
            catalog_file: Some(path),
            channel: Some(ChannelStatus::Eap),
            ..options("IU-145.596")
        },
        ResolverConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.build.as_deref(), Some("145.600"));
    assert_eq!(report.channel_status, Some(ChannelStatus::Eap));
    assert_eq!(report.patch, None);
}

#[tokio::test]
async fn ignored_builds_from_config_and_options_are_combined() {
    let (_dir, path) = write_catalog(&channels());
    let mut config = ResolverConfig::default();
    config.updates.selected_channel = ChannelStatus::Eap;
    config.updates.ignored_builds.push("145.600".to_string());

    let report = run_check(
        CheckOptions {
            catalog_file: Some(path),
            ignored: vec!["145.597".to_string()],
            ..options("IU-145.258")
        },
        config,
    )
    .await
    .unwrap();

    assert_eq!(report.build.as_deref(), Some("145.596"));
}

#[tokio::test]
async fn unknown_product_is_an_error() {
    let (_dir, path) = write_catalog(&channels());

    let result = run_check(
        CheckOptions {
            catalog_file: Some(path),
            ..options("PY-145.258")
        },
        ResolverConfig::default(),
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn malformed_current_build_is_reported_as_resolution_failure() {
    let (_dir, path) = write_catalog(&channels());

    let error = run_check(
        CheckOptions {
            catalog_file: Some(path),
            ..options("IU-145.x")
        },
        ResolverConfig::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        error.downcast_ref::<ResolveError>(),
        Some(ResolveError::MalformedBuildNumber(_))
    ));
}

#[tokio::test]
async fn malformed_patch_source_is_reported_separately() {
    let (_dir, path) = write_catalog(&channels());

    let error = run_check(
        CheckOptions {
            catalog_file: Some(path),
            from: Some("145.x".to_string()),
            ..options("IU-145.596")
        },
        ResolverConfig::default(),
    )
    .await
    .unwrap_err();

    assert!(error.to_string().contains("invalid patch source build"));
}

#[tokio::test]
async fn missing_catalog_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();

    let result = run_check(
        CheckOptions {
            catalog_file: Some(temp_dir.path().join("missing.json")),
            ..options("IU-145.258")
        },
        ResolverConfig::default(),
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn http_catalog_is_served_from_cache_once_fetched() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/updates.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(catalog_json(&channels()))
        .expect(1)
        .create_async()
        .await;

    let temp_dir = TempDir::new().unwrap();
    let mut config = ResolverConfig::default();
    config.catalog.url = Some(format!("{}/updates.json", server.url()));
    let cached_options = || CheckOptions {
        cache_db: Some(temp_dir.path().join("catalog.db")),
        ..options("IU-145.596")
    };

    let first = run_check(cached_options(), config.clone()).await.unwrap();
    let second = run_check(cached_options(), config).await.unwrap();

    mock.assert_async().await;
    assert_eq!(first, second);
    assert_eq!(second.build.as_deref(), Some("145.597"));
}

#[tokio::test]
async fn refresh_bypasses_fresh_cache() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/updates.json")
        .with_status(200)
        .with_body(catalog_json(&channels()))
        .expect(2)
        .create_async()
        .await;

    let temp_dir = TempDir::new().unwrap();
    let url = format!("{}/updates.json", server.url());
    let refreshing_options = || CheckOptions {
        catalog_url: Some(url.clone()),
        cache_db: Some(temp_dir.path().join("catalog.db")),
        refresh: true,
        ..options("IU-145.596")
    };

    run_check(refreshing_options(), ResolverConfig::default())
        .await
        .unwrap();
    run_check(refreshing_options(), ResolverConfig::default())
        .await
        .unwrap();

    mock.assert_async().await;
}
