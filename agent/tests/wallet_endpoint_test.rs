use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use ertdrive_agent::{router, AppState};
use ertdrive_core::MountPoint;
use ertdrive_device::{DeviceError, DeviceLocator, Result as DeviceResult, StaticVolumeTable, VolumeTable};
use ertdrive_discovery::WalletScanner;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tower::ServiceExt;

struct FailingTable;

impl VolumeTable for FailingTable {
    fn volumes(&self) -> DeviceResult<Vec<MountPoint>> {
        Err(DeviceError::Enumeration {
            path: PathBuf::from("/proc/self/mounts"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }
}

fn system_disk() -> MountPoint {
    MountPoint::new("/", "/dev/nvme0n1p2", "ext4").with_options(["rw", "relatime"])
}

fn usb_stick(path: &Path) -> MountPoint {
    MountPoint::new(path, "/dev/sdb1", "vfat").with_options(["rw", "removable"])
}

fn app(table: impl VolumeTable + 'static) -> axum::Router {
    router(AppState::new(DeviceLocator::new(table), WalletScanner::default()))
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_wallet_no_removable_device() {
    let app = app(StaticVolumeTable::new(vec![system_disk()]));

    let (status, body) = get_json(app, "/wallet").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "found": false, "walletData": null }));
}

#[tokio::test]
async fn test_wallet_found_on_removable_device() {
    let drive = TempDir::new().expect("create drive dir");
    std::fs::write(drive.path().join("wallet.ert"), "mySecretSeed").expect("write wallet");

    let app = app(StaticVolumeTable::new(vec![system_disk(), usb_stick(drive.path())]));

    let (status, body) = get_json(app, "/wallet").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "found": true, "walletData": "mySecretSeed" }));
}

#[tokio::test]
async fn test_wallet_device_without_wallet_file() {
    let drive = TempDir::new().expect("create drive dir");
    std::fs::write(drive.path().join("readme.txt"), "hello").expect("write file");
    std::fs::write(drive.path().join("empty.ert"), "  \n").expect("write blank wallet");

    let app = app(StaticVolumeTable::new(vec![usb_stick(drive.path())]));

    let (status, body) = get_json(app, "/wallet").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "found": false, "walletData": null }));
}

#[tokio::test]
async fn test_wallet_enumeration_failure_degrades_to_not_found() {
    let (status, body) = get_json(app(FailingTable), "/wallet").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "found": false, "walletData": null }));
}

#[tokio::test]
async fn test_wallet_allows_any_origin() {
    let app = app(StaticVolumeTable::default());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/wallet")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_drives_lists_all_volumes() {
    let drive = TempDir::new().expect("create drive dir");
    let app = app(StaticVolumeTable::new(vec![system_disk(), usb_stick(drive.path())]));

    let (status, body) = get_json(app, "/drives").await;
    assert_eq!(status, StatusCode::OK);

    let drives = body["drives"].as_array().expect("drives array");
    assert_eq!(drives.len(), 2);
    assert_eq!(drives[0]["removable"], false);
    assert_eq!(drives[1]["removable"], true);
    assert_eq!(drives[1]["fileSystem"], "vfat");
}

#[tokio::test]
async fn test_drives_enumeration_failure_is_500() {
    let (status, body) = get_json(app(FailingTable), "/drives").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .starts_with("Failed to list drives"));
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get_json(app(StaticVolumeTable::default()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
