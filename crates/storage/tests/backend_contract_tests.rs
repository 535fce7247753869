// Behaviour every ObjectStore backend must share, run against each backend.

use bytes::Bytes;
use souvenir_storage::{FilesystemBackend, MemoryBackend, ObjectStore, ObjectStoreExt};
use std::sync::Arc;
use tempfile::TempDir;

async fn backends() -> (TempDir, Vec<Arc<dyn ObjectStore>>) {
    let temp_dir = TempDir::new().unwrap();
    let filesystem = FilesystemBackend::new(temp_dir.path().join("uploads"))
        .await
        .unwrap();
    let backends: Vec<Arc<dyn ObjectStore>> =
        vec![Arc::new(filesystem), Arc::new(MemoryBackend::new())];
    (temp_dir, backends)
}

#[tokio::test]
async fn test_put_overwrites() {
    let (_temp, backends) = backends().await;
    for backend in backends {
        backend.put("a.jpg", Bytes::from("one")).await.unwrap();
        backend.put("a.jpg", Bytes::from("two")).await.unwrap();

        assert_eq!(
            backend.get("a.jpg").await.unwrap(),
            Bytes::from("two"),
            "backend {}",
            backend.backend_name()
        );
        assert_eq!(backend.list().await.unwrap(), vec!["a.jpg"]);
    }
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let (_temp, backends) = backends().await;
    for backend in backends {
        let err = backend.get("missing.png").await.unwrap_err();
        assert!(err.is_not_found(), "backend {}", backend.backend_name());
    }
}

#[tokio::test]
async fn test_delete_if_exists_tolerates_missing() {
    let (_temp, backends) = backends().await;
    for backend in backends {
        backend.put("gone.gif", Bytes::from("gif")).await.unwrap();

        assert!(backend.delete_if_exists("gone.gif").await.unwrap());
        assert!(!backend.delete_if_exists("gone.gif").await.unwrap());
        assert!(backend.get("gone.gif").await.unwrap_err().is_not_found());
    }
}

#[tokio::test]
async fn test_list_returns_every_object() {
    let (_temp, backends) = backends().await;
    for backend in backends {
        for i in 0..5 {
            backend
                .put(&format!("{i}.webp"), Bytes::from(vec![i as u8]))
                .await
                .unwrap();
        }
        backend.delete("2.webp").await.unwrap();

        assert_eq!(
            backend.list().await.unwrap(),
            vec!["0.webp", "1.webp", "3.webp", "4.webp"]
        );
        backend.health_check().await.unwrap();
    }
}
