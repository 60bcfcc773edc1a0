use crate::{create_app, AppState};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use dockdash_common::{
    ContainerRecord, ImageRecord, NetworkRecord, ResourceKind, UsageSummary, UsageTotals,
    VolumeRecord,
};
use dockdash_engine::bollard::errors::Error as BollardError;
use dockdash_engine::{Engine, EngineError, Result};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Mock engine for testing - serves canned records and scripted failures
#[derive(Default)]
struct MockEngine {
    containers: Vec<ContainerRecord>,
    images: Vec<ImageRecord>,
    volumes: Vec<VolumeRecord>,
    networks: Vec<NetworkRecord>,
    usage: UsageSummary,
    unreachable: bool,
    failing: Vec<(&'static str, &'static str)>,
    removed: Mutex<Vec<(ResourceKind, String)>>,
}

fn server_error(message: &str) -> EngineError {
    EngineError::DockerApi(BollardError::DockerResponseServerError {
        status_code: 409,
        message: message.to_string(),
    })
}

impl MockEngine {
    fn check(&self) -> Result<()> {
        if self.unreachable {
            Err(EngineError::Connect(BollardError::DockerResponseServerError {
                status_code: 500,
                message: "connection refused".to_string(),
            }))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Engine for MockEngine {
    async fn ping(&self) -> Result<String> {
        self.check()?;
        Ok("27.3.1".to_string())
    }

    async fn list_containers(&self) -> Result<Vec<ContainerRecord>> {
        self.check()?;
        Ok(self.containers.clone())
    }

    async fn list_images(&self) -> Result<Vec<ImageRecord>> {
        self.check()?;
        Ok(self.images.clone())
    }

    async fn list_volumes(&self) -> Result<Vec<VolumeRecord>> {
        self.check()?;
        Ok(self.volumes.clone())
    }

    async fn list_networks(&self) -> Result<Vec<NetworkRecord>> {
        self.check()?;
        Ok(self.networks.clone())
    }

    async fn usage(&self) -> Result<UsageSummary> {
        self.check()?;
        Ok(self.usage)
    }

    async fn remove(&self, kind: ResourceKind, target: &str) -> Result<()> {
        self.check()?;
        if let Some((_, message)) = self.failing.iter().find(|(t, _)| *t == target) {
            return Err(server_error(message));
        }
        self.removed.lock().unwrap().push((kind, target.to_string()));
        Ok(())
    }
}

fn create_test_app(engine: MockEngine) -> (Router, Arc<MockEngine>) {
    let engine = Arc::new(engine);
    (create_app(AppState::new(engine.clone())), engine)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[cfg(test)]
mod gateway_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_containers_includes_stopped() {
        let (app, _) = create_test_app(MockEngine {
            containers: vec![
                ContainerRecord {
                    id: "c1".to_string(),
                    names: vec!["/web".to_string()],
                    state: "running".to_string(),
                    ..Default::default()
                },
                ContainerRecord {
                    id: "c2".to_string(),
                    names: vec!["/job".to_string()],
                    state: "exited".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        });

        let (status, json) = send(app, get("/api/containers")).await;

        assert_eq!(status, StatusCode::OK);
        let list = json.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["id"], "c1");
        assert_eq!(list[1]["state"], "exited");
        assert_eq!(list[1]["names"][0], "/job");
    }

    #[tokio::test]
    async fn test_list_images_keeps_engine_order_and_dangling() {
        let (app, _) = create_test_app(MockEngine {
            images: vec![
                ImageRecord {
                    id: "sha256:bbb".to_string(),
                    size: 50,
                    ..Default::default()
                },
                ImageRecord {
                    id: "sha256:aaa".to_string(),
                    repo_tags: vec!["x:latest".to_string()],
                    size: 100,
                    ..Default::default()
                },
            ],
            ..Default::default()
        });

        let (status, json) = send(app, get("/api/images")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json[0]["id"], "sha256:bbb");
        assert_eq!(json[0]["repoTags"], json!([]));
        assert_eq!(json[1]["repoTags"][0], "x:latest");
    }

    #[tokio::test]
    async fn test_list_volumes_and_networks() {
        let (app, _) = create_test_app(MockEngine {
            volumes: vec![VolumeRecord {
                name: "data".to_string(),
                driver: "local".to_string(),
                size: 4096,
                ref_count: 1,
                ..Default::default()
            }],
            networks: vec![NetworkRecord {
                id: "n1".to_string(),
                name: "bridge".to_string(),
                internal: true,
                ..Default::default()
            }],
            ..Default::default()
        });

        let (_, volumes) = send(app.clone(), get("/api/volumes")).await;
        assert_eq!(volumes[0]["size"], 4096);
        assert_eq!(volumes[0]["refCount"], 1);

        let (_, networks) = send(app, get("/api/networks")).await;
        assert_eq!(networks[0]["name"], "bridge");
        assert_eq!(networks[0]["internal"], true);
    }

    #[tokio::test]
    async fn test_system_usage_shape() {
        let (app, _) = create_test_app(MockEngine {
            usage: UsageSummary {
                containers: UsageTotals { count: 2, size: 10 },
                images: UsageTotals { count: 3, size: 300 },
                volumes: UsageTotals::default(),
            },
            ..Default::default()
        });

        let (status, json) = send(app, get("/api/system")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({
                "containers": {"count": 2, "size": 10},
                "images": {"count": 3, "size": 300},
                "volumes": {"count": 0, "size": 0}
            })
        );
    }

    #[tokio::test]
    async fn test_delete_containers_partial_failure() {
        let (app, engine) = create_test_app(MockEngine {
            failing: vec![("c2", "container is running")],
            ..Default::default()
        });

        let (status, json) =
            send(app, delete("/api/containers", json!({"ids": ["c1", "c2"]}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({"results": [
                {"id": "c1", "success": true},
                {"id": "c2", "success": false, "error": "container is running"}
            ]})
        );
        assert_eq!(
            *engine.removed.lock().unwrap(),
            vec![(ResourceKind::Containers, "c1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_delete_volumes_by_name() {
        let (app, engine) = create_test_app(MockEngine::default());

        let (status, json) =
            send(app, delete("/api/volumes", json!({"names": ["data", "cache"]}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({"results": [
                {"name": "data", "success": true},
                {"name": "cache", "success": true}
            ]})
        );
        assert!(engine
            .removed
            .lock()
            .unwrap()
            .iter()
            .all(|(kind, _)| *kind == ResourceKind::Volumes));
    }

    #[tokio::test]
    async fn test_delete_returns_one_result_per_input() {
        let (app, _) = create_test_app(MockEngine {
            failing: vec![("n1", "network has active endpoints")],
            ..Default::default()
        });

        let ids = json!({"ids": ["n1", "n2", "n3", "n4"]});
        let (_, json) = send(app.clone(), delete("/api/networks", ids)).await;
        let results = json["results"].as_array().unwrap();
        assert_eq!(results.len(), 4);
        let order: Vec<_> = results.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(order, vec!["n1", "n2", "n3", "n4"]);

        let (_, json) = send(app, delete("/api/images", json!({"ids": []}))).await;
        assert_eq!(json, json!({"results": []}));
    }

    #[tokio::test]
    async fn test_engine_failure_envelope() {
        let (app, _) = create_test_app(MockEngine {
            unreachable: true,
            ..Default::default()
        });

        for (uri, message) in [
            ("/api/containers", "Failed to list containers"),
            ("/api/images", "Failed to list images"),
            ("/api/volumes", "Failed to list volumes"),
            ("/api/networks", "Failed to list networks"),
            ("/api/system", "Failed to get system usage"),
        ] {
            let (status, json) = send(app.clone(), get(uri)).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert_eq!(json, json!({ "error": message }), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_malformed_delete_body_rejected() {
        let (app, _) = create_test_app(MockEngine::default());

        let (status, _) = send(app, delete("/api/containers", json!({"names": ["x"]}))).await;

        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let (app, _) = create_test_app(MockEngine::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/containers")
                    .header("origin", "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (app, _) = create_test_app(MockEngine::default());
        let (status, json) = send(app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["engine"]["version"], "27.3.1");
        assert!(json["timestamp"].is_string());

        let (app, _) = create_test_app(MockEngine {
            unreachable: true,
            ..Default::default()
        });
        let (_, json) = send(app, get("/health")).await;
        assert_eq!(json["status"], "unhealthy");
    }
}
