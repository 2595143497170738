//! Common test utilities for E2E tests

use chrono::Utc;
use tempfile::TempDir;
use tokio::net::TcpListener;
use warbler::data::{EntityId, Post, User};
use warbler::{AppState, config};

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        // Create test configuration
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
            },
            database: config::DatabaseConfig {
                path: db_path.clone(),
            },
            storage: config::StorageConfig {
                bucket: "test-media".to_string(),
                public_url: "https://media.test.example.com".to_string(),
                endpoint: "https://test-account.r2.cloudflarestorage.com".to_string(),
                access_key_id: "test-key".to_string(),
                secret_access_key: "test-secret".to_string(),
                upload_url_ttl_seconds: 900,
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Create HTTP client
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        // Build router
        let app = warbler::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait a bit for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Seed a user directly in the database
    pub async fn seed_user(&self, userid: &str, username: &str) -> User {
        let now = Utc::now();
        let user = User {
            userid: userid.to_string(),
            username: username.to_string(),
            bio: Some("Test bio".to_string()),
            picture: None,
            created_at: now,
            updated_at: now,
        };
        self.state.db.insert_user(&user).await.unwrap();
        user
    }

    /// Seed a root post directly in the database
    pub async fn seed_post(&self, author_id: &str, text: &str) -> Post {
        let post = Post {
            id: EntityId::new().0,
            author_id: author_id.to_string(),
            text_content: text.to_string(),
            image_key: None,
            parent_post_id: None,
            created_at: Utc::now(),
        };
        self.state.db.insert_post(&post).await.unwrap();
        post
    }

    /// Seed a reply directly in the database
    pub async fn seed_reply(&self, author_id: &str, parent_post_id: &str, text: &str) -> Post {
        let post = Post {
            id: EntityId::new().0,
            author_id: author_id.to_string(),
            text_content: text.to_string(),
            image_key: None,
            parent_post_id: Some(parent_post_id.to_string()),
            created_at: Utc::now(),
        };
        self.state.db.insert_post(&post).await.unwrap();
        post
    }

    /// Create a follow edge through the API
    pub async fn follow(&self, follower: &str, followee_id: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/follows"))
            .json(&serde_json::json!({
                "follower": follower,
                "followee_id": followee_id,
            }))
            .send()
            .await
            .unwrap()
    }

    /// Create a block edge through the API
    pub async fn block(&self, blocker: &str, blockee_id: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/blocks"))
            .json(&serde_json::json!({
                "blocker": blocker,
                "blockee_id": blockee_id,
            }))
            .send()
            .await
            .unwrap()
    }
}
