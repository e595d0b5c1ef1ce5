use std::sync::{Arc, Mutex};

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    test, web, App,
};

use super::api::configure;
use crate::models::memory_store::MemoryTodoStore;
use crate::models::todo_model::{NewTodo, Todo};
use crate::models::todo_store::TodoStore;
use crate::storage::{ExportStorage, StorageError};

pub const TEST_API_KEY: &str = "test-key";

/// Storage that keeps uploads in memory and answers with a fake signed URL
#[derive(Default)]
pub struct RecordingStorage {
    pub uploads: Mutex<Vec<(String, Vec<u8>)>>,
    pub fail: bool,
}

impl RecordingStorage {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn last_upload(&self) -> Option<(String, String)> {
        self.uploads
            .lock()
            .unwrap()
            .last()
            .map(|(name, bytes)| (name.clone(), String::from_utf8(bytes.clone()).unwrap()))
    }
}

impl ExportStorage for RecordingStorage {
    fn upload(&self, name: &str, content: Vec<u8>) -> Result<String, StorageError> {
        if self.fail {
            return Err(StorageError::UnexpectedStatus {
                operation: "upload blob",
                status: reqwest::StatusCode::FORBIDDEN,
            });
        }

        self.uploads
            .lock()
            .unwrap()
            .push((name.to_string(), content));

        Ok(format!("https://storage.test/todo-exports/{}?sig=abc", name))
    }
}

pub struct TestContext {
    pub store: Arc<MemoryTodoStore>,
    pub storage: Arc<RecordingStorage>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::with_storage(RecordingStorage::default())
    }
}

impl TestContext {
    pub fn with_storage(storage: RecordingStorage) -> Self {
        Self {
            store: Arc::new(MemoryTodoStore::default()),
            storage: Arc::new(storage),
        }
    }

    pub fn seed(&self, title: &str, completed: bool) -> Todo {
        self.store
            .create(NewTodo {
                completed,
                ..NewTodo::from_title(title)
            })
            .unwrap()
    }
}

/// The real route table over the context's in-memory collaborators
pub fn test_app(
    ctx: &TestContext,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let store: Arc<dyn TodoStore> = ctx.store.clone();
    let storage: Arc<dyn ExportStorage> = ctx.storage.clone();

    App::new()
        .app_data(web::Data::from(store))
        .app_data(web::Data::from(storage))
        .configure(|cfg| configure(cfg, TEST_API_KEY))
}

pub fn authed(req: test::TestRequest) -> test::TestRequest {
    req.insert_header(("x-api-key", TEST_API_KEY))
}
