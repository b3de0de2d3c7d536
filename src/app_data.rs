use std::sync::Arc;

use crate::database::Database;
use crate::github::GithubClient;

/// Shared per-process state handed to every request.
#[derive(Clone)]
pub struct AppData {
    pub github: GithubClient,
    pub database: Option<Arc<Database>>,
}

impl AppData {
    pub fn new(github: GithubClient, database: Option<Arc<Database>>) -> Self {
        Self { github, database }
    }
}
