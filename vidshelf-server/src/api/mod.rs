use std::{path::PathBuf, sync::Arc};

use crate::{db::Database, library::UserCommand};

use actix_web::web;
use tokio::sync::mpsc::UnboundedSender;

mod user;

/// Shared resources used in HTTP handlers
pub struct ApiData {
    db: Arc<Database>,
    cmd_sender: UnboundedSender<UserCommand>,
    thumbnail_path: PathBuf,
}

impl ApiData {
    pub fn new(
        db: Arc<Database>,
        cmd_sender: UnboundedSender<UserCommand>,
        thumbnail_path: PathBuf,
    ) -> Self {
        Self {
            db,
            cmd_sender,
            thumbnail_path,
        }
    }
}

pub fn register_handlers(app: &mut web::ServiceConfig) {
    app.service(
        web::scope("api")
            .service(user::list_videos)
            .service(user::request_checkin),
    )
    .service(user::get_thumbnail);
}
