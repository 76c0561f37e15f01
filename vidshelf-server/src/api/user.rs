use std::path::{Component, Path, PathBuf};

use actix_web::{HttpResponse, Responder, get, http::header::ContentType, post, web};

use vidshelf_api::{
    THUMBNAIL_ROUTE,
    api::videos::get::{Response, VideoDescriptor},
};

use super::ApiData;
use crate::{db::PlaylistEntry, library::UserCommand};

fn to_descriptor(entry: PlaylistEntry) -> VideoDescriptor {
    let thumbnail_path =
        (!entry.thumbnail.is_empty()).then(|| format!("{THUMBNAIL_ROUTE}/{}", entry.thumbnail));
    VideoDescriptor {
        title: entry.title,
        channel: entry.channel,
        thumbnail_path,
    }
}

#[get("/videos")]
async fn list_videos(data: web::Data<ApiData>) -> impl Responder {
    match data.db.list_playlist().await {
        Ok(playlist) => {
            let response: Response = playlist.into_iter().map(to_descriptor).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            tracing::error!("Error listing the playlist: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/checkin")]
async fn request_checkin(data: web::Data<ApiData>) -> impl Responder {
    match data.cmd_sender.send(UserCommand::CheckIn) {
        Ok(()) => HttpResponse::Accepted().finish(),
        Err(e) => {
            tracing::error!("Error requesting a check-in: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Resolves a requested thumbnail below `root`. Only plain path components are accepted.
fn resolve_thumbnail(root: &Path, requested: &str) -> Option<PathBuf> {
    let requested = Path::new(requested);
    let mut components = requested.components().peekable();
    components.peek()?;
    if !components.all(|c| matches!(c, Component::Normal(_))) {
        return None;
    }
    Some(root.join(requested))
}

fn content_type_for(path: &Path) -> ContentType {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => ContentType::png(),
        Some("jpg" | "jpeg") => ContentType::jpeg(),
        _ => ContentType::octet_stream(),
    }
}

#[get("/thumbnails/{path:.*}")]
async fn get_thumbnail(data: web::Data<ApiData>, path: web::Path<String>) -> impl Responder {
    let Some(file_path) = resolve_thumbnail(&data.thumbnail_path, &path) else {
        return HttpResponse::NotFound().finish();
    };

    match tokio::fs::read(&file_path).await {
        Ok(content) => HttpResponse::Ok()
            .content_type(content_type_for(&file_path))
            .body(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => HttpResponse::NotFound().finish(),
        Err(e) => {
            tracing::error!("Error reading thumbnail {file_path:?}: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
