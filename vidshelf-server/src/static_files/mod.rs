use actix_web::web;

include!(concat!(env!("OUT_DIR"), "/generated.rs"));

/// Serves the compiled `vidshelf-site` bundle embedded at build time.
///
/// Unknown paths fall back to `index.html` so that client-side routes such as `/watcher` can be
/// opened directly. Must be registered after every other service.
pub fn register_static_files(app: &mut web::ServiceConfig) {
    let site = actix_web_static_files::ResourceFiles::new("/", generate());
    app.service(site.resolve_not_found_to_root());
}
