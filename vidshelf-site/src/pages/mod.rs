pub mod video_list;
pub mod watcher;
