//! The `vidshelf-api` crate defines common data types shared by `vidshelf-site` and
//! `vidshelf-server`.
//!
//! The crate follows these conventions:
//! - Each API endpoint of the `vidshelf-server` defines a full namespace path.
//! - For each endpoint namespace, `vidshelf-api` defines a nested namespace
//!   with the API method of the endpoint.
//! - Inside the namespace for a given API endpoint, the following types are defined:
//!   - If the endpoint returns a JSON body, a `Response` type defines its contents.
//!   - Any additional types required to define the response.
//!
//! The supported endpoints are:
//!  - `GET` `api/videos`. Returns the playlist of the library as a JSON array of
//!    [`VideoDescriptor`](api::videos::get::VideoDescriptor), newest entry first.
//!  - `POST` `api/checkin`. Asks the server to check in the files waiting in the check-in
//!    folder and register them in the playlist. Answers `202 Accepted` without a body.
//!  - `GET` `thumbnails/{path}`. Thumbnail images referenced by the descriptors.

mod types;

/// Path prefix under which thumbnail images are served.
pub const THUMBNAIL_ROUTE: &str = "/thumbnails";

pub mod api {
    pub mod videos {
        pub mod get {
            pub use crate::types::VideoDescriptor;

            /// The response to the `GET` `api/videos` request
            pub type Response = Vec<VideoDescriptor>;
        }
    }
}
