// Asset request handling module
// Routes requests on the asset listener: health check, then static files
// with SPA fallback.

mod router;
mod static_files;

pub use router::{handle_request, RequestContext};
