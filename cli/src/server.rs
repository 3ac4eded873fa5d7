//! HTTP front end for the scanner.
//!
//! | Route              | Result                                         |
//! |--------------------|------------------------------------------------|
//! | `GET /scan`        | server-sent scan events, directory from disk   |
//! | `POST /scan`       | server-sent scan events, optional inline creds |
//! | `GET /scan/simple` | JSON array of devices once the sweep finishes  |
//! | `GET /healthz`     | liveness                                       |

mod error;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
