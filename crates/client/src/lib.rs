//! Client for the upstream SAMS asset-management service.
//!
//! The gateway never touches asset storage itself -- every operation is
//! delegated to the upstream service over HTTP. [`AssetService`] is the
//! seam the gateway handlers program against; [`SamsAssetClient`] is the
//! [`reqwest`]-backed implementation.

pub mod assets;
pub mod response;

pub use assets::{AssetService, SamsAssetClient};
pub use response::{AssetFile, ClientError, ClientResponse, UploadFile};
