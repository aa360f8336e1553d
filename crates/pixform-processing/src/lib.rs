//! Pixform Processing Library
//!
//! The image operation dispatcher and everything it leans on: the codec seam,
//! pixel transforms, output format resolution, and the upload validation the
//! HTTP layer runs before a file ever reaches the dispatcher.

pub mod codec;
pub mod dispatcher;
pub mod image;
pub mod validator;

pub use codec::{CodecError, ImageCodec, RasterCodec};
pub use dispatcher::{DispatchError, DispatchErrorKind, ImageDispatcher};
pub use validator::{secure_filename, UploadValidator, ValidationError};
