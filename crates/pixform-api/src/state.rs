//! Application state shared by every handler.

use crate::flash::FlashSigner;
use pixform_core::Config;
use pixform_processing::{ImageDispatcher, UploadValidator};
use pixform_storage::LocalStorage;

/// Built once at startup and shared behind an `Arc`. Every field is cheap to
/// clone and safe to use from concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: LocalStorage,
    pub dispatcher: ImageDispatcher,
    pub validator: UploadValidator,
    pub flash: FlashSigner,
}
